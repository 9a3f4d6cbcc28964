use std::collections::BTreeMap;
use std::ops::Index;

/// The name-to-value map handed to a route's responder.
///
/// It merges, for the matched route:
/// - values captured by `:token`s in the template path;
/// - the flattened query parameters of the intercepted URL;
/// - values captured by `:token`s in the template query.
///
/// When the same name appears in more than one of those sources, the later
/// source in the list above wins. In particular a query parameter shadows a
/// path capture of the same name.
///
/// ### Example
/// ```rust
/// use imposter::UrlTemplate;
/// use url::Url;
///
/// let template = UrlTemplate::parse("/users/:id/widgets");
/// let url = Url::parse("https://api.example.com/users/42/widgets").unwrap();
///
/// let params = template.path_values(&url).unwrap();
/// assert_eq!(params.get("id"), Some("42"));
/// assert_eq!(&params["id"], "42");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Params {
    values: BTreeMap<String, String>,
}

impl Params {
    pub(crate) fn new() -> Params {
        Params::default()
    }

    /// Look up a value by token or query parameter name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Check if a value was captured under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over all `(name, value)` pairs, in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value.as_str()))
    }

    pub(crate) fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    /// Overlay `other` on top of `self`. Values in `other` win on collision.
    pub(crate) fn merge(&mut self, other: Params) {
        self.values.extend(other.values);
    }
}

/// Panics when no value was captured under `name`. Use [`Params::get`] when
/// the name may be absent.
impl Index<&str> for Params {
    type Output = str;

    fn index(&self, name: &str) -> &str {
        match self.get(name) {
            Some(value) => value,
            None => panic!("No parameter named `{}` was captured.", name),
        }
    }
}

impl FromIterator<(String, String)> for Params {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Params {
        Params {
            values: iter.into_iter().collect(),
        }
    }
}

impl<'a> FromIterator<(&'a str, &'a str)> for Params {
    fn from_iter<I: IntoIterator<Item = (&'a str, &'a str)>>(iter: I) -> Params {
        iter.into_iter()
            .map(|(name, value)| (name.to_owned(), value.to_owned()))
            .collect()
    }
}
