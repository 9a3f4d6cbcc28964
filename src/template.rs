use std::collections::HashSet;
use std::fmt;

use once_cell::sync::Lazy;
use percent_encoding::percent_decode_str;
use regex::Regex;
use url::Url;

use crate::Params;

static TOKEN_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_-]*$").expect("Failed to compile the token name regex.")
});

#[derive(Clone, Debug)]
enum Segment {
    Literal(String),
    Token(String),
}

#[derive(Clone, Debug)]
enum QueryPattern {
    Literal(String),
    Token(String),
}

/// A URL pattern with named `:token` captures, e.g. `/agencies/:agency_id/stops`.
///
/// Templates are the route half of a URL: scheme, host and port belong to
/// [`Host`], the template describes everything after them. A template matches
/// a concrete URL as follows:
///
/// - The path matches when it has the same number of segments as the template
///   and every segment agrees: a literal template segment must be equal to the
///   corresponding URL segment (after percent-decoding both), while a `:token`
///   segment matches any single non-empty segment and captures its decoded
///   value under the token's name.
/// - Each fixed query pair in the template (e.g. `page=2`) must be present in
///   the URL with an equal value. Each `:token` query value (e.g.
///   `sort=:sort`) captures the URL's value for that parameter when present;
///   an absent parameter is not a mismatch. Query parameters of the URL that
///   the template does not mention are ignored.
///
/// A `:token` never spans more than one path segment and never matches an
/// empty one.
///
/// ### Example
/// ```rust
/// use imposter::UrlTemplate;
/// use url::Url;
///
/// let template = UrlTemplate::parse("/users/:id/widgets?sort=:sort");
/// let url = Url::parse("https://api.example.com/users/42/widgets?sort=name").unwrap();
///
/// let path_values = template.path_values(&url).unwrap();
/// assert_eq!(&path_values["id"], "42");
///
/// let query_values = template.query_values(&url).unwrap();
/// assert_eq!(&query_values["sort"], "name");
/// ```
///
/// [`Host`]: crate::Host
#[derive(Clone, Debug)]
pub struct UrlTemplate {
    source: String,
    segments: Vec<Segment>,
    query: Vec<(String, QueryPattern)>,
}

impl UrlTemplate {
    /// Parse a template string.
    ///
    /// A leading `/` is optional: `users/:id` and `/users/:id` are the same
    /// template.
    ///
    /// ### Panics
    ///
    /// Templates are test configuration, so malformed ones panic instead of
    /// failing at match time:
    /// - the template embeds a host (`https://example.com/users`);
    /// - a `:` is followed by anything other than a name made of letters,
    ///   digits, `_` or `-`;
    /// - the same token name is used more than once;
    /// - the same query parameter is listed more than once;
    /// - a token appears in a query parameter name (only values can be
    ///   captured);
    /// - a literal is not valid percent-encoded UTF-8.
    pub fn parse<T: Into<String>>(template: T) -> UrlTemplate {
        let mut source = template.into();

        if let Ok(absolute) = Url::parse(&source) {
            if let Some(host) = absolute.host_str() {
                let relative = match absolute.query() {
                    Some(query) => format!("{}?{}", absolute.path(), query),
                    None => absolute.path().to_string(),
                };
                panic!(
                    "Failed to parse route template `{}`: it includes the host `{}`. There is no need to specify the host in a route template - it belongs to `Host`. Try replacing your template with `{}`.",
                    source, host, relative
                );
            }
        }

        if !source.starts_with('/') {
            source.insert(0, '/');
        }

        let (path, query) = match source.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (source.as_str(), None),
        };

        let mut seen = HashSet::new();

        let segments = raw_segments(path)
            .map(|raw| {
                if raw.starts_with(':') {
                    Segment::Token(parse_token(raw, &source, &mut seen))
                } else {
                    Segment::Literal(
                        decode_path_component(raw)
                            .unwrap_or_else(|| invalid_encoding(&source, raw)),
                    )
                }
            })
            .collect();

        let mut query_patterns = Vec::new();
        if let Some(query) = query {
            let mut keys = HashSet::new();
            for pair in query.split('&').filter(|pair| !pair.is_empty()) {
                let (raw_key, raw_value) = pair.split_once('=').unwrap_or((pair, ""));
                if raw_key.starts_with(':') {
                    panic!(
                        "Failed to parse route template `{}`: tokens are not supported in query parameter names (`{}`). Only query parameter values can be captured.",
                        source, raw_key
                    );
                }
                let key = decode_query_component(raw_key)
                    .unwrap_or_else(|| invalid_encoding(&source, raw_key));
                if !keys.insert(key.clone()) {
                    panic!(
                        "Failed to parse route template `{}`: the query parameter `{}` appears more than once.",
                        source, key
                    );
                }
                let pattern = if raw_value.starts_with(':') {
                    QueryPattern::Token(parse_token(raw_value, &source, &mut seen))
                } else {
                    QueryPattern::Literal(
                        decode_query_component(raw_value)
                            .unwrap_or_else(|| invalid_encoding(&source, raw_value)),
                    )
                };
                query_patterns.push((key, pattern));
            }
        }

        UrlTemplate {
            source,
            segments,
            query: query_patterns,
        }
    }

    /// Match the path of `url` against the template's path, capturing token
    /// values.
    ///
    /// Returns `None` when the path does not match; query parameters play no
    /// part in the outcome.
    pub fn path_values(&self, url: &Url) -> Option<Params> {
        self.match_path(url.path())
    }

    // The workhorse behind `path_values`. `Host` calls it with the request
    // path already made relative to its base URL.
    pub(crate) fn match_path(&self, path: &str) -> Option<Params> {
        let mut params = Params::new();
        let mut actual = raw_segments(path);
        for segment in &self.segments {
            let raw = actual.next()?;
            let value = decode_path_component(raw)?;
            match segment {
                Segment::Literal(expected) => {
                    if &value != expected {
                        return None;
                    }
                }
                Segment::Token(name) => {
                    if value.is_empty() {
                        return None;
                    }
                    params.insert(name.clone(), value);
                }
            }
        }
        if actual.next().is_some() {
            return None;
        }
        Some(params)
    }

    /// Match the query of `url` against the template's query patterns,
    /// capturing token values.
    ///
    /// Returns `None` when a fixed pair is missing or disagrees. Token
    /// captures are lenient: an absent parameter simply captures nothing.
    pub fn query_values(&self, url: &Url) -> Option<Params> {
        let actual = query_params(url);
        let mut params = Params::new();
        for (name, pattern) in &self.query {
            match pattern {
                QueryPattern::Literal(expected) => {
                    if actual.get(name) != Some(expected.as_str()) {
                        return None;
                    }
                }
                QueryPattern::Token(token) => {
                    if let Some(value) = actual.get(name) {
                        params.insert(token.clone(), value);
                    }
                }
            }
        }
        Some(params)
    }

    /// The normalized template string this was parsed from.
    pub fn source(&self) -> &str {
        &self.source
    }
}

impl fmt::Display for UrlTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.source)
    }
}

/// Flatten the query string of `url` into a [`Params`] map.
///
/// Names and values are percent-decoded. When the same parameter occurs more
/// than once, the last occurrence wins; a responder that cares about every
/// occurrence can walk `request.url.query_pairs()` itself.
///
/// ### Example
/// ```rust
/// use imposter::query_params;
/// use url::Url;
///
/// let url = Url::parse("https://api.example.com/stops?sort=name&page=2&sort=distance").unwrap();
/// let params = query_params(&url);
///
/// assert_eq!(params.get("page"), Some("2"));
/// assert_eq!(params.get("sort"), Some("distance"));
/// ```
pub fn query_params(url: &Url) -> Params {
    url.query_pairs()
        .map(|(name, value)| (name.into_owned(), value.into_owned()))
        .collect()
}

fn raw_segments(path: &str) -> std::str::Split<'_, char> {
    path.strip_prefix('/').unwrap_or(path).split('/')
}

fn decode_path_component(raw: &str) -> Option<String> {
    percent_decode_str(raw)
        .decode_utf8()
        .ok()
        .map(|decoded| decoded.into_owned())
}

// `+` means a space in query strings, but not in paths.
fn decode_query_component(raw: &str) -> Option<String> {
    decode_path_component(&raw.replace('+', " "))
}

fn parse_token(raw: &str, source: &str, seen: &mut HashSet<String>) -> String {
    let name = &raw[1..];
    if !TOKEN_NAME.is_match(name) {
        panic!(
            "Failed to parse route template `{}`: `{}` is not a valid token. A token is `:` followed by a name made of letters, digits, `_` or `-`, e.g. `:user_id`.",
            source, raw
        );
    }
    if !seen.insert(name.to_string()) {
        panic!(
            "Failed to parse route template `{}`: the token name `{}` is used more than once.",
            source, name
        );
    }
    name.to_string()
}

fn invalid_encoding(source: &str, raw: &str) -> ! {
    panic!(
        "Failed to parse route template `{}`: `{}` is not valid percent-encoded UTF-8.",
        source, raw
    );
}
