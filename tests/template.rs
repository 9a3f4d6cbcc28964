use imposter::{query_params, Params, UrlTemplate};
use url::Url;

fn url(raw: &str) -> Url {
    Url::parse(raw).unwrap()
}

#[test]
fn tokens_capture_named_path_segments() {
    // Arrange
    let template = UrlTemplate::parse("/agencies/:agency_id/stops/:stop_id");

    // Act
    let params = template
        .path_values(&url("https://api.example.com/agencies/77/stops/1423"))
        .unwrap();

    // Assert
    let expected: Params = [("agency_id", "77"), ("stop_id", "1423")]
        .into_iter()
        .collect();
    assert_eq!(params, expected);
}

#[test]
fn literal_segments_must_be_equal() {
    // Arrange
    let template = UrlTemplate::parse("/agencies/:agency_id/stops");

    // Act
    let params = template.path_values(&url("https://api.example.com/agencies/77/routes"));

    // Assert
    assert!(params.is_none());
}

#[test]
fn paths_with_a_different_segment_count_do_not_match() {
    // Arrange
    let template = UrlTemplate::parse("/users/:id");

    // Act
    let shorter = template.path_values(&url("https://api.example.com/users"));
    let longer = template.path_values(&url("https://api.example.com/users/42/widgets"));

    // Assert
    assert!(shorter.is_none());
    assert!(longer.is_none());
}

#[test]
fn trailing_slashes_are_significant() {
    // Arrange
    let template = UrlTemplate::parse("/users/:id");

    // Act
    let params = template.path_values(&url("https://api.example.com/users/42/"));

    // Assert
    assert!(params.is_none());
}

#[test]
fn a_token_never_matches_an_empty_segment() {
    // Arrange
    let template = UrlTemplate::parse("/users/:id/widgets");

    // Act
    let params = template.path_values(&url("https://api.example.com/users//widgets"));

    // Assert
    assert!(params.is_none());
}

#[test]
fn the_leading_slash_is_optional_in_templates() {
    // Arrange
    let template = UrlTemplate::parse("users/:id");

    // Act
    let params = template
        .path_values(&url("https://api.example.com/users/42"))
        .unwrap();

    // Assert
    assert_eq!(template.source(), "/users/:id");
    assert_eq!(&params["id"], "42");
}

#[test]
fn the_root_template_matches_the_root_path() {
    // Arrange
    let template = UrlTemplate::parse("/");

    // Act
    let explicit = template.path_values(&url("https://api.example.com/"));
    let implicit = template.path_values(&url("https://api.example.com"));
    let non_root = template.path_values(&url("https://api.example.com/users"));

    // Assert
    assert_eq!(explicit, Some(Params::default()));
    assert_eq!(implicit, Some(Params::default()));
    assert!(non_root.is_none());
}

#[test]
fn paths_compare_percent_decoded() {
    // Arrange
    let template = UrlTemplate::parse("/tags/rock & roll");

    // Act
    let params = template.path_values(&url("https://api.example.com/tags/rock%20%26%20roll"));

    // Assert
    assert!(params.is_some());
}

#[test]
fn captured_path_values_are_percent_decoded() {
    // Arrange
    let template = UrlTemplate::parse("/tags/:tag");

    // Act
    let params = template
        .path_values(&url("https://api.example.com/tags/rock%20%26%20roll"))
        .unwrap();

    // Assert
    assert_eq!(&params["tag"], "rock & roll");
}

#[test]
fn path_matching_ignores_the_query_string() {
    // Arrange
    let template = UrlTemplate::parse("/users/:id");

    // Act
    let params = template
        .path_values(&url("https://api.example.com/users/42?page=2"))
        .unwrap();

    // Assert
    assert_eq!(&params["id"], "42");
}

#[test]
fn query_tokens_capture_parameter_values() {
    // Arrange
    let template = UrlTemplate::parse("/stops?sort=:sort");

    // Act
    let params = template
        .query_values(&url("https://api.example.com/stops?sort=name"))
        .unwrap();

    // Assert
    assert_eq!(&params["sort"], "name");
}

#[test]
fn query_captures_do_not_depend_on_parameter_order() {
    // Arrange
    let template = UrlTemplate::parse("/stops?sort=:sort&filter=:filter");

    // Act
    let params = template
        .query_values(&url("https://api.example.com/stops?filter=active&sort=name"))
        .unwrap();

    // Assert
    assert_eq!(&params["sort"], "name");
    assert_eq!(&params["filter"], "active");
}

#[test]
fn an_absent_query_parameter_is_not_a_mismatch() {
    // Arrange
    let template = UrlTemplate::parse("/stops?sort=:sort");

    // Act
    let params = template
        .query_values(&url("https://api.example.com/stops"))
        .unwrap();

    // Assert
    assert!(params.is_empty());
}

#[test]
fn fixed_query_pairs_must_be_present_with_an_equal_value() {
    // Arrange
    let template = UrlTemplate::parse("/stops?page=2");

    // Act
    let equal = template.query_values(&url("https://api.example.com/stops?page=2"));
    let different = template.query_values(&url("https://api.example.com/stops?page=3"));
    let absent = template.query_values(&url("https://api.example.com/stops"));

    // Assert
    assert!(equal.is_some());
    assert!(different.is_none());
    assert!(absent.is_none());
}

#[test]
fn unlisted_query_parameters_are_ignored() {
    // Arrange
    let template = UrlTemplate::parse("/stops?page=2");

    // Act
    let params = template.query_values(&url("https://api.example.com/stops?page=2&noise=1"));

    // Assert
    assert!(params.is_some());
}

#[test]
fn queries_compare_form_decoded() {
    // Arrange
    // `+` means a space in a query string.
    let template = UrlTemplate::parse("/search?q=rock+roll");

    // Act
    let params = template.query_values(&url("https://api.example.com/search?q=rock%20roll"));

    // Assert
    assert!(params.is_some());
}

#[test]
fn query_params_flattens_the_query_string() {
    // Act
    let params = query_params(&url("https://api.example.com/stops?sort=name&page=2"));

    // Assert
    let expected: Params = [("page", "2"), ("sort", "name")].into_iter().collect();
    assert_eq!(params, expected);
}

#[test]
fn query_params_keeps_the_last_occurrence_of_a_repeated_parameter() {
    // Act
    let params = query_params(&url("https://api.example.com/stops?sort=name&sort=distance"));

    // Assert
    assert_eq!(params.get("sort"), Some("distance"));
    assert_eq!(params.len(), 1);
}

#[test]
fn query_params_percent_decodes_names_and_values() {
    // Act
    let params = query_params(&url("https://api.example.com/search?q=a%2Bb&with+space=yes"));

    // Assert
    assert_eq!(params.get("q"), Some("a+b"));
    assert_eq!(params.get("with space"), Some("yes"));
}

#[test]
fn query_params_is_empty_without_a_query_string() {
    // Act
    let params = query_params(&url("https://api.example.com/stops"));

    // Assert
    assert!(params.is_empty());
}

#[test]
#[should_panic(expected = "it includes the host")]
fn templates_embedding_a_host_are_rejected() {
    UrlTemplate::parse("https://api.example.com/users/:id");
}

#[test]
#[should_panic(expected = "is not a valid token")]
fn empty_token_names_are_rejected() {
    UrlTemplate::parse("/users/:");
}

#[test]
#[should_panic(expected = "is not a valid token")]
fn token_names_with_invalid_characters_are_rejected() {
    UrlTemplate::parse("/users/:user id");
}

#[test]
#[should_panic(expected = "is used more than once")]
fn duplicate_token_names_are_rejected() {
    UrlTemplate::parse("/agencies/:id/stops/:id");
}

#[test]
#[should_panic(expected = "is used more than once")]
fn token_names_are_unique_across_path_and_query() {
    UrlTemplate::parse("/users/:id?device=:id");
}

#[test]
#[should_panic(expected = "tokens are not supported in query parameter names")]
fn tokens_in_query_parameter_names_are_rejected() {
    UrlTemplate::parse("/search?:q=1");
}

#[test]
#[should_panic(expected = "appears more than once")]
fn duplicate_query_parameters_are_rejected() {
    UrlTemplate::parse("/stops?page=1&page=2");
}

#[test]
#[should_panic(expected = "is not valid percent-encoded UTF-8")]
fn literals_with_invalid_percent_encoding_are_rejected() {
    UrlTemplate::parse("/users/%FF");
}
