use imposter::{Host, Interceptor, Request, ResponseTemplate, Routes};

fn ping_routes(status: u16) -> Routes {
    let mut routes = Routes::new();
    routes.get("/ping", ResponseTemplate::new(status));
    routes
}

#[test]
fn requests_to_other_authorities_are_out_of_scope() {
    // Arrange
    let interceptor = Interceptor::new();
    let host = Host::new("https://api.example.com", &interceptor);
    host.register(ping_routes(200));

    // Act + Assert - same path, different scheme, host or port.
    for out_of_scope in [
        "http://api.example.com/ping",
        "https://www.example.com/ping",
        "https://api.example.com:8443/ping",
    ] {
        let request = Request::new("GET", out_of_scope);
        assert!(!interceptor.handles(&request));
        assert!(interceptor.dispatch(&request).is_none());
    }
}

#[test]
fn default_ports_count_as_the_bare_authority() {
    // Arrange
    let interceptor = Interceptor::new();
    let host = Host::new("https://api.example.com", &interceptor);
    host.register(ping_routes(200));

    // Act
    let response = interceptor.dispatch(&Request::new("GET", "https://api.example.com:443/ping"));

    // Assert
    assert!(response.is_some());
}

#[test]
fn routes_match_relative_to_the_base_path() {
    // Arrange
    let interceptor = Interceptor::new();
    let host = Host::new("https://api.example.com/v2", &interceptor);
    let mut routes = Routes::new();
    routes.get("/stops", ResponseTemplate::new(200));
    host.register(routes);

    // Act
    let scoped = interceptor.dispatch(&Request::new("GET", "https://api.example.com/v2/stops"));
    let absolute = interceptor.dispatch(&Request::new("GET", "https://api.example.com/stops"));

    // Assert
    assert!(scoped.is_some());
    assert!(absolute.is_none());
}

#[test]
fn the_base_path_extends_on_segment_boundaries_only() {
    // Arrange
    let interceptor = Interceptor::new();
    let host = Host::new("https://api.example.com/v2", &interceptor);
    let mut routes = Routes::new();
    routes.get("/:rest", ResponseTemplate::new(200));
    host.register(routes);

    // Act
    let response = interceptor.dispatch(&Request::new("GET", "https://api.example.com/v2stops"));

    // Assert
    assert!(response.is_none());
}

#[test]
fn a_request_for_the_base_url_matches_the_root_template() {
    // Arrange
    let interceptor = Interceptor::new();
    let host = Host::new("https://api.example.com/v2", &interceptor);
    let mut routes = Routes::new();
    routes.get("/", ResponseTemplate::new(200));
    host.register(routes);

    // Act
    let response = interceptor.dispatch(&Request::new("GET", "https://api.example.com/v2"));

    // Assert
    assert!(response.is_some());
}

#[test]
fn a_trailing_slash_on_the_base_url_changes_nothing() {
    // Arrange
    let interceptor = Interceptor::new();
    let host = Host::new("https://api.example.com/v2/", &interceptor);
    let mut routes = Routes::new();
    routes.get("/stops", ResponseTemplate::new(200));
    host.register(routes);

    // Act
    let response = interceptor.dispatch(&Request::new("GET", "https://api.example.com/v2/stops"));

    // Assert
    assert!(response.is_some());
}

#[test]
fn the_base_url_is_exposed_for_client_configuration() {
    // Arrange
    let interceptor = Interceptor::new();
    let host = Host::new("https://api.example.com/v2", &interceptor);
    host.register(ping_routes(200));

    // Act - point the client under test at the virtual host.
    let request = Request::new("GET", format!("{}/ping", host.base_url()));

    // Assert
    assert_eq!(host.base_url().as_str(), "https://api.example.com/v2");
    assert!(interceptor.dispatch(&request).is_some());
}

#[test]
fn earlier_registrations_win_on_overlapping_hosts() {
    // Arrange
    let interceptor = Interceptor::new();
    let first = Host::new("https://api.example.com", &interceptor);
    let second = Host::new("https://api.example.com", &interceptor);
    first.register(ping_routes(200));
    second.register(ping_routes(500));

    // Act
    let response = interceptor
        .dispatch(&Request::new("GET", "https://api.example.com/ping"))
        .unwrap();

    // Assert
    assert_eq!(response.status().as_u16(), 200);
}

#[test]
fn a_registration_without_a_match_falls_through() {
    // Arrange
    let interceptor = Interceptor::new();
    let first = Host::new("https://api.example.com", &interceptor);
    let second = Host::new("https://api.example.com", &interceptor);
    let mut other = Routes::new();
    other.get("/other", ResponseTemplate::new(200));
    first.register(other);
    second.register(ping_routes(201));

    // Act - the first registration scopes the request but has no route for it.
    let response = interceptor
        .dispatch(&Request::new("GET", "https://api.example.com/ping"))
        .unwrap();

    // Assert
    assert_eq!(response.status().as_u16(), 201);
}

#[test]
fn registering_twice_on_one_host_appends() {
    // Arrange
    let interceptor = Interceptor::new();
    let host = Host::new("https://api.example.com", &interceptor);
    host.register(ping_routes(200));
    host.register(ping_routes(500));

    // Act
    let response = interceptor
        .dispatch(&Request::new("GET", "https://api.example.com/ping"))
        .unwrap();

    // Assert
    assert_eq!(response.status().as_u16(), 200);
}

#[test]
fn scoped_registrations_deactivate_when_the_guard_drops() {
    // Arrange
    let interceptor = Interceptor::new();
    let host = Host::new("https://api.example.com", &interceptor);
    let request = Request::new("GET", "https://api.example.com/ping");

    // Act + Assert
    {
        let _guard = host.register_as_scoped(ping_routes(200));
        assert!(interceptor.handles(&request));
    }
    assert!(!interceptor.handles(&request));
}

#[test]
fn dropping_a_guard_leaves_other_registrations_active() {
    // Arrange
    let interceptor = Interceptor::new();
    let host = Host::new("https://api.example.com", &interceptor);
    host.register(ping_routes(200));
    let request = Request::new("GET", "https://api.example.com/ping");

    // Act
    let guard = host.register_as_scoped(ping_routes(500));
    drop(guard);
    let response = interceptor.dispatch(&request).unwrap();

    // Assert
    assert_eq!(response.status().as_u16(), 200);
}

#[test]
fn scoping_controls_lifetime_not_priority() {
    // Arrange
    let interceptor = Interceptor::new();
    let host = Host::new("https://api.example.com", &interceptor);
    host.register(ping_routes(200));
    let request = Request::new("GET", "https://api.example.com/ping");

    // Act + Assert - the earlier registration still wins while the guard is
    // alive; scoping controls lifetime, not priority.
    let guard = host.register_as_scoped(ping_routes(500));
    assert_eq!(interceptor.dispatch(&request).unwrap().status().as_u16(), 200);
    drop(guard);
    assert_eq!(interceptor.dispatch(&request).unwrap().status().as_u16(), 200);
}

#[test]
fn reset_deactivates_every_registration() {
    // Arrange
    let interceptor = Interceptor::new();
    let api = Host::new("https://api.example.com", &interceptor);
    let cdn = Host::new("https://cdn.example.com", &interceptor);
    api.register(ping_routes(200));
    cdn.register(ping_routes(200));
    let guard = api.register_as_scoped(ping_routes(500));

    // Act
    interceptor.reset();

    // Assert
    assert!(!interceptor.handles(&Request::new("GET", "https://api.example.com/ping")));
    assert!(!interceptor.handles(&Request::new("GET", "https://cdn.example.com/ping")));
    // The guard's registration is gone already; dropping it is a no-op.
    drop(guard);
}

#[test]
fn interceptor_clones_share_their_registrations() {
    // Arrange
    let interceptor = Interceptor::new();
    let handle = interceptor.clone();
    let host = Host::new("https://api.example.com", &interceptor);
    host.register(ping_routes(200));

    // Act
    let response = handle.dispatch(&Request::new("GET", "https://api.example.com/ping"));

    // Assert
    assert!(response.is_some());
}

#[test]
fn handles_agrees_with_dispatch() {
    // Arrange
    let interceptor = Interceptor::new();
    let host = Host::new("https://api.example.com", &interceptor);
    host.register(ping_routes(200));

    // Act + Assert
    for raw in [
        "https://api.example.com/ping",
        "https://api.example.com/pong",
        "https://other.example.com/ping",
    ] {
        let request = Request::new("GET", raw);
        assert_eq!(
            interceptor.handles(&request),
            interceptor.dispatch(&request).is_some()
        );
    }
}

#[test]
#[should_panic(expected = "Failed to parse the base URL.")]
fn relative_base_urls_are_rejected() {
    let interceptor = Interceptor::new();
    Host::new("/just/a/path", &interceptor);
}

#[test]
#[should_panic(expected = "only http and https base URLs can be stubbed")]
fn non_http_base_urls_are_rejected() {
    let interceptor = Interceptor::new();
    Host::new("ftp://files.example.com", &interceptor);
}

#[test]
#[should_panic(expected = "cannot carry a query or a fragment")]
fn base_urls_with_a_query_are_rejected() {
    let interceptor = Interceptor::new();
    Host::new("https://api.example.com/v2?env=test", &interceptor);
}
