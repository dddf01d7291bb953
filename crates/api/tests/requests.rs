use nest_api::{
    params::{FORM_CONTENT_TYPE, JSON_CONTENT_TYPE},
    request::DEFAULT_USER_AGENT,
    AccessToken, Error, FormValues, Params, RequestBuilder, SessionError, StaticSession,
    StoredSession,
};
use reqwest::{header::CONTENT_TYPE, Method, Request};
use serde::{Deserialize, Serialize};
use serde_json::json;

const AUTH_HEADERS: [&str; 4] = [
    "x-nl-user-id",
    "x-nl-protocol-version",
    "authorization",
    "accept-language",
];

fn logged_in() -> RequestBuilder<StaticSession> {
    RequestBuilder::new(StaticSession::new(StoredSession {
        transport_url: "https://prod.example".to_string(),
        user_id: "u1".to_string(),
        access_token: AccessToken::new("tok"),
        expires_in: None,
    }))
}

fn logged_out() -> RequestBuilder<StaticSession> {
    RequestBuilder::new(StaticSession::logged_out())
}

fn body(request: &Request) -> &[u8] {
    request.body().and_then(|b| b.as_bytes()).unwrap()
}

fn assert_authenticated(request: &Request) {
    let headers = request.headers();
    assert_eq!(headers["x-nl-user-id"], "u1");
    assert_eq!(headers["x-nl-protocol-version"], "1");
    assert_eq!(headers["authorization"], "Basic tok");
    assert_eq!(headers["accept-language"], "en");
    assert_eq!(headers["user-agent"], DEFAULT_USER_AGENT);
}

fn assert_anonymous(request: &Request) {
    for name in AUTH_HEADERS {
        assert!(!request.headers().contains_key(name), "{name} is present");
    }
    assert_eq!(request.headers()["user-agent"], DEFAULT_USER_AGENT);
}

#[test]
fn authenticated_get_uses_transport_url_and_credentials() {
    let request = logged_in()
        .build_get("", "/v2/user", &FormValues::new(), true)
        .unwrap();
    assert_eq!(request.method(), &Method::GET);
    assert_eq!(request.url().as_str(), "https://prod.example/v2/user");
    assert!(request.body().is_none());
    assert_authenticated(&request);
}

#[test]
fn authenticated_request_keeps_explicit_host() {
    let request = logged_in()
        .build_get("https://other.example", "/v2/user", &FormValues::new(), true)
        .unwrap();
    assert_eq!(request.url().as_str(), "https://other.example/v2/user");
    assert_authenticated(&request);
}

#[test]
fn anonymous_login_post_is_form_encoded() {
    let params: FormValues = [("username", "a"), ("password", "b")].into_iter().collect();
    let request = logged_out()
        .build_post(
            "https://home.example",
            "/user/login",
            &Params::<()>::Form(params),
            false,
        )
        .unwrap();
    assert_eq!(request.method(), &Method::POST);
    assert_eq!(request.url().as_str(), "https://home.example/user/login");
    assert_eq!(body(&request), b"password=b&username=a");
    assert_eq!(request.headers()[CONTENT_TYPE], FORM_CONTENT_TYPE);
    assert_anonymous(&request);
}

#[test]
fn form_body_decodes_to_original_values() {
    let mut params = FormValues::new();
    params
        .add("name", "Living room")
        .add("tags", "a&b")
        .add("tags", "c=d")
        .add("ünïcödé", "✓");
    let request = logged_in()
        .build_post("", "/v2/put", &Params::<()>::Form(params.clone()), true)
        .unwrap();
    assert_eq!(FormValues::parse(body(&request)), params);
    assert_eq!(request.headers()[CONTENT_TYPE], FORM_CONTENT_TYPE);
    assert_authenticated(&request);
}

#[derive(Debug, Deserialize, PartialEq, Serialize)]
struct TargetTemperature {
    target_temperature: f64,
    target_change_pending: bool,
}

#[test]
fn structured_body_decodes_to_original_value() {
    let value = TargetTemperature {
        target_temperature: 21.5,
        target_change_pending: true,
    };
    let request = logged_in()
        .build_post("", "/v2/put/shared.1234", &Params::Json(&value), true)
        .unwrap();
    assert_eq!(
        serde_json::from_slice::<TargetTemperature>(body(&request)).unwrap(),
        value
    );
    assert_eq!(request.headers()[CONTENT_TYPE], JSON_CONTENT_TYPE);
    assert_authenticated(&request);
}

#[test]
fn json_value_body_decodes_to_original_value() {
    let value = json!({"objects": [{"object_key": "structure.1", "op": "MERGE"}]});
    let request = logged_in()
        .build_post("", "/v5/put", &Params::Json(value.clone()), true)
        .unwrap();
    assert_eq!(
        serde_json::from_slice::<serde_json::Value>(body(&request)).unwrap(),
        value
    );
}

#[test]
fn post_without_params_has_neither_body_nor_content_type() {
    let request = logged_in()
        .build_post("", "/v2/ping", &Params::<()>::None, true)
        .unwrap();
    assert!(request.body().is_none());
    assert!(!request.headers().contains_key(CONTENT_TYPE));
    assert_authenticated(&request);
}

#[test]
fn get_appends_encoded_query() {
    let params: FormValues = [("since", "2024-01-01"), ("kind", "a b")]
        .into_iter()
        .collect();
    let request = logged_out()
        .build_get("https://home.example", "/v2/events", &params, false)
        .unwrap();
    assert!(request
        .url()
        .as_str()
        .ends_with(&format!("/v2/events?{}", params.encode())));
    assert_eq!(request.url().query(), Some("kind=a+b&since=2024-01-01"));
    assert_anonymous(&request);
}

#[test]
fn get_with_empty_query_keeps_path() {
    let request = logged_out()
        .build_get("https://home.example", "/v2/events", &FormValues::new(), false)
        .unwrap();
    assert_eq!(request.url().as_str(), "https://home.example/v2/events");
    assert_eq!(request.url().query(), None);
}

#[test]
fn authenticated_builds_fail_without_session() {
    let builder = logged_out();
    assert!(matches!(
        builder.build_get("", "/v2/user", &FormValues::new(), true),
        Err(Error::Session(SessionError::LoggedOut))
    ));
    assert!(matches!(
        builder.build_post("https://home.example", "/v2/put", &Params::Json(json!({})), true),
        Err(Error::Session(SessionError::LoggedOut))
    ));
    assert!(matches!(
        builder.build_request(Method::DELETE, "https://home.example", "/x", None, true),
        Err(Error::Session(SessionError::LoggedOut))
    ));
}

#[test]
fn authenticate_fails_without_session() {
    let mut request = logged_out()
        .build_get("https://home.example", "/", &FormValues::new(), false)
        .unwrap();
    assert!(matches!(
        logged_out().authenticate(&mut request),
        Err(Error::Session(SessionError::LoggedOut))
    ));
    assert_anonymous(&request);
}

#[test]
fn authenticate_adds_headers_to_existing_request() {
    let builder = logged_in();
    let mut request = builder
        .build_get("https://home.example", "/", &FormValues::new(), false)
        .unwrap();
    builder.authenticate(&mut request).unwrap();
    assert_authenticated(&request);
}

#[test]
fn malformed_host_is_rejected() {
    assert!(matches!(
        logged_out().build_get("not a url", "/v2/user", &FormValues::new(), false),
        Err(Error::InvalidUrl { .. })
    ));
}

#[test]
fn path_is_appended_to_host_verbatim() {
    let builder = logged_in();
    let request = builder
        .build_get("https://prod.example/base", "/v2/user", &FormValues::new(), true)
        .unwrap();
    assert_eq!(request.url().as_str(), "https://prod.example/base/v2/user");

    let request = builder
        .build_get("https://prod.example/base", "v2", &FormValues::new(), true)
        .unwrap();
    assert_eq!(request.url().as_str(), "https://prod.example/basev2");
}

#[test]
fn path_with_dot_segments_is_rejected_instead_of_resolved() {
    let builder = logged_in();
    for path in ["/v2/../user", "/v2/./user", "/v2/%2e%2e/user"] {
        assert!(
            matches!(
                builder.build_get("", path, &FormValues::new(), true),
                Err(Error::InvalidUrl { source: None, .. })
            ),
            "{path}"
        );
    }
    assert!(matches!(
        builder.build_post("", "/v2/../put", &Params::Json(json!({})), true),
        Err(Error::InvalidUrl { source: None, .. })
    ));
}

#[test]
fn dot_segments_in_query_are_kept() {
    let params: FormValues = [("next", "/a/../b")].into_iter().collect();
    let request = logged_in()
        .build_get("", "/v2/user", &params, true)
        .unwrap();
    assert_eq!(request.url().path(), "/v2/user");
    assert_eq!(request.url().query(), Some("next=%2Fa%2F..%2Fb"));
}
