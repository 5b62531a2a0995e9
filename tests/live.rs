// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! End-to-end tests over a local mock HTTP server
//!
//! The transport is blocking, so every session interaction runs inside
//! `spawn_blocking` while wiremock serves from the async side.

mod common;

use mustekala::{HttpTransport, MultipartValue, RequestOptions, Response, Result, Session};
use wiremock::matchers::{
    body_json, body_string, body_string_contains, header, method, path, query_param,
};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn blocking<F, T>(f: F) -> T
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    common::init_tracing();
    tokio::task::spawn_blocking(f).await.unwrap()
}

#[tokio::test]
async fn test_get_parses_status_headers_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/hello"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("X-Flavor", "vanilla")
                .set_body_string("hi there"),
        )
        .mount(&server)
        .await;

    let url = format!("{}/hello", server.uri());
    let resp: Result<Response> = blocking(move || {
        let mut session = Session::with_transport(HttpTransport::new()?);
        session.get(&url)
    })
    .await;
    let resp = resp.unwrap();

    assert!(resp.is_ok());
    assert_eq!(resp.status(), Some("200"));
    assert_eq!(resp.text().unwrap(), "hi there");
    assert!(resp
        .headers_map()
        .iter()
        .any(|(name, value)| name.eq_ignore_ascii_case("x-flavor") && value == "vanilla"));
}

#[tokio::test]
async fn test_redirect_chain_is_followed_and_unwrapped() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/start"))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", "/middle"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/middle"))
        .respond_with(ResponseTemplate::new(301).insert_header("Location", "/end"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/end"))
        .respond_with(ResponseTemplate::new(200).set_body_string("made it"))
        .mount(&server)
        .await;

    let url = format!("{}/start", server.uri());
    let (resp, landed) = blocking(move || -> Result<(Response, Option<String>)> {
        let mut session = Session::with_transport(HttpTransport::new()?);
        let resp = session.request(&url, RequestOptions::new().follow_redirects(true))?;
        let landed = session.last_effective_url();
        Ok((resp, landed))
    })
    .await
    .unwrap();

    assert_eq!(resp.status(), Some("200"));
    assert_eq!(resp.text().unwrap(), "made it");
    assert!(landed.unwrap().ends_with("/end"));
}

#[tokio::test]
async fn test_post_form_sends_urlencoded_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string("user=test&pass=hunter+2"))
        .respond_with(ResponseTemplate::new(200).set_body_string("welcome"))
        .mount(&server)
        .await;

    let url = format!("{}/login", server.uri());
    let resp: Result<Response> = blocking(move || {
        let mut session = Session::with_transport(HttpTransport::new()?);
        session.post(&url, &[("user", "test"), ("pass", "hunter 2")])
    })
    .await;

    assert_eq!(resp.unwrap().text().unwrap(), "welcome");
}

#[tokio::test]
async fn test_post_json_round_trip() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/items"))
        .and(header("content-type", "application/json"))
        .and(body_json(serde_json::json!({"kind": "squid", "legs": 10})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"created": true})),
        )
        .mount(&server)
        .await;

    let url = format!("{}/api/items", server.uri());
    let resp: Result<Response> = blocking(move || {
        let mut session = Session::with_transport(HttpTransport::new()?);
        session.post_json(&url, &serde_json::json!({"kind": "squid", "legs": 10}))
    })
    .await;

    let value: serde_json::Value = resp.unwrap().json().unwrap();
    assert_eq!(value["created"], true);
}

#[tokio::test]
async fn test_post_multipart_sends_text_and_file_parts() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload"))
        .and(body_string_contains("name=\"notes\""))
        .and(body_string_contains("field text"))
        .and(body_string_contains("name=\"attachment\""))
        .and(body_string_contains("file payload"))
        .respond_with(ResponseTemplate::new(200).set_body_string("uploaded"))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let file_path = dir.path().join("report.txt");
    std::fs::write(&file_path, "file payload").unwrap();

    let url = format!("{}/upload", server.uri());
    let resp: Result<Response> = blocking(move || {
        let mut session = Session::with_transport(HttpTransport::new()?);
        session.post_multipart(
            &url,
            vec![
                ("notes".to_string(), MultipartValue::Text("field text".to_string())),
                ("attachment".to_string(), MultipartValue::File(file_path)),
            ],
        )
    })
    .await;

    let resp = resp.unwrap();
    assert!(resp.is_ok());
    assert_eq!(resp.text().unwrap(), "uploaded");
}

#[tokio::test]
async fn test_get_with_query_parameters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "rust lang"))
        .respond_with(ResponseTemplate::new(200).set_body_string("results"))
        .mount(&server)
        .await;

    let url = format!("{}/search", server.uri());
    let resp: Result<Response> = blocking(move || {
        let mut session = Session::with_transport(HttpTransport::new()?);
        session.get_with_query(&url, &[("q", "rust lang")])
    })
    .await;

    assert_eq!(resp.unwrap().text().unwrap(), "results");
}

#[tokio::test]
async fn test_cookies_persist_across_requests() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/set"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Set-Cookie", "session=abc123; Path=/")
                .set_body_string("cookie set"),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/check"))
        .and(header("cookie", "session=abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_string("cookie seen"))
        .mount(&server)
        .await;

    let base = server.uri();
    let (check, cookies) = blocking(move || -> Result<(Response, Vec<mustekala::Cookie>)> {
        let mut session = Session::with_transport(HttpTransport::new()?);
        session.get(&format!("{}/set", base))?;
        let check = session.get(&format!("{}/check", base))?;
        let cookies = session.get_cookies(None, false);
        Ok((check, cookies))
    })
    .await
    .unwrap();

    assert_eq!(check.text().unwrap(), "cookie seen");
    assert_eq!(cookies.len(), 1);
    assert_eq!(cookies[0].name.as_deref(), Some("session"));
    assert_eq!(cookies[0].value.as_deref(), Some("abc123"));
}

#[tokio::test]
async fn test_relative_url_follows_previous_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/app/index.html"))
        .respond_with(ResponseTemplate::new(200).set_body_string("index"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/app/about.html"))
        .respond_with(ResponseTemplate::new(200).set_body_string("about"))
        .mount(&server)
        .await;

    let base = server.uri();
    let resp: Result<Response> = blocking(move || {
        let mut session = Session::with_transport(HttpTransport::new()?);
        session.get(&format!("{}/app/index.html", base))?;
        session.get("about.html")
    })
    .await;

    assert_eq!(resp.unwrap().text().unwrap(), "about");
}

#[tokio::test]
async fn test_connection_failure_yields_error_response() {
    // port from a server that has already shut down
    let url = {
        let server = MockServer::start().await;
        server.uri()
    };

    let resp: Result<Response> = blocking(move || {
        let mut session = Session::with_transport(HttpTransport::new()?);
        session.get(&url)
    })
    .await;
    let resp = resp.unwrap();

    assert!(resp.is_error());
    assert!(resp.error().is_some());
}
