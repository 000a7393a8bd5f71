use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, Echo, Session};
use tower::ServiceExt;

const TOKEN: &str = "Bearer test-token";

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn authed(method: &str, uri: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::AUTHORIZATION, TOKEN)
        .body(String::new())
        .unwrap()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .header(http::header::AUTHORIZATION, TOKEN)
        .body(body.to_string())
        .unwrap()
}

// --- echo ---

#[tokio::test]
async fn echo_reflects_query_and_headers() {
    let resp = app()
        .oneshot(
            Request::builder()
                .uri("/api/v1/echo?active=true&tags%5B%5D=a&tags%5B%5D=b")
                .header("X-Client", "web")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let echo: Echo = body_json(resp).await;
    assert_eq!(echo.method, "GET");
    assert_eq!(echo.path, "/api/v1/echo");
    assert_eq!(
        echo.query,
        vec![
            ("active".to_string(), "true".to_string()),
            ("tags[]".to_string(), "a".to_string()),
            ("tags[]".to_string(), "b".to_string()),
        ]
    );
    assert_eq!(echo.headers.get("x-client").map(String::as_str), Some("web"));
    assert!(echo.body.is_null());
}

#[tokio::test]
async fn echo_parses_json_body() {
    let resp = app()
        .oneshot(json_request("PATCH", "/api/v1/echo", r#"{"user_name":"alice"}"#))
        .await
        .unwrap();

    let echo: Echo = body_json(resp).await;
    assert_eq!(echo.method, "PATCH");
    assert_eq!(echo.body["user_name"], "alice");
}

#[tokio::test]
async fn routes_outside_prefix_are_not_found() {
    let resp = app().oneshot(authed("GET", "/sessions")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- auth ---

#[tokio::test]
async fn list_sessions_without_token_is_401() {
    let resp = app()
        .oneshot(
            Request::builder()
                .uri("/api/v1/sessions")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn create_session_without_token_is_401() {
    let resp = app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/sessions")
                .header(http::header::CONTENT_TYPE, "application/json")
                .body(r#"{"name":"x"}"#.to_string())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

// --- sessions ---

#[tokio::test]
async fn create_session_returns_201() {
    let resp = app()
        .oneshot(json_request("POST", "/api/v1/sessions", r#"{"name":"standup"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    let session: Session = body_json(resp).await;
    assert_eq!(session.name, "standup");
    assert_eq!(session.max_users, 8);
    assert!(session.active);
}

#[tokio::test]
async fn create_session_malformed_json_returns_422() {
    let resp = app()
        .oneshot(json_request("POST", "/api/v1/sessions", r#"{"title":1}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn get_session_not_found() {
    let resp = app()
        .oneshot(authed(
            "GET",
            "/api/v1/sessions/00000000-0000-0000-0000-000000000000",
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_session_not_found() {
    let resp = app()
        .oneshot(authed(
            "DELETE",
            "/api/v1/sessions/00000000-0000-0000-0000-000000000000",
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- full lifecycle ---

#[tokio::test]
async fn session_lifecycle() {
    use tower::Service;

    let mut app = app().into_service();

    // create two sessions, one inactive
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request("POST", "/api/v1/sessions", r#"{"name":"alpha"}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let alpha: Session = body_json(resp).await;

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "POST",
            "/api/v1/sessions",
            r#"{"name":"beta","active":false,"max_users":2}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let beta: Session = body_json(resp).await;
    assert_eq!(beta.max_users, 2);

    // filter by active
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(authed("GET", "/api/v1/sessions?active=true"))
        .await
        .unwrap();
    let active: Vec<Session> = body_json(resp).await;
    assert_eq!(active, vec![alpha.clone()]);

    // unfiltered list is sorted by name
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(authed("GET", "/api/v1/sessions"))
        .await
        .unwrap();
    let all: Vec<Session> = body_json(resp).await;
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].name, "alpha");
    assert_eq!(all[1].name, "beta");

    // patch only active
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "PATCH",
            &format!("/api/v1/sessions/{}", beta.id),
            r#"{"active":true}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Session = body_json(resp).await;
    assert!(updated.active);
    assert_eq!(updated.name, "beta");

    // put a new name
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "PUT",
            &format!("/api/v1/sessions/{}", beta.id),
            r#"{"name":"gamma"}"#,
        ))
        .await
        .unwrap();
    let updated: Session = body_json(resp).await;
    assert_eq!(updated.name, "gamma");
    assert!(updated.active);

    // delete
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(authed("DELETE", &format!("/api/v1/sessions/{}", alpha.id)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert!(body_bytes(resp).await.is_empty());

    // get after delete
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(authed("GET", &format!("/api/v1/sessions/{}", alpha.id)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
