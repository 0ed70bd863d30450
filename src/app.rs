use std::net::SocketAddr;
use axum::{Router, routing::get};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use crate::auth;
use crate::state::AppState;

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1",
              Router::new()
                  .merge(auth::router())
                  .route("/health", get(|| async { "ok" }))
        )
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    let method = req.method().clone();
                    let uri = req.uri().clone();
                    tracing::info_span!("http_request", %method, uri = %uri, status = tracing::field::Empty)
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &tracing::Span| {
                        let status = res.status();
                        span.record("status", tracing::field::display(status));
                        let latency_ms = latency.as_millis() as u64;
                        if status.is_server_error() {
                            tracing::error!(%status, latency_ms, "response");
                        } else {
                            tracing::info!(%status, latency_ms, "response");
                        }
                    },
                ),
        )
}

pub async fn serve(app: Router) -> anyhow::Result<()> {
    let addr: SocketAddr = format!(
        "{}:{}",
        std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
        std::env::var("APP_PORT").unwrap_or_else(|_| "8080".into())
    )
        .parse()?;

    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::fake;
    use serde_json::{json, Value};

    /// Spin up the HTTP server on an OS-assigned port, returning the base URL.
    async fn spawn_test_server(state: AppState) -> String {
        let app = build_app(state);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://127.0.0.1:{}", port)
    }

    #[tokio::test]
    async fn health_returns_ok() {
        let app = fake::app();
        let base = spawn_test_server(app.state).await;
        let resp = reqwest::get(format!("{}/api/v1/health", base)).await.unwrap();
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.text().await.unwrap(), "ok");
    }

    #[tokio::test]
    async fn register_over_http_returns_success_body() {
        let app = fake::app();
        let base = spawn_test_server(app.state.clone()).await;
        let resp = reqwest::Client::new()
            .post(format!("{}/api/v1/users/register", base))
            .json(&json!({ "email": "a@x.com", "password": "secret123" }))
            .send()
            .await
            .unwrap();

        assert_eq!(resp.status(), 200);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["status"], 200);
        assert_eq!(body["message"], "Successfully registered user.");
        assert_eq!(app.users.len(), 1);
    }

    #[tokio::test]
    async fn activate_over_http_reports_error_triple() {
        let app = fake::app();
        let base = spawn_test_server(app.state).await;
        let resp = reqwest::Client::new()
            .post(format!("{}/api/v1/users/activate", base))
            .json(&json!({ "email": "a@x.com", "activationCode": "garbage" }))
            .send()
            .await
            .unwrap();

        assert_eq!(resp.status(), 400);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["status"], 400);
        assert_eq!(body["kind"], "BAD_REQUEST");
        assert_eq!(body["message"], "Activation code is invalid");
    }

    #[tokio::test]
    async fn incomplete_bodies_report_validation_error_triple() {
        let app = fake::app();
        let base = spawn_test_server(app.state).await;
        let client = reqwest::Client::new();

        for (route, missing) in [("register", "password"), ("activate", "activationCode")] {
            let resp = client
                .post(format!("{}/api/v1/users/{}", base, route))
                .json(&json!({ "email": "a@x.com" }))
                .send()
                .await
                .unwrap();

            assert_eq!(resp.status(), 400, "{}", route);
            let body: Value = resp.json().await.unwrap();
            assert_eq!(body["status"], 400);
            assert_eq!(body["kind"], "VALIDATION_ERROR");
            assert!(body["message"].as_str().unwrap().contains(missing), "{}", body);
        }
        assert_eq!(app.users.len(), 0);
    }

    #[tokio::test]
    async fn malformed_json_and_wrong_content_type_are_validation_errors() {
        let app = fake::app();
        let base = spawn_test_server(app.state).await;
        let client = reqwest::Client::new();

        let resp = client
            .post(format!("{}/api/v1/users/register", base))
            .header("content-type", "application/json")
            .body("{not json")
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 400);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["kind"], "VALIDATION_ERROR");

        let resp = client
            .post(format!("{}/api/v1/users/activate", base))
            .body(r#"{"email":"a@x.com","activationCode":"x"}"#)
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 400);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["kind"], "VALIDATION_ERROR");
    }
}
