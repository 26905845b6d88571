//! # HTTP Routes
//!
//! ```text
//! public                      protected (Access Gate)
//! ──────                      ───────────────────────
//! POST /users/register        GET  /users/all
//! POST /users/login           GET  /users/{id}
//! GET  /health                PUT  /users/update
//!                             /categories/...
//!                             /products/...
//! ```

pub mod categories;
pub mod products;
pub mod users;

use axum::extract::State;
use axum::http::StatusCode;
use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use tracing::warn;

use crate::auth::require_basic_auth;
use crate::AppState;

/// Routes reachable without credentials.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/users/register", post(users::register))
        .route("/users/login", post(users::login))
        .route("/health", get(health_handler))
}

/// Routes behind the Access Gate.
pub fn protected_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .merge(users::routes())
        .merge(categories::routes())
        .merge(products::routes())
        .route_layer(middleware::from_fn_with_state(state, require_basic_auth))
}

/// `OK` while the database answers, 503 otherwise.
async fn health_handler(State(state): State<AppState>) -> (StatusCode, &'static str) {
    if state.db.health_check().await {
        (StatusCode::OK, "OK")
    } else {
        warn!("Health check failed: database unreachable");
        (StatusCode::SERVICE_UNAVAILABLE, "UNAVAILABLE")
    }
}

// =============================================================================
// HTTP Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request, StatusCode};
    use axum::Router;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::auth::basic_token;
    use crate::config::ApiConfig;
    use crate::{build_router, AppState};
    use farmacia_core::CredentialHasher;
    use farmacia_db::{Database, DbConfig};

    async fn app() -> (Router, Database) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let state = AppState::new(
            db.clone(),
            ApiConfig::default(),
            CredentialHasher::with_cost(1024, 1).unwrap(),
        );
        (build_router(state), db)
    }

    async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        auth: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = auth {
            builder = builder.header(header::AUTHORIZATION, token);
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    fn antonio() -> Value {
        json!({
            "name": "Antonio Bandeira",
            "login": "a@x.com",
            "password": "123456789"
        })
    }

    /// Registers Antonio and returns his token.
    async fn register_antonio(app: &Router) -> String {
        let (status, _) = send(app, Method::POST, "/users/register", None, Some(antonio())).await;
        assert_eq!(status, StatusCode::CREATED);
        basic_token("a@x.com", "123456789")
    }

    fn product_body(category_id: i64, expiration: &str) -> Value {
        json!({
            "name": "Dipirona 500mg",
            "price_cents": 899,
            "brand": "Medley",
            "manufacturer": "Sanofi",
            "expiration_date": expiration,
            "quantity": 12,
            "prescription_required": false,
            "category_id": category_id
        })
    }

    #[tokio::test]
    async fn test_health_is_public() {
        let (app, _db) = app().await;
        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"OK");
    }

    #[tokio::test]
    async fn test_health_reports_database_down() {
        let (app, db) = app().await;
        db.close().await;

        let (status, _) = send(&app, Method::GET, "/health", None, None).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_register_and_duplicate() {
        let (app, _db) = app().await;

        let (status, body) =
            send(&app, Method::POST, "/users/register", None, Some(antonio())).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["login"], "a@x.com");
        assert!(body.get("password").is_none());
        assert!(body.get("password_hash").is_none());

        let (status, body) =
            send(&app, Method::POST, "/users/register", None, Some(antonio())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert_eq!(body["fields"][0]["field"], "login");
    }

    #[tokio::test]
    async fn test_register_validation_and_malformed_json() {
        let (app, _db) = app().await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/users/register",
            None,
            Some(json!({"name": "Al", "login": "nope", "password": "short"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["fields"].as_array().unwrap().len(), 3);

        let request = Request::post("/users/register")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_login() {
        let (app, _db) = app().await;
        register_antonio(&app).await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/users/login",
            None,
            Some(json!({"login": "a@x.com", "password": "123456789"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["token"], basic_token("a@x.com", "123456789"));
        assert_eq!(body["name"], "Antonio Bandeira");

        let (status, body) = send(
            &app,
            Method::POST,
            "/users/login",
            None,
            Some(json!({"login": "a@x.com", "password": "wrong"})),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], "UNAUTHORIZED");
    }

    #[tokio::test]
    async fn test_login_token_admitted_by_gate() {
        let (app, _db) = app().await;

        let mut colon = antonio();
        colon["login"] = json!("a:b@x.com");
        let (status, body) =
            send(&app, Method::POST, "/users/register", None, Some(colon)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["fields"][0]["field"], "login");

        register_antonio(&app).await;
        let (status, session) = send(
            &app,
            Method::POST,
            "/users/login",
            None,
            Some(json!({"login": "a@x.com", "password": "123456789"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let token = session["token"].as_str().unwrap();
        let (status, _) = send(&app, Method::GET, "/users/all", Some(token), None).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_protected_routes_require_credentials() {
        let (app, _db) = app().await;
        register_antonio(&app).await;

        for uri in ["/users/all", "/users/1", "/categories", "/products"] {
            let response = app
                .clone()
                .oneshot(Request::get(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{uri}");
            assert_eq!(
                response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
                r#"Basic realm="farmacia""#
            );
        }

        let bad = basic_token("a@x.com", "wrong-password");
        let (status, _) = send(&app, Method::GET, "/users/all", Some(&bad), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_user_endpoints() {
        let (app, _db) = app().await;
        let token = register_antonio(&app).await;

        let (status, body) = send(&app, Method::GET, "/users/all", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 1);
        let id = body[0]["id"].as_i64().unwrap();

        let (status, body) =
            send(&app, Method::GET, &format!("/users/{id}"), Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["login"], "a@x.com");

        let (status, body) = send(&app, Method::GET, "/users/999", Some(&token), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "NOT_FOUND");

        let (status, _) = send(&app, Method::GET, "/users/abc", Some(&token), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = send(
            &app,
            Method::PUT,
            "/users/update",
            Some(&token),
            Some(json!({"id": id, "name": "Antonio B.", "login": "a@x.com"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "Antonio B.");

        // password untouched, old token still admitted
        let (status, _) = send(&app, Method::GET, "/users/all", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_catalog_flow() {
        let (app, _db) = app().await;
        let token = register_antonio(&app).await;

        let (status, category) = send(
            &app,
            Method::POST,
            "/categories",
            Some(&token),
            Some(json!({"name": "Analgésicos", "description": "Alívio de dores"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let category_id = category["id"].as_i64().unwrap();

        let (status, product) = send(
            &app,
            Method::POST,
            "/products",
            Some(&token),
            Some(product_body(category_id, "2099-12-31")),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let product_id = product["id"].as_i64().unwrap();

        let (status, found) =
            send(&app, Method::GET, "/products/name/dipi", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(found.as_array().unwrap().len(), 1);

        let mut changes = product_body(category_id, "2099-12-31");
        changes["id"] = json!(product_id);
        changes["quantity"] = json!(3);
        let (status, updated) =
            send(&app, Method::PUT, "/products", Some(&token), Some(changes)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["quantity"], 3);
        assert_eq!(updated["owner_id"], product["owner_id"]);

        let (status, _) = send(
            &app,
            Method::DELETE,
            &format!("/categories/{category_id}"),
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = send(
            &app,
            Method::GET,
            &format!("/products/{product_id}"),
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_product_rejections() {
        let (app, _db) = app().await;
        let token = register_antonio(&app).await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/products",
            Some(&token),
            Some(product_body(404, "2099-12-31")),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["fields"][0]["field"], "category_id");

        let (_, category) = send(
            &app,
            Method::POST,
            "/categories",
            Some(&token),
            Some(json!({"name": "Vitaminas"})),
        )
        .await;
        let category_id = category["id"].as_i64().unwrap();

        let (status, body) = send(
            &app,
            Method::POST,
            "/products",
            Some(&token),
            Some(product_body(category_id, "2000-01-01")),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["fields"][0]["field"], "expiration_date");
    }
}
