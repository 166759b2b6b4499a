//! API routes

use crate::api::handlers::{
    create_user, delete_user, get_user, list_users, update_user, AppState,
};
use crate::auth::handlers::login;
use crate::auth::middleware::authenticate;
use crate::core::config::AuthMode;
use axum::{
    middleware,
    routing::{get, post},
    Router,
};

/// Build the API routes.
///
/// The user surface sits behind the authentication middleware. /login is
/// public and only registered in token mode; in api-key mode there is
/// nothing to log in to.
pub fn build_api_routes(state: AppState) -> Router {
    let mut public_routes = Router::new();
    if state.auth.mode == AuthMode::Token {
        public_routes = public_routes.route("/login", post(login));
    }

    let protected_routes = Router::new()
        .route("/users", get(list_users).post(create_user))
        .route(
            "/users/:id",
            get(get_user).put(update_user).delete(delete_user),
        )
        .layer(middleware::from_fn_with_state(
            state.auth.clone(),
            authenticate,
        ));

    public_routes.merge(protected_routes).with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::models::LoginResponse;
    use crate::auth::{AuthState, API_KEY_HEADER};
    use crate::store::{User, UserStore};
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use std::sync::Arc;
    use tower::util::ServiceExt; // For oneshot method

    const SECRET: &str = "test-signing-secret";

    fn test_state(mode: AuthMode) -> AppState {
        AppState {
            users: Arc::new(UserStore::new()),
            auth: Arc::new(AuthState {
                mode,
                api_key_hash: bcrypt::hash("secret123", 4).unwrap(),
                jwt_secret: SECRET.to_string(),
                token_ttl_minutes: 60,
            }),
        }
    }

    fn json_request(method: &str, uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_api_key_mode_gates_the_user_surface() {
        let app = build_api_routes(test_state(AuthMode::ApiKey));

        // Correct key passes through to the resource handler
        let ok = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/users")
                    .header(API_KEY_HEADER, "secret123")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(ok.status(), StatusCode::OK);

        // Wrong key and missing key are both rejected
        let wrong = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/users")
                    .header(API_KEY_HEADER, "wrongkey")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);

        let missing = app
            .oneshot(Request::builder().uri("/users").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_login_route_absent_in_api_key_mode() {
        let app = build_api_routes(test_state(AuthMode::ApiKey));

        let response = app
            .oneshot(json_request("POST", "/login", r#"{"api_key":"secret123"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_token_mode_full_crud_flow() {
        let app = build_api_routes(test_state(AuthMode::Token));

        // Unauthenticated requests never reach the handlers
        let denied = app
            .clone()
            .oneshot(Request::builder().uri("/users").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(denied.status(), StatusCode::UNAUTHORIZED);

        // Exchange the key for a token
        let response = app
            .clone()
            .oneshot(json_request("POST", "/login", r#"{"api_key":"secret123"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let login: LoginResponse = body_json(response).await;
        let bearer = format!("Bearer {}", login.token);

        // Create
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/users")
                    .header("Content-Type", "application/json")
                    .header("Authorization", &bearer)
                    .body(Body::from(
                        r#"{"name":"Alice","email":"a@a.com","age":25}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let created: User = body_json(response).await;
        assert_eq!(created.id, 1);

        // Read
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/users/1")
                    .header("Authorization", &bearer)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let fetched: User = body_json(response).await;
        assert_eq!(fetched.name, "Alice");

        // Update
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("PUT")
                    .uri("/users/1")
                    .header("Content-Type", "application/json")
                    .header("Authorization", &bearer)
                    .body(Body::from(r#"{"name":"Updated","age":99}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let updated: User = body_json(response).await;
        assert_eq!(updated.name, "Updated");
        assert_eq!(updated.age, 99);
        assert_eq!(updated.email, "a@a.com");

        // Delete, then verify gone
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/users/1")
                    .header("Authorization", &bearer)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/users/1")
                    .header("Authorization", &bearer)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_create_user_reports_missing_fields() {
        let app = build_api_routes(test_state(AuthMode::ApiKey));

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/users")
                    .header("Content-Type", "application/json")
                    .header(API_KEY_HEADER, "secret123")
                    .body(Body::from(r#"{"name":"Alice"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: crate::core::error::ErrorResponse = body_json(response).await;
        assert!(body.message.contains("email"));
        assert!(body.message.contains("age"));
    }

    #[tokio::test]
    async fn test_update_with_empty_body_is_bad_request() {
        let app = build_api_routes(test_state(AuthMode::ApiKey));

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/users")
                    .header("Content-Type", "application/json")
                    .header(API_KEY_HEADER, "secret123")
                    .body(Body::from(
                        r#"{"name":"Alice","email":"a@a.com","age":25}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = app
            .oneshot(
                Request::builder()
                    .method("PUT")
                    .uri("/users/1")
                    .header("Content-Type", "application/json")
                    .header(API_KEY_HEADER, "secret123")
                    .body(Body::from("{}"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
