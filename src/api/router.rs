use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::get,
    Router,
};
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use super::health;
use super::middleware::{logging_middleware, REQUEST_ID_HEADER};
use super::state::AppState;
use super::users;
use crate::config::CorsConfig;

/// Create the full router with application state
pub fn create_router_with_state(state: AppState) -> Router {
    let request_id = header::HeaderName::from_static(REQUEST_ID_HEADER);

    Router::new()
        .route("/", get(health::root))
        // Health endpoints
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .route("/live", get(health::live_check))
        // User API
        .nest("/api/user", users::create_user_router())
        // Add state and middleware
        .with_state(state)
        .layer(middleware::from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::new(request_id.clone()))
        .layer(SetRequestIdLayer::new(request_id, MakeRequestUuid))
}

/// Create the router with the CORS policy from configuration
pub fn create_router_with_config(
    state: AppState,
    cors: &CorsConfig,
) -> anyhow::Result<Router> {
    Ok(create_router_with_state(state).layer(cors_layer(cors)?))
}

/// Single-origin CORS with credentials when an origin is configured,
/// permissive otherwise
pub fn cors_layer(config: &CorsConfig) -> anyhow::Result<CorsLayer> {
    let Some(origin) = config.allowed_origin.as_deref() else {
        return Ok(CorsLayer::permissive());
    };

    Ok(CorsLayer::new()
        .allow_origin(HeaderValue::from_str(origin)?)
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::PUT,
            Method::DELETE,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{Request, Response, StatusCode},
    };
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::util::ServiceExt;

    use super::*;
    use crate::domain::user::MockUserRepository;
    use crate::domain::DomainError;
    use crate::infrastructure::user::{Argon2Hasher, InMemoryUserRepository, UserService};

    fn test_hasher() -> Arc<Argon2Hasher> {
        Arc::new(Argon2Hasher::with_params(1024, 1, 1).unwrap())
    }

    fn test_app() -> Router {
        let repository = Arc::new(InMemoryUserRepository::new());
        let service = UserService::new(repository, test_hasher());
        create_router_with_state(AppState::new(Arc::new(service)))
    }

    fn failing_app() -> Router {
        let mut repository = MockUserRepository::new();
        repository
            .expect_count()
            .returning(|| Err(DomainError::storage("connection refused")));
        repository
            .expect_list()
            .returning(|_| Err(DomainError::storage("connection refused")));

        let service = UserService::new(Arc::new(repository), test_hasher());
        create_router_with_state(AppState::new(Arc::new(service)))
    }

    async fn make_request(
        app: &Router,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Response<Body> {
        let mut builder = Request::builder().method(method).uri(path);

        let body = match body {
            Some(value) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };

        app.clone().oneshot(builder.body(body).unwrap()).await.unwrap()
    }

    async fn read_json(response: Response<Body>) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn add_user(app: &Router, name: &str, email: &str) -> Value {
        let response = make_request(
            app,
            Method::POST,
            "/api/user/add",
            Some(json!({"name": name, "email": email, "password": "pw123"})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);

        read_json(response).await["user"].clone()
    }

    #[tokio::test]
    async fn test_root() {
        let response = make_request(&test_app(), Method::GET, "/", None).await;
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&bytes[..], b"Server is running");
    }

    #[tokio::test]
    async fn test_health_endpoints() {
        let app = test_app();

        let response = make_request(&app, Method::GET, "/health", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(read_json(response).await["status"], "healthy");

        let response = make_request(&app, Method::GET, "/live", None).await;
        assert_eq!(response.status(), StatusCode::OK);

        let response = make_request(&app, Method::GET, "/ready", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(read_json(response).await["userStore"]["status"], "healthy");
    }

    #[tokio::test]
    async fn test_ready_reports_store_failure() {
        let response = make_request(&failing_app(), Method::GET, "/ready", None).await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let body = read_json(response).await;
        assert_eq!(body["status"], "unhealthy");
        assert_eq!(body["userStore"]["message"], "user store unavailable");
    }

    #[tokio::test]
    async fn test_ready_hides_store_error_detail() {
        let mut repository = MockUserRepository::new();
        repository.expect_count().returning(|| {
            Err(DomainError::storage(
                "password authentication failed for user \"admin\" at 10.0.0.5:5432",
            ))
        });
        let service = UserService::new(Arc::new(repository), test_hasher());
        let app = create_router_with_state(AppState::new(Arc::new(service)));

        let response = make_request(&app, Method::GET, "/ready", None).await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(!body.contains("10.0.0.5"));
        assert!(!body.contains("admin"));
        assert!(!body.contains("password"));
    }

    #[tokio::test]
    async fn test_request_id_is_propagated() {
        let response = make_request(&test_app(), Method::GET, "/live", None).await;
        assert!(response.headers().contains_key(REQUEST_ID_HEADER));
    }

    #[tokio::test]
    async fn test_add_user() {
        let app = test_app();

        let response = make_request(
            &app,
            Method::POST,
            "/api/user/add",
            Some(json!({"name": "Ann", "email": "ann@x.com", "password": "pw123"})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let body = read_json(response).await;
        assert_eq!(body["message"], "User added successfully");
        assert_eq!(body["user"]["name"], "Ann");
        assert_eq!(body["user"]["email"], "ann@x.com");
        assert!(body["user"]["createdAt"].is_string());
        assert!(body["user"]["updatedAt"].is_string());
        assert!(body["user"].get("password").is_none());
        assert!(body["user"].get("passwordHash").is_none());
    }

    #[tokio::test]
    async fn test_add_user_missing_field() {
        let app = test_app();

        let response = make_request(
            &app,
            Method::POST,
            "/api/user/add",
            Some(json!({"name": "Ann", "email": "ann@x.com"})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(read_json(response).await["message"], "All fields are required");

        let response = make_request(&app, Method::GET, "/api/user/all", None).await;
        assert_eq!(read_json(response).await, json!([]));
    }

    #[tokio::test]
    async fn test_add_user_malformed_json() {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/user/add")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{\"name\": "))
            .unwrap();

        let response = test_app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(read_json(response).await["message"].is_string());
    }

    #[tokio::test]
    async fn test_list_users_search_and_sort() {
        let app = test_app();

        add_user(&app, "Ann", "a1@x.com").await;
        add_user(&app, "Bob", "hannah@x.com").await;
        add_user(&app, "Carl", "carl@x.com").await;

        let response = make_request(
            &app,
            Method::GET,
            "/api/user/all?search=ANN&sortType=name&sortOrder=desc",
            None,
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = read_json(response).await;
        let names: Vec<&str> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|u| u["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["Bob", "Ann"]);
    }

    #[tokio::test]
    async fn test_list_users_unpaired_sort() {
        let response = make_request(
            &test_app(),
            Method::GET,
            "/api/user/all?sortType=name",
            None,
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = read_json(response).await;
        assert_eq!(
            body["message"],
            "Both sortType and sortOrder are required together"
        );
        assert_eq!(body["type"], "validation_error");
    }

    #[tokio::test]
    async fn test_list_users_store_failure() {
        let response = make_request(&failing_app(), Method::GET, "/api/user/all", None).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = read_json(response).await;
        assert_eq!(body["message"], "Failed to retrieve users");
        assert!(!body.to_string().contains("connection refused"));
    }

    #[tokio::test]
    async fn test_get_unknown_user() {
        let app = test_app();

        let response = make_request(
            &app,
            Method::GET,
            "/api/user/7b1f3c9e-3f7e-4b8a-9a51-2f0d1c7e8a11",
            None,
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(read_json(response).await["message"], "User not found");

        let response = make_request(&app, Method::GET, "/api/user/not-a-uuid", None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_update_unknown_user() {
        let app = test_app();

        let response = make_request(
            &app,
            Method::PATCH,
            "/api/user/7b1f3c9e-3f7e-4b8a-9a51-2f0d1c7e8a11",
            Some(json!({"name": "Ghost"})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = make_request(&app, Method::GET, "/api/user/all", None).await;
        assert_eq!(read_json(response).await, json!([]));
    }

    #[tokio::test]
    async fn test_user_lifecycle() {
        let app = test_app();

        let created = add_user(&app, "Ann", "ann@x.com").await;
        let path = format!("/api/user/{}", created["id"].as_str().unwrap());

        let response = make_request(&app, Method::GET, &path, None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(read_json(response).await, created);

        let response =
            make_request(&app, Method::PATCH, &path, Some(json!({"name": "Annie"}))).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = read_json(response).await;
        assert_eq!(body["message"], "User updated successfully");
        assert_eq!(body["updatedUser"]["name"], "Annie");
        assert_eq!(body["updatedUser"]["email"], "ann@x.com");
        assert_eq!(body["updatedUser"]["createdAt"], created["createdAt"]);
        assert_ne!(body["updatedUser"]["updatedAt"], created["updatedAt"]);

        let response = make_request(&app, Method::DELETE, &path, None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            read_json(response).await,
            json!({"message": "User deleted successfully"})
        );

        let response = make_request(&app, Method::GET, &path, None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = make_request(&app, Method::DELETE, &path, None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_cors_layer_rejects_invalid_origin() {
        let config = CorsConfig {
            allowed_origin: Some("http://bad\norigin".to_string()),
        };

        assert!(cors_layer(&config).is_err());
        assert!(cors_layer(&CorsConfig::default()).is_ok());
    }

    #[tokio::test]
    async fn test_cors_allowed_origin() {
        let config = CorsConfig {
            allowed_origin: Some("http://localhost:5173".to_string()),
        };
        let repository = Arc::new(InMemoryUserRepository::new());
        let service = UserService::new(repository, test_hasher());
        let app = create_router_with_config(AppState::new(Arc::new(service)), &config).unwrap();

        let request = Request::builder()
            .method(Method::GET)
            .uri("/health")
            .header(header::ORIGIN, "http://localhost:5173")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(
            response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "http://localhost:5173"
        );
        assert_eq!(
            response
                .headers()
                .get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS)
                .unwrap(),
            "true"
        );
    }
}
