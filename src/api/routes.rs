//! API Routes
//!
//! Configures the Axum router with all library API endpoints and the
//! bearer-token gate.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::{self, Next},
    response::Response,
    routing::get,
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::error::{ApiError, Result};

use super::handlers::{
    create_book_handler, create_loan_handler, delete_book_handler, get_book_handler,
    get_loan_handler, health_handler, list_books_handler, list_loans_handler, return_loan_handler,
    stats_handler, update_book_handler, AppState,
};

// == Auth Gate ==
/// Bearer-token pass/fail gate for all resource routes.
///
/// The policy itself is out of scope here; anything beyond "the token
/// matches" belongs to a real identity layer.
pub async fn require_bearer(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response> {
    let expected = format!("Bearer {}", state.api_token);
    let authorized = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(|v| v == expected)
        .unwrap_or(false);

    if !authorized {
        return Err(ApiError::Unauthorized);
    }
    Ok(next.run(request).await)
}

// == Router ==
/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /health` - Liveness check (unauthenticated)
/// - `GET /stats` - Ledger and cache counters (unauthenticated)
/// - `GET /books` - Paginated, cacheable book listing
/// - `POST /books` - Create a book (idempotency-key aware)
/// - `GET /books/:id` - Single book with conditional caching
/// - `PATCH /books/:id` - Partial update
/// - `DELETE /books/:id` - Remove a book not currently on loan
/// - `GET /loans` - Paginated, cacheable loan listing
/// - `POST /loans` - Borrow a book (idempotency-key aware)
/// - `GET /loans/:id` - Single loan with conditional caching
/// - `PATCH /loans/:id` - Return the loan
///
/// # Middleware
/// - Bearer gate on all resource routes
/// - CORS: allows any origin (configurable for production)
/// - Tracing: logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let resources = Router::new()
        .route("/books", get(list_books_handler).post(create_book_handler))
        .route(
            "/books/:id",
            get(get_book_handler)
                .patch(update_book_handler)
                .delete(delete_book_handler),
        )
        .route("/loans", get(list_loans_handler).post(create_loan_handler))
        .route(
            "/loans/:id",
            get(get_loan_handler).patch(return_loan_handler),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_bearer,
        ));

    Router::new()
        .route("/health", get(health_handler))
        .route("/stats", get(stats_handler))
        .merge(resources)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::store::LibraryStore;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::util::ServiceExt;

    fn create_test_app() -> Router {
        let mut store = LibraryStore::new();
        store.seed_demo();
        create_router(AppState::new(store, &Config::default()))
    }

    #[tokio::test]
    async fn test_health_endpoint_is_open() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_books_without_token_unauthorized() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/books")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_books_with_token_ok() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/books")
                    .header("authorization", "Bearer demo-token")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_wrong_token_unauthorized() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/books")
                    .header("authorization", "Bearer wrong")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_get_book_not_found() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/books/b99")
                    .header("authorization", "Bearer demo-token")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
