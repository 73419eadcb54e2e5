//! API Handlers
//!
//! HTTP request handlers for each library API endpoint.
//!
//! Reads run the fingerprint/conditional-cache path; keyed writes run
//! through the idempotency ledger so a retried POST replays its original
//! response instead of mutating the store twice.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::Response,
    Json,
};
use tokio::sync::RwLock;
use tracing::debug;

use crate::config::Config;
use crate::error::Result;
use crate::httpcache::{conditional_json, CachePolicy, HttpCacheStats};
use crate::idempotency::{IdempotencyLedger, IdempotencyRecord};
use crate::models::{
    CreateBookRequest, CreateLoanRequest, HealthResponse, Resource, StatsResponse,
    UpdateBookRequest,
};
use crate::pagination::{paginate, ListParams, PageRequest};
use crate::store::LibraryStore;

// == App State ==
/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Thread-safe library store
    pub store: Arc<RwLock<LibraryStore>>,
    /// Idempotency replay cache
    pub ledger: Arc<IdempotencyLedger>,
    /// Conditional cache counters
    pub cache_stats: Arc<HttpCacheStats>,
    /// Freshness windows per resource class
    pub policy: CachePolicy,
    /// Bearer token for the auth gate
    pub api_token: Arc<String>,
}

impl AppState {
    /// Creates a new AppState around the given store.
    pub fn new(store: LibraryStore, config: &Config) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
            ledger: Arc::new(IdempotencyLedger::new(
                config.ledger_max_entries,
                config.ledger_ttl,
            )),
            cache_stats: Arc::new(HttpCacheStats::new()),
            policy: CachePolicy::from_config(config),
            api_token: Arc::new(config.api_token.clone()),
        }
    }

    /// Creates a new AppState from configuration with an empty store.
    pub fn from_config(config: &Config) -> Self {
        Self::new(LibraryStore::new(), config)
    }
}

// == Header Helpers ==

/// Extracts the client's conditional-request validator, if any.
fn if_none_match(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::IF_NONE_MATCH)
        .and_then(|v| v.to_str().ok())
}

/// Extracts the client's idempotency key, if any. Absence means
/// "proceed without consulting the ledger".
fn idempotency_key(headers: &HeaderMap) -> Option<String> {
    headers
        .get("idempotency-key")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

// == Book Handlers ==

/// Handler for GET /books
///
/// Paginated, fingerprinted listing. The ETag covers the serialized page
/// envelope, so it changes whenever the selected items or the navigation
/// metadata change.
pub async fn list_books_handler(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
    headers: HeaderMap,
) -> Result<Response> {
    let request = PageRequest::parse(&params)?;
    let books = state.store.read().await.list_books();
    let page = paginate(&books, &request, "/books")?;

    conditional_json(
        &page,
        state.policy.collection_max_age,
        if_none_match(&headers),
        &state.cache_stats,
    )
}

/// Handler for POST /books
pub async fn create_book_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<CreateBookRequest>,
) -> Result<Response> {
    // Validate before touching the ledger or the store
    let (title, author) = req.validate()?;

    let record = match idempotency_key(&headers) {
        Some(key) => {
            let ledger = state.ledger.clone();
            let (replayed, record) = ledger
                .replay_or_execute(&key, || create_book_op(state.clone(), title, author))
                .await?;
            if replayed {
                debug!(%key, "create book replayed from idempotency ledger");
            }
            record
        }
        None => create_book_op(state, title, author).await?,
    };

    record.to_response()
}

/// The underlying mutation for POST /books; runs at most once per
/// idempotency key.
async fn create_book_op(
    state: AppState,
    title: String,
    author: String,
) -> Result<IdempotencyRecord> {
    let book = state.store.write().await.create_book(title, author)?;
    let location = format!("/books/{}", book.id);

    IdempotencyRecord::json(
        StatusCode::CREATED,
        vec![(header::LOCATION.to_string(), location.clone())],
        &Resource::new(book, location),
    )
}

/// Handler for GET /books/:id
pub async fn get_book_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Response> {
    let book = state.store.read().await.get_book(&id)?;
    let envelope = Resource::new(book, format!("/books/{}", id));

    conditional_json(
        &envelope,
        state.policy.book_max_age,
        if_none_match(&headers),
        &state.cache_stats,
    )
}

/// Handler for PATCH /books/:id
///
/// Partial update. Unconditioned: no idempotency key and no optimistic
/// concurrency token, so concurrent PATCHes last-write-win.
pub async fn update_book_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateBookRequest>,
) -> Result<Json<Resource<crate::store::Book>>> {
    req.validate()?;

    let book = state
        .store
        .write()
        .await
        .update_book(&id, req.title, req.author, req.available)?;

    let href = format!("/books/{}", id);
    Ok(Json(Resource::new(book, href)))
}

/// Handler for DELETE /books/:id
pub async fn delete_book_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    state.store.write().await.delete_book(&id)?;
    Ok(StatusCode::NO_CONTENT)
}

// == Loan Handlers ==

/// Handler for GET /loans
///
/// Same pagination and conditional machinery as /books, with the short
/// freshness window loans warrant.
pub async fn list_loans_handler(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
    headers: HeaderMap,
) -> Result<Response> {
    let request = PageRequest::parse(&params)?;
    let loans = state.store.read().await.list_loans();
    let page = paginate(&loans, &request, "/loans")?;

    conditional_json(
        &page,
        state.policy.loan_max_age,
        if_none_match(&headers),
        &state.cache_stats,
    )
}

/// Handler for POST /loans (borrow a book)
pub async fn create_loan_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<CreateLoanRequest>,
) -> Result<Response> {
    let (book_id, user) = req.validate()?;

    let record = match idempotency_key(&headers) {
        Some(key) => {
            let ledger = state.ledger.clone();
            let (replayed, record) = ledger
                .replay_or_execute(&key, || create_loan_op(state.clone(), book_id, user))
                .await?;
            if replayed {
                debug!(%key, "create loan replayed from idempotency ledger");
            }
            record
        }
        None => create_loan_op(state, book_id, user).await?,
    };

    record.to_response()
}

/// The underlying mutation for POST /loans. The availability check and
/// the loan insert run atomically under the store's write lock.
async fn create_loan_op(
    state: AppState,
    book_id: String,
    user: String,
) -> Result<IdempotencyRecord> {
    let loan = state.store.write().await.borrow_book(&book_id, user)?;
    let location = format!("/loans/{}", loan.id);

    IdempotencyRecord::json(
        StatusCode::CREATED,
        vec![(header::LOCATION.to_string(), location.clone())],
        &Resource::new(loan, location),
    )
}

/// Handler for GET /loans/:id
pub async fn get_loan_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Response> {
    let loan = state.store.read().await.get_loan(&id)?;
    let envelope = Resource::new(loan, format!("/loans/{}", id));

    conditional_json(
        &envelope,
        state.policy.loan_max_age,
        if_none_match(&headers),
        &state.cache_stats,
    )
}

/// Handler for PATCH /loans/:id (return the loan)
///
/// Idempotent by construction: returning an already-returned loan
/// succeeds unchanged, so no idempotency key is needed.
pub async fn return_loan_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Resource<crate::store::Loan>>> {
    let loan = state.store.write().await.return_loan(&id)?;
    let href = format!("/loans/{}", id);
    Ok(Json(Resource::new(loan, href)))
}

// == Service Handlers ==

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse {
        ledger: state.ledger.stats(),
        cache: state.cache_stats.snapshot(),
    })
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    fn test_state() -> AppState {
        let mut store = LibraryStore::new();
        store.seed_demo();
        AppState::new(store, &Config::default())
    }

    #[tokio::test]
    async fn test_get_book_handler_delivers_with_etag() {
        let state = test_state();

        let resp = get_book_handler(
            State(state),
            Path("b1".to_string()),
            HeaderMap::new(),
        )
        .await
        .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        assert!(resp.headers().contains_key(header::ETAG));
    }

    #[tokio::test]
    async fn test_get_book_handler_not_found() {
        let state = test_state();

        let result = get_book_handler(
            State(state),
            Path("b99".to_string()),
            HeaderMap::new(),
        )
        .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_create_book_handler_sets_location() {
        let state = test_state();

        let req = CreateBookRequest {
            title: Some("Refactoring".to_string()),
            author: Some("Martin Fowler".to_string()),
        };
        let resp = create_book_handler(State(state), HeaderMap::new(), Json(req))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::CREATED);
        assert_eq!(resp.headers()["location"], "/books/b3");
    }

    #[tokio::test]
    async fn test_create_loan_conflict_on_unavailable_book() {
        let state = test_state();

        let borrow = |user: &str| CreateLoanRequest {
            book_id: Some("b1".to_string()),
            user: Some(user.to_string()),
        };

        let resp =
            create_loan_handler(State(state.clone()), HeaderMap::new(), Json(borrow("Alice")))
                .await
                .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);

        let result =
            create_loan_handler(State(state), HeaderMap::new(), Json(borrow("Bob"))).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_return_loan_handler_restores_book() {
        let state = test_state();

        let req = CreateLoanRequest {
            book_id: Some("b1".to_string()),
            user: Some("Alice".to_string()),
        };
        create_loan_handler(State(state.clone()), HeaderMap::new(), Json(req))
            .await
            .unwrap();

        let returned = return_loan_handler(State(state.clone()), Path("l1".to_string()))
            .await
            .unwrap();
        assert!(returned.data.returned);

        let book = state.store.read().await.get_book("b1").unwrap();
        assert!(book.available);
    }

    #[tokio::test]
    async fn test_stats_handler_counts_activity() {
        let state = test_state();

        get_book_handler(State(state.clone()), Path("b1".to_string()), HeaderMap::new())
            .await
            .unwrap();

        let stats = stats_handler(State(state)).await;
        assert_eq!(stats.cache.delivered, 1);
    }

    #[tokio::test]
    async fn test_health_handler() {
        let resp = health_handler().await;
        assert_eq!(resp.status, "healthy");
    }
}
