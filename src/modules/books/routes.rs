use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::json;
use uuid::Uuid;

use libris_auth::{require_owner, OwnershipError};
use libris_http::error::AppError;

use super::models::{Book, CreateBook, UpdateBook};
use super::store::StoreError;
use super::BooksState;
use crate::modules::auth::extract::Identity;

/// GET /api/books
pub(super) async fn list_books(
    Identity(_identity): Identity,
    State(state): State<BooksState>,
) -> Json<Vec<Book>> {
    Json(state.store.list().await)
}

/// GET /api/books/mine
pub(super) async fn my_books(
    Identity(identity): Identity,
    State(state): State<BooksState>,
) -> Json<Vec<Book>> {
    Json(state.store.list_by_creator(&identity).await)
}

/// POST /api/books
pub(super) async fn create_book(
    Identity(identity): Identity,
    State(state): State<BooksState>,
    payload: Result<Json<CreateBook>, JsonRejection>,
) -> Result<(StatusCode, Json<Book>), AppError> {
    let Json(input) = payload.map_err(bad_body)?;

    let book = state
        .store
        .create(input, &identity)
        .await
        .map_err(store_error)?;

    Ok((StatusCode::CREATED, Json(book)))
}

/// PUT /api/books/{id}
pub(super) async fn update_book(
    Identity(identity): Identity,
    State(state): State<BooksState>,
    Path(id): Path<Uuid>,
    payload: Result<Json<UpdateBook>, JsonRejection>,
) -> Result<Json<Book>, AppError> {
    let Json(patch) = payload.map_err(bad_body)?;

    // Session, then ownership, then the mutation itself.
    let current = state.store.get(id).await;
    require_owner(current.as_ref(), &identity).map_err(|err| ownership_error(err, id))?;

    let book = state.store.update(id, patch).await.map_err(store_error)?;
    Ok(Json(book))
}

/// DELETE /api/books/{id}
pub(super) async fn delete_book(
    Identity(identity): Identity,
    State(state): State<BooksState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let current = state.store.get(id).await;
    require_owner(current.as_ref(), &identity).map_err(|err| ownership_error(err, id))?;

    state.store.delete(id).await.map_err(store_error)?;
    Ok(Json(json!({ "message": "Book deleted successfully" })))
}

fn bad_body(rejection: JsonRejection) -> AppError {
    AppError::bad_request(rejection.body_text())
}

fn store_error(err: StoreError) -> AppError {
    match err {
        StoreError::NotFound(id) => AppError::not_found(format!("book {id} not found")),
        StoreError::InvalidField { field, reason } => AppError::validation(
            vec![json!({ "field": field, "error": reason })],
            format!("invalid value for {field}"),
        ),
        StoreError::Persistence(err) => {
            tracing::error!(error = %err, "catalog flush failed");
            AppError::persistence("failed to persist the catalog")
        }
    }
}

fn ownership_error(err: OwnershipError, id: Uuid) -> AppError {
    match err {
        OwnershipError::NotFound => AppError::not_found(format!("book {id} not found")),
        OwnershipError::Forbidden => {
            AppError::forbidden("You do not have permission to modify this book")
        }
    }
}
