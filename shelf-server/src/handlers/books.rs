//! Book inventory handlers

use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use shelf_core::{Book, NewBook};

/// Query parameters naming a book
#[derive(Debug, Deserialize)]
pub struct IdQuery {
    pub id: Option<String>,
}

impl IdQuery {
    /// Extract the id, reporting malformed and missing queries as bad requests
    fn require(query: Result<Query<IdQuery>, QueryRejection>) -> Result<String, ApiError> {
        let Query(query) = query.map_err(|e| ApiError::BadRequest(e.body_text()))?;
        query
            .id
            .ok_or_else(|| ApiError::BadRequest("Missing id query parameter.".to_string()))
    }
}

/// List all books in insertion order
pub async fn list_books(State(state): State<AppState>) -> Result<Json<Vec<Book>>, ApiError> {
    Ok(Json(state.inventory.list_all()?))
}

/// Get a single book
pub async fn get_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Book>, ApiError> {
    Ok(Json(state.inventory.get(&id)?))
}

/// Create a new book
pub async fn create_book(
    State(state): State<AppState>,
    payload: Result<Json<NewBook>, JsonRejection>,
) -> Result<(StatusCode, Json<Book>), ApiError> {
    let Json(payload) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let book = state.inventory.create(payload)?;
    tracing::info!(id = %book.id, title = %book.title, "Book created");

    Ok((StatusCode::CREATED, Json(book)))
}

/// Check out one copy of a book
pub async fn checkout_book(
    State(state): State<AppState>,
    query: Result<Query<IdQuery>, QueryRejection>,
) -> Result<Json<Book>, ApiError> {
    let id = IdQuery::require(query)?;

    let book = state.inventory.checkout(&id)?;
    tracing::debug!(id = %book.id, quantity = book.quantity, "Book checked out");

    Ok(Json(book))
}

/// Return one copy of a book
pub async fn return_book(
    State(state): State<AppState>,
    query: Result<Query<IdQuery>, QueryRejection>,
) -> Result<Json<Book>, ApiError> {
    let id = IdQuery::require(query)?;

    let book = state.inventory.return_book(&id)?;
    tracing::debug!(id = %book.id, quantity = book.quantity, "Book returned");

    Ok(Json(book))
}
