use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Html;
use tracing::info;

use crate::db::Book;
use crate::middleware::{AuthenticatedUser, FormFields};
use crate::router::BookwormState;
use crate::session::Session;
use crate::types::catalog::{CatalogFilter, SortColumn};
use crate::types::classify::BibliographicRecord;
use crate::{BookwormError, views};

/// GET /
pub async fn index(
    State(state): State<BookwormState>,
    AuthenticatedUser(username): AuthenticatedUser,
    session: Session,
) -> Result<Html<String>, BookwormError> {
    let filter = session.filter().unwrap_or_default();
    let sort = session.sort_by().unwrap_or_default();
    let books = state.storage.list_books(&username, sort, filter).await?;
    Ok(Html(views::catalog_page(&username, filter, sort, &books)))
}

/// GET /books[?filter=..][&sortBy=..]
///
/// Lists the caller's books. A `filter` or `sortBy` parameter overrides the
/// stored preference and, once the listing succeeded, replaces it so that
/// later requests without the parameter repeat the choice. Unknown or
/// repeated values fall back leniently, never to an error.
pub async fn list_books(
    State(state): State<BookwormState>,
    AuthenticatedUser(username): AuthenticatedUser,
    session: Session,
    params: FormFields,
) -> Result<(Session, Json<Vec<Book>>), BookwormError> {
    let requested_filter = params.get("filter").map(CatalogFilter::parse_or_default);
    let requested_sort = params.get("sortBy").map(SortColumn::parse_or_default);

    let filter = requested_filter.or(session.filter()).unwrap_or_default();
    let sort = requested_sort.or(session.sort_by()).unwrap_or_default();
    let books = state.storage.list_books(&username, sort, filter).await?;

    let mut session = session;
    if let Some(filter) = requested_filter {
        session = session.with_filter(filter);
    }
    if let Some(sort) = requested_sort {
        session = session.with_sort_by(sort);
    }
    Ok((session, Json(books)))
}

/// PUT /books with field `id`: look the work up and shelve it for the caller.
pub async fn add_book(
    State(state): State<BookwormState>,
    AuthenticatedUser(username): AuthenticatedUser,
    form: FormFields,
) -> Result<Json<Book>, BookwormError> {
    let external_id = form.value("id").trim();
    if external_id.is_empty() {
        return Err(BookwormError::InvalidField {
            field: "id",
            reason: "must not be empty".to_string(),
        });
    }
    let record = state.classify.find_by_id(external_id).await?;
    let book = state
        .storage
        .insert_book(record.into_new_book(username))
        .await?;
    info!(pk = book.pk, owner = %book.user, external_id = %book.id, "book added");
    Ok(Json(book))
}

/// DELETE /books/{pk}
pub async fn delete_book(
    State(state): State<BookwormState>,
    AuthenticatedUser(username): AuthenticatedUser,
    Path(pk): Path<String>,
) -> Result<StatusCode, BookwormError> {
    let pk: i64 = pk.parse().map_err(|_| BookwormError::InvalidField {
        field: "pk",
        reason: format!("`{pk}` is not an integer"),
    })?;
    state.storage.delete_book(&username, pk).await?;
    info!(pk, owner = %username, "book deleted");
    Ok(StatusCode::OK)
}

/// POST /search with field `search`.
pub async fn search(
    State(state): State<BookwormState>,
    form: FormFields,
) -> Result<Json<Vec<BibliographicRecord>>, BookwormError> {
    let results = state.classify.search_by_title(form.value("search")).await?;
    Ok(Json(results))
}
