use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

use crate::error::AppResult;
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::models::win::{
    CreateWinRequest, ReorderRequest, SearchQuery, UpdateWinRequest, Win, WinQuery,
};
use crate::AppState;

pub async fn list_wins(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<WinQuery>,
) -> AppResult<Json<Vec<Win>>> {
    let wins = state.store.list(query.into()).await?;
    Ok(Json(wins))
}

pub async fn create_win(
    State(state): State<AppState>,
    AppJson(body): AppJson<CreateWinRequest>,
) -> AppResult<Json<Win>> {
    let win = state.store.create(&body).await?;
    Ok(Json(win))
}

pub async fn update_win(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
    AppJson(body): AppJson<UpdateWinRequest>,
) -> AppResult<Json<Win>> {
    let win = state.store.update_content(id, &body).await?;
    Ok(Json(win))
}

pub async fn toggle_star(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> AppResult<Json<Win>> {
    let win = state.store.toggle_star(id).await?;
    Ok(Json(win))
}

pub async fn delete_win(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> AppResult<Json<Value>> {
    state.store.delete(id).await?;
    Ok(Json(json!({ "success": true, "id": id })))
}

/// Drag-and-drop persistence. Unknown ids are skipped rather than failing the batch.
pub async fn reorder_wins(
    State(state): State<AppState>,
    AppJson(body): AppJson<ReorderRequest>,
) -> AppResult<Json<Value>> {
    let updated = state.store.reorder(&body.items).await?;
    Ok(Json(json!({ "success": true, "updated": updated })))
}

pub async fn search_wins(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<SearchQuery>,
) -> AppResult<Json<Vec<Win>>> {
    let wins = state
        .store
        .search(query.q.as_deref().unwrap_or_default())
        .await?;
    Ok(Json(wins))
}
