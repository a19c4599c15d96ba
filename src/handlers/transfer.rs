use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;

use crate::calendar::CalendarDate;
use crate::error::AppResult;
use crate::extract::AppJson;
use crate::models::win::{ImportRequest, ImportResponse};
use crate::AppState;

/// Full backup as a downloadable JSON file.
pub async fn export_wins(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let wins = state.store.export().await?;
    let body = serde_json::to_string_pretty(&wins).map_err(anyhow::Error::from)?;
    let disposition = format!(
        "attachment; filename=\"wall-of-wins-backup-{}.json\"",
        CalendarDate::today()
    );

    tracing::info!(count = wins.len(), "Exported wins");

    Ok((
        [
            (header::CONTENT_TYPE, "application/json".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    ))
}

pub async fn import_wins(
    State(state): State<AppState>,
    AppJson(body): AppJson<ImportRequest>,
) -> AppResult<Json<ImportResponse>> {
    let count = state.store.import(&body).await?;

    Ok(Json(ImportResponse {
        message: "Import successful".into(),
        count,
    }))
}
