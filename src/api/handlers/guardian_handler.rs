use axum::{Json, extract::State, response::IntoResponse};
use tracing::debug;

use crate::{
    api::{app_state::AppState, dto::guardian_dto::AssessTextRequest},
    error::AppError,
};

/// 始终返回 200：分类器故障已折叠为拦截结果
pub async fn assess_text(
    State(state): State<AppState>,
    Json(request): Json<AssessTextRequest>,
) -> Result<impl IntoResponse, AppError> {
    debug!("Assessing text safety, length: {}", request.text.chars().count());

    let result = state.guardian.assess_text_safety(&request.text).await;

    Ok(Json(result))
}
