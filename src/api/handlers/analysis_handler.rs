use axum::{Json, extract::State, response::Response};
use serde_json::json;
use tracing::{debug, warn};

use crate::{
    api::{app_state::AppState, dto::analysis_dto::*},
    models::{event::Event, vault::UserVault},
};

pub async fn build_prompt(
    State(state): State<AppState>,
    Json(request): Json<BuildPromptRequest>,
) -> Result<Json<BuildPromptResponse>, Response> {
    let request_id = uuid::Uuid::new_v4().to_string();
    debug!(
        "Building analysis prompt, request: {}, events: {}",
        request_id,
        request.events.len()
    );

    // an explicit `days` wins over the same key inside `options`
    let patch = match (request.options, request.days) {
        (Some(mut options), Some(days)) if options.is_object() => {
            options["days"] = json!(days);
            Some(options)
        }
        (_, Some(days)) => Some(json!({ "days": days })),
        (options, None) => options,
    };
    let options = state
        .analysis_service
        .resolve_options(patch.as_ref())
        .map_err(|e| {
            warn!("Rejected analysis request {}: {}", request_id, e);
            e.into_response_for(&request_id)
        })?;

    let events = Event::parse_batch(&request.events);
    let malformed = request.events.len() - events.len();

    let vault = UserVault::from_value(&request.vault);

    let outcome = state.analysis_service.run(&events, &vault, options);
    state.metrics.record_prompt_built();

    let response = BuildPromptResponse {
        request_id,
        included_events: outcome.compressed.len(),
        dropped_events: outcome.compressed.dropped,
        ignored_events: malformed + outcome.compressed.unrecognized,
        estimated_tokens: outcome.compressed.estimated_tokens,
        token_budget: outcome.options.token_budget,
        days: outcome.options.days,
        prompt: outcome.prompt,
        profile: outcome.profile,
    };

    Ok(Json(response))
}
