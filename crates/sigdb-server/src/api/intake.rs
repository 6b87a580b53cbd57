//! Channel intake: user-submitted channel URLs.
//!
//! Decides create-vs-refresh, inserts the placeholder record, and kicks the
//! external analysis worker. The trigger is fire-and-forget: the caller's
//! latency is bounded by store round-trips, never by the worker.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Extension, Json};
use serde::Deserialize;
use sigdb_analyzer::AnalyzerClient;
use sigdb_core::ChannelVerdict;
use sigdb_db::{ChannelRow, DbError, NewChannel};
use url::Url;

use crate::middleware::RequestId;

use super::{map_db_error, ApiError, AppState, PipelineResponse};

const DEFAULT_CHANNEL_HOST: &str = "https://t.me/";
const PLACEHOLDER_DESCRIPTION: &str = "Analysis in progress...";
const NON_SIGNAL_MESSAGE: &str =
    "This channel does not provide trading signals or does not follow a professional format.";

#[derive(Debug, Deserialize)]
pub(in crate::api) struct AnalyzeChannelRequest {
    #[serde(rename = "channelUrl")]
    channel_url: Option<String>,
}

/// Extracts the normalized channel identifier and the canonical source URL
/// from a raw submission. Inputs without a scheme are treated as bare
/// usernames: a leading `@` is stripped and the default host prefixed.
fn extract_channel_id(input: &str) -> Option<(String, String)> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }

    let candidate = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_owned()
    } else {
        format!("{DEFAULT_CHANNEL_HOST}{}", trimmed.trim_start_matches('@'))
    };

    let url = Url::parse(&candidate).ok()?;
    let channel_id = url
        .path_segments()?
        .find(|segment| !segment.is_empty())?
        .to_lowercase();

    Some((channel_id, url.to_string()))
}

/// Hands the trigger to a detached task. At-most-one attempt, no delivery
/// guarantee: a failed trigger is logged and never rolls back the record.
pub(in crate::api) fn spawn_analysis_trigger(analyzer: Arc<AnalyzerClient>, channel_id: String) {
    tokio::spawn(async move {
        if let Err(e) = analyzer.trigger(&channel_id).await {
            tracing::warn!(channel_id = %channel_id, error = %e, "analysis trigger failed");
        }
    });
}

/// POST /api/v1/channels/analyze — submit a channel for analysis.
pub(in crate::api) async fn analyze_channel(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<AnalyzeChannelRequest>,
) -> Result<(StatusCode, Json<PipelineResponse>), ApiError> {
    let rid = &req_id.0;

    let Some(raw_url) = body
        .channel_url
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
    else {
        return Err(ApiError::invalid_input("Missing or invalid 'channelUrl'"));
    };

    let Some((channel_id, canonical_url)) = extract_channel_id(raw_url) else {
        return Err(ApiError::invalid_input(
            "Could not extract a valid channel username from the URL.",
        ));
    };

    let existing = sigdb_db::find_channel(&state.pool, &channel_id)
        .await
        .map_err(|e| map_db_error(rid, &e))?;

    if let Some(row) = existing {
        // A settled negative verdict is final; do not re-trigger analysis.
        // Rejection normally deletes the row outright, so this branch is a
        // safety net for records that predate the delete behavior.
        if row.verdict() == ChannelVerdict::Rejected {
            return Ok((
                StatusCode::BAD_REQUEST,
                Json(PipelineResponse {
                    success: false,
                    message: NON_SIGNAL_MESSAGE.to_owned(),
                    channel: Some(row.into_channel()),
                    action: Some("SHOW_NON_SIGNAL_ALERT"),
                }),
            ));
        }

        spawn_analysis_trigger(Arc::clone(&state.analyzer), channel_id);
        return Ok((
            StatusCode::OK,
            Json(PipelineResponse {
                success: true,
                message: "Channel already exists. Refresh request sent.".to_owned(),
                channel: Some(row.into_channel()),
                action: None,
            }),
        ));
    }

    let new = NewChannel {
        channel_id: channel_id.clone(),
        name: channel_id.clone(),
        avatar: Some(state.placeholder_avatar_url.to_string()),
        description: Some(PLACEHOLDER_DESCRIPTION.to_owned()),
        url: Some(canonical_url),
    };

    match sigdb_db::insert_placeholder(&state.pool, &new).await {
        Ok(row) => {
            spawn_analysis_trigger(Arc::clone(&state.analyzer), channel_id);
            Ok((
                StatusCode::CREATED,
                Json(PipelineResponse {
                    success: true,
                    message: "Channel added and analysis started. It will appear in the list shortly."
                        .to_owned(),
                    channel: Some(row.into_channel()),
                    action: None,
                }),
            ))
        }
        Err(DbError::Duplicate) => {
            // Lost the insert race: a concurrent submission created the
            // record between lookup and insert. Re-read and answer as
            // "existing" — the store's unique index guarantees one record.
            tracing::debug!(request_id = %rid, channel_id = %channel_id, "placeholder insert lost race");
            let row = sigdb_db::find_channel(&state.pool, &channel_id)
                .await
                .map_err(|e| map_db_error(rid, &e))?;
            Ok((
                StatusCode::OK,
                Json(PipelineResponse {
                    success: true,
                    message: format!("A channel with ID '{channel_id}' already exists."),
                    channel: row.map(ChannelRow::into_channel),
                    action: None,
                }),
            ))
        }
        Err(e) => Err(map_db_error(rid, &e)),
    }
}
