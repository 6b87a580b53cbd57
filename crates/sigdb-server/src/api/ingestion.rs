//! Analysis callback: the external worker reporting a completed analysis.
//!
//! This endpoint is the sole writer of a channel's verdict and signal list.
//! Each call replaces state wholesale — repeated analysis of the same
//! channel produces the latest snapshot, not an accumulation.

use axum::{extract::State, http::StatusCode, Extension, Json};
use chrono::Utc;
use serde::Deserialize;
use sigdb_ingest::{build_channel_patch, AnalysisResult};

use crate::middleware::RequestId;

use super::{map_db_error, ApiError, AppState, PipelineResponse};

#[derive(Debug, Deserialize)]
pub(in crate::api) struct AnalysisCallbackRequest {
    #[serde(rename = "channelUsername")]
    channel_username: Option<String>,
    trading_signal: Option<String>,
    #[serde(rename = "analysisResult", default)]
    analysis_result: Vec<AnalysisResult>,
}

/// POST /api/v1/analysis/callback — apply a completed analysis.
pub(in crate::api) async fn analysis_callback(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<AnalysisCallbackRequest>,
) -> Result<(StatusCode, Json<PipelineResponse>), ApiError> {
    let rid = &req_id.0;

    let Some(channel_id) = body
        .channel_username
        .as_deref()
        .map(|u| u.trim().trim_start_matches('@').to_lowercase())
        .filter(|u| !u.is_empty())
    else {
        return Err(ApiError::invalid_input("channelUsername is missing"));
    };

    match body.trading_signal.as_deref() {
        // Not a signal channel: remove the record entirely. Deleting an
        // absent record is not an error — the callback may retry or arrive
        // after a competing rejection already cleaned up.
        Some("No") => {
            let deleted = sigdb_db::delete_channel(&state.pool, &channel_id)
                .await
                .map_err(|e| map_db_error(rid, &e))?;

            if let Some(row) = deleted {
                tracing::info!(channel_id = %channel_id, "non-signal channel removed");
                return Ok((
                    StatusCode::OK,
                    Json(PipelineResponse {
                        success: true,
                        message: "Channel was not a signal channel and has been removed."
                            .to_owned(),
                        channel: Some(row.into_channel()),
                        action: Some("SHOW_NON_SIGNAL_ALERT_And_Remove"),
                    }),
                ));
            }

            Ok((
                StatusCode::OK,
                Json(PipelineResponse {
                    success: true,
                    message: "Channel marked as not a signal channel.".to_owned(),
                    channel: None,
                    action: Some("SHOW_NON_SIGNAL_ALERT"),
                }),
            ))
        }

        Some("Yes") => {
            let Some(result) = body.analysis_result.first() else {
                return Err(ApiError::new(
                    "missing_payload",
                    "Trading signal is YES but analysisResult is missing or empty.",
                ));
            };

            let patch = build_channel_patch(result, &channel_id, Utc::now());
            let row = sigdb_db::upsert_analysis(&state.pool, &channel_id, &patch)
                .await
                .map_err(|e| map_db_error(rid, &e))?;

            tracing::info!(
                channel_id = %channel_id,
                signals = row.signals.0.len(),
                "analysis applied"
            );
            Ok((
                StatusCode::OK,
                Json(PipelineResponse {
                    success: true,
                    message: "Channel data updated successfully.".to_owned(),
                    channel: Some(row.into_channel()),
                    action: Some("REDIRECT_TO_CHANNEL"),
                }),
            ))
        }

        _ => Err(ApiError::new(
            "invalid_signal_value",
            "Invalid trading_signal value.",
        )),
    }
}
