//! Read endpoints serving the current store snapshot.
//!
//! The read path degrades gracefully: a store failure yields an empty array,
//! never an error response, so the presentation layer keeps rendering.

use axum::{extract::State, Json};
use sigdb_core::{Channel, Signal};
use sigdb_db::ChannelRow;

use super::AppState;

/// GET /api/v1/channels — full channel snapshot.
pub(in crate::api) async fn list_channels(State(state): State<AppState>) -> Json<Vec<Channel>> {
    match sigdb_db::list_channels(&state.pool).await {
        Ok(rows) => Json(rows.into_iter().map(ChannelRow::into_channel).collect()),
        Err(e) => {
            tracing::error!(error = %e, "channel listing failed; serving empty snapshot");
            Json(Vec::new())
        }
    }
}

/// GET /api/v1/signals — all signals flattened across channels, in
/// concatenation order of the underlying listing.
pub(in crate::api) async fn list_signals(State(state): State<AppState>) -> Json<Vec<Signal>> {
    match sigdb_db::list_channels(&state.pool).await {
        Ok(rows) => Json(rows.into_iter().flat_map(|row| row.signals.0).collect()),
        Err(e) => {
            tracing::error!(error = %e, "signal listing failed; serving empty snapshot");
            Json(Vec::new())
        }
    }
}
