//! Domain types for channels and their embedded signals.
//!
//! Wire field names follow the client contract (camelCase, `isSignalChannel`
//! for the verdict), so these types serialize directly onto API responses.

use serde::{Deserialize, Serialize};

/// Classification state of a channel. `Rejected` never persists: a rejected
/// channel is deleted rather than stored, but the variant keeps the state
/// machine exhaustively matchable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelVerdict {
    Undetermined,
    Accepted,
    Rejected,
}

impl ChannelVerdict {
    /// The TEXT value stored in the `channels.verdict` column.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ChannelVerdict::Undetermined => "undetermined",
            ChannelVerdict::Accepted => "accepted",
            ChannelVerdict::Rejected => "rejected",
        }
    }

    /// Parse a stored verdict. Unrecognized values degrade to `Undetermined`
    /// rather than failing the read path.
    #[must_use]
    pub fn from_db(value: &str) -> Self {
        match value {
            "accepted" => ChannelVerdict::Accepted,
            "rejected" => ChannelVerdict::Rejected,
            _ => ChannelVerdict::Undetermined,
        }
    }
}

impl std::fmt::Display for ChannelVerdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignalDirection {
    Long,
    Short,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalStatus {
    Active,
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Risk {
    Low,
    Medium,
    High,
}

/// One trading call, owned by exactly one channel. Signals are embedded in
/// the channel record and replaced wholesale on each analysis callback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Signal {
    #[serde(rename = "type")]
    pub direction: SignalDirection,
    pub asset: String,
    pub entry: f64,
    pub targets: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_loss: Option<f64>,
    /// ISO-8601 creation instant.
    pub timestamp: String,
    pub status: SignalStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pnl: Option<f64>,
}

/// A tracked channel as served to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Channel {
    pub channel_id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    pub subscribers: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "isSignalChannel")]
    pub verdict: ChannelVerdict,
    pub is_static: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviews: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk: Option<Risk>,
    pub signals: Vec<Signal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// The analysis result applied to a channel record on ingestion.
///
/// `verdict` and `signals` are written unconditionally (the ingestion
/// endpoint is their sole writer and replaces, never merges); the display
/// fields overlay the existing record only when present.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelPatch {
    pub verdict: ChannelVerdict,
    pub signals: Vec<Signal>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub avatar: Option<String>,
    pub subscribers: Option<i64>,
    pub accuracy: Option<f64>,
}
