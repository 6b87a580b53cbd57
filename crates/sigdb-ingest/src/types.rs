//! Raw shapes delivered by the external analysis worker.
//!
//! The worker output is loosely typed: prices arrive as strings or numbers,
//! lists may be missing, and field presence varies by channel. Fields with
//! untrusted shapes are kept as `serde_json::Value` and interpreted in
//! [`crate::parse`] so a malformed item degrades instead of failing the
//! whole callback.

use serde::Deserialize;
use serde_json::Value;

/// One element of the callback's `analysisResult` array.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalysisResult {
    pub channel_info: Option<ChannelInfo>,
    #[serde(default)]
    pub signals: Value,
}

/// Channel metadata scraped by the worker.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChannelInfo {
    pub name: Option<String>,
    pub description: Option<String>,
    pub avatar: Option<String>,
    /// Usually a number, occasionally a numeric string.
    #[serde(default)]
    pub subscribers: Value,
    /// Percentage string such as `"85%"`, or a bare number.
    #[serde(default)]
    pub accuracy: Value,
}

/// One raw signal item as extracted from the channel's messages.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSignal {
    /// Message classification; only `"new"` items become signals.
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// `"long"`/`"short"` in any casing.
    pub direction: Option<String>,
    /// Ticker, e.g. `"#BTC/USDT"`.
    pub symbol: Option<String>,
    /// Price or `"low-high"` range, as string or number.
    #[serde(default)]
    pub entry: Value,
    /// Take-profit levels; expected to be an array of price-like values.
    #[serde(default)]
    pub tp: Value,
    /// Stop loss, as string or number.
    #[serde(default)]
    pub sl: Value,
    pub date: Option<String>,
    pub time: Option<String>,
}
