//! Normalization from raw analysis payloads to canonical [`Signal`]s and
//! channel patches.
//!
//! Normalization is total: malformed items are dropped or defaulted, never
//! errors — a bad signal in a batch must not fail the whole callback.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;
use sigdb_core::{ChannelPatch, ChannelVerdict, Signal, SignalDirection, SignalStatus};

use crate::parse::{
    combine_timestamp, normalize_asset, parse_accuracy, parse_entry_price, parse_price,
    parse_subscribers,
};
use crate::types::{AnalysisResult, RawSignal};

/// Normalizes one raw item into a canonical [`Signal`].
///
/// Returns `None` for items that are not fresh signals: anything not marked
/// `type == "new"` or lacking a symbol is filtered out, not an error.
/// `now` is the ingestion instant, used when the item carries no parseable
/// date/time of its own; passing it in keeps the function pure.
#[must_use]
pub fn normalize_signal(raw: &RawSignal, now: DateTime<Utc>) -> Option<Signal> {
    if raw.kind.as_deref() != Some("new") {
        return None;
    }
    let symbol = raw.symbol.as_deref().filter(|s| !s.trim().is_empty())?;

    let direction = match raw.direction.as_deref() {
        Some(d) if d.eq_ignore_ascii_case("short") => SignalDirection::Short,
        _ => SignalDirection::Long,
    };

    let targets = raw
        .tp
        .as_array()
        .map(|values| values.iter().filter_map(parse_price).collect())
        .unwrap_or_default();

    let timestamp = match (raw.date.as_deref(), raw.time.as_deref()) {
        (Some(date), Some(time)) => combine_timestamp(date, time).unwrap_or(now),
        _ => now,
    };

    Some(Signal {
        direction,
        asset: normalize_asset(symbol),
        entry: parse_entry_price(&raw.entry),
        targets,
        stop_loss: parse_price(&raw.sl),
        timestamp: timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
        status: SignalStatus::Active,
        pnl: None,
    })
}

/// Normalizes the worker's `signals` value (expected to be an array of raw
/// items) into canonical signals, dropping anything that fails the
/// new-with-symbol filter or isn't an object at all.
#[must_use]
pub fn normalize_signals(signals: &Value, now: DateTime<Utc>) -> Vec<Signal> {
    signals
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|item| serde_json::from_value::<RawSignal>(item.clone()).ok())
                .filter_map(|raw| normalize_signal(&raw, now))
                .collect()
        })
        .unwrap_or_default()
}

/// Builds the channel patch for an accepted analysis result.
///
/// The signal list replaces the stored one wholesale. Display metadata is
/// set only when `channel_info` is present; an empty scraped name falls back
/// to the normalized username.
#[must_use]
pub fn build_channel_patch(
    result: &AnalysisResult,
    fallback_name: &str,
    now: DateTime<Utc>,
) -> ChannelPatch {
    let mut patch = ChannelPatch {
        verdict: ChannelVerdict::Accepted,
        signals: normalize_signals(&result.signals, now),
        name: None,
        description: None,
        avatar: None,
        subscribers: None,
        accuracy: None,
    };

    if let Some(info) = &result.channel_info {
        patch.name = Some(
            info.name
                .clone()
                .filter(|n| !n.trim().is_empty())
                .unwrap_or_else(|| fallback_name.to_owned()),
        );
        patch.description = info.description.clone();
        patch.avatar = info.avatar.clone().filter(|a| !a.is_empty());
        patch.subscribers = parse_subscribers(&info.subscribers);
        patch.accuracy = parse_accuracy(&info.accuracy);
    }

    patch
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn ingest_instant() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 5, 12, 0, 0).unwrap()
    }

    fn raw(value: Value) -> RawSignal {
        serde_json::from_value(value).expect("raw signal shape")
    }

    // -----------------------------------------------------------------------
    // normalize_signal
    // -----------------------------------------------------------------------

    #[test]
    fn new_long_signal_is_normalized() {
        let signal = normalize_signal(
            &raw(json!({
                "type": "new",
                "direction": "Long",
                "symbol": "#BTC/USDT",
                "entry": "67000-69000",
                "tp": ["70000", 72000],
                "sl": "66000",
                "date": "2026-01-05",
                "time": "10:30"
            })),
            ingest_instant(),
        )
        .expect("kept");

        assert_eq!(signal.direction, SignalDirection::Long);
        assert_eq!(signal.asset, "BTC");
        assert_eq!(signal.entry, 68_000.0);
        assert_eq!(signal.targets, vec![70_000.0, 72_000.0]);
        assert_eq!(signal.stop_loss, Some(66_000.0));
        assert_eq!(signal.timestamp, "2026-01-05T10:30:00.000Z");
        assert_eq!(signal.status, SignalStatus::Active);
        assert!(signal.pnl.is_none());
    }

    #[test]
    fn short_direction_any_casing() {
        let signal = normalize_signal(
            &raw(json!({"type": "new", "symbol": "ETH", "direction": "SHORT"})),
            ingest_instant(),
        )
        .expect("kept");
        assert_eq!(signal.direction, SignalDirection::Short);
    }

    #[test]
    fn missing_direction_defaults_to_long() {
        let signal = normalize_signal(
            &raw(json!({"type": "new", "symbol": "ETH"})),
            ingest_instant(),
        )
        .expect("kept");
        assert_eq!(signal.direction, SignalDirection::Long);
    }

    #[test]
    fn non_new_item_is_dropped() {
        assert!(normalize_signal(
            &raw(json!({"type": "update", "symbol": "BTC"})),
            ingest_instant()
        )
        .is_none());
    }

    #[test]
    fn missing_symbol_is_dropped() {
        assert!(normalize_signal(&raw(json!({"type": "new"})), ingest_instant()).is_none());
        assert!(
            normalize_signal(&raw(json!({"type": "new", "symbol": ""})), ingest_instant())
                .is_none()
        );
    }

    #[test]
    fn missing_date_or_time_falls_back_to_ingestion_instant() {
        let signal = normalize_signal(
            &raw(json!({"type": "new", "symbol": "BTC", "date": "2026-01-05"})),
            ingest_instant(),
        )
        .expect("kept");
        assert_eq!(signal.timestamp, "2026-01-05T12:00:00.000Z");
    }

    #[test]
    fn unparseable_date_falls_back_to_ingestion_instant() {
        let signal = normalize_signal(
            &raw(json!({
                "type": "new", "symbol": "BTC",
                "date": "yesterday", "time": "noon"
            })),
            ingest_instant(),
        )
        .expect("kept");
        assert_eq!(signal.timestamp, "2026-01-05T12:00:00.000Z");
    }

    #[test]
    fn malformed_fields_degrade_to_defaults() {
        let signal = normalize_signal(
            &raw(json!({
                "type": "new",
                "symbol": "BTC",
                "entry": "abc",
                "tp": "not-a-list",
                "sl": {"weird": true}
            })),
            ingest_instant(),
        )
        .expect("kept");
        assert_eq!(signal.entry, 0.0);
        assert!(signal.targets.is_empty());
        assert!(signal.stop_loss.is_none());
    }

    // -----------------------------------------------------------------------
    // normalize_signals
    // -----------------------------------------------------------------------

    #[test]
    fn batch_filters_and_keeps_order() {
        let signals = normalize_signals(
            &json!([
                {"type": "new", "symbol": "#BTC/USDT"},
                {"type": "update", "symbol": "#ETH/USDT"},
                "not an object",
                {"type": "new", "symbol": "#SOL/USDT"}
            ]),
            ingest_instant(),
        );
        let assets: Vec<_> = signals.iter().map(|s| s.asset.as_str()).collect();
        assert_eq!(assets, vec!["BTC", "SOL"]);
    }

    #[test]
    fn non_array_signals_value_yields_empty() {
        assert!(normalize_signals(&Value::Null, ingest_instant()).is_empty());
        assert!(normalize_signals(&json!("nope"), ingest_instant()).is_empty());
    }

    // -----------------------------------------------------------------------
    // build_channel_patch
    // -----------------------------------------------------------------------

    #[test]
    fn patch_with_channel_info_overlays_metadata() {
        let result: AnalysisResult = serde_json::from_value(json!({
            "channel_info": {
                "name": "Example Signals",
                "description": "Premium calls",
                "avatar": "https://cdn.example.com/a.png",
                "subscribers": 12345,
                "accuracy": "85%"
            },
            "signals": [{"type": "new", "symbol": "#BTC/USDT"}]
        }))
        .expect("result shape");

        let patch = build_channel_patch(&result, "examplechan", ingest_instant());
        assert_eq!(patch.verdict, ChannelVerdict::Accepted);
        assert_eq!(patch.name.as_deref(), Some("Example Signals"));
        assert_eq!(patch.subscribers, Some(12_345));
        assert_eq!(patch.accuracy, Some(85.0));
        assert_eq!(patch.signals.len(), 1);
    }

    #[test]
    fn patch_empty_name_falls_back_to_username() {
        let result: AnalysisResult = serde_json::from_value(json!({
            "channel_info": {"name": ""},
            "signals": []
        }))
        .expect("result shape");

        let patch = build_channel_patch(&result, "examplechan", ingest_instant());
        assert_eq!(patch.name.as_deref(), Some("examplechan"));
        assert!(patch.accuracy.is_none());
    }

    #[test]
    fn patch_without_channel_info_sets_no_metadata() {
        let result: AnalysisResult = serde_json::from_value(json!({
            "signals": [{"type": "new", "symbol": "BTC"}]
        }))
        .expect("result shape");

        let patch = build_channel_patch(&result, "examplechan", ingest_instant());
        assert!(patch.name.is_none());
        assert!(patch.subscribers.is_none());
        assert_eq!(patch.signals.len(), 1);
    }
}
