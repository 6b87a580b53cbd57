//! Live integration tests for sigdb-db using `#[sqlx::test]`.
//!
//! Each test gets a fresh, fully-migrated Postgres database spun up by the
//! sqlx test harness. The `migrations` path is relative to the crate root
//! (`crates/sigdb-db/`), so `"../../migrations"` resolves to the workspace
//! migration directory.

use sigdb_core::{ChannelPatch, ChannelVerdict, Signal, SignalDirection, SignalStatus};
use sigdb_db::{
    delete_channel, demo_channels, find_channel, insert_placeholder, list_channels, seed_channels,
    upsert_analysis, DbError, NewChannel,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn placeholder(channel_id: &str) -> NewChannel {
    NewChannel {
        channel_id: channel_id.to_owned(),
        name: channel_id.to_owned(),
        avatar: Some("https://cdn.example.com/telegram.png".to_owned()),
        description: Some("Analysis in progress...".to_owned()),
        url: Some(format!("https://t.me/{channel_id}")),
    }
}

fn btc_signal() -> Signal {
    Signal {
        direction: SignalDirection::Long,
        asset: "BTC".to_owned(),
        entry: 68_000.0,
        targets: vec![70_000.0, 72_000.0],
        stop_loss: Some(67_000.0),
        timestamp: "2026-01-05T10:00:00Z".to_owned(),
        status: SignalStatus::Active,
        pnl: None,
    }
}

fn accepted_patch(signals: Vec<Signal>) -> ChannelPatch {
    ChannelPatch {
        verdict: ChannelVerdict::Accepted,
        signals,
        name: Some("Example Signals".to_owned()),
        description: Some("Premium futures calls".to_owned()),
        avatar: Some("https://cdn.example.com/avatar.png".to_owned()),
        subscribers: Some(12_345),
        accuracy: Some(85.0),
    }
}

// ---------------------------------------------------------------------------
// Placeholder insert + lookup
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn insert_placeholder_then_find(pool: sqlx::PgPool) {
    let row = insert_placeholder(&pool, &placeholder("examplechan"))
        .await
        .expect("insert placeholder");
    assert_eq!(row.channel_id, "examplechan");
    assert_eq!(row.verdict(), ChannelVerdict::Undetermined);
    assert_eq!(row.subscribers, 0);
    assert!(row.signals.0.is_empty());
    assert!(!row.is_static);

    let found = find_channel(&pool, "examplechan")
        .await
        .expect("find")
        .expect("row present");
    assert_eq!(found.id, row.id);
}

#[sqlx::test(migrations = "../../migrations")]
async fn find_channel_is_case_insensitive(pool: sqlx::PgPool) {
    insert_placeholder(&pool, &placeholder("examplechan"))
        .await
        .expect("insert placeholder");

    let found = find_channel(&pool, "ExampleChan")
        .await
        .expect("find")
        .expect("row present despite case difference");
    assert_eq!(found.channel_id, "examplechan");
}

#[sqlx::test(migrations = "../../migrations")]
async fn duplicate_insert_maps_to_duplicate_error(pool: sqlx::PgPool) {
    insert_placeholder(&pool, &placeholder("examplechan"))
        .await
        .expect("first insert");

    let err = insert_placeholder(&pool, &placeholder("examplechan"))
        .await
        .expect_err("second insert must fail");
    assert!(matches!(err, DbError::Duplicate), "got: {err:?}");
}

#[sqlx::test(migrations = "../../migrations")]
async fn duplicate_detection_is_case_insensitive(pool: sqlx::PgPool) {
    insert_placeholder(&pool, &placeholder("examplechan"))
        .await
        .expect("first insert");

    // Same identifier in different case races against the stored row.
    let err = insert_placeholder(&pool, &placeholder("ExampleChan"))
        .await
        .expect_err("case-variant insert must fail");
    assert!(matches!(err, DbError::Duplicate), "got: {err:?}");

    let all = list_channels(&pool).await.expect("list");
    assert_eq!(all.len(), 1, "exactly one record per normalized id");
}

// ---------------------------------------------------------------------------
// Analysis upsert
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn upsert_analysis_updates_placeholder(pool: sqlx::PgPool) {
    insert_placeholder(&pool, &placeholder("examplechan"))
        .await
        .expect("insert placeholder");

    let row = upsert_analysis(&pool, "examplechan", &accepted_patch(vec![btc_signal()]))
        .await
        .expect("upsert");

    assert_eq!(row.verdict(), ChannelVerdict::Accepted);
    assert_eq!(row.name, "Example Signals");
    assert_eq!(row.subscribers, 12_345);
    assert_eq!(row.accuracy, Some(85.0));
    assert_eq!(row.signals.0.len(), 1);
    assert_eq!(row.signals.0[0].asset, "BTC");

    let all = list_channels(&pool).await.expect("list");
    assert_eq!(all.len(), 1, "upsert must not create a second row");
}

#[sqlx::test(migrations = "../../migrations")]
async fn upsert_analysis_creates_when_callback_beats_placeholder(pool: sqlx::PgPool) {
    // Out-of-order delivery: the callback lands before any placeholder insert.
    let row = upsert_analysis(&pool, "examplechan", &accepted_patch(vec![btc_signal()]))
        .await
        .expect("upsert");

    assert_eq!(row.channel_id, "examplechan");
    assert_eq!(row.verdict(), ChannelVerdict::Accepted);
    assert_eq!(row.signals.0.len(), 1);
}

#[sqlx::test(migrations = "../../migrations")]
async fn upsert_analysis_replaces_signals_wholesale(pool: sqlx::PgPool) {
    upsert_analysis(&pool, "examplechan", &accepted_patch(vec![btc_signal()]))
        .await
        .expect("first upsert");

    let eth = Signal {
        asset: "ETH".to_owned(),
        entry: 3_800.0,
        targets: vec![3_900.0],
        ..btc_signal()
    };
    let row = upsert_analysis(&pool, "examplechan", &accepted_patch(vec![eth]))
        .await
        .expect("second upsert");

    // The previous BTC signal is gone: latest snapshot, not accumulation.
    assert_eq!(row.signals.0.len(), 1);
    assert_eq!(row.signals.0[0].asset, "ETH");
}

#[sqlx::test(migrations = "../../migrations")]
async fn upsert_analysis_is_idempotent(pool: sqlx::PgPool) {
    let patch = accepted_patch(vec![btc_signal()]);

    let first = upsert_analysis(&pool, "examplechan", &patch)
        .await
        .expect("first upsert");
    let second = upsert_analysis(&pool, "examplechan", &patch)
        .await
        .expect("second upsert");

    assert_eq!(first.id, second.id);
    assert_eq!(first.name, second.name);
    assert_eq!(first.signals.0, second.signals.0);
    assert_eq!(first.accuracy, second.accuracy);
}

#[sqlx::test(migrations = "../../migrations")]
async fn upsert_analysis_sparse_patch_preserves_existing_fields(pool: sqlx::PgPool) {
    upsert_analysis(&pool, "examplechan", &accepted_patch(vec![btc_signal()]))
        .await
        .expect("first upsert");

    // A later callback without channel_info still replaces signals but keeps
    // the previously stored display metadata.
    let sparse = ChannelPatch {
        verdict: ChannelVerdict::Accepted,
        signals: vec![],
        name: None,
        description: None,
        avatar: None,
        subscribers: None,
        accuracy: None,
    };
    let row = upsert_analysis(&pool, "examplechan", &sparse)
        .await
        .expect("sparse upsert");

    assert!(row.signals.0.is_empty(), "signals replaced wholesale");
    assert_eq!(row.name, "Example Signals", "name preserved");
    assert_eq!(row.subscribers, 12_345, "subscribers preserved");
    assert_eq!(row.accuracy, Some(85.0), "accuracy preserved");
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn delete_channel_returns_row_then_none(pool: sqlx::PgPool) {
    insert_placeholder(&pool, &placeholder("examplechan"))
        .await
        .expect("insert placeholder");

    let deleted = delete_channel(&pool, "ExampleChan")
        .await
        .expect("delete")
        .expect("row deleted despite case difference");
    assert_eq!(deleted.channel_id, "examplechan");

    let again = delete_channel(&pool, "examplechan").await.expect("delete");
    assert!(again.is_none(), "second delete is a no-op, not an error");
}

// ---------------------------------------------------------------------------
// Seeds
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn seed_channels_inserts_demo_set_idempotently(pool: sqlx::PgPool) {
    let seeds = demo_channels();
    let count = seed_channels(&pool, &seeds).await.expect("seed");
    assert_eq!(count, seeds.len());

    // Re-seeding updates in place rather than duplicating.
    seed_channels(&pool, &seeds).await.expect("re-seed");
    let all = list_channels(&pool).await.expect("list");
    assert_eq!(all.len(), seeds.len());

    let pump = find_channel(&pool, "cryptopumpstation")
        .await
        .expect("find")
        .expect("seed present");
    assert!(pump.is_static);
    assert_eq!(pump.verdict(), ChannelVerdict::Accepted);
    assert_eq!(pump.risk.as_deref(), Some("High"));
    assert_eq!(pump.signals.0.len(), 2);
}
