//! Seeding of static demo channels.
//!
//! Static records are the curated channels the app ships with; they carry
//! `is_static = true` to distinguish them from user-submitted ones and are
//! the only records with populated rating/reviews/risk scoring.

use sigdb_core::{Risk, Signal, SignalDirection, SignalStatus};
use sqlx::types::Json;
use sqlx::PgPool;

use crate::DbError;

/// A static demo channel definition.
#[derive(Debug, Clone)]
pub struct SeedChannel {
    pub channel_id: String,
    pub name: String,
    pub avatar: String,
    pub subscribers: i64,
    pub description: String,
    pub risk: Risk,
    pub accuracy: f64,
    pub rating: f64,
    pub reviews: i64,
    pub signals: Vec<Signal>,
}

fn risk_str(risk: Risk) -> &'static str {
    match risk {
        Risk::Low => "Low",
        Risk::Medium => "Medium",
        Risk::High => "High",
    }
}

/// Upsert seed channels into the database.
///
/// Returns the number of channels processed. All upserts run inside a single
/// transaction; if any operation fails the entire batch is rolled back.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any database operation fails.
pub async fn seed_channels(pool: &PgPool, seeds: &[SeedChannel]) -> Result<usize, DbError> {
    let mut tx = pool.begin().await?;
    let mut count = 0usize;

    for seed in seeds {
        sqlx::query(
            "INSERT INTO channels \
                 (channel_id, name, avatar, subscribers, description, verdict, is_static, \
                  accuracy, rating, reviews, risk, signals) \
             VALUES ($1, $2, $3, $4, $5, 'accepted', true, $6, $7, $8, $9, $10) \
             ON CONFLICT (LOWER(channel_id)) DO UPDATE SET \
                 name        = EXCLUDED.name, \
                 avatar      = EXCLUDED.avatar, \
                 subscribers = EXCLUDED.subscribers, \
                 description = EXCLUDED.description, \
                 accuracy    = EXCLUDED.accuracy, \
                 rating      = EXCLUDED.rating, \
                 reviews     = EXCLUDED.reviews, \
                 risk        = EXCLUDED.risk, \
                 signals     = EXCLUDED.signals, \
                 updated_at  = NOW()",
        )
        .bind(&seed.channel_id)
        .bind(&seed.name)
        .bind(&seed.avatar)
        .bind(seed.subscribers)
        .bind(&seed.description)
        .bind(seed.accuracy)
        .bind(seed.rating)
        .bind(seed.reviews)
        .bind(risk_str(seed.risk))
        .bind(Json(&seed.signals))
        .execute(&mut *tx)
        .await?;

        count += 1;
    }

    tx.commit().await?;
    Ok(count)
}

fn signal(
    direction: SignalDirection,
    asset: &str,
    entry: f64,
    targets: Vec<f64>,
    stop_loss: f64,
    timestamp: &str,
    status: SignalStatus,
    pnl: Option<f64>,
) -> Signal {
    Signal {
        direction,
        asset: asset.to_owned(),
        entry,
        targets,
        stop_loss: Some(stop_loss),
        timestamp: timestamp.to_owned(),
        status,
        pnl,
    }
}

/// The built-in demo channel set.
#[must_use]
pub fn demo_channels() -> Vec<SeedChannel> {
    vec![
        SeedChannel {
            channel_id: "cryptopumpstation".to_owned(),
            name: "Crypto Pump Station".to_owned(),
            avatar: "https://placehold.co/100x100/7c3aed/white?text=PS".to_owned(),
            subscribers: 125_432,
            description: "Daily signals for top crypto pumps and short-term gains. \
                          High-risk, high-reward plays for experienced traders."
                .to_owned(),
            risk: Risk::High,
            accuracy: 75.0,
            rating: 4.5,
            reviews: 1200,
            signals: vec![
                signal(
                    SignalDirection::Long,
                    "DOGE",
                    0.15,
                    vec![0.16, 0.17],
                    0.14,
                    "2026-01-05T09:00:00Z",
                    SignalStatus::Active,
                    None,
                ),
                signal(
                    SignalDirection::Short,
                    "SHIB",
                    0.000_025,
                    vec![0.000_024, 0.000_023],
                    0.000_026,
                    "2026-01-04T10:00:00Z",
                    SignalStatus::Closed,
                    Some(8.5),
                ),
            ],
        },
        SeedChannel {
            channel_id: "whaleblockchainalerts".to_owned(),
            name: "Whale Blockchain Alerts".to_owned(),
            avatar: "https://placehold.co/100x100/1d4ed8/white?text=WA".to_owned(),
            subscribers: 512_899,
            description: "Real-time tracking of large cryptocurrency transactions. \
                          We analyze whale movements to predict market trends."
                .to_owned(),
            risk: Risk::Low,
            accuracy: 95.0,
            rating: 4.9,
            reviews: 2500,
            signals: vec![
                signal(
                    SignalDirection::Long,
                    "BTC",
                    68_000.0,
                    vec![70_000.0, 72_000.0],
                    67_000.0,
                    "2026-01-05T08:00:00Z",
                    SignalStatus::Active,
                    None,
                ),
                signal(
                    SignalDirection::Long,
                    "ETH",
                    3_800.0,
                    vec![3_900.0, 4_000.0],
                    3_750.0,
                    "2026-01-03T10:00:00Z",
                    SignalStatus::Closed,
                    Some(5.2),
                ),
            ],
        },
        SeedChannel {
            channel_id: "altcoinscalps".to_owned(),
            name: "Altcoin Scalps".to_owned(),
            avatar: "https://placehold.co/100x100/047857/white?text=AS".to_owned(),
            subscribers: 88_710,
            description: "Fast intraday scalps on mid-cap altcoins with tight stops."
                .to_owned(),
            risk: Risk::Medium,
            accuracy: 82.0,
            rating: 4.2,
            reviews: 640,
            signals: vec![signal(
                SignalDirection::Long,
                "SOL",
                145.0,
                vec![150.0, 155.0],
                141.0,
                "2026-01-05T11:30:00Z",
                SignalStatus::Active,
                None,
            )],
        },
    ]
}
