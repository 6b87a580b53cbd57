//! Database operations for the `channels` table.
//!
//! Lookup is case-insensitive on `channel_id`; uniqueness is enforced by a
//! unique index on `LOWER(channel_id)`, so racing inserts for the same
//! identifier resolve in the store, not in application code.

use chrono::{DateTime, Utc};
use sigdb_core::{Channel, ChannelPatch, ChannelVerdict, Risk, Signal};
use sqlx::types::Json;
use sqlx::PgPool;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row type
// ---------------------------------------------------------------------------

/// A row from the `channels` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ChannelRow {
    pub id: i64,
    pub channel_id: String,
    pub name: String,
    pub avatar: Option<String>,
    pub subscribers: i64,
    pub description: Option<String>,
    pub verdict: String,
    pub is_static: bool,
    pub accuracy: Option<f64>,
    pub rating: Option<f64>,
    pub reviews: Option<i64>,
    pub risk: Option<String>,
    pub signals: Json<Vec<Signal>>,
    pub url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ChannelRow {
    /// Convert the stored row into the domain/wire shape. Unknown stored
    /// enum values degrade rather than failing the read path.
    #[must_use]
    pub fn into_channel(self) -> Channel {
        let risk = self.risk.as_deref().and_then(|r| match r {
            "Low" => Some(Risk::Low),
            "Medium" => Some(Risk::Medium),
            "High" => Some(Risk::High),
            _ => None,
        });
        Channel {
            channel_id: self.channel_id,
            name: self.name,
            avatar: self.avatar,
            subscribers: self.subscribers,
            description: self.description,
            verdict: ChannelVerdict::from_db(&self.verdict),
            is_static: self.is_static,
            accuracy: self.accuracy,
            rating: self.rating,
            reviews: self.reviews,
            risk,
            signals: self.signals.0,
            url: self.url,
        }
    }

    #[must_use]
    pub fn verdict(&self) -> ChannelVerdict {
        ChannelVerdict::from_db(&self.verdict)
    }
}

/// Input for a placeholder record created at intake, before analysis
/// completes. Verdict starts `undetermined`, subscribers at zero, with an
/// empty signal list.
#[derive(Debug, Clone)]
pub struct NewChannel {
    pub channel_id: String,
    pub name: String,
    pub avatar: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Returns the channel matching `channel_id` case-insensitively, or `None`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn find_channel(pool: &PgPool, channel_id: &str) -> Result<Option<ChannelRow>, DbError> {
    let row = sqlx::query_as::<_, ChannelRow>(
        "SELECT id, channel_id, name, avatar, subscribers, description, verdict, is_static, \
                accuracy, rating, reviews, risk, signals, url, created_at, updated_at \
         FROM channels \
         WHERE LOWER(channel_id) = LOWER($1)",
    )
    .bind(channel_id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Inserts a placeholder record for a just-submitted channel.
///
/// # Errors
///
/// Returns [`DbError::Duplicate`] if a record with the same normalized
/// identifier already exists (the losing side of a concurrent submission),
/// or [`DbError::Sqlx`] for any other failure.
pub async fn insert_placeholder(pool: &PgPool, new: &NewChannel) -> Result<ChannelRow, DbError> {
    let row = sqlx::query_as::<_, ChannelRow>(
        "INSERT INTO channels \
             (channel_id, name, avatar, subscribers, description, verdict, is_static, signals, url) \
         VALUES ($1, $2, $3, 0, $4, 'undetermined', false, '[]'::jsonb, $5) \
         RETURNING id, channel_id, name, avatar, subscribers, description, verdict, is_static, \
                   accuracy, rating, reviews, risk, signals, url, created_at, updated_at",
    )
    .bind(&new.channel_id)
    .bind(&new.name)
    .bind(&new.avatar)
    .bind(&new.description)
    .bind(&new.url)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// Applies a completed analysis to a channel, creating the record if the
/// callback arrived before the placeholder insert became visible.
///
/// `verdict` and `signals` are written unconditionally — each call replaces
/// the signal list wholesale, so a later analysis run produces the latest
/// snapshot rather than an accumulation. Display fields overlay the existing
/// row only when the patch provides them.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the upsert fails.
pub async fn upsert_analysis(
    pool: &PgPool,
    channel_id: &str,
    patch: &ChannelPatch,
) -> Result<ChannelRow, DbError> {
    let row = sqlx::query_as::<_, ChannelRow>(
        "INSERT INTO channels \
             (channel_id, name, avatar, subscribers, description, verdict, is_static, accuracy, signals) \
         VALUES ($1, COALESCE($2, $1), $3, COALESCE($4, 0), $5, $6, false, $7, $8) \
         ON CONFLICT (LOWER(channel_id)) DO UPDATE SET \
             verdict     = $6, \
             signals     = $8, \
             name        = COALESCE($2, channels.name), \
             avatar      = COALESCE($3, channels.avatar), \
             subscribers = COALESCE($4, channels.subscribers), \
             description = COALESCE($5, channels.description), \
             accuracy    = COALESCE($7, channels.accuracy), \
             updated_at  = NOW() \
         RETURNING id, channel_id, name, avatar, subscribers, description, verdict, is_static, \
                   accuracy, rating, reviews, risk, signals, url, created_at, updated_at",
    )
    .bind(channel_id)
    .bind(&patch.name)
    .bind(&patch.avatar)
    .bind(patch.subscribers)
    .bind(&patch.description)
    .bind(patch.verdict.as_str())
    .bind(patch.accuracy)
    .bind(Json(&patch.signals))
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// Deletes the channel matching `channel_id` case-insensitively.
///
/// Returns the deleted row, or `None` if no record matched — deleting an
/// absent channel is not an error.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn delete_channel(
    pool: &PgPool,
    channel_id: &str,
) -> Result<Option<ChannelRow>, DbError> {
    let row = sqlx::query_as::<_, ChannelRow>(
        "DELETE FROM channels \
         WHERE LOWER(channel_id) = LOWER($1) \
         RETURNING id, channel_id, name, avatar, subscribers, description, verdict, is_static, \
                   accuracy, rating, reviews, risk, signals, url, created_at, updated_at",
    )
    .bind(channel_id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Returns the full channel snapshot, unordered.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_channels(pool: &PgPool) -> Result<Vec<ChannelRow>, DbError> {
    let rows = sqlx::query_as::<_, ChannelRow>(
        "SELECT id, channel_id, name, avatar, subscribers, description, verdict, is_static, \
                accuracy, rating, reviews, risk, signals, url, created_at, updated_at \
         FROM channels",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
