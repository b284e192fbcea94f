/// Capture — best-effort persistence of visitor emails and feedback.
///
/// The sink is never on the critical path: every failure (no pool configured,
/// connection down, insert error) is logged and swallowed, and the user-facing
/// operation still reports success.
pub mod handlers;

use chrono::Utc;
use sqlx::PgPool;
use tracing::{info, warn};

/// Append-only sink for captured emails and feedback ratings.
#[derive(Clone)]
pub struct CaptureSink {
    pool: Option<PgPool>,
}

impl CaptureSink {
    pub fn new(pool: Option<PgPool>) -> Self {
        Self { pool }
    }

    /// Sink with no backing store; everything is logged and dropped.
    pub fn disabled() -> Self {
        Self { pool: None }
    }

    pub async fn save_email(&self, email: &str) {
        let Some(pool) = &self.pool else {
            info!("email received (capture store not configured, not persisted)");
            return;
        };

        let result = sqlx::query("INSERT INTO emails (email, created_at) VALUES ($1, $2)")
            .bind(email)
            .bind(Utc::now())
            .execute(pool)
            .await;

        match result {
            Ok(_) => info!("visitor email captured"),
            Err(e) => warn!("failed to persist captured email: {e}"),
        }
    }

    pub async fn save_feedback(&self, rating: i16, comment: &str, email: &str) {
        let Some(pool) = &self.pool else {
            info!(rating, "feedback received (capture store not configured, not persisted)");
            return;
        };

        let result = sqlx::query(
            "INSERT INTO feedback (rating, comment, email, created_at) VALUES ($1, $2, $3, $4)",
        )
        .bind(rating)
        .bind(comment)
        .bind(email)
        .bind(Utc::now())
        .execute(pool)
        .await;

        match result {
            Ok(_) => info!(rating, "feedback captured"),
            Err(e) => warn!("failed to persist feedback: {e}"),
        }
    }
}
