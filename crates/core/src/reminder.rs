//! Time rules of the session reminder pipeline.

use chrono::Duration;

use crate::types::Timestamp;

/// How far ahead planned sessions are considered for a reminder.
pub const LEAD_WINDOW_HOURS: i64 = 24;

/// Minimum spacing between two reminder batches for the same session.
pub const DEDUP_COOLDOWN_HOURS: i64 = 2;

/// Read notifications older than this are purged.
pub const NOTIFICATION_RETENTION_DAYS: i64 = 30;

/// Inactive push tokens older than this are purged.
pub const STALE_TOKEN_DAYS: i64 = 7;

/// Wording used in every reminder message. Single tier.
pub const REMINDER_LABEL: &str = "24 heures";

/// Upper bound (inclusive) of the candidate window starting at `now`.
pub fn lead_window_end(now: Timestamp) -> Timestamp {
    now + Duration::hours(LEAD_WINDOW_HOURS)
}

/// Reminders created at or after this instant block a new batch.
pub fn dedup_cutoff(now: Timestamp) -> Timestamp {
    now - Duration::hours(DEDUP_COOLDOWN_HOURS)
}

pub fn notification_retention_cutoff(now: Timestamp) -> Timestamp {
    now - Duration::days(NOTIFICATION_RETENTION_DAYS)
}

pub fn stale_token_cutoff(now: Timestamp) -> Timestamp {
    now - Duration::days(STALE_TOKEN_DAYS)
}

/// `true` when `scheduled_at` lies in `[now, now + 24h]`.
pub fn within_lead_window(scheduled_at: Timestamp, now: Timestamp) -> bool {
    scheduled_at >= now && scheduled_at <= lead_window_end(now)
}

/// Whole hours from `now` until `scheduled_at`, rounded up. Zero for past instants.
pub fn hours_until(scheduled_at: Timestamp, now: Timestamp) -> i64 {
    let millis = (scheduled_at - now).num_milliseconds();
    if millis <= 0 {
        return 0;
    }
    (millis + 3_599_999) / 3_600_000
}
