//! Background jobs of the pipeline.
//!
//! | job                    | cadence              |
//! |------------------------|----------------------|
//! | reminder cycle         | every 30 minutes     |
//! | notification cleanup   | daily at 03:00 UTC   |
//! | push token cleanup     | daily at 04:00 UTC   |
//!
//! Each job runs in its own task and reads `now` from the injected
//! [`Clock`]. A job never overlaps itself: a run that finds the previous one
//! still active is skipped. Manual triggers go through the same guard.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{Days, NaiveTime};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use trainhub_core::clock::Clock;
use trainhub_core::types::Timestamp;

use crate::error::{NotifyError, NotifyResult};
use crate::service::{NotificationService, ReminderRunReport};

pub const REMINDER_JOB: &str = "session_reminders";
pub const NOTIFICATION_CLEANUP_JOB: &str = "notification_cleanup";
pub const TOKEN_CLEANUP_JOB: &str = "push_token_cleanup";

#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    pub reminder_interval: Duration,
    /// UTC hour of the daily notification cleanup.
    pub notification_cleanup_hour: u32,
    /// UTC hour of the daily push token cleanup.
    pub token_cleanup_hour: u32,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            reminder_interval: Duration::from_secs(30 * 60),
            notification_cleanup_hour: 3,
            token_cleanup_hour: 4,
        }
    }
}

/// The first `hour:00` UTC strictly after `now`.
pub fn next_daily_run(now: Timestamp, hour: u32) -> Timestamp {
    let at = NaiveTime::from_hms_opt(hour.min(23), 0, 0).unwrap_or(NaiveTime::MIN);
    let today = now.date_naive().and_time(at).and_utc();
    if today > now {
        today
    } else {
        today.checked_add_days(Days::new(1)).unwrap_or(today)
    }
}

#[derive(Clone)]
pub struct Scheduler {
    service: NotificationService,
    clock: Arc<dyn Clock>,
    config: SchedulerConfig,
    reminder_guard: Arc<Mutex<()>>,
    notification_cleanup_guard: Arc<Mutex<()>>,
    token_cleanup_guard: Arc<Mutex<()>>,
}

impl Scheduler {
    pub fn new(
        service: NotificationService,
        clock: Arc<dyn Clock>,
        config: SchedulerConfig,
    ) -> Self {
        Self {
            service,
            clock,
            config,
            reminder_guard: Arc::default(),
            notification_cleanup_guard: Arc::default(),
            token_cleanup_guard: Arc::default(),
        }
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    // -- Single runs ----------------------------------------------------------

    pub async fn run_reminders_once(&self) -> NotifyResult<ReminderRunReport> {
        let now = self.clock.now();
        let service = &self.service;
        guarded(&self.reminder_guard, REMINDER_JOB, service.run_reminder_cycle(now)).await
    }

    pub async fn run_notification_cleanup_once(&self) -> NotifyResult<u64> {
        let now = self.clock.now();
        let service = &self.service;
        guarded(
            &self.notification_cleanup_guard,
            NOTIFICATION_CLEANUP_JOB,
            service.cleanup_notifications(now),
        )
        .await
    }

    pub async fn run_token_cleanup_once(&self) -> NotifyResult<u64> {
        let now = self.clock.now();
        let service = &self.service;
        guarded(
            &self.token_cleanup_guard,
            TOKEN_CLEANUP_JOB,
            service.cleanup_push_tokens(now),
        )
        .await
    }

    // -- Background loops -----------------------------------------------------

    /// Start the three job loops. They stop when `cancel` fires.
    pub fn spawn(&self, cancel: CancellationToken) -> Vec<JoinHandle<()>> {
        let reminders = {
            let this = self.clone();
            let cancel = cancel.clone();
            tokio::spawn(async move { this.reminder_loop(cancel).await })
        };
        let notification_cleanup = {
            let this = self.clone();
            let cancel = cancel.clone();
            let hour = self.config.notification_cleanup_hour;
            tokio::spawn(async move {
                this.daily_loop(NOTIFICATION_CLEANUP_JOB, hour, cancel, |s| async move {
                    s.run_notification_cleanup_once().await
                })
                .await
            })
        };
        let token_cleanup = {
            let this = self.clone();
            let hour = self.config.token_cleanup_hour;
            tokio::spawn(async move {
                this.daily_loop(TOKEN_CLEANUP_JOB, hour, cancel, |s| async move {
                    s.run_token_cleanup_once().await
                })
                .await
            })
        };
        vec![reminders, notification_cleanup, token_cleanup]
    }

    async fn reminder_loop(&self, cancel: CancellationToken) {
        tracing::info!(
            interval_secs = self.config.reminder_interval.as_secs(),
            "Reminder job started"
        );
        let mut interval = tokio::time::interval(self.config.reminder_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Reminder job stopping");
                    break;
                }
                _ = interval.tick() => {
                    if let Err(e) = self.run_reminders_once().await {
                        log_job_error(REMINDER_JOB, &e);
                    }
                }
            }
        }
    }

    async fn daily_loop<F, Fut>(
        &self,
        job: &'static str,
        hour: u32,
        cancel: CancellationToken,
        run: F,
    ) where
        F: Fn(Scheduler) -> Fut,
        Fut: Future<Output = NotifyResult<u64>>,
    {
        tracing::info!(job, hour, "Daily job started");

        loop {
            let now = self.clock.now();
            let next = next_daily_run(now, hour);
            let wait = (next - now).to_std().unwrap_or_default();
            tracing::debug!(job, next_run = %next, "Daily job scheduled");

            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!(job, "Daily job stopping");
                    break;
                }
                _ = tokio::time::sleep(wait) => {
                    match run(self.clone()).await {
                        Ok(deleted) => tracing::info!(job, deleted, "Daily job finished"),
                        Err(e) => log_job_error(job, &e),
                    }
                }
            }
        }
    }
}

/// Run `fut` unless the job holding `guard` is already running.
async fn guarded<T>(
    guard: &Mutex<()>,
    job: &'static str,
    fut: impl Future<Output = NotifyResult<T>>,
) -> NotifyResult<T> {
    let Ok(_running) = guard.try_lock() else {
        return Err(NotifyError::AlreadyRunning(job));
    };
    fut.await
}

fn log_job_error(job: &'static str, error: &NotifyError) {
    match error {
        NotifyError::AlreadyRunning(_) => {
            tracing::warn!(job, "Previous run still active, skipping tick")
        }
        e => tracing::error!(job, error = %e, "Scheduled job failed"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn next_run_later_today() {
        let now = Utc.with_ymd_and_hms(2024, 3, 4, 1, 15, 0).unwrap();
        assert_eq!(
            next_daily_run(now, 3),
            Utc.with_ymd_and_hms(2024, 3, 4, 3, 0, 0).unwrap()
        );
    }

    #[test]
    fn next_run_rolls_to_tomorrow() {
        let now = Utc.with_ymd_and_hms(2024, 3, 31, 3, 0, 0).unwrap();
        assert_eq!(
            next_daily_run(now, 3),
            Utc.with_ymd_and_hms(2024, 4, 1, 3, 0, 0).unwrap()
        );
        let now = Utc.with_ymd_and_hms(2024, 3, 4, 22, 0, 0).unwrap();
        assert_eq!(
            next_daily_run(now, 4),
            Utc.with_ymd_and_hms(2024, 3, 5, 4, 0, 0).unwrap()
        );
    }

    #[tokio::test]
    async fn guard_rejects_overlapping_run() {
        let guard = Mutex::new(());
        let _held = guard.lock().await;
        let result = guarded(&guard, REMINDER_JOB, async { Ok(1) }).await;
        assert!(matches!(result, Err(NotifyError::AlreadyRunning(REMINDER_JOB))));
    }

    #[tokio::test]
    async fn guard_runs_when_free() {
        let guard = Mutex::new(());
        let result = guarded(&guard, REMINDER_JOB, async { Ok(7) }).await;
        assert_eq!(result.unwrap(), 7);
    }
}
