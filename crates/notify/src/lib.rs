//! Session reminder and club notification pipeline.
//!
//! Data flows leaf-first through:
//!
//! - [`reminders::CandidateFinder`] -- planned sessions inside the lead window.
//! - [`reminders::DedupGuard`] -- skips sessions reminded within the cooldown.
//! - [`settings::SettingsResolver`] -- per-user preferences with lazy defaults.
//! - [`generator::NotificationGenerator`] -- one stored notification per recipient.
//! - [`dispatcher::PushDispatcher`] -- fans a notification out to active device tokens.
//! - [`tokens::PushTokenRegistry`] -- device tokens, one active per platform.
//! - [`scheduler::Scheduler`] -- periodic reminder cycle and cleanup jobs.
//!
//! [`service::NotificationService`] wires them together. Storage sits behind
//! the traits in [`store`], with PostgreSQL and in-memory implementations.

pub mod dispatcher;
pub mod error;
pub mod generator;
pub mod push;
pub mod reminders;
pub mod scheduler;
pub mod service;
pub mod settings;
pub mod store;
pub mod tokens;

pub use error::{NotifyError, NotifyResult};
pub use scheduler::{Scheduler, SchedulerConfig};
pub use service::{ClubEvent, NotificationService, ReminderRunReport};
pub use store::Stores;
