//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument.

pub mod club_repo;
pub mod notification_repo;
pub mod notification_settings_repo;
pub mod push_token_repo;
pub mod session_repo;

pub use club_repo::ClubRepo;
pub use notification_repo::NotificationRepo;
pub use notification_settings_repo::NotificationSettingsRepo;
pub use push_token_repo::PushTokenRepo;
pub use session_repo::SessionRepo;
