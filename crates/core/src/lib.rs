//! Domain types and pure rules for the trainhub notification pipeline.
//!
//! Nothing in this crate performs I/O. Persistence lives in `trainhub-db`
//! and orchestration in `trainhub-notify`.

pub mod clock;
pub mod error;
pub mod notification;
pub mod push;
pub mod reminder;
pub mod roles;
pub mod session;
pub mod settings;
pub mod types;
