//! Per-user notification preferences.

use std::sync::Arc;

use trainhub_core::settings::{NotificationSettings, UpdateNotificationSettings};
use trainhub_core::types::DbId;

use crate::error::NotifyResult;
use crate::store::SettingsStore;

#[derive(Clone)]
pub struct SettingsResolver {
    store: Arc<dyn SettingsStore>,
}

impl SettingsResolver {
    pub fn new(store: Arc<dyn SettingsStore>) -> Self {
        Self { store }
    }

    /// Effective settings for `user_id`.
    ///
    /// A user without a row gets the defaults persisted. If storage fails the
    /// defaults are returned without being stored, so generation never stops
    /// on a settings lookup.
    pub async fn resolve(&self, user_id: DbId) -> NotificationSettings {
        match self.store.get_or_create(user_id).await {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!(
                    user_id,
                    error = %e,
                    "Failed to load notification settings, using defaults"
                );
                NotificationSettings::defaults_for(user_id)
            }
        }
    }

    /// Apply a partial update. Validation failures leave storage untouched.
    pub async fn update(
        &self,
        user_id: DbId,
        update: &UpdateNotificationSettings,
    ) -> NotifyResult<NotificationSettings> {
        let mut settings = self.store.get_or_create(user_id).await?;
        settings.apply(update)?;
        let saved = self.store.save(&settings).await?;
        tracing::info!(user_id, "Notification settings updated");
        Ok(saved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NotifyError;
    use crate::store::MemoryStore;
    use assert_matches::assert_matches;
    use trainhub_core::error::CoreError;

    #[tokio::test]
    async fn resolve_persists_defaults_once() {
        let store = Arc::new(MemoryStore::new());
        let resolver = SettingsResolver::new(store.clone());

        assert!(store.stored_settings(7).is_none());
        let settings = resolver.resolve(7).await;
        assert_eq!(settings, NotificationSettings::defaults_for(7));
        assert_eq!(store.stored_settings(7), Some(settings));
    }

    #[tokio::test]
    async fn resolve_falls_back_when_storage_fails() {
        let store = Arc::new(MemoryStore::new());
        store.fail_settings(true);
        let resolver = SettingsResolver::new(store.clone());

        let settings = resolver.resolve(3).await;
        assert_eq!(settings, NotificationSettings::defaults_for(3));
        store.fail_settings(false);
        assert!(store.stored_settings(3).is_none());
    }

    #[tokio::test]
    async fn update_rejects_invalid_hours() {
        let store = Arc::new(MemoryStore::new());
        let resolver = SettingsResolver::new(store.clone());
        let update = UpdateNotificationSettings {
            reminder_hours: Some(72),
            ..Default::default()
        };

        let result = resolver.update(1, &update).await;
        assert_matches!(result, Err(NotifyError::Core(CoreError::Validation(_))));
        assert_eq!(store.stored_settings(1).map(|s| s.reminder_hours), Some(24));
    }

    #[tokio::test]
    async fn update_saves_changes() {
        let store = Arc::new(MemoryStore::new());
        let resolver = SettingsResolver::new(store.clone());
        let update = UpdateNotificationSettings {
            session_reminders: Some(false),
            ..Default::default()
        };

        let saved = resolver.update(1, &update).await.unwrap();
        assert!(!saved.session_reminders);
        assert!(!resolver.resolve(1).await.session_reminders);
    }
}
