//! Settings persistence.

use std::path::PathBuf;

use tokio::sync::RwLock;

use aptaview_core::Result;
use aptaview_core::settings::{Settings, Theme};

use crate::storage::TomlStore;

/// Loads, caches and persists the user settings.
///
/// The file is removed once every value is back at its default, so a
/// fresh profile stays fileless. Mutations take the store's
/// cross-process lock and re-read from disk before applying.
pub struct SettingsService {
    store: TomlStore<Settings>,
    cache: RwLock<Option<Settings>>,
}

impl SettingsService {
    pub fn new(settings_file: impl Into<PathBuf>) -> Self {
        Self {
            store: TomlStore::new(settings_file.into()),
            cache: RwLock::new(None),
        }
    }

    /// Current settings, loading from disk on first access.
    pub async fn settings(&self) -> Result<Settings> {
        if let Some(settings) = self.cache.read().await.as_ref() {
            return Ok(settings.clone());
        }

        let mut cache = self.cache.write().await;
        if let Some(settings) = cache.as_ref() {
            return Ok(settings.clone());
        }

        let loaded = self.store.load()?.unwrap_or_default();
        tracing::debug!("Loaded settings from {}", self.store.path().display());
        *cache = Some(loaded.clone());
        Ok(loaded)
    }

    pub async fn backend_url(&self) -> Result<String> {
        Ok(self.settings().await?.backend_url)
    }

    pub async fn theme(&self) -> Result<Theme> {
        Ok(self.settings().await?.theme)
    }

    /// Sets the backend URL. The raw value is trimmed; an empty entry
    /// falls back to the default URL.
    pub async fn set_backend_url(&self, raw: &str) -> Result<Settings> {
        let url = Settings::normalize_backend_url(raw);
        self.mutate(move |settings| settings.backend_url = url).await
    }

    pub async fn set_theme(&self, theme: Theme) -> Result<Settings> {
        self.mutate(move |settings| settings.theme = theme).await
    }

    /// Restores every setting to its default and removes the file.
    pub async fn reset(&self) -> Result<Settings> {
        let mut cache = self.cache.write().await;
        let _lock = self.store.lock()?;
        self.store.remove()?;
        tracing::info!("Settings reset to defaults");

        let settings = Settings::default();
        *cache = Some(settings.clone());
        Ok(settings)
    }

    async fn mutate(&self, apply: impl FnOnce(&mut Settings)) -> Result<Settings> {
        let mut cache = self.cache.write().await;
        let _lock = self.store.lock()?;

        let mut settings = self.store.load()?.unwrap_or_default();
        apply(&mut settings);

        if settings.is_default() {
            self.store.remove()?;
        } else {
            self.store.save(&settings)?;
        }

        *cache = Some(settings.clone());
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aptaview_core::settings::DEFAULT_BACKEND_URL;
    use tempfile::TempDir;

    fn service(dir: &TempDir) -> SettingsService {
        SettingsService::new(dir.path().join("settings.toml"))
    }

    fn settings_path(dir: &TempDir) -> std::path::PathBuf {
        dir.path().join("settings.toml")
    }

    #[tokio::test]
    async fn defaults_without_a_file() {
        let dir = TempDir::new().unwrap();
        let service = service(&dir);

        let settings = service.settings().await.unwrap();
        assert_eq!(settings.backend_url, DEFAULT_BACKEND_URL);
        assert_eq!(settings.theme, Theme::Auto);
        assert!(!settings_path(&dir).exists());
    }

    #[tokio::test]
    async fn backend_url_survives_a_new_service() {
        let dir = TempDir::new().unwrap();
        {
            let service = service(&dir);
            service.set_backend_url(" http://lab:9000 ").await.unwrap();
        }

        let service = service(&dir);
        assert_eq!(service.backend_url().await.unwrap(), "http://lab:9000");
    }

    #[tokio::test]
    async fn clearing_the_url_removes_the_file() {
        let dir = TempDir::new().unwrap();
        let service = service(&dir);

        service.set_backend_url("http://lab:9000").await.unwrap();
        assert!(settings_path(&dir).exists());

        service.set_backend_url("   ").await.unwrap();
        assert_eq!(service.backend_url().await.unwrap(), DEFAULT_BACKEND_URL);
        assert!(!settings_path(&dir).exists());
    }

    #[tokio::test]
    async fn non_default_theme_keeps_the_file() {
        let dir = TempDir::new().unwrap();
        let service = service(&dir);

        service.set_theme(Theme::Dark).await.unwrap();
        service.set_backend_url("").await.unwrap();
        assert!(settings_path(&dir).exists());

        let settings = service.settings().await.unwrap();
        assert_eq!(settings.theme, Theme::Dark);
        assert_eq!(settings.backend_url, DEFAULT_BACKEND_URL);
    }

    #[tokio::test]
    async fn reset_restores_defaults_and_removes_the_file() {
        let dir = TempDir::new().unwrap();
        let service = service(&dir);

        service.set_backend_url("http://lab:9000").await.unwrap();
        service.set_theme(Theme::Light).await.unwrap();

        let settings = service.reset().await.unwrap();
        assert!(settings.is_default());
        assert!(!settings_path(&dir).exists());
        assert_eq!(service.theme().await.unwrap(), Theme::Auto);
    }
}
