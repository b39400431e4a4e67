use crate::config::PluginConfig;
use crate::messages::MessageStore;
use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::info;

/// Configuration and messages, loaded and replaced as one unit.
#[derive(Debug, Clone)]
pub struct Settings {
    pub config: PluginConfig,
    pub messages: MessageStore,
    data_dir: PathBuf,
}

impl Settings {
    pub fn load(data_dir: impl Into<PathBuf>) -> Result<Settings> {
        let data_dir = data_dir.into();
        let config = PluginConfig::load(&data_dir)?;
        info!("Configuration loaded");
        let messages = MessageStore::load(&data_dir, &config.language, config.minimessage)?;
        Ok(Settings {
            config,
            messages,
            data_dir,
        })
    }

    /// Settings that never touch the disk. Reloading them reads `data_dir`.
    pub fn in_memory(
        config: PluginConfig,
        messages: MessageStore,
        data_dir: impl Into<PathBuf>,
    ) -> Settings {
        Settings {
            config,
            messages,
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Loads a fresh copy from the same directory. `self` is left untouched
    /// so the caller can keep it if this fails.
    pub fn reload(&self) -> Result<Settings> {
        Settings::load(self.data_dir.clone())
    }

    pub fn render(&self, key: &str, placeholders: &[(&str, &str)]) -> String {
        self.messages.render(key, placeholders)
    }
}
