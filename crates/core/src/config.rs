use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use toml_edit::{value, Array, DocumentMut};

pub const CONFIG_FILE: &str = "config.toml";

trait ConfigSerializeDefault {
    fn fix_config(self, name: &str, doc: &mut DocumentMut);
}

macro_rules! impl_simple_default {
    ( $( $type:ty ),* ) => {
        $(
            impl ConfigSerializeDefault for $type {
                fn fix_config(self, name: &str, doc: &mut DocumentMut) {
                    doc.entry(name).or_insert_with(|| value(self));
                }
            }
        )*
    }
}

impl_simple_default!(String, bool);

impl ConfigSerializeDefault for Vec<String> {
    fn fix_config(self, name: &str, doc: &mut DocumentMut) {
        doc.entry(name)
            .or_insert_with(|| value(self.into_iter().collect::<Array>()));
    }
}

macro_rules! gen_config {
    (
        $( $(#[$doc:meta])* $name:ident: $type:ty = $default:expr),*
    ) => {
        #[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
        pub struct PluginConfig {
            $(
                $(#[$doc])*
                pub $name: $type,
            )*
        }

        impl Default for PluginConfig {
            fn default() -> Self {
                PluginConfig {
                    $( $name: $default, )*
                }
            }
        }

        impl PluginConfig {
            /// Reads `config.toml` from `data_dir`, writing back any keys that
            /// are missing with their default value.
            pub fn load(data_dir: &Path) -> Result<PluginConfig> {
                let path = data_dir.join(CONFIG_FILE);
                let str = match fs::read_to_string(&path) {
                    Ok(str) => str,
                    Err(err) if err.kind() == ErrorKind::NotFound => String::new(),
                    Err(err) => {
                        return Err(err)
                            .with_context(|| format!("failed to read {}", path.display()));
                    }
                };
                let mut doc = str
                    .parse::<DocumentMut>()
                    .with_context(|| format!("failed to parse {}", path.display()))?;

                $(
                    <$type as ConfigSerializeDefault>::fix_config(
                        $default,
                        stringify!($name),
                        &mut doc,
                    );
                )*

                let patched = doc.to_string();
                if str != patched {
                    fs::create_dir_all(data_dir)
                        .with_context(|| format!("failed to create {}", data_dir.display()))?;
                    fs::write(&path, &patched)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                }

                let mut config: PluginConfig = toml::from_str(&patched)
                    .with_context(|| format!("invalid value in {}", path.display()))?;
                config.normalize();
                Ok(config)
            }
        }
    };
}

gen_config! {
    /// Label the command is registered under
    command_name: String = "bmpc".to_string(),
    command_aliases: Vec<String> = vec![
        "bluemapplayercontrol".to_string(),
        "bluemapplayer".to_string(),
    ],
    /// Suffix of the `messages_<language>.yml` file to use
    language: String = "en".to_string(),
    /// Parse messages as tag markup instead of `&` colour codes
    minimessage: bool = true,
    debug: bool = false
}

impl PluginConfig {
    fn normalize(&mut self) {
        self.command_name = self.command_name.trim().to_lowercase();
        if self.command_name.is_empty() {
            self.command_name = PluginConfig::default().command_name;
        }

        let mut aliases: Vec<String> = Vec::with_capacity(self.command_aliases.len());
        for alias in &self.command_aliases {
            let alias = alias.trim().to_lowercase();
            if !alias.is_empty() && alias != self.command_name && !aliases.contains(&alias) {
                aliases.push(alias);
            }
        }
        self.command_aliases = aliases;
        self.language = self.language.trim().to_lowercase();
    }
}
