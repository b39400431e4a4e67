use anyhow::{bail, Context, Result};
use bmpc_text::{parse_markup, to_legacy_string, TextComponent};
use rustc_hash::FxHashMap;
use serde_yaml_ng::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

pub const DEFAULT_LANGUAGE: &str = "en";

const BUNDLED: &[(&str, &str)] = &[
    ("en", include_str!("../resources/messages_en.yml")),
    ("nl", include_str!("../resources/messages_nl.yml")),
];

fn bundled(language: &str) -> Option<&'static str> {
    BUNDLED
        .iter()
        .find(|(name, _)| *name == language)
        .map(|(_, contents)| *contents)
}

fn messages_file(data_dir: &Path, language: &str) -> PathBuf {
    data_dir.join(format!("messages_{}.yml", language))
}

/// Localized message templates, addressed by dotted keys such as
/// `errors.no_permission`.
#[derive(Debug, Clone)]
pub struct MessageStore {
    language: String,
    minimessage: bool,
    templates: FxHashMap<String, String>,
}

impl MessageStore {
    /// Loads `messages_<language>.yml` from `data_dir`. A missing file is
    /// first written from the bundled copy; languages without a bundled copy
    /// fall back to English.
    pub fn load(data_dir: &Path, language: &str, minimessage: bool) -> Result<MessageStore> {
        let mut language = language.to_string();
        let mut path = messages_file(data_dir, &language);

        if !path.exists() {
            let contents = match bundled(&language) {
                Some(contents) => contents,
                None => {
                    info!(
                        "No bundled messages for language '{}', falling back to '{}'",
                        language, DEFAULT_LANGUAGE
                    );
                    language = DEFAULT_LANGUAGE.to_string();
                    path = messages_file(data_dir, &language);
                    bundled(DEFAULT_LANGUAGE).unwrap_or_default()
                }
            };
            if !path.exists() {
                fs::create_dir_all(data_dir)
                    .with_context(|| format!("failed to create {}", data_dir.display()))?;
                fs::write(&path, contents)
                    .with_context(|| format!("could not create {}", path.display()))?;
            }
        }

        let source = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let store = MessageStore::from_yaml(&language, &source, minimessage)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        info!("Messages loaded from {}", path.display());
        Ok(store)
    }

    pub fn from_yaml(language: &str, source: &str, minimessage: bool) -> Result<MessageStore> {
        let root: Value = serde_yaml_ng::from_str(source)?;
        let mut templates = FxHashMap::default();
        match &root {
            Value::Mapping(_) => flatten("", &root, &mut templates),
            // An empty file
            Value::Null => {}
            _ => bail!("the top level must be a mapping of message keys"),
        }
        Ok(MessageStore {
            language: language.to_string(),
            minimessage,
            templates,
        })
    }

    /// The English messages shipped with the crate.
    pub fn bundled_default(minimessage: bool) -> MessageStore {
        let source = bundled(DEFAULT_LANGUAGE).unwrap_or_default();
        MessageStore::from_yaml(DEFAULT_LANGUAGE, source, minimessage).unwrap_or_else(|_| {
            MessageStore {
                language: DEFAULT_LANGUAGE.to_string(),
                minimessage,
                templates: FxHashMap::default(),
            }
        })
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn contains(&self, key: &str) -> bool {
        self.templates.contains_key(key)
    }

    pub fn get(&self, key: &str) -> String {
        match self.templates.get(key) {
            Some(template) => template.clone(),
            None => format!("Message not found: {}", key),
        }
    }

    /// Fills `{name}` placeholders in order. Pairs without a matching
    /// placeholder are ignored.
    pub fn format(&self, key: &str, placeholders: &[(&str, &str)]) -> String {
        let mut message = self.get(key);
        for (name, value) in placeholders {
            message = message.replace(&format!("{{{}}}", name), value);
        }
        message
    }

    pub fn components(&self, key: &str, placeholders: &[(&str, &str)]) -> Vec<TextComponent> {
        let message = self.format(key, placeholders);
        if self.minimessage {
            parse_markup(&message)
        } else {
            TextComponent::from_legacy_text(&message)
        }
    }

    /// Formats the message and serializes it to `§` coded text, ready to be
    /// sent to a command sender.
    pub fn render(&self, key: &str, placeholders: &[(&str, &str)]) -> String {
        to_legacy_string(&self.components(key, placeholders))
    }
}

fn scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Tagged(tagged) => scalar(&tagged.value),
        _ => None,
    }
}

fn flatten(prefix: &str, value: &Value, out: &mut FxHashMap<String, String>) {
    match value {
        Value::Mapping(mapping) => {
            for (key, value) in mapping {
                let Some(key) = scalar(key) else {
                    continue;
                };
                let path = if prefix.is_empty() {
                    key
                } else {
                    format!("{}.{}", prefix, key)
                };
                flatten(&path, value, out);
            }
        }
        Value::Sequence(lines) => {
            let joined = lines.iter().filter_map(scalar).collect::<Vec<_>>().join("\n");
            out.insert(prefix.to_string(), joined);
        }
        Value::Tagged(tagged) => flatten(prefix, &tagged.value, out),
        Value::Null => {}
        scalar_value => {
            if let Some(text) = scalar(scalar_value) {
                out.insert(prefix.to_string(), text);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const REQUIRED_KEYS: &[&str] = &[
        "errors.bluemap_not_loaded",
        "errors.no_permission",
        "errors.player_only",
        "errors.invalid_usage",
        "errors.player_not_found",
        "errors.cannot_target_self",
        "errors.reload_failed",
        "status.visible",
        "status.invisible",
        "status.other_visible",
        "status.other_invisible",
        "reload.success",
        "help.header",
        "help.description",
        "help.commands.toggle",
        "help.commands.show",
        "help.commands.hide",
        "help.commands.toggle_other",
        "help.commands.show_other",
        "help.commands.hide_other",
        "help.commands.reload",
        "help.footer",
    ];

    #[test]
    fn bundled_languages_have_every_key() {
        for (language, source) in BUNDLED {
            let store = MessageStore::from_yaml(language, source, true).unwrap();
            for key in REQUIRED_KEYS {
                assert!(store.contains(key), "{} is missing {}", language, key);
            }
        }
    }

    #[test]
    fn nested_keys_are_dotted() {
        let store = MessageStore::from_yaml(
            "en",
            "a:\n  b:\n    c: deep\n  n: 5\nlist:\n  - one\n  - two\n",
            false,
        )
        .unwrap();
        assert_eq!(store.get("a.b.c"), "deep");
        assert_eq!(store.get("a.n"), "5");
        assert_eq!(store.get("list"), "one\ntwo");
    }

    #[test]
    fn missing_key_names_the_key() {
        let store = MessageStore::from_yaml("en", "", true).unwrap();
        assert_eq!(store.render("status.nope", &[]), "Message not found: status.nope");
    }

    #[test]
    fn placeholders_are_replaced() {
        let store = MessageStore::from_yaml("en", "greet: \"{who} meets {whom}, {who}\"", false)
            .unwrap();
        assert_eq!(
            store.format("greet", &[("who", "Alice"), ("whom", "Bob"), ("unused", "x")]),
            "Alice meets Bob, Alice"
        );
    }

    #[test]
    fn render_modes() {
        let source = "rich: \"<red>Hi\"\nlegacy: \"&cHi\"";
        let rich = MessageStore::from_yaml("en", source, true).unwrap();
        assert_eq!(rich.render("rich", &[]), "§cHi");
        assert_eq!(rich.render("legacy", &[]), "&cHi");

        let legacy = MessageStore::from_yaml("en", source, false).unwrap();
        assert_eq!(legacy.render("legacy", &[]), "§cHi");
        assert_eq!(legacy.render("rich", &[]), "<red>Hi");
    }

    #[test]
    fn rejects_non_mapping_root() {
        assert!(MessageStore::from_yaml("en", "- a\n- b\n", true).is_err());
    }

    #[test]
    fn writes_bundled_language_file() {
        let dir = TempDir::new().unwrap();
        let store = MessageStore::load(dir.path(), "nl", true).unwrap();
        assert_eq!(store.language(), "nl");
        assert!(dir.path().join("messages_nl.yml").exists());
    }

    #[test]
    fn unknown_language_falls_back_to_english() {
        let dir = TempDir::new().unwrap();
        let store = MessageStore::load(dir.path(), "tlh", true).unwrap();
        assert_eq!(store.language(), "en");
        assert!(dir.path().join("messages_en.yml").exists());
        assert!(!dir.path().join("messages_tlh.yml").exists());
        assert!(store.contains("status.visible"));
    }

    #[test]
    fn existing_file_wins_over_bundle() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("messages_en.yml"), "status:\n  visible: custom\n").unwrap();
        let store = MessageStore::load(dir.path(), "en", true).unwrap();
        assert_eq!(store.render("status.visible", &[]), "custom");
        assert!(!store.contains("status.invisible"));
    }
}
