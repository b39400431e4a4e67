use rustc_hash::FxHashMap;
use tracing::warn;

/// The host's table of command labels. Commands are registered by name at
/// runtime so the label and aliases can come from the config file.
pub trait CommandMap {
    fn register(&mut self, namespace: &str, label: &str, aliases: &[String]);

    /// Removes every label owned by `namespace`.
    fn unregister(&mut self, namespace: &str);
}

/// A [`CommandMap`] keyed by lower-case label. Every label is also reachable
/// as `namespace:label`, which is the only way to reach a label that another
/// namespace registered first.
#[derive(Debug, Default)]
pub struct LabelMap {
    labels: FxHashMap<String, String>,
}

impl LabelMap {
    pub fn new() -> Self {
        Default::default()
    }

    fn insert(&mut self, namespace: &str, label: &str) {
        let label = label.to_lowercase();
        self.labels
            .insert(format!("{}:{}", namespace, label), namespace.to_string());
        match self.labels.get(&label).cloned() {
            Some(owner) if owner != namespace => {
                warn!(
                    "Label '{}' is already taken by '{}', use '{}:{}' instead",
                    label, owner, namespace, label
                );
            }
            _ => {
                self.labels.insert(label, namespace.to_string());
            }
        }
    }

    /// The namespace that owns `label`, if any.
    pub fn resolve(&self, label: &str) -> Option<&str> {
        self.labels.get(&label.to_lowercase()).map(String::as_str)
    }

    /// Labels without the namespace prefix, sorted.
    pub fn labels(&self) -> Vec<&str> {
        let mut labels: Vec<&str> = self
            .labels
            .keys()
            .filter(|label| !label.contains(':'))
            .map(String::as_str)
            .collect();
        labels.sort_unstable();
        labels
    }
}

impl CommandMap for LabelMap {
    fn register(&mut self, namespace: &str, label: &str, aliases: &[String]) {
        self.insert(namespace, label);
        for alias in aliases {
            self.insert(namespace, alias);
        }
    }

    fn unregister(&mut self, namespace: &str) {
        self.labels.retain(|_, owner| owner != namespace);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_label_aliases_and_prefix() {
        let mut map = LabelMap::new();
        map.register("bluemapplayercontrol", "bmpc", &["vis".to_string()]);

        assert_eq!(map.resolve("BMPC"), Some("bluemapplayercontrol"));
        assert_eq!(map.resolve("vis"), Some("bluemapplayercontrol"));
        assert_eq!(map.resolve("bluemapplayercontrol:vis"), Some("bluemapplayercontrol"));
        assert_eq!(map.resolve("other"), None);
        assert_eq!(map.labels(), vec!["bmpc", "vis"]);
    }

    #[test]
    fn first_owner_keeps_plain_label() {
        let mut map = LabelMap::new();
        map.register("essentials", "vis", &[]);
        map.register("bluemapplayercontrol", "vis", &[]);

        assert_eq!(map.resolve("vis"), Some("essentials"));
        assert_eq!(map.resolve("bluemapplayercontrol:vis"), Some("bluemapplayercontrol"));
    }

    #[test]
    fn unregister_drops_only_that_namespace() {
        let mut map = LabelMap::new();
        map.register("essentials", "home", &[]);
        map.register("bluemapplayercontrol", "bmpc", &["vis".to_string()]);
        map.unregister("bluemapplayercontrol");

        assert_eq!(map.resolve("bmpc"), None);
        assert_eq!(map.resolve("vis"), None);
        assert_eq!(map.resolve("home"), Some("essentials"));
    }
}
