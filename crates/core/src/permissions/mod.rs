use crate::commands::{Action, CommandSender};
use rustc_hash::FxHashMap;

pub const OTHERS: &str = "bmpc.others";
pub const ADMIN_RELOAD: &str = "bmpc.admin.reload";

/// `bmpc.self.<action>`
pub fn self_node(action: Action) -> String {
    format!("bmpc.self.{}", action.name())
}

/// `bmpc.others.<action>`
pub fn others_node(action: Action) -> String {
    format!("{}.{}", OTHERS, action.name())
}

/// Permission lookups are answered by whoever hosts the command.
pub trait PermissionSet {
    fn has(&self, sender: &CommandSender, node: &str) -> bool;
}

#[derive(Debug)]
enum PathSegment {
    WildCard,
    Named(String),
}

#[derive(Debug)]
struct PermissionNode {
    path: Vec<PathSegment>,
    value: bool,
}

impl PermissionNode {
    fn parse(name: &str) -> PermissionNode {
        let (name, value) = match name.strip_prefix('-') {
            Some(negated) => (negated, false),
            None => (name, true),
        };
        let path = name
            .split('.')
            .map(|s| match s {
                "*" => PathSegment::WildCard,
                s => PathSegment::Named(s.to_lowercase()),
            })
            .collect();
        PermissionNode { path, value }
    }

    fn matches(&self, str: &str) -> bool {
        let mut segments = str.split('.');
        for expected in &self.path {
            match expected {
                PathSegment::WildCard => return true,
                PathSegment::Named(name) => match segments.next() {
                    Some(segment) if segment.eq_ignore_ascii_case(name) => {}
                    _ => return false,
                },
            }
        }
        segments.next().is_none()
    }
}

#[derive(Debug, Default)]
pub struct PlayerPermissionsCache {
    nodes: Vec<PermissionNode>,
}

impl PlayerPermissionsCache {
    /// The value of the first node matching `name`, if any.
    pub fn get_node_val(&self, name: &str) -> Option<bool> {
        self.nodes
            .iter()
            .find(|node| node.matches(name))
            .map(|node| node.value)
    }

    /// Adds a node such as `bmpc.self.*` or `-bmpc.others.hide`. Nodes are
    /// checked in insertion order.
    pub fn insert(&mut self, name: &str) {
        let name = name.trim();
        if !name.is_empty() {
            self.nodes.push(PermissionNode::parse(name));
        }
    }
}

/// Per-player node lists. The console holds every permission, players
/// without an entry hold none.
#[derive(Debug, Default)]
pub struct NodePermissions {
    players: FxHashMap<u128, PlayerPermissionsCache>,
}

impl NodePermissions {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn set_player<I, S>(&mut self, uuid: u128, nodes: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut cache = PlayerPermissionsCache::default();
        for node in nodes {
            cache.insert(node.as_ref());
        }
        self.players.insert(uuid, cache);
    }
}

impl PermissionSet for NodePermissions {
    fn has(&self, sender: &CommandSender, node: &str) -> bool {
        match sender {
            CommandSender::Console => true,
            CommandSender::Player { uuid, .. } => self
                .players
                .get(uuid)
                .and_then(|cache| cache.get_node_val(node))
                .unwrap_or(false),
        }
    }
}
