#![allow(dead_code)]

use bmpc_core::commands::{CommandSender, Host, LabelMap, VisibilityCommand};
use bmpc_core::config::PluginConfig;
use bmpc_core::gateway::VisibilityGateway;
use bmpc_core::messages::MessageStore;
use bmpc_core::permissions::NodePermissions;
use bmpc_core::players::{OnlinePlayer, PlayerRegistry};
use bmpc_core::settings::Settings;
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::Path;

pub const ALICE: u128 = 1;
pub const BOB: u128 = 2;
pub const CAROL: u128 = 3;
pub const DAVE: u128 = 4;

/// A gateway that remembers every write. Unknown players are visible.
#[derive(Default)]
pub struct RecordingMap {
    visibility: RefCell<HashMap<u128, bool>>,
    pub writes: RefCell<Vec<(u128, bool)>>,
}

impl RecordingMap {
    pub fn is_visible(&self, uuid: u128) -> bool {
        self.get_player_visibility(uuid)
    }

    pub fn set(&self, uuid: u128, visible: bool) {
        self.visibility.borrow_mut().insert(uuid, visible);
    }

    pub fn write_count(&self) -> usize {
        self.writes.borrow().len()
    }
}

impl VisibilityGateway for RecordingMap {
    fn get_player_visibility(&self, uuid: u128) -> bool {
        self.visibility.borrow().get(&uuid).copied().unwrap_or(true)
    }

    fn set_player_visibility(&self, uuid: u128, visible: bool) {
        self.writes.borrow_mut().push((uuid, visible));
        self.visibility.borrow_mut().insert(uuid, visible);
    }
}

pub struct Roster(pub Vec<OnlinePlayer>);

impl PlayerRegistry for Roster {
    fn online_players(&self) -> Vec<OnlinePlayer> {
        self.0.clone()
    }
}

pub struct TestHost {
    pub roster: Roster,
    pub permissions: NodePermissions,
    pub map: RecordingMap,
    pub map_loaded: bool,
    pub labels: LabelMap,
}

impl TestHost {
    /// Alice, Bob and Carol online, nobody holding any permission.
    pub fn new() -> TestHost {
        TestHost {
            roster: Roster(vec![
                OnlinePlayer::new(ALICE, "Alice"),
                OnlinePlayer::new(BOB, "Bob"),
                OnlinePlayer::new(CAROL, "Carol"),
            ]),
            permissions: NodePermissions::new(),
            map: RecordingMap::default(),
            map_loaded: true,
            labels: LabelMap::new(),
        }
    }

    pub fn grant(&mut self, uuid: u128, nodes: &[&str]) {
        self.permissions.set_player(uuid, nodes);
    }

    pub fn player(&self, uuid: u128) -> CommandSender {
        self.roster
            .0
            .iter()
            .find(|player| player.uuid == uuid)
            .map(OnlinePlayer::sender)
            .unwrap_or_else(|| CommandSender::player(uuid, "Offline"))
    }

    pub fn host(&mut self) -> Host<'_> {
        let map = self
            .map_loaded
            .then_some(&self.map as &dyn VisibilityGateway);
        Host {
            players: &self.roster,
            permissions: &self.permissions,
            map,
            commands: &mut self.labels,
        }
    }

    pub fn run(
        &mut self,
        command: &mut VisibilityCommand,
        sender: &CommandSender,
        args: &[&str],
    ) -> Vec<String> {
        let mut host = self.host();
        command.execute(&mut host, sender, args)
    }

    pub fn complete(
        &mut self,
        command: &VisibilityCommand,
        sender: &CommandSender,
        args: &[&str],
    ) -> Vec<String> {
        let host = self.host();
        command.tab_complete(&host, sender, args)
    }
}

/// A command using the default config and the bundled English messages.
/// Reloading it reads `data_dir`.
pub fn command(data_dir: &Path) -> VisibilityCommand {
    let settings = Settings::in_memory(
        PluginConfig::default(),
        MessageStore::bundled_default(true),
        data_dir,
    );
    VisibilityCommand::new(settings)
}

/// What the bundled English messages render to.
pub fn expected(key: &str, placeholders: &[(&str, &str)]) -> String {
    MessageStore::bundled_default(true).render(key, placeholders)
}

/// Error messages also get `{command}`.
pub fn expected_error(key: &str, placeholders: &[(&str, &str)]) -> String {
    let mut placeholders = placeholders.to_vec();
    placeholders.push(("command", "bmpc"));
    expected(key, &placeholders)
}
