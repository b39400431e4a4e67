use crate::console::{self, OutputFormat};
use anyhow::{Context, Result};
use bmpc_core::commands::{tokenize, CommandSender, Host, LabelMap, VisibilityCommand, NAMESPACE};
use bmpc_core::gateway::{MemoryVisibility, VisibilityGateway};
use bmpc_core::permissions::NodePermissions;
use bmpc_core::players::{OnlinePlayer, PlayerPos, PlayerRegistry};
use bmpc_core::utils::HyphenatedUUID;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

fn default_true() -> bool {
    true
}

#[derive(Deserialize, Debug)]
struct PlayerEntry {
    name: String,
    uuid: HyphenatedUUID,
    #[serde(default)]
    pos: [f64; 3],
    #[serde(default)]
    permissions: Vec<String>,
}

#[derive(Deserialize, Debug)]
struct PlayersFile {
    #[serde(default = "default_true")]
    map_loaded: bool,
    #[serde(default, rename = "player")]
    players: Vec<PlayerEntry>,
}

impl Default for PlayersFile {
    fn default() -> Self {
        PlayersFile {
            map_loaded: true,
            players: Vec::new(),
        }
    }
}

struct Roster {
    players: Vec<OnlinePlayer>,
}

impl PlayerRegistry for Roster {
    fn online_players(&self) -> Vec<OnlinePlayer> {
        self.players.clone()
    }
}

/// The pretend server: who is online, what they may do and the map state.
struct World {
    roster: Roster,
    permissions: NodePermissions,
    map: MemoryVisibility,
    map_loaded: bool,
    labels: LabelMap,
}

impl World {
    fn load(players_file: &Path) -> Result<World> {
        let file = if players_file.exists() {
            let source = fs::read_to_string(players_file)
                .with_context(|| format!("could not read {}", players_file.display()))?;
            toml::from_str(&source)
                .with_context(|| format!("could not parse {}", players_file.display()))?
        } else {
            warn!("{} does not exist, nobody is online", players_file.display());
            PlayersFile::default()
        };

        let mut permissions = NodePermissions::new();
        let mut players = Vec::with_capacity(file.players.len());
        for entry in file.players {
            let [x, y, z] = entry.pos;
            permissions.set_player(entry.uuid.0, &entry.permissions);
            players.push(OnlinePlayer::new(entry.uuid.0, entry.name).at(PlayerPos::new(x, y, z)));
        }

        Ok(World {
            roster: Roster { players },
            permissions,
            map: MemoryVisibility::new(),
            map_loaded: file.map_loaded,
            labels: LabelMap::new(),
        })
    }

    fn host(&mut self) -> Host<'_> {
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

    fn find_player(&self, name: &str) -> Option<&OnlinePlayer> {
        self.roster
            .players
            .iter()
            .find(|player| player.name.eq_ignore_ascii_case(name))
    }
}

pub enum Outcome {
    Continue,
    Stop,
}

/// Reads console lines and dispatches them to the visibility command.
pub struct Shell {
    command: VisibilityCommand,
    world: World,
    format: OutputFormat,
    on_debug_change: Option<Box<dyn FnMut(bool)>>,
}

impl Shell {
    pub fn new(data_dir: &Path, players_file: &Path, format: OutputFormat) -> Result<Shell> {
        let mut world = World::load(players_file)?;
        let command = VisibilityCommand::load(data_dir, &mut world.labels)?;
        info!("Using data directory {}", command.settings().data_dir().display());
        info!(
            "{} players online, map {}",
            world.roster.players.len(),
            if world.map_loaded { "loaded" } else { "not loaded" }
        );
        Ok(Shell {
            command,
            world,
            format,
            on_debug_change: None,
        })
    }

    pub fn debug(&self) -> bool {
        self.command.settings().config.debug
    }

    /// Called with the new value whenever a reload flips `debug`.
    pub fn on_debug_change(&mut self, hook: impl FnMut(bool) + 'static) {
        self.on_debug_change = Some(Box::new(hook));
    }

    pub fn handle_line(&mut self, line: &str) -> Outcome {
        let args = tokenize(line);
        let lines = match args.as_slice() {
            [] => Vec::new(),
            ["stop"] => return Outcome::Stop,
            ["list"] => self.list(),
            ["map", "load"] => self.set_map_loaded(true),
            ["map", "unload"] => self.set_map_loaded(false),
            ["complete", "sudo", name, label, rest @ ..] => match self.sender(name) {
                Ok(sender) => self.complete(&sender, label, rest),
                Err(lines) => lines,
            },
            ["complete", label, rest @ ..] => self.complete(&CommandSender::Console, label, rest),
            ["sudo", name, label, rest @ ..] => match self.sender(name) {
                Ok(sender) => self.dispatch(&sender, label, rest),
                Err(lines) => lines,
            },
            [label, rest @ ..] => self.dispatch(&CommandSender::Console, label, rest),
        };
        console::print_lines(&lines, self.format);
        Outcome::Continue
    }

    fn sender(&self, name: &str) -> Result<CommandSender, Vec<String>> {
        self.world
            .find_player(name)
            .map(OnlinePlayer::sender)
            .ok_or_else(|| vec![format!("§c{} is not online", name)])
    }

    fn is_own_label(&self, label: &str) -> bool {
        self.world.labels.resolve(label) == Some(NAMESPACE)
    }

    fn unknown_command(&self, label: &str) -> Vec<String> {
        vec![format!(
            "§cUnknown command '{}'. Known commands: {}, list, map, sudo, complete, stop",
            label,
            self.world.labels.labels().join(", ")
        )]
    }

    fn dispatch(&mut self, sender: &CommandSender, label: &str, args: &[&str]) -> Vec<String> {
        if !self.is_own_label(label) {
            return self.unknown_command(label);
        }
        debug!("{} issued: {} {}", sender, label, args.join(" "));
        let was_debug = self.debug();
        let mut host = self.world.host();
        let lines = self.command.execute(&mut host, sender, args);

        let debug = self.debug();
        if debug != was_debug {
            if let Some(hook) = &mut self.on_debug_change {
                hook(debug);
            }
        }
        lines
    }

    /// The last of `args` is treated as the partial token being typed, so
    /// candidates are filtered by it here.
    fn complete(&mut self, sender: &CommandSender, label: &str, args: &[&str]) -> Vec<String> {
        if !self.is_own_label(label) {
            return self.unknown_command(label);
        }
        let partial = args.last().copied().unwrap_or_default().to_lowercase();
        let host = self.world.host();
        let candidates: Vec<String> = self
            .command
            .tab_complete(&host, sender, args)
            .into_iter()
            .filter(|candidate| candidate.to_lowercase().starts_with(&partial))
            .collect();
        vec![candidates.join(" ")]
    }

    fn list(&self) -> Vec<String> {
        let mut lines = vec![format!(
            "§6{} players online, map {}",
            self.world.roster.players.len(),
            if self.world.map_loaded { "loaded" } else { "not loaded" }
        )];
        for player in &self.world.roster.players {
            let visible = self.world.map.get_player_visibility(player.uuid);
            lines.push(format!(
                "§7- §f{} §8({}) {}",
                player.name,
                HyphenatedUUID(player.uuid),
                if visible { "§avisible" } else { "§cinvisible" }
            ));
        }
        lines
    }

    fn set_map_loaded(&mut self, loaded: bool) -> Vec<String> {
        self.world.map_loaded = loaded;
        info!("Map {}", if loaded { "loaded" } else { "unloaded" });
        vec![format!("§7Map {}", if loaded { "loaded" } else { "unloaded" })]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;
    use tempfile::TempDir;

    const PLAYERS: &str = r#"
map_loaded = true

[[player]]
name = "Alice"
uuid = "00000000-0000-0000-0000-000000000001"
pos = [0.0, 64.0, 0.0]
permissions = ["bmpc.self.*"]

[[player]]
name = "Bob"
uuid = "00000000-0000-0000-0000-000000000002"
"#;

    fn shell(players: &str) -> (TempDir, Shell) {
        let dir = TempDir::new().unwrap();
        let players_file = dir.path().join("players.toml");
        fs::write(&players_file, players).unwrap();
        let shell = Shell::new(dir.path(), &players_file, OutputFormat::Plain).unwrap();
        (dir, shell)
    }

    #[test]
    fn loads_players_file() {
        let (_dir, shell) = shell(PLAYERS);
        assert_eq!(shell.world.roster.players.len(), 2);
        assert_eq!(shell.world.roster.players[0].pos.y, 64.0);
        assert!(shell.world.map_loaded);
        assert!(shell.is_own_label("bmpc"));
        assert!(shell.is_own_label("bluemapplayer"));
    }

    #[test]
    fn sudo_runs_as_player() {
        let (_dir, mut shell) = shell(PLAYERS);
        shell.handle_line("sudo alice bmpc hide");
        assert!(!shell.world.map.get_player_visibility(1));

        // Bob holds no permissions.
        shell.handle_line("sudo Bob bmpc hide");
        assert!(shell.world.map.get_player_visibility(2));
    }

    #[test]
    fn console_targets_others() {
        let (_dir, mut shell) = shell(PLAYERS);
        shell.handle_line("bmpc hide @a");
        assert!(!shell.world.map.get_player_visibility(1));
        assert!(!shell.world.map.get_player_visibility(2));
    }

    #[test]
    fn unloaded_map_is_left_alone() {
        let (_dir, mut shell) = shell(PLAYERS);
        shell.handle_line("map unload");
        shell.handle_line("bmpc hide Bob");
        assert!(shell.world.map.get_player_visibility(2));
    }

    #[test]
    fn completion_is_filtered_by_prefix() {
        let (_dir, mut shell) = shell(PLAYERS);
        assert_eq!(shell.complete(&CommandSender::Console, "bmpc", &["h"]), ["help hide"]);
        assert_eq!(
            shell.complete(&CommandSender::Console, "bmpc", &["hide", "@"]),
            ["@a @p @r @s"]
        );
    }

    #[test]
    fn missing_players_file_means_nobody_online() {
        let dir = TempDir::new().unwrap();
        let players_file = dir.path().join("players.toml");
        let shell = Shell::new(dir.path(), &players_file, OutputFormat::Plain).unwrap();
        assert!(shell.world.roster.players.is_empty());
        assert!(shell.world.map_loaded);
    }

    #[test]
    fn reload_reports_debug_changes() {
        let (dir, mut shell) = shell(PLAYERS);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let hook_seen = Rc::clone(&seen);
        shell.on_debug_change(move |debug| hook_seen.borrow_mut().push(debug));

        let config = dir.path().join("config.toml");
        fs::write(&config, "debug = true\n").unwrap();
        shell.handle_line("bmpc reload");
        assert!(shell.debug());
        assert_eq!(*seen.borrow(), [true]);

        // Unchanged flag
        shell.handle_line("bmpc reload");
        assert_eq!(*seen.borrow(), [true]);

        fs::write(&config, "debug = false\n").unwrap();
        shell.handle_line("bmpc reload");
        assert_eq!(*seen.borrow(), [true, false]);
    }

    #[test]
    fn stop_ends_the_loop() {
        let (_dir, mut shell) = shell(PLAYERS);
        assert!(matches!(shell.handle_line("stop"), Outcome::Stop));
        assert!(matches!(shell.handle_line("list"), Outcome::Continue));
    }
}
