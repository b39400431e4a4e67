/// Logs one router decision, only when `debug` is on in the config.
macro_rules! decision {
    ($settings:expr, $($arg:tt)+) => {
        if $settings.config.debug {
            ::tracing::debug!($($arg)+);
        }
    };
}

mod autocomplete;
mod context;
mod error;
mod executor;
mod help;
mod parser;
mod registry;

pub use context::ExecutionContext;
pub use error::{CommandError, CommandResult};
pub use parser::tokenize;
pub use registry::{CommandMap, LabelMap};

use crate::gateway::VisibilityGateway;
use crate::permissions::PermissionSet;
use crate::players::PlayerRegistry;
use crate::settings::Settings;
use anyhow::Result;
use std::fmt;
use std::path::PathBuf;
use tracing::info;

/// Namespace the command labels are registered under.
pub const NAMESPACE: &str = "bluemapplayercontrol";
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandSender {
    Player { uuid: u128, name: String },
    Console,
}

impl CommandSender {
    pub fn player(uuid: u128, name: impl Into<String>) -> CommandSender {
        CommandSender::Player {
            uuid,
            name: name.into(),
        }
    }

    pub fn is_player(&self) -> bool {
        matches!(self, CommandSender::Player { .. })
    }

    pub fn uuid(&self) -> Option<u128> {
        match self {
            CommandSender::Player { uuid, .. } => Some(*uuid),
            CommandSender::Console => None,
        }
    }
}

impl fmt::Display for CommandSender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandSender::Player { name, .. } => f.write_str(name),
            CommandSender::Console => f.write_str("CONSOLE"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Toggle,
    Show,
    Hide,
}

impl Action {
    pub const ALL: [Action; 3] = [Action::Toggle, Action::Show, Action::Hide];

    pub fn parse(name: &str) -> Option<Action> {
        Action::ALL
            .into_iter()
            .find(|action| action.name().eq_ignore_ascii_case(name))
    }

    pub fn name(self) -> &'static str {
        match self {
            Action::Toggle => "toggle",
            Action::Show => "show",
            Action::Hide => "hide",
        }
    }

    /// Writes the new visibility of `uuid` and returns it. Only toggle reads
    /// the current value first.
    pub fn apply(self, map: &dyn VisibilityGateway, uuid: u128) -> bool {
        let visible = match self {
            Action::Toggle => !map.get_player_visibility(uuid),
            Action::Show => true,
            Action::Hide => false,
        };
        map.set_player_visibility(uuid, visible);
        visible
    }
}

/// What the command needs from the server it runs in. `map` is `None` while
/// the web map is not loaded.
pub struct Host<'a> {
    pub players: &'a dyn PlayerRegistry,
    pub permissions: &'a dyn PermissionSet,
    pub map: Option<&'a dyn VisibilityGateway>,
    pub commands: &'a mut dyn CommandMap,
}

/// The visibility command: parses arguments, checks permissions, changes
/// visibility through the map and answers with rendered messages.
pub struct VisibilityCommand {
    settings: Settings,
    version: String,
}

impl VisibilityCommand {
    pub fn new(settings: Settings) -> VisibilityCommand {
        VisibilityCommand {
            settings,
            version: VERSION.to_string(),
        }
    }

    /// Loads settings from `data_dir` and registers the configured labels.
    pub fn load(
        data_dir: impl Into<PathBuf>,
        commands: &mut dyn CommandMap,
    ) -> Result<VisibilityCommand> {
        let command = VisibilityCommand::new(Settings::load(data_dir)?);
        command.register(commands);
        Ok(command)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Replaces any labels from a previous registration.
    pub fn register(&self, commands: &mut dyn CommandMap) {
        let config = &self.settings.config;
        commands.unregister(NAMESPACE);
        commands.register(NAMESPACE, &config.command_name, &config.command_aliases);
        info!(
            "Command '{}' registered with aliases: {}",
            config.command_name,
            config.command_aliases.join(", ")
        );
    }
}
