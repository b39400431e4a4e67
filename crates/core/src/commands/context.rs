use super::{CommandError, CommandResult, CommandSender};
use crate::gateway::VisibilityGateway;
use crate::permissions::PermissionSet;
use crate::players::PlayerRegistry;
use crate::settings::Settings;

/// Everything one invocation can see, plus the lines it has answered with so
/// far.
pub struct ExecutionContext<'a> {
    settings: &'a Settings,
    version: &'a str,
    sender: &'a CommandSender,
    players: &'a dyn PlayerRegistry,
    permissions: &'a dyn PermissionSet,
    map: &'a dyn VisibilityGateway,
    replies: Vec<String>,
}

impl<'a> ExecutionContext<'a> {
    pub(super) fn new(
        settings: &'a Settings,
        version: &'a str,
        sender: &'a CommandSender,
        players: &'a dyn PlayerRegistry,
        permissions: &'a dyn PermissionSet,
        map: &'a dyn VisibilityGateway,
    ) -> Self {
        Self {
            settings,
            version,
            sender,
            players,
            permissions,
            map,
            replies: Vec::new(),
        }
    }

    pub fn settings(&self) -> &'a Settings {
        self.settings
    }

    pub fn version(&self) -> &'a str {
        self.version
    }

    pub fn sender(&self) -> &'a CommandSender {
        self.sender
    }

    pub fn players(&self) -> &'a dyn PlayerRegistry {
        self.players
    }

    pub fn map(&self) -> &'a dyn VisibilityGateway {
        self.map
    }

    pub fn command_name(&self) -> &'a str {
        &self.settings.config.command_name
    }

    pub fn reply(&mut self, key: &str, placeholders: &[(&str, &str)]) {
        let line = self.settings.render(key, placeholders);
        self.replies.push(line);
    }

    pub fn blank(&mut self) {
        self.replies.push(String::new());
    }

    pub fn error(&mut self, err: &CommandError) {
        let line = render_error(self.settings, err);
        self.replies.push(line);
    }

    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.has(self.sender, permission)
    }

    pub fn require_permission(&self, permission: &str) -> CommandResult<()> {
        if !self.has_permission(permission) {
            return Err(CommandError::PermissionDenied {
                permission: permission.to_string(),
            });
        }
        Ok(())
    }

    pub fn player_uuid(&self) -> CommandResult<u128> {
        self.sender.uuid().ok_or(CommandError::PlayerOnly)
    }

    pub(super) fn into_replies(self) -> Vec<String> {
        self.replies
    }
}

/// Renders an error with its own placeholders plus `{command}`.
pub(super) fn render_error(settings: &Settings, err: &CommandError) -> String {
    let mut placeholders = err.placeholders();
    placeholders.push(("command", settings.config.command_name.as_str()));
    settings.render(err.message_key(), &placeholders)
}
