use thiserror::Error;

/// Everything that can stop a visibility command. None of these leave the
/// command: each one is rendered to the sender as a message.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("BlueMap is not loaded")]
    MappingServiceUnavailable,
    #[error("Permission denied: {permission}")]
    PermissionDenied { permission: String },
    #[error("This command can only be executed by players")]
    PlayerOnly,
    #[error("Invalid usage")]
    InvalidUsage,
    #[error("No player matched '{selector}'")]
    TargetNotFound { selector: String },
    #[error("Players can not target themselves")]
    SelfTargetRejected,
    #[error("Reload failed: {error}")]
    ReloadFailed { error: String },
}

impl CommandError {
    pub fn message_key(&self) -> &'static str {
        match self {
            CommandError::MappingServiceUnavailable => "errors.bluemap_not_loaded",
            CommandError::PermissionDenied { .. } => "errors.no_permission",
            CommandError::PlayerOnly => "errors.player_only",
            CommandError::InvalidUsage => "errors.invalid_usage",
            CommandError::TargetNotFound { .. } => "errors.player_not_found",
            CommandError::SelfTargetRejected => "errors.cannot_target_self",
            CommandError::ReloadFailed { .. } => "errors.reload_failed",
        }
    }

    pub fn placeholders(&self) -> Vec<(&'static str, &str)> {
        match self {
            CommandError::PermissionDenied { permission } => {
                vec![("permission", permission.as_str())]
            }
            CommandError::TargetNotFound { selector } => vec![("player", selector.as_str())],
            CommandError::ReloadFailed { error } => vec![("error", error.as_str())],
            _ => Vec::new(),
        }
    }
}

pub type CommandResult<T> = Result<T, CommandError>;
