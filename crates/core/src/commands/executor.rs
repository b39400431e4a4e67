use super::context::{render_error, ExecutionContext};
use super::parser::{tokenize, Invocation};
use super::{help, Action, CommandError, CommandResult, CommandSender, Host, VisibilityCommand};
use crate::gateway::VisibilityGateway;
use crate::permissions::{self, PermissionSet};
use crate::players::PlayerRegistry;
use tracing::{info, warn};

impl VisibilityCommand {
    /// Runs one invocation and returns the lines to send back to `sender`.
    /// Every failure is answered with a message, nothing is returned as an
    /// error.
    pub fn execute(
        &mut self,
        host: &mut Host<'_>,
        sender: &CommandSender,
        args: &[&str],
    ) -> Vec<String> {
        let invocation = Invocation::parse(sender.is_player(), args);

        let Some(map) = host.map else {
            decision!(self.settings, %sender, "Map is not loaded, ignoring command");
            return vec![render_error(
                &self.settings,
                &CommandError::MappingServiceUnavailable,
            )];
        };

        decision!(self.settings, %sender, ?invocation, "Executing visibility command");
        match invocation {
            Invocation::Reload => self.reload(host, sender),
            invocation => self.run(host.players, host.permissions, map, sender, invocation),
        }
    }

    /// Tokenizes `command_line` on whitespace and executes it.
    pub fn execute_line(
        &mut self,
        host: &mut Host<'_>,
        sender: &CommandSender,
        command_line: &str,
    ) -> Vec<String> {
        let args = tokenize(command_line);
        self.execute(host, sender, &args)
    }

    fn run(
        &self,
        players: &dyn PlayerRegistry,
        permissions: &dyn PermissionSet,
        map: &dyn VisibilityGateway,
        sender: &CommandSender,
        invocation: Invocation<'_>,
    ) -> Vec<String> {
        let mut ctx = ExecutionContext::new(
            &self.settings,
            &self.version,
            sender,
            players,
            permissions,
            map,
        );

        let result = match invocation {
            Invocation::Help => {
                help::send_help(&mut ctx);
                Ok(())
            }
            Invocation::Own(action) => Self::execute_own(&mut ctx, action),
            Invocation::Others {
                subcommand,
                selector,
            } => Self::execute_others(&mut ctx, &subcommand, selector),
            Invocation::PlayerOnly => Err(CommandError::PlayerOnly),
            Invocation::Invalid | Invocation::Reload => Err(CommandError::InvalidUsage),
        };

        if let Err(err) = result {
            decision!(self.settings, %sender, %err, "Command failed");
            ctx.error(&err);
        }
        ctx.into_replies()
    }

    fn execute_own(ctx: &mut ExecutionContext<'_>, action: Action) -> CommandResult<()> {
        ctx.require_permission(&permissions::self_node(action))?;
        let uuid = ctx.player_uuid()?;

        let visible = action.apply(ctx.map(), uuid);
        decision!(
            ctx.settings(),
            sender = %ctx.sender(),
            action = action.name(),
            visible,
            "Changed own visibility"
        );
        if visible {
            ctx.reply("status.visible", &[]);
        } else {
            ctx.reply("status.invisible", &[]);
        }
        Ok(())
    }

    fn execute_others(
        ctx: &mut ExecutionContext<'_>,
        subcommand: &str,
        selector: &str,
    ) -> CommandResult<()> {
        let targets = match ctx.players().select(ctx.sender(), selector) {
            Ok(targets) => targets,
            Err(err) => {
                decision!(ctx.settings(), selector, %err, "Selector could not be resolved");
                Vec::new()
            }
        };
        if targets.is_empty() {
            return Err(CommandError::TargetNotFound {
                selector: selector.to_string(),
            });
        }

        let action = Action::parse(subcommand);
        for target in targets {
            if ctx.sender().uuid() == Some(target.uuid) {
                ctx.error(&CommandError::SelfTargetRejected);
                continue;
            }

            let Some(action) = action else {
                ctx.error(&CommandError::InvalidUsage);
                continue;
            };

            if let Err(err) = ctx.require_permission(&permissions::others_node(action)) {
                ctx.error(&err);
                continue;
            }

            let visible = action.apply(ctx.map(), target.uuid);
            decision!(
                ctx.settings(),
                sender = %ctx.sender(),
                target = %target.name,
                action = action.name(),
                visible,
                "Changed visibility of other player"
            );
            if visible {
                ctx.reply("status.other_visible", &[("player", target.name.as_str())]);
            } else {
                ctx.reply("status.other_invisible", &[("player", target.name.as_str())]);
            }
        }
        Ok(())
    }

    /// Swaps in freshly loaded settings and registers the (possibly changed)
    /// labels again. On failure the current settings stay.
    fn reload(&mut self, host: &mut Host<'_>, sender: &CommandSender) -> Vec<String> {
        if !host.permissions.has(sender, permissions::ADMIN_RELOAD) {
            decision!(self.settings, %sender, "Reload denied");
            let err = CommandError::PermissionDenied {
                permission: permissions::ADMIN_RELOAD.to_string(),
            };
            return vec![render_error(&self.settings, &err)];
        }

        match self.settings.reload() {
            Ok(settings) => {
                self.settings = settings;
                self.register(&mut *host.commands);
                info!("Configuration reloaded by {}", sender);
                let command = self.settings.config.command_name.as_str();
                vec![self.settings.render("reload.success", &[("command", command)])]
            }
            Err(err) => {
                warn!("Could not reload configuration: {:#}", err);
                let err = CommandError::ReloadFailed {
                    error: format!("{:#}", err),
                };
                vec![render_error(&self.settings, &err)]
            }
        }
    }
}
