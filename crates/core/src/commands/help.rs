use super::{Action, ExecutionContext};
use crate::permissions::{self, ADMIN_RELOAD, OTHERS};

/// Lists only the commands the sender is allowed to run.
pub(super) fn send_help(ctx: &mut ExecutionContext<'_>) {
    let command = ctx.command_name();
    let command = [("command", command)];

    ctx.reply("help.header", &[("version", ctx.version())]);
    ctx.reply("help.description", &[]);
    ctx.blank();

    if ctx.sender().is_player() {
        for action in Action::ALL {
            if ctx.has_permission(&permissions::self_node(action)) {
                ctx.reply(&format!("help.commands.{}", action.name()), &command);
            }
        }
    }

    if ctx.has_permission(OTHERS) {
        ctx.blank();
        for action in Action::ALL {
            if ctx.has_permission(&permissions::others_node(action)) {
                ctx.reply(&format!("help.commands.{}_other", action.name()), &command);
            }
        }
    }

    if ctx.has_permission(ADMIN_RELOAD) {
        ctx.reply("help.commands.reload", &command);
    }

    ctx.blank();
    ctx.reply("help.footer", &command);
}
