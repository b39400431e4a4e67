use super::{Action, CommandSender, Host, VisibilityCommand};
use crate::permissions::{ADMIN_RELOAD, OTHERS};
use crate::players::SELECTOR_TOKENS;
use itertools::Itertools;

const SUBCOMMANDS: [&str; 4] = ["help", "toggle", "show", "hide"];

impl VisibilityCommand {
    /// Suggestions for the last of `args`, which is the token being typed.
    /// Only the first two positions are completed. Candidates are not
    /// filtered by what has been typed so far.
    pub fn tab_complete(
        &self,
        host: &Host<'_>,
        sender: &CommandSender,
        args: &[&str],
    ) -> Vec<String> {
        let may_target_others = host.permissions.has(sender, OTHERS);
        let online_names = || {
            host.players
                .online_players()
                .into_iter()
                .map(|player| player.name)
                .sorted_unstable()
        };

        match args {
            [] | [_] => {
                let mut completions: Vec<String> =
                    SUBCOMMANDS.iter().map(|s| s.to_string()).collect();
                if host.permissions.has(sender, ADMIN_RELOAD) {
                    completions.push("reload".to_string());
                }
                if may_target_others {
                    completions.extend(online_names());
                }
                completions
            }
            [subcommand, _] if may_target_others && Action::parse(subcommand).is_some() => {
                online_names()
                    .chain(SELECTOR_TOKENS.iter().map(|s| s.to_string()))
                    .collect()
            }
            _ => Vec::new(),
        }
    }
}
