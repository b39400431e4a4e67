use super::Action;

fn skip_whitespace(input: &str) -> &str {
    input.trim_start()
}

pub fn consume_token(input: &str) -> Option<(&str, &str)> {
    let input = skip_whitespace(input);
    if input.is_empty() {
        return None;
    }

    let end = input.find(char::is_whitespace).unwrap_or(input.len());

    Some((&input[..end], &input[end..]))
}

/// Splits a command line on whitespace.
pub fn tokenize(mut input: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    while let Some((token, rest)) = consume_token(input) {
        tokens.push(token);
        input = rest;
    }
    tokens
}

/// What a list of arguments asks for, before any permission or target is
/// checked.
#[derive(Debug, PartialEq, Eq)]
pub(super) enum Invocation<'a> {
    Help,
    Reload,
    Own(Action),
    Others {
        subcommand: String,
        selector: &'a str,
    },
    /// A self action sent by something that is not a player
    PlayerOnly,
    Invalid,
}

impl<'a> Invocation<'a> {
    pub(super) fn parse(is_player: bool, args: &[&'a str]) -> Invocation<'a> {
        match args {
            [] => Invocation::Help,
            [single] => {
                let subcommand = single.to_lowercase();
                match (subcommand.as_str(), Action::parse(&subcommand)) {
                    ("help", _) => Invocation::Help,
                    ("reload", _) => Invocation::Reload,
                    (_, Some(action)) if is_player => Invocation::Own(action),
                    (_, Some(_)) => Invocation::PlayerOnly,
                    (_, None) => Invocation::Invalid,
                }
            }
            [subcommand, selector, ..] => Invocation::Others {
                subcommand: subcommand.to_lowercase(),
                selector: *selector,
            },
        }
    }
}
