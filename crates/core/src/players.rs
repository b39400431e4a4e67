use crate::commands::CommandSender;
use crate::utils::HyphenatedUUID;
use rand::RngExt;
use thiserror::Error;

/// Group selectors offered by tab completion.
pub const SELECTOR_TOKENS: [&str; 4] = ["@a", "@p", "@r", "@s"];

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct PlayerPos {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl PlayerPos {
    pub fn new(x: f64, y: f64, z: f64) -> PlayerPos {
        PlayerPos { x, y, z }
    }

    fn distance_squared(&self, other: &PlayerPos) -> f64 {
        (self.x - other.x).powi(2) + (self.y - other.y).powi(2) + (self.z - other.z).powi(2)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OnlinePlayer {
    pub uuid: u128,
    pub name: String,
    pub pos: PlayerPos,
}

impl OnlinePlayer {
    pub fn new(uuid: u128, name: impl Into<String>) -> OnlinePlayer {
        OnlinePlayer {
            uuid,
            name: name.into(),
            pos: PlayerPos::default(),
        }
    }

    pub fn at(mut self, pos: PlayerPos) -> OnlinePlayer {
        self.pos = pos;
        self
    }

    pub fn sender(&self) -> CommandSender {
        CommandSender::Player {
            uuid: self.uuid,
            name: self.name.clone(),
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum SelectorError {
    #[error("Unknown selector type '{0}'")]
    UnknownType(String),
    #[error("Selector arguments are not supported: {0}")]
    Arguments(String),
}

/// The players currently connected to the host.
pub trait PlayerRegistry {
    fn online_players(&self) -> Vec<OnlinePlayer>;

    /// Resolves a selector or player name to the players it names.
    fn select(
        &self,
        sender: &CommandSender,
        selector: &str,
    ) -> Result<Vec<OnlinePlayer>, SelectorError> {
        select(sender, selector, &self.online_players())
    }
}

/// Resolves `@a`, `@p`, `@r`, `@s`, a player name (case-insensitive) or a
/// hyphenated UUID against `online`.
pub fn select(
    sender: &CommandSender,
    selector: &str,
    online: &[OnlinePlayer],
) -> Result<Vec<OnlinePlayer>, SelectorError> {
    let Some(kind) = selector.strip_prefix('@') else {
        let by_uuid = selector
            .parse::<HyphenatedUUID>()
            .ok()
            .filter(|_| selector.contains('-'));
        let found = online.iter().find(|player| {
            player.name.eq_ignore_ascii_case(selector)
                || by_uuid.is_some_and(|uuid| uuid.0 == player.uuid)
        });
        return Ok(found.cloned().into_iter().collect());
    };

    if kind.contains('[') {
        return Err(SelectorError::Arguments(selector.to_string()));
    }

    let sender_player = match sender {
        CommandSender::Player { uuid, .. } => online.iter().find(|player| player.uuid == *uuid),
        CommandSender::Console => None,
    };

    let selected = match kind {
        "a" => online.to_vec(),
        "p" => {
            let origin = sender_player.map(|player| player.pos).unwrap_or_default();
            online
                .iter()
                .min_by(|a, b| {
                    a.pos
                        .distance_squared(&origin)
                        .total_cmp(&b.pos.distance_squared(&origin))
                })
                .cloned()
                .into_iter()
                .collect()
        }
        "r" => {
            if online.is_empty() {
                Vec::new()
            } else {
                let mut rng = rand::rng();
                vec![online[rng.random_range(0..online.len())].clone()]
            }
        }
        "s" => sender_player.cloned().into_iter().collect(),
        _ => return Err(SelectorError::UnknownType(selector.to_string())),
    };
    Ok(selected)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn online() -> Vec<OnlinePlayer> {
        vec![
            OnlinePlayer::new(1, "Alice").at(PlayerPos::new(100.0, 64.0, 100.0)),
            OnlinePlayer::new(2, "Bob").at(PlayerPos::new(5.0, 64.0, 5.0)),
            OnlinePlayer::new(3, "Carol").at(PlayerPos::new(90.0, 64.0, 90.0)),
        ]
    }

    fn names(players: &[OnlinePlayer]) -> Vec<&str> {
        players.iter().map(|player| player.name.as_str()).collect()
    }

    #[test]
    fn name_is_case_insensitive() {
        let selected = select(&CommandSender::Console, "bOB", &online()).unwrap();
        assert_eq!(names(&selected), ["Bob"]);
    }

    #[test]
    fn unknown_name_selects_nobody() {
        let selected = select(&CommandSender::Console, "Dave", &online()).unwrap();
        assert!(selected.is_empty());
    }

    #[test]
    fn by_uuid() {
        let uuid = HyphenatedUUID(3).to_string();
        let selected = select(&CommandSender::Console, &uuid, &online()).unwrap();
        assert_eq!(names(&selected), ["Carol"]);
    }

    #[test]
    fn all_players() {
        let selected = select(&CommandSender::Console, "@a", &online()).unwrap();
        assert_eq!(names(&selected), ["Alice", "Bob", "Carol"]);
    }

    #[test]
    fn nearest_to_sender() {
        let alice = online()[0].sender();
        let selected = select(&alice, "@p", &online()).unwrap();
        assert_eq!(names(&selected), ["Alice"]);

        let selected = select(&CommandSender::Console, "@p", &online()).unwrap();
        assert_eq!(names(&selected), ["Bob"]);
    }

    #[test]
    fn random_picks_one_online_player() {
        let selected = select(&CommandSender::Console, "@r", &online()).unwrap();
        assert_eq!(selected.len(), 1);
        assert!(online().contains(&selected[0]));
        assert!(select(&CommandSender::Console, "@r", &[]).unwrap().is_empty());
    }

    #[test]
    fn self_selector() {
        let carol = online()[2].sender();
        assert_eq!(names(&select(&carol, "@s", &online()).unwrap()), ["Carol"]);
        assert!(select(&CommandSender::Console, "@s", &online())
            .unwrap()
            .is_empty());
    }

    #[test]
    fn invalid_selectors() {
        assert_eq!(
            select(&CommandSender::Console, "@e", &online()),
            Err(SelectorError::UnknownType("@e".to_string()))
        );
        assert!(matches!(
            select(&CommandSender::Console, "@a[distance=..5]", &online()),
            Err(SelectorError::Arguments(_))
        ));
    }
}
