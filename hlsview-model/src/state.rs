use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle of a player instance.
///
/// Variants are declared in lifecycle order, so `Ord` follows progression:
/// `Uninitialized < Initialized < Paused < Playing < Errored`.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlayerState {
    #[default]
    Uninitialized,
    Initialized,
    Paused,
    Playing,
    Errored,
}

impl PlayerState {
    pub const ALL: [PlayerState; 5] = [
        PlayerState::Uninitialized,
        PlayerState::Initialized,
        PlayerState::Paused,
        PlayerState::Playing,
        PlayerState::Errored,
    ];

    /// Upper-case name used in logs and configuration documents.
    pub fn as_str(&self) -> &'static str {
        match self {
            PlayerState::Uninitialized => "UNINITIALIZED",
            PlayerState::Initialized => "INITIALIZED",
            PlayerState::Paused => "PAUSED",
            PlayerState::Playing => "PLAYING",
            PlayerState::Errored => "ERRORED",
        }
    }

    pub fn parse(name: &str) -> Option<PlayerState> {
        Self::ALL
            .into_iter()
            .find(|state| state.as_str().eq_ignore_ascii_case(name.trim()))
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, PlayerState::Errored)
    }

    /// Whether `next` is a defined lifecycle step from `self`.
    ///
    /// Re-entering the current state always counts as defined. Nothing
    /// leads back to `Uninitialized` and nothing leaves `Errored`.
    pub fn can_transition_to(&self, next: PlayerState) -> bool {
        use PlayerState::*;

        if *self == next {
            return true;
        }
        match (self, next) {
            (Errored, _) => false,
            (_, Errored) => true,
            (Uninitialized, Initialized) => true,
            (Initialized, Paused | Playing) => true,
            (Paused, Playing) | (Playing, Paused) => true,
            _ => false,
        }
    }
}

impl fmt::Display for PlayerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_follows_lifecycle() {
        let mut states = PlayerState::ALL;
        states.reverse();
        states.sort();
        assert_eq!(states, PlayerState::ALL);
        assert!(PlayerState::Initialized < PlayerState::Playing);
    }

    #[test]
    fn defined_transitions() {
        use PlayerState::*;

        assert!(Uninitialized.can_transition_to(Initialized));
        assert!(Initialized.can_transition_to(Paused));
        assert!(Initialized.can_transition_to(Playing));
        assert!(Paused.can_transition_to(Playing));
        assert!(Playing.can_transition_to(Paused));
        assert!(Playing.can_transition_to(Errored));
        assert!(Playing.can_transition_to(Playing));

        assert!(!Playing.can_transition_to(Uninitialized));
        assert!(!Uninitialized.can_transition_to(Playing));
        assert!(!Errored.can_transition_to(Playing));
        assert!(Errored.is_terminal());
    }

    #[test]
    fn names_round_trip_through_parse() {
        for state in PlayerState::ALL {
            assert_eq!(PlayerState::parse(state.as_str()), Some(state));
        }
        assert_eq!(PlayerState::parse(" playing "), Some(PlayerState::Playing));
        assert_eq!(PlayerState::parse("buffering"), None);
    }

    #[test]
    fn serializes_as_upper_case() {
        let json = serde_json::to_string(&PlayerState::Paused).unwrap();
        assert_eq!(json, "\"PAUSED\"");
    }
}
