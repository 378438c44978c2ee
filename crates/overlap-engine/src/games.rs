//! Preferred-game lists and the shared-game suggestion.

use serde::{Deserialize, Serialize};

/// An ordered, duplicate-free list of game names owned by one user.
///
/// Identity is case-sensitive: `"Chess"` and `"chess"` are different games.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct GamePreferenceList {
    games: Vec<String>,
}

impl GamePreferenceList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a game to the end of the list.
    ///
    /// The name is trimmed; empty names and names already present are
    /// ignored. Returns whether the list changed.
    pub fn add(&mut self, game: &str) -> bool {
        let game = game.trim();
        if game.is_empty() || self.contains(game) {
            return false;
        }
        self.games.push(game.to_string());
        true
    }

    /// Remove a game by exact name. Returns whether it was present.
    pub fn remove(&mut self, game: &str) -> bool {
        let before = self.games.len();
        self.games.retain(|g| g != game);
        self.games.len() != before
    }

    pub fn contains(&self, game: &str) -> bool {
        self.games.iter().any(|g| g == game)
    }

    pub fn games(&self) -> &[String] {
        &self.games
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }

    /// Games present in both lists, in `self`'s order.
    pub fn common_with(&self, other: &GamePreferenceList) -> Vec<String> {
        self.games
            .iter()
            .filter(|g| other.contains(g))
            .cloned()
            .collect()
    }
}

impl<S: AsRef<str>> FromIterator<S> for GamePreferenceList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut list = GamePreferenceList::new();
        for game in iter {
            list.add(game.as_ref());
        }
        list
    }
}

impl From<Vec<String>> for GamePreferenceList {
    fn from(games: Vec<String>) -> Self {
        games.into_iter().collect()
    }
}

impl From<GamePreferenceList> for Vec<String> {
    fn from(list: GamePreferenceList) -> Self {
        list.games
    }
}
