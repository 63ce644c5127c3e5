//! Recognized genre vocabulary

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Genre tag recognized by the profile histogram and favorite-genre field.
///
/// Matching is case-sensitive: a tag `rpg` is not the genre `RPG`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Genre {
    #[serde(rename = "RPG")]
    Rpg,
    Action,
    Strategy,
    Puzzle,
    Racing,
    Adventure,
    Sports,
    Simulation,
}

impl Genre {
    pub const ALL: [Genre; 8] = [
        Self::Rpg,
        Self::Action,
        Self::Strategy,
        Self::Puzzle,
        Self::Racing,
        Self::Adventure,
        Self::Sports,
        Self::Simulation,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Rpg => "RPG",
            Self::Action => "Action",
            Self::Strategy => "Strategy",
            Self::Puzzle => "Puzzle",
            Self::Racing => "Racing",
            Self::Adventure => "Adventure",
            Self::Sports => "Sports",
            Self::Simulation => "Simulation",
        }
    }

    /// Look up a tag, `None` when outside the vocabulary
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|g| g.as_str() == tag)
    }
}

impl FromStr for Genre {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_tag(s).ok_or_else(|| DomainError::UnknownGenre(s.to_string()))
    }
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
