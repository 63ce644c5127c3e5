//! User activity projection
//!
//! Derives a user's review history from the review lists embedded in game documents.
//! There is no per-user review index; the projection is recomputed from a full scan.

use serde::Serialize;

use crate::entities::{Game, Review};
use crate::value_objects::Genre;

/// Reviews a user wrote and the games they reviewed
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserActivity {
    /// Grouped per game in scan order, newest first within each game
    pub reviews: Vec<Review>,
    /// Ordered by the user's newest review on each game, newest first
    pub reviewed_games: Vec<Game>,
}

/// Number of reviewed games carrying a genre tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenreCount {
    pub genre: Genre,
    pub games: u32,
}

/// Build the activity of `user_id` from every game in the catalog
pub fn project_user_activity(user_id: &str, games: Vec<Game>) -> UserActivity {
    if user_id.is_empty() {
        return UserActivity::default();
    }

    let mut reviews = Vec::new();
    let mut reviewed = Vec::new();

    for game in games {
        let mut own: Vec<Review> = game.reviews_by(user_id).cloned().collect();
        if own.is_empty() {
            continue;
        }
        own.sort_by_key(|r| std::cmp::Reverse(r.sort_key()));
        let newest = own[0].sort_key();
        reviews.extend(own);
        reviewed.push((newest, game));
    }

    // Stable: games with equal dates keep scan order.
    reviewed.sort_by_key(|(newest, _)| std::cmp::Reverse(*newest));

    UserActivity {
        reviews,
        reviewed_games: reviewed.into_iter().map(|(_, game)| game).collect(),
    }
}

/// Tally the recognized genre tags of the reviewed games.
///
/// Sorted by count descending; equal counts keep the order the genre was first seen.
pub fn genre_histogram(reviewed_games: &[Game]) -> Vec<GenreCount> {
    let mut counts: Vec<GenreCount> = Vec::new();
    for genre in reviewed_games
        .iter()
        .flat_map(|g| g.tags.iter())
        .filter_map(|tag| Genre::from_tag(tag))
    {
        match counts.iter_mut().find(|c| c.genre == genre) {
            Some(entry) => entry.games += 1,
            None => counts.push(GenreCount { genre, games: 1 }),
        }
    }
    counts.sort_by(|a, b| b.games.cmp(&a.games));
    counts
}
