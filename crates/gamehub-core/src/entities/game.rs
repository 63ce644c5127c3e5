//! Game entity - a catalog entry with its embedded reviews

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::Review;
use crate::traits::Keyed;

/// Storefront category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameCategory {
    #[serde(rename = "PC")]
    Pc,
    Mobile,
}

impl GameCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pc => "PC",
            Self::Mobile => "Mobile",
        }
    }
}

/// Gallery item shown on a game page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Media {
    Image {
        url: String,
    },
    Youtube {
        #[serde(rename = "videoId")]
        video_id: String,
    },
}

/// Developer news post attached to a game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsUpdate {
    pub id: String,
    pub title: String,
    pub date: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Game entity
///
/// `rating` and `reviews_count` are derived from `reviews` and are only ever changed
/// through [`Game::add_review`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    /// Filled from the document key when the body omits it
    #[serde(default)]
    pub id: String,
    pub slug: String,
    pub title: String,
    pub description: String,
    pub category: GameCategory,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub reviews_count: u32,
    #[serde(default)]
    pub reviews: Vec<Review>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub developer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub play_store_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_store_url: Option<String>,
    #[serde(default)]
    pub media: Vec<Media>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub news: Vec<NewsUpdate>,
    /// Keys this type does not model, kept so rewrites do not drop them
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Game {
    /// Create a new Game with no reviews
    pub fn new(
        id: String,
        slug: String,
        title: String,
        description: String,
        category: GameCategory,
        tags: Vec<String>,
    ) -> Self {
        Self {
            id,
            slug,
            title,
            description,
            category,
            tags,
            rating: 0.0,
            reviews_count: 0,
            reviews: Vec::new(),
            developer: None,
            release_date: None,
            image_url: None,
            website_url: None,
            play_store_url: None,
            app_store_url: None,
            media: Vec::new(),
            news: Vec::new(),
            extra: Map::new(),
        }
    }

    /// Current aggregate over the embedded reviews
    #[inline]
    pub fn aggregate(&self) -> RatingAggregate {
        RatingAggregate {
            rating: self.rating,
            count: self.reviews_count,
        }
    }

    /// Append a review and fold its rating into the running mean
    pub fn add_review(&mut self, review: Review) {
        let next = self.aggregate().with_rating(review.rating);
        self.rating = next.rating;
        self.reviews_count = next.count;
        self.reviews.push(review);
    }

    /// Reviews written by `user_id`, in stored order
    pub fn reviews_by<'a>(&'a self, user_id: &'a str) -> impl Iterator<Item = &'a Review> + 'a {
        self.reviews.iter().filter(move |r| r.author_id == user_id)
    }
}

impl Keyed for Game {
    fn fill_id(&mut self, id: &str) {
        if self.id.is_empty() {
            self.id = id.to_string();
        }
    }
}

/// Running mean of review ratings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatingAggregate {
    pub rating: f64,
    pub count: u32,
}

impl RatingAggregate {
    pub const EMPTY: Self = Self {
        rating: 0.0,
        count: 0,
    };

    /// Aggregate after one more rating: `(rating * count + r) / (count + 1)`
    #[must_use]
    pub fn with_rating(self, rating: u8) -> Self {
        let count = self.count + 1;
        let total = self.rating * f64::from(self.count) + f64::from(rating);
        Self {
            rating: total / f64::from(count),
            count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn review(author_id: &str, rating: u8) -> Review {
        Review::new(
            format!("r-{author_id}-{rating}"),
            "Reviewer".to_string(),
            author_id.to_string(),
            rating,
            "Long enough comment".to_string(),
        )
        .unwrap()
    }

    fn game() -> Game {
        Game::new(
            "g1".to_string(),
            "hollow-knight".to_string(),
            "Hollow Knight".to_string(),
            "Metroidvania".to_string(),
            GameCategory::Pc,
            vec!["Action".to_string(), "Adventure".to_string()],
        )
    }

    #[test]
    fn test_first_review_sets_rating() {
        let next = RatingAggregate::EMPTY.with_rating(5);
        assert_eq!(next.count, 1);
        assert!((next.rating - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_incremental_mean() {
        let next = RatingAggregate {
            rating: 4.0,
            count: 3,
        }
        .with_rating(2);
        assert_eq!(next.count, 4);
        assert!((next.rating - 3.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_add_review_keeps_count_in_sync() {
        let mut game = game();
        game.add_review(review("u1", 5));
        game.add_review(review("u2", 2));
        game.add_review(review("u1", 3));

        assert_eq!(game.reviews_count, 3);
        assert_eq!(game.reviews.len(), 3);
        assert!((game.rating - 10.0 / 3.0).abs() < 1e-9);
        assert_eq!(game.reviews_by("u1").count(), 2);
    }

    #[test]
    fn test_category_serde() {
        assert_eq!(serde_json::to_string(&GameCategory::Pc).unwrap(), "\"PC\"");
        let value = serde_json::to_value(game()).unwrap();
        assert_eq!(value["category"], "PC");
        assert_eq!(value["reviewsCount"], 0);
        assert!(value.get("developer").is_none());
        assert!(value.get("news").is_none());
    }

    #[test]
    fn test_stored_game_keeps_unmodelled_fields() {
        let stored = serde_json::json!({
            "slug": "stardew-valley",
            "title": "Stardew Valley",
            "description": "Farming",
            "category": "PC",
            "rating": 4,
            "reviewsCount": 1,
            "websiteUrl": "https://stardewvalley.net",
            "media": [
                {"type": "image", "url": "https://img.example/1.png"},
                {"type": "youtube", "videoId": "ot7uXNQskhs"}
            ],
            "news": [{"id": "n1", "title": "1.6", "date": "2024-03-19", "content": "Update"}],
            "featured": true,
            "reviews": [{
                "author": "Ann",
                "authorId": "u1",
                "rating": 4,
                "comment": "Relaxing",
                "avatarUrl": "https://img.example/ann.png",
                "helpful": 3
            }]
        });

        let mut game: Game = serde_json::from_value(stored).unwrap();
        game.fill_id("g1");
        assert_eq!(game.id, "g1");
        assert_eq!(
            game.media[1],
            Media::Youtube {
                video_id: "ot7uXNQskhs".to_string()
            }
        );
        assert_eq!(game.reviews[0].avatar_url.as_deref(), Some("https://img.example/ann.png"));

        game.add_review(review("u2", 2));
        let value = serde_json::to_value(&game).unwrap();
        assert_eq!(value["websiteUrl"], "https://stardewvalley.net");
        assert_eq!(value["media"][0]["type"], "image");
        assert_eq!(value["media"][1]["videoId"], "ot7uXNQskhs");
        assert_eq!(value["news"][0]["title"], "1.6");
        assert_eq!(value["featured"], true);
        assert_eq!(value["reviews"][0]["helpful"], 3);
        assert_eq!(value["reviewsCount"], 2);
    }
}
