//! Activity service
//!
//! Read-only projections over the game catalog.

use tracing::{debug, instrument};

use gamehub_core::entities::Game;
use gamehub_core::projections::{genre_histogram, project_user_activity, GenreCount, UserActivity};
use gamehub_core::value_objects::collections;

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Activity service
pub struct ActivityService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ActivityService<'a> {
    /// Create a new ActivityService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Reviews written by `user_id` and the games they were written on, newest first
    #[instrument(skip(self))]
    pub async fn get_user_activity(&self, user_id: &str) -> ServiceResult<UserActivity> {
        if user_id.is_empty() {
            return Ok(UserActivity::default());
        }

        let games = self.load_games().await?;
        let activity = project_user_activity(user_id, games);

        debug!(
            user_id = %user_id,
            reviews = activity.reviews.len(),
            games = activity.reviewed_games.len(),
            "Projected user activity"
        );
        Ok(activity)
    }

    /// Genre tags across the games `user_id` reviewed, most frequent first
    #[instrument(skip(self))]
    pub async fn genre_histogram(&self, user_id: &str) -> ServiceResult<Vec<GenreCount>> {
        let activity = self.get_user_activity(user_id).await?;
        Ok(genre_histogram(&activity.reviewed_games))
    }

    async fn load_games(&self) -> ServiceResult<Vec<Game>> {
        let docs = self.ctx.store().list(collections::GAMES).await?;
        Ok(docs
            .iter()
            .map(|doc| doc.decode_keyed::<Game>())
            .collect::<Result<Vec<_>, _>>()?)
    }
}
