//! Review service
//!
//! Appends reviews and keeps the derived aggregates in step: the game's rating and
//! review count, and the author's review counter, are all written in one transaction.

use tracing::{info, instrument};
use validator::Validate;

use gamehub_core::entities::{Game, Review, UserProfile};
use gamehub_core::error::DomainError;
use gamehub_core::value_objects::DocumentPath;

use crate::dto::SubmitReviewRequest;

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Review service
pub struct ReviewService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ReviewService<'a> {
    /// Create a new ReviewService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Submit a review for a game.
    ///
    /// The new rating is folded into the running mean
    /// `(rating * count + new) / (count + 1)`. Concurrent submissions on the same game
    /// conflict and re-run, so every review lands exactly once.
    ///
    /// # Errors
    /// Validation errors are returned before the store is touched. A missing game is
    /// `GameNotFound`; an exhausted retry budget is `TransactionConflict`.
    #[instrument(skip(self, request), fields(rating = request.rating))]
    pub async fn submit_review(
        &self,
        game_id: &str,
        author_id: &str,
        request: SubmitReviewRequest,
    ) -> ServiceResult<Review> {
        request.validate()?;
        if author_id.trim().is_empty() {
            return Err(
                DomainError::ValidationError("author id cannot be empty".to_string()).into(),
            );
        }

        let review = Review::new(
            self.ctx.generate_id(),
            request.author.trim().to_string(),
            author_id.to_string(),
            request.rating,
            request.comment.trim().to_string(),
        )?;
        let target = game_id.to_string();

        let (review, aggregate) = self
            .ctx
            .transaction(move |tx| {
                let game_id = target.clone();
                let mut review = review.clone();
                Box::pin(async move {
                    let game_path = DocumentPath::game(&game_id).to_string();
                    let mut game: Game = tx
                        .get_keyed(&game_path)
                        .await?
                        .ok_or_else(|| DomainError::GameNotFound(game_id.clone()))?;

                    let profile_path = DocumentPath::user(&review.author_id).to_string();
                    let profile: Option<UserProfile> = tx.get_as(&profile_path).await?;

                    // Stamped per attempt.
                    review.created_at = Some(chrono::Utc::now());
                    game.add_review(review.clone());
                    tx.set(&game_path, &game)?;

                    if let Some(mut profile) = profile {
                        profile.reviews_count += 1;
                        tx.set(&profile_path, &profile)?;
                    }

                    Ok((review, game.aggregate()))
                })
            })
            .await?;

        info!(
            game_id = %game_id,
            review_id = %review.id,
            author_id = %review.author_id,
            rating = aggregate.rating,
            reviews_count = aggregate.count,
            "Review submitted"
        );
        Ok(review)
    }
}
