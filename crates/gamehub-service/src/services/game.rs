//! Game service
//!
//! Catalog CRUD. Slugs are kept unique through the `game-slugs` index, which is
//! written in the same transaction as the game it points to. Games stored before
//! the index existed are checked by scanning the catalog.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};
use validator::Validate;

use gamehub_core::entities::Game;
use gamehub_core::error::DomainError;
use gamehub_core::traits::RepoResult;
use gamehub_core::value_objects::{collections, slugify, validate_slug, DocumentPath};
use gamehub_store::Transaction;

use crate::dto::{CreateGameRequest, UpdateGameRequest};

use super::context::ServiceContext;
use super::error::ServiceResult;
use super::user::UserService;

/// Entry of the slug index
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SlugEntry {
    game_id: String,
}

/// Game service
pub struct GameService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> GameService<'a> {
    /// Create a new GameService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Create a game with no reviews; admin only
    #[instrument(skip(self, request))]
    pub async fn create_game(
        &self,
        actor_id: &str,
        request: CreateGameRequest,
    ) -> ServiceResult<Game> {
        request.validate()?;
        UserService::new(self.ctx).require_admin(actor_id).await?;

        let slug = match request.slug.as_deref() {
            Some(slug) => slug.to_string(),
            None => slugify(&request.title),
        };
        validate_slug(&slug)?;

        let mut game = Game::new(
            self.ctx.generate_id(),
            slug,
            request.title.trim().to_string(),
            request.description,
            request.category,
            request.tags,
        );
        game.developer = request.developer;
        game.release_date = request.release_date;
        game.image_url = request.image_url;
        game.website_url = request.website_url;
        game.play_store_url = request.play_store_url;
        game.app_store_url = request.app_store_url;
        game.media = request.media;
        game.news = request.news;

        let game = self
            .ctx
            .transaction(move |tx| {
                let game = game.clone();
                Box::pin(async move {
                    reserve_slug(tx, &game.slug, &game.id).await?;
                    tx.set(&DocumentPath::game(&game.id).to_string(), &game)?;
                    Ok(game)
                })
            })
            .await?;

        info!(game_id = %game.id, slug = %game.slug, "Game created");
        Ok(game)
    }

    /// Get a game by id
    #[instrument(skip(self))]
    pub async fn get_game(&self, game_id: &str) -> ServiceResult<Game> {
        let path = DocumentPath::game(game_id).to_string();
        let doc = self
            .ctx
            .store()
            .get(&path)
            .await?
            .ok_or_else(|| DomainError::GameNotFound(game_id.to_string()))?;
        Ok(doc.decode_keyed()?)
    }

    /// Get a game by slug.
    ///
    /// Uses the slug index; games written before the index existed are found by
    /// scanning the catalog.
    #[instrument(skip(self))]
    pub async fn get_game_by_slug(&self, slug: &str) -> ServiceResult<Game> {
        let index_path = DocumentPath::slug(slug).to_string();
        if let Some(doc) = self.ctx.store().get(&index_path).await? {
            let entry: SlugEntry = doc.decode()?;
            let game_path = DocumentPath::game(&entry.game_id).to_string();
            if let Some(game) = self.ctx.store().get(&game_path).await? {
                let game: Game = game.decode_keyed()?;
                if game.slug == slug {
                    return Ok(game);
                }
            }
        }

        debug!(slug = %slug, "Slug index miss, scanning catalog");
        self.list_games()
            .await?
            .into_iter()
            .find(|g| g.slug == slug)
            .ok_or_else(|| DomainError::GameNotFound(slug.to_string()).into())
    }

    /// List all games ordered by title
    #[instrument(skip(self))]
    pub async fn list_games(&self) -> ServiceResult<Vec<Game>> {
        let docs = self.ctx.store().list(collections::GAMES).await?;
        let mut games = docs
            .iter()
            .map(|doc| doc.decode_keyed::<Game>())
            .collect::<Result<Vec<_>, _>>()?;
        games.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(games)
    }

    /// Update descriptive fields of a game; admin only.
    ///
    /// A slug change moves the index entry in the same transaction.
    #[instrument(skip(self, request))]
    pub async fn update_game(
        &self,
        actor_id: &str,
        game_id: &str,
        request: UpdateGameRequest,
    ) -> ServiceResult<Game> {
        request.validate()?;
        if let Some(slug) = request.slug.as_deref() {
            validate_slug(slug)?;
        }
        UserService::new(self.ctx).require_admin(actor_id).await?;

        let game_id = game_id.to_string();
        let game = self
            .ctx
            .transaction(move |tx| {
                let game_id = game_id.clone();
                let request = request.clone();
                Box::pin(async move {
                    let path = DocumentPath::game(&game_id).to_string();
                    let mut game: Game = tx
                        .get_keyed(&path)
                        .await?
                        .ok_or_else(|| DomainError::GameNotFound(game_id.clone()))?;

                    if let Some(slug) = request.slug {
                        if slug != game.slug {
                            reserve_slug(tx, &slug, &game.id).await?;
                            release_slug(tx, &game.slug, &game.id).await?;
                            game.slug = slug;
                        }
                    }
                    if let Some(title) = request.title {
                        game.title = title.trim().to_string();
                    }
                    if let Some(description) = request.description {
                        game.description = description;
                    }
                    if let Some(category) = request.category {
                        game.category = category;
                    }
                    if let Some(tags) = request.tags {
                        game.tags = tags;
                    }
                    if request.developer.is_some() {
                        game.developer = request.developer;
                    }
                    if request.release_date.is_some() {
                        game.release_date = request.release_date;
                    }
                    if request.image_url.is_some() {
                        game.image_url = request.image_url;
                    }
                    if request.website_url.is_some() {
                        game.website_url = request.website_url;
                    }
                    if request.play_store_url.is_some() {
                        game.play_store_url = request.play_store_url;
                    }
                    if request.app_store_url.is_some() {
                        game.app_store_url = request.app_store_url;
                    }
                    if let Some(media) = request.media {
                        game.media = media;
                    }
                    if let Some(news) = request.news {
                        game.news = news;
                    }

                    tx.set(&path, &game)?;
                    Ok(game)
                })
            })
            .await?;

        info!(game_id = %game.id, slug = %game.slug, "Game updated");
        Ok(game)
    }

    /// Delete a game and its slug index entry; admin only
    #[instrument(skip(self))]
    pub async fn delete_game(&self, actor_id: &str, game_id: &str) -> ServiceResult<()> {
        UserService::new(self.ctx).require_admin(actor_id).await?;

        let id = game_id.to_string();
        self.ctx
            .transaction(move |tx| {
                let id = id.clone();
                Box::pin(async move {
                    let path = DocumentPath::game(&id).to_string();
                    let game: Game = tx
                        .get_keyed(&path)
                        .await?
                        .ok_or_else(|| DomainError::GameNotFound(id.clone()))?;
                    release_slug(tx, &game.slug, &game.id).await?;
                    tx.delete(&path);
                    Ok(())
                })
            })
            .await?;

        info!(game_id = %game_id, "Game deleted");
        Ok(())
    }
}

/// Slug field of a stored game, read without decoding the rest
#[derive(Debug, Deserialize)]
struct StoredSlug {
    #[serde(default)]
    slug: String,
}

/// Point `slug` at `game_id`, failing if another game holds it.
///
/// Without an index entry the catalog is scanned, so games that were never
/// indexed still own their slug.
async fn reserve_slug(tx: &mut Transaction<'_>, slug: &str, game_id: &str) -> RepoResult<()> {
    let path = DocumentPath::slug(slug).to_string();
    match tx.get_as::<SlugEntry>(&path).await? {
        Some(entry) if entry.game_id != game_id => {
            return Err(DomainError::SlugTaken(slug.to_string()));
        }
        Some(_) => {}
        None => {
            for doc in tx.list(collections::GAMES).await? {
                if doc.id() != game_id && doc.decode::<StoredSlug>()?.slug == slug {
                    debug!(slug = %slug, holder = %doc.id(), "Slug held by unindexed game");
                    return Err(DomainError::SlugTaken(slug.to_string()));
                }
            }
        }
    }
    tx.set(
        &path,
        &SlugEntry {
            game_id: game_id.to_string(),
        },
    )
}

/// Drop the index entry for `slug` if it still points at `game_id`
async fn release_slug(tx: &mut Transaction<'_>, slug: &str, game_id: &str) -> RepoResult<()> {
    let path = DocumentPath::slug(slug).to_string();
    if let Some(entry) = tx.get_as::<SlugEntry>(&path).await? {
        if entry.game_id == game_id {
            tx.delete(&path);
        }
    }
    Ok(())
}
