//! User service
//!
//! Lazily created profiles, profile edits, roles and the per-user review counter.

use std::str::FromStr;

use tracing::{info, instrument, warn};
use validator::Validate;

use gamehub_core::entities::{Game, UserProfile, UserRole};
use gamehub_core::error::DomainError;
use gamehub_core::value_objects::{collections, DocumentPath, Genre};

use crate::dto::{SyncProfileRequest, UpdateProfileRequest, UpdateRoleRequest};

use super::context::{Caller, ServiceContext};
use super::error::ServiceResult;

/// User service
pub struct UserService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> UserService<'a> {
    /// Create a new UserService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Fetch the caller's profile, creating it on first sight.
    ///
    /// Placeholder name and email are upgraded when the request carries real values,
    /// and legacy profiles without a review counter get one written.
    #[instrument(skip(self, request), fields(user_id = %caller.user_id))]
    pub async fn get_or_create_profile(
        &self,
        caller: &Caller,
        request: SyncProfileRequest,
    ) -> ServiceResult<UserProfile> {
        request.validate()?;
        require_user_id(&caller.user_id)?;

        let uid = caller.user_id.clone();
        let name = caller.name.clone().or(request.name);
        let email = request.email;
        let photo_url = request.photo_url;

        let (profile, created) = self
            .ctx
            .transaction(move |tx| {
                let uid = uid.clone();
                let (name, email, photo_url) = (name.clone(), email.clone(), photo_url.clone());
                Box::pin(async move {
                    let path = DocumentPath::user(&uid).to_string();
                    let Some(doc) = tx.get(&path).await? else {
                        let profile = UserProfile::new(uid, name, email, photo_url);
                        tx.set(&path, &profile)?;
                        return Ok((profile, true));
                    };

                    let mut profile: UserProfile = doc.decode()?;
                    let mut dirty = profile.upgrade_identity(name, email, photo_url);
                    if profile.uid.is_empty() {
                        profile.uid = uid;
                        dirty = true;
                    }
                    if doc.data.get("reviewsCount").is_none() {
                        dirty = true;
                    }
                    if dirty {
                        tx.set(&path, &profile)?;
                    }
                    Ok((profile, false))
                })
            })
            .await?;

        if created {
            info!(user_id = %profile.uid, "Profile created");
        }
        Ok(profile)
    }

    /// Get a profile by user id
    #[instrument(skip(self))]
    pub async fn get_profile(&self, user_id: &str) -> ServiceResult<UserProfile> {
        let path = DocumentPath::user(user_id).to_string();
        let doc = self
            .ctx
            .store()
            .get(&path)
            .await?
            .ok_or_else(|| DomainError::UserNotFound(user_id.to_string()))?;
        Ok(doc.decode()?)
    }

    /// Update the caller's own profile
    #[instrument(skip(self, request))]
    pub async fn update_profile(
        &self,
        user_id: &str,
        request: UpdateProfileRequest,
    ) -> ServiceResult<UserProfile> {
        request.validate()?;

        // An empty genre clears the preference; anything else must be recognized.
        let favorite_genre = match request.favorite_genre.as_deref().map(str::trim) {
            None => None,
            Some("") => Some(None),
            Some(tag) => Some(Some(Genre::from_str(tag)?.as_str().to_string())),
        };

        let uid = user_id.to_string();
        let profile = self
            .ctx
            .transaction(move |tx| {
                let uid = uid.clone();
                let request = request.clone();
                let favorite_genre = favorite_genre.clone();
                Box::pin(async move {
                    let path = DocumentPath::user(&uid).to_string();
                    let mut profile: UserProfile = tx
                        .get_as(&path)
                        .await?
                        .ok_or_else(|| DomainError::UserNotFound(uid.clone()))?;

                    if let Some(name) = request.name {
                        profile.name = name.trim().to_string();
                    }
                    if let Some(bio) = request.bio {
                        profile.bio = bio;
                    }
                    if let Some(link) = request.social_link {
                        profile.social_link = link.trim().to_string();
                    }
                    if let Some(genre) = favorite_genre {
                        profile.favorite_genre = genre;
                    }

                    tx.set(&path, &profile)?;
                    Ok(profile)
                })
            })
            .await?;

        info!(user_id = %profile.uid, "Profile updated");
        Ok(profile)
    }

    /// Change a user's role; admin only
    #[instrument(skip(self))]
    pub async fn update_role(
        &self,
        actor_id: &str,
        target_id: &str,
        request: UpdateRoleRequest,
    ) -> ServiceResult<UserProfile> {
        self.require_admin(actor_id).await?;

        let uid = target_id.to_string();
        let role = request.role;
        let profile = self
            .ctx
            .transaction(move |tx| {
                let uid = uid.clone();
                Box::pin(async move {
                    let path = DocumentPath::user(&uid).to_string();
                    let mut profile: UserProfile = tx
                        .get_as(&path)
                        .await?
                        .ok_or_else(|| DomainError::UserNotFound(uid.clone()))?;
                    if profile.role != role {
                        profile.role = role;
                        tx.set(&path, &profile)?;
                    }
                    Ok(profile)
                })
            })
            .await?;

        info!(
            actor_id = %actor_id,
            target_id = %target_id,
            role = role.as_str(),
            "Role updated"
        );
        Ok(profile)
    }

    /// List every profile ordered by user id
    #[instrument(skip(self))]
    pub async fn list_profiles(&self) -> ServiceResult<Vec<UserProfile>> {
        let docs = self.ctx.store().list(collections::USERS).await?;
        let profiles = docs
            .iter()
            .map(|doc| doc.decode_keyed::<UserProfile>())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(profiles)
    }

    /// Recompute a user's review counter from the game catalog; admin only.
    ///
    /// Repairs drift between the counter and the reviews actually embedded in games.
    #[instrument(skip(self))]
    pub async fn reconcile_review_count(
        &self,
        actor_id: &str,
        user_id: &str,
    ) -> ServiceResult<UserProfile> {
        self.require_admin(actor_id).await?;

        let uid = user_id.to_string();
        let (profile, previous) = self
            .ctx
            .transaction(move |tx| {
                let uid = uid.clone();
                Box::pin(async move {
                    let path = DocumentPath::user(&uid).to_string();
                    let mut profile: UserProfile = tx
                        .get_as(&path)
                        .await?
                        .ok_or_else(|| DomainError::UserNotFound(uid.clone()))?;

                    let mut actual = 0u32;
                    for doc in tx.list(collections::GAMES).await? {
                        let game: Game = doc.decode()?;
                        let own = game.reviews_by(&uid).count();
                        actual = actual.saturating_add(u32::try_from(own).unwrap_or(u32::MAX));
                    }

                    let previous = profile.reviews_count;
                    if previous != actual {
                        profile.reviews_count = actual;
                        tx.set(&path, &profile)?;
                    }
                    Ok((profile, previous))
                })
            })
            .await?;

        if previous == profile.reviews_count {
            info!(user_id = %user_id, count = previous, "Review count already consistent");
        } else {
            warn!(
                user_id = %user_id,
                previous,
                actual = profile.reviews_count,
                "Review count reconciled"
            );
        }
        Ok(profile)
    }

    /// Fail unless `user_id` has the admin role
    pub async fn require_admin(&self, user_id: &str) -> ServiceResult<()> {
        let path = DocumentPath::user(user_id).to_string();
        let is_admin = match self.ctx.store().get(&path).await? {
            Some(doc) => doc.decode::<UserProfile>()?.role == UserRole::Admin,
            None => false,
        };
        if is_admin {
            Ok(())
        } else {
            Err(DomainError::MissingPermission("admin".to_string()).into())
        }
    }
}

fn require_user_id(user_id: &str) -> Result<(), DomainError> {
    if user_id.trim().is_empty() {
        return Err(DomainError::ValidationError(
            "user id cannot be empty".to_string(),
        ));
    }
    Ok(())
}
