//! User profile entity

use serde::{Deserialize, Serialize};

use crate::traits::Keyed;

/// Placeholder name for profiles created without a display name
pub const ANONYMOUS_NAME: &str = "Anonymous User";
/// Placeholder email for profiles created without an email
pub const NO_EMAIL: &str = "No email provided";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    #[default]
    User,
}

impl UserRole {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::User => "user",
        }
    }
}

/// Profile document stored at `users/{uid}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default)]
    pub uid: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: UserRole,
    #[serde(default, rename = "photoURL")]
    pub photo_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub favorite_genre: Option<String>,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub social_link: String,
    /// Number of reviews this user has written
    #[serde(default)]
    pub reviews_count: u32,
}

impl UserProfile {
    /// Create a fresh profile, falling back to placeholders for missing identity data
    pub fn new(
        uid: String,
        name: Option<String>,
        email: Option<String>,
        photo_url: Option<String>,
    ) -> Self {
        Self {
            uid,
            name: non_empty(name).unwrap_or_else(|| ANONYMOUS_NAME.to_string()),
            email: non_empty(email).unwrap_or_else(|| NO_EMAIL.to_string()),
            role: UserRole::User,
            photo_url: non_empty(photo_url).unwrap_or_default(),
            favorite_genre: None,
            bio: String::new(),
            social_link: String::new(),
            reviews_count: 0,
        }
    }

    /// Replace placeholder identity fields with better data.
    ///
    /// Returns `true` when anything changed.
    pub fn upgrade_identity(
        &mut self,
        name: Option<String>,
        email: Option<String>,
        photo_url: Option<String>,
    ) -> bool {
        let mut changed = false;
        if let Some(name) = non_empty(name) {
            if self.name.is_empty() || self.name == ANONYMOUS_NAME {
                self.name = name;
                changed = true;
            }
        }
        if let Some(email) = non_empty(email) {
            if self.email.is_empty() || self.email == NO_EMAIL {
                self.email = email;
                changed = true;
            }
        }
        if let Some(photo_url) = non_empty(photo_url) {
            if self.photo_url != photo_url {
                self.photo_url = photo_url;
                changed = true;
            }
        }
        changed
    }

    #[inline]
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl Keyed for UserProfile {
    fn fill_id(&mut self, id: &str) {
        if self.uid.is_empty() {
            self.uid = id.to_string();
        }
    }
}
