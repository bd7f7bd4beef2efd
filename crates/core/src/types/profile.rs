//! Authenticated user profile.

use serde::{Deserialize, Serialize};

use super::email::Email;
use super::genre::Genre;

/// Profile of an authenticated user.
///
/// Produced by the authentication service on successful login or
/// registration and handed to the session store. Credentials never appear
/// here; the auth service keeps them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Full display name.
    pub full_name: String,
    /// Unique account key.
    pub email: Email,
    /// Optional contact phone number.
    pub phone: Option<String>,
    /// Optional avatar image reference.
    pub avatar_url: Option<String>,
    /// Favorite genres picked at registration.
    #[serde(default)]
    pub favorite_genres: Vec<Genre>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample() -> UserProfile {
        UserProfile {
            full_name: "Ada Lovelace".to_owned(),
            email: Email::parse("ada@example.com").unwrap(),
            phone: Some("+57 300 000 0000".to_owned()),
            avatar_url: None,
            favorite_genres: vec![Genre::Fiction, Genre::History],
        }
    }

    #[test]
    fn test_serde_round_trip() {
        let profile = sample();
        let json = serde_json::to_string(&profile).unwrap();
        let back: UserProfile = serde_json::from_str(&json).unwrap();
        assert_eq!(back, profile);
    }

    #[test]
    fn test_missing_genres_defaults_to_empty() {
        let json = r#"{
            "full_name": "Ada Lovelace",
            "email": "ada@example.com",
            "phone": null,
            "avatar_url": null
        }"#;
        let profile: UserProfile = serde_json::from_str(json).unwrap();
        assert!(profile.favorite_genres.is_empty());
    }
}
