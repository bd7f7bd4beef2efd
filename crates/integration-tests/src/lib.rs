//! Shared fixtures for the state-layer integration tests.

#![cfg_attr(not(test), forbid(unsafe_code))]

use niba_vision_core::{CatalogItem, CurrencyCode, Email, Genre, ItemId, Price, UserProfile};

/// A catalog item with the given id and price in cents.
#[must_use]
pub fn book(id: i32, cents: i64) -> CatalogItem {
    CatalogItem {
        id: ItemId::new(id),
        title: format!("Book {id}"),
        author: "Test Author".to_owned(),
        price: Price::from_cents(cents, CurrencyCode::USD),
        cover_image_url: Some(format!("https://covers.example/{id}.jpg")),
        is_new: false,
    }
}

/// A registered user profile.
///
/// # Panics
///
/// Never; the fixture email is valid.
#[must_use]
#[allow(clippy::unwrap_used)]
pub fn reader_profile() -> UserProfile {
    UserProfile {
        full_name: "Grace Hopper".to_owned(),
        email: Email::parse("grace@example.com").unwrap(),
        phone: Some("+1 555 0100".to_owned()),
        avatar_url: None,
        favorite_genres: vec![Genre::History, Genre::NonFiction],
    }
}
