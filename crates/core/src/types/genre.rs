//! Book genre preference tags.

use serde::{Deserialize, Serialize};

/// Book genres a user can mark as favorites during registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Genre {
    Fiction,
    NonFiction,
    Mystery,
    Horror,
    Thriller,
    History,
}

impl Genre {
    /// All genres, in display order.
    pub const ALL: [Self; 6] = [
        Self::Fiction,
        Self::NonFiction,
        Self::Mystery,
        Self::Horror,
        Self::Thriller,
        Self::History,
    ];

    /// Human-readable label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Fiction => "Fiction",
            Self::NonFiction => "Non-fiction",
            Self::Mystery => "Mystery",
            Self::Horror => "Horror",
            Self::Thriller => "Thriller",
            Self::History => "History",
        }
    }
}
