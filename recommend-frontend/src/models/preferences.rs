use serde::{Deserialize, Serialize};

/// The user's taste profile as supplied by the hosting UI.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserPreferences {
    #[serde(default)]
    pub name: Option<String>,

    /// Interest labels ("Fine Dining", "Museums", ...).
    #[serde(default)]
    pub interests: Vec<String>,

    /// Venues the user marked as liked; feeds the taste-graph profile.
    #[serde(default)]
    pub liked_venues: Vec<String>,
}

impl UserPreferences {
    pub fn is_empty(&self) -> bool {
        self.interests.is_empty() && self.liked_venues.is_empty()
    }
}
