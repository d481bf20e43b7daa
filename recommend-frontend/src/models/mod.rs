pub mod chat;
pub mod preferences;
pub mod venue;

pub use chat::{ChatMessage, Role};
pub use preferences::UserPreferences;
pub use venue::{RecommendationSet, Venue};
