pub mod posts;
pub mod suggestions;

pub use posts::PostService;
pub use suggestions::{
    EngagementReader, PgEngagementReader, SuggestionEngine, SuggestionPolicy,
};
