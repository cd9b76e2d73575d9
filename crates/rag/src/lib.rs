//! Question answering over the report index: prompts, conversation memory,
//! query expansion, intent analysis and source attribution.

pub mod engine;
pub mod error;
pub mod expansion;
pub mod history;
pub mod intent;
pub mod prompts;
pub mod sources;

pub use engine::{EngineConfig, QueryEngine, QueryResult};
pub use error::QueryError;
pub use expansion::{expand_query, is_no_information};
pub use history::{ConversationHistory, ConversationTurn, TurnRole};
pub use intent::{analyze_query_intent, QueryIntent, QueryType};
pub use prompts::join_companies;
pub use sources::format_sources;
