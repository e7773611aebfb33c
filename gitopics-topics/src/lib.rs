//! Gitopics Topics - corpus assembly and the topic-model seam
//!
//! Builds the per-repository corpus text and defines the contract to the
//! externally-supplied topic-extraction model.

pub mod corpus;
pub mod model;
pub mod types;

pub use corpus::{assemble, corpus_text};
pub use model::{load_model, KeywordModel, ModelState, TopicModel, TopicState};
pub use types::TopicResult;
