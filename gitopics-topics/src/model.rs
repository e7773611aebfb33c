//! Topic-extraction model seam
//!
//! The model is an external collaborator: corpus strings in, parallel topic
//! lists out. `TopicModel` is the contract; the shipped implementation is a
//! keyword-dictionary model restored from persisted JSON state.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

use gitopics_core::{ErrorContext, GitopicsError, GitopicsResult};

use crate::types::TopicResult;

/// Text-to-topics transform over a whole corpus
pub trait TopicModel: Send + Sync {
    /// Produce one topic list per input text, in input order
    fn transform(&self, texts: &[String]) -> GitopicsResult<Vec<Vec<TopicResult>>>;
}

/// Persisted model state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelState {
    pub topics: Vec<TopicState>,
}

/// One persisted topic: its presentation data plus the terms that signal it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicState {
    pub labels: Vec<String>,
    #[serde(default)]
    pub external_ids: Vec<String>,
    #[serde(default)]
    pub descriptions: Vec<String>,
    pub terms: Vec<String>,
}

/// Keyword-dictionary topic model.
///
/// Scores a topic by the fraction of its terms present in the text;
/// zero-score topics are dropped and the rest sorted by descending score.
pub struct KeywordModel {
    topics: Vec<TopicState>,
}

impl KeywordModel {
    pub fn new(state: ModelState) -> Self {
        let topics = state
            .topics
            .into_iter()
            .map(|mut topic| {
                for term in &mut topic.terms {
                    *term = term.to_lowercase();
                }
                topic
            })
            .collect();
        Self { topics }
    }

    fn score(&self, topic: &TopicState, text: &str) -> f64 {
        if topic.terms.is_empty() {
            return 0.0;
        }
        let matched = topic
            .terms
            .iter()
            .filter(|term| text.contains(term.as_str()))
            .count();
        matched as f64 / topic.terms.len() as f64
    }
}

impl TopicModel for KeywordModel {
    fn transform(&self, texts: &[String]) -> GitopicsResult<Vec<Vec<TopicResult>>> {
        let mut results = Vec::with_capacity(texts.len());

        for text in texts {
            let lowered = text.to_lowercase();

            let mut topics: Vec<TopicResult> = self
                .topics
                .iter()
                .filter_map(|topic| {
                    let score = self.score(topic, &lowered);
                    (score > 0.0).then(|| TopicResult {
                        labels: topic.labels.clone(),
                        external_ids: topic.external_ids.clone(),
                        descriptions: topic.descriptions.clone(),
                        score,
                    })
                })
                .collect();

            topics.sort_by(|a, b| {
                b.score
                    .partial_cmp(&a.score)
                    .unwrap_or(std::cmp::Ordering::Equal)
            });

            debug!(topics = topics.len(), "Scored corpus text");
            results.push(topics);
        }

        Ok(results)
    }
}

/// Restore a topic model from its persisted state file
pub fn load_model<P: AsRef<Path>>(path: P) -> GitopicsResult<Box<dyn TopicModel>> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| GitopicsError::Model {
        message: format!("Failed to read model state {}: {}", path.display(), e),
        source: Some(Box::new(e)),
        context: ErrorContext::new("topic_model")
            .with_operation("load_model")
            .with_suggestion("Check that the model state file exists and is readable"),
    })?;

    let state: ModelState = serde_json::from_str(&content).map_err(|e| GitopicsError::Model {
        message: format!("Failed to parse model state {}: {}", path.display(), e),
        source: Some(Box::new(e)),
        context: ErrorContext::new("topic_model")
            .with_operation("load_model")
            .with_suggestion("The state file must be JSON with a top-level topics list"),
    })?;

    info!(topics = state.topics.len(), "Loaded topic model state");
    Ok(Box::new(KeywordModel::new(state)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn state() -> ModelState {
        ModelState {
            topics: vec![
                TopicState {
                    labels: vec!["parsing".to_string()],
                    external_ids: vec!["https://example.org/topic/parsing".to_string()],
                    descriptions: vec!["Parsers and grammars".to_string()],
                    terms: vec!["Parser".to_string(), "grammar".to_string()],
                },
                TopicState {
                    labels: vec!["networking".to_string()],
                    external_ids: vec![],
                    descriptions: vec![],
                    terms: vec!["http".to_string(), "socket".to_string()],
                },
            ],
        }
    }

    #[test]
    fn scores_by_matched_term_fraction() {
        let model = KeywordModel::new(state());
        let results = model
            .transform(&["A parser with an http client".to_string()])
            .expect("transform");

        assert_eq!(results.len(), 1);
        let topics = &results[0];
        assert_eq!(topics.len(), 2);
        // Both topics match one of two terms
        assert!((topics[0].score - 0.5).abs() < f64::EPSILON);
        assert!((topics[1].score - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn zero_score_topics_are_dropped_and_order_is_descending() {
        let model = KeywordModel::new(state());
        let results = model
            .transform(&["A parser for grammar files".to_string()])
            .expect("transform");

        let topics = &results[0];
        assert_eq!(topics.len(), 1);
        assert_eq!(topics[0].labels, vec!["parsing".to_string()]);
        assert!((topics[0].score - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn matching_is_case_insensitive() {
        let model = KeywordModel::new(state());
        let results = model
            .transform(&["PARSER".to_string()])
            .expect("transform");
        assert_eq!(results[0].len(), 1);
    }

    #[test]
    fn empty_corpus_text_matches_nothing() {
        let model = KeywordModel::new(state());
        let results = model.transform(&[String::new()]).expect("transform");
        assert!(results[0].is_empty());
    }

    #[test]
    fn load_model_restores_persisted_state() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("model.json");
        let mut file = std::fs::File::create(&path).expect("create");
        let json = serde_json::to_string(&state()).expect("serialize");
        file.write_all(json.as_bytes()).expect("write");

        let model = load_model(&path).expect("load");
        let results = model
            .transform(&["socket programming".to_string()])
            .expect("transform");
        assert_eq!(results[0][0].labels, vec!["networking".to_string()]);
    }

    #[test]
    fn load_model_rejects_malformed_state() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("model.json");
        std::fs::write(&path, "{\"nope\": true}").expect("write");

        assert!(matches!(
            load_model(&path),
            Err(GitopicsError::Model { .. })
        ));
    }
}
