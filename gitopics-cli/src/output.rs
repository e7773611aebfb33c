//! Result writers
//!
//! CSV and JSON renderings of the per-repository topic results, written to a
//! file or to the console.

use anyhow::Context;
use clap::ValueEnum;
use serde::Serialize;
use std::path::Path;

use gitopics_core::RepositoryRecord;
use gitopics_topics::TopicResult;

/// Supported output formats.
///
/// RDF serializations are produced by the external graph collaborator, not
/// by this tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Csv,
    Json,
}

/// Write the results in the requested format
pub fn write_results(
    records: &[RepositoryRecord],
    topics: &[Vec<TopicResult>],
    format: OutputFormat,
    out_file: Option<&Path>,
) -> anyhow::Result<()> {
    let rendered = match format {
        OutputFormat::Csv => render_csv(records, topics),
        OutputFormat::Json => render_json(records, topics)?,
    };

    match out_file {
        Some(path) => std::fs::write(path, rendered)
            .with_context(|| format!("Failed to write results to {}", path.display()))?,
        None => print!("{}", rendered),
    }

    Ok(())
}

/// CSV rendering: one row per repository, topics joined by " - "
fn render_csv(records: &[RepositoryRecord], topics: &[Vec<TopicResult>]) -> String {
    let mut out = String::from("repo_id,topics\n");

    for (record, repo_topics) in records.iter().zip(topics) {
        let joined = repo_topics
            .iter()
            .map(|topic| topic.to_string())
            .collect::<Vec<_>>()
            .join(" - ");
        out.push_str(&format!("{},{}\n", record.gh_id, csv_field(&joined)));
    }

    out
}

/// Quote a CSV field when it contains a separator, quote, or line break
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[derive(Serialize)]
struct RepositoryEntry<'a> {
    source_url: String,
    author: &'a str,
    name: &'a str,
    languages: String,
    topics: &'a [TopicResult],
}

/// JSON rendering: an object keyed by repository id
fn render_json(
    records: &[RepositoryRecord],
    topics: &[Vec<TopicResult>],
) -> anyhow::Result<String> {
    let mut result = serde_json::Map::new();

    for (record, repo_topics) in records.iter().zip(topics) {
        let entry = RepositoryEntry {
            source_url: record.source_url(),
            author: &record.owner_name,
            name: &record.name,
            languages: record.languages_text(),
            topics: repo_topics,
        };
        result.insert(record.gh_id.to_string(), serde_json::to_value(entry)?);
    }

    let rendered = serde_json::to_string_pretty(&serde_json::Value::Object(result))?;
    Ok(rendered + "\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn record(gh_id: u64) -> RepositoryRecord {
        RepositoryRecord {
            gh_id,
            name: "demo".to_string(),
            description: "A demo".to_string(),
            owner_name: "octocat".to_string(),
            languages: BTreeMap::from([("Rust".to_string(), 10), ("C".to_string(), 5)]),
            readme_text: String::new(),
            issues: vec![],
            commit_messages: vec![],
            filenames: vec![],
            comments: vec![],
        }
    }

    fn topic(label: &str, score: f64) -> TopicResult {
        TopicResult {
            labels: vec![label.to_string()],
            external_ids: vec![format!("https://example.org/{label}")],
            descriptions: vec![],
            score,
        }
    }

    #[test]
    fn csv_rows_join_topics_with_dashes() {
        let rendered = render_csv(
            &[record(1)],
            &[vec![topic("parsing", 1.0), topic("networking", 0.5)]],
        );
        assert_eq!(rendered, "repo_id,topics\n1,parsing - networking\n");
    }

    #[test]
    fn csv_fields_with_separators_are_quoted() {
        let multi_label = TopicResult {
            labels: vec!["parsing".to_string(), "compilers".to_string()],
            external_ids: vec![],
            descriptions: vec![],
            score: 1.0,
        };
        let rendered = render_csv(&[record(1)], &[vec![multi_label]]);
        assert_eq!(rendered, "repo_id,topics\n1,\"parsing, compilers\"\n");
    }

    #[test]
    fn json_entries_are_keyed_by_repository_id() {
        let rendered = render_json(&[record(7)], &[vec![topic("parsing", 0.5)]]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();

        let entry = &value["7"];
        assert_eq!(entry["source_url"], "https://www.github.com/octocat/demo");
        assert_eq!(entry["author"], "octocat");
        assert_eq!(entry["name"], "demo");
        assert_eq!(entry["languages"], "C: 5|Rust: 10");
        assert_eq!(entry["topics"][0]["labels"][0], "parsing");
        assert_eq!(entry["topics"][0]["score"], 0.5);
    }

    #[test]
    fn empty_topic_lists_render_as_empty_rows() {
        let rendered = render_csv(&[record(1)], &[vec![]]);
        assert_eq!(rendered, "repo_id,topics\n1,\n");
    }
}
