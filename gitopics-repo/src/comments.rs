//! Source-archive comment extraction
//!
//! Streams a gzip'd tar snapshot of a repository, runs a comment scanner
//! matched to each recognized source-file type, and returns the surviving
//! block comments grouped by humanized file name.

use std::collections::BTreeMap;
use std::io::{Read, Seek, SeekFrom, Write};
use std::iter::Peekable;
use std::str::Chars;

use flate2::read::GzDecoder;
use regex::Regex;
use tar::Archive;
use tracing::warn;

use gitopics_core::{ErrorContext, GitopicsError, GitopicsResult};

use crate::filter::CommentFilter;

/// Source languages recognized inside repository archives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceLanguage {
    C,
    Cpp,
    CSharp,
    Go,
    Html,
    Java,
    JavaScript,
    Python,
    Ruby,
    Shell,
    Xml,
}

impl SourceLanguage {
    /// Map a file extension to its language, if recognized
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension {
            "c" => Some(SourceLanguage::C),
            "cpp" => Some(SourceLanguage::Cpp),
            "cs" => Some(SourceLanguage::CSharp),
            "go" => Some(SourceLanguage::Go),
            "html" => Some(SourceLanguage::Html),
            "java" => Some(SourceLanguage::Java),
            "js" => Some(SourceLanguage::JavaScript),
            "py" => Some(SourceLanguage::Python),
            "rb" => Some(SourceLanguage::Ruby),
            "sh" => Some(SourceLanguage::Shell),
            "xml" => Some(SourceLanguage::Xml),
            _ => None,
        }
    }

    fn grammar(&self) -> CommentGrammar {
        match self {
            SourceLanguage::C
            | SourceLanguage::Cpp
            | SourceLanguage::CSharp
            | SourceLanguage::Go
            | SourceLanguage::Java
            | SourceLanguage::JavaScript => CommentGrammar::CStyle,
            SourceLanguage::Python | SourceLanguage::Ruby | SourceLanguage::Shell => {
                CommentGrammar::Hash
            }
            SourceLanguage::Html | SourceLanguage::Xml => CommentGrammar::Markup,
        }
    }
}

/// Comment syntax families shared across the recognized languages
#[derive(Debug, Clone, Copy)]
enum CommentGrammar {
    /// `//` line comments and `/* ... */` block comments
    CStyle,
    /// `#` line comments only
    Hash,
    /// `<!-- ... -->` comments
    Markup,
}

/// One extracted comment, before filtering
#[derive(Debug, Clone)]
pub struct Comment {
    /// Comment text without its delimiters
    pub text: String,
    /// Humanized name of the file the comment came from
    pub file_name: String,
    /// Whether the comment uses the language's block (multi-line) syntax
    pub block: bool,
}

/// Extracts comments from repository source archives.
///
/// Holds the compiled camel-case splitter used for file-name humanization.
pub struct CommentExtractor {
    camel_boundary: Regex,
}

impl Default for CommentExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl CommentExtractor {
    pub fn new() -> Self {
        Self {
            camel_boundary: Regex::new(r"([a-z])([A-Z])").unwrap(),
        }
    }

    /// Extract the block comments of every recognized source file in a
    /// gzip'd tar archive, keyed by humanized file name.
    ///
    /// Filters run in order over each file's raw comment list before the
    /// block-only selection; a file whose comments are all rejected keeps
    /// its key with an empty list. Entries that cannot be decoded or
    /// scanned are skipped and reported, without aborting the archive.
    pub fn extract(
        &self,
        archive: &[u8],
        filters: &[Box<dyn CommentFilter>],
    ) -> GitopicsResult<BTreeMap<String, Vec<String>>> {
        // Spool the download into an unnamed temporary file; the handle is
        // the only reference, so the file is gone once extraction returns.
        let mut spool = tempfile::tempfile()?;
        spool.write_all(archive)?;
        spool.seek(SeekFrom::Start(0))?;

        let mut tar = Archive::new(GzDecoder::new(spool));
        let entries = tar.entries().map_err(|e| GitopicsError::Archive {
            message: format!("Failed to read archive: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("comment_extractor").with_operation("read_entries"),
        })?;

        let mut raw_comments: BTreeMap<String, Vec<Comment>> = BTreeMap::new();

        for entry in entries {
            let mut entry = entry.map_err(|e| GitopicsError::Archive {
                message: format!("Malformed archive entry: {}", e),
                source: Some(Box::new(e)),
                context: ErrorContext::new("comment_extractor").with_operation("read_entries"),
            })?;

            if !entry.header().entry_type().is_file() {
                continue;
            }

            let path = match entry.path() {
                Ok(path) => path.to_string_lossy().into_owned(),
                Err(e) => {
                    warn!(error = %e, "Skipping archive entry with unreadable path");
                    continue;
                }
            };

            let Some(language) = language_of(&path) else {
                continue;
            };

            let mut raw = Vec::new();
            if let Err(e) = entry.read_to_end(&mut raw) {
                warn!(entry = %path, error = %e, "Skipping unreadable archive entry");
                continue;
            }

            let text = match String::from_utf8(raw) {
                Ok(text) => text,
                Err(_) => {
                    warn!(entry = %path, "Skipping archive entry that is not valid UTF-8");
                    continue;
                }
            };

            let file_name = self.humanize_file_name(&path);
            let scanned = scan_comments(&text, language, &file_name);
            raw_comments.entry(file_name).or_default().extend(scanned);
        }

        let mut result = BTreeMap::new();
        for (file_name, comments) in raw_comments {
            let kept = comments
                .into_iter()
                .filter(|comment| filters.iter().all(|filter| filter.accepts(comment)))
                .filter(|comment| comment.block)
                .map(|comment| comment.text.trim().to_string())
                .collect();
            result.insert(file_name, kept);
        }

        Ok(result)
    }

    /// Humanize an archive path into a display name: path components and the
    /// extension are dropped, `_`/`-`/`.` become spaces, and camel-case
    /// boundaries are split (`myFile_name-test.py` -> `my File name test`).
    fn humanize_file_name(&self, path: &str) -> String {
        let file_name = path.rsplit('/').next().unwrap_or(path);
        let stem = match file_name.rfind('.') {
            Some(idx) => &file_name[..idx],
            None => file_name,
        };
        let spaced = stem.replace(['.', '_', '-'], " ");
        self.camel_boundary.replace_all(&spaced, "$1 $2").into_owned()
    }
}

/// Language of an archive entry, derived from the extension of its final
/// path component; `None` for extensionless or unrecognized files
fn language_of(path: &str) -> Option<SourceLanguage> {
    let file_name = path.rsplit('/').next().unwrap_or(path);
    let extension = match file_name.rfind('.') {
        Some(idx) => &file_name[idx + 1..],
        None => return None,
    };
    SourceLanguage::from_extension(extension)
}

/// Run the grammar-appropriate scanner over one file
fn scan_comments(text: &str, language: SourceLanguage, file_name: &str) -> Vec<Comment> {
    match language.grammar() {
        CommentGrammar::CStyle => scan_c_style(text, file_name),
        CommentGrammar::Hash => scan_hash(text, file_name),
        CommentGrammar::Markup => scan_markup(text, file_name),
    }
}

/// Scan `//` and `/* ... */` comments, shielding string and char literals
fn scan_c_style(text: &str, file_name: &str) -> Vec<Comment> {
    let mut comments = Vec::new();
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '/' => match chars.peek() {
                Some('/') => {
                    chars.next();
                    let mut body = String::new();
                    while let Some(&next) = chars.peek() {
                        if next == '\n' {
                            break;
                        }
                        body.push(next);
                        chars.next();
                    }
                    comments.push(Comment {
                        text: body,
                        file_name: file_name.to_string(),
                        block: false,
                    });
                }
                Some('*') => {
                    chars.next();
                    let mut body = String::new();
                    let mut closed = false;
                    while let Some(next) = chars.next() {
                        if next == '*' && chars.peek() == Some(&'/') {
                            chars.next();
                            closed = true;
                            break;
                        }
                        body.push(next);
                    }
                    // An unterminated block comment is dropped rather than
                    // swallowing the rest of the file as comment text.
                    if closed {
                        comments.push(Comment {
                            text: body,
                            file_name: file_name.to_string(),
                            block: true,
                        });
                    }
                }
                _ => {}
            },
            '"' | '\'' => skip_literal(&mut chars, c),
            _ => {}
        }
    }

    comments
}

/// Scan `#` line comments, shielding single- and double-quoted literals
fn scan_hash(text: &str, file_name: &str) -> Vec<Comment> {
    let mut comments = Vec::new();

    for line in text.lines() {
        let mut chars = line.chars().peekable();
        while let Some(c) = chars.next() {
            match c {
                '#' => {
                    comments.push(Comment {
                        text: chars.collect(),
                        file_name: file_name.to_string(),
                        block: false,
                    });
                    break;
                }
                '"' | '\'' => skip_literal(&mut chars, c),
                _ => {}
            }
        }
    }

    comments
}

/// Scan `<!-- ... -->` comments
fn scan_markup(text: &str, file_name: &str) -> Vec<Comment> {
    let mut comments = Vec::new();
    let mut rest = text;

    while let Some(start) = rest.find("<!--") {
        let after = &rest[start + 4..];
        let Some(end) = after.find("-->") else {
            break;
        };
        comments.push(Comment {
            text: after[..end].to_string(),
            file_name: file_name.to_string(),
            block: true,
        });
        rest = &after[end + 3..];
    }

    comments
}

/// Consume characters up to the closing quote, honoring backslash escapes.
/// An unterminated literal ends at the line break.
fn skip_literal(chars: &mut Peekable<Chars<'_>>, quote: char) {
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                chars.next();
            }
            '\n' => break,
            c if c == quote => break,
            _ => {}
        }
    }
}
