//! Flags filler words that weaken prose ("obviously", "clearly", ...).

use crate::core::{IssueRecorder, ScannerClass};
use crate::document::Document;
use crate::impl_scanner;
use anyhow::Result;
use regex::Regex;
use std::sync::{Arc, OnceLock};

pub const ID: &str = "bad-words";

pub const DEFAULT_WORDS: &[&str] = &["obviously", "clearly", "evidently", "simply"];

fn default_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| build_pattern(DEFAULT_WORDS).expect("default word list is a valid regex"))
}

fn build_pattern(words: &[&str]) -> Result<Regex> {
    let alternation = words
        .iter()
        .map(|w| regex::escape(w))
        .collect::<Vec<_>>()
        .join("|");
    Ok(Regex::new(&format!(r"(?i)\b(?:{alternation})\b"))?)
}

pub struct BadWordsScanner {
    document: Arc<Document>,
    pattern: Regex,
    recorder: IssueRecorder,
}

impl BadWordsScanner {
    pub fn new(document: Arc<Document>) -> Self {
        Self {
            document,
            pattern: default_pattern().clone(),
            recorder: IssueRecorder::new(),
        }
    }

    pub fn with_words(document: Arc<Document>, words: &[&str]) -> Result<Self> {
        Ok(Self {
            document,
            pattern: build_pattern(words)?,
            recorder: IssueRecorder::new(),
        })
    }

    pub fn class() -> ScannerClass {
        ScannerClass::sync(ID, BadWordsScanner::new)
            .with_description("Flags filler words such as 'obviously' and 'clearly'")
    }

    fn scan_impl(&mut self) -> Result<()> {
        let pattern = &self.pattern;
        let recorder = &mut self.recorder;

        self.document.descendants(|node, pos| {
            if !node.is_text() {
                return true;
            }
            let text = node.text_str();
            for found in pattern.find_iter(text) {
                let from = pos + text[..found.start()].chars().count();
                let to = from + found.as_str().chars().count();
                recorder.record(format!("Avoid '{}'", found.as_str()), from, to);
            }
            true
        });

        Ok(())
    }
}

impl_scanner!(BadWordsScanner);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Scanner, Severity};

    #[test]
    fn test_two_bad_words() {
        let doc = Arc::new(Document::from_paragraphs(&[
            "This is obviously wrong. Clearly so.",
        ]));
        let mut scanner = BadWordsScanner::new(doc);
        scanner.scan().unwrap();

        let issues = scanner.results();
        assert_eq!(issues.len(), 2);
        // text starts at 1; "obviously" at char 8, "Clearly" at char 25
        assert_eq!((issues[0].from, issues[0].to), (9, 18));
        assert_eq!(issues[0].message, "Avoid 'obviously'");
        assert_eq!((issues[1].from, issues[1].to), (26, 33));
        assert_eq!(issues[1].message, "Avoid 'Clearly'");
        assert!(issues.iter().all(|i| i.severity == Severity::Warning));
    }

    #[test]
    fn test_whole_words_only() {
        let doc = Arc::new(Document::from_paragraphs(&["Simplyfied unclearly"]));
        let mut scanner = BadWordsScanner::new(doc);
        scanner.scan().unwrap();
        assert!(scanner.results().is_empty());
    }

    #[test]
    fn test_rescan_does_not_duplicate() {
        let doc = Arc::new(Document::from_paragraphs(&["simply put"]));
        let mut scanner = BadWordsScanner::new(doc);
        scanner.scan().unwrap();
        scanner.scan().unwrap();
        assert_eq!(scanner.results().len(), 1);
    }

    #[test]
    fn test_custom_word_list() {
        let doc = Arc::new(Document::from_paragraphs(&["basically fine, really"]));
        let mut scanner = BadWordsScanner::with_words(doc, &["basically", "really"]).unwrap();
        scanner.scan().unwrap();
        assert_eq!(scanner.results().len(), 2);
    }
}
