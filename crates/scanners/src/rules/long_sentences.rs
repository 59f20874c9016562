use crate::core::{IssueRecorder, ScannerClass, Severity};
use crate::document::Document;
use crate::impl_scanner;
use anyhow::Result;
use regex::Regex;
use std::sync::{Arc, OnceLock};

pub const ID: &str = "long-sentences";

pub const DEFAULT_MAX_WORDS: usize = 40;

fn sentence_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[^.!?]+[.!?]*").expect("sentence pattern is a valid regex"))
}

pub struct LongSentenceScanner {
    document: Arc<Document>,
    max_words: usize,
    recorder: IssueRecorder,
}

impl LongSentenceScanner {
    pub fn new(document: Arc<Document>) -> Self {
        Self::with_max_words(document, DEFAULT_MAX_WORDS)
    }

    pub fn with_max_words(document: Arc<Document>, max_words: usize) -> Self {
        Self {
            document,
            max_words,
            recorder: IssueRecorder::new(),
        }
    }

    pub fn class() -> ScannerClass {
        ScannerClass::sync(ID, LongSentenceScanner::new)
            .with_description("Flags sentences longer than 40 words")
    }

    fn scan_impl(&mut self) -> Result<()> {
        let recorder = &mut self.recorder;
        let max_words = self.max_words;

        self.document.descendants(|node, pos| {
            if !node.is_text() {
                return true;
            }
            let text = node.text_str();
            for sentence in sentence_pattern().find_iter(text) {
                let raw = sentence.as_str();
                let words = raw.split_whitespace().count();
                if words <= max_words {
                    continue;
                }
                let leading = raw.len() - raw.trim_start().len();
                let start = sentence.start() + leading;
                let end = sentence.start() + raw.trim_end().len();
                let from = pos + text[..start].chars().count();
                let to = pos + text[..end].chars().count();
                recorder.record_with(
                    format!("Long sentence ({words} words)"),
                    from,
                    to,
                    Some(Severity::Info),
                    None,
                );
            }
            true
        });

        Ok(())
    }
}

impl_scanner!(LongSentenceScanner);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Scanner;

    #[test]
    fn test_flags_only_long_sentence() {
        let long = vec!["word"; 6].join(" ");
        let text = format!("Short one. {long}.");
        let doc = Arc::new(Document::from_paragraphs(&[text.as_str()]));

        let mut scanner = LongSentenceScanner::with_max_words(doc, 5);
        scanner.scan().unwrap();

        let issues = scanner.results();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Info);
        assert_eq!(issues[0].message, "Long sentence (6 words)");
        // "Short one. " is 11 chars, paragraph text starts at 1
        assert_eq!(issues[0].from, 12);
        assert_eq!(issues[0].to, 12 + long.len() as i64 + 1);
    }
}
