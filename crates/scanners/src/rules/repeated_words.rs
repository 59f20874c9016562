//! Flags a word immediately repeated within the same text run ("the the").

use crate::core::{FixOperation, IssueRecorder, ScannerClass};
use crate::document::Document;
use crate::impl_scanner;
use anyhow::Result;
use regex::Regex;
use std::sync::{Arc, OnceLock};

pub const ID: &str = "repeated-words";

fn word_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\b[\w']+\b").expect("word pattern is a valid regex"))
}

pub struct RepeatedWordsScanner {
    document: Arc<Document>,
    recorder: IssueRecorder,
}

impl RepeatedWordsScanner {
    pub fn new(document: Arc<Document>) -> Self {
        Self {
            document,
            recorder: IssueRecorder::new(),
        }
    }

    pub fn class() -> ScannerClass {
        ScannerClass::sync(ID, RepeatedWordsScanner::new)
            .with_description("Flags words repeated back to back")
    }

    fn scan_impl(&mut self) -> Result<()> {
        let recorder = &mut self.recorder;

        self.document.descendants(|node, pos| {
            if !node.is_text() {
                return true;
            }
            let text = node.text_str();
            let mut previous: Option<regex::Match<'_>> = None;

            for word in word_pattern().find_iter(text) {
                if let Some(prev) = previous {
                    let gap = &text[prev.end()..word.start()];
                    let same = prev.as_str().to_lowercase() == word.as_str().to_lowercase();
                    if same && !gap.is_empty() && gap.chars().all(char::is_whitespace) {
                        let from = pos + text[..prev.start()].chars().count();
                        let to = pos + text[..word.end()].chars().count();
                        recorder.record_with(
                            format!("Repeated word '{}'", word.as_str()),
                            from,
                            to,
                            None,
                            Some(FixOperation::ReplaceText {
                                text: prev.as_str().to_string(),
                            }),
                        );
                    }
                }
                previous = Some(word);
            }
            true
        });

        Ok(())
    }
}

impl_scanner!(RepeatedWordsScanner);
