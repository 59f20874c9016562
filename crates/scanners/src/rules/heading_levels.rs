//! Flags headings that skip a level relative to the previous heading.

use crate::core::{FixOperation, IssueRecorder, ScannerClass};
use crate::document::Document;
use crate::impl_scanner;
use anyhow::Result;
use std::sync::Arc;

pub const ID: &str = "heading-levels";

pub struct HeadingLevelScanner {
    document: Arc<Document>,
    recorder: IssueRecorder,
}

impl HeadingLevelScanner {
    pub fn new(document: Arc<Document>) -> Self {
        Self {
            document,
            recorder: IssueRecorder::new(),
        }
    }

    pub fn class() -> ScannerClass {
        ScannerClass::sync(ID, HeadingLevelScanner::new)
            .with_description("Flags headings nested more than one level below the previous one")
    }

    fn scan_impl(&mut self) -> Result<()> {
        let recorder = &mut self.recorder;
        let mut previous: Option<u64> = None;

        self.document.descendants(|node, pos| {
            let Some(level) = node.heading_level() else {
                return true;
            };

            if let Some(prev) = previous {
                let expected = prev.saturating_add(1);
                if level > expected {
                    // Mark the heading text; an empty heading gets its whole node.
                    let (from, to) = match node.content_size() {
                        0 => (pos, pos + node.node_size()),
                        size => (pos + 1, pos + 1 + size),
                    };
                    recorder.record_with(
                        format!("Heading too small ({level} under {prev})"),
                        from,
                        to,
                        None,
                        Some(FixOperation::SetNodeAttr {
                            pos,
                            attr: "level".to_string(),
                            value: serde_json::Value::from(expected),
                        }),
                    );
                }
            }
            previous = Some(level);
            false
        });

        Ok(())
    }
}

impl_scanner!(HeadingLevelScanner);
