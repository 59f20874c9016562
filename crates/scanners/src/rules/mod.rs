//! Built-in document rules
//!
//! Deterministic synchronous scanners that walk the node tree directly and
//! record issues in document coordinates.

pub mod bad_words;
pub mod heading_levels;
pub mod long_sentences;
pub mod repeated_words;

pub use bad_words::BadWordsScanner;
pub use heading_levels::HeadingLevelScanner;
pub use long_sentences::LongSentenceScanner;
pub use repeated_words::RepeatedWordsScanner;

use crate::core::ScannerClass;

/// Classes for every built-in rule, in their default configuration order.
pub fn builtin_classes() -> Vec<ScannerClass> {
    vec![
        BadWordsScanner::class(),
        HeadingLevelScanner::class(),
        RepeatedWordsScanner::class(),
        LongSentenceScanner::class(),
    ]
}
