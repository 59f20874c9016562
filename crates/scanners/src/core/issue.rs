use crate::core::Severity;
use serde::{Deserialize, Serialize};

/// An edit a host may apply to resolve an issue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FixOperation {
    /// Replace the issue's `[from, to)` range with `text`.
    ReplaceText { text: String },

    /// Set an attribute on the node that starts at `pos`.
    SetNodeAttr {
        pos: usize,
        attr: String,
        value: serde_json::Value,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub message: String,

    pub from: i64,

    pub to: i64,

    #[serde(default)]
    pub severity: Severity,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub fix: Option<FixOperation>,
}

impl Issue {
    pub fn new(message: impl Into<String>, from: i64, to: i64) -> Self {
        Self {
            message: message.into(),
            from,
            to,
            severity: Severity::Warning,
            fix: None,
        }
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn with_fix(mut self, fix: FixOperation) -> Self {
        self.fix = Some(fix);
        self
    }

    /// Whether the range is non-empty and lies inside `[0, doc_size]`.
    pub fn has_valid_range(&self, doc_size: usize) -> bool {
        self.from >= 0 && self.to > self.from && self.to <= doc_size as i64
    }

    pub fn ignore_key(&self) -> IssueKey<'_> {
        IssueKey {
            from: self.from,
            to: self.to,
            message: &self.message,
        }
    }
}

/// Borrowed `(from, to, message)` triple that identifies a dismissed issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IssueKey<'a> {
    pub from: i64,
    pub to: i64,
    pub message: &'a str,
}

/// Append-only issue list a scanner writes into while it scans.
#[derive(Debug, Clone, Default)]
pub struct IssueRecorder {
    issues: Vec<Issue>,
}

impl IssueRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an issue with the default `warning` severity.
    pub fn record(&mut self, message: impl Into<String>, from: usize, to: usize) {
        self.issues
            .push(Issue::new(message, from as i64, to as i64));
    }

    pub fn record_with(
        &mut self,
        message: impl Into<String>,
        from: usize,
        to: usize,
        severity: Option<Severity>,
        fix: Option<FixOperation>,
    ) {
        let mut issue = Issue::new(message, from as i64, to as i64);
        if let Some(severity) = severity {
            issue.severity = severity;
        }
        issue.fix = fix;
        self.issues.push(issue);
    }

    /// Push an already built issue as-is, including out-of-range geometry.
    /// The orchestrator is responsible for filtering.
    pub fn push(&mut self, issue: Issue) {
        self.issues.push(issue);
    }

    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn clear(&mut self) {
        self.issues.clear();
    }
}
