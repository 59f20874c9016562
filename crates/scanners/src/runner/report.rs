use crate::core::{Issue, Severity};
use anyhow::Result;
use serde::Serialize;
use std::collections::BTreeMap;

/// Issues from one run, as handed to the CLI formatters.
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    issues: Vec<Issue>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    dismissed: Vec<Issue>,
}

impl ScanReport {
    pub fn new(issues: Vec<Issue>) -> Self {
        Self {
            issues,
            dismissed: Vec::new(),
        }
    }

    /// Split `issues` into visible and dismissed according to `is_ignored`.
    pub fn partitioned(issues: Vec<Issue>, is_ignored: impl Fn(&Issue) -> bool) -> Self {
        let (dismissed, issues): (Vec<Issue>, Vec<Issue>) =
            issues.into_iter().partition(|issue| is_ignored(issue));
        Self { issues, dismissed }
    }

    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    pub fn dismissed(&self) -> &[Issue] {
        &self.dismissed
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        self.issues.iter().any(|i| i.severity == Severity::Error)
    }

    pub fn count_by_severity(&self) -> SeverityCount {
        let mut count = SeverityCount::default();
        for issue in &self.issues {
            match &issue.severity {
                Severity::Error => count.error += 1,
                Severity::Warning => count.warning += 1,
                Severity::Info => count.info += 1,
                Severity::Custom(name) => *count.custom.entry(name.clone()).or_default() += 1,
            }
        }
        count
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn to_markdown(&self) -> String {
        let mut md = String::from("# Annotation Report\n\n");

        let count = self.count_by_severity();
        md.push_str("## Summary\n\n");
        md.push_str(&format!("- Error: {}\n", count.error));
        md.push_str(&format!("- Warning: {}\n", count.warning));
        md.push_str(&format!("- Info: {}\n", count.info));
        for (name, n) in &count.custom {
            md.push_str(&format!("- {name}: {n}\n"));
        }
        if !self.dismissed.is_empty() {
            md.push_str(&format!("- Dismissed: {}\n", self.dismissed.len()));
        }
        md.push('\n');

        if !self.issues.is_empty() {
            md.push_str("## Issues\n\n");
            for issue in &self.issues {
                md.push_str(&format!(
                    "- **{}** `{}..{}` {}\n",
                    issue.severity, issue.from, issue.to, issue.message
                ));
            }
            md.push('\n');
        }

        md
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SeverityCount {
    pub error: usize,
    pub warning: usize,
    pub info: usize,
    pub custom: BTreeMap<String, usize>,
}

impl SeverityCount {
    pub fn total(&self) -> usize {
        self.error + self.warning + self.info + self.custom.values().sum::<usize>()
    }
}
