use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Severity of an issue.
///
/// The three built-ins always resolve to their own style. Any other name is
/// carried as [`Severity::Custom`] and only keeps its own style when it was
/// registered in the [`SeverityTable`] at configuration time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Severity {
    Info,
    #[default]
    Warning,
    Error,
    Custom(String),
}

impl Severity {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Custom(name) => name,
        }
    }

    pub fn is_builtin(&self) -> bool {
        !matches!(self, Self::Custom(_))
    }

    pub fn builtin_color(&self) -> Option<&'static str> {
        match self {
            Self::Info => Some("blue"),
            Self::Warning => Some("yellow"),
            Self::Error => Some("red"),
            Self::Custom(_) => None,
        }
    }
}

impl From<&str> for Severity {
    fn from(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "info" => Self::Info,
            "warning" => Self::Warning,
            "error" => Self::Error,
            _ => Self::Custom(name.trim().to_string()),
        }
    }
}

impl From<String> for Severity {
    fn from(name: String) -> Self {
        Self::from(name.as_str())
    }
}

impl From<Severity> for String {
    fn from(severity: Severity) -> Self {
        severity.as_str().to_string()
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomSeverity {
    pub name: String,
    pub color: String,
}

impl CustomSeverity {
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: color.into(),
        }
    }
}

/// Name to color mapping for custom severities. Read-only once built.
#[derive(Debug, Clone, Default)]
pub struct SeverityTable {
    custom: HashMap<String, String>,
}

impl SeverityTable {
    pub fn new(custom: &[CustomSeverity]) -> Self {
        let custom = custom
            .iter()
            .map(|s| (s.name.clone(), s.color.clone()))
            .collect();
        Self { custom }
    }

    pub fn is_registered(&self, severity: &Severity) -> bool {
        match severity {
            Severity::Custom(name) => self.custom.contains_key(name),
            _ => true,
        }
    }

    /// The severity whose style an issue is rendered with. Unknown custom
    /// names fall back to `warning`.
    pub fn resolve(&self, severity: &Severity) -> Severity {
        if self.is_registered(severity) {
            severity.clone()
        } else {
            Severity::Warning
        }
    }

    pub fn style_class(&self, severity: &Severity) -> String {
        format!("issue-{}", self.resolve(severity).as_str())
    }

    pub fn color(&self, severity: &Severity) -> Option<&str> {
        match severity {
            Severity::Custom(name) => self.custom.get(name).map(String::as_str),
            builtin => builtin.builtin_color(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_builtin_and_custom() {
        assert_eq!(Severity::from("Error"), Severity::Error);
        assert_eq!(Severity::from("info"), Severity::Info);
        assert_eq!(
            Severity::from("suggestion"),
            Severity::Custom("suggestion".to_string())
        );
    }

    #[test]
    fn test_unregistered_custom_falls_back_to_warning() {
        let table = SeverityTable::new(&[CustomSeverity::new("suggestion", "#00aa88")]);

        let registered = Severity::from("suggestion");
        let unknown = Severity::from("nitpick");

        assert_eq!(table.style_class(&registered), "issue-suggestion");
        assert_eq!(table.style_class(&unknown), "issue-warning");
        assert_eq!(table.style_class(&Severity::Error), "issue-error");
        assert_eq!(table.color(&registered), Some("#00aa88"));
        assert_eq!(table.color(&unknown), None);
    }

    #[test]
    fn test_serde_as_plain_string() {
        let json = serde_json::to_string(&Severity::Custom("ai".to_string())).unwrap();
        assert_eq!(json, "\"ai\"");

        let parsed: Severity = serde_json::from_str("\"warning\"").unwrap();
        assert_eq!(parsed, Severity::Warning);
    }
}
