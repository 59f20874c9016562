use std::collections::HashMap;

const DEFAULT_SYSTEM_PROMPT: &str = r#"You are an editor reviewing a document against a single rule.

Rule:
{rule}

Report every place where the document violates the rule.

Output contract:
- Report each violation as a separate entry in "issues".
- "message" explains the violation in one short sentence.
- "textMatch" is copied exactly, character for character, from the document. Do not paraphrase, fix casing, or add punctuation.
- If the same text appears more than once, set "occurrenceIndex" to the zero-based index of the occurrence you mean.
- "suggestion" is optional replacement text for "textMatch".
- If there are no violations, return {"issues": []}.

Respond with JSON only: {"issues": [{"message": string, "textMatch": string, "suggestion"?: string, "occurrenceIndex"?: integer}]}"#;

#[derive(Debug, Clone)]
pub struct PromptTemplate {
    pub name: String,
    pub system_prompt: String,
}

impl PromptTemplate {
    pub fn new(name: impl Into<String>, system_prompt: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            system_prompt: system_prompt.into(),
        }
    }

    /// Replace `{key}` placeholders. Unknown placeholders are left as is.
    pub fn render(&self, variables: &HashMap<&str, &str>) -> String {
        let mut result = self.system_prompt.clone();
        for (key, value) in variables {
            result = result.replace(&format!("{{{key}}}"), value);
        }
        result
    }
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self::new("natural_language_rule", DEFAULT_SYSTEM_PROMPT)
    }
}

#[derive(Debug, Clone, Default)]
pub struct PromptBuilder {
    template: PromptTemplate,
}

impl PromptBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_template(template: PromptTemplate) -> Self {
        Self { template }
    }

    pub fn build(&self, rule: &str) -> String {
        let mut variables = HashMap::new();
        variables.insert("rule", rule.trim());
        self.template.render(&variables)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_is_embedded_with_contract() {
        let prompt = PromptBuilder::new().build("  Avoid passive voice.  ");
        assert!(prompt.contains("Rule:\nAvoid passive voice.\n"));
        assert!(prompt.contains("occurrenceIndex"));
        assert!(prompt.contains("copied exactly"));
        assert!(!prompt.contains("{rule}"));
    }

    #[test]
    fn test_custom_template() {
        let builder = PromptBuilder::with_template(PromptTemplate::new("short", "Check: {rule} {other}"));
        assert_eq!(builder.build("no jargon"), "Check: no jargon {other}");
    }
}
