use crate::core::{EngineError, ScannerClass};
use crate::rules;
use std::collections::HashMap;

/// Id to scanner class lookup used by configuration and on-demand runs.
pub struct ScannerRegistry {
    scanners: HashMap<String, ScannerClass>,
}

impl ScannerRegistry {
    pub fn new() -> Self {
        Self {
            scanners: HashMap::new(),
        }
    }

    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for class in rules::builtin_classes() {
            registry.register(class);
        }
        registry
    }

    /// Registering an id twice replaces the earlier class.
    pub fn register(&mut self, class: ScannerClass) {
        self.scanners.insert(class.id().to_string(), class);
    }

    pub fn get(&self, id: &str) -> Option<ScannerClass> {
        self.scanners.get(id).cloned()
    }

    pub fn resolve(&self, id: &str) -> Result<ScannerClass, EngineError> {
        self.get(id)
            .ok_or_else(|| EngineError::InvalidScanner(format!("no scanner registered as '{id}'")))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.scanners.contains_key(id)
    }

    pub fn all(&self) -> Vec<ScannerClass> {
        let mut classes: Vec<_> = self.scanners.values().cloned().collect();
        classes.sort_by(|a, b| a.id().cmp(b.id()));
        classes
    }

    pub fn list_ids(&self) -> Vec<String> {
        let mut ids: Vec<_> = self.scanners.keys().cloned().collect();
        ids.sort();
        ids
    }
}

impl Default for ScannerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

pub struct ScannerRegistryBuilder {
    registry: ScannerRegistry,
}

impl ScannerRegistryBuilder {
    pub fn new() -> Self {
        Self {
            registry: ScannerRegistry::new(),
        }
    }

    pub fn with_scanner(mut self, class: ScannerClass) -> Self {
        self.registry.register(class);
        self
    }

    pub fn with_builtins(mut self) -> Self {
        for class in rules::builtin_classes() {
            self.registry.register(class);
        }
        self
    }

    pub fn build(self) -> ScannerRegistry {
        self.registry
    }
}

impl Default for ScannerRegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_registry() {
        let registry = ScannerRegistry::default();
        assert_eq!(registry.list_ids().len(), 0);
        assert!(matches!(
            registry.resolve("bad-words"),
            Err(EngineError::InvalidScanner(_))
        ));
    }

    #[test]
    fn test_builtins_are_sorted() {
        let registry = ScannerRegistryBuilder::new().with_builtins().build();
        assert_eq!(
            registry.list_ids(),
            vec![
                "bad-words",
                "heading-levels",
                "long-sentences",
                "repeated-words"
            ]
        );
        assert!(registry.contains("heading-levels"));
    }
}
