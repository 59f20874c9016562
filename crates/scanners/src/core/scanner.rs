//! Scanner contract.
//!
//! A scanner is a short-lived object bound to one document snapshot. The
//! engine builds a fresh instance per run from a [`ScannerClass`], calls
//! `scan` once, reads `results`, and drops it. Scanners never see shared
//! engine state; everything they produce flows back through their
//! [`IssueRecorder`](crate::core::IssueRecorder).
//!
//! There are two variants. [`Scanner`] runs to completion synchronously and
//! is executed sequentially with the other synchronous scanners.
//! [`AsyncScanner`] may suspend (typically on an external analysis call) and
//! is driven concurrently with the other asynchronous scanners. Which variant
//! a class produces is fixed when the class is built, so the orchestrator
//! partitions once instead of probing every instance.

use crate::core::{EngineError, Issue};
use crate::document::Document;
use anyhow::Result;
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

pub trait Scanner: Send {
    fn scan(&mut self) -> Result<()>;

    fn results(&self) -> &[Issue];
}

#[async_trait]
pub trait AsyncScanner: Send {
    async fn scan(&mut self) -> Result<()>;

    fn results(&self) -> &[Issue];
}

pub enum ScannerInstance {
    Sync(Box<dyn Scanner>),
    Async(Box<dyn AsyncScanner>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    Sync,
    Async,
}

type SyncConstructor = dyn Fn(Arc<Document>) -> Result<Box<dyn Scanner>> + Send + Sync;
type AsyncConstructor = dyn Fn(Arc<Document>) -> Result<Box<dyn AsyncScanner>> + Send + Sync;

#[derive(Clone)]
enum Constructor {
    Sync(Arc<SyncConstructor>),
    Async(Arc<AsyncConstructor>),
}

/// A constructible scanner kind: an id plus a constructor that binds a new
/// instance to a snapshot.
#[derive(Clone)]
pub struct ScannerClass {
    id: String,
    description: String,
    constructor: Constructor,
}

impl ScannerClass {
    pub fn sync<S, F>(id: impl Into<String>, constructor: F) -> Self
    where
        S: Scanner + 'static,
        F: Fn(Arc<Document>) -> S + Send + Sync + 'static,
    {
        Self::try_sync(id, move |doc| Ok(constructor(doc)))
    }

    pub fn try_sync<S, F>(id: impl Into<String>, constructor: F) -> Self
    where
        S: Scanner + 'static,
        F: Fn(Arc<Document>) -> Result<S> + Send + Sync + 'static,
    {
        let constructor: Arc<SyncConstructor> =
            Arc::new(move |doc: Arc<Document>| -> Result<Box<dyn Scanner>> {
                let scanner: Box<dyn Scanner> = Box::new(constructor(doc)?);
                Ok(scanner)
            });
        Self {
            id: id.into(),
            description: String::new(),
            constructor: Constructor::Sync(constructor),
        }
    }

    pub fn asynchronous<S, F>(id: impl Into<String>, constructor: F) -> Self
    where
        S: AsyncScanner + 'static,
        F: Fn(Arc<Document>) -> S + Send + Sync + 'static,
    {
        Self::try_asynchronous(id, move |doc| Ok(constructor(doc)))
    }

    pub fn try_asynchronous<S, F>(id: impl Into<String>, constructor: F) -> Self
    where
        S: AsyncScanner + 'static,
        F: Fn(Arc<Document>) -> Result<S> + Send + Sync + 'static,
    {
        let constructor: Arc<AsyncConstructor> =
            Arc::new(move |doc: Arc<Document>| -> Result<Box<dyn AsyncScanner>> {
                let scanner: Box<dyn AsyncScanner> = Box::new(constructor(doc)?);
                Ok(scanner)
            });
        Self {
            id: id.into(),
            description: String::new(),
            constructor: Constructor::Async(constructor),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn description(&self) -> &str {
        if self.description.is_empty() {
            "No description provided"
        } else {
            &self.description
        }
    }

    pub fn mode(&self) -> ExecutionMode {
        match self.constructor {
            Constructor::Sync(_) => ExecutionMode::Sync,
            Constructor::Async(_) => ExecutionMode::Async,
        }
    }

    /// Bind a new instance to `document`. A constructor failure means the
    /// class does not satisfy the contract.
    pub fn instantiate(&self, document: Arc<Document>) -> Result<ScannerInstance, EngineError> {
        let built = match &self.constructor {
            Constructor::Sync(constructor) => constructor(document).map(ScannerInstance::Sync),
            Constructor::Async(constructor) => constructor(document).map(ScannerInstance::Async),
        };
        built.map_err(|e| {
            EngineError::InvalidScanner(format!("'{}' could not be constructed: {e:#}", self.id))
        })
    }
}

impl fmt::Debug for ScannerClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScannerClass")
            .field("id", &self.id)
            .field("mode", &self.mode())
            .finish()
    }
}

/// Implements [`Scanner`] for a struct with a `recorder: IssueRecorder`
/// field and a `fn scan_impl(&mut self) -> anyhow::Result<()>` method.
/// Repeated `scan` calls start from an empty recorder.
#[macro_export]
macro_rules! impl_scanner {
    ($scanner:ty) => {
        impl $crate::core::Scanner for $scanner {
            fn scan(&mut self) -> ::anyhow::Result<()> {
                self.recorder.clear();
                self.scan_impl()
            }

            fn results(&self) -> &[$crate::core::Issue] {
                self.recorder.issues()
            }
        }
    };
}
