//! Natural-language rules backed by an external analysis provider
//!
//! A rule written in plain language becomes an asynchronous scanner: the
//! document is flattened to text, sent to the provider together with an
//! instruction prompt, and every reported text match is mapped back to a
//! document range. The provider abstraction switches backends; the schema
//! module keeps untrusted responses from ever failing a scan.

pub mod factory;
pub mod mock_provider;
#[cfg(feature = "openai")]
pub mod openai;
pub mod prompts;
pub mod provider;
pub mod scanner;
pub mod schemas;

pub use factory::{NaturalLanguageScannerBuilder, NaturalLanguageScannerFactory};
pub use mock_provider::MockAnalysisProvider;
#[cfg(feature = "openai")]
pub use openai::OpenAIProvider;
pub use prompts::{PromptBuilder, PromptTemplate};
pub use provider::{AnalysisProvider, AnalysisRequest, FnProvider, ProviderError};
pub use scanner::{NaturalLanguageRule, NaturalLanguageScanner};
pub use schemas::{parse_violations, response_schema, ReportedViolation};
