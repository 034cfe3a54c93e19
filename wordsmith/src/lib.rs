//! WordSmith: ratio-driven summarization and grammar correction over hosted
//! models.
//!
//! The pipelines take their model calls as injected capabilities
//! (`capability::SummarizationCapability`, `capability::CorrectionCapability`)
//! so the control flow can run against any backend.

pub mod capability;
pub mod config;
pub mod error;
pub mod grammar;
pub mod pdf;
pub mod summarizer;
pub mod text;

pub use error::{CapabilityError, Result, WordsmithError};
pub use grammar::GrammarCorrector;
pub use summarizer::{Summarizer, SummarizerOptions, SummaryReport, TargetRatio};
