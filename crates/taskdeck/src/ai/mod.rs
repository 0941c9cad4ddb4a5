//! AI integration for task tracking.
//!
//! This module provides:
//! - Generation provider abstraction (Gemini, OpenRouter)
//! - Sequential fallback orchestration with classified errors and backoff
//! - Tiered response normalization and repair
//! - Prompt template system with Handlebars
//! - Provider registry for dependency injection

pub mod fallback;
pub mod prompts;
pub mod provider;
pub mod registry;
pub mod repair;
pub mod schemas;

// Provider implementations
pub mod gemini;
pub mod openrouter;

// Re-exports
pub use fallback::{Candidate, FallbackConfig, FallbackOrchestrator, GenerationOutcome};
pub use prompts::{PromptManager, PromptTemplate};
pub use provider::{
    AIMessage, AIResponse, AIRole, GenerateOptions, GenerationProvider, TokenUsage,
};
pub use registry::ProviderRegistry;
pub use repair::{normalize_structured, OutputShape, StructuredValue};
pub use schemas::{parse_object, TaskAnalysis};
