#![warn(clippy::pedantic)]
// Allow common pedantic lints that don't affect correctness
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::unused_self)]
#![allow(clippy::map_unwrap_or)]

//! # Taskdeck
//!
//! A personal task tracker with AI-assisted planning.
//!
//! This crate provides:
//! - Deterministic urgency scoring and due-date bucketing for task ordering
//! - A sequential multi-provider generation fallback orchestrator
//! - Tiered repair of unreliable generated text into structured values
//! - File-based task storage and domain facades tying it together
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use taskdeck::{FileStorage, PlannerDomain, ProviderRegistry, Storage};
//!
//! let storage = Arc::new(FileStorage::new("."));
//! let registry = Arc::new(ProviderRegistry::with_defaults());
//! let planner = PlannerDomain::new(storage, registry);
//!
//! // Break a task into steps, trying each configured candidate in order
//! let task = planner.breakdown_task("1").await?;
//! ```

// Core entities
pub mod entities;

// Error types
pub mod errors;

// Scheduling intelligence (urgency scoring, bucketing)
pub mod schedule;

// AI integration (providers, fallback, repair, prompts)
pub mod ai;

// Storage layer
pub mod storage;

// Domain facades
pub mod domain;

// Re-export key types for convenience
pub use entities::{
    CandidateSettings, EnergyLevel, GenerationSettings, GlobalSettings, Task, TaskPriority,
    TaskStatus, TrackerConfig, MAX_SUBTASKS,
};
pub use errors::{TrackerError, TrackerResult};
pub use schedule::{bucket_by_due_date, compute_urgency, sort_by_urgency, DueBuckets};
pub use storage::{FileStorage, Storage};

// Re-export AI types
pub use ai::{
    normalize_structured, AIMessage, AIResponse, AIRole, Candidate, FallbackConfig,
    FallbackOrchestrator, GenerateOptions, GenerationOutcome, GenerationProvider, OutputShape,
    PromptManager, PromptTemplate, ProviderRegistry, StructuredValue, TokenUsage,
};

// Re-export domain facades
pub use domain::{PlannerDomain, TasksDomain};
