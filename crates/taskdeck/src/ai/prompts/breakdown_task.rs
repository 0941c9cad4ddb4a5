//! Breakdown-task prompt template.
//!
//! Breaks a task down into a short list of actionable steps.

use serde::Serialize;

use super::PromptTemplate;

/// Context for breakdown-task prompt.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BreakdownTaskContext {
    /// Task title
    pub title: String,
    /// Task description (may be empty)
    pub description: String,
    /// Number of steps to generate
    pub step_count: usize,
    /// Deadline framing injected by the caller
    pub deadline_context: String,
}

/// Get the breakdown-task template.
pub fn template() -> PromptTemplate {
    PromptTemplate::new("breakdown-task", SYSTEM_PROMPT, USER_PROMPT)
        .with_description("Break a task into actionable steps")
}

const SYSTEM_PROMPT: &str = r#"Act as a specialized consultant helping someone break down their work. Respond with ONLY a JSON array of strings, one per step.

Example: ["Research requirements", "Draft outline", "Review", "Refine", "Submit"]"#;

const USER_PROMPT: &str = r#"Break down this task: "{{title}}"{{#if description}}
Description: "{{description}}"{{/if}}
CONTEXT: {{deadline_context}}
Limit: Exactly {{step_count}} highly specific, actionable steps."#;
