//! Analyze-task prompt template.
//!
//! Classifies a new task's energy level and suggested priority.

use serde::Serialize;

use super::PromptTemplate;

/// Context for analyze-task prompt.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AnalyzeTaskContext {
    /// Task title
    pub title: String,
    /// Task description (may be empty)
    pub description: String,
    /// Due date as `YYYY-MM-DD`, if any
    pub due_date: Option<String>,
    /// Priority stated by the user
    pub user_priority: String,
}

/// Get the analyze-task template.
pub fn template() -> PromptTemplate {
    PromptTemplate::new("analyze-task", SYSTEM_PROMPT, USER_PROMPT)
        .with_description("Classify a new task's energy level and priority")
}

const SYSTEM_PROMPT: &str = r#"You are a task analysis assistant. Analyze the task and respond with ONLY a JSON object containing:
1. "energyLevel": either "Deep Work" or "Admin".
2. "suggestedPriority": one of "Critical", "High", "Medium", "Low", "Backburner".

Example JSON: {"energyLevel": "Deep Work", "suggestedPriority": "High"}"#;

const USER_PROMPT: &str = r#"Task: "{{title}}"
Description: "{{description}}"{{#if due_date}}
DueDate: "{{due_date}}"{{/if}}
UserPriority: "{{user_priority}}""#;
