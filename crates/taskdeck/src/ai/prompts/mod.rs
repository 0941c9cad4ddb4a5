//! Prompt template system for AI operations.
//!
//! Handlebars-based templates with typed context structs, one module per
//! operation.

use handlebars::Handlebars;
use serde::Serialize;
use std::collections::HashMap;

use crate::errors::{TrackerError, TrackerResult};

// Template modules
mod analyze_task;
mod breakdown_task;
mod daily_plan;

// Re-export context types (not the template() functions to avoid ambiguity)
pub use analyze_task::AnalyzeTaskContext;
pub use breakdown_task::BreakdownTaskContext;
pub use daily_plan::DailyPlanContext;

/// A prompt template with system and user messages.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    /// Template ID
    pub id: String,
    /// Template version
    pub version: String,
    /// Description
    pub description: String,
    /// System prompt template
    pub system: String,
    /// User prompt template
    pub user: String,
}

impl PromptTemplate {
    /// Create a new prompt template.
    pub fn new(id: impl Into<String>, system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            version: "1.0.0".to_string(),
            description: String::new(),
            system: system.into(),
            user: user.into(),
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Render the template with the given context.
    pub fn render<T: Serialize>(&self, context: &T) -> TrackerResult<(String, String)> {
        let mut handlebars = create_handlebars();

        handlebars
            .register_template_string("system", &self.system)
            .map_err(|e| TrackerError::ConfigError {
                reason: format!("Invalid system template: {e}"),
            })?;

        handlebars
            .register_template_string("user", &self.user)
            .map_err(|e| TrackerError::ConfigError {
                reason: format!("Invalid user template: {e}"),
            })?;

        let system = handlebars
            .render("system", context)
            .map_err(|e| TrackerError::ConfigError {
                reason: format!("Failed to render system prompt: {e}"),
            })?;

        let user = handlebars
            .render("user", context)
            .map_err(|e| TrackerError::ConfigError {
                reason: format!("Failed to render user prompt: {e}"),
            })?;

        Ok((system, user))
    }
}

/// Create a Handlebars instance with custom helpers.
fn create_handlebars() -> Handlebars<'static> {
    let mut handlebars = Handlebars::new();

    // Disable HTML escaping for prompts
    handlebars.register_escape_fn(handlebars::no_escape);

    // Helper: {{{json value}}}
    handlebars.register_helper(
        "json",
        Box::new(
            |h: &handlebars::Helper,
             _: &Handlebars,
             _: &handlebars::Context,
             _: &mut handlebars::RenderContext,
             out: &mut dyn handlebars::Output| {
                if let Some(param) = h.param(0) {
                    let json = serde_json::to_string_pretty(param.value())
                        .unwrap_or_else(|_| "null".to_string());
                    out.write(&json)?;
                }
                Ok(())
            },
        ),
    );

    handlebars
}

/// Prompt manager for loading and rendering templates.
pub struct PromptManager {
    templates: HashMap<String, PromptTemplate>,
}

impl PromptManager {
    /// Create a new prompt manager with default templates.
    pub fn new() -> Self {
        let mut manager = Self {
            templates: HashMap::new(),
        };

        // Register default templates
        manager.register(analyze_task::template());
        manager.register(breakdown_task::template());
        manager.register(daily_plan::template());

        manager
    }

    /// Register a template.
    pub fn register(&mut self, template: PromptTemplate) {
        self.templates.insert(template.id.clone(), template);
    }

    /// Get a template by ID.
    pub fn get(&self, id: &str) -> Option<&PromptTemplate> {
        self.templates.get(id)
    }

    /// Render a template with context.
    pub fn render<T: Serialize>(&self, id: &str, context: &T) -> TrackerResult<(String, String)> {
        let template = self.get(id).ok_or_else(|| TrackerError::ConfigError {
            reason: format!("Template '{id}' not found"),
        })?;
        template.render(context)
    }

    /// List all template IDs.
    pub fn template_ids(&self) -> Vec<&str> {
        self.templates.keys().map(String::as_str).collect()
    }
}

impl Default for PromptManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_template_rendering() {
        let template = PromptTemplate::new(
            "test",
            "You are a {{role}}",
            "{{#if urgent}}URGENT: {{/if}}{{prompt}}",
        );

        let context = json!({
            "role": "task assistant",
            "urgent": true,
            "prompt": "Hello world"
        });

        let (system, user) = template.render(&context).unwrap();

        assert_eq!(system, "You are a task assistant");
        assert_eq!(user, "URGENT: Hello world");
    }

    #[test]
    fn test_json_helper() {
        let template = PromptTemplate::new("test", "System", "Tasks: {{{json tasks}}}");

        let context = json!({
            "tasks": [
                {"title": "Task 1", "priority": "high"}
            ]
        });

        let (_, user) = template.render(&context).unwrap();

        assert!(user.contains("\"title\": \"Task 1\""));
    }

    #[test]
    fn test_prompt_manager_defaults() {
        let manager = PromptManager::new();

        assert!(manager.get("analyze-task").is_some());
        assert!(manager.get("breakdown-task").is_some());
        assert!(manager.get("daily-plan").is_some());
        assert!(manager.get("nonexistent").is_none());
    }
}
