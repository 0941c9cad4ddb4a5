//! Daily-plan prompt template.
//!
//! Summarizes the day's high-priority tasks into a short greeting.

use serde::Serialize;
use serde_json::Value;

use super::PromptTemplate;

/// Context for daily-plan prompt.
#[derive(Debug, Clone, Serialize)]
pub struct DailyPlanContext {
    /// High-priority tasks as `[{"title": ..., "priority": ...}]`
    pub tasks: Value,
    /// Number of high-priority tasks
    pub count: usize,
}

/// Get the daily-plan template.
pub fn template() -> PromptTemplate {
    PromptTemplate::new("daily-plan", SYSTEM_PROMPT, USER_PROMPT)
        .with_description("Summarize high-priority tasks into a daily greeting")
}

const SYSTEM_PROMPT: &str =
    "You are a motivational productivity coach. Keep it short, punchy, and under 2 sentences.";

const USER_PROMPT: &str = r"Generate a motivational greeting and a very brief summary of these {{count}} high priority tasks for the day:
{{{json tasks}}}";

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_render() {
        let context = DailyPlanContext {
            tasks: json!([
                {"title": "Ship release", "priority": "critical"},
                {"title": "Review PRs", "priority": "high"}
            ]),
            count: 2,
        };

        let (system, user) = template().render(&context).unwrap();
        assert!(system.contains("productivity coach"));
        assert!(user.contains("Ship release"));
        assert!(user.contains("2 high priority tasks"));
    }
}
