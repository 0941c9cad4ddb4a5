//! Planner domain - AI-powered task operations and presentation ordering.
//!
//! Each operation is one request-scoped pipeline run: render a prompt,
//! generate with fallback, repair the response, apply the result. AI failure
//! never blocks task creation or the daily plan (those degrade); breakdown
//! surfaces its failure to the caller.

use std::sync::Arc;

use chrono::NaiveDate;
use serde_json::json;

use crate::ai::{
    normalize_structured, parse_object,
    prompts::{AnalyzeTaskContext, BreakdownTaskContext, DailyPlanContext},
    AIMessage, FallbackConfig, FallbackOrchestrator, OutputShape, PromptManager, ProviderRegistry,
    TaskAnalysis,
};
use crate::entities::{EnergyLevel, Task, TaskPriority, TrackerConfig};
use crate::errors::{TrackerError, TrackerResult};
use crate::schedule::{bucket_by_due_date, sort_by_urgency, today_local, DueBuckets};
use crate::storage::Storage;

/// Description length above which the heuristic fallback classifies a task as
/// deep work
const DEEP_WORK_DESCRIPTION_LEN: usize = 50;

/// Fallback greeting when there is nothing high-priority to summarize
const DEFAULT_PLAN_MESSAGE: &str = "Let's crush it today! Focus on your high priority items.";

/// Planner domain for AI-powered task operations.
pub struct PlannerDomain {
    storage: Arc<dyn Storage>,
    orchestrator: FallbackOrchestrator,
    prompts: PromptManager,
    max_subtasks: usize,
}

impl PlannerDomain {
    /// Create a planner with default configuration.
    pub fn new(storage: Arc<dyn Storage>, registry: Arc<ProviderRegistry>) -> Self {
        Self::with_config(storage, registry, &TrackerConfig::default())
    }

    /// Create a planner from explicit configuration.
    pub fn with_config(
        storage: Arc<dyn Storage>,
        registry: Arc<ProviderRegistry>,
        config: &TrackerConfig,
    ) -> Self {
        Self {
            storage,
            orchestrator: FallbackOrchestrator::new(
                registry,
                FallbackConfig::from(&config.generation),
            ),
            prompts: PromptManager::default(),
            max_subtasks: config.global.max_subtasks,
        }
    }

    /// Create a new task, classifying it with the analyze step.
    ///
    /// Generation or repair failure degrades to the length heuristic; AI
    /// trouble never blocks task creation.
    pub async fn create_task(
        &self,
        title: &str,
        description: &str,
        priority: Option<TaskPriority>,
        due_date: Option<NaiveDate>,
    ) -> TrackerResult<Task> {
        let id = self.storage.next_task_id().await?;
        let mut task = Task::new(id, title, description);
        task.priority = priority.unwrap_or_default();
        task.due_date = due_date;

        match self.analyze(&task).await {
            Ok(analysis) => {
                task.energy_level = analysis.energy().or(Some(EnergyLevel::Admin));
                if let Some(suggested) = analysis.priority() {
                    task.priority = suggested;
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, "task analysis failed, using heuristic defaults");
                task.energy_level = Some(if description.len() > DEEP_WORK_DESCRIPTION_LEN {
                    EnergyLevel::DeepWork
                } else {
                    EnergyLevel::Admin
                });
            }
        }

        self.storage.add_task(task.clone()).await?;
        Ok(task)
    }

    async fn analyze(&self, task: &Task) -> TrackerResult<TaskAnalysis> {
        let context = AnalyzeTaskContext {
            title: task.title.clone(),
            description: task.description.clone(),
            due_date: task.due_date.map(|d| d.to_string()),
            user_priority: task.priority.to_string(),
        };
        let (system, user) = self.prompts.render("analyze-task", &context)?;
        let messages = vec![AIMessage::system(system), AIMessage::user(user)];

        let outcome = self.orchestrator.generate(&messages, OutputShape::Object).await?;
        let value = normalize_structured(&outcome.text, OutputShape::Object, self.max_subtasks)?;
        let object = value.into_object().ok_or_else(|| TrackerError::RepairFailure {
            reason: "analysis did not produce an object".to_string(),
        })?;
        parse_object(object)
    }

    /// Break a task down into actionable steps.
    ///
    /// Exhaustion, fatal provider errors, and repair failure propagate to the
    /// caller; no placeholder state is persisted on failure.
    pub async fn breakdown_task(&self, task_id: &str) -> TrackerResult<Task> {
        let mut task = self
            .storage
            .load_task(task_id)
            .await?
            .ok_or_else(|| TrackerError::TaskNotFound {
                task_id: task_id.to_string(),
            })?;

        let context = BreakdownTaskContext {
            title: task.title.clone(),
            description: task.description.clone(),
            step_count: self.max_subtasks,
            deadline_context: deadline_context(task.due_date, today_local()).to_string(),
        };
        let (system, user) = self.prompts.render("breakdown-task", &context)?;
        let messages = vec![AIMessage::system(system), AIMessage::user(user)];

        let outcome = self
            .orchestrator
            .generate(&messages, OutputShape::StringList)
            .await?;
        tracing::debug!(candidate = %outcome.candidate, "breakdown generated");

        let value =
            normalize_structured(&outcome.text, OutputShape::StringList, self.max_subtasks)?;
        let steps = value.into_list().ok_or_else(|| TrackerError::RepairFailure {
            reason: "breakdown did not produce a list".to_string(),
        })?;

        task.set_subtasks(steps);
        self.storage.update_task(task_id, &task).await?;
        Ok(task)
    }

    /// Generate a short motivational summary of the day's high-priority
    /// tasks.
    ///
    /// Always reaches a terminal state: with no high-priority work, or on any
    /// generation failure, a static fallback message is returned instead of
    /// an error.
    pub async fn daily_plan(&self) -> TrackerResult<String> {
        let tasks = self.storage.load_tasks().await?;
        let high_priority: Vec<&Task> = tasks
            .iter()
            .filter(|t| {
                t.is_open()
                    && matches!(t.priority, TaskPriority::Critical | TaskPriority::High)
            })
            .collect();

        if high_priority.is_empty() {
            return Ok(DEFAULT_PLAN_MESSAGE.to_string());
        }

        let count = high_priority.len();
        let context = DailyPlanContext {
            tasks: json!(high_priority
                .iter()
                .map(|t| json!({"title": t.title, "priority": t.priority.to_string()}))
                .collect::<Vec<_>>()),
            count,
        };
        let (system, user) = self.prompts.render("daily-plan", &context)?;
        let messages = vec![AIMessage::system(system), AIMessage::user(user)];

        let generated = self
            .orchestrator
            .generate(&messages, OutputShape::FreeText)
            .await
            .and_then(|outcome| {
                normalize_structured(&outcome.text, OutputShape::FreeText, 1)
            });

        match generated {
            Ok(value) => Ok(value
                .into_text()
                .unwrap_or_else(|| DEFAULT_PLAN_MESSAGE.to_string())),
            Err(err) => {
                // Quota-class exhaustion gets the same degraded path, just
                // logged distinctly for the caller's diagnostics.
                tracing::warn!(
                    error = %err,
                    quota = err.is_quota(),
                    "daily plan generation failed, using fallback message"
                );
                Ok(format!(
                    "You have {count} high priority tasks today. Let's get them done!"
                ))
            }
        }
    }

    /// Bucket open tasks by due-date proximity for presentation.
    pub async fn board(&self) -> TrackerResult<DueBuckets> {
        self.board_at(today_local()).await
    }

    /// Bucket open tasks relative to an explicit reference day.
    pub async fn board_at(&self, today: NaiveDate) -> TrackerResult<DueBuckets> {
        let tasks = self.storage.load_tasks().await?;
        let open: Vec<Task> = tasks.into_iter().filter(Task::is_open).collect();
        Ok(bucket_by_due_date(open, today))
    }

    /// Open tasks ordered by descending urgency.
    pub async fn sorted_open_tasks(&self) -> TrackerResult<Vec<Task>> {
        let today = today_local();
        let tasks = self.storage.load_tasks().await?;
        let mut open: Vec<Task> = tasks.into_iter().filter(Task::is_open).collect();
        sort_by_urgency(&mut open, today);
        Ok(open)
    }
}

/// Deadline framing for the breakdown prompt: tasks due within three days get
/// urgency framing.
fn deadline_context(due_date: Option<NaiveDate>, today: NaiveDate) -> &'static str {
    match due_date {
        Some(due) => {
            let days_until_due = due.signed_duration_since(today).num_days();
            if (0..3).contains(&days_until_due) {
                "URGENT DEADLINE: The first 2 steps must be immediate actions for TODAY. \
                 Prioritize speed."
            } else {
                "Standard timeline. Ensure steps are logical and sequential."
            }
        }
        None => "Standard timeline. Ensure steps are logical and sequential.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_deadline_context_urgent_window() {
        let today = date(2024, 6, 10);
        assert!(deadline_context(Some(date(2024, 6, 10)), today).starts_with("URGENT"));
        assert!(deadline_context(Some(date(2024, 6, 12)), today).starts_with("URGENT"));
        assert!(deadline_context(Some(date(2024, 6, 13)), today).starts_with("Standard"));
        // Overdue tasks get the standard framing
        assert!(deadline_context(Some(date(2024, 6, 9)), today).starts_with("Standard"));
        assert!(deadline_context(None, today).starts_with("Standard"));
    }
}
