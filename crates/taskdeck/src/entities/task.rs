//! Task entity and related types.

use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::errors::TrackerError;

/// Maximum number of subtask steps kept on a task (policy value)
pub const MAX_SUBTASKS: usize = 5;

/// Task status values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    #[default]
    Todo,
    InProgress,
    Done,
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Todo => write!(f, "todo"),
            Self::InProgress => write!(f, "in-progress"),
            Self::Done => write!(f, "done"),
        }
    }
}

impl std::str::FromStr for TaskStatus {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "todo" | "pending" => Ok(Self::Todo),
            "in-progress" | "inprogress" | "in_progress" => Ok(Self::InProgress),
            "done" | "completed" => Ok(Self::Done),
            _ => Err(TrackerError::InvalidStatus {
                status: s.to_string(),
            }),
        }
    }
}

/// Task priority levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Critical,
    High,
    #[default]
    Medium,
    Low,
    Backburner,
}

impl TaskPriority {
    /// Fixed ordering weight used as a sort tie-break (never part of the
    /// urgency score itself).
    pub fn weight(self) -> u8 {
        match self {
            Self::Critical => 4,
            Self::High => 3,
            Self::Medium => 2,
            Self::Low => 1,
            Self::Backburner => 0,
        }
    }
}

impl std::fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Critical => write!(f, "critical"),
            Self::High => write!(f, "high"),
            Self::Medium => write!(f, "medium"),
            Self::Low => write!(f, "low"),
            Self::Backburner => write!(f, "backburner"),
        }
    }
}

impl std::str::FromStr for TaskPriority {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "critical" | "critical hit" | "critical-hit" | "crit" => Ok(Self::Critical),
            "high" => Ok(Self::High),
            "medium" | "med" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            "backburner" | "back-burner" | "back burner" => Ok(Self::Backburner),
            _ => Err(TrackerError::InvalidPriority {
                priority: s.to_string(),
            }),
        }
    }
}

/// Energy level a task demands, assigned by the analyze step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EnergyLevel {
    DeepWork,
    Admin,
}

impl std::fmt::Display for EnergyLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DeepWork => write!(f, "deep-work"),
            Self::Admin => write!(f, "admin"),
        }
    }
}

impl std::str::FromStr for EnergyLevel {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "deep work" | "deep-work" | "deepwork" => Ok(Self::DeepWork),
            "admin" => Ok(Self::Admin),
            _ => Err(TrackerError::InvalidEnergyLevel {
                level: s.to_string(),
            }),
        }
    }
}

/// Parse a due date from either a plain calendar date (`YYYY-MM-DD`) or an
/// RFC 3339 datetime.
///
/// A due date is a wall-clock calendar day. A datetime value is converted to
/// the *local* calendar date rather than being truncated in UTC, so a date
/// entered late in the evening never lands on the wrong day.
pub fn parse_due_date(value: &str) -> Result<NaiveDate, TrackerError> {
    let value = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(datetime) = DateTime::parse_from_rfc3339(value) {
        return Ok(datetime.with_timezone(&Local).date_naive());
    }
    Err(TrackerError::InvalidDueDate {
        value: value.to_string(),
    })
}

fn deserialize_due_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw {
        None => Ok(None),
        Some(value) => parse_due_date(&value)
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

/// Core task structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier (numeric string, assigned by storage)
    pub id: String,

    /// Brief, descriptive title
    pub title: String,

    /// Concise description of what the task involves
    #[serde(default)]
    pub description: String,

    /// Current task status
    #[serde(default)]
    pub status: TaskStatus,

    /// Task priority level
    #[serde(default)]
    pub priority: TaskPriority,

    /// Energy level the task demands (assigned at creation)
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        rename = "energyLevel"
    )]
    pub energy_level: Option<EnergyLevel>,

    /// Due date as a local calendar day (no time-of-day semantics)
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        rename = "dueDate",
        deserialize_with = "deserialize_due_date"
    )]
    pub due_date: Option<NaiveDate>,

    /// Ordered breakdown steps, capped at [`MAX_SUBTASKS`]
    #[serde(default, rename = "subTasks")]
    pub sub_tasks: Vec<String>,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        rename = "createdAt"
    )]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        rename = "updatedAt"
    )]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Create a new task with minimal required fields
    pub fn new(id: impl Into<String>, title: impl Into<String>, description: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            status: TaskStatus::default(),
            priority: TaskPriority::default(),
            energy_level: None,
            due_date: None,
            sub_tasks: Vec::new(),
            created_at: Some(now),
            updated_at: Some(now),
        }
    }

    /// Whether the task still participates in planning (not done)
    pub fn is_open(&self) -> bool {
        self.status != TaskStatus::Done
    }

    /// Update task status
    pub fn set_status(&mut self, status: TaskStatus) {
        self.status = status;
        self.updated_at = Some(Utc::now());
    }

    /// Replace the breakdown steps, enforcing the [`MAX_SUBTASKS`] cap
    pub fn set_subtasks(&mut self, mut steps: Vec<String>) {
        steps.truncate(MAX_SUBTASKS);
        self.sub_tasks = steps;
        self.updated_at = Some(Utc::now());
    }

    /// Set the due date
    pub fn set_due_date(&mut self, due_date: Option<NaiveDate>) {
        self.due_date = due_date;
        self.updated_at = Some(Utc::now());
    }
}
