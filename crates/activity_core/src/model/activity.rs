use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use time::OffsetDateTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityType {
    Production,
    Maintenance,
    QualityCheck,
    Training,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityStatus {
    Pending,
    InProgress,
    Completed,
    Cancelled,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityPriority {
    Low,
    Medium,
    High,
    Critical,
    #[serde(other)]
    Unknown,
}

impl ActivityType {
    /// Selectable values, in the order the type filter offers them.
    pub const ALL: [ActivityType; 4] = [
        Self::Production,
        Self::Maintenance,
        Self::QualityCheck,
        Self::Training,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Production => "production",
            Self::Maintenance => "maintenance",
            Self::QualityCheck => "quality_check",
            Self::Training => "training",
            Self::Unknown => "unknown",
        }
    }
}

impl ActivityStatus {
    pub const ALL: [ActivityStatus; 4] = [
        Self::Pending,
        Self::InProgress,
        Self::Completed,
        Self::Cancelled,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::Unknown => "unknown",
        }
    }
}

impl ActivityPriority {
    pub const ALL: [ActivityPriority; 4] = [Self::Low, Self::Medium, Self::High, Self::Critical];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
            Self::Unknown => "unknown",
        }
    }
}

fn parse_choice<T: Copy>(
    field: &str,
    raw: &str,
    choices: &[T],
    name: impl Fn(T) -> &'static str,
) -> Result<T, AppError> {
    let wanted = raw.trim().to_ascii_lowercase().replace(['-', ' '], "_");
    choices
        .iter()
        .copied()
        .find(|choice| name(*choice) == wanted)
        .ok_or_else(|| {
            let expected = choices
                .iter()
                .map(|choice| name(*choice))
                .collect::<Vec<_>>()
                .join(", ");
            AppError::invalid_input(format!(
                "invalid {field} '{}' (expected one of: {expected})",
                raw.trim()
            ))
        })
}

impl FromStr for ActivityType {
    type Err = AppError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        parse_choice("type", raw, &Self::ALL, Self::as_str)
    }
}

impl FromStr for ActivityStatus {
    type Err = AppError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        parse_choice("status", raw, &Self::ALL, Self::as_str)
    }
}

impl FromStr for ActivityPriority {
    type Err = AppError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        parse_choice("priority", raw, &Self::ALL, Self::as_str)
    }
}

impl fmt::Display for ActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for ActivityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for ActivityPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type")]
    pub kind: ActivityType,
    pub status: ActivityStatus,
    pub priority: ActivityPriority,
    pub assigned_to: Vec<String>,
    #[serde(default)]
    pub equipment_id: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub due_date: OffsetDateTime,
    pub estimated_hours: f64,
    #[serde(default)]
    pub actual_hours: Option<f64>,
    #[serde(default)]
    pub progress: u8,
}

/// Everything a form submits: an activity minus its id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityDraft {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type")]
    pub kind: ActivityType,
    pub status: ActivityStatus,
    pub priority: ActivityPriority,
    pub assigned_to: Vec<String>,
    #[serde(default)]
    pub equipment_id: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub due_date: OffsetDateTime,
    pub estimated_hours: f64,
    #[serde(default)]
    pub actual_hours: Option<f64>,
    #[serde(default)]
    pub progress: u8,
}

impl Activity {
    pub fn from_draft(id: String, draft: ActivityDraft) -> Self {
        Self {
            id,
            title: draft.title,
            description: draft.description,
            kind: draft.kind,
            status: draft.status,
            priority: draft.priority,
            assigned_to: draft.assigned_to,
            equipment_id: draft.equipment_id,
            due_date: draft.due_date,
            estimated_hours: draft.estimated_hours,
            actual_hours: draft.actual_hours,
            progress: draft.progress,
        }
    }

    /// Overwrites every field but `id` with the draft's values.
    pub fn apply_draft(&mut self, draft: ActivityDraft) {
        let id = std::mem::take(&mut self.id);
        *self = Self::from_draft(id, draft);
    }

    pub fn to_draft(&self) -> ActivityDraft {
        ActivityDraft {
            title: self.title.clone(),
            description: self.description.clone(),
            kind: self.kind,
            status: self.status,
            priority: self.priority,
            assigned_to: self.assigned_to.clone(),
            equipment_id: self.equipment_id.clone(),
            due_date: self.due_date,
            estimated_hours: self.estimated_hours,
            actual_hours: self.actual_hours,
            progress: self.progress,
        }
    }
}
