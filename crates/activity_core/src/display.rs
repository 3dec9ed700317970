//! Pure mappings from activity fields to the tokens the front end paints.
//!
//! Every mapping is total: values outside the known set (the `Unknown`
//! variants, ids missing from the directories) land on a neutral token
//! instead of failing.

use crate::model::{
    Activity, ActivityPriority, ActivityStatus, ActivityType, Employee, Equipment,
};
use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};

pub const UNKNOWN_EMPLOYEE: &str = "Unknown";
pub const UNKNOWN_EQUIPMENT: &str = "Unknown Equipment";
pub const MAX_AVATARS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Green,
    Blue,
    Yellow,
    Red,
    Orange,
    Purple,
    Indigo,
    Gray,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Icon {
    CheckCircle,
    Play,
    Clock,
    Pause,
    AlertTriangle,
}

impl Icon {
    pub fn glyph(self) -> &'static str {
        match self {
            Self::CheckCircle => "✔",
            Self::Play => "▶",
            Self::Clock => "◷",
            Self::Pause => "⏸",
            Self::AlertTriangle => "⚠",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IconToken {
    pub icon: Icon,
    pub tone: Tone,
}

pub fn status_icon(status: ActivityStatus) -> IconToken {
    let (icon, tone) = match status {
        ActivityStatus::Completed => (Icon::CheckCircle, Tone::Green),
        ActivityStatus::InProgress => (Icon::Play, Tone::Blue),
        ActivityStatus::Pending => (Icon::Clock, Tone::Yellow),
        ActivityStatus::Cancelled => (Icon::Pause, Tone::Red),
        ActivityStatus::Unknown => (Icon::AlertTriangle, Tone::Gray),
    };
    IconToken { icon, tone }
}

pub fn status_color(status: ActivityStatus) -> Tone {
    match status {
        ActivityStatus::Completed => Tone::Green,
        ActivityStatus::InProgress => Tone::Blue,
        ActivityStatus::Pending => Tone::Yellow,
        ActivityStatus::Cancelled => Tone::Red,
        ActivityStatus::Unknown => Tone::Gray,
    }
}

pub fn priority_color(priority: ActivityPriority) -> Tone {
    match priority {
        ActivityPriority::Critical => Tone::Red,
        ActivityPriority::High => Tone::Orange,
        ActivityPriority::Medium => Tone::Yellow,
        ActivityPriority::Low | ActivityPriority::Unknown => Tone::Gray,
    }
}

pub fn type_color(kind: ActivityType) -> Tone {
    match kind {
        ActivityType::Production => Tone::Blue,
        ActivityType::Maintenance => Tone::Purple,
        ActivityType::QualityCheck => Tone::Green,
        ActivityType::Training => Tone::Indigo,
        ActivityType::Unknown => Tone::Gray,
    }
}

pub fn progress_tone(status: ActivityStatus) -> Tone {
    match status {
        ActivityStatus::Completed => Tone::Green,
        ActivityStatus::InProgress => Tone::Blue,
        _ => Tone::Gray,
    }
}

pub fn employee_name(employee_id: &str, employees: &[Employee]) -> String {
    employees
        .iter()
        .find(|employee| employee.id == employee_id)
        .map(Employee::full_name)
        .unwrap_or_else(|| UNKNOWN_EMPLOYEE.to_string())
}

pub fn equipment_name(equipment_id: Option<&str>, equipment: &[Equipment]) -> Option<String> {
    let equipment_id = equipment_id.filter(|id| !id.is_empty())?;
    let name = equipment
        .iter()
        .find(|item| item.id == equipment_id)
        .map(|item| item.name.clone())
        .unwrap_or_else(|| UNKNOWN_EQUIPMENT.to_string());
    Some(name)
}

/// `Jan 20, 09:30 AM` in the given offset.
pub fn format_due(due: OffsetDateTime, offset: UtcOffset) -> String {
    let local = due.to_offset(offset);
    local
        .format(format_description!(
            "[month repr:short] [day padding:none], [hour repr:12]:[minute] [period]"
        ))
        .unwrap_or_else(|_| local.to_string())
}

pub fn is_overdue(activity: &Activity, now: OffsetDateTime) -> bool {
    activity.status != ActivityStatus::Completed && activity.due_date < now
}

/// Offset used for rendering: the pinned one when configured, else local.
pub fn display_offset(pinned_hours: Option<i8>) -> UtcOffset {
    match pinned_hours {
        Some(hours) => UtcOffset::from_hms(hours, 0, 0).unwrap_or(UtcOffset::UTC),
        None => UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC),
    }
}

/// `in_progress` -> `In progress`, as offered in the filter choices.
pub fn option_label(value: &str) -> String {
    let spaced = badge_label(value);
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn badge_label(value: &str) -> String {
    value.replace('_', " ")
}

pub fn assignee_summary(assigned_to: &[String], employees: &[Employee]) -> String {
    match assigned_to {
        [only] => employee_name(only, employees),
        many => format!("{} people", many.len()),
    }
}

pub fn hours_summary(activity: &Activity) -> String {
    match activity.actual_hours {
        Some(actual) if actual != 0.0 => format!("{}h / {}h", actual, activity.estimated_hours),
        _ => format!("{}h estimated", activity.estimated_hours),
    }
}

pub fn initials(name: &str) -> String {
    name.split(' ')
        .filter_map(|part| part.chars().next())
        .collect()
}

/// Initials of the first few assignees plus how many were left out.
pub fn avatars(assigned_to: &[String], employees: &[Employee]) -> (Vec<String>, usize) {
    let shown = assigned_to
        .iter()
        .take(MAX_AVATARS)
        .map(|id| initials(&employee_name(id, employees)))
        .collect();
    (shown, assigned_to.len().saturating_sub(MAX_AVATARS))
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::Duration;
    use time::macros::{datetime, offset};

    fn employees() -> Vec<Employee> {
        vec![
            Employee {
                id: "emp-1".to_string(),
                first_name: "Ada".to_string(),
                last_name: "Novak".to_string(),
            },
            Employee {
                id: "emp-2".to_string(),
                first_name: "Luis".to_string(),
                last_name: "Ortega".to_string(),
            },
        ]
    }

    fn activity(status: ActivityStatus, due_date: OffsetDateTime) -> Activity {
        Activity {
            id: "1".to_string(),
            title: "Weld inspection".to_string(),
            description: String::new(),
            kind: ActivityType::QualityCheck,
            status,
            priority: ActivityPriority::High,
            assigned_to: vec!["emp-1".to_string()],
            equipment_id: None,
            due_date,
            estimated_hours: 4.0,
            actual_hours: None,
            progress: 10,
        }
    }

    #[test]
    fn status_tokens_cover_every_variant() {
        assert_eq!(
            status_icon(ActivityStatus::Completed),
            IconToken {
                icon: Icon::CheckCircle,
                tone: Tone::Green
            }
        );
        assert_eq!(status_icon(ActivityStatus::InProgress).icon, Icon::Play);
        assert_eq!(status_icon(ActivityStatus::Pending).tone, Tone::Yellow);
        assert_eq!(status_icon(ActivityStatus::Cancelled).icon, Icon::Pause);
        assert_eq!(
            status_icon(ActivityStatus::Unknown),
            IconToken {
                icon: Icon::AlertTriangle,
                tone: Tone::Gray
            }
        );
        assert_eq!(status_color(ActivityStatus::Cancelled), Tone::Red);
        assert_eq!(status_color(ActivityStatus::Unknown), Tone::Gray);
    }

    #[test]
    fn priority_and_type_fall_back_to_gray() {
        assert_eq!(priority_color(ActivityPriority::Critical), Tone::Red);
        assert_eq!(priority_color(ActivityPriority::High), Tone::Orange);
        assert_eq!(priority_color(ActivityPriority::Medium), Tone::Yellow);
        assert_eq!(priority_color(ActivityPriority::Low), Tone::Gray);
        assert_eq!(priority_color(ActivityPriority::Unknown), Tone::Gray);

        assert_eq!(type_color(ActivityType::Maintenance), Tone::Purple);
        assert_eq!(type_color(ActivityType::Training), Tone::Indigo);
        assert_eq!(type_color(ActivityType::Unknown), Tone::Gray);
    }

    #[test]
    fn lookups_degrade_to_placeholders() {
        let employees = employees();
        assert_eq!(employee_name("emp-2", &employees), "Luis Ortega");
        assert_eq!(employee_name("emp-9", &employees), "Unknown");

        let equipment = vec![Equipment {
            id: "eq-1".to_string(),
            name: "CNC Mill 3".to_string(),
        }];
        assert_eq!(equipment_name(None, &equipment), None);
        assert_eq!(
            equipment_name(Some("eq-1"), &equipment).as_deref(),
            Some("CNC Mill 3")
        );
        assert_eq!(
            equipment_name(Some("eq-7"), &equipment).as_deref(),
            Some("Unknown Equipment")
        );
    }

    #[test]
    fn format_due_uses_short_month_and_twelve_hour_clock() {
        let due = datetime!(2025-01-20 09:30 UTC);
        assert_eq!(format_due(due, UtcOffset::UTC), "Jan 20, 09:30 AM");
        assert_eq!(format_due(due, offset!(+6)), "Jan 20, 03:30 PM");
        assert_eq!(
            format_due(datetime!(2025-03-05 00:05 UTC), UtcOffset::UTC),
            "Mar 5, 12:05 AM"
        );
    }

    #[test]
    fn overdue_requires_past_due_and_not_completed() {
        let now = datetime!(2025-06-01 12:00 UTC);
        let yesterday = now - Duration::days(1);

        assert!(is_overdue(&activity(ActivityStatus::Pending, yesterday), now));
        assert!(is_overdue(&activity(ActivityStatus::Cancelled, yesterday), now));
        assert!(!is_overdue(&activity(ActivityStatus::Completed, yesterday), now));
        assert!(!is_overdue(
            &activity(ActivityStatus::Completed, now - Duration::days(400)),
            now
        ));
        assert!(!is_overdue(&activity(ActivityStatus::Pending, now), now));
        assert!(!is_overdue(
            &activity(ActivityStatus::InProgress, now + Duration::hours(1)),
            now
        ));
    }

    #[test]
    fn labels_and_summaries() {
        assert_eq!(option_label("in_progress"), "In progress");
        assert_eq!(option_label("quality_check"), "Quality check");
        assert_eq!(option_label(""), "");
        assert_eq!(badge_label("quality_check"), "quality check");

        let employees = employees();
        assert_eq!(
            assignee_summary(&["emp-1".to_string()], &employees),
            "Ada Novak"
        );
        assert_eq!(
            assignee_summary(&["emp-1".to_string(), "emp-2".to_string()], &employees),
            "2 people"
        );

        let mut item = activity(ActivityStatus::InProgress, datetime!(2025-01-20 09:30 UTC));
        assert_eq!(hours_summary(&item), "4h estimated");
        item.actual_hours = Some(0.0);
        assert_eq!(hours_summary(&item), "4h estimated");
        item.actual_hours = Some(2.5);
        assert_eq!(hours_summary(&item), "2.5h / 4h");
    }

    #[test]
    fn avatars_cap_at_three() {
        let employees = employees();
        let assigned: Vec<String> = ["emp-1", "emp-2", "emp-3", "emp-1", "emp-2"]
            .iter()
            .map(|id| id.to_string())
            .collect();

        let (shown, hidden) = avatars(&assigned, &employees);
        assert_eq!(shown, ["AN", "LO", "U"]);
        assert_eq!(hidden, 2);
        assert_eq!(initials("Ada Novak"), "AN");
    }
}
