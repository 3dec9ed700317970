use super::Directory;
use crate::model::{
    Activity, ActivityPriority, ActivityStatus, ActivityType, Employee, Equipment,
};
use time::OffsetDateTime;
use time::macros::datetime;

fn employee(id: &str, first_name: &str, last_name: &str) -> Employee {
    Employee {
        id: id.to_string(),
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
    }
}

fn equipment(id: &str, name: &str) -> Equipment {
    Equipment {
        id: id.to_string(),
        name: name.to_string(),
    }
}

#[allow(clippy::too_many_arguments)]
fn activity(
    id: &str,
    title: &str,
    description: &str,
    kind: ActivityType,
    status: ActivityStatus,
    priority: ActivityPriority,
    assigned_to: &[&str],
    equipment_id: Option<&str>,
    due_date: OffsetDateTime,
    estimated_hours: f64,
    actual_hours: Option<f64>,
    progress: u8,
) -> Activity {
    Activity {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        kind,
        status,
        priority,
        assigned_to: assigned_to.iter().map(|id| id.to_string()).collect(),
        equipment_id: equipment_id.map(str::to_string),
        due_date,
        estimated_hours,
        actual_hours,
        progress,
    }
}

pub(super) fn directory() -> Directory {
    let employees = vec![
        employee("1", "Maria", "Schmidt"),
        employee("2", "James", "Okafor"),
        employee("3", "Elena", "Petrova"),
        employee("4", "David", "Chen"),
        employee("5", "Sofia", "Romero"),
        employee("6", "Tom", "Becker"),
    ];

    let equipment = vec![
        equipment("1", "CNC Machine A1"),
        equipment("2", "Welding Robot W2"),
        equipment("3", "Hydraulic Press P1"),
        equipment("4", "Assembly Line L3"),
    ];

    let activities = vec![
        activity(
            "1",
            "Produce batch #4471 of gear housings",
            "Machine 500 aluminium gear housings for the Q1 order",
            ActivityType::Production,
            ActivityStatus::InProgress,
            ActivityPriority::High,
            &["1", "2"],
            Some("1"),
            datetime!(2025-01-20 16:00 UTC),
            16.0,
            Some(9.5),
            60,
        ),
        activity(
            "2",
            "Weld inspection on frame line",
            "Ultrasonic check of seams produced last week",
            ActivityType::QualityCheck,
            ActivityStatus::Pending,
            ActivityPriority::Critical,
            &["3"],
            Some("2"),
            datetime!(2025-01-18 09:00 UTC),
            4.0,
            None,
            0,
        ),
        activity(
            "3",
            "Hydraulic press seal replacement",
            "Scheduled maintenance: replace main cylinder seals and test pressure",
            ActivityType::Maintenance,
            ActivityStatus::Completed,
            ActivityPriority::Medium,
            &["4", "6"],
            Some("3"),
            datetime!(2025-01-15 13:30 UTC),
            6.0,
            Some(7.0),
            100,
        ),
        activity(
            "4",
            "Forklift safety training",
            "Annual certification refresher for warehouse staff",
            ActivityType::Training,
            ActivityStatus::Pending,
            ActivityPriority::Low,
            &["1", "2", "3", "4", "5"],
            None,
            datetime!(2025-02-03 08:00 UTC),
            3.0,
            None,
            0,
        ),
        activity(
            "5",
            "Assembly line changeover",
            "Retool line L3 for the compact motor variant",
            ActivityType::Production,
            ActivityStatus::Cancelled,
            ActivityPriority::Medium,
            &["5"],
            Some("4"),
            datetime!(2025-01-22 06:00 UTC),
            8.0,
            None,
            15,
        ),
        activity(
            "6",
            "Calibrate CNC spindle",
            "Spindle runout exceeded tolerance during last inspection",
            ActivityType::Maintenance,
            ActivityStatus::InProgress,
            ActivityPriority::High,
            &["6"],
            Some("1"),
            datetime!(2025-01-21 11:00 UTC),
            2.5,
            Some(1.0),
            40,
        ),
        activity(
            "7",
            "Incoming material inspection",
            "Verify certificates and hardness of steel coil delivery",
            ActivityType::QualityCheck,
            ActivityStatus::Completed,
            ActivityPriority::Medium,
            &["3", "5"],
            None,
            datetime!(2025-01-16 10:00 UTC),
            2.0,
            Some(2.0),
            100,
        ),
    ];

    Directory {
        activities,
        employees,
        equipment,
    }
}
