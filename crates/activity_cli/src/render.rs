use activity_core::board::ActivityBoard;
use activity_core::config::Palette;
use activity_core::display::{
    self, Tone, assignee_summary, avatars, badge_label, employee_name, equipment_name,
    format_due, hours_summary, is_overdue, option_label, priority_color, progress_tone,
    status_color, status_icon, type_color,
};
use activity_core::filter::ActivityFilter;
use activity_core::model::{Activity, Employee, Equipment};
use activity_core::seed::Directory;
use tabled::settings::Style;
use tabled::{Table, Tabled};
use time::format_description::well_known::Rfc3339;
use time::{OffsetDateTime, UtcOffset};

const PROGRESS_WIDTH: usize = 20;

/// Everything a rendering needs besides the activities themselves.
pub struct View<'a> {
    pub employees: &'a [Employee],
    pub equipment: &'a [Equipment],
    pub palette: &'a Palette,
    pub offset: UtcOffset,
    pub now: OffsetDateTime,
}

impl<'a> View<'a> {
    pub fn new(
        directory: &'a Directory,
        palette: &'a Palette,
        offset: UtcOffset,
        now: OffsetDateTime,
    ) -> Self {
        Self {
            employees: &directory.employees,
            equipment: &directory.equipment,
            palette,
            offset,
            now,
        }
    }
}

#[derive(Tabled)]
struct ActivityRow {
    #[tabled(rename = "")]
    icon: String,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Priority")]
    priority: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Assigned")]
    assigned: String,
    #[tabled(rename = "Equipment")]
    equipment: String,
    #[tabled(rename = "Due")]
    due: String,
    #[tabled(rename = "Hours")]
    hours: String,
    #[tabled(rename = "Progress")]
    progress: String,
}

#[derive(Tabled)]
struct EmployeeRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
}

#[derive(Tabled)]
struct EquipmentRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
}

fn overdue_badge(view: &View<'_>) -> String {
    view.palette.paint(
        &format!("{} Overdue", display::Icon::AlertTriangle.glyph()),
        Tone::Red,
    )
}

fn activity_row(activity: &Activity, view: &View<'_>) -> ActivityRow {
    let palette = view.palette;
    let icon = status_icon(activity.status);
    let title = if is_overdue(activity, view.now) {
        format!("{} {}", activity.title, overdue_badge(view))
    } else {
        activity.title.clone()
    };

    ActivityRow {
        icon: palette.paint(icon.icon.glyph(), icon.tone),
        id: activity.id.clone(),
        title,
        priority: palette.paint(activity.priority.as_str(), priority_color(activity.priority)),
        kind: palette.paint(
            &badge_label(activity.kind.as_str()),
            type_color(activity.kind),
        ),
        status: palette.paint(
            &badge_label(activity.status.as_str()),
            status_color(activity.status),
        ),
        assigned: assignee_summary(&activity.assigned_to, view.employees),
        equipment: equipment_name(activity.equipment_id.as_deref(), view.equipment)
            .unwrap_or_default(),
        due: format_due(activity.due_date, view.offset),
        hours: hours_summary(activity),
        progress: format!("{}%", activity.progress),
    }
}

fn describe_filter(filter: &ActivityFilter) -> String {
    let mut parts = Vec::new();
    if !filter.search.is_empty() {
        parts.push(format!("search \"{}\"", filter.search));
    }
    if let Some(status) = filter.status {
        parts.push(format!("status {}", option_label(status.as_str())));
    }
    if let Some(kind) = filter.kind {
        parts.push(format!("type {}", option_label(kind.as_str())));
    }
    if let Some(priority) = filter.priority {
        parts.push(format!("priority {}", option_label(priority.as_str())));
    }
    parts.join(", ")
}

pub fn render_list(board: &ActivityBoard, view: &View<'_>) -> String {
    let visible = board.visible();
    let mut out = String::new();

    if board.filter().is_active() {
        out.push_str(&format!(
            "Showing {} of {} activities ({})\n",
            visible.len(),
            board.activities().len(),
            describe_filter(board.filter())
        ));
    }

    if let Some(hint) = board.empty_state_hint() {
        out.push_str("No activities found\n");
        out.push_str(hint);
        return out;
    }

    let rows: Vec<ActivityRow> = visible
        .into_iter()
        .map(|activity| activity_row(activity, view))
        .collect();
    out.push_str(&Table::new(rows).with(Style::rounded()).to_string());
    out
}

pub fn progress_bar(progress: u8, width: usize) -> String {
    let filled = usize::from(progress.min(100)) * width / 100;
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

pub fn render_card(activity: &Activity, view: &View<'_>) -> String {
    let palette = view.palette;
    let icon = status_icon(activity.status);
    let mut lines = Vec::new();

    let mut header = format!(
        "{} {}",
        palette.paint(icon.icon.glyph(), icon.tone),
        activity.title
    );
    if is_overdue(activity, view.now) {
        header.push_str("  ");
        header.push_str(&overdue_badge(view));
    }
    lines.push(header);
    if !activity.description.is_empty() {
        lines.push(format!("  {}", activity.description));
    }
    lines.push(format!(
        "  [{}] [{}] [{}]",
        palette.paint(activity.priority.as_str(), priority_color(activity.priority)),
        palette.paint(&badge_label(activity.kind.as_str()), type_color(activity.kind)),
        palette.paint(&badge_label(activity.status.as_str()), status_color(activity.status)),
    ));
    lines.push(String::new());
    lines.push(format!("  ID:        {}", activity.id));
    lines.push(format!(
        "  Assigned:  {}",
        assignee_summary(&activity.assigned_to, view.employees)
    ));
    lines.push(format!("  Due:       {}", format_due(activity.due_date, view.offset)));
    if let Some(name) = equipment_name(activity.equipment_id.as_deref(), view.equipment) {
        lines.push(format!("  Equipment: {name}"));
    }
    lines.push(format!("  Hours:     {}", hours_summary(activity)));
    lines.push(format!(
        "  Progress:  {} {}%",
        palette.paint(
            &progress_bar(activity.progress, PROGRESS_WIDTH),
            progress_tone(activity.status)
        ),
        activity.progress
    ));

    let (shown, hidden) = avatars(&activity.assigned_to, view.employees);
    let mut team = shown
        .iter()
        .map(|initials| format!("({initials})"))
        .collect::<Vec<_>>();
    if hidden > 0 {
        team.push(format!("(+{hidden})"));
    }
    lines.push(format!("  Team:      {}", team.join(" ")));
    for employee_id in &activity.assigned_to {
        lines.push(format!(
            "             - {}",
            employee_name(employee_id, view.employees)
        ));
    }

    lines.join("\n")
}

pub fn activity_json(activity: &Activity, view: &View<'_>) -> serde_json::Value {
    let due_date = activity
        .due_date
        .format(&Rfc3339)
        .unwrap_or_else(|_| activity.due_date.to_string());
    let assignee_names: Vec<String> = activity
        .assigned_to
        .iter()
        .map(|id| employee_name(id, view.employees))
        .collect();

    serde_json::json!({
        "id": activity.id,
        "title": activity.title,
        "description": activity.description,
        "type": activity.kind,
        "status": activity.status,
        "priority": activity.priority,
        "assigned_to": activity.assigned_to,
        "assignee_names": assignee_names,
        "equipment_id": activity.equipment_id,
        "equipment_name": equipment_name(activity.equipment_id.as_deref(), view.equipment),
        "due_date": due_date,
        "estimated_hours": activity.estimated_hours,
        "actual_hours": activity.actual_hours,
        "progress": activity.progress,
        "overdue": is_overdue(activity, view.now),
    })
}

pub fn render_list_json(board: &ActivityBoard, view: &View<'_>) -> serde_json::Value {
    serde_json::Value::Array(
        board
            .visible()
            .into_iter()
            .map(|activity| activity_json(activity, view))
            .collect(),
    )
}

pub fn render_employees(employees: &[Employee]) -> String {
    let rows: Vec<EmployeeRow> = employees
        .iter()
        .map(|employee| EmployeeRow {
            id: employee.id.clone(),
            name: employee.full_name(),
        })
        .collect();
    Table::new(rows).with(Style::rounded()).to_string()
}

pub fn render_equipment(equipment: &[Equipment]) -> String {
    let rows: Vec<EquipmentRow> = equipment
        .iter()
        .map(|item| EquipmentRow {
            id: item.id.clone(),
            name: item.name.clone(),
        })
        .collect();
    Table::new(rows).with(Style::rounded()).to_string()
}
