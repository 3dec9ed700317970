use crate::cli::ActivityFields;
use activity_core::board::{ActivityForm, Confirm, ModalOutcome, ModalRequest};
use activity_core::error::AppError;
use activity_core::model::{ActivityDraft, ActivityPriority, ActivityStatus, ActivityType};
use std::io::{BufRead, Write};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

/// Form backed by command-line flags. In edit mode the flags overlay the
/// selected activity; with no flags at all the edit is cancelled.
pub struct FlagForm {
    fields: ActivityFields,
}

impl FlagForm {
    pub fn new(fields: ActivityFields) -> Self {
        Self { fields }
    }
}

impl ActivityForm for FlagForm {
    fn present(&mut self, request: ModalRequest<'_>) -> Result<ModalOutcome, AppError> {
        let draft = match request.activity {
            Some(existing) => {
                if self.fields.is_empty() {
                    return Ok(ModalOutcome::Cancelled);
                }
                overlay(existing.to_draft(), &self.fields)?
            }
            None => new_draft(&self.fields)?,
        };
        validate(&draft)?;
        Ok(ModalOutcome::Saved(draft))
    }
}

fn new_draft(fields: &ActivityFields) -> Result<ActivityDraft, AppError> {
    let title = fields
        .title
        .clone()
        .ok_or_else(|| AppError::invalid_input("title is required"))?;
    let due = fields
        .due
        .as_deref()
        .ok_or_else(|| AppError::invalid_input("due date is required"))?;

    let base = ActivityDraft {
        title,
        description: String::new(),
        kind: ActivityType::Production,
        status: ActivityStatus::Pending,
        priority: ActivityPriority::Medium,
        assigned_to: Vec::new(),
        equipment_id: None,
        due_date: parse_due(due)?,
        estimated_hours: 0.0,
        actual_hours: None,
        progress: 0,
    };
    overlay(base, fields)
}

fn overlay(mut draft: ActivityDraft, fields: &ActivityFields) -> Result<ActivityDraft, AppError> {
    if let Some(title) = fields.title.as_ref() {
        draft.title = title.clone();
    }
    if let Some(description) = fields.description.as_ref() {
        draft.description = description.trim().to_string();
    }
    if let Some(kind) = fields.kind.as_deref() {
        draft.kind = kind.parse()?;
    }
    if let Some(status) = fields.status.as_deref() {
        draft.status = status.parse()?;
    }
    if let Some(priority) = fields.priority.as_deref() {
        draft.priority = priority.parse()?;
    }
    if let Some(assigned_to) = fields.assigned_to.as_ref() {
        draft.assigned_to = assigned_to
            .iter()
            .map(|id| id.trim())
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .collect();
    }
    if let Some(equipment_id) = fields.equipment_id.as_deref() {
        let trimmed = equipment_id.trim();
        draft.equipment_id = (!trimmed.is_empty()).then(|| trimmed.to_string());
    }
    if let Some(due) = fields.due.as_deref() {
        draft.due_date = parse_due(due)?;
    }
    if let Some(estimated_hours) = fields.estimated_hours {
        draft.estimated_hours = estimated_hours;
    }
    if let Some(actual_hours) = fields.actual_hours {
        draft.actual_hours = Some(actual_hours);
    } else if fields.clear_actual {
        draft.actual_hours = None;
    }
    if let Some(progress) = fields.progress {
        draft.progress = progress;
    }
    Ok(draft)
}

fn parse_due(raw: &str) -> Result<OffsetDateTime, AppError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AppError::invalid_input("due date is required"));
    }
    OffsetDateTime::parse(trimmed, &Rfc3339)
        .map_err(|_| AppError::invalid_input("due date must be RFC3339"))
}

fn validate(draft: &ActivityDraft) -> Result<(), AppError> {
    if draft.title.trim().is_empty() {
        return Err(AppError::invalid_input("title is required"));
    }
    if draft.assigned_to.is_empty() {
        return Err(AppError::invalid_input("at least one assignee is required"));
    }
    if draft.progress > 100 {
        return Err(AppError::invalid_input("progress must be between 0 and 100"));
    }
    let hours_valid = |hours: f64| hours.is_finite() && hours >= 0.0;
    if !hours_valid(draft.estimated_hours) || !draft.actual_hours.is_none_or(hours_valid) {
        return Err(AppError::invalid_input("hours must be non-negative"));
    }
    Ok(())
}

/// Yes/no prompt answered by the next input line; end of input means no.
pub struct LineConfirm<'a, W: Write> {
    input: &'a mut dyn BufRead,
    output: W,
    assume_yes: bool,
}

impl<'a, W: Write> LineConfirm<'a, W> {
    pub fn new(input: &'a mut dyn BufRead, output: W, assume_yes: bool) -> Self {
        Self {
            input,
            output,
            assume_yes,
        }
    }
}

impl<W: Write> Confirm for LineConfirm<'_, W> {
    fn confirm(&mut self, prompt: &str) -> Result<bool, AppError> {
        if self.assume_yes {
            return Ok(true);
        }

        write!(self.output, "{prompt} [y/N] ").map_err(|err| AppError::io(err.to_string()))?;
        self.output
            .flush()
            .map_err(|err| AppError::io(err.to_string()))?;

        let mut answer = String::new();
        let bytes = self
            .input
            .read_line(&mut answer)
            .map_err(|err| AppError::io(err.to_string()))?;
        if bytes == 0 {
            writeln!(self.output).ok();
            return Ok(false);
        }

        let answer = answer.trim();
        Ok(answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes"))
    }
}

#[cfg(test)]
mod tests {
    use super::{FlagForm, LineConfirm};
    use crate::cli::ActivityFields;
    use activity_core::board::{ActivityForm, Confirm, ModalMode, ModalOutcome, ModalRequest};
    use activity_core::model::{
        Activity, ActivityDraft, ActivityPriority, ActivityStatus, ActivityType,
    };
    use std::io::Cursor;
    use time::macros::datetime;

    fn create_request() -> ModalRequest<'static> {
        ModalRequest {
            mode: ModalMode::Create,
            activity: None,
        }
    }

    fn existing() -> Activity {
        Activity::from_draft(
            "7".to_string(),
            ActivityDraft {
                title: "Incoming material inspection".to_string(),
                description: "coil delivery".to_string(),
                kind: ActivityType::QualityCheck,
                status: ActivityStatus::Pending,
                priority: ActivityPriority::Medium,
                assigned_to: vec!["3".to_string()],
                equipment_id: Some("2".to_string()),
                due_date: datetime!(2025-01-16 10:00 UTC),
                estimated_hours: 2.0,
                actual_hours: None,
                progress: 0,
            },
        )
    }

    #[test]
    fn create_builds_draft_with_defaults() {
        let mut form = FlagForm::new(ActivityFields {
            title: Some("Mold swap".to_string()),
            assigned_to: Some(vec!["1".to_string(), " ".to_string()]),
            due: Some("2025-02-01T08:00:00+01:00".to_string()),
            ..ActivityFields::default()
        });

        let ModalOutcome::Saved(draft) = form.present(create_request()).unwrap() else {
            panic!("expected a saved draft");
        };
        assert_eq!(draft.title, "Mold swap");
        assert_eq!(draft.kind, ActivityType::Production);
        assert_eq!(draft.status, ActivityStatus::Pending);
        assert_eq!(draft.priority, ActivityPriority::Medium);
        assert_eq!(draft.assigned_to, ["1"]);
        assert_eq!(draft.due_date, datetime!(2025-02-01 07:00 UTC));
    }

    #[test]
    fn create_reports_missing_fields() {
        let mut form = FlagForm::new(ActivityFields::default());
        let err = form.present(create_request()).unwrap_err();
        assert_eq!(err.message(), "title is required");

        let mut form = FlagForm::new(ActivityFields {
            title: Some("No one".to_string()),
            due: Some("2025-02-01T08:00:00Z".to_string()),
            ..ActivityFields::default()
        });
        let err = form.present(create_request()).unwrap_err();
        assert_eq!(err.message(), "at least one assignee is required");

        let mut form = FlagForm::new(ActivityFields {
            title: Some("Bad date".to_string()),
            assigned_to: Some(vec!["1".to_string()]),
            due: Some("next tuesday".to_string()),
            ..ActivityFields::default()
        });
        let err = form.present(create_request()).unwrap_err();
        assert_eq!(err.message(), "due date must be RFC3339");
    }

    #[test]
    fn edit_overlays_given_fields_only() {
        let activity = existing();
        let mut form = FlagForm::new(ActivityFields {
            status: Some("completed".to_string()),
            equipment_id: Some(String::new()),
            actual_hours: Some(2.5),
            ..ActivityFields::default()
        });

        let outcome = form
            .present(ModalRequest {
                mode: ModalMode::Edit,
                activity: Some(&activity),
            })
            .unwrap();

        let mut expected = activity.to_draft();
        expected.status = ActivityStatus::Completed;
        expected.equipment_id = None;
        expected.actual_hours = Some(2.5);
        assert_eq!(outcome, ModalOutcome::Saved(expected));
    }

    #[test]
    fn edit_can_clear_actual_hours() {
        let mut activity = existing();
        activity.actual_hours = Some(1.5);
        let mut form = FlagForm::new(ActivityFields {
            clear_actual: true,
            ..ActivityFields::default()
        });

        let outcome = form
            .present(ModalRequest {
                mode: ModalMode::Edit,
                activity: Some(&activity),
            })
            .unwrap();

        let mut expected = activity.to_draft();
        expected.actual_hours = None;
        assert_eq!(outcome, ModalOutcome::Saved(expected));
    }

    #[test]
    fn edit_without_flags_is_cancelled() {
        let activity = existing();
        let mut form = FlagForm::new(ActivityFields::default());
        let outcome = form
            .present(ModalRequest {
                mode: ModalMode::Edit,
                activity: Some(&activity),
            })
            .unwrap();
        assert_eq!(outcome, ModalOutcome::Cancelled);
    }

    #[test]
    fn edit_rejects_progress_over_hundred() {
        let activity = existing();
        let mut form = FlagForm::new(ActivityFields {
            progress: Some(101),
            ..ActivityFields::default()
        });
        let err = form
            .present(ModalRequest {
                mode: ModalMode::Edit,
                activity: Some(&activity),
            })
            .unwrap_err();
        assert_eq!(err.code(), "invalid_input");
    }

    #[test]
    fn confirm_reads_answer_line() {
        let mut input = Cursor::new("yes\n");
        let mut output = Vec::new();
        let answer = LineConfirm::new(&mut input, &mut output, false)
            .confirm("Delete?")
            .unwrap();
        assert!(answer);
        assert_eq!(String::from_utf8(output).unwrap(), "Delete? [y/N] ");

        let mut input = Cursor::new("n\n");
        assert!(!LineConfirm::new(&mut input, Vec::new(), false)
            .confirm("Delete?")
            .unwrap());
    }

    #[test]
    fn confirm_defaults_to_no_at_end_of_input() {
        let mut input = Cursor::new("");
        assert!(!LineConfirm::new(&mut input, Vec::new(), false)
            .confirm("Delete?")
            .unwrap());
    }

    #[test]
    fn assume_yes_skips_prompt() {
        let mut input = Cursor::new("");
        let mut output = Vec::new();
        assert!(LineConfirm::new(&mut input, &mut output, true)
            .confirm("Delete?")
            .unwrap());
        assert!(output.is_empty());
    }
}
