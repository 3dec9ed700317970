use crate::error::AppError;
use crate::filter::{ActivityFilter, filter_activities};
use crate::model::{Activity, ActivityDraft, ActivityPriority, ActivityStatus, ActivityType};
use time::OffsetDateTime;
use tracing::debug;

pub const DELETE_PROMPT: &str = "Are you sure you want to delete this activity?";
pub const EMPTY_FILTERED_HINT: &str = "Try adjusting your search criteria";
pub const EMPTY_BOARD_HINT: &str = "Get started by creating your first activity";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalMode {
    Create,
    Edit,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModalState {
    pub is_open: bool,
    pub mode: ModalMode,
    pub selected: Option<Activity>,
}

impl Default for ModalState {
    fn default() -> Self {
        Self {
            is_open: false,
            mode: ModalMode::Create,
            selected: None,
        }
    }
}

/// What the form collaborator is shown when the modal opens.
#[derive(Debug, Clone, Copy)]
pub struct ModalRequest<'a> {
    pub mode: ModalMode,
    pub activity: Option<&'a Activity>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ModalOutcome {
    Saved(ActivityDraft),
    Cancelled,
}

/// The create/edit form. Validation of the submitted fields is its job.
pub trait ActivityForm {
    fn present(&mut self, request: ModalRequest<'_>) -> Result<ModalOutcome, AppError>;
}

/// Blocking yes/no prompt gating deletion.
pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> Result<bool, AppError>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SetSearch(String),
    SetStatusFilter(Option<ActivityStatus>),
    SetTypeFilter(Option<ActivityType>),
    SetPriorityFilter(Option<ActivityPriority>),
    ClearFilters,
    OpenCreate,
    OpenEdit(String),
    CloseModal,
    Save {
        draft: ActivityDraft,
        now: OffsetDateTime,
    },
    Delete {
        id: String,
        confirmed: bool,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Change {
    FiltersChanged,
    ModalOpened(ModalMode),
    ModalClosed,
    Created(Activity),
    Updated(Activity),
    Deleted(Activity),
    Unchanged,
}

/// Working list, filter criteria and modal state of the activities view.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActivityBoard {
    activities: Vec<Activity>,
    filter: ActivityFilter,
    modal: ModalState,
}

impl ActivityBoard {
    pub fn new(activities: Vec<Activity>) -> Self {
        Self {
            activities,
            ..Self::default()
        }
    }

    pub fn activities(&self) -> &[Activity] {
        &self.activities
    }

    pub fn filter(&self) -> &ActivityFilter {
        &self.filter
    }

    pub fn modal(&self) -> &ModalState {
        &self.modal
    }

    pub fn get(&self, id: &str) -> Option<&Activity> {
        self.activities.iter().find(|activity| activity.id == id)
    }

    pub fn visible(&self) -> Vec<&Activity> {
        filter_activities(&self.activities, &self.filter)
    }

    /// Hint shown in place of the list when nothing is visible.
    pub fn empty_state_hint(&self) -> Option<&'static str> {
        if !self.visible().is_empty() {
            return None;
        }
        if self.filter.is_active() {
            Some(EMPTY_FILTERED_HINT)
        } else {
            Some(EMPTY_BOARD_HINT)
        }
    }

    pub fn modal_request(&self) -> ModalRequest<'_> {
        ModalRequest {
            mode: self.modal.mode,
            activity: self.modal.selected.as_ref(),
        }
    }

    pub fn apply(&mut self, action: Action) -> Change {
        debug!(?action, "applying board action");
        match action {
            Action::SetSearch(search) => {
                self.filter.search = search;
                Change::FiltersChanged
            }
            Action::SetStatusFilter(status) => {
                self.filter.status = status;
                Change::FiltersChanged
            }
            Action::SetTypeFilter(kind) => {
                self.filter.kind = kind;
                Change::FiltersChanged
            }
            Action::SetPriorityFilter(priority) => {
                self.filter.priority = priority;
                Change::FiltersChanged
            }
            Action::ClearFilters => {
                self.filter = ActivityFilter::default();
                Change::FiltersChanged
            }
            Action::OpenCreate => {
                self.modal = ModalState {
                    is_open: true,
                    mode: ModalMode::Create,
                    selected: None,
                };
                Change::ModalOpened(ModalMode::Create)
            }
            Action::OpenEdit(id) => match self.get(&id).cloned() {
                Some(activity) => {
                    self.modal = ModalState {
                        is_open: true,
                        mode: ModalMode::Edit,
                        selected: Some(activity),
                    };
                    Change::ModalOpened(ModalMode::Edit)
                }
                None => Change::Unchanged,
            },
            Action::CloseModal => {
                self.modal.is_open = false;
                self.modal.selected = None;
                Change::ModalClosed
            }
            Action::Save { draft, now } => {
                if !self.modal.is_open {
                    return Change::Unchanged;
                }
                let change = self.save(draft, now);
                self.modal.is_open = false;
                self.modal.selected = None;
                change
            }
            Action::Delete { id, confirmed } => {
                if !confirmed {
                    return Change::Unchanged;
                }
                match self.activities.iter().position(|activity| activity.id == id) {
                    Some(index) => Change::Deleted(self.activities.remove(index)),
                    None => Change::Unchanged,
                }
            }
        }
    }

    fn save(&mut self, draft: ActivityDraft, now: OffsetDateTime) -> Change {
        match self.modal.mode {
            ModalMode::Create => {
                let activity = Activity::from_draft(self.next_id(now), draft);
                self.activities.push(activity.clone());
                Change::Created(activity)
            }
            ModalMode::Edit => {
                let Some(selected_id) = self.modal.selected.as_ref().map(|a| a.id.clone()) else {
                    return Change::Unchanged;
                };
                match self
                    .activities
                    .iter_mut()
                    .find(|activity| activity.id == selected_id)
                {
                    Some(activity) => {
                        activity.apply_draft(draft);
                        Change::Updated(activity.clone())
                    }
                    None => Change::Unchanged,
                }
            }
        }
    }

    /// Millisecond timestamp of `now`, bumped past any id already taken.
    fn next_id(&self, now: OffsetDateTime) -> String {
        let mut candidate = now.unix_timestamp_nanos() / 1_000_000;
        loop {
            let id = candidate.to_string();
            if self.get(&id).is_none() {
                return id;
            }
            candidate += 1;
        }
    }

    pub fn create_activity(
        &mut self,
        form: &mut dyn ActivityForm,
        now: OffsetDateTime,
    ) -> Result<Change, AppError> {
        self.apply(Action::OpenCreate);
        self.run_modal(form, now)
    }

    pub fn edit_activity(
        &mut self,
        id: &str,
        form: &mut dyn ActivityForm,
        now: OffsetDateTime,
    ) -> Result<Change, AppError> {
        if self.apply(Action::OpenEdit(id.to_string())) == Change::Unchanged {
            return Err(AppError::activity_not_found(id));
        }
        self.run_modal(form, now)
    }

    fn run_modal(
        &mut self,
        form: &mut dyn ActivityForm,
        now: OffsetDateTime,
    ) -> Result<Change, AppError> {
        let outcome = match form.present(self.modal_request()) {
            Ok(outcome) => outcome,
            Err(err) => {
                self.apply(Action::CloseModal);
                return Err(err);
            }
        };

        Ok(match outcome {
            ModalOutcome::Saved(draft) => self.apply(Action::Save { draft, now }),
            ModalOutcome::Cancelled => self.apply(Action::CloseModal),
        })
    }

    pub fn delete_activity(
        &mut self,
        id: &str,
        confirm: &mut dyn Confirm,
    ) -> Result<Change, AppError> {
        if self.get(id).is_none() {
            return Err(AppError::activity_not_found(id));
        }
        let confirmed = confirm.confirm(DELETE_PROMPT)?;
        Ok(self.apply(Action::Delete {
            id: id.to_string(),
            confirmed,
        }))
    }
}
