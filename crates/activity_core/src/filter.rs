use crate::error::AppError;
use crate::model::{Activity, ActivityPriority, ActivityStatus, ActivityType};
use std::str::FromStr;

/// The four criteria of the activity list. `None` (or an empty search)
/// leaves that criterion open.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivityFilter {
    pub search: String,
    pub status: Option<ActivityStatus>,
    pub kind: Option<ActivityType>,
    pub priority: Option<ActivityPriority>,
}

impl ActivityFilter {
    pub fn is_active(&self) -> bool {
        !self.search.is_empty()
            || self.status.is_some()
            || self.kind.is_some()
            || self.priority.is_some()
    }

    pub fn matches(&self, activity: &Activity) -> bool {
        matches_search(activity, &self.search)
            && self.status.is_none_or(|status| activity.status == status)
            && self.kind.is_none_or(|kind| activity.kind == kind)
            && self.priority.is_none_or(|priority| activity.priority == priority)
    }
}

fn matches_search(activity: &Activity, search: &str) -> bool {
    if search.is_empty() {
        return true;
    }

    let needle = search.to_lowercase();
    activity.title.to_lowercase().contains(&needle)
        || activity.description.to_lowercase().contains(&needle)
}

/// Returns the activities satisfying every criterion, in list order.
pub fn filter_activities<'a>(
    activities: &'a [Activity],
    filter: &ActivityFilter,
) -> Vec<&'a Activity> {
    activities
        .iter()
        .filter(|activity| filter.matches(activity))
        .collect()
}

/// Parses a filter choice where `""` and `all` clear the criterion.
pub fn parse_filter_value<T>(raw: &str) -> Result<Option<T>, AppError>
where
    T: FromStr<Err = AppError>,
{
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
        return Ok(None);
    }
    trimmed.parse().map(Some)
}
