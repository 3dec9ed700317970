mod activity;
mod directory;

pub use activity::{Activity, ActivityDraft, ActivityPriority, ActivityStatus, ActivityType};
pub use directory::{Employee, Equipment};
