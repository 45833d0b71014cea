//! Composed view model returned to the browser.

use serde::{Deserialize, Serialize};

use super::gitlab::{CommitSummary, Event, Group, Project, UserProfile};

/// A project enriched with its most recent commit. A project whose
/// repository is empty serializes without a `latest_commit` key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectView {
    #[serde(flatten)]
    pub project: Project,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_commit: Option<CommitSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupView {
    #[serde(flatten)]
    pub group: Group,
    pub projects: Vec<ProjectView>,
}

/// The complete per-request dashboard payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dashboard {
    pub user: UserProfile,
    pub events: Vec<Event>,
    pub groups: Vec<GroupView>,
}
