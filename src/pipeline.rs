//! Aggregation pipeline: one user credential in, one composed view model out.
//!
//! Fan-out shape: events and groups are fetched concurrently; every group's
//! project list is fetched in parallel across groups; within a group, the
//! per-project latest-commit fetches run in parallel once that group's
//! project list has arrived. Group order and per-group project order stay
//! exactly as the upstream returned them — `try_join_all` preserves input
//! order regardless of completion order.
//!
//! All-or-nothing: any single failing call anywhere aborts the whole
//! pipeline. There is no partial result and no per-item error isolation.

use futures::future::try_join_all;

use crate::errors::AppError;
use crate::models::gitlab::{Group, UserProfile};
use crate::models::view::{Dashboard, GroupView, ProjectView};
use crate::upstream::UpstreamClient;

pub async fn build_dashboard(
    client: &UpstreamClient,
    token: &str,
    user: UserProfile,
) -> Result<Dashboard, AppError> {
    let (events, groups) = tokio::try_join!(client.events(token), client.groups(token))?;

    let groups = try_join_all(
        groups
            .into_iter()
            .map(|group| enrich_group(client, token, group)),
    )
    .await?;

    tracing::debug!(
        user = %user.username,
        events = events.len(),
        groups = groups.len(),
        "dashboard composed"
    );

    Ok(Dashboard {
        user,
        events,
        groups,
    })
}

/// The project list must land before this group's commit fan-out starts;
/// the commit fetches themselves run concurrently.
async fn enrich_group(
    client: &UpstreamClient,
    token: &str,
    group: Group,
) -> Result<GroupView, AppError> {
    let projects = client.group_projects(token, group.id).await?;

    let projects = try_join_all(projects.into_iter().map(|project| async move {
        let latest_commit = client.latest_commit(token, project.id).await?;
        Ok::<_, AppError>(ProjectView {
            project,
            latest_commit,
        })
    }))
    .await?;

    Ok(GroupView { group, projects })
}
