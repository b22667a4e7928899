//! Dashboard aggregation.
//!
//! Independent reads are issued concurrently and composed; there is no
//! snapshot across them, so counts may reflect slightly different moments.

use std::collections::{BTreeSet, HashMap};

use serde::Serialize;
use uuid::Uuid;

use super::projects::compose_details;
use super::{ServiceError, ServiceResult};
use crate::models::activity::ActivityView;
use crate::models::project::ProjectDetail;
use crate::store::Store;

/// Projects shown under "recent projects"
pub const RECENT_PROJECTS: usize = 3;

/// Entries shown under "recent activity"
pub const RECENT_ACTIVITY: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub active_projects: i64,
    pub completed_tasks: i64,
    pub team_members: usize,
    pub pending_reviews: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub stats: DashboardStats,
    pub recent_projects: Vec<ProjectDetail>,
    pub recent_activity: Vec<ActivityView>,
}

pub async fn dashboard(store: &dyn Store, user_id: Uuid) -> ServiceResult<Dashboard> {
    let (active_projects, completed_tasks, pending_reviews, projects, recent) = tokio::try_join!(
        store.count_active_projects_for_user(user_id),
        store.count_completed_tasks_for_user(user_id),
        store.count_pending_reviews_for_reviewer(user_id),
        store.list_projects_for_user(user_id),
        store.recent_projects_for_user(user_id, RECENT_PROJECTS),
    )?;

    let team: BTreeSet<Uuid> = projects.iter().flat_map(|p| p.participants()).collect();

    let mut actors: Vec<Uuid> = team.iter().copied().collect();
    if !team.contains(&user_id) {
        actors.push(user_id);
    }

    let (recent_projects, activities) = tokio::try_join!(
        compose_details(store, recent),
        async {
            store
                .recent_activity(&actors, RECENT_ACTIVITY)
                .await
                .map_err(ServiceError::from)
        },
    )?;

    let actor_ids: Vec<Uuid> = activities.iter().map(|a| a.user_id).collect();
    let names: HashMap<Uuid, String> = store
        .find_users_by_ids(&actor_ids)
        .await?
        .into_iter()
        .map(|u| (u.id, u.name))
        .collect();

    let recent_activity = activities
        .into_iter()
        .map(|activity| {
            let name = names.get(&activity.user_id).cloned().unwrap_or_default();
            ActivityView::compose(activity, name)
        })
        .collect();

    Ok(Dashboard {
        stats: DashboardStats {
            active_projects,
            completed_tasks,
            team_members: team.len(),
            pending_reviews,
        },
        recent_projects,
        recent_activity,
    })
}
