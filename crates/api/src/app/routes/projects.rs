use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use chrono::Utc;

use taskhub_auth::ProjectAction;
use taskhub_core::{AccountId, ProjectId, WorkItemId};
use taskhub_projects::{Project, WorkItem};

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::authz;
use crate::context::SessionContext;

pub fn router() -> Router {
    // Full paths (merged at the top level rather than nested): axum's `nest`
    // strips the prefix in a way that leaves the collection root reachable only
    // at `/projects`, never the `/projects/` the API serves.
    Router::new()
        .route("/projects/", get(list_projects).post(create_project))
        .route("/projects/:id", get(get_project).delete(delete_project))
        .route(
            "/projects/:id/items",
            get(list_work_items).post(create_work_item),
        )
        .route(
            "/projects/:id/items/:item_id",
            axum::routing::patch(update_work_item).delete(delete_work_item),
        )
        .route(
            "/projects/:id/members/:account_id",
            axum::routing::put(assign_member),
        )
}

// ─────────────────────────────────────────────────────────────────────────────
// Projects
// ─────────────────────────────────────────────────────────────────────────────

pub async fn list_projects(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
) -> axum::response::Response {
    if let Err(denied) =
        authz::require_capability(&services.resolver, &session, |caps| caps.can_access_projects)
    {
        return denied;
    }

    let projects: Vec<Project> = if services
        .resolver
        .has_role_or_higher(session.role(), taskhub_auth::SystemRole::Admin)
    {
        services.projects.list_projects()
    } else {
        let mut member_of = services.memberships.projects_for(session.account_id());
        member_of.sort_by_key(|p| p.to_string());
        member_of
            .into_iter()
            .filter_map(|id| services.projects.get_project(id))
            .collect()
    };

    (StatusCode::OK, Json(serde_json::json!({ "projects": projects }))).into_response()
}

pub async fn create_project(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
    Json(body): Json<dto::CreateProjectRequest>,
) -> axum::response::Response {
    if let Err(denied) =
        authz::require_capability(&services.resolver, &session, |caps| caps.can_create_projects)
    {
        return denied;
    }

    let project = match Project::new(
        ProjectId::new(),
        &body.name,
        &body.description,
        session.account_id(),
        Utc::now(),
    ) {
        Ok(project) => project,
        Err(e) => return errors::domain_error_to_response(&e),
    };

    services.projects.insert_project(project.clone());
    // The creator owns the project regardless of their system role.
    services.memberships.assign(
        session.account_id(),
        project.id,
        taskhub_auth::ProjectRole::Owner,
    );

    (StatusCode::CREATED, Json(project)).into_response()
}

pub async fn get_project(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let project_id: ProjectId = match id.parse() {
        Ok(id) => id,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid project id");
        }
    };

    match services
        .resolver
        .can_access_project(session.role(), session.account_id(), project_id)
        .await
    {
        Ok(true) => {}
        Ok(false) => {
            return errors::json_error(StatusCode::FORBIDDEN, "forbidden", "not a project member");
        }
        Err(e) => return errors::internal_error(e),
    }

    match services.projects.get_project(project_id) {
        Some(project) => (StatusCode::OK, Json(project)).into_response(),
        None => errors::json_error(StatusCode::NOT_FOUND, "not_found", "project not found"),
    }
}

pub async fn delete_project(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(denied) =
        authz::require_capability(&services.resolver, &session, |caps| caps.can_delete_projects)
    {
        return denied;
    }

    let project_id: ProjectId = match id.parse() {
        Ok(id) => id,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid project id");
        }
    };

    if !services.projects.remove_project(project_id) {
        return errors::json_error(StatusCode::NOT_FOUND, "not_found", "project not found");
    }
    services.memberships.clear_project(project_id);

    StatusCode::NO_CONTENT.into_response()
}

// ─────────────────────────────────────────────────────────────────────────────
// Work Items
// ─────────────────────────────────────────────────────────────────────────────

pub async fn list_work_items(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let project_id: ProjectId = match id.parse() {
        Ok(id) => id,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid project id");
        }
    };

    match services
        .resolver
        .can_access_project(session.role(), session.account_id(), project_id)
        .await
    {
        Ok(true) => {}
        Ok(false) => {
            return errors::json_error(StatusCode::FORBIDDEN, "forbidden", "not a project member");
        }
        Err(e) => return errors::internal_error(e),
    }

    if services.projects.get_project(project_id).is_none() {
        return errors::json_error(StatusCode::NOT_FOUND, "not_found", "project not found");
    }

    let items = services.projects.list_work_items(project_id);
    (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
}

pub async fn create_work_item(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
    Path(id): Path<String>,
    Json(body): Json<dto::CreateWorkItemRequest>,
) -> axum::response::Response {
    let project_id: ProjectId = match id.parse() {
        Ok(id) => id,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid project id");
        }
    };

    if services.projects.get_project(project_id).is_none() {
        return errors::json_error(StatusCode::NOT_FOUND, "not_found", "project not found");
    }

    match services
        .resolver
        .can_perform_project_action(
            session.role(),
            session.account_id(),
            project_id,
            ProjectAction::CreateWorkItem,
        )
        .await
    {
        Ok(true) => {}
        Ok(false) => {
            return errors::json_error(StatusCode::FORBIDDEN, "forbidden", "insufficient project role");
        }
        Err(e) => return errors::internal_error(e),
    }

    let item = match WorkItem::new(
        WorkItemId::new(),
        project_id,
        &body.title,
        session.account_id(),
        Utc::now(),
    ) {
        Ok(item) => item,
        Err(e) => return errors::domain_error_to_response(&e),
    };

    services.projects.insert_work_item(item.clone());
    (StatusCode::CREATED, Json(item)).into_response()
}

pub async fn update_work_item(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
    Path((id, item_id)): Path<(String, String)>,
    Json(body): Json<dto::UpdateWorkItemRequest>,
) -> axum::response::Response {
    let (project_id, item_id) = match parse_item_path(&id, &item_id) {
        Ok(ids) => ids,
        Err(response) => return response,
    };

    match services
        .resolver
        .can_perform_project_action(
            session.role(),
            session.account_id(),
            project_id,
            ProjectAction::UpdateWorkItem,
        )
        .await
    {
        Ok(true) => {}
        Ok(false) => {
            return errors::json_error(StatusCode::FORBIDDEN, "forbidden", "insufficient project role");
        }
        Err(e) => return errors::internal_error(e),
    }

    let Some(mut item) = services.projects.get_work_item(item_id) else {
        return errors::json_error(StatusCode::NOT_FOUND, "not_found", "work item not found");
    };
    if item.project_id != project_id {
        return errors::json_error(StatusCode::NOT_FOUND, "not_found", "work item not found");
    }

    let now = Utc::now();
    if let Some(title) = &body.title {
        if let Err(e) = item.rename(title, now) {
            return errors::domain_error_to_response(&e);
        }
    }
    if let Some(status) = body.status {
        item.set_status(status, now);
    }

    let updated = services
        .projects
        .update_work_item(item_id, |stored| *stored = item.clone());
    match updated {
        Some(updated) => (StatusCode::OK, Json(updated)).into_response(),
        None => errors::json_error(StatusCode::NOT_FOUND, "not_found", "work item not found"),
    }
}

pub async fn delete_work_item(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
    Path((id, item_id)): Path<(String, String)>,
) -> axum::response::Response {
    let (project_id, item_id) = match parse_item_path(&id, &item_id) {
        Ok(ids) => ids,
        Err(response) => return response,
    };

    match services
        .resolver
        .can_perform_project_action(
            session.role(),
            session.account_id(),
            project_id,
            ProjectAction::DeleteWorkItem,
        )
        .await
    {
        Ok(true) => {}
        Ok(false) => {
            return errors::json_error(StatusCode::FORBIDDEN, "forbidden", "insufficient project role");
        }
        Err(e) => return errors::internal_error(e),
    }

    match services.projects.get_work_item(item_id) {
        Some(item) if item.project_id == project_id => {}
        _ => return errors::json_error(StatusCode::NOT_FOUND, "not_found", "work item not found"),
    }

    services.projects.remove_work_item(item_id);
    StatusCode::NO_CONTENT.into_response()
}

// ─────────────────────────────────────────────────────────────────────────────
// Members
// ─────────────────────────────────────────────────────────────────────────────

pub async fn assign_member(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
    Path((id, account_id)): Path<(String, String)>,
    Json(body): Json<dto::AssignMemberRequest>,
) -> axum::response::Response {
    let project_id: ProjectId = match id.parse() {
        Ok(id) => id,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid project id");
        }
    };
    let target: AccountId = match account_id.parse() {
        Ok(id) => id,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid account id");
        }
    };

    if services.projects.get_project(project_id).is_none() {
        return errors::json_error(StatusCode::NOT_FOUND, "not_found", "project not found");
    }

    match services
        .resolver
        .can_perform_project_action(
            session.role(),
            session.account_id(),
            project_id,
            ProjectAction::AssignRoles,
        )
        .await
    {
        Ok(true) => {}
        Ok(false) => {
            return errors::json_error(StatusCode::FORBIDDEN, "forbidden", "insufficient project role");
        }
        Err(e) => return errors::internal_error(e),
    }

    services.memberships.assign(target, project_id, body.role);
    StatusCode::NO_CONTENT.into_response()
}

fn parse_item_path(
    id: &str,
    item_id: &str,
) -> Result<(ProjectId, WorkItemId), axum::response::Response> {
    let project_id: ProjectId = id.parse().map_err(|_| {
        errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid project id")
    })?;
    let item_id: WorkItemId = item_id.parse().map_err(|_| {
        errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid work item id")
    })?;
    Ok((project_id, item_id))
}
