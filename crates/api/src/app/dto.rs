//! Request/response DTOs.

use serde::Deserialize;

use taskhub_auth::{ProjectRole, SystemRole};
use taskhub_projects::WorkItemStatus;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateAccountRequest {
    pub email: String,
    pub display_name: String,
    pub password: String,
    pub role: SystemRole,
}

#[derive(Debug, Deserialize)]
pub struct CreateProjectRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateWorkItemRequest {
    pub title: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateWorkItemRequest {
    pub title: Option<String>,
    pub status: Option<WorkItemStatus>,
}

#[derive(Debug, Deserialize)]
pub struct AssignMemberRequest {
    pub role: ProjectRole,
}
