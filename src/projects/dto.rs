use serde::Serialize;

use crate::projects::repo::Project;

#[derive(Debug, Serialize)]
pub struct ProjectListResponse {
    pub success: bool,
    pub projects: Vec<Project>,
}

#[derive(Debug, Serialize)]
pub struct ProjectResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub project: Project,
}

#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub success: bool,
    pub message: String,
}
