use serde::Serialize;

use crate::applications::repo::SoftwareApplication;

#[derive(Debug, Serialize)]
pub struct ApplicationListResponse {
    pub success: bool,
    pub applications: Vec<SoftwareApplication>,
}

#[derive(Debug, Serialize)]
pub struct ApplicationResponse {
    pub success: bool,
    pub message: String,
    pub application: SoftwareApplication,
}

#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub success: bool,
    pub message: String,
}
