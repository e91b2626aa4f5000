use serde::{Deserialize, Serialize};

use crate::timelines::repo::Timeline;

#[derive(Debug, Deserialize)]
pub struct AddTimelineRequest {
    pub title: String,
    pub description: String,
    pub from: String,
    pub to: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TimelineListResponse {
    pub success: bool,
    pub timelines: Vec<Timeline>,
}

#[derive(Debug, Serialize)]
pub struct TimelineResponse {
    pub success: bool,
    pub message: String,
    pub timeline: Timeline,
}

#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub success: bool,
    pub message: String,
}
