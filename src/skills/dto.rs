use serde::{Deserialize, Serialize};

use crate::skills::repo::Skill;

#[derive(Debug, Deserialize)]
pub struct UpdateSkillRequest {
    pub proficiency: String,
}

#[derive(Debug, Serialize)]
pub struct SkillListResponse {
    pub success: bool,
    pub skills: Vec<Skill>,
}

#[derive(Debug, Serialize)]
pub struct SkillResponse {
    pub success: bool,
    pub message: String,
    pub skill: Skill,
}

#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub success: bool,
    pub message: String,
}
