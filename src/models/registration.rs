use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RegistrationStatus {
    Active,
    Inactive,
    Dropped,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseRegistration {
    pub id: i64,
    #[serde(default)]
    pub student_number: String,
    pub course_id: i64,
    pub course_code: String,
    #[serde(default)]
    pub course_title: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub credits: u32,
    pub status: RegistrationStatus,
    #[serde(default)]
    pub registered_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterCourseRequest {
    pub course_id: i64,
}
