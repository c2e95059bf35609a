use std::sync::Arc;

use serde::de::IgnoredAny;
use tracing::info;

use crate::api::ApiClient;
use crate::error::ClientError;
use crate::models::{Course, CourseResult, EnrolledStudent, GradeSubmission, Listing};
use crate::validation::validate_marks;

pub struct GradingService {
    api: Arc<ApiClient>,
}

impl GradingService {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    pub async fn gradable_courses(&self) -> Result<Vec<Course>, ClientError> {
        let listing: Listing<Course> = self.api.get("/lecturers/grading/courses").await?;
        Ok(listing.into_items())
    }

    pub async fn enrolled_students(
        &self,
        course_id: i64,
    ) -> Result<Vec<EnrolledStudent>, ClientError> {
        let listing: Listing<EnrolledStudent> = self
            .api
            .get(&format!("/lecturers/grading/courses/{}/students", course_id))
            .await?;
        Ok(listing.into_items())
    }

    /// Grades one student. `marks` is the raw field value and is checked
    /// against 0..=100 before anything is sent.
    pub async fn submit_grade(
        &self,
        course_id: i64,
        student_id: i64,
        marks: &str,
        remarks: &str,
    ) -> Result<(), ClientError> {
        let submission = GradeSubmission {
            student_id,
            course_id,
            marks: validate_marks(marks)?,
            remarks: remarks.trim().to_string(),
        };
        let _: IgnoredAny = self
            .api
            .post("/lecturers/grading/submit-grade", &submission)
            .await?;
        info!(
            "graded student {} in course {} with {}",
            student_id, course_id, submission.marks
        );
        Ok(())
    }

    pub async fn course_results(&self, course_id: i64) -> Result<Vec<CourseResult>, ClientError> {
        let listing: Listing<CourseResult> = self
            .api
            .get(&format!("/lecturers/grading/courses/{}/results", course_id))
            .await?;
        Ok(listing.into_items())
    }

    pub async fn release_results(&self, course_id: i64) -> Result<(), ClientError> {
        let _: IgnoredAny = self
            .api
            .post_empty(&format!(
                "/lecturers/grading/courses/{}/release-results",
                course_id
            ))
            .await?;
        info!("released results for course {}", course_id);
        Ok(())
    }

    pub async fn my_results(&self) -> Result<Vec<CourseResult>, ClientError> {
        let listing: Listing<CourseResult> = self.api.get("/students/results/my-results").await?;
        Ok(listing.into_items())
    }

    pub async fn student_results(
        &self,
        student_number: &str,
    ) -> Result<Vec<CourseResult>, ClientError> {
        let student_number = student_number.trim();
        if student_number.is_empty() {
            return Err(ClientError::Validation("Student number is required".to_string()));
        }
        let listing: Listing<CourseResult> = self
            .api
            .get(&format!("/students/results/student/{}", student_number))
            .await?;
        Ok(listing.into_items())
    }
}
