use std::sync::Arc;

use serde::de::IgnoredAny;
use tracing::info;

use crate::api::ApiClient;
use crate::error::ClientError;
use crate::models::{Course, Listing};
use crate::validation::CourseForm;

pub struct CourseService {
    api: Arc<ApiClient>,
}

impl CourseService {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    pub async fn list(&self) -> Result<Vec<Course>, ClientError> {
        let listing: Listing<Course> = self.api.get("/courses").await?;
        Ok(listing.into_items())
    }

    pub async fn get(&self, id: i64) -> Result<Course, ClientError> {
        self.api.get(&format!("/courses/{}", id)).await
    }

    pub async fn get_by_code(&self, code: &str) -> Result<Course, ClientError> {
        let code = code.trim();
        if code.is_empty() {
            return Err(ClientError::Validation("Course code is required".to_string()));
        }
        self.api.get(&format!("/courses/code/{}", code)).await
    }

    pub async fn create(&self, form: &CourseForm) -> Result<Course, ClientError> {
        let req = form.validate()?;
        let course: Course = self.api.post("/courses", &req).await?;
        info!("created course {} ({})", course.code, course.id);
        Ok(course)
    }

    pub async fn update(&self, id: i64, form: &CourseForm) -> Result<Course, ClientError> {
        let req = form.validate()?;
        let course: Course = self.api.put(&format!("/courses/{}", id), &req).await?;
        info!("updated course {} ({})", course.code, course.id);
        Ok(course)
    }

    pub async fn delete(&self, id: i64) -> Result<(), ClientError> {
        let _: IgnoredAny = self.api.delete(&format!("/courses/{}", id)).await?;
        info!("deleted course {}", id);
        Ok(())
    }
}
