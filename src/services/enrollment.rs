use std::collections::HashMap;
use std::sync::Arc;

use futures::future::join_all;
use serde::de::IgnoredAny;
use tracing::{info, warn};

use crate::api::ApiClient;
use crate::error::ClientError;
use crate::models::{
    Course, CourseRegistration, Listing, Page, RegisterCourseRequest, RegistrationStatus,
};

pub const DEFAULT_PAGE_SIZE: u32 = 20;

pub struct EnrollmentService {
    api: Arc<ApiClient>,
}

impl EnrollmentService {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    pub async fn available(&self) -> Result<Vec<Course>, ClientError> {
        let listing: Listing<Course> = self
            .api
            .get("/students/courses/enrollment/available")
            .await?;
        Ok(listing.into_items())
    }

    pub async fn register(&self, course_id: i64) -> Result<CourseRegistration, ClientError> {
        let registration: CourseRegistration = self
            .api
            .post(
                "/students/course-registrations/register",
                &RegisterCourseRequest { course_id },
            )
            .await?;
        info!("registered for course {}", course_id);
        Ok(registration)
    }

    pub async fn my_courses(&self) -> Result<Vec<CourseRegistration>, ClientError> {
        let listing: Listing<CourseRegistration> = self
            .api
            .get("/students/course-registrations/my-courses")
            .await?;
        Ok(listing.into_items())
    }

    pub async fn is_registered(&self, course_id: i64) -> Result<bool, ClientError> {
        self.api
            .get(&format!("/students/course-registrations/check/{}", course_id))
            .await
    }

    pub async fn unregister(&self, course_id: i64) -> Result<(), ClientError> {
        let _: IgnoredAny = self
            .api
            .delete(&format!(
                "/students/course-registrations/unregister/{}",
                course_id
            ))
            .await?;
        info!("unregistered from course {}", course_id);
        Ok(())
    }

    pub async fn for_student(
        &self,
        student_number: &str,
    ) -> Result<Vec<CourseRegistration>, ClientError> {
        let listing: Listing<CourseRegistration> = self
            .api
            .get(&format!(
                "/students/course-registrations/student/{}",
                student_number.trim()
            ))
            .await?;
        Ok(listing.into_items())
    }

    pub async fn for_course(&self, course_id: i64) -> Result<Vec<CourseRegistration>, ClientError> {
        let listing: Listing<CourseRegistration> = self
            .api
            .get(&format!("/students/course-registrations/course/{}", course_id))
            .await?;
        Ok(listing.into_items())
    }

    pub async fn all(&self, page: u32, size: u32) -> Result<Page<CourseRegistration>, ClientError> {
        let size = if size == 0 { DEFAULT_PAGE_SIZE } else { size };
        let listing: Listing<CourseRegistration> = self
            .api
            .get(&format!(
                "/students/course-registrations?page={}&size={}",
                page, size
            ))
            .await?;
        Ok(listing.into_page())
    }

    /// Loads what the enrollment screen shows. Available and registered
    /// courses are fetched together, then every available course's status is
    /// checked concurrently. A failed status check reads as not registered.
    pub async fn overview(&self) -> Result<EnrollmentOverview, ClientError> {
        let (available, registered) = tokio::try_join!(self.available(), self.my_courses())?;

        let checks = available.iter().map(|course| async move {
            match self.is_registered(course.id).await {
                Ok(registered) => (course.id, registered),
                Err(e) => {
                    warn!("status check for course {} failed: {}", course.id, e);
                    (course.id, false)
                }
            }
        });
        let registration_status = join_all(checks).await.into_iter().collect();

        Ok(EnrollmentOverview {
            available,
            registered,
            registration_status,
        })
    }
}

/// A student's enrollment screen state.
#[derive(Debug, Clone, Default)]
pub struct EnrollmentOverview {
    pub available: Vec<Course>,
    pub registered: Vec<CourseRegistration>,
    pub registration_status: HashMap<i64, bool>,
}

impl EnrollmentOverview {
    pub fn is_registered(&self, course_id: i64) -> bool {
        self.registration_status
            .get(&course_id)
            .copied()
            .unwrap_or_else(|| {
                self.registered
                    .iter()
                    .any(|r| r.course_id == course_id && r.status == RegistrationStatus::Active)
            })
    }

    pub async fn register(
        &mut self,
        service: &EnrollmentService,
        course_id: i64,
    ) -> Result<(), ClientError> {
        let registration = service.register(course_id).await?;
        self.registered.retain(|r| r.course_id != course_id);
        self.registered.push(registration);
        self.registration_status.insert(course_id, true);
        Ok(())
    }

    /// Drops a course. Local state is only touched once the server agrees.
    pub async fn unregister(
        &mut self,
        service: &EnrollmentService,
        course_id: i64,
    ) -> Result<(), ClientError> {
        service.unregister(course_id).await?;
        self.registered.retain(|r| r.course_id != course_id);
        if self.registration_status.contains_key(&course_id) {
            self.registration_status.insert(course_id, false);
        }
        Ok(())
    }
}
