pub mod accounts;
pub mod courses;
pub mod enrollment;
pub mod grading;

pub use accounts::{AccountService, AdminForm, LecturerForm, StudentForm};
pub use courses::CourseService;
pub use enrollment::{EnrollmentOverview, EnrollmentService};
pub use grading::GradingService;
