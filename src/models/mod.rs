pub mod course;
pub mod registration;
pub mod result;
pub mod user;

pub use course::{Course, CourseRequest, Listing, Page, Prerequisite};
pub use registration::{CourseRegistration, RegisterCourseRequest, RegistrationStatus};
pub use result::{
    compute_gpa, CourseResult, EnrolledStudent, Grade, GradeSubmission, ResultSummary,
};
pub use user::{
    AdminRegistrationRequest, AuthResponse, LecturerRegistrationRequest, LoginRequest,
    RefreshRequest, RefreshResponse, Role, StudentRegistrationRequest, UserProfile,
};
