use crate::models::{Role, UserProfile};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    Login,
    Register,
    Unauthorized,
    AdminDashboard,
    AdminCourses,
    AdminStudents,
    AdminResults,
    LecturerDashboard,
    LecturerCourses,
    LecturerGrading,
    StudentDashboard,
    StudentCourses,
    StudentEnrollment,
    StudentResults,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::Login => "/login",
            Route::Register => "/register",
            Route::Unauthorized => "/unauthorized",
            Route::AdminDashboard => "/admin/dashboard",
            Route::AdminCourses => "/admin/courses",
            Route::AdminStudents => "/admin/students",
            Route::AdminResults => "/admin/results",
            Route::LecturerDashboard => "/lecturer/dashboard",
            Route::LecturerCourses => "/lecturer/courses",
            Route::LecturerGrading => "/lecturer/grading",
            Route::StudentDashboard => "/student/dashboard",
            Route::StudentCourses => "/student/courses",
            Route::StudentEnrollment => "/student/enrollment",
            Route::StudentResults => "/student/results",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavLink {
    pub route: Route,
    pub label: &'static str,
}

const fn link(route: Route, label: &'static str) -> NavLink {
    NavLink { route, label }
}

/// Landing page for a signed-in user.
pub fn dashboard_route(role: Role) -> Route {
    match role {
        Role::Admin => Route::AdminDashboard,
        Role::Lecturer => Route::LecturerDashboard,
        Role::Student => Route::StudentDashboard,
        Role::Unknown => Route::Unauthorized,
    }
}

pub fn nav_links(user: Option<&UserProfile>) -> Vec<NavLink> {
    let Some(user) = user else {
        return vec![
            link(Route::Home, "Home"),
            link(Route::Login, "Sign In"),
            link(Route::Register, "Register"),
        ];
    };

    match user.role {
        Role::Admin => vec![
            link(Route::AdminDashboard, "Dashboard"),
            link(Route::AdminCourses, "Courses"),
            link(Route::AdminStudents, "Students"),
            link(Route::AdminResults, "Results"),
        ],
        Role::Lecturer => vec![
            link(Route::LecturerDashboard, "Dashboard"),
            link(Route::LecturerCourses, "My Courses"),
            link(Route::LecturerGrading, "Grading"),
        ],
        Role::Student => vec![
            link(Route::StudentDashboard, "Dashboard"),
            link(Route::StudentCourses, "My Courses"),
            link(Route::StudentEnrollment, "Enroll"),
            link(Route::StudentResults, "Results"),
        ],
        Role::Unknown => Vec::new(),
    }
}

/// Gate for a role-restricted screen. `Err` carries where to go instead.
pub fn authorize(user: Option<&UserProfile>, allowed: &[Role]) -> Result<(), Route> {
    match user {
        None => Err(Route::Login),
        Some(user) if allowed.contains(&user.role) => Ok(()),
        Some(_) => Err(Route::Unauthorized),
    }
}
