//! Checks run before a form is submitted. Each returns the first problem
//! found as a [`ClientError::Validation`].

use crate::error::ClientError;
use crate::models::{CourseRequest, LoginRequest, Prerequisite};

pub const MIN_CREDITS: u32 = 1;
pub const MAX_CREDITS: u32 = 10;

fn invalid(message: impl Into<String>) -> ClientError {
    ClientError::Validation(message.into())
}

fn require(value: &str, field: &str) -> Result<(), ClientError> {
    if value.trim().is_empty() {
        return Err(invalid(format!("{} is required", field)));
    }
    Ok(())
}

pub fn validate_login(req: &LoginRequest) -> Result<(), ClientError> {
    require(&req.username, "Username")?;
    require(&req.password, "Password")
}

pub fn validate_email(email: &str) -> Result<(), ClientError> {
    require(email, "Email")?;
    let email = email.trim();
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    };
    if !valid {
        return Err(invalid("Please enter a valid email address"));
    }
    Ok(())
}

/// Fields every account type shares.
pub fn validate_account(
    username: &str,
    email: &str,
    password: &str,
    confirm_password: &str,
) -> Result<(), ClientError> {
    require(username, "Username")?;
    validate_email(email)?;
    require(password, "Password")?;
    if password != confirm_password {
        return Err(invalid("Passwords do not match"));
    }
    Ok(())
}

pub fn validate_person(first_name: &str, last_name: &str) -> Result<(), ClientError> {
    require(first_name, "First name")?;
    require(last_name, "Last name")
}

pub fn validate_year(year: &str) -> Result<u8, ClientError> {
    year.trim()
        .parse::<u8>()
        .ok()
        .filter(|y| (1..=6).contains(y))
        .ok_or_else(|| invalid("Year must be a number between 1 and 6"))
}

/// Splits a comma separated prerequisite field into codes.
pub fn parse_prerequisites(raw: &str) -> Vec<Prerequisite> {
    raw.split(',')
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .map(|code| Prerequisite {
            code: code.to_string(),
        })
        .collect()
}

/// Raw values of the course editor, as typed.
#[derive(Debug, Clone, Default)]
pub struct CourseForm {
    pub name: String,
    pub code: String,
    pub description: String,
    pub credits: String,
    pub department: String,
    pub max_enrollments: String,
    pub prerequisites: String,
}

impl CourseForm {
    pub fn validate(&self) -> Result<CourseRequest, ClientError> {
        let name = self.name.trim();
        let code = self.code.trim();
        let department = self.department.trim();
        if name.is_empty() || code.is_empty() || department.is_empty() {
            return Err(invalid("Name, Code, and Department are required fields"));
        }

        let credits = self
            .credits
            .trim()
            .parse::<u32>()
            .ok()
            .filter(|c| (MIN_CREDITS..=MAX_CREDITS).contains(c))
            .ok_or_else(|| invalid("Credits must be a number between 1 and 10"))?;

        let max_enrollments = self
            .max_enrollments
            .trim()
            .parse::<u32>()
            .ok()
            .filter(|m| *m >= 1)
            .ok_or_else(|| invalid("Max Enrollments must be a number greater than 0"))?;

        Ok(CourseRequest {
            name: name.to_string(),
            code: code.to_string(),
            description: self.description.trim().to_string(),
            credits,
            department: department.to_string(),
            max_enrollments,
            prerequisites: parse_prerequisites(&self.prerequisites),
        })
    }
}

pub fn validate_marks(raw: &str) -> Result<f64, ClientError> {
    if raw.trim().is_empty() {
        return Err(invalid("Please enter marks"));
    }
    let marks = raw
        .trim()
        .parse::<f64>()
        .map_err(|_| invalid("Marks must be a number"))?;
    if !marks.is_finite() || !(0.0..=100.0).contains(&marks) {
        return Err(invalid("Marks must be between 0 and 100"));
    }
    Ok(marks)
}
