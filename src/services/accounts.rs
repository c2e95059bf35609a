use std::sync::Arc;

use serde::de::IgnoredAny;
use tracing::info;

use crate::api::ApiClient;
use crate::error::ClientError;
use crate::models::{
    AdminRegistrationRequest, LecturerRegistrationRequest, StudentRegistrationRequest,
};
use crate::validation::{validate_account, validate_person, validate_year};

#[derive(Debug, Clone, Default)]
pub struct StudentForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub index_no: String,
    pub first_name: String,
    pub last_name: String,
    pub program: String,
    pub year: String,
}

impl StudentForm {
    pub fn validate(&self) -> Result<StudentRegistrationRequest, ClientError> {
        validate_account(&self.username, &self.email, &self.password, &self.confirm_password)?;
        if self.index_no.trim().is_empty() {
            return Err(ClientError::Validation("Index number is required".to_string()));
        }
        validate_person(&self.first_name, &self.last_name)?;
        if self.program.trim().is_empty() {
            return Err(ClientError::Validation("Program is required".to_string()));
        }
        let year = validate_year(&self.year)?;

        Ok(StudentRegistrationRequest {
            username: self.username.trim().to_string(),
            email: self.email.trim().to_string(),
            password: self.password.clone(),
            index_no: self.index_no.trim().to_string(),
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            program: self.program.trim().to_string(),
            year,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct LecturerForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub staff_no: String,
    pub first_name: String,
    pub last_name: String,
    pub department: String,
    pub secret_key: String,
}

impl LecturerForm {
    pub fn validate(&self) -> Result<LecturerRegistrationRequest, ClientError> {
        validate_account(&self.username, &self.email, &self.password, &self.confirm_password)?;
        if self.staff_no.trim().is_empty() {
            return Err(ClientError::Validation("Staff number is required".to_string()));
        }
        validate_person(&self.first_name, &self.last_name)?;
        if self.department.trim().is_empty() {
            return Err(ClientError::Validation("Department is required".to_string()));
        }
        if self.secret_key.is_empty() {
            return Err(ClientError::Validation("Lecturer secret key is required".to_string()));
        }

        Ok(LecturerRegistrationRequest {
            username: self.username.trim().to_string(),
            email: self.email.trim().to_string(),
            password: self.password.clone(),
            staff_no: self.staff_no.trim().to_string(),
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            department: self.department.trim().to_string(),
            lecturer_secret_key: self.secret_key.clone(),
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct AdminForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub admin_key: String,
}

impl AdminForm {
    pub fn validate(&self) -> Result<AdminRegistrationRequest, ClientError> {
        validate_account(&self.username, &self.email, &self.password, &self.confirm_password)?;
        if self.admin_key.is_empty() {
            return Err(ClientError::Validation("Admin key is required".to_string()));
        }

        Ok(AdminRegistrationRequest {
            username: self.username.trim().to_string(),
            email: self.email.trim().to_string(),
            password: self.password.clone(),
            admin_key: self.admin_key.clone(),
        })
    }
}

/// Account creation. New accounts must sign in afterwards; registering
/// never creates a session.
pub struct AccountService {
    api: Arc<ApiClient>,
}

impl AccountService {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    pub async fn register_student(&self, form: &StudentForm) -> Result<(), ClientError> {
        let req = form.validate()?;
        let _: IgnoredAny = self.api.post("/auth/register", &req).await?;
        info!("registered student account {}", req.username);
        Ok(())
    }

    pub async fn register_lecturer(&self, form: &LecturerForm) -> Result<(), ClientError> {
        let req = form.validate()?;
        let _: IgnoredAny = self.api.post("/auth/register/lecturer", &req).await?;
        info!("registered lecturer account {}", req.username);
        Ok(())
    }

    pub async fn register_admin(&self, form: &AdminForm) -> Result<(), ClientError> {
        let req = form.validate()?;
        let _: IgnoredAny = self.api.post("/auth/register/admin", &req).await?;
        info!("registered admin account {}", req.username);
        Ok(())
    }
}
