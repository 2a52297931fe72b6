//! Editable mirrors of the flat records, with the local checks run before
//! anything is submitted.

use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;
use thiserror::Error;

use crate::models::{EducationLevel, Employee, Role, SchoolSettings, Teacher};

#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("{field} is required")]
    Required { field: &'static str },

    #[error("'{value}' is not a valid email address")]
    InvalidEmail { value: String },

    #[error("invalid {field}: {message}")]
    InvalidValue {
        field: &'static str,
        message: String,
    },
}

pub trait Validate {
    fn validate(&self) -> Result<(), ValidationError>;
}

static EMAIL_RE: OnceLock<Option<Regex>> = OnceLock::new();

pub fn is_valid_email(value: &str) -> bool {
    EMAIL_RE
        .get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").ok())
        .as_ref()
        .map_or(false, |re| re.is_match(value.trim()))
}

fn require(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::Required { field })
    } else {
        Ok(())
    }
}

fn check_email(value: &str) -> Result<(), ValidationError> {
    if is_valid_email(value) {
        Ok(())
    } else {
        Err(ValidationError::InvalidEmail {
            value: value.trim().to_string(),
        })
    }
}

#[derive(Clone, Debug, Default, Serialize, PartialEq)]
pub struct EducationLevelForm {
    pub name: String,
    pub code: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_order: Option<i64>,
    pub is_active: bool,
}

impl Validate for EducationLevelForm {
    fn validate(&self) -> Result<(), ValidationError> {
        require("name", &self.name)?;
        require("code", &self.code)?;
        if let Some(order) = self.display_order {
            if order < 0 {
                return Err(ValidationError::InvalidValue {
                    field: "display_order",
                    message: "must not be negative".to_string(),
                });
            }
        }
        Ok(())
    }
}

impl From<&EducationLevel> for EducationLevelForm {
    fn from(level: &EducationLevel) -> Self {
        Self {
            name: level.name.clone(),
            code: level.code.clone(),
            description: level.description.clone(),
            display_order: Some(level.display_order),
            is_active: level.is_active,
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, PartialEq)]
pub struct RoleForm {
    pub name: String,
    pub description: String,
    pub permissions: Vec<String>,
    pub is_active: bool,
}

impl Validate for RoleForm {
    fn validate(&self) -> Result<(), ValidationError> {
        require("name", &self.name)
    }
}

impl From<&Role> for RoleForm {
    fn from(role: &Role) -> Self {
        Self {
            name: role.name.clone(),
            description: role.description.clone(),
            permissions: role.permissions.clone(),
            is_active: role.is_active,
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, PartialEq)]
pub struct TeacherForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub subject: String,
    pub qualification: String,
    pub status: String,
}

impl Validate for TeacherForm {
    fn validate(&self) -> Result<(), ValidationError> {
        require("first_name", &self.first_name)?;
        require("last_name", &self.last_name)?;
        require("email", &self.email)?;
        check_email(&self.email)
    }
}

impl From<&Teacher> for TeacherForm {
    fn from(t: &Teacher) -> Self {
        Self {
            first_name: t.first_name.clone(),
            last_name: t.last_name.clone(),
            email: t.email.clone(),
            phone: t.phone.clone(),
            subject: t.subject.clone(),
            qualification: t.qualification.clone(),
            status: t.status.clone(),
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, PartialEq)]
pub struct EmployeeForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub department: String,
    pub position: String,
    pub salary: f64,
    pub status: String,
}

impl Validate for EmployeeForm {
    fn validate(&self) -> Result<(), ValidationError> {
        require("first_name", &self.first_name)?;
        require("last_name", &self.last_name)?;
        require("email", &self.email)?;
        check_email(&self.email)?;
        require("department", &self.department)?;
        require("position", &self.position)?;
        if !self.salary.is_finite() || self.salary < 0.0 {
            return Err(ValidationError::InvalidValue {
                field: "salary",
                message: "must be a non-negative amount".to_string(),
            });
        }
        Ok(())
    }
}

impl From<&Employee> for EmployeeForm {
    fn from(e: &Employee) -> Self {
        Self {
            first_name: e.first_name.clone(),
            last_name: e.last_name.clone(),
            email: e.email.clone(),
            phone: e.phone.clone(),
            department: e.department.clone(),
            position: e.position.clone(),
            salary: e.salary,
            status: e.status.clone(),
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, PartialEq)]
pub struct SettingsForm {
    pub school_name: String,
    pub school_address: String,
    pub school_phone: String,
    pub school_email: String,
    pub currency: String,
    pub academic_year: String,
    pub current_term: String,
}

impl Validate for SettingsForm {
    fn validate(&self) -> Result<(), ValidationError> {
        require("school_name", &self.school_name)?;
        if !self.school_email.trim().is_empty() {
            check_email(&self.school_email)?;
        }
        Ok(())
    }
}

impl From<&SchoolSettings> for SettingsForm {
    fn from(s: &SchoolSettings) -> Self {
        Self {
            school_name: s.school_name.clone(),
            school_address: s.school_address.clone(),
            school_phone: s.school_phone.clone(),
            school_email: s.school_email.clone(),
            currency: s.currency.clone(),
            academic_year: s.academic_year.clone(),
            current_term: s.current_term.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_shape() {
        assert!(is_valid_email("head@school.ac.ke"));
        assert!(is_valid_email("  a@b.co "));
        assert!(!is_valid_email("head@school"));
        assert!(!is_valid_email("no at sign.com"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn teacher_requires_names_and_email() {
        let mut form = TeacherForm {
            first_name: "Ada".into(),
            ..Default::default()
        };
        assert_eq!(
            form.validate(),
            Err(ValidationError::Required { field: "last_name" })
        );
        form.last_name = "Lovelace".into();
        form.email = "ada".into();
        assert!(matches!(
            form.validate(),
            Err(ValidationError::InvalidEmail { .. })
        ));
        form.email = "ada@school.org".into();
        assert_eq!(form.validate(), Ok(()));
    }

    #[test]
    fn employee_salary_must_be_non_negative() {
        let form = EmployeeForm {
            first_name: "A".into(),
            last_name: "B".into(),
            email: "a@b.io".into(),
            department: "Admin".into(),
            position: "Clerk".into(),
            salary: -1.0,
            ..Default::default()
        };
        assert!(matches!(
            form.validate(),
            Err(ValidationError::InvalidValue { field: "salary", .. })
        ));
    }

    #[test]
    fn blank_whitespace_counts_as_missing() {
        let form = EducationLevelForm {
            name: "   ".into(),
            code: "PRI".into(),
            ..Default::default()
        };
        assert_eq!(form.validate(), Err(ValidationError::Required { field: "name" }));
    }

    #[test]
    fn settings_email_is_optional() {
        let form = SettingsForm {
            school_name: "Hillside".into(),
            ..Default::default()
        };
        assert!(form.validate().is_ok());
    }

    #[test]
    fn edit_form_is_seeded_from_record() {
        let level = EducationLevel {
            id: 3,
            name: "Secondary".into(),
            code: "SEC".into(),
            display_order: 2,
            is_active: true,
            ..Default::default()
        };
        let form = EducationLevelForm::from(&level);
        assert_eq!(form.display_order, Some(2));
        assert!(form.is_active);
    }
}
