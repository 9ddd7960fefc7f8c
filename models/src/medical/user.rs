// models/src/medical/user.rs
//! Users of the system: one tagged union over the four roles.
//!
//! Role specific data is reached through the `as_*` accessors, which return
//! `None` for any other role.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::entity::Entity;
use crate::errors::{EntityKind, ValidationError, ValidationResult};
use crate::medical::doctor::Doctor;
use crate::medical::patient::Patient;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Patient,
    Doctor,
    Pharmacist,
    Administrator,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Patient => "Patient",
            Role::Doctor => "Doctor",
            Role::Pharmacist => "Pharmacist",
            Role::Administrator => "Administrator",
        }
    }

    /// Prefix for identifiers generated for new users of this role.
    pub fn id_prefix(&self) -> &'static str {
        match self {
            Role::Patient => "P",
            Role::Doctor => "D",
            Role::Pharmacist => "PH",
            Role::Administrator => "A",
        }
    }

    pub fn is_staff(&self) -> bool {
        !matches!(self, Role::Patient)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "patient" => Ok(Role::Patient),
            "doctor" => Ok(Role::Doctor),
            "pharmacist" => Ok(Role::Pharmacist),
            "administrator" | "admin" => Ok(Role::Administrator),
            _ => Err(ValidationError::unknown_variant("role", s)),
        }
    }
}

/// Fields every user carries regardless of role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub user_id: String,
    pub password: String,
    pub name: String,
    pub gender: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl Account {
    pub fn new(user_id: &str, password: &str, name: &str, gender: &str) -> Self {
        Account {
            user_id: user_id.to_string(),
            password: password.to_string(),
            name: name.to_string(),
            gender: gender.to_string(),
            email: None,
            phone: None,
        }
    }

    /// Replaces whichever contact fields are given. Nothing changes unless
    /// every given field is valid.
    pub fn update_contact(&mut self, email: Option<&str>, phone: Option<&str>) -> ValidationResult<()> {
        let email = email.map(validate_email).transpose()?;
        let phone = phone.map(|p| non_empty("phone", p)).transpose()?;
        if let Some(email) = email {
            self.email = Some(email);
        }
        if let Some(phone) = phone {
            self.phone = Some(phone);
        }
        Ok(())
    }
}

pub fn non_empty(field: &str, value: &str) -> ValidationResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ValidationError::EmptyField(field.to_string()))
    } else {
        Ok(trimmed.to_string())
    }
}

fn validate_email(value: &str) -> ValidationResult<String> {
    let email = non_empty("email", value)?;
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(email),
        _ => Err(ValidationError::InvalidEmail(email)),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pharmacist {
    pub account: Account,
    pub age: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Administrator {
    pub account: Account,
    pub age: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum User {
    Patient(Patient),
    Doctor(Doctor),
    Pharmacist(Pharmacist),
    Administrator(Administrator),
}

impl User {
    pub fn role(&self) -> Role {
        match self {
            User::Patient(_) => Role::Patient,
            User::Doctor(_) => Role::Doctor,
            User::Pharmacist(_) => Role::Pharmacist,
            User::Administrator(_) => Role::Administrator,
        }
    }

    pub fn account(&self) -> &Account {
        match self {
            User::Patient(p) => &p.account,
            User::Doctor(d) => &d.account,
            User::Pharmacist(p) => &p.account,
            User::Administrator(a) => &a.account,
        }
    }

    pub fn account_mut(&mut self) -> &mut Account {
        match self {
            User::Patient(p) => &mut p.account,
            User::Doctor(d) => &mut d.account,
            User::Pharmacist(p) => &mut p.account,
            User::Administrator(a) => &mut a.account,
        }
    }

    pub fn user_id(&self) -> &str {
        &self.account().user_id
    }

    pub fn name(&self) -> &str {
        &self.account().name
    }

    /// Age for staff members, `None` for patients.
    pub fn staff_age(&self) -> Option<u32> {
        match self {
            User::Patient(_) => None,
            User::Doctor(d) => Some(d.age),
            User::Pharmacist(p) => Some(p.age),
            User::Administrator(a) => Some(a.age),
        }
    }

    pub fn as_patient(&self) -> Option<&Patient> {
        match self {
            User::Patient(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_doctor(&self) -> Option<&Doctor> {
        match self {
            User::Doctor(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_pharmacist(&self) -> Option<&Pharmacist> {
        match self {
            User::Pharmacist(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_administrator(&self) -> Option<&Administrator> {
        match self {
            User::Administrator(a) => Some(a),
            _ => None,
        }
    }
}

impl Entity for User {
    const KIND: EntityKind = EntityKind::User;

    fn id(&self) -> &str {
        self.user_id()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn patient() -> User {
        User::Patient(Patient {
            account: Account::new("P1001", "password", "Alice Brown", "Female"),
            date_of_birth: NaiveDate::from_ymd_opt(1980, 5, 14).unwrap(),
            blood_type: "A+".to_string(),
        })
    }

    #[test]
    fn accessors_only_match_own_role() {
        let user = patient();
        assert_eq!(user.role(), Role::Patient);
        assert!(user.as_patient().is_some());
        assert!(user.as_doctor().is_none());
        assert!(user.as_pharmacist().is_none());
        assert!(user.as_administrator().is_none());
        assert_eq!(user.staff_age(), None);
    }

    #[test]
    fn contact_update_is_all_or_nothing() {
        let mut user = patient();
        let err = user
            .account_mut()
            .update_contact(Some("not-an-email"), Some("91234567"))
            .unwrap_err();
        assert_eq!(err, ValidationError::InvalidEmail("not-an-email".to_string()));
        assert_eq!(user.account().phone, None);

        user.account_mut()
            .update_contact(Some("alice@example.com"), None)
            .unwrap();
        assert_eq!(user.account().email.as_deref(), Some("alice@example.com"));
    }

    #[test]
    fn role_parses_case_insensitively() {
        assert_eq!("ADMIN".parse::<Role>(), Ok(Role::Administrator));
        assert_eq!("pharmacist".parse::<Role>(), Ok(Role::Pharmacist));
        assert!("nurse".parse::<Role>().is_err());
    }
}
