// lib/src/auth.rs
//! Login state for the console. Credentials live on the user accounts in the
//! store; this only tracks who is signed in.

use log::{info, warn};

use models::{non_empty, ClinicError, ClinicResult, User};

use crate::storage_engine::Collection;

const MIN_PASSWORD_LENGTH: usize = 6;

#[derive(Debug, Clone, Default)]
pub struct AuthService {
    current: Option<String>,
    default_password: String,
}

impl AuthService {
    pub fn new(default_password: &str) -> Self {
        AuthService {
            current: None,
            default_password: default_password.to_string(),
        }
    }

    /// Signs `user_id` in. Unknown ids and wrong passwords produce the same
    /// error.
    pub fn login<'a>(&mut self, users: &'a Collection<User>, user_id: &str, password: &str) -> ClinicResult<&'a User> {
        let user = users
            .get(user_id.trim())
            .filter(|u| u.account().password == password)
            .ok_or_else(|| {
                warn!("Failed login attempt for {}", user_id);
                ClinicError::Unauthorized("invalid user id or password".to_string())
            })?;
        info!("{} {} logged in", user.role(), user.user_id());
        self.current = Some(user.user_id().to_string());
        Ok(user)
    }

    pub fn logout(&mut self) -> Option<String> {
        let previous = self.current.take();
        if let Some(id) = &previous {
            info!("{} logged out", id);
        }
        previous
    }

    pub fn current_user_id(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn current_user<'a>(&self, users: &'a Collection<User>) -> ClinicResult<&'a User> {
        let id = self
            .current
            .as_deref()
            .ok_or_else(|| ClinicError::Unauthorized("not logged in".to_string()))?;
        users.find(id)
    }

    /// True while the signed-in account still uses the configured default
    /// password.
    pub fn requires_password_change(&self, users: &Collection<User>) -> bool {
        self.current_user(users)
            .map(|u| u.account().password == self.default_password)
            .unwrap_or(false)
    }

    pub fn change_password(&self, users: &mut Collection<User>, old: &str, new: &str) -> ClinicResult<()> {
        let id = self
            .current
            .clone()
            .ok_or_else(|| ClinicError::Unauthorized("not logged in".to_string()))?;
        let index = users.position(&id)?;
        if users.at(index).account().password != old {
            return Err(ClinicError::Unauthorized("current password is incorrect".to_string()));
        }
        let new = non_empty("password", new)?;
        if new.len() < MIN_PASSWORD_LENGTH {
            return Err(ClinicError::InvalidArgument(format!(
                "password must be at least {} characters",
                MIN_PASSWORD_LENGTH
            )));
        }
        if new == old || new == self.default_password {
            return Err(ClinicError::InvalidArgument(
                "new password must differ from the current and default passwords".to_string(),
            ));
        }
        users.at_mut(index).account_mut().password = new;
        info!("{} changed password", id);
        Ok(())
    }
}
