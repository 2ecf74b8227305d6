use actix_session::Session;
use serde_json::{Map, Value};

use crate::errors::AppError;

/// Session key holding form values stashed by a failed save, replayed onto the next form render.
pub const POSTED_VALUES_KEY: &str = "template_form_values";

/// Session key for the name of the element currently open in the manager.
pub const ITEM_NAME_KEY: &str = "itemname";

/// Anything that can answer "does the acting user hold this permission".
pub trait PermissionCheck {
    fn has_permission(&self, code: &str) -> bool;
}

/// Wrapper around permission codes with a `has()` method for use in Askama templates.
#[derive(Debug, Clone, Default)]
pub struct Permissions(pub Vec<String>);

impl Permissions {
    pub fn has(&self, code: &str) -> bool {
        self.0.iter().any(|p| p == code)
    }

    pub fn from_csv(csv: &str) -> Self {
        let codes = csv
            .split(',')
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();
        Permissions(codes)
    }
}

impl PermissionCheck for Permissions {
    fn has_permission(&self, code: &str) -> bool {
        self.has(code)
    }
}

pub fn get_user_id(session: &Session) -> Option<i64> {
    session.get::<i64>("user_id").unwrap_or(None)
}

/// Manager role id of the acting user; 0 when the session carries none.
pub fn get_role(session: &Session) -> i64 {
    session.get::<i64>("role").unwrap_or(None).unwrap_or(0)
}

pub fn get_username(session: &Session) -> Result<String, String> {
    match session.get::<String>("username") {
        Ok(Some(username)) => Ok(username),
        Ok(None) => Err("No username in session".to_string()),
        Err(e) => Err(format!("Session error: {}", e)),
    }
}

pub fn get_permissions(session: &Session) -> Result<Permissions, String> {
    match session.get::<String>("permissions") {
        Ok(Some(csv)) => Ok(Permissions::from_csv(&csv)),
        Ok(None) => Err("No permissions in session".to_string()),
        Err(e) => Err(format!("Session error: {}", e)),
    }
}

pub fn take_flash(session: &Session) -> Option<String> {
    let flash = session.get::<String>("flash").unwrap_or(None);
    if flash.is_some() {
        session.remove("flash");
    }
    flash
}

/// Take the stashed form values out of the session, if any.
pub fn take_posted_values(session: &Session) -> Option<Map<String, Value>> {
    let values = session
        .get::<Map<String, Value>>(POSTED_VALUES_KEY)
        .unwrap_or(None);
    if values.is_some() {
        session.remove(POSTED_VALUES_KEY);
    }
    values
}

pub fn set_item_name(session: &Session, name: &str) -> Result<(), AppError> {
    session
        .insert(ITEM_NAME_KEY, name)
        .map_err(|e| AppError::Session(format!("Failed to store item name: {}", e)))
}
