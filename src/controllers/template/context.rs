use std::collections::BTreeSet;

use serde_json::{Map, Value};

use crate::auth::session::{PermissionCheck, Permissions};
use crate::models::form_value::to_int;

/// Manager action: open an existing template for editing.
pub const ACTION_EDIT_TEMPLATE: i64 = 16;
/// Manager action: create a new template.
pub const ACTION_NEW_TEMPLATE: i64 = 19;

/// Everything the template controller needs to know about the current request.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    pub action: i64,
    /// Template id from the route; 0 for a new template.
    pub element_id: i64,
    /// `catid` query parameter: category preselected for a new template.
    pub catid: Option<i64>,
    /// Posted field values to replay onto the form.
    pub posted: Option<Map<String, Value>>,
    pub user_id: i64,
    pub role: i64,
    pub permissions: Permissions,
}

impl RequestContext {
    pub fn selected_tvs(&self) -> BTreeSet<i64> {
        selected_tvs(self.posted.as_ref())
    }
}

/// Permission code guarding `action`, or `None` for actions this controller does not serve.
pub fn required_permission(action: i64) -> Option<&'static str> {
    match action {
        ACTION_EDIT_TEMPLATE => Some("edit_template"),
        ACTION_NEW_TEMPLATE => Some("new_template"),
        _ => None,
    }
}

/// Whether `action` may be shown to a holder of `permissions`. Unknown actions are denied.
pub fn can_view(action: i64, permissions: &dyn PermissionCheck) -> bool {
    required_permission(action).is_some_and(|code| permissions.has_permission(code))
}

/// Ids from the posted `assignedTv` list, coerced to integers and deduplicated.
pub fn selected_tvs(posted: Option<&Map<String, Value>>) -> BTreeSet<i64> {
    match posted.and_then(|p| p.get("assignedTv")) {
        Some(Value::Array(items)) => items.iter().map(to_int).collect(),
        _ => BTreeSet::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_can_view_maps_actions_to_permissions() {
        let editor = Permissions(vec!["edit_template".to_string()]);
        let creator = Permissions(vec!["new_template".to_string()]);

        assert!(can_view(ACTION_EDIT_TEMPLATE, &editor));
        assert!(!can_view(ACTION_NEW_TEMPLATE, &editor));
        assert!(can_view(ACTION_NEW_TEMPLATE, &creator));
        assert!(!can_view(ACTION_EDIT_TEMPLATE, &creator));
    }

    #[test]
    fn test_can_view_denies_unknown_action() {
        let all = Permissions(vec!["edit_template".to_string(), "new_template".to_string()]);
        assert!(!can_view(0, &all));
        assert!(!can_view(17, &all));
    }

    #[test]
    fn test_selected_tvs_dedups_mixed_values() {
        let posted = json!({ "assignedTv": [3, "3", 7, 7] });
        let selected = selected_tvs(posted.as_object());
        assert_eq!(selected.into_iter().collect::<Vec<_>>(), vec![3, 7]);
    }

    #[test]
    fn test_selected_tvs_ignores_missing_or_scalar() {
        assert!(selected_tvs(None).is_empty());
        let scalar = json!({ "assignedTv": "3" });
        assert!(selected_tvs(scalar.as_object()).is_empty());
    }
}
