//! User listing rules.

use crate::models::User;

/// Keep users whose role equals `role` exactly, in their original order.
///
/// `None` or an empty role keeps everyone. A role that no user has yields an empty list.
pub fn filter_by_role(users: Vec<User>, role: Option<&str>) -> Vec<User> {
    match role.filter(|r| !r.is_empty()) {
        None => users,
        Some(role) => users
            .into_iter()
            .filter(|user| user.role.as_str() == role)
            .collect(),
    }
}
