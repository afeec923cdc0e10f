//! Role-suffixed filenames.
//!
//! Hosted artifacts are named by inserting a role token before the last
//! extension segment: `button.png` → `button.before.png`. Report consumers
//! rebuild URLs with the same rule, so it must stay byte-exact:
//!
//! | input        | `before` result      |
//! |--------------|----------------------|
//! | `a.b.png`    | `a.b.before.png`     |
//! | `a.png`      | `a.before.png`       |
//! | `report`     | `before.report`      |
//! | `""`, `"."`  | `before`             |
//!
//! Empty segments (leading, trailing, or doubled dots) are dropped.

use crate::types::ImageRole;

/// Insert the role token before the last extension segment.
pub fn extend_file_name(file_name: &str, role: ImageRole) -> String {
    let token = role.token();
    let mut parts: Vec<&str> = file_name.split('.').filter(|p| !p.is_empty()).collect();

    match parts.len() {
        0 => token.to_string(),
        1 => format!("{}.{}", token, parts[0]),
        n => {
            let last = parts[n - 1];
            parts[n - 1] = token;
            parts.push(last);
            parts.join(".")
        }
    }
}

/// Recover the original name from a role-suffixed one.
///
/// Exact inverse of [`extend_file_name`] for names without empty segments.
/// Returns `None` when `file_name` does not carry the token where the rule
/// puts it.
pub fn strip_role(file_name: &str, role: ImageRole) -> Option<String> {
    let token = role.token();
    let mut parts: Vec<&str> = file_name.split('.').collect();

    match parts.len() {
        1 if parts[0] == token => Some(String::new()),
        2 if parts[0] == token => Some(parts[1].to_string()),
        n if n >= 3 && parts[n - 2] == token => {
            parts.remove(n - 2);
            Some(parts.join("."))
        }
        _ => None,
    }
}
