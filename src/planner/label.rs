//! Shot labels appended to ids, names, and file names.

use crate::types::Browser;

/// Label for a breakpoint and/or browser: `__w<px>px` then `__<browser>`.
///
/// Empty when neither is given.
pub fn generate_label(breakpoint: Option<u32>, browser: Option<Browser>) -> String {
    let mut label = String::new();
    if let Some(width) = breakpoint {
        label.push_str(&format!("__w{}px", width));
    }
    if let Some(browser) = browser {
        label.push_str("__");
        label.push_str(browser.name());
    }
    label
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels() {
        assert_eq!(generate_label(None, None), "");
        assert_eq!(generate_label(Some(320), None), "__w320px");
        assert_eq!(generate_label(None, Some(Browser::Firefox)), "__firefox");
        assert_eq!(generate_label(Some(768), Some(Browser::Webkit)), "__w768px__webkit");
    }
}
