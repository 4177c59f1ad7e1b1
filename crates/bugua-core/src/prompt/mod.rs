//! Reading prompt template and its store.
//!
//! The template is free text with three substitution markers. It is edited by
//! an administrator, so it may be missing markers; the renderer in the
//! application layer validates the rendered text rather than trusting the
//! template.

mod repository;

pub use repository::PromptRepository;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Marker replaced by the Gua Code. Required.
pub const CODE_MARKER: &str = "USER_INPUT_CODE";
/// Marker replaced by the category label. Required.
pub const CATEGORY_MARKER: &str = "USER_INPUT_CATEGORY";
/// Marker replaced by the gender label. Optional.
pub const GENDER_MARKER: &str = "USER_INPUT_GENDER";

/// Built-in reading template, used when no template has been stored.
pub const DEFAULT_SYSTEM_PROMPT: &str = include_str!("default_system_prompt.md");

/// Trigger message sent as the single user turn of a reading request.
pub const READING_TRIGGER: &str = "請依照 System Rules 開始解卦。";

/// A well-formed marker, `{{NAME}}` or `{{ NAME }}`. Captures the name.
static MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{\{\s*([A-Za-z_][A-Za-z0-9_]*)\s*\}\}").expect("valid regex")
});

/// Returns `{{MARKER}}` as it appears in the built-in template.
pub fn marker(name: &str) -> String {
    format!("{{{{{}}}}}", name)
}

/// Whether `template` contains a well-formed `name` marker.
pub fn contains_marker(template: &str, name: &str) -> bool {
    MARKER.captures_iter(template).any(|caps| &caps[1] == name)
}

/// Returns the required markers missing from `template`.
pub fn missing_required_markers(template: &str) -> Vec<&'static str> {
    [CODE_MARKER, CATEGORY_MARKER]
        .into_iter()
        .filter(|name| !contains_marker(template, name))
        .collect()
}

/// Names of well-formed markers that are not substituted.
pub fn unknown_markers(template: &str) -> Vec<String> {
    let mut names: Vec<String> = MARKER
        .captures_iter(template)
        .map(|caps| caps[1].to_string())
        .filter(|name| ![CODE_MARKER, CATEGORY_MARKER, GENDER_MARKER].contains(&name.as_str()))
        .collect();
    names.sort();
    names.dedup();
    names
}

/// Replaces every marker named in `values`.
///
/// Unknown and malformed markers are left as they are. Values are inserted
/// literally.
pub fn substitute_markers(template: &str, values: &[(&str, &str)]) -> String {
    MARKER
        .replace_all(template, |caps: &Captures| {
            match values.iter().find(|(name, _)| *name == &caps[1]) {
                Some((_, value)) => (*value).to_string(),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_prompt_has_all_markers() {
        assert!(missing_required_markers(DEFAULT_SYSTEM_PROMPT).is_empty());
        assert!(DEFAULT_SYSTEM_PROMPT.contains(&marker(GENDER_MARKER)));
    }

    #[test]
    fn test_missing_markers() {
        assert_eq!(marker(CODE_MARKER), "{{USER_INPUT_CODE}}");
        assert_eq!(
            missing_required_markers("code: {{USER_INPUT_CODE}}"),
            vec![CATEGORY_MARKER]
        );
    }

    #[test]
    fn test_spaced_markers_count() {
        let template = "{{ USER_INPUT_CODE }} {{USER_INPUT_CATEGORY  }}";
        assert!(missing_required_markers(template).is_empty());
        assert!(contains_marker(template, CODE_MARKER));
    }

    #[test]
    fn test_malformed_marker_is_not_a_marker() {
        assert!(!contains_marker("{{USER_INPUT_GENDER}", GENDER_MARKER));
        assert!(!contains_marker("{USER_INPUT_CODE}}", CODE_MARKER));
    }

    #[test]
    fn test_substitute_replaces_every_known_marker() {
        let out = substitute_markers(
            "{{USER_INPUT_CODE}}|{{ USER_INPUT_CODE }}|{{OTHER}}|{{USER_INPUT_GENDER}",
            &[(CODE_MARKER, "$1 117"), (GENDER_MARKER, "男")],
        );
        assert_eq!(out, "$1 117|$1 117|{{OTHER}}|{{USER_INPUT_GENDER}");
    }

    #[test]
    fn test_unknown_markers() {
        assert_eq!(
            unknown_markers("{{USER_INPUT_CODE}} {{ LUCK }} {{LUCK}} {{USER_INPUT_AGE}}"),
            vec!["LUCK".to_string(), "USER_INPUT_AGE".to_string()]
        );
        assert!(unknown_markers(DEFAULT_SYSTEM_PROMPT).is_empty());
    }
}
