//! Reading prompt rendering.
//!
//! Markers are substituted literally, so admin-written rule text needs no
//! escaping. Marker problems are warnings; only a rendered prompt that lacks
//! the code or the category label is rejected.

use bugua_core::prompt::{
    CATEGORY_MARKER, CODE_MARKER, GENDER_MARKER, contains_marker, missing_required_markers,
    substitute_markers, unknown_markers,
};
use bugua_core::{BuguaError, Category, Gender, GuaCode};

/// Inputs substituted into the reading template.
#[derive(Debug, Clone, Copy)]
pub struct PromptInput<'a> {
    pub code: &'a GuaCode,
    pub category: Category,
    pub gender: Option<Gender>,
}

/// Renders `template` and checks the result.
///
/// Every `{{MARKER}}` (inner spacing allowed) is replaced. Returns
/// `BuguaError::Template` when the rendered text does not contain the code and
/// the category label.
pub fn render_reading_prompt(template: &str, input: PromptInput<'_>) -> Result<String, BuguaError> {
    for name in missing_required_markers(template) {
        tracing::warn!("[Prompt] Template is missing required marker {}", name);
    }
    if !contains_marker(template, GENDER_MARKER) {
        tracing::debug!("[Prompt] Template has no {} marker", GENDER_MARKER);
    }
    for name in unknown_markers(template) {
        tracing::warn!("[Prompt] Template uses unknown marker {}, left as is", name);
    }

    let code = input.code.as_str();
    let category_label = input.category.label();
    let rendered = substitute_markers(
        template,
        &[
            (CODE_MARKER, code),
            (CATEGORY_MARKER, category_label),
            (GENDER_MARKER, input.gender.map(|g| g.label()).unwrap_or("")),
        ],
    );

    let mut missing = Vec::new();
    if !rendered.contains(code) {
        missing.push(format!("卦碼 ({})", code));
    }
    if !rendered.contains(category_label) {
        missing.push(format!("問事類別 ({})", category_label));
    }
    if !missing.is_empty() {
        return Err(BuguaError::template(format!(
            "系統提示詞缺少必要資料：{}。請確認提示詞包含 {{{{{}}}}} 與 {{{{{}}}}} 標記。",
            missing.join("、"),
            CODE_MARKER,
            CATEGORY_MARKER
        )));
    }

    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bugua_core::prompt::DEFAULT_SYSTEM_PROMPT;

    fn code() -> GuaCode {
        GuaCode::from_stored("111 225 316 427 527")
    }

    fn input(code: &GuaCode) -> PromptInput<'_> {
        PromptInput {
            code,
            category: Category::Love,
            gender: Some(Gender::Female),
        }
    }

    #[test]
    fn test_default_template_renders_all_markers() {
        let code = code();
        let rendered = render_reading_prompt(DEFAULT_SYSTEM_PROMPT, input(&code)).unwrap();
        assert!(rendered.contains("111 225 316 427 527"));
        assert!(rendered.contains(Category::Love.label()));
        assert!(rendered.contains("**Gender**: 女"));
        assert!(!rendered.contains("{{USER_INPUT"));
    }

    #[test]
    fn test_every_occurrence_is_substituted() {
        let code = code();
        let rendered = render_reading_prompt(
            "{{USER_INPUT_CODE}} / {{ USER_INPUT_CATEGORY }} / {{USER_INPUT_CODE}}",
            input(&code),
        )
        .unwrap();
        assert_eq!(
            rendered,
            format!("111 225 316 427 527 / {} / 111 225 316 427 527", Category::Love.label())
        );
    }

    #[test]
    fn test_missing_gender_marker_is_fine() {
        let code = code();
        let rendered =
            render_reading_prompt("{{USER_INPUT_CODE}} {{USER_INPUT_CATEGORY}}", input(&code));
        assert!(rendered.is_ok());
    }

    #[test]
    fn test_missing_code_marker_fails_closed() {
        let code = code();
        let err = render_reading_prompt("類別：{{USER_INPUT_CATEGORY}}", input(&code)).unwrap_err();
        assert!(matches!(err, BuguaError::Template(_)));
        assert!(err.to_string().contains("卦碼"));
    }

    #[test]
    fn test_broken_code_marker_fails_closed() {
        let code = code();
        let err = render_reading_prompt("{{USER_INPUT_CODE {{USER_INPUT_CATEGORY}}", input(&code))
            .unwrap_err();
        assert!(matches!(err, BuguaError::Template(_)));
    }

    #[test]
    fn test_broken_gender_marker_still_renders() {
        let code = code();
        let rendered = render_reading_prompt(
            "卦碼 {{USER_INPUT_CODE}} 類別 {{USER_INPUT_CATEGORY}} 性別 {{USER_INPUT_GENDER}",
            input(&code),
        )
        .unwrap();
        assert!(rendered.contains("卦碼 111 225 316 427 527"));
        assert!(rendered.contains(Category::Love.label()));
        assert!(rendered.ends_with("性別 {{USER_INPUT_GENDER}"));
    }

    #[test]
    fn test_rule_text_with_template_syntax_is_kept_verbatim() {
        let code = code();
        let template = "{{USER_INPUT_CODE}} {{USER_INPUT_CATEGORY}} 勝率 {% 計算 {# 備註 {{ 淨值 }}";
        let rendered = render_reading_prompt(template, input(&code)).unwrap();
        assert!(rendered.ends_with("勝率 {% 計算 {# 備註 {{ 淨值 }}"));
    }

    #[test]
    fn test_absent_gender_renders_empty() {
        let code = code();
        let rendered = render_reading_prompt(
            "{{USER_INPUT_CODE}} {{USER_INPUT_CATEGORY}} [{{ USER_INPUT_GENDER }}]",
            PromptInput {
                code: &code,
                category: Category::Career,
                gender: None,
            },
        )
        .unwrap();
        assert!(rendered.ends_with("[]"));
    }
}
