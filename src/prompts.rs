use crate::models::{Analysis, ImprovementSuggestion};

pub const CLEANUP_WITH_INSTRUCTIONS: &str =
    include_str!("../data/prompts/cleanup_with_instructions.txt");
pub const CLEANUP_GENERIC: &str = include_str!("../data/prompts/cleanup_generic.txt");

/// Replace `{{key}}` placeholders in a template string.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut result = template.to_string();
    for (key, value) in vars {
        result = result.replace(&format!("{{{{{}}}}}", key), value);
    }
    result
}

/// Build the image-editing prompt from an analysis result.
///
/// Uses the `improvement_suggestions` array when present, otherwise falls back
/// to a generic tidy-up instruction.
pub fn cleanup_prompt(analysis: &Analysis) -> String {
    let Some(serde_json::Value::Array(items)) = analysis.get("improvement_suggestions") else {
        return CLEANUP_GENERIC.to_string();
    };

    let instructions = items
        .iter()
        .map(|item| {
            let task: ImprovementSuggestion =
                serde_json::from_value(item.clone()).unwrap_or_default();
            format!("{}を{}", task.target_area, task.suggestion)
        })
        .collect::<Vec<_>>()
        .join("、");

    render(CLEANUP_WITH_INSTRUCTIONS, &[("instructions", &instructions)])
}
