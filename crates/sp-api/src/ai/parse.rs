//! Parse-and-validate for structured model output.
//!
//! Model output is never trusted as valid just because `serde_json` accepted
//! it: each shape is deserialized into a typed structure and checked at the
//! boundary, producing a tagged `Result` instead of a dynamic blob. Models
//! routinely wrap JSON in markdown code fences, so those are stripped first.

use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// One suggested goal from the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalSuggestion {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    /// Milestone titles, in order.
    #[serde(default)]
    pub milestones: Vec<String>,
}

/// A generated study plan: weeks of days with topics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedPlan {
    pub title: String,
    pub subject: String,
    pub weeks: Vec<GeneratedWeek>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedWeek {
    pub week_number: u32,
    #[serde(default)]
    pub focus: Option<String>,
    pub days: Vec<GeneratedDay>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedDay {
    pub day_number: u32,
    pub topic: String,
    #[serde(default)]
    pub tasks: Vec<String>,
}

/// Strip a leading/trailing markdown code fence from model output.
fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string ("json") on the opening fence line.
    let rest = rest.split_once('\n').map_or("", |(_, body)| body);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

/// Envelope shapes the model uses for suggestion lists.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SuggestionsEnvelope {
    Wrapped { suggestions: Vec<GoalSuggestion> },
    Bare(Vec<GoalSuggestion>),
}

/// Parse goal suggestions out of model output.
pub fn parse_goal_suggestions(text: &str) -> Result<Vec<GoalSuggestion>, ApiError> {
    let body = strip_code_fences(text);
    let envelope: SuggestionsEnvelope = serde_json::from_str(body)
        .map_err(|e| ApiError::Parse(format!("model output was not suggestion JSON: {e}")))?;

    let suggestions = match envelope {
        SuggestionsEnvelope::Wrapped { suggestions } => suggestions,
        SuggestionsEnvelope::Bare(suggestions) => suggestions,
    };

    if suggestions.is_empty() {
        return Err(ApiError::Parse(
            "model returned an empty suggestion list".to_string(),
        ));
    }
    if suggestions.iter().any(|s| s.title.trim().is_empty()) {
        return Err(ApiError::Parse(
            "model returned a suggestion without a title".to_string(),
        ));
    }

    Ok(suggestions)
}

/// Parse a generated study plan out of model output.
pub fn parse_generated_plan(text: &str) -> Result<GeneratedPlan, ApiError> {
    let body = strip_code_fences(text);
    let plan: GeneratedPlan = serde_json::from_str(body)
        .map_err(|e| ApiError::Parse(format!("model output was not plan JSON: {e}")))?;

    if plan.weeks.is_empty() {
        return Err(ApiError::Parse("generated plan has no weeks".to_string()));
    }
    if plan.weeks.iter().any(|w| w.days.is_empty()) {
        return Err(ApiError::Parse(
            "generated plan has a week without days".to_string(),
        ));
    }

    Ok(plan)
}

/// Static fallback plan used when the model's output cannot be parsed.
///
/// This is a fixed template keyed only by subject and duration, not a
/// derived plan; the endpoint still answers 200 with it.
pub fn fallback_plan(subject: &str, duration_weeks: u32) -> GeneratedPlan {
    const DAY_TOPICS: [&str; 5] = [
        "Review core concepts",
        "Read and take notes",
        "Practice exercises",
        "Self-test on this week's material",
        "Recap and plan next steps",
    ];

    let weeks = (1..=duration_weeks.max(1))
        .map(|week_number| GeneratedWeek {
            week_number,
            focus: Some(format!("{subject}: week {week_number}")),
            days: DAY_TOPICS
                .iter()
                .enumerate()
                .map(|(i, topic)| GeneratedDay {
                    day_number: i as u32 + 1,
                    topic: (*topic).to_string(),
                    tasks: Vec::new(),
                })
                .collect(),
        })
        .collect();

    GeneratedPlan {
        title: format!("{subject} study plan"),
        subject: subject.to_string(),
        weeks,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_suggestions_wrapped() {
        let text = r#"{"suggestions":[{"title":"Learn ownership","milestones":["read ch4","do exercises"]}]}"#;
        let suggestions = parse_goal_suggestions(text).unwrap();
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].milestones.len(), 2);
    }

    #[test]
    fn test_parse_suggestions_bare_array_with_fences() {
        let text = "```json\n[{\"title\":\"Learn borrowing\"}]\n```";
        let suggestions = parse_goal_suggestions(text).unwrap();
        assert_eq!(suggestions[0].title, "Learn borrowing");
    }

    #[test]
    fn test_parse_suggestions_rejects_prose() {
        let err = parse_goal_suggestions("Here are some great goals for you!").unwrap_err();
        assert!(matches!(err, ApiError::Parse(_)));
    }

    #[test]
    fn test_parse_suggestions_rejects_empty_list() {
        assert!(parse_goal_suggestions(r#"{"suggestions":[]}"#).is_err());
    }

    #[test]
    fn test_parse_plan() {
        let text = r#"{
            "title": "Rust in 2 weeks",
            "subject": "Rust",
            "weeks": [
                {"week_number": 1, "days": [{"day_number": 1, "topic": "Basics"}]},
                {"week_number": 2, "days": [{"day_number": 1, "topic": "Traits"}]}
            ]
        }"#;
        let plan = parse_generated_plan(text).unwrap();
        assert_eq!(plan.weeks.len(), 2);
        assert_eq!(plan.weeks[0].days[0].topic, "Basics");
    }

    #[test]
    fn test_parse_plan_rejects_week_without_days() {
        let text = r#"{"title":"t","subject":"s","weeks":[{"week_number":1,"days":[]}]}"#;
        assert!(parse_generated_plan(text).is_err());
    }

    #[test]
    fn test_fallback_plan_shape() {
        let plan = fallback_plan("Linear algebra", 3);
        assert_eq!(plan.subject, "Linear algebra");
        assert_eq!(plan.weeks.len(), 3);
        assert!(plan.weeks.iter().all(|w| w.days.len() == 5));
        assert_eq!(plan.weeks[1].week_number, 2);
    }

    #[test]
    fn test_fallback_plan_never_empty() {
        assert_eq!(fallback_plan("x", 0).weeks.len(), 1);
    }
}
