//! Prompt construction for quiz generation.

use crate::domain::GenerationParameters;

pub const DEFAULT_SYSTEM_PROMPT: &str = r#"You are a quiz generator AI. Create educational quiz questions based on the provided study notes. Generate questions that test comprehension, application, and analysis of the material. Respond with valid JSON in this exact format:
{
  "question": "The question text here",
  "type": "multiple-choice",
  "options": ["A) Option 1", "B) Option 2", "C) Option 3", "D) Option 4"],
  "correctAnswer": "A",
  "explanation": "Explanation of why this is correct",
  "difficulty": "medium"
}

For essay questions, omit the options and correctAnswer fields. Valid difficulty levels are: easy, medium, hard. Valid types are: multiple-choice, essay, true-false."#;

pub const DEFAULT_USER_TEMPLATE: &str = r#"Based on these study notes:

{notes}

Generate a quiz question. Make it {difficulty} difficulty and format it as {question_type}. The question should test understanding of the key concepts from the notes."#;

/// Placeholders a user template must contain.
pub const USER_TEMPLATE_PLACEHOLDERS: [&str; 3] = ["{notes}", "{difficulty}", "{question_type}"];

/// The immutable prompt text handed to the builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplates {
    pub system: String,
    pub user: String,
}

impl Default for PromptTemplates {
    fn default() -> Self {
        Self {
            system: DEFAULT_SYSTEM_PROMPT.to_string(),
            user: DEFAULT_USER_TEMPLATE.to_string(),
        }
    }
}

impl PromptTemplates {
    /// Placeholders absent from the user template.
    pub fn missing_placeholders(&self) -> Vec<&'static str> {
        USER_TEMPLATE_PLACEHOLDERS
            .into_iter()
            .filter(|placeholder| !self.user.contains(placeholder))
            .collect()
    }

    /// Renders the full prompt: system instruction, a blank line, then the user instruction.
    pub fn build(&self, grounding_text: &str, params: &GenerationParameters) -> String {
        let user = self
            .user
            .replace("{difficulty}", params.difficulty.as_str())
            .replace("{question_type}", params.question_type.as_str())
            // Notes go in last so placeholder-like text inside them is left alone.
            .replace("{notes}", grounding_text);

        format!("{}\n\n{}", self.system, user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Difficulty, QuestionType};

    fn params() -> GenerationParameters {
        GenerationParameters {
            difficulty: Difficulty::Hard,
            question_type: QuestionType::Essay,
        }
    }

    #[test]
    fn default_prompt_embeds_notes_and_parameters() {
        let prompt = PromptTemplates::default().build("Note 1: Rust owns memory", &params());

        assert!(prompt.starts_with(DEFAULT_SYSTEM_PROMPT));
        assert!(prompt.contains("Note 1: Rust owns memory"));
        assert!(prompt.contains("Make it hard difficulty and format it as essay."));
        assert!(!prompt.contains("{notes}"));
    }

    #[test]
    fn building_is_deterministic() {
        let templates = PromptTemplates::default();
        assert_eq!(
            templates.build("notes", &params()),
            templates.build("notes", &params())
        );
    }

    #[test]
    fn placeholder_text_inside_notes_is_not_expanded() {
        let prompt = PromptTemplates::default().build("literal {difficulty} marker", &params());
        assert!(prompt.contains("literal {difficulty} marker"));
    }

    #[test]
    fn reports_missing_placeholders() {
        let templates = PromptTemplates {
            system: "sys".to_string(),
            user: "Only {notes} here".to_string(),
        };
        assert_eq!(
            templates.missing_placeholders(),
            vec!["{difficulty}", "{question_type}"]
        );
        assert!(PromptTemplates::default().missing_placeholders().is_empty());
    }
}
