//! Keyword-based inference of generation parameters from the user's request.

use tracing::debug;

use crate::domain::{Difficulty, GenerationParameters, QuestionType};

const EASY_KEYWORDS: &[&str] = &["easy", "simple", "basic", "beginner"];
const HARD_KEYWORDS: &[&str] = &["hard", "difficult", "challenging", "advanced"];
const ESSAY_KEYWORDS: &[&str] = &["essay", "explain", "describe", "discuss"];
const TRUE_FALSE_KEYWORDS: &[&str] = &["true", "false", "yes", "no"];

/// Infers difficulty and question type from the latest user message.
///
/// Matching is a case-insensitive substring search. Easy keywords are checked before
/// hard ones and essay keywords before true/false ones, so the earlier set wins when
/// a message matches both.
pub fn infer(text: &str) -> GenerationParameters {
    let lowered = text.to_lowercase();

    let difficulty = if contains_any(&lowered, EASY_KEYWORDS) {
        Difficulty::Easy
    } else if contains_any(&lowered, HARD_KEYWORDS) {
        Difficulty::Hard
    } else {
        Difficulty::Medium
    };

    let question_type = if contains_any(&lowered, ESSAY_KEYWORDS) {
        QuestionType::Essay
    } else if contains_any(&lowered, TRUE_FALSE_KEYWORDS) {
        QuestionType::TrueFalse
    } else {
        QuestionType::MultipleChoice
    };

    debug!(%difficulty, %question_type, "Inferred generation parameters");
    GenerationParameters {
        difficulty,
        question_type,
    }
}

fn contains_any(lowered: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|keyword| lowered.contains(keyword))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_medium_multiple_choice() {
        let params = infer("Quiz me on chapter three");
        assert_eq!(params.difficulty, Difficulty::Medium);
        assert_eq!(params.question_type, QuestionType::MultipleChoice);
    }

    #[test]
    fn matches_keywords_case_insensitively() {
        let params = infer("Give me a HARD ESSAY question");
        assert_eq!(params.difficulty, Difficulty::Hard);
        assert_eq!(params.question_type, QuestionType::Essay);

        let params = infer("Something for a Beginner, True or False");
        assert_eq!(params.difficulty, Difficulty::Easy);
        assert_eq!(params.question_type, QuestionType::TrueFalse);
    }

    #[test]
    fn easy_wins_over_hard() {
        let params = infer("not too hard, keep it simple");
        assert_eq!(params.difficulty, Difficulty::Easy);
    }

    #[test]
    fn essay_wins_over_true_false() {
        let params = infer("explain whether this is true");
        assert_eq!(params.question_type, QuestionType::Essay);
    }

    #[test]
    fn keywords_match_inside_longer_words() {
        // "know" contains "no", "advanced" sits inside "advancedly".
        let params = infer("I know this advancedly");
        assert_eq!(params.difficulty, Difficulty::Hard);
        assert_eq!(params.question_type, QuestionType::TrueFalse);
    }

    #[test]
    fn inference_is_deterministic() {
        let text = "Describe the basic idea";
        assert_eq!(infer(text), infer(text));
    }
}
