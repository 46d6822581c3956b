//! Question structures supplied by the question bank

use serde::{Deserialize, Serialize};

use crate::error::{QuizError, Result};

/// A single multiple-choice question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub options: Vec<String>,
    pub correct_answer: usize,
    #[serde(default)]
    pub explanation: Option<String>,
}

impl Question {
    pub fn new(id: impl Into<String>, correct_answer: usize) -> Self {
        Self {
            id: id.into(),
            prompt: String::new(),
            options: Vec::new(),
            correct_answer,
            explanation: None,
        }
    }

    pub fn with_options(mut self, options: Vec<String>) -> Self {
        self.options = options;
        self
    }

    #[inline]
    pub fn is_correct(&self, answer: usize) -> bool {
        answer == self.correct_answer
    }

    /// Whether `answer` names an option. Questions without options accept any index.
    #[inline]
    pub fn accepts(&self, answer: usize) -> bool {
        self.options.is_empty() || answer < self.options.len()
    }
}

/// Check a question list before a session is built from it
pub fn validate_questions(questions: &[Question]) -> Result<()> {
    if questions.is_empty() {
        return Err(QuizError::NoQuestions);
    }
    for question in questions {
        if !question.accepts(question.correct_answer) {
            return Err(QuizError::InvalidQuestion {
                id: question.id.clone(),
                reason: format!(
                    "correct answer {} is outside {} options",
                    question.correct_answer,
                    question.options.len()
                ),
            });
        }
    }
    Ok(())
}

/// Parse a JSON array of questions
pub fn questions_from_json(json: &str) -> Result<Vec<Question>> {
    let questions: Vec<Question> = serde_json::from_str(json)?;
    validate_questions(&questions)?;
    Ok(questions)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("option {}", i)).collect()
    }

    #[test]
    fn test_is_correct() {
        let q = Question::new("q1", 2);
        assert!(q.is_correct(2));
        assert!(!q.is_correct(0));
    }

    #[test]
    fn test_accepts_bounds() {
        let q = Question::new("q1", 0).with_options(opts(4));
        assert!(q.accepts(3));
        assert!(!q.accepts(4));

        let bare = Question::new("q2", 7);
        assert!(bare.accepts(100));
    }

    #[test]
    fn test_validate_empty() {
        assert_eq!(validate_questions(&[]), Err(QuizError::NoQuestions));
    }

    #[test]
    fn test_validate_correct_answer_out_of_range() {
        let questions = vec![
            Question::new("ok", 1).with_options(opts(2)),
            Question::new("bad", 5).with_options(opts(2)),
        ];
        match validate_questions(&questions) {
            Err(QuizError::InvalidQuestion { id, .. }) => assert_eq!(id, "bad"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_from_json() {
        let json = r#"[
            {"id": "a", "prompt": "2+2?", "options": ["3", "4"], "correctAnswer": 1},
            {"id": "b", "correctAnswer": 0, "explanation": "because"}
        ]"#;
        let questions = questions_from_json(json).unwrap();
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].options.len(), 2);
        assert_eq!(questions[1].explanation.as_deref(), Some("because"));
    }
}
