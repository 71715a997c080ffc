// Allow dead code: API response structs have fields for completeness
#![allow(dead_code)]

use serde::{Deserialize, Serialize};

/// A subject/course as served by `/library/courses` and `/subjects`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub is_active: bool,
    pub created_at: Option<String>,
}

/// An enrollment linking the current user to a course.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enrollment {
    pub id: i64,
    pub user_id: i64,
    pub course_id: i64,
    pub enrolled_at: Option<String>,
}

/// A practice question for a subject. `correct_answer` is an index into
/// `options`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PracticeQuestion {
    pub id: i64,
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: usize,
    pub explanation: Option<String>,
}

impl PracticeQuestion {
    pub fn correct_option(&self) -> Option<&str> {
        self.options.get(self.correct_answer).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_course() {
        let json = r#"{
            "id": 3,
            "name": "Chemistry",
            "description": "Organic, Inorganic, Physical Chemistry",
            "is_active": true,
            "created_at": "2024-01-15T08:00:00"
        }"#;
        let course: Course = serde_json::from_str(json).unwrap();
        assert_eq!(course.name, "Chemistry");
        assert!(course.is_active);
    }

    #[test]
    fn test_practice_question_correct_option() {
        let question = PracticeQuestion {
            id: 1,
            question: "What is the derivative of x²?".to_string(),
            options: vec!["x".into(), "2x".into(), "x²".into(), "2x²".into()],
            correct_answer: 1,
            explanation: None,
        };
        assert_eq!(question.correct_option(), Some("2x"));
    }

    #[test]
    fn test_practice_question_out_of_range_answer() {
        let question = PracticeQuestion {
            id: 1,
            question: "q".to_string(),
            options: vec!["a".into()],
            correct_answer: 5,
            explanation: None,
        };
        assert_eq!(question.correct_option(), None);
    }
}
