use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum QuestionType {
    Behavioral,
    Technical,
    Situational,
}

impl QuestionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionType::Behavioral => "behavioral",
            QuestionType::Technical => "technical",
            QuestionType::Situational => "situational",
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

/// A generated interview question. Immutable once generated; identity is `id`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Question {
    pub id: String,
    pub text: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    pub difficulty: Difficulty,
    pub category: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn question_wire_format_uses_lowercase_tags() {
        let question = Question {
            id: "q-1".to_string(),
            text: "Tell me about a challenging project.".to_string(),
            question_type: QuestionType::Behavioral,
            difficulty: Difficulty::Medium,
            category: "teamwork".to_string(),
        };

        let json = serde_json::to_value(&question).unwrap();
        assert_eq!(json["type"], "behavioral");
        assert_eq!(json["difficulty"], "medium");
    }

    #[test]
    fn question_parses_from_backend_json() {
        let json = r#"{
            "id": "3f2b",
            "text": "How would you design a URL shortener?",
            "type": "technical",
            "difficulty": "hard",
            "category": "system design"
        }"#;

        let question: Question = serde_json::from_str(json).unwrap();
        assert_eq!(question.question_type, QuestionType::Technical);
        assert_eq!(question.difficulty, Difficulty::Hard);
        assert_eq!(question.category, "system design");
    }
}
