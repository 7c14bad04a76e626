use std::collections::HashMap;

use log::info;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::api::{ApiDecoder, RequestDescriptor};
use crate::config::ApiConfig;
use crate::error::Error;

use super::questions::{Difficulty, Question, QuestionType};

/// Signed-in user context. When present, generation goes through the
/// authenticated endpoint and the extra headers ride along.
#[derive(Debug, Clone)]
pub struct UserContext {
    pub user_id: String,
    pub headers: HashMap<String, String>,
}

/// Everything the generation form collects. Job role and company are
/// required; the rest falls back to sensible defaults on the wire.
#[derive(Debug, Clone, Default)]
pub struct GenerateInput {
    pub job_role: String,
    pub company: String,
    pub difficulty: Option<Difficulty>,
    pub seniority: Option<String>,
    pub question_type: Option<QuestionType>,
    pub number_of_questions: Option<u32>,
    pub user: Option<UserContext>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateQuestionsBody<'a> {
    job_role: &'a str,
    company: &'a str,
    difficulty: &'a str,
    experience: &'a str,
    number_of_questions: u32,
    question_type: &'a str,
    user_id: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedQuestions {
    pub questions: Vec<Question>,
    #[serde(default)]
    pub question_set_id: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FeedbackBody<'a> {
    question: &'a str,
    answer: &'a str,
    time_spent: u64,
}

#[derive(Debug, Deserialize)]
struct FeedbackResponse {
    feedback: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FollowUpBody<'a> {
    original_question: &'a str,
    answer: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FollowUpResponse {
    follow_up_question: String,
}

/// Typed wrappers over the three backend endpoints the interview flow uses.
#[derive(Clone)]
pub struct InterviewService {
    decoder: ApiDecoder,
    config: ApiConfig,
}

impl InterviewService {
    pub fn new(config: ApiConfig) -> Self {
        Self {
            decoder: ApiDecoder::new(),
            config,
        }
    }

    fn endpoint(&self, path: &str) -> Result<Url, Error> {
        self.config
            .base_url
            .join(path)
            .map_err(|e| Error::Network(format!("Invalid request URL '{}': {}", path, e)))
    }

    pub async fn generate_questions(&self, input: &GenerateInput) -> Result<GeneratedQuestions, Error> {
        // The authenticated variant persists the set under the user's account.
        let path = if input.user.is_some() {
            "/api/db/generate-questions"
        } else {
            "/api/generate-questions"
        };
        let url = self.endpoint(path)?;

        let body = GenerateQuestionsBody {
            job_role: &input.job_role,
            company: &input.company,
            difficulty: input.difficulty.unwrap_or(Difficulty::Medium).as_str(),
            experience: input.seniority.as_deref().unwrap_or("mid"),
            number_of_questions: input.number_of_questions.unwrap_or(5),
            question_type: input.question_type.unwrap_or(QuestionType::Behavioral).as_str(),
            user_id: input.user.as_ref().map(|u| u.user_id.as_str()),
        };

        info!(
            "Generating {} {} questions for {} @ {}",
            body.number_of_questions, body.question_type, body.job_role, body.company
        );

        let mut descriptor = RequestDescriptor::post(url, serde_json::to_value(&body).map_err(Error::Decode)?);
        if let Some(user) = &input.user {
            descriptor = descriptor.with_headers(user.headers.clone());
        }

        self.decoder.request(&descriptor).await
    }

    pub async fn generate_feedback(&self, question: &str, answer: &str, time_spent: u64) -> Result<String, Error> {
        let url = self.endpoint("/api/generate-feedback")?;
        let body = FeedbackBody {
            question,
            answer,
            time_spent,
        };

        let descriptor = RequestDescriptor::post(url, serde_json::to_value(&body).map_err(Error::Decode)?);
        let response: FeedbackResponse = self.decoder.request(&descriptor).await?;
        Ok(response.feedback)
    }

    pub async fn generate_follow_up(&self, original_question: &str, answer: &str) -> Result<String, Error> {
        let url = self.endpoint("/api/generate-follow-up")?;
        let body = FollowUpBody {
            original_question,
            answer,
        };

        let descriptor = RequestDescriptor::post(url, serde_json::to_value(&body).map_err(Error::Decode)?);
        let response: FollowUpResponse = self.decoder.request(&descriptor).await?;
        Ok(response.follow_up_question)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn service_for(server: &mockito::Server) -> InterviewService {
        let base = Url::parse(&server.url()).unwrap();
        InterviewService::new(ApiConfig::with_base_url(base))
    }

    #[tokio::test]
    async fn generate_sends_camel_case_body_and_parses_questions() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/generate-questions")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "jobRole": "Software Engineer",
                "company": "Google",
                "difficulty": "medium",
                "numberOfQuestions": 5,
            })))
            .with_status(200)
            .with_body(
                r#"{"questions":[{"id":"q1","text":"Why Google?","type":"behavioral","difficulty":"medium","category":"motivation"}],"questionSetId":"set-9"}"#,
            )
            .create_async()
            .await;

        let service = service_for(&server);
        let input = GenerateInput {
            job_role: "Software Engineer".to_string(),
            company: "Google".to_string(),
            ..GenerateInput::default()
        };

        let generated = service.generate_questions(&input).await.unwrap();
        mock.assert_async().await;
        assert_eq!(generated.questions.len(), 1);
        assert_eq!(generated.question_set_id.as_deref(), Some("set-9"));
        assert_eq!(generated.questions[0].id, "q1");
    }

    #[tokio::test]
    async fn signed_in_generation_uses_the_db_endpoint_with_headers() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/db/generate-questions")
            .match_header("authorization", "Bearer token-123")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "userId": "user-7",
            })))
            .with_status(200)
            .with_body(r#"{"questions":[]}"#)
            .create_async()
            .await;

        let service = service_for(&server);
        let mut headers = HashMap::new();
        headers.insert("authorization".to_string(), "Bearer token-123".to_string());
        let input = GenerateInput {
            job_role: "Data Analyst".to_string(),
            company: "Acme".to_string(),
            user: Some(UserContext {
                user_id: "user-7".to_string(),
                headers,
            }),
            ..GenerateInput::default()
        };

        let generated = service.generate_questions(&input).await.unwrap();
        mock.assert_async().await;
        assert!(generated.questions.is_empty());
    }

    #[tokio::test]
    async fn feedback_round_trip() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/generate-feedback")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "question": "Why Google?",
                "answer": "I led a project...",
                "timeSpent": 95,
            })))
            .with_status(200)
            .with_body(r#"{"feedback":"Strong, specific answer."}"#)
            .create_async()
            .await;

        let service = service_for(&server);
        let feedback = service
            .generate_feedback("Why Google?", "I led a project...", 95)
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(feedback, "Strong, specific answer.");
    }

    #[tokio::test]
    async fn follow_up_round_trip() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/generate-follow-up")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "originalQuestion": "Why Google?",
            })))
            .with_status(200)
            .with_body(r#"{"followUpQuestion":"What would you do differently?"}"#)
            .create_async()
            .await;

        let service = service_for(&server);
        let follow_up = service
            .generate_follow_up("Why Google?", "I led a project...")
            .await
            .unwrap();

        assert_eq!(follow_up, "What would you do differently?");
    }
}
