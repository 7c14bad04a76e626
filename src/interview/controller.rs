use std::sync::Arc;

use log::{debug, info, warn};
use parking_lot::Mutex;

use crate::error::Error;

use super::service::{GenerateInput, InterviewService};
use super::session::{Phase, Session};
use super::timer::QuestionTimer;

/// Shown in place of a follow-up question when the backend call fails.
/// Follow-ups are supplementary, so this never surfaces as a blocking error.
pub const FOLLOW_UP_FALLBACK: &str =
    "Sorry, I couldn't generate a follow-up question right now. Please continue with your answer.";

/// Owns the interview lifecycle: the session state machine, the per-question
/// timer and the pending-request gates. All mutation of the session happens
/// here, one whole transition at a time.
///
/// Async completions are stamped with the session version taken when the call
/// was issued; a completion whose stamp no longer matches (the user advanced,
/// restarted or reset in the meantime) is dropped without touching state.
pub struct SessionController {
    session: Arc<Mutex<Session>>,
    timer: Mutex<QuestionTimer>,
    service: InterviewService,
}

impl SessionController {
    pub fn new(service: InterviewService) -> Self {
        Self {
            session: Arc::new(Mutex::new(Session::new())),
            timer: Mutex::new(QuestionTimer::new()),
            service,
        }
    }

    /// A point-in-time copy of the session for the UI to render.
    pub fn snapshot(&self) -> Session {
        self.session.lock().clone()
    }

    pub fn set_answer(&self, text: &str) {
        self.session.lock().current_answer = text.to_string();
    }

    /// Generates a question set and moves `Input -> Questions`. A second call
    /// while one is already in flight is dropped (the UI disables the button;
    /// this is the backstop). Failure surfaces on `session.error` and the
    /// phase stays put.
    pub async fn generate(&self, input: GenerateInput) -> Result<(), Error> {
        if input.job_role.trim().is_empty() || input.company.trim().is_empty() {
            return Err(self.fail(Error::Validation(
                "Please fill in both job role and company.".to_string(),
            )));
        }

        let version = {
            let mut session = self.session.lock();
            if !matches!(session.phase, Phase::Input | Phase::Questions) {
                return Err(Error::Validation(
                    "Finish or reset the current interview before generating new questions.".to_string(),
                ));
            }
            if session.pending.generating {
                debug!("Generation already in flight, dropping duplicate request");
                return Ok(());
            }
            session.pending.generating = true;
            session.error = None;
            session.version()
        };

        let result = self.service.generate_questions(&input).await;

        let mut session = self.session.lock();
        // The gate belongs to the action category, not to the stamped
        // question: release it even when the completion itself is stale,
        // otherwise the action stays blocked with nothing in flight.
        session.pending.generating = false;
        if session.version() != version {
            debug!("Dropping stale question-generation result");
            return Ok(());
        }

        match result {
            Ok(generated) => {
                info!(
                    "Received {} questions for {} @ {}",
                    generated.questions.len(),
                    input.job_role,
                    input.company
                );
                session.questions = generated.questions;
                session.question_set_id = generated.question_set_id;
                session.phase = Phase::Questions;
                Ok(())
            }
            Err(e) => {
                warn!("Question generation failed: {}", e);
                session.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Moves `Questions -> Mock`: first question becomes active and the timer
    /// starts from zero.
    pub fn start_mock(&self) -> Result<(), Error> {
        {
            let mut session = self.session.lock();
            if session.phase != Phase::Questions {
                return Err(Error::Validation(
                    "Generate questions before starting a mock interview.".to_string(),
                ));
            }
            if session.questions.is_empty() {
                return Err(Error::Validation(
                    "No questions to practice. Try generating again.".to_string(),
                ));
            }
            session.phase = Phase::Mock;
            session.current_index = 0;
            session.activate_question();
            info!("Mock interview started with {} questions", session.questions.len());
        }
        self.timer.lock().start(self.session.clone());
        Ok(())
    }

    /// Submits the current answer for feedback. Blank answers fail locally
    /// without a network call. The timer is frozen at the moment of
    /// submission; on failure it does not resume and the user may retry.
    pub async fn submit_answer(&self) -> Result<(), Error> {
        let (question_text, answer, elapsed, version) = {
            let mut session = self.session.lock();
            if session.phase != Phase::Mock {
                return Err(Error::Validation("No mock interview in progress.".to_string()));
            }
            if session.current_answer.trim().is_empty() {
                let e = Error::Validation("Please provide an answer before submitting.".to_string());
                session.error = Some(e.to_string());
                return Err(e);
            }
            if session.pending.submitting_answer {
                debug!("Answer submission already in flight, dropping duplicate");
                return Ok(());
            }
            let question_text = match session.current_question() {
                Some(question) => question.text.clone(),
                None => {
                    return Err(Error::Validation("No active question.".to_string()));
                }
            };
            session.pending.submitting_answer = true;
            session.error = None;
            (
                question_text,
                session.current_answer.clone(),
                session.elapsed_seconds,
                session.version(),
            )
        };

        // The pending flag already halts ticking; aborting the task as well
        // releases it for good.
        self.timer.lock().stop();

        let result = self.service.generate_feedback(&question_text, &answer, elapsed).await;

        let mut session = self.session.lock();
        session.pending.submitting_answer = false;
        if session.version() != version {
            debug!("Dropping stale feedback result");
            return Ok(());
        }

        match result {
            Ok(feedback) => {
                info!("Feedback received after {}s on question {}", elapsed, session.current_index + 1);
                session.feedback = feedback;
                session.elapsed_seconds = elapsed;
                Ok(())
            }
            Err(e) => {
                warn!("Feedback request failed: {}", e);
                session.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Fetches an optional follow-up question for the answer just given.
    /// Repeatable; a failure stores a fixed apology string instead of an
    /// error, because follow-ups are supplementary.
    pub async fn request_follow_up(&self) -> Result<(), Error> {
        let (question_text, answer, version) = {
            let mut session = self.session.lock();
            if session.phase != Phase::Mock || !session.feedback_visible() {
                return Err(Error::Validation(
                    "Follow-up questions are available after feedback.".to_string(),
                ));
            }
            if session.pending.fetching_follow_up {
                debug!("Follow-up already in flight, dropping duplicate");
                return Ok(());
            }
            let question_text = session
                .current_question()
                .map(|question| question.text.clone())
                .unwrap_or_default();
            session.pending.fetching_follow_up = true;
            (question_text, session.current_answer.clone(), session.version())
        };

        let result = self.service.generate_follow_up(&question_text, &answer).await;

        let mut session = self.session.lock();
        session.pending.fetching_follow_up = false;
        if session.version() != version {
            debug!("Dropping stale follow-up result");
            return Ok(());
        }

        match result {
            Ok(follow_up) => session.follow_up = follow_up,
            Err(e) => {
                warn!("Follow-up request failed, using fallback: {}", e);
                session.follow_up = FOLLOW_UP_FALLBACK.to_string();
            }
        }
        Ok(())
    }

    /// Moves to the next question, or to `Complete` after the last one.
    pub fn advance(&self) -> Result<(), Error> {
        let next_question = {
            let mut session = self.session.lock();
            if session.phase != Phase::Mock || !session.feedback_visible() {
                return Err(Error::Validation(
                    "Submit an answer and review feedback before moving on.".to_string(),
                ));
            }
            if session.current_index + 1 < session.questions.len() {
                session.current_index += 1;
                session.activate_question();
                info!(
                    "Advanced to question {}/{}",
                    session.current_index + 1,
                    session.questions.len()
                );
                true
            } else {
                session.phase = Phase::Complete;
                session.bump_version();
                info!("Mock interview complete");
                false
            }
        };

        if next_question {
            self.timer.lock().start(self.session.clone());
        } else {
            self.timer.lock().stop();
        }
        Ok(())
    }

    /// Discards the session from any state and returns to `Input`.
    pub fn reset(&self) {
        self.timer.lock().stop();
        self.session.lock().reset();
        info!("Session reset");
    }

    fn fail(&self, e: Error) -> Error {
        self.session.lock().error = Some(e.to_string());
        e
    }
}
