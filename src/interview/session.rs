use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::questions::Question;

/// Where the user currently is in the interview flow. `Complete` is terminal
/// until an explicit reset returns to `Input`.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Input,
    Questions,
    Mock,
    Complete,
}

/// At-most-one-in-flight gates, one per async action category.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PendingFlags {
    pub generating: bool,
    pub submitting_answer: bool,
    pub fetching_follow_up: bool,
}

impl PendingFlags {
    pub fn any(&self) -> bool {
        self.generating || self.submitting_answer || self.fetching_follow_up
    }
}

/// The live interview session. Only the controller mutates it, one whole
/// transition at a time; the UI reads snapshots between transitions.
///
/// `version` stamps every in-flight async call: transitions that change the
/// active question or phase bump it, and a completion whose stamp no longer
/// matches is dropped instead of overwriting unrelated state.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Session {
    pub id: String,
    pub started_at: DateTime<Utc>,
    pub phase: Phase,
    pub questions: Vec<Question>,
    pub question_set_id: Option<String>,
    pub current_index: usize,
    pub current_answer: String,
    pub feedback: String,
    pub follow_up: String,
    pub elapsed_seconds: u64,
    pub error: Option<String>,
    pub pending: PendingFlags,
    #[serde(skip)]
    version: u64,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            started_at: Utc::now(),
            phase: Phase::Input,
            questions: Vec::new(),
            question_set_id: None,
            current_index: 0,
            current_answer: String::new(),
            feedback: String::new(),
            follow_up: String::new(),
            elapsed_seconds: 0,
            error: None,
            pending: PendingFlags::default(),
            version: 0,
        }
    }
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn bump_version(&mut self) {
        self.version += 1;
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current_index)
    }

    /// The feedback panel is visible once a non-empty feedback string is
    /// stored; that also marks the current question as answered.
    pub fn feedback_visible(&self) -> bool {
        !self.feedback.is_empty()
    }

    /// True while the per-question timer should be ticking. Submission
    /// freezes the clock immediately so the reported time reflects the moment
    /// of submission, not of response arrival.
    pub fn timer_should_run(&self) -> bool {
        self.phase == Phase::Mock && !self.feedback_visible() && !self.pending.submitting_answer
    }

    /// Clears per-question state when a question becomes active.
    pub fn activate_question(&mut self) {
        self.current_answer.clear();
        self.feedback.clear();
        self.follow_up.clear();
        self.elapsed_seconds = 0;
        self.error = None;
        self.bump_version();
    }

    /// Returns to a pristine `Input` session with a fresh id. The version
    /// keeps increasing so completions from the old life are dropped.
    pub fn reset(&mut self) {
        let version = self.version + 1;
        *self = Session {
            version,
            ..Session::default()
        };
    }
}
