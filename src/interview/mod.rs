pub mod controller;
pub mod questions;
pub mod service;
pub mod session;
pub mod timer;

pub use controller::{SessionController, FOLLOW_UP_FALLBACK};
pub use questions::{Difficulty, Question, QuestionType};
pub use service::{GenerateInput, GeneratedQuestions, InterviewService, UserContext};
pub use session::{PendingFlags, Phase, Session};
pub use timer::QuestionTimer;
