use std::sync::Arc;
use std::time::Duration;

use log::debug;
use parking_lot::Mutex;
use tokio::task::JoinHandle;

use super::session::Session;

/// Per-question wall-clock counter. Ticks `elapsed_seconds` once per second
/// while the session is in the mock phase and the current question has no
/// feedback yet. Stopping aborts the task outright; there is no pause.
pub struct QuestionTimer {
    handle: Option<JoinHandle<()>>,
}

impl QuestionTimer {
    pub fn new() -> Self {
        Self { handle: None }
    }

    /// Starts ticking from zero for the question that just became active.
    /// Any previous tick task is aborted first.
    pub fn start(&mut self, session: Arc<Mutex<Session>>) {
        self.stop();
        session.lock().elapsed_seconds = 0;

        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(1));
            // The first tick completes immediately; consume it so the counter
            // reads 0 for the first full second.
            interval.tick().await;
            loop {
                interval.tick().await;
                let mut session = session.lock();
                if !session.timer_should_run() {
                    break;
                }
                session.elapsed_seconds += 1;
            }
        });

        self.handle = Some(handle);
        debug!("Question timer started");
    }

    /// Stops the timer for good. The captured `elapsed_seconds` stays on the
    /// session, frozen at the moment of the call.
    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            debug!("Question timer stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().map(|h| !h.is_finished()).unwrap_or(false)
    }
}

impl Default for QuestionTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for QuestionTimer {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interview::session::Phase;

    fn mock_session() -> Arc<Mutex<Session>> {
        let mut session = Session::new();
        session.phase = Phase::Mock;
        Arc::new(Mutex::new(session))
    }

    async fn settle() {
        // Let the spawned tick task register its interval (before the clock
        // moves) or observe the advanced clock (after).
        for _ in 0..5 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_once_per_second() {
        let session = mock_session();
        let mut timer = QuestionTimer::new();
        timer.start(session.clone());
        settle().await;

        tokio::time::advance(Duration::from_secs(3)).await;
        settle().await;

        assert_eq!(session.lock().elapsed_seconds, 3);
        assert!(timer.is_running());
        timer.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn restart_resets_the_counter() {
        let session = mock_session();
        let mut timer = QuestionTimer::new();
        timer.start(session.clone());
        settle().await;

        tokio::time::advance(Duration::from_secs(5)).await;
        settle().await;
        assert_eq!(session.lock().elapsed_seconds, 5);

        timer.start(session.clone());
        assert_eq!(session.lock().elapsed_seconds, 0);
        settle().await;

        tokio::time::advance(Duration::from_secs(2)).await;
        settle().await;
        assert_eq!(session.lock().elapsed_seconds, 2);
        timer.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn stop_freezes_the_elapsed_value() {
        let session = mock_session();
        let mut timer = QuestionTimer::new();
        timer.start(session.clone());
        settle().await;

        tokio::time::advance(Duration::from_secs(4)).await;
        settle().await;
        timer.stop();

        tokio::time::advance(Duration::from_secs(10)).await;
        settle().await;

        assert_eq!(session.lock().elapsed_seconds, 4);
        assert!(!timer.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn visible_feedback_halts_ticking() {
        let session = mock_session();
        let mut timer = QuestionTimer::new();
        timer.start(session.clone());
        settle().await;

        tokio::time::advance(Duration::from_secs(2)).await;
        settle().await;

        session.lock().feedback = "Nice use of the STAR format.".to_string();

        tokio::time::advance(Duration::from_secs(5)).await;
        settle().await;

        assert_eq!(session.lock().elapsed_seconds, 2);
    }
}
