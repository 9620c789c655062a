use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use tokio::sync::{
    Mutex,
    mpsc::{Receiver, Sender, channel},
};

use super::{answer::Answer, config::Config, error::AppError, templates::Templates};

pub struct State {
    pub config: Config,
    pub templates: Templates,
    pub answers: Sender<Answer>,
    pub pending: Mutex<Receiver<Answer>>,
    next_id: AtomicU64,
}

impl State {
    pub fn new(config: Config) -> Result<Arc<Self>, AppError> {
        let templates = Templates::new()?;
        let (answers, pending) = channel(config.answer_backlog.max(1));

        Ok(Arc::new(Self {
            config,
            templates,
            answers,
            pending: Mutex::new(pending),
            next_id: AtomicU64::new(0),
        }))
    }

    /// Sequence number for the next accepted submission, starting at 0.
    pub fn next_submission_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }
}
