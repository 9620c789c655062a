//! # Answers
//!
//! Every accepted question is echoed right away, then answered again in the
//! background after `PROCESS_DELAY_SECS`. The background answer waits in the
//! pending channel until a `/processed` stream picks it up.
//!
//! - One answer goes to at most one stream
//! - Streams that find nothing within `PROCESS_DELAY_SECS + 1` seconds close empty
//! - Answers nobody asks for stay queued for the next stream, up to `ANSWER_BACKLOG`
//! - Past the backlog new answers are dropped with a warning
use std::{sync::Arc, time::Duration};

use tokio::{sync::mpsc::error::TrySendError, time::sleep};
use tracing::{info, warn};

use crate::state::State;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answer {
    pub id: u64,
    pub text: String,
}

pub fn process(text: &str, delay: u64) -> String {
    if delay > 0 {
        format!("You have entered: {text}. Waited {delay} seconds")
    } else {
        format!("You have entered: {text}")
    }
}

pub fn spawn_answer(state: Arc<State>, id: u64, question: String) {
    let delay = state.config.process_delay;

    tokio::spawn(async move {
        sleep(Duration::from_secs(delay)).await;

        let text = process(&question, delay);
        info!(id, "Processed answer: {text}");

        match state.answers.try_send(Answer { id, text }) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => warn!(id, "Answer backlog full, dropping answer"),
            Err(TrySendError::Closed(_)) => warn!(id, "Answer channel closed, dropping answer"),
        }
    });
}
