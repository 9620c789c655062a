//! # Server-Sent Events
//!
//! Two streams, both consumed by `hx-sse` on the page.
//!
//! - `/counter`: ticks forever, `<p>counter=N</p>` every `COUNTER_INTERVAL_MS`
//! - `/processed`: at most one event carrying the next pending answer node, then closes
use std::{convert::Infallible, sync::Arc, time::Duration};

use axum::{
    extract,
    response::sse::{Event, KeepAlive, Sse},
};
use futures_util::{
    Stream, StreamExt,
    future::ready,
    stream::{once, unfold},
};
use tokio::time::{sleep, timeout};
use tracing::{error, info, warn};

use crate::{error::AppError, state::State};

/// Logs when the client goes away and axum drops the stream before it finished.
struct Disconnect {
    path: &'static str,
    finished: bool,
}

impl Disconnect {
    fn new(path: &'static str) -> Self {
        Self {
            path,
            finished: false,
        }
    }
}

impl Drop for Disconnect {
    fn drop(&mut self) {
        if !self.finished {
            info!("Client closed {}", self.path);
        }
    }
}

pub async fn counter_handler(
    extract::State(state): extract::State<Arc<State>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let interval = state.config.counter_interval;
    let stream = unfold((0u64, Disconnect::new("/counter")), move |(i, guard)| {
        tick(interval, i, guard)
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}

async fn tick(
    interval: Duration,
    i: u64,
    guard: Disconnect,
) -> Option<(Result<Event, Infallible>, (u64, Disconnect))> {
    sleep(interval).await;

    let event = Event::default().data(format!("<p>counter={i}</p>"));
    Some((Ok(event), (i + 1, guard)))
}

pub async fn processed_handler(
    extract::State(state): extract::State<Arc<State>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let mut guard = Disconnect::new("/processed");
    let stream = once(next_answer(state)).filter_map(move |event| {
        guard.finished = true;
        ready(event)
    });

    Sse::new(stream)
}

async fn next_answer(state: Arc<State>) -> Option<Result<Event, Infallible>> {
    let wait = state.config.answer_timeout();
    let received = timeout(wait, async { state.pending.lock().await.recv().await }).await;

    match received {
        Ok(Some(answer)) => match state.templates.answer(&answer) {
            Ok(html) => {
                info!(id = answer.id, "Streaming answer");
                Some(Ok(Event::default().data(html)))
            }
            Err(e) => {
                error!(id = answer.id, "Failed to render answer: {e}");
                None
            }
        },
        Ok(None) => {
            warn!("Answer channel closed");
            None
        }
        Err(_) => {
            info!("timeout {}", state.config.process_delay);
            None
        }
    }
}

pub async fn processed_not_allowed() -> AppError {
    AppError::StreamMethodNotAllowed
}
