//! # Submission Gate
//!
//! Client-side admission control for the question form.
//!
//! ## Flow
//!
//! - Page loads, gate is **open**
//! - User submits the form, `beforeRequest` fires on `form`, gate is open so the POST goes out
//! - Server answers with the question snippet, `afterSwap` fires on `form`
//! - Gate clears `text-input` and **closes**
//! - Any further `beforeRequest` on `form` is cancelled while closed
//! - The answer slot (`answer-stream-<id>`, carries `hx-sse`) receives the streamed answer
//! - The answer node (`answer-<id>`, no `hx-sse`) gets processed, `beforeProcessNode` fires
//! - Gate **opens** again
//!
//!
//!
//! ## Ordering
//!
//! The gate trusts the host to deliver the events of one request in the order
//! before-request, after-swap, before-node-processed. Nothing here reorders or
//! buffers events; dispatch is synchronous and runs to completion.
//!
//!
//!
//! ## Notes
//!
//! - The answer slot itself also starts with `answer`, which is why the push marker check exists.
//!   Without it the gate would reopen as soon as the slot is inserted, before any answer arrived.
//! - Server-push message events are only logged. They were never observed firing in the browser,
//!   so no transition depends on them.
//! - Missing or empty ids never match anything.

pub mod bus;
pub mod element;
pub mod event;
pub mod submission;

pub use bus::EventBus;
pub use element::{Document, Element, Page};
pub use event::{AfterSwap, BeforeProcessNode, BeforeRequest, Listener, SseLogger, SseMessage};
pub use submission::{GateState, SubmissionGate};

pub const FORM_ID: &str = "form";
pub const TEXT_INPUT_ID: &str = "text-input";
pub const ANSWER_PREFIX: &str = "answer";
pub const PUSH_MARKER: &str = "hx-sse";
