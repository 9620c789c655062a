use std::{cell::RefCell, rc::Rc};

use anyhow::{Context, Result};
use gate::{
    BeforeProcessNode, Document, Element, EventBus, FORM_ID, PUSH_MARKER, SseLogger,
    SubmissionGate, TEXT_INPUT_ID,
};
use reqwest::Client;
use tracing::{debug, info};

use crate::sse::{answer_id, data_lines};

#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Answer node received and processed, gate is open again.
    Answered(String),
    /// Posted without waiting for the answer, gate stays closed.
    Submitted,
    /// Stream closed without an answer.
    Unanswered,
    /// Gate refused the submission, nothing was sent.
    Cancelled,
}

/// Headless page: an in-memory document wired to a gate, talking to a live server.
pub struct Session {
    client: Client,
    base_url: String,
    bus: EventBus,
    gate: Rc<RefCell<SubmissionGate>>,
    page: Document,
}

impl Session {
    pub fn new(base_url: &str) -> Self {
        let gate = Rc::new(RefCell::new(SubmissionGate::new()));

        let mut bus = EventBus::new();
        bus.subscribe(gate.clone());
        bus.subscribe(SseLogger::default());

        let mut page = Document::new();
        page.insert(Element::new(FORM_ID));
        page.insert(Element::new(TEXT_INPUT_ID));

        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            bus,
            gate,
            page,
        }
    }

    pub fn gate_open(&self) -> bool {
        self.gate.borrow().is_open()
    }

    pub async fn ask(&mut self, question: &str, wait: bool) -> Result<Outcome> {
        self.page.set_value(TEXT_INPUT_ID, question);

        if !self.bus.before_request(Some(FORM_ID)) {
            info!("Gate closed, dropping question: {question}");
            return Ok(Outcome::Cancelled);
        }

        let input = self.page.value(TEXT_INPUT_ID).unwrap_or_default().to_string();
        let snippet = self
            .client
            .post(format!("{}/", self.base_url))
            .form(&[("input_text", input.as_str())])
            .send()
            .await
            .context("Failed to submit form")?
            .error_for_status()?
            .text()
            .await?;
        debug!("Snippet: {snippet}");

        self.bus.after_swap(Some(FORM_ID), &mut self.page);

        if let Some(slot_id) = answer_id(&snippet) {
            let slot = Element::new(slot_id).with_attribute(PUSH_MARKER);
            self.bus.before_process_node(BeforeProcessNode::on(&slot));
            self.page.insert(slot);
        }

        if !wait {
            return Ok(Outcome::Submitted);
        }

        let body = self
            .client
            .get(format!("{}/processed", self.base_url))
            .send()
            .await
            .context("Failed to open answer stream")?
            .error_for_status()?
            .text()
            .await?;

        let mut answer = None;
        for data in data_lines(&body) {
            self.bus.sse_message(data);

            if let Some(node_id) = answer_id(data) {
                let node = Element::new(node_id).with_value(data);
                self.bus.before_process_node(BeforeProcessNode::on(&node));
                self.page.insert(node);
                answer = Some(data.to_string());
            }
        }

        Ok(answer.map_or(Outcome::Unanswered, Outcome::Answered))
    }
}
