use tracing::debug;

use crate::{
    ANSWER_PREFIX, FORM_ID, PUSH_MARKER, TEXT_INPUT_ID,
    element::{Element, Page},
    event::{AfterSwap, BeforeProcessNode, BeforeRequest, Listener},
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GateState {
    /// Previous answer cycle finished, the form may be submitted.
    #[default]
    Open,
    /// A submission was accepted and its answer has not started rendering.
    Closed,
}

/// Allows at most one in-flight form submission.
///
/// Expects the events of one request in the order before-request, after-swap,
/// before-node-processed. Events for other targets are ignored.
#[derive(Debug, Default)]
pub struct SubmissionGate {
    state: GateState,
}

impl SubmissionGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == GateState::Open
    }

    fn transition(&mut self, next: GateState) {
        if self.state != next {
            debug!(from = ?self.state, to = ?next, "gate transition");
        }
        self.state = next;
    }
}

fn is_answer_node(node: Option<&Element>) -> bool {
    node.is_some_and(|node| {
        node.id().is_some_and(|id| id.starts_with(ANSWER_PREFIX)) && !node.has_attribute(PUSH_MARKER)
    })
}

impl Listener for SubmissionGate {
    fn before_request(&mut self, event: &mut BeforeRequest<'_>) {
        if event.target() == Some(FORM_ID) && self.state == GateState::Closed {
            debug!("form submission cancelled, answer still pending");
            event.cancel();
        }
    }

    fn after_swap(&mut self, event: &AfterSwap<'_>, page: &mut dyn Page) {
        if event.target() != Some(FORM_ID) {
            return;
        }

        if let Some(input) = page.element_mut(TEXT_INPUT_ID) {
            input.value.clear();
        }
        self.transition(GateState::Closed);
    }

    fn before_process_node(&mut self, event: &BeforeProcessNode<'_>) {
        if is_answer_node(event.source) && is_answer_node(event.target) {
            self.transition(GateState::Open);
        }
    }
}
