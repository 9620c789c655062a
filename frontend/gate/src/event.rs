use std::{cell::RefCell, rc::Rc};

use tracing::debug;

use crate::element::{Element, Page};

fn non_empty(id: Option<&str>) -> Option<&str> {
    id.filter(|id| !id.is_empty())
}

/// Fired just before an outbound request tied to a page element.
#[derive(Debug)]
pub struct BeforeRequest<'a> {
    target: Option<&'a str>,
    cancelled: bool,
}

impl<'a> BeforeRequest<'a> {
    pub fn new(target: Option<&'a str>) -> Self {
        Self {
            target,
            cancelled: false,
        }
    }

    pub fn target(&self) -> Option<&'a str> {
        non_empty(self.target)
    }

    /// Suppresses the pending request. There is no way to undo this.
    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }
}

/// Fired after a response has been merged into the page.
#[derive(Debug, Clone, Copy)]
pub struct AfterSwap<'a> {
    target: Option<&'a str>,
}

impl<'a> AfterSwap<'a> {
    pub fn new(target: Option<&'a str>) -> Self {
        Self { target }
    }

    pub fn target(&self) -> Option<&'a str> {
        non_empty(self.target)
    }
}

/// Fired before a newly inserted node is activated.
#[derive(Debug, Clone, Copy)]
pub struct BeforeProcessNode<'a> {
    pub source: Option<&'a Element>,
    pub target: Option<&'a Element>,
}

impl<'a> BeforeProcessNode<'a> {
    pub fn new(source: Option<&'a Element>, target: Option<&'a Element>) -> Self {
        Self { source, target }
    }

    /// Same node as both source and target, which is how a processed node reports itself.
    pub fn on(node: &'a Element) -> Self {
        Self::new(Some(node), Some(node))
    }
}

/// Message received over a server-push connection.
#[derive(Debug, Clone, Copy)]
pub struct SseMessage<'a> {
    pub data: &'a str,
}

/// Handlers for the page lifecycle events. Every method defaults to a no-op.
pub trait Listener {
    fn before_request(&mut self, _event: &mut BeforeRequest<'_>) {}

    fn after_swap(&mut self, _event: &AfterSwap<'_>, _page: &mut dyn Page) {}

    fn before_process_node(&mut self, _event: &BeforeProcessNode<'_>) {}

    fn sse_message(&mut self, _event: &SseMessage<'_>) {}
}

impl<L: Listener + ?Sized> Listener for Rc<RefCell<L>> {
    fn before_request(&mut self, event: &mut BeforeRequest<'_>) {
        self.borrow_mut().before_request(event);
    }

    fn after_swap(&mut self, event: &AfterSwap<'_>, page: &mut dyn Page) {
        self.borrow_mut().after_swap(event, page);
    }

    fn before_process_node(&mut self, event: &BeforeProcessNode<'_>) {
        self.borrow_mut().before_process_node(event);
    }

    fn sse_message(&mut self, event: &SseMessage<'_>) {
        self.borrow_mut().sse_message(event);
    }
}

/// Logs server-push messages. Diagnostic only.
#[derive(Debug, Default)]
pub struct SseLogger {
    seen: usize,
}

impl SseLogger {
    pub fn seen(&self) -> usize {
        self.seen
    }
}

impl Listener for SseLogger {
    fn sse_message(&mut self, event: &SseMessage<'_>) {
        self.seen += 1;
        debug!(data = event.data, seen = self.seen, "sse message");
    }
}
