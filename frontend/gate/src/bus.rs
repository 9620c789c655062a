use crate::{
    element::Page,
    event::{AfterSwap, BeforeProcessNode, BeforeRequest, Listener, SseMessage},
};

/// Synchronous dispatcher for the page lifecycle events.
///
/// Listeners run in subscription order and each dispatch finishes before the
/// call returns. The host must deliver the events of one request in the order
/// before-request, after-swap, before-node-processed; the bus does not reorder.
#[derive(Default)]
pub struct EventBus {
    listeners: Vec<Box<dyn Listener>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<L: Listener + 'static>(&mut self, listener: L) {
        self.listeners.push(Box::new(listener));
    }

    /// Returns `true` if no listener cancelled the request.
    pub fn before_request(&mut self, target: Option<&str>) -> bool {
        let mut event = BeforeRequest::new(target);
        for listener in &mut self.listeners {
            listener.before_request(&mut event);
        }

        !event.is_cancelled()
    }

    pub fn after_swap(&mut self, target: Option<&str>, page: &mut dyn Page) {
        let event = AfterSwap::new(target);
        for listener in &mut self.listeners {
            listener.after_swap(&event, page);
        }
    }

    pub fn before_process_node(&mut self, event: BeforeProcessNode<'_>) {
        for listener in &mut self.listeners {
            listener.before_process_node(&event);
        }
    }

    pub fn sse_message(&mut self, data: &str) {
        let event = SseMessage { data };
        for listener in &mut self.listeners {
            listener.sse_message(&event);
        }
    }
}
