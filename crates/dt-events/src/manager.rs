//! Handler registration and buffered delivery.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::{Event, EventsResult};

/// Receives events.  Handlers are shared with their owners through
/// [`SharedHandler`], so the owner can read results after a flush.
pub trait EventHandler: Send {
    fn handle(&mut self, event: &Event);

    /// Called when a new iteration starts.
    fn reset(&mut self, _iteration: u32) {}

    /// Called when the owner is done with the handler for this iteration.
    fn finish(&mut self) -> EventsResult<()> {
        Ok(())
    }
}

pub type SharedHandler = Arc<Mutex<dyn EventHandler>>;

/// Registration token returned by [`EventsManager::add_handler`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct HandlerId(u64);

/// Buffers events and delivers them to handlers in registration order.
#[derive(Default)]
pub struct EventsManager {
    handlers:  Vec<(HandlerId, SharedHandler)>,
    buffer:    Vec<Event>,
    next_id:   u64,
    iteration: u32,
    delivered: u64,
}

fn lock(handler: &SharedHandler) -> MutexGuard<'_, dyn EventHandler + 'static> {
    handler.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl EventsManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_handler(&mut self, handler: SharedHandler) -> HandlerId {
        let id = HandlerId(self.next_id);
        self.next_id += 1;
        self.handlers.push((id, handler));
        id
    }

    pub fn remove_handler(&mut self, id: HandlerId) -> Option<SharedHandler> {
        let pos = self.handlers.iter().position(|(h, _)| *h == id)?;
        Some(self.handlers.remove(pos).1)
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// Queues `event` for the next [`flush`](Self::flush).
    pub fn process_event(&mut self, event: Event) {
        self.buffer.push(event);
    }

    /// Events queued but not yet delivered.
    pub fn pending(&self) -> &[Event] {
        &self.buffer
    }

    /// Delivers every queued event, in emission order, to every handler.
    /// Returns the number of events delivered.
    pub fn flush(&mut self) -> usize {
        let events = std::mem::take(&mut self.buffer);
        for (_, handler) in &self.handlers {
            let mut h = lock(handler);
            for event in &events {
                h.handle(event);
            }
        }
        self.delivered += events.len() as u64;
        events.len()
    }

    /// Drops queued events and resets all handlers for `iteration`.
    pub fn reset(&mut self, iteration: u32) {
        self.buffer.clear();
        self.iteration = iteration;
        self.delivered = 0;
        for (_, handler) in &self.handlers {
            lock(handler).reset(iteration);
        }
    }

    /// Iteration passed to the last [`reset`](Self::reset).
    pub fn iteration(&self) -> u32 {
        self.iteration
    }

    /// Events delivered since the last reset.
    pub fn delivered(&self) -> u64 {
        self.delivered
    }
}
