use crate::core::BodyHandle;
use std::collections::VecDeque;

/// Types of body events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyEventType {
    /// A body has been added to the world
    Added,

    /// A body has been removed from the world
    Removed,

    /// A body's pose was set explicitly rather than by the solver
    Placed,

    /// A body ended a step with non-finite state
    Diverged,
}

/// An event related to a single body
#[derive(Debug, Clone, PartialEq)]
pub struct BodyEvent {
    /// The type of body event
    pub event_type: BodyEventType,

    /// The body that the event refers to
    pub body: BodyHandle,
}

/// A queue of body events, cleared at the start of every step
#[derive(Debug, Default)]
pub struct EventQueue {
    body_events: VecDeque<BodyEvent>,
}

impl EventQueue {
    /// Creates a new empty event queue
    pub fn new() -> Self {
        Self {
            body_events: VecDeque::new(),
        }
    }

    /// Adds a body event to the queue
    pub fn push(&mut self, event_type: BodyEventType, body: BodyHandle) {
        self.body_events.push_back(BodyEvent { event_type, body });
    }

    /// Gets the next body event from the queue
    pub fn next_body_event(&mut self) -> Option<BodyEvent> {
        self.body_events.pop_front()
    }

    /// Returns whether the queue is empty
    pub fn is_empty(&self) -> bool {
        self.body_events.is_empty()
    }

    /// Returns the number of queued events
    pub fn len(&self) -> usize {
        self.body_events.len()
    }

    /// Clears all events from the queue
    pub fn clear(&mut self) {
        self.body_events.clear();
    }

    /// Iterates over the queued events in order
    pub fn iter(&self) -> impl Iterator<Item = &BodyEvent> {
        self.body_events.iter()
    }

    /// Gets all body events of a specific type
    pub fn of_type(&self, event_type: BodyEventType) -> Vec<&BodyEvent> {
        self.body_events
            .iter()
            .filter(|e| e.event_type == event_type)
            .collect()
    }

    /// Gets all body events for a specific body
    pub fn for_body(&self, body: BodyHandle) -> Vec<&BodyEvent> {
        self.body_events
            .iter()
            .filter(|e| e.body == body)
            .collect()
    }
}
