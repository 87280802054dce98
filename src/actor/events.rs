//! Behavior-event sinks for script listeners attached to actors

use std::cell::RefCell;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::types::ActorId;

/// Receives named events broadcast by actors. Delivery is fire-and-forget.
pub trait EventSink {
    fn emit(&self, source: ActorId, name: &str, args: &[Value]);
}

/// Logs every event at debug level
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingEventSink;

impl EventSink for TracingEventSink {
    fn emit(&self, source: ActorId, name: &str, args: &[Value]) {
        tracing::debug!("Script event {} from actor {}: {:?}", name, source, args);
    }
}

/// A captured script event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptEvent {
    pub source: ActorId,
    pub name: String,
    pub args: Vec<Value>,
}

/// Buffers events for hosts that drain them once per frame
#[derive(Debug, Default)]
pub struct EventQueue {
    events: RefCell<Vec<ScriptEvent>>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }

    /// Take every buffered event, oldest first
    pub fn drain(&self) -> Vec<ScriptEvent> {
        std::mem::take(&mut *self.events.borrow_mut())
    }
}

impl EventSink for EventQueue {
    fn emit(&self, source: ActorId, name: &str, args: &[Value]) {
        self.events.borrow_mut().push(ScriptEvent {
            source,
            name: name.to_string(),
            args: args.to_vec(),
        });
    }
}
