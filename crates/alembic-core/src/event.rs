//! Furniture enter/exit notifications and their synchronous dispatch.
//!
//! The host pushes each notification through [`FurnitureEventSource::dispatch`]
//! on its own thread. Sinks run in registration order and must return
//! quickly; a sink returning [`EventControl::Stop`] ends delivery of that
//! event to later sinks.

use crate::host::Host;
use crate::id::*;

/// Which way the actor moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FurnitureEventKind {
    Enter,
    Exit,
}

/// An actor started or stopped using a piece of furniture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FurnitureEvent {
    pub actor: ActorId,
    pub furniture: FurnitureId,
    pub kind: FurnitureEventKind,
}

impl FurnitureEvent {
    pub fn enter(actor: ActorId, furniture: FurnitureId) -> Self {
        Self {
            actor,
            furniture,
            kind: FurnitureEventKind::Enter,
        }
    }

    pub fn exit(actor: ActorId, furniture: FurnitureId) -> Self {
        Self {
            actor,
            furniture,
            kind: FurnitureEventKind::Exit,
        }
    }
}

/// Returned by sinks to continue or end delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventControl {
    Continue,
    Stop,
}

/// Receives furniture notifications.
pub trait EventSink {
    fn process_event(&mut self, event: &FurnitureEvent, host: &mut dyn Host) -> EventControl;
}

/// Registered sinks, in registration order.
#[derive(Default)]
pub struct FurnitureEventSource {
    sinks: Vec<Box<dyn EventSink>>,
    delivered: u64,
}

impl std::fmt::Debug for FurnitureEventSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FurnitureEventSource")
            .field("sinks", &self.sinks.len())
            .field("delivered", &self.delivered)
            .finish()
    }
}

impl FurnitureEventSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_sink(&mut self, sink: Box<dyn EventSink>) {
        self.sinks.push(sink);
    }

    pub fn sink_count(&self) -> usize {
        self.sinks.len()
    }

    /// Total events dispatched since creation.
    pub fn delivered(&self) -> u64 {
        self.delivered
    }

    /// Deliver `event` to every sink until one stops it.
    pub fn dispatch(&mut self, event: &FurnitureEvent, host: &mut dyn Host) -> EventControl {
        self.delivered += 1;
        for sink in &mut self.sinks {
            if sink.process_event(event, host) == EventControl::Stop {
                return EventControl::Stop;
            }
        }
        EventControl::Continue
    }
}
