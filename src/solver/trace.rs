use log::trace;

use crate::model::Direction;

/// Something that happened inside one segment search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchEvent {
    Started { start: usize, targets: usize },
    Branched { at: usize, direction: Direction, segments: usize },
    Blocked { at: usize, segments: usize },
    Reached { target: usize, segments: usize },
    LimitReached { processed: usize },
    Finished { processed: usize, reached: usize },
}

/// Receives search internals. The default implementation drops them.
pub trait SearchTrace {
    fn record(&mut self, _event: &SearchEvent) {}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopTrace;

impl SearchTrace for NoopTrace {}

/// Forwards every event to the `path_search` log target.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogTrace;

impl SearchTrace for LogTrace {
    fn record(&mut self, event: &SearchEvent) {
        trace!(target: "path_search", "{:?}", event);
    }
}

/// Keeps every event; handy when asserting on search behaviour.
#[derive(Debug, Default, Clone)]
pub struct RecordingTrace {
    pub events: Vec<SearchEvent>,
}

impl SearchTrace for RecordingTrace {
    fn record(&mut self, event: &SearchEvent) {
        self.events.push(event.clone());
    }
}
