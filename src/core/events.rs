//! Outbound events for the presentation layer

use tokio::sync::mpsc::UnboundedSender;

use crate::types::PipelineEvent;

/// Receives run events. Delivery is synchronous and in emission order.
pub trait EventSink {
    fn emit(&self, event: PipelineEvent);
}

impl<F> EventSink for F
where
    F: Fn(PipelineEvent),
{
    fn emit(&self, event: PipelineEvent) {
        self(event)
    }
}

impl EventSink for UnboundedSender<PipelineEvent> {
    fn emit(&self, event: PipelineEvent) {
        // A closed receiver means nobody is watching anymore; the run carries on.
        let _ = self.send(event);
    }
}

/// Discards every event
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&self, _event: PipelineEvent) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[test]
    fn test_closure_sink() {
        let seen = RefCell::new(Vec::new());
        let sink = |event: PipelineEvent| seen.borrow_mut().push(event);
        sink.emit(PipelineEvent::Failed { message: "x".into() });
        assert_eq!(seen.borrow().len(), 1);
    }

    #[test]
    fn test_channel_sink_survives_closed_receiver() {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        drop(rx);
        tx.emit(PipelineEvent::Failed { message: "x".into() });
    }
}
