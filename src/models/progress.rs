use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressSignal {
    pub current: usize,
    pub total: usize,
}

/// Receives one signal per variant, before that variant's call is made.
pub trait ProgressSink: Send + Sync {
    fn on_progress(&self, signal: ProgressSignal);
}

impl<F> ProgressSink for F
where
    F: Fn(ProgressSignal) + Send + Sync,
{
    fn on_progress(&self, signal: ProgressSignal) {
        self(signal)
    }
}

/// Forwards signals into a channel so a UI task can consume them as a stream.
#[derive(Clone)]
pub struct ChannelProgressSink {
    tx: mpsc::UnboundedSender<ProgressSignal>,
}

impl ProgressSink for ChannelProgressSink {
    fn on_progress(&self, signal: ProgressSignal) {
        // receiver gone means nobody is watching
        let _ = self.tx.send(signal);
    }
}

pub fn progress_channel() -> (ChannelProgressSink, UnboundedReceiverStream<ProgressSignal>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (ChannelProgressSink { tx }, UnboundedReceiverStream::new(rx))
}
