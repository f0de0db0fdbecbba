//! Widget state for the three panels of the interface.
//!
//! Each panel owns its state privately and turns user actions into requests;
//! responses come back through `on_response` methods.

pub mod analytics;
pub mod filter_form;
pub mod recommendations;

pub use analytics::{Analytics, ChartSeries};
pub use filter_form::{FilterForm, FormField};
pub use recommendations::{PageAction, PageRequest, Pagination, Recommendations};

/// Result of applying a response to a panel.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchStatus {
    /// Response applied; carries the number of records shown
    Applied(usize),
    /// A newer request is in flight; the response was dropped
    Stale,
    /// Request or response failed; previous state kept
    Failed(String),
}

/// Sequence numbers for the requests a panel issues.
///
/// Only the response to the newest request is applied, so a slow early
/// response can never overwrite a later one.
#[derive(Debug, Clone, Default)]
pub struct RequestSeq {
    latest: u64,
}

impl RequestSeq {
    /// Issue the sequence number for a new request.
    pub fn issue(&mut self) -> u64 {
        self.latest += 1;
        self.latest
    }

    /// Whether `seq` belongs to the newest issued request.
    pub fn is_current(&self, seq: u64) -> bool {
        seq == self.latest
    }
}

/// Run `f` with a subscriber that records formatted log lines.
#[cfg(test)]
pub(crate) fn capture_logs(f: impl FnOnce()) -> String {
    use std::io;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Sink(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Sink {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    let sink = Sink::default();
    let writer = sink.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .finish();
    tracing::subscriber::with_default(subscriber, f);

    let bytes = sink.0.lock().unwrap().clone();
    String::from_utf8_lossy(&bytes).into_owned()
}
