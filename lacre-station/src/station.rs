//! Operator session
//!
//! [`Station`] holds the session working set and turns every operator
//! action into exactly one [`Notification`]: notifications are the
//! operator's only outcome channel, so station methods return plain
//! values and never a typed error. Programmatic callers that want typed
//! errors use [`LabelBatch`] and [`PrintOrchestrator`] directly.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use lacre_printer::ConnectError;
use tracing::instrument;

use crate::batch::LabelBatch;
use crate::label::LabelId;
use crate::notify::{Notification, NotificationSink};
use crate::orchestrator::{PrintError, PrintOrchestrator};

/// One operator's working set and printer
pub struct Station {
    max_labels: usize,
    batch: LabelBatch,
    orchestrator: PrintOrchestrator,
    sink: Arc<dyn NotificationSink>,
}

impl Station {
    pub fn new(
        orchestrator: PrintOrchestrator,
        sink: Arc<dyn NotificationSink>,
        max_labels: usize,
    ) -> Self {
        Self {
            max_labels,
            batch: LabelBatch::default(),
            orchestrator,
            sink,
        }
    }

    /// The current working set
    pub fn batch(&self) -> &LabelBatch {
        &self.batch
    }

    pub fn is_connected(&self) -> bool {
        self.orchestrator.is_connected()
    }

    /// Connect the printer; a cancelled device pick is a no-op
    #[instrument(skip(self))]
    pub async fn connect(&mut self) -> bool {
        match self.orchestrator.connect().await {
            Ok(()) => {
                self.notify(Notification::success("Printer connected"));
                true
            }
            Err(ConnectError::Cancelled) => {
                self.notify(Notification::info("Device selection cancelled"));
                false
            }
            Err(e) => {
                self.notify(Notification::error(format!("Failed to connect: {}", e)));
                false
            }
        }
    }

    /// Generate a sequential batch, replacing the working set on success
    ///
    /// A validation failure leaves the previous batch untouched.
    #[instrument(skip(self, package_id))]
    pub fn generate(&mut self, package_id: &str, quantity: i64) -> bool {
        match LabelBatch::generate(package_id, quantity, self.max_labels) {
            Ok(batch) => {
                let count = batch.len();
                self.batch = batch;
                self.notify(Notification::success(format!("{} labels generated", count)));
                true
            }
            Err(e) => {
                self.notify(Notification::error(e.to_string()));
                false
            }
        }
    }

    /// Parse pasted label ids, replacing the working set on success
    #[instrument(skip(self, raw_text))]
    pub fn prepare_reprint(&mut self, raw_text: &str) -> bool {
        match LabelBatch::reprint(raw_text) {
            Ok(batch) => {
                let count = batch.len();
                self.batch = batch;
                self.notify(Notification::success(format!(
                    "{} labels ready for reprint",
                    count
                )));
                true
            }
            Err(e) => {
                self.notify(Notification::error(e.to_string()));
                false
            }
        }
    }

    /// Drop the working set
    pub fn clear(&mut self) {
        self.batch = LabelBatch::default();
        self.notify(Notification::info("Fields and results cleared"));
    }

    /// Print a single label
    #[instrument(skip(self, id), fields(label = %id))]
    pub async fn print_one(&mut self, id: &LabelId) -> bool {
        match self.orchestrator.print_one(id).await {
            Ok(()) => {
                self.notify(Notification::success("Print command sent"));
                true
            }
            Err(e) => {
                self.notify(Notification::error(format!("Failed to print: {}", e)));
                false
            }
        }
    }

    /// Print the whole working set as one transfer
    #[instrument(skip(self))]
    pub async fn print_all(&mut self) -> bool {
        let count = self.batch.len();
        match self.orchestrator.print_all(&self.batch).await {
            Ok(()) => {
                self.notify(Notification::success(format!(
                    "{} labels sent to the printer",
                    count
                )));
                true
            }
            Err(PrintError::EmptyBatch) => {
                self.notify(Notification::warning("No labels to print"));
                false
            }
            Err(e) => {
                self.notify(Notification::error(format!("Failed to print batch: {}", e)));
                false
            }
        }
    }

    /// Write the working set to a print-ready file
    #[instrument(skip(self, dir))]
    pub async fn download(&mut self, dir: &Path) -> Option<PathBuf> {
        match self.orchestrator.download(&self.batch, dir).await {
            Ok(path) => {
                self.notify(Notification::success(format!(
                    "Labels file ready: {}",
                    path.display()
                )));
                Some(path)
            }
            Err(PrintError::EmptyBatch) => {
                self.notify(Notification::warning("No labels to download"));
                None
            }
            Err(e) => {
                self.notify(Notification::error(format!(
                    "Failed to write labels file: {}",
                    e
                )));
                None
            }
        }
    }

    fn notify(&self, notification: Notification) {
        self.sink.publish(notification);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::{MemorySink, Severity};
    use crate::template::LabelTemplate;
    use async_trait::async_trait;
    use lacre_printer::{ConnectResult, SendError, SendResult, Transport};

    struct OfflineTransport;

    #[async_trait]
    impl Transport for OfflineTransport {
        async fn connect(&mut self) -> ConnectResult<()> {
            Err(ConnectError::Cancelled)
        }

        async fn send(&mut self, _zpl: &str) -> SendResult<()> {
            Err(SendError::NotConnected)
        }

        fn is_connected(&self) -> bool {
            false
        }
    }

    fn offline_station(sink: Arc<MemorySink>) -> Station {
        let orchestrator =
            PrintOrchestrator::new(Box::new(OfflineTransport), LabelTemplate::Process);
        Station::new(orchestrator, sink, 50)
    }

    #[test]
    fn test_generate_replaces_batch_and_notifies_once() {
        let sink = Arc::new(MemorySink::new());
        let mut station = offline_station(sink.clone());

        assert!(station.generate("X", 3));
        assert_eq!(station.batch().len(), 3);

        let published = sink.drain();
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].severity, Severity::Success);
    }

    #[test]
    fn test_failed_generate_keeps_previous_batch() {
        let sink = Arc::new(MemorySink::new());
        let mut station = offline_station(sink.clone());

        assert!(station.generate("X", 3));
        sink.drain();

        assert!(!station.generate("X", 0));
        assert_eq!(station.batch().len(), 3);

        let published = sink.drain();
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].severity, Severity::Error);
    }

    #[tokio::test]
    async fn test_cancelled_connect_is_benign() {
        let sink = Arc::new(MemorySink::new());
        let mut station = offline_station(sink.clone());

        assert!(!station.connect().await);

        let published = sink.drain();
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].severity, Severity::Info);
    }

    #[tokio::test]
    async fn test_print_all_empty_batch_warns() {
        let sink = Arc::new(MemorySink::new());
        let mut station = offline_station(sink.clone());

        assert!(!station.print_all().await);

        let published = sink.drain();
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].severity, Severity::Warning);
    }

    #[tokio::test]
    async fn test_send_failure_keeps_batch() {
        let sink = Arc::new(MemorySink::new());
        let mut station = offline_station(sink.clone());
        station.generate("X", 2);
        sink.drain();

        assert!(!station.print_all().await);
        assert_eq!(station.batch().len(), 2);

        let published = sink.drain();
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].severity, Severity::Error);
    }
}
