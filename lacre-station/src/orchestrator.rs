//! Print orchestration
//!
//! Takes the working set, renders it through the label template and
//! pushes it through the transport - or writes the same payload to a
//! print-ready artifact file. The orchestrator owns its transport, so
//! overlapping sends on one connection cannot happen.

use std::path::{Path, PathBuf};

use lacre_printer::{ConnectError, SendError, Transport};
use thiserror::Error;
use tracing::{info, instrument};

use crate::batch::LabelBatch;
use crate::label::LabelId;
use crate::template::LabelTemplate;

/// Artifact name for batches that carry no package id
const DEFAULT_ARTIFACT_NAME: &str = "etiquetas.txt";

/// Errors delivering a batch
#[derive(Debug, Error)]
pub enum PrintError {
    /// The working set is empty - nothing to print or download
    #[error("no labels to print")]
    EmptyBatch,

    #[error(transparent)]
    Connect(#[from] ConnectError),

    #[error(transparent)]
    Send(#[from] SendError),

    /// IO error writing the download artifact
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for orchestration operations
pub type PrintResult<T> = Result<T, PrintError>;

/// Renders labels and delivers them through one transport
pub struct PrintOrchestrator {
    transport: Box<dyn Transport>,
    template: LabelTemplate,
}

impl PrintOrchestrator {
    pub fn new(transport: Box<dyn Transport>, template: LabelTemplate) -> Self {
        Self {
            transport,
            template,
        }
    }

    pub fn template(&self) -> LabelTemplate {
        self.template
    }

    /// Connect the underlying transport
    pub async fn connect(&mut self) -> Result<(), ConnectError> {
        self.transport.connect().await
    }

    pub fn is_connected(&self) -> bool {
        self.transport.is_connected()
    }

    /// Render and send a single label
    #[instrument(skip(self, id), fields(label = %id))]
    pub async fn print_one(&mut self, id: &LabelId) -> PrintResult<()> {
        let zpl = self.template.render(id);
        self.transport.send(&zpl).await?;
        Ok(())
    }

    /// Render and send the whole batch as one transfer
    ///
    /// The blocks are concatenated in batch order and delivered in a
    /// single send; a failure inside that send is one failure for the
    /// whole batch.
    #[instrument(skip(self, batch), fields(labels = batch.len()))]
    pub async fn print_all(&mut self, batch: &LabelBatch) -> PrintResult<()> {
        if batch.is_empty() {
            return Err(PrintError::EmptyBatch);
        }

        let payload = self.payload(batch);
        self.transport.send(&payload).await?;

        info!(labels = batch.len(), "Batch sent");
        Ok(())
    }

    /// The exact payload `print_all` would deliver for this batch
    pub fn payload(&self, batch: &LabelBatch) -> String {
        self.template.render_batch(batch)
    }

    /// Write the batch payload to a print-ready text file
    ///
    /// The file is named from the batch's package id when it has one
    /// and is byte-identical to the direct-print payload, so it can be
    /// copied to a printer later.
    #[instrument(skip(self, batch), fields(labels = batch.len()))]
    pub async fn download(&self, batch: &LabelBatch, dir: &Path) -> PrintResult<PathBuf> {
        if batch.is_empty() {
            return Err(PrintError::EmptyBatch);
        }

        let payload = self.payload(batch);
        let name = match batch.package_id() {
            Some(package_id) => format!("{}-{}", package_id, DEFAULT_ARTIFACT_NAME),
            None => DEFAULT_ARTIFACT_NAME.to_string(),
        };
        let path = dir.join(name);

        tokio::fs::write(&path, payload.as_bytes()).await?;

        info!(path = %path.display(), bytes = payload.len(), "Artifact written");
        Ok(path)
    }
}
