//! # lacre-station
//!
//! Label station for legal-process packages.
//!
//! ## Scope
//!
//! This crate handles WHAT to print and when:
//! - Label id formatting (`{package_id}-TJSP{seq}`)
//! - The two fixed ZPL label layouts
//! - Batch workflows: sequential generation and free-text reprint
//! - Print orchestration and the download artifact
//! - Operator notifications and env configuration
//!
//! HOW bytes reach a printer lives in `lacre-printer`.
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use lacre_station::{Config, LabelTemplate, PrintOrchestrator, Station, TracingSink};
//!
//! let config = Config::from_env();
//! let transport = config.build_transport()?;
//! let orchestrator = PrintOrchestrator::new(transport, LabelTemplate::Process);
//! let mut station = Station::new(orchestrator, Arc::new(TracingSink), config.max_labels);
//!
//! station.generate("9001941457766", 5);
//! station.connect().await;
//! station.print_all().await;
//! ```

pub mod batch;
pub mod config;
pub mod label;
pub mod notify;
pub mod orchestrator;
pub mod station;
pub mod template;

// Re-exports
pub use batch::{LabelBatch, ValidationError};
pub use config::{Config, TransportKind};
pub use label::{LabelId, SEQUENCE_INFIX};
pub use notify::{MemorySink, Notification, NotificationSink, Severity, TracingSink};
pub use orchestrator::{PrintError, PrintOrchestrator, PrintResult};
pub use station::Station;
pub use template::LabelTemplate;
