//! # lacre-printer
//!
//! ZPL thermal label library - low-level printing capabilities only.
//!
//! ## Scope
//!
//! This crate handles HOW to print:
//! - ZPL command building
//! - Field-data sanitizing and single-byte wire encoding
//! - USB printing (vendor-filtered claim and bulk transfer)
//! - Print-service daemon printing (local HTTP broker)
//! - Network printing (raw TCP port 9100)
//!
//! Business logic (WHAT to print) should stay in application code:
//! - Label layouts and batch workflows → lacre-station
//!
//! ## Example
//!
//! ```ignore
//! use lacre_printer::{Transport, UsbTransport, ZplBuilder};
//!
//! // Build a ZPL label
//! let mut zpl = ZplBuilder::new();
//! zpl.start_format();
//! zpl.text_field(20, 20, 30, 30, "ETIQUETA DE PROCESSO");
//! zpl.barcode128(20, 60, 2, "2.0", 60, 60, "9001941457766-TJSP001");
//! zpl.end_format();
//!
//! // Send to a claimed USB printer
//! let mut printer = UsbTransport::zebra();
//! printer.connect().await?;
//! printer.send(&zpl.build()).await?;
//! ```

mod encoding;
mod error;
mod transport;
mod zpl;

// Re-exports
pub use encoding::{encode_wire, sanitize_field};
pub use error::{ConnectError, ConnectResult, SendError, SendResult};
pub use transport::{
    DeviceSelector, PrintServiceTransport, ServiceDevice, TcpTransport, Transport, UsbDeviceInfo,
    UsbTransport, ZEBRA_VENDOR_ID,
};
pub use zpl::ZplBuilder;
