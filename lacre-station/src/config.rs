//! Station configuration
//!
//! All configuration comes from environment variables with defaults:
//!
//! | env | default | meaning |
//! |-----|---------|---------|
//! | LACRE_MAX_LABELS | 50 | batch size cap |
//! | LACRE_TRANSPORT | usb | `usb` \| `service` \| `tcp` |
//! | LACRE_USB_VENDOR_ID | 0a5f | USB vendor filter (hex) |
//! | LACRE_PRINT_SERVICE_URL | http://127.0.0.1:9100 | print-service daemon base URL |
//! | LACRE_PRINTER_ADDR | 192.168.0.100:9100 | network printer address |
//! | LACRE_DOWNLOAD_DIR | . | download artifact directory |
//! | LACRE_FEEDBACK_DELAY_MS | 0 | cosmetic busy-indicator delay before generation |

use std::path::PathBuf;
use std::time::Duration;

use lacre_printer::{
    ConnectError, PrintServiceTransport, TcpTransport, Transport, UsbTransport, ZEBRA_VENDOR_ID,
};

/// Which transport strategy the station drives
///
/// Chosen by deployment, not negotiated at runtime: one strategy is
/// active per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransportKind {
    #[default]
    Usb,
    Service,
    Tcp,
}

impl TransportKind {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "usb" => Some(Self::Usb),
            "service" => Some(Self::Service),
            "tcp" => Some(Self::Tcp),
            _ => None,
        }
    }
}

/// Station configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Batch size cap for generated labels
    pub max_labels: usize,
    /// Active transport strategy
    pub transport: TransportKind,
    /// Vendor id filter for the USB device picker
    pub usb_vendor_id: u16,
    /// Base URL of the local print-service daemon
    pub print_service_url: String,
    /// Address of a network printer (raw TCP)
    pub printer_addr: String,
    /// Directory for download artifacts
    pub download_dir: PathBuf,
    /// Cosmetic delay before generation (busy-indicator parity)
    pub feedback_delay_ms: u64,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Unset or unparseable variables fall back to defaults.
    pub fn from_env() -> Self {
        Self {
            max_labels: std::env::var("LACRE_MAX_LABELS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(50),
            transport: std::env::var("LACRE_TRANSPORT")
                .ok()
                .and_then(|v| TransportKind::parse(&v))
                .unwrap_or_default(),
            usb_vendor_id: std::env::var("LACRE_USB_VENDOR_ID")
                .ok()
                .and_then(|v| parse_vendor_id(&v))
                .unwrap_or(ZEBRA_VENDOR_ID),
            print_service_url: std::env::var("LACRE_PRINT_SERVICE_URL")
                .unwrap_or_else(|_| PrintServiceTransport::DEFAULT_BASE_URL.into()),
            printer_addr: std::env::var("LACRE_PRINTER_ADDR")
                .unwrap_or_else(|_| "192.168.0.100:9100".into()),
            download_dir: std::env::var("LACRE_DOWNLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(".")),
            feedback_delay_ms: std::env::var("LACRE_FEEDBACK_DELAY_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(0),
        }
    }

    /// Build the configured transport strategy
    pub fn build_transport(&self) -> Result<Box<dyn Transport>, ConnectError> {
        Ok(match self.transport {
            TransportKind::Usb => Box::new(UsbTransport::new(self.usb_vendor_id)),
            TransportKind::Service => {
                Box::new(PrintServiceTransport::new(&self.print_service_url))
            }
            TransportKind::Tcp => Box::new(TcpTransport::from_addr(&self.printer_addr)?),
        })
    }

    /// The cosmetic generation delay, if configured
    pub fn feedback_delay(&self) -> Option<Duration> {
        (self.feedback_delay_ms > 0).then(|| Duration::from_millis(self.feedback_delay_ms))
    }
}

fn parse_vendor_id(value: &str) -> Option<u16> {
    let digits = value.trim().trim_start_matches("0x").trim_start_matches("0X");
    u16::from_str_radix(digits, 16).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_kind_parse() {
        assert_eq!(TransportKind::parse("usb"), Some(TransportKind::Usb));
        assert_eq!(TransportKind::parse(" Service "), Some(TransportKind::Service));
        assert_eq!(TransportKind::parse("tcp"), Some(TransportKind::Tcp));
        assert_eq!(TransportKind::parse("serial"), None);
    }

    #[test]
    fn test_parse_vendor_id_hex_forms() {
        assert_eq!(parse_vendor_id("0a5f"), Some(0x0A5F));
        assert_eq!(parse_vendor_id("0x0A5F"), Some(0x0A5F));
        assert_eq!(parse_vendor_id("zebra"), None);
    }
}
