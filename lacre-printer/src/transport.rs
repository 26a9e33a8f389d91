//! Printer transports for sending ZPL data
//!
//! Supports:
//! - USB printers (vendor-filtered claim and bulk transfer)
//! - Print-service daemons (local HTTP broker, e.g. Zebra Browser Print)
//! - Network printers (raw TCP port 9100)
//!
//! All transports hold at most one connection; a second `connect`
//! replaces the previous one. Sending without a connection fails fast
//! with [`SendError::NotConnected`].

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use rusb::{Device, DeviceHandle, Direction, GlobalContext, TransferType};
use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tracing::{info, instrument, warn};

use crate::encoding::encode_wire;
use crate::error::{ConnectError, ConnectResult, SendError, SendResult};

/// Trait for printer transports
///
/// `connect` establishes and holds the connection, `send` pushes a ZPL
/// program through it. [`ConnectError::Cancelled`] from `connect` means
/// the operator dismissed the device picker and is not a failure.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Establish a connection, replacing any currently held one
    async fn connect(&mut self) -> ConnectResult<()>;

    /// Send a ZPL program through the held connection
    async fn send(&mut self, zpl: &str) -> SendResult<()>;

    /// Whether a connection is currently held
    fn is_connected(&self) -> bool;
}

// ============================================================
// USB
// ============================================================

/// Vendor id shared by Zebra thermal printers
pub const ZEBRA_VENDOR_ID: u16 = 0x0A5F;

/// Configuration value selected after opening a device
const USB_CONFIGURATION: u8 = 1;

/// Interface claimed on the selected configuration
const USB_INTERFACE: u8 = 0;

/// Timeout for a single bulk write
const USB_WRITE_TIMEOUT: Duration = Duration::from_secs(5);

/// Identity of a candidate USB device, as shown to a device selector
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsbDeviceInfo {
    pub vendor_id: u16,
    pub product_id: u16,
    pub bus: u8,
    pub address: u8,
}

/// Picks one device out of the vendor-filtered candidates
///
/// Returning `None` cancels the connect, which callers treat as a
/// benign no-op. The default selector takes the first candidate.
pub type DeviceSelector = Box<dyn Fn(&[UsbDeviceInfo]) -> Option<usize> + Send + Sync>;

struct ClaimedDevice {
    handle: Arc<Mutex<DeviceHandle<GlobalContext>>>,
    endpoint: u8,
    interface: u8,
}

impl Drop for ClaimedDevice {
    fn drop(&mut self) {
        if let Ok(mut handle) = self.handle.lock() {
            let _ = handle.release_interface(self.interface);
        }
    }
}

/// USB printer transport
///
/// Claims the printer the way a browser device picker would: enumerate
/// devices matching the vendor id, let the selector pick one, open it,
/// select configuration 1, claim interface 0 and locate the first bulk
/// OUT endpoint. The claimed interface is released when the transport is
/// dropped or the connection is replaced.
pub struct UsbTransport {
    vendor_id: u16,
    selector: DeviceSelector,
    held: Option<ClaimedDevice>,
}

impl UsbTransport {
    /// Create a transport filtering on the given vendor id
    pub fn new(vendor_id: u16) -> Self {
        Self {
            vendor_id,
            selector: Box::new(|_| Some(0)),
            held: None,
        }
    }

    /// Create a transport filtering on the Zebra vendor id
    pub fn zebra() -> Self {
        Self::new(ZEBRA_VENDOR_ID)
    }

    /// Replace the device selector
    pub fn with_selector<F>(mut self, selector: F) -> Self
    where
        F: Fn(&[UsbDeviceInfo]) -> Option<usize> + Send + Sync + 'static,
    {
        self.selector = Box::new(selector);
        self
    }

    fn enumerate(
        vendor_id: u16,
    ) -> ConnectResult<Vec<(UsbDeviceInfo, Device<GlobalContext>)>> {
        let mut candidates = Vec::new();
        for device in rusb::devices()?.iter() {
            let descriptor = match device.device_descriptor() {
                Ok(d) => d,
                Err(_) => continue,
            };
            if descriptor.vendor_id() != vendor_id {
                continue;
            }
            candidates.push((
                UsbDeviceInfo {
                    vendor_id: descriptor.vendor_id(),
                    product_id: descriptor.product_id(),
                    bus: device.bus_number(),
                    address: device.address(),
                },
                device,
            ));
        }
        Ok(candidates)
    }

    fn claim(device: Device<GlobalContext>) -> ConnectResult<ClaimedDevice> {
        // Endpoint lookup first: a device without a bulk OUT endpoint is
        // not a printer we can drive, so don't claim it at all.
        let config = device.config_descriptor(0)?;
        let endpoint = config
            .interfaces()
            .next()
            .and_then(|interface| interface.descriptors().next())
            .and_then(|descriptor| {
                descriptor
                    .endpoint_descriptors()
                    .find(|e| {
                        e.direction() == Direction::Out
                            && e.transfer_type() == TransferType::Bulk
                    })
                    .map(|e| e.address())
            })
            .ok_or(ConnectError::NoOutputEndpoint)?;

        let mut handle = device.open()?;
        // Not supported on all platforms; claiming below surfaces any
        // real conflict.
        let _ = handle.set_auto_detach_kernel_driver(true);
        handle.set_active_configuration(USB_CONFIGURATION)?;
        handle.claim_interface(USB_INTERFACE)?;

        Ok(ClaimedDevice {
            handle: Arc::new(Mutex::new(handle)),
            endpoint,
            interface: USB_INTERFACE,
        })
    }
}

#[async_trait]
impl Transport for UsbTransport {
    #[instrument(skip(self), fields(vendor_id = self.vendor_id))]
    async fn connect(&mut self) -> ConnectResult<()> {
        // A second connect replaces the held device; drop releases the
        // old interface before the new claim.
        self.held = None;

        let vendor_id = self.vendor_id;
        let candidates = tokio::task::spawn_blocking(move || Self::enumerate(vendor_id))
            .await
            .map_err(|e| ConnectError::Io(std::io::Error::other(e)))??;

        if candidates.is_empty() {
            info!("No matching devices attached");
            return Err(ConnectError::Cancelled);
        }

        let infos: Vec<UsbDeviceInfo> = candidates.iter().map(|(info, _)| info.clone()).collect();
        let index = (self.selector)(&infos).ok_or(ConnectError::Cancelled)?;
        let (info, device) = candidates
            .into_iter()
            .nth(index)
            .ok_or(ConnectError::Cancelled)?;

        let claimed = tokio::task::spawn_blocking(move || Self::claim(device))
            .await
            .map_err(|e| ConnectError::Io(std::io::Error::other(e)))??;

        info!(
            product_id = info.product_id,
            bus = info.bus,
            address = info.address,
            endpoint = claimed.endpoint,
            "Printer claimed and ready"
        );
        self.held = Some(claimed);
        Ok(())
    }

    #[instrument(skip(self, zpl), fields(data_len = zpl.len()))]
    async fn send(&mut self, zpl: &str) -> SendResult<()> {
        let held = self.held.as_ref().ok_or(SendError::NotConnected)?;

        let data = encode_wire(zpl);
        let len = data.len();
        let handle = Arc::clone(&held.handle);
        let endpoint = held.endpoint;

        let written = tokio::task::spawn_blocking(move || {
            let handle = handle
                .lock()
                .map_err(|_| SendError::Transfer("printer handle poisoned".to_string()))?;
            handle
                .write_bulk(endpoint, &data, USB_WRITE_TIMEOUT)
                .map_err(|e| SendError::Transfer(e.to_string()))
        })
        .await
        .map_err(|e| SendError::Transfer(e.to_string()))??;

        if written != len {
            warn!(written, expected = len, "Incomplete bulk transfer");
            return Err(SendError::Transfer(format!(
                "incomplete transfer: {} of {} bytes",
                written, len
            )));
        }

        info!(bytes = len, "Print job sent");
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.held.is_some()
    }
}

// ============================================================
// Print service daemon
// ============================================================

/// Timeout for a single daemon request
const SERVICE_TIMEOUT: Duration = Duration::from_secs(5);

/// Device descriptor returned by the print-service daemon
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceDevice {
    pub name: String,
    pub uid: String,
    pub connection: String,
    #[serde(default)]
    pub device_type: Option<String>,
    #[serde(default)]
    pub provider: Option<String>,
    #[serde(default)]
    pub manufacturer: Option<String>,
}

/// Print-service daemon transport
///
/// Talks HTTP to a print broker running on the operator's machine.
/// `connect` resolves and caches the daemon's default printer; `send`
/// forwards the ZPL to that device and relays the daemon's verdict.
pub struct PrintServiceTransport {
    base_url: String,
    client: reqwest::Client,
    device: Option<ServiceDevice>,
}

impl PrintServiceTransport {
    /// Default daemon address on the local machine
    pub const DEFAULT_BASE_URL: &'static str = "http://127.0.0.1:9100";

    /// Create a transport against the given daemon base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            client: reqwest::Client::new(),
            device: None,
        }
    }

    /// Create a transport against the local daemon default address
    pub fn local() -> Self {
        Self::new(Self::DEFAULT_BASE_URL)
    }

    /// The default device resolved by the last successful `connect`
    pub fn default_device(&self) -> Option<&ServiceDevice> {
        self.device.as_ref()
    }
}

#[async_trait]
impl Transport for PrintServiceTransport {
    #[instrument(skip(self), fields(base_url = %self.base_url))]
    async fn connect(&mut self) -> ConnectResult<()> {
        self.device = None;

        let url = format!("{}/default?type=printer", self.base_url);
        let response = self
            .client
            .get(&url)
            .timeout(SERVICE_TIMEOUT)
            .send()
            .await
            .map_err(|e| ConnectError::ServiceUnavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ConnectError::NoDefaultDevice);
        }

        let body = response
            .text()
            .await
            .map_err(|e| ConnectError::ServiceUnavailable(e.to_string()))?;
        if body.trim().is_empty() {
            return Err(ConnectError::NoDefaultDevice);
        }

        let device: ServiceDevice = serde_json::from_str(&body).map_err(|e| {
            ConnectError::ServiceUnavailable(format!("unexpected daemon response: {}", e))
        })?;

        info!(device = %device.name, uid = %device.uid, "Default printer resolved");
        self.device = Some(device);
        Ok(())
    }

    #[instrument(skip(self, zpl), fields(base_url = %self.base_url, data_len = zpl.len()))]
    async fn send(&mut self, zpl: &str) -> SendResult<()> {
        let device = self.device.as_ref().ok_or(SendError::NotConnected)?;

        let url = format!("{}/write", self.base_url);
        let body = serde_json::json!({
            "device": device,
            "data": zpl,
        });

        let response = self
            .client
            .post(&url)
            .timeout(SERVICE_TIMEOUT)
            .json(&body)
            .send()
            .await
            .map_err(|e| SendError::ServiceUnavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            warn!(%status, "Daemon rejected job");
            return Err(SendError::Rejected(format!(
                "{} {}",
                status,
                detail.trim()
            )));
        }

        info!(bytes = zpl.len(), "Print job sent");
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.device.is_some()
    }
}

// ============================================================
// Raw TCP
// ============================================================

/// Network printer transport (raw TCP port 9100)
///
/// Zebra printers accept raw ZPL on port 9100. `connect` is a bounded
/// reachability probe; each `send` opens a fresh connection, writes the
/// payload and flushes.
#[derive(Debug, Clone)]
pub struct TcpTransport {
    addr: SocketAddr,
    timeout: Duration,
    reachable: bool,
}

impl TcpTransport {
    /// Create a new network transport
    pub fn new(host: &str, port: u16) -> ConnectResult<Self> {
        let addr_str = format!("{}:{}", host, port);
        let addr = addr_str
            .parse()
            .map_err(|_| ConnectError::InvalidAddr(addr_str))?;

        Ok(Self {
            addr,
            timeout: Duration::from_secs(5),
            reachable: false,
        })
    }

    /// Create from a socket address string (e.g., "192.168.1.100:9100")
    pub fn from_addr(addr: &str) -> ConnectResult<Self> {
        let addr: SocketAddr = addr
            .parse()
            .map_err(|_| ConnectError::InvalidAddr(addr.to_string()))?;

        Ok(Self {
            addr,
            timeout: Duration::from_secs(5),
            reachable: false,
        })
    }

    /// Set connection timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Get the printer address
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }
}

#[async_trait]
impl Transport for TcpTransport {
    #[instrument(skip(self), fields(addr = %self.addr))]
    async fn connect(&mut self) -> ConnectResult<()> {
        self.reachable = false;

        tokio::time::timeout(self.timeout, TcpStream::connect(self.addr))
            .await
            .map_err(|_| ConnectError::Timeout(format!("connection timeout: {}", self.addr)))?
            .map_err(ConnectError::Io)?;

        info!("Printer reachable");
        self.reachable = true;
        Ok(())
    }

    #[instrument(skip(self, zpl), fields(addr = %self.addr, data_len = zpl.len()))]
    async fn send(&mut self, zpl: &str) -> SendResult<()> {
        if !self.reachable {
            return Err(SendError::NotConnected);
        }

        let mut stream = tokio::time::timeout(self.timeout, TcpStream::connect(self.addr))
            .await
            .map_err(|_| SendError::Timeout(format!("connection timeout: {}", self.addr)))?
            .map_err(|e| SendError::Transfer(format!("{}: {}", self.addr, e)))?;

        let data = encode_wire(zpl);
        stream.write_all(&data).await?;
        stream.flush().await?;

        info!(bytes = data.len(), "Print job sent");
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.reachable
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tcp_transport_new() {
        let printer = TcpTransport::new("192.168.1.100", 9100).unwrap();
        assert_eq!(printer.addr().port(), 9100);
        assert!(!printer.is_connected());
    }

    #[test]
    fn test_tcp_transport_from_addr() {
        let printer = TcpTransport::from_addr("192.168.1.100:9100").unwrap();
        assert_eq!(printer.addr().port(), 9100);
    }

    #[test]
    fn test_tcp_invalid_addr() {
        let result = TcpTransport::from_addr("invalid");
        assert!(matches!(result, Err(ConnectError::InvalidAddr(_))));
    }

    #[tokio::test]
    async fn test_usb_send_before_connect() {
        let mut printer = UsbTransport::zebra();
        let result = printer.send("^XA\n^XZ").await;
        assert!(matches!(result, Err(SendError::NotConnected)));
    }

    #[tokio::test]
    async fn test_service_send_before_connect() {
        let mut printer = PrintServiceTransport::local();
        let result = printer.send("^XA\n^XZ").await;
        assert!(matches!(result, Err(SendError::NotConnected)));
    }

    #[tokio::test]
    async fn test_tcp_send_before_connect() {
        let mut printer = TcpTransport::new("127.0.0.1", 9100).unwrap();
        let result = printer.send("^XA\n^XZ").await;
        assert!(matches!(result, Err(SendError::NotConnected)));
    }

    #[test]
    fn test_service_device_decodes_daemon_json() {
        let body = r#"{
            "name": "ZDesigner GC420t",
            "uid": "usb:0a5f:0081",
            "connection": "usb",
            "deviceType": "printer",
            "manufacturer": "Zebra Technologies"
        }"#;
        let device: ServiceDevice = serde_json::from_str(body).unwrap();
        assert_eq!(device.name, "ZDesigner GC420t");
        assert_eq!(device.device_type.as_deref(), Some("printer"));
        assert!(device.provider.is_none());
    }
}
