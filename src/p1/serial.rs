//! # P1 Serial Port
//!
//! Opens the meter's P1 port. DSMR 4 and later run at 115200 baud 8N1; the
//! port is opened with XON/XOFF flow control as many P1 cables expect.

use crate::constants::{P1_DEFAULT_BAUDRATE, P1_DEFAULT_TIMEOUT_SECS};
use crate::error::P1Error;
use crate::p1::reader::TelegramReader;
use std::time::Duration;
use tokio::io::BufReader;
use tokio_serial::SerialPortBuilderExt;

/// Configuration for serial connection.
#[derive(Debug, Clone)]
pub struct SerialConfig {
    pub baudrate: u32,
    /// Longest silence tolerated between lines.
    pub timeout: Duration,
    pub xon_xoff: bool,
}

impl Default for SerialConfig {
    fn default() -> Self {
        SerialConfig {
            baudrate: P1_DEFAULT_BAUDRATE,
            timeout: Duration::from_secs(P1_DEFAULT_TIMEOUT_SECS),
            xon_xoff: true,
        }
    }
}

/// Telegram reader over an open P1 serial port.
pub type P1SerialReader = TelegramReader<BufReader<tokio_serial::SerialStream>>;

impl TelegramReader<BufReader<tokio_serial::SerialStream>> {
    /// Opens the port with the default configuration.
    pub async fn connect(port_name: &str) -> Result<P1SerialReader, P1Error> {
        Self::connect_with_config(port_name, &SerialConfig::default()).await
    }

    /// Opens the port with a custom configuration.
    pub async fn connect_with_config(
        port_name: &str,
        config: &SerialConfig,
    ) -> Result<P1SerialReader, P1Error> {
        let flow_control = if config.xon_xoff {
            tokio_serial::FlowControl::Software
        } else {
            tokio_serial::FlowControl::None
        };

        let port = tokio_serial::new(port_name, config.baudrate)
            .data_bits(tokio_serial::DataBits::Eight)
            .stop_bits(tokio_serial::StopBits::One)
            .parity(tokio_serial::Parity::None)
            .flow_control(flow_control)
            .timeout(config.timeout)
            .open_native_async()
            .map_err(|e| P1Error::SerialPortError(e.to_string()))?;

        log::info!("Opened P1 port {port_name} at {} baud", config.baudrate);
        Ok(TelegramReader::new(BufReader::new(port)).with_read_timeout(config.timeout))
    }
}
