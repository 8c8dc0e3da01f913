use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::pixel_format::PixelOrder;
use crate::protocol::Protocol;

/// Serial frame headers carry the LED count in 16 bits
pub const MAX_LED_COUNT: usize = u16::MAX as usize;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub udp: UdpConfig,
    pub strip: StripConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UdpConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Largest datagram accepted; longer datagrams are truncated to this size
    #[serde(default = "default_recv_buffer_size")]
    pub recv_buffer_size: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripConfig {
    /// Serial device the LED controller is attached to
    pub port: String,
    pub protocol: Protocol,
    pub baud_rate: u32,
    /// Number of LEDs on the strip, fixed for the lifetime of the server
    pub led_count: usize,
    #[serde(default)]
    pub pixel_format: PixelOrder,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    7777
}

fn default_recv_buffer_size() -> usize {
    4096
}

impl Default for UdpConfig {
    fn default() -> Self {
        UdpConfig {
            host: default_host(),
            port: default_port(),
            recv_buffer_size: default_recv_buffer_size(),
        }
    }
}

impl Config {
    /// Read and validate a JSON configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read_to_string(path)
            .context(format!("Failed to read config {}", path.display()))?;
        let config: Config = serde_json::from_str(&data)
            .context(format!("Failed to parse config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.strip.led_count == 0 {
            bail!("strip.led_count must be at least 1");
        }
        if self.strip.led_count > MAX_LED_COUNT {
            bail!("strip.led_count must be at most {}", MAX_LED_COUNT);
        }
        if self.udp.recv_buffer_size == 0 {
            bail!("udp.recv_buffer_size must be at least 1");
        }
        Ok(())
    }
}
