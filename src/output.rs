use anyhow::{Context, Result};
use log::{debug, error, info, log_enabled, trace, warn, Level};
use rgb::RGB8;
use serialport::SerialPort;
use std::io::Write;
use std::thread;
use std::time::Duration;

use crate::config::StripConfig;
use crate::pixel_format::transform_pixels;
use crate::renderer::LedStrip;

/// LED strip driven over a serial port
///
/// Colors are staged in an RGB frame covering the whole strip; `show` sends
/// the complete frame, since the controller always refreshes every LED.
pub struct SerialStrip<P: Write = Box<dyn SerialPort>> {
    config: StripConfig,
    port: P,
    staged: Vec<u8>,
    disconnected: bool,
}

impl SerialStrip {
    /// Open the serial port described by `config`
    pub fn open(config: StripConfig) -> Result<Self> {
        let port = Self::open_port(&config)?;

        info!(
            "Opened {} ({:?} @ {} baud, {} LEDs, {:?} order)",
            config.port, config.protocol, config.baud_rate, config.led_count, config.pixel_format
        );

        Ok(SerialStrip::with_port(config, port))
    }

    fn open_port(config: &StripConfig) -> Result<Box<dyn SerialPort>> {
        let mut port = serialport::new(&config.port, config.baud_rate)
            .data_bits(serialport::DataBits::Eight)
            .parity(serialport::Parity::None)
            .stop_bits(serialport::StopBits::One)
            .flow_control(serialport::FlowControl::None)
            .open()
            .context(format!("Failed to open serial port {}", config.port))?;

        // Bound how long a single frame write may block
        port.set_timeout(Duration::from_millis(1000))
            .context("Failed to set serial port timeout")?;

        if let Err(e) = port.write_data_terminal_ready(true) {
            warn!("Failed to set DTR on {}: {}", config.port, e);
        }

        // Allow device to initialize
        thread::sleep(Duration::from_millis(100));

        Ok(port)
    }
}

impl<P: Write> SerialStrip<P> {
    /// Drive the strip through an already opened port
    pub fn with_port(config: StripConfig, port: P) -> Self {
        SerialStrip {
            staged: vec![0u8; config.led_count * 3],
            config,
            port,
            disconnected: false,
        }
    }

    /// Build the wire frame for the currently staged colors
    fn encode_frame(&self) -> Vec<u8> {
        let mut data = self.staged.clone();
        transform_pixels(&mut data, self.config.pixel_format);
        self.config.protocol.build_frame(&data)
    }

    fn write_frame(&mut self, frame: &[u8]) -> std::io::Result<()> {
        self.port.write_all(frame)?;
        self.port.flush()
    }
}

impl<P: Write> LedStrip for SerialStrip<P> {
    fn set_pixel_color(&mut self, index: usize, color: RGB8) {
        if let Some(slot) = self.staged.get_mut(index * 3..index * 3 + 3) {
            slot.copy_from_slice(&[color.r, color.g, color.b]);
        }
    }

    fn show(&mut self) {
        if self.disconnected {
            debug!("Dropping frame for disconnected output {}", self.config.port);
            return;
        }

        let frame = self.encode_frame();

        if log_enabled!(Level::Trace) {
            let hex: String = frame.iter()
                .map(|b| format!("{:02x}", b)).collect::<Vec<_>>().join(" ");
            trace!("[{}] Complete serial frame: {}", self.config.port, hex);
        }

        if let Err(e) = self.write_frame(&frame) {
            error!("Serial error on {}: {}", self.config.port, e);
            error!("Output {} is now disconnected", self.config.port);
            self.disconnected = true;
            return;
        }

        debug!("[{}] Sent frame: {} bytes", self.config.port, frame.len());
    }
}
