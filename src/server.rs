use anyhow::{Context, Result};
use log::{debug, info, log_enabled, warn, Level};
use std::io::ErrorKind;
use std::net::UdpSocket;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::buffer::RecvBuffer;
use crate::config::UdpConfig;
use crate::decoder::FrameDecoder;
use crate::renderer::{LedStrip, RenderSummary, Renderer};

/// How long a receive may block before the running flag is checked again
const POLL_INTERVAL: Duration = Duration::from_millis(100);

const STATS_INTERVAL: Duration = Duration::from_secs(5);

/// Receives color datagrams and renders them onto the strip
pub struct PixelServer<S: LedStrip> {
    config: UdpConfig,
    buffer: RecvBuffer,
    renderer: Renderer<S>,
    datagrams_received: Arc<AtomicU64>,
    frames_shown: Arc<AtomicU64>,
    running: Arc<AtomicBool>,
    stats: bool,
}

impl<S: LedStrip> PixelServer<S> {
    /// Create a new server driving `strip`
    pub fn new(config: UdpConfig, strip: S, led_count: usize, stats: bool) -> Self {
        let buffer = RecvBuffer::new(config.recv_buffer_size);

        PixelServer {
            config,
            buffer,
            renderer: Renderer::new(strip, led_count),
            datagrams_received: Arc::new(AtomicU64::new(0)),
            frames_shown: Arc::new(AtomicU64::new(0)),
            running: Arc::new(AtomicBool::new(true)),
            stats,
        }
    }

    /// Get a clone of the running flag for signal handlers
    pub fn get_running_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.running)
    }

    #[cfg(test)]
    pub fn renderer(&self) -> &Renderer<S> {
        &self.renderer
    }

    /// Bind the configured UDP address
    pub fn bind(&self) -> Result<UdpSocket> {
        let addr = format!("{}:{}", self.config.host, self.config.port);
        let socket = UdpSocket::bind(&addr)
            .context(format!("Failed to bind to {}", addr))?;

        // Bounded receive so the loop can check the running flag periodically
        socket.set_read_timeout(Some(POLL_INTERVAL))
            .context("Failed to set socket read timeout")?;

        info!("Listening on UDP {} ({} LEDs, {} byte buffer)", addr, self.renderer.cache().len(), self.buffer.capacity());
        Ok(socket)
    }

    /// Run the receive loop until the running flag is cleared
    pub fn run(&mut self) -> Result<()> {
        let socket = self.bind()?;

        // The cache starts black; make the hardware agree with it
        self.renderer.blank();

        if self.stats {
            self.spawn_stats_thread();
        }

        while self.running.load(Ordering::Relaxed) {
            if let Err(e) = self.poll(&socket) {
                warn!("Error receiving datagram: {}", e);
                thread::sleep(POLL_INTERVAL);
            }
        }

        Ok(())
    }

    /// Wait for at most one datagram and render it.
    ///
    /// Returns `None` when nothing arrived before the read timeout or the
    /// datagram was empty.
    pub fn poll(&mut self, socket: &UdpSocket) -> Result<Option<RenderSummary>> {
        let (len, peer) = match self.buffer.receive(socket) {
            Ok(received) => received,
            Err(e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut | ErrorKind::Interrupted) => {
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        if len == 0 {
            return Ok(None);
        }
        self.datagrams_received.fetch_add(1, Ordering::Relaxed);

        if log_enabled!(Level::Debug) {
            let preview = String::from_utf8_lossy(&self.buffer.filled()[..len.min(60)]);
            debug!("Received {} bytes from {}: {:?}", len, peer, preview);
        }

        let led_count = self.renderer.cache().len();
        let summary = self.renderer.render(FrameDecoder::new(self.buffer.filled(), led_count));
        if summary.flushed {
            self.frames_shown.fetch_add(1, Ordering::Relaxed);
        }
        debug!("Updated {} pixels (flushed: {})", summary.changed, summary.flushed);

        Ok(Some(summary))
    }

    /// Gracefully shutdown - turn off every LED
    pub fn shutdown(&mut self) {
        info!("Turning off LEDs...");
        self.renderer.blank();
        info!("Server stopped");
    }

    /// Spawn statistics thread
    fn spawn_stats_thread(&self) {
        let datagrams_received = Arc::clone(&self.datagrams_received);
        let frames_shown = Arc::clone(&self.frames_shown);
        let running = Arc::clone(&self.running);

        thread::spawn(move || {
            let mut last_received = 0u64;
            let mut last_shown = 0u64;
            let secs = STATS_INTERVAL.as_secs_f64();

            while running.load(Ordering::Relaxed) {
                thread::sleep(STATS_INTERVAL);

                let received = datagrams_received.load(Ordering::Relaxed);
                let shown = frames_shown.load(Ordering::Relaxed);
                info!(
                    "[Stats] Received: {:.1} pps, Shown: {:.1} fps",
                    (received - last_received) as f64 / secs,
                    (shown - last_shown) as f64 / secs,
                );
                last_received = received;
                last_shown = shown;
            }
        });
    }
}
