use anyhow::Result;
use clap::Parser;
use log::{warn, LevelFilter};

mod buffer;
mod config;
mod decoder;
mod output;
mod pixel_format;
mod protocol;
mod renderer;
mod server;

use config::Config;
use output::SerialStrip;
use server::PixelServer;

#[derive(Parser)]
#[command(name = "udp_pixel_server")]
#[command(about = "UDP Pixel Server\n\nReceives comma separated RGB values over UDP and outputs changed pixels to a serial LED strip.", long_about = None)]
struct Cli {
    /// Path to configuration file (JSON)
    config: String,

    /// Enable debug output (status and statistics)
    #[arg(long)]
    debug: bool,

    /// Enable detailed debug (every datagram)
    #[arg(long)]
    ddebug: bool,
}

fn init_logging(debug: bool, ddebug: bool) {
    let level = if ddebug {
        LevelFilter::Debug
    } else if debug {
        LevelFilter::Info
    } else {
        LevelFilter::Warn
    };

    // RUST_LOG still wins over the command line flags
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // ddebug implies debug
    let debug = cli.debug || cli.ddebug;
    init_logging(debug, cli.ddebug);

    let config = Config::load(&cli.config)?;
    let led_count = config.strip.led_count;

    let strip = SerialStrip::open(config.strip)?;
    let mut server = PixelServer::new(config.udp, strip, led_count, debug);

    // Set up Ctrl-C handler with graceful shutdown
    let running = server.get_running_flag();
    let result = ctrlc::set_handler(move || {
        log::info!("Shutting down...");
        running.store(false, std::sync::atomic::Ordering::Relaxed);
    });

    if let Err(e) = result {
        warn!("Could not set Ctrl-C handler: {}", e);
    }

    // Run server (blocks until shutdown)
    server.run()?;

    // Graceful shutdown - turn off LEDs
    server.shutdown();

    Ok(())
}
