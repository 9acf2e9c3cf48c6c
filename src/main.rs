//! Serial Timestamp CLI
//!
//! Annotates a byte stream (stdin -> stdout) with per-line timestamps.
//! The selected format can be changed live from another process with
//! `serial-timestamp set-format`.

use clap::{Parser, Subcommand};
use crossbeam_channel::bounded;
use std::io::Read;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use serial_timestamp::{
    Config, FormatWatch, LineTimestampAnnotator, TimestampFormat, TracingLog, WriterSink,
    ALL_FORMATS, VERSION,
};

/// Size of the read buffer for stdin chunks.
const CHUNK_SIZE: usize = 4096;

#[derive(Parser)]
#[command(name = "serial-timestamp")]
#[command(version = VERSION)]
#[command(about = "Annotate a session byte stream with per-line timestamps", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Annotate stdin to stdout
    Run {
        /// Timestamp format (overrides the configured value and disables
        /// live reconfiguration)
        #[arg(long)]
        format: Option<String>,
    },

    /// Select the timestamp format (applies live to a running annotator)
    SetFormat {
        /// Format name (see `formats`)
        format: String,
    },

    /// List recognized timestamp formats
    Formats,

    /// Show configuration
    Config,
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run { format } => {
            cmd_run(format);
        }
        Commands::SetFormat { format } => {
            cmd_set_format(&format);
        }
        Commands::Formats => {
            cmd_formats();
        }
        Commands::Config => {
            cmd_config();
        }
    }
}

fn cmd_run(format_override: Option<String>) {
    // Status lines go to stderr so they never mix with the data stream.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let config = Config::load().unwrap_or_default();
    let live_reconfig = format_override.is_none();
    let initial_format = format_override.unwrap_or_else(|| config.timestamp_format.clone());

    let log = TracingLog;
    let mut annotator = LineTimestampAnnotator::new(initial_format.clone(), Box::new(log));
    let mut watch = FormatWatch::new(initial_format);

    // Set up Ctrl+C handler
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    if let Err(e) = ctrlc::set_handler(move || r.store(false, Ordering::SeqCst)) {
        eprintln!("Warning: Could not install Ctrl+C handler: {e}");
    }

    // Reader thread: deliver stdin chunks over a bounded channel. Chunk
    // boundaries are arbitrary relative to lines; the annotator carries
    // line-start state across them.
    let (sender, receiver) = bounded::<Vec<u8>>(64);
    // Not joined on shutdown: the thread may be parked in a blocking
    // stdin read and exits with the process.
    thread::spawn(move || {
        let mut stdin = std::io::stdin().lock();
        let mut buf = [0u8; CHUNK_SIZE];
        loop {
            match stdin.read(&mut buf) {
                Ok(0) => break, // EOF
                Ok(n) => {
                    if sender.send(buf[..n].to_vec()).is_err() {
                        break;
                    }
                }
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    eprintln!("Error reading input: {e}");
                    break;
                }
            }
        }
    });

    let stdout = std::io::stdout();
    let mut sink = WriterSink::new(stdout.lock(), &log);

    // Poll the config file so `serial-timestamp set-format` can retarget a
    // running annotator. FormatWatch filters duplicate values, so the
    // annotator only hears genuine transitions.
    let mut last_config_check = std::time::Instant::now();

    while running.load(Ordering::SeqCst) {
        if live_reconfig && last_config_check.elapsed() >= Duration::from_secs(1) {
            if let Ok(cfg) = Config::load() {
                if let Some(changed) = watch.observe(&cfg.timestamp_format) {
                    annotator.on_format_changed(changed);
                }
            }
            last_config_check = std::time::Instant::now();
        }

        match receiver.recv_timeout(Duration::from_millis(100)) {
            Ok(chunk) => {
                annotator.feed(&chunk, &mut sink);
            }
            Err(crossbeam_channel::RecvTimeoutError::Timeout) => {}
            Err(crossbeam_channel::RecvTimeoutError::Disconnected) => {
                break; // input finished
            }
        }
    }

    annotator.close();
}

fn cmd_set_format(format: &str) {
    if let Err(e) = format.parse::<TimestampFormat>() {
        eprintln!("Error: {e}");
        eprintln!("Recognized formats:");
        for f in ALL_FORMATS {
            eprintln!("  {f}");
        }
        std::process::exit(1);
    }

    let mut config = Config::load().unwrap_or_default();
    config.timestamp_format = format.to_string();
    match config.save() {
        Ok(()) => println!("Timestamp format set to {format}"),
        Err(e) => {
            eprintln!("Error: Could not save configuration: {e}");
            std::process::exit(1);
        }
    }
}

fn cmd_formats() {
    println!("Recognized timestamp formats:");
    for format in ALL_FORMATS {
        println!("  {format}");
    }
}

fn cmd_config() {
    let config = Config::load().unwrap_or_default();
    println!("Configuration file: {}", Config::config_path().display());
    println!("Timestamp format: {}", config.timestamp_format);
}
