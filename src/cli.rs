//! Command line surfaces for both binaries

use clap::Parser;
use std::path::PathBuf;

use crate::config::constants::DEFAULT_OUTPUT_FILE;

/// Describe a scientific plot with Gemini, in text or aloud
#[derive(Debug, Parser)]
#[command(name = "plsdescribe", version, about)]
pub struct Cli {
    /// Image file to describe
    #[arg(short = 'f', long = "file")]
    pub file: PathBuf,

    /// Detailed bullet points instead of one sentence
    #[arg(short, long)]
    pub verbose: bool,

    /// A question to append to the initial prompt
    #[arg(short, long)]
    pub question: Option<String>,

    /// Output file for the description (empty to skip)
    #[arg(short, long, default_value = DEFAULT_OUTPUT_FILE)]
    pub output: String,

    /// Speak the description instead of printing it
    #[arg(long)]
    pub tts: bool,

    /// Enter an interactive session for follow-up questions
    #[arg(short, long)]
    pub interactive: bool,
}

pub fn print_proxy_help() {
    let version = env!("CARGO_PKG_VERSION");
    println!("tts-proxy v{}", version);
    println!("Authenticated SSML to MP3 proxy in front of Google Cloud Text-to-Speech");
    println!();
    println!("USAGE:");
    println!("    tts-proxy");
    println!();
    println!("OPTIONS:");
    println!("    -h, --help            Print this help message");
    println!("    -V, --version         Print version information");
    println!();
    println!("ENDPOINTS:");
    println!("    GET    /health          - Health check (no auth)");
    println!("    POST   /v1/synthesize   - SSML to MP3 (Authorization: Bearer <token>)");
    println!();
    println!("ENVIRONMENT VARIABLES:");
    println!("    TTS_PROXY_TOKEN                  - Shared bearer token (required)");
    println!("    TTS_PROXY_DOMAIN                 - Serve HTTPS on :443 with Let's Encrypt");
    println!("    TTS_PROXY_ADDR                   - Plain HTTP listen address (default: :8080)");
    println!("    TTS_PROXY_CERT_CACHE             - Certificate cache directory");
    println!("    GOOGLE_CLOUD_PROJECT             - Quota project for TTS requests");
    println!("    GOOGLE_APPLICATION_CREDENTIALS   - Service account key file");
    println!("    TTS_PROXY_LOG_DIR                - Directory for access/application logs");
    println!("    LOG_FILES_ENABLED                - Write JSON log files (default: true)");
    println!("    LOG_RETENTION_DAYS               - Days of logs to keep (default: 14)");
    println!("    RUST_LOG                         - Console log filter");
    println!();
    println!("CONFIGURATION:");
    println!("    Settings are also read from a .env file in the working directory.");
}

pub fn print_proxy_version() {
    println!("tts-proxy v{}", env!("CARGO_PKG_VERSION"));
}
