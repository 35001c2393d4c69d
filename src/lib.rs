// Library modules shared by both binaries and the integration tests
pub mod auth;
pub mod cli;
pub mod config;
pub mod describe;
pub mod error;
pub mod interactive;
pub mod logging;
pub mod models;
pub mod narrator;
pub mod playback;
pub mod server;
pub mod text_processing;
pub mod tls;
pub mod tts;
pub mod utils;
