use clap::Parser;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use plsdescribe::cli::Cli;
use plsdescribe::config::ClientConfig;
use plsdescribe::describe::{build_initial_prompt, GeminiClient, ImageInput};
use plsdescribe::error::Result;
use plsdescribe::interactive::Session;
use plsdescribe::logging;
use plsdescribe::narrator::Narrator;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Load .env file if it exists (silently ignore if it doesn't)
    let _ = dotenvy::dotenv();

    logging::init_cli_logging();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = ClientConfig::from_env()?;

    // Read once; every request in the session reuses the same bytes
    let image = ImageInput::load(&cli.file).await?;
    tracing::debug!(
        file = ?cli.file,
        mime_type = image.mime_type,
        size = image.data.len(),
        "Image loaded"
    );

    let describer = GeminiClient::new(config.gemini_api_key.clone())?;
    let narrator = Narrator::new(config);

    let output_file = Some(PathBuf::from(&cli.output));
    let mut session = Session::new(&describer, &narrator, image, output_file);

    let mut stdout = io::stdout();
    let mut stderr = io::stderr();

    let prompt = build_initial_prompt(cli.verbose, cli.question.as_deref());
    session
        .describe_initial(&prompt, cli.tts, &mut stdout, &mut stderr)
        .await?;

    if !cli.interactive {
        return Ok(());
    }

    let stdin = io::stdin();
    session.run(stdin.lock(), &mut stdout, &mut stderr).await
}
