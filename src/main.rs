//! CLI entry point for chromedriver-dl

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use chromedriver_dl::Config;

/// Download the ChromeDriver build matching the locally installed Chrome
#[derive(Debug, Parser)]
#[command(name = "chromedriver-dl", version, about)]
struct Cli {
    /// Path to the Chrome executable to query
    #[arg(short = 'e', long)]
    chrome_executable: PathBuf,

    /// Platform tag matched against candidate archive filenames
    /// (default: the current host platform)
    #[arg(short = 'p', long)]
    platform: Option<String>,

    /// Destination directory for the extracted driver
    /// (default: the current working directory)
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Storage base URL of the driver index
    #[arg(long, default_value = chromedriver_dl::config::DEFAULT_STORAGE_URL)]
    storage_url: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = async {
        let config = Config::new(
            cli.chrome_executable,
            cli.platform,
            cli.output,
            Some(cli.storage_url),
        )?;
        chromedriver_dl::run(&config).await
    }
    .await;

    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            let mut source = std::error::Error::source(&e);
            while let Some(cause) = source {
                eprintln!("caused by: {cause}");
                source = cause.source();
            }
            ExitCode::FAILURE
        }
    }
}
