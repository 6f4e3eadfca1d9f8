use std::process::ExitCode;

use clap::Parser;
use quick_pipreqs::{Cli, Output};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match cli.run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => match err.downcast::<clap::Error>() {
            // Usage errors print through clap and exit with code 2
            Ok(usage) => usage.exit(),
            Err(err) => {
                Output::new(false, false).error(&format!("error: {err:#}"));
                ExitCode::FAILURE
            }
        },
    }
}
