//! Nutshell table entry point.

use std::error::Error;
use std::io::Write;
use std::sync::Arc;

use nutshell_core::clock::SystemClock;
use nutshell_table::config::TableConfig;
use nutshell_table::console::{ConsoleCommand, ConsolePrompt, HELP, parse_command};
use nutshell_table::table::Table;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::Mutex;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Logs go to stderr; stdout is the chat log.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .with_writer(std::io::stderr)
        .init();

    let config = TableConfig::from_env()?;
    tracing::info!(
        gms = ?config.gms,
        players = ?config.players,
        seeded = config.seed.is_some(),
        "Starting Nutshell table"
    );

    let input = Arc::new(Mutex::new(BufReader::new(tokio::io::stdin()).lines()));
    let prompt = Arc::new(ConsolePrompt::new(Arc::clone(&input)));
    let mut table = Table::from_config(&config, prompt, Arc::new(SystemClock))?;

    println!("{HELP}");
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let line = input.lock().await.next_line().await?;
        let Some(line) = line else {
            break;
        };
        match parse_command(&line) {
            Ok(Some(ConsoleCommand::Quit)) => break,
            Ok(Some(command)) => {
                for output in table.execute(command).await {
                    println!("{output}");
                }
            }
            Ok(None) => {}
            Err(usage) => println!("{usage}"),
        }
    }

    tracing::info!("Nutshell table closed");
    Ok(())
}
