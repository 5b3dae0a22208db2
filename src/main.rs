use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use coffee_tin::Tin;
use coffee_tin::csv::{CsvError, read_tins, write_reports};
use coffee_tin::game::{self, Game, Supply};
use tokio_stream::wrappers::ReceiverStream;
use tracing::{error, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

/// Play the coffee tin game on a set of tins and report the last bean of each.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// CSV file with a `tin` column, e.g. `BBGG`. Plays sample tins when omitted.
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Number of slots in the bag of spare beans.
    #[arg(short, long, default_value_t = Supply::DEFAULT_CAPACITY)]
    capacity: usize,

    /// Seed for drawing spare beans.
    #[arg(short, long)]
    seed: Option<u64>,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::WARN.into())
                .from_env_lossy(),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let rows: Box<dyn Iterator<Item = Result<Tin, CsvError>> + Send> = match &cli.input {
        Some(path) => {
            if path.extension().is_none_or(|ext| ext != "csv") {
                warn!(path = %path.display(), "input file seems to not be a csv file");
            }
            match read_tins(path.clone()) {
                Ok(rows) => Box::new(rows),
                Err(e) => {
                    error!("{e}");
                    return ExitCode::FAILURE;
                }
            }
        }
        None => Box::new(game::sample_tins().into_iter().map(Ok)),
    };

    let mut game = Game::new(Supply::initialize(cli.capacity, cli.seed));
    let (tin_sender, tin_receiver) = tokio::sync::mpsc::channel(16);

    tokio::spawn(async move {
        for result in rows {
            match result {
                Ok(tin) => {
                    if tin_sender.send(tin).await.is_err() {
                        break;
                    }
                }
                Err(e) => {
                    warn!("{e}");
                }
            }
        }
    });

    let reports = game.run(ReceiverStream::new(tin_receiver)).await;

    if let Err(e) = write_reports(io::stdout().lock(), &reports) {
        error!("{e}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
