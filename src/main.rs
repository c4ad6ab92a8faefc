use std::env;
use std::io;
use std::path::Path;
use std::process::ExitCode;

use fee_ledger::csv::{open_edits, write_summary};
use fee_ledger::{Flow, LedgerSession};
use tokio_stream::wrappers::ReceiverStream;
use tracing::{error, warn};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: fee-ledger <edits.csv> [student-registration|course-registration|proposal|expense]";

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(
            "warn".parse().expect("static directive is valid"),
        ))
        .with_writer(io::stderr)
        .init();

    let mut args = env::args().skip(1);
    let Some(path) = args.next() else {
        error!("{USAGE}");
        return ExitCode::from(2);
    };
    let flow = match args.next().map(|name| name.parse::<Flow>()).transpose() {
        Ok(flow) => flow.unwrap_or_default(),
        Err(e) => {
            error!("{e}");
            return ExitCode::from(2);
        }
    };

    if !path.ends_with(".csv") {
        warn!(path, "input file seems to not be a csv file");
    }

    let edits = match open_edits(Path::new(&path)) {
        Ok(edits) => edits,
        Err(e) => {
            error!("{e}");
            return ExitCode::from(2);
        }
    };

    let mut session = LedgerSession::new(flow);
    let (edit_sender, edit_receiver) = tokio::sync::mpsc::channel(16);

    tokio::spawn(async move {
        for result in edits {
            match result {
                Ok(edit) => {
                    if edit_sender.send(edit).await.is_err() {
                        break;
                    }
                }
                Err(e) => {
                    warn!("{e}");
                }
            }
        }
    });

    session.run(ReceiverStream::new(edit_receiver)).await;

    let summary = match session.submit() {
        Ok(summary) => summary,
        Err(e) => {
            error!(%flow, "no totals available: {e}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = write_summary(io::stdout().lock(), &summary) {
        error!("failed to write summary: {e}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
