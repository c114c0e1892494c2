mod report;

use std::error::Error;
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use trussbridge::{analyze_bridge, load_design, AnalysisStatus};

/// Load test a truss bridge design.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Bridge design document (JSON).
    file: PathBuf,

    /// Print the per-member load test table.
    #[arg(long)]
    report: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let name = cli.file.display();

    let mut bridge = match load_design(&cli.file) {
        Ok(bridge) => bridge,
        Err(error) => {
            eprintln!("could not open '{name}' as a bridge file.");
            eprintln!("{error}");
            return Ok(());
        }
    };

    let analysis = analyze_bridge(&mut bridge);
    let status = analysis.status();
    if status >= AnalysisStatus::FailsSlenderness {
        let verdict = if status == AnalysisStatus::Passes {
            "passes"
        } else {
            "fails"
        };
        println!("{name}: {verdict}.");
    }

    if cli.report {
        if let (true, Some(results)) = (status.allows_report(), analysis.results()) {
            let mut table = String::new();
            report::write_load_test(&mut table, &bridge, results)?;
            print!("{table}");
        } else {
            tracing::warn!(?status, "no load test report for this result");
        }
    }

    Ok(())
}
