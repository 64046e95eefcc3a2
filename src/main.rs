use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "dossier-pdf",
    version,
    about = "Render a JSON personnel record into a fixed-layout PDF report"
)]
struct Args {
    /// Path to the JSON personnel record
    input: PathBuf,

    /// Directory the report is written into
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Optional PNG logo for the page header; skipped when it cannot be loaded
    #[arg(long)]
    logo: Option<PathBuf>,
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    let bytes = match std::fs::read(&args.input) {
        Ok(b) => b,
        Err(e) => {
            eprintln!("error: cannot read {}: {e}", args.input.display());
            return ExitCode::FAILURE;
        }
    };

    let record = match dossier_pdf::parse_record(&bytes) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    match dossier_pdf::generate_report(&record, args.logo.as_deref(), &args.output_dir) {
        Ok(path) => {
            println!("{}", path.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
