//! csvgate CLI - validate a CSV export against its expected schema
//!
//! ```bash
//! csvgate                             # check ./var1.csv against the built-in schema
//! csvgate export.csv                  # check another file
//! csvgate export.csv --schema s.json  # use a schema file
//! csvgate export.csv --json           # print a JSON report instead
//! ```

use clap::Parser;
use csvgate::logs::set_quiet;
use csvgate::{transactions_schema, ExpectedSchema, ParseOptions, SchemaValidatedLoader, SUCCESS_MESSAGE};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "csvgate")]
#[command(about = "Check that a CSV file matches its expected columns and types", long_about = None)]
struct Cli {
    /// Input CSV file
    #[arg(default_value = "var1.csv")]
    input: PathBuf,

    /// JSON schema file (default: built-in transactions schema)
    #[arg(short, long)]
    schema: Option<PathBuf>,

    /// CSV delimiter (auto-detect if not specified)
    #[arg(short, long)]
    delimiter: Option<char>,

    /// Input encoding label, e.g. windows-1251 (auto-detect if not specified)
    #[arg(short, long)]
    encoding: Option<String>,

    /// Print a JSON report on stdout
    #[arg(long)]
    json: bool,

    /// Show progress on stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    set_quiet(!cli.verbose || cli.json);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let schema = match &cli.schema {
        Some(path) => ExpectedSchema::from_file(path)?,
        None => transactions_schema(),
    };
    let options = ParseOptions {
        delimiter: cli.delimiter,
        encoding: cli.encoding,
    };

    let mut loader = SchemaValidatedLoader::new(cli.input, schema).with_options(options);

    match loader.load_and_validate() {
        Ok(report) => {
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{}", SUCCESS_MESSAGE);
            }
            Ok(())
        }
        Err(err) if cli.json => {
            let report = loader.failure_report(&err);
            println!("{}", serde_json::to_string_pretty(&report)?);
            std::process::exit(1);
        }
        Err(err) => Err(err.into()),
    }
}
