use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use sqlfilter_cli::{run, Command, Context, CONTEXT_PATH_ENV};

/// Compile Mongo-style JSON filters into SQL predicates.
#[derive(Debug, Parser)]
#[command(name = "sqlfilter", version, about, long_about = None)]
struct Cli {
    /// The directory holding `configuration.json`.
    #[arg(long, global = true, value_name = "DIRECTORY", env = CONTEXT_PATH_ENV, default_value = ".")]
    context: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[tokio::main]
pub async fn main() -> ExitCode {
    env_logger::init();

    let args = Cli::parse();
    let context = Context {
        context_path: args.context,
    };

    match run(args.command, &context).await {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(error) => {
            eprintln!("{error:#}");
            ExitCode::FAILURE
        }
    }
}
