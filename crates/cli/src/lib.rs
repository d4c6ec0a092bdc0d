//! The command-line interface to the filter compiler.
//!
//! Commands are parsed with `clap` and run against a context directory that
//! may hold a `configuration.json`.

use std::path::{Path, PathBuf};

use clap::Subcommand;
use tokio::io::AsyncReadExt;

use query_engine_translation::translation::filter::{self, operators, query::Query};
use sqlfilter_configuration::{Configuration, ParsedConfiguration, CONFIGURATION_FILENAME};

/// The environment variable the context directory is read from.
pub const CONTEXT_PATH_ENV: &str = "SQLFILTER_CONTEXT_PATH";

/// The commands supported by the CLI.
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Compile a JSON filter into a SQL predicate.
    Build {
        /// The filter. Read from standard input when absent.
        filter: Option<String>,
        /// Compile as if the whole filter were wrapped in `$not`.
        #[arg(long)]
        negate: bool,
    },
    /// Write a default configuration and its JSON schema.
    Initialize,
}

/// The directory commands read configuration from or write it to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Context {
    pub context_path: PathBuf,
}

/// Run a command, returning what should be printed on success.
pub async fn run(command: Command, context: &Context) -> anyhow::Result<String> {
    match command {
        Command::Build { filter, negate } => {
            let filter = match filter {
                Some(filter) => filter,
                None => read_stdin().await?,
            };
            build(&filter, negate, &context.context_path).await
        }
        Command::Initialize => initialize(&context.context_path).await,
    }
}

/// Compile `filter` with the configuration found in `context_path`, or the
/// default one if there is none.
pub async fn build(filter: &str, negate: bool, context_path: &Path) -> anyhow::Result<String> {
    let configuration = read_configuration(context_path).await?;
    let query = Query::from_json(serde_json::from_str(filter)?)?;
    let polarity = if negate {
        operators::Polarity::Negated
    } else {
        operators::Polarity::Direct
    };

    let sql = filter::build_with(
        &configuration,
        query.as_ref(),
        operators::OperatorTable::for_polarity(polarity),
    )?;
    Ok(sql)
}

/// Write the initial configuration into `context_path`. Refuses to overwrite
/// an existing configuration.
pub async fn initialize(context_path: &Path) -> anyhow::Result<String> {
    let configuration_file = context_path.join(CONFIGURATION_FILENAME);
    if configuration_file.exists() {
        anyhow::bail!(
            "a configuration already exists at {}",
            configuration_file.display()
        );
    }

    sqlfilter_configuration::write_parsed_configuration(ParsedConfiguration::initial(), context_path)
        .await?;
    tracing::info!(path = %context_path.display(), "initialized configuration");
    Ok(format!("wrote {}", configuration_file.display()))
}

async fn read_configuration(context_path: &Path) -> anyhow::Result<Configuration> {
    if !context_path.join(CONFIGURATION_FILENAME).exists() {
        tracing::debug!(path = %context_path.display(), "no configuration found, using defaults");
        return Ok(Configuration::default());
    }
    let parsed = sqlfilter_configuration::parse_configuration(context_path).await?;
    Ok(sqlfilter_configuration::make_runtime_configuration(parsed)?)
}

async fn read_stdin() -> anyhow::Result<String> {
    let mut input = String::new();
    tokio::io::stdin().read_to_string(&mut input).await?;
    Ok(input)
}
