//! Version 1 of the configuration file format.

use std::path::Path;

use schemars::{gen::SchemaSettings, schema::RootSchema, JsonSchema};
use serde::{Deserialize, Serialize};
use tokio::fs;

use query_engine_sql::sql;

use crate::configuration::DEFAULT_MAX_DEPTH;
use crate::error::{ParseConfigurationError, WriteParsedConfigurationError};

pub const CURRENT_VERSION: u32 = 1;
pub const CONFIGURATION_FILENAME: &str = "configuration.json";
pub const CONFIGURATION_JSONSCHEMA_FILENAME: &str = "schema.json";

const DEFAULT_TIME_ZONE: &str = "local";

/// The user-facing configuration, as stored in `configuration.json`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ParsedConfiguration {
    /// Which version of the configuration format are we using
    pub version: u32,
    /// The SQL dialect predicates are rendered for.
    #[serde(default)]
    pub dialect: Dialect,
    /// The time zone zoned timestamps are rendered in: 'local', 'Z' or an
    /// offset such as '+05:30'.
    #[serde(default = "time_zone_default")]
    pub time_zone: String,
    /// The deepest nesting of `$not` and connectives a filter may use.
    #[serde(default = "max_depth_default")]
    pub max_depth: usize,
}

impl ParsedConfiguration {
    pub fn initial() -> Self {
        ParsedConfiguration::empty()
    }

    pub fn empty() -> Self {
        Self {
            version: CURRENT_VERSION,
            dialect: Dialect::default(),
            time_zone: time_zone_default(),
            max_depth: max_depth_default(),
        }
    }
}

/// The SQL dialects we can render for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    #[default]
    Mysql,
    Postgres,
}

impl From<Dialect> for sql::dialect::Dialect {
    fn from(value: Dialect) -> Self {
        match value {
            Dialect::Mysql => sql::dialect::Dialect::MySql,
            Dialect::Postgres => sql::dialect::Dialect::Postgres,
        }
    }
}

// for serde default //
fn time_zone_default() -> String {
    DEFAULT_TIME_ZONE.to_string()
}
fn max_depth_default() -> usize {
    DEFAULT_MAX_DEPTH
}

/// The JSON schema of `configuration.json`.
pub fn configuration_jsonschema() -> RootSchema {
    SchemaSettings::draft07()
        .into_generator()
        .into_root_schema_for::<ParsedConfiguration>()
}

/// Parse the configuration format from a directory.
#[tracing::instrument(skip_all, fields(dir = %configuration_dir.as_ref().display()))]
pub async fn parse_configuration(
    configuration_dir: impl AsRef<Path>,
) -> Result<ParsedConfiguration, ParseConfigurationError> {
    let configuration_file = configuration_dir.as_ref().join(CONFIGURATION_FILENAME);

    let configuration_file_contents =
        fs::read_to_string(&configuration_file)
            .await
            .map_err(|err| {
                ParseConfigurationError::IoErrorButStringified(format!(
                    "{}: {}",
                    &configuration_file.display(),
                    err
                ))
            })?;

    let parsed_config: ParsedConfiguration = serde_json::from_str(&configuration_file_contents)
        .map_err(|error| ParseConfigurationError::ParseError {
            file_path: configuration_file.clone(),
            line: error.line(),
            column: error.column(),
            message: error.to_string(),
        })?;

    tracing::debug!(?parsed_config, "parsed configuration");
    Ok(parsed_config)
}

/// Write the parsed configuration, and its JSON schema, into a directory.
#[tracing::instrument(skip_all, fields(dir = %out_dir.as_ref().display()))]
pub async fn write_parsed_configuration(
    parsed_config: ParsedConfiguration,
    out_dir: impl AsRef<Path>,
) -> Result<(), WriteParsedConfigurationError> {
    let configuration_file = out_dir.as_ref().join(CONFIGURATION_FILENAME);
    fs::create_dir_all(out_dir.as_ref()).await?;

    // create the configuration file
    fs::write(
        configuration_file,
        serde_json::to_string_pretty(&parsed_config)? + "\n",
    )
    .await?;

    // create the jsonschema file
    let configuration_jsonschema_file_path =
        out_dir.as_ref().join(CONFIGURATION_JSONSCHEMA_FILENAME);
    fs::write(
        &configuration_jsonschema_file_path,
        serde_json::to_string_pretty(&configuration_jsonschema())? + "\n",
    )
    .await?;

    Ok(())
}
