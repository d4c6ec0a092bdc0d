use std::fs;
use std::path::PathBuf;

use query_engine_translation::translation::filter::{self, operators, query::Query};
use sqlfilter_configuration::{Configuration, CONFIGURATION_FILENAME};

/// Compile the filter of a goldenfile directory with its configuration, if it has one.
pub async fn test_translation(testname: &str) -> anyhow::Result<String> {
    test_translation_from(testname, operators::Polarity::Direct).await
}

/// Like `test_translation`, starting from the table of the given polarity.
pub async fn test_translation_from(
    testname: &str,
    polarity: operators::Polarity,
) -> anyhow::Result<String> {
    let directory = PathBuf::from("tests/goldenfiles").join(testname);

    let configuration = if directory.join(CONFIGURATION_FILENAME).exists() {
        let parsed_configuration = sqlfilter_configuration::parse_configuration(&directory).await?;
        sqlfilter_configuration::make_runtime_configuration(parsed_configuration)?
    } else {
        Configuration::default()
    };

    let filter: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(directory.join("filter.json"))?)?;
    let query = Query::from_json(filter)?;

    Ok(filter::build_with(
        &configuration,
        query.as_ref(),
        operators::OperatorTable::for_polarity(polarity),
    )?)
}
