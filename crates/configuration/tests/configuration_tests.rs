//! Tests that configuration survives a trip through the filesystem.

use std::fs;

use similar_asserts::assert_eq;

use sqlfilter_configuration::{
    error::ParseConfigurationError, make_runtime_configuration, parse_configuration,
    write_parsed_configuration, Dialect, ParsedConfiguration, CONFIGURATION_FILENAME,
    CONFIGURATION_JSONSCHEMA_FILENAME,
};

#[tokio::test]
async fn writes_and_reads_back_configuration() {
    let dir = tempfile::tempdir().expect("tempfile::tempdir");
    let parsed = ParsedConfiguration {
        dialect: Dialect::Postgres,
        time_zone: "+01:00".to_string(),
        max_depth: 8,
        ..ParsedConfiguration::initial()
    };

    write_parsed_configuration(parsed.clone(), dir.path())
        .await
        .expect("write_parsed_configuration");

    assert!(dir.path().join(CONFIGURATION_FILENAME).exists());
    let schema: serde_json::Value = serde_json::from_str(
        &fs::read_to_string(dir.path().join(CONFIGURATION_JSONSCHEMA_FILENAME)).unwrap(),
    )
    .unwrap();
    assert_eq!(schema["title"], "ParsedConfiguration");

    let read_back = parse_configuration(dir.path())
        .await
        .expect("parse_configuration");
    assert_eq!(read_back, parsed);

    let configuration = make_runtime_configuration(read_back).unwrap();
    assert_eq!(configuration.max_depth, 8);
}

#[tokio::test]
async fn missing_configuration_is_an_io_error() {
    let dir = tempfile::tempdir().expect("tempfile::tempdir");
    let result = parse_configuration(dir.path()).await;
    assert!(matches!(
        result,
        Err(ParseConfigurationError::IoErrorButStringified(_))
    ));
}

#[tokio::test]
async fn malformed_configuration_reports_the_position() {
    let dir = tempfile::tempdir().expect("tempfile::tempdir");
    fs::write(
        dir.path().join(CONFIGURATION_FILENAME),
        "{\n  \"version\": 1,\n  \"dialect\": \"oracle\"\n}\n",
    )
    .unwrap();

    match parse_configuration(dir.path()).await {
        Err(ParseConfigurationError::ParseError { line, .. }) => assert_eq!(line, 3),
        other => panic!("expected a parse error, got {other:?}"),
    }
}
