//! Convert the parsed configuration into the form the compiler uses at runtime.

use query_engine_sql::sql::format::FormatOptions;
use query_engine_sql::sql::value::TimeZone;

use crate::configuration::Configuration;
use crate::error::MakeRuntimeConfigurationError;
use crate::version1::{ParsedConfiguration, CURRENT_VERSION};

/// Validate a 'ParsedConfiguration' and interpret it as a 'Configuration'.
pub fn make_runtime_configuration(
    parsed_config: ParsedConfiguration,
) -> Result<Configuration, MakeRuntimeConfigurationError> {
    if parsed_config.version != CURRENT_VERSION {
        return Err(MakeRuntimeConfigurationError::UnsupportedVersion(
            parsed_config.version,
            CURRENT_VERSION,
        ));
    }
    if parsed_config.max_depth == 0 {
        return Err(MakeRuntimeConfigurationError::ZeroMaxDepth);
    }

    let time_zone: TimeZone = parsed_config.time_zone.parse()?;

    Ok(Configuration {
        format: FormatOptions {
            dialect: parsed_config.dialect.into(),
            time_zone,
        },
        max_depth: parsed_config.max_depth,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version1::Dialect;
    use query_engine_sql::sql;

    #[test]
    fn initial_configuration_is_the_default() {
        let configuration = make_runtime_configuration(ParsedConfiguration::initial()).unwrap();
        assert_eq!(configuration, Configuration::default());
    }

    #[test]
    fn interprets_dialect_and_time_zone() {
        let parsed = ParsedConfiguration {
            dialect: Dialect::Postgres,
            time_zone: "Z".to_string(),
            ..ParsedConfiguration::initial()
        };
        let configuration = make_runtime_configuration(parsed).unwrap();
        assert_eq!(configuration.format.dialect, sql::dialect::Dialect::Postgres);
        assert_eq!(configuration.format.time_zone, TimeZone::Utc);
    }

    #[test]
    fn rejects_invalid_settings() {
        let wrong_version = ParsedConfiguration {
            version: 2,
            ..ParsedConfiguration::initial()
        };
        assert!(matches!(
            make_runtime_configuration(wrong_version),
            Err(MakeRuntimeConfigurationError::UnsupportedVersion(2, 1))
        ));

        let bad_zone = ParsedConfiguration {
            time_zone: "mars".to_string(),
            ..ParsedConfiguration::initial()
        };
        assert!(matches!(
            make_runtime_configuration(bad_zone),
            Err(MakeRuntimeConfigurationError::InvalidTimeZone(_))
        ));

        let no_depth = ParsedConfiguration {
            max_depth: 0,
            ..ParsedConfiguration::initial()
        };
        assert!(matches!(
            make_runtime_configuration(no_depth),
            Err(MakeRuntimeConfigurationError::ZeroMaxDepth)
        ));
    }
}
