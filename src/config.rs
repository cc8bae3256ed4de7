use config::{Config, ConfigError, Environment, File as ConfigFile};
use serde::Deserialize;

use crate::repair::dates::{SentinelYear, SentinelZone};

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Calendar year that marks a timestamp as never correctly recorded.
    pub sentinel_year: i32,
    /// Timezone in which `sentinel_year` is evaluated.
    pub sentinel_zone: SentinelZone,
    /// Copy the resume file to `<file>.bak` before overwriting it.
    pub backup_before_write: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            sentinel_year: 1970,
            sentinel_zone: SentinelZone::Local,
            backup_before_write: false,
        }
    }
}

impl AppConfig {
    pub fn date_policy(&self) -> SentinelYear {
        SentinelYear {
            year: self.sentinel_year,
            zone: self.sentinel_zone,
        }
    }
}

pub fn load_configuration() -> Result<AppConfig, ConfigError> {
    let defaults = AppConfig::default();
    let builder = Config::builder()
        .set_default("sentinel_year", i64::from(defaults.sentinel_year))?
        .set_default("sentinel_zone", "local")?
        .set_default("backup_before_write", defaults.backup_before_write)?
        .add_source(ConfigFile::with_name("TransmissionCheck").required(false))
        .add_source(Environment::with_prefix("TRANSMISSION_CHECK").try_parsing(true))
        .build()?;
    builder.try_deserialize::<AppConfig>()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_documented_heuristic() {
        let config = AppConfig::default();
        assert_eq!(config.sentinel_year, 1970);
        assert_eq!(config.sentinel_zone, SentinelZone::Local);
        assert!(!config.backup_before_write);
    }

    #[test]
    fn test_date_policy_carries_config_values() {
        let config = AppConfig {
            sentinel_year: 1980,
            sentinel_zone: SentinelZone::Utc,
            backup_before_write: true,
        };
        let policy = config.date_policy();
        assert_eq!(policy.year, 1980);
        assert_eq!(policy.zone, SentinelZone::Utc);
    }
}
