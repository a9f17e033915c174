use std::{env, fmt::Display, path::PathBuf, str::FromStr, time::Duration};

use crate::error::ConfigError;

pub const DEFAULT_DIRECTORY_URL: &str = "https://www.themealdb.com/api/json/v1/1/search.php";
pub const IN_MEMORY_DATABASE: &str = ":memory:";

/// Settings of the `recipe-store` backend.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreConfig {
    pub port: u16,
    pub database_url: String,
    pub database_name: String,
}

impl StoreConfig {
    pub fn load() -> Result<Self, ConfigError> {
        Ok(Self {
            port: try_load("PORT", "5000")?,
            database_url: try_load("DATABASE_URL", ".")?,
            database_name: try_load("DATABASE_NAME", "recipeApp")?,
        })
    }

    /// Location of the database file, `None` for an in-memory database.
    pub fn database_path(&self) -> Option<PathBuf> {
        if self.database_url == IN_MEMORY_DATABASE {
            return None;
        }
        Some(PathBuf::from(&self.database_url).join(format!("{}.sqlite3", self.database_name)))
    }
}

/// Settings of the `recipe-keeper` bot.
#[derive(Debug, Clone, PartialEq)]
pub struct BrowserConfig {
    pub directory_url: String,
    pub store_url: String,
    pub request_timeout: Duration,
    pub default_query: String,
}

impl BrowserConfig {
    pub fn load() -> Result<Self, ConfigError> {
        Ok(Self {
            directory_url: try_load("DIRECTORY_URL", DEFAULT_DIRECTORY_URL)?,
            store_url: try_load("STORE_URL", "http://localhost:5000")?,
            request_timeout: Duration::from_secs(try_load("HTTP_TIMEOUT_SECS", "10")?),
            default_query: try_load("DEFAULT_QUERY", "Arrabiata")?,
        })
    }
}

fn try_load<T: FromStr>(key: &'static str, default: &str) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    let value = env::var(key).unwrap_or_else(|_| {
        log::info!("{key} not set, using default: {default}");
        default.to_string()
    });
    parse_value(key, &value)
}

fn parse_value<T: FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    value.parse().map_err(|e: T::Err| ConfigError::Invalid {
        key,
        value: value.to_string(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_value() {
        let port: u16 = parse_value("PORT", "8080").unwrap();
        assert_eq!(port, 8080);

        let err = parse_value::<u16>("PORT", "eighty").unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }

    #[test]
    fn test_database_path() {
        let mut config = StoreConfig {
            port: 5000,
            database_url: "/var/lib/recipes".to_string(),
            database_name: "recipeApp".to_string(),
        };
        assert_eq!(
            config.database_path(),
            Some(PathBuf::from("/var/lib/recipes/recipeApp.sqlite3"))
        );

        config.database_url = IN_MEMORY_DATABASE.to_string();
        assert_eq!(config.database_path(), None);
    }
}
