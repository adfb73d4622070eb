//! 환경 변수 기반 설정
//!
//! `.env` 파일이 있으면 먼저 읽고, 프로세스 환경 변수가 그 위에 적용된다.

use std::env;
use std::str::FromStr;

use crate::ledger::ValidationPolicy;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("환경 변수 {name} 값이 올바르지 않습니다: {value}")]
    InvalidValue { name: &'static str, value: String },
}

/// 저장소 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbDriver {
    MySql,
    Sqlite,
}

impl FromStr for DbDriver {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mysql" | "mariadb" => Ok(DbDriver::MySql),
            "sqlite" => Ok(DbDriver::Sqlite),
            _ => Err(()),
        }
    }
}

/// 데이터베이스 설정
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub driver: DbDriver,
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    /// sqlite에서는 파일 이름으로 쓰인다
    pub name: String,
    /// 설정 시 host/user/password/name 대신 사용
    pub url_override: Option<String>,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            driver: DbDriver::MySql,
            host: "localhost".into(),
            port: 3306,
            user: "root".into(),
            password: "123123".into(),
            name: "tokyo-edge".into(),
            url_override: None,
            max_connections: 5,
        }
    }
}

impl DatabaseConfig {
    /// 로그용 설명 (비밀번호 제외)
    pub fn describe(&self) -> String {
        match (&self.url_override, self.driver) {
            (Some(_), driver) => format!("{:?} DATABASE_URL", driver),
            (None, DbDriver::MySql) => {
                format!("mysql {}@{}:{}/{}", self.user, self.host, self.port, self.name)
            }
            (None, DbDriver::Sqlite) => format!("sqlite {}.db", self.name),
        }
    }
}

/// 서버 설정
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub port: u16,
    pub database: DatabaseConfig,
    pub validation: ValidationPolicy,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0".into(),
            port: 8000,
            database: DatabaseConfig::default(),
            validation: ValidationPolicy::default(),
        }
    }
}

impl ServerConfig {
    /// `.env`와 환경 변수에서 설정 로드
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// 조회 함수로부터 설정 구성 (값이 없으면 기본값)
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = ServerConfig::default();
        let db_defaults = defaults.database.clone();

        let database = DatabaseConfig {
            driver: parse_or(&lookup, "DB_DRIVER", db_defaults.driver)?,
            host: lookup("DB_HOST").unwrap_or(db_defaults.host),
            port: parse_or(&lookup, "DB_PORT", db_defaults.port)?,
            user: lookup("DB_USER").unwrap_or(db_defaults.user),
            password: lookup("DB_PASSWORD").unwrap_or(db_defaults.password),
            name: lookup("DB_NAME").unwrap_or(db_defaults.name),
            url_override: lookup("DATABASE_URL").filter(|url| !url.is_empty()),
            max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", db_defaults.max_connections)?,
        };

        let validation = match lookup("LAUNDRY_VALIDATION") {
            None => defaults.validation,
            Some(value) => ValidationPolicy::parse(&value).ok_or(ConfigError::InvalidValue {
                name: "LAUNDRY_VALIDATION",
                value,
            })?,
        };

        Ok(Self {
            bind_addr: lookup("BIND_ADDR").unwrap_or(defaults.bind_addr),
            port: parse_or(&lookup, "PORT", defaults.port)?,
            database,
            validation,
        })
    }
}

fn parse_or<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(name) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { name, value }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.port, 8000);
        assert_eq!(config.database.driver, DbDriver::MySql);
        assert_eq!(config.database.host, "localhost");
        assert_eq!(config.database.user, "root");
        assert_eq!(config.database.name, "tokyo-edge");
        assert_eq!(config.validation, ValidationPolicy::Truthy);
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("PORT", "3000"),
            ("DB_DRIVER", "sqlite"),
            ("DB_NAME", "ledger"),
            ("LAUNDRY_VALIDATION", "presence"),
        ])
        .unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.database.driver, DbDriver::Sqlite);
        assert_eq!(config.database.describe(), "sqlite ledger.db");
        assert_eq!(config.validation, ValidationPolicy::PresenceOnly);
    }

    #[test]
    fn test_invalid_port() {
        let err = config_from(&[("PORT", "oito mil")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { name: "PORT", .. }));
    }
}
