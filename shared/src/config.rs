use anyhow::{Context, Result};
use std::str::FromStr;

pub struct AppConfig {
    pub database: DatabaseConfig,
    pub studio: StudioConfig,
}

impl AppConfig {
    pub fn new() -> Result<Self> {
        let database = DatabaseConfig {
            host: std::env::var("DATABASE_HOST")?,
            port: std::env::var("DATABASE_PORT")?.parse::<u16>()?,
            username: std::env::var("DATABASE_USERNAME")?,
            password: std::env::var("DATABASE_PASSWORD")?,
            database: std::env::var("DATABASE_NAME")?,
        };
        let studio = StudioConfig {
            opening_hour: env_or("STUDIO_OPENING_HOUR", 8)?,
            closing_hour: env_or("STUDIO_CLOSING_HOUR", 23)?,
            max_duration_hours: env_or("STUDIO_MAX_DURATION_HOURS", 12)?,
            busy_ratio: env_or("STUDIO_BUSY_RATIO", 0.5)?,
        };
        Ok(Self { database, studio })
    }
}

pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub database: String,
}

// 営業時間と予約枠の設定。カレンダーの色分けの閾値もここで持つ
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StudioConfig {
    pub opening_hour: u32,
    pub closing_hour: u32,
    pub max_duration_hours: u32,
    pub busy_ratio: f64,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            opening_hour: 8,
            closing_hour: 23,
            max_duration_hours: 12,
            busy_ratio: 0.5,
        }
    }
}

fn env_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} has an invalid value: {raw}")),
        Err(_) => Ok(default),
    }
}
