use adapter::database::connect_database_with;
use anyhow::{Context, Result};
use api::route::v1;
use axum::Router;
use kernel::engine::occupancy::OccupancyPolicy;
use kernel::model::slot::SlotCalendar;
use registry::AppRegistry;
use shared::config::{AppConfig, StudioConfig};
use shared::env::{which, Environment};
use std::net::{Ipv4Addr, SocketAddr};
use tokio::net::TcpListener;
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tower_http::LatencyUnit;
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    init_logger()?;
    bootstrap().await
}

fn init_logger() -> Result<()> {
    let log_level = match which() {
        Environment::Development => "debug",
        Environment::Production => "info",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| log_level.into());

    let subscriber = tracing_subscriber::fmt::layer()
        .with_file(true)
        .with_line_number(true)
        .with_target(false);

    tracing_subscriber::registry()
        .with(subscriber)
        .with(env_filter)
        .try_init()?;

    Ok(())
}

// 営業時間と色分けの閾値は起動時に一度だけ検証する
fn build_studio_rules(cfg: &StudioConfig) -> Result<(SlotCalendar, OccupancyPolicy)> {
    let calendar = SlotCalendar::new(cfg.opening_hour, cfg.closing_hour, cfg.max_duration_hours)
        .context("invalid studio operating hours")?;
    let policy = OccupancyPolicy::new(cfg.busy_ratio, 1.0)
        .with_context(|| format!("STUDIO_BUSY_RATIO must be in (0, 1]: {}", cfg.busy_ratio))?;
    Ok((calendar, policy))
}

async fn bootstrap() -> Result<()> {
    let app_config = AppConfig::new()?;
    let (calendar, policy) = build_studio_rules(&app_config.studio)?;
    let pool = connect_database_with(&app_config.database);
    pool.migrate().await?;

    tracing::info!(
        opening_hour = calendar.opening_hour(),
        closing_hour = calendar.closing_hour(),
        max_duration_hours = calendar.max_duration_hours(),
        "studio calendar loaded"
    );

    let registry = AppRegistry::new(pool, calendar, policy);

    let app = Router::new()
        .merge(v1::routes())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .latency_unit(LatencyUnit::Millis),
                ),
        )
        .with_state(registry);

    let addr = SocketAddr::new(Ipv4Addr::LOCALHOST.into(), 8080);
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Listening on {}", addr);
    axum::serve(listener, app)
        .await
        .context("Unexpected error happened in server")
        .inspect_err(|e| {
            tracing::error!(
                error.cause_chain = ?e,error.message = %e, "Unexpected error"
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_studio_rules_are_valid() {
        let (calendar, policy) = build_studio_rules(&StudioConfig::default()).unwrap();
        assert_eq!(calendar, SlotCalendar::default());
        assert_eq!(policy, OccupancyPolicy::default());
    }

    #[test]
    fn rejects_bad_studio_rules() {
        let inverted = StudioConfig {
            opening_hour: 20,
            closing_hour: 8,
            ..StudioConfig::default()
        };
        assert!(build_studio_rules(&inverted).is_err());
        let ratio = StudioConfig {
            busy_ratio: 1.5,
            ..StudioConfig::default()
        };
        assert!(build_studio_rules(&ratio).is_err());
    }
}
