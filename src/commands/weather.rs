use anyhow::Result;

use crate::{config::WeatherConfig, runtime::Runtime, service::WeatherService};

/// Print current conditions for a location
#[tracing::instrument(skip(runtime))]
pub async fn weather<R: Runtime>(runtime: R, location: &str) -> Result<()> {
    let config = WeatherConfig::from_runtime(&runtime)?;
    let service = WeatherService::new(&config)?;
    println!("{}", service.get_weather(location).await);
    Ok(())
}
