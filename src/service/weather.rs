use anyhow::{Context, Result, anyhow};
use log::{debug, warn};
use reqwest::Client;

use crate::config::WeatherConfig;
use crate::http::{HttpClient, USER_AGENT};

mod api {
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    pub struct CurrentWeather {
        pub data: Vec<Observation>,
    }

    #[derive(Debug, Deserialize)]
    pub struct Observation {
        pub city_name: String,
        pub temp: f64,
        pub weather: Condition,
    }

    #[derive(Debug, Deserialize)]
    pub struct Condition {
        pub description: String,
    }
}

/// Current-conditions lookup against a Weatherbit-compatible API.
pub struct WeatherService {
    http_client: HttpClient,
    config: WeatherConfig,
}

impl WeatherService {
    pub fn new(config: &WeatherConfig) -> Result<Self> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self::from_http_client(HttpClient::new(client), config))
    }

    pub fn from_http_client(http_client: HttpClient, config: &WeatherConfig) -> Self {
        Self {
            http_client,
            config: config.clone(),
        }
    }

    /// Never fails; errors are rendered into the returned text.
    #[tracing::instrument(skip(self))]
    pub async fn get_weather(&self, location: &str) -> String {
        match self.fetch(location).await {
            Ok(report) => report,
            Err(err) => {
                warn!("Weather lookup for {} failed: {:#}", location, err);
                format!("Error getting weather for '{}': {}", location, err)
            }
        }
    }

    async fn fetch(&self, location: &str) -> Result<String> {
        let url = format!("{}/current", self.config.api_url.trim_end_matches('/'));
        let query = [
            ("city", location.to_string()),
            ("key", self.config.api_key.clone()),
        ];
        let body = self.http_client.get_json(&url, &query).await?;
        let current: api::CurrentWeather =
            serde_json::from_value(body).context("Unexpected weather response")?;
        let observation = current
            .data
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("No weather data returned"))?;

        debug!("Observed {:?}", observation);
        Ok(format_report(&observation))
    }
}

fn format_report(observation: &api::Observation) -> String {
    let temp_c = observation.temp;
    let temp_f = temp_c * 9.0 / 5.0 + 32.0;
    let description = &observation.weather.description;

    let mut message = format!(
        "Current weather in **{}**:\nTemperature: **{:.1}°F / {:.1}°C**\nCondition: **{}**",
        observation.city_name, temp_f, temp_c, description
    );
    if description.to_lowercase().contains("rain") {
        message.push_str("; and it is raining!");
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn config(url: &str) -> WeatherConfig {
        WeatherConfig {
            api_key: "weather-key".to_string(),
            api_url: url.to_string(),
        }
    }

    #[tokio::test]
    async fn test_get_weather_formats_report() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();
        let mock = server
            .mock("GET", "/current")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("city".into(), "New York".into()),
                Matcher::UrlEncoded("key".into(), "weather-key".into()),
            ]))
            .with_status(200)
            .with_body(
                r#"{"data": [{"city_name": "New York", "temp": 20.0, "weather": {"description": "Clear sky"}}]}"#,
            )
            .create_async()
            .await;

        let service = WeatherService::new(&config(&url)).unwrap();
        let report = service.get_weather("New York").await;

        mock.assert_async().await;
        assert_eq!(
            report,
            "Current weather in **New York**:\nTemperature: **68.0°F / 20.0°C**\nCondition: **Clear sky**"
        );
    }

    #[tokio::test]
    async fn test_rain_suffix() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();
        let _mock = server
            .mock("GET", "/current")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(
                r#"{"data": [{"city_name": "London", "temp": 11.5, "weather": {"description": "Light Rain"}}]}"#,
            )
            .create_async()
            .await;

        let report = WeatherService::new(&config(&url))
            .unwrap()
            .get_weather("London")
            .await;

        assert!(report.contains("52.7°F / 11.5°C"));
        assert!(report.ends_with("Condition: **Light Rain**; and it is raining!"));
    }

    #[tokio::test]
    async fn test_error_status_is_rendered() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();
        let _mock = server
            .mock("GET", "/current")
            .match_query(Matcher::Any)
            .with_status(403)
            .with_body("API key not valid")
            .create_async()
            .await;

        let report = WeatherService::new(&config(&url))
            .unwrap()
            .get_weather("Atlantis")
            .await;

        assert_eq!(
            report,
            "Error getting weather for 'Atlantis': HTTP 403 Forbidden: API key not valid"
        );
    }

    #[tokio::test]
    async fn test_empty_data_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();
        let _mock = server
            .mock("GET", "/current")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"data": []}"#)
            .create_async()
            .await;

        let report = WeatherService::new(&config(&url))
            .unwrap()
            .get_weather("Nowhere")
            .await;

        assert_eq!(report, "Error getting weather for 'Nowhere': No weather data returned");
    }
}
