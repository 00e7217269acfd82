//! Weather client (wttr.in JSON format)

use crate::config::WeatherConfig;
use crate::error::{AppError, Result};
use crate::sources::types::WeatherReport;
use crate::sources::{send_checked, Source};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct WttrResponse {
    current_condition: Vec<CurrentCondition>,
}

#[derive(Debug, Deserialize)]
struct CurrentCondition {
    #[serde(rename = "temp_C")]
    temp_c: String,
    humidity: String,
    #[serde(rename = "windspeedKmph")]
    windspeed_kmph: String,
    #[serde(rename = "weatherCode")]
    weather_code: String,
    #[serde(rename = "weatherDesc")]
    weather_desc: Vec<TextValue>,
}

#[derive(Debug, Deserialize)]
struct TextValue {
    value: String,
}

pub struct WeatherClient {
    client: Client,
    base_url: String,
    city: String,
}

impl WeatherClient {
    pub fn new(client: Client, config: &WeatherConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            city: config.city.clone(),
        }
    }

    fn url(&self) -> String {
        format!("{}/{}", self.base_url, urlencoding::encode(&self.city))
    }
}

#[async_trait]
impl Source for WeatherClient {
    type Record = WeatherReport;

    fn id(&self) -> &'static str {
        "weather"
    }

    async fn fetch(&self) -> Result<Vec<WeatherReport>> {
        let request = self.client.get(self.url()).query(&[("format", "j1")]);

        let response = send_checked(request, self.id()).await?;
        let body = response.text().await?;

        Ok(vec![parse_report(&self.city, &body)?])
    }
}

/// Build the snapshot from the first current-condition entry
pub fn parse_report(city: &str, body: &str) -> Result<WeatherReport> {
    let response: WttrResponse = serde_json::from_str(body)?;

    let current = response
        .current_condition
        .into_iter()
        .next()
        .ok_or_else(|| AppError::Payload("current_condition is empty".to_string()))?;

    let description = current
        .weather_desc
        .into_iter()
        .next()
        .map(|d| d.value)
        .ok_or_else(|| AppError::Payload("weatherDesc is empty".to_string()))?;

    Ok(WeatherReport {
        city: city.to_string(),
        temperature: format!("{}°C", current.temp_c),
        description,
        humidity: format!("{}%", current.humidity),
        wind_speed: format!("{} km/h", current.windspeed_kmph),
        condition_code: current.weather_code,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HttpConfig;
    use crate::sources::build_http_client;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn sample_payload() -> serde_json::Value {
        json!({
            "current_condition": [{
                "temp_C": "12",
                "humidity": "71",
                "windspeedKmph": "13",
                "weatherCode": "116",
                "weatherDesc": [{"value": "Partly cloudy"}]
            }],
            "nearest_area": []
        })
    }

    #[test]
    fn test_parse_report_formats_units() {
        let report = parse_report("London", &sample_payload().to_string()).unwrap();

        assert_eq!(report.city, "London");
        assert_eq!(report.temperature, "12°C");
        assert_eq!(report.humidity, "71%");
        assert_eq!(report.wind_speed, "13 km/h");
        assert_eq!(report.description, "Partly cloudy");
        assert_eq!(report.condition_code, "116");
    }

    #[test]
    fn test_malformed_payloads() {
        let empty = json!({"current_condition": []}).to_string();
        assert!(matches!(parse_report("London", &empty), Err(AppError::Payload(_))));

        let missing = json!({"weather": []}).to_string();
        assert!(matches!(parse_report("London", &missing), Err(AppError::Serialization(_))));

        assert!(parse_report("London", "<html>Unknown location</html>").is_err());
    }

    #[tokio::test]
    async fn test_fetch_requests_json_for_city() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/New%20York"))
            .and(query_param("format", "j1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(sample_payload()))
            .expect(1)
            .mount(&server)
            .await;

        let config = WeatherConfig {
            base_url: server.uri(),
            city: "New York".to_string(),
        };
        let client = WeatherClient::new(build_http_client(&HttpConfig::default()).unwrap(), &config);

        let reports = client.fetch().await.unwrap();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].city, "New York");
    }
}
