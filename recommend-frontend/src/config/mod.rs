use crate::services::providers::ClaudeConfig;
use secrecy::Secret;
use serde::Deserialize;

#[derive(Deserialize, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub qloo: QlooSettings,
    pub places: PlacesSettings,
    pub weather: WeatherSettings,
    pub assistant: AssistantSettings,
}

#[derive(Deserialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

/// Taste-graph service credentials and endpoint.
#[derive(Deserialize, Clone)]
pub struct QlooSettings {
    #[serde(default = "default_secret")]
    pub api_key: Secret<String>,
    #[serde(default = "default_qloo_base_url")]
    pub base_url: String,
}

fn default_secret() -> Secret<String> {
    Secret::new(String::new())
}

fn default_qloo_base_url() -> String {
    "https://hackathon.api.qloo.com".to_string()
}

/// Venue-details provider credentials and endpoint.
#[derive(Deserialize, Clone)]
pub struct PlacesSettings {
    #[serde(default = "default_secret")]
    pub api_key: Secret<String>,
    #[serde(default = "default_places_base_url")]
    pub base_url: String,
}

fn default_places_base_url() -> String {
    "https://maps.googleapis.com/maps/api/place".to_string()
}

/// Weather provider credentials and endpoint.
#[derive(Deserialize, Clone)]
pub struct WeatherSettings {
    #[serde(default = "default_secret")]
    pub api_key: Secret<String>,
    #[serde(default = "default_weather_base_url")]
    pub base_url: String,
}

fn default_weather_base_url() -> String {
    "https://api.openweathermap.org/data/2.5".to_string()
}

/// Chat-completion provider settings.
#[derive(Deserialize, Clone)]
pub struct AssistantSettings {
    #[serde(default = "default_secret")]
    pub api_key: Secret<String>,
    #[serde(default = "default_assistant_model")]
    pub model: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

fn default_assistant_model() -> String {
    "claude-3-haiku-20240307".to_string()
}

fn default_max_tokens() -> u32 {
    1000
}

fn default_temperature() -> f32 {
    0.7
}

impl From<AssistantSettings> for ClaudeConfig {
    fn from(settings: AssistantSettings) -> Self {
        ClaudeConfig {
            api_key: settings.api_key,
            model: settings.model,
            max_tokens: settings.max_tokens,
            temperature: settings.temperature,
        }
    }
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let base_path = std::env::current_dir()
        .map_err(|e| config::ConfigError::Message(format!("cannot determine cwd: {}", e)))?;

    // Works from the workspace root or from inside the crate directory.
    let configuration_directory = if base_path.ends_with("recommend-frontend") {
        base_path.join("config")
    } else {
        base_path.join("recommend-frontend").join("config")
    };

    let settings = config::Config::builder()
        .add_source(config::File::from(configuration_directory.join("base.yaml")).required(true))
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize::<Settings>()
}
