//! Detector configuration
//!
//! Deserialized from the `[http]`, `[newmotion]` and `[[chargecloud]]`
//! tables of the application config file. Every field has a default so an
//! empty file yields the stock detector list.

use serde::{Deserialize, Serialize};

/// Configuration for all availability detectors
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DetectorsConfig {
    /// Shared HTTP client settings
    #[serde(default)]
    pub http: HttpConfig,
    /// NewMotion (Shell Recharge) detector
    #[serde(default)]
    pub newmotion: NewMotionConfig,
    /// Chargecloud operators, tried after NewMotion in file order
    #[serde(default)]
    pub chargecloud: Vec<ChargecloudConfig>,
}

/// HTTP client settings shared by every detector
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Whole-request timeout in seconds (connect, headers and body)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Connect timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub connect_timeout_secs: u64,
    /// User-Agent header
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_user_agent() -> String {
    format!("evmap-availability/{}", env!("CARGO_PKG_VERSION"))
}

/// NewMotion detector settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMotionConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_newmotion_url")]
    pub base_url: String,
}

impl Default for NewMotionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: default_newmotion_url(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_newmotion_url() -> String {
    "https://ui-map.shellrecharge.com/api/map/v2".to_string()
}

/// One Chargecloud operator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChargecloudConfig {
    /// Operator name, used as the source tag
    pub name: String,
    /// Chargecloud operator id
    pub operator_id: String,
    #[serde(default = "default_chargecloud_url")]
    pub base_url: String,
}

fn default_chargecloud_url() -> String {
    "https://app.chargecloud.de/emobility:ocpi".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_config_defaults() {
        let config: DetectorsConfig = toml::from_str("").unwrap();
        assert!(config.newmotion.enabled);
        assert_eq!(config.http.timeout_secs, 10);
        assert!(config.chargecloud.is_empty());
    }

    #[test]
    fn test_chargecloud_operators() {
        let config: DetectorsConfig = toml::from_str(
            r#"
            [newmotion]
            enabled = false

            [[chargecloud]]
            name = "Maingau"
            operator_id = "606a0da0dfdd338ee4134605653d4fd8"

            [[chargecloud]]
            name = "SW Kiel"
            operator_id = "6336fe713f2eb7fa04b97ff6651b76f8"
            base_url = "http://localhost:9000"
            "#,
        )
        .unwrap();

        assert!(!config.newmotion.enabled);
        assert_eq!(config.chargecloud.len(), 2);
        assert_eq!(
            config.chargecloud[0].base_url,
            "https://app.chargecloud.de/emobility:ocpi"
        );
        assert_eq!(config.chargecloud[1].name, "SW Kiel");
        assert_eq!(config.chargecloud[1].base_url, "http://localhost:9000");
    }

    #[test]
    fn test_http_section() {
        let config: DetectorsConfig = toml::from_str(
            r#"
            [http]
            timeout_secs = 3
            user_agent = "evmap-test"
            "#,
        )
        .unwrap();

        assert_eq!(
            (
                config.http.timeout_secs,
                config.http.connect_timeout_secs,
                config.http.user_agent.as_str()
            ),
            (3, 10, "evmap-test")
        );
    }
}
