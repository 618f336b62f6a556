use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

/// Civil wall-clock time at which the portal opens the 7-days-ahead booking
/// window — submissions fire at this local reading regardless of the UTC
/// offset in effect that day.
pub const DEFAULT_SUBMIT_AT: &str = "00:01:01";
/// Operating timezone of the club and its portal.
pub const DEFAULT_TIMEZONE: &str = "America/Los_Angeles";
/// Lateness up to this many minutes past the submission target still counts
/// as "on time"; beyond it the run warns but proceeds rather than skipping.
pub const GRACE_MINUTES: i64 = 10;

/// Top-level config (courtbot.toml + COURTBOT_* env overrides).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourtbotConfig {
    pub schedule: ScheduleConfig,
    #[serde(default)]
    pub courts: CourtsConfig,
    #[serde(default)]
    pub portal: PortalConfig,
    #[serde(default)]
    pub notify: NotifyConfig,
}

/// The weekly booking schedule and submission timing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// Comma-delimited weekly slot list, e.g.
    /// `"Tuesday 7:00 PM|Both, Friday 4:00 PM"`.
    pub weekly: String,
    /// Wall-clock submission time, `HH:MM:SS`.
    #[serde(default = "default_submit_at")]
    pub submit_at: String,
    /// IANA zone name the schedule is anchored to.
    #[serde(default = "default_timezone")]
    pub timezone: String,
    /// Selector applied to entries without an explicit `|selector`.
    #[serde(default = "default_selector")]
    pub default_selector: String,
    /// Reservation length for every request.
    #[serde(default = "default_duration_minutes")]
    pub default_duration_minutes: u32,
}

/// The paired court group the `Both` selector expands to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourtsConfig {
    #[serde(default = "default_pair")]
    pub pair: [String; 2],
}

impl Default for CourtsConfig {
    fn default() -> Self {
        Self {
            pair: default_pair(),
        }
    }
}

/// Member-portal endpoint the HTTP booking driver talks to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortalConfig {
    #[serde(default = "default_portal_url")]
    pub base_url: String,
    /// Optional bearer token; portal sessions without one rely on network
    /// trust (e.g. a tailnet-only portal).
    pub api_token: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            base_url: default_portal_url(),
            api_token: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Optional notification collaborators; a missing section disables that
/// channel.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct NotifyConfig {
    pub chat: Option<ChatNotifyConfig>,
    pub email: Option<EmailNotifyConfig>,
}

/// Group-chat gateway (GREEN-API-style instance/token routing).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatNotifyConfig {
    #[serde(default = "default_chat_api_url")]
    pub api_url: String,
    pub instance_id: String,
    pub api_token: String,
    /// Group chat that receives the run report.
    pub chat_id: String,
}

/// SMTP report email.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailNotifyConfig {
    #[serde(default = "default_smtp_host")]
    pub smtp_host: String,
    /// 465 uses implicit TLS; anything else negotiates STARTTLS.
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    pub username: String,
    pub password: String,
    /// Recipient; defaults to the sending account.
    pub to: Option<String>,
}

impl EmailNotifyConfig {
    pub fn recipient(&self) -> &str {
        self.to.as_deref().unwrap_or(&self.username)
    }
}

fn default_submit_at() -> String {
    DEFAULT_SUBMIT_AT.to_string()
}
fn default_timezone() -> String {
    DEFAULT_TIMEZONE.to_string()
}
fn default_selector() -> String {
    "Both".to_string()
}
fn default_duration_minutes() -> u32 {
    120
}
fn default_pair() -> [String; 2] {
    ["North".to_string(), "South".to_string()]
}
fn default_portal_url() -> String {
    "http://localhost:8080".to_string()
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_chat_api_url() -> String {
    "https://api.green-api.com".to_string()
}
fn default_smtp_host() -> String {
    "smtp.gmail.com".to_string()
}
fn default_smtp_port() -> u16 {
    465
}

impl CourtbotConfig {
    /// Load config from a TOML file with COURTBOT_* env var overrides.
    ///
    /// Checks in order:
    ///   1. Explicit path argument
    ///   2. ~/.courtbot/courtbot.toml
    pub fn load(config_path: Option<&str>) -> crate::error::Result<Self> {
        let path = config_path
            .map(String::from)
            .unwrap_or_else(default_config_path);

        let config: CourtbotConfig = Figment::new()
            .merge(Toml::file(&path))
            .merge(Env::prefixed("COURTBOT_").split("_"))
            .extract()
            .map_err(|e| crate::error::CoreError::Config(e.to_string()))?;

        Ok(config)
    }

    /// Resolve the configured zone name against the IANA database.
    pub fn operating_tz(&self) -> crate::error::Result<chrono_tz::Tz> {
        self.schedule
            .timezone
            .parse()
            .map_err(|_| crate::error::CoreError::Timezone(self.schedule.timezone.clone()))
    }
}

fn default_config_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.courtbot/courtbot.toml", home)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_optional_sections() {
        let config: CourtbotConfig = Figment::new()
            .merge(Toml::string(
                r#"
                [schedule]
                weekly = "Tuesday 7:00 PM|Both"
                "#,
            ))
            .extract()
            .expect("minimal config should parse");

        assert_eq!(config.schedule.submit_at, DEFAULT_SUBMIT_AT);
        assert_eq!(config.schedule.timezone, DEFAULT_TIMEZONE);
        assert_eq!(config.schedule.default_duration_minutes, 120);
        assert_eq!(config.courts.pair, ["North", "South"]);
        assert!(config.notify.chat.is_none());
        assert!(config.notify.email.is_none());
    }

    #[test]
    fn unknown_timezone_is_an_error() {
        let config: CourtbotConfig = Figment::new()
            .merge(Toml::string(
                r#"
                [schedule]
                weekly = ""
                timezone = "Mars/Olympus_Mons"
                "#,
            ))
            .extract()
            .unwrap();
        assert!(config.operating_tz().is_err());
    }

    #[test]
    fn email_recipient_falls_back_to_sender() {
        let email = EmailNotifyConfig {
            smtp_host: default_smtp_host(),
            smtp_port: 465,
            username: "club@example.org".into(),
            password: "secret".into(),
            to: None,
        };
        assert_eq!(email.recipient(), "club@example.org");
    }
}
