use config::ConfigError;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

use crate::bridge::ViewerOptions;
use crate::engagement::EngagementOptions;
use crate::pagination::PageOptions;

const ENV_PREFIX: &str = "THREADLINE_";

#[derive(Deserialize, Clone, Debug)]
pub struct Settings {
    pub api: ApiSettings,
    pub viewer: ViewerSettings,
    pub engagement: EngagementSettings,
    pub board: Option<BoardSettings>,
}

#[derive(Deserialize, Clone, Debug)]
pub struct ApiSettings {
    pub base_url: String,
    pub page_size: u32,
    pub timeout_secs: u64,
}

#[derive(Deserialize, Clone, Debug)]
pub struct ViewerSettings {
    pub line_height_px: u32,
    pub scroll_margin_px: u32,
    pub highlight_clear_ms: u64,
}

#[derive(Deserialize, Clone, Debug)]
pub struct EngagementSettings {
    pub cooldown_ms: u64,
}

/// Board to open when none is given on the command line.
#[derive(Deserialize, Clone, Debug)]
pub struct BoardSettings {
    pub id: i64,
    pub board_type: String,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());
        Self::load(&run_mode, collect_env_vars(std::env::vars()))
    }

    fn load(run_mode: &str, env_map: HashMap<String, String>) -> Result<Self, ConfigError> {
        let env_json = serde_json::to_string(&env_map)
            .map_err(|e| ConfigError::Message(format!("environment is not serialisable: {e}")))?;

        let s = config::Config::builder()
            .set_default("api.base_url", "http://127.0.0.1:8080")?
            .set_default("api.page_size", 10)?
            .set_default("api.timeout_secs", 10)?
            .set_default("viewer.line_height_px", 20)?
            .set_default("viewer.scroll_margin_px", 100)?
            .set_default("viewer.highlight_clear_ms", 3000)?
            .set_default("engagement.cooldown_ms", 300)?
            .add_source(config::File::with_name("threadline").required(false))
            .add_source(config::File::with_name(&format!("threadline.{}", run_mode)).required(false))
            .add_source(config::File::from_str(&env_json, config::FileFormat::Json))
            .build()?;

        s.try_deserialize()
    }

    pub fn http(&self) -> adapter::HttpConfig {
        adapter::HttpConfig {
            base_url: self.api.base_url.clone(),
            timeout: Duration::from_secs(self.api.timeout_secs),
        }
    }

    pub fn page_options(&self) -> PageOptions {
        PageOptions {
            page_size: self.api.page_size.max(1),
        }
    }

    pub fn viewer_options(&self) -> ViewerOptions {
        ViewerOptions {
            line_height_px: self.viewer.line_height_px,
            scroll_margin_px: self.viewer.scroll_margin_px,
            highlight_clear: Duration::from_millis(self.viewer.highlight_clear_ms),
        }
    }

    pub fn engagement_options(&self) -> EngagementOptions {
        EngagementOptions {
            cooldown: Duration::from_millis(self.engagement.cooldown_ms),
        }
    }
}

/// `THREADLINE_API__BASE_URL=...` becomes `api.base_url`.
fn collect_env_vars(vars: impl Iterator<Item = (String, String)>) -> HashMap<String, String> {
    vars.filter(|(k, _)| k.starts_with(ENV_PREFIX))
        .map(|(k, v)| {
            let new_key = k
                .trim_start_matches(ENV_PREFIX)
                .replace("__", ".")
                .to_lowercase();
            (new_key, v)
        })
        .collect()
}
