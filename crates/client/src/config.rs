use config::ConfigError;
use serde::Deserialize;
use std::collections::HashMap;

#[derive(Deserialize, Clone)]
pub struct Settings {
    pub backend: BackendSettings,
    pub viewer: ViewerSettings,
    pub post: PostSettings,
}

#[derive(Deserialize, Clone)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum BackendSettings {
    Http { base_url: String },
    Demo,
}

#[derive(Deserialize, Clone)]
pub struct ViewerSettings {
    pub id: String,
    pub name: Option<String>,
}

#[derive(Deserialize, Clone)]
pub struct PostSettings {
    pub id: String,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());
        let env_map = collect_env_vars();

        let s = config::Config::builder()
            .set_default("backend.mode", "demo")?
            .set_default("backend.base_url", "http://127.0.0.1:3001/api")?
            .set_default("viewer.id", "user123")?
            .set_default("viewer.name", "Current User")?
            .set_default("post.id", "demo-post")?
            .add_source(config::File::with_name("config").required(false))
            .add_source(config::File::with_name(&format!("config.{}", run_mode)).required(false))
            .add_source(config::File::from_str(
                &serde_json::to_string(&env_map)
                    .expect("Environment variables should serialize to JSON"),
                config::FileFormat::Json,
            ))
            .build()?;

        s.try_deserialize()
    }
}

fn collect_env_vars() -> HashMap<String, String> {
    std::env::vars()
        .filter(|(k, _)| k.starts_with("NESTLING_"))
        .map(|(k, v)| {
            let new_key = k
                .trim_start_matches("NESTLING_")
                .replace("__", ".")
                .to_lowercase();
            (new_key, v)
        })
        .collect()
}
