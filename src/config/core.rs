use anyhow::{Context, Result};
use figment::{
    Figment,
    providers::{Env, Format, Json, Toml, Yaml},
};

use super::Settings;

// Embed the default config at compile time
const DEFAULT_CONFIG: &str = include_str!("../../default-config.toml");

const ENV_PREFIX: &str = "QUICK_PIPREQS_";

pub struct ConfigLoader {
    figment: Figment,
}

impl ConfigLoader {
    pub fn load_with_custom_config(custom_config: Option<&str>) -> Self {
        let mut figment = Figment::new().merge(Toml::string(DEFAULT_CONFIG));

        // A custom config replaces both the user and the project layer
        if let Some(custom_path) = custom_config {
            figment = match extension(custom_path) {
                Some("json") => figment.merge(Json::file(custom_path)),
                Some("yaml" | "yml") => figment.merge(Yaml::file(custom_path)),
                _ => figment.merge(Toml::file(custom_path)),
            };
        } else {
            let user = Self::user_config_path();
            figment = figment
                .merge(Toml::file(&user))
                .merge(Json::file(user.replace(".toml", ".json")))
                .merge(Yaml::file(user.replace(".toml", ".yaml")))
                .merge(Yaml::file(user.replace(".toml", ".yml")))
                .merge(Toml::file("quick-pipreqs.toml"))
                .merge(Json::file("quick-pipreqs.json"))
                .merge(Yaml::file("quick-pipreqs.yaml"))
                .merge(Yaml::file("quick-pipreqs.yml"));
        }

        // Environment variables always have highest priority
        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        ConfigLoader { figment }
    }

    /// Extract the merged, typed settings
    pub fn settings(&self) -> Result<Settings> {
        self.figment
            .extract()
            .context("Failed to load quick-pipreqs configuration")
    }

    fn user_config_path() -> String {
        match std::env::var("HOME") {
            Ok(home) => format!("{home}/.config/quick-pipreqs/config.toml"),
            Err(_) => "~/.config/quick-pipreqs/config.toml".to_string(),
        }
    }
}

fn extension(path: &str) -> Option<&str> {
    std::path::Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
}
