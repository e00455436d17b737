use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use url::Url;

/// Process-wide configuration, resolved on first access.
///
/// Layers, lowest priority first: compiled defaults, `config.toml`,
/// `NEWS_*` environment variables (`__` separates sections, e.g.
/// `NEWS_NEWSAPI__API_KEY`).
pub static CONFIG: LazyLock<Config> = LazyLock::new(|| {
    Config::load().unwrap_or_else(|e| panic!("FATAL: invalid configuration: {e}"))
});

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub basic: BasicConfig,
    pub newsapi: NewsApiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BasicConfig {
    pub listen_addr: String,
    pub database_url: String,
    pub loglevel: String,
    /// Guards the `/admin` routes.
    pub admin_key: String,
    /// Master key for private cookies; at least 64 bytes. A random key is
    /// generated when unset, which invalidates flash cookies on restart.
    pub cookie_secret: Option<String>,
    pub insecure_cookie: bool,
}

impl Default for BasicConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8000".to_string(),
            database_url: "sqlite:news.sqlite".to_string(),
            loglevel: "info".to_string(),
            admin_key: "admin".to_string(),
            cookie_secret: None,
            insecure_cookie: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NewsApiConfig {
    pub api_key: String,
    pub base_url: Url,
    pub timeout_secs: u64,
    pub language: String,
    pub country: String,
    pub proxy: Option<Url>,
}

impl Default for NewsApiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: NEWSAPI_BASE_URL.clone(),
            timeout_secs: 10,
            language: "en".to_string(),
            country: "us".to_string(),
            proxy: None,
        }
    }
}

pub static NEWSAPI_BASE_URL: LazyLock<Url> = LazyLock::new(|| {
    Url::parse("https://newsapi.org/v2").expect("FATAL: invalid built-in NewsAPI url")
});

impl Config {
    pub fn load() -> Result<Self, figment::Error> {
        Self::figment().extract()
    }

    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file("config.toml"))
            .merge(Env::prefixed("NEWS_").split("__"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_public_newsapi() {
        let cfg = Config::default();
        assert_eq!(cfg.newsapi.base_url.as_str(), "https://newsapi.org/v2");
        assert_eq!(cfg.newsapi.timeout_secs, 10);
        assert_eq!(cfg.basic.listen_addr, "0.0.0.0:8000");
    }

    #[test]
    fn env_overrides_nested_keys() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("NEWS_NEWSAPI__API_KEY", "secret");
            jail.set_env("NEWS_BASIC__INSECURE_COOKIE", "true");
            let cfg = Config::load()?;
            assert_eq!(cfg.newsapi.api_key, "secret");
            assert!(cfg.basic.insecure_cookie);
            assert_eq!(cfg.newsapi.language, "en");
            Ok(())
        });
    }

    #[test]
    fn toml_file_is_layered_under_env() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                r#"
                [newsapi]
                country = "br"
                language = "pt"
                "#,
            )?;
            jail.set_env("NEWS_NEWSAPI__LANGUAGE", "es");
            let cfg = Config::load()?;
            assert_eq!(cfg.newsapi.country, "br");
            assert_eq!(cfg.newsapi.language, "es");
            Ok(())
        });
    }
}
