use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub site: SiteConfig,
    #[serde(default)]
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub content: ContentConfig,
    #[serde(default)]
    pub media: MediaConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SiteConfig {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub url: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    pub path: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ContentConfig {
    /// How many posts and tags the front-page blocks show.
    #[serde(default = "default_front_page_limit")]
    pub front_page_limit: usize,
    /// Cap on posts listed on a tag page.
    #[serde(default = "default_tag_page_limit")]
    pub tag_page_limit: usize,
    /// Teaser length in characters for list views.
    #[serde(default = "default_teaser_length")]
    pub teaser_length: usize,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            front_page_limit: default_front_page_limit(),
            tag_page_limit: default_tag_page_limit(),
            teaser_length: default_teaser_length(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MediaConfig {
    #[serde(default = "default_media_dir")]
    pub dir: String,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            dir: default_media_dir(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_front_page_limit() -> usize {
    5
}

fn default_tag_page_limit() -> usize {
    20
}

fn default_teaser_length() -> usize {
    200
}

fn default_media_dir() -> String {
    "media".to_string()
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            anyhow::anyhow!(
                "Could not read config file '{}': {}. Are you in a Bramble site directory?",
                path.display(),
                e
            )
        })?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.content.front_page_limit == 0 {
            anyhow::bail!("content.front_page_limit must be greater than 0");
        }
        if self.content.tag_page_limit == 0 {
            anyhow::bail!("content.tag_page_limit must be greater than 0");
        }
        if self.content.teaser_length == 0 {
            anyhow::bail!("content.teaser_length must be greater than 0");
        }
        if self.content.teaser_length > 10000 {
            anyhow::bail!("content.teaser_length must be 10000 or less");
        }
        Ok(())
    }
}
