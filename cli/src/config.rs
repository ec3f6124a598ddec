//! CLI Configuration

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::output::OutputFormat;

pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Config {
    pub api_url: Option<String>,
    pub admin_id: Option<String>,
    pub default_format: Option<String>,
}

/// The admin a command acts for, if anyone is logged in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    admin_id: Option<String>,
}

impl Session {
    pub fn new(admin_id: Option<String>) -> Self {
        Self { admin_id: admin_id.filter(|id| !id.trim().is_empty()) }
    }

    pub fn admin_id(&self) -> Option<&str> {
        self.admin_id.as_deref()
    }

    /// Admin id, or the message a logged-out admin action gets.
    pub fn require_admin(&self) -> Result<&str> {
        self.admin_id()
            .context("You must be logged in as an admin to save forms. Run `eventforms session login <admin-id>`.")
    }
}

impl Config {
    pub fn load(profile: Option<&str>) -> Result<Self> {
        Self::load_from(&Self::config_path(profile)?)
    }

    pub fn save(&self, profile: Option<&str>) -> Result<PathBuf> {
        let path = Self::config_path(profile)?;
        self.save_to(&path)?;
        Ok(path)
    }

    fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))
    }

    fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn session(&self) -> Session {
        Session::new(self.admin_id.clone())
    }

    pub fn default_format(&self) -> Option<OutputFormat> {
        use clap::ValueEnum;
        self.default_format
            .as_deref()
            .and_then(|f| OutputFormat::from_str(f, true).ok())
    }

    fn config_path(profile: Option<&str>) -> Result<PathBuf> {
        let home = dirs::home_dir().context("Cannot find home directory")?;
        let filename = match profile {
            Some(p) => format!("config.{}.toml", p),
            None => "config.toml".to_string(),
        };
        Ok(home.join(".eventforms").join(filename))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_admin_is_logged_out() {
        assert!(Session::new(Some("  ".into())).require_admin().is_err());
        assert_eq!(Session::new(Some("admin-1".into())).require_admin().unwrap(), "admin-1");
    }

    #[test]
    fn test_save_and_reload() {
        let path = std::env::temp_dir()
            .join(format!("eventforms-cli-{}", std::process::id()))
            .join("config.toml");
        let config = Config {
            api_url: Some("http://forms.local/api".into()),
            admin_id: Some("admin-1".into()),
            default_format: Some("json".into()),
        };
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.session().admin_id(), Some("admin-1"));
        assert!(matches!(loaded.default_format(), Some(OutputFormat::Json)));
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_missing_file_is_default() {
        let config = Config::load_from(Path::new("/nonexistent/eventforms/config.toml")).unwrap();
        assert!(config.admin_id.is_none());
    }
}
