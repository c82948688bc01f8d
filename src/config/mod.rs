use crate::errors::{AppError, AppResult};
use crate::models::settings::Settings;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub database: String,
    #[serde(flatten)]
    pub settings: Settings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: Self::database_file().to_string_lossy().to_string(),
            settings: Settings::default(),
        }
    }
}

impl Config {
    /// `~/.paytimer`, falling back to the working directory without a home.
    pub fn config_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".paytimer")
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("paytimer.conf")
    }

    /// Return the full path of the default SQLite database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("paytimer.sqlite")
    }

    /// Load configuration from file, or return defaults if not found.
    pub fn load() -> AppResult<Self> {
        Self::load_from(&Self::config_file())
    }

    pub fn load_from(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path).map_err(|_| AppError::ConfigLoad)?;
        let cfg: Config = serde_yaml::from_str(&content)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn save(&self) -> AppResult<()> {
        self.save_to(&Self::config_file())
    }

    pub fn save_to(&self, path: &Path) -> AppResult<()> {
        self.validate()?;
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        fs::write(path, serde_yaml::to_string(self)?)?;
        Ok(())
    }

    pub fn validate(&self) -> AppResult<()> {
        let s = &self.settings;
        if s.work_time_in_seconds <= 0 {
            return Err(AppError::Config("work time must be positive".into()));
        }
        if s.maximum_overtime_allowed_in_seconds < 0 {
            return Err(AppError::Config("overtime limit cannot be negative".into()));
        }
        if s.gross_pay_per_month < 0 {
            return Err(AppError::Config("gross pay cannot be negative".into()));
        }
        Ok(())
    }

    /// Snapshot of the work session in progress, kept next to the database.
    pub fn session_file(&self) -> PathBuf {
        PathBuf::from(format!("{}.session.json", self.database))
    }

    /// Create the config directory, the config file (unless `is_test`) and
    /// return the resulting configuration.
    pub fn init_all(custom_name: Option<String>, is_test: bool) -> AppResult<Self> {
        let dir = Self::config_dir();
        fs::create_dir_all(&dir)?;

        // DB name: user provided or default
        let db_path = match custom_name {
            Some(name) => {
                let p = Path::new(&name);
                if p.is_absolute() {
                    p.to_path_buf()
                } else {
                    dir.join(p)
                }
            }
            None => Self::database_file(),
        };

        // keep settings from an existing file
        let mut config = Self::load().unwrap_or_default();
        config.database = db_path.to_string_lossy().to_string();

        if !is_test {
            config.save()?;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    #[test]
    fn missing_fields_take_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("paytimer.conf");
        fs::write(&path, "database: /tmp/x.sqlite\ngross_pay_per_month: 9000\n").unwrap();

        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg.database, "/tmp/x.sqlite");
        assert_eq!(cfg.settings.gross_pay_per_month, 9000);
        assert_eq!(cfg.settings.work_time_in_seconds, 8 * 3600);
        assert!(cfg.settings.is_logging_overtime);
        assert_eq!(cfg.settings.first_weekday, Weekday::Mon);
    }

    #[test]
    fn save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("paytimer.conf");
        let mut cfg = Config {
            database: "db.sqlite".into(),
            settings: Settings::default(),
        };
        cfg.settings.first_weekday = Weekday::Sun;
        cfg.settings.is_calculating_net_pay = true;
        cfg.save_to(&path).unwrap();

        assert_eq!(Config::load_from(&path).unwrap(), cfg);
    }

    #[test]
    fn invalid_values_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("paytimer.conf");
        fs::write(&path, "database: x\nwork_time_in_seconds: 0\n").unwrap();
        assert!(matches!(Config::load_from(&path), Err(AppError::Config(_))));
    }

    #[test]
    fn session_file_sits_next_to_database() {
        let cfg = Config {
            database: "/data/pay.sqlite".into(),
            settings: Settings::default(),
        };
        assert_eq!(cfg.session_file(), PathBuf::from("/data/pay.sqlite.session.json"));
    }
}
