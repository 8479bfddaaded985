use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::rules::RuleStore;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub logging: LoggingConfig,
    pub rules: RulesConfig,
    pub focus: FocusConfig,
    pub execution: ExecutionConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RulesConfig {
    /// `auto` - файл рядом с исполняемым файлом
    pub path: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FocusConfig {
    pub detection_mode: String,
    pub polling_interval_ms: u64,
    pub match_by: MatchBy,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExecutionConfig {
    /// Пауза после запуска программы с `wait_for_input_idle`
    pub input_idle_delay_ms: u64,
}

/// По какому признаку сопоставлять активное окно с переопределениями
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchBy {
    /// Определить приложение по реестру и искать по его имени
    Application,
    /// Искать по пути исполняемого файла окна
    Executable,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "compact".to_string(),
            },
            rules: RulesConfig {
                path: "auto".to_string(),
            },
            focus: FocusConfig {
                detection_mode: "xdotool".to_string(),
                polling_interval_ms: 250,
                match_by: MatchBy::Application,
            },
            execution: ExecutionConfig {
                input_idle_delay_ms: 500,
            },
        }
    }
}

impl Config {
    pub const ENV_PREFIX: &'static str = "KEYREDIR_";

    /// Значения по умолчанию ← TOML файл (если есть) ← переменные окружения
    pub fn load<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        let config_path = config_path.as_ref();

        let figment = Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(config_path))
            .merge(Env::prefixed(Self::ENV_PREFIX).split("__"));

        Self::from_figment(figment)
            .with_context(|| format!("Не удалось загрузить конфигурацию из {:?}", config_path))
    }

    fn from_figment(figment: Figment) -> Result<Self> {
        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        // Валидация настроек логирования
        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!("Неверный уровень логирования: {}", self.logging.level),
        }

        match self.logging.format.as_str() {
            "compact" | "full" => {}
            _ => anyhow::bail!("Неверный формат логирования: {}", self.logging.format),
        }

        if self.rules.path.trim().is_empty() {
            anyhow::bail!("rules.path не может быть пустым (используйте \"auto\")");
        }

        // Валидация настроек окон
        match self.focus.detection_mode.as_str() {
            "xdotool" | "none" => {}
            _ => anyhow::bail!(
                "Неверный режим детекции окон: {}",
                self.focus.detection_mode
            ),
        }

        if self.focus.polling_interval_ms < 50 {
            anyhow::bail!("polling_interval_ms должно быть минимум 50");
        }

        Ok(())
    }

    /// Путь к файлу правил с учётом `auto`
    pub fn rules_path(&self) -> Result<PathBuf> {
        if self.rules.path == "auto" {
            RuleStore::default_path().context("Не удалось определить расположение файла правил")
        } else {
            Ok(PathBuf::from(&self.rules.path))
        }
    }
}
