use crate::error::{RedirectorError, Result};
use atomic_write_file::AtomicWriteFile;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::RuleSet;

/// Файл правил с явным жизненным циклом: `open` → изменения → `save`.
///
/// Один экземпляр на процесс передаётся тем компонентам, которым он нужен;
/// глобального состояния нет.
#[derive(Debug)]
pub struct RuleStore {
    path: PathBuf,
    rules: RuleSet,
}

impl RuleStore {
    pub const FILE_NAME: &'static str = "rules.toml";

    /// Каноническое расположение: рядом с исполняемым файлом
    pub fn default_path() -> Result<PathBuf> {
        let exe = std::env::current_exe()?;
        let dir = exe.parent().ok_or_else(|| {
            RedirectorError::Internal(format!(
                "Не удалось определить каталог исполняемого файла {:?}",
                exe
            ))
        })?;
        Ok(dir.join(Self::FILE_NAME))
    }

    /// Открыть хранилище. Отсутствующий или повреждённый файл не мешает
    /// запуску: используется набор правил по умолчанию.
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();

        let rules = if !path.exists() {
            info!("Файл правил {:?} не найден, используются правила по умолчанию", path);
            RuleSet::default()
        } else {
            match Self::load(&path) {
                Ok(rules) => rules,
                Err(e) => {
                    warn!(
                        "Не удалось загрузить правила из {:?}: {}. Используются правила по умолчанию",
                        path, e
                    );
                    RuleSet::default()
                }
            }
        };

        Self { path, rules }
    }

    /// Строгая загрузка: чтение, разбор и проверка
    pub fn load<P: AsRef<Path>>(path: P) -> Result<RuleSet> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let rules = Self::parse(&content)?;

        info!(
            "Правила загружены из {:?}: клавиатур {}, правил {}, приложений {}",
            path,
            rules.keyboards.len(),
            rules.binding_count(),
            rules.applications.len()
        );
        Ok(rules)
    }

    pub fn parse(content: &str) -> Result<RuleSet> {
        let rules: RuleSet = toml::from_str(content)?;
        rules.validate()?;
        Ok(rules)
    }

    pub fn render(rules: &RuleSet) -> Result<String> {
        Ok(toml::to_string_pretty(rules)?)
    }

    /// Полная перезапись файла (атомарно)
    pub fn save_to<P: AsRef<Path>>(rules: &RuleSet, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = Self::render(rules)?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut file = AtomicWriteFile::options().open(path)?;
        file.write_all(content.as_bytes())?;
        file.commit()?;

        debug!("Записано {} байт в {:?}", content.len(), path);
        Ok(())
    }

    pub fn save(&self) -> Result<()> {
        Self::save_to(&self.rules, &self.path)?;
        info!("Правила сохранены в {:?}", self.path);
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn rules_mut(&mut self) -> &mut RuleSet {
        &mut self.rules
    }

    pub fn into_rules(self) -> RuleSet {
        self.rules
    }
}
