use crate::error::{RedirectorError, Result};
use crate::events::FocusedWindow;
use crate::utils::text::eq_ignore_case;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Описание приложения: имя и критерии сопоставления с окном
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationDescriptor {
    pub name: String,
    pub window_title: String,
    pub class_name: String,
    pub executable: String,
}

impl Default for ApplicationDescriptor {
    fn default() -> Self {
        Self {
            name: "New Application".to_string(),
            window_title: String::new(),
            class_name: String::new(),
            executable: String::new(),
        }
    }
}

impl ApplicationDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_window_title(mut self, title: impl Into<String>) -> Self {
        self.window_title = title.into();
        self
    }

    pub fn with_class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = class_name.into();
        self
    }

    pub fn with_executable(mut self, executable: impl Into<String>) -> Self {
        self.executable = executable.into();
        self
    }

    fn has_criteria(&self) -> bool {
        !self.window_title.is_empty() || !self.class_name.is_empty() || !self.executable.is_empty()
    }

    /// Все непустые критерии должны совпасть с окном.
    /// Заголовок сравнивается как подстрока, класс и путь - целиком.
    pub fn matches_window(&self, window: &FocusedWindow) -> bool {
        if !self.has_criteria() {
            return false;
        }
        (self.executable.is_empty() || window.executable_is(&self.executable))
            && (self.class_name.is_empty() || window.class_is(&self.class_name))
            && (self.window_title.is_empty() || window.title_contains(&self.window_title))
    }
}

impl fmt::Display for ApplicationDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Реестр приложений с уникальными (без учёта регистра) именами
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApplicationRegistry {
    applications: Vec<ApplicationDescriptor>,
}

impl ApplicationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Добавить приложение; имя не должно совпадать с уже существующим
    pub fn add(&mut self, descriptor: ApplicationDescriptor) -> Result<()> {
        if self.find_by_name(&descriptor.name).is_some() {
            return Err(RedirectorError::DuplicateName(descriptor.name));
        }
        self.applications.push(descriptor);
        Ok(())
    }

    pub fn find_by_name(&self, name: &str) -> Option<&ApplicationDescriptor> {
        self.applications
            .iter()
            .find(|app| eq_ignore_case(&app.name, name))
    }

    /// Удалить приложение. Ссылки на него из правил остаются висячими,
    /// резолвер их просто пропускает.
    pub fn remove(&mut self, name: &str) -> Option<ApplicationDescriptor> {
        let index = self
            .applications
            .iter()
            .position(|app| eq_ignore_case(&app.name, name))?;
        Some(self.applications.remove(index))
    }

    /// Первое приложение, критерии которого подходят под активное окно
    pub fn identify(&self, window: &FocusedWindow) -> Option<&ApplicationDescriptor> {
        self.applications.iter().find(|app| app.matches_window(window))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ApplicationDescriptor> {
        self.applications.iter()
    }

    pub fn len(&self) -> usize {
        self.applications.len()
    }

    pub fn is_empty(&self) -> bool {
        self.applications.is_empty()
    }

    /// Имя, встречающееся повторно (без учёта регистра), если есть
    pub(crate) fn first_duplicate_name(&self) -> Option<&str> {
        self.applications.iter().enumerate().find_map(|(i, app)| {
            self.applications[..i]
                .iter()
                .any(|earlier| eq_ignore_case(&earlier.name, &app.name))
                .then_some(app.name.as_str())
        })
    }
}

impl<'a> IntoIterator for &'a ApplicationRegistry {
    type Item = &'a ApplicationDescriptor;
    type IntoIter = std::slice::Iter<'a, ApplicationDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.applications.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_rejects_case_insensitive_duplicates() {
        let mut registry = ApplicationRegistry::new();
        registry.add(ApplicationDescriptor::new("Firefox")).unwrap();

        let err = registry.add(ApplicationDescriptor::new("FIREFOX")).unwrap_err();
        assert!(matches!(err, RedirectorError::DuplicateName(ref name) if name == "FIREFOX"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_add_preserves_order() {
        let mut registry = ApplicationRegistry::new();
        registry.add(ApplicationDescriptor::new("b")).unwrap();
        registry.add(ApplicationDescriptor::new("a")).unwrap();

        let names: Vec<&str> = registry.iter().map(|app| app.name.as_str()).collect();
        assert_eq!(names, vec!["b", "a"]);
    }

    #[test]
    fn test_find_by_name_is_case_insensitive_exact() {
        let mut registry = ApplicationRegistry::new();
        registry
            .add(ApplicationDescriptor::new("Terminal").with_executable("/usr/bin/kitty"))
            .unwrap();

        assert_eq!(
            registry.find_by_name("terminal").map(|app| app.executable.as_str()),
            Some("/usr/bin/kitty")
        );
        assert!(registry.find_by_name("Term").is_none());
    }

    #[test]
    fn test_remove() {
        let mut registry = ApplicationRegistry::new();
        registry.add(ApplicationDescriptor::new("Editor")).unwrap();

        assert!(registry.remove("EDITOR").is_some());
        assert!(registry.remove("Editor").is_none());
        assert!(registry.is_empty());
        // После удаления имя снова свободно
        registry.add(ApplicationDescriptor::new("editor")).unwrap();
    }

    #[test]
    fn test_identify_uses_all_non_empty_criteria() {
        let mut registry = ApplicationRegistry::new();
        registry
            .add(ApplicationDescriptor::new("Empty"))
            .unwrap();
        registry
            .add(
                ApplicationDescriptor::new("Private Browsing")
                    .with_class_name("firefox")
                    .with_window_title("private"),
            )
            .unwrap();
        registry
            .add(ApplicationDescriptor::new("Browser").with_class_name("Firefox"))
            .unwrap();

        let private = FocusedWindow::new("Mozilla Firefox Private Browsing").with_class("firefox");
        let normal = FocusedWindow::new("Mozilla Firefox").with_class("firefox");
        let other = FocusedWindow::new("Terminal").with_class("kitty");

        assert_eq!(registry.identify(&private).map(|a| a.name.as_str()), Some("Private Browsing"));
        assert_eq!(registry.identify(&normal).map(|a| a.name.as_str()), Some("Browser"));
        assert!(registry.identify(&other).is_none());
    }

    #[test]
    fn test_first_duplicate_name() {
        let registry = ApplicationRegistry {
            applications: vec![
                ApplicationDescriptor::new("one"),
                ApplicationDescriptor::new("two"),
                ApplicationDescriptor::new("ONE"),
            ],
        };
        assert_eq!(registry.first_duplicate_name(), Some("ONE"));
        assert_eq!(ApplicationRegistry::new().first_duplicate_name(), None);
    }
}
