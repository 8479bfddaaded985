use crate::events::KeyCombination;
use crate::mappings::KeyNames;
use crate::utils::text::eq_ignore_case;
use serde::{Deserialize, Serialize};

use super::action::Action;
use super::application::{ApplicationDescriptor, ApplicationRegistry};

/// Имя приложения, обозначающее запасное переопределение (вместе с пустым)
pub const WILDCARD_APPLICATION: &str = "*";

/// Действия для комбинации, когда активно указанное приложение.
///
/// `application_name` - слабая ссылка на [`ApplicationDescriptor`] по имени:
/// приложение может быть удалено, тогда ссылка просто не разрешается.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FocusedApplicationOverride {
    pub application_name: String,
    pub actions: Vec<Action>,
}

impl FocusedApplicationOverride {
    pub fn new(application_name: impl Into<String>) -> Self {
        Self {
            application_name: application_name.into(),
            actions: Vec::new(),
        }
    }

    /// Запасное переопределение для любого приложения
    pub fn fallback() -> Self {
        Self::new(WILDCARD_APPLICATION)
    }

    pub fn with_action(mut self, action: Action) -> Self {
        self.actions.push(action);
        self
    }

    pub fn is_fallback(&self) -> bool {
        self.application_name.is_empty() || self.application_name == WILDCARD_APPLICATION
    }

    pub fn matches_application(&self, name: &str) -> bool {
        eq_ignore_case(&self.application_name, name)
    }

    /// Найти описание приложения в реестре; `None` для висячей ссылки
    pub fn application<'a>(
        &self,
        registry: &'a ApplicationRegistry,
    ) -> Option<&'a ApplicationDescriptor> {
        registry.find_by_name(&self.application_name)
    }
}

/// Правило для одной комбинации клавиш на устройстве
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBinding {
    pub combination: KeyCombination,
    /// Поглощать исходное нажатие
    pub capture: bool,
    pub label: String,
    pub overrides: Vec<FocusedApplicationOverride>,
}

impl KeyBinding {
    pub fn new(combination: KeyCombination) -> Self {
        Self {
            combination,
            ..Self::default()
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_capture(mut self, capture: bool) -> Self {
        self.capture = capture;
        self
    }

    pub fn with_override(mut self, focused: FocusedApplicationOverride) -> Self {
        self.overrides.push(focused);
        self
    }

    pub fn find_override_by_name(&self, name: &str) -> Option<&FocusedApplicationOverride> {
        self.overrides
            .iter()
            .find(|focused| focused.matches_application(name))
    }

    /// Поиск по пути исполняемого файла разрешённого приложения.
    /// Переопределения с висячими ссылками пропускаются.
    pub fn find_override_by_executable(
        &self,
        registry: &ApplicationRegistry,
        executable: &str,
    ) -> Option<&FocusedApplicationOverride> {
        self.overrides.iter().find(|focused| {
            focused
                .application(registry)
                .is_some_and(|app| eq_ignore_case(&app.executable, executable))
        })
    }

    pub fn fallback_override(&self) -> Option<&FocusedApplicationOverride> {
        self.overrides.iter().find(|focused| focused.is_fallback())
    }

    /// `Control+Alt+A - подпись`
    pub fn display_name(&self, names: &dyn KeyNames) -> String {
        let mut name = self.combination.display_name(names);
        if !self.label.is_empty() {
            name.push_str(" - ");
            name.push_str(&self.label);
        }
        name
    }
}
