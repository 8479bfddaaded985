//! Модель правил переназначения: клавиатуры, комбинации, переопределения
//! по активному приложению и действия.
//!
//! Дерево целиком принадлежит [`RuleSet`]. Переопределение ссылается на
//! приложение только по имени, поэтому удаление приложения не ломает правила.

pub mod action;
pub mod application;
pub mod binding;
pub mod keyboard;
pub mod store;

pub use action::{Action, ActionKind, LaunchApplication, SynthesizeKeystroke};
pub use application::{ApplicationDescriptor, ApplicationRegistry};
pub use binding::{FocusedApplicationOverride, KeyBinding, WILDCARD_APPLICATION};
pub use keyboard::{KeyboardProfile, KeyboardRegistry};
pub use store::RuleStore;

use crate::error::{RedirectorError, Result};
use serde::{Deserialize, Serialize};

/// Корень хранимых правил
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleSet {
    pub minimize_on_start: bool,
    pub keyboards: KeyboardRegistry,
    /// Правила для событий, источник которых не различает устройства
    pub low_level_keyboard: KeyboardProfile,
    pub applications: ApplicationRegistry,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Проверка инвариантов, которые не выражены типами
    pub fn validate(&self) -> Result<()> {
        if let Some(name) = self.applications.first_duplicate_name() {
            return Err(RedirectorError::DuplicateName(name.to_string()));
        }

        let profiles = self
            .keyboards
            .iter()
            .chain(std::iter::once(&self.low_level_keyboard));

        for profile in profiles {
            for (i, binding) in profile.bindings.iter().enumerate() {
                if binding.combination.is_empty() {
                    return RedirectorError::invalid_rules(format!(
                        "Пустая комбинация в правиле #{} клавиатуры '{}'",
                        i + 1,
                        profile.name
                    ));
                }

                for focused in &binding.overrides {
                    for action in &focused.actions {
                        if let Action::SynthesizeKeystroke(keystroke) = action {
                            let max = SynthesizeKeystroke::MAX_REPEAT_COUNT;
                            if !(1..=max).contains(&keystroke.repeat_count) {
                                return RedirectorError::invalid_rules(format!(
                                    "repeat_count должно быть от 1 до {} (клавиатура '{}', правило #{})",
                                    max,
                                    profile.name,
                                    i + 1
                                ));
                            }
                        }
                    }
                }
            }
        }

        Ok(())
    }

    /// Общее число правил по всем клавиатурам
    pub fn binding_count(&self) -> usize {
        self.keyboards
            .iter()
            .map(|keyboard| keyboard.bindings.len())
            .sum::<usize>()
            + self.low_level_keyboard.bindings.len()
    }
}
