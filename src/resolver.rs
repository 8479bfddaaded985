//! Разрешение захваченного события в список действий.
//!
//! Устройство → комбинация → переопределение по активному приложению.
//! Функции чистые: без ввода-вывода, без аллокаций, результат заимствуется
//! из [`RuleSet`].

use crate::config::MatchBy;
use crate::events::{FocusedWindow, KeyCombination};
use crate::rules::{Action, FocusedApplicationOverride, KeyBinding, KeyboardProfile, RuleSet};

/// Как идентифицировано активное приложение
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusQuery<'a> {
    /// Имя из реестра приложений
    Application(&'a str),
    /// Путь к исполняемому файлу активного окна
    Executable(&'a str),
    /// Приложение не определено; применимо только запасное переопределение
    Unknown,
}

impl<'a> FocusQuery<'a> {
    /// Построить запрос по снимку активного окна
    pub fn for_window(
        rules: &'a RuleSet,
        window: Option<&'a FocusedWindow>,
        match_by: MatchBy,
    ) -> Self {
        let Some(window) = window else {
            return FocusQuery::Unknown;
        };

        match match_by {
            MatchBy::Executable if !window.executable.is_empty() => {
                FocusQuery::Executable(&window.executable)
            }
            MatchBy::Executable => FocusQuery::Unknown,
            MatchBy::Application => match rules.applications.identify(window) {
                Some(app) => FocusQuery::Application(&app.name),
                None => FocusQuery::Unknown,
            },
        }
    }
}

/// Действия для события с устройства `device_id`.
/// Неизвестное устройство или комбинация дают пустой список.
pub fn resolve<'r>(
    rules: &'r RuleSet,
    device_id: &str,
    combination: &KeyCombination,
    focus: &FocusQuery<'_>,
) -> &'r [Action] {
    match rules.keyboards.find_by_device_id(device_id) {
        Some(profile) => resolve_in_profile(rules, profile, combination, focus),
        None => &[],
    }
}

/// То же для событий без идентификатора устройства
pub fn resolve_low_level<'r>(
    rules: &'r RuleSet,
    combination: &KeyCombination,
    focus: &FocusQuery<'_>,
) -> &'r [Action] {
    resolve_in_profile(rules, &rules.low_level_keyboard, combination, focus)
}

fn resolve_in_profile<'r>(
    rules: &'r RuleSet,
    profile: &'r KeyboardProfile,
    combination: &KeyCombination,
    focus: &FocusQuery<'_>,
) -> &'r [Action] {
    profile
        .find_binding(combination)
        .and_then(|binding| select_override(rules, binding, focus))
        .map(|focused| focused.actions.as_slice())
        .unwrap_or(&[])
}

fn select_override<'r>(
    rules: &'r RuleSet,
    binding: &'r KeyBinding,
    focus: &FocusQuery<'_>,
) -> Option<&'r FocusedApplicationOverride> {
    let matched = match *focus {
        // Висячие ссылки (удалённое приложение) не участвуют в сопоставлении
        FocusQuery::Application(name) => binding.overrides.iter().find(|focused| {
            !focused.is_fallback()
                && focused.matches_application(name)
                && focused.application(&rules.applications).is_some()
        }),
        FocusQuery::Executable(path) => {
            binding.find_override_by_executable(&rules.applications, path)
        }
        FocusQuery::Unknown => None,
    };

    matched.or_else(|| binding.fallback_override())
}

/// Нужно ли поглотить исходное нажатие
pub fn should_capture(rules: &RuleSet, device_id: &str, combination: &KeyCombination) -> bool {
    rules
        .keyboards
        .find_by_device_id(device_id)
        .is_some_and(|profile| profile_captures(profile, combination))
}

pub fn should_capture_low_level(rules: &RuleSet, combination: &KeyCombination) -> bool {
    profile_captures(&rules.low_level_keyboard, combination)
}

fn profile_captures(profile: &KeyboardProfile, combination: &KeyCombination) -> bool {
    profile.capture_all_keys
        || profile
            .find_binding(combination)
            .is_some_and(|binding| binding.capture)
}
