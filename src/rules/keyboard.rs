use crate::events::KeyCombination;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

use super::binding::KeyBinding;

/// Клавиатура (физическое или логическое устройство) и её правила.
///
/// Идентичность определяется `device_id`: два профиля с одинаковым
/// идентификатором считаются равными.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyboardProfile {
    pub name: String,
    pub device_id: String,
    pub capture_all_keys: bool,
    pub bindings: Vec<KeyBinding>,
}

impl KeyboardProfile {
    pub fn new(name: impl Into<String>, device_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            device_id: device_id.into(),
            ..Self::default()
        }
    }

    pub fn with_capture_all_keys(mut self, capture_all_keys: bool) -> Self {
        self.capture_all_keys = capture_all_keys;
        self
    }

    pub fn with_binding(mut self, binding: KeyBinding) -> Self {
        self.bindings.push(binding);
        self
    }

    /// Первое правило с равной (позиционно) комбинацией
    pub fn find_binding(&self, combination: &KeyCombination) -> Option<&KeyBinding> {
        self.bindings
            .iter()
            .find(|binding| binding.combination == *combination)
    }
}

impl PartialEq for KeyboardProfile {
    fn eq(&self, other: &Self) -> bool {
        self.device_id == other.device_id
    }
}

impl Eq for KeyboardProfile {}

impl Hash for KeyboardProfile {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.device_id.hash(state);
    }
}

impl fmt::Display for KeyboardProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Упорядоченный список клавиатур; поиск по `device_id`, не по позиции.
/// Дубликаты не отклоняются - это ошибка вызывающего кода.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyboardRegistry {
    keyboards: Vec<KeyboardProfile>,
}

impl KeyboardRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, profile: KeyboardProfile) {
        self.keyboards.push(profile);
    }

    pub fn find_by_device_id(&self, device_id: &str) -> Option<&KeyboardProfile> {
        self.keyboards
            .iter()
            .find(|keyboard| keyboard.device_id == device_id)
    }

    pub fn find_by_device_id_mut(&mut self, device_id: &str) -> Option<&mut KeyboardProfile> {
        self.keyboards
            .iter_mut()
            .find(|keyboard| keyboard.device_id == device_id)
    }

    pub fn remove(&mut self, device_id: &str) -> Option<KeyboardProfile> {
        let index = self
            .keyboards
            .iter()
            .position(|keyboard| keyboard.device_id == device_id)?;
        Some(self.keyboards.remove(index))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, KeyboardProfile> {
        self.keyboards.iter()
    }

    pub fn len(&self) -> usize {
        self.keyboards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keyboards.is_empty()
    }
}

impl<'a> IntoIterator for &'a KeyboardRegistry {
    type Item = &'a KeyboardProfile;
    type IntoIter = std::slice::Iter<'a, KeyboardProfile>;

    fn into_iter(self) -> Self::IntoIter {
        self.keyboards.iter()
    }
}

impl FromIterator<KeyboardProfile> for KeyboardRegistry {
    fn from_iter<I: IntoIterator<Item = KeyboardProfile>>(iter: I) -> Self {
        Self {
            keyboards: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profiles_equal_by_device_id() {
        let a = KeyboardProfile::new("Main", "usb-1234");
        let b = KeyboardProfile::new("Renamed", "usb-1234").with_capture_all_keys(true);
        let c = KeyboardProfile::new("Main", "usb-5678");

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_find_by_device_id_exact() {
        let registry: KeyboardRegistry = [
            KeyboardProfile::new("Main", "usb-1234"),
            KeyboardProfile::new("Macro pad", "usb-5678"),
        ]
        .into_iter()
        .collect();

        assert_eq!(
            registry.find_by_device_id("usb-5678").map(|k| k.name.as_str()),
            Some("Macro pad")
        );
        // Регистр идентификатора устройства значим
        assert!(registry.find_by_device_id("USB-5678").is_none());
        assert!(registry.find_by_device_id("unknown").is_none());
    }

    #[test]
    fn test_duplicate_device_ids_first_wins() {
        let mut registry = KeyboardRegistry::new();
        registry.push(KeyboardProfile::new("first", "dev"));
        registry.push(KeyboardProfile::new("second", "dev"));

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.find_by_device_id("dev").map(|k| k.name.as_str()), Some("first"));
    }

    #[test]
    fn test_find_binding_first_match_wins() {
        let combo: KeyCombination = "ctrl+f1".parse().unwrap();
        let profile = KeyboardProfile::new("Main", "dev")
            .with_binding(KeyBinding::new(combo.clone()).with_label("first"))
            .with_binding(KeyBinding::new(combo.clone()).with_label("second"));

        assert_eq!(profile.find_binding(&combo).map(|b| b.label.as_str()), Some("first"));
        assert!(profile.find_binding(&"ctrl+f2".parse().unwrap()).is_none());
    }

    #[test]
    fn test_find_binding_respects_modifier_order() {
        let profile = KeyboardProfile::new("Main", "dev")
            .with_binding(KeyBinding::new("ctrl+alt+a".parse().unwrap()));

        assert!(profile.find_binding(&"ctrl+alt+a".parse().unwrap()).is_some());
        assert!(profile.find_binding(&"alt+ctrl+a".parse().unwrap()).is_none());
    }
}
