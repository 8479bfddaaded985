use crate::events::KeyCode;
use once_cell::sync::Lazy;
use std::borrow::Cow;
use std::collections::HashMap;

use super::key_name_to_evdev_code::KEY_TABLE;

/// Источник человекочитаемых имён клавиш.
///
/// Ядро хранит коды клавиш как непрозрачные числа и получает их имена
/// только через этот трейт, чтобы не зависеть от таблицы одной платформы.
pub trait KeyNames: Send + Sync {
    fn key_name(&self, code: KeyCode) -> Cow<'static, str>;
}

static DISPLAY_NAMES: Lazy<HashMap<u16, &'static str>> =
    Lazy::new(|| KEY_TABLE.iter().map(|&(_, code, display)| (code, display)).collect());

/// Имена для evdev кодов Linux
#[derive(Debug, Default, Clone, Copy)]
pub struct EvdevKeyNames;

impl KeyNames for EvdevKeyNames {
    fn key_name(&self, code: KeyCode) -> Cow<'static, str> {
        match DISPLAY_NAMES.get(&code.value()) {
            Some(name) => Cow::Borrowed(*name),
            None => Cow::Owned(code.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_names() {
        assert_eq!(EvdevKeyNames.key_name(KeyCode(30)), "A");
        assert_eq!(EvdevKeyNames.key_name(KeyCode(29)), "Control");
        assert_eq!(EvdevKeyNames.key_name(KeyCode(104)), "Page Up");
    }

    #[test]
    fn test_unknown_code_falls_back_to_number() {
        assert_eq!(EvdevKeyNames.key_name(KeyCode(999)), "KEY_999");
    }
}
