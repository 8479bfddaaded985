use crate::error::{RedirectorError, Result};
use crate::mappings::{KeyNameToEvdevCode, KeyNames};
use crate::redirector_error;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;
use std::str::FromStr;

/// Код клавиши (evdev коды). Ядро не интерпретирует значение,
/// имена выдаёт внешний [`KeyNames`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyCode(pub u16);

impl KeyCode {
    pub const LEFT_CTRL: KeyCode = KeyCode(29);
    pub const LEFT_SHIFT: KeyCode = KeyCode(42);
    pub const LEFT_ALT: KeyCode = KeyCode(56);

    pub fn new(code: u16) -> Self {
        Self(code)
    }

    pub fn value(&self) -> u16 {
        self.0
    }
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KEY_{}", self.0)
    }
}

/// Комбинация клавиш в порядке захвата: модификаторы, затем основная клавиша.
///
/// Сравнение позиционное: `ctrl+alt+a` и `alt+ctrl+a` - разные комбинации.
/// Порядок модификаторов определяется тем, кто захватывал событие.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyCombination {
    codes: SmallVec<[KeyCode; 4]>,
}

impl KeyCombination {
    pub fn new<I>(modifiers: I, key: KeyCode) -> Self
    where
        I: IntoIterator<Item = KeyCode>,
    {
        let mut codes: SmallVec<[KeyCode; 4]> = modifiers.into_iter().collect();
        codes.push(key);
        Self { codes }
    }

    pub fn single(key: KeyCode) -> Self {
        Self::new(std::iter::empty(), key)
    }

    pub fn from_codes<I>(codes: I) -> Self
    where
        I: IntoIterator<Item = KeyCode>,
    {
        Self {
            codes: codes.into_iter().collect(),
        }
    }

    pub fn codes(&self) -> &[KeyCode] {
        &self.codes
    }

    /// Все коды кроме последнего
    pub fn modifiers(&self) -> &[KeyCode] {
        match self.codes.split_last() {
            Some((_, modifiers)) => modifiers,
            None => &[],
        }
    }

    /// Основная (последняя) клавиша
    pub fn key(&self) -> Option<KeyCode> {
        self.codes.last().copied()
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Человекочитаемое имя: имена клавиш через `+` в порядке захвата
    pub fn display_name(&self, names: &dyn KeyNames) -> String {
        let mut result = String::new();
        for (i, code) in self.codes.iter().enumerate() {
            if i > 0 {
                result.push('+');
            }
            result.push_str(&names.key_name(*code));
        }
        result
    }
}

impl fmt::Display for KeyCombination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, code) in self.codes.iter().enumerate() {
            if i > 0 {
                write!(f, "+")?;
            }
            write!(f, "{}", code)?;
        }
        Ok(())
    }
}

/// Разбор строки вида `ctrl+alt+a` или `29+56+30`
impl FromStr for KeyCombination {
    type Err = RedirectorError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(redirector_error!(invalid_key, "пустая комбинация"));
        }

        let mut codes: SmallVec<[KeyCode; 4]> = SmallVec::new();
        for part in trimmed.split('+') {
            let part = part.trim();
            if part.is_empty() {
                return Err(redirector_error!(
                    invalid_key,
                    "пустой элемент в комбинации '{}'",
                    s
                ));
            }
            codes.push(parse_key(part)?);
        }

        Ok(Self { codes })
    }
}

/// Имя из таблицы, затем `KEY_<n>`, затем число. Имена `0`..`9` означают
/// цифровые клавиши, а не коды.
fn parse_key(part: &str) -> Result<KeyCode> {
    if let Ok(code) = KeyNameToEvdevCode::translate(part) {
        return Ok(KeyCode(code));
    }

    let numeric = match part.get(..4) {
        Some(prefix) if prefix.eq_ignore_ascii_case("KEY_") => &part[4..],
        _ => part,
    };
    numeric
        .parse::<u16>()
        .map(KeyCode)
        .map_err(|_| redirector_error!(invalid_key, "Unknown key: {}", part))
}

/// Идентификатор источника, который не различает устройства
pub const LOW_LEVEL_DEVICE: &str = "-";

/// Захваченное событие: устройство и комбинация
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedKey {
    pub device_id: String,
    pub combination: KeyCombination,
    pub timestamp: std::time::Instant,
}

impl CapturedKey {
    pub fn new(device_id: impl Into<String>, combination: KeyCombination) -> Self {
        Self {
            device_id: device_id.into(),
            combination,
            timestamp: std::time::Instant::now(),
        }
    }

    pub fn low_level(combination: KeyCombination) -> Self {
        Self::new(LOW_LEVEL_DEVICE, combination)
    }

    pub fn is_low_level(&self) -> bool {
        self.device_id == LOW_LEVEL_DEVICE
    }
}

impl fmt::Display for CapturedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}[{}] ({})",
            self.combination,
            self.device_id,
            self.timestamp.elapsed().as_millis()
        )
    }
}
