use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Таблица клавиш: имя в конфигурации, evdev код, отображаемое имя
pub(crate) static KEY_TABLE: &[(&str, u16, &str)] = &[
    // Буквенные клавиши
    ("a", 30, "A"),
    ("b", 48, "B"),
    ("c", 46, "C"),
    ("d", 32, "D"),
    ("e", 18, "E"),
    ("f", 33, "F"),
    ("g", 34, "G"),
    ("h", 35, "H"),
    ("i", 23, "I"),
    ("j", 36, "J"),
    ("k", 37, "K"),
    ("l", 38, "L"),
    ("m", 50, "M"),
    ("n", 49, "N"),
    ("o", 24, "O"),
    ("p", 25, "P"),
    ("q", 16, "Q"),
    ("r", 19, "R"),
    ("s", 31, "S"),
    ("t", 20, "T"),
    ("u", 22, "U"),
    ("v", 47, "V"),
    ("w", 17, "W"),
    ("x", 45, "X"),
    ("y", 21, "Y"),
    ("z", 44, "Z"),
    // Цифровые клавиши (верхний ряд)
    ("1", 2, "1"),
    ("2", 3, "2"),
    ("3", 4, "3"),
    ("4", 5, "4"),
    ("5", 6, "5"),
    ("6", 7, "6"),
    ("7", 8, "7"),
    ("8", 9, "8"),
    ("9", 10, "9"),
    ("0", 11, "0"),
    // Специальные клавиши
    ("space", 57, "Space"),
    ("enter", 28, "Enter"),
    ("escape", 1, "Escape"),
    ("backspace", 14, "Backspace"),
    ("tab", 15, "Tab"),
    ("capslock", 58, "Caps Lock"),
    // Знаки пунктуации
    ("minus", 12, "-"),
    ("equal", 13, "="),
    ("leftbrace", 26, "["),
    ("rightbrace", 27, "]"),
    ("backslash", 43, "\\"),
    ("semicolon", 39, ";"),
    ("apostrophe", 40, "'"),
    ("grave", 41, "`"),
    ("comma", 51, ","),
    ("dot", 52, "."),
    ("slash", 53, "/"),
    // Навигация/редакция
    ("insert", 110, "Insert"),
    ("delete", 111, "Delete"),
    ("home", 102, "Home"),
    ("end", 107, "End"),
    ("pageup", 104, "Page Up"),
    ("pagedown", 109, "Page Down"),
    // Системные
    ("printscreen", 99, "Print Screen"),
    ("scrolllock", 70, "Scroll Lock"),
    ("pause", 119, "Pause"),
    // Numpad
    ("kp0", 82, "NumPad 0"),
    ("kp1", 79, "NumPad 1"),
    ("kp2", 80, "NumPad 2"),
    ("kp3", 81, "NumPad 3"),
    ("kp4", 75, "NumPad 4"),
    ("kp5", 76, "NumPad 5"),
    ("kp6", 77, "NumPad 6"),
    ("kp7", 71, "NumPad 7"),
    ("kp8", 72, "NumPad 8"),
    ("kp9", 73, "NumPad 9"),
    ("kpdecimal", 83, "NumPad ."),
    ("kpdivide", 98, "NumPad /"),
    ("kpmultiply", 55, "NumPad *"),
    ("kpadd", 78, "NumPad +"),
    ("kpsubtract", 74, "NumPad -"),
    ("kpenter", 96, "NumPad Enter"),
    ("numlock", 69, "Num Lock"),
    // Модификаторы
    ("ctrl", 29, "Control"),
    ("alt", 56, "Alt"),
    ("shift", 42, "Shift"),
    ("super", 125, "Super"),
    ("rightctrl", 97, "Right Control"),
    ("rightalt", 100, "Right Alt"),
    ("rightshift", 54, "Right Shift"),
    ("rightsuper", 126, "Right Super"),
    ("menu", 127, "Menu"),
    // Стрелки
    ("up", 103, "Up"),
    ("down", 108, "Down"),
    ("left", 105, "Left"),
    ("right", 106, "Right"),
    // Функциональные клавиши
    ("f1", 59, "F1"),
    ("f2", 60, "F2"),
    ("f3", 61, "F3"),
    ("f4", 62, "F4"),
    ("f5", 63, "F5"),
    ("f6", 64, "F6"),
    ("f7", 65, "F7"),
    ("f8", 66, "F8"),
    ("f9", 67, "F9"),
    ("f10", 68, "F10"),
    ("f11", 87, "F11"),
    ("f12", 88, "F12"),
    // Мультимедиа
    ("mute", 113, "Mute"),
    ("volumedown", 114, "Volume Down"),
    ("volumeup", 115, "Volume Up"),
    ("nextsong", 163, "Next Track"),
    ("playpause", 164, "Play/Pause"),
    ("previoussong", 165, "Previous Track"),
    ("stopcd", 166, "Stop"),
    ("homepage", 172, "Browser Home"),
    ("mail", 155, "Mail"),
    ("calc", 140, "Calculator"),
];

// Синонимы, которые принимаются при разборе, но не используются при выводе
static ALIASES: &[(&str, &str)] = &[
    ("control", "ctrl"),
    ("lctrl", "ctrl"),
    ("rctrl", "rightctrl"),
    ("lalt", "alt"),
    ("ralt", "rightalt"),
    ("altgr", "rightalt"),
    ("lshift", "shift"),
    ("rshift", "rightshift"),
    ("meta", "super"),
    ("win", "super"),
    ("esc", "escape"),
    ("return", "enter"),
    ("del", "delete"),
    ("ins", "insert"),
    ("pgup", "pageup"),
    ("pgdn", "pagedown"),
];

static NAME_TO_CODE: Lazy<HashMap<&'static str, u16>> = Lazy::new(|| {
    let mut map: HashMap<&'static str, u16> =
        KEY_TABLE.iter().map(|&(name, code, _)| (name, code)).collect();
    for &(alias, target) in ALIASES {
        if let Some(&code) = map.get(target) {
            map.insert(alias, code);
        }
    }
    map
});

/// Преобразование имён клавиш в evdev коды
/// Отвечает за трансляцию строковых имён клавиш в числовые коды evdev
pub struct KeyNameToEvdevCode;

impl KeyNameToEvdevCode {
    /// Получить evdev код клавиши по её имени (регистронезависимо)
    pub fn translate(key_name: &str) -> Result<u16, String> {
        let normalized = key_name.trim().to_lowercase();
        NAME_TO_CODE
            .get(normalized.as_str())
            .copied()
            .ok_or_else(|| format!("Unknown key: {}", key_name))
    }

    /// Проверить, является ли клавиша модификатором
    pub fn is_modifier(keycode: u16) -> bool {
        matches!(keycode, 29 | 42 | 56 | 125 | 97 | 54 | 100 | 126)
    }
}
