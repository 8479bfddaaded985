use crate::events::KeyCode;
use crate::mappings::KeyNames;
use serde::{Deserialize, Serialize};

/// Запуск внешней программы
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LaunchApplication {
    pub command: String,
    pub wait_for_input_idle: bool,
    pub wait_for_exit: bool,
}

impl LaunchApplication {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            ..Self::default()
        }
    }

    pub fn details(&self) -> String {
        self.command.clone()
    }
}

/// Синтез нажатия: модификаторы, клавиша и число повторов (не меньше 1)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthesizeKeystroke {
    pub control: bool,
    pub shift: bool,
    pub alt: bool,
    pub virtual_key: u16,
    pub repeat_count: u32,
}

impl Default for SynthesizeKeystroke {
    fn default() -> Self {
        Self {
            control: false,
            shift: false,
            alt: false,
            virtual_key: 0,
            repeat_count: 1,
        }
    }
}

impl SynthesizeKeystroke {
    /// Верхняя граница `repeat_count` в файле правил
    pub const MAX_REPEAT_COUNT: u32 = 1000;

    pub fn new(virtual_key: KeyCode) -> Self {
        Self {
            virtual_key: virtual_key.value(),
            ..Self::default()
        }
    }

    pub fn with_control(mut self, control: bool) -> Self {
        self.control = control;
        self
    }

    pub fn with_shift(mut self, shift: bool) -> Self {
        self.shift = shift;
        self
    }

    pub fn with_alt(mut self, alt: bool) -> Self {
        self.alt = alt;
        self
    }

    pub fn with_repeat_count(mut self, repeat_count: u32) -> Self {
        self.repeat_count = repeat_count;
        self
    }

    /// Число повторов, приведённое к `1..=MAX_REPEAT_COUNT`
    pub fn repeats(&self) -> u32 {
        self.repeat_count.clamp(1, Self::MAX_REPEAT_COUNT)
    }

    pub fn key(&self) -> KeyCode {
        KeyCode(self.virtual_key)
    }

    /// Модификаторы в порядке нажатия: Control, Shift, Alt
    pub fn modifier_codes(&self) -> impl Iterator<Item = KeyCode> {
        [
            (self.control, KeyCode::LEFT_CTRL),
            (self.shift, KeyCode::LEFT_SHIFT),
            (self.alt, KeyCode::LEFT_ALT),
        ]
        .into_iter()
        .filter_map(|(set, code)| set.then_some(code))
    }

    /// `Control + Alt + A  x3`
    pub fn details(&self, names: &dyn KeyNames) -> String {
        let mut details = String::new();
        if self.control {
            details.push_str("Control + ");
        }
        if self.shift {
            details.push_str("Shift + ");
        }
        if self.alt {
            details.push_str("Alt + ");
        }
        details.push_str(&names.key_name(self.key()));
        if self.repeat_count > 1 {
            details.push_str(&format!("  x{}", self.repeat_count));
        }
        details
    }
}

/// Тип действия без данных
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    LaunchApplication,
    SynthesizeKeystroke,
}

/// Действие, выполняемое при срабатывании правила.
///
/// В файле правил хранится с дискриминатором `type`. Незнакомый
/// дискриминатор (данные более новой версии) читается как `Unsupported`
/// и при выполнении пропускается.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Action {
    LaunchApplication(LaunchApplication),
    #[serde(rename = "Keyboard")]
    SynthesizeKeystroke(SynthesizeKeystroke),
    #[serde(other)]
    Unsupported,
}

impl Action {
    pub fn launch(command: impl Into<String>) -> Self {
        Action::LaunchApplication(LaunchApplication::new(command))
    }

    pub fn keystroke(keystroke: SynthesizeKeystroke) -> Self {
        Action::SynthesizeKeystroke(keystroke)
    }

    pub fn kind(&self) -> Option<ActionKind> {
        match self {
            Action::LaunchApplication(_) => Some(ActionKind::LaunchApplication),
            Action::SynthesizeKeystroke(_) => Some(ActionKind::SynthesizeKeystroke),
            Action::Unsupported => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Action::LaunchApplication(_) => "Launch Application",
            Action::SynthesizeKeystroke(_) => "Keyboard",
            Action::Unsupported => "",
        }
    }

    pub fn details(&self, names: &dyn KeyNames) -> String {
        match self {
            Action::LaunchApplication(launch) => launch.details(),
            Action::SynthesizeKeystroke(keystroke) => keystroke.details(names),
            Action::Unsupported => String::new(),
        }
    }

    /// `<имя> - <детали>`
    pub fn display(&self, names: &dyn KeyNames) -> String {
        format!("{} - {}", self.name(), self.details(names))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mappings::EvdevKeyNames;

    #[test]
    fn test_keystroke_details() {
        let keystroke = SynthesizeKeystroke::new(KeyCode(30))
            .with_control(true)
            .with_alt(true)
            .with_repeat_count(3);
        assert_eq!(keystroke.details(&EvdevKeyNames), "Control + Alt + A  x3");
    }

    #[test]
    fn test_single_repeat_has_no_suffix() {
        let keystroke = SynthesizeKeystroke::new(KeyCode(30)).with_shift(true);
        assert_eq!(keystroke.details(&EvdevKeyNames), "Shift + A");
    }

    #[test]
    fn test_modifier_codes_order() {
        let keystroke = SynthesizeKeystroke::new(KeyCode(30))
            .with_alt(true)
            .with_control(true);
        let codes: Vec<KeyCode> = keystroke.modifier_codes().collect();
        assert_eq!(codes, vec![KeyCode::LEFT_CTRL, KeyCode::LEFT_ALT]);
    }

    #[test]
    fn test_launch_details_is_command() {
        let action = Action::launch("firefox --new-window");
        assert_eq!(action.details(&EvdevKeyNames), "firefox --new-window");
        assert_eq!(
            action.display(&EvdevKeyNames),
            "Launch Application - firefox --new-window"
        );
        assert_eq!(action.kind(), Some(ActionKind::LaunchApplication));
    }

    #[test]
    fn test_unsupported_has_no_kind() {
        assert_eq!(Action::Unsupported.kind(), None);
        assert_eq!(Action::Unsupported.details(&EvdevKeyNames), "");
    }

    #[test]
    fn test_unknown_discriminator_is_tolerated() {
        #[derive(Deserialize)]
        struct Holder {
            actions: Vec<Action>,
        }

        let holder: Holder = toml::from_str(
            r#"
            [[actions]]
            type = "OpenUrl"
            url = "https://example.com"

            [[actions]]
            type = "Keyboard"
            virtual_key = 30
            control = true
            "#,
        )
        .unwrap();

        assert_eq!(holder.actions[0], Action::Unsupported);
        assert_eq!(
            holder.actions[1],
            Action::keystroke(SynthesizeKeystroke::new(KeyCode(30)).with_control(true))
        );
    }
}
