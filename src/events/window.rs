use crate::utils::text::{contains_ignore_case, eq_ignore_case};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Информация об активном окне, которую поставляет детектор фокуса
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FocusedWindow {
    pub title: String,
    pub class: String,
    pub executable: String,
    pub pid: Option<u32>,
}

impl FocusedWindow {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = class.into();
        self
    }

    pub fn with_executable(mut self, executable: impl Into<String>) -> Self {
        self.executable = executable.into();
        self
    }

    pub fn with_pid(mut self, pid: u32) -> Self {
        self.pid = Some(pid);
        self
    }

    /// Заголовок содержит паттерн (регистронезависимо)
    pub fn title_contains(&self, pattern: &str) -> bool {
        contains_ignore_case(&self.title, pattern)
    }

    pub fn class_is(&self, class: &str) -> bool {
        eq_ignore_case(&self.class, class)
    }

    pub fn executable_is(&self, executable: &str) -> bool {
        eq_ignore_case(&self.executable, executable)
    }
}

impl fmt::Display for FocusedWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\"", self.title)?;
        if !self.class.is_empty() {
            write!(f, " ({})", self.class)?;
        }
        if !self.executable.is_empty() {
            write!(f, " [{}]", self.executable)?;
        }
        Ok(())
    }
}

/// Событие смены активного окна
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowEvent {
    pub window: FocusedWindow,
    pub timestamp: std::time::Instant,
}

impl WindowEvent {
    pub fn focus_changed(window: FocusedWindow) -> Self {
        Self {
            window,
            timestamp: std::time::Instant::now(),
        }
    }
}

impl fmt::Display for WindowEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "FocusChanged: {} ({}ms ago)",
            self.window,
            self.timestamp.elapsed().as_millis()
        )
    }
}
