use crate::error::Result;
use crate::events::FocusedWindow;
use parking_lot::Mutex;
use tracing::info;

use super::r#trait::FocusProvider;

const FAKE_WINDOWS: &[(&str, &str, &str)] = &[
    ("Terminal - dry_run", "XTerm", "/usr/bin/xterm"),
    ("Browser - dry_run", "firefox", "/usr/lib/firefox/firefox"),
    ("Editor - dry_run", "gedit", "/usr/bin/gedit"),
    ("Game - dry_run", "DryRun", "/opt/game/game"),
];

/// Эмуляция смены активного окна: каждый вызов возвращает следующее окно
pub struct DryRunFocusProvider {
    index: Mutex<usize>,
}

impl DryRunFocusProvider {
    pub fn new() -> Self {
        info!("Dry-run режим - активное окно эмулируется");
        Self {
            index: Mutex::new(0),
        }
    }
}

impl Default for DryRunFocusProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl FocusProvider for DryRunFocusProvider {
    async fn active_window(&self) -> Result<FocusedWindow> {
        let (title, class, executable) = {
            let mut index = self.index.lock();
            let window = FAKE_WINDOWS[*index];
            *index = (*index + 1) % FAKE_WINDOWS.len();
            window
        };

        Ok(FocusedWindow::new(title)
            .with_class(class)
            .with_executable(executable))
    }

    fn name(&self) -> &'static str {
        "dry-run"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_windows_rotate() {
        let provider = DryRunFocusProvider::new();
        let mut titles = Vec::new();
        for _ in 0..=FAKE_WINDOWS.len() {
            titles.push(provider.active_window().await.unwrap().title);
        }

        assert_eq!(titles[0], "Terminal - dry_run");
        assert_eq!(titles[1], "Browser - dry_run");
        assert_eq!(titles[FAKE_WINDOWS.len()], titles[0]);
    }
}
