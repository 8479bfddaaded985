use crate::error::Result;
use crate::events::{FocusedWindow, WindowEvent};
use crate::services::Dispatcher;
use crate::trace_if_enabled;
use std::sync::Arc;
use tokio::time::{interval, Duration};
use tracing::{debug, info};

use super::r#trait::FocusProvider;

/// Опрос активного окна и публикация смен фокуса в диспетчер
pub struct FocusWatcher {
    provider: Box<dyn FocusProvider>,
    dispatcher: Arc<Dispatcher>,
    polling_interval: Duration,
    current_window: Option<FocusedWindow>,
}

impl FocusWatcher {
    pub fn new(
        provider: Box<dyn FocusProvider>,
        dispatcher: Arc<Dispatcher>,
        polling_interval_ms: u64,
    ) -> Self {
        info!(
            "Инициализация FocusWatcher ({}, интервал {}мс)",
            provider.name(),
            polling_interval_ms
        );

        Self {
            provider,
            dispatcher,
            polling_interval: Duration::from_millis(polling_interval_ms),
            current_window: None,
        }
    }

    pub async fn run(mut self) -> Result<()> {
        info!("Запуск polling отслеживания окон");

        let mut interval = interval(self.polling_interval);
        loop {
            interval.tick().await;
            self.poll_once().await;
        }
    }

    /// Один опрос; `true`, если фокус сменился
    pub async fn poll_once(&mut self) -> bool {
        let window = match self.provider.active_window().await {
            Ok(window) => window,
            Err(e) => {
                debug!("{}: не удалось получить активное окно: {}", self.provider.name(), e);
                return false;
            }
        };

        trace_if_enabled!("{}: активное окно {}", self.provider.name(), window);

        if !is_window_changed(self.current_window.as_ref(), &window) {
            return false;
        }

        debug!(
            "Смена активного окна: {} -> {}",
            self.current_window
                .as_ref()
                .map(|w| w.title.as_str())
                .unwrap_or("None"),
            window.title
        );

        self.current_window = Some(window.clone());
        self.dispatcher
            .handle_window_event(WindowEvent::focus_changed(window));
        true
    }
}

fn is_window_changed(current: Option<&FocusedWindow>, new_window: &FocusedWindow) -> bool {
    match current {
        Some(current) => {
            current.title != new_window.title
                || current.class != new_window.class
                || current.executable != new_window.executable
        }
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MatchBy;
    use crate::error::RedirectorError;
    use crate::rules::RuleSet;
    use crate::services::executor::tests::recording_executor;
    use parking_lot::Mutex;

    struct ScriptedProvider {
        windows: Mutex<Vec<Option<FocusedWindow>>>,
    }

    #[async_trait::async_trait]
    impl FocusProvider for ScriptedProvider {
        async fn active_window(&self) -> Result<FocusedWindow> {
            self.windows
                .lock()
                .remove(0)
                .ok_or_else(|| RedirectorError::ServiceUnavailable("нет окна".to_string()))
        }

        fn name(&self) -> &'static str {
            "scripted"
        }
    }

    #[test]
    fn test_window_change_detection() {
        let editor = FocusedWindow::new("a.txt").with_class("gedit");
        assert!(is_window_changed(None, &editor));
        assert!(!is_window_changed(Some(&editor), &editor.clone()));
        assert!(is_window_changed(
            Some(&editor),
            &FocusedWindow::new("b.txt").with_class("gedit")
        ));
    }

    #[tokio::test]
    async fn test_changes_are_published_once() {
        let (_recorder, executor) = recording_executor(false);
        let dispatcher = Arc::new(Dispatcher::new(RuleSet::new(), MatchBy::Application, executor));

        let editor = FocusedWindow::new("a.txt").with_class("gedit");
        let provider = ScriptedProvider {
            windows: Mutex::new(vec![Some(editor.clone()), Some(editor.clone()), None]),
        };
        let mut watcher = FocusWatcher::new(Box::new(provider), Arc::clone(&dispatcher), 100);

        assert!(watcher.poll_once().await);
        assert!(!watcher.poll_once().await);
        assert!(!watcher.poll_once().await);
        assert_eq!(dispatcher.active_window(), Some(editor));
    }
}
