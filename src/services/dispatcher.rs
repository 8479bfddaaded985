use crate::config::MatchBy;
use crate::debug_if_enabled;
use crate::events::{CapturedKey, FocusedWindow, WindowEvent};
use crate::resolver::{self, FocusQuery};
use crate::rules::{Action, RuleSet};
use crate::services::executor::ActionExecutor;
use parking_lot::RwLock;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::info;

/// Результат обработки захваченного нажатия
#[derive(Debug)]
pub struct Dispatch {
    /// Поглотить ли исходное нажатие
    pub captured: bool,
    /// Сколько действий запущено
    pub actions: usize,
    /// Задача выполнения цепочки; `None`, если действий нет
    pub execution: Option<JoinHandle<usize>>,
}

/// Связывает захват, активное окно, правила и исполнителя действий
pub struct Dispatcher {
    rules: Arc<RwLock<RuleSet>>,
    active_window: Arc<RwLock<Option<FocusedWindow>>>,
    match_by: MatchBy,
    executor: Arc<ActionExecutor>,
}

impl Dispatcher {
    pub fn new(rules: RuleSet, match_by: MatchBy, executor: ActionExecutor) -> Self {
        info!(
            "Инициализация Dispatcher: {} клавиатур, {} правил, сопоставление по {:?}",
            rules.keyboards.len(),
            rules.binding_count(),
            match_by
        );

        Self {
            rules: Arc::new(RwLock::new(rules)),
            active_window: Arc::new(RwLock::new(None)),
            match_by,
            executor: Arc::new(executor),
        }
    }

    /// Решение по нажатию без выполнения: поглотить ли и какие действия
    pub fn plan(&self, event: &CapturedKey) -> (bool, Vec<Action>) {
        let rules = self.rules.read();
        let window = self.active_window.read();
        let focus = FocusQuery::for_window(&rules, Option::as_ref(&window), self.match_by);

        if event.is_low_level() {
            (
                resolver::should_capture_low_level(&rules, &event.combination),
                resolver::resolve_low_level(&rules, &event.combination, &focus).to_vec(),
            )
        } else {
            (
                resolver::should_capture(&rules, &event.device_id, &event.combination),
                resolver::resolve(&rules, &event.device_id, &event.combination, &focus).to_vec(),
            )
        }
    }

    /// Обработка захваченного нажатия: действия выполняются в отдельной задаче
    pub fn handle_key_event(&self, event: &CapturedKey) -> Dispatch {
        debug_if_enabled!("Обработка нажатия: {}", event);

        let (captured, actions) = self.plan(event);
        if actions.is_empty() {
            debug_if_enabled!("Для {} нет действий (поглощение: {})", event, captured);
            return Dispatch {
                captured,
                actions: 0,
                execution: None,
            };
        }

        info!("{}: {} действий", event, actions.len());

        let count = actions.len();
        let executor = Arc::clone(&self.executor);
        let execution = tokio::spawn(async move { executor.execute(&actions).await });

        Dispatch {
            captured,
            actions: count,
            execution: Some(execution),
        }
    }

    /// Обновление активного окна
    pub fn handle_window_event(&self, event: WindowEvent) {
        debug_if_enabled!("Обработка события окна: {}", event);
        info!("Активное окно изменено на: {}", event.window);
        *self.active_window.write() = Some(event.window);
    }

    pub fn active_window(&self) -> Option<FocusedWindow> {
        self.active_window.read().clone()
    }

    /// Общие правила; запись блокирует обработку нажатий
    pub fn rules(&self) -> Arc<RwLock<RuleSet>> {
        Arc::clone(&self.rules)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{KeyCode, KeyCombination};
    use crate::rules::{
        ApplicationDescriptor, FocusedApplicationOverride, KeyBinding, KeyboardProfile,
        SynthesizeKeystroke,
    };
    use crate::services::executor::tests::recording_executor;

    fn combo() -> KeyCombination {
        KeyCombination::new([KeyCode::LEFT_CTRL], KeyCode(30))
    }

    fn rules() -> RuleSet {
        let mut rules = RuleSet::new();
        rules
            .applications
            .add(ApplicationDescriptor::new("Editor").with_class_name("gedit"))
            .unwrap();

        let binding = KeyBinding::new(combo())
            .with_capture(true)
            .with_override(
                FocusedApplicationOverride::new("Editor")
                    .with_action(Action::launch("editor-macro")),
            )
            .with_override(
                FocusedApplicationOverride::fallback()
                    .with_action(Action::keystroke(SynthesizeKeystroke::new(KeyCode(48)))),
            );

        rules
            .keyboards
            .push(KeyboardProfile::new("Macro pad", "usb-macro").with_binding(binding.clone()));
        rules.low_level_keyboard = KeyboardProfile::new("Low level", "").with_binding(binding);
        rules
    }

    #[tokio::test]
    async fn test_fallback_without_focus() {
        let (recorder, executor) = recording_executor(false);
        let dispatcher = Dispatcher::new(rules(), MatchBy::Application, executor);

        let dispatch = dispatcher.handle_key_event(&CapturedKey::new("usb-macro", combo()));
        assert!(dispatch.captured);
        assert_eq!(dispatch.actions, 1);
        assert_eq!(dispatch.execution.unwrap().await.unwrap(), 1);
        assert_eq!(*recorder.log.lock(), vec!["key 48"]);
    }

    #[tokio::test]
    async fn test_focused_application_override() {
        let (recorder, executor) = recording_executor(false);
        let dispatcher = Dispatcher::new(rules(), MatchBy::Application, executor);

        dispatcher.handle_window_event(WindowEvent::focus_changed(
            FocusedWindow::new("notes.txt").with_class("gedit"),
        ));

        let dispatch = dispatcher.handle_key_event(&CapturedKey::low_level(combo()));
        dispatch.execution.unwrap().await.unwrap();
        assert_eq!(*recorder.log.lock(), vec!["launch editor-macro"]);
    }

    #[tokio::test]
    async fn test_unknown_device_passes_through() {
        let (recorder, executor) = recording_executor(false);
        let dispatcher = Dispatcher::new(rules(), MatchBy::Application, executor);

        let dispatch = dispatcher.handle_key_event(&CapturedKey::new("unknown", combo()));
        assert!(!dispatch.captured);
        assert_eq!(dispatch.actions, 0);
        assert!(dispatch.execution.is_none());
        assert!(recorder.log.lock().is_empty());
    }

    #[tokio::test]
    async fn test_rule_changes_apply_to_next_event() {
        let (_recorder, executor) = recording_executor(false);
        let dispatcher = Dispatcher::new(rules(), MatchBy::Application, executor);

        dispatcher.rules().write().keyboards.remove("usb-macro");

        let (captured, actions) = dispatcher.plan(&CapturedKey::new("usb-macro", combo()));
        assert!(!captured);
        assert!(actions.is_empty());
    }
}
