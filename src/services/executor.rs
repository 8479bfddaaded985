use crate::debug_if_enabled;
use crate::rules::Action;
use crate::services::launcher::Launcher;
use crate::services::virtual_device::KeystrokeInjector;
use std::sync::Arc;
use tracing::{debug, error};

/// Выполняет цепочку действий по порядку.
///
/// Ошибка одного действия логируется, остальные всё равно выполняются.
pub struct ActionExecutor {
    launcher: Arc<dyn Launcher>,
    injector: Arc<dyn KeystrokeInjector>,
}

impl ActionExecutor {
    pub fn new(launcher: Arc<dyn Launcher>, injector: Arc<dyn KeystrokeInjector>) -> Self {
        Self { launcher, injector }
    }

    /// Возвращает число успешно выполненных действий
    pub async fn execute(&self, actions: &[Action]) -> usize {
        let mut completed = 0;

        for (i, action) in actions.iter().enumerate() {
            let result = match action {
                Action::LaunchApplication(launch) => self.launcher.launch(launch).await,
                Action::SynthesizeKeystroke(keystroke) => self.injector.inject(keystroke),
                Action::Unsupported => {
                    debug!("Действие #{} неизвестного типа пропущено", i + 1);
                    continue;
                }
            };

            match result {
                Ok(()) => {
                    completed += 1;
                    debug_if_enabled!("Действие #{} ({}) выполнено", i + 1, action.name());
                }
                Err(e) => error!("Действие #{} ({}) завершилось ошибкой: {}", i + 1, action.name(), e),
            }
        }

        completed
    }
}
