use crate::error::Result;
use crate::events::CapturedKey;
use crate::rules::RuleSet;
use crate::services::Dispatcher;
use std::sync::Arc;
use tokio::time::{interval, Duration};
use tracing::{debug, info};

use super::r#trait::KeySource;

/// Эмуляция нажатий: по кругу воспроизводит все комбинации из правил
pub struct DryRunKeySource {
    script: Vec<CapturedKey>,
    period: Duration,
}

impl DryRunKeySource {
    pub fn from_rules(rules: &RuleSet) -> Self {
        let devices = rules.keyboards.iter().flat_map(|profile| {
            profile
                .bindings
                .iter()
                .map(|binding| CapturedKey::new(profile.device_id.clone(), binding.combination.clone()))
        });
        let low_level = rules
            .low_level_keyboard
            .bindings
            .iter()
            .map(|binding| CapturedKey::low_level(binding.combination.clone()));

        Self {
            script: devices.chain(low_level).collect(),
            period: Duration::from_secs(5),
        }
    }

    pub fn script(&self) -> &[CapturedKey] {
        &self.script
    }

    async fn run_impl(self, dispatcher: Arc<Dispatcher>) -> Result<()> {
        info!("Dry-run режим - эмуляция {} нажатий", self.script.len());

        let mut interval = interval(self.period);
        let mut index = 0;

        loop {
            interval.tick().await;

            let Some(event) = self.script.get(index) else {
                debug!("Источник нажатий работает в dry-run режиме");
                continue;
            };

            info!("Dry-run: эмулируем нажатие {}", event);
            let dispatch = dispatcher.handle_key_event(event);
            debug!("Поглощение: {}, действий: {}", dispatch.captured, dispatch.actions);

            index = (index + 1) % self.script.len();
        }
    }
}

#[async_trait::async_trait]
impl KeySource for DryRunKeySource {
    async fn run(self: Box<Self>, dispatcher: Arc<Dispatcher>) -> Result<()> {
        (*self).run_impl(dispatcher).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{KeyCode, KeyCombination};
    use crate::rules::{KeyBinding, KeyboardProfile};

    #[test]
    fn test_script_covers_all_profiles() {
        let mut rules = RuleSet::new();
        rules.keyboards.push(
            KeyboardProfile::new("Pad", "pad")
                .with_binding(KeyBinding::new(KeyCombination::single(KeyCode(30))))
                .with_binding(KeyBinding::new(KeyCombination::single(KeyCode(48)))),
        );
        rules.low_level_keyboard = KeyboardProfile::new("Low level", "")
            .with_binding(KeyBinding::new(KeyCombination::single(KeyCode(63))));

        let source = DryRunKeySource::from_rules(&rules);
        let script = source.script();

        assert_eq!(script.len(), 3);
        assert_eq!(script[0].device_id, "pad");
        assert_eq!(script[1].combination, KeyCombination::single(KeyCode(48)));
        assert!(script[2].is_low_level());
    }
}
