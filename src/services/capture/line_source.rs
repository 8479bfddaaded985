use crate::debug_if_enabled;
use crate::error::Result;
use crate::events::{CapturedKey, KeyCombination, LOW_LEVEL_DEVICE};
use crate::mappings::KeyNameToEvdevCode;
use crate::redirector_error;
use crate::services::Dispatcher;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{info, warn};

use super::r#trait::KeySource;

/// Разбор строки `<устройство> <комбинация>`.
///
/// Устройство - всё до последнего токена (идентификаторы могут содержать
/// пробелы), `-` означает низкоуровневый перехват. Все клавиши, кроме
/// последней, должны быть модификаторами. Пустые строки и комментарии
/// дают `Ok(None)`.
pub fn parse_line(line: &str) -> Result<Option<CapturedKey>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let Some((device, combo)) = line.rsplit_once(char::is_whitespace) else {
        return Err(redirector_error!(
            invalid_key,
            "ожидается '<устройство> <комбинация>': {}",
            line
        ));
    };

    let device = device.trim();
    let combination: KeyCombination = combo.parse()?;

    if let Some(code) = combination
        .modifiers()
        .iter()
        .find(|code| !KeyNameToEvdevCode::is_modifier(code.value()))
    {
        return Err(redirector_error!(
            invalid_key,
            "{} не модификатор в комбинации '{}'",
            code,
            combo
        ));
    }

    if device == LOW_LEVEL_DEVICE {
        Ok(Some(CapturedKey::low_level(combination)))
    } else {
        Ok(Some(CapturedKey::new(device, combination)))
    }
}

/// Источник нажатий из текстового потока; на каждое событие
/// отвечает строкой `capture` или `pass`.
pub struct LineKeySource<R, W> {
    reader: R,
    writer: W,
}

impl<R, W> LineKeySource<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    async fn run_impl(mut self, dispatcher: Arc<Dispatcher>) -> Result<()> {
        info!("Чтение нажатий из потока ввода");

        let mut lines = (&mut self.reader).lines();
        let mut handled = 0usize;

        while let Some(line) = lines.next_line().await? {
            let event = match parse_line(&line) {
                Ok(Some(event)) => event,
                Ok(None) => continue,
                Err(e) => {
                    warn!("Строка пропущена: {}", e);
                    continue;
                }
            };

            let dispatch = dispatcher.handle_key_event(&event);
            let reply: &[u8] = if dispatch.captured { b"capture\n" } else { b"pass\n" };
            self.writer.write_all(reply).await?;
            self.writer.flush().await?;

            handled += 1;
            debug_if_enabled!("{} -> {} действий", event, dispatch.actions);
        }

        info!("Поток ввода закрыт, обработано {} нажатий", handled);
        Ok(())
    }
}

#[async_trait::async_trait]
impl<R, W> KeySource for LineKeySource<R, W>
where
    R: AsyncBufRead + Unpin + Send + 'static,
    W: AsyncWrite + Unpin + Send + 'static,
{
    async fn run(self: Box<Self>, dispatcher: Arc<Dispatcher>) -> Result<()> {
        (*self).run_impl(dispatcher).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MatchBy;
    use crate::error::RedirectorError;
    use crate::events::KeyCode;
    use crate::rules::{
        Action, FocusedApplicationOverride, KeyBinding, KeyboardProfile, RuleSet,
    };
    use crate::services::executor::tests::recording_executor;
    use tracing_subscriber::util::SubscriberInitExt;

    #[test]
    fn test_parse_device_and_combo() {
        let event = parse_line("usb-1234:5678 ctrl+alt+a").unwrap().unwrap();
        assert_eq!(event.device_id, "usb-1234:5678");
        assert_eq!(
            event.combination,
            KeyCombination::new([KeyCode(29), KeyCode(56)], KeyCode(30))
        );
    }

    #[test]
    fn test_device_id_may_contain_spaces() {
        let event = parse_line("  Logitech USB Keyboard  29+30 ").unwrap().unwrap();
        assert_eq!(event.device_id, "Logitech USB Keyboard");
        assert_eq!(event.combination.len(), 2);
    }

    #[test]
    fn test_low_level_marker() {
        let event = parse_line("- f5").unwrap().unwrap();
        assert!(event.is_low_level());
    }

    #[test]
    fn test_blank_and_comment_lines() {
        assert!(parse_line("").unwrap().is_none());
        assert!(parse_line("   ").unwrap().is_none());
        assert!(parse_line("# usb-1 a").unwrap().is_none());
    }

    #[test]
    fn test_malformed_lines() {
        assert!(parse_line("ctrl+a").is_err());
        assert!(parse_line("usb-1 ctrl+nosuchkey").is_err());
    }

    #[test]
    fn test_prefix_keys_must_be_modifiers() {
        assert!(matches!(
            parse_line("usb-1 a+ctrl"),
            Err(RedirectorError::InvalidKey(_))
        ));
        assert!(parse_line("usb-1 ctrl+b+c").is_err());
        assert!(parse_line("usb-1 rightalt+super+a").unwrap().is_some());
        assert!(parse_line("usb-1 ctrl").unwrap().is_some());
    }

    #[tokio::test]
    async fn test_replies_follow_capture_decision() {
        let mut rules = RuleSet::new();
        rules.keyboards.push(
            KeyboardProfile::new("Pad", "pad").with_binding(
                KeyBinding::new(KeyCombination::single(KeyCode(30)))
                    .with_capture(true)
                    .with_override(
                        FocusedApplicationOverride::fallback()
                            .with_action(Action::launch("xterm")),
                    ),
            ),
        );

        let (_recorder, executor) = recording_executor(false);
        let dispatcher = Arc::new(Dispatcher::new(rules, MatchBy::Application, executor));

        let input: &[u8] = b"pad a\n\n# comment\npad b\nbroken\nother a\n";
        let mut output = Vec::new();
        LineKeySource::new(input, &mut output)
            .run_impl(dispatcher)
            .await
            .unwrap();

        assert_eq!(String::from_utf8(output).unwrap(), "capture\npass\npass\n");
    }

    #[tokio::test]
    async fn test_reply_stream_contains_only_decisions() {
        let _guard = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .with_writer(std::io::stderr)
            .set_default();

        let mut rules = RuleSet::new();
        rules.keyboards.push(
            KeyboardProfile::new("Pad", "pad")
                .with_capture_all_keys(true)
                .with_binding(KeyBinding::new(KeyCombination::single(KeyCode(30))).with_override(
                    FocusedApplicationOverride::fallback().with_action(Action::launch("xterm")),
                )),
        );

        let (_recorder, executor) = recording_executor(false);
        let dispatcher = Arc::new(Dispatcher::new(rules, MatchBy::Application, executor));

        let mut input = String::new();
        for i in 0..50 {
            input.push_str(if i % 2 == 0 { "pad a\n" } else { "- b\n" });
            input.push_str("garbage line here+\n");
        }

        let mut output = Vec::new();
        LineKeySource::new(input.as_bytes(), &mut output)
            .run_impl(dispatcher)
            .await
            .unwrap();

        let output = String::from_utf8(output).unwrap();
        let replies: Vec<&str> = output.lines().collect();
        assert_eq!(replies.len(), 50);
        assert!(replies.iter().all(|reply| *reply == "capture" || *reply == "pass"));
        assert_eq!(replies.iter().filter(|reply| **reply == "capture").count(), 25);
    }
}
