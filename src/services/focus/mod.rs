//! Отслеживание активного окна.
//!
//! Модуль только определяет окно в фокусе и сообщает о смене диспетчеру.
//! Сопоставление окна с приложениями выполняет реестр приложений.

mod dry_run;
mod r#trait;
mod watcher;
mod xdotool;

pub use self::dry_run::DryRunFocusProvider;
pub use self::r#trait::{create_focus_provider, FocusProvider};
pub use self::watcher::FocusWatcher;
pub use self::xdotool::XdotoolFocusProvider;
