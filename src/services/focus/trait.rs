use crate::config::Config;
use crate::error::Result;
use crate::events::FocusedWindow;

/// Trait for providers of the currently focused window
#[async_trait::async_trait]
pub trait FocusProvider: Send + Sync {
    /// Snapshot of the focused window
    async fn active_window(&self) -> Result<FocusedWindow>;

    fn name(&self) -> &'static str;
}

/// Factory function to create a focus provider; `None` disables focus tracking
pub fn create_focus_provider(config: &Config, dry_run: bool) -> Option<Box<dyn FocusProvider>> {
    if dry_run {
        return Some(Box::new(super::dry_run::DryRunFocusProvider::new()));
    }

    match config.focus.detection_mode.as_str() {
        "xdotool" => Some(Box::new(super::xdotool::XdotoolFocusProvider::new())),
        _ => None,
    }
}
