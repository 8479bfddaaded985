use crate::error::Result;
use crate::redirector_error;
use crate::events::FocusedWindow;
use tokio::process::Command;
use tracing::debug;

use super::r#trait::FocusProvider;

pub struct XdotoolFocusProvider;

impl XdotoolFocusProvider {
    pub fn new() -> Self {
        Self
    }

    async fn query(subcommand: &str) -> Result<String> {
        let output = Command::new("xdotool")
            .args(["getactivewindow", subcommand])
            .output()
            .await
            .map_err(|e| {
                debug!("xdotool не найден или не работает: {}", e);
                redirector_error!(service_unavailable, "xdotool не найден: {}", e)
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            debug!("xdotool {} вернул ошибку: {}", subcommand, stderr);
            return Err(redirector_error!(
                service_unavailable,
                "xdotool вернул ошибку: {}",
                stderr.trim()
            ));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    /// Путь к исполняемому файлу процесса по ссылке `/proc/<pid>/exe`
    async fn executable_of(pid: u32) -> Option<String> {
        tokio::fs::read_link(format!("/proc/{}/exe", pid))
            .await
            .ok()
            .map(|path| path.to_string_lossy().into_owned())
    }
}

impl Default for XdotoolFocusProvider {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn parse_pid(output: &str) -> Option<u32> {
    output.trim().parse().ok().filter(|&pid| pid > 0)
}

#[async_trait::async_trait]
impl FocusProvider for XdotoolFocusProvider {
    async fn active_window(&self) -> Result<FocusedWindow> {
        let title = Self::query("getwindowname").await?;
        let mut window = FocusedWindow::new(title);

        match Self::query("getwindowclassname").await {
            Ok(class) => window = window.with_class(class),
            Err(e) => debug!("Не удалось получить класс окна: {}", e),
        }

        if let Some(pid) = Self::query("getwindowpid").await.ok().as_deref().and_then(parse_pid) {
            window = window.with_pid(pid);
            if let Some(executable) = Self::executable_of(pid).await {
                window = window.with_executable(executable);
            }
        }

        debug!("xdotool: активное окно {}", window);
        Ok(window)
    }

    fn name(&self) -> &'static str {
        "xdotool"
    }
}
