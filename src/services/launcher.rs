use crate::error::Result;
use crate::redirector_error;
use crate::rules::LaunchApplication;
use std::process::Stdio;
use tokio::process::Command;
use tokio::time::{sleep, Duration};
use tracing::{debug, info, warn};

/// Запуск внешних программ по действию `LaunchApplication`
#[async_trait::async_trait]
pub trait Launcher: Send + Sync {
    async fn launch(&self, launch: &LaunchApplication) -> Result<()>;
}

/// Запуск через `sh -c`
pub struct ProcessLauncher {
    input_idle_delay: Duration,
}

impl ProcessLauncher {
    pub fn new(input_idle_delay_ms: u64) -> Self {
        info!(
            "Инициализация ProcessLauncher (ожидание готовности: {}мс)",
            input_idle_delay_ms
        );
        Self {
            input_idle_delay: Duration::from_millis(input_idle_delay_ms),
        }
    }

    fn command(launch: &LaunchApplication) -> Command {
        let mut command = Command::new("sh");
        command
            .arg("-c")
            .arg(&launch.command)
            .stdin(Stdio::null())
            .kill_on_drop(false);
        command
    }
}

#[async_trait::async_trait]
impl Launcher for ProcessLauncher {
    async fn launch(&self, launch: &LaunchApplication) -> Result<()> {
        if launch.command.trim().is_empty() {
            return Err(redirector_error!(launch, "пустая команда"));
        }

        info!("Запуск: {}", launch.command);

        let mut child = Self::command(launch)
            .spawn()
            .map_err(|e| redirector_error!(launch, "{}: {}", launch.command, e))?;

        if launch.wait_for_input_idle {
            debug!("Ожидание готовности '{}' {:?}", launch.command, self.input_idle_delay);
            sleep(self.input_idle_delay).await;
        }

        if launch.wait_for_exit {
            let status = child.wait().await?;
            if status.success() {
                debug!("'{}' завершился успешно", launch.command);
            } else {
                warn!("'{}' завершился с кодом {}", launch.command, status);
            }
        } else {
            // Дочерний процесс нужно дождаться, иначе останется зомби
            let command = launch.command.clone();
            tokio::spawn(async move {
                match child.wait().await {
                    Ok(status) => debug!("'{}' завершился: {}", command, status),
                    Err(e) => warn!("Не удалось дождаться '{}': {}", command, e),
                }
            });
        }

        Ok(())
    }
}

pub struct DryRunLauncher;

#[async_trait::async_trait]
impl Launcher for DryRunLauncher {
    async fn launch(&self, launch: &LaunchApplication) -> Result<()> {
        info!("[DRY RUN] Запуск: {}", launch.details());
        Ok(())
    }
}

pub fn create_launcher(input_idle_delay_ms: u64, dry_run: bool) -> Box<dyn Launcher> {
    if dry_run {
        Box::new(DryRunLauncher)
    } else {
        Box::new(ProcessLauncher::new(input_idle_delay_ms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RedirectorError;

    #[tokio::test]
    async fn test_empty_command_is_rejected() {
        let launcher = ProcessLauncher::new(0);
        let result = launcher.launch(&LaunchApplication::new("   ")).await;
        assert!(matches!(result, Err(RedirectorError::Launch(_))));
    }

    #[tokio::test]
    async fn test_wait_for_exit_runs_to_completion() {
        let dir = tempfile::tempdir().unwrap();
        let marker = dir.path().join("launched");

        let mut launch = LaunchApplication::new(format!("touch '{}'", marker.display()));
        launch.wait_for_exit = true;

        ProcessLauncher::new(0).launch(&launch).await.unwrap();
        assert!(marker.exists());
    }

    #[tokio::test]
    async fn test_failing_command_is_not_an_error() {
        let mut launch = LaunchApplication::new("exit 3");
        launch.wait_for_exit = true;
        assert!(ProcessLauncher::new(0).launch(&launch).await.is_ok());
    }

    #[tokio::test]
    async fn test_dry_run_launcher_does_nothing() {
        let launcher = create_launcher(0, true);
        assert!(launcher.launch(&LaunchApplication::new("false")).await.is_ok());
    }
}
