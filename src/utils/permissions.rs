use crate::error::{RedirectorError, Result};
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use tracing::{info, warn};

const UINPUT_DEVICE: &str = "/dev/uinput";

/// Проверить окружение перед запуском: синтез нажатий и определение окна
pub fn check_environment(focus_detection: bool) -> Result<()> {
    info!("Проверка прав доступа...");

    check_uinput_access()?;

    if focus_detection {
        check_display();
    }

    check_not_root();

    info!("Проверка прав доступа завершена успешно");
    Ok(())
}

fn check_uinput_access() -> Result<()> {
    if !Path::new(UINPUT_DEVICE).exists() {
        return Err(RedirectorError::ServiceUnavailable(format!(
            "{} не существует, модуль uinput не загружен",
            UINPUT_DEVICE
        )));
    }

    let metadata = fs::metadata(UINPUT_DEVICE).map_err(|e| {
        RedirectorError::ServiceUnavailable(format!(
            "Не удалось проверить права доступа к {}: {}",
            UINPUT_DEVICE, e
        ))
    })?;

    if !mode_allows_write(metadata.permissions().mode()) {
        return Err(RedirectorError::ServiceUnavailable(format!(
            "Нет прав на запись в {}. Добавьте пользователя в группу 'uinput' или 'input'",
            UINPUT_DEVICE
        )));
    }

    info!("Доступ к {} подтвержден", UINPUT_DEVICE);
    Ok(())
}

/// Запись разрешена группе или всем (обычно 660 или 666)
fn mode_allows_write(mode: u32) -> bool {
    mode & 0o022 != 0
}

fn check_display() {
    match std::env::var("DISPLAY") {
        Ok(value) if !value.is_empty() => info!("X-дисплей: {}", value),
        _ => {
            warn!("DISPLAY не задан: xdotool не сможет определить активное окно");
            warn!("   Сработают только переопределения для любого приложения");
        }
    }
}

fn check_not_root() {
    match std::env::var("USER") {
        Ok(user) if user == "root" => {
            warn!("⚠️  Приложение запущено от имени root!");
            warn!("   Запущенные программы тоже получат права root");
            warn!("   Рекомендуется добавить пользователя в группу 'uinput'");
            warn!("   и запускать приложение от имени обычного пользователя");
        }
        Ok(user) => {
            info!("Приложение запущено от имени пользователя: {}", user);
        }
        Err(_) => {
            warn!("Не удалось определить пользователя");
        }
    }
}

/// Получить рекомендуемые команды для настройки прав доступа
pub fn get_setup_commands() -> Vec<String> {
    vec![
        "# Добавить пользователя в группу uinput:".to_string(),
        "sudo usermod -a -G uinput $USER".to_string(),
        "".to_string(),
        "# Загрузить модуль uinput:".to_string(),
        "sudo modprobe uinput".to_string(),
        "".to_string(),
        "# Автоматическая загрузка модуля при загрузке системы:".to_string(),
        "echo 'uinput' | sudo tee /etc/modules-load.d/uinput.conf".to_string(),
        "".to_string(),
        "# Определение активного окна требует xdotool:".to_string(),
        "sudo apt install xdotool".to_string(),
        "".to_string(),
        "# После выполнения команд перезайдите в систему".to_string(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setup_commands() {
        let commands = get_setup_commands();
        assert!(!commands.is_empty());
        assert!(commands.iter().any(|cmd| cmd.contains("usermod")));
        assert!(commands.iter().any(|cmd| cmd.contains("modprobe")));
        assert!(commands.iter().any(|cmd| cmd.contains("xdotool")));
    }

    #[test]
    fn test_write_permission_bits() {
        assert!(mode_allows_write(0o020660));
        assert!(mode_allows_write(0o666));
        assert!(!mode_allows_write(0o600));
        assert!(!mode_allows_write(0o644));
    }
}
