use thiserror::Error;

#[derive(Error, Debug)]
pub enum RedirectorError {
    #[error("Приложение с именем '{0}' уже существует")]
    DuplicateName(String),

    #[error("Неизвестная клавиша: {0}")]
    InvalidKey(String),

    #[error("Некорректный набор правил: {0}")]
    InvalidRules(String),

    #[error("Ошибка конфигурации: {0}")]
    Config(#[from] anyhow::Error),

    #[error("Ошибка ввода-вывода: {0}")]
    Io(#[from] std::io::Error),

    #[error("Ошибка разбора TOML: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("Ошибка сериализации TOML: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("Ошибка uinput: {0}")]
    Uinput(#[from] uinput::Error),

    #[error("Не удалось запустить приложение: {0}")]
    Launch(String),

    #[error("Сервис недоступен: {0}")]
    ServiceUnavailable(String),

    #[error("Внутренняя ошибка: {0}")]
    Internal(String),
}

impl RedirectorError {
    pub fn invalid_rules<T>(msg: impl Into<String>) -> Result<T> {
        Err(RedirectorError::InvalidRules(msg.into()))
    }
}

pub type Result<T> = std::result::Result<T, RedirectorError>;

// Удобные макросы для создания ошибок
#[macro_export]
macro_rules! redirector_error {
    (invalid_key, $($arg:tt)*) => {
        $crate::error::RedirectorError::InvalidKey(format!($($arg)*))
    };
    (launch, $($arg:tt)*) => {
        $crate::error::RedirectorError::Launch(format!($($arg)*))
    };
    (service_unavailable, $($arg:tt)*) => {
        $crate::error::RedirectorError::ServiceUnavailable(format!($($arg)*))
    };
    (internal, $($arg:tt)*) => {
        $crate::error::RedirectorError::Internal(format!($($arg)*))
    };
}
