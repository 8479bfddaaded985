use anyhow::Result;
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};

use key_redirector::config::Config;
use key_redirector::mappings::EvdevKeyNames;
use key_redirector::rules::{KeyboardProfile, RuleSet, RuleStore};
use key_redirector::services::{
    create_focus_provider, create_key_source, create_launcher, ActionExecutor, Dispatcher,
    FocusWatcher, VirtualDevice,
};
use key_redirector::utils::permissions;

#[derive(Parser, Debug)]
#[command(name = "key-redirector")]
#[command(about = "Переназначение клавиш по устройствам и активным приложениям")]
struct Args {
    /// Путь к файлу конфигурации
    #[arg(short, long, default_value = "redirector.toml")]
    config: String,

    /// Путь к файлу правил (по умолчанию из конфигурации)
    #[arg(short, long)]
    rules: Option<PathBuf>,

    /// Режим сухого запуска (без реальных действий)
    #[arg(long)]
    dry_run: bool,

    /// Уровень логирования (по умолчанию из конфигурации)
    #[arg(long)]
    log_level: Option<String>,

    /// Проверить конфигурацию и правила и выйти
    #[arg(long)]
    check: bool,

    /// Записать файл правил (текущие или по умолчанию) и выйти
    #[arg(long)]
    init: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Загрузка конфигурации
    let config = Config::load(&args.config)?;

    // Инициализация системы логирования
    let level = args.log_level.as_deref().unwrap_or(&config.logging.level);
    init_tracing(level, &config.logging.format)?;

    info!("Запуск Key Redirector v{}", env!("CARGO_PKG_VERSION"));
    info!("Конфигурация загружена из: {}", args.config);

    let rules_path = match args.rules {
        Some(path) => path,
        None => config.rules_path()?,
    };

    if args.check {
        return check(&rules_path);
    }

    if args.init {
        let store = RuleStore::open(&rules_path);
        store.save()?;
        info!("Файл правил записан: {:?}", store.path());
        return Ok(());
    }

    if args.dry_run {
        warn!("Режим сухого запуска - реальные действия отключены");
    } else {
        // Проверка прав доступа
        let focus_detection = config.focus.detection_mode != "none";
        if let Err(e) = permissions::check_environment(focus_detection) {
            error!("{}", e);
            for line in permissions::get_setup_commands() {
                error!("   {}", line);
            }
            return Err(e.into());
        }
    }

    let store = RuleStore::open(&rules_path);
    info!(
        "Правила загружены из {:?}: {} клавиатур, {} правил, {} приложений",
        store.path(),
        store.rules().keyboards.len(),
        store.rules().binding_count(),
        store.rules().applications.len()
    );

    // Инициализация компонентов
    let injector = Arc::new(VirtualDevice::new("Key Redirector Virtual Keyboard", args.dry_run)?);
    let launcher = Arc::from(create_launcher(config.execution.input_idle_delay_ms, args.dry_run));
    let executor = ActionExecutor::new(launcher, injector);

    let key_source = create_key_source(store.rules(), args.dry_run);
    let dispatcher = Arc::new(Dispatcher::new(
        store.into_rules(),
        config.focus.match_by,
        executor,
    ));

    let focus_watcher = create_focus_provider(&config, args.dry_run).map(|provider| {
        FocusWatcher::new(
            provider,
            Arc::clone(&dispatcher),
            config.focus.polling_interval_ms,
        )
    });
    if focus_watcher.is_none() {
        warn!("Определение активного окна отключено");
    }

    info!("Все компоненты инициализированы");

    // Запуск всех сервисов параллельно
    let key_dispatcher = Arc::clone(&dispatcher);
    let mut key_handle = tokio::spawn(async move {
        if let Err(e) = key_source.run(key_dispatcher).await {
            error!("Ошибка в источнике нажатий: {}", e);
        }
    });
    let focus_handle = focus_watcher.map(|watcher| {
        tokio::spawn(async move {
            if let Err(e) = watcher.run().await {
                error!("Ошибка в FocusWatcher: {}", e);
            }
        })
    });

    info!("Все сервисы запущены");

    // Ожидание сигнала завершения или конца потока нажатий
    tokio::select! {
        result = signal::ctrl_c() => match result {
            Ok(()) => info!("Получен сигнал завершения (Ctrl+C)"),
            Err(err) => error!("Ошибка при ожидании сигнала завершения: {}", err),
        },
        _ = &mut key_handle => info!("Источник нажатий завершил работу"),
    }

    info!("Завершение работы...");

    key_handle.abort();
    if let Some(handle) = &focus_handle {
        handle.abort();
    }

    // Ожидаем завершения задач (с таймаутом)
    let shutdown_timeout = tokio::time::Duration::from_secs(5);
    let shutdown_result = tokio::time::timeout(shutdown_timeout, async {
        let _ = key_handle.await;
        if let Some(handle) = focus_handle {
            let _ = handle.await;
        }
    })
    .await;

    match shutdown_result {
        Ok(_) => info!("Все сервисы завершили работу корректно"),
        Err(_) => warn!("Таймаут при завершении сервисов"),
    }

    info!("Key Redirector завершил работу");
    Ok(())
}

/// Строгая проверка файла правил и сводка по нему
fn check(rules_path: &Path) -> Result<()> {
    let rules = if rules_path.exists() {
        RuleStore::load(rules_path)?
    } else {
        warn!("Файл правил {:?} не найден, проверяются правила по умолчанию", rules_path);
        RuleSet::default()
    };

    let names = EvdevKeyNames;
    println!("Файл правил: {}", rules_path.display());
    println!("Приложений: {}", rules.applications.len());
    for app in &rules.applications {
        println!("  {}", app);
    }

    for profile in rules.keyboards.iter().chain(std::iter::once(&rules.low_level_keyboard)) {
        print_profile(profile, &names);
    }

    println!("Всего правил: {}", rules.binding_count());
    Ok(())
}

fn print_profile(profile: &KeyboardProfile, names: &EvdevKeyNames) {
    if profile.bindings.is_empty() && profile.device_id.is_empty() {
        return;
    }

    println!("Клавиатура {}", profile);
    for binding in &profile.bindings {
        println!("  {}", binding.display_name(names));
        for focused in &binding.overrides {
            let target = if focused.is_fallback() {
                "*"
            } else {
                focused.application_name.as_str()
            };
            println!("    [{}]", target);
            for action in &focused.actions {
                println!("      {}", action.display(names));
            }
        }
    }
}

fn init_tracing(level: &str, format: &str) -> Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))?;

    // stdout занят ответами capture/pass, журнал только в stderr
    let registry = tracing_subscriber::registry().with(filter);
    if format == "full" {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .compact()
                    .with_writer(std::io::stderr),
            )
            .init();
    }

    Ok(())
}
