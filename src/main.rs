use easyjam::messaging::drain_notifications;
use easyjam::{
    AppConfig, Command, NullEnvironment, Reply, SessionManager, create_notification_channel,
    execute,
};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

// Diagnostics produced by one command fit comfortably; overflow is dropped
const NOTIFICATION_RINGBUFFER_CAPACITY: usize = 64;

fn load_config() -> Option<AppConfig> {
    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .or_else(AppConfig::default_path);

    let Some(path) = path else {
        log::warn!("No config directory on this platform, using defaults");
        return Some(AppConfig::default());
    };

    match AppConfig::load_or_default(&path) {
        Ok(config) => {
            log::info!("Configuration: {}", path.display());
            Some(config)
        }
        Err(e) => {
            log::error!("{}", e);
            None
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let Some(config) = load_config() else {
        std::process::exit(1);
    };

    let (notification_tx, mut notification_rx) =
        create_notification_channel(NOTIFICATION_RINGBUFFER_CAPACITY);

    // No simulator binding in this build: arm state is still tracked, frames are never produced
    let manager = SessionManager::new(config, Box::new(NullEnvironment::new()))
        .with_notifications(notification_tx);

    log::info!("EasyJam ready ({})", Command::usage());

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                log::error!("Failed to read command: {}", e);
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let output = match line.parse::<Command>() {
            Ok(command) => match execute(&manager, command) {
                Ok(Reply::Json(value)) => value,
                Ok(Reply::Quit) => break,
                Err(e) => serde_json::json!({ "error": e.to_string() }),
            },
            Err(e) => serde_json::json!({ "error": e.to_string() }),
        };

        for notification in drain_notifications(&mut notification_rx) {
            if let Ok(text) = serde_json::to_string(&notification) {
                eprintln!("{}", text);
            }
        }

        if writeln!(stdout, "{}", output).and_then(|_| stdout.flush()).is_err() {
            break;
        }
    }

    manager.shutdown();
    log::info!("EasyJam stopped");
}
