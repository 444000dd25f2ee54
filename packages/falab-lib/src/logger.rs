use std::{
    fmt::Display,
    fs::File,
    io::{BufWriter, Write},
    str::FromStr,
    sync::Mutex,
};

use chrono::Local;
use colored::{ColoredString, Colorize};
use serde::{Deserialize, Serialize};

use crate::config::LoggerConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    fn tag(&self) -> &'static str {
        match self {
            LogLevel::Debug => "DBG",
            LogLevel::Info => "INF",
            LogLevel::Warn => "WAR",
            LogLevel::Error => "ERR",
        }
    }

    fn tag_colored(&self) -> ColoredString {
        match self {
            LogLevel::Debug => self.tag().bright_cyan(),
            LogLevel::Info => self.tag().bright_green(),
            LogLevel::Warn => self.tag().yellow(),
            LogLevel::Error => self.tag().bright_red(),
        }
    }

    /// Whether a message at `self` passes a logger configured at `threshold`.
    pub fn show(&self, threshold: &LogLevel) -> bool {
        match threshold {
            LogLevel::Debug => true,
            LogLevel::Info => *self != LogLevel::Debug,
            LogLevel::Warn => *self == LogLevel::Warn || *self == LogLevel::Error,
            LogLevel::Error => *self == LogLevel::Error,
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "debug" | "dbg" => Ok(LogLevel::Debug),
            "info" | "inf" => Ok(LogLevel::Info),
            "warn" | "warning" | "war" => Ok(LogLevel::Warn),
            "error" | "err" => Ok(LogLevel::Error),
            _ => Err(format!("Invalid log level: {}", s)),
        }
    }
}

impl Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Debug => write!(f, "Debug"),
            LogLevel::Info => write!(f, "Info"),
            LogLevel::Warn => write!(f, "Warn"),
            LogLevel::Error => write!(f, "Error"),
        }
    }
}

/// Leveled logger with colored stderr output and an optional buffered log
/// file. The core algorithms never log; this lives with the hosts.
#[derive(Debug)]
pub struct Logger {
    level: LogLevel,
    name: String,
    file: Option<Mutex<BufWriter<File>>>,
}

impl Logger {
    pub fn new(level: LogLevel, name: String, log_file_path: Option<String>) -> Self {
        let file = log_file_path.map(|path| {
            if let Some(parent) = std::path::Path::new(&path).parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            let file = File::create(path).unwrap();
            Mutex::new(BufWriter::new(file))
        });

        Logger { level, name, file }
    }

    pub fn from_config(config: &LoggerConfig, name: String) -> Option<Self> {
        if !*config.get_enabled() {
            return None;
        }

        let log_file_path = if *config.get_log_file() {
            Some(format!(
                "./logs/server_run_{}.txt",
                Local::now().format("%Y-%m-%d_%H-%M-%S")
            ))
        } else {
            None
        };

        Some(Logger::new(*config.get_log_level(), name, log_file_path))
    }

    pub fn log(&self, level: LogLevel, message: &str) {
        self.writeln_to_file(&format!("[{}] {}: {}", level.tag(), self.name, message));

        if level.show(&self.level) {
            eprintln!(
                "[{}] {} {}",
                level.tag_colored(),
                format!("{}:", self.name).dimmed(),
                message
            );
        }
    }

    pub fn debug(&self, message: &str) {
        self.log(LogLevel::Debug, message);
    }

    pub fn info(&self, message: &str) {
        self.log(LogLevel::Info, message);
    }

    pub fn warn(&self, message: &str) {
        self.log(LogLevel::Warn, message);
    }

    pub fn error(&self, message: &str) {
        self.log(LogLevel::Error, message);
    }

    fn writeln_to_file(&self, line: &str) {
        if let Some(file) = &self.file {
            let mut f = file.lock().unwrap();

            f.write_all(line.as_bytes()).unwrap();
            f.write_all(b"\n").unwrap();
        }
    }
}
