//! Runtime-configurable logging for the interpreter.
//!
//! Levels are kept per category in atomics so the hot path (`log` called from
//! the dispatch loop) costs one relaxed load when the category is disabled and
//! never builds the message string.
//!
//! - **LogLevel**: Off < Error < Warn < Info < Debug < Trace
//! - **LogCategory**: Cpu, Bus, Interrupts, Stubs
//! - **LogConfig**: process-wide levels plus an optional log file
//!
//! ```rust
//! use sm83_core::logging::{log, LogCategory, LogLevel};
//!
//! log(LogCategory::Cpu, LogLevel::Debug, || {
//!     format!("CPU: EI at PC={:04X}", 0x0100)
//! });
//! ```

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::mpsc::{channel, Sender};
use std::sync::{Mutex, OnceLock};
use std::thread;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum LogLevel {
    Off = 0,
    Error = 1,
    Warn = 2,
    Info = 3,
    Debug = 4,
    Trace = 5,
}

impl LogLevel {
    /// Case-insensitive; also accepts the numeric form `0`..`5`.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "off" | "0" => Some(LogLevel::Off),
            "error" | "err" | "1" => Some(LogLevel::Error),
            "warn" | "warning" | "2" => Some(LogLevel::Warn),
            "info" | "3" => Some(LogLevel::Info),
            "debug" | "4" => Some(LogLevel::Debug),
            "trace" | "5" => Some(LogLevel::Trace),
            _ => None,
        }
    }

    fn from_u8(val: u8) -> Self {
        match val {
            1 => LogLevel::Error,
            2 => LogLevel::Warn,
            3 => LogLevel::Info,
            4 => LogLevel::Debug,
            5 => LogLevel::Trace,
            _ => LogLevel::Off,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogCategory {
    /// Instruction trace
    Cpu,
    /// Image loads and memory setup
    Bus,
    /// Interrupt-enable latch writes
    Interrupts,
    /// Opcodes with no handler
    Stubs,
}

impl LogCategory {
    pub const ALL: [LogCategory; 4] = [
        LogCategory::Cpu,
        LogCategory::Bus,
        LogCategory::Interrupts,
        LogCategory::Stubs,
    ];

    fn index(self) -> usize {
        self as usize
    }
}

pub struct LogConfig {
    global_level: AtomicU8,
    /// Per-category override; `Off` means "use the global level".
    levels: [AtomicU8; 4],
    /// Sender to the log-writer thread when a log file is set.
    file: Mutex<Option<Sender<String>>>,
}

impl LogConfig {
    fn new() -> Self {
        Self {
            global_level: AtomicU8::new(LogLevel::Off as u8),
            levels: [
                AtomicU8::new(LogLevel::Off as u8),
                AtomicU8::new(LogLevel::Off as u8),
                AtomicU8::new(LogLevel::Off as u8),
                AtomicU8::new(LogLevel::Off as u8),
            ],
            file: Mutex::new(None),
        }
    }

    pub fn global() -> &'static Self {
        static INSTANCE: OnceLock<LogConfig> = OnceLock::new();
        INSTANCE.get_or_init(LogConfig::new)
    }

    pub fn set_global_level(&self, level: LogLevel) {
        self.global_level.store(level as u8, Ordering::Relaxed);
    }

    pub fn get_global_level(&self) -> LogLevel {
        LogLevel::from_u8(self.global_level.load(Ordering::Relaxed))
    }

    pub fn set_level(&self, category: LogCategory, level: LogLevel) {
        self.levels[category.index()].store(level as u8, Ordering::Relaxed);
    }

    pub fn get_level(&self, category: LogCategory) -> LogLevel {
        LogLevel::from_u8(self.levels[category.index()].load(Ordering::Relaxed))
    }

    /// A category with its own level uses it; otherwise the global level
    /// applies.
    pub fn should_log(&self, category: LogCategory, level: LogLevel) -> bool {
        if level == LogLevel::Off {
            return false;
        }
        match self.get_level(category) {
            LogLevel::Off => level <= self.get_global_level(),
            category_level => level <= category_level,
        }
    }

    pub fn reset(&self) {
        self.set_global_level(LogLevel::Off);
        for category in LogCategory::ALL {
            self.set_level(category, LogLevel::Off);
        }
    }

    /// Append log output to `path` from a background `log-writer` thread.
    /// Replaces any previous log file.
    pub fn set_log_file(&self, path: &Path) -> std::io::Result<()> {
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        let (sender, receiver) = channel::<String>();

        thread::Builder::new()
            .name("log-writer".to_string())
            .spawn(move || {
                while let Ok(message) = receiver.recv() {
                    let _ = writeln!(file, "{}", message);
                    let _ = file.flush();
                }
            })?;

        if let Ok(mut slot) = self.file.lock() {
            *slot = Some(sender);
        }
        Ok(())
    }

    /// Back to stderr. The writer thread exits once its channel closes.
    pub fn clear_log_file(&self) {
        if let Ok(mut slot) = self.file.lock() {
            *slot = None;
        }
    }

    pub fn has_log_file(&self) -> bool {
        self.file.lock().map(|slot| slot.is_some()).unwrap_or(false)
    }

    fn write_message(&self, message: String) {
        let message = match self.file.lock() {
            Ok(slot) => match slot.as_ref() {
                Some(sender) => match sender.send(message) {
                    Ok(()) => return,
                    Err(err) => err.0,
                },
                None => message,
            },
            Err(_) => message,
        };
        eprintln!("{}", message);
    }
}

/// Emit a message if `category` is enabled at `level`. The closure only runs
/// when it is.
pub fn log<F>(category: LogCategory, level: LogLevel, message_fn: F)
where
    F: FnOnce() -> String,
{
    let config = LogConfig::global();
    if config.should_log(category, level) {
        config.write_message(message_fn());
    }
}
