//! Tracing subscriber and panic forwarding.
//!
//! The terminal backend owns stdout, so formatted events go to stderr or to
//! the file named in [`LogConfig::file`].

use std::{
    fs::OpenOptions,
    io,
    panic::{self, PanicHookInfo},
    sync::{Mutex, Once},
    thread,
};

use tracing_subscriber::{
    EnvFilter, fmt::writer::BoxMakeWriter, layer::SubscriberExt, util::SubscriberInitExt,
};

use crate::config::LogConfig;

/// Environment variable holding the filter directives.
pub const LOG_ENV: &str = "EDDY_LOG";

static PANIC_HOOK_INSTALLED: Once = Once::new();
static TRACING_INSTALLED: Once = Once::new();

/// Install the global tracing subscriber (idempotent).
///
/// Directives come from `EDDY_LOG` when set, otherwise from
/// [`LogConfig::level`]. A log file that cannot be opened falls back to
/// stderr.
pub fn install_tracing(config: &LogConfig) {
    TRACING_INSTALLED.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV)
            .unwrap_or_else(|_| EnvFilter::new(config.level.as_str()));

        let mut fallback = None;
        let (writer, ansi) = match &config.file {
            Some(path) => match OpenOptions::new().create(true).append(true).open(path) {
                Ok(file) => (BoxMakeWriter::new(Mutex::new(file)), false),
                Err(err) => {
                    fallback = Some((path.clone(), err));
                    (BoxMakeWriter::new(io::stderr), true)
                }
            },
            None => (BoxMakeWriter::new(io::stderr), true),
        };

        let console = tracing_subscriber::fmt::layer()
            .with_writer(writer)
            .with_ansi(ansi)
            .with_target(true);

        if tracing_subscriber::registry()
            .with(filter)
            .with(console)
            .try_init()
            .is_err()
        {
            eprintln!("Eddy tracing subscriber failed to initialize");
            return;
        }

        if let Some((path, err)) = fallback {
            tracing::warn!(path = %path.display(), error = %err, "cannot open log file, using stderr");
        }
    });
}

/// Install the panic forwarder (idempotent).
///
/// Panics are logged through `tracing` before the previous hook runs.
pub fn install_panic_forwarder() {
    PANIC_HOOK_INSTALLED.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            forward_panic(info);
            previous(info);
        }));
    });
}

/// Install both the subscriber and the panic forwarder.
pub fn install(config: &LogConfig) {
    install_tracing(config);
    install_panic_forwarder();
}

fn forward_panic(info: &PanicHookInfo<'_>) {
    let message = panic_message(info);
    let thread = thread::current().name().unwrap_or("unnamed").to_owned();
    let location = info
        .location()
        .map(|l| format!("{}:{}:{}", l.file(), l.line(), l.column()))
        .unwrap_or_default();

    tracing::error!(
        target: "eddy::panic",
        message = %message,
        thread = %thread,
        location = %location,
    );
}

fn panic_message(info: &PanicHookInfo<'_>) -> String {
    if let Some(s) = info.payload().downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = info.payload().downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_owned()
    }
}
