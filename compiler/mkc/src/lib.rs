//! Mkc - command-line driver for the `$(shell ...)` optimizer.
//!
//! `mkc explain` shows which fast path a command would get; `mkc eval`
//! compacts and evaluates it against a real directory, running the shell for
//! anything the fast path declines.

pub mod commands;
mod executor;

use std::sync::Once;

pub use executor::ProcessExecutor;

static TRACING_INIT: Once = Once::new();

/// Install a `tracing` subscriber if `RUST_LOG` is set. Idempotent.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true).with_writer(std::io::stderr))
                .with(filter)
                .init();
        }
    });
}
