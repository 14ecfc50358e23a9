//! Shared helpers for the tests of the workspace crates

use std::{
    io::Write,
    sync::{Arc, Mutex, Once},
};

/// Registers a global default tracing subscriber when called for the first time. This is intended
/// for use in tests.
pub fn subscribe() {
    static INSTALL_TRACING_SUBSCRIBER: Once = Once::new();
    INSTALL_TRACING_SUBSCRIBER.call_once(|| {
        let subscriber = tracing_subscriber::FmtSubscriber::builder()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .finish();
        tracing::subscriber::set_global_default(subscriber).unwrap();
    });
}

/// Runs `f` with a thread-local subscriber at `TRACE` level that writes into the returned
/// [`LogWriter`], so that a test can assert on what was logged.
pub fn capture_logs<T>(f: impl FnOnce() -> T) -> (T, LogWriter) {
    let writer = LogWriter::default();
    let make_writer = writer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_ansi(false)
        .with_writer(move || make_writer.clone())
        .finish();

    let result = tracing::subscriber::with_default(subscriber, f);
    (result, writer)
}

/// This is a writer that can be used with a thread-local tracing subscriber to inspect
/// logs for a single test.
#[derive(Clone, Default)]
pub struct LogWriter(pub Arc<Mutex<Vec<u8>>>);

impl LogWriter {
    /// Returns true if `needle` appears anywhere in the captured logs
    pub fn contains(&self, needle: &str) -> bool {
        self.logs().contains(needle)
    }

    /// All captured logs
    pub fn logs(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl Write for LogWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.0.lock().unwrap().flush()
    }
}
