#![allow(dead_code)]

use std::fmt::Display;
use std::sync::{Arc, Mutex};

use event_registry::Callback;
use tracing_subscriber::EnvFilter;

pub type Log = Arc<Mutex<Vec<String>>>;

/// Shared call log that listeners append to.
pub fn make_log() -> Log {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn entries(log: &Log) -> Vec<String> {
    log.lock().unwrap().clone()
}

/// Listener that records `label:payload` for every call.
pub fn recorder<P: Display + 'static>(log: &Log, label: &str) -> Callback<P> {
    let log = Arc::clone(log);
    let label = label.to_string();
    Callback::new(move |payload: &P| log.lock().unwrap().push(format!("{label}:{payload}")))
}

/// Route registry logs to the test output; set `RUST_LOG=event_registry=trace` to see them.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
