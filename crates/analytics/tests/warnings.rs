//! Checks the warnings the engine logs for questionable configuration.

use analytics::StatisticsEngine;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use tracing_subscriber::fmt::MakeWriter;

/// In-memory log sink shared between the subscriber and the test.
#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

fn logs_while<F: FnOnce()>(f: F) -> String {
    let logs = CapturedLogs::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(logs.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::WARN)
        .finish();
    tracing::subscriber::with_default(subscriber, f);
    logs.contents()
}

#[test]
fn out_of_range_confidence_level_is_warned_about() {
    let mut stored = 0.0;
    let output = logs_while(|| {
        stored = StatisticsEngine::new()
            .with_confidence_level(1.5)
            .confidence_level();
    });
    assert_eq!(stored, 1.5);
    assert!(output.contains("WARN"), "no warning logged: {output:?}");
    assert!(
        output.contains("Confidence level needs to be between 0 and 1"),
        "unexpected log output: {output:?}"
    );
    assert!(output.contains("confidence_level=1.5"), "{output:?}");
}

#[test]
fn valid_confidence_levels_log_nothing() {
    for level in [0.0, 0.68, 0.95, 1.0] {
        let output = logs_while(|| {
            let mut engine = StatisticsEngine::new();
            engine.set_confidence_level(level);
        });
        assert!(output.is_empty(), "level {level} logged: {output:?}");
    }
}

#[test]
fn negative_confidence_level_is_warned_about() {
    let output = logs_while(|| {
        let mut engine = StatisticsEngine::new();
        engine.set_confidence_level(-0.2);
        assert_eq!(engine.confidence_level(), -0.2);
    });
    assert!(output.contains("confidence_level=-0.2"), "{output:?}");
}
