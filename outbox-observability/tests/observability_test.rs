use std::io;
use std::sync::{Arc, Mutex};

use outbox_core::config::ObservabilityConfig;
use outbox_observability::events;
use outbox_observability::tracing_setup::spans::names;

#[derive(Clone, Default)]
struct SharedBuf(Arc<Mutex<Vec<u8>>>);

impl io::Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl SharedBuf {
    fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

fn capture<F: FnOnce()>(f: F) -> String {
    let buf = SharedBuf::default();
    let writer = buf.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_writer(move || writer.clone())
        .json()
        .finish();
    tracing::subscriber::with_default(subscriber, f);
    buf.contents()
}

#[test]
fn queue_events_carry_structured_fields() {
    let out = capture(|| {
        events::mutation_queued("m-1", "goal", "create", "u1");
        events::retries_exhausted("m-2", 5);
    });
    assert!(out.contains("\"event\":\"mutation_queued\""));
    assert!(out.contains("\"mutation_id\":\"m-1\""));
    assert!(out.contains("\"user_id\":\"u1\""));
    assert!(out.contains("\"event\":\"retries_exhausted\""));
    assert!(out.contains("WARN"));
}

#[test]
fn connectivity_event_level_follows_direction() {
    let offline = capture(|| events::connectivity_changed(false));
    assert!(offline.contains("WARN"));
    assert!(offline.contains("went offline"));

    let online = capture(|| events::connectivity_changed(true));
    assert!(online.contains("INFO"));
    assert!(online.contains("back online"));
}

#[test]
fn span_macros_use_named_spans() {
    let out = capture(|| {
        let span = outbox_observability::mutation_span!("goal", "create");
        let _guard = span.enter();
        events::sync_completed(true, 2);
    });
    assert!(out.contains(names::MUTATION));
    assert!(out.contains("\"synced_count\":2"));
}

#[test]
fn global_init_only_succeeds_once() {
    let config = ObservabilityConfig::default();
    let first = outbox_observability::init_tracing_from_config(&config);
    let second = outbox_observability::init_tracing_from_config(&config);
    assert!(first);
    assert!(!second);
}
