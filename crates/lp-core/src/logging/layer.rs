//! JSONL tracing layer.
//!
//! Writes one [`LogEvent`] per tracing event. Correlation fields
//! (`run_id`, `model`, `stage`, `round`, `objective`) are taken from the
//! event itself first and then from the innermost enclosing span that
//! recorded them, so solver events inside a `round`/`objective` span carry
//! both indices without repeating them at every call site.

use std::io::{self, Write};
use std::sync::Mutex;

use serde_json::{Map, Number, Value};
use tracing::field::{Field, Visit};
use tracing::span::{Attributes, Id};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::Layer;

use super::events::{Level, LogEvent};

const CORRELATION_KEYS: [&str; 5] = ["run_id", "model", "stage", "round", "objective"];

/// Records every field of an event or span as JSON.
#[derive(Default)]
struct FieldCollector(Map<String, Value>);

impl FieldCollector {
    fn insert(&mut self, field: &Field, value: Value) {
        self.0.insert(field.name().to_string(), value);
    }
}

impl Visit for FieldCollector {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.insert(field, Value::String(value.to_string()));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        self.insert(field, Value::String(format!("{value:?}")));
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.insert(field, Value::Number(value.into()));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.insert(field, Value::Number(value.into()));
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        // NaN and infinities have no JSON number form.
        let v = Number::from_f64(value)
            .map(Value::Number)
            .unwrap_or_else(|| Value::String(value.to_string()));
        self.insert(field, v);
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.insert(field, Value::Bool(value));
    }
}

/// Correlation fields a span contributes to the events inside it.
#[derive(Debug, Clone, Default)]
struct SpanFields(Map<String, Value>);

fn take_string(fields: &mut Map<String, Value>, key: &str) -> Option<String> {
    match fields.remove(key)? {
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

fn take_u64(fields: &mut Map<String, Value>, key: &str) -> Option<u64> {
    fields.remove(key).and_then(|v| v.as_u64())
}

/// JSONL tracing layer, stderr by default.
pub struct JsonlLayer<W = io::Stderr> {
    writer: Mutex<W>,
}

impl JsonlLayer<io::Stderr> {
    pub fn stderr() -> Self {
        JsonlLayer::new(io::stderr())
    }
}

impl<W: Write> JsonlLayer<W> {
    pub fn new(writer: W) -> Self {
        JsonlLayer {
            writer: Mutex::new(writer),
        }
    }
}

impl<S, W> Layer<S> for JsonlLayer<W>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: Write + 'static,
{
    fn on_new_span(&self, attrs: &Attributes<'_>, id: &Id, ctx: Context<'_, S>) {
        let mut collector = FieldCollector::default();
        attrs.record(&mut collector);
        let mut fields = collector.0;
        fields.retain(|key, _| CORRELATION_KEYS.contains(&key.as_str()));

        if let Some(span) = ctx.span(id) {
            span.extensions_mut().insert(SpanFields(fields));
        }
    }

    fn on_event(&self, event: &Event<'_>, ctx: Context<'_, S>) {
        let mut collector = FieldCollector::default();
        event.record(&mut collector);
        let mut fields = collector.0;

        // Innermost span first; a key already present is never overwritten.
        if let Some(scope) = ctx.event_scope(event) {
            for span in scope {
                if let Some(SpanFields(inherited)) = span.extensions().get::<SpanFields>() {
                    for (key, value) in inherited {
                        fields.entry(key.clone()).or_insert_with(|| value.clone());
                    }
                }
            }
        }

        let metadata = event.metadata();
        let mut record = LogEvent::new(Level::from(*metadata.level()), metadata.target());
        record.run_id = take_string(&mut fields, "run_id");
        record.model = take_string(&mut fields, "model");
        record.stage = take_string(&mut fields, "stage");
        record.round = take_u64(&mut fields, "round");
        record.objective = take_u64(&mut fields, "objective");
        record.message = take_string(&mut fields, "message");
        record.fields = fields;

        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", record.to_jsonl());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tracing_subscriber::layer::SubscriberExt;

    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().write(buf)
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn capture(f: impl FnOnce()) -> Value {
        let buffer = Arc::new(Mutex::new(Vec::new()));
        let layer = JsonlLayer::new(SharedBuf(buffer.clone()));
        let subscriber = tracing_subscriber::registry().with(layer);
        tracing::subscriber::with_default(subscriber, f);
        let output = buffer.lock().unwrap();
        let line = String::from_utf8_lossy(&output);
        serde_json::from_str(line.trim()).expect("layer output should be valid JSON")
    }

    #[test]
    fn target_becomes_event_name() {
        let parsed = capture(|| {
            tracing::info!(target: "solve.started", objectives = 2u64, "Starting lexicographic solve");
        });
        assert_eq!(parsed["level"], "info");
        assert_eq!(parsed["event"], "solve.started");
        assert_eq!(parsed["message"], "Starting lexicographic solve");
        assert_eq!(parsed["fields"]["objectives"], 2);
        assert!(parsed["ts"].is_string());
    }

    #[test]
    fn event_fields_are_lifted() {
        let parsed = capture(|| {
            tracing::info!(
                target: "model.loaded",
                run_id = "run-0123456789ab",
                model = "tiger",
                stage = "load",
                states = 2u64
            );
        });
        assert_eq!(parsed["run_id"], "run-0123456789ab");
        assert_eq!(parsed["model"], "tiger");
        assert_eq!(parsed["stage"], "load");
        assert_eq!(parsed["fields"]["states"], 2);
        assert!(parsed["fields"].get("run_id").is_none());
    }

    #[test]
    fn round_and_objective_come_from_spans() {
        let parsed = capture(|| {
            let round = tracing::info_span!("round", round = 2u64);
            let _r = round.enter();
            let objective = tracing::info_span!("objective", objective = 1u64);
            let _o = objective.enter();
            tracing::debug!(target: "solve.sweep_finished", sweep = 4u64, residual = 0.25);
        });
        assert_eq!(parsed["round"], 2);
        assert_eq!(parsed["objective"], 1);
        assert_eq!(parsed["fields"]["sweep"], 4);
        assert_eq!(parsed["fields"]["residual"], 0.25);
    }

    #[test]
    fn event_value_beats_span_value() {
        let parsed = capture(|| {
            let span = tracing::info_span!("cli", stage = "solve");
            let _s = span.enter();
            tracing::warn!(target: "expand.stopped", stage = "expand", "cap reached");
        });
        assert_eq!(parsed["stage"], "expand");
        assert_eq!(parsed["level"], "warn");
    }

    #[test]
    fn non_finite_floats_become_strings() {
        let parsed = capture(|| {
            tracing::info!(target: "solve.objective_solved", residual = f64::NAN);
        });
        assert_eq!(parsed["fields"]["residual"], "NaN");
    }
}
