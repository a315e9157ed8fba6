use serde_json::json;
use tracing::field::Field;
use tracing::{Event, Subscriber};
use tracing_subscriber::{
    field::Visit,
    fmt::{format::Writer, FmtContext, FormatFields},
    registry::LookupSpan,
};

struct EventFieldVisitor {
    json: serde_json::Map<String, serde_json::Value>,
}

impl EventFieldVisitor {
    fn new() -> Self {
        let json = serde_json::Map::new();
        EventFieldVisitor { json }
    }
}

impl Visit for EventFieldVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        self.json
            .insert(field.name().into(), json!(format!("{:?}", value)));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.json.insert(field.name().into(), json!(value));
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.json.insert(field.name().into(), json!(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.json.insert(field.name().into(), json!(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.json.insert(field.name().into(), json!(value));
    }
}

/// Formatting the events for json, one object per line.
pub(crate) struct FormatEvent;

impl<S, N> tracing_subscriber::fmt::FormatEvent<S, N> for FormatEvent
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'writer> FormatFields<'writer> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let now = chrono::offset::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);
        let mut parents = vec![];
        ctx.visit_spans::<(), _>(|span| {
            let meta = span.metadata();
            parents.push(json!({
                "name": meta.name(),
                "level": meta.level().as_str(),
                "target": meta.target(),
                "file": meta.file(),
                "line": meta.line(),
            }));
            Ok(())
        })
        .ok();
        let meta = event.metadata();
        let mut values = EventFieldVisitor::new();
        event.record(&mut values);
        let json = json!({
            "time": now,
            "level": meta.level().as_str(),
            "target": meta.target(),
            "module_path": meta.module_path(),
            "file": meta.file(),
            "line": meta.line(),
            "fields": values.json,
            "spans": parents,
        });
        writeln!(writer, "{}", json)
    }
}
