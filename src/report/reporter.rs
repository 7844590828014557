//! Report normalization.
//!
//! Every emitter hands the reporter a partial payload; the reporter
//! merges it into the canonical schema — placeholder message, static
//! positional tag, structured `extra`, date stamp, page URL — and hands
//! the result to the sink synchronously. A failing delivery is logged
//! and dropped: telemetry must never become a fault source of its own.

use std::sync::Arc;

use serde_json::{json, Map, Value};

use crate::api::config::MonitorConfig;
use crate::host::PageHost;
use crate::report::draft::{ExtraPayload, ReportDraft};
use crate::report::sink::ReportSink;
use crate::util::clock;

/// Message used when the emitter had nothing better.
pub const PLACEHOLDER_MESSAGE: &str = "捕获到错误信息";

/// Positional tag used when the fault carried no line information.
pub const DEFAULT_LOCATION_TAG: &str = "logger_sendException_0";

/// Normalizes partial reports and forwards them to the sink.
pub struct Reporter {
    host: Arc<dyn PageHost>,
    sink: Arc<dyn ReportSink>,
    exception_channel: String,
    performance_channel: String,
}

impl Reporter {
    pub fn new(host: Arc<dyn PageHost>, sink: Arc<dyn ReportSink>, config: &MonitorConfig) -> Self {
        Self {
            host,
            sink,
            exception_channel: config.exception_event_name.clone(),
            performance_channel: config.performance_event_name.clone(),
        }
    }

    /// Merge a partial fault report into the canonical schema and
    /// deliver it on the exception channel.
    pub fn report_exception(&self, draft: ReportDraft) {
        let mut extra = draft.extra.into_map();

        // A URL inside extra is a caller-provided address; it beats the
        // host's current one and moves to the top-level field.
        let url = match (non_empty(draft.url), extra.remove("url")) {
            (Some(url), _) => url,
            (None, Some(Value::String(url))) if !url.is_empty() => url,
            _ => self.host.page_url(),
        };

        let mut payload = Map::new();
        payload.insert(
            "warn_info".to_string(),
            json!(non_empty(draft.warn_info).unwrap_or_else(|| PLACEHOLDER_MESSAGE.to_string())),
        );
        payload.insert(
            "class_func_line".to_string(),
            json!(non_empty(draft.class_func_line)
                .unwrap_or_else(|| DEFAULT_LOCATION_TAG.to_string())),
        );
        payload.insert("stack".to_string(), json!(draft.stack));
        payload.insert("extra".to_string(), Value::Object(extra));
        payload.insert("date".to_string(), json!(clock::report_stamp()));
        payload.insert("url".to_string(), json!(url));

        self.deliver(&self.exception_channel, payload);
    }

    /// Stamp and deliver a performance payload (metric snapshot or fps
    /// figure) on the performance channel.
    pub fn report_performance(&self, mut payload: Map<String, Value>) {
        // External callers may route structured detail through `extra`,
        // possibly serialized; it flattens into the payload.
        if let Some(extra) = payload.remove("extra") {
            for (key, value) in ExtraPayload::from_value(extra).into_map() {
                payload.insert(key, value);
            }
        }
        payload
            .entry("date")
            .or_insert_with(|| json!(clock::report_stamp()));
        payload
            .entry("url")
            .or_insert_with(|| json!(self.host.page_url()));

        self.deliver(&self.performance_channel, payload);
    }

    fn deliver(&self, channel: &str, payload: Map<String, Value>) {
        if let Err(err) = self.sink.deliver(channel, &payload) {
            log::warn!("report delivery on {channel:?} failed: {err}");
        }
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{FrameCallback, TimerCallback};
    use crate::report::sink::CollectingSink;
    use std::time::Duration;

    struct StubHost;

    impl PageHost for StubHost {
        fn page_url(&self) -> String {
            "https://app.test/page".to_string()
        }

        fn set_timeout(&self, _delay: Duration, _callback: TimerCallback) {}

        fn request_frame(&self, _callback: FrameCallback) -> bool {
            false
        }
    }

    fn reporter_with_sink() -> (Reporter, Arc<CollectingSink>) {
        let sink = Arc::new(CollectingSink::new());
        let reporter = Reporter::new(
            Arc::new(StubHost),
            Arc::clone(&sink) as Arc<dyn ReportSink>,
            &MonitorConfig::default(),
        );
        (reporter, sink)
    }

    #[test]
    fn test_empty_draft_gets_placeholder_tag_date_and_url() {
        let (reporter, sink) = reporter_with_sink();
        reporter.report_exception(ReportDraft::default());

        let reports = sink.on_channel("异常数据");
        assert_eq!(reports.len(), 1);
        let payload = &reports[0];
        assert_eq!(payload.get("warn_info"), Some(&json!(PLACEHOLDER_MESSAGE)));
        assert_eq!(
            payload.get("class_func_line"),
            Some(&json!(DEFAULT_LOCATION_TAG))
        );
        assert_eq!(payload.get("url"), Some(&json!("https://app.test/page")));
        assert!(!payload.get("date").unwrap().as_str().unwrap().is_empty());
    }

    #[test]
    fn test_classified_fields_survive_normalization() {
        let (reporter, sink) = reporter_with_sink();
        reporter.report_exception(ReportDraft {
            warn_info: "TypeError:x is not a function".to_string(),
            class_func_line: "42".to_string(),
            stack: "at main.js:42:7".to_string(),
            ..ReportDraft::default()
        });

        let payload = &sink.on_channel("异常数据")[0];
        assert_eq!(
            payload.get("warn_info"),
            Some(&json!("TypeError:x is not a function"))
        );
        assert_eq!(payload.get("class_func_line"), Some(&json!("42")));
        assert_eq!(payload.get("stack"), Some(&json!("at main.js:42:7")));
    }

    #[test]
    fn test_caller_url_in_extra_wins_and_moves_top_level() {
        let (reporter, sink) = reporter_with_sink();
        let mut extra = Map::new();
        extra.insert("url".to_string(), json!("https://cdn.test/widget.js"));
        reporter.report_exception(ReportDraft {
            extra: ExtraPayload::Map(extra),
            ..ReportDraft::default()
        });

        let payload = &sink.on_channel("异常数据")[0];
        assert_eq!(
            payload.get("url"),
            Some(&json!("https://cdn.test/widget.js"))
        );
        let extra = payload.get("extra").unwrap().as_object().unwrap();
        assert!(!extra.contains_key("url"));
    }

    #[test]
    fn test_serialized_extra_round_trips_and_malformed_is_replaced() {
        let (reporter, sink) = reporter_with_sink();
        reporter.report_exception(ReportDraft {
            extra: ExtraPayload::Raw(r#"{"type":"Error","colNo":7}"#.to_string()),
            ..ReportDraft::default()
        });
        reporter.report_exception(ReportDraft {
            extra: ExtraPayload::Raw("{broken".to_string()),
            ..ReportDraft::default()
        });

        let reports = sink.on_channel("异常数据");
        let parsed = reports[0].get("extra").unwrap().as_object().unwrap();
        assert_eq!(parsed.get("colNo"), Some(&json!(7)));
        let replaced = reports[1].get("extra").unwrap().as_object().unwrap();
        assert!(replaced.is_empty());
    }

    #[test]
    fn test_performance_payload_is_stamped() {
        let (reporter, sink) = reporter_with_sink();
        let mut payload = Map::new();
        payload.insert("fps".to_string(), json!(14));
        reporter.report_performance(payload);

        let reports = sink.on_channel("性能数据");
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].get("fps"), Some(&json!(14)));
        assert_eq!(reports[0].get("url"), Some(&json!("https://app.test/page")));
        assert!(reports[0].contains_key("date"));
    }

    #[test]
    fn test_channel_names_follow_config() {
        let sink = Arc::new(CollectingSink::new());
        let config = MonitorConfig::default()
            .with_exception_event_name("faults")
            .with_performance_event_name("perf");
        let reporter = Reporter::new(
            Arc::new(StubHost),
            Arc::clone(&sink) as Arc<dyn ReportSink>,
            &config,
        );

        reporter.report_exception(ReportDraft::default());
        reporter.report_performance(Map::new());

        assert_eq!(sink.on_channel("faults").len(), 1);
        assert_eq!(sink.on_channel("perf").len(), 1);
    }
}
