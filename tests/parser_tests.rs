use logmentor::parser::{recognize_header, recognize_json, structure_logs, structure_logs_with_opts, ParseOptions};
use logmentor::record::LogRecord;
use logmentor::severity::{filter_records, LevelFilter};

#[test]
fn stack_trace_lines_join_the_preceding_record() {
    let raw = "2024-01-01 10:00:00 [INFO] Service started\n\
               2024-01-01 10:00:01 [ERROR] Connection failed\n\
               Traceback...\n    at line 5";
    let recs = structure_logs(raw);
    assert_eq!(recs.len(), 2);
    assert_eq!(recs[0], LogRecord::new("2024-01-01 10:00:00", "INFO", "Service started"));
    assert_eq!(
        recs[1],
        LogRecord::new("2024-01-01 10:00:01", "ERROR", "Connection failed\nTraceback...\n    at line 5")
    );
}

#[test]
fn single_json_line_keeps_fields_verbatim() {
    let raw = r#"{"timestamp":"2024-01-01T00:00:00","level":"DEBUG","message":"ping"}"#;
    let recs = structure_logs(raw);
    assert_eq!(recs, vec![LogRecord::new("2024-01-01T00:00:00", "DEBUG", "ping")]);
}

#[test]
fn blank_and_empty_input_produce_no_records() {
    assert!(structure_logs("").is_empty());
    assert!(structure_logs("\n").is_empty());
    assert!(structure_logs("   \n\t\n").is_empty());
}

#[test]
fn blank_lines_are_not_kept_inside_messages() {
    let raw = "2024-01-01 10:00:00 [ERROR] boom\n\n   \n  at main\n";
    let recs = structure_logs(raw);
    assert_eq!(recs.len(), 1);
    assert_eq!(recs[0].message, "boom\n  at main");
}

#[test]
fn json_record_accepts_following_continuation_lines() {
    let raw = "2024-01-01 10:00:00 [INFO] before\n\
               {\"timestamp\":\"2024-01-01 10:00:01\",\"level\":\"ERROR\",\"message\":\"json failure\",\"svc\":\"api\"}\n\
               caused by: timeout\n\
               2024-01-01 10:00:02 [INFO] after";
    let recs = structure_logs(raw);
    assert_eq!(recs.len(), 3);
    assert_eq!(recs[0].message, "before");
    assert_eq!(recs[1], LogRecord::new("2024-01-01 10:00:01", "ERROR", "json failure\ncaused by: timeout"));
    assert_eq!(recs[2].message, "after");
}

#[test]
fn consecutive_json_lines_are_separate_records() {
    let raw = "{\"timestamp\":\"a\",\"level\":\"INFO\",\"message\":\"one\"}\n\
               {\"timestamp\":\"b\",\"level\":\"WARN\",\"message\":\"two\"}";
    let recs = structure_logs(raw);
    assert_eq!(recs.len(), 2);
    assert_eq!(recs[0].message, "one");
    assert_eq!(recs[1].level, "WARN");
}

#[test]
fn malformed_json_degrades_to_continuation() {
    let raw = "2024-01-01 10:00:00 [INFO] start\n{ this is not valid json\n{\"level\":\"INFO\"}";
    let recs = structure_logs(raw);
    assert_eq!(recs.len(), 1);
    assert_eq!(recs[0].message, "start\n{ this is not valid json\n{\"level\":\"INFO\"}");
}

#[test]
fn json_lines_are_plain_text_when_disabled() {
    let raw = r#"{"timestamp":"t","level":"INFO","message":"m"}"#;
    let opts = ParseOptions { accept_json: false, ..ParseOptions::default() };
    let recs = structure_logs_with_opts(raw, &opts);
    assert_eq!(recs, vec![LogRecord::unknown(raw)]);
}

#[test]
fn orphan_lines_become_unknown_record_by_default() {
    let raw = "starting up\nstill starting\n2024-01-01 10:00:00 [INFO] ready";
    let recs = structure_logs(raw);
    assert_eq!(recs.len(), 2);
    assert_eq!(recs[0], LogRecord::new("", "UNKNOWN", "starting up\nstill starting"));
    assert_eq!(recs[1].message, "ready");
}

#[test]
fn orphan_lines_are_dropped_when_configured() {
    let raw = "starting up\nstill starting\n2024-01-01 10:00:00 [INFO] ready\n  detail";
    let opts = ParseOptions { keep_unmatched_as_unknown: false, ..ParseOptions::default() };
    let recs = structure_logs_with_opts(raw, &opts);
    assert_eq!(recs, vec![LogRecord::new("2024-01-01 10:00:00", "INFO", "ready\n  detail")]);
}

#[test]
fn header_without_message_is_emitted_only_with_continuations() {
    let recs = structure_logs("2024-01-01 10:00:00 [INFO] ");
    assert!(recs.is_empty());

    let recs = structure_logs("2024-01-01 10:00:00 [INFO] \ndetail");
    assert_eq!(recs, vec![LogRecord::new("2024-01-01 10:00:00", "INFO", "\ndetail")]);
}

#[test]
fn bracketed_level_alone_on_header_line_keeps_its_level() {
    let recs = structure_logs("2024-01-01 10:00:00 [ERROR]\n  trace");
    assert_eq!(recs, vec![LogRecord::new("2024-01-01 10:00:00", "ERROR", "\n  trace")]);

    let errors = filter_records(&recs, &LevelFilter::Only("ERROR".into()));
    assert_eq!(errors.len(), 1);
}

#[test]
fn crlf_line_endings_are_tolerated() {
    let raw = "2024-01-01 10:00:00 [INFO] one\r\n2024-01-01 10:00:01 [WARN] two\r\n";
    let recs = structure_logs(raw);
    assert_eq!(recs.len(), 2);
    assert_eq!(recs[0].message, "one");
    assert_eq!(recs[1].level, "WARN");
    assert_eq!(recs[1].message, "two");
}

#[test]
fn every_non_blank_line_survives_structuring() {
    let raw = "orphan first\n\
               2024-01-01 10:00:00,001 [INFO] alpha\n\
               \tat com.example.Main(Main.java:1)\n\
               {\"timestamp\":\"x\",\"level\":\"ERROR\",\"message\":\"beta\"}\n\
               not json {\n\
               \n\
               2024-01-01 10:00:02 gamma delta\n\
               ... 3 more";
    let recs = structure_logs(raw);
    let messages: Vec<&str> = recs.iter().map(|r| r.message.as_str()).collect();
    for line in raw.lines().filter(|l| !l.trim().is_empty()) {
        let needle = match recognize_json(line).or_else(|| recognize_header(line)) {
            Some(rec) => rec.message,
            None => line.to_string(),
        };
        assert!(messages.iter().any(|m| m.contains(&needle)), "lost line {line:?}");
    }
}

#[test]
fn records_follow_input_order() {
    let raw: String = (0..25)
        .map(|i| format!("2024-01-01 10:00:{:02} [INFO] event {i}\n  detail {i}", i % 60))
        .collect::<Vec<_>>()
        .join("\n");
    let recs = structure_logs(&raw);
    assert_eq!(recs.len(), 25);
    for (i, r) in recs.iter().enumerate() {
        assert_eq!(r.message, format!("event {i}\n  detail {i}"));
    }
}
