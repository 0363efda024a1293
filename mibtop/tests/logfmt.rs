//! Collector log parsing.

mod common;

use common::{cpu, ps, stat, t};
use mibtop::types::Dataset;
use mibtop::logfmt::{format_block, parse_log, parse_timestamp, stat_ticks, LogParser};

fn sample_log() -> String {
    let mut log = String::new();
    log.push_str("### Timestamp: Mon May  5 12:00:00 2025\n");
    log.push_str("cpu  100 0 0 900 0 0 0 0 0 0\n");
    log.push_str("cpu0 50 0 0 450 0 0 0 0 0 0\n");
    log.push_str("cpu1 50 0 0 450 0 0 0 0 0 0\n");
    log.push_str(&format!("Process 1: {}\n", stat(1, "init", 3, 2)));
    log.push_str(&format!("Process 4242: {}\n", stat(4242, "Web Content", 70, 30)));
    log.push_str("Processes scanned: 2\n");
    log.push_str("### Timestamp: Mon May  5 12:00:01 2025\n");
    log.push_str("cpu  150 0 0 950 0 0 0 0 0 0\n");
    log.push_str("cpu0 80 0 0 470 0 0 0 0 0 0\n");
    log.push_str("cpu1 70 0 0 480 0 0 0 0 0 0\n");
    log.push_str(&format!("Process 1: {}\n", stat(1, "init", 3, 2)));
    log.push_str(&format!("Process 4242: {}\n", stat(4242, "Web Content", 90, 40)));
    log.push_str(&format!("Process 77: {}\n", stat(77, "(sd-pam)", 1, 1)));
    log.push_str("Could not open /proc/99/stat\n");
    log.push_str("Processes scanned: 3\n");
    log
}

#[test]
fn parses_blocks_into_dataset() {
    let data = parse_log(&sample_log());
    assert_eq!(data.cpu_total.len(), 2);
    assert_eq!(data.cpu_total[0].time, t(0));
    assert_eq!(data.cpu_total[1].user, 150);
    assert_eq!(data.cpu_total[1].idle, 950);

    let cores: Vec<&str> = data.cpu_cores.names().collect();
    assert_eq!(cores, vec!["cpu0", "cpu1"]);
    assert_eq!(data.cpu_cores.get("cpu1").unwrap()[1].user, 70);

    let names: Vec<&str> = data.cpu_processes.names().collect();
    assert_eq!(names, vec!["init (1)", "Web Content (4242)", "(sd-pam) (77)"]);
    let web = data.cpu_processes.get("Web Content (4242)").unwrap();
    assert_eq!(web.len(), 2);
    assert_eq!(web[0].cpu_ticks, 100);
    assert_eq!(web[1].cpu_ticks, 130);
    assert_eq!(web[1].time, t(1));
}

#[test]
fn lines_before_a_valid_timestamp_are_ignored() {
    let log = "cpu  1 2 3 4 5 6 7 8 9 10\n\
               ### Timestamp: not a date\n\
               cpu  1 2 3 4 5 6 7 8 9 10\n\
               ### Timestamp: Tue May 06 08:30:00 2025\n\
               cpu  1 2 3 4\n";
    let data = parse_log(log);
    assert_eq!(data.cpu_total.len(), 1);
    let snap = data.cpu_total[0];
    assert_eq!(snap.iowait, 0, "missing fields default to zero");
    assert_eq!(snap.idle, 4);
    assert_eq!(
        snap.time,
        parse_timestamp("Tue May  6 08:30:00 2025").unwrap()
    );
}

#[test]
fn malformed_data_lines_are_counted_and_skipped() {
    let mut p = LogParser::new();
    p.feed("### Timestamp: Mon May  5 12:00:00 2025\ncpu  x y z\nProcess abc: 1 (a) S\nProcess 5 no colon\n");
    assert_eq!(p.skipped(), 3);
    assert!(p.dataset().cpu_total.is_empty());
    assert!(p.dataset().cpu_processes.is_empty());
}

#[test]
fn truncated_stat_line_counts_zero_ticks() {
    let data = parse_log("### Timestamp: Mon May  5 12:00:00 2025\nProcess 8: 8 (short) S 1 2\n");
    assert_eq!(data.cpu_processes.get("short (8)").unwrap()[0].cpu_ticks, 0);
}

#[test]
fn stat_ticks_reads_fields_after_comm() {
    assert_eq!(stat_ticks(&stat(3, "a) b (c", 11, 22)), Some(33));
    assert_eq!(stat_ticks("3 (x) S"), None);
}

#[test]
fn formatted_block_reads_back() {
    let text = format_block(
        "Mon May  5 12:00:02 2025",
        &["cpu  1 1 1 1 1 1 1 1 0 0".to_string()],
        &[(12, stat(12, "logd", 5, 5))],
    );
    assert!(text.ends_with("Processes scanned: 1\n"));
    let data = parse_log(&text);
    assert_eq!(data.cpu_total[0].time, t(2));
    assert_eq!(data.cpu_total[0].total_ticks(), 8);
    assert_eq!(data.cpu_processes.get("logd (12)").unwrap()[0].cpu_ticks, 10);
}

#[test]
fn keep_last_trims_samples_and_reindexes() {
    let mut data = Dataset {
        cpu_total: vec![cpu(0, 1, 1), cpu(1, 2, 2), cpu(2, 3, 3)],
        cpu_processes: [
            ("gone (1)".to_string(), vec![ps(0, 1)]),
            ("stays (2)".to_string(), vec![ps(0, 1), ps(1, 2), ps(2, 3)]),
            ("new (3)".to_string(), vec![ps(2, 9)]),
        ]
        .into_iter()
        .collect(),
        ..Dataset::default()
    };
    data.keep_last(2);
    assert_eq!(data.cpu_total.len(), 2);
    assert_eq!(data.last_time(), Some(t(2)));
    assert_eq!(
        data.cpu_processes.names().collect::<Vec<_>>(),
        vec!["stays (2)", "new (3)"]
    );
    assert!(data.cpu_processes.get("gone (1)").is_none());
    assert_eq!(data.cpu_processes.get("new (3)").unwrap()[0].cpu_ticks, 9);

    // a pushed sample after trimming lands on the right entity
    data.cpu_processes.push("new (3)", ps(3, 10));
    assert_eq!(data.cpu_processes.get("new (3)").unwrap().len(), 2);
}
