use std::{sync::Arc, thread};

use regex::Regex;

use eventlog::logger::{
    EventLogger, NullEventLogger, StdoutEventLogger,
    null::NULL_LAST_N,
    stdout::STDOUT_LAST_N,
};

#[test]
fn null_logger_discards_and_reports_unsupported_tail() {
    let log = NullEventLogger::new();
    assert_eq!(log.add("x"), "");
    assert_eq!(log.add_with_address("1.1.1.1", "x"), "");
    for n in [0, 1, 10, 10_000] {
        assert_eq!(log.tail_last_n(n), NULL_LAST_N.to_vec());
    }
    log.disable();
    log.enable();
    log.shutdown();
}

#[test]
fn stdout_add_matches_line_shape() {
    let log = StdoutEventLogger::new();
    let line = log.add("Test event 1");
    assert!(Regex::new(r".* \(\) Test event 1").expect("regex").is_match(&line), "{line}");
    assert_eq!(log.tail_last_n(3), STDOUT_LAST_N.to_vec());
    log.shutdown();
}

#[test]
fn writer_receives_started_event_lines_and_shutdown() {
    let log = StdoutEventLogger::with_writer(Vec::<u8>::new());
    let line = log.add_with_address("(192.168.0.1)", "hi");
    assert!(line.ends_with(" (192.168.0.1) hi"));
    log.shutdown();

    let out = String::from_utf8(log.into_inner()).expect("utf8");
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].ends_with("() Logger started"));
    assert_eq!(lines[1], line);
    assert!(lines[2].ends_with("() Logger shutting down"));
}

#[test]
fn disabled_stdout_logger_prints_nothing() {
    let log = StdoutEventLogger::with_writer(Vec::<u8>::new());
    log.disable();
    assert_eq!(log.add("quiet"), "");
    log.enable();
    log.disable();
    assert!(!log.is_active());
    assert_eq!(log.add("still quiet"), "");

    let out = String::from_utf8(log.into_inner()).expect("utf8");
    assert_eq!(out.lines().count(), 1);
}

#[test]
fn concurrent_prints_do_not_interleave() {
    const THREADS: usize = 6;
    const PER_THREAD: usize = 40;

    let log = Arc::new(StdoutEventLogger::with_writer(Vec::<u8>::new()));
    let workers: Vec<_> = (0..THREADS)
        .map(|t| {
            let log = Arc::clone(&log);
            thread::spawn(move || {
                for m in 0..PER_THREAD {
                    log.add_with_address(&format!("host{t}"), &format!("payload {t}/{m}"));
                }
            })
        })
        .collect();
    for w in workers {
        w.join().expect("join");
    }

    let log = Arc::try_unwrap(log).ok().expect("sole owner");
    let out = String::from_utf8(log.into_inner()).expect("utf8");
    let shape = Regex::new(r"^.+ \(host\d\) payload \d/\d+$").expect("regex");
    let events: Vec<&str> = out.lines().skip(1).collect();
    assert_eq!(events.len(), THREADS * PER_THREAD);
    assert!(events.iter().all(|l| shape.is_match(l)));
}
