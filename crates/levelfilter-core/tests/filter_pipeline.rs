use std::io::Write;
use std::sync::Arc;
use std::thread;

use levelfilter_core::{LevelFilter, LineLogger, LogLevel};

#[test]
fn test_logger_through_filter() {
    let filter = LevelFilter::builder(Vec::<u8>::new())
        .levels(["DEBUG", "WARN", "ERROR"])
        .min_level("WARN")
        .build();
    let logger = LineLogger::new(filter);

    logger.print(format_args!("[WARN] foo")).unwrap();
    logger.print(format_args!("[ERROR] bar\n")).unwrap();
    logger.print(format_args!("[DEBUG] baz\n")).unwrap();
    logger.print(format_args!("[WARN] buzz\n")).unwrap();

    let out = logger.into_inner().into_inner();
    assert_eq!(out, b"[WARN] foo\n[ERROR] bar\n[WARN] buzz\n");
}

#[test]
fn test_factory_color_through_logger() {
    let logger = LineLogger::new(LevelFilter::new(Vec::<u8>::new(), true));

    logger.log("DEBUG", format_args!("{}", 1)).unwrap();
    logger.log("INFO", format_args!("two")).unwrap();
    logger.log("CRIT", format_args!("FIZZBUZZ")).unwrap();

    let out = String::from_utf8(logger.into_inner().into_inner()).unwrap();
    assert_eq!(
        out,
        "\x1b[36m[DEBUG] 1\n\x1b[0m[INFO]  two\n\x1b[35m[CRIT]  FIZZBUZZ\n\x1b[0m"
    );
}

#[test]
fn test_shared_filter_across_threads() {
    let filter = Arc::new(
        LevelFilter::builder(Vec::<u8>::new())
            .levels(LogLevel::default_scale())
            .min_level("WARN")
            .build(),
    );

    let handles: Vec<_> = (0..8)
        .map(|worker| {
            let filter = Arc::clone(&filter);
            thread::spawn(move || {
                let mut writer = &*filter;
                for i in 0..50 {
                    let level = if i % 2 == 0 { "INFO" } else { "ERROR" };
                    let line = format!("[{}] worker {} line {}\n", level, worker, i);
                    writer.write_all(line.as_bytes()).unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let filter = Arc::try_unwrap(filter).unwrap();
    assert_eq!(filter.excluded_levels().len(), 2);

    let out = String::from_utf8(filter.into_inner()).unwrap();
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 8 * 25);
    assert!(lines.iter().all(|line| line.starts_with("[ERROR] worker ")));
}

#[test]
fn test_concurrent_first_check_agrees() {
    let filter = Arc::new(
        LevelFilter::builder(std::io::sink())
            .levels(["DEBUG", "WARN", "ERROR"])
            .min_level("WARN")
            .build(),
    );

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let filter = Arc::clone(&filter);
            thread::spawn(move || {
                (
                    filter.check(b"[DEBUG] a\n"),
                    filter.check(b"[WARN] b\n"),
                    filter.check(b"[ERROR] c\n"),
                )
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), (false, true, true));
    }
}

#[test]
fn test_reconfigure_between_sessions() {
    let mut filter = LevelFilter::builder(Vec::<u8>::new())
        .levels(["DEBUG", "WARN", "ERROR"])
        .min_level("WARN")
        .build();

    filter.write_all(b"[WARN] first\n").unwrap();
    filter.set_min_level("ERROR");
    filter.write_all(b"[WARN] x\n").unwrap();
    filter.write_all(b"[ERROR] y\n").unwrap();

    let out = String::from_utf8(filter.into_inner()).unwrap();
    assert_eq!(out, "[WARN] first\n[ERROR] y\n");
}
