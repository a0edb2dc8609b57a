//! helpers for logging.
//!
//! Lines look like `INFO Loaded 3 rows ... time=<utc timestamp> target=cinema_cdb::database`.
//! `RUST_LOG` filters as usual; without it, `info` and above are shown.
use std::io::Write;

fn builder() -> env_logger::Builder {
    let mut builder = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    builder.format(|buf, record| {
        let now = time::OffsetDateTime::now_utc();

        writeln!(
            buf,
            "{} {} time={} target={}",
            record.level(),
            record.args(),
            now,
            record.target()
        )
    });
    builder
}

/// Log to stderr.
///
/// If called multiple times in the same process, only applies once.  Also does nothing if some other logger got there
/// first.
pub fn log_to_stderr() {
    static ONCE: std::sync::Once = std::sync::Once::new();

    ONCE.call_once(|| {
        let _ = builder().try_init();
    });
}

/// Log from tests, through the test harness's output capture.
///
/// Safe to call from every test.
pub fn log_for_tests() {
    static ONCE: std::sync::Once = std::sync::Once::new();

    ONCE.call_once(|| {
        let _ = builder().is_test(true).try_init();
    });
}
