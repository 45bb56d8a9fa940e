use std::fmt;
use std::io::{self, Write};

use chrono::Local;
use parking_lot::Mutex;

/// Timestamp layout written in front of each line when enabled
const TIMESTAMP_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

struct Output<W> {
    writer: W,

    /// Scratch buffer reused across lines
    line: Vec<u8>,
}

/// Line-oriented logger that hands each message to its writer in one call.
///
/// `writeln!` may split a line across several `write` calls, which a
/// [`LevelFilter`](crate::LevelFilter) would see as separate lines. This
/// logger formats the whole line first, appends a newline when missing and
/// writes it once, holding a lock so concurrent lines never interleave.
pub struct LineLogger<W> {
    output: Mutex<Output<W>>,
    prefix: String,
    timestamps: bool,
}

impl<W: Write> LineLogger<W> {
    pub fn new(writer: W) -> Self {
        Self {
            output: Mutex::new(Output {
                writer,
                line: Vec::with_capacity(256),
            }),
            prefix: String::new(),
            timestamps: false,
        }
    }

    /// Text written at the very start of every line
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Write the local date and time after the prefix
    pub fn with_timestamps(mut self, enabled: bool) -> Self {
        self.timestamps = enabled;
        self
    }

    /// Write one formatted line
    pub fn print(&self, args: fmt::Arguments<'_>) -> io::Result<()> {
        let mut output = self.output.lock();
        let Output { writer, line } = &mut *output;

        line.clear();
        line.extend_from_slice(self.prefix.as_bytes());
        if self.timestamps {
            write!(line, "{} ", Local::now().format(TIMESTAMP_FORMAT))?;
        }
        line.write_fmt(args)?;
        if line.last() != Some(&b'\n') {
            line.push(b'\n');
        }

        writer.write_all(line.as_slice())
    }

    /// Write `[LEVEL] message` as one line
    pub fn log(&self, level: &str, args: fmt::Arguments<'_>) -> io::Result<()> {
        self.print(format_args!("[{}] {}", level, args))
    }

    pub fn flush(&self) -> io::Result<()> {
        self.output.lock().writer.flush()
    }

    pub fn into_inner(self) -> W {
        self.output.into_inner().writer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records the size of every `write` call
    #[derive(Default)]
    struct CallRecorder {
        calls: Vec<Vec<u8>>,
    }

    impl Write for CallRecorder {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.calls.push(buf.to_vec());
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_one_write_per_line() {
        let logger = LineLogger::new(CallRecorder::default());

        logger.print(format_args!("[WARN] {} of {}", 3, 4)).unwrap();
        logger.log("ERROR", format_args!("failed: {}", "disk")).unwrap();

        let calls = logger.into_inner().calls;
        assert_eq!(calls, [b"[WARN] 3 of 4\n".to_vec(), b"[ERROR] failed: disk\n".to_vec()]);
    }

    #[test]
    fn test_existing_newline_kept() {
        let logger = LineLogger::new(Vec::new());

        logger.print(format_args!("[DEBUG] already ends\n")).unwrap();

        assert_eq!(logger.into_inner(), b"[DEBUG] already ends\n");
    }

    #[test]
    fn test_prefix() {
        let logger = LineLogger::new(Vec::new()).with_prefix("worker-1 ");

        logger.log("INFO", format_args!("ready")).unwrap();

        assert_eq!(logger.into_inner(), b"worker-1 [INFO] ready\n");
    }

    #[test]
    fn test_timestamp_shape() {
        let logger = LineLogger::new(Vec::new()).with_timestamps(true);

        logger.log("WARN", format_args!("late")).unwrap();

        let out = String::from_utf8(logger.into_inner()).unwrap();
        // "YYYY/MM/DD HH:MM:SS " is 20 bytes
        assert_eq!(&out[4..5], "/");
        assert_eq!(&out[10..11], " ");
        assert_eq!(&out[20..], "[WARN] late\n");
    }
}
