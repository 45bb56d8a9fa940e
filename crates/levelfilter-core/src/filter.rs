use std::borrow::Cow;
use std::collections::HashSet;
use std::io::{self, Write};
use std::sync::OnceLock;

use parking_lot::{Mutex, MutexGuard};
use tracing::{debug, trace, warn};

use levelfilter_types::{LogLevel, SGR_RESET, color_for};

use crate::error::FilterError;
use crate::parser::level_span;

/// State derived from the level scale and the minimum level
#[derive(Debug)]
struct Thresholds {
    /// Levels strictly below the minimum
    excluded: HashSet<LogLevel>,

    /// Widest level name in bytes
    widest: usize,
}

impl Thresholds {
    fn compute(levels: &[LogLevel], min_level: &LogLevel) -> Self {
        let mut excluded = HashSet::new();
        let mut found = false;

        for level in levels {
            if level == min_level {
                found = true;
                break;
            }
            excluded.insert(level.clone());
        }

        // An unknown minimum lets everything through
        if !found {
            warn!(min_level = %min_level, "minimum level is not in the scale, forwarding every line");
            excluded.clear();
        }

        let widest = levels.iter().map(LogLevel::len).max().unwrap_or(0);
        debug!(excluded = excluded.len(), widest, "computed level thresholds");

        Self { excluded, widest }
    }
}

/// Writer adapter that drops log lines below a minimum severity.
///
/// Every call to [`write`](Write::write) is expected to carry exactly one
/// complete line such as `"[WARN] disk usage high\n"`. Lines whose bracketed
/// tag ranks below the minimum are swallowed; everything else is optionally
/// padded and colored, then handed to the sink.
///
/// A shared reference also implements [`Write`], so one filter can serve
/// several threads. Writes are serialized on the sink lock.
pub struct LevelFilter<W> {
    /// Level names in ascending severity
    levels: Vec<LogLevel>,

    /// Lowest level that is forwarded
    min_level: LogLevel,

    /// Wrap known levels in ANSI color
    color: bool,

    /// Pad tags to the widest level name
    align: bool,

    /// Computed once on first use
    thresholds: OnceLock<Thresholds>,

    sink: Mutex<W>,
}

impl<W> LevelFilter<W> {
    /// Filter over the standard DEBUG..CRIT scale with nothing excluded and
    /// alignment on
    pub fn new(sink: W, color: bool) -> Self {
        Self::builder(sink)
            .levels(LogLevel::default_scale())
            .color(color)
            .align(true)
            .build()
    }

    /// Start configuring a filter field by field
    pub fn builder(sink: W) -> LevelFilterBuilder<W> {
        LevelFilterBuilder::new(sink)
    }

    /// Check whether a line would be forwarded
    pub fn check(&self, line: &[u8]) -> bool {
        let tag = match level_span(line) {
            Some((open, close)) => &line[open + 1..close],
            None => return true,
        };
        !self.thresholds().excluded.contains(tag)
    }

    /// Change the minimum level and recompute the thresholds right away
    pub fn set_min_level(&mut self, level: impl Into<LogLevel>) {
        self.min_level = level.into();
        self.thresholds = OnceLock::new();
        self.thresholds();
    }

    pub fn levels(&self) -> &[LogLevel] {
        &self.levels
    }

    pub fn min_level(&self) -> &LogLevel {
        &self.min_level
    }

    pub fn color(&self) -> bool {
        self.color
    }

    pub fn align(&self) -> bool {
        self.align
    }

    /// Levels that are currently dropped, in scale order
    pub fn excluded_levels(&self) -> Vec<&LogLevel> {
        let excluded = &self.thresholds().excluded;
        self.levels
            .iter()
            .filter(|level| excluded.contains(level.as_bytes()))
            .collect()
    }

    /// Column width tags are padded to when alignment is on
    pub fn widest_level(&self) -> usize {
        self.thresholds().widest
    }

    /// Lock and borrow the sink
    pub fn lock_sink(&self) -> MutexGuard<'_, W> {
        self.sink.lock()
    }

    pub fn get_mut(&mut self) -> &mut W {
        self.sink.get_mut()
    }

    pub fn into_inner(self) -> W {
        self.sink.into_inner()
    }

    fn thresholds(&self) -> &Thresholds {
        self.thresholds
            .get_or_init(|| Thresholds::compute(&self.levels, &self.min_level))
    }

    /// Apply padding and color to a line that passed the check.
    ///
    /// Padding goes right after the closing bracket; color wraps the padded
    /// line, trailing newline included.
    fn render<'a>(&self, line: &'a [u8]) -> Cow<'a, [u8]> {
        let span = level_span(line);
        let tag = span.map_or(&[][..], |(open, close)| &line[open + 1..close]);

        let padding = match span {
            Some(_) if self.align => self.thresholds().widest.saturating_sub(tag.len()),
            _ => 0,
        };
        let color = if self.color { color_for(tag) } else { None };

        if padding == 0 && color.is_none() {
            return Cow::Borrowed(line);
        }

        let mut out = Vec::with_capacity(line.len() + padding + 16);
        if let Some(color) = color {
            out.extend_from_slice(color.sgr().as_bytes());
        }
        match span {
            Some((_, close)) if padding > 0 => {
                out.extend_from_slice(&line[..=close]);
                out.resize(out.len() + padding, b' ');
                out.extend_from_slice(&line[close + 1..]);
            }
            _ => out.extend_from_slice(line),
        }
        if color.is_some() {
            out.extend_from_slice(SGR_RESET.as_bytes());
        }

        Cow::Owned(out)
    }
}

impl<W: Write> LevelFilter<W> {
    /// Filter, rewrite and forward a single line with one sink `write` call.
    ///
    /// A dropped line reports its full length. Otherwise the byte count and
    /// any error come straight from the sink, and the count refers to the
    /// rewritten line, which can be longer than the input.
    pub fn write_line(&self, line: &[u8]) -> io::Result<usize> {
        if !self.check(line) {
            trace!(len = line.len(), "dropped line below minimum level");
            return Ok(line.len());
        }
        let out = self.render(line);
        self.sink.lock().write(&out)
    }

    fn forward(&self, line: &[u8]) -> io::Result<usize> {
        if !self.check(line) {
            trace!(len = line.len(), "dropped line below minimum level");
            return Ok(line.len());
        }
        let out = self.render(line);
        self.sink.lock().write_all(&out)?;
        Ok(line.len())
    }
}

// `Write::write` may not report more bytes than it was given, so the
// rewritten line goes out with `write_all` and the input length is reported.
impl<W: Write> Write for LevelFilter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.forward(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.sink.get_mut().flush()
    }
}

impl<W: Write> Write for &LevelFilter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.forward(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.sink.lock().flush()
    }
}

impl<W> std::fmt::Debug for LevelFilter<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LevelFilter")
            .field("levels", &self.levels)
            .field("min_level", &self.min_level)
            .field("color", &self.color)
            .field("align", &self.align)
            .finish_non_exhaustive()
    }
}

/// Field-by-field configuration for [`LevelFilter`].
///
/// Defaults: the standard scale, minimum at its lowest level, no color, no
/// alignment.
pub struct LevelFilterBuilder<W> {
    sink: W,
    levels: Vec<LogLevel>,
    min_level: Option<LogLevel>,
    color: bool,
    align: bool,
}

impl<W> LevelFilterBuilder<W> {
    pub fn new(sink: W) -> Self {
        Self {
            sink,
            levels: LogLevel::default_scale(),
            min_level: None,
            color: false,
            align: false,
        }
    }

    /// Set the level scale, lowest severity first
    pub fn levels<I, L>(mut self, levels: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: Into<LogLevel>,
    {
        self.levels = levels.into_iter().map(Into::into).collect();
        self
    }

    pub fn min_level(mut self, level: impl Into<LogLevel>) -> Self {
        self.min_level = Some(level.into());
        self
    }

    pub fn color(mut self, enabled: bool) -> Self {
        self.color = enabled;
        self
    }

    pub fn align(mut self, enabled: bool) -> Self {
        self.align = enabled;
        self
    }

    /// Build without validation. A minimum level missing from the scale
    /// excludes nothing.
    pub fn build(self) -> LevelFilter<W> {
        let min_level = self
            .min_level
            .or_else(|| self.levels.first().cloned())
            .unwrap_or_else(|| LogLevel::new(""));

        LevelFilter {
            levels: self.levels,
            min_level,
            color: self.color,
            align: self.align,
            thresholds: OnceLock::new(),
            sink: Mutex::new(self.sink),
        }
    }

    /// Build after checking that the scale is non-empty, free of duplicates
    /// and contains the minimum level
    pub fn try_build(self) -> Result<LevelFilter<W>, FilterError> {
        if self.levels.is_empty() {
            return Err(FilterError::EmptyLevels);
        }

        let mut seen = HashSet::with_capacity(self.levels.len());
        for level in &self.levels {
            if !seen.insert(level) {
                return Err(FilterError::DuplicateLevel(level.clone()));
            }
        }

        if let Some(min_level) = &self.min_level {
            if !seen.contains(min_level) {
                return Err(FilterError::UnknownMinLevel(min_level.clone()));
            }
        }

        Ok(self.build())
    }
}
