//! Frame-aware stderr logging.
//!
//! Lines look like `[  1.204s f17 DEBUG detect::tracker] message`. The frame
//! tag comes from [`set_frame`], which whoever feeds frames calls once per
//! frame; outside a frame the tag is `-`.

use std::fmt::Write as _;
use std::io::Write as _;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;
use std::time::Instant;

use log::{Level, LevelFilter, Log, Metadata, Record};

#[cfg(feature = "tracing")]
use tracing_subscriber::fmt::format::FmtSpan;
#[cfg(feature = "tracing")]
use tracing_subscriber::util::SubscriberInitExt;
#[cfg(feature = "tracing")]
use tracing_subscriber::{fmt, EnvFilter};

const NO_FRAME: u64 = u64::MAX;

static FRAME: AtomicU64 = AtomicU64::new(NO_FRAME);
static LOGGER: OnceLock<FrameLogger> = OnceLock::new();

/// Tag subsequent log lines with a frame index, or clear the tag.
pub fn set_frame(index: Option<u64>) {
    FRAME.store(index.unwrap_or(NO_FRAME), Ordering::Relaxed);
}

/// Frame index log lines are currently tagged with.
pub fn current_frame() -> Option<u64> {
    match FRAME.load(Ordering::Relaxed) {
        NO_FRAME => None,
        i => Some(i),
    }
}

/// `-v` count to level: info, then debug, then trace.
pub fn level_from_verbosity(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

struct FrameLogger {
    level: LevelFilter,
    started: Instant,
}

impl Log for FrameLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format_line(
            self.started.elapsed().as_secs_f64(),
            current_frame(),
            record.level(),
            record.target(),
            record.args(),
        );
        let _ = writeln!(std::io::stderr().lock(), "{line}");
    }

    fn flush(&self) {}
}

/// Workspace crates log as `detect::tracker` rather than `dartcam_detect::tracker`.
fn short_target(target: &str) -> &str {
    target.strip_prefix("dartcam_").unwrap_or(target)
}

fn format_line(
    elapsed_s: f64,
    frame: Option<u64>,
    level: Level,
    target: &str,
    msg: &std::fmt::Arguments<'_>,
) -> String {
    let mut out = format!("[{elapsed_s:8.3}s ");
    match frame {
        Some(i) => {
            let _ = write!(out, "f{i}");
        }
        None => out.push('-'),
    }
    let _ = write!(out, " {level:>5} {}] {msg}", short_target(target));
    out
}

/// Install the stderr logger. Only the first call installs.
pub fn init_with_level(level: LevelFilter) -> Result<(), log::SetLoggerError> {
    if LOGGER.get().is_some() {
        return Ok(());
    }
    let logger = LOGGER.get_or_init(|| FrameLogger {
        level,
        started: Instant::now(),
    });
    log::set_logger(logger)?;
    log::set_max_level(level);
    Ok(())
}

/// Install a `tracing` subscriber. `RUST_LOG` wins over `verbosity`.
#[cfg(feature = "tracing")]
pub fn init_tracing(verbosity: u8, json: bool) {
    let default = level_from_verbosity(verbosity).to_string().to_lowercase();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let builder = fmt()
        .with_env_filter(filter)
        .with_span_events(FmtSpan::CLOSE);
    let _ = if json {
        builder.json().flatten_event(true).finish().try_init()
    } else {
        builder
            .with_timer(fmt::time::Uptime::default())
            .finish()
            .try_init()
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_maps_to_levels() {
        assert_eq!(level_from_verbosity(0), LevelFilter::Info);
        assert_eq!(level_from_verbosity(1), LevelFilter::Debug);
        assert_eq!(level_from_verbosity(5), LevelFilter::Trace);
    }

    #[test]
    fn line_carries_frame_tag() {
        let line = format_line(
            1.5,
            Some(17),
            Level::Debug,
            "dartcam_detect::tracker",
            &format_args!("blob at {}", 3),
        );
        assert_eq!(line, "[   1.500s f17 DEBUG detect::tracker] blob at 3");

        let line = format_line(0.0, None, Level::Warn, "other", &format_args!("x"));
        assert_eq!(line, "[   0.000s -  WARN other] x");
    }

    #[test]
    fn frame_tag_can_be_cleared() {
        set_frame(Some(4));
        assert_eq!(current_frame(), Some(4));
        set_frame(None);
        assert_eq!(current_frame(), None);
    }
}
