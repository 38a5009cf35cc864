//! Tracing subscriber setup.
//!
//! Every key of the logging config other than `default` names a subsystem: a
//! crate (or module path) whose records get their own console level and their
//! own rotating JSON file. Records no subsystem claims go to the `default`
//! sinks.

use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};

use file_rotate::{
    compression::Compression,
    suffix::{AppendTimestamp, FileLimit},
    ContentLimit, FileRotate,
};
use tracing::{level_filters::LevelFilter, Level, Metadata};
use tracing_subscriber::{
    filter::{FilterFn, Targets},
    fmt::{self, time::UtcTime},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    Layer, Registry,
};

use crate::config::{LoggingConfig, Section};

const CATCH_ALL: &str = "default";
const DEFAULT_MAX_SIZE_MB: u64 = 100;
const DEFAULT_MAX_BACKUPS: usize = 3;

/// `None` switches the sink off. Unknown names fall back to info.
fn level_of(raw: &str) -> Option<Level> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "off" | "none" => None,
        "trace" => Some(Level::TRACE),
        "debug" => Some(Level::DEBUG),
        "warn" => Some(Level::WARN),
        "error" => Some(Level::ERROR),
        _ => Some(Level::INFO),
    }
}

/// `target` belongs to `name` when it is that path or nested below it.
fn owns(name: &str, target: &str) -> bool {
    target
        .strip_prefix(name)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with("::"))
}

#[derive(Clone)]
struct LogFile(Arc<Mutex<FileRotate<AppendTimestamp>>>);

impl LogFile {
    fn open(path: &Path, max_bytes: usize, max_files: usize) -> io::Result<Self> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let rotate = FileRotate::new(
            path,
            AppendTimestamp::default(FileLimit::MaxFiles(max_files)),
            ContentLimit::BytesSurpassed(max_bytes),
            Compression::None,
            #[cfg(unix)]
            None,
        );
        Ok(Self(Arc::new(Mutex::new(rotate))))
    }
}

impl Write for LogFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap_or_else(|p| p.into_inner()).write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.0.lock().unwrap_or_else(|p| p.into_inner()).flush()
    }
}

/// A config section resolved into levels and an opened file.
struct Sink {
    name: String,
    console: Option<Level>,
    file: Option<(Level, LogFile)>,
}

impl Sink {
    fn open(name: &str, section: &Section, base_dir: &Path) -> Self {
        let file = level_of(&section.file_level)
            .and_then(|level| open_section_file(name, section, base_dir).map(|f| (level, f)));
        Self {
            name: name.to_string(),
            console: level_of(&section.console_level),
            file,
        }
    }

    fn file_level(&self) -> Option<Level> {
        self.file.as_ref().map(|(level, _)| *level)
    }
}

/// Relative paths live under `base_dir` (the server home directory).
fn open_section_file(name: &str, section: &Section, base_dir: &Path) -> Option<LogFile> {
    let file = section.file.trim();
    if file.is_empty() {
        return None;
    }
    let path = base_dir.join(file);
    let max_bytes = section
        .max_size_mb
        .unwrap_or(DEFAULT_MAX_SIZE_MB)
        .saturating_mul(1024 * 1024);
    let max_files = section.max_backups.unwrap_or(DEFAULT_MAX_BACKUPS);

    match LogFile::open(&path, usize::try_from(max_bytes).unwrap_or(usize::MAX), max_files) {
        Ok(f) => Some(f),
        Err(e) => {
            // The subscriber is not installed yet.
            eprintln!(
                "logging: cannot open '{}' for '{}': {}",
                path.display(),
                name,
                e
            );
            None
        }
    }
}

struct LogPlan {
    /// Longest name first, so nested subsystems win over their parents.
    subsystems: Vec<Sink>,
    fallback: Option<Sink>,
}

impl LogPlan {
    fn new(cfg: &LoggingConfig, base_dir: &Path) -> Self {
        let mut subsystems: Vec<Sink> = cfg
            .iter()
            .filter(|(name, _)| name.as_str() != CATCH_ALL)
            .map(|(name, section)| Sink::open(name, section, base_dir))
            .collect();
        subsystems.sort_by(|a, b| b.name.len().cmp(&a.name.len()).then(a.name.cmp(&b.name)));

        Self {
            subsystems,
            fallback: cfg
                .get(CATCH_ALL)
                .map(|section| Sink::open(CATCH_ALL, section, base_dir)),
        }
    }

    fn claimed(&self) -> Arc<[String]> {
        self.subsystems.iter().map(|s| s.name.clone()).collect()
    }

    fn targets(&self, level: impl Fn(&Sink) -> Option<Level>) -> Targets {
        self.subsystems
            .iter()
            .fold(Targets::new().with_default(LevelFilter::OFF), |t, s| match level(s) {
                Some(l) => t.with_target(s.name.clone(), l),
                None => t,
            })
    }

    /// File for records of `target`. A claiming subsystem without a file
    /// swallows them rather than leaking into the default file.
    fn file_for(&self, target: &str) -> Option<LogFile> {
        let sink = match self.subsystems.iter().find(|s| owns(&s.name, target)) {
            Some(s) => Some(s),
            None => self.fallback.as_ref(),
        };
        sink.and_then(|s| s.file.as_ref()).map(|(_, f)| f.clone())
    }
}

#[derive(Clone)]
struct FileRouter(Arc<LogPlan>);

struct RoutedWriter(Option<LogFile>);

impl Write for RoutedWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match &mut self.0 {
            Some(f) => f.write(buf),
            None => Ok(buf.len()),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match &mut self.0 {
            Some(f) => f.flush(),
            None => Ok(()),
        }
    }
}

impl<'a> fmt::MakeWriter<'a> for FileRouter {
    type Writer = RoutedWriter;

    fn make_writer(&'a self) -> Self::Writer {
        RoutedWriter(self.0.file_for(""))
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        RoutedWriter(self.0.file_for(meta.target()))
    }
}

/// Records up to `max` that no subsystem claims.
fn unclaimed(claimed: Arc<[String]>, max: Level) -> FilterFn<impl Fn(&Metadata<'_>) -> bool> {
    FilterFn::new(move |meta: &Metadata<'_>| {
        *meta.level() <= max && !claimed.iter().any(|name| owns(name, meta.target()))
    })
}

/// Install the global subscriber described by `cfg`.
///
/// Relative log file paths are resolved against `base_dir`. Calling this
/// twice is harmless: the second install is ignored.
pub fn init_logging_from_config(cfg: &LoggingConfig, base_dir: &Path) {
    // Route `log` records through tracing.
    let _ = tracing_log::LogTracer::init();

    if cfg.is_empty() {
        init_default_logging();
        return;
    }

    let plan = Arc::new(LogPlan::new(cfg, base_dir));
    let claimed = plan.claimed();
    let files = FileRouter(plan.clone());
    let ansi = atty::is(atty::Stream::Stdout);

    let console_subsystems = fmt::layer()
        .with_ansi(ansi)
        .with_target(true)
        .with_timer(UtcTime::rfc_3339())
        .with_filter(plan.targets(|s| s.console));

    let console_rest = plan.fallback.as_ref().and_then(|s| s.console).map(|level| {
        fmt::layer()
            .with_ansi(ansi)
            .with_target(true)
            .with_timer(UtcTime::rfc_3339())
            .with_filter(unclaimed(claimed.clone(), level))
    });

    let file_subsystems = plan
        .subsystems
        .iter()
        .any(|s| s.file.is_some())
        .then(|| {
            fmt::layer()
                .json()
                .with_ansi(false)
                .with_target(true)
                .with_timer(UtcTime::rfc_3339())
                .with_writer(files.clone())
                .with_filter(plan.targets(Sink::file_level))
        });

    let file_rest = plan.fallback.as_ref().and_then(Sink::file_level).map(|level| {
        fmt::layer()
            .json()
            .with_ansi(false)
            .with_target(true)
            .with_timer(UtcTime::rfc_3339())
            .with_writer(files.clone())
            .with_filter(unclaimed(claimed.clone(), level))
    });

    let _ = Registry::default()
        .with(console_subsystems)
        .with(console_rest)
        .with(file_subsystems)
        .with(file_rest)
        .try_init();
}

/// Plain console logging at the default level.
pub fn init_default_logging() {
    let _ = tracing_subscriber::fmt()
        .with_target(true)
        .with_timer(UtcTime::rfc_3339())
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_logging_config;
    use tempfile::tempdir;

    fn section(console: &str, file: &str, file_level: &str) -> Section {
        Section {
            console_level: console.into(),
            file: file.into(),
            file_level: file_level.into(),
            max_backups: Some(1),
            max_size_mb: Some(1),
        }
    }

    #[test]
    fn levels_are_case_insensitive_and_default_to_info() {
        assert_eq!(level_of("TRACE"), Some(Level::TRACE));
        assert_eq!(level_of(" debug "), Some(Level::DEBUG));
        assert_eq!(level_of("Warn"), Some(Level::WARN));
        assert_eq!(level_of("error"), Some(Level::ERROR));
        assert_eq!(level_of(""), Some(Level::INFO));
        assert_eq!(level_of("loud"), Some(Level::INFO));
        assert_eq!(level_of("off"), None);
        assert_eq!(level_of("NONE"), None);
    }

    #[test]
    fn ownership_respects_path_segments() {
        assert!(owns("roomhub", "roomhub"));
        assert!(owns("roomhub", "roomhub::domain::service"));
        assert!(!owns("roomhub", "roomhub_server"));
        assert!(!owns("roomhub::api", "roomhub::domain"));
        assert!(!owns("roomhub", ""));
    }

    #[test]
    fn nested_subsystem_is_matched_before_its_parent() {
        let tmp = tempdir().unwrap();
        let mut cfg = default_logging_config();
        cfg.insert("roomhub".into(), section("info", "logs/roomhub-domain.log", "debug"));
        cfg.insert("roomhub::api".into(), section("info", "", "debug"));
        cfg.insert("api_ingress".into(), section("off", "logs/api.log", "info"));

        let plan = LogPlan::new(&cfg, tmp.path());
        let names: Vec<&str> = plan.subsystems.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["roomhub::api", "api_ingress", "roomhub"]);

        assert!(plan.file_for("roomhub::domain").is_some());
        // Claimed by a subsystem without a file
        assert!(plan.file_for("roomhub::api::rest").is_none());
        assert!(plan.file_for("api_ingress::request_id").is_some());
        // Unclaimed goes to the default file
        assert!(plan.file_for("hyper::proto").is_some());
        assert!(tmp.path().join("logs").exists());
    }

    #[test]
    fn switched_off_file_level_opens_nothing() {
        let tmp = tempdir().unwrap();
        let sink = Sink::open("quiet", &section("off", "logs/quiet.log", "off"), tmp.path());
        assert!(sink.console.is_none());
        assert!(sink.file.is_none());
        assert!(!tmp.path().join("logs/quiet.log").exists());
    }

    #[test]
    fn blank_file_name_means_console_only() {
        let sink = Sink::open("x", &section("debug", "  ", "debug"), Path::new("/tmp"));
        assert_eq!(sink.console, Some(Level::DEBUG));
        assert!(sink.file.is_none());
    }

    #[test]
    fn routed_writes_reach_the_file() {
        let tmp = tempdir().unwrap();
        let mut cfg = LoggingConfig::new();
        cfg.insert(CATCH_ALL.into(), section("off", "nested/dir/app.log", "info"));

        let router = FileRouter(Arc::new(LogPlan::new(&cfg, tmp.path())));
        let mut writer = fmt::MakeWriter::make_writer(&router);
        writer.write_all(b"{\"msg\":\"hello\"}\n").unwrap();
        writer.flush().unwrap();

        let written = std::fs::read_to_string(tmp.path().join("nested/dir/app.log")).unwrap();
        assert!(written.contains("hello"));
    }
}
