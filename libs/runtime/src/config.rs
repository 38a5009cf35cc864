use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::paths::home_dir::resolve_home_dir;

/// Env variables with this prefix override file values, `__` separating
/// nesting levels: `APP__SERVER__PORT=9000` sets `server.port`.
pub const ENV_PREFIX: &str = "APP__";

const HOME_SUBDIR: &str = ".roomhub";

/// Whole-process configuration: the server and logging sections plus one
/// free-form entry per module under `modules`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    pub server: ServerConfig,
    /// `None` until a file or env sets it; callers fall back to
    /// [`default_logging_config`].
    pub logging: Option<LoggingConfig>,
    /// Directory of `<module>.yaml` files merged under `modules`.
    #[serde(default)]
    pub modules_dir: Option<String>,
    #[serde(default)]
    pub modules: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Absolute after loading. Empty selects `~/.roomhub`.
    pub home_dir: String,
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub timeout_sec: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            home_dir: String::new(),
            host: "127.0.0.1".to_string(),
            port: 8087,
            timeout_sec: 0,
        }
    }
}

/// Subsystem name → sink settings. `default` catches everything else.
pub type LoggingConfig = HashMap<String, Section>;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Section {
    /// `trace` .. `error`, or `off`.
    pub console_level: String,
    /// Relative to `server.home_dir` unless absolute. Empty disables the file.
    pub file: String,
    #[serde(default)]
    pub file_level: String,
    #[serde(default)]
    pub max_backups: Option<usize>,
    #[serde(default)]
    pub max_size_mb: Option<u64>,
}

pub fn default_logging_config() -> LoggingConfig {
    LoggingConfig::from([(
        "default".to_string(),
        Section {
            console_level: "info".to_string(),
            file: "logs/roomhub.log".to_string(),
            file_level: "debug".to_string(),
            max_backups: Some(3),
            max_size_mb: Some(100),
        },
    )])
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            logging: Some(default_logging_config()),
            modules_dir: None,
            modules: HashMap::new(),
        }
    }
}

impl AppConfig {
    /// Built-in defaults, then the YAML file at `path`, then `APP__*` env.
    ///
    /// The home directory is made absolute and created. Module files from
    /// `modules_dir` fill in modules the main file does not configure.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            bail!("config file not found: {}", path.display());
        }

        let base = AppConfig {
            logging: None,
            ..AppConfig::default()
        };
        let mut config: AppConfig = Figment::from(Serialized::defaults(base))
            .merge(Yaml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .with_context(|| format!("Failed to parse yaml config '{}'", path.display()))?;

        config.settle()?;
        if let Some(dir) = config.modules_dir.clone() {
            let dir = resolve_relative(path, &dir);
            for (name, value) in read_module_files(&dir)? {
                config.modules.entry(name).or_insert(value);
            }
        }
        Ok(config)
    }

    /// [`from_file`](Self::from_file) when a path is given, defaults otherwise.
    pub fn load_or_default(path: Option<impl AsRef<Path>>) -> Result<Self> {
        match path {
            Some(p) => Self::from_file(p),
            None => {
                let mut config = Self::default();
                config.settle()?;
                Ok(config)
            }
        }
    }

    fn settle(&mut self) -> Result<()> {
        let configured = Some(self.server.home_dir.trim())
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        let home = resolve_home_dir(configured, HOME_SUBDIR, true)
            .context("Failed to resolve server.home_dir")?;
        self.server.home_dir = home.to_string_lossy().into_owned();
        Ok(())
    }

    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Failed to serialize config to YAML")
    }

    /// `--port` replaces `server.port`. Each `-v` raises the default console
    /// level one step (debug, then trace).
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(port) = args.port {
            self.server.port = port;
        }

        let bumped = match args.verbose {
            0 => None,
            1 => Some("debug"),
            _ => Some("trace"),
        };
        let logging = self.logging.get_or_insert_with(default_logging_config);
        if let (Some(level), Some(section)) = (bumped, logging.get_mut("default")) {
            section.console_level = level.to_string();
        }
    }
}

/// `dir` relative to the config file's directory unless absolute.
fn resolve_relative(config_file: &Path, dir: &str) -> PathBuf {
    let dir = Path::new(dir);
    match config_file.parent() {
        Some(parent) if dir.is_relative() => parent.join(dir),
        _ => dir.to_path_buf(),
    }
}

/// `<name>.yaml` / `<name>.yml` files in `dir`, keyed by file stem. A missing
/// directory yields nothing.
fn read_module_files(dir: &Path) -> Result<BTreeMap<String, serde_json::Value>> {
    let mut found = BTreeMap::new();
    if !dir.is_dir() {
        return Ok(found);
    }

    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read modules_dir '{}'", dir.display()))?
    {
        let path = entry?.path();
        let is_yaml = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"));
        if !path.is_file() || !is_yaml {
            continue;
        }
        let Some(name) = path.file_stem().and_then(|s| s.to_str()).map(str::to_string) else {
            continue;
        };

        let raw = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read '{}'", path.display()))?;
        let value: serde_yaml::Value = serde_yaml::from_str(&raw)
            .with_context(|| format!("Failed to parse yaml config '{}'", path.display()))?;
        found.insert(name, serde_json::to_value(value)?);
    }
    Ok(found)
}

/// The subset of command line flags that affects configuration.
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    pub config: Option<String>,
    pub port: Option<u16>,
    pub print_config: bool,
    pub verbose: u8,
}

/// Read access to a loaded [`AppConfig`] for module initialization.
#[derive(Debug, Clone)]
pub struct AppConfigProvider {
    config: AppConfig,
}

impl AppConfigProvider {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn app(&self) -> &AppConfig {
        &self.config
    }

    pub fn get_module_config(&self, module_name: &str) -> Option<&serde_json::Value> {
        self.config.modules.get(module_name)
    }

    /// Typed module config; a missing entry yields `T::default()`.
    pub fn module_config<T>(&self, module_name: &str) -> Result<T>
    where
        T: DeserializeOwned + Default,
    {
        match self.get_module_config(module_name) {
            Some(raw) => serde_json::from_value(raw.clone())
                .with_context(|| format!("Invalid config for module '{module_name}'")),
            None => Ok(T::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn write_yaml(dir: &Path, body: &str) -> PathBuf {
        let path = dir.join("roomhub.yaml");
        let home = dir.join("home").to_string_lossy().replace('\\', "/");
        fs::write(&path, format!("server:\n  home_dir: \"{home}\"\n{body}")).unwrap();
        path
    }

    #[test]
    fn defaults_point_at_local_port_8087() {
        let config = AppConfig::default();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8087);
        assert!(config.modules.is_empty());

        let default = &config.logging.unwrap()["default"];
        assert_eq!(default.console_level, "info");
        assert_eq!(default.file, "logs/roomhub.log");
    }

    #[test]
    fn file_values_override_defaults_and_home_is_created() {
        let tmp = tempdir().unwrap();
        let path = write_yaml(
            tmp.path(),
            r#"  port: 9090
logging:
  default:
    console_level: debug
    file: "logs/default.log"
modules:
  roomhub:
    conflict_policy: warn
"#,
        );

        let config = AppConfig::from_file(&path).unwrap();

        let home = PathBuf::from(&config.server.home_dir);
        assert!(home.is_absolute());
        assert!(home.exists());
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.logging.unwrap()["default"].console_level, "debug");
        assert_eq!(config.modules["roomhub"]["conflict_policy"], "warn");
    }

    #[test]
    fn logging_stays_unset_without_a_section() {
        let tmp = tempdir().unwrap();
        let config = AppConfig::from_file(write_yaml(tmp.path(), "")).unwrap();
        assert!(config.logging.is_none());
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = AppConfig::from_file("/nonexistent/roomhub.yaml").unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }

    #[test]
    fn unknown_top_level_key_is_rejected() {
        let tmp = tempdir().unwrap();
        let err = AppConfig::from_file(write_yaml(tmp.path(), "database:\n  url: x\n")).unwrap_err();
        assert!(err.to_string().contains("Failed to parse yaml config"));
    }

    #[test]
    fn module_files_fill_in_but_do_not_override() {
        let tmp = tempdir().unwrap();
        let modules = tmp.path().join("modules.d");
        fs::create_dir_all(&modules).unwrap();
        fs::write(modules.join("api_ingress.yaml"), "bind_addr: \"127.0.0.1:9999\"\n").unwrap();
        fs::write(modules.join("roomhub.yml"), "seed_demo_data: true\n").unwrap();
        fs::write(modules.join("notes.txt"), "ignored").unwrap();

        let path = write_yaml(
            tmp.path(),
            r#"modules_dir: "modules.d"
modules:
  roomhub:
    seed_demo_data: false
"#,
        );
        let config = AppConfig::from_file(&path).unwrap();

        assert_eq!(config.modules["api_ingress"]["bind_addr"], "127.0.0.1:9999");
        assert_eq!(config.modules["roomhub"]["seed_demo_data"], false);
        assert!(!config.modules.contains_key("notes"));
    }

    #[test]
    fn verbosity_raises_default_console_level() {
        for (verbose, expected) in [(0, "info"), (1, "debug"), (2, "trace"), (5, "trace")] {
            let mut config = AppConfig::default();
            config.apply_cli_overrides(&CliArgs {
                port: Some(3000),
                verbose,
                ..Default::default()
            });

            assert_eq!(config.server.port, 3000);
            assert_eq!(config.logging.unwrap()["default"].console_level, expected);
        }
    }

    #[test]
    fn overrides_create_logging_when_absent() {
        let mut config = AppConfig {
            logging: None,
            ..AppConfig::default()
        };
        config.apply_cli_overrides(&CliArgs {
            verbose: 1,
            ..Default::default()
        });
        assert_eq!(config.logging.unwrap()["default"].console_level, "debug");
    }

    #[derive(Debug, Default, Deserialize)]
    #[serde(deny_unknown_fields)]
    struct Probe {
        #[serde(default)]
        flag: bool,
    }

    #[test]
    fn provider_types_module_sections() {
        let mut config = AppConfig::default();
        config
            .modules
            .insert("present".into(), serde_json::json!({ "flag": true }));
        config
            .modules
            .insert("broken".into(), serde_json::json!({ "flog": true }));
        let provider = AppConfigProvider::new(config);

        assert!(provider.module_config::<Probe>("present").unwrap().flag);
        assert!(!provider.module_config::<Probe>("absent").unwrap().flag);
        let err = provider.module_config::<Probe>("broken").unwrap_err();
        assert!(err.to_string().contains("Invalid config for module 'broken'"));
    }

    #[test]
    fn yaml_dump_parses_back() {
        let yaml = AppConfig::default().to_yaml().unwrap();
        assert!(yaml.contains("server:"));
        let parsed: AppConfig = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed.server.port, 8087);
    }
}
