use std::{
    collections::HashMap,
    env,
    fs,
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result};
use directories::BaseDirs;

use crate::process::DEFAULT_TIMEOUT;

#[derive(Debug, Clone)]
pub struct Config {
    inner: HashMap<String, String>,
    pub config_path: PathBuf,
}

impl Config {
    /// Defaults, then the rc file (if present), then the environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
        let mut map = default_map();

        if config_path.exists() {
            let file = fs::File::open(&config_path)
                .with_context(|| format!("opening config file: {}", config_path.display()))?;
            map.extend(parse_rc(BufReader::new(file)));
        } else if path.is_some() {
            anyhow::bail!("config file not found: {}", config_path.display());
        }

        for (k, v) in env::vars() {
            if is_config_key(&k) {
                map.insert(k, v);
            }
        }

        Ok(Self { inner: map, config_path })
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.inner.get(key).cloned()
    }

    pub fn get_u64(&self, key: &str) -> Option<u64> {
        self.get(key).and_then(|v| v.trim().parse::<u64>().ok())
    }

    pub fn get_path(&self, key: &str) -> Option<PathBuf> {
        self.get(key).filter(|v| !v.trim().is_empty()).map(PathBuf::from)
    }

    pub fn script_dir(&self) -> PathBuf {
        self.get_path("HARDEN_SCRIPT_DIR").unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn report_dir(&self) -> PathBuf {
        self.get_path("HARDEN_REPORT_DIR").unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn modules_file(&self) -> Option<PathBuf> {
        self.get_path("HARDEN_MODULES_FILE")
    }

    pub fn interpreter(&self) -> Option<String> {
        self.get("HARDEN_INTERPRETER").filter(|v| !v.trim().is_empty())
    }

    /// Falls back to the default when the value is missing, zero or unparsable.
    pub fn timeout(&self) -> Duration {
        self.get_u64("HARDEN_TIMEOUT")
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TIMEOUT)
    }

    pub fn log_filter(&self) -> String {
        self.get("HARDEN_LOG").unwrap_or_else(|| "warn".into())
    }

    /// `None` means decide from whether stdout is a terminal.
    pub fn color(&self) -> Option<bool> {
        match self.get("HARDEN_COLOR").map(|v| v.to_ascii_lowercase()).as_deref() {
            Some("always") => Some(true),
            Some("never") => Some(false),
            _ => None,
        }
    }
}

fn parse_rc(reader: impl BufRead) -> HashMap<String, String> {
    let mut map = HashMap::new();
    for line in reader.lines().map_while(|l| l.ok()) {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some((k, v)) = line.split_once('=') {
            map.insert(k.trim().to_string(), v.trim().to_string());
        }
    }
    map
}

fn is_config_key(k: &str) -> bool {
    k.starts_with("HARDEN_")
}

fn default_config_path() -> PathBuf {
    let base = BaseDirs::new()
        .map(|b| b.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("/etc"));
    base.join("hardenctl").join("hardenrc")
}

fn default_map() -> HashMap<String, String> {
    let mut m = HashMap::new();
    m.insert("HARDEN_SCRIPT_DIR".into(), ".".into());
    m.insert("HARDEN_REPORT_DIR".into(), ".".into());
    m.insert("HARDEN_TIMEOUT".into(), DEFAULT_TIMEOUT.as_secs().to_string());
    m.insert("HARDEN_LOG".into(), "warn".into());
    m.insert("HARDEN_COLOR".into(), "auto".into());
    m
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::TempDir;

    fn with(pairs: &[(&str, &str)]) -> Config {
        let mut inner = default_map();
        for (k, v) in pairs {
            inner.insert(k.to_string(), v.to_string());
        }
        Config { inner, config_path: PathBuf::from("unused") }
    }

    #[test]
    fn rc_lines_skip_comments_and_blanks() {
        let rc = "# comment\n\nHARDEN_TIMEOUT = 42\nHARDEN_INTERPRETER=bash\nnot a pair\n";
        let map = parse_rc(Cursor::new(rc));
        assert_eq!(map.get("HARDEN_TIMEOUT").map(String::as_str), Some("42"));
        assert_eq!(map.get("HARDEN_INTERPRETER").map(String::as_str), Some("bash"));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn defaults() {
        let cfg = with(&[]);
        assert_eq!(cfg.timeout(), Duration::from_secs(300));
        assert_eq!(cfg.script_dir(), PathBuf::from("."));
        assert!(cfg.interpreter().is_none());
        assert!(cfg.modules_file().is_none());
        assert_eq!(cfg.color(), None);
        assert_eq!(cfg.log_filter(), "warn");
    }

    #[test]
    fn bad_timeout_falls_back() {
        assert_eq!(with(&[("HARDEN_TIMEOUT", "0")]).timeout(), DEFAULT_TIMEOUT);
        assert_eq!(with(&[("HARDEN_TIMEOUT", "soon")]).timeout(), DEFAULT_TIMEOUT);
        assert_eq!(with(&[("HARDEN_TIMEOUT", "5")]).timeout(), Duration::from_secs(5));
    }

    #[test]
    fn color_switch() {
        assert_eq!(with(&[("HARDEN_COLOR", "Always")]).color(), Some(true));
        assert_eq!(with(&[("HARDEN_COLOR", "never")]).color(), Some(false));
    }

    #[test]
    fn explicit_file_is_read() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("hardenrc");
        fs::write(&path, "HARDEN_REPORT_DIR=/var/log/hardening\n").unwrap();

        let cfg = Config::load(Some(path.as_path())).unwrap();
        if env::var_os("HARDEN_REPORT_DIR").is_none() {
            assert_eq!(cfg.report_dir(), PathBuf::from("/var/log/hardening"));
        }
        assert_eq!(cfg.config_path, path);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        assert!(Config::load(Some(dir.path().join("nope").as_path())).is_err());
    }
}
