//! Configuration loading and parsing.
//!
//! Reads `quill.toml` (or an override path provided by the binary):
//!
//! ```toml
//! fontName = "Times New Roman"
//! fontSize = 14
//!
//! [autosave]
//! enabled = true
//! interval_ms = 300000
//!
//! [page]
//! height_px = 800
//! # line_height_px = 18   # default: ceil(fontSize * 1.25)
//! ```
//!
//! Every key is optional. A missing or unparsable file is not an error: the
//! defaults apply and a warning is logged. Unknown keys are ignored.

use anyhow::Result;
use serde::Deserialize;
use std::{fs, path::PathBuf, time::Duration};
use tracing::{info, warn};

pub const DEFAULT_FONT_NAME: &str = "Times New Roman";
pub const DEFAULT_FONT_SIZE: u16 = 14;
pub const DEFAULT_AUTOSAVE_INTERVAL_MS: u64 = 300_000;
pub const DEFAULT_PAGE_HEIGHT_PX: u32 = 800;

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct AutoSaveConfig {
    #[serde(default = "AutoSaveConfig::default_enabled")]
    pub enabled: bool,
    #[serde(default = "AutoSaveConfig::default_interval_ms")]
    pub interval_ms: u64,
}

impl Default for AutoSaveConfig {
    fn default() -> Self {
        Self {
            enabled: Self::default_enabled(),
            interval_ms: Self::default_interval_ms(),
        }
    }
}

impl AutoSaveConfig {
    const fn default_enabled() -> bool {
        true
    }
    const fn default_interval_ms() -> u64 {
        DEFAULT_AUTOSAVE_INTERVAL_MS
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct PageConfig {
    #[serde(default = "PageConfig::default_height_px")]
    pub height_px: u32,
    #[serde(default)]
    pub line_height_px: Option<u32>,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            height_px: Self::default_height_px(),
            line_height_px: None,
        }
    }
}

impl PageConfig {
    const fn default_height_px() -> u32 {
        DEFAULT_PAGE_HEIGHT_PX
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    #[serde(rename = "fontName", default = "ConfigFile::default_font_name")]
    pub font_name: String,
    #[serde(rename = "fontSize", default = "ConfigFile::default_font_size")]
    pub font_size: u16,
    #[serde(default)]
    pub autosave: AutoSaveConfig,
    #[serde(default)]
    pub page: PageConfig,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            font_name: Self::default_font_name(),
            font_size: Self::default_font_size(),
            autosave: AutoSaveConfig::default(),
            page: PageConfig::default(),
        }
    }
}

impl ConfigFile {
    fn default_font_name() -> String {
        DEFAULT_FONT_NAME.to_string()
    }
    const fn default_font_size() -> u16 {
        DEFAULT_FONT_SIZE
    }
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub file: ConfigFile,        // parsed (or default) data
    pub source: Option<PathBuf>, // path the values came from
}

/// Best-effort config path: `quill.toml` in the working directory, else the
/// platform config dir (XDG / AppData Roaming).
pub fn discover() -> PathBuf {
    let local = PathBuf::from("quill.toml");
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("quill").join("quill.toml");
    }
    local
}

pub fn load_from(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(discover);
    let Ok(content) = fs::read_to_string(&path) else {
        info!(target: "config", path = %path.display(), "config_absent_using_defaults");
        return Ok(Config::default());
    };
    match toml::from_str::<ConfigFile>(&content) {
        Ok(file) => {
            let mut cfg = Config {
                file,
                source: Some(path),
            };
            cfg.sanitize();
            info!(
                target: "config",
                font_name = %cfg.file.font_name,
                font_size = cfg.file.font_size,
                autosave = cfg.file.autosave.enabled,
                "config_loaded"
            );
            Ok(cfg)
        }
        Err(e) => {
            warn!(target: "config", path = %path.display(), error = %e, "config_parse_failed_using_defaults");
            Ok(Config::default())
        }
    }
}

impl Config {
    /// Replace values that parse but make no sense with their defaults.
    fn sanitize(&mut self) {
        if self.file.font_size == 0 {
            warn!(target: "config", "font_size_zero_reset");
            self.file.font_size = DEFAULT_FONT_SIZE;
        }
        if self.file.font_name.trim().is_empty() {
            warn!(target: "config", "font_name_empty_reset");
            self.file.font_name = DEFAULT_FONT_NAME.to_string();
        }
        if self.file.page.height_px == 0 {
            warn!(target: "config", "page_height_zero_reset");
            self.file.page.height_px = DEFAULT_PAGE_HEIGHT_PX;
        }
        if self.file.page.line_height_px == Some(0) {
            warn!(target: "config", "line_height_zero_ignored");
            self.file.page.line_height_px = None;
        }
    }

    pub fn font_name(&self) -> &str {
        &self.file.font_name
    }

    pub fn font_size(&self) -> u16 {
        self.file.font_size
    }

    /// Auto-save period; `None` when disabled.
    pub fn autosave_interval(&self) -> Option<Duration> {
        let a = &self.file.autosave;
        (a.enabled && a.interval_ms > 0).then(|| Duration::from_millis(a.interval_ms))
    }

    pub fn page_height_px(&self) -> u32 {
        self.file.page.height_px
    }

    /// Fixed line height from `[page]`; `None` leaves it to the font size.
    pub fn line_height_override(&self) -> Option<u32> {
        self.file.page.line_height_px
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex, MutexGuard};
    use tracing::Level;
    use tracing::subscriber::with_default;
    use tracing_subscriber::fmt::MakeWriter;

    #[derive(Clone)]
    struct BufferWriter {
        inner: Arc<Mutex<Vec<u8>>>,
    }

    impl BufferWriter {
        fn new() -> (Self, Arc<Mutex<Vec<u8>>>) {
            let buf = Arc::new(Mutex::new(Vec::new()));
            (Self { inner: buf.clone() }, buf)
        }
    }

    struct LockedWriter<'a> {
        guard: MutexGuard<'a, Vec<u8>>,
    }

    impl Write for LockedWriter<'_> {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.guard.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for BufferWriter {
        type Writer = LockedWriter<'a>;

        fn make_writer(&'a self) -> Self::Writer {
            LockedWriter {
                guard: self.inner.lock().expect("log buffer poisoned"),
            }
        }
    }

    fn write_cfg(body: &str) -> tempfile::NamedTempFile {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), body).unwrap();
        tmp
    }

    #[test]
    fn defaults_when_missing_file() {
        let cfg = load_from(Some(PathBuf::from("__nonexistent_hopefully__.toml"))).unwrap();
        assert_eq!(cfg.font_name(), "Times New Roman");
        assert_eq!(cfg.font_size(), 14);
        assert_eq!(cfg.autosave_interval(), Some(Duration::from_millis(300_000)));
        assert_eq!(cfg.page_height_px(), 800);
        assert_eq!(cfg.line_height_override(), None);
        assert!(cfg.source.is_none());
    }

    #[test]
    fn parses_font_keys() {
        let tmp = write_cfg("fontName = \"Arial\"\nfontSize = 20\n");
        let cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        assert_eq!(cfg.font_name(), "Arial");
        assert_eq!(cfg.font_size(), 20);
        assert_eq!(cfg.source.as_deref(), Some(tmp.path()));
    }

    #[test]
    fn parses_autosave_and_page_tables() {
        let tmp = write_cfg(
            "[autosave]\nenabled = false\ninterval_ms = 1000\n[page]\nheight_px = 600\nline_height_px = 20\n",
        );
        let cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        assert_eq!(cfg.autosave_interval(), None);
        assert_eq!(cfg.page_height_px(), 600);
        assert_eq!(cfg.line_height_override(), Some(20));
        assert_eq!(cfg.font_size(), 14, "unset keys keep defaults");
    }

    #[test]
    fn zero_values_fall_back() {
        let tmp = write_cfg("fontSize = 0\n[page]\nheight_px = 0\n[autosave]\ninterval_ms = 0\n");
        let cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        assert_eq!(cfg.font_size(), 14);
        assert_eq!(cfg.page_height_px(), 800);
        assert_eq!(cfg.autosave_interval(), None);
    }

    #[test]
    fn parse_failure_warns_and_uses_defaults() {
        let tmp = write_cfg("fontSize = \"big\"\n");
        let (writer, buffer) = BufferWriter::new();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(Level::INFO)
            .with_target(true)
            .with_ansi(false)
            .without_time()
            .with_writer(writer)
            .finish();

        let cfg = with_default(subscriber, || {
            load_from(Some(tmp.path().to_path_buf())).unwrap()
        });

        let log_output = String::from_utf8(buffer.lock().unwrap().clone()).unwrap();
        assert!(log_output.contains("WARN config:"));
        assert!(log_output.contains("config_parse_failed_using_defaults"));
        assert_eq!(cfg.font_size(), 14);
        assert!(cfg.source.is_none());
    }
}
