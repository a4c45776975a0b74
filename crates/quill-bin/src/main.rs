use std::path::{Path, PathBuf};
use std::sync::Once;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use core_actions::dispatcher::NOTIFICATION_TTL;
use core_actions::io_ops::open_file;
use core_events::{
    AutoSaveEventSource, EVENT_CHANNEL_CAP, Event, EventSourceRegistry, LineInputSource,
    TickEventSource,
};
use core_model::{EditorModel, PageMetrics};
use core_state::{EditorError, EditorState};
use core_text::Style;
use tokio::io::BufReader;
use tokio::sync::mpsc;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;

mod runtime;
use runtime::EditorRuntime;

const DEFAULT_LOG_FILE: &str = "quill.log";
const TICK_INTERVAL: Duration = Duration::from_millis(250);

#[derive(Parser, Debug)]
#[command(name = "quill", version, about = "Quill rich-text editor (headless)")]
struct Args {
    /// Document to open at startup. A path that does not exist yet starts
    /// an empty document that saves to it.
    pub path: Option<PathBuf>,
    /// Configuration file (overrides discovery of `quill.toml`).
    #[arg(long = "config")]
    pub config: Option<PathBuf>,
    /// Read commands from this file instead of stdin.
    #[arg(long = "script")]
    pub script: Option<PathBuf>,
    /// Log file path.
    #[arg(long = "log-file", default_value = DEFAULT_LOG_FILE)]
    pub log_file: PathBuf,
}

#[derive(Debug, Clone)]
struct StartupTelemetry {
    opened_path: Option<PathBuf>,
    config_source: Option<PathBuf>,
    open_failed: bool,
    autosave_ms: Option<u64>,
}

struct EditorBootstrap {
    model: EditorModel,
    config: core_config::Config,
    telemetry: StartupTelemetry,
}

struct AppStartup {
    log_guard: Option<WorkerGuard>,
}

impl AppStartup {
    fn new() -> Self {
        Self { log_guard: None }
    }

    fn configure_logging(&mut self, log_path: &Path) -> Result<()> {
        let dir = match log_path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let file = log_path
            .file_name()
            .context("log file path has no file name")?;
        if log_path.exists() {
            let _ = std::fs::remove_file(log_path);
        }

        let file_appender = tracing_appender::rolling::never(dir, file);
        let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
        if tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_writer(nb_writer)
            .with_ansi(false)
            .try_init()
            .is_ok()
        {
            self.log_guard = Some(guard);
        }
        Ok(())
    }

    fn install_panic_hook() {
        static HOOK: Once = Once::new();
        HOOK.call_once(|| {
            let default_panic = std::panic::take_hook();
            std::panic::set_hook(Box::new(move |info| {
                tracing::error!(target: "runtime.panic", ?info, "panic");
                default_panic(info);
            }));
        });
    }

    fn load_editor_state(args: &Args) -> Result<EditorBootstrap> {
        let config = core_config::load_from(args.config.clone())?;
        let style = Style::new(config.font_name(), config.font_size());
        let page = PageMetrics::new(config.page_height_px(), config.line_height_override());

        let mut open_failed = false;
        let mut state = EditorState::new(style.clone());
        if let Some(path) = args.path.as_ref() {
            match open_file(path, &style) {
                Ok(loaded) => {
                    if loaded.mixed_line_endings {
                        state.set_ephemeral("Mixed line endings normalized", NOTIFICATION_TTL);
                    }
                    loaded.install(&mut state);
                }
                Err(EditorError::Io { source, .. })
                    if source.kind() == std::io::ErrorKind::NotFound =>
                {
                    info!(target: "io", path = %path.display(), "new_file_at_path");
                    state.file_name = Some(path.clone());
                }
                Err(e) => {
                    open_failed = true;
                    state.set_ephemeral(format!("Open failed: {e}"), NOTIFICATION_TTL);
                }
            }
        }

        let telemetry = StartupTelemetry {
            opened_path: state.file_name.clone(),
            config_source: config.source.clone(),
            open_failed,
            autosave_ms: config.file.autosave.enabled.then_some(config.file.autosave.interval_ms),
        };
        Ok(EditorBootstrap {
            model: EditorModel::with_state(state, style, page),
            config,
            telemetry,
        })
    }
}

/// Command lines come from the script file when given, else stdin.
async fn register_sources(
    registry: &mut EventSourceRegistry,
    args: &Args,
    config: &core_config::Config,
) -> Result<()> {
    match args.script.as_ref() {
        Some(script) => {
            let file = tokio::fs::File::open(script)
                .await
                .with_context(|| format!("cannot open script {}", script.display()))?;
            registry.register(LineInputSource::new(BufReader::new(file)));
        }
        None => registry.register(LineInputSource::new(BufReader::new(tokio::io::stdin()))),
    }
    if let Some(period) = config.autosave_interval() {
        registry.register(AutoSaveEventSource::new(period));
    }
    registry.register(TickEventSource::new(TICK_INTERVAL));
    Ok(())
}

async fn run(args: Args) -> Result<()> {
    let bootstrap = AppStartup::load_editor_state(&args)?;
    let t = &bootstrap.telemetry;
    let path_str = t.opened_path.as_ref().map(|p| p.display().to_string());
    let config_str = t.config_source.as_ref().map(|p| p.display().to_string());
    info!(
        target: "runtime.startup",
        path = path_str.as_deref(),
        config = config_str.as_deref(),
        open_failed = t.open_failed,
        autosave_ms = t.autosave_ms,
        "bootstrap_complete"
    );

    let (tx, rx) = mpsc::channel::<Event>(EVENT_CHANNEL_CAP);
    let mut registry = EventSourceRegistry::new();
    register_sources(&mut registry, &args, &bootstrap.config).await?;
    let source_handles = registry.spawn_all(&tx);

    let mut runtime = EditorRuntime::new(
        bootstrap.model,
        tx,
        rx,
        source_handles,
        std::io::stdout(),
    );
    let reason = runtime.run().await?;
    info!(target: "runtime", %reason, "exit");
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    let mut startup = AppStartup::new();
    startup.configure_logging(&args.log_file)?;
    AppStartup::install_panic_hook();
    info!(target: "runtime", "startup");

    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let result = rt.block_on(run(args));
    // the stdin reader may still be parked in a blocking read
    rt.shutdown_timeout(Duration::from_millis(200));
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn args(list: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("quill").chain(list.iter().copied())).unwrap()
    }

    #[test]
    fn cli_defaults() {
        let a = args(&[]);
        assert!(a.path.is_none() && a.config.is_none() && a.script.is_none());
        assert_eq!(a.log_file, PathBuf::from(DEFAULT_LOG_FILE));
    }

    #[test]
    fn cli_all_flags() {
        let a = args(&["doc.txt", "--config", "q.toml", "--script", "s.txt", "--log-file", "x.log"]);
        assert_eq!(a.path, Some(PathBuf::from("doc.txt")));
        assert_eq!(a.config, Some(PathBuf::from("q.toml")));
        assert_eq!(a.script, Some(PathBuf::from("s.txt")));
        assert_eq!(a.log_file, PathBuf::from("x.log"));
    }

    #[test]
    fn bootstrap_opens_existing_file_with_config_font() {
        let dir = tempfile::tempdir().unwrap();
        let doc = dir.path().join("doc.txt");
        std::fs::write(&doc, "one\r\ntwo\r\n").unwrap();
        let cfg = dir.path().join("quill.toml");
        std::fs::write(&cfg, "fontName = \"Arial\"\nfontSize = 20\n").unwrap();

        let a = args(&[doc.to_str().unwrap(), "--config", cfg.to_str().unwrap()]);
        let boot = AppStartup::load_editor_state(&a).unwrap();
        let st = boot.model.state();
        assert_eq!(st.document().text(), "one\ntwo\n");
        assert_eq!(st.file_name.as_deref(), Some(doc.as_path()));
        assert!(!st.dirty);
        assert_eq!(boot.model.default_style().font_family, "Arial");
        assert_eq!(st.document().style_at(0).unwrap().font_size, 20);
        assert!(!boot.telemetry.open_failed);
        // no [page] line height: derived from fontSize 20
        assert_eq!(boot.model.page_metrics().line_height_px, None);
        assert_eq!(boot.model.page_metrics().line_height(20), 25);
    }

    #[test]
    fn bootstrap_passes_fixed_line_height_through() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = dir.path().join("quill.toml");
        std::fs::write(&cfg, "[page]\nheight_px = 100\nline_height_px = 10\n").unwrap();
        let a = args(&["--config", cfg.to_str().unwrap()]);
        let boot = AppStartup::load_editor_state(&a).unwrap();
        assert_eq!(boot.model.page_metrics(), PageMetrics::new(100, Some(10)));
    }

    #[test]
    fn bootstrap_missing_path_starts_named_blank_document() {
        let dir = tempfile::tempdir().unwrap();
        let doc = dir.path().join("fresh.txt");
        let a = args(&[doc.to_str().unwrap(), "--config", "definitely-missing.toml"]);
        let boot = AppStartup::load_editor_state(&a).unwrap();
        let st = boot.model.state();
        assert_eq!(st.document().text(), "");
        assert_eq!(st.file_name.as_deref(), Some(doc.as_path()));
        assert!(!boot.telemetry.open_failed);
        assert_eq!(boot.model.default_style(), &Style::default());
    }

    #[test]
    fn bootstrap_unreadable_path_is_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        // a directory cannot be read as text
        let a = args(&[dir.path().to_str().unwrap(), "--config", "definitely-missing.toml"]);
        let boot = AppStartup::load_editor_state(&a).unwrap();
        assert!(boot.telemetry.open_failed);
        assert!(boot.model.state().file_name.is_none());
        let msg = boot.model.state().ephemeral_status.as_ref().unwrap();
        assert!(msg.text.starts_with("Open failed"));
    }
}
