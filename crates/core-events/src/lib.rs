//! Core event types and async event sources for Quill.
//!
//! Every effect in the editor starts as an [`Event`] on one bounded mpsc
//! channel consumed by the binary's event loop. Producers (the command line
//! reader, the auto-save timer, the status tick) are [`AsyncEventSource`]s
//! spawned from an [`EventSourceRegistry`]; each one stops as soon as a send
//! fails because the loop dropped its receiver.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc::Sender;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Bounded channel capacity. Producers use `send().await`, so a full channel
/// parks them instead of dropping events.
pub const EVENT_CHANNEL_CAP: usize = 1024;

/// Top-level event enum consumed by the central event loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// One line of command input (`find cat`, `key ctrl+s`, `menu Home Bold`).
    Line(String),
    /// Periodic auto-save request.
    AutoSave,
    /// Periodic tick used to expire ephemeral status messages.
    Tick,
    /// Input exhausted or quit requested.
    Shutdown,
}

/// Trait implemented by any async event producer.
pub trait AsyncEventSource: Send + 'static {
    /// Stable identifier used in logs.
    fn name(&self) -> &'static str;
    /// Consume self and spawn the background task. Implementors stop when
    /// `tx.send(..).await` fails (channel closed).
    fn spawn(self: Box<Self>, tx: Sender<Event>) -> JoinHandle<()>;
}

/// Sources registered before the loop starts and spawned together.
pub struct EventSourceRegistry {
    sources: Vec<Box<dyn AsyncEventSource>>,
}

impl Default for EventSourceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSourceRegistry {
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
        }
    }

    pub fn register<S: AsyncEventSource>(&mut self, src: S) {
        self.sources.push(Box::new(src));
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Spawn all registered sources, each with its own `Sender` clone. The
    /// registry is drained, so a second call spawns nothing. During shutdown
    /// the caller drops its last `Sender` before awaiting the handles.
    pub fn spawn_all(&mut self, tx: &Sender<Event>) -> Vec<JoinHandle<()>> {
        let mut out = Vec::with_capacity(self.sources.len());
        for src in self.sources.drain(..) {
            let name = src.name();
            info!(target: "runtime.events", source = name, "spawning event source");
            out.push(src.spawn(tx.clone()));
        }
        out
    }
}

async fn send_or_stop(tx: &Sender<Event>, event: Event, source: &'static str) -> bool {
    if tx.send(event).await.is_err() {
        debug!(target: "runtime.events", source, "channel_closed_stopping");
        return false;
    }
    true
}

/// Emits `Event::Tick` every interval.
pub struct TickEventSource {
    interval: Duration,
}

impl TickEventSource {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

impl AsyncEventSource for TickEventSource {
    fn name(&self) -> &'static str {
        "tick"
    }

    fn spawn(self: Box<Self>, tx: Sender<Event>) -> JoinHandle<()> {
        let dur = self.interval;
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(dur);
            loop {
                interval.tick().await;
                if !send_or_stop(&tx, Event::Tick, "tick").await {
                    break;
                }
            }
        })
    }
}

/// Emits `Event::AutoSave` once per period, the first one a full period
/// after spawn.
pub struct AutoSaveEventSource {
    period: Duration,
}

impl AutoSaveEventSource {
    pub fn new(period: Duration) -> Self {
        Self { period }
    }
}

impl AsyncEventSource for AutoSaveEventSource {
    fn name(&self) -> &'static str {
        "autosave"
    }

    fn spawn(self: Box<Self>, tx: Sender<Event>) -> JoinHandle<()> {
        let period = self.period;
        let start = tokio::time::Instant::now() + period;
        tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(start, period);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if !send_or_stop(&tx, Event::AutoSave, "autosave").await {
                    break;
                }
            }
        })
    }
}

/// Reads newline-delimited commands and forwards each non-blank line as
/// `Event::Line`. Sends `Event::Shutdown` at end of input.
pub struct LineInputSource<R> {
    reader: R,
}

impl<R> LineInputSource<R>
where
    R: AsyncBufRead + Unpin + Send + 'static,
{
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R> AsyncEventSource for LineInputSource<R>
where
    R: AsyncBufRead + Unpin + Send + 'static,
{
    fn name(&self) -> &'static str {
        "line_input"
    }

    fn spawn(self: Box<Self>, tx: Sender<Event>) -> JoinHandle<()> {
        let mut lines = self.reader.lines();
        tokio::spawn(async move {
            loop {
                match lines.next_line().await {
                    Ok(Some(line)) => {
                        let line = line.trim_end_matches('\r').to_string();
                        if line.trim().is_empty() {
                            continue;
                        }
                        if !send_or_stop(&tx, Event::Line(line), "line_input").await {
                            return;
                        }
                    }
                    Ok(None) => break,
                    Err(e) => {
                        tracing::error!(target: "runtime.events", error = %e, "line_input_read_failed");
                        break;
                    }
                }
            }
            let _ = send_or_stop(&tx, Event::Shutdown, "line_input").await;
        })
    }
}

bitflags::bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct KeyModifiers: u8 {
        const CTRL = 0b0000_0001;
        const ALT  = 0b0000_0010;
        const SHIFT= 0b0000_0100;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Char(char),
    Enter,
    Esc,
    Backspace,
    Delete,
    Tab,
    F(u8),
}

/// A key chord such as `Ctrl+S`. Letters are stored lowercase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub mods: KeyModifiers,
}

impl KeyEvent {
    pub const fn new(code: KeyCode, mods: KeyModifiers) -> Self {
        Self { code, mods }
    }

    pub const fn ctrl(c: char) -> Self {
        Self::new(KeyCode::Char(c), KeyModifiers::CTRL)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized key `{0}`")]
pub struct ParseKeyError(pub String);

impl FromStr for KeyEvent {
    type Err = ParseKeyError;

    /// Parses `ctrl+s`, `Ctrl+Shift+Z`, `delete`, `f5`, `a`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseKeyError(s.to_string());
        let mut mods = KeyModifiers::empty();
        let mut parts: Vec<&str> = s.trim().split('+').map(str::trim).collect();
        let key = parts.pop().filter(|k| !k.is_empty()).ok_or_else(err)?;
        for m in parts {
            match m.to_ascii_lowercase().as_str() {
                "ctrl" | "control" => mods |= KeyModifiers::CTRL,
                "alt" => mods |= KeyModifiers::ALT,
                "shift" => mods |= KeyModifiers::SHIFT,
                _ => return Err(err()),
            }
        }
        let lower = key.to_ascii_lowercase();
        let code = match lower.as_str() {
            "enter" | "return" => KeyCode::Enter,
            "esc" | "escape" => KeyCode::Esc,
            "backspace" => KeyCode::Backspace,
            "delete" | "del" => KeyCode::Delete,
            "tab" => KeyCode::Tab,
            f if f.len() > 1 && f.starts_with('f') => {
                let n: u8 = f[1..].parse().map_err(|_| err())?;
                KeyCode::F(n)
            }
            _ => {
                let mut chars = key.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => KeyCode::Char(c.to_ascii_lowercase()),
                    _ => return Err(err()),
                }
            }
        };
        Ok(KeyEvent { code, mods })
    }
}

impl fmt::Display for KeyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.mods.contains(KeyModifiers::CTRL) {
            f.write_str("Ctrl+")?;
        }
        if self.mods.contains(KeyModifiers::ALT) {
            f.write_str("Alt+")?;
        }
        if self.mods.contains(KeyModifiers::SHIFT) {
            f.write_str("Shift+")?;
        }
        match self.code {
            KeyCode::Char(c) => write!(f, "{}", c.to_ascii_uppercase()),
            KeyCode::Enter => f.write_str("Enter"),
            KeyCode::Esc => f.write_str("Esc"),
            KeyCode::Backspace => f.write_str("Backspace"),
            KeyCode::Delete => f.write_str("Delete"),
            KeyCode::Tab => f.write_str("Tab"),
            KeyCode::F(n) => write!(f, "F{n}"),
        }
    }
}


#[cfg(test)]
mod tests_async_sources {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use tokio::sync::mpsc;

    struct MockOnceSource;

    impl AsyncEventSource for MockOnceSource {
        fn name(&self) -> &'static str {
            "mock_once"
        }
        fn spawn(self: Box<Self>, tx: Sender<Event>) -> JoinHandle<()> {
            tokio::spawn(async move {
                let _ = tx.send(Event::Line("select-all".into())).await;
            })
        }
    }

    #[tokio::test]
    async fn registry_spawns_and_emits() {
        let (tx, mut rx) = mpsc::channel::<Event>(8);
        let mut reg = EventSourceRegistry::new();
        reg.register(MockOnceSource);
        reg.register(TickEventSource::new(Duration::from_millis(10)));
        assert_eq!(reg.len(), 2);
        let handles = reg.spawn_all(&tx);
        assert!(reg.is_empty());
        let mut got_line = false;
        let mut got_tick = false;
        let start = std::time::Instant::now();
        while start.elapsed() < Duration::from_millis(200) && (!got_line || !got_tick) {
            if let Ok(Some(ev)) = tokio::time::timeout(Duration::from_millis(5), rx.recv()).await {
                match ev {
                    Event::Line(_) => got_line = true,
                    Event::Tick => got_tick = true,
                    _ => {}
                }
            }
        }
        assert!(got_line, "expected mock source to produce a line");
        assert!(got_tick, "expected tick source to emit tick events");

        drop(tx);
        drop(rx);
        for handle in handles {
            let _ = tokio::time::timeout(Duration::from_millis(20), handle).await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn autosave_waits_a_full_period() {
        let (tx, mut rx) = mpsc::channel::<Event>(8);
        let handle = Box::new(AutoSaveEventSource::new(Duration::from_secs(300))).spawn(tx);

        tokio::time::advance(Duration::from_secs(299)).await;
        assert!(rx.try_recv().is_err(), "no auto-save before the first period");

        let ev = tokio::time::timeout(Duration::from_secs(5), rx.recv()).await;
        assert_eq!(ev.unwrap(), Some(Event::AutoSave));
        let ev = tokio::time::timeout(Duration::from_secs(301), rx.recv()).await;
        assert_eq!(ev.unwrap(), Some(Event::AutoSave));

        drop(rx);
        tokio::time::timeout(Duration::from_secs(600), handle)
            .await
            .expect("autosave source stops once the channel closes")
            .unwrap();
    }

    #[tokio::test]
    async fn line_source_forwards_lines_then_shutdown() {
        let input: &'static [u8] = b"find cat\r\n\n  \nkey ctrl+s\n";
        let (tx, mut rx) = mpsc::channel::<Event>(8);
        let handle = Box::new(LineInputSource::new(tokio::io::BufReader::new(input))).spawn(tx);
        let mut got = Vec::new();
        while let Some(ev) = rx.recv().await {
            got.push(ev);
        }
        handle.await.unwrap();
        assert_eq!(
            got,
            vec![
                Event::Line("find cat".into()),
                Event::Line("key ctrl+s".into()),
                Event::Shutdown,
            ]
        );
    }

    struct MockCloseSource {
        flag: Arc<AtomicBool>,
    }

    impl AsyncEventSource for MockCloseSource {
        fn name(&self) -> &'static str {
            "mock_close"
        }

        fn spawn(self: Box<Self>, tx: Sender<Event>) -> JoinHandle<()> {
            let flag = self.flag;
            tokio::spawn(async move {
                tx.closed().await;
                flag.store(true, Ordering::SeqCst);
            })
        }
    }

    #[tokio::test]
    async fn registry_sources_exit_on_channel_drop() {
        let (tx, rx) = mpsc::channel::<Event>(8);
        let mut reg = EventSourceRegistry::new();
        let flag = Arc::new(AtomicBool::new(false));
        reg.register(MockCloseSource { flag: flag.clone() });
        let handles = reg.spawn_all(&tx);

        drop(tx);
        drop(rx);

        for handle in handles {
            match tokio::time::timeout(Duration::from_millis(50), handle).await {
                Ok(join_res) => join_res.expect("source task should exit cleanly"),
                Err(_) => panic!("source task did not observe channel closure"),
            }
        }

        assert!(flag.load(Ordering::SeqCst));
    }
}
