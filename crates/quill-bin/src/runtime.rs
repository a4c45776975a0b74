//! Event loop driving the editor model from the event channel.
//!
//! Each `Line` event (a command, `key <chord>` or `menu ...`) is resolved to
//! an action and dispatched; the loop then prints the notification (if any)
//! followed by the status line. Auto-save and tick events print nothing
//! unless they produce a message.

use std::fmt;
use std::io::Write;
use std::time::Duration;

use anyhow::Result;
use core_actions::{Action, DispatchResult, dispatch, resolve_input};
use core_events::Event;
use core_model::EditorModel;
use tokio::sync::mpsc;
use tracing::{debug, error, info, trace, warn};

const SOURCE_JOIN_TIMEOUT: Duration = Duration::from_millis(200);

pub(crate) enum LoopControl {
    Continue,
    Break { reason: ShutdownReason },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ShutdownReason {
    CommandQuit,
    ShutdownEvent,
    ChannelClosed,
}

impl ShutdownReason {
    fn as_str(&self) -> &'static str {
        match self {
            ShutdownReason::CommandQuit => "command_quit",
            ShutdownReason::ShutdownEvent => "shutdown_event",
            ShutdownReason::ChannelClosed => "channel_closed",
        }
    }
}

impl fmt::Display for ShutdownReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn log_shutdown_stage(reason: ShutdownReason, stage: &'static str) {
    info!(
        target: "runtime.shutdown",
        reason = reason.as_str(),
        stage = stage,
        "shutdown_stage"
    );
}

pub(crate) struct EditorRuntime<W: Write> {
    model: EditorModel,
    rx: mpsc::Receiver<Event>,
    tx: Option<mpsc::Sender<Event>>,
    source_handles: Vec<tokio::task::JoinHandle<()>>,
    out: W,
}

impl<W: Write> EditorRuntime<W> {
    pub(crate) fn new(
        model: EditorModel,
        tx: mpsc::Sender<Event>,
        rx: mpsc::Receiver<Event>,
        source_handles: Vec<tokio::task::JoinHandle<()>>,
        out: W,
    ) -> Self {
        Self {
            model,
            rx,
            tx: Some(tx),
            source_handles,
            out,
        }
    }

    #[cfg(test)]
    pub(crate) fn model(&self) -> &EditorModel {
        &self.model
    }

    #[cfg(test)]
    pub(crate) fn output(&self) -> &W {
        &self.out
    }

    pub(crate) async fn run(&mut self) -> Result<ShutdownReason> {
        // startup messages (open failures) are shown once, before any command
        let pending = self
            .model
            .state()
            .ephemeral_status
            .as_ref()
            .map(|m| m.text.clone());
        self.print_status(pending.as_deref())?;

        let span = tracing::debug_span!(target: "runtime", "event_loop");
        let _enter = span.enter();

        let mut reason = ShutdownReason::ChannelClosed;
        while let Some(event) = self.rx.recv().await {
            let control = match event {
                Event::Line(line) => self.handle_line(&line)?,
                Event::AutoSave => self.handle_autosave()?,
                Event::Tick => self.handle_tick(),
                Event::Shutdown => LoopControl::Break {
                    reason: ShutdownReason::ShutdownEvent,
                },
            };
            if let LoopControl::Break { reason: r } = control {
                reason = r;
                break;
            }
        }

        self.rx.close();
        self.finalize_shutdown(reason).await;
        Ok(reason)
    }

    fn handle_line(&mut self, line: &str) -> Result<LoopControl> {
        let result = match resolve_input(line) {
            Ok(action) => dispatch(action, &mut self.model),
            Err(e) => {
                warn!(target: "runtime", error = %e, "input_rejected");
                DispatchResult::clean().with_notification(e.to_string())
            }
        };
        self.after_command(result)
    }

    fn after_command(&mut self, result: DispatchResult) -> Result<LoopControl> {
        if result.buffer_replaced {
            debug!(target: "runtime", tab = self.model.active_index(), "buffer_replaced");
        }
        if result.quit {
            return Ok(LoopControl::Break {
                reason: ShutdownReason::CommandQuit,
            });
        }
        self.print_status(result.notification.as_deref())?;
        Ok(LoopControl::Continue)
    }

    fn handle_autosave(&mut self) -> Result<LoopControl> {
        let result = dispatch(Action::AutoSave, &mut self.model);
        if let Some(msg) = result.notification.as_deref() {
            self.print_status(Some(msg))?;
        }
        Ok(LoopControl::Continue)
    }

    fn handle_tick(&mut self) -> LoopControl {
        if self.model.state_mut().tick_ephemeral() {
            trace!(target: "runtime", "ephemeral_expired");
        }
        LoopControl::Continue
    }

    fn print_status(&mut self, notification: Option<&str>) -> Result<()> {
        if let Some(msg) = notification {
            writeln!(self.out, "{msg}")?;
        }
        writeln!(self.out, "{}", self.model.status_line())?;
        self.out.flush()?;
        Ok(())
    }

    async fn finalize_shutdown(&mut self, reason: ShutdownReason) {
        log_shutdown_stage(reason, "begin");
        drop(self.tx.take());

        while let Some(handle) = self.source_handles.pop() {
            let abort = handle.abort_handle();
            match tokio::time::timeout(SOURCE_JOIN_TIMEOUT, handle).await {
                Ok(Ok(())) => trace!(target: "runtime.shutdown", "event_source_task_stopped"),
                Ok(Err(err)) if err.is_cancelled() => {
                    trace!(target: "runtime.shutdown", "event_source_task_cancelled")
                }
                Ok(Err(err)) => error!(target: "runtime.shutdown", ?err, "event_source_task_error"),
                Err(_) => {
                    warn!(target: "runtime.shutdown", "event_source_task_timeout");
                    abort.abort();
                }
            }
        }
        log_shutdown_stage(reason, "complete");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_actions::dispatcher::NOTIFICATION_TTL;
    use core_events::{AsyncEventSource, LineInputSource};
    use core_model::PageMetrics;
    use core_state::EditorState;
    use core_text::{Document, Style};
    use pretty_assertions::assert_eq;
    use std::sync::{Arc, Mutex};
    use tracing::Subscriber;
    use tracing::dispatcher::Dispatch;
    use tracing::field::{Field, Visit};
    use tracing_subscriber::layer::{Context, Layer, SubscriberExt};
    use tracing_subscriber::registry::Registry;

    fn model(text: &str) -> EditorModel {
        let state = EditorState::with_document(Document::from_str(text, Style::default()));
        EditorModel::with_state(state, Style::default(), PageMetrics::default())
    }

    fn runtime(text: &str) -> (EditorRuntime<Vec<u8>>, mpsc::Sender<Event>) {
        let (tx, rx) = mpsc::channel(16);
        let rt = EditorRuntime::new(model(text), tx.clone(), rx, Vec::new(), Vec::new());
        (rt, tx)
    }

    fn printed(rt: &EditorRuntime<Vec<u8>>) -> String {
        String::from_utf8(rt.output().clone()).unwrap()
    }

    #[tokio::test]
    async fn lines_are_dispatched_until_shutdown() {
        let (mut rt, tx) = runtime("");
        tx.send(Event::Line("insert hello world".into())).await.unwrap();
        tx.send(Event::Line("select 0 5".into())).await.unwrap();
        tx.send(Event::Line("bold".into())).await.unwrap();
        tx.send(Event::Shutdown).await.unwrap();
        drop(tx);

        let reason = rt.run().await.unwrap();
        assert_eq!(reason, ShutdownReason::ShutdownEvent);
        let st = rt.model().state();
        assert_eq!(st.document().text(), "hello world");
        assert!(st.document().style_at(0).unwrap().is_bold());
        assert!(!st.document().style_at(6).unwrap().is_bold());
        // initial status plus one per command
        let out = printed(&rt);
        assert_eq!(out.lines().count(), 4);
        assert!(out.lines().last().unwrap().contains("modified"));
    }

    #[tokio::test]
    async fn quit_stops_before_later_lines() {
        let (mut rt, tx) = runtime("abc");
        tx.send(Event::Line("quit".into())).await.unwrap();
        tx.send(Event::Line("insert never".into())).await.unwrap();
        drop(tx);
        assert_eq!(rt.run().await.unwrap(), ShutdownReason::CommandQuit);
        assert_eq!(rt.model().state().document().text(), "abc");
    }

    #[tokio::test]
    async fn key_chords_use_bindings() {
        let (mut rt, tx) = runtime("abc");
        tx.send(Event::Line("key ctrl+a".into())).await.unwrap();
        tx.send(Event::Line("key ctrl+b".into())).await.unwrap();
        tx.send(Event::Line("key f12".into())).await.unwrap();
        tx.send(Event::Line("key ctrl+q".into())).await.unwrap();
        drop(tx);
        assert_eq!(rt.run().await.unwrap(), ShutdownReason::CommandQuit);
        assert!(rt.model().state().document().style_at(2).unwrap().is_bold());
        assert!(printed(&rt).contains("no command bound"));
    }

    #[tokio::test]
    async fn startup_message_is_printed_before_first_command() {
        let mut m = model("");
        m.state_mut()
            .set_ephemeral("Open failed: I/O error on x: denied", NOTIFICATION_TTL);
        let (tx, rx) = mpsc::channel(4);
        let mut rt = EditorRuntime::new(m, tx.clone(), rx, Vec::new(), Vec::new());
        tx.send(Event::Shutdown).await.unwrap();
        drop(tx);
        rt.run().await.unwrap();
        let out = printed(&rt);
        let mut lines = out.lines();
        assert_eq!(lines.next(), Some("Open failed: I/O error on x: denied"));
        assert!(lines.next().unwrap().contains("Words: 0"));
        assert_eq!(lines.next(), None);
    }

    #[tokio::test]
    async fn bad_input_prints_error_and_continues() {
        let (mut rt, tx) = runtime("abc");
        tx.send(Event::Line("frobnicate".into())).await.unwrap();
        tx.send(Event::Line("goto 9".into())).await.unwrap();
        tx.send(Event::Line("insert !".into())).await.unwrap();
        tx.send(Event::Shutdown).await.unwrap();
        drop(tx);
        assert_eq!(rt.run().await.unwrap(), ShutdownReason::ShutdownEvent);
        assert_eq!(rt.model().state().document().text(), "!abc");
        let out = printed(&rt);
        assert!(out.contains("frobnicate"), "{out}");
    }

    #[tokio::test]
    async fn autosave_without_file_prints_nothing() {
        let (mut rt, tx) = runtime("abc");
        tx.send(Event::AutoSave).await.unwrap();
        tx.send(Event::Tick).await.unwrap();
        tx.send(Event::Shutdown).await.unwrap();
        drop(tx);
        rt.run().await.unwrap();
        // only the initial status line
        assert_eq!(printed(&rt).lines().count(), 1);
    }

    #[tokio::test]
    async fn script_source_feeds_the_loop() {
        let script: &[u8] = b"insert one\n\nkey ctrl+a\nmenu Home Italic\n";
        let (tx, rx) = mpsc::channel(16);
        let handles = vec![Box::new(LineInputSource::new(script)).spawn(tx.clone())];
        let mut rt = EditorRuntime::new(model(""), tx, rx, handles, Vec::new());
        assert_eq!(rt.run().await.unwrap(), ShutdownReason::ShutdownEvent);
        let st = rt.model().state();
        assert_eq!(st.document().text(), "one");
        assert!(st.document().style_at(0).unwrap().is_italic());
    }

    #[test]
    fn shutdown_reason_labels_are_stable() {
        assert_eq!(ShutdownReason::CommandQuit.as_str(), "command_quit");
        assert_eq!(ShutdownReason::ShutdownEvent.as_str(), "shutdown_event");
        assert_eq!(ShutdownReason::ChannelClosed.to_string(), "channel_closed");
    }

    #[derive(Clone, Default)]
    struct Capture {
        events: Arc<Mutex<Vec<CapturedEvent>>>,
    }

    #[derive(Clone, Debug)]
    struct CapturedEvent {
        target: String,
        fields: Vec<(String, String)>,
    }

    #[derive(Default)]
    struct FieldCollector {
        fields: Vec<(String, String)>,
    }

    impl Visit for FieldCollector {
        fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
            self.fields
                .push((field.name().to_string(), format!("{:?}", value)));
        }
    }

    impl<S> Layer<S> for Capture
    where
        S: Subscriber,
    {
        fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
            let mut collector = FieldCollector::default();
            event.record(&mut collector);
            self.events.lock().unwrap().push(CapturedEvent {
                target: event.metadata().target().to_string(),
                fields: collector.fields,
            });
        }
    }

    #[test]
    fn shutdown_logging_includes_reason_and_stage() {
        let capture = Capture::default();
        let events = capture.events.clone();
        let dispatcher = Dispatch::new(Registry::default().with(capture));

        tracing::dispatcher::with_default(&dispatcher, || {
            log_shutdown_stage(ShutdownReason::CommandQuit, "complete");
        });

        let events = events.lock().unwrap();
        let ev = events
            .iter()
            .find(|e| e.target == "runtime.shutdown")
            .expect("shutdown log emitted");
        assert!(ev.fields.iter().any(|(n, v)| n == "reason" && v.contains("command_quit")));
        assert!(ev.fields.iter().any(|(n, v)| n == "stage" && v.contains("complete")));
    }

    #[test]
    fn typed_text_never_reaches_the_log() {
        let capture = Capture::default();
        let events = capture.events.clone();
        let dispatcher = Dispatch::new(Registry::default().with(capture));

        tracing::dispatcher::with_default(&dispatcher, || {
            let (tx, rx) = mpsc::channel(1);
            let mut rt = EditorRuntime::new(model(""), tx, rx, Vec::new(), Vec::new());
            rt.handle_line("insert hunter2").unwrap();
            rt.handle_line("find hunter2").unwrap();
        });

        let events = events.lock().unwrap();
        assert!(!events.is_empty());
        for e in events.iter() {
            for (_, v) in &e.fields {
                assert!(!v.contains("hunter2"), "{} leaked text: {v}", e.target);
            }
        }
    }
}
