use std::collections::VecDeque;
use std::fmt::Write as _;
use std::sync::{Arc, Mutex};

use tracing::field::{Field, Visit};
use tracing_subscriber::layer::Context;
use tracing_subscriber::Layer;

const MAX_LINES: usize = 200;

/// Bounded in-memory log sink shared between the tracing layer and the TUI
/// log panel. Oldest lines are dropped once the buffer is full.
#[derive(Debug, Clone, Default)]
pub struct LogBuffer {
    lines: Arc<Mutex<VecDeque<String>>>,
}

impl LogBuffer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, line: String) {
        // A poisoned lock only loses log lines, never panics the app.
        if let Ok(mut lines) = self.lines.lock() {
            if lines.len() == MAX_LINES {
                lines.pop_front();
            }
            lines.push_back(line);
        }
    }

    /// Newest-last copy of the buffered lines.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .map(|lines| lines.iter().cloned().collect())
            .unwrap_or_default()
    }
}

/// Tracing layer that routes formatted events into a [`LogBuffer`] so they
/// can be rendered inside the TUI rather than corrupting the raw terminal.
pub struct CapturingLayer {
    buffer: LogBuffer,
}

impl CapturingLayer {
    #[must_use]
    pub fn new(buffer: LogBuffer) -> Self {
        Self { buffer }
    }
}

impl<S: tracing::Subscriber> Layer<S> for CapturingLayer {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);

        let line = format!(
            "{} {:>5} {}",
            chrono::Local::now().format("%H:%M:%S"),
            event.metadata().level(),
            visitor.rendered
        );
        self.buffer.push(line);
    }
}

#[derive(Default)]
struct MessageVisitor {
    rendered: String,
}

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.rendered, "{value:?}");
        } else {
            if !self.rendered.is_empty() {
                self.rendered.push(' ');
            }
            let _ = write!(self.rendered, "{}={value:?}", field.name());
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.rendered.push_str(value);
        } else {
            if !self.rendered.is_empty() {
                self.rendered.push(' ');
            }
            let _ = write!(self.rendered, "{}={value}", field.name());
        }
    }
}
