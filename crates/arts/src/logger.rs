// ABOUTME: Minimal trace-log sinks used by the debug-output contract.
// ABOUTME: Mirrors Go's *log.Logger: a plain Write-backed sink, not an app-logging framework.

use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;

/// A single debug-trace sink. Defaults to a null sink (writes are dropped).
#[derive(Clone, Default)]
pub struct Logger {
    inner: Option<Rc<RefCell<dyn Write>>>,
}

impl Logger {
    pub fn null() -> Self {
        Self { inner: None }
    }

    pub fn new(w: Rc<RefCell<dyn Write>>) -> Self {
        Self { inner: Some(w) }
    }

    pub fn is_enabled(&self) -> bool {
        self.inner.is_some()
    }

    pub fn write_line(&self, line: &str) {
        if let Some(w) = &self.inner {
            let mut w = w.borrow_mut();
            let _ = writeln!(w, "{}", line);
        }
    }
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Logger(enabled={})", self.is_enabled())
    }
}

/// The six independently-settable debug sinks, one per major extraction stage.
#[derive(Clone, Debug, Default)]
pub struct DebugSinks {
    pub headline: Logger,
    pub content: Logger,
    pub authors: Logger,
    pub dates: Logger,
    pub urls: Logger,
    pub cruft: Logger,
}

impl DebugSinks {
    /// Build sinks from the CLI's `-d <letters>` flag (h,c,a,d,u,s / "all").
    pub fn from_letters(letters: &str, sink: Rc<RefCell<dyn Write>>) -> Self {
        let all = letters.eq_ignore_ascii_case("all");
        let has = |c: char| all || letters.contains(c);
        let mut out = DebugSinks::default();
        if has('h') {
            out.headline = Logger::new(sink.clone());
        }
        if has('c') {
            out.content = Logger::new(sink.clone());
        }
        if has('a') {
            out.authors = Logger::new(sink.clone());
        }
        if has('d') {
            out.dates = Logger::new(sink.clone());
        }
        if has('u') {
            out.urls = Logger::new(sink.clone());
        }
        if has('s') {
            out.cruft = Logger::new(sink);
        }
        out
    }
}
