//! Diagnostic levels and the sink that collects them for the duration of
//! a compile session (`spec.md` §7). Every diagnostic is also logged
//! live via `tracing` so a long compile shows progress as it runs, not
//! just a final report. `Diagnostics` also owns the fatality policy:
//! `critical` is always fatal, `error` is fatal only under `-strict`,
//! `warning` never is — this is checked at the single point every
//! diagnostic passes through, rather than re-implemented at each call
//! site.

use std::fmt;

use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Warning,
    Error,
    Critical,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Warning => write!(f, "warning"),
            Level::Error => write!(f, "error"),
            Level::Critical => write!(f, "critical"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub level: Level,
    pub message: String,
    pub context: Option<String>,
}

impl Diagnostic {
    pub fn new(level: Level, message: impl Into<String>, context: impl Into<Option<String>>) -> Self {
        Self {
            level,
            message: message.into(),
            context: context.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(ctx) = &self.context {
            write!(f, " at {ctx}")?;
        }
        Ok(())
    }
}

/// Accumulates diagnostics raised over one compile session and enforces
/// the fatality policy of `spec.md` §7.
#[derive(Debug)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
    suppress_warnings: bool,
    strict: bool,
}

impl Diagnostics {
    pub fn new(suppress_warnings: bool, strict: bool) -> Self {
        Self {
            entries: Vec::new(),
            suppress_warnings,
            strict,
        }
    }

    fn log(&self, diagnostic: &Diagnostic) {
        match diagnostic.level {
            Level::Warning => {
                if !self.suppress_warnings {
                    tracing::warn!(context = diagnostic.context.as_deref().unwrap_or(""), "{}", diagnostic.message);
                }
            }
            Level::Error => {
                tracing::error!(context = diagnostic.context.as_deref().unwrap_or(""), "{}", diagnostic.message);
            }
            Level::Critical => {
                tracing::error!(context = diagnostic.context.as_deref().unwrap_or(""), "critical: {}", diagnostic.message);
            }
        }
    }

    /// Push a diagnostic that can never abort the compile (warnings that
    /// are already known non-fatal). Prefer `raise` for anything in the
    /// §7 taxonomy that could be `error`/`critical`.
    pub fn warning(&mut self, message: impl Into<String>, context: impl Into<Option<String>>) {
        let diagnostic = Diagnostic::new(Level::Warning, message, context);
        self.log(&diagnostic);
        self.entries.push(diagnostic);
    }

    /// Push a diagnostic and apply the fatality policy: `critical` always
    /// returns `Err`; `error` returns `Err` only in strict mode;
    /// `warning` never does.
    pub fn raise(
        &mut self,
        level: Level,
        message: impl Into<String>,
        context: impl Into<Option<String>>,
    ) -> Result<(), Error> {
        let diagnostic = Diagnostic::new(level, message, context);
        self.log(&diagnostic);
        let fatal = diagnostic.level == Level::Critical || (diagnostic.level == Level::Error && self.strict);
        self.entries.push(diagnostic.clone());
        if fatal {
            Err(Error::Fatal(diagnostic))
        } else {
            Ok(())
        }
    }

    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    pub fn has_errors(&self) -> bool {
        self.entries.iter().any(|d| d.level >= Level::Error)
    }
}
