//! Interfaces for reporting progress and errors through the CLI

use std::error::Error;
use std::fmt;
use std::io;

/// A sink for human-readable progress messages. Anything that can be written to and sent between
/// tasks qualifies; the default world logs to stderr.
pub trait Log: io::Write + Send + 'static {}

impl<T: io::Write + Send + 'static> Log for T {}

/// Writes one line to a [Log]. Failing to write progress output is not an error of the export, so
/// write errors are dropped.
#[macro_export]
macro_rules! log {
    ($l:expr, $($arg:tt)*) => {{
        use ::std::io::Write as _;
        let _ = writeln!($l, $($arg)*);
    }};
}

/// Extension for rendering an error together with its sources
pub trait ErrorExt {
    /// Wraps the error so that its display includes the whole source chain.
    fn error_chain(&self) -> ErrorChain<&Self> {
        ErrorChain(self)
    }
}

impl<T: Error> ErrorExt for T {}

/// Extension for indenting text as it is written
pub trait WriteExt {
    /// Prefixes the first line with `first` and every following line with `hanging`.
    fn indents<F, H>(&mut self, first: F, hanging: H) -> IndentWriter<'_, F, H, Self> {
        IndentWriter {
            first: Some(first),
            hanging,
            f: self,
        }
    }

    /// Prefixes every line but the first with `indent`.
    fn hanging_indent<I>(&mut self, indent: I) -> IndentWriter<'_, &'static str, I, Self> {
        self.indents("", indent)
    }
}

impl<T: fmt::Write> WriteExt for T {}

/// Displays an error followed by each of its sources on a separate line.
pub struct ErrorChain<T>(T);

impl<T> fmt::Display for ErrorChain<T>
where
    T: Error,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)?;
        let mut error: Option<&dyn Error> = self.0.source();
        while let Some(e) = error {
            writeln!(f)?;
            write!(f, "{}", e)?;
            error = e.source();
        }
        Ok(())
    }
}

/// See [WriteExt::indents]
pub struct IndentWriter<'a, F, H, W: ?Sized> {
    first: Option<F>,
    hanging: H,
    f: &'a mut W,
}

impl<F, H, W> fmt::Write for IndentWriter<'_, F, H, W>
where
    F: fmt::Display,
    H: fmt::Display,
    W: fmt::Write,
{
    fn write_str(&mut self, s: &str) -> fmt::Result {
        if let Some(first) = self.first.take() {
            write!(self.f, "{}", first)?;
        }
        let mut lines = s.split('\n');
        if let Some(line) = lines.next() {
            write!(self.f, "{}", line)?;
        }
        for line in lines {
            write!(self.f, "\n{}{}", self.hanging, line)?;
        }
        Ok(())
    }
}

/// Renders an error chain with every line after the first indented, suitable for one log entry.
pub fn indented_chain<E: Error>(error: &E) -> String {
    use fmt::Write;

    let mut out = String::new();
    let mut w = out.hanging_indent("  ");
    // writing to a String can't fail
    let _ = write!(w, "{}", error.error_chain());
    out
}
