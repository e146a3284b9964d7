//! Human-readable, optionally colored report output.

use std::io::{self, Write};

use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use super::{Diagnostic, ReportSink};
use crate::ledger::Tally;
use crate::runtime::CaseReport;

/// Writes the report as plain text lines, colored when the stream allows it.
pub struct TextSink<W> {
    out: W,
}

impl TextSink<StandardStream> {
    /// Text sink on stdout.
    pub fn stdout(choice: ColorChoice) -> Self {
        Self::new(StandardStream::stdout(choice))
    }
}

impl<W: WriteColor> TextSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn colored(&mut self, spec: &ColorSpec, text: &str) -> io::Result<()> {
        self.out.set_color(spec)?;
        write!(self.out, "{}", text)?;
        self.out.reset()
    }

    fn summary(&mut self, prefix: &str, tally: &Tally) -> io::Result<()> {
        let color = if tally.is_clean() {
            Color::Green
        } else {
            Color::Red
        };
        self.colored(ColorSpec::new().set_fg(Some(color)).set_bold(true), prefix)?;
        writeln!(self.out, "{}", tally)
    }
}

impl<W: WriteColor> ReportSink for TextSink<W> {
    fn begin_case(&mut self, case: &str) -> io::Result<()> {
        self.colored(
            ColorSpec::new().set_fg(Some(Color::Cyan)).set_bold(true),
            &format!("== {} ==", case),
        )?;
        writeln!(self.out)
    }

    fn begin_method(&mut self, _case: &str, method: &str) -> io::Result<()> {
        writeln!(self.out, "-- {}", method)
    }

    fn diagnostic(&mut self, diagnostic: &Diagnostic) -> io::Result<()> {
        let color = match diagnostic {
            Diagnostic::UnmatchedException { .. } => Color::Magenta,
            _ => Color::Red,
        };
        write!(self.out, "   ")?;
        self.colored(
            ColorSpec::new().set_fg(Some(color)).set_bold(true),
            &diagnostic.label(),
        )?;
        writeln!(self.out, ": {}", diagnostic.detail())?;
        if let Some(trace) = diagnostic.trace() {
            for line in trace.lines() {
                writeln!(self.out, "      {}", line)?;
            }
        }
        Ok(())
    }

    fn end_case(&mut self, report: &CaseReport) -> io::Result<()> {
        self.summary("", &report.tally)?;
        writeln!(self.out)
    }

    fn end_run(&mut self, aggregate: Option<&Tally>) -> io::Result<()> {
        if let Some(tally) = aggregate {
            self.summary("All cases: ", tally)?;
        }
        self.out.flush()
    }
}
