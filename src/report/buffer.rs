//! In-memory sink for programmatic capture.

use std::io;

use super::{Diagnostic, ReportSink};
use crate::ledger::Tally;
use crate::runtime::CaseReport;

/// Collects the report as plain lines.
///
/// Case headers are `# <case>`, method headers `## <method>`, diagnostics
/// use their display form and summaries are the bare summary line (prefixed
/// with `ALL: ` for the aggregate).
#[derive(Debug, Default)]
pub struct BufferSink {
    lines: Vec<String>,
    diagnostics: Vec<Diagnostic>,
}

impl BufferSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn as_text(&self) -> String {
        self.lines.join("\n")
    }
}

impl ReportSink for BufferSink {
    fn begin_case(&mut self, case: &str) -> io::Result<()> {
        self.lines.push(format!("# {}", case));
        Ok(())
    }

    fn begin_method(&mut self, _case: &str, method: &str) -> io::Result<()> {
        self.lines.push(format!("## {}", method));
        Ok(())
    }

    fn diagnostic(&mut self, diagnostic: &Diagnostic) -> io::Result<()> {
        self.lines.push(diagnostic.to_string());
        self.diagnostics.push(diagnostic.clone());
        Ok(())
    }

    fn end_case(&mut self, report: &CaseReport) -> io::Result<()> {
        self.lines.push(report.tally.to_string());
        Ok(())
    }

    fn end_run(&mut self, aggregate: Option<&Tally>) -> io::Result<()> {
        if let Some(tally) = aggregate {
            self.lines.push(format!("ALL: {}", tally));
        }
        Ok(())
    }
}
