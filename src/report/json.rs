//! Structured output: one JSON object per event, one event per line.

use std::io::{self, Write};

use serde::Serialize;

use super::{Diagnostic, ReportSink};
use crate::ledger::Tally;
use crate::runtime::{CaseReport, MethodRecord};

#[derive(Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
enum Event<'a> {
    RunStarted,
    CaseStarted {
        case: &'a str,
    },
    MethodStarted {
        case: &'a str,
        method: &'a str,
    },
    Diagnostic {
        text: String,
        detail: &'a Diagnostic,
    },
    CaseFinished {
        case: &'a str,
        summary: String,
        tally: Tally,
        methods: &'a [MethodRecord],
    },
    RunFinished {
        summary: Option<String>,
        tally: Option<Tally>,
    },
}

/// Writes newline-delimited JSON events.
pub struct JsonSink<W> {
    out: W,
}

impl<W: Write> JsonSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, event: &Event<'_>) -> io::Result<()> {
        serde_json::to_writer(&mut self.out, event)?;
        self.out.write_all(b"\n")
    }
}

impl<W: Write> ReportSink for JsonSink<W> {
    fn begin_run(&mut self) -> io::Result<()> {
        self.emit(&Event::RunStarted)
    }

    fn begin_case(&mut self, case: &str) -> io::Result<()> {
        self.emit(&Event::CaseStarted { case })
    }

    fn begin_method(&mut self, case: &str, method: &str) -> io::Result<()> {
        self.emit(&Event::MethodStarted { case, method })
    }

    fn diagnostic(&mut self, diagnostic: &Diagnostic) -> io::Result<()> {
        self.emit(&Event::Diagnostic {
            text: diagnostic.to_string(),
            detail: diagnostic,
        })
    }

    fn end_case(&mut self, report: &CaseReport) -> io::Result<()> {
        self.emit(&Event::CaseFinished {
            case: &report.name,
            summary: report.tally.to_string(),
            tally: report.tally,
            methods: &report.methods,
        })
    }

    fn end_run(&mut self, aggregate: Option<&Tally>) -> io::Result<()> {
        self.emit(&Event::RunFinished {
            summary: aggregate.map(|t| t.to_string()),
            tally: aggregate.copied(),
        })?;
        self.out.flush()
    }
}
