//! Streaming output formatter
//!
//! This module provides `EventPrinter` which writes each `ListEvent` as it
//! arrives, without waiting for the listing to finish.

use std::io::{self, Write};

use termcolor::{ColorChoice, StandardStream, WriteColor};

use crate::tree::ListEvent;

use super::config::OutputConfig;
use super::json::write_json_line;
use super::paths::{dir_spec, file_spec, write_summary};

/// Live event formatter: one line per discovered entry, plus a summary on `End`.
pub struct EventPrinter<W: WriteColor = StandardStream> {
    config: OutputConfig,
    out: W,
    json: bool,
    dir_count: usize,
    file_count: usize,
}

impl EventPrinter<StandardStream> {
    pub fn new(config: OutputConfig) -> Self {
        let choice = if config.use_color {
            ColorChoice::Auto
        } else {
            ColorChoice::Never
        };
        Self::with_writer(config, StandardStream::stdout(choice))
    }
}

impl<W: WriteColor> EventPrinter<W> {
    pub fn with_writer(config: OutputConfig, out: W) -> Self {
        Self {
            config,
            out,
            json: false,
            dir_count: 0,
            file_count: 0,
        }
    }

    /// Write events as JSON lines instead of labelled paths.
    pub fn json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

    pub fn print_event(&mut self, event: &ListEvent) -> io::Result<()> {
        match event {
            ListEvent::Directory(_) => self.dir_count += 1,
            ListEvent::File(_) => self.file_count += 1,
            ListEvent::End => {}
        }

        if self.json {
            return write_json_line(&mut self.out, event);
        }

        match event {
            ListEvent::Directory(path) => {
                write!(self.out, "directory ")?;
                self.out.set_color(&dir_spec())?;
                write!(self.out, "{}", path)?;
            }
            ListEvent::File(path) => {
                write!(self.out, "file      ")?;
                self.out.set_color(&file_spec())?;
                write!(self.out, "{}", path)?;
            }
            ListEvent::End => {
                writeln!(self.out, "end")?;
                if self.config.summary {
                    write_summary(&mut self.out, self.dir_count, self.file_count)?;
                }
                return self.out.flush();
            }
        }
        self.out.reset()?;
        writeln!(self.out)
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
