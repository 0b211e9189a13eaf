//! Path list formatter for buffered output
//!
//! This module provides `PathPrinter` which formats a complete `PathList`
//! into a string or prints it with colors.

use std::io::{self, Write};
use std::path;

use termcolor::{Color, ColorChoice, ColorSpec, NoColor, StandardStream, WriteColor};

use super::config::OutputConfig;

/// Whether a listed path names a directory.
pub fn is_dir_path(path: &str) -> bool {
    path.chars().next_back().is_some_and(path::is_separator)
}

pub(crate) fn dir_spec() -> ColorSpec {
    let mut spec = ColorSpec::new();
    spec.set_fg(Some(Color::Blue)).set_bold(true);
    spec
}

pub(crate) fn file_spec() -> ColorSpec {
    let mut spec = ColorSpec::new();
    spec.set_fg(Some(Color::White));
    spec
}

pub(crate) fn write_summary<W: Write>(out: &mut W, dirs: usize, files: usize) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{} directories, {} files", dirs, files)
}

/// Formatter for a finished path listing, one path per line.
pub struct PathPrinter {
    config: OutputConfig,
}

impl PathPrinter {
    pub fn new(config: OutputConfig) -> Self {
        Self { config }
    }

    pub fn format(&self, paths: &[String]) -> String {
        let mut out = NoColor::new(Vec::new());
        // Writing into memory cannot fail
        let _ = self.write_to(&mut out, paths);
        String::from_utf8_lossy(&out.into_inner()).into_owned()
    }

    pub fn print(&self, paths: &[String]) -> io::Result<()> {
        let choice = if self.config.use_color {
            ColorChoice::Auto
        } else {
            ColorChoice::Never
        };
        let mut stdout = StandardStream::stdout(choice);
        self.write_to(&mut stdout, paths)
    }

    pub fn write_to<W: WriteColor>(&self, out: &mut W, paths: &[String]) -> io::Result<()> {
        let (mut dirs, mut files) = (0, 0);
        for path in paths {
            if is_dir_path(path) {
                dirs += 1;
                out.set_color(&dir_spec())?;
            } else {
                files += 1;
                out.set_color(&file_spec())?;
            }
            write!(out, "{}", path)?;
            out.reset()?;
            writeln!(out)?;
        }

        if self.config.summary {
            write_summary(out, dirs, files)?;
        }
        Ok(())
    }
}
