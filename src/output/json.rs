//! JSON output formatting

use std::io::{self, Write};

use serde::Serialize;

/// Print a value as pretty-printed JSON to stdout.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> io::Result<()> {
    let json = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
    println!("{}", json);
    Ok(())
}

/// Write a value as a single line of JSON.
pub fn write_json_line<W: Write, T: Serialize + ?Sized>(out: &mut W, value: &T) -> io::Result<()> {
    serde_json::to_writer(&mut *out, value).map_err(io::Error::other)?;
    writeln!(out)
}
