//! Console transport: one `LEVEL: message` line per call on stdout.

use std::io::Write;

use super::{format_line, Sink};
use crate::logger::Level;

#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleSink;

impl Sink for ConsoleSink {
    fn write(&self, level: Level, message: &str) {
        let line = format_line(level, message);
        let mut stdout = std::io::stdout().lock();
        let _ = writeln!(stdout, "{}", line);
    }
}
