//! Parse-failure reporting.
//!
//! A failed parse leaves the furthest byte examined at `max_read()`; the
//! report shows the line holding that position with a caret under it. The
//! backward line scan is the one place in the system that can step below
//! the buffer's retention floor, so it uses the fallible accessor and
//! picks up the discarded-newline count from the error it gets back.

use std::fmt::Write;

use egg_runtime::State;

/// Renders the three-line report for a parse that failed at `max_read()`.
pub fn failure_report(ps: &mut State<'_>) -> String {
    let max_read = ps.max_read();

    // Scan backward to the start of the offending line, stopping at a
    // newline or at the retention floor.
    let mut line_start = max_read;
    while line_start > 0 {
        match ps.try_at(line_start - 1) {
            Ok(b'\n') => break,
            Ok(_) => line_start -= 1,
            Err(_) => break,
        }
    }

    // Scan forward to the end of the line.
    let mut line_end = line_start;
    loop {
        match ps.at(line_end) {
            0 | b'\n' => break,
            _ => line_end += 1,
        }
    }

    // Newlines before the line start; the forgotten prefix contributes the
    // count carried by the buffer.
    let mut newlines = 0usize;
    let mut i = line_start;
    while i > 0 {
        match ps.try_at(i - 1) {
            Ok(c) => {
                if c == b'\n' {
                    newlines += 1;
                }
                i -= 1;
            }
            Err(e) => {
                newlines += e.newlines_discarded;
                break;
            }
        }
    }

    let text = ps.string(line_start, line_end - line_start);
    let column = max_read - line_start;

    let mut out = String::new();
    let _ = writeln!(out, "Parse failure {} bytes into the input:", max_read);
    let prefix = format!("line {}: ", newlines + 1);
    let _ = writeln!(out, "{}{}", prefix, text);
    let _ = writeln!(out, "{}^", " ".repeat(prefix.len() + column));
    out
}
