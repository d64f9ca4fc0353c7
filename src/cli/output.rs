//! Handles all user-facing output for the CLI.
//!
//! Diff reports are colorized line by line; everything else is plain text on
//! stdout so bundles can be redirected into files.

use std::io::{self, Write};

use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::report::DiffReport;

/// Picks a color mode for stdout.
pub fn color_choice(no_color: bool) -> ColorChoice {
    if no_color || !atty::is(atty::Stream::Stdout) {
        ColorChoice::Never
    } else {
        ColorChoice::Auto
    }
}

/// Prints a diff report with removed lines in red and added lines in green.
pub fn print_diff(report: &DiffReport, choice: ColorChoice) -> io::Result<()> {
    let mut stdout = StandardStream::stdout(choice);
    write_diff(&mut stdout, report)?;
    stdout.reset()
}

/// Writes raw text to stdout.
pub fn print_text(text: &str) -> io::Result<()> {
    let mut stdout = io::stdout().lock();
    stdout.write_all(text.as_bytes())?;
    stdout.flush()
}

// ============================================================================
// PRIVATE HELPERS
// ============================================================================

fn write_diff<W: WriteColor>(out: &mut W, report: &DiffReport) -> io::Result<()> {
    for line in report.as_str().lines() {
        if line.starts_with("---") || line.starts_with("+++") {
            out.set_color(ColorSpec::new().set_bold(true))?;
        } else if line.starts_with('-') {
            out.set_color(ColorSpec::new().set_fg(Some(Color::Red)))?;
        } else if line.starts_with('+') {
            out.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
        } else {
            out.reset()?;
        }
        writeln!(out, "{line}")?;
    }
    out.reset()
}

#[cfg(test)]
mod tests {
    use termcolor::{Ansi, NoColor};

    use super::*;
    use crate::report::text_diff;

    #[test]
    fn plain_output_matches_report() {
        let report = text_diff(b"Hello", b"hello");
        let mut out = NoColor::new(Vec::new());
        write_diff(&mut out, &report).unwrap();
        assert_eq!(String::from_utf8(out.into_inner()).unwrap(), report.as_str());
    }

    #[test]
    fn colored_output_marks_changes() {
        let report = text_diff(b"a", b"b");
        let mut out = Ansi::new(Vec::new());
        write_diff(&mut out, &report).unwrap();
        let text = String::from_utf8(out.into_inner()).unwrap();
        assert!(text.contains("\x1b[0m\x1b[31m- a"));
        assert!(text.contains("\x1b[0m\x1b[32m+ b"));
    }
}
