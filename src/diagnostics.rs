use std::io;

use crate::error::Error;

/// Renders a human-readable diagnostic for `error` against its source text.
///
/// The format is a banner, the previous source line (when there is one), the
/// offending line, a tilde-and-caret pointer at the error column, the
/// message, and the following source line (when there is one):
///
/// ```text
/// There was an error running your program
/// ---------------------------------------
///   1| var x = 1;
///   2| print(y);
/// ~~~~~~~~~~^
/// Message: Undefined variable 'y'
///   3| print(x);
/// ```
///
/// # Errors
/// Returns any I/O error raised while writing to `out`.
pub fn render(source: &str, error: &Error, out: &mut impl io::Write) -> io::Result<()> {
    let (line, column) = error.position();
    let lines: Vec<&str> = source.lines().collect();

    writeln!(out, "There was an error running your program")?;
    writeln!(out, "---------------------------------------")?;
    if let Some(previous) = line.checked_sub(2).and_then(|i| lines.get(i)) {
        writeln!(out, "{:3}| {previous}", line - 1)?;
    }
    if let Some(current) = line.checked_sub(1).and_then(|i| lines.get(i)) {
        writeln!(out, "{line:3}| {current}")?;
    }
    writeln!(out, "{}^", "~".repeat(column + 3))?;
    writeln!(out, "Message: {}", error.message())?;
    if let Some(next) = lines.get(line) {
        writeln!(out, "{:3}| {next}", line + 1)?;
    }
    Ok(())
}
