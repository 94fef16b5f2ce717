//! Host error rendering. Analysis findings go through `report` instead.

use phpclasscheck::Error;
use phpclasscheck::config::CONFIG_FILE;

/// ANSI bold, applied to markdown headings.
const BOLD: &str = "\x1b[1m";
/// ANSI reset.
const RESET: &str = "\x1b[0m";

/// Render an error as valid markdown with bold headings and print to stderr.
pub fn print_error(e: &Error) {
    let md = render_error(e);
    for line in md.lines() {
        if line.starts_with('#') {
            eprintln!("{BOLD}{line}{RESET}");
        } else {
            eprintln!("{line}");
        }
    }
}

/// Render an error as a structured markdown diagnostic.
///
/// Each variant produces a block with what happened and, where the user can
/// act on it, how to fix it.
pub fn render_error(e: &Error) -> String {
    return match e {
        Error::DirectoryUnreadable { path, reason } => format!("\
# Error: Directory Unreadable

Could not list `{}`: {reason}

## Fix

Check that the directory exists and is readable by the current user.
", path.display()),

        Error::FileNotFound { path } => format!("\
# Error: File Not Found

`{}` does not exist.

## Fix

Pass existing files or directories, or run from the project root:

    phpclasscheck check src/
", path.display()),

        Error::Io(e) => format!("\
# Error: I/O

{e}
"),

        Error::TomlDe(e) => render_invalid_config(&e.to_string()),

        Error::WatchFailed { reason } => format!("\
# Error: Watch Failed

{reason}

## Fix

Run a one-shot check instead:

    phpclasscheck check
"),
    };
}

/// `.phpclasscheck.toml` failed to parse; list the keys it accepts.
fn render_invalid_config(reason: &str) -> String {
    return format!("\
# Error: Invalid Config

`{CONFIG_FILE}` could not be parsed:

{reason}

## Valid keys

- `extension` (string, default `\"php\"`)
- `severity` (`\"error\"` or `\"warning\"`)
- `include` (array of path prefixes)
- `exclude` (array of path prefixes)
");
}
