use std::io::Write;

use crate::args::CliArgs;

/// The single `<file>` argument, or exit with a usage error.
pub(crate) fn single_path(args: &CliArgs) -> &str {
    if args.positional.len() != 1 {
        eprintln!("Missing <file>");
        std::process::exit(2);
    }
    args.positional[0].as_str()
}

/// Write one line to stdout; a closed pipe ends the process quietly.
pub(crate) fn write_line(out: &mut impl Write, line: std::fmt::Arguments<'_>) {
    if let Err(e) = out.write_fmt(line).and_then(|()| out.write_all(b"\n")) {
        if e.kind() == std::io::ErrorKind::BrokenPipe {
            std::process::exit(0);
        }
        eprintln!("stdout error: {e}");
        std::process::exit(2);
    }
}
