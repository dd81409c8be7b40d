pub(crate) struct CliArgs {
    pub cmd: String,
    pub heap_size: Option<usize>,
    pub max_stack_size: Option<usize>,
    pub gc_trigger: Option<u8>,
    pub stats: bool,
    pub positional: Vec<String>,
}

pub(crate) const USAGE: &str = "Usage: sjs <tokens|ast|check|run|eval> [--heap <bytes>] [--stack <frames>] [--gc <percent>] [--stats] <file|source>";

pub(crate) fn parse_args() -> Result<CliArgs, String> {
    parse_args_from(std::env::args().skip(1).collect())
}

pub(crate) fn parse_args_from(mut argv: Vec<String>) -> Result<CliArgs, String> {
    if argv.is_empty() {
        return Err(USAGE.to_string());
    }
    let cmd = argv.remove(0);

    let mut heap_size = None;
    let mut max_stack_size = None;
    let mut gc_trigger = None;
    let mut stats = false;
    let mut positional: Vec<String> = Vec::new();

    let mut it = argv.into_iter();
    while let Some(a) = it.next() {
        match a.as_str() {
            "--heap" => heap_size = Some(flag_value(&a, it.next())?),
            "--stack" => max_stack_size = Some(flag_value(&a, it.next())?),
            "--gc" => {
                let percent: u8 = flag_value(&a, it.next())?;
                if !(1..=100).contains(&percent) {
                    return Err(format!("--gc expects a percentage in 1..=100, got {percent}"));
                }
                gc_trigger = Some(percent);
            }
            "--stats" => stats = true,
            "--" => positional.extend(it.by_ref()),
            _ if a.starts_with("--") => return Err(format!("Unknown option: {a}")),
            _ => positional.push(a),
        }
    }

    Ok(CliArgs {
        cmd,
        heap_size,
        max_stack_size,
        gc_trigger,
        stats,
        positional,
    })
}

fn flag_value<T: std::str::FromStr>(flag: &str, value: Option<String>) -> Result<T, String> {
    let value = value.ok_or_else(|| format!("Missing value for {flag}"))?;
    value
        .parse()
        .map_err(|_| format!("Invalid value for {flag}: {value}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn flags_and_positionals() {
        let args =
            parse_args_from(argv(&["run", "--heap", "4096", "main.js", "--stats", "--gc", "50"]))
                .unwrap();
        assert_eq!(args.cmd, "run");
        assert_eq!(args.heap_size, Some(4096));
        assert_eq!(args.max_stack_size, None);
        assert_eq!(args.gc_trigger, Some(50));
        assert!(args.stats);
        assert_eq!(args.positional, vec!["main.js".to_string()]);
    }

    #[test]
    fn double_dash_ends_option_parsing() {
        let args = parse_args_from(argv(&["eval", "--", "--stats"])).unwrap();
        assert!(!args.stats);
        assert_eq!(args.positional, vec!["--stats".to_string()]);
    }

    #[test]
    fn bad_flags_are_rejected() {
        assert!(parse_args_from(Vec::new()).is_err());
        assert!(parse_args_from(argv(&["run", "--verbose"])).is_err());
        assert!(parse_args_from(argv(&["run", "--heap"])).is_err());
        assert!(parse_args_from(argv(&["run", "--stack", "lots"])).is_err());
        assert!(parse_args_from(argv(&["run", "--gc", "0"])).is_err());
        assert!(parse_args_from(argv(&["run", "--gc", "101"])).is_err());
    }
}
