//! Command-line front end for checking proof scripts.
//!
//! A script line is `formula ; justification`. A leading `N.` label is
//! ignored, `#` starts a comment line, and blank lines are skipped, so
//! line citations always count proof lines, not file lines.

use crate::*;

/// Splits a proof script into the `(formula, justification)` pairs the
/// checker consumes.
pub fn split_script(text: &str) -> Vec<(String, String)> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(|l| {
            let l = match l.split_once('.') {
                Some((label, rest)) if label.chars().all(|c| c.is_ascii_digit()) && !label.is_empty() => {
                    rest.trim_start()
                }
                _ => l,
            };
            match l.split_once(';') {
                Some((formula, justification)) => {
                    (formula.trim().to_string(), justification.trim().to_string())
                }
                None => (l.to_string(), String::new()),
            }
        })
        .collect()
}

#[cfg(feature = "bin")]
pub mod bin {
    use super::*;
    use clap::Parser;
    use std::io::Read;
    use std::path::PathBuf;

    #[derive(Debug, Parser)]
    #[command(version, about = env!("CARGO_PKG_DESCRIPTION"))]
    struct Args {
        /// Proof scripts to check; reads stdin when none are given
        inputs: Vec<PathBuf>,
        /// Maximum number of proof lines accepted per script
        #[clap(long, default_value_t = 10_000)]
        max_lines: usize,
        /// Maximum formula nesting depth
        #[clap(long, default_value_t = 128)]
        max_nesting: usize,
        /// Only print the overall verdict per script
        #[clap(short, long)]
        quiet: bool,
    }

    /// Start the command-line proof checker.
    pub fn cli() {
        env_logger::Builder::new()
            .filter_level(log::LevelFilter::Info)
            .format_timestamp(None)
            .format_target(false)
            .parse_default_env()
            .init();

        let args = Args::parse();
        let checker = Checker {
            max_lines: args.max_lines,
            max_nesting: args.max_nesting,
            ..Checker::default()
        };

        let mut all_valid = true;
        if args.inputs.is_empty() {
            let mut text = String::new();
            if let Err(err) = std::io::stdin().read_to_string(&mut text) {
                log::error!("failed to read stdin: {err}");
                std::process::exit(2);
            }
            all_valid &= check_script(&checker, "<stdin>", &text, args.quiet);
        } else {
            for input in &args.inputs {
                let text = std::fs::read_to_string(input).unwrap_or_else(|_| {
                    let arg = input.to_string_lossy();
                    panic!("Failed to read file {arg}")
                });
                all_valid &= check_script(&checker, &input.to_string_lossy(), &text, args.quiet);
            }
        }
        if !all_valid {
            std::process::exit(1);
        }
    }

    fn check_script(checker: &Checker, name: &str, text: &str, quiet: bool) -> bool {
        let pairs = split_script(text);
        let input: Vec<(&str, &str)> = pairs
            .iter()
            .map(|(f, j)| (f.as_str(), j.as_str()))
            .collect();
        match checker.verify(&input) {
            Ok(result) => {
                if !quiet {
                    for v in &result.verdicts {
                        match &v.reason {
                            Some(reason) => println!("line {}: ✗ {reason}", v.line + 1),
                            None => println!("line {}: ✓", v.line + 1),
                        }
                    }
                }
                println!(
                    "{name}: {}",
                    if result.valid { "valid" } else { "invalid" }
                );
                result.valid
            }
            Err(err) => {
                log::error!("{name}: {err}");
                false
            }
        }
    }
}
