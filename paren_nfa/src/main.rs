use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info};
use paren_nfa::{Matcher, Session};

/// Test candidate strings against fully-parenthesized regular expressions
#[derive(Parser, Debug)]
#[command(name = "paren-nfa")]
#[command(about = "Compile parenthesized regular expressions to NFAs and test strings against them", long_about = None)]
struct Cli {
    /// Print each compiled automaton to stderr
    #[arg(long)]
    dump: bool,

    /// Input files: an expression, a count N, then N candidate strings
    #[arg(required = true)]
    files: Vec<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut session = Session::new();
    for path in &cli.files {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        info!("processing {}", path.display());

        let verdicts = run_file(&mut session, &contents, cli.dump)
            .with_context(|| format!("malformed input file {}", path.display()))?;
        for verdict in verdicts {
            println!("{}", verdict);
        }
    }
    Ok(())
}

/// Evaluate one input file as its own session, returning the output lines.
fn run_file(session: &mut Session, contents: &str, dump: bool) -> Result<Vec<&'static str>> {
    let mut lines = contents.lines().map(str::trim_end);
    let expression = lines.next().unwrap_or_default();
    let count: usize = lines
        .next()
        .unwrap_or_default()
        .trim()
        .parse()
        .context("second line must be the number of candidate strings")?;

    session.reset();
    let nfa = match session.compile(expression) {
        Ok(nfa) => nfa,
        Err(err) => {
            debug!("{:?}: {}", expression, err);
            return Ok(vec!["Wrong Expression"]);
        }
    };
    if dump {
        eprint!("{}", nfa);
    }

    let matcher = Matcher::new(&nfa);
    let verdicts = (0..count)
        .map(|_| lines.next().unwrap_or_default())
        .map(|candidate| if matcher.is_match(candidate) { "Yes" } else { "No" })
        .collect();
    Ok(verdicts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yes_and_no() {
        let mut session = Session::new();
        let input = "(a+b)\n4\na\nb\nc\n\n";
        let verdicts = run_file(&mut session, input, false).unwrap();
        assert_eq!(verdicts, vec!["Yes", "Yes", "No", "No"]);
    }

    #[test]
    fn test_wrong_expression() {
        let mut session = Session::new();
        let verdicts = run_file(&mut session, "((a+b)\n2\na\nb\n", false).unwrap();
        assert_eq!(verdicts, vec!["Wrong Expression"]);
    }

    #[test]
    fn test_trailing_whitespace_and_missing_lines() {
        let mut session = Session::new();
        let verdicts = run_file(&mut session, "(a*)  \r\n3\naa \n", false).unwrap();
        assert_eq!(verdicts, vec!["Yes", "Yes", "Yes"]);
    }

    #[test]
    fn test_each_file_resets_session() {
        let mut session = Session::new();
        run_file(&mut session, "(a.b)\n0\n", false).unwrap();
        assert_eq!(session.next_id(), 4);
        run_file(&mut session, "a\n0\n", false).unwrap();
        assert_eq!(session.next_id(), 2);
    }

    #[test]
    fn test_bad_count() {
        let mut session = Session::new();
        assert!(run_file(&mut session, "(a+b)\nmany\n", false).is_err());
        assert!(run_file(&mut session, "(a+b)\n", false).is_err());
    }
}
