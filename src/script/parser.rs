//! Line-oriented strategy script parser.
//!
//! Each line is tried as an indicator assignment
//! (`name = ns.function(arg, ...)`) and then as a condition
//! (`name = lhs > rhs`). Lines matching neither are skipped; parsing never fails.

use crate::models::script::{Comparison, ConditionStatement, IndicatorStatement, ParsedScript};
use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;

/// A single parsed line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    Indicator(IndicatorStatement),
    Condition(ConditionStatement),
}

fn indicator_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(\w+)\s*=\s*\w+\s*\.\s*(\w+)\s*\(([^()]*)\)$")
            .expect("indicator pattern is valid")
    })
}

fn condition_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(\w+)\s*=\s*([\w.]+)\s*([<>])\s*(-?[\w.]+)$")
            .expect("condition pattern is valid")
    })
}

/// Parse a whole script. Statement order follows line order.
pub fn parse_script(text: &str) -> ParsedScript {
    let mut script = ParsedScript::default();

    for (number, line) in text.lines().enumerate() {
        match parse_line(line) {
            Some(Statement::Indicator(mut statement)) => {
                statement.line = number + 1;
                script.indicator_statements.push(statement);
            }
            Some(Statement::Condition(mut statement)) => {
                statement.line = number + 1;
                script.condition_statements.push(statement);
            }
            None => {
                if !strip_comment(line).is_empty() {
                    debug!(line = number + 1, text = %line.trim(), "skipping unrecognized script line");
                }
            }
        }
    }

    script
}

/// Parse one line, indicator pattern first. The statement's `line` is left at 0.
pub fn parse_line(line: &str) -> Option<Statement> {
    let line = strip_comment(line);
    if line.is_empty() {
        return None;
    }

    if let Some(caps) = indicator_pattern().captures(line) {
        return Some(Statement::Indicator(IndicatorStatement {
            output: caps[1].to_string(),
            function: caps[2].to_string(),
            args: split_args(&caps[3]),
            line: 0,
        }));
    }

    let caps = condition_pattern().captures(line)?;
    let operator = Comparison::from_symbol(&caps[3])?;
    Some(Statement::Condition(ConditionStatement {
        output: caps[1].to_string(),
        lhs: caps[2].to_string(),
        operator,
        rhs: caps[4].to_string(),
        line: 0,
    }))
}

fn strip_comment(line: &str) -> &str {
    match line.find("//") {
        Some(idx) => line[..idx].trim(),
        None => line.trim(),
    }
}

fn split_args(args: &str) -> Vec<String> {
    if args.trim().is_empty() {
        return Vec::new();
    }
    args.split(',').map(|arg| arg.trim().to_string()).collect()
}
