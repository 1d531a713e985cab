//! Unit tests for the script parser

use pinelite::models::{Comparison, ConditionStatement, IndicatorStatement};
use pinelite::script::{parse_line, parse_script, Statement};

#[test]
fn test_parse_indicator_line() {
    let script = parse_script("rsi_val = ta.rsi(close, 14)");

    assert_eq!(
        script.indicator_statements,
        vec![IndicatorStatement {
            output: "rsi_val".to_string(),
            function: "rsi".to_string(),
            args: vec!["close".to_string(), "14".to_string()],
            line: 1,
        }]
    );
    assert!(script.condition_statements.is_empty());
}

#[test]
fn test_parse_condition_line() {
    let script = parse_script("signal = rsi_val > 70");

    assert!(script.indicator_statements.is_empty());
    assert_eq!(
        script.condition_statements,
        vec![ConditionStatement {
            output: "signal".to_string(),
            lhs: "rsi_val".to_string(),
            operator: Comparison::GreaterThan,
            rhs: "70".to_string(),
            line: 1,
        }]
    );
}

#[test]
fn test_parse_keeps_line_order() {
    let script = parse_script(
        "fast = ta.ema(close, 12)\n\
         oversold = rsi < 30\n\
         slow = ta.ema(close, 26)\n\
         trend = fast > slow",
    );

    let outputs: Vec<&str> = script
        .indicator_statements
        .iter()
        .map(|s| s.output.as_str())
        .collect();
    assert_eq!(outputs, vec!["fast", "slow"]);

    let conditions: Vec<&str> = script
        .condition_statements
        .iter()
        .map(|s| s.output.as_str())
        .collect();
    assert_eq!(conditions, vec!["oversold", "trend"]);
    assert_eq!(script.statement_count(), 4);

    let lines: Vec<usize> = script.indicator_statements.iter().map(|s| s.line).collect();
    assert_eq!(lines, vec![1, 3]);
    let lines: Vec<usize> = script.condition_statements.iter().map(|s| s.line).collect();
    assert_eq!(lines, vec![2, 4]);
}

#[test]
fn test_parse_strips_whitespace() {
    let statement = parse_line("   m  =  ta . macd (  close ,12,  26 , 9 )   ").unwrap();
    assert_eq!(
        statement,
        Statement::Indicator(IndicatorStatement {
            output: "m".to_string(),
            function: "macd".to_string(),
            args: vec!["close", "12", "26", "9"]
                .into_iter()
                .map(String::from)
                .collect(),
            line: 0,
        })
    );

    let statement = parse_line("low=rsi<30.5").unwrap();
    assert_eq!(
        statement,
        Statement::Condition(ConditionStatement {
            output: "low".to_string(),
            lhs: "rsi".to_string(),
            operator: Comparison::LessThan,
            rhs: "30.5".to_string(),
            line: 0,
        })
    );
}

#[test]
fn test_parse_empty_argument_list() {
    match parse_line("x = ta.rsi()") {
        Some(Statement::Indicator(statement)) => assert!(statement.args.is_empty()),
        other => panic!("expected indicator statement, got {:?}", other),
    }
}

#[test]
fn test_parse_negative_literal_rhs() {
    match parse_line("below = hist < -0.5") {
        Some(Statement::Condition(statement)) => assert_eq!(statement.rhs, "-0.5"),
        other => panic!("expected condition statement, got {:?}", other),
    }
}

#[test]
fn test_parse_skips_unrecognized_lines() {
    let script = parse_script(
        "//@version=5\n\
         strategy(\"demo\")\n\
         \n\
         x = 1 + 2\n\
         eq = a == b\n\
         plot(close)\n\
         r = ta.rsi(close, 14) // momentum\n\
         // hi = r > 70",
    );

    assert_eq!(script.indicator_statements.len(), 1);
    assert_eq!(script.indicator_statements[0].args, vec!["close", "14"]);
    assert!(script.condition_statements.is_empty());
}

#[test]
fn test_parse_empty_script() {
    assert!(parse_script("").is_empty());
    assert!(parse_script("\n   \n// nothing").is_empty());
}

#[test]
fn test_parse_is_deterministic() {
    let text = "r = ta.rsi(close, 14)\nhot = r > 70\ncold = r < 30";
    assert_eq!(parse_script(text), parse_script(text));
}
