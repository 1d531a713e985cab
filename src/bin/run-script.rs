//! Evaluate a script once against market data from a JSON file.
//!
//! Usage: `run-script <script-file> <market-data.json>` where the JSON is an
//! object of series name → array of numbers. Prints the results as JSON.

use dotenvy::dotenv;
use pinelite::logging;
use pinelite::script::execute_script;
use pinelite::EngineError;
use std::collections::HashMap;
use std::env;
use std::process::ExitCode;
use tracing::error;

fn run(script_path: &str, data_path: &str) -> Result<String, EngineError> {
    let script = std::fs::read_to_string(script_path)?;
    let raw = std::fs::read_to_string(data_path)?;
    let market_data: HashMap<String, Vec<f64>> = serde_json::from_str(&raw)?;

    let output = execute_script(&script, market_data);
    Ok(serde_json::to_string_pretty(&output)?)
}

fn main() -> ExitCode {
    dotenv().ok();
    logging::init_logging();

    let args: Vec<String> = env::args().collect();
    if args.len() != 3 {
        eprintln!("usage: {} <script-file> <market-data.json>", args[0]);
        return ExitCode::from(2);
    }

    match run(&args[1], &args[2]) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "script execution failed");
            ExitCode::FAILURE
        }
    }
}
