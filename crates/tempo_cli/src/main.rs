//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `tempo_core` linkage.
//! - Resolve a temporal phrase from the command line for quick local checks.

use std::env;
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("tempo_core version={}", tempo_core::core_version());

    let args: Vec<String> = env::args().skip(1).collect();
    if args.is_empty() {
        return ExitCode::SUCCESS;
    }

    let text = args.join(" ");
    let ranges = match tempo_core::parse::temporal::resolve(&text, "UTC", None) {
        Ok(ranges) => ranges,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };

    if ranges.is_empty() {
        println!("no temporal pattern recognized");
        return ExitCode::SUCCESS;
    }

    for range in ranges {
        println!(
            "{} .. {}",
            range.start.to_rfc3339(),
            range.end.to_rfc3339()
        );
    }
    ExitCode::SUCCESS
}
