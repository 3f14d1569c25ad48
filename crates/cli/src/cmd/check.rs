//! Check command implementation.

use mystage_core::config::ResolvedConfig;
use mystage_core::pipeline;

use super::output::{
    ReportOutput, print_broken_table, print_collisions, print_failures, print_summary,
};
use super::{EXIT_FAILURE, EXIT_OK, EXIT_PROBLEMS};
use crate::CheckArgs;

/// Run the check command and return the process exit code.
pub fn run(rc: &ResolvedConfig, args: CheckArgs) -> i32 {
    let report = match pipeline::check(&args.source, rc) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Error during check: {}", e);
            return EXIT_FAILURE;
        }
    };

    if args.json {
        let output = ReportOutput::from(&report);
        match serde_json::to_string_pretty(&output) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Error serializing report: {}", e);
                return EXIT_FAILURE;
            }
        }
    } else {
        println!("Checked vault: {}", args.source.display());
        print_summary(&report);
        if !report.broken.is_empty() {
            println!();
            print_broken_table(&report.broken);
        }
        if !report.collisions.is_empty() {
            println!();
            print_collisions(&report);
        }
        if !report.failures.is_empty() {
            println!();
            print_failures(&report);
        }
        if !report.has_problems() {
            println!();
            println!("OK   all embeds resolve");
        }
    }

    if args.strict && report.has_problems() { EXIT_PROBLEMS } else { EXIT_OK }
}
