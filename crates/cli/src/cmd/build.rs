//! Build command implementation.

use std::io::Write;

use mystage_core::config::ResolvedConfig;
use mystage_core::pipeline::{self, BuildOptions};
use mystage_core::stage::ProgressCallback;

use super::output::{print_broken_table, print_collisions, print_failures, print_summary};
use super::{EXIT_FAILURE, EXIT_OK, EXIT_PROBLEMS};
use crate::BuildArgs;

/// Run the build command and return the process exit code.
pub fn run(rc: &ResolvedConfig, args: BuildArgs) -> i32 {
    let mut options = BuildOptions::from_config(rc);
    if let Some(staging) = args.staging {
        options.staging_dir = staging;
    }
    if args.name.is_some() {
        options.book_name = args.name;
    }
    if args.no_clean {
        options.clean = false;
    }

    println!("Staging vault: {}", args.source.display());

    let progress: ProgressCallback = if args.verbose {
        Box::new(|current, total, path| {
            println!("[{}/{}] {}", current, total, path);
        })
    } else {
        Box::new(|current, total, _path| {
            if current % 50 == 0 || current == total {
                print!("\rStaging... {}/{}", current, total);
                std::io::stdout().flush().ok();
            }
        })
    };

    let report = match pipeline::build(&args.source, rc, &options, Some(progress)) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("\nError during build: {}", e);
            return EXIT_FAILURE;
        }
    };

    if !args.verbose {
        println!();
    }
    println!();
    println!("Build preparation complete:");
    print_summary(&report.stage);
    println!("  Duration:            {}ms", report.stage.duration_ms);
    if report.homepage_generated {
        println!("  Homepage:            generated placeholder index.md");
    }

    if !report.stage.broken.is_empty() {
        println!();
        print_broken_table(&report.stage.broken);
    }
    if !report.stage.collisions.is_empty() {
        println!();
        print_collisions(&report.stage);
    }
    if !report.stage.failures.is_empty() {
        println!();
        print_failures(&report.stage);
    }

    println!();
    println!("Book:            {}", report.book_name);
    println!("Staging dir:     {}", report.staging_root.display());
    println!("Config written:  {}", report.myst_config.display());
    println!();
    println!("To build and preview:");
    println!("  cd {}", report.staging_root.display());
    println!("  myst start");

    if args.strict && report.stage.has_problems() { EXIT_PROBLEMS } else { EXIT_OK }
}
