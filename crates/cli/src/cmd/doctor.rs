use mystage_core::config::{ConfigError, ResolvedConfig, default_config_path};
use std::path::Path;

use super::EXIT_OK;

pub fn run(cfg_path: Option<&Path>, rc: &ResolvedConfig) -> i32 {
    println!("OK   mystage doctor");
    match &rc.source_file {
        Some(path) => println!("config: {}", path.display()),
        None => {
            println!("config: (built-in defaults)");
            if cfg_path.is_none() {
                println!("looked for: {}", default_config_path().display());
            }
        }
    }
    println!("staging.dir: {}", rc.staging_dir.display());
    println!("staging.clean: {}", rc.clean);
    if !rc.excluded_folders.is_empty() {
        let folders: Vec<_> =
            rc.excluded_folders.iter().map(|p| p.display().to_string()).collect();
        println!("staging.excluded_folders: {}", folders.join(", "));
    }
    println!("book.max_depth: {}", rc.book.max_depth);
    println!("book.skip_chapters: {}", rc.book.skip_chapters.join(", "));
    for (number, title) in &rc.book.chapter_titles {
        println!("book.chapter_titles.{}: {}", number, title);
    }
    println!("book.license: {}", rc.book.license);
    println!("book.template: {}", rc.book.template);
    println!("logging.level: {}", rc.logging.level);
    if let Some(ref file) = rc.logging.file {
        println!("logging.file: {}", file.display());
    }
    EXIT_OK
}

pub fn report_failure(cfg_path: Option<&Path>, err: &ConfigError) {
    println!("FAIL mystage doctor");
    println!("{err}");
    if cfg_path.is_none() {
        println!("looked for: {}", default_config_path().display());
    }
}
