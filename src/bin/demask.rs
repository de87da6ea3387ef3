// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/demask

//! Command-line driver for the recovery engine.
//!
//! Takes an optional working-directory argument (default `.`) laid out with
//! the conventional file names (`I_D.bmp`, `I_M.bmp`, `M.bmp`, `M{t}.txt`)
//! and prompts interactively for the number of stages to process.

use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use demask_core::recover;

fn main() -> ExitCode {
    tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();

    let dir = std::env::args().nth(1).map_or_else(|| PathBuf::from("."), PathBuf::from);
    let stage_count = match prompt_stage_count() {
        Some(n) => n,
        None => {
            eprintln!("error: no stage count supplied");
            return ExitCode::FAILURE;
        }
    };

    match recover::recover(&dir, stage_count) {
        Ok(reports) => {
            for report in &reports {
                println!("stage {}: {}", report.ordinal, report.operation);
            }
            println!(
                "reconstructed image written to {}",
                dir.join("I_R.bmp").display()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Ask for the stage count until a positive integer arrives; `None` on EOF.
fn prompt_stage_count() -> Option<u32> {
    let stdin = std::io::stdin();
    let mut line = String::new();
    loop {
        print!("Number of stages to process: ");
        let _ = std::io::stdout().flush();
        line.clear();
        if stdin.lock().read_line(&mut line).ok()? == 0 {
            return None; // EOF
        }
        match line.trim().parse::<u32>() {
            Ok(n) if n > 0 => return Some(n),
            _ => eprintln!("please enter a positive integer"),
        }
    }
}
