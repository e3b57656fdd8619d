//! Info command implementation

use anyhow::Result;
use clap::Args;
use serde_json::json;
use std::path::PathBuf;
use std::process::ExitCode;

use crate::patch::PatchDocument;

#[derive(Args)]
pub struct InfoArgs {
    /// Patch file to inspect
    #[arg(value_name = "PATCH")]
    pub patch: PathBuf,

    /// Emit the fields as a JSON object
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: InfoArgs) -> Result<ExitCode> {
    let patch = PatchDocument::from_file(&args.patch)?;

    if args.json {
        let value = json!({
            "path": args.patch.display().to_string(),
            "author": patch.author(),
            "date": patch.date(),
            "subject": patch.subject(),
            "fixes": patch.fixes(),
            "has_three_dash": patch.has_three_dash(),
            "description_body": patch.description_body(),
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(ExitCode::SUCCESS);
    }

    let none = "(none)";
    println!("Patch: {}", args.patch.display());
    println!("Author: {}", patch.author().unwrap_or(none));
    println!("Date: {}", patch.date().unwrap_or(none));
    println!("Subject: {}", patch.subject().unwrap_or(none));
    if patch.fixes().is_empty() {
        println!("Fixes: {}", none);
    } else {
        println!("Fixes:");
        for fixes in patch.fixes() {
            println!("  {}", fixes);
        }
    }
    println!("Diff separator: {}", if patch.has_three_dash() { "---" } else { "diff --git" });
    println!("Description lines: {}", patch.description_body().lines().count());

    Ok(ExitCode::SUCCESS)
}
