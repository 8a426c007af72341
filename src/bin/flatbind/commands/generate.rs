//! `flatbind generate` command

use anyhow::{bail, Result};

use flatbind::ops::{generate, GenerateOptions};
use flatbind::util::diagnostic::{self, suggestions, Diagnostic};

use super::{load_config, Output};
use crate::cli::GenerateArgs;

pub fn execute(args: GenerateArgs, output: Output) -> Result<()> {
    let config = load_config(args.config.as_deref())?;

    let opts = GenerateOptions {
        input: args.input,
        languages: args.languages,
        out_dir: args.output,
        dry_run: args.dry_run,
    };

    let report = generate(&config, &opts)?;

    println!(
        "{}: {} functions ({} bound, {} free, {} dropped), {} enums",
        opts.input.display(),
        report.functions,
        report.bound,
        report.free,
        report.dropped.len(),
        report.enums
    );

    if output.verbose {
        for function in &report.dropped {
            let note = Diagnostic::note(format!("`{}` is not bound to any type", function.name))
                .with_context(format!("at {}", function.coord))
                .with_suggestion(suggestions::DROPPED);
            diagnostic::emit(&note, output.color);
        }
    }

    for language in &report.languages {
        if let Some(err) = &language.error {
            diagnostic::emit(&err.to_diagnostic(), output.color);
            continue;
        }

        if report.dry_run {
            for file in &language.files {
                println!("  would write {}", file.display());
            }
        } else {
            let dir = language
                .files
                .first()
                .and_then(|f| f.parent())
                .map(|d| d.display().to_string())
                .unwrap_or_default();
            println!(
                "  {:<8} {} files ({} changed) in {}",
                language.language.to_string(),
                language.files.len(),
                language.written,
                dir
            );
        }
    }

    let failed: Vec<String> = report.failures().map(|(l, _)| l.to_string()).collect();
    if !failed.is_empty() {
        bail!("failed to generate bindings for {}", failed.join(", "));
    }

    Ok(())
}
