mod cli;

use std::io::Write;
use std::process::ExitCode;

use clap::Parser;
use csquash::{Diagnostic, Severity, WriteOptions, compact_file, compact_source};

use crate::cli::{Cli, Commands};

fn main() -> ExitCode {
    let cli = Cli::parse();
    match cli.command {
        Commands::Build {
            input,
            output,
            pretty,
            force,
            copyright,
            timestamp_format,
        } => {
            let mut options = WriteOptions::empty();
            if pretty {
                options |= WriteOptions::PRETTY_PRINT;
            }
            if force {
                options |= WriteOptions::OVERWRITE;
            }

            let result = match &output {
                Some(path) => compact_file(
                    &input,
                    path,
                    copyright.as_deref(),
                    timestamp_format.as_deref(),
                    options,
                ),
                None => {
                    // Stream output: read here, the collision preconditions
                    // are meaningless for stdout.
                    match std::fs::read_to_string(&input) {
                        Ok(text) => {
                            let stdout = std::io::stdout();
                            let mut lock = stdout.lock();
                            let result = compact_source(
                                &input.display().to_string(),
                                &text,
                                &mut lock,
                                copyright.as_deref(),
                                timestamp_format.as_deref(),
                                options,
                            );
                            let _ = lock.flush();
                            result
                        }
                        Err(err) => {
                            eprintln!("csquash: {}: {}", input.display(), err);
                            return ExitCode::FAILURE;
                        }
                    }
                }
            };

            match result {
                Ok(diagnostics) => {
                    report(&diagnostics);
                    if diagnostics
                        .iter()
                        .any(|diagnostic| diagnostic.severity == Severity::Error)
                    {
                        ExitCode::FAILURE
                    } else {
                        ExitCode::SUCCESS
                    }
                }
                Err(err) => {
                    eprintln!("csquash: {}", err);
                    ExitCode::FAILURE
                }
            }
        }
    }
}

fn report(diagnostics: &[Diagnostic]) {
    for diagnostic in diagnostics {
        eprintln!("{}", diagnostic);
    }
}
