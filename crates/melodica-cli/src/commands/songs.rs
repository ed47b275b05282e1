//! Songs commands: list, show, and add catalog compositions.

use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use colored::Colorize;

use crate::catalog::{Catalog, CatalogError};

use super::json_output::{error_codes, JsonError, SongsOutput};

/// Run `songs list`.
pub fn list(catalog_path: &Path, json: bool) -> Result<ExitCode> {
    if json {
        let catalog = match Catalog::open(catalog_path) {
            Ok(catalog) => catalog,
            Err(err) => return Ok(print_failure(error_codes::CATALOG_READ, err)),
        };
        SongsOutput::success(catalog.entries().to_vec()).print();
        return Ok(ExitCode::SUCCESS);
    }

    let catalog = Catalog::open(catalog_path)
        .with_context(|| format!("Failed to open catalog: {}", catalog_path.display()))?;

    println!(
        "{} {}",
        "Songs in".cyan().bold(),
        catalog_path.display()
    );
    if catalog.entries().is_empty() {
        println!("{}", "  No songs saved yet.".dimmed());
        return Ok(ExitCode::SUCCESS);
    }
    for entry in catalog.entries() {
        let notes = match entry.sequence() {
            Ok(sequence) => format!("{} notes", sequence.len()),
            Err(_) => "invalid notes".to_string(),
        };
        let owner = entry
            .owner
            .as_deref()
            .map(|o| format!("  by {}", o))
            .unwrap_or_default();
        println!(
            "  {} {} ({}){}",
            format!("#{}", entry.id).bold(),
            entry.title,
            notes,
            owner.dimmed()
        );
    }
    Ok(ExitCode::SUCCESS)
}

/// Run `songs show`.
pub fn show(catalog_path: &Path, id: u64, json: bool) -> Result<ExitCode> {
    let catalog = match Catalog::open(catalog_path) {
        Ok(catalog) => catalog,
        Err(err) if json => return Ok(print_failure(error_codes::CATALOG_READ, err)),
        Err(err) => {
            return Err(err).with_context(|| {
                format!("Failed to open catalog: {}", catalog_path.display())
            })
        }
    };

    match catalog.find(id) {
        Ok(entry) => {
            if json {
                SongsOutput::success(vec![entry.clone()]).print();
            } else {
                println!("{} {}", format!("#{}", entry.id).bold(), entry.title.bold());
                if let Some(owner) = &entry.owner {
                    println!("{} {}", "Owner:".dimmed(), owner);
                }
                println!("{} {}", "Notes:".dimmed(), entry.composition);
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            if json {
                Ok(print_failure(error_codes::SONG_NOT_FOUND, err))
            } else {
                println!("{} {}", "FAILED".red().bold(), err);
                Ok(ExitCode::from(1))
            }
        }
    }
}

/// Run `songs add`.
pub fn add(
    catalog_path: &Path,
    title: &str,
    notes: &str,
    owner: Option<String>,
    json: bool,
) -> Result<ExitCode> {
    let mut catalog = match Catalog::open(catalog_path) {
        Ok(catalog) => catalog,
        Err(err) if json => return Ok(print_failure(error_codes::CATALOG_READ, err)),
        Err(err) => {
            return Err(err).with_context(|| {
                format!("Failed to open catalog: {}", catalog_path.display())
            })
        }
    };

    match catalog.add(title, notes, owner) {
        Ok(entry) => {
            if json {
                SongsOutput::success(vec![entry.clone()]).print();
            } else {
                println!(
                    "{} Added {} {} ({})",
                    "SUCCESS".green().bold(),
                    format!("#{}", entry.id).bold(),
                    entry.title,
                    entry.composition
                );
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            let code = match &err {
                CatalogError::InvalidNotes(_) | CatalogError::EmptyComposition => {
                    error_codes::INVALID_NOTES
                }
                CatalogError::Io(_) => error_codes::CATALOG_WRITE,
                _ => error_codes::CATALOG_READ,
            };
            if json {
                Ok(print_failure(code, err))
            } else {
                println!("{} {}", "FAILED".red().bold(), err);
                Ok(ExitCode::from(1))
            }
        }
    }
}

/// Prints a failure envelope and returns the failure exit code.
fn print_failure(code: &str, err: impl std::fmt::Display) -> ExitCode {
    SongsOutput::failure(vec![JsonError::new(code, err.to_string())]).print();
    ExitCode::from(1)
}
