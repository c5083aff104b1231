//! Command-line host: reads two prescription files from disk and prints how
//! the medication regimen changed between them.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;

use crate::config;
use crate::extraction::{extract_text, Document, ExtractedText, ExtractionError};
use crate::reconcile::{MedicationVocabulary, ReconciliationResult};

#[derive(Parser, Debug)]
#[command(name = "rx-reconcile", version)]
#[command(about = "Compare two prescriptions and list continued, new, and discontinued medications")]
pub struct Cli {
    /// Earlier prescription (PDF or plain text)
    pub previous: PathBuf,

    /// Later prescription (PDF or plain text)
    pub latest: PathBuf,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,

    /// Report brand names under their generic substance
    #[arg(long)]
    pub group_aliases: bool,

    /// JSON vocabulary file, overriding the built-in names
    #[arg(long, value_name = "FILE")]
    pub vocabulary: Option<PathBuf>,
}

impl Cli {
    /// Vocabulary chosen by precedence: `--vocabulary`, the environment
    /// variable, the user config file, then the built-in table.
    pub fn resolve_vocabulary(&self) -> Result<MedicationVocabulary> {
        self.resolve_vocabulary_from(
            config::vocabulary_path_from_env(),
            config::default_vocabulary_path(),
        )
    }

    /// Same precedence as [`Cli::resolve_vocabulary`], with the environment
    /// and config-dir locations supplied by the caller.
    pub fn resolve_vocabulary_from(
        &self,
        env_path: Option<PathBuf>,
        config_path: Option<PathBuf>,
    ) -> Result<MedicationVocabulary> {
        let chosen = self
            .vocabulary
            .clone()
            .or(env_path)
            .or_else(|| config_path.filter(|p| p.is_file()));

        let Some(path) = chosen else {
            return Ok(if self.group_aliases {
                MedicationVocabulary::builtin_grouped()
            } else {
                MedicationVocabulary::builtin().clone()
            });
        };

        if self.group_aliases {
            tracing::warn!(
                path = %path.display(),
                "--group-aliases ignored: a vocabulary file takes precedence"
            );
        }
        MedicationVocabulary::load(&path)
            .with_context(|| format!("loading vocabulary from {}", path.display()))
    }
}

fn read_prescription(path: &Path) -> Result<ExtractedText> {
    Document::from_path(path)
        .and_then(extract_text)
        .map_err(|e| match e {
            ExtractionError::DocumentUnreadable(reason) => anyhow::anyhow!(
                "{} could not be read ({reason}). Please provide a valid prescription document.",
                path.display()
            ),
            other => anyhow::Error::new(other).context(format!("reading {}", path.display())),
        })
}

/// Run both components for the files named on the command line.
pub fn compare_files(
    cli: &Cli,
    vocabulary: &MedicationVocabulary,
) -> Result<ReconciliationResult> {
    let previous = read_prescription(&cli.previous)?;
    let latest = read_prescription(&cli.latest)?;
    Ok(vocabulary.reconcile(&previous, &latest))
}

pub fn render(result: &ReconciliationResult, json: bool) -> Result<String> {
    if json {
        serde_json::to_string_pretty(result).context("serializing result")
    } else {
        Ok(result.to_string())
    }
}

pub fn run(cli: Cli) -> Result<()> {
    tracing::info!("{} v{}", config::APP_NAME, config::APP_VERSION);

    let vocabulary = cli.resolve_vocabulary()?;
    let result = compare_files(&cli, &vocabulary)?;
    println!("{}", render(&result, cli.json)?);
    Ok(())
}
