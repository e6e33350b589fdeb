use anyhow::Context;
use clap::Args;
use serde_json::{json, Value};
use std::path::PathBuf;

use crate::cli::utils::{output_lines, output_success};
use crate::cli::OutputFormat;
use crate::forms::request::form_data_to_map;
use crate::forms::{simulate, CleanedForm, FormRequest, WorkspaceEntitlement};

#[derive(Args)]
pub struct CleanArgs {
    #[arg(help = "Form payload as YAML or JSON")]
    pub file: PathBuf,

    #[arg(long, help = "Clean as a Pro workspace")]
    pub pro: bool,
}

pub fn handle(args: CleanArgs, output_format: OutputFormat) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(&args.file)
        .with_context(|| format!("reading {}", args.file.display()))?;
    let cleaned = clean_document(&text, args.pro)?;

    let message = if cleaned.report.is_empty() {
        "No Pro features to remove".to_string()
    } else {
        format!("{} Pro feature(s) would be removed", cleaned.report.len())
    };

    output_success(
        &output_format,
        &message,
        Some(json!({
            "form": Value::Object(form_data_to_map(&cleaned.data)),
            "cleanings": cleaned.report,
        })),
    )?;
    output_lines(&output_format, &cleaned.report.summary());
    Ok(())
}

/// YAML is a superset of JSON, so one parser covers both file kinds
pub fn clean_document(text: &str, pro: bool) -> anyhow::Result<CleanedForm> {
    let payload: Value = serde_yaml::from_str(text).context("parsing form document")?;
    let request = FormRequest::from_value(payload)?;
    let entitlement = if pro {
        WorkspaceEntitlement::pro()
    } else {
        WorkspaceEntitlement::free()
    };
    Ok(simulate(&request.data, &entitlement)?)
}
