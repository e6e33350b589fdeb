use clap::Args;
use serde_json::json;

use crate::cli::utils::{output_lines, output_success};
use crate::cli::OutputFormat;
use crate::forms::{permitted_features, FeatureFlag, WorkspaceEntitlement};

#[derive(Args)]
pub struct FeaturesArgs {
    #[arg(long, help = "Show the Pro tier")]
    pub pro: bool,
}

pub fn handle(args: FeaturesArgs, output_format: OutputFormat) -> anyhow::Result<()> {
    let entitlement = WorkspaceEntitlement { is_pro: args.pro };
    let permitted = permitted_features(&entitlement);

    let lines: Vec<String> = FeatureFlag::ALL
        .iter()
        .map(|flag| {
            let mark = if permitted.contains(flag) { "+" } else { "-" };
            format!("{} {:?}", mark, flag)
        })
        .collect();

    output_success(
        &output_format,
        &format!("{} tier: {} of {} features", tier_name(args.pro), permitted.len(), FeatureFlag::ALL.len()),
        Some(json!({ "permitted": permitted })),
    )?;
    output_lines(&output_format, &lines);
    Ok(())
}

fn tier_name(pro: bool) -> &'static str {
    if pro {
        "Pro"
    } else {
        "Free"
    }
}
