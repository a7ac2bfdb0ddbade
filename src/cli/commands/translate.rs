//! Translate command implementation
//!
//! This module implements the `translate` command: it loads a deserialized
//! extract tree from a JSON file, runs a full mapping pass, and writes the
//! finished resource set as JSON.

use clap::Args;
use std::fs;
use std::path::Path;

use crate::config::load_config;
use crate::core::mapper::{map_extract, MappingContext};
use crate::domain::attachment::AttachmentDescriptor;
use crate::domain::extract::EhrExtract;
use crate::{log_translation_complete, log_translation_start};

/// Arguments for the translate command
#[derive(Args, Debug)]
pub struct TranslateArgs {
    /// Path to the extract tree JSON file
    #[arg(short, long)]
    pub input: String,

    /// Patient resource id for subject references
    #[arg(long)]
    pub patient_id: String,

    /// Source organization ODS code
    #[arg(long)]
    pub ods_code: String,

    /// Ids of encounters already mapped for this conversation
    #[arg(long, value_delimiter = ',')]
    pub encounter_ids: Vec<String>,

    /// Path to an attachment index JSON file
    #[arg(long)]
    pub attachment_index: Option<String>,

    /// Path to write the resource set to (stdout when omitted)
    #[arg(short, long)]
    pub output: Option<String>,
}

impl TranslateArgs {
    /// Execute the translate command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Failed to load configuration file");
                println!("   Error: {e}");
                return Ok(2); // Configuration error exit code
            }
        };

        if !Path::new(&self.input).exists() {
            println!("❌ Extract file not found: {}", self.input);
            return Ok(2);
        }

        let extract: EhrExtract = serde_json::from_str(&fs::read_to_string(&self.input)?)?;

        let attachments: Vec<AttachmentDescriptor> = match &self.attachment_index {
            Some(path) => serde_json::from_str(&fs::read_to_string(path)?)?,
            None => vec![],
        };

        let context = MappingContext {
            patient_id: self.patient_id.clone(),
            organization_code: self.ods_code.clone(),
            encounter_ids: self.encounter_ids.clone(),
            attachments,
            excluded_composition_codes: config.translation.excluded_composition_codes.clone(),
        };

        log_translation_start!(extract.id.root, context.organization_code);

        let mapped = map_extract(&extract, &context);

        log_translation_complete!(mapped.resources.len(), mapped.unmapped.len());

        let rendered = serde_json::to_string_pretty(&mapped)?;
        match &self.output {
            Some(path) => {
                fs::write(path, rendered)?;
                println!("✅ Wrote {} resources to {}", mapped.resources.len(), path);
            }
            None => println!("{rendered}"),
        }

        if !mapped.unmapped.is_empty() {
            println!(
                "ℹ️  {} statements produced no resources (see log for categories)",
                mapped.unmapped.len()
            );
        }

        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        args: TranslateArgs,
    }

    #[test]
    fn test_translate_args_parse() {
        let harness = Harness::parse_from([
            "translate",
            "--input",
            "extract.json",
            "--patient-id",
            "patient-1",
            "--ods-code",
            "B83002",
            "--encounter-ids",
            "enc-1,enc-2",
        ]);
        assert_eq!(harness.args.input, "extract.json");
        assert_eq!(harness.args.encounter_ids, vec!["enc-1", "enc-2"]);
        assert!(harness.args.attachment_index.is_none());
    }
}
