//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "hermes.toml")]
    pub output: String,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing Hermes configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2); // Configuration error exit code
        }

        match fs::write(&self.output, Self::generate_config()) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your settings", self.output);
                println!("  2. Point mhs.base_url at your MHS outbound endpoint");
                println!("  3. Validate configuration: hermes validate-config");
                println!("  4. Run a translation: hermes translate --input extract.json \\");
                println!("       --patient-id <id> --ods-code <code>");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {}", e);
                Ok(5) // Fatal error exit code
            }
        }
    }

    /// Generate the sample configuration
    fn generate_config() -> String {
        r#"# Hermes Configuration File
# GP2GP EHR extract translation core

# Runtime environment: development, staging, or production.
# In production the MHS endpoint must use https.
environment = "development"

[application]
# Log level: trace, debug, info, warn, error
log_level = "info"

[mhs]
# MHS outbound endpoint
base_url = "http://localhost:8332"
timeout_seconds = 60

[translation]
# Composition category codes excluded from immunization mapping
excluded_composition_codes = []

[logging]
# Local file logging with rotation
local_enabled = true
local_path = "/var/log/hermes"
local_rotation = "daily"
local_max_size_mb = 100
"#
        .to_string()
    }
}
