use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

/// Global configuration for submissions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalConfig {
    pub submission: SubmissionConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionConfig {
    pub endpoint: String,
    pub api_token: String,
}

/// Get path to global config file
fn config_path() -> Result<PathBuf> {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .context("Could not determine home directory")?;
    let config_dir = PathBuf::from(home).join(".release-qc");
    fs::create_dir_all(&config_dir)?;
    Ok(config_dir.join("config.toml"))
}

/// Load global config
pub fn load_config() -> Result<Option<GlobalConfig>> {
    let path = config_path()?;
    if !path.exists() {
        return Ok(None);
    }
    let contents = fs::read_to_string(&path).context("Failed to read config file")?;
    let config = parse_config(&contents)?;
    Ok(Some(config))
}

fn parse_config(contents: &str) -> Result<GlobalConfig> {
    toml::from_str(contents).context("Failed to parse config file")
}

/// Save global config
fn save_config(config: &GlobalConfig) -> Result<()> {
    let path = config_path()?;
    let contents = toml::to_string_pretty(config).context("Failed to serialize config")?;
    fs::write(&path, contents).context("Failed to write config file")?;
    println!("✅ Configuration saved to: {}", path.display());
    Ok(())
}

/// Helper to read user input
pub fn read_input(prompt: &str) -> Result<String> {
    print!("{}", prompt);
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

/// First characters of a token, enough to recognize it.
fn mask_token(token: &str) -> String {
    let shown: String = token.chars().take(6).collect();
    format!("{}...", shown)
}

fn check_endpoint(endpoint: &str) -> Result<()> {
    if !endpoint.starts_with("https://") && !endpoint.starts_with("http://localhost") {
        anyhow::bail!("Endpoint must use https:// (got '{}')", endpoint);
    }
    Ok(())
}

/// Configure the submission endpoint and API token
pub async fn configure() -> Result<()> {
    println!("🔧 Configuring release submission...\n");

    let existing = load_config()?;

    println!("📋 You'll need:");
    println!("   1. Submission service endpoint");
    println!("      Example: https://api.distributor.example/v1");
    println!("   2. API token issued by the distributor");
    println!();

    let default_endpoint = existing
        .as_ref()
        .map(|c| c.submission.endpoint.as_str())
        .unwrap_or("");
    let endpoint = if !default_endpoint.is_empty() {
        let input = read_input(&format!("Endpoint [current: {}]: ", default_endpoint))?;
        if input.is_empty() {
            default_endpoint.to_string()
        } else {
            input
        }
    } else {
        read_input("Endpoint: ")?
    };

    if endpoint.is_empty() {
        anyhow::bail!("Endpoint is required");
    }
    check_endpoint(&endpoint)?;

    let default_token = existing
        .as_ref()
        .map(|c| c.submission.api_token.as_str())
        .unwrap_or("");
    let api_token = if !default_token.is_empty() {
        let input = read_input(&format!("API Token [current: {}]: ", mask_token(default_token)))?;
        if input.is_empty() {
            default_token.to_string()
        } else {
            input
        }
    } else {
        read_input("API Token: ")?
    };

    if api_token.is_empty() {
        anyhow::bail!("API token is required");
    }

    let config = GlobalConfig {
        submission: SubmissionConfig {
            endpoint,
            api_token,
        },
    };
    save_config(&config)?;

    println!();
    println!("✅ Configuration complete!");
    println!("   Submissions go to: {}", config.submission.endpoint);
    println!();
    println!("🚀 Ready to submit! Try: release-qc submit <submission-file>");

    Ok(())
}
