use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use serde::Deserialize;
use std::{path::PathBuf, str::FromStr};

/// Addresses that sign or maintain uploads on nobody's behalf
pub const AUTOMATION_ADDRESSES: &[&str] = &[
    "ubuntu-devel-discuss@lists.ubuntu.com",
    "ubuntu-devel@lists.ubuntu.com",
];

#[derive(Deserialize, Debug, PartialEq)]
pub struct Config {
    /// Series scanned when none is picked on the command line
    #[serde(default = "default_series")]
    pub series: Vec<String>,
    #[serde(default = "default_archive_url")]
    pub archive_url: String,
    #[serde(default = "default_automation_addresses")]
    pub automation_addresses: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            series: default_series(),
            archive_url: default_archive_url(),
            automation_addresses: default_automation_addresses(),
        }
    }
}

impl Config {
    pub fn from_toml(data: &str) -> Result<Self> {
        let config: Config = toml::from_str(data).context("Failed to parse config file")?;
        if config.series.is_empty() {
            bail!("No series configured");
        }
        Ok(config)
    }

    /// Read the config file if given, otherwise use built-in defaults
    pub fn load(path: Option<&PathBuf>) -> Result<Self> {
        match path {
            Some(path) => {
                let data = std::fs::read_to_string(path)
                    .context(format!("Failed to read config file {}", path.display()))?;
                Config::from_toml(&data)
            }
            None => Ok(Config::default()),
        }
    }
}

#[inline]
fn default_series() -> Vec<String> {
    ["trusty", "xenial", "bionic", "focal", "jammy", "noble"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

#[inline]
fn default_archive_url() -> String {
    "https://lists.ubuntu.com/archives".to_string()
}

#[inline]
fn default_automation_addresses() -> Vec<String> {
    AUTOMATION_ADDRESSES.iter().map(|s| s.to_string()).collect()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputStyle {
    Default,
    Markdown,
    Wiki,
}

impl FromStr for OutputStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "default" => Ok(OutputStyle::Default),
            "markdown" => Ok(OutputStyle::Markdown),
            "wiki" => Ok(OutputStyle::Wiki),
            _ => Err(format!("unknown style {}, expected default, markdown or wiki", s)),
        }
    }
}

#[derive(Parser)]
#[clap(about = "Report package uploads per uploader from -changes mailing list archives", version)]
pub struct Opts {
    #[clap(
        long,
        default_value = ".",
        help = "Directory holding the <series>-changes.mbox archives"
    )]
    pub base_dir: PathBuf,
    #[clap(long, help = "Only report this series")]
    pub series: Option<String>,
    #[clap(long, help = "Only report uploads dated on or after this day (YYYY-MM-DD)")]
    pub created_after: Option<NaiveDate>,
    #[clap(long, help = "Only report uploads of this source package")]
    pub package: Option<String>,
    #[clap(long = "email", help = "Only report uploads by this address, may be repeated")]
    pub emails: Vec<String>,
    #[clap(
        long,
        default_value = "default",
        help = "Output style: default, markdown or wiki"
    )]
    pub style: OutputStyle,
    #[clap(long, help = "Read settings from this TOML file")]
    pub config: Option<PathBuf>,
    #[clap(short, long, help = "Print additional debug information")]
    pub verbose: bool,
}

impl Opts {
    /// Series to scan, in order
    pub fn series(&self, config: &Config) -> Vec<String> {
        match &self.series {
            Some(s) => vec![s.clone()],
            None => config.series.clone(),
        }
    }
}
