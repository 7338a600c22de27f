use anyhow::Result;
use config::{Config, File};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::args::Args;
use crate::format::DataFormat;
use crate::resolve::DEFAULT_ALIAS_PREFIX;

/// Effective settings: config-file values layered under command-line
/// overrides.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Cfg {
    /// OAuth client secret file (required for any command that talks to the
    /// Sheets API).
    pub client_secret_file: String,
    /// Where the OAuth token cache lives.
    pub auth_token_file: String,
    /// Where the alias mapping lives.
    pub alias_file: String,
    /// Prefix marking a command-line argument as an alias reference.
    pub alias_prefix: String,
    /// How many rows at a time to read while fetching data.
    pub read_chunk_size: usize,
    /// Input/output format for cell data.
    pub output_format: DataFormat,
    /// Refuse to clear or delete worksheets unless forced.
    pub protect_worksheets: bool,
    /// Title used by `touch workbook` when none is given.
    pub default_workbook_title: String,
}

fn config_dir() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.config/gsheet", home)
}

pub fn default_config_file() -> String {
    format!("{}/config.toml", config_dir())
}

impl Cfg {
    pub fn load(args: &Args) -> Result<Self> {
        let config_path = args.config.clone().unwrap_or_else(default_config_file);
        debug!("Loading configuration from: {}", config_path);

        let mut cfg = Cfg::default();

        if std::path::Path::new(&config_path).exists() {
            let config_builder =
                Config::builder().add_source(File::with_name(&config_path).required(false));

            if let Ok(config) = config_builder.build() {
                if let Ok(client_secret_file) = config.get_string("client_secret_file") {
                    cfg.client_secret_file = client_secret_file;
                }
                if let Ok(auth_token_file) = config.get_string("auth_token_file") {
                    cfg.auth_token_file = auth_token_file;
                }
                if let Ok(alias_file) = config.get_string("alias_file") {
                    cfg.alias_file = alias_file;
                }
                if let Ok(alias_prefix) = config.get_string("alias_prefix") {
                    if !alias_prefix.is_empty() {
                        cfg.alias_prefix = alias_prefix;
                    }
                }
                if let Ok(read_chunk_size) = config.get_int("read_chunk_size") {
                    if read_chunk_size > 0 {
                        cfg.read_chunk_size = read_chunk_size as usize;
                    }
                }
                if let Ok(output_format) = config.get_string("output_format") {
                    if let Ok(format) = output_format.parse() {
                        cfg.output_format = format;
                    }
                }
                if let Ok(protect_worksheets) = config.get_bool("protect_worksheets") {
                    cfg.protect_worksheets = protect_worksheets;
                }
                if let Ok(default_workbook_title) = config.get_string("default_workbook_title") {
                    cfg.default_workbook_title = default_workbook_title;
                }
                debug!("Loaded configuration from file");
            } else {
                debug!("Could not parse config file, using defaults");
            }
        } else {
            debug!("Config file not found, using defaults");
        }

        // Command-line arguments win over the config file.
        if let Some(client_secret_file) = &args.client_secret_file {
            cfg.client_secret_file = client_secret_file.clone();
        }
        if let Some(auth_token_file) = &args.auth_token_file {
            cfg.auth_token_file = auth_token_file.clone();
        }
        if let Some(alias_file) = &args.alias_file {
            cfg.alias_file = alias_file.clone();
        }
        if let Some(alias_prefix) = &args.alias_prefix {
            if !alias_prefix.is_empty() {
                cfg.alias_prefix = alias_prefix.clone();
            }
        }
        if let Some(read_chunk_size) = args.read_chunk_size {
            cfg.read_chunk_size = read_chunk_size;
        }
        if let Some(output_format) = args.output_format {
            cfg.output_format = output_format;
        }
        if args.protect_worksheets {
            cfg.protect_worksheets = true;
        }

        debug!("Final configuration: {:?}", cfg);
        Ok(cfg)
    }
}

impl Default for Cfg {
    fn default() -> Self {
        let dir = config_dir();
        Self {
            client_secret_file: String::new(),
            auth_token_file: format!("{}/token.json", dir),
            alias_file: format!("{}/aliases.json", dir),
            alias_prefix: DEFAULT_ALIAS_PREFIX.to_string(),
            read_chunk_size: 100,
            output_format: DataFormat::Csv,
            protect_worksheets: false,
            default_workbook_title: String::new(),
        }
    }
}
