//! Widget options: YAML file, command line and page query string.

use clap::Parser;
use log::{warn, LevelFilter};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::sound::SoundConfig;

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct PluckConfig {
    /// Window title natively, canvas id in the browser.
    pub element: String,
    pub width: Option<f32>,
    pub height: Option<f32>,
    /// Base path the `sounds/` directory is resolved against.
    pub script_path: String,
    pub sound: SoundConfig,
    pub log_level: String,
}

impl Default for PluckConfig {
    fn default() -> Self {
        Self {
            element: "pluck-canvas".to_string(),
            width: None,
            height: None,
            script_path: String::new(),
            sound: SoundConfig::default(),
            log_level: "info".to_string(),
        }
    }
}

#[derive(Debug, Default, Parser)]
#[clap(name = "pluckstring", about = "A string on a canvas you can grab and pluck")]
pub struct Args {
    /// YAML file with widget options
    #[clap(long, env = "PLUCK_CONFIG")]
    pub config: Option<PathBuf>,

    #[clap(long, env = "PLUCK_ELEMENT")]
    pub element: Option<String>,

    /// Fixed canvas width; follows the window when omitted
    #[clap(long, env = "PLUCK_WIDTH")]
    pub width: Option<f32>,

    /// Fixed canvas height; follows the window when omitted
    #[clap(long, env = "PLUCK_HEIGHT")]
    pub height: Option<f32>,

    #[clap(long, env = "PLUCK_SCRIPT_PATH")]
    pub script_path: Option<String>,

    #[clap(long, env = "PLUCK_LOG")]
    pub log_level: Option<String>,
}

impl PluckConfig {
    pub fn from_yaml(text: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml(&text)
    }

    /// Defaults, then the `--config` file, then the remaining flags.
    pub fn from_args(args: &Args) -> Result<Self> {
        let mut config = match &args.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        config.apply_args(args);
        Ok(config)
    }

    pub fn apply_args(&mut self, args: &Args) {
        if let Some(element) = &args.element {
            self.element = element.clone();
        }
        if args.width.is_some() {
            self.width = args.width;
        }
        if args.height.is_some() {
            self.height = args.height;
        }
        if let Some(script_path) = &args.script_path {
            self.script_path = script_path.clone();
        }
        if let Some(log_level) = &args.log_level {
            self.log_level = log_level.clone();
        }
    }

    /// Apply `key=value` pairs from a page URL. Unknown keys are ignored.
    pub fn apply_query<I>(&mut self, pairs: I)
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (key, value) in pairs {
            match key.as_str() {
                "element" => self.element = value,
                "width" => self.width = parse_dimension(&key, &value).or(self.width),
                "height" => self.height = parse_dimension(&key, &value).or(self.height),
                "scriptPath" => self.script_path = value,
                "logLevel" => self.log_level = value,
                _ => {}
            }
        }
    }

    pub fn level_filter(&self) -> LevelFilter {
        self.log_level.parse().unwrap_or(LevelFilter::Info)
    }

    pub fn sound_urls(&self) -> Vec<String> {
        self.sound.source_urls(&self.script_path)
    }
}

fn parse_dimension(key: &str, value: &str) -> Option<f32> {
    match value.parse() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!("ignoring {}={:?}: not a number", key, value);
            None
        }
    }
}
