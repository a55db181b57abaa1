use std::path::PathBuf;

use clap::Parser;
use webpify_core::Config;

/// Convert PNG images to WebP.
#[derive(Parser, Debug)]
#[command(name = "webpify", version)]
pub struct Args {
    /// PNG files to convert. Other files are ignored.
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Encoding quality (1-100). Higher keeps more detail.
    #[arg(short, long, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub quality: Option<u8>,

    /// Directory converted files are written into.
    #[arg(short, long)]
    pub out_dir: Option<PathBuf>,

    /// Deliver every converted file at once (a ZIP when there are several).
    #[arg(short, long)]
    pub zip: bool,

    /// Configuration file.
    #[arg(short, long, env = "WEBPIFY_CONFIG")]
    pub config: Option<PathBuf>,
}

impl Args {
    /// Applies command-line overrides on top of the loaded configuration.
    pub fn apply(&self, config: &mut Config) {
        if let Some(quality) = self.quality {
            config.conversion.quality = quality;
        }
        if let Some(dir) = &self.out_dir {
            config.output.dir = dir.clone();
        }
    }
}
