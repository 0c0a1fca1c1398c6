// cli.rs - Command-line interface configuration
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "matrix-compositor")]
#[command(about = "Double-buffered LED matrix layer demo", long_about = None)]
pub struct Cli {
    /// Physical matrix width in pixels
    #[arg(long, default_value_t = 32)]
    pub width: u16,

    /// Physical matrix height in pixels
    #[arg(long, default_value_t = 16)]
    pub height: u16,

    /// Draw with 48-bit pixels instead of 24-bit
    #[arg(long, default_value = "false")]
    pub wide: bool,

    /// Rotation in degrees (0, 90, 180, 270); overrides the config file
    #[arg(long)]
    pub rotation: Option<u16>,

    /// Layer brightness (0-255); overrides the config file
    #[arg(long)]
    pub brightness: Option<u8>,

    /// Disable the color correction table
    #[arg(long = "no-color-correction", default_value = "false")]
    pub no_color_correction: bool,

    /// Refresh rate of the simulated panel
    #[arg(long, default_value_t = 120)]
    pub hz: u32,

    /// Number of frames the application draws before exiting
    #[arg(long, default_value_t = 60)]
    pub frames: u32,

    /// JSON layer configuration
    #[arg(long)]
    pub config: Option<PathBuf>,
}
