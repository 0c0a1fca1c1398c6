use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use serde::de::DeserializeOwned;

use matrix_compositor::cli::Cli;
use matrix_compositor::{
    LayerBuilder, LayerConfig, LayerWriter, Panel, Pixel, RefreshClock, Rgb24, Rgb48, Rotation,
};

// === Constants ===

const BACKGROUND: Rgb24 = Rgb24::new(0, 0, 40);
const BAR: Rgb24 = Rgb24::new(255, 160, 0);
const BORDER: Rgb24 = Rgb24::new(0, 200, 80);
const SHADES: &[u8] = b" .:-=+*#%@";

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    if cli.wide {
        run::<Rgb48>(&cli)
    } else {
        run::<Rgb24>(&cli)
    }
}

fn load_config<P: Pixel + DeserializeOwned>(cli: &Cli) -> Result<LayerConfig<P>> {
    let mut config = match &cli.config {
        Some(path) => LayerConfig::from_path(path)
            .with_context(|| format!("loading layer config from {}", path.display()))?,
        None => LayerConfig::default(),
    };

    if let Some(degrees) = cli.rotation {
        config.rotation = Rotation::try_from(degrees).context("--rotation")?;
    }
    if let Some(brightness) = cli.brightness {
        config.brightness = brightness;
    }
    if cli.no_color_correction {
        config.color_correction = false;
    }
    Ok(config)
}

fn run<P>(cli: &Cli) -> Result<()>
where
    P: Pixel + From<Rgb24> + DeserializeOwned + 'static,
{
    let config = load_config::<P>(cli)?;
    let (mut writer, refresher) = LayerBuilder::<P>::new(cli.width, cli.height)
        .config(config)
        .build()
        .context("building layer")?;

    let mut panel = Panel::<Rgb48>::new(cli.width, cli.height).with_layer(refresher);
    let stop = AtomicBool::new(false);

    let ticks = thread::scope(|s| {
        let refresh = s.spawn(|| panel.run(RefreshClock::new(cli.hz), &stop));

        for frame in 0..cli.frames {
            draw_frame(&mut writer, frame);
            writer.swap_buffers(false);
        }
        // Make sure the last frame has been picked up before stopping
        writer.copy_refresh_to_draw();
        stop.store(true, Ordering::Release);

        refresh.join()
    })
    .map_err(|_| anyhow::anyhow!("refresh thread panicked"))?;

    info!("{} frames drawn, {} refreshes", cli.frames, ticks);
    print_frame(&panel);
    Ok(())
}

fn draw_frame<P: Pixel + From<Rgb24>>(writer: &mut LayerWriter<P>, frame: u32) {
    let (w, h) = writer.logical_size();
    let (w, h) = (w as i32, h as i32);

    writer.fill_screen(P::from(BACKGROUND));
    writer.draw_fast_hline(0, w - 1, 0, P::from(BORDER));
    writer.draw_fast_hline(0, w - 1, h - 1, P::from(BORDER));
    writer.draw_fast_vline(0, 0, h - 1, P::from(BORDER));
    writer.draw_fast_vline(w - 1, 0, h - 1, P::from(BORDER));

    let span = (w - 4).max(1);
    let x = (frame as i32 % (2 * span) - span).abs() + 1;
    writer.fill_rectangle(x, 2, x + 2, h - 3, P::from(BAR));
}

fn print_frame(panel: &Panel<Rgb48>) {
    let (_, height) = panel.size();
    for y in 0..height {
        let Some(row) = panel.row(y) else { break };
        let line: String = row
            .iter()
            .map(|px| {
                let [r, g, b] = px.channels();
                let luma = (r * 2 + g * 5 + b) / 8;
                let index = luma as usize * (SHADES.len() - 1) / u16::MAX as usize;
                SHADES[index] as char
            })
            .collect();
        println!("{line}");
    }
}
