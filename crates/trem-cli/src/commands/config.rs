//! Configuration file commands.

use anyhow::Context;
use clap::Args;
use std::path::PathBuf;
use trem_config::{PedalConfig, default_config_path};
use trem_platform::ParameterInfo;

#[derive(Args)]
pub struct CheckConfigArgs {
    /// Configuration file to validate
    #[arg(value_name = "FILE")]
    path: PathBuf,
}

#[derive(Args)]
pub struct InitConfigArgs {
    /// Where to write (defaults to the user config directory)
    #[arg(value_name = "FILE")]
    path: Option<PathBuf>,

    /// Overwrite an existing file
    #[arg(long)]
    force: bool,
}

pub fn check(args: CheckConfigArgs) -> anyhow::Result<()> {
    let config = PedalConfig::load(&args.path)
        .with_context(|| format!("{} is not a valid pedal config", args.path.display()))?;

    let timings = config.timings();
    let settings = config.pedal_settings()?;

    println!("{}: OK", args.path.display());
    println!("  sample rate   {} Hz, block {}", config.sample_rate, config.block_size);
    println!("  transition    {}", config.transition_kind()?.name());
    println!(
        "  windows       mute {} / relay {} / crossfade {} samples",
        timings.mute_off_samples, timings.bypass_toggle_samples, timings.crossfade_samples
    );
    println!(
        "  settings      {} tremolo, {} wave, {} mod wave, true bypass {}, midi {}",
        settings.tremolo_type.name(),
        settings.tremolo_waveform.name(),
        settings.mod_waveform.name(),
        on_off(settings.relay_bypass_enabled),
        on_off(settings.midi_enabled)
    );

    let control = config.control_loop()?;
    for (control_id, param) in control.cc_map().routes() {
        let name = settings.param_info(param).map_or("?", |d| d.name);
        println!("  cc {:>3}        -> {}", control_id.index(), name);
    }

    Ok(())
}

pub fn init(args: InitConfigArgs) -> anyhow::Result<()> {
    let path = args.path.unwrap_or_else(default_config_path);
    anyhow::ensure!(
        args.force || !path.exists(),
        "{} already exists (use --force to overwrite)",
        path.display()
    );

    PedalConfig::default().save(&path)?;
    println!("Wrote {}", path.display());
    Ok(())
}

fn on_off(value: bool) -> &'static str {
    if value { "on" } else { "off" }
}
