//! Transition window table.

use clap::Args;
use std::path::PathBuf;

use super::common::load_config;

#[derive(Args)]
pub struct TimingsArgs {
    /// Pedal configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Sample rate to tabulate (repeatable; defaults to 44100, 48000, 96000)
    #[arg(short = 'r', long = "sample-rate")]
    sample_rates: Vec<u32>,
}

pub fn run(args: TimingsArgs) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref())?;
    let rates = if args.sample_rates.is_empty() {
        vec![44100, 48000, 96000]
    } else {
        args.sample_rates
    };

    let timing = config.timing;
    println!(
        "Windows: mute {} ms, relay {} ms, crossfade {} ms (block {})\n",
        timing.mute_off_ms, timing.bypass_toggle_ms, timing.crossfade_ms, config.block_size
    );
    println!(
        "  {:>9}  {:>8}  {:>8}  {:>10}  {:>12}",
        "rate (Hz)", "mute", "relay", "crossfade", "mute blocks"
    );

    for sample_rate in rates {
        let mut at_rate = config.clone();
        at_rate.sample_rate = sample_rate;
        at_rate.validate()?;

        let t = at_rate.timings();
        println!(
            "  {:>9}  {:>8}  {:>8}  {:>10}  {:>12}",
            sample_rate,
            t.mute_off_samples,
            t.bypass_toggle_samples,
            t.crossfade_samples,
            (t.mute_off_samples as usize + 1).div_ceil(config.block_size)
        );
    }

    Ok(())
}
