//! Offline rendering through the pedal.

use std::collections::VecDeque;
use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use trem_config::validation::{parse_transition, parse_tremolo_type, parse_waveform};
use trem_platform::{MidiEvent, SettingsCell, UiEvent};

use super::common::{linear_to_db, load_config, parse_knob, parse_seconds};
use crate::panel::{Line, OfflinePanel};
use crate::wav::{Stereo, read_stereo, write_stereo};

#[derive(Args)]
pub struct RenderArgs {
    /// Input WAV file (mono or stereo)
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output WAV file (stereo)
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Pedal configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Rate knob position, 0.0 - 1.0
    #[arg(long, default_value = "0.25", value_parser = parse_knob)]
    rate: f32,

    /// Depth knob position, 0.0 - 1.0
    #[arg(long, default_value = "1.0", value_parser = parse_knob)]
    depth: f32,

    /// Mod rate knob position, 0.0 - 1.0
    #[arg(long, default_value = "0.0", value_parser = parse_knob)]
    mod_rate: f32,

    /// Press the footswitch at this time in seconds (repeatable)
    #[arg(long = "press", value_name = "SECONDS", value_parser = parse_seconds)]
    presses: Vec<f64>,

    /// Engage the effect at the start
    #[arg(long)]
    on: bool,

    /// Tremolo type: simple or harmonic
    #[arg(long = "type")]
    tremolo_type: Option<String>,

    /// Tremolo waveform
    #[arg(long)]
    waveform: Option<String>,

    /// Rate-modulation waveform
    #[arg(long)]
    mod_waveform: Option<String>,

    /// Transition policy: hard_switch or crossfade
    #[arg(long)]
    transition: Option<String>,

    /// Leave relay and mute lines released
    #[arg(long)]
    no_relay: bool,

    /// Samples per block (overrides the config)
    #[arg(long)]
    block_size: Option<usize>,

    /// Output bit depth (16, 24, or 32)
    #[arg(long, default_value = "32")]
    bit_depth: u16,

    /// Print every relay and mute line change
    #[arg(long)]
    events: bool,
}

impl RenderArgs {
    /// Menu edits requested on the command line.
    fn ui_events(&self) -> anyhow::Result<VecDeque<UiEvent>> {
        let mut events = VecDeque::new();
        if let Some(name) = &self.tremolo_type {
            events.push_back(UiEvent::SetTremoloType(parse_tremolo_type(name)?));
        }
        if let Some(name) = &self.waveform {
            events.push_back(UiEvent::SetTremoloWaveform(parse_waveform(
                "tremolo waveform",
                name,
            )?));
        }
        if let Some(name) = &self.mod_waveform {
            events.push_back(UiEvent::SetModWaveform(parse_waveform("mod waveform", name)?));
        }
        if self.no_relay {
            events.push_back(UiEvent::SetRelayBypass(false));
        }
        Ok(events)
    }
}

pub fn run(args: RenderArgs) -> anyhow::Result<()> {
    let mut config = load_config(args.config.as_deref())?;

    println!("Reading {}...", args.input.display());
    let (input, file_rate) = read_stereo(&args.input)?;
    anyhow::ensure!(!input.is_empty(), "{} has no audio", args.input.display());

    if file_rate != config.sample_rate {
        tracing::info!(
            config = config.sample_rate,
            file = file_rate,
            "using the input file's sample rate"
        );
        config.sample_rate = file_rate;
    }
    if let Some(name) = &args.transition {
        parse_transition(name)?;
        config.transition = name.clone();
    }
    if let Some(block_size) = args.block_size {
        config.block_size = block_size;
    }
    config.validate().context("invalid render settings")?;

    let mut control = config.control_loop()?;
    let cell = SettingsCell::new(control.settings());
    let mut ui = args.ui_events()?;
    control.poll(&mut ui, &mut VecDeque::<MidiEvent>::new(), &cell);

    let mut pedal = config.build_pedal()?;
    let block_size = config.block_size;
    let sample_rate = config.sample_rate_hz();

    let mut presses: Vec<usize> = args
        .presses
        .iter()
        .map(|&t| (t * f64::from(config.sample_rate) / block_size as f64) as usize)
        .collect();
    if args.on {
        presses.push(0);
    }
    let mut panel = OfflinePanel::new([args.rate, args.depth, args.mod_rate], presses);

    let settings = cell.load();
    println!(
        "  {} frames, {} Hz, {:.2}s",
        input.len(),
        config.sample_rate,
        input.len() as f32 / sample_rate
    );
    println!(
        "  {} tremolo, {} wave, {} mod wave, {} transition, block {}",
        settings.tremolo_type.name(),
        settings.tremolo_waveform.name(),
        settings.mod_waveform.name(),
        pedal.transition().kind().name(),
        block_size
    );

    let pb = ProgressBar::new(input.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("##-"),
    );

    let mut output = Stereo {
        left: vec![0.0; input.len()],
        right: vec![0.0; input.len()],
    };
    let blocks = input
        .left
        .chunks(block_size)
        .zip(input.right.chunks(block_size))
        .zip(
            output
                .left
                .chunks_mut(block_size)
                .zip(output.right.chunks_mut(block_size)),
        );
    let mut toggles = 0;
    for (i, ((in_l, in_r), (out_l, out_r))) in blocks.enumerate() {
        let report = pedal.run_block(&mut panel, cell.load(), (in_l, in_r), (out_l, out_r));
        toggles += usize::from(report.toggled);
        pb.set_position(((i + 1) * block_size).min(input.len()) as u64);
    }
    pb.finish_and_clear();

    println!("\nStats:");
    println!(
        "  Input:  RMS {:.1} dB, Peak {:.1} dB",
        linear_to_db(rms(&input)),
        linear_to_db(peak(&input))
    );
    println!(
        "  Output: RMS {:.1} dB, Peak {:.1} dB",
        linear_to_db(rms(&output)),
        linear_to_db(peak(&output))
    );
    let [effect_led, envelope_led] = panel.leds();
    println!(
        "  Footswitch presses: {}, effect {} (LEDs {:.0} / {:.2})",
        toggles,
        if pedal.effect_on() { "on" } else { "off" },
        effect_led,
        envelope_led
    );

    if args.events {
        println!("\nLine events:");
        for event in panel.events() {
            let sample = event.block * block_size;
            println!(
                "  block {:>7}  {:>9.3} ms  {:<5} {}",
                event.block,
                sample as f32 * 1000.0 / sample_rate,
                match event.line {
                    Line::Relay => "relay",
                    Line::Mute => "mute",
                },
                if event.high { "high" } else { "low" }
            );
        }
    }

    println!("\nWriting {}...", args.output.display());
    write_stereo(&args.output, &output, config.sample_rate, args.bit_depth)?;
    println!("Done!");

    Ok(())
}

fn rms(audio: &Stereo) -> f32 {
    if audio.is_empty() {
        return 0.0;
    }
    let sum: f32 = audio
        .left
        .iter()
        .chain(audio.right.iter())
        .map(|s| s * s)
        .sum();
    (sum / (2 * audio.len()) as f32).sqrt()
}

fn peak(audio: &Stereo) -> f32 {
    audio
        .left
        .iter()
        .chain(audio.right.iter())
        .map(|s| s.abs())
        .fold(0.0, f32::max)
}
