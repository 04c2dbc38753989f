//! Integration tests for the `trem` binary.
//!
//! Each test points the config directory at a fresh temp dir so a real
//! user config can never leak in.

use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

fn trem(home: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_trem"));
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env_remove("RUST_LOG");
    cmd
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn write_mono(path: &Path, samples: &[f32], sample_rate: u32) {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };
    let mut writer = hound::WavWriter::create(path, spec).unwrap();
    for &s in samples {
        writer.write_sample(s).unwrap();
    }
    writer.finalize().unwrap();
}

fn read_stereo(path: &Path) -> (hound::WavSpec, Vec<f32>, Vec<f32>) {
    let reader = hound::WavReader::open(path).unwrap();
    let spec = reader.spec();
    let samples: Vec<f32> = reader.into_samples::<f32>().map(Result::unwrap).collect();
    let left = samples.iter().step_by(2).copied().collect();
    let right = samples.iter().skip(1).step_by(2).copied().collect();
    (spec, left, right)
}

// ---------------------------------------------------------------------------
// trem params / timings
// ---------------------------------------------------------------------------

#[test]
fn params_lists_knobs_and_menu() {
    let home = TempDir::new().unwrap();
    let output = trem(home.path()).arg("params").output().unwrap();
    assert!(output.status.success(), "{}", stderr(&output));

    let text = stdout(&output);
    for id in ["rate", "depth", "mod_rate", "trem_type", "trem_wave", "osc_wave", "true_bypass", "midi"] {
        assert!(text.contains(id), "missing {id} in:\n{text}");
    }
    assert!(text.contains("20 Hz"), "rate span in:\n{text}");
}

#[test]
fn timings_table_at_48k() {
    let home = TempDir::new().unwrap();
    let output = trem(home.path())
        .args(["timings", "--sample-rate", "48000"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", stderr(&output));

    let text = stdout(&output);
    let row = text
        .lines()
        .find(|l| l.trim_start().starts_with("48000"))
        .unwrap_or_else(|| panic!("no 48000 row in:\n{text}"));
    let cols: Vec<&str> = row.split_whitespace().collect();
    assert_eq!(cols, vec!["48000", "960", "480", "12000", "241"]);
}

#[test]
fn timings_rejects_unusable_rate() {
    let home = TempDir::new().unwrap();
    let output = trem(home.path())
        .args(["timings", "-r", "1000"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(stderr(&output).contains("sample rate 1000 Hz"));
}

// ---------------------------------------------------------------------------
// trem init-config / check-config
// ---------------------------------------------------------------------------

#[test]
fn init_then_check_config() {
    let home = TempDir::new().unwrap();
    let path = home.path().join("conf").join("pedal.toml");

    let init = trem(home.path())
        .args(["init-config", path.to_str().unwrap()])
        .output()
        .unwrap();
    assert!(init.status.success(), "{}", stderr(&init));
    assert!(path.exists());

    let again = trem(home.path())
        .args(["init-config", path.to_str().unwrap()])
        .output()
        .unwrap();
    assert!(!again.status.success(), "second init must refuse to overwrite");
    assert!(stderr(&again).contains("already exists"));

    let check = trem(home.path())
        .args(["check-config", path.to_str().unwrap()])
        .output()
        .unwrap();
    assert!(check.status.success(), "{}", stderr(&check));
    let text = stdout(&check);
    assert!(text.contains("OK"));
    assert!(text.contains("hard_switch"));
    assert!(text.contains("mute 960 / relay 480 / crossfade 12000 samples"));
}

#[test]
fn init_defaults_to_user_config_dir() {
    let home = TempDir::new().unwrap();
    let output = trem(home.path()).arg("init-config").output().unwrap();
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(home.path().join(".config/trem/pedal.toml").exists());
}

#[test]
fn check_config_reports_problems() {
    let home = TempDir::new().unwrap();
    let path = home.path().join("bad.toml");
    std::fs::write(
        &path,
        "block_size = 0\n[[midi.cc]]\ncc = 200\nparam = \"midi\"\n",
    )
    .unwrap();

    let output = trem(home.path())
        .args(["check-config", path.to_str().unwrap()])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let err = stderr(&output);
    assert!(err.contains("block size 0"), "got: {err}");
    assert!(err.contains("CC 200"), "got: {err}");
}

#[test]
fn check_config_lists_cc_routes() {
    let home = TempDir::new().unwrap();
    let path = home.path().join("midi.toml");
    std::fs::write(&path, "[[midi.cc]]\ncc = 21\nparam = \"osc_wave\"\n").unwrap();

    let output = trem(home.path())
        .args(["check-config", path.to_str().unwrap()])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(stdout(&output).contains("cc  21        -> Osc Wave"));
}

// ---------------------------------------------------------------------------
// trem render
// ---------------------------------------------------------------------------

#[test]
fn render_bypassed_passes_audio_through() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("in.wav");
    let output_path = dir.path().join("out.wav");
    let samples: Vec<f32> = (0..4800)
        .map(|i| (2.0 * std::f32::consts::PI * 440.0 * i as f32 / 48000.0).sin() * 0.5)
        .collect();
    write_mono(&input, &samples, 48000);

    let output = trem(dir.path())
        .args(["render", input.to_str().unwrap(), output_path.to_str().unwrap()])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", stderr(&output));

    let (spec, left, right) = read_stereo(&output_path);
    assert_eq!(spec.channels, 2);
    assert_eq!(spec.sample_rate, 48000);
    assert_eq!(left, samples);
    assert_eq!(right, samples);
}

#[test]
fn render_engaged_modulates_amplitude() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("in.wav");
    let output_path = dir.path().join("out.wav");
    write_mono(&input, &vec![0.5; 48000], 48000);

    let output = trem(dir.path())
        .args([
            "render",
            input.to_str().unwrap(),
            output_path.to_str().unwrap(),
            "--on",
            "--rate",
            "0.2",
            "--depth",
            "1.0",
            "--type",
            "harmonic",
            "--mod-rate",
            "0.5",
        ])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", stderr(&output));
    let text = stdout(&output);
    assert!(text.contains("Harmonic tremolo"), "got:\n{text}");
    assert!(text.contains("effect on"), "got:\n{text}");

    let (_, left, right) = read_stereo(&output_path);
    assert_eq!(left.len(), 48000);
    assert_eq!(left, right);
    assert!(left.iter().all(|&s| (0.0..=0.5 + 1e-6).contains(&s)));
    let min = left.iter().copied().fold(f32::MAX, f32::min);
    assert!(min < 0.05, "full depth should nearly silence the trough, min {min}");
}

#[test]
fn render_events_show_relay_sequence() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("in.wav");
    let output_path = dir.path().join("out.wav");
    write_mono(&input, &vec![0.25; 9600], 48000);

    let output = trem(dir.path())
        .args([
            "render",
            input.to_str().unwrap(),
            output_path.to_str().unwrap(),
            "--press",
            "0.05",
            "--events",
        ])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", stderr(&output));

    // Press at 2400 samples = block 600; relay and unmute follow 121 and 241 blocks later
    let text = stdout(&output);
    let events: Vec<Vec<&str>> = text
        .lines()
        .filter(|l| l.trim_start().starts_with("block"))
        .map(|l| l.split_whitespace().collect())
        .collect();
    let summary: Vec<(&str, &str, &str)> = events.iter().map(|e| (e[1], e[4], e[5])).collect();
    assert_eq!(
        summary,
        vec![
            ("0", "relay", "high"),
            ("0", "mute", "low"),
            ("600", "mute", "high"),
            ("721", "relay", "low"),
            ("841", "mute", "low"),
        ]
    );
}

#[test]
fn render_counts_every_scheduled_press() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("in.wav");
    let output_path = dir.path().join("out.wav");
    write_mono(&input, &vec![0.25; 4800], 48000);

    // --on and --press 0 land in the same block; the second is pushed two blocks later
    let output = trem(dir.path())
        .args([
            "render",
            input.to_str().unwrap(),
            output_path.to_str().unwrap(),
            "--on",
            "--press",
            "0",
            "--press",
            "0.0001",
        ])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", stderr(&output));
    let text = stdout(&output);
    assert!(text.contains("Footswitch presses: 3, effect on"), "got:\n{text}");
}

#[test]
fn render_crossfade_with_relay_disabled() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("in.wav");
    let output_path = dir.path().join("out.wav");
    write_mono(&input, &vec![0.5; 4800], 48000);

    let output = trem(dir.path())
        .args([
            "render",
            input.to_str().unwrap(),
            output_path.to_str().unwrap(),
            "--transition",
            "crossfade",
            "--no-relay",
            "--on",
            "--events",
        ])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", stderr(&output));
    let text = stdout(&output);
    assert!(text.contains("crossfade transition"), "got:\n{text}");
    assert!(!text.contains("high"), "lines must stay released:\n{text}");
}

#[test]
fn render_rejects_unknown_waveform() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("in.wav");
    write_mono(&input, &[0.0; 16], 48000);

    let output = trem(dir.path())
        .args([
            "render",
            input.to_str().unwrap(),
            dir.path().join("out.wav").to_str().unwrap(),
            "--waveform",
            "wobble",
        ])
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(stderr(&output).contains("unknown tremolo waveform 'wobble'"));
}

#[test]
fn render_uses_config_file() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("in.wav");
    let output_path = dir.path().join("out.wav");
    let config = dir.path().join("pedal.toml");
    write_mono(&input, &vec![0.5; 4800], 44100);
    std::fs::write(&config, "block_size = 32\ntransition = \"crossfade\"\n").unwrap();

    let output = trem(dir.path())
        .args([
            "render",
            input.to_str().unwrap(),
            output_path.to_str().unwrap(),
            "--config",
            config.to_str().unwrap(),
        ])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", stderr(&output));
    let text = stdout(&output);
    assert!(text.contains("44100 Hz"), "got:\n{text}");
    assert!(text.contains("crossfade transition, block 32"), "got:\n{text}");

    let (spec, _, _) = read_stereo(&output_path);
    assert_eq!(spec.sample_rate, 44100);
}
