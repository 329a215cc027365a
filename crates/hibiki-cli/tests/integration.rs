//! Integration tests for the `hibiki` binary.

use std::path::Path;
use std::process::Command;

fn hibiki_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_hibiki"))
}

fn write_impulse(path: &Path, sample_rate: u32, frames: usize) {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };
    let mut writer = hound::WavWriter::create(path, spec).unwrap();
    for i in 0..frames {
        writer.write_sample(if i == 0 { 1.0f32 } else { 0.0 }).unwrap();
    }
    writer.finalize().unwrap();
}

#[test]
fn params_lists_every_parameter() {
    let output = hibiki_bin()
        .arg("params")
        .output()
        .expect("failed to run hibiki params");
    assert!(output.status.success(), "hibiki params failed");

    let stdout = String::from_utf8_lossy(&output.stdout);
    for symbol in ["size", "presense", "dry", "e_send", "l_time", "diffuse", "wander"] {
        assert!(stdout.contains(symbol), "listing should contain '{symbol}'");
    }
    assert!(stdout.contains("Late Decay Time"));
    assert!(stdout.contains("20.80"), "default late width should be listed");
}

#[test]
fn params_reflects_macro_flags() {
    let output = hibiki_bin()
        .args(["params", "--presence", "4"])
        .output()
        .expect("failed to run hibiki params");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let dry = stdout
        .lines()
        .find(|line| line.contains(" dry "))
        .expect("dry row");
    assert!(dry.contains("30.00"), "{dry}");
}

#[test]
fn out_of_range_macro_flag_is_rejected() {
    let output = hibiki_bin()
        .args(["params", "--size", "5"])
        .output()
        .expect("failed to run hibiki params");
    assert!(!output.status.success());
}

#[test]
fn render_writes_stereo_with_tail() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("impulse.wav");
    let output = dir.path().join("hall.wav");
    write_impulse(&input, 48000, 4800);

    let status = hibiki_bin()
        .arg("render")
        .arg(&input)
        .arg(&output)
        .args(["--size", "1", "--param", "l_time=1.0", "--tail", "0.5", "--block-size", "300"])
        .status()
        .expect("failed to run hibiki render");
    assert!(status.success());

    let reader = hound::WavReader::open(&output).unwrap();
    let spec = reader.spec();
    assert_eq!(spec.channels, 2);
    assert_eq!(spec.sample_rate, 48000);
    assert_eq!(reader.duration() as usize, 4800 + 24000);

    let samples: Vec<f32> = reader.into_samples::<f32>().map(Result::unwrap).collect();
    assert!(samples.iter().all(|s| s.is_finite()));
    // Something other than the dry impulse made it out.
    assert!(samples[2..].iter().any(|s| s.abs() > 1e-6));
}

#[test]
fn render_rejects_unknown_symbol() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("impulse.wav");
    write_impulse(&input, 44100, 100);

    let output = hibiki_bin()
        .arg("render")
        .arg(&input)
        .arg(dir.path().join("out.wav"))
        .args(["--param", "nope=1"])
        .output()
        .expect("failed to run hibiki render");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("nope"));
}
