//! Offline rendering through the hall.

use std::path::PathBuf;

use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};

use super::common::HallArgs;
use crate::wav::{StereoBuffer, read_wav_stereo, write_wav_stereo};

#[derive(Args)]
pub struct RenderArgs {
    /// Input WAV file (mono or stereo)
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output WAV file (stereo)
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    #[command(flatten)]
    hall: HallArgs,

    /// Host block size in frames
    #[arg(long, default_value = "512", value_parser = clap::value_parser!(u32).range(1..=65536))]
    block_size: u32,

    /// Seconds of silence appended so the tail can ring out
    #[arg(long, default_value = "3.0")]
    tail: f32,

    /// Output bit depth (16, 24, or 32)
    #[arg(long, default_value = "32")]
    bit_depth: u16,
}

pub fn run(args: RenderArgs) -> anyhow::Result<()> {
    if !(args.tail.is_finite() && args.tail >= 0.0) {
        anyhow::bail!("--tail must be a non-negative number of seconds");
    }

    println!("Reading {}...", args.input.display());
    let (input, spec) = read_wav_stereo(&args.input)?;
    println!(
        "  {} frames, {} ch, {} Hz, {:.2}s",
        input.frames(),
        spec.channels,
        spec.sample_rate,
        input.frames() as f32 / spec.sample_rate as f32
    );

    let mut config = args.hall.config()?;
    if config.sample_rate != spec.sample_rate {
        tracing::debug!(
            configured = config.sample_rate,
            file = spec.sample_rate,
            "using the input file's sample rate"
        );
        config.sample_rate = spec.sample_rate;
    }
    let mut hall = config.build()?;
    hall.activate();

    let settings = hall.settings();
    println!(
        "Hall: size {} shape {} tonality {} presence {}, {} override(s)",
        settings.size.index(),
        settings.shape.index(),
        settings.tonality.index(),
        settings.presence.index(),
        config.overrides.len()
    );

    let tail_frames = (args.tail * spec.sample_rate as f32).round() as usize;
    let mut source = input.clone();
    source.pad(tail_frames);
    let total = source.frames();
    let block_size = args.block_size as usize;

    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("##-"),
    );

    let mut output = StereoBuffer {
        left: vec![0.0; total],
        right: vec![0.0; total],
    };
    for (((in_l, in_r), out_l), out_r) in source
        .left
        .chunks(block_size)
        .zip(source.right.chunks(block_size))
        .zip(output.left.chunks_mut(block_size))
        .zip(output.right.chunks_mut(block_size))
    {
        let frames = in_l.len();
        hall.run([in_l, in_r], [out_l, out_r], frames);
        pb.inc(frames as u64);
    }
    pb.finish_with_message("done");

    let input_stats = Stats::measure(input.samples());
    let output_stats = Stats::measure(output.samples());
    println!("\nStats:");
    println!("  Input:  {input_stats}");
    println!("  Output: {output_stats}");
    if output_stats.peak > 1.0 {
        tracing::warn!(peak = output_stats.peak, "output clips above 0 dBFS");
    }

    println!("\nWriting {}...", args.output.display());
    write_wav_stereo(&args.output, &output, spec.sample_rate, args.bit_depth)?;
    println!("Done!");

    Ok(())
}

/// Peak and RMS of a signal.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Stats {
    peak: f32,
    rms: f32,
}

impl Stats {
    fn measure(samples: impl Iterator<Item = f32>) -> Self {
        let (mut peak, mut sum, mut count) = (0.0f32, 0.0f64, 0usize);
        for s in samples {
            peak = peak.max(s.abs());
            sum += f64::from(s * s);
            count += 1;
        }
        let rms = if count == 0 {
            0.0
        } else {
            (sum / count as f64).sqrt() as f32
        };
        Self { peak, rms }
    }
}

impl std::fmt::Display for Stats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "RMS {:.1} dB, Peak {:.1} dB",
            linear_to_db(self.rms),
            linear_to_db(self.peak)
        )
    }
}

fn linear_to_db(linear: f32) -> f32 {
    if linear <= 0.0 {
        -120.0
    } else {
        20.0 * linear.log10()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_of_a_square_wave() {
        let stats = Stats::measure([0.5f32, -0.5, 0.5, -0.5].into_iter());
        assert_eq!(stats.peak, 0.5);
        assert!((stats.rms - 0.5).abs() < 1e-6);
        assert_eq!(Stats::measure(std::iter::empty()).rms, 0.0);
    }

    #[test]
    fn silence_reports_the_floor() {
        assert_eq!(linear_to_db(0.0), -120.0);
        assert!((linear_to_db(1.0)).abs() < 1e-6);
        assert!((linear_to_db(0.5) + 6.0206).abs() < 1e-3);
    }
}
