//! Track mixing
//!
//! Lays the fixed background track under the synthesized voice track:
//! background at half volume, output truncated to the shorter input,
//! 2x master gain to compensate the mix average, samples clamped to
//! [-1.0, 1.0]. Output is a 16-bit mono WAV.

use anyhow::{Context, Result};
use rubato::{
    Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
};
use std::path::Path;

use crate::audio::{decode_audio_file, DecodedAudio};

/// Gain applied to the background track before mixing
const BACKGROUND_GAIN: f32 = 0.5;
/// Gain applied to the mix average to restore level
const MASTER_GAIN: f32 = 2.0;

/// Mixes the synthesized voice track with the background track
pub struct TrackMixer;

impl TrackMixer {
    pub fn new() -> Self {
        Self
    }

    /// Mix voice and background files into `output_path` (WAV)
    ///
    /// The output sample rate follows the voice track; the background
    /// is resampled to match when the rates differ.
    pub fn mix_to_file(
        &self,
        voice_path: &Path,
        background_path: &Path,
        output_path: &Path,
    ) -> Result<()> {
        let voice = decode_audio_file(voice_path)
            .with_context(|| format!("Failed to decode voice track: {}", voice_path.display()))?;
        let background = decode_audio_file(background_path).with_context(|| {
            format!(
                "Failed to decode background track: {}",
                background_path.display()
            )
        })?;

        tracing::debug!(
            voice_seconds = format!("{:.2}", voice.duration_seconds()),
            background_seconds = format!("{:.2}", background.duration_seconds()),
            "Mixing voice with background track"
        );

        let mixed = mix_tracks(&voice, &background)?;
        write_wav(output_path, &mixed, voice.sample_rate)
            .with_context(|| format!("Failed to write mixed track: {}", output_path.display()))?;

        tracing::info!(
            output = %output_path.display(),
            samples = mixed.len(),
            sample_rate = voice.sample_rate,
            "Audio mix complete"
        );

        Ok(())
    }
}

impl Default for TrackMixer {
    fn default() -> Self {
        Self::new()
    }
}

/// Mix the decoded tracks into mono f32 samples at the voice rate
pub fn mix_tracks(voice: &DecodedAudio, background: &DecodedAudio) -> Result<Vec<f32>> {
    let background_samples = if background.sample_rate == voice.sample_rate {
        background.samples.clone()
    } else {
        resample_mono(
            &background.samples,
            background.sample_rate,
            voice.sample_rate,
        )?
    };

    // Output length follows the shorter input
    let len = voice.samples.len().min(background_samples.len());

    let mut mixed = Vec::with_capacity(len);
    for i in 0..len {
        let quiet_background = background_samples[i] * BACKGROUND_GAIN;
        // Two-input mix average, then master gain
        let sample = (voice.samples[i] + quiet_background) / 2.0 * MASTER_GAIN;
        mixed.push(sample.clamp(-1.0, 1.0));
    }

    Ok(mixed)
}

/// Resample mono PCM samples using rubato sinc interpolation
fn resample_mono(samples: &[f32], source_rate: u32, target_rate: u32) -> Result<Vec<f32>> {
    if samples.is_empty() {
        return Ok(Vec::new());
    }

    let params = SincInterpolationParameters {
        sinc_len: 256,
        f_cutoff: 0.95,
        interpolation: SincInterpolationType::Linear,
        oversampling_factor: 256,
        window: WindowFunction::BlackmanHarris2,
    };

    let resample_ratio = target_rate as f64 / source_rate as f64;

    // Chunk size = input length for single-pass processing
    let mut resampler = SincFixedIn::<f32>::new(resample_ratio, 2.0, params, samples.len(), 1)
        .context("Failed to create rubato resampler")?;

    let output_channels = resampler
        .process(&[samples.to_vec()], None)
        .context("Rubato resampling failed")?;

    Ok(output_channels.into_iter().next().unwrap_or_default())
}

/// Write mono f32 samples as a 16-bit PCM WAV file
fn write_wav(path: &Path, samples: &[f32], sample_rate: u32) -> Result<()> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer = hound::WavWriter::create(path, spec)?;
    for &sample in samples {
        let value = (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
        writer.write_sample(value)?;
    }
    writer.finalize()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn constant_audio(value: f32, len: usize, sample_rate: u32) -> DecodedAudio {
        DecodedAudio {
            samples: vec![value; len],
            sample_rate,
            channels: 1,
        }
    }

    #[test]
    fn background_is_halved_and_mix_is_regained() {
        let voice = constant_audio(0.2, 100, 24000);
        let background = constant_audio(0.4, 100, 24000);

        let mixed = mix_tracks(&voice, &background).unwrap();
        // (0.2 + 0.4*0.5) / 2 * 2 = 0.4
        assert_eq!(mixed.len(), 100);
        for sample in mixed {
            assert!((sample - 0.4).abs() < 1e-6);
        }
    }

    #[test]
    fn output_truncates_to_shorter_input() {
        let voice = constant_audio(0.1, 50, 24000);
        let background = constant_audio(0.1, 500, 24000);
        assert_eq!(mix_tracks(&voice, &background).unwrap().len(), 50);

        let voice = constant_audio(0.1, 500, 24000);
        let background = constant_audio(0.1, 50, 24000);
        assert_eq!(mix_tracks(&voice, &background).unwrap().len(), 50);
    }

    #[test]
    fn loud_inputs_are_clamped() {
        let voice = constant_audio(1.0, 10, 24000);
        let background = constant_audio(1.0, 10, 24000);

        let mixed = mix_tracks(&voice, &background).unwrap();
        // (1.0 + 0.5) / 2 * 2 = 1.5 → clamped to 1.0
        for sample in mixed {
            assert!((sample - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn background_rate_mismatch_is_resampled() {
        let voice = constant_audio(0.0, 24000, 24000);
        // One second of background at 48 kHz resamples to ~24000 samples
        let background = constant_audio(0.2, 48000, 48000);

        let mixed = mix_tracks(&voice, &background).unwrap();
        // Resampler output length is within a frame or two of a second
        assert!(mixed.len() > 23000 && mixed.len() <= 24000);
    }

    #[test]
    fn mix_to_file_writes_playable_wav() {
        let dir = tempfile::tempdir().unwrap();
        let voice_path = dir.path().join("voice.wav");
        let background_path = dir.path().join("background.wav");
        let output_path = dir.path().join("mixed.wav");

        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 22050,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        for (path, seconds) in [(&voice_path, 1u32), (&background_path, 2u32)] {
            let mut writer = hound::WavWriter::create(path, spec).unwrap();
            for i in 0..(22050 * seconds) {
                let sample = ((i as f32 * 0.03).sin() * 8000.0) as i16;
                writer.write_sample(sample).unwrap();
            }
            writer.finalize().unwrap();
        }

        TrackMixer::new()
            .mix_to_file(&voice_path, &background_path, &output_path)
            .unwrap();

        let reader = hound::WavReader::open(&output_path).unwrap();
        let spec = reader.spec();
        assert_eq!(spec.channels, 1);
        assert_eq!(spec.sample_rate, 22050);
        // Truncated to the one-second voice track
        assert_eq!(reader.len(), 22050);
    }
}
