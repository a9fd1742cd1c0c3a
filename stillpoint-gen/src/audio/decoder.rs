//! Audio decoding
//!
//! Decodes audio files to mono f32 PCM samples for the mixing step.
//! Uses symphonia for format-agnostic decoding (MP3, WAV, FLAC, etc.)

use anyhow::{Context, Result};
use std::path::Path;
use symphonia::core::audio::{AudioBufferRef, Signal};
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::conv::FromSample;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use symphonia::core::sample::Sample;

/// Decoded audio result
#[derive(Debug)]
pub struct DecodedAudio {
    /// Mono audio samples (f32, range [-1.0, 1.0])
    pub samples: Vec<f32>,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Original channel count
    pub channels: usize,
}

impl DecodedAudio {
    /// Duration in seconds
    pub fn duration_seconds(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }
}

/// Decode an audio file to mono f32 PCM samples
///
/// Probes the container format, decodes every packet of the default
/// audio track, and averages channels down to mono.
pub fn decode_audio_file(file_path: &Path) -> Result<DecodedAudio> {
    tracing::debug!(path = %file_path.display(), "Decoding audio file");

    let file = std::fs::File::open(file_path)
        .with_context(|| format!("Failed to open audio file: {}", file_path.display()))?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    // Format hint from the file extension
    let mut hint = Hint::new();
    if let Some(extension) = file_path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(extension);
    }

    let probed = symphonia::default::get_probe()
        .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
        .with_context(|| format!("Failed to probe audio file: {}", file_path.display()))?;

    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .context("No audio track found in file")?;

    let track_id = track.id;
    let sample_rate = track
        .codec_params
        .sample_rate
        .context("Sample rate unknown")?;
    let channels = track.codec_params.channels.context("Channels unknown")?;
    let channel_count = channels.count();

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .with_context(|| format!("Failed to create decoder for: {}", file_path.display()))?;

    let mut all_samples: Vec<f32> = Vec::new();

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(symphonia::core::errors::Error::IoError(e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                // End of stream
                break;
            }
            Err(e) => {
                return Err(anyhow::anyhow!("Error reading packet: {}", e));
            }
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = decoder
            .decode(&packet)
            .with_context(|| format!("Failed to decode packet in: {}", file_path.display()))?;

        all_samples.extend_from_slice(&convert_to_mono_f32(&decoded));
    }

    tracing::debug!(
        path = %file_path.display(),
        total_samples = all_samples.len(),
        sample_rate = sample_rate,
        "Audio decoding complete"
    );

    Ok(DecodedAudio {
        samples: all_samples,
        sample_rate,
        channels: channel_count,
    })
}

/// Convert an audio buffer to mono f32 samples, averaging channels
fn convert_to_mono_f32(decoded: &AudioBufferRef) -> Vec<f32> {
    fn downmix<S: Sample + Copy>(
        buf: &symphonia::core::audio::AudioBuffer<S>,
    ) -> Vec<f32>
    where
        f32: FromSample<S>,
    {
        let num_channels = buf.spec().channels.count();
        let num_frames = buf.frames();
        let mut mono = Vec::with_capacity(num_frames);

        for frame_idx in 0..num_frames {
            let mut sum = 0.0f32;
            for ch in 0..num_channels {
                sum += f32::from_sample(buf.chan(ch)[frame_idx]);
            }
            mono.push(sum / num_channels as f32);
        }

        mono
    }

    match decoded {
        AudioBufferRef::U8(buf) => downmix(buf),
        AudioBufferRef::U16(buf) => downmix(buf),
        AudioBufferRef::U24(buf) => downmix(buf),
        AudioBufferRef::U32(buf) => downmix(buf),
        AudioBufferRef::S8(buf) => downmix(buf),
        AudioBufferRef::S16(buf) => downmix(buf),
        AudioBufferRef::S24(buf) => downmix(buf),
        AudioBufferRef::S32(buf) => downmix(buf),
        AudioBufferRef::F32(buf) => downmix(buf),
        AudioBufferRef::F64(buf) => downmix(buf),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_missing_file_fails() {
        let result = decode_audio_file(Path::new("/nonexistent/file.mp3"));
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Failed to open audio file"));
    }

    #[test]
    fn decode_generated_wav() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tone.wav");

        let spec = hound::WavSpec {
            channels: 2,
            sample_rate: 22050,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(&path, spec).unwrap();
        for i in 0..22050u32 {
            let sample = ((i as f32 * 0.05).sin() * i16::MAX as f32 * 0.5) as i16;
            writer.write_sample(sample).unwrap(); // left
            writer.write_sample(sample).unwrap(); // right
        }
        writer.finalize().unwrap();

        let decoded = decode_audio_file(&path).unwrap();
        assert_eq!(decoded.sample_rate, 22050);
        assert_eq!(decoded.channels, 2);
        // One second of stereo input downmixes to one second of mono
        assert_eq!(decoded.samples.len(), 22050);
        assert!((decoded.duration_seconds() - 1.0).abs() < 0.01);
    }
}
