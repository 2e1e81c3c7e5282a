//! Synthesized audio cues.
//!
//! Tones are short sine waves generated sample by sample at 44.1kHz, with
//! the amplitude quantized through a signed byte at a low volume ceiling.
//! Playback is synchronous: the caller stalls for roughly the tone's
//! duration while the sink drains.

use std::io::{stdout, Write};
use std::time::Duration;

use anyhow::Result;
use log::warn;
use rodio::{OutputStream, Sink, Source};

pub const SAMPLE_RATE: u32 = 44_100;

const VOLUME_CEILING: f64 = 100.0;

/// Notification seam between the game rules and the audio device.
pub trait Chime {
    fn play_tone(&self, freq_hz: u32, duration_ms: u64);
}

/// Plays tones on the default audio output, opening the device anew for
/// every call and blocking until the tone has drained. When no usable
/// device exists it degrades to the terminal bell.
pub struct Speaker;

impl Chime for Speaker {
    fn play_tone(&self, freq_hz: u32, duration_ms: u64) {
        if let Err(err) = try_play(freq_hz, duration_ms) {
            warn!("audio output failed ({}), falling back to the bell", err);
            bell();
        }
    }
}

fn try_play(freq_hz: u32, duration_ms: u64) -> Result<()> {
    let (_stream, handle) = OutputStream::try_default()?;
    let sink = Sink::try_new(&handle)?;
    sink.append(Tone::new(freq_hz, duration_ms));
    sink.sleep_until_end();
    Ok(())
}

fn bell() {
    let mut out = stdout();
    let _ = out.write_all(b"\x07");
    let _ = out.flush();
}

/// A finite mono sine source.
pub struct Tone {
    freq_hz: u32,
    duration_ms: u64,
    sample: u32,
    total: u32,
}

impl Tone {
    pub fn new(freq_hz: u32, duration_ms: u64) -> Self {
        let total = (duration_ms * SAMPLE_RATE as u64 / 1000) as u32;
        Tone { freq_hz, duration_ms, sample: 0, total }
    }
}

impl Iterator for Tone {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        if self.sample >= self.total {
            return None;
        }

        let angle = 2.0 * std::f64::consts::PI * self.sample as f64 * self.freq_hz as f64
            / SAMPLE_RATE as f64;
        self.sample += 1;

        let quantized = (angle.sin() * VOLUME_CEILING) as i8;
        Some(quantized as f32 / i8::MAX as f32)
    }
}

impl Source for Tone {
    fn current_frame_len(&self) -> Option<usize> {
        Some((self.total - self.sample) as usize)
    }

    fn channels(&self) -> u16 {
        1
    }

    fn sample_rate(&self) -> u32 {
        SAMPLE_RATE
    }

    fn total_duration(&self) -> Option<Duration> {
        Some(Duration::from_millis(self.duration_ms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_count_matches_the_duration() {
        assert_eq!(Tone::new(900, 100).count(), 4410);
        assert_eq!(Tone::new(200, 400).count(), 17640);
    }

    #[test]
    fn samples_are_byte_quantized_under_the_volume_ceiling() {
        let samples: Vec<f32> = Tone::new(440, 10).collect();

        assert_eq!(samples[0], 0.0);
        for s in samples {
            let steps = s * i8::MAX as f32;
            assert!((steps - steps.round()).abs() < 1e-4);
            assert!(steps.round().abs() <= VOLUME_CEILING as f32);
        }
    }

    #[test]
    fn frame_len_counts_down_with_consumed_samples() {
        let mut tone = Tone::new(900, 100);
        assert_eq!(tone.current_frame_len(), Some(4410));

        tone.next();
        tone.next();
        assert_eq!(tone.current_frame_len(), Some(4408));
        assert_eq!(tone.total_duration(), Some(Duration::from_millis(100)));
    }
}
