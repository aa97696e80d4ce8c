//! Menu and game sound cues, synthesised at startup so the client ships
//! without asset files.

use macroquad::audio::{self, PlaySoundParams, Sound, load_sound_from_bytes};
use tracing::warn;

use crate::menu::Cue;
use crate::settings::Settings;

const SAMPLE_RATE: u32 = 44_100;
const FADE_SECONDS: f32 = 0.005; // avoids clicks at the edges

/// A mono sine beep.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Tone {
    pub frequency_hz: f32,
    pub seconds: f32,
    pub level: f32,
}

impl Tone {
    pub const fn new(frequency_hz: f32, seconds: f32, level: f32) -> Self {
        Self { frequency_hz, seconds, level }
    }

    pub fn sample_count(&self) -> u32 { (self.seconds.max(0.0) * SAMPLE_RATE as f32) as u32 }

    /// Encodes the tone as a 16-bit PCM WAV file.
    pub fn to_wav(&self) -> Vec<u8> {
        let samples = self.sample_count();
        let block_align: u16 = 2;
        let data_size = samples * block_align as u32;

        let mut wav = Vec::with_capacity(44 + data_size as usize);
        wav.extend_from_slice(b"RIFF");
        wav.extend_from_slice(&(36 + data_size).to_le_bytes());
        wav.extend_from_slice(b"WAVE");
        wav.extend_from_slice(b"fmt ");
        wav.extend_from_slice(&16u32.to_le_bytes());
        wav.extend_from_slice(&1u16.to_le_bytes()); // PCM
        wav.extend_from_slice(&1u16.to_le_bytes()); // mono
        wav.extend_from_slice(&SAMPLE_RATE.to_le_bytes());
        wav.extend_from_slice(&(SAMPLE_RATE * block_align as u32).to_le_bytes());
        wav.extend_from_slice(&block_align.to_le_bytes());
        wav.extend_from_slice(&16u16.to_le_bytes());
        wav.extend_from_slice(b"data");
        wav.extend_from_slice(&data_size.to_le_bytes());

        let amplitude = self.level.clamp(0.0, 1.0) * 0.7 * i16::MAX as f32;
        let fade = (FADE_SECONDS * SAMPLE_RATE as f32).max(1.0);
        for n in 0..samples {
            let t = n as f32 / SAMPLE_RATE as f32;
            let edge = (n.min(samples - 1 - n) as f32 / fade).min(1.0);
            let sample = amplitude * edge * (std::f32::consts::TAU * self.frequency_hz * t).sin();
            wav.extend_from_slice(&(sample as i16).to_le_bytes());
        }
        wav
    }
}

pub fn tone_for(cue: Cue) -> Tone {
    match cue {
        Cue::Move => Tone::new(660.0, 0.04, 0.4),
        Cue::Select => Tone::new(880.0, 0.08, 0.6),
        Cue::Adjust => Tone::new(520.0, 0.05, 0.5),
        Cue::Back => Tone::new(220.0, 0.10, 0.6),
    }
}

/// Loaded cue sounds.
pub struct Sfx {
    sounds: Vec<(Cue, Sound)>,
}

impl Sfx {
    /// Cues whose sound fails to decode stay silent.
    pub async fn load() -> Self {
        let mut sounds = Vec::new();
        for cue in [Cue::Move, Cue::Select, Cue::Adjust, Cue::Back] {
            match load_sound_from_bytes(&tone_for(cue).to_wav()).await {
                Ok(sound) => sounds.push((cue, sound)),
                Err(err) => warn!(?cue, error = ?err, "could not load cue sound"),
            }
        }
        Self { sounds }
    }

    pub fn play(&self, cue: Cue, settings: &Settings) {
        let volume = settings.sfx_gain();
        if volume <= 0.0 {
            return;
        }
        if let Some((_, sound)) = self.sounds.iter().find(|(c, _)| *c == cue) {
            audio::play_sound(sound, PlaySoundParams { looped: false, volume });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn u32_at(bytes: &[u8], at: usize) -> u32 {
        u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
    }

    #[test]
    fn wav_header_describes_mono_pcm() {
        let tone = Tone::new(440.0, 0.1, 0.5);
        let wav = tone.to_wav();

        assert_eq!(&wav[0..4], b"RIFF");
        assert_eq!(&wav[8..12], b"WAVE");
        assert_eq!(&wav[36..40], b"data");
        assert_eq!(u32_at(&wav, 24), SAMPLE_RATE);
        assert_eq!(u32_at(&wav, 40), tone.sample_count() * 2);
        assert_eq!(u32_at(&wav, 4) as usize, wav.len() - 8);
    }

    #[test]
    fn tone_starts_silent_and_stays_in_range() {
        let wav = Tone::new(440.0, 0.05, 2.0).to_wav();
        let samples: Vec<i16> = wav[44..].chunks(2).map(|c| i16::from_le_bytes([c[0], c[1]])).collect();

        assert_eq!(samples[0], 0);
        let peak = samples.iter().map(|s| s.unsigned_abs()).max().unwrap_or(0);
        assert!(peak > 0);
        assert!(peak as f32 <= 0.7 * i16::MAX as f32 + 1.0);
    }

    #[test]
    fn empty_tone_is_header_only() {
        assert_eq!(Tone::new(440.0, 0.0, 1.0).to_wav().len(), 44);
    }

    #[test]
    fn every_cue_has_an_audible_tone() {
        for cue in [Cue::Move, Cue::Select, Cue::Adjust, Cue::Back] {
            let tone = tone_for(cue);
            assert!(tone.sample_count() > 0);
            assert!(tone.level > 0.0);
        }
    }
}
