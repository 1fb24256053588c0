use fundsp::prelude::*;
use rodio::buffer::SamplesBuffer;
use rodio::{OutputStream, OutputStreamBuilder, Sink, Source, StreamError};

const SAMPLE_RATE: u32 = 44_100;

const MUSIC_STEP: f64 = 0.22;
#[rustfmt::skip]
const MUSIC_NOTES: [f64; 16] = [
    392.0, 440.0, 523.3, 440.0, 392.0, 329.6, 293.7, 329.6,
    392.0, 523.3, 587.3, 523.3, 440.0, 392.0, 329.6, 293.7,
];

/// Owns the output stream and the looping music sink. Death cues play on
/// detached sinks; nothing here has backpressure.
pub struct Audio {
    stream: OutputStream,
    music: Sink,
}

impl Audio {
    pub fn new() -> Result<Self, StreamError> {
        let stream = OutputStreamBuilder::open_default_stream()?;
        let music = Sink::connect_new(stream.mixer());
        music.append(music_loop().repeat_infinite());
        Ok(Self { stream, music })
    }

    pub fn set_muted(&self, muted: bool) {
        if muted {
            self.music.pause();
        } else {
            self.music.play();
        }
    }

    pub fn play_death(&self) {
        let sink = Sink::connect_new(self.stream.mixer());
        sink.append(death_cue());
        sink.detach();
    }
}

// One bar of plucked triangle melody, rendered once and looped by rodio.
fn music_loop() -> SamplesBuffer {
    let freq = lfo(|t: f64| {
        let step = (t / MUSIC_STEP) as usize % MUSIC_NOTES.len();
        MUSIC_NOTES[step]
    });
    let pluck = lfo(|t: f64| lerp(0.10, 0.0, (t / MUSIC_STEP).fract()));
    let mut unit = (freq >> triangle()) * pluck;

    unit.set_sample_rate(SAMPLE_RATE as f64);
    let len = (MUSIC_STEP * MUSIC_NOTES.len() as f64 * SAMPLE_RATE as f64) as usize;
    let samples: Vec<f32> = (0..len).map(|_| unit.get_mono() as f32).collect();
    SamplesBuffer::new(1, SAMPLE_RATE, samples)
}

// Downward saw sweep under a fading gain, the classic splat.
fn death_cue() -> SamplesBuffer {
    let freq = lfo(|t: f64| xerp(660.0, 72.0, (t / 0.38).min(1.0)));
    let fade = lfo(|t: f64| lerp(0.20, 0.0, (t / 0.5).min(1.0)));
    let mut unit = (freq >> saw()) * fade;

    unit.set_sample_rate(SAMPLE_RATE as f64);
    let len = (0.5 * SAMPLE_RATE as f64) as usize;
    let samples: Vec<f32> = (0..len).map(|_| unit.get_mono() as f32).collect();
    SamplesBuffer::new(1, SAMPLE_RATE, samples)
}
