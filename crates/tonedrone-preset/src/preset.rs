//! Preset data model.

use serde::{Deserialize, Serialize};

/// Current preset schema version.
///
/// Single source of truth: the serializer's forward-compatibility gate, the
/// migration chain target, and [`crate::serializer::create_preset`] all read
/// this constant.
pub const PRESET_VERSION: u32 = 5;

/// Tempo filled in by the v2→v3 migration when a preset predates the
/// transport.
pub const DEFAULT_BPM: f64 = 120.0;

/// Lowest accepted tempo.
pub const MIN_BPM: f64 = 0.0;

/// Highest accepted tempo.
pub const MAX_BPM: f64 = 999.0;

/// Frequency of a polysynth appended by migration.
pub const DEFAULT_POLYSYNTH_FREQUENCY: f64 = 999.0;

/// Step count of a freshly created sequence.
pub const DEFAULT_SEQUENCE_STEPS: usize = 16;

/// Oscillator and polysynth waveforms supported by the audio graph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Waveform {
    /// Pure sine.
    #[default]
    Sine,
    /// Square wave.
    Square,
    /// Triangle wave.
    Triangle,
    /// Sawtooth wave.
    Sawtooth,
}

impl Waveform {
    /// Returns the waveform as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Waveform::Sine => "sine",
            Waveform::Square => "square",
            Waveform::Triangle => "triangle",
            Waveform::Sawtooth => "sawtooth",
        }
    }

    /// Returns all waveforms.
    pub fn all() -> &'static [Waveform] {
        &[
            Waveform::Sine,
            Waveform::Square,
            Waveform::Triangle,
            Waveform::Sawtooth,
        ]
    }
}

impl std::fmt::Display for Waveform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Waveform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sine" => Ok(Waveform::Sine),
            "square" => Ok(Waveform::Square),
            "triangle" => Ok(Waveform::Triangle),
            "sawtooth" => Ok(Waveform::Sawtooth),
            _ => Err(format!("unknown waveform: {}", s)),
        }
    }
}

/// Voice architecture of an oscillator: a single source or a detuned fat
/// stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OscillatorType {
    /// Single voice.
    Oscillator,
    /// Fat oscillator: `count` detuned voices spread across `spread` cents.
    Fat,
}

/// Filter response shapes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterType {
    /// Low-pass.
    #[default]
    Lowpass,
    /// High-pass.
    Highpass,
    /// Band-pass.
    Bandpass,
    /// Notch.
    Notch,
}

/// The root persisted and transported unit: a versioned, named snapshot of
/// the entire synthesizer configuration.
///
/// A typed `Preset` always carries the current schema version; historical
/// documents only exist as raw JSON until the serializer has migrated and
/// validated them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preset {
    /// Schema version; [`PRESET_VERSION`] for every in-memory preset.
    pub version: u32,

    /// Identity and bookkeeping.
    pub metadata: PresetMetadata,

    /// The full synthesizer configuration snapshot.
    pub state: PresetState,
}

/// Identity and bookkeeping for a preset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresetMetadata {
    /// Unique, opaque id. User presets carry a UUID; bundled presets carry
    /// the reserved `factory-` prefix.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Free-form description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// RFC 3339 creation timestamp.
    pub created: String,

    /// RFC 3339 timestamp of the last save, absent until the first one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified: Option<String>,
}

/// The complete synthesizer configuration at the current schema version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresetState {
    /// Drone oscillator bank and its step sequences.
    pub oscillators: OscillatorBankState,

    /// Polyphonic synth bank (schema v2+, two voices expected since v4).
    pub polysynths: PolySynthBankState,

    /// One parameter object per effect stage.
    pub effects: EffectsState,

    /// Send level in decibels from the dry signal into the effects bus.
    pub effects_bus_send: f64,

    /// Transport tempo (schema v3+), `0..=999`.
    pub bpm: f64,
}

impl Default for PresetState {
    fn default() -> Self {
        Self {
            oscillators: OscillatorBankState::default(),
            polysynths: PolySynthBankState::default(),
            effects: EffectsState::default(),
            effects_bus_send: -12.0,
            bpm: DEFAULT_BPM,
        }
    }
}

/// Global frequency bounds plus per-voice parameters.
///
/// `oscillators` and `sequences` are parallel arrays: the same index refers
/// to the same voice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OscillatorBankState {
    /// Lower bound of the frequency sliders, Hz.
    pub min_freq: f64,

    /// Upper bound of the frequency sliders, Hz.
    pub max_freq: f64,

    /// Per-voice oscillator parameters.
    #[serde(default)]
    pub oscillators: Vec<OscillatorParams>,

    /// Per-voice step sequences, parallel to `oscillators`.
    #[serde(default)]
    pub sequences: Vec<Sequence>,
}

impl Default for OscillatorBankState {
    fn default() -> Self {
        Self {
            min_freq: 40.0,
            max_freq: 1500.0,
            oscillators: Vec::new(),
            sequences: Vec::new(),
        }
    }
}

/// One drone voice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OscillatorParams {
    /// Frequency, Hz.
    pub frequency: f64,

    /// Waveform.
    pub waveform: Waveform,

    /// Level, decibels.
    pub volume: f64,

    /// Stereo position, `-1..=1`.
    pub pan: f64,

    /// Voice architecture; absent unless the fat-oscillator feature set it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oscillator_type: Option<OscillatorType>,

    /// Fat-oscillator voice count.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,

    /// Fat-oscillator detune spread, cents.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spread: Option<f64>,
}

impl Default for OscillatorParams {
    fn default() -> Self {
        Self {
            frequency: 220.0,
            waveform: Waveform::Sine,
            volume: -12.0,
            pan: 0.0,
            oscillator_type: None,
            count: None,
            spread: None,
        }
    }
}

/// A step sequence for one voice. `steps[i] == true` triggers a note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Sequence {
    /// Frequency the triggered note plays at, Hz.
    pub frequency: f64,

    /// Trigger pattern, one flag per step.
    pub steps: Vec<bool>,
}

impl Default for Sequence {
    fn default() -> Self {
        Self {
            frequency: 220.0,
            steps: vec![false; DEFAULT_SEQUENCE_STEPS],
        }
    }
}

impl Sequence {
    /// Creates a silent sequence of [`DEFAULT_SEQUENCE_STEPS`] steps.
    pub fn silent(frequency: f64) -> Self {
        Self {
            frequency,
            steps: vec![false; DEFAULT_SEQUENCE_STEPS],
        }
    }
}

/// The polyphonic synth bank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolySynthBankState {
    /// Per-synth parameters. Two entries expected since schema v4.
    #[serde(default)]
    pub polysynths: Vec<PolySynthParams>,
}

impl Default for PolySynthBankState {
    /// The default two-polysynth state installed by the v1→v2 migration.
    fn default() -> Self {
        Self {
            polysynths: vec![PolySynthParams::default(), PolySynthParams::default()],
        }
    }
}

/// One polyphonic synth voice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PolySynthParams {
    /// Base frequency, Hz.
    pub frequency: f64,

    /// Waveform.
    pub waveform: Waveform,

    /// Level, decibels.
    pub volume: f64,

    /// Stereo position (schema v5+), `-1..=1`.
    pub pan: f64,

    /// Envelope attack, seconds.
    pub attack: f64,

    /// Envelope decay, seconds.
    pub decay: f64,

    /// Envelope sustain level, `0..=1`.
    pub sustain: f64,

    /// Envelope release, seconds.
    pub release: f64,
}

impl Default for PolySynthParams {
    fn default() -> Self {
        Self {
            frequency: DEFAULT_POLYSYNTH_FREQUENCY,
            waveform: Waveform::Sine,
            volume: -10.0,
            pan: 0.0,
            attack: 0.05,
            decay: 0.2,
            sustain: 0.5,
            release: 1.5,
        }
    }
}

/// One parameter object per effect stage, in signal order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectsState {
    /// LFO-swept filter at the head of the bus.
    pub auto_filter: AutoFilterParams,

    /// Sample-rate/bit-depth reducer.
    pub bit_crusher: BitCrusherParams,

    /// Chebyshev waveshaper.
    pub chebyshev: ChebyshevParams,

    /// Granular micro-looper.
    pub microlooper: MicrolooperParams,

    /// Static filter after the looper.
    pub after_filter: AfterFilterParams,

    /// Feedback delay at the tail of the bus.
    pub delay: DelayParams,
}

/// LFO-swept filter parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AutoFilterParams {
    /// LFO rate, Hz.
    pub frequency: f64,

    /// Filter cutoff the sweep starts from, Hz.
    pub base_frequency: f64,

    /// Sweep width above `base_frequency`, octaves.
    pub octaves: f64,

    /// LFO depth, `0..=1`.
    pub depth: f64,

    /// Dry/wet mix, `0..=1`.
    pub wet: f64,
}

impl Default for AutoFilterParams {
    fn default() -> Self {
        Self {
            frequency: 1.0,
            base_frequency: 200.0,
            octaves: 2.6,
            depth: 1.0,
            wet: 0.5,
        }
    }
}

/// Bit crusher parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BitCrusherParams {
    /// Bit depth the signal is quantized to.
    pub bits: f64,

    /// Dry/wet mix, `0..=1`.
    pub wet: f64,
}

impl Default for BitCrusherParams {
    fn default() -> Self {
        Self {
            bits: 4.0,
            wet: 0.0,
        }
    }
}

/// Chebyshev waveshaper parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChebyshevParams {
    /// Polynomial order; higher orders add harsher harmonics.
    pub order: u32,

    /// Dry/wet mix, `0..=1`.
    pub wet: f64,
}

impl Default for ChebyshevParams {
    fn default() -> Self {
        Self {
            order: 2,
            wet: 0.0,
        }
    }
}

/// Granular micro-looper parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MicrolooperParams {
    /// Captured loop length, seconds.
    pub loop_length: f64,

    /// Feedback amount, `0..=1`.
    pub feedback: f64,

    /// Dry/wet mix, `0..=1`.
    pub wet: f64,
}

impl Default for MicrolooperParams {
    fn default() -> Self {
        Self {
            loop_length: 0.25,
            feedback: 0.35,
            wet: 0.0,
        }
    }
}

/// Static filter parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AfterFilterParams {
    /// Cutoff, Hz.
    pub frequency: f64,

    /// Response shape.
    #[serde(rename = "type")]
    pub filter_type: FilterType,

    /// Slope, dB/octave. The audio graph accepts -12, -24, -48 and -96.
    pub rolloff: i32,

    /// Resonance.
    #[serde(rename = "Q")]
    pub q: f64,
}

impl Default for AfterFilterParams {
    fn default() -> Self {
        Self {
            frequency: 2000.0,
            filter_type: FilterType::Lowpass,
            rolloff: -12,
            q: 1.0,
        }
    }
}

/// Feedback delay parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DelayParams {
    /// Delay time, seconds.
    pub delay_time: f64,

    /// Feedback amount, `0..=1`.
    pub feedback: f64,

    /// Dry/wet mix, `0..=1`.
    pub wet: f64,
}

impl Default for DelayParams {
    fn default() -> Self {
        Self {
            delay_time: 0.25,
            feedback: 0.4,
            wet: 0.0,
        }
    }
}
