// ── Declarative payload layouts ──
//
// A layout lists sensor blocks in flag-bit order. Block `i` is present in a
// payload only when bit `i` of the header flags is set; present blocks are
// consumed back to back as big-endian 16-bit words. Channels interpret the
// words of their own block only.

use crate::model::DeviceModel;

/// How a single 16-bit word is turned into an integer before scaling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// Plain unsigned word.
    Unsigned,
    /// Offset-binary signed word: `word - 0x8000`.
    Offset,
}

impl Encoding {
    fn raw(self, word: u16) -> f64 {
        match self {
            Self::Unsigned => f64::from(word),
            Self::Offset => f64::from(i32::from(word) - 0x8000),
        }
    }
}

/// Conversion producing a channel value from its block's words.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Conversion {
    /// `factor * raw / divisor + offset`.
    Linear {
        word: usize,
        encoding: Encoding,
        factor: f64,
        divisor: f64,
        offset: f64,
    },
    /// Bridge voltage ratio from a 24-bit ADC reading that spans two words,
    /// low word first: `((low + high * 65536) / 8388608 - 1) / 2`.
    BridgeRatio { low: usize, high: usize },
    /// Computed from channels of the same block once the direct ones are known.
    Derived(Derivation),
}

/// Non-linear conversions over already-decoded channels.
///
/// The indices refer to channel positions within the block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Derivation {
    /// Thermistor resistance in a divider: `numerator / ratio - series`.
    Resistance {
        ratio: usize,
        numerator: f64,
        series: f64,
    },
    /// Steinhart–Hart fit, result in °C:
    /// `1 / (a + b·ln R + c·(ln R)³) - 273.15`.
    SteinhartHart {
        resistance: usize,
        a: f64,
        b: f64,
        c: f64,
    },
}

const KELVIN_OFFSET: f64 = 273.15;

impl Derivation {
    fn evaluate(self, values: &[Option<f64>]) -> Option<f64> {
        match self {
            Self::Resistance {
                ratio,
                numerator,
                series,
            } => {
                let ratio = values.get(ratio).copied().flatten()?;
                Some(numerator / ratio - series)
            }
            Self::SteinhartHart {
                resistance,
                a,
                b,
                c,
            } => {
                let ln_r = values.get(resistance).copied().flatten()?.ln();
                Some(1.0 / (a + b * ln_r + c * ln_r.powf(3.0)) - KELVIN_OFFSET)
            }
        }
    }
}

impl Conversion {
    /// Evaluate a direct conversion. `None` for derived channels or when the
    /// layout points outside the block.
    fn direct(self, words: &[u16]) -> Option<f64> {
        match self {
            Self::Linear {
                word,
                encoding,
                factor,
                divisor,
                offset,
            } => {
                let raw = encoding.raw(*words.get(word)?);
                Some(factor * raw / divisor + offset)
            }
            Self::BridgeRatio { low, high } => {
                let low = f64::from(*words.get(low)?);
                let high = f64::from(*words.get(high)?);
                Some(((low + high * 65536.0) / 8_388_608.0 - 1.0) / 2.0)
            }
            Self::Derived(_) => None,
        }
    }
}

/// One named output of a sensor block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Channel {
    pub name: &'static str,
    pub unit: Option<&'static str>,
    pub conversion: Conversion,
}

impl Channel {
    pub const fn linear(
        name: &'static str,
        unit: Option<&'static str>,
        word: usize,
        encoding: Encoding,
        divisor: f64,
    ) -> Self {
        Self {
            name,
            unit,
            conversion: Conversion::Linear {
                word,
                encoding,
                factor: 1.0,
                divisor,
                offset: 0.0,
            },
        }
    }
}

/// A group of channels gated by one flag bit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorBlock {
    /// Number of 16-bit words the block occupies when present.
    pub words: usize,
    pub channels: &'static [Channel],
}

impl SensorBlock {
    /// Evaluate every channel of the block: direct conversions first, then
    /// derived ones in declaration order. Results come back in channel order.
    pub(crate) fn evaluate(&self, words: &[u16]) -> Vec<(&'static Channel, Option<f64>)> {
        let mut values: Vec<Option<f64>> = self
            .channels
            .iter()
            .map(|channel| channel.conversion.direct(words))
            .collect();

        for (idx, channel) in self.channels.iter().enumerate() {
            if let Conversion::Derived(derivation) = channel.conversion {
                let value = derivation.evaluate(&values);
                if let Some(slot) = values.get_mut(idx) {
                    *slot = value;
                }
            }
        }

        self.channels.iter().zip(values).collect()
    }
}

/// Complete description of one protocol version of one model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProtocolLayout {
    pub model: DeviceModel,
    pub version: u8,
    pub blocks: &'static [SensorBlock],
}
