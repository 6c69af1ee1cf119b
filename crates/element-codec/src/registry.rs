use std::collections::HashMap;
use std::sync::LazyLock;

use tracing::trace;

use crate::decentlab;
use crate::error::DecodeError;
use crate::layout::ProtocolLayout;
use crate::model::DeviceModel;
use crate::value::Decoded;

/// Version byte, device id, sensor flags.
const HEADER_LEN: usize = 5;

static BUILTIN: LazyLock<Registry> = LazyLock::new(Registry::with_builtin);

/// Layouts keyed by `(model, protocol version)`.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    layouts: HashMap<(DeviceModel, u8), ProtocolLayout>,
}

impl Registry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every built-in Decentlab layout.
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        for layout in decentlab::LAYOUTS {
            registry.register(*layout);
        }
        registry
    }

    /// Process-wide shared instance of [`Registry::with_builtin`].
    pub fn builtin() -> &'static Self {
        &BUILTIN
    }

    /// Add or replace the layout for `(layout.model, layout.version)`.
    pub fn register(&mut self, layout: ProtocolLayout) {
        self.layouts.insert((layout.model, layout.version), layout);
    }

    pub fn layout(&self, model: DeviceModel, version: u8) -> Option<&ProtocolLayout> {
        self.layouts.get(&(model, version))
    }

    pub fn supports(&self, model: DeviceModel) -> bool {
        self.layouts.keys().any(|(m, _)| *m == model)
    }

    /// Protocol versions known for `model`, ascending.
    pub fn versions(&self, model: DeviceModel) -> Vec<u8> {
        let mut versions: Vec<u8> = self
            .layouts
            .keys()
            .filter(|(m, _)| *m == model)
            .map(|(_, v)| *v)
            .collect();
        versions.sort_unstable();
        versions
    }

    /// Decode one payload.
    ///
    /// Order of checks: model known, header complete, caller's expected
    /// version, layout for the embedded version, then the flagged blocks.
    pub fn decode(
        &self,
        model: DeviceModel,
        payload: &[u8],
        expected_version: Option<u8>,
    ) -> Result<Decoded, DecodeError> {
        if !self.supports(model) {
            return Err(DecodeError::UnsupportedModel(model.to_string()));
        }

        let mut reader = WordReader::new(payload);
        reader.require(HEADER_LEN)?;
        let version = reader.u8()?;
        let device_id = reader.u16()?;
        let flags = reader.u16()?;

        if let Some(expected) = expected_version {
            if expected != version {
                return Err(DecodeError::VersionMismatch {
                    embedded: version,
                    expected,
                });
            }
        }

        let layout = self
            .layout(model, version)
            .ok_or_else(|| DecodeError::UnsupportedVersion {
                model: model.to_string(),
                version,
            })?;

        trace!(%model, version, device_id, flags, "decoding payload");

        let mut decoded = Decoded::with_header(device_id, version);
        for (bit, block) in layout.blocks.iter().enumerate() {
            if !flag_set(flags, bit) {
                continue;
            }
            let words = reader.words(block.words)?;
            for (channel, value) in block.evaluate(&words) {
                let value = value.ok_or_else(|| DecodeError::InvalidLayout {
                    model: model.to_string(),
                    channel: channel.name,
                })?;
                decoded.push(channel.name, channel.unit, value);
            }
        }

        Ok(decoded)
    }
}

fn flag_set(flags: u16, bit: usize) -> bool {
    u32::try_from(bit)
        .ok()
        .and_then(|shift| flags.checked_shr(shift))
        .is_some_and(|shifted| shifted & 1 == 1)
}

/// Big-endian cursor over a payload.
struct WordReader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> WordReader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    /// Fail unless `len` more bytes are available.
    fn require(&self, len: usize) -> Result<(), DecodeError> {
        let needed = self.pos + len;
        if needed > self.bytes.len() {
            return Err(DecodeError::Truncated {
                needed,
                actual: self.bytes.len(),
            });
        }
        Ok(())
    }

    fn take<const N: usize>(&mut self) -> Result<[u8; N], DecodeError> {
        self.require(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(&self.bytes[self.pos..self.pos + N]);
        self.pos += N;
        Ok(out)
    }

    fn u8(&mut self) -> Result<u8, DecodeError> {
        let [byte] = self.take::<1>()?;
        Ok(byte)
    }

    fn u16(&mut self) -> Result<u16, DecodeError> {
        Ok(u16::from_be_bytes(self.take::<2>()?))
    }

    fn words(&mut self, count: usize) -> Result<Vec<u16>, DecodeError> {
        self.require(count * 2)?;
        (0..count).map(|_| self.u16()).collect()
    }
}
