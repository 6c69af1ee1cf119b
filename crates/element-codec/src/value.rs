use indexmap::IndexMap;
use serde::Serialize;

pub const DEVICE_ID: &str = "Device ID";
pub const PROTOCOL_VERSION: &str = "Protocol version";

/// A unit-tagged physical quantity. `unit` is `None` for counts and ratios.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Measurement {
    pub unit: Option<&'static str>,
    pub value: f64,
}

/// One decoded output: a bare header integer or a measurement.
///
/// Serializes untagged, so a decoded payload renders as
/// `{"Device ID": 21670, "Air temperature": {"unit": "°C", "value": 37.2}}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Field {
    Integer(u32),
    Measurement(Measurement),
}

impl Field {
    pub fn value(&self) -> f64 {
        match self {
            Self::Integer(n) => f64::from(*n),
            Self::Measurement(m) => m.value,
        }
    }

    pub fn unit(&self) -> Option<&'static str> {
        match self {
            Self::Integer(_) => None,
            Self::Measurement(m) => m.unit,
        }
    }
}

/// Decoder output, keyed by human field name in decode order
/// (header fields first, then layout order).
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct Decoded {
    fields: IndexMap<&'static str, Field>,
}

impl Decoded {
    pub(crate) fn with_header(device_id: u16, version: u8) -> Self {
        let mut fields = IndexMap::new();
        fields.insert(DEVICE_ID, Field::Integer(u32::from(device_id)));
        fields.insert(PROTOCOL_VERSION, Field::Integer(u32::from(version)));
        Self { fields }
    }

    pub(crate) fn push(&mut self, name: &'static str, unit: Option<&'static str>, value: f64) {
        self.fields
            .insert(name, Field::Measurement(Measurement { unit, value }));
    }

    pub fn get(&self, name: &str) -> Option<&Field> {
        self.fields.get(name)
    }

    /// Numeric value of a field, whether integer or measurement.
    pub fn value(&self, name: &str) -> Option<f64> {
        self.get(name).map(Field::value)
    }

    pub fn measurement(&self, name: &str) -> Option<&Measurement> {
        match self.get(name)? {
            Field::Measurement(m) => Some(m),
            Field::Integer(_) => None,
        }
    }

    pub fn device_id(&self) -> Option<u32> {
        match self.get(DEVICE_ID)? {
            Field::Integer(n) => Some(*n),
            Field::Measurement(_) => None,
        }
    }

    pub fn protocol_version(&self) -> Option<u32> {
        match self.get(PROTOCOL_VERSION)? {
            Field::Integer(n) => Some(*n),
            Field::Measurement(_) => None,
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Field)> {
        self.fields.iter().map(|(name, field)| (*name, field))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
