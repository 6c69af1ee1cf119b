// Built-in layouts, transcribed from Decentlab's published payload decoders.
//
// Every Decentlab payload starts with the same 5-byte header:
// protocol version (u8), device id (u16 BE), sensor flags (u16 BE).

use crate::layout::{Channel, Conversion, Derivation, Encoding, ProtocolLayout, SensorBlock};
use crate::model::DeviceModel;

const BATTERY: SensorBlock = SensorBlock {
    words: 1,
    channels: &[Channel::linear(
        "Battery voltage",
        Some("V"),
        0,
        Encoding::Unsigned,
        1000.0,
    )],
};

// ── DL-SHT35 ────────────────────────────────────────────────────────

pub const SHT35_V2: ProtocolLayout = ProtocolLayout {
    model: DeviceModel::Sht35,
    version: 2,
    blocks: &[
        SensorBlock {
            words: 2,
            channels: &[
                Channel {
                    name: "Air temperature",
                    unit: Some("°C"),
                    conversion: Conversion::Linear {
                        word: 0,
                        encoding: Encoding::Unsigned,
                        factor: 175.0,
                        divisor: 65535.0,
                        offset: -45.0,
                    },
                },
                Channel {
                    name: "Air humidity",
                    unit: Some("%"),
                    conversion: Conversion::Linear {
                        word: 1,
                        encoding: Encoding::Unsigned,
                        factor: 100.0,
                        divisor: 65535.0,
                        offset: 0.0,
                    },
                },
            ],
        },
        BATTERY,
    ],
};

// ── DL-BLG ──────────────────────────────────────────────────────────

pub const BLG_V2: ProtocolLayout = ProtocolLayout {
    model: DeviceModel::Blg,
    version: 2,
    blocks: &[
        SensorBlock {
            words: 2,
            channels: &[
                Channel {
                    name: "Voltage ratio",
                    unit: None,
                    conversion: Conversion::BridgeRatio { low: 0, high: 1 },
                },
                Channel {
                    name: "Thermistor resistance",
                    unit: Some("Ω"),
                    conversion: Conversion::Derived(Derivation::Resistance {
                        ratio: 0,
                        numerator: 1000.0,
                        series: 41000.0,
                    }),
                },
                Channel {
                    name: "Temperature",
                    unit: Some("°C"),
                    conversion: Conversion::Derived(Derivation::SteinhartHart {
                        resistance: 1,
                        a: 0.000_827_111_1,
                        b: 0.000_208_802,
                        c: 0.000_000_080_592,
                    }),
                },
            ],
        },
        BATTERY,
    ],
};

// ── DL-ATM41 ────────────────────────────────────────────────────────

const WIND: Option<&str> = Some("m⋅s⁻¹");
const DEGREES: Option<&str> = Some("°");

pub const ATM41_V2: ProtocolLayout = ProtocolLayout {
    model: DeviceModel::Atm41,
    version: 2,
    blocks: &[
        SensorBlock {
            words: 17,
            channels: &[
                Channel::linear("Solar radiation", Some("W⋅m⁻²"), 0, Encoding::Offset, 1.0),
                Channel::linear("Precipitation", Some("mm"), 1, Encoding::Offset, 1000.0),
                Channel::linear("Lightning strike count", None, 2, Encoding::Offset, 1.0),
                Channel::linear(
                    "Lightning average distance",
                    Some("km"),
                    3,
                    Encoding::Offset,
                    1.0,
                ),
                Channel::linear("Wind speed", WIND, 4, Encoding::Offset, 100.0),
                Channel::linear("Wind direction", DEGREES, 5, Encoding::Offset, 10.0),
                Channel::linear("Maximum wind speed", WIND, 6, Encoding::Offset, 100.0),
                Channel::linear("Air temperature", Some("°C"), 7, Encoding::Offset, 10.0),
                Channel::linear("Vapor pressure", Some("kPa"), 8, Encoding::Offset, 100.0),
                Channel::linear(
                    "Atmospheric pressure",
                    Some("kPa"),
                    9,
                    Encoding::Offset,
                    100.0,
                ),
                Channel::linear("Relative humidity", Some("%"), 10, Encoding::Offset, 10.0),
                Channel::linear(
                    "Sensor temperature (internal)",
                    Some("°C"),
                    11,
                    Encoding::Offset,
                    10.0,
                ),
                Channel::linear("X orientation angle", DEGREES, 12, Encoding::Offset, 10.0),
                Channel::linear("Y orientation angle", DEGREES, 13, Encoding::Offset, 10.0),
                Channel::linear("Compass heading", DEGREES, 14, Encoding::Offset, 1.0),
                Channel::linear("North wind speed", WIND, 15, Encoding::Offset, 100.0),
                Channel::linear("East wind speed", WIND, 16, Encoding::Offset, 100.0),
            ],
        },
        BATTERY,
    ],
};

/// All built-in layouts.
pub const LAYOUTS: &[ProtocolLayout] = &[SHT35_V2, BLG_V2, ATM41_V2];
