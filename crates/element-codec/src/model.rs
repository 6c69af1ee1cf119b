use std::str::FromStr;

use strum::{Display, EnumIter};

use crate::error::DecodeError;

/// Sensor models with a built-in payload layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
#[non_exhaustive]
pub enum DeviceModel {
    /// Air temperature and humidity sensor.
    #[strum(to_string = "DL-SHT35")]
    Sht35,
    /// Black-globe thermometer (thermistor on a resistive bridge).
    #[strum(to_string = "DL-BLG")]
    Blg,
    /// ATMOS 41 all-in-one weather station.
    #[strum(to_string = "DL-ATM41")]
    Atm41,
}

impl DeviceModel {
    pub fn description(self) -> &'static str {
        match self {
            Self::Sht35 => "air temperature and humidity",
            Self::Blg => "black globe temperature",
            Self::Atm41 => "weather station",
        }
    }
}

/// Accepts `DL-SHT35`, `dl-sht35`, `SHT35` and `sht35` alike.
impl FromStr for DeviceModel {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase();
        let bare = normalized.strip_prefix("DL-").unwrap_or(&normalized);
        match bare {
            "SHT35" => Ok(Self::Sht35),
            "BLG" => Ok(Self::Blg),
            "ATM41" => Ok(Self::Atm41),
            _ => Err(DecodeError::UnsupportedModel(s.to_owned())),
        }
    }
}
