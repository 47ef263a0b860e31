use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::Error;

/// Primary property type of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RealEstateKind {
    Flat,
    House,
    Land,
}

impl RealEstateKind {
    pub const ALL: [RealEstateKind; 3] = [Self::Flat, Self::House, Self::Land];

    /// Only flats are broken down by room count. Land aggregates like a house.
    pub fn has_rooms(&self) -> bool {
        matches!(self, Self::Flat)
    }

    /// Path segment used by the statistics API.
    pub fn api_segment(&self) -> &'static str {
        match self {
            Self::Flat => "flats",
            Self::House => "houses",
            Self::Land => "lands",
        }
    }
}

impl std::fmt::Display for RealEstateKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Flat => write!(f, "flat"),
            Self::House => write!(f, "house"),
            Self::Land => write!(f, "land"),
        }
    }
}

impl FromStr for RealEstateKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "flat" | "flats" => Ok(Self::Flat),
            "house" | "houses" => Ok(Self::House),
            "land" | "lands" => Ok(Self::Land),
            _ => Err(Error::UnknownValue {
                what: "real-estate kind",
                value: s.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_kind() {
        assert_eq!("flat".parse::<RealEstateKind>().unwrap(), RealEstateKind::Flat);
        assert_eq!("Houses".parse::<RealEstateKind>().unwrap(), RealEstateKind::House);
        assert_eq!("LAND".parse::<RealEstateKind>().unwrap(), RealEstateKind::Land);
        assert!("garage".parse::<RealEstateKind>().is_err());
    }

    #[test]
    fn test_only_flats_have_rooms() {
        assert!(RealEstateKind::Flat.has_rooms());
        assert!(!RealEstateKind::House.has_rooms());
        assert!(!RealEstateKind::Land.has_rooms());
    }
}
