//! Guide field enums.
//!
//! Stored as their kebab-case string form; unknown values are rejected at the
//! API boundary and by database CHECK constraints.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::ValidationError;

/// How travellers get around during the guide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mobility {
    Car,
    Bike,
    Foot,
    Moto,
    PublicTransport,
}

impl Mobility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mobility::Car => "car",
            Mobility::Bike => "bike",
            Mobility::Foot => "foot",
            Mobility::Moto => "moto",
            Mobility::PublicTransport => "public-transport",
        }
    }
}

impl FromStr for Mobility {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "car" => Ok(Mobility::Car),
            "bike" => Ok(Mobility::Bike),
            "foot" => Ok(Mobility::Foot),
            "moto" => Ok(Mobility::Moto),
            "public-transport" => Ok(Mobility::PublicTransport),
            _ => Err(format!("Invalid mobility: {}", s)),
        }
    }
}

impl fmt::Display for Mobility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Season the guide is written for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    Summer,
    Spring,
    Autumn,
    Winter,
}

impl Season {
    pub fn as_str(&self) -> &'static str {
        match self {
            Season::Summer => "summer",
            Season::Spring => "spring",
            Season::Autumn => "autumn",
            Season::Winter => "winter",
        }
    }
}

impl FromStr for Season {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "summer" => Ok(Season::Summer),
            "spring" => Ok(Season::Spring),
            "autumn" => Ok(Season::Autumn),
            "winter" => Ok(Season::Winter),
            _ => Err(format!("Invalid season: {}", s)),
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Intended audience of the guide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Audience {
    Family,
    Solo,
    Group,
    Friends,
}

impl Audience {
    pub fn as_str(&self) -> &'static str {
        match self {
            Audience::Family => "family",
            Audience::Solo => "solo",
            Audience::Group => "group",
            Audience::Friends => "friends",
        }
    }
}

impl FromStr for Audience {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "family" => Ok(Audience::Family),
            "solo" => Ok(Audience::Solo),
            "group" => Ok(Audience::Group),
            "friends" => Ok(Audience::Friends),
            _ => Err(format!("Invalid audience: {}", s)),
        }
    }
}

impl fmt::Display for Audience {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Validator hook for string-typed mobility fields in request payloads.
pub fn validate_mobility(value: &str) -> Result<(), ValidationError> {
    Mobility::from_str(value).map(|_| ()).map_err(|_| {
        let mut err = ValidationError::new("mobility_unknown");
        err.message = Some("Unknown mobility value".into());
        err
    })
}

/// Validator hook for string-typed season fields in request payloads.
pub fn validate_season(value: &str) -> Result<(), ValidationError> {
    Season::from_str(value).map(|_| ()).map_err(|_| {
        let mut err = ValidationError::new("season_unknown");
        err.message = Some("Unknown season value".into());
        err
    })
}

/// Validator hook for string-typed audience fields in request payloads.
pub fn validate_audience(value: &str) -> Result<(), ValidationError> {
    Audience::from_str(value).map(|_| ()).map_err(|_| {
        let mut err = ValidationError::new("audience_unknown");
        err.message = Some("Unknown audience value".into());
        err
    })
}
