//! Activity field enums.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::ValidationError;

/// Venue category of an activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Museum,
    Castle,
    WaterSports,
    Park,
    Cave,
    Beach,
    Festival,
    Zoo,
    Aquarium,
    GuidedTour,
    Vineyard,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Museum => "museum",
            Category::Castle => "castle",
            Category::WaterSports => "water-sports",
            Category::Park => "park",
            Category::Cave => "cave",
            Category::Beach => "beach",
            Category::Festival => "festival",
            Category::Zoo => "zoo",
            Category::Aquarium => "aquarium",
            Category::GuidedTour => "guided-tour",
            Category::Vineyard => "vineyard",
        }
    }

    /// All accepted category values.
    pub fn all() -> &'static [Category] {
        &[
            Category::Museum,
            Category::Castle,
            Category::WaterSports,
            Category::Park,
            Category::Cave,
            Category::Beach,
            Category::Festival,
            Category::Zoo,
            Category::Aquarium,
            Category::GuidedTour,
            Category::Vineyard,
        ]
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::all()
            .iter()
            .find(|c| c.as_str() == s)
            .copied()
            .ok_or_else(|| format!("Invalid category: {}", s))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Validator hook for string-typed category fields in request payloads.
pub fn validate_category(value: &str) -> Result<(), ValidationError> {
    Category::from_str(value).map(|_| ()).map_err(|_| {
        let mut err = ValidationError::new("category_unknown");
        err.message = Some("Unknown category value".into());
        err
    })
}
