use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the 16 points of the compass rose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "&'static str", try_from = "String")]
pub enum CompassDirection {
    North,
    NorthNortheast,
    Northeast,
    EastNortheast,
    East,
    EastSoutheast,
    Southeast,
    SouthSoutheast,
    South,
    SouthSouthwest,
    Southwest,
    WestSouthwest,
    West,
    WestNorthwest,
    Northwest,
    NorthNorthwest,
}

/// Lower bound of every sector, ascending. A value belongs to the sector of
/// the largest bound it strictly exceeds; the last bound wraps back to North.
const SECTORS: [(f64, CompassDirection); 16] = [
    (11.25, CompassDirection::NorthNortheast),
    (33.75, CompassDirection::Northeast),
    (56.25, CompassDirection::EastNortheast),
    (78.75, CompassDirection::East),
    (101.25, CompassDirection::EastSoutheast),
    (123.75, CompassDirection::Southeast),
    (146.25, CompassDirection::SouthSoutheast),
    (168.75, CompassDirection::South),
    (191.25, CompassDirection::SouthSouthwest),
    (213.75, CompassDirection::Southwest),
    (236.25, CompassDirection::WestSouthwest),
    (258.75, CompassDirection::West),
    (281.25, CompassDirection::WestNorthwest),
    (303.75, CompassDirection::Northwest),
    (326.25, CompassDirection::NorthNorthwest),
    (348.75, CompassDirection::North),
];

impl CompassDirection {
    pub const ALL: [CompassDirection; 16] = [
        CompassDirection::North,
        CompassDirection::NorthNortheast,
        CompassDirection::Northeast,
        CompassDirection::EastNortheast,
        CompassDirection::East,
        CompassDirection::EastSoutheast,
        CompassDirection::Southeast,
        CompassDirection::SouthSoutheast,
        CompassDirection::South,
        CompassDirection::SouthSouthwest,
        CompassDirection::Southwest,
        CompassDirection::WestSouthwest,
        CompassDirection::West,
        CompassDirection::WestNorthwest,
        CompassDirection::Northwest,
        CompassDirection::NorthNorthwest,
    ];

    /// Resolve a meteorological wind bearing (degrees, 0 = from the north).
    ///
    /// Values outside `[0, 360)` wrap around the circle. Non-finite input
    /// resolves to North.
    pub fn from_degrees(deg: f64) -> Self {
        let deg = deg.rem_euclid(360.0);

        SECTORS
            .iter()
            .rev()
            .find(|(lower, _)| deg > *lower)
            .map(|(_, direction)| *direction)
            .unwrap_or(CompassDirection::North)
    }

    pub fn label(&self) -> &'static str {
        match self {
            CompassDirection::North => "North",
            CompassDirection::NorthNortheast => "North-northeast",
            CompassDirection::Northeast => "Northeast",
            CompassDirection::EastNortheast => "East-northeast",
            CompassDirection::East => "East",
            CompassDirection::EastSoutheast => "East-southeast",
            CompassDirection::Southeast => "Southeast",
            CompassDirection::SouthSoutheast => "South-southeast",
            CompassDirection::South => "South",
            CompassDirection::SouthSouthwest => "South-southwest",
            CompassDirection::Southwest => "Southwest",
            CompassDirection::WestSouthwest => "West-southwest",
            CompassDirection::West => "West",
            CompassDirection::WestNorthwest => "West-northwest",
            CompassDirection::Northwest => "Northwest",
            CompassDirection::NorthNorthwest => "North-northwest",
        }
    }
}

impl fmt::Display for CompassDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<CompassDirection> for &'static str {
    fn from(direction: CompassDirection) -> Self {
        direction.label()
    }
}

impl TryFrom<String> for CompassDirection {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        CompassDirection::ALL
            .into_iter()
            .find(|d| d.label().eq_ignore_ascii_case(&value))
            .ok_or_else(|| format!("unknown compass direction '{value}'"))
    }
}
