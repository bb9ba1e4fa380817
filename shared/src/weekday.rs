//! Weekday enumeration
//!
//! The seven days an exercise can be scheduled on. The canonical labels are
//! the Spanish names without diacritics ("Miercoles", "Sabado"); parsing
//! also accepts the accented spellings and any casing, since both variants
//! appear in stored data.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Day of the week an exercise is scheduled on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Weekday {
    Lunes,
    Martes,
    Miercoles,
    Jueves,
    Viernes,
    Sabado,
    Domingo,
}

/// Error returned when a string is not one of the seven weekday labels
#[derive(Debug, Clone, thiserror::Error)]
#[error("Unknown weekday: {0}")]
pub struct UnknownWeekday(pub String);

impl Weekday {
    /// All seven days, Monday first
    pub const ALL: [Weekday; 7] = [
        Weekday::Lunes,
        Weekday::Martes,
        Weekday::Miercoles,
        Weekday::Jueves,
        Weekday::Viernes,
        Weekday::Sabado,
        Weekday::Domingo,
    ];

    /// Canonical label, as stored in the database
    pub fn as_str(&self) -> &'static str {
        match self {
            Weekday::Lunes => "Lunes",
            Weekday::Martes => "Martes",
            Weekday::Miercoles => "Miercoles",
            Weekday::Jueves => "Jueves",
            Weekday::Viernes => "Viernes",
            Weekday::Sabado => "Sabado",
            Weekday::Domingo => "Domingo",
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Weekday {
    type Err = UnknownWeekday;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "lunes" => Ok(Weekday::Lunes),
            "martes" => Ok(Weekday::Martes),
            "miercoles" | "miércoles" => Ok(Weekday::Miercoles),
            "jueves" => Ok(Weekday::Jueves),
            "viernes" => Ok(Weekday::Viernes),
            "sabado" | "sábado" => Ok(Weekday::Sabado),
            "domingo" => Ok(Weekday::Domingo),
            _ => Err(UnknownWeekday(s.to_string())),
        }
    }
}
