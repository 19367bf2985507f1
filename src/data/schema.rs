//! Column Schema Module
//! Column names, accepted value ranges and the variable dictionary.

/// Column holding the acquisition timestamp in the raw export.
pub const RAW_TIMESTAMP_COL: &str = "SoftwareVersion";
/// Timestamp column after loading (seconds since the Unix epoch).
pub const TIMESTAMP_COL: &str = "Fecha";
/// Month (1-12) derived from the timestamp.
pub const MONTH_COL: &str = "Mes";

pub const WIND_SPEED_100_1: &str = "WindSpeed100m_1";
pub const WIND_SPEED_100_2: &str = "WinSpeed100m_2";
pub const WIND_SPEED_80_1: &str = "WindSpeed80_1";
pub const WIND_SPEED_80_2: &str = "WindSpeed80_2";
pub const WIND_SPEED_60: &str = "WindSpeed60";
pub const PRESSURE: &str = "Presion";
pub const HUMIDITY: &str = "Humedad";
pub const TEMPERATURE_100: &str = "Temperatura100m";
pub const TEMPERATURE_21: &str = "Temperatura21m";
pub const WIND_DIRECTION_100: &str = "WindDirection100";
pub const WIND_DIRECTION_80: &str = "WindDirection80";
pub const WIND_DIRECTION_60: &str = "WindDirection60m";

/// Wind speed series, in the order they are decomposed.
pub const WIND_SPEED_COLS: [&str; 5] = [
    WIND_SPEED_100_1,
    WIND_SPEED_100_2,
    WIND_SPEED_80_1,
    WIND_SPEED_80_2,
    WIND_SPEED_60,
];

/// Variables whose missing ratio is charted.
pub const MISSING_DATA_COLS: [&str; 6] = [
    TEMPERATURE_100,
    WIND_SPEED_100_2,
    WIND_SPEED_80_2,
    PRESSURE,
    HUMIDITY,
    WIND_DIRECTION_100,
];

/// Inclusive range of physically plausible readings for a set of columns.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidRange {
    pub columns: &'static [&'static str],
    pub min: f64,
    pub max: f64,
}

impl ValidRange {
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Ranges applied once at load time; anything outside becomes missing.
pub const VALID_RANGES: [ValidRange; 5] = [
    // m/s
    ValidRange {
        columns: &WIND_SPEED_COLS,
        min: 4.0,
        max: 30.0,
    },
    // hPa
    ValidRange {
        columns: &[PRESSURE],
        min: 985.0,
        max: 1050.0,
    },
    // %
    ValidRange {
        columns: &[HUMIDITY],
        min: 50.0,
        max: 100.0,
    },
    // °C
    ValidRange {
        columns: &[TEMPERATURE_100, TEMPERATURE_21],
        min: 15.0,
        max: 45.0,
    },
    // degrees
    ValidRange {
        columns: &[WIND_DIRECTION_100, WIND_DIRECTION_80, WIND_DIRECTION_60],
        min: 0.0,
        max: 360.0,
    },
];

/// Variable dictionary shown on the intro page: (variable, description).
pub const VARIABLE_DICTIONARY: [(&str, &str); 14] = [
    ("Fecha", "Fecha de la medición"),
    ("WindSpeed100m_1", "Velocidad del viento a 100 metros, primer sensor"),
    ("WinSpeed100m_2", "Velocidad del viento a 100 metros, segundo sensor"),
    ("WindSpeed80_1", "Velocidad del viento a 80 metros, primer sensor"),
    ("WindSpeed80_2", "Velocidad del viento a 80 metros, segundo sensor"),
    ("WindSpeed60", "Velocidad del viento a 60 metros"),
    ("Presion", "Presión atmosférica en la ubicación de la medición"),
    ("humedad", "Humedad relativa (%) en la ubicación de la medición"),
    ("temperatura 100m", "Temperatura a 100 metros de altura"),
    ("temperatura 21 m", "Temperatura a 21 metros de altura"),
    ("canal vacio", "Variable de canal no utilizada, sin datos disponibles"),
    ("WindDirection100", "Dirección del viento a 100 metros"),
    ("WindDirection80", "Dirección del viento a 80 metros"),
    ("WindDirection60", "Dirección del viento a 60 metros"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranges_are_inclusive() {
        let speed = VALID_RANGES[0];
        assert!(speed.contains(4.0));
        assert!(speed.contains(30.0));
        assert!(!speed.contains(3.99));
        assert!(!speed.contains(f64::NAN));
    }

    #[test]
    fn every_wind_speed_column_has_a_range() {
        for col in WIND_SPEED_COLS {
            assert!(VALID_RANGES.iter().any(|r| r.columns.contains(&col)));
        }
    }
}
