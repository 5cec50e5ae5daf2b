use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::engine::math::round_to2;
use crate::error::{Error, Result};

/// A typing speed unit, defined by its conversion factor from words per
/// minute. A word is fixed at five characters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpeedUnit {
    pub name: String,
    pub factor: f64,
    /// Bucket width used when grouping converted speeds into histogram bars.
    pub histogram_step: f64,
}

impl SpeedUnit {
    pub fn new(name: &str, factor: f64, histogram_step: f64) -> Self {
        Self {
            name: name.to_string(),
            factor,
            histogram_step,
        }
    }

    pub fn from_wpm(&self, wpm: f64) -> f64 {
        wpm * self.factor
    }

    pub fn to_wpm(&self, value: f64) -> f64 {
        value / self.factor
    }

    /// Converted value rounded to two decimals, the form most displays use.
    pub fn convert(&self, wpm: f64) -> f64 {
        round_to2(self.from_wpm(wpm))
    }
}

/// Open enumeration of speed units. The five standard units are always
/// present; applications can register more at runtime.
#[derive(Clone, Debug)]
pub struct UnitRegistry {
    units: HashMap<String, SpeedUnit>,
}

impl UnitRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            units: HashMap::new(),
        };
        registry.register(SpeedUnit::new("wpm", 1.0, 10.0));
        registry.register(SpeedUnit::new("cpm", 5.0, 50.0));
        registry.register(SpeedUnit::new("wps", 1.0 / 60.0, 0.5));
        registry.register(SpeedUnit::new("cps", 5.0 / 60.0, 1.0));
        registry.register(SpeedUnit::new("wph", 60.0, 250.0));
        registry
    }

    pub fn register(&mut self, unit: SpeedUnit) {
        self.units.insert(unit.name.clone(), unit);
    }

    pub fn get(&self, name: &str) -> Result<&SpeedUnit> {
        self.units
            .get(name)
            .ok_or_else(|| Error::UnknownUnit(name.to_string()))
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.units.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl Default for UnitRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wpm_is_identity() {
        let registry = UnitRegistry::new();
        let wpm = registry.get("wpm").unwrap();
        assert_eq!(wpm.from_wpm(81.3), 81.3);
    }

    #[test]
    fn test_zero_converts_to_zero_in_every_unit() {
        let registry = UnitRegistry::new();
        for name in registry.names() {
            let unit = registry.get(name).unwrap();
            assert_eq!(unit.from_wpm(0.0), 0.0, "unit {name}");
        }
    }

    #[test]
    fn test_cpm_is_five_chars_per_word() {
        let registry = UnitRegistry::new();
        let cpm = registry.get("cpm").unwrap();
        assert_eq!(cpm.from_wpm(80.0), 400.0);
        assert_eq!(cpm.to_wpm(400.0), 80.0);
    }

    #[test]
    fn test_convert_rounds_to_two_decimals() {
        let registry = UnitRegistry::new();
        let wps = registry.get("wps").unwrap();
        // 80 / 60 = 1.3333...
        assert_eq!(wps.convert(80.0), 1.33);
    }

    #[test]
    fn test_unknown_unit_is_an_error() {
        let registry = UnitRegistry::new();
        let err = registry.get("lpm").unwrap_err();
        assert!(matches!(err, Error::UnknownUnit(name) if name == "lpm"));
    }

    #[test]
    fn test_registered_unit_is_retrievable() {
        let mut registry = UnitRegistry::new();
        registry.register(SpeedUnit::new("cph", 300.0, 1500.0));
        let cph = registry.get("cph").unwrap();
        assert_eq!(cph.from_wpm(60.0), 18000.0);
    }
}
