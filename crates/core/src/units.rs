//! Physical-info capture and unit conversion.
//!
//! Height and weight are captured in the user's chosen unit system —
//! imperial (feet + inches, stone + pounds) or metric (cm, kg) — and
//! normalised to metric for storage and BMI calculation. Exactly one
//! representation is populated at a time: switching system clears the other
//! representation's fields, so no stale cross-mode values can leak into a
//! submission.

use serde::{Deserialize, Serialize};

/// Centimetres per foot.
pub const CM_PER_FOOT: f64 = 30.48;
/// Centimetres per inch.
pub const CM_PER_INCH: f64 = 2.54;
/// Kilograms per stone.
pub const KG_PER_STONE: f64 = 6.35029;
/// Kilograms per pound.
pub const KG_PER_POUND: f64 = 0.453592;

/// Which measurement system the user is entering values in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    Imperial,
    Metric,
}

impl std::str::FromStr for UnitSystem {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "imperial" => Ok(UnitSystem::Imperial),
            "metric" => Ok(UnitSystem::Metric),
            other => Err(format!(
                "unknown unit system '{}' (expected 'imperial' or 'metric')",
                other
            )),
        }
    }
}

/// BMI bands used for display alongside a stored assessment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BmiCategory {
    Underweight,
    Normal,
    Overweight,
    Obese,
}

impl BmiCategory {
    /// Classifies a BMI value: `<18.5` Underweight, `18.5–24.9` Normal,
    /// `25–29.9` Overweight, `≥30` Obese.
    pub fn from_bmi(bmi: f64) -> Self {
        if bmi < 18.5 {
            BmiCategory::Underweight
        } else if bmi < 25.0 {
            BmiCategory::Normal
        } else if bmi < 30.0 {
            BmiCategory::Overweight
        } else {
            BmiCategory::Obese
        }
    }
}

impl std::fmt::Display for BmiCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            BmiCategory::Underweight => "Underweight",
            BmiCategory::Normal => "Normal",
            BmiCategory::Overweight => "Overweight",
            BmiCategory::Obese => "Obese",
        };
        write!(f, "{}", label)
    }
}

/// Height and weight as entered, tagged by unit system.
///
/// Fields of the inactive system are always `None`. Partial entry is
/// allowed while the user is still typing; [`PhysicalInfo::is_complete`]
/// decides when the physical-info step may be left.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PhysicalInfo {
    unit_system: UnitSystem,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    height_feet: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    height_inches: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    weight_stone: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    weight_pounds: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    height_cm: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    weight_kg: Option<f64>,
}

impl PhysicalInfo {
    /// An empty capture in the given system.
    pub fn new(unit_system: UnitSystem) -> Self {
        Self {
            unit_system,
            height_feet: None,
            height_inches: None,
            weight_stone: None,
            weight_pounds: None,
            height_cm: None,
            weight_kg: None,
        }
    }

    /// An imperial capture. `None` fields are simply not yet entered.
    pub fn imperial(
        height_feet: Option<f64>,
        height_inches: Option<f64>,
        weight_stone: Option<f64>,
        weight_pounds: Option<f64>,
    ) -> Self {
        Self {
            unit_system: UnitSystem::Imperial,
            height_feet,
            height_inches,
            weight_stone,
            weight_pounds,
            height_cm: None,
            weight_kg: None,
        }
    }

    /// A metric capture. `None` fields are simply not yet entered.
    pub fn metric(height_cm: Option<f64>, weight_kg: Option<f64>) -> Self {
        Self {
            unit_system: UnitSystem::Metric,
            height_feet: None,
            height_inches: None,
            weight_stone: None,
            weight_pounds: None,
            height_cm,
            weight_kg,
        }
    }

    pub fn unit_system(&self) -> UnitSystem {
        self.unit_system
    }

    /// Switches the active unit system.
    ///
    /// Switching to a different system clears the previously active
    /// system's fields — a deliberate side effect, so values entered in one
    /// system never survive into the other. Switching to the already-active
    /// system is a no-op.
    pub fn switch_system(&mut self, unit_system: UnitSystem) {
        if self.unit_system == unit_system {
            return;
        }
        *self = Self::new(unit_system);
    }

    /// Records an imperial height. Ignored unless imperial is active.
    pub fn set_imperial_height(&mut self, feet: Option<f64>, inches: Option<f64>) {
        if self.unit_system == UnitSystem::Imperial {
            self.height_feet = feet;
            self.height_inches = inches;
        }
    }

    /// Records an imperial weight. Ignored unless imperial is active.
    pub fn set_imperial_weight(&mut self, stone: Option<f64>, pounds: Option<f64>) {
        if self.unit_system == UnitSystem::Imperial {
            self.weight_stone = stone;
            self.weight_pounds = pounds;
        }
    }

    /// Records a metric height. Ignored unless metric is active.
    pub fn set_metric_height(&mut self, cm: Option<f64>) {
        if self.unit_system == UnitSystem::Metric {
            self.height_cm = cm;
        }
    }

    /// Records a metric weight. Ignored unless metric is active.
    pub fn set_metric_weight(&mut self, kg: Option<f64>) {
        if self.unit_system == UnitSystem::Metric {
            self.weight_kg = kg;
        }
    }

    /// Normalised height in centimetres: `feet*30.48 + inches*2.54`, or the
    /// entered cm value. `None` until the relevant fields are present.
    pub fn height_cm(&self) -> Option<f64> {
        match self.unit_system {
            UnitSystem::Metric => self.height_cm,
            UnitSystem::Imperial => match (self.height_feet, self.height_inches) {
                (Some(feet), Some(inches)) => Some(feet * CM_PER_FOOT + inches * CM_PER_INCH),
                _ => None,
            },
        }
    }

    /// Normalised weight in kilograms: `stone*6.35029 + pounds*0.453592`,
    /// or the entered kg value. `None` until the relevant fields are present.
    pub fn weight_kg(&self) -> Option<f64> {
        match self.unit_system {
            UnitSystem::Metric => self.weight_kg,
            UnitSystem::Imperial => match (self.weight_stone, self.weight_pounds) {
                (Some(stone), Some(pounds)) => {
                    Some(stone * KG_PER_STONE + pounds * KG_PER_POUND)
                }
                _ => None,
            },
        }
    }

    /// Body-mass index `kg / m²`, rounded to one decimal place for display.
    pub fn bmi(&self) -> Option<f64> {
        let height_m = self.height_cm()? / 100.0;
        if height_m <= 0.0 {
            return None;
        }
        let bmi = self.weight_kg()? / (height_m * height_m);
        Some((bmi * 10.0).round() / 10.0)
    }

    /// The display band for [`bmi`](Self::bmi).
    pub fn bmi_category(&self) -> Option<BmiCategory> {
        self.bmi().map(BmiCategory::from_bmi)
    }

    /// True once every field of the active system is present and within
    /// sane bounds: height 3–8 ft or 100–250 cm, weight 5–50 st or
    /// 30–300 kg. Totals are checked, so 7 ft 11 in passes while
    /// 8 ft 6 in does not.
    pub fn is_complete(&self) -> bool {
        match self.unit_system {
            UnitSystem::Imperial => {
                let (Some(feet), Some(inches)) = (self.height_feet, self.height_inches) else {
                    return false;
                };
                let (Some(stone), Some(pounds)) = (self.weight_stone, self.weight_pounds) else {
                    return false;
                };
                if feet < 0.0 || inches < 0.0 || stone < 0.0 || pounds < 0.0 {
                    return false;
                }
                let total_feet = feet + inches / 12.0;
                let total_stone = stone + pounds / 14.0;
                (3.0..=8.0).contains(&total_feet) && (5.0..=50.0).contains(&total_stone)
            }
            UnitSystem::Metric => {
                let (Some(cm), Some(kg)) = (self.height_cm, self.weight_kg) else {
                    return false;
                };
                (100.0..=250.0).contains(&cm) && (30.0..=300.0).contains(&kg)
            }
        }
    }
}
