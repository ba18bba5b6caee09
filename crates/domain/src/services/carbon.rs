//! Carbon footprint estimation.
//!
//! Pure functions: energy → estimated CO2 mass, and CO2 mass → advice.

/// Grams of CO2 emitted per kWh consumed.
pub const CARBON_INTENSITY_FACTOR: f64 = 450.0;

/// Above this many kg CO2, recommend efficiency upgrades.
pub const HIGH_CARBON_KG: f64 = 10.0;

/// Above this many kg CO2 (up to [`HIGH_CARBON_KG`]), recommend moderate changes.
pub const MODERATE_CARBON_KG: f64 = 5.0;

/// Converts watt-hours into kilograms of CO2.
pub fn carbon_kg(energy_wh: f64) -> f64 {
    let energy_kwh = energy_wh / 1000.0;
    (energy_kwh * CARBON_INTENSITY_FACTOR) / 1000.0
}

/// Advice tier selected by a carbon estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReductionTier {
    EfficiencyUpgrade,
    Moderate,
    MaintainPractice,
}

impl ReductionTier {
    /// Picks the tier for a carbon estimate. Boundaries are exclusive, so
    /// exactly 10 kg is moderate and exactly 5 kg is maintain-practice.
    pub fn for_carbon(carbon_kg: f64) -> Self {
        if carbon_kg > HIGH_CARBON_KG {
            ReductionTier::EfficiencyUpgrade
        } else if carbon_kg > MODERATE_CARBON_KG {
            ReductionTier::Moderate
        } else {
            ReductionTier::MaintainPractice
        }
    }

    pub fn suggestions(&self) -> &'static [&'static str] {
        match self {
            ReductionTier::EfficiencyUpgrade => &[
                "Consider upgrading to an energy-efficient model to reduce power usage.",
                "Use timers or smart plugs to automatically turn off the device when not in use.",
                "Switch to renewable energy sources (e.g., solar, wind) to power your device.",
            ],
            ReductionTier::Moderate => &[
                "Optimize usage time to avoid long periods of inactivity.",
                "Consider reducing standby power consumption by turning off the device when idle.",
            ],
            ReductionTier::MaintainPractice => &[
                "Maintain current energy-efficient practices.",
                "Consider powering the device with renewable energy sources to further reduce carbon impact.",
            ],
        }
    }
}

/// Ordered reduction advice for a carbon estimate. Never empty.
pub fn suggest_reductions(carbon_kg: f64) -> Vec<String> {
    ReductionTier::for_carbon(carbon_kg)
        .suggestions()
        .iter()
        .map(|s| s.to_string())
        .collect()
}
