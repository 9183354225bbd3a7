//! The technologies whose capacities are sized by the model.
use serde::Serialize;
use strum::{Display, EnumIter, IntoEnumIterator};

/// A technology with an installed capacity chosen by the optimisation.
///
/// The ordering of the variants is the ordering of the capacity variables in the problem.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumIter, Serialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Technology {
    /// Solar generation capacity
    SolarCapacity,
    /// Wind generation capacity
    WindCapacity,
    /// Maximum combined charge and discharge rate of storage
    StoragePowerCapacity,
    /// Maximum amount of energy held in storage
    StorageEnergyCapacity,
}

impl Technology {
    /// Whether the technology generates electricity according to an hourly capacity factor
    pub fn is_generator(self) -> bool {
        matches!(self, Self::SolarCapacity | Self::WindCapacity)
    }

    /// Iterate over the generating technologies
    pub fn iter_generators() -> impl Iterator<Item = Technology> {
        Self::iter().filter(|technology| technology.is_generator())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::Itertools;

    #[test]
    fn test_generators() {
        let generators = Technology::iter_generators().collect_vec();
        assert_eq!(
            generators,
            [Technology::SolarCapacity, Technology::WindCapacity]
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(
            Technology::StorageEnergyCapacity.to_string(),
            "storage_energy_capacity"
        );
        assert_eq!(
            serde_json::to_string(&Technology::WindCapacity).unwrap(),
            "\"wind_capacity\""
        );
    }
}
