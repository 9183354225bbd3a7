//! Hourly time series describing generation conditions and demand over the modelled period.
use crate::technology::Technology;
use crate::units::{Dimensionless, Energy};

/// The index of an hour within the modelled period, starting at zero
pub type Hour = usize;

/// The hour preceding `hour` in a cyclic period of `num_hours` hours.
///
/// The first hour is preceded by the last one, so the storage trajectory closes on itself.
pub fn previous_hour(hour: Hour, num_hours: usize) -> Hour {
    assert!(hour < num_hours, "Hour {hour} out of range");
    (hour + num_hours - 1) % num_hours
}

/// Generation conditions and demand for a single hour
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HourlyConditions {
    /// Solar capacity factor
    pub solar: Dimensionless,
    /// Wind capacity factor
    pub wind: Dimensionless,
    /// Energy demand
    pub demand: Energy,
}

impl HourlyConditions {
    /// The capacity factor for the given technology, if it is a generator
    pub fn capacity_factor(&self, technology: Technology) -> Option<Dimensionless> {
        match technology {
            Technology::SolarCapacity => Some(self.solar),
            Technology::WindCapacity => Some(self.wind),
            Technology::StoragePowerCapacity | Technology::StorageEnergyCapacity => None,
        }
    }
}

/// Conditions for every hour of the modelled period, ordered by hour
#[derive(Debug, Clone, PartialEq)]
pub struct HourlyProfile(Vec<HourlyConditions>);

impl HourlyProfile {
    /// Create a new [`HourlyProfile`].
    ///
    /// # Panics
    ///
    /// If `hours` is empty.
    pub fn new(hours: Vec<HourlyConditions>) -> Self {
        assert!(!hours.is_empty(), "A profile must contain at least one hour");
        Self(hours)
    }

    /// The number of hours in the profile
    pub fn num_hours(&self) -> usize {
        self.0.len()
    }

    /// Get the conditions for the given hour
    pub fn get(&self, hour: Hour) -> &HourlyConditions {
        &self.0[hour]
    }

    /// Iterate over the hours in order
    pub fn iter(&self) -> impl Iterator<Item = (Hour, &HourlyConditions)> {
        self.0.iter().enumerate()
    }

    /// The total demand over the period
    pub fn total_demand(&self) -> Energy {
        self.0.iter().map(|conditions| conditions.demand).sum()
    }

    /// Whether any hour has a nonzero capacity factor for some generator
    pub fn has_generation(&self) -> bool {
        self.0.iter().any(|conditions| {
            conditions.solar > Dimensionless(0.0) || conditions.wind > Dimensionless(0.0)
        })
    }
}
