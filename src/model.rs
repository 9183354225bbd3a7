//! The capacity sizing model: parameters bound to an hourly profile.
use crate::profile::HourlyProfile;
use crate::technology::Technology;
use crate::units::Dimensionless;
use log::warn;

pub mod parameters;
use parameters::ModelParameters;

/// A model instance, ready to be turned into an optimisation problem
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    /// Costs and storage characteristics
    pub parameters: ModelParameters,
    /// Generation conditions and demand for each hour
    pub profile: HourlyProfile,
}

impl Model {
    /// Bind parameters to an hourly profile.
    ///
    /// # Panics
    ///
    /// If the profile length differs from `parameters.num_hours`.
    pub fn new(parameters: ModelParameters, profile: HourlyProfile) -> Self {
        assert_eq!(
            parameters.num_hours,
            profile.num_hours(),
            "Profile length does not match number of hours in parameters"
        );

        if !profile.has_generation() && profile.total_demand().value() > 0.0 {
            warn!("No hour has a nonzero solar or wind capacity factor; demand cannot be met");
        }

        Self {
            parameters,
            profile,
        }
    }

    /// The number of hours in the modelled period
    pub fn num_hours(&self) -> usize {
        self.profile.num_hours()
    }

    /// Iterate over the capacity factors of each generator in the given hour
    pub fn iter_capacity_factors(
        &self,
        hour: usize,
    ) -> impl Iterator<Item = (Technology, Dimensionless)> + '_ {
        let conditions = self.profile.get(hour);
        Technology::iter_generators().filter_map(move |technology| {
            conditions
                .capacity_factor(technology)
                .map(|factor| (technology, factor))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::three_hour_profile;
    use itertools::Itertools;
    use rstest::rstest;

    #[rstest]
    fn test_iter_capacity_factors(three_hour_profile: HourlyProfile) {
        let parameters = ModelParameters {
            num_hours: 3,
            ..ModelParameters::default()
        };
        let model = Model::new(parameters, three_hour_profile);
        assert_eq!(model.num_hours(), 3);
        assert_eq!(
            model.iter_capacity_factors(0).collect_vec(),
            [
                (Technology::SolarCapacity, Dimensionless(0.0)),
                (Technology::WindCapacity, Dimensionless(1.0))
            ]
        );
    }

    #[rstest]
    #[should_panic(expected = "Profile length does not match")]
    fn test_new_length_mismatch(three_hour_profile: HourlyProfile) {
        Model::new(ModelParameters::default(), three_hour_profile);
    }
}
