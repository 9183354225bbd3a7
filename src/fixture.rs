//! Fixtures for tests
use crate::model::Model;
use crate::model::parameters::ModelParameters;
use crate::profile::{HourlyConditions, HourlyProfile};
use crate::units::{Dimensionless, Energy, MoneyPerCapacity, MoneyPerEnergy};
use rstest::fixture;

/// Assert that an error with the given message occurs
macro_rules! assert_error {
    ($result:expr, $msg:expr) => {
        assert_eq!(
            $result.unwrap_err().chain().next().unwrap().to_string(),
            $msg
        );
    };
}
pub(crate) use assert_error;

/// The number of hours in the synthetic profile
const SYNTHETIC_HOURS: usize = 48;

fn conditions(solar: f64, wind: f64, demand: f64) -> HourlyConditions {
    HourlyConditions {
        solar: Dimensionless(solar),
        wind: Dimensionless(wind),
        demand: Energy(demand),
    }
}

/// Wind in the first hour, sun in the second and neither in the third
#[fixture]
pub fn three_hour_profile() -> HourlyProfile {
    HourlyProfile::new(vec![
        conditions(0.0, 1.0, 1.0),
        conditions(1.0, 0.0, 1.0),
        conditions(0.0, 0.0, 1.0),
    ])
}

/// Unit generation costs, free storage capacity and small operating costs
#[fixture]
pub fn cheap_storage_parameters() -> ModelParameters {
    ModelParameters {
        num_hours: 3,
        solar_capital_cost: MoneyPerCapacity(1.0),
        wind_capital_cost: MoneyPerCapacity(1.0),
        storage_power_capital_cost: MoneyPerCapacity(0.0),
        storage_energy_capital_cost: MoneyPerCapacity(0.0),
        curtailment_penalty: MoneyPerEnergy(0.1),
        discharge_cost: MoneyPerEnergy(0.5),
        ..ModelParameters::default()
    }
}

/// Two days with a daily solar cycle, gusty wind and a demand peak in the evening
#[fixture]
#[allow(clippy::cast_precision_loss)]
pub fn synthetic_profile() -> HourlyProfile {
    let hours = (0..SYNTHETIC_HOURS)
        .map(|hour| {
            let hour_of_day = (hour % 24) as f64;
            let solar = (std::f64::consts::PI * (hour_of_day - 6.0) / 12.0)
                .sin()
                .max(0.0);
            let wind = if (hour / 6) % 2 == 0 { 0.6 } else { 0.1 };
            let demand = if (17.0..22.0).contains(&hour_of_day) {
                1.5
            } else {
                1.0
            };
            conditions(solar, wind, demand)
        })
        .collect();

    HourlyProfile::new(hours)
}

/// A model with default costs over the synthetic profile
#[fixture]
pub fn synthetic_model(synthetic_profile: HourlyProfile) -> Model {
    let parameters = ModelParameters {
        num_hours: SYNTHETIC_HOURS,
        ..ModelParameters::default()
    };

    Model::new(parameters, synthetic_profile)
}
