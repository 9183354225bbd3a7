//! Defines the `ModelParameters` struct, which holds the costs and storage characteristics used to
//! build the optimisation problem.
use crate::input::{deserialise_proportion, deserialise_proportion_nonzero, input_err_msg, read_toml};
use crate::settings::documented_toml;
use crate::technology::Technology;
use crate::units::{Dimensionless, MoneyPerCapacity, MoneyPerEnergy};
use anyhow::{Context, Result, ensure};
use documented::DocumentedFields;
use serde::{Deserialize, Serialize};
use std::path::Path;

const DEFAULT_PARAMETERS_FILE_HEADER: &str = "# Model parameters for gridsize
# Uncomment and edit a value to override its default
";

macro_rules! define_unit_param_default {
    ($name:ident, $type: ty, $value: expr) => {
        fn $name() -> $type {
            <$type>::new($value)
        }
    };
}

macro_rules! define_param_default {
    ($name:ident, $type: ty, $value: expr) => {
        fn $name() -> $type {
            $value
        }
    };
}

define_param_default!(default_num_hours, usize, 8760);
define_unit_param_default!(default_solar_capital_cost, MoneyPerCapacity, 8e8);
define_unit_param_default!(default_wind_capital_cost, MoneyPerCapacity, 1.2e10);
define_unit_param_default!(default_storage_power_capital_cost, MoneyPerCapacity, 2e8);
define_unit_param_default!(default_storage_energy_capital_cost, MoneyPerCapacity, 1.5e9);
define_unit_param_default!(default_curtailment_penalty, MoneyPerEnergy, 1000.0);
define_unit_param_default!(default_discharge_cost, MoneyPerEnergy, 5000.0);
define_unit_param_default!(default_min_state_of_charge, Dimensionless, 0.2);
define_unit_param_default!(default_charge_efficiency, Dimensionless, 0.95);
define_unit_param_default!(default_discharge_efficiency, Dimensionless, 0.9);

/// Parameters of the capacity sizing model.
///
/// All fields are optional in the parameters file.
#[derive(Debug, Clone, DocumentedFields, Serialize, Deserialize, PartialEq)]
pub struct ModelParameters {
    /// The number of hourly periods in the modelled year
    #[serde(default = "default_num_hours")]
    pub num_hours: usize,
    /// Capital cost per unit of solar capacity
    #[serde(default = "default_solar_capital_cost")]
    pub solar_capital_cost: MoneyPerCapacity,
    /// Capital cost per unit of wind capacity
    #[serde(default = "default_wind_capital_cost")]
    pub wind_capital_cost: MoneyPerCapacity,
    /// Capital cost per unit of storage power (charge/discharge rate) capacity
    #[serde(default = "default_storage_power_capital_cost")]
    pub storage_power_capital_cost: MoneyPerCapacity,
    /// Capital cost per unit of storage energy capacity
    #[serde(default = "default_storage_energy_capital_cost")]
    pub storage_energy_capital_cost: MoneyPerCapacity,
    /// Penalty per unit of curtailed energy
    #[serde(default = "default_curtailment_penalty")]
    pub curtailment_penalty: MoneyPerEnergy,
    /// Cost per unit of energy discharged from storage
    #[serde(default = "default_discharge_cost")]
    pub discharge_cost: MoneyPerEnergy,
    /// Minimum state of charge as a fraction of storage energy capacity
    #[serde(default = "default_min_state_of_charge")]
    #[serde(deserialize_with = "deserialise_proportion")]
    pub min_state_of_charge: Dimensionless,
    /// Fraction of charged energy which is stored
    #[serde(default = "default_charge_efficiency")]
    #[serde(deserialize_with = "deserialise_proportion_nonzero")]
    pub charge_efficiency: Dimensionless,
    /// Fraction of withdrawn stored energy which is delivered
    #[serde(default = "default_discharge_efficiency")]
    #[serde(deserialize_with = "deserialise_proportion_nonzero")]
    pub discharge_efficiency: Dimensionless,
}

impl Default for ModelParameters {
    fn default() -> Self {
        Self {
            num_hours: default_num_hours(),
            solar_capital_cost: default_solar_capital_cost(),
            wind_capital_cost: default_wind_capital_cost(),
            storage_power_capital_cost: default_storage_power_capital_cost(),
            storage_energy_capital_cost: default_storage_energy_capital_cost(),
            curtailment_penalty: default_curtailment_penalty(),
            discharge_cost: default_discharge_cost(),
            min_state_of_charge: default_min_state_of_charge(),
            charge_efficiency: default_charge_efficiency(),
            discharge_efficiency: default_discharge_efficiency(),
        }
    }
}

/// Check that a cost parameter is valid
fn check_cost(name: &str, value: f64) -> Result<()> {
    ensure!(
        value.is_finite() && value >= 0.0,
        "{name} must be a finite number greater than or equal to zero"
    );

    Ok(())
}

impl ModelParameters {
    /// Read model parameters from the specified TOML file.
    ///
    /// Missing fields take their default values.
    ///
    /// # Returns
    ///
    /// The file contents as a [`ModelParameters`] struct or an error if the file is invalid
    pub fn from_path<P: AsRef<Path>>(file_path: P) -> Result<ModelParameters> {
        let file_path = file_path.as_ref();
        let parameters: ModelParameters = read_toml(file_path)?;

        parameters
            .validate()
            .with_context(|| input_err_msg(file_path))?;

        Ok(parameters)
    }

    /// Validate parameters after reading in file
    pub fn validate(&self) -> Result<()> {
        ensure!(self.num_hours > 0, "num_hours cannot be zero");

        // Proportions are checked on deserialisation, but parameters may be built in code too
        ensure!(
            (0.0..=1.0).contains(&self.min_state_of_charge.value()),
            "min_state_of_charge must be between 0 and 1"
        );
        for (name, value) in [
            ("charge_efficiency", self.charge_efficiency),
            ("discharge_efficiency", self.discharge_efficiency),
        ] {
            ensure!(
                value > Dimensionless(0.0) && value <= Dimensionless(1.0),
                "{name} must be greater than 0 and no more than 1"
            );
        }

        check_cost("solar_capital_cost", self.solar_capital_cost.value())?;
        check_cost("wind_capital_cost", self.wind_capital_cost.value())?;
        check_cost(
            "storage_power_capital_cost",
            self.storage_power_capital_cost.value(),
        )?;
        check_cost(
            "storage_energy_capital_cost",
            self.storage_energy_capital_cost.value(),
        )?;
        check_cost("curtailment_penalty", self.curtailment_penalty.value())?;
        check_cost("discharge_cost", self.discharge_cost.value())?;

        Ok(())
    }

    /// The capital cost per unit of capacity for the given technology
    pub fn capital_cost(&self, technology: Technology) -> MoneyPerCapacity {
        match technology {
            Technology::SolarCapacity => self.solar_capital_cost,
            Technology::WindCapacity => self.wind_capital_cost,
            Technology::StoragePowerCapacity => self.storage_power_capital_cost,
            Technology::StorageEnergyCapacity => self.storage_energy_capital_cost,
        }
    }

    /// A parameters file with every value at its default, commented out and documented
    pub fn default_file_contents() -> Result<String> {
        documented_toml(DEFAULT_PARAMETERS_FILE_HEADER, &Self::default())
    }
}
