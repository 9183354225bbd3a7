//! Code for adding constraints to the capacity sizing problem.
//!
//! Each function adds one row per hour. Rows are added in a fixed order, so the number of rows and
//! their position in the problem depend only on the number of hours.
use super::VariableMap;
use crate::model::Model;
use crate::model::parameters::ModelParameters;
use crate::profile::{Hour, previous_hour};
use crate::technology::Technology;
use crate::units::Dimensionless;
use highs::RowProblem as Problem;

/// The number of constraints added for each hour
pub const NUM_CONSTRAINTS_PER_HOUR: usize = 5;

/// Corresponding keys for a constraint along with the row offset in the solution
pub struct KeysWithOffset<T> {
    offset: usize,
    keys: Vec<T>,
}

impl<T> KeysWithOffset<T> {
    /// Zip the keys with the corresponding dual values in the solution, accounting for the offset
    pub fn zip_duals<'a>(&'a self, duals: &'a [f64]) -> impl Iterator<Item = (&'a T, f64)> {
        assert!(
            self.offset + self.keys.len() <= duals.len(),
            "Bad constraint keys: dual rows out of range"
        );

        self.keys.iter().zip(duals[self.offset..].iter().copied())
    }
}

/// Indicates the hour covered by each energy balance constraint
pub type EnergyBalanceKeys = KeysWithOffset<Hour>;

/// The keys for constraints whose duals are reported
pub struct ConstraintKeys {
    /// Keys for energy balance constraints
    pub energy_balance_keys: EnergyBalanceKeys,
}

/// Add all constraints to the problem.
///
/// # Arguments
///
/// * `problem` - The optimisation problem
/// * `variables` - The variables in the problem
/// * `model` - The model
///
/// # Returns
///
/// Keys for the constraints whose dual values are read back from the solution.
pub fn add_model_constraints(
    problem: &mut Problem,
    variables: &VariableMap,
    model: &Model,
) -> ConstraintKeys {
    let num_hours = model.num_hours();
    let energy_balance_keys = add_energy_balance_constraints(problem, variables, model);
    add_storage_power_constraints(problem, variables, num_hours);
    add_state_of_charge_limits(problem, variables, &model.parameters, num_hours);
    add_state_of_charge_transitions(problem, variables, &model.parameters, num_hours);

    ConstraintKeys {
        energy_balance_keys,
    }
}

/// Add energy balance constraints.
///
/// For every hour, generation plus discharge minus charge minus curtailment must equal demand.
fn add_energy_balance_constraints(
    problem: &mut Problem,
    variables: &VariableMap,
    model: &Model,
) -> EnergyBalanceKeys {
    // Row offset in problem. This line **must** come before we add more constraints.
    let offset = problem.num_rows();

    let mut terms = Vec::new();
    let mut keys = Vec::with_capacity(model.num_hours());
    for (hour, conditions) in model.profile.iter() {
        // Generators with a zero capacity factor contribute nothing in this hour
        terms.extend(
            model
                .iter_capacity_factors(hour)
                .filter(|(_, factor)| *factor > Dimensionless(0.0))
                .map(|(technology, factor)| (variables.capacity_var(technology), factor.value())),
        );

        let hourly = variables.hourly_vars(hour);
        terms.extend([
            (hourly.discharge, 1.0),
            (hourly.charge, -1.0),
            (hourly.curtailment, -1.0),
        ]);

        let demand = conditions.demand.value();
        problem.add_row(demand..=demand, terms.drain(..));
        keys.push(hour);
    }

    EnergyBalanceKeys { offset, keys }
}

/// Add storage power constraints.
///
/// Charging and discharging share the storage power capacity.
fn add_storage_power_constraints(problem: &mut Problem, variables: &VariableMap, num_hours: usize) {
    let power_capacity = variables.capacity_var(Technology::StoragePowerCapacity);
    for hour in 0..num_hours {
        let hourly = variables.hourly_vars(hour);
        problem.add_row(
            ..=0.0,
            [
                (hourly.charge, 1.0),
                (hourly.discharge, 1.0),
                (power_capacity, -1.0),
            ],
        );
    }
}

/// Add upper and lower limits on the state of charge.
///
/// The state of charge must lie between the minimum fraction of energy capacity and the full
/// energy capacity.
fn add_state_of_charge_limits(
    problem: &mut Problem,
    variables: &VariableMap,
    parameters: &ModelParameters,
    num_hours: usize,
) {
    let energy_capacity = variables.capacity_var(Technology::StorageEnergyCapacity);
    let min_fraction = parameters.min_state_of_charge.value();

    for hour in 0..num_hours {
        let state_of_charge = variables.hourly_vars(hour).state_of_charge;
        problem.add_row(..=0.0, [(state_of_charge, 1.0), (energy_capacity, -1.0)]);
    }

    for hour in 0..num_hours {
        let state_of_charge = variables.hourly_vars(hour).state_of_charge;
        let terms = [(state_of_charge, 1.0), (energy_capacity, -min_fraction)];
        problem.add_row(0.0.., terms.into_iter().filter(|(_, coeff)| coeff.abs() > 0.0));
    }
}

/// Add state of charge transitions.
///
/// The state of charge in each hour equals that of the previous hour plus charge (less charging
/// losses) minus discharge (plus discharging losses). The first hour follows the last.
fn add_state_of_charge_transitions(
    problem: &mut Problem,
    variables: &VariableMap,
    parameters: &ModelParameters,
    num_hours: usize,
) {
    let charge_efficiency = parameters.charge_efficiency.value();
    let discharge_efficiency = parameters.discharge_efficiency.value();

    let mut terms = Vec::new();
    for hour in 0..num_hours {
        let hourly = variables.hourly_vars(hour);
        let previous = previous_hour(hour, num_hours);

        // soc[t] - soc[t-1] - charge[t] * eta_c + discharge[t] / eta_d = 0
        terms.extend([
            (hourly.charge, -charge_efficiency),
            (hourly.discharge, 1.0 / discharge_efficiency),
        ]);

        // With a single hour, the state of charge terms cancel
        if previous != hour {
            terms.extend([
                (hourly.state_of_charge, 1.0),
                (variables.hourly_vars(previous).state_of_charge, -1.0),
            ]);
        }

        problem.add_row(0.0..=0.0, terms.drain(..));
    }
}
