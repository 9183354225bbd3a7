//! Selection and configuration of the linear programming solver.
//!
//! The problem is always solved with HiGHS. The solver name chooses which of its algorithms is
//! used.
use anyhow::{Result, anyhow};
use highs::HighsModelStatus;
use itertools::Itertools;
use serde::Serialize;
use std::str::FromStr;
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

/// The available solvers
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, EnumIter, Serialize,
)]
pub enum Solver {
    /// HiGHS, choosing the algorithm itself
    #[default]
    #[strum(serialize = "highs")]
    #[serde(rename = "highs")]
    Highs,
    /// HiGHS dual simplex
    #[strum(serialize = "highs-simplex")]
    #[serde(rename = "highs-simplex")]
    HighsSimplex,
    /// HiGHS interior point method
    #[strum(serialize = "highs-ipm")]
    #[serde(rename = "highs-ipm")]
    HighsIpm,
}

impl Solver {
    /// Look up a solver by name, returning an error if it is unavailable
    pub fn from_name(name: &str) -> Result<Self> {
        Self::from_str(name.trim()).map_err(|_| {
            anyhow!(
                "Solver unavailable: {name} (available solvers: {})",
                Self::iter().join(", ")
            )
        })
    }

    /// The value of the HiGHS `solver` option for this solver
    fn highs_algorithm(self) -> &'static str {
        match self {
            Self::Highs => "choose",
            Self::HighsSimplex => "simplex",
            Self::HighsIpm => "ipm",
        }
    }

    /// Apply options for this solver to a HiGHS model.
    ///
    /// The solver's own console output is only enabled when debug logging is on.
    pub fn configure(self, model: &mut highs::Model) {
        let verbose = log::log_enabled!(log::Level::Debug);
        model.set_option("output_flag", verbose);
        model.set_option("log_to_console", verbose);
        model.set_option("solver", self.highs_algorithm());
    }
}

/// The outcome reported by the solver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SolverStatus {
    /// An optimal solution was found
    Optimal,
    /// The problem has no feasible point
    Infeasible,
    /// The objective is unbounded below
    Unbounded,
    /// The solver established the problem is infeasible or unbounded, but not which
    InfeasibleOrUnbounded,
    /// The solver stopped for another reason
    Error,
}

impl From<HighsModelStatus> for SolverStatus {
    fn from(status: HighsModelStatus) -> Self {
        match status {
            HighsModelStatus::Optimal => Self::Optimal,
            HighsModelStatus::Infeasible => Self::Infeasible,
            HighsModelStatus::Unbounded => Self::Unbounded,
            HighsModelStatus::UnboundedOrInfeasible => Self::InfeasibleOrUnbounded,
            _ => Self::Error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("highs", Solver::Highs)]
    #[case("highs-simplex", Solver::HighsSimplex)]
    #[case("highs-ipm", Solver::HighsIpm)]
    #[case(" highs ", Solver::Highs)]
    fn test_from_name(#[case] name: &str, #[case] expected: Solver) {
        assert_eq!(Solver::from_name(name).unwrap(), expected);
    }

    #[rstest]
    #[case("glpk")]
    #[case("gurobi")]
    #[case("")]
    fn test_from_name_unavailable(#[case] name: &str) {
        assert_eq!(
            Solver::from_name(name).unwrap_err().to_string(),
            format!("Solver unavailable: {name} (available solvers: highs, highs-simplex, highs-ipm)")
        );
    }

    #[test]
    fn test_default_solver() {
        assert_eq!(Solver::default().to_string(), "highs");
    }

    #[rstest]
    #[case(HighsModelStatus::Optimal, SolverStatus::Optimal)]
    #[case(HighsModelStatus::Infeasible, SolverStatus::Infeasible)]
    #[case(HighsModelStatus::Unbounded, SolverStatus::Unbounded)]
    #[case(
        HighsModelStatus::UnboundedOrInfeasible,
        SolverStatus::InfeasibleOrUnbounded
    )]
    #[case(HighsModelStatus::ReachedTimeLimit, SolverStatus::Error)]
    fn test_solver_status(#[case] status: HighsModelStatus, #[case] expected: SolverStatus) {
        assert_eq!(SolverStatus::from(status), expected);
        assert_eq!(
            serde_json::to_value(expected).unwrap(),
            serde_json::Value::String(expected.to_string())
        );
    }
}
