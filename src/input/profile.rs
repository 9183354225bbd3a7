//! Code for reading the hourly profile CSV file.
use super::{deserialise_proportion, input_err_msg, read_csv};
use crate::profile::{Hour, HourlyConditions, HourlyProfile};
use crate::units::{Dimensionless, Energy};
use anyhow::{Context, Result, ensure};
use serde::Deserialize;
use std::path::Path;

/// Represents a row of the hourly profile CSV file
#[derive(Debug, PartialEq, Deserialize)]
struct HourlyConditionsRaw {
    t: Hour,
    #[serde(deserialize_with = "deserialise_proportion")]
    solar: Dimensionless,
    #[serde(deserialize_with = "deserialise_proportion")]
    wind: Dimensionless,
    demand: Energy,
}

impl HourlyConditionsRaw {
    fn validate(&self) -> Result<()> {
        ensure!(
            self.demand.is_finite() && self.demand >= Energy(0.0),
            "Demand for hour {} must be a finite, non-negative number",
            self.t
        );

        Ok(())
    }
}

/// Read the hourly profile CSV file.
///
/// The file must contain exactly one row for each hour in `0..num_hours`, with columns `t`,
/// `solar`, `wind` and `demand`. Rows may appear in any order.
///
/// # Arguments
///
/// * `file_path` - Path to the CSV file
/// * `num_hours` - The number of hours in the modelled period
///
/// # Returns
///
/// An [`HourlyProfile`] ordered by hour or an error.
pub fn read_hourly_profile(file_path: &Path, num_hours: usize) -> Result<HourlyProfile> {
    let iter = read_csv(file_path)?;
    read_hourly_profile_from_iter(iter, num_hours).with_context(|| input_err_msg(file_path))
}

fn read_hourly_profile_from_iter<I>(iter: I, num_hours: usize) -> Result<HourlyProfile>
where
    I: Iterator<Item = HourlyConditionsRaw>,
{
    ensure!(num_hours > 0, "The modelled period must contain at least one hour");

    let mut hours: Vec<Option<HourlyConditions>> = vec![None; num_hours];
    for record in iter {
        record.validate()?;

        let slot = hours.get_mut(record.t).with_context(|| {
            format!(
                "Hour {} is outside the modelled period (0 to {})",
                record.t,
                num_hours - 1
            )
        })?;
        ensure!(slot.is_none(), "Hour {} appears more than once", record.t);

        *slot = Some(HourlyConditions {
            solar: record.solar,
            wind: record.wind,
            demand: record.demand,
        });
    }

    let hours = hours
        .into_iter()
        .enumerate()
        .map(|(hour, conditions)| conditions.with_context(|| format!("Missing row for hour {hour}")))
        .collect::<Result<Vec<_>>>()?;

    Ok(HourlyProfile::new(hours))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::assert_error;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    fn raw(t: Hour, solar: f64, wind: f64, demand: f64) -> HourlyConditionsRaw {
        HourlyConditionsRaw {
            t,
            solar: Dimensionless(solar),
            wind: Dimensionless(wind),
            demand: Energy(demand),
        }
    }

    #[test]
    fn test_read_hourly_profile_from_iter() {
        // Rows out of order are fine
        let records = [raw(1, 1.0, 0.0, 2.0), raw(0, 0.0, 0.5, 1.0)];
        let profile = read_hourly_profile_from_iter(records.into_iter(), 2).unwrap();
        assert_eq!(profile.num_hours(), 2);
        assert_eq!(
            *profile.get(0),
            HourlyConditions {
                solar: Dimensionless(0.0),
                wind: Dimensionless(0.5),
                demand: Energy(1.0),
            }
        );
        assert_eq!(profile.get(1).demand, Energy(2.0));
    }

    #[test]
    fn test_read_hourly_profile_from_iter_missing_hour() {
        let records = [raw(0, 0.0, 0.5, 1.0), raw(2, 0.0, 0.5, 1.0)];
        assert_error!(
            read_hourly_profile_from_iter(records.into_iter(), 3),
            "Missing row for hour 1"
        );
    }

    #[test]
    fn test_read_hourly_profile_from_iter_duplicate_hour() {
        let records = [raw(0, 0.0, 0.5, 1.0), raw(0, 0.0, 0.5, 1.0)];
        assert_error!(
            read_hourly_profile_from_iter(records.into_iter(), 2),
            "Hour 0 appears more than once"
        );
    }

    #[test]
    fn test_read_hourly_profile_from_iter_out_of_range() {
        let records = [raw(0, 0.0, 0.5, 1.0), raw(5, 0.0, 0.5, 1.0)];
        assert_error!(
            read_hourly_profile_from_iter(records.into_iter(), 2),
            "Hour 5 is outside the modelled period (0 to 1)"
        );
    }

    #[test]
    fn test_read_hourly_profile_from_iter_bad_demand() {
        let records = [raw(0, 0.0, 0.5, -1.0)];
        assert_error!(
            read_hourly_profile_from_iter(records.into_iter(), 1),
            "Demand for hour 0 must be a finite, non-negative number"
        );
    }

    #[test]
    fn test_read_hourly_profile() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("profile.csv");
        {
            let mut file = File::create(&file_path).unwrap();
            writeln!(file, "t,solar,wind,demand\n0,0,1,1\n1,1,0,1\n2,0,0,1").unwrap();
        }

        let profile = read_hourly_profile(&file_path, 3).unwrap();
        assert_eq!(profile.num_hours(), 3);
        assert_eq!(profile.get(1).solar, Dimensionless(1.0));
    }

    #[test]
    fn test_read_hourly_profile_malformed() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("profile.csv");

        // Non-numeric value
        {
            let mut file = File::create(&file_path).unwrap();
            writeln!(file, "t,solar,wind,demand\n0,0,1,1\n1,sunny,0,1").unwrap();
        }
        assert_error!(
            read_hourly_profile(&file_path, 2),
            format!("Error reading {}", file_path.display())
        );

        // Capacity factor out of range
        {
            let mut file = File::create(&file_path).unwrap();
            writeln!(file, "t,solar,wind,demand\n0,0,1.5,1\n1,0,0,1").unwrap();
        }
        assert!(read_hourly_profile(&file_path, 2).is_err());

        // Too few rows for the modelled period
        {
            let mut file = File::create(&file_path).unwrap();
            writeln!(file, "t,solar,wind,demand\n0,0,1,1\n1,0,0,1").unwrap();
        }
        assert_error!(
            read_hourly_profile(&file_path, 8760),
            format!("Error reading {}", file_path.display())
        );
    }
}
