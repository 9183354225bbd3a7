//! This module defines various unit types and their conversions.
//!
//! Every sized quantity is a [`Capacity`] priced in [`MoneyPerCapacity`]. Generation and storage
//! power capacities are in power units (e.g. GW) and hourly flows in energy units (e.g. GWh), so
//! one unit of capacity running for one hour yields one unit of [`Energy`]. Storage energy
//! capacity is in energy units, so it converts directly to the [`Energy`] held when full.
use serde::{Deserialize, Serialize};

macro_rules! unit_struct {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            PartialOrd,
            Default,
            Serialize,
            Deserialize,
            derive_more::Add,
            derive_more::Sub,
            derive_more::Display,
        )]
        pub struct $name(pub f64);

        impl $name {
            /// Create a new instance of the unit type from an `f64` value
            pub const fn new(val: f64) -> Self {
                Self(val)
            }

            /// Get the value of the unit type as an `f64`
            pub const fn value(self) -> f64 {
                self.0
            }

            /// Whether the underlying value is neither infinite nor NaN
            pub fn is_finite(self) -> bool {
                self.0.is_finite()
            }
        }

        impl From<f64> for $name {
            fn from(val: f64) -> Self {
                Self(val)
            }
        }

        impl std::ops::Mul<Dimensionless> for $name {
            type Output = $name;
            fn mul(self, rhs: Dimensionless) -> $name {
                $name(self.0 * rhs.0)
            }
        }

        impl std::ops::Div<Dimensionless> for $name {
            type Output = $name;
            fn div(self, rhs: Dimensionless) -> $name {
                $name(self.0 / rhs.0)
            }
        }

        impl std::iter::Sum for $name {
            fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
                $name(iter.map(|x| x.0).sum())
            }
        }
    };
}

macro_rules! impl_mul {
    ($Lhs:ty, $Rhs:ty, $Out:ty) => {
        impl std::ops::Mul<$Rhs> for $Lhs {
            type Output = $Out;
            fn mul(self, rhs: $Rhs) -> $Out {
                <$Out>::new(self.0 * rhs.0)
            }
        }
        impl std::ops::Mul<$Lhs> for $Rhs {
            type Output = $Out;
            fn mul(self, lhs: $Lhs) -> $Out {
                <$Out>::new(self.0 * lhs.0)
            }
        }
    };
}

unit_struct!(
    /// A dimensionless quantity, such as a capacity factor or an efficiency
    Dimensionless
);
unit_struct!(
    /// An amount of money
    Money
);
unit_struct!(
    /// An amount of energy (or an hourly energy flow)
    Energy
);
unit_struct!(
    /// Installed capacity
    Capacity
);
unit_struct!(
    /// Capital cost per unit of installed capacity
    MoneyPerCapacity
);
unit_struct!(
    /// Operating cost per unit of energy
    MoneyPerEnergy
);

impl_mul!(MoneyPerCapacity, Capacity, Money);
impl_mul!(MoneyPerEnergy, Energy, Money);

impl Capacity {
    /// The energy yielded by this capacity over one hour at the given capacity factor
    pub fn hourly_output(self, capacity_factor: Dimensionless) -> Energy {
        Energy(self.0 * capacity_factor.0)
    }

    /// The energy held by this much storage energy capacity when full
    pub fn stored_energy(self) -> Energy {
        Energy(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::assert_approx_eq;

    #[test]
    fn test_cost_multiplication() {
        let cost = MoneyPerCapacity(8e8) * Capacity(2.5);
        assert_approx_eq!(f64, cost.value(), 2e9);

        let cost = Energy(3.0) * MoneyPerEnergy(1000.0);
        assert_approx_eq!(f64, cost.value(), 3000.0);
    }

    #[test]
    fn test_hourly_output() {
        let output = Capacity(10.0).hourly_output(Dimensionless(0.25));
        assert_eq!(output, Energy(2.5));
    }

    #[test]
    fn test_stored_energy() {
        let storage = Capacity(1.5e3);
        assert_eq!(storage.stored_energy(), Energy(1.5e3));
        assert_eq!(storage.stored_energy(), storage.hourly_output(Dimensionless(1.0)));
    }

    #[test]
    fn test_sum() {
        let total: Energy = [Energy(1.0), Energy(2.0), Energy(0.5)].into_iter().sum();
        assert_eq!(total, Energy(3.5));
    }
}
