use std::{
    fmt,
    ops::{BitOr, BitOrAssign},
};

use ndarray::{Array1, Zip};

/// Set of physical-limit checks a sample failed.
///
/// A sample is valid iff no flag is set.
/// Flags combine with `|`, so the overall validity of a sample is the logical
/// AND of every independent check, while still recording which checks failed.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Violations(u8);

impl Violations {
    /// A query coordinate fell outside its interpolation axis and was clamped.
    pub const CLAMPED: Self = Self(1);
    /// The loss density exceeded the material's ceiling.
    pub const LOSS_DENSITY: Self = Self(1 << 1);
    /// The peak flux density exceeded the saturation limit.
    pub const SATURATION: Self = Self(1 << 2);
    /// The combined RMS current density exceeded the limit.
    pub const CURRENT_DENSITY: Self = Self(1 << 3);
    /// The equivalent frequency exceeded the limit.
    pub const FREQUENCY: Self = Self(1 << 4);
    /// The duty cycle was outside the open interval (0, 1).
    pub const DUTY_CYCLE: Self = Self(1 << 5);
    /// An input was NaN, infinite, or not representable on a log axis.
    pub const NON_FINITE: Self = Self(1 << 6);

    const NAMES: [(Self, &'static str); 7] = [
        (Self::CLAMPED, "CLAMPED"),
        (Self::LOSS_DENSITY, "LOSS_DENSITY"),
        (Self::SATURATION, "SATURATION"),
        (Self::CURRENT_DENSITY, "CURRENT_DENSITY"),
        (Self::FREQUENCY, "FREQUENCY"),
        (Self::DUTY_CYCLE, "DUTY_CYCLE"),
        (Self::NON_FINITE, "NON_FINITE"),
    ];

    /// Returns a set with no flags.
    #[must_use]
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Returns `true` if no check failed.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns `true` if every flag in `other` is also set in `self`.
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns the raw bit representation.
    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Returns `flag` if `failed` is true, otherwise the empty set.
    #[must_use]
    pub const fn when(failed: bool, flag: Self) -> Self {
        if failed { flag } else { Self::empty() }
    }
}

impl BitOr for Violations {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for Violations {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl fmt::Debug for Violations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut set = f.debug_set();
        for (flag, name) in Self::NAMES {
            if self.contains(flag) {
                set.entry(&format_args!("{name}"));
            }
        }
        set.finish()
    }
}

/// Per-sample values paired with the checks each sample failed.
///
/// Entries of `value` where `violations` is non-empty hold clamped
/// placeholders and must not be trusted.
#[derive(Debug, Clone, PartialEq)]
pub struct Flagged<T = f64> {
    pub value: Array1<T>,
    pub violations: Array1<Violations>,
}

impl<T> Flagged<T> {
    /// Returns the per-sample validity vector.
    #[must_use]
    pub fn valid(&self) -> Array1<bool> {
        self.violations.mapv(Violations::is_empty)
    }

    /// Number of samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.value.len()
    }

    /// Returns `true` if there are no samples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}

/// Combines two violation vectors sample by sample.
pub fn merge_violations(into: &mut Array1<Violations>, other: &Array1<Violations>) {
    Zip::from(into).and(other).for_each(|a, &b| *a |= b);
}
