//! Running sample statistics.
//!
//! `Statistics` keeps count, sum, and sum of squares, so mean and variance
//! are available without storing the samples.  Its `Display` form is the
//! run-summary record `<stats:#=N:avg=X:var=Y:avg^2=Z>` and `FromStr`
//! revives an accumulator from that record.

use std::fmt;
use std::str::FromStr;

use crate::error::FwError;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Statistics {
    count:  u64,
    sum:    f64,
    sum_sq: f64,
}

impl Statistics {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn add_sample(&mut self, value: f64) {
        self.count += 1;
        self.sum += value;
        self.sum_sq += value * value;
    }

    pub fn add_samples<I: IntoIterator<Item = f64>>(&mut self, values: I) {
        for v in values {
            self.add_sample(v);
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    #[inline]
    pub fn count(&self) -> u64 {
        self.count
    }

    #[inline]
    pub fn sum(&self) -> f64 {
        self.sum
    }

    /// `None` with no samples.
    pub fn mean(&self) -> Option<f64> {
        (self.count >= 1).then(|| self.sum / self.count as f64)
    }

    /// Unbiased sample variance; `None` with fewer than two samples.
    pub fn variance(&self) -> Option<f64> {
        if self.count < 2 {
            return None;
        }
        let n = self.count as f64;
        Some((self.sum_sq - self.sum * self.sum / n) / (n - 1.0))
    }

    /// Mean of the squared samples; `None` with no samples.
    pub fn mean_square(&self) -> Option<f64> {
        (self.count >= 1).then(|| self.sum_sq / self.count as f64)
    }
}

impl fmt::Display for Statistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<stats:#={}:avg=", self.count)?;
        if let Some(avg) = self.mean() {
            write!(f, "{avg:.8}")?;
        }
        f.write_str(":var=")?;
        if let Some(var) = self.variance() {
            write!(f, "{var:.8}")?;
        }
        f.write_str(":avg^2=")?;
        if self.count >= 2 {
            if let Some(sq) = self.mean_square() {
                write!(f, "{sq:.8}")?;
            }
        }
        f.write_str(">")
    }
}

impl FromStr for Statistics {
    type Err = FwError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || FwError::StatsParse(s.to_owned());

        let body = s
            .trim()
            .strip_prefix('<')
            .and_then(|b| b.strip_suffix('>'))
            .ok_or_else(bad)?;
        let fields: Vec<&str> = body.split([':', '=']).collect();
        if fields.len() != 9 || fields[0] != "stats" {
            return Err(bad());
        }

        let count: u64 = fields[2].parse().map_err(|_| bad())?;
        if count == 0 {
            return Ok(Self::default());
        }

        let field = |i: usize| -> Result<f64, FwError> {
            if fields[i].is_empty() {
                Ok(0.0)
            } else {
                fields[i].parse().map_err(|_| bad())
            }
        };
        let n = count as f64;
        Ok(Self {
            count,
            sum: field(4)? * n,
            sum_sq: field(8)? * n,
        })
    }
}
