//! Termfreq bounds and estimates for combining two postlists.
//!
//! Estimates assume the two operands occur independently of each other:
//! `P(l and r) = P(l) * P(r)`. They are off for correlated terms, which is
//! accepted. Every estimate is floored and then clamped into the `[min, max]`
//! bounds of the combination.

use crate::common::types::DocCount;

/// Clamps an estimate into `[min, max]`. A `max` below `min` keeps `min`.
pub fn clamp_estimate(est: DocCount, min: DocCount, max: DocCount) -> DocCount {
    est.min(max).max(min)
}

#[inline]
fn floor_count(value: f64) -> DocCount {
    if value <= 0.0 {
        0
    } else {
        value.min(DocCount::MAX as f64) as DocCount
    }
}

pub fn and_term_freq_min() -> DocCount {
    0
}

pub fn and_term_freq_max(lmax: DocCount, rmax: DocCount) -> DocCount {
    lmax.min(rmax)
}

/// `lest * rest / db_size`, `0` for an empty collection.
pub fn and_term_freq_est(lest: DocCount, rest: DocCount, db_size: DocCount) -> DocCount {
    if db_size == 0 {
        return 0;
    }
    floor_count(lest as f64 * rest as f64 / db_size as f64)
}

pub fn or_term_freq_min(lmin: DocCount, rmin: DocCount) -> DocCount {
    lmin.max(rmin)
}

pub fn or_term_freq_max(lmax: DocCount, rmax: DocCount, db_size: DocCount) -> DocCount {
    lmax.saturating_add(rmax).min(db_size)
}

/// `lest + rest - lest * rest / db_size`.
pub fn or_term_freq_est(lest: DocCount, rest: DocCount, db_size: DocCount) -> DocCount {
    if db_size == 0 {
        return 0;
    }
    let (lest, rest) = (lest as f64, rest as f64);
    floor_count(lest + rest - lest * rest / db_size as f64)
}

pub fn and_not_term_freq_min(lmin: DocCount, rmax: DocCount) -> DocCount {
    lmin.saturating_sub(rmax)
}

/// `lest * (1 - rest / db_size)`.
pub fn and_not_term_freq_est(lest: DocCount, rest: DocCount, db_size: DocCount) -> DocCount {
    if db_size == 0 {
        return 0;
    }
    floor_count(lest as f64 * (1.0 - rest as f64 / db_size as f64))
}
