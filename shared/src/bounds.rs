use serde::{Deserialize, Serialize};

use crate::visit::VisitRecord;

/// Inclusive year range the timeline can express.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct YearBounds {
    pub min: i32,
    pub max: i32,
}

impl YearBounds {
    pub fn new(min: i32, max: i32) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    /// Clamp to the nearer bound.
    pub fn clamp(&self, year: i32) -> i32 {
        year.clamp(self.min, self.max)
    }
}

/// Bounds padded by one year on each side of the recorded years, or the
/// defaults when there is nothing recorded.
pub fn compute_bounds(records: &[VisitRecord], default_min: i32, default_max: i32) -> YearBounds {
    let mut years = records.iter().map(|record| record.year);
    let Some(first) = years.next() else {
        return YearBounds::new(default_min, default_max);
    };
    let (lo, hi) = years.fold((first, first), |(lo, hi), y| (lo.min(y), hi.max(y)));
    YearBounds::new(lo.saturating_sub(1), hi.saturating_add(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(year: i32, place: &str) -> VisitRecord {
        VisitRecord::new(year, place)
    }

    #[test]
    fn empty_records_use_defaults() {
        assert_eq!(compute_bounds(&[], 1980, 2030), YearBounds::new(1980, 2030));
    }

    #[test]
    fn pads_one_year_each_side() {
        let records = [rec(1999, "FR"), rec(2005, "JP")];
        assert_eq!(
            compute_bounds(&records, 1980, 2030),
            YearBounds::new(1998, 2006)
        );
    }

    #[test]
    fn unordered_and_single_record() {
        let records = [rec(2010, "DE"), rec(1990, "US"), rec(2001, "IT")];
        assert_eq!(
            compute_bounds(&records, 1980, 2030),
            YearBounds::new(1989, 2011)
        );
        assert_eq!(
            compute_bounds(&[rec(2000, "NO")], 1980, 2030),
            YearBounds::new(1999, 2001)
        );
    }

    #[test]
    fn bounds_may_leave_default_range() {
        let records = [rec(1950, "GB"), rec(2040, "MX")];
        assert_eq!(
            compute_bounds(&records, 1980, 2030),
            YearBounds::new(1949, 2041)
        );
    }

    #[test]
    fn clamps_to_nearer_bound() {
        let bounds = YearBounds::new(1998, 2006);
        assert_eq!(bounds.clamp(1980), 1998);
        assert_eq!(bounds.clamp(2030), 2006);
        assert_eq!(bounds.clamp(2001), 2001);
    }

    #[test]
    fn new_orders_endpoints() {
        assert_eq!(YearBounds::new(2030, 1980), YearBounds::new(1980, 2030));
    }
}
