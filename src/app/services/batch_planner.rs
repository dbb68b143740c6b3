//! Fixed-size batch planning for the upload loop
//!
//! A plan borrows the parsed record sequence and hands out contiguous,
//! order-preserving slices. Every batch except the last is exactly
//! `batch_size` long; the last holds the remainder.

use crate::app::models::FacilityRecord;
use crate::{Error, Result};

/// Partition of a record sequence into numbered batches
#[derive(Debug, Clone, Copy)]
pub struct BatchPlan<'a> {
    records: &'a [FacilityRecord],
    batch_size: usize,
}

impl<'a> BatchPlan<'a> {
    /// Create a plan, rejecting a zero batch size
    pub fn new(records: &'a [FacilityRecord], batch_size: usize) -> Result<Self> {
        if batch_size == 0 {
            return Err(Error::configuration("Batch size must be at least 1"));
        }
        Ok(Self {
            records,
            batch_size,
        })
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn total_records(&self) -> usize {
        self.records.len()
    }

    /// Number of batches, `ceil(total / batch_size)`
    pub fn total_batches(&self) -> usize {
        self.records.len().div_ceil(self.batch_size)
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Batches in order, produced lazily
    pub fn iter(&self) -> impl Iterator<Item = Batch<'a>> + 'a {
        let total_batches = self.total_batches();
        let total_records = self.records.len();
        let batch_size = self.batch_size;

        self.records
            .chunks(batch_size)
            .enumerate()
            .map(move |(index, records)| Batch {
                number: index + 1,
                total_batches,
                offset: index * batch_size,
                total_records,
                records,
            })
    }
}

/// One contiguous slice of the plan
#[derive(Debug, Clone, Copy)]
pub struct Batch<'a> {
    /// 1-based batch number
    pub number: usize,
    pub total_batches: usize,
    /// Index of the first record within the full sequence
    pub offset: usize,
    pub total_records: usize,
    pub records: &'a [FacilityRecord],
}

impl Batch<'_> {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records handled once this batch is done, capped at the total
    pub fn processed_through(&self) -> usize {
        (self.offset + self.records.len()).min(self.total_records)
    }

    pub fn percent_complete(&self) -> f64 {
        if self.total_records == 0 {
            100.0
        } else {
            (self.processed_through() as f64 / self.total_records as f64) * 100.0
        }
    }

    pub fn is_last(&self) -> bool {
        self.number == self.total_batches
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::models::FacilityDraft;

    fn sample_records(count: usize) -> Vec<FacilityRecord> {
        (0..count)
            .map(|index| {
                FacilityDraft {
                    facility_type: "요양원".to_string(),
                    name: format!("시설 {}", index),
                    postal_code: String::new(),
                    address: "서울 강남구".to_string(),
                    phone: String::new(),
                    latitude: 0.0,
                    longitude: 0.0,
                    sido: "서울".to_string(),
                    sigungu: "강남구".to_string(),
                }
                .into_record()
                .unwrap()
            })
            .collect()
    }

    #[test]
    fn test_zero_batch_size_is_rejected() {
        let records = sample_records(3);
        assert!(matches!(
            BatchPlan::new(&records, 0),
            Err(Error::Configuration { .. })
        ));
    }

    #[test]
    fn test_remainder_goes_to_last_batch() {
        let records = sample_records(250);
        let plan = BatchPlan::new(&records, 100).unwrap();

        assert_eq!(plan.total_batches(), 3);
        let sizes: Vec<usize> = plan.iter().map(|batch| batch.len()).collect();
        assert_eq!(sizes, vec![100, 100, 50]);

        let last = plan.iter().last().unwrap();
        assert_eq!(last.number, 3);
        assert_eq!(last.offset, 200);
        assert!(last.is_last());
        assert_eq!(last.processed_through(), 250);
        assert_eq!(last.percent_complete(), 100.0);
    }

    #[test]
    fn test_exact_multiple_and_small_inputs() {
        let records = sample_records(200);
        assert_eq!(BatchPlan::new(&records, 100).unwrap().total_batches(), 2);

        let records = sample_records(1);
        let plan = BatchPlan::new(&records, 100).unwrap();
        assert_eq!(plan.total_batches(), 1);
        assert!(plan.iter().next().unwrap().is_last());

        let plan = BatchPlan::new(&[], 100).unwrap();
        assert!(plan.is_empty());
        assert_eq!(plan.total_batches(), 0);
        assert_eq!(plan.iter().count(), 0);
    }

    #[test]
    fn test_concatenation_preserves_order() {
        let records = sample_records(7);
        let plan = BatchPlan::new(&records, 3).unwrap();

        let names: Vec<&str> = plan
            .iter()
            .flat_map(|batch| batch.records.iter().map(|r| r.name()))
            .collect();
        let expected: Vec<&str> = records.iter().map(|r| r.name()).collect();
        assert_eq!(names, expected);
    }

    #[test]
    fn test_progress_percentages() {
        let records = sample_records(18_708);
        let plan = BatchPlan::new(&records, 100).unwrap();
        assert_eq!(plan.total_batches(), 188);

        let third = plan.iter().nth(2).unwrap();
        assert_eq!(third.number, 3);
        assert_eq!(third.processed_through(), 300);
        assert!((third.percent_complete() - 1.6036).abs() < 0.001);
    }
}
