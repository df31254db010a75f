//! Duplicate classifier
//!
//! Partitions incoming records into duplicates and non-duplicates by
//! comparing mapped fields against a reference record set, then routes
//! exactly one partition to an output channel.

use crate::error::Result;
use crate::flowfile::{Channel, TransformResult};
use crate::record::{canonical_text, FieldMapping, Record};

/// Partition of incoming records produced by [`classify`]
///
/// Every incoming record appears in exactly one of the two sequences,
/// in its original input order.
#[derive(Debug, Clone, Default)]
pub struct Classification {
    /// Records for which some reference record satisfied every mapped field
    pub matched: Vec<Record>,

    /// Records no reference record matched
    pub unmatched: Vec<Record>,
}

/// Classify incoming records against a reference record set.
///
/// A record matches a reference record when, for every `(field, column)`
/// pair in the mapping, the canonical string forms of `record[field]` and
/// `reference[column]` are equal (missing fields and nulls share one
/// sentinel). The scan over reference records stops at the first match.
///
/// This is a plain O(incoming × reference × mapping) nested loop; batch
/// sizes are single-flowfile scale, so no indexing is used. Note the
/// vacuous-truth edge case: with an empty mapping every reference record
/// satisfies "all" conditions, so any record is matched as soon as the
/// reference set is non-empty.
pub fn classify(
    incoming: Vec<Record>,
    reference: &[Record],
    mapping: &FieldMapping,
) -> Classification {
    let mut classification = Classification::default();

    for record in incoming {
        let is_duplicate = reference.iter().any(|row| {
            mapping
                .iter()
                .all(|(field, column)| canonical_text(record.get(field)) == canonical_text(row.get(column)))
        });

        if is_duplicate {
            classification.matched.push(record);
        } else {
            classification.unmatched.push(record);
        }
    }

    classification
}

impl Classification {
    /// Select the single partition to emit, per the routing policy.
    ///
    /// Non-duplicates take priority: when `unmatched` is non-empty it is
    /// emitted on `success` and `matched` is discarded entirely, even if
    /// non-empty. Only an all-duplicate batch is emitted on `duplicate`.
    /// An empty batch produces no output.
    pub fn route(self) -> Option<(Channel, Vec<Record>)> {
        if !self.unmatched.is_empty() {
            Some((Channel::Success, self.unmatched))
        } else if !self.matched.is_empty() {
            Some((Channel::Duplicate, self.matched))
        } else {
            None
        }
    }

    /// Serialize the routed partition into a transform result.
    pub fn into_transform_result(self) -> Result<Option<TransformResult>> {
        match self.route() {
            Some((channel, records)) => {
                let contents = serde_json::to_string(&records)?;
                Ok(Some(TransformResult::new(channel, contents)))
            }
            None => Ok(None),
        }
    }
}
