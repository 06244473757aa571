//! Alignment of encoded records to an estimator's trained columns.

use std::collections::{HashMap, HashSet};

use crate::FeatureRecord;

/// The ordered column list an estimator was trained on.
///
/// Alignment zero-fills absent columns and drops extra ones.  An absent
/// column is expected when it is an indicator of a categorical the record
/// does carry (only one indicator per categorical is ever set) or when it is
/// on the optional allow-list.  Any other absent column means the estimator
/// and the record disagree; it is still zero-filled, with a warning.
#[derive(Clone, Debug, PartialEq)]
pub struct FeatureSchema {
    columns:  Vec<String>,
    optional: HashSet<String>,
}

impl FeatureSchema {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns:  columns.into_iter().map(Into::into).collect(),
            optional: HashSet::new(),
        }
    }

    pub fn with_optional<I, S>(mut self, optional: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.optional.extend(optional.into_iter().map(Into::into));
        self
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Trained columns the record cannot supply and that are neither an
    /// unset indicator nor optional.
    pub fn missing_required(&self, record: &FeatureRecord) -> Vec<&str> {
        let encoded = record.encode();
        let present: HashSet<&str> = encoded.iter().map(|(n, _)| n.as_str()).collect();
        let categorical: Vec<&str> = record.categorical_names().collect();
        self.columns
            .iter()
            .map(String::as_str)
            .filter(|c| !present.contains(c))
            .filter(|c| !self.optional.contains(*c))
            .filter(|c| !is_indicator_of(c, &categorical))
            .collect()
    }

    /// Encode `record` and map it onto the trained columns, in order.
    pub fn align(&self, record: &FeatureRecord) -> Vec<f64> {
        let encoded: HashMap<String, f64> = record.encode().into_iter().collect();

        let missing = self.missing_required(record);
        if !missing.is_empty() {
            log::warn!(
                "speed features missing {} trained column(s), zero-filled: {}",
                missing.len(),
                missing.join(", ")
            );
        }
        if log::log_enabled!(log::Level::Debug) {
            let known: HashSet<&str> = self.columns.iter().map(String::as_str).collect();
            let extra: Vec<&str> = encoded
                .keys()
                .map(String::as_str)
                .filter(|k| !known.contains(k))
                .collect();
            if !extra.is_empty() {
                log::debug!("dropping untrained feature column(s): {}", extra.join(", "));
            }
        }

        self.columns
            .iter()
            .map(|c| encoded.get(c).copied().unwrap_or(0.0))
            .collect()
    }
}

fn is_indicator_of(column: &str, categorical: &[&str]) -> bool {
    categorical.iter().any(|cat| {
        column
            .strip_prefix(cat)
            .is_some_and(|rest| rest.starts_with('_') && rest.len() > 1)
    })
}
