use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;

use super::metric::percentage;
use crate::error::{PipelineError, ValidationError};
use crate::model::record::{as_object, read_count};
use crate::model::MissingCount;

const DOMAIN_FIELD: &str = "domain";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DomainRecord {
    pub count: u64,
    pub domain: String,
}

impl DomainRecord {
    pub fn new(count: u64, domain: impl Into<String>) -> Self {
        Self {
            count,
            domain: domain.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DomainShare {
    pub domain: String,
    pub count: u64,
    pub percentage: Option<f64>,
}

/// Decode `{ "_count": n, "domain": "..." }` records.
pub fn decode_domains(
    items: &[Value],
    missing_count: MissingCount,
) -> Result<Vec<DomainRecord>, ValidationError> {
    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let obj = as_object(index, item)?;
            let count = read_count(index, obj, missing_count)?;
            match obj.get(DOMAIN_FIELD) {
                Some(Value::String(domain)) if !domain.is_empty() => {
                    Ok(DomainRecord::new(count, domain.clone()))
                }
                _ => Err(ValidationError::MissingCategory {
                    index,
                    field: DOMAIN_FIELD.to_string(),
                }),
            }
        })
        .collect()
}

/// Listing counts per source domain, largest first, ties by domain name.
pub fn domain_shares(records: &[DomainRecord]) -> Result<Vec<DomainShare>, PipelineError> {
    let mut counts: HashMap<&str, u64> = HashMap::new();
    let mut grand_total = 0u64;
    for record in records {
        grand_total = grand_total
            .checked_add(record.count)
            .ok_or(PipelineError::CountOverflow)?;
        // bounded by grand_total
        *counts.entry(record.domain.as_str()).or_insert(0) += record.count;
    }

    let mut shares: Vec<_> = counts
        .into_iter()
        .map(|(domain, count)| DomainShare {
            domain: domain.to_string(),
            count,
            percentage: percentage(count, grand_total),
        })
        .collect();

    shares.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.domain.cmp(&b.domain)));
    Ok(shares)
}
