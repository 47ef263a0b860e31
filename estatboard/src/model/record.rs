use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::category::CategoryDimension;
use crate::error::{Result, ValidationError};

pub(crate) const COUNT_FIELD: &str = "_count";
const ROOM_COUNT_FIELD: &str = "roomCount";

/// One row of a backend `GROUP BY` query.
///
/// `category` stays the raw wire string: values outside the active dimension
/// survive decoding and are dropped later by the aggregator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCountRecord {
    pub count: u64,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_count: Option<u32>,
}

impl RawCountRecord {
    pub fn new(count: u64, category: impl Into<String>, room_count: Option<u32>) -> Self {
        Self {
            count,
            category: category.into(),
            room_count,
        }
    }

    /// Record for a flat bucket.
    pub fn rooms(count: u64, category: impl Into<String>, room_count: u32) -> Self {
        Self::new(count, category, Some(room_count))
    }

    /// Record without a room breakdown (houses, land).
    pub fn whole(count: u64, category: impl Into<String>) -> Self {
        Self::new(count, category, None)
    }
}

/// What to do when a record has no `_count` (or `_count: null`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingCount {
    /// Fail with [`ValidationError::MissingCount`].
    #[default]
    Reject,
    /// Treat the record as counting zero listings.
    ZeroFill,
}

/// Builds [`RawCountRecord`]s from the statistics API wire shape
/// `{ "_count": n, "roomCount": n | null, "<author|dealType>": "..." }`.
#[derive(Debug, Clone, Copy)]
pub struct RecordDecoder {
    dimension: CategoryDimension,
    missing_count: MissingCount,
}

impl RecordDecoder {
    pub fn new(dimension: CategoryDimension) -> Self {
        Self {
            dimension,
            missing_count: MissingCount::default(),
        }
    }

    pub fn missing_count(mut self, policy: MissingCount) -> Self {
        self.missing_count = policy;
        self
    }

    pub fn dimension(&self) -> CategoryDimension {
        self.dimension
    }

    /// Decode a raw JSON body.
    pub fn decode_json(&self, body: &str) -> Result<Vec<RawCountRecord>> {
        let value: Value = serde_json::from_str(body)?;
        Ok(self.decode_value(&value)?)
    }

    /// Decode an already parsed JSON document, which must be an array.
    pub fn decode_value(
        &self,
        value: &Value,
    ) -> std::result::Result<Vec<RawCountRecord>, ValidationError> {
        let items = value.as_array().ok_or(ValidationError::NotAnArray)?;
        self.decode(items)
    }

    pub fn decode(
        &self,
        items: &[Value],
    ) -> std::result::Result<Vec<RawCountRecord>, ValidationError> {
        items
            .iter()
            .enumerate()
            .map(|(index, item)| self.decode_one(index, item))
            .collect()
    }

    pub fn decode_one(
        &self,
        index: usize,
        item: &Value,
    ) -> std::result::Result<RawCountRecord, ValidationError> {
        let obj = as_object(index, item)?;
        let count = read_count(index, obj, self.missing_count)?;

        let room_count = match obj.get(ROOM_COUNT_FIELD) {
            None | Some(Value::Null) => None,
            Some(v) => Some(read_u32(v).ok_or_else(|| ValidationError::InvalidRoomCount {
                index,
                value: v.to_string(),
            })?),
        };

        let field = self.dimension.wire_field();
        let category = match obj.get(field) {
            Some(Value::String(s)) if !s.is_empty() => s.clone(),
            _ => {
                return Err(ValidationError::MissingCategory {
                    index,
                    field: field.to_string(),
                })
            }
        };

        Ok(RawCountRecord {
            count,
            category,
            room_count,
        })
    }
}

pub(crate) fn as_object(
    index: usize,
    item: &Value,
) -> std::result::Result<&Map<String, Value>, ValidationError> {
    item.as_object()
        .ok_or(ValidationError::NotAnObject { index })
}

pub(crate) fn read_count(
    index: usize,
    obj: &Map<String, Value>,
    policy: MissingCount,
) -> std::result::Result<u64, ValidationError> {
    match obj.get(COUNT_FIELD) {
        None | Some(Value::Null) => match policy {
            MissingCount::Reject => Err(ValidationError::MissingCount { index }),
            MissingCount::ZeroFill => Ok(0),
        },
        Some(v) => v.as_u64().ok_or_else(|| ValidationError::InvalidCount {
            index,
            value: v.to_string(),
        }),
    }
}

/// Non-negative integer that fits in `u32`. Floats are rejected even when whole.
pub(crate) fn read_u32(value: &Value) -> Option<u32> {
    value.as_u64().and_then(|n| u32::try_from(n).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn author() -> RecordDecoder {
        RecordDecoder::new(CategoryDimension::Author)
    }

    #[test]
    fn test_decode_flat_records() {
        let body = json!([
            { "_count": 10, "roomCount": 0, "author": "owner" },
            { "_count": 4, "roomCount": null, "author": "agency" },
            { "_count": 1, "author": "agency" }
        ]);

        let records = author().decode_value(&body).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0], RawCountRecord::rooms(10, "owner", 0));
        assert_eq!(records[1], RawCountRecord::whole(4, "agency"));
        assert_eq!(records[2].room_count, None);
    }

    #[test]
    fn test_decode_uses_dimension_field() {
        let decoder = RecordDecoder::new(CategoryDimension::DealType);
        let record = decoder
            .decode_one(0, &json!({ "_count": 3, "dealType": "rentLong" }))
            .unwrap();
        assert_eq!(record.category, "rentLong");

        let err = decoder
            .decode_one(0, &json!({ "_count": 3, "author": "owner" }))
            .unwrap_err();
        assert_eq!(
            err,
            ValidationError::MissingCategory {
                index: 0,
                field: "dealType".to_string()
            }
        );
    }

    #[test]
    fn test_unknown_category_survives_decoding() {
        let record = author()
            .decode_one(0, &json!({ "_count": 2, "author": "developer" }))
            .unwrap();
        assert_eq!(record.category, "developer");
    }

    #[test]
    fn test_missing_count_rejected_by_default() {
        let err = author()
            .decode(&[json!({ "_count": 1, "author": "owner" }), json!({ "author": "owner" })])
            .unwrap_err();
        assert_eq!(err, ValidationError::MissingCount { index: 1 });
    }

    #[test]
    fn test_missing_count_zero_fill() {
        let decoder = author().missing_count(MissingCount::ZeroFill);
        let record = decoder
            .decode_one(0, &json!({ "_count": null, "author": "owner" }))
            .unwrap();
        assert_eq!(record.count, 0);
    }

    #[test]
    fn test_invalid_numbers() {
        assert!(matches!(
            author().decode_one(0, &json!({ "_count": -1, "author": "owner" })),
            Err(ValidationError::InvalidCount { .. })
        ));
        assert!(matches!(
            author().decode_one(0, &json!({ "_count": 1.5, "author": "owner" })),
            Err(ValidationError::InvalidCount { .. })
        ));
        assert!(matches!(
            author().decode_one(0, &json!({ "_count": 1, "roomCount": "two", "author": "owner" })),
            Err(ValidationError::InvalidRoomCount { .. })
        ));
        assert!(matches!(
            author().decode_one(0, &json!({ "_count": 1, "roomCount": -2, "author": "owner" })),
            Err(ValidationError::InvalidRoomCount { .. })
        ));
    }

    #[test]
    fn test_empty_category_rejected() {
        assert!(matches!(
            author().decode_one(3, &json!({ "_count": 1, "author": "" })),
            Err(ValidationError::MissingCategory { index: 3, .. })
        ));
    }

    #[test]
    fn test_shape_errors() {
        assert_eq!(
            author().decode_value(&json!({ "items": [] })).unwrap_err(),
            ValidationError::NotAnArray
        );
        assert_eq!(
            author().decode_value(&json!([42])).unwrap_err(),
            ValidationError::NotAnObject { index: 0 }
        );
        assert!(author().decode_json("not json").is_err());
    }
}
