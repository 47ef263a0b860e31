use async_trait::async_trait;
use estatboard::{CategoryDimension, RealEstateKind};
use serde_json::Value;
use std::path::Path;

use super::traits::StatsSource;
use crate::error::{ClientError, Result};
use crate::query::StatsQuery;

/// Serves one pre-recorded response body for every request.
///
/// Used for offline runs against an exported API response.
#[derive(Debug, Clone)]
pub struct FixtureSource {
    name: String,
    rows: Vec<Value>,
}

impl FixtureSource {
    pub fn new(name: impl Into<String>, rows: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }

    pub fn from_json(name: impl Into<String>, body: &str) -> Result<Self> {
        let name = name.into();
        match serde_json::from_str(body)? {
            Value::Array(rows) => Ok(Self::new(name, rows)),
            _ => Err(ClientError::UnexpectedShape {
                url: name,
                reason: "expected a JSON array".to_string(),
            }),
        }
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let body = std::fs::read_to_string(path)?;
        Self::from_json(path.display().to_string(), &body)
    }

    pub fn rows(&self) -> &[Value] {
        &self.rows
    }
}

#[async_trait]
impl StatsSource for FixtureSource {
    async fn fetch_room_counts(
        &self,
        _kind: RealEstateKind,
        _dimension: CategoryDimension,
        _query: &StatsQuery,
    ) -> Result<Vec<Value>> {
        Ok(self.rows.clone())
    }

    async fn fetch_activity(&self, _kind: RealEstateKind, _query: &StatsQuery) -> Result<Vec<Value>> {
        Ok(self.rows.clone())
    }

    async fn fetch_domains(&self, _query: &StatsQuery) -> Result<Vec<Value>> {
        Ok(self.rows.clone())
    }

    fn source_name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json() {
        let source = FixtureSource::from_json("inline", r#"[{"_count": 1, "domain": "avito.ru"}]"#)
            .unwrap();
        assert_eq!(source.rows().len(), 1);
        assert_eq!(source.source_name(), "inline");
    }

    #[test]
    fn test_rejects_object_body() {
        assert!(matches!(
            FixtureSource::from_json("inline", r#"{"rows": []}"#),
            Err(ClientError::UnexpectedShape { .. })
        ));
        assert!(matches!(
            FixtureSource::from_json("inline", "[1,"),
            Err(ClientError::Json(_))
        ));
    }
}
