use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::Error;

/// Secondary axis of a statistics query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CategoryDimension {
    Author,
    DealType,
}

/// One member of a [`CategoryDimension`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Category {
    Owner,
    Agency,
    Sale,
    RentShort,
    RentLong,
}

const AUTHOR_MEMBERS: [Category; 2] = [Category::Owner, Category::Agency];
const DEAL_TYPE_MEMBERS: [Category; 3] = [Category::Sale, Category::RentShort, Category::RentLong];

impl CategoryDimension {
    /// JSON field carrying the category value in API responses.
    pub fn wire_field(&self) -> &'static str {
        match self {
            Self::Author => "author",
            Self::DealType => "dealType",
        }
    }

    /// Path segment used by the statistics API.
    pub fn api_segment(&self) -> &'static str {
        match self {
            Self::Author => "author",
            Self::DealType => "deal-type",
        }
    }

    /// Members in display order.
    pub fn members(&self) -> &'static [Category] {
        match self {
            Self::Author => &AUTHOR_MEMBERS,
            Self::DealType => &DEAL_TYPE_MEMBERS,
        }
    }
}

impl std::fmt::Display for CategoryDimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.api_segment())
    }
}

impl FromStr for CategoryDimension {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "author" => Ok(Self::Author),
            "deal-type" | "dealtype" => Ok(Self::DealType),
            _ => Err(Error::UnknownValue {
                what: "category dimension",
                value: s.to_string(),
            }),
        }
    }
}

impl Category {
    pub fn wire_name(&self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::Agency => "agency",
            Self::Sale => "sale",
            Self::RentShort => "rentShort",
            Self::RentLong => "rentLong",
        }
    }

    pub fn dimension(&self) -> CategoryDimension {
        match self {
            Self::Owner | Self::Agency => CategoryDimension::Author,
            Self::Sale | Self::RentShort | Self::RentLong => CategoryDimension::DealType,
        }
    }

    /// Column header shown in tables.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Owner => "Собственник",
            Self::Agency => "Агентство",
            Self::Sale => "Продажа",
            Self::RentShort => "Посуточно",
            Self::RentLong => "Длительно",
        }
    }

    /// Exact match against the wire value; anything else is not a member.
    pub fn from_wire(value: &str, dimension: CategoryDimension) -> Option<Self> {
        dimension
            .members()
            .iter()
            .copied()
            .find(|member| member.wire_name() == value)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.wire_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_members_follow_dimension() {
        for dimension in [CategoryDimension::Author, CategoryDimension::DealType] {
            for member in dimension.members() {
                assert_eq!(member.dimension(), dimension);
            }
        }
        assert_eq!(
            CategoryDimension::DealType.members(),
            &[Category::Sale, Category::RentShort, Category::RentLong]
        );
    }

    #[test]
    fn test_from_wire_is_exact() {
        assert_eq!(
            Category::from_wire("rentShort", CategoryDimension::DealType),
            Some(Category::RentShort)
        );
        assert_eq!(Category::from_wire("Owner", CategoryDimension::Author), None);
        assert_eq!(Category::from_wire("owner", CategoryDimension::DealType), None);
    }

    #[test]
    fn test_parse_dimension() {
        assert_eq!(
            "deal_type".parse::<CategoryDimension>().unwrap(),
            CategoryDimension::DealType
        );
        assert_eq!(
            "Author".parse::<CategoryDimension>().unwrap(),
            CategoryDimension::Author
        );
        assert!("price".parse::<CategoryDimension>().is_err());
    }
}
