use serde::{Deserialize, Serialize};

/// Ordering applied to derived prompt lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Name ascending, case-sensitive.
    #[default]
    Name,
    /// Newest first.
    Created,
    /// Most recently updated first.
    Updated,
}

impl std::fmt::Display for SortOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortOrder::Name => write!(f, "name"),
            SortOrder::Created => write!(f, "created"),
            SortOrder::Updated => write!(f, "updated"),
        }
    }
}

impl std::str::FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "name" => Ok(SortOrder::Name),
            "created" | "date-created" => Ok(SortOrder::Created),
            "updated" | "date-updated" => Ok(SortOrder::Updated),
            _ => Err(format!("Invalid sort order: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sort_order() {
        assert_eq!("name".parse::<SortOrder>().unwrap(), SortOrder::Name);
        assert_eq!("Created".parse::<SortOrder>().unwrap(), SortOrder::Created);
        assert_eq!("date-updated".parse::<SortOrder>().unwrap(), SortOrder::Updated);
        assert!("size".parse::<SortOrder>().is_err());
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        for order in [SortOrder::Name, SortOrder::Created, SortOrder::Updated] {
            assert_eq!(order.to_string().parse::<SortOrder>().unwrap(), order);
        }
    }
}
