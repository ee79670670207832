//! Followable topic view model and sort selector.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::Topic;
use crate::errors::AppError;

/// A topic paired with whether the current user follows it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowableTopic {
    pub topic: Topic,
    pub is_followed: bool,
}

/// Field used to order followable topics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TopicSortField {
    /// Keep the order the topic source emitted.
    #[default]
    None,
    /// Lexicographic, case-sensitive, by display name.
    Name,
}

impl FromStr for TopicSortField {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" | "" => Ok(TopicSortField::None),
            "name" => Ok(TopicSortField::Name),
            other => Err(AppError::Validation(format!(
                "Unknown sort field '{}', expected 'none' or 'name'",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sort_field() {
        assert_eq!("NAME".parse::<TopicSortField>().unwrap(), TopicSortField::Name);
        assert_eq!("none".parse::<TopicSortField>().unwrap(), TopicSortField::None);
        assert_eq!("".parse::<TopicSortField>().unwrap(), TopicSortField::None);
        assert!("date".parse::<TopicSortField>().is_err());
    }

    #[test]
    fn test_default_sort_field_is_none() {
        assert_eq!(TopicSortField::default(), TopicSortField::None);
    }
}
