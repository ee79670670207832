//! Input model of the interests list card.
//!
//! The card is rendered by a client; this backend only produces the values it is
//! built from. Click and follow actions are wired by the client using `topic_id`.

use serde::{Deserialize, Serialize};

use super::FollowableTopic;

/// Values needed to render one interests card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterestsItem {
    pub topic_id: String,
    pub name: String,
    pub following: bool,
    pub topic_image_url: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub is_selected: bool,
}

impl InterestsItem {
    pub fn new(
        topic_id: impl Into<String>,
        name: impl Into<String>,
        following: bool,
        topic_image_url: impl Into<String>,
    ) -> Self {
        Self {
            topic_id: topic_id.into(),
            name: name.into(),
            following,
            topic_image_url: topic_image_url.into(),
            description: String::new(),
            is_selected: false,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn selected(mut self, is_selected: bool) -> Self {
        self.is_selected = is_selected;
        self
    }

    /// Builds the card for a followable topic, using its short description.
    pub fn from_followable(followable: &FollowableTopic, selected_topic_id: Option<&str>) -> Self {
        let topic = &followable.topic;
        Self::new(
            topic.id.clone(),
            topic.name.clone(),
            followable.is_followed,
            topic.image_url.clone(),
        )
        .with_description(topic.short_description.clone())
        .selected(selected_topic_id == Some(topic.id.as_str()))
    }

    /// Canonical card variants used when previewing the interests list.
    pub fn previews() -> Vec<(&'static str, InterestsItem)> {
        vec![
            (
                "default",
                InterestsItem::new(
                    "android",
                    "Android Development",
                    false,
                    "https://example.com/android.jpg",
                )
                .with_description("Learn about the latest in Android development"),
            ),
            (
                "long_name",
                InterestsItem::new(
                    "ml",
                    "Advanced Machine Learning and Artificial Intelligence for Mobile Applications",
                    false,
                    "https://example.com/ml.jpg",
                )
                .with_description("Explore AI and ML technologies"),
            ),
            (
                "long_description",
                InterestsItem::new("kotlin", "Kotlin", true, "https://example.com/kotlin.jpg")
                    .with_description(
                        "Kotlin is a modern programming language that makes developers happier. \
                         It's concise, safe, interoperable with Java and other languages, and \
                         provides many ways to reuse code between multiple platforms for \
                         productive programming.",
                    ),
            ),
            (
                "empty_description",
                InterestsItem::new("compose", "Jetpack Compose", false, ""),
            ),
            (
                "selected",
                InterestsItem::new("ui", "UI Design", true, "https://example.com/ui.jpg")
                    .with_description("Design principles for mobile interfaces")
                    .selected(true),
            ),
        ]
    }
}
