//! User preferences snapshot.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ThemeBrand {
    #[default]
    Default,
    Android,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DarkThemeConfig {
    #[default]
    FollowSystem,
    Light,
    Dark,
}

/// The current user's preferences, read as one atomic snapshot.
///
/// Sets are ordered so the persisted JSON is stable between writes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserData {
    pub bookmarked_news_resources: BTreeSet<String>,
    pub viewed_news_resources: BTreeSet<String>,
    pub followed_topics: BTreeSet<String>,
    pub theme_brand: ThemeBrand,
    pub dark_theme_config: DarkThemeConfig,
    pub use_dynamic_color: bool,
    pub should_hide_onboarding: bool,
}

impl UserData {
    pub fn is_following(&self, topic_id: &str) -> bool {
        self.followed_topics.contains(topic_id)
    }
}

/// Adds or removes `id` from `set`.
pub(crate) fn toggle_membership(set: &mut BTreeSet<String>, id: &str, member: bool) {
    if member {
        set.insert(id.to_string());
    } else {
        set.remove(id);
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetFollowedTopicsRequest {
    pub topic_ids: BTreeSet<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SetFollowedRequest {
    pub followed: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SetBookmarkedRequest {
    pub bookmarked: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SetViewedRequest {
    pub viewed: bool,
}

/// Partial update of the display preferences; absent fields are left alone.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePreferencesRequest {
    #[serde(default)]
    pub theme_brand: Option<ThemeBrand>,
    #[serde(default)]
    pub dark_theme_config: Option<DarkThemeConfig>,
    #[serde(default)]
    pub use_dynamic_color: Option<bool>,
    #[serde(default)]
    pub should_hide_onboarding: Option<bool>,
}
