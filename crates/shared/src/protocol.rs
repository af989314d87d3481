use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::domain::{LeadMagnetId, LinkIcon, LinkId, Niche, UnknownKey, UserId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    pub id: LinkId,
    pub title: String,
    pub url: String,
    pub icon: LinkIcon,
    #[serde(default)]
    pub clicks: u64,
    pub order: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Body of a link creation request. Only reachable through validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLink {
    pub title: String,
    pub url: Url,
    pub icon: LinkIcon,
}

/// Partial link edit. Rank and click count cannot be edited this way.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkChanges {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<Url>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<LinkIcon>,
}

impl LinkChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.url.is_none() && self.icon.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderRequest {
    pub moved_id: LinkId,
    pub target_id: LinkId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderAssignment {
    pub id: LinkId,
    pub order: f64,
}

/// Server acknowledgement of a reorder. An empty list accepts the client's ranks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReorderAck {
    #[serde(default)]
    pub links: Vec<OrderAssignment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadMagnet {
    pub id: LeadMagnetId,
    pub title: String,
    pub description: String,
    pub download_url: String,
    #[serde(default)]
    pub downloads: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLeadMagnet {
    pub title: String,
    pub description: String,
    pub download_url: Url,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub avatar_url: String,
    #[serde(default)]
    pub niche: Option<Niche>,
    pub onboarded: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub user: User,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

/// Body shared by onboarding and profile updates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePayload {
    pub name: String,
    pub username: String,
    pub niche: Niche,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DateRange {
    #[serde(rename = "today")]
    Today,
    #[serde(rename = "7days")]
    SevenDays,
    #[default]
    #[serde(rename = "30days")]
    ThirtyDays,
    #[serde(rename = "90days")]
    NinetyDays,
    #[serde(rename = "custom")]
    Custom,
}

impl DateRange {
    pub const ALL: [DateRange; 5] = [
        DateRange::Today,
        DateRange::SevenDays,
        DateRange::ThirtyDays,
        DateRange::NinetyDays,
        DateRange::Custom,
    ];

    pub fn as_query_value(self) -> &'static str {
        match self {
            DateRange::Today => "today",
            DateRange::SevenDays => "7days",
            DateRange::ThirtyDays => "30days",
            DateRange::NinetyDays => "90days",
            DateRange::Custom => "custom",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DateRange::Today => "Today",
            DateRange::SevenDays => "Last 7 Days",
            DateRange::ThirtyDays => "Last 30 Days",
            DateRange::NinetyDays => "Last 90 Days",
            DateRange::Custom => "Custom",
        }
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_query_value())
    }
}

impl FromStr for DateRange {
    type Err = UnknownKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DateRange::ALL
            .into_iter()
            .find(|range| range.as_query_value() == s)
            .ok_or_else(|| UnknownKey {
                kind: "date range",
                key: s.to_string(),
            })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesPoint {
    pub date: String,
    pub clicks: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopLink {
    pub title: String,
    pub clicks: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceStat {
    pub name: String,
    pub value: u64,
    /// Percentage change against the previous period.
    pub change: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationStat {
    pub id: String,
    pub name: String,
    pub value: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsData {
    #[serde(default)]
    pub time_series: Vec<TimeSeriesPoint>,
    #[serde(default)]
    pub top_links: Vec<TopLink>,
    #[serde(default)]
    pub sources: Vec<SourceStat>,
    #[serde(default)]
    pub locations: Vec<LocationStat>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_clicks: u64,
    pub last30_days_clicks: u64,
    #[serde(default)]
    pub trend: Vec<u64>,
    pub lead_magnet_downloads: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_link: Option<TopLink>,
}
