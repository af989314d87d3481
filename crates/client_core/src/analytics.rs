use shared::protocol::{AnalyticsData, DashboardStats, DateRange, LocationStat};

use crate::{api::ApiClient, error::Result};

const ANALYTICS: &str = "/api/analytics";
const ANALYTICS_DASHBOARD: &str = "/api/analytics/dashboard";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrendDirection {
    Up,
    Down,
    Flat,
}

/// Compares the newest trend sample against the oldest.
pub fn trend_direction(stats: &DashboardStats) -> TrendDirection {
    match (stats.trend.first(), stats.trend.last()) {
        (Some(first), Some(last)) if last > first => TrendDirection::Up,
        (Some(first), Some(last)) if last < first => TrendDirection::Down,
        _ => TrendDirection::Flat,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrafficSource {
    Instagram,
    Twitter,
    Facebook,
    Youtube,
    Linkedin,
    Github,
    Spotify,
    Twitch,
    Tiktok,
    Direct,
}

impl TrafficSource {
    /// Unrecognised source names count as direct traffic.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "instagram" => TrafficSource::Instagram,
            "twitter" => TrafficSource::Twitter,
            "facebook" => TrafficSource::Facebook,
            "youtube" => TrafficSource::Youtube,
            "linkedin" => TrafficSource::Linkedin,
            "github" => TrafficSource::Github,
            "spotify" => TrafficSource::Spotify,
            "twitch" => TrafficSource::Twitch,
            "tiktok" => TrafficSource::Tiktok,
            _ => TrafficSource::Direct,
        }
    }
}

/// Shortens a time-series date label for the selected range: hourly buckets
/// keep the time, weekly buckets keep the date.
pub fn tick_label(range: DateRange, value: &str) -> &str {
    match range {
        DateRange::Today => value.split(' ').nth(1).unwrap_or(value),
        DateRange::SevenDays => value.split(' ').next().unwrap_or(value),
        _ => value,
    }
}

pub fn top_locations(data: &AnalyticsData, limit: usize) -> &[LocationStat] {
    let end = data.locations.len().min(limit);
    data.locations.get(..end).unwrap_or_default()
}

impl ApiClient {
    pub async fn analytics(&self, range: DateRange) -> Result<AnalyticsData> {
        self.send_json(
            ANALYTICS,
            self.get(ANALYTICS)
                .query(&[("range", range.as_query_value())]),
            None,
        )
        .await
    }

    pub async fn dashboard_stats(&self) -> Result<DashboardStats> {
        self.send_json(ANALYTICS_DASHBOARD, self.get(ANALYTICS_DASHBOARD), None)
            .await
    }
}
