use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::{
    calendar::{deserialize_date, deserialize_optional_date},
    nullable::deserialize_null_as_empty,
};

pub const DEFAULT_ACTIVITY_TIME: &str = "00:00";

fn default_time() -> String {
    DEFAULT_ACTIVITY_TIME.to_string()
}

fn time_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^([01][0-9]|2[0-3]):[0-5][0-9]$").expect("valid time regex"))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    /// Zero-padded `HH:MM`, so plain string order is chronological.
    #[serde(default = "default_time")]
    pub time: String,
    pub description: String,
    #[serde(default)]
    pub cost: f64,
}

impl Activity {
    pub fn new(time: Option<String>, description: String, cost: Option<f64>) -> Self {
        let time = time
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(default_time);
        Self {
            time,
            description,
            cost: cost.unwrap_or(0.0),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.description.trim().is_empty() {
            return Err("Activity description is required".to_string());
        }
        if !time_pattern().is_match(&self.time) {
            return Err(format!("Activity time must be HH:MM, got `{}`", self.time));
        }
        if !self.cost.is_finite() || self.cost < 0.0 {
            return Err("Activity cost must be >= 0".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItineraryDay {
    #[serde(deserialize_with = "deserialize_date")]
    pub date: NaiveDate,
    #[serde(default, deserialize_with = "deserialize_null_as_empty")]
    pub activities: Vec<Activity>,
}

impl ItineraryDay {
    fn sort_activities(&mut self) {
        // stable: equal times keep insertion order
        self.activities.sort_by(|a, b| a.time.cmp(&b.time));
    }
}

/// Request body for adding a single activity to a trip's plan.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewActivity {
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub date: Option<NaiveDate>,
    pub time: Option<String>,
    #[serde(default)]
    pub description: String,
    pub cost: Option<f64>,
}

/// Adds an activity under its calendar day, creating the day on first use,
/// then re-sorts that day by time.
pub fn add_activity(itinerary: &mut Vec<ItineraryDay>, date: NaiveDate, activity: Activity) {
    match itinerary.iter_mut().find(|day| day.date == date) {
        Some(day) => {
            day.activities.push(activity);
            day.sort_activities();
        }
        None => itinerary.push(ItineraryDay {
            date,
            activities: vec![activity],
        }),
    }
}

/// Removes the activity at `index` within the day matching `date`.
/// Returns false when there is no such day or index. An emptied day stays in place.
pub fn remove_activity(itinerary: &mut [ItineraryDay], date: NaiveDate, index: usize) -> bool {
    match itinerary.iter_mut().find(|day| day.date == date) {
        Some(day) if index < day.activities.len() => {
            day.activities.remove(index);
            true
        }
        _ => false,
    }
}

/// Collapses days sharing a calendar date into the first one (in order of
/// appearance) and sorts every day's activities by time.
pub fn normalize(days: Vec<ItineraryDay>) -> Vec<ItineraryDay> {
    let mut merged: Vec<ItineraryDay> = Vec::with_capacity(days.len());
    for mut day in days {
        for activity in day.activities.iter_mut() {
            if activity.time.trim().is_empty() {
                activity.time = default_time();
            }
        }
        match merged.iter_mut().find(|existing| existing.date == day.date) {
            Some(existing) => existing.activities.append(&mut day.activities),
            None => merged.push(day),
        }
    }
    for day in merged.iter_mut() {
        day.sort_activities();
    }
    merged
}

pub fn activities_cost(itinerary: &[ItineraryDay]) -> f64 {
    itinerary
        .iter()
        .flat_map(|day| day.activities.iter())
        .map(|activity| activity.cost)
        .sum()
}
