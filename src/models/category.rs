use serde::{Deserialize, Serialize};

use crate::models::Counter;

/// An independent counter + history collection with its own storage keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackerCategory {
    Prayers,
    Fasts,
}

const PRAYER_IDS: &[&str] = &["Fajr", "Dhuhr", "Asr", "Maghrib", "Isha"];
const FAST_IDS: &[&str] = &["Ramadan", "Nafl"];

impl TrackerCategory {
    pub fn all() -> Vec<TrackerCategory> {
        vec![TrackerCategory::Prayers, TrackerCategory::Fasts]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TrackerCategory::Prayers => "prayers",
            TrackerCategory::Fasts => "fasts",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            TrackerCategory::Prayers => "Prayer Tracker",
            TrackerCategory::Fasts => "Fast Tracker",
        }
    }

    /// Singular noun used in messages ("prayer", "fast").
    pub fn noun(&self) -> &'static str {
        match self {
            TrackerCategory::Prayers => "prayer",
            TrackerCategory::Fasts => "fast",
        }
    }

    pub fn counters_key(&self) -> &'static str {
        match self {
            TrackerCategory::Prayers => "prayers",
            TrackerCategory::Fasts => "fasts",
        }
    }

    pub fn history_key(&self) -> &'static str {
        match self {
            TrackerCategory::Prayers => "history",
            TrackerCategory::Fasts => "fastHistory",
        }
    }

    pub fn default_ids(&self) -> &'static [&'static str] {
        match self {
            TrackerCategory::Prayers => PRAYER_IDS,
            TrackerCategory::Fasts => FAST_IDS,
        }
    }

    pub fn default_counters(&self) -> Vec<Counter> {
        self.default_ids().iter().map(|id| Counter::new(*id)).collect()
    }

    /// Display label for a counter: fasts read as "Ramadan Fast".
    pub fn label(&self, counter_id: &str) -> String {
        match self {
            TrackerCategory::Prayers => counter_id.to_string(),
            TrackerCategory::Fasts => format!("{} Fast", counter_id),
        }
    }

    /// Map common spelling variants onto the canonical lowercase id.
    pub fn canonical_alias<'a>(&self, input: &'a str) -> &'a str {
        match (self, input) {
            (TrackerCategory::Prayers, "zuhr" | "dhuhur" | "zohr" | "duhr") => "dhuhr",
            (TrackerCategory::Prayers, "ishaa") => "isha",
            (TrackerCategory::Fasts, "ramzan" | "ramadhan") => "ramadan",
            (TrackerCategory::Fasts, "nafil" | "nafal" | "voluntary") => "nafl",
            _ => input,
        }
    }
}

impl std::fmt::Display for TrackerCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories_use_independent_keys() {
        let p = TrackerCategory::Prayers;
        let f = TrackerCategory::Fasts;
        assert_ne!(p.counters_key(), f.counters_key());
        assert_ne!(p.history_key(), f.history_key());
    }

    #[test]
    fn default_prayers_are_the_five_daily() {
        let ids: Vec<String> = TrackerCategory::Prayers
            .default_counters()
            .into_iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(ids, vec!["Fajr", "Dhuhr", "Asr", "Maghrib", "Isha"]);
    }

    #[test]
    fn fast_labels_carry_suffix() {
        assert_eq!(TrackerCategory::Fasts.label("Ramadan"), "Ramadan Fast");
        assert_eq!(TrackerCategory::Prayers.label("Asr"), "Asr");
    }

    #[test]
    fn aliases_resolve_per_category() {
        assert_eq!(TrackerCategory::Prayers.canonical_alias("zuhr"), "dhuhr");
        assert_eq!(TrackerCategory::Fasts.canonical_alias("zuhr"), "zuhr");
        assert_eq!(TrackerCategory::Fasts.canonical_alias("ramzan"), "ramadan");
    }
}
