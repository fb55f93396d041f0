use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One trackable item: a prayer name or a fast type.
///
/// `completed` never exceeds `missed`; the store only raises it while there is
/// an outstanding deficit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counter {
    #[serde(rename = "name", alias = "type", alias = "id")]
    pub id: String,
    #[serde(default)]
    pub missed: u32,
    #[serde(default)]
    pub completed: u32,
}

impl Counter {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            missed: 0,
            completed: 0,
        }
    }

    /// Outstanding deficit: prayers or fasts still owed.
    pub fn balance(&self) -> u32 {
        self.missed.saturating_sub(self.completed)
    }

    pub fn is_settled(&self) -> bool {
        self.balance() == 0
    }

    /// Pull a loaded record back inside `completed <= missed`.
    pub(crate) fn clamped(mut self) -> Self {
        if self.completed > self.missed {
            self.completed = self.missed;
        }
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    Missed,
    Completed,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Missed => "Missed",
            EventKind::Completed => "Completed",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One accepted event, appended to a tracker's history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    #[serde(with = "entry_date")]
    pub date: NaiveDate,
    #[serde(rename = "name")]
    pub counter_id: String,
    #[serde(rename = "status")]
    pub kind: EventKind,
}

impl HistoryEntry {
    pub fn new(date: NaiveDate, counter_id: impl Into<String>, kind: EventKind) -> Self {
        Self {
            date,
            counter_id: counter_id.into(),
            kind,
        }
    }
}

/// Dates are written as ISO `YYYY-MM-DD`. Older data stored locale-formatted
/// dates, so reading also accepts `M/D/YYYY`, `D.M.YYYY` and `D/M/YYYY`.
mod entry_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    const WRITE_FORMAT: &str = "%Y-%m-%d";
    const READ_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%d.%m.%Y", "%d/%m/%Y"];

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&date.format(WRITE_FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(raw.trim())
            .ok_or_else(|| serde::de::Error::custom(format!("unrecognized date '{}'", raw)))
    }

    pub(super) fn parse(s: &str) -> Option<NaiveDate> {
        READ_FORMATS
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
    }
}
