use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalKind {
    Hajj,
    Umrah,
}

impl GoalKind {
    pub fn all() -> Vec<GoalKind> {
        vec![GoalKind::Hajj, GoalKind::Umrah]
    }

    pub fn key(&self) -> &'static str {
        match self {
            GoalKind::Hajj => "hajj",
            GoalKind::Umrah => "umrah",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            GoalKind::Hajj => "Hajj",
            GoalKind::Umrah => "Umrah",
        }
    }
}

impl FromStr for GoalKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "hajj" => Ok(GoalKind::Hajj),
            "umrah" | "umra" => Ok(GoalKind::Umrah),
            _ => Err(anyhow::anyhow!("Unknown savings goal: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsGoal {
    pub target: f64,
    #[serde(default)]
    pub saved: f64,
    #[serde(default)]
    pub notes: Vec<String>,
}

impl SavingsGoal {
    pub fn with_target(target: f64) -> Self {
        Self {
            target,
            saved: 0.0,
            notes: Vec::new(),
        }
    }

    /// Fraction of the target saved, capped at 1.
    pub fn progress(&self) -> f64 {
        if self.target <= 0.0 {
            return 0.0;
        }
        (self.saved / self.target).clamp(0.0, 1.0)
    }

    pub fn remaining(&self) -> f64 {
        (self.target - self.saved).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_caps_at_one() {
        let mut goal = SavingsGoal::with_target(1000.0);
        goal.saved = 250.0;
        assert!((goal.progress() - 0.25).abs() < f64::EPSILON);
        goal.saved = 4000.0;
        assert_eq!(goal.progress(), 1.0);
        assert_eq!(goal.remaining(), 0.0);
    }

    #[test]
    fn zero_target_has_no_progress() {
        assert_eq!(SavingsGoal::with_target(0.0).progress(), 0.0);
    }
}
