use anyhow::Result;

use crate::db::KvStore;
use crate::error::AppError;
use crate::models::{GoalKind, SavingsGoal};

pub struct SavingsStore<'a> {
    kv: &'a dyn KvStore,
    kind: GoalKind,
    goal: SavingsGoal,
}

fn positive(amount: f64) -> Result<f64, AppError> {
    if amount.is_finite() && amount > 0.0 {
        Ok(amount)
    } else {
        Err(AppError::invalid_amount(amount))
    }
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

impl<'a> SavingsStore<'a> {
    pub fn load(kv: &'a dyn KvStore, kind: GoalKind, default_target: f64) -> Self {
        let goal = match kv.get(kind.key()) {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                log::warn!("Could not read {} savings, using defaults: {}", kind.key(), e);
                SavingsGoal::with_target(default_target)
            }),
            Ok(None) => SavingsGoal::with_target(default_target),
            Err(e) => {
                log::warn!("Could not load {} savings: {:#}", kind.key(), e);
                SavingsGoal::with_target(default_target)
            }
        };
        Self { kv, kind, goal }
    }

    pub fn goal(&self) -> &SavingsGoal {
        &self.goal
    }

    /// Returns the new saved total.
    pub fn add_savings(&mut self, amount: f64) -> Result<f64, AppError> {
        let amount = positive(amount)?;
        self.goal.saved = round_cents(self.goal.saved + amount);
        self.persist();
        Ok(self.goal.saved)
    }

    pub fn set_target(&mut self, target: f64) -> Result<(), AppError> {
        self.goal.target = positive(target)?;
        self.persist();
        Ok(())
    }

    pub fn clear_savings(&mut self) {
        self.goal.saved = 0.0;
        self.persist();
    }

    /// Blank notes are ignored; returns whether the note was kept.
    pub fn add_note(&mut self, note: &str) -> bool {
        let note = note.trim();
        if note.is_empty() {
            return false;
        }
        self.goal.notes.push(note.to_string());
        self.persist();
        true
    }

    pub fn clear_notes(&mut self) {
        self.goal.notes.clear();
        self.persist();
    }

    fn persist(&self) {
        let res = serde_json::to_string(&self.goal)
            .map_err(anyhow::Error::from)
            .and_then(|raw| self.kv.set(self.kind.key(), &raw));
        if let Err(e) = res {
            log::warn!("Failed to save {} savings: {:#}", self.kind.key(), e);
        }
    }
}
