use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZakatField {
    Cash,
    Gold,
    Silver,
    Business,
}

impl ZakatField {
    pub fn all() -> Vec<ZakatField> {
        vec![
            ZakatField::Cash,
            ZakatField::Gold,
            ZakatField::Silver,
            ZakatField::Business,
        ]
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ZakatField::Cash => "Cash",
            ZakatField::Gold => "Gold",
            ZakatField::Silver => "Silver",
            ZakatField::Business => "Business assets",
        }
    }
}

impl FromStr for ZakatField {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cash" => Ok(ZakatField::Cash),
            "gold" => Ok(ZakatField::Gold),
            "silver" => Ok(ZakatField::Silver),
            "business" => Ok(ZakatField::Business),
            _ => Err(anyhow::anyhow!(
                "Unknown zakat field '{}'. Use: cash, gold, silver, business",
                s
            )),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ZakatForm {
    #[serde(default)]
    pub cash: Option<f64>,
    #[serde(default)]
    pub gold: Option<f64>,
    #[serde(default)]
    pub silver: Option<f64>,
    #[serde(default)]
    pub business: Option<f64>,
    /// Last calculated amount due; kept until recalculated or cleared.
    #[serde(default)]
    pub result: Option<f64>,
}

impl ZakatForm {
    pub fn get(&self, field: ZakatField) -> Option<f64> {
        match field {
            ZakatField::Cash => self.cash,
            ZakatField::Gold => self.gold,
            ZakatField::Silver => self.silver,
            ZakatField::Business => self.business,
        }
    }

    pub fn set(&mut self, field: ZakatField, value: Option<f64>) {
        let slot = match field {
            ZakatField::Cash => &mut self.cash,
            ZakatField::Gold => &mut self.gold,
            ZakatField::Silver => &mut self.silver,
            ZakatField::Business => &mut self.business,
        };
        *slot = value;
    }

    /// Zakatable wealth; missing fields count as zero.
    pub fn total(&self) -> f64 {
        ZakatField::all()
            .into_iter()
            .filter_map(|f| self.get(f))
            .sum()
    }

    pub fn assess(&self, rate: f64) -> Result<f64, AppError> {
        let total = self.total();
        if total <= 0.0 {
            return Err(AppError::NothingToAssess);
        }
        Ok(total * rate)
    }
}
