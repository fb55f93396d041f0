use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LedgerKind {
    Asset,
    Liability,
}

impl LedgerKind {
    pub fn key(&self) -> &'static str {
        match self {
            LedgerKind::Asset => "assetItems",
            LedgerKind::Liability => "liabilityItems",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            LedgerKind::Asset => "Asset & Receivable",
            LedgerKind::Liability => "Liability & Payable",
        }
    }
}

impl FromStr for LedgerKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asset" | "assets" | "receivable" => Ok(LedgerKind::Asset),
            "liability" | "liabilities" | "payable" => Ok(LedgerKind::Liability),
            _ => Err(anyhow::anyhow!("Unknown ledger kind: {}", s)),
        }
    }
}

/// A ledger line. Both fields are optional; a blank form still records a line.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LedgerItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
}

impl LedgerItem {
    /// Blank names are stored as absent.
    pub fn new(name: Option<&str>, amount: Option<f64>) -> Self {
        let name = name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string);
        Self { name, amount }
    }
}
