use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeductionCategory {
    Personal,
    Spouse,
    Child,
    Parent,
    Insurance,
    Donation,
    Other,
}

impl DeductionCategory {
    pub const ALL: [DeductionCategory; 7] = [
        Self::Personal,
        Self::Spouse,
        Self::Child,
        Self::Parent,
        Self::Insurance,
        Self::Donation,
        Self::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Personal => "personal",
            Self::Spouse => "spouse",
            Self::Child => "child",
            Self::Parent => "parent",
            Self::Insurance => "insurance",
            Self::Donation => "donation",
            Self::Other => "other",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == s)
    }
}

/// A deduction claimed in a plan, either picked from the standard
/// templates or entered by the user (`is_custom`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeductionItem {
    pub id: String,
    pub name: String,
    pub amount: Decimal,
    pub is_custom: bool,
    pub category: DeductionCategory,
}
