use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculations::CalculationError;

/// The eight income categories of the Thai personal income tax code.
///
/// Serialized as the statutory category number (1–8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum IncomeCategory {
    Employment,
    ProfessionalFees,
    Goodwill,
    InterestDividend,
    RentalProperty,
    LiberalProfession,
    ContractsAdvertising,
    OtherIncome,
}

impl IncomeCategory {
    pub const ALL: [IncomeCategory; 8] = [
        Self::Employment,
        Self::ProfessionalFees,
        Self::Goodwill,
        Self::InterestDividend,
        Self::RentalProperty,
        Self::LiberalProfession,
        Self::ContractsAdvertising,
        Self::OtherIncome,
    ];

    pub fn code(&self) -> u8 {
        match self {
            Self::Employment => 1,
            Self::ProfessionalFees => 2,
            Self::Goodwill => 3,
            Self::InterestDividend => 4,
            Self::RentalProperty => 5,
            Self::LiberalProfession => 6,
            Self::ContractsAdvertising => 7,
            Self::OtherIncome => 8,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Employment => "เงินเดือน ค่าจ้าง (Employment Income)",
            Self::ProfessionalFees => "ค่าตอบแทนวิชาชีพอิสระ (Professional Fees)",
            Self::Goodwill => "ค่าความนิยม ลิขสิทธิ์ (Goodwill & Copyright)",
            Self::InterestDividend => "ดอกเบี้ย เงินปันผล (Interest & Dividends)",
            Self::RentalProperty => "ค่าเช่าทรัพย์สิน (Rental Income)",
            Self::LiberalProfession => "อาชีพอิสระ (Liberal Profession)",
            Self::ContractsAdvertising => "งานตามสัญญา โฆษณา (Contract & Advertising)",
            Self::OtherIncome => "รายได้อื่นๆ (Other Income)",
        }
    }
}

impl TryFrom<u8> for IncomeCategory {
    type Error = CalculationError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|category| category.code() == code)
            .ok_or(CalculationError::UnknownCategoryCode(code))
    }
}

impl From<IncomeCategory> for u8 {
    fn from(category: IncomeCategory) -> Self {
        category.code()
    }
}

/// A single income source recorded in a plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeItem {
    pub id: String,
    pub category: IncomeCategory,
    pub description: String,
    pub amount: Decimal,
    /// Tax already withheld at source, credited against the tax due.
    pub withholding_tax: Decimal,
}
