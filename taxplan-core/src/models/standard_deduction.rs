use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::DeductionCategory;

/// A deduction template the user can pick from when adding a
/// non-custom deduction to a plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandardDeduction {
    pub id: String,
    pub name: String,
    /// Statutory ceiling, `None` when the amount is uncapped or depends on income.
    pub max_amount: Option<Decimal>,
    pub description: String,
    pub category: DeductionCategory,
}

fn template(
    id: &str,
    name: &str,
    max_amount: Option<i64>,
    description: &str,
    category: DeductionCategory,
) -> StandardDeduction {
    StandardDeduction {
        id: id.to_string(),
        name: name.to_string(),
        max_amount: max_amount.map(Decimal::from),
        description: description.to_string(),
        category,
    }
}

/// The built-in Thai deduction templates. Repositories seed these when no
/// templates have been stored yet.
pub fn default_standard_deductions() -> Vec<StandardDeduction> {
    use DeductionCategory::*;

    vec![
        template(
            "personal-deduction",
            "Personal Deduction (ค่าลดหย่อนส่วนตัว)",
            Some(60_000),
            "Standard personal allowance for all taxpayers",
            Personal,
        ),
        template(
            "spouse-deduction",
            "Spouse Deduction (ค่าลดหย่อนคู่สมรส)",
            Some(60_000),
            "Deduction for spouse without income",
            Spouse,
        ),
        template(
            "child-deduction",
            "Child Deduction (ค่าลดหย่อนบุตร)",
            Some(30_000),
            "Per child under 25 years old",
            Child,
        ),
        template(
            "parent-deduction",
            "Parent Deduction (ค่าลดหย่อนบิดามารดา)",
            Some(30_000),
            "Per parent over 60 years old",
            Parent,
        ),
        template(
            "social-security",
            "Social Security (ประกันสังคม)",
            Some(9_000),
            "Social security contributions",
            Insurance,
        ),
        template(
            "life-insurance",
            "Life Insurance (ประกันชีวิต)",
            Some(100_000),
            "Life insurance premiums",
            Insurance,
        ),
        template(
            "health-insurance",
            "Health Insurance (ประกันสุขภาพ)",
            Some(25_000),
            "Health insurance premiums",
            Insurance,
        ),
        template(
            "donation-education",
            "Education Donation (บริจาคการศึกษา)",
            None,
            "Donations to educational institutions",
            Donation,
        ),
        template(
            "donation-general",
            "General Donation (บริจาคทั่วไป)",
            None,
            "General charitable donations (max 10% of income)",
            Donation,
        ),
        template(
            "rmf-ltf",
            "RMF/LTF Investment (กองทุน RMF/LTF)",
            Some(500_000),
            "Retirement and long-term equity fund investments",
            Other,
        ),
        template(
            "home-mortgage",
            "Home Mortgage Interest (ดอกเบี้ยบ้าน)",
            Some(100_000),
            "Interest on home mortgage",
            Other,
        ),
    ]
}
