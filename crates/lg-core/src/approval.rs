//! Approval-odds estimator and the questionnaire that feeds it.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{Datelike, NaiveDate};
use lg_protocol::{ApprovalThresholds, ApprovalTier, CreditCard, TierThresholds, User};

/// The four figures the estimate is based on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Applicant {
    pub salary: f64,
    pub net_worth: f64,
    pub age: u32,
    pub fico: u32,
}

impl Applicant {
    /// Build from a stored profile, deriving age from the birth date.
    ///
    /// Returns `None` when the birth date is not `YYYY-MM-DD`.
    pub fn from_user(user: &User, today: NaiveDate) -> Option<Self> {
        let birth = NaiveDate::parse_from_str(&user.birth_date, "%Y-%m-%d").ok()?;
        Some(Self {
            salary: user.salary,
            net_worth: user.net_worth,
            age: age_on(birth, today),
            fico: user.credit_score,
        })
    }

    fn meets(&self, t: &TierThresholds) -> bool {
        self.salary >= t.min_salary
            && self.net_worth >= t.min_net_worth
            && self.age >= t.min_age
            && self.fico >= t.min_fico
    }
}

/// Highest tier whose thresholds are all met, checked from the top.
pub fn estimate(thresholds: &ApprovalThresholds, applicant: &Applicant) -> ApprovalTier {
    if applicant.meets(&thresholds.highly_qualified) {
        ApprovalTier::HighlyQualified
    } else if applicant.meets(&thresholds.likely) {
        ApprovalTier::Likely
    } else {
        ApprovalTier::Unlikely
    }
}

/// Whole years between `birth` and `today`.
pub fn age_on(birth: NaiveDate, today: NaiveDate) -> u32 {
    let mut age = today.year() - birth.year();
    if (today.month(), today.day()) < (birth.month(), birth.day()) {
        age -= 1;
    }
    age.max(0) as u32
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FormField {
    Salary,
    NetWorth,
    Age,
    Fico,
}

impl FormField {
    pub const ALL: [FormField; 4] = [Self::Salary, Self::NetWorth, Self::Age, Self::Fico];

    pub fn prompt(&self) -> &'static str {
        match self {
            Self::Salary => "Annual salary ($)",
            Self::NetWorth => "Net worth ($)",
            Self::Age => "Age",
            Self::Fico => "FICO score",
        }
    }

    fn error(&self) -> &'static str {
        match self {
            Self::Salary => "Please enter a valid salary greater than 0",
            Self::NetWorth => "Please enter a valid net worth of 0 or more",
            Self::Age => "Please enter an age between 18 and 120",
            Self::Fico => "Please enter a FICO score between 300 and 850",
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prompt())
    }
}

pub type FormErrors = BTreeMap<FormField, &'static str>;

/// Raw questionnaire input. Fields stay strings until submitted.
#[derive(Debug, Clone, Default)]
pub struct ApprovalForm {
    values: BTreeMap<FormField, String>,
    errors: FormErrors,
}

impl ApprovalForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update a field. Any error shown for it is cleared.
    pub fn set_field(&mut self, field: FormField, value: impl Into<String>) {
        self.values.insert(field, value.into());
        self.errors.remove(&field);
    }

    pub fn value(&self, field: FormField) -> &str {
        self.values.get(&field).map(String::as_str).unwrap_or("")
    }

    pub fn errors(&self) -> &FormErrors {
        &self.errors
    }

    /// Check every field, replacing the error map. Returns the parsed
    /// applicant when nothing failed.
    pub fn validate(&mut self) -> Option<Applicant> {
        self.errors.clear();

        let salary = parse_number(self.value(FormField::Salary)).filter(|s| *s > 0.0);
        let net_worth = parse_number(self.value(FormField::NetWorth)).filter(|n| *n >= 0.0);
        let age = parse_integer(self.value(FormField::Age)).filter(|a| (18..=120).contains(a));
        let fico = parse_integer(self.value(FormField::Fico)).filter(|f| (300..=850).contains(f));

        for (field, ok) in [
            (FormField::Salary, salary.is_some()),
            (FormField::NetWorth, net_worth.is_some()),
            (FormField::Age, age.is_some()),
            (FormField::Fico, fico.is_some()),
        ] {
            if !ok {
                self.errors.insert(field, field.error());
            }
        }

        Some(Applicant {
            salary: salary?,
            net_worth: net_worth?,
            age: age?,
            fico: fico?,
        })
    }

    /// Validate and estimate against `card`. Blocked while any field is invalid.
    pub fn submit(&mut self, card: &CreditCard) -> Result<ApprovalTier, FormErrors> {
        match self.validate() {
            Some(applicant) => Ok(estimate(&card.approval_thresholds, &applicant)),
            None => Err(self.errors.clone()),
        }
    }
}

fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

fn parse_integer(raw: &str) -> Option<u32> {
    raw.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use lg_protocol::{find_card, CardSlug};

    fn tribune() -> &'static CreditCard {
        find_card(CardSlug::Tribune)
    }

    fn applicant(salary: f64, net_worth: f64, age: u32, fico: u32) -> Applicant {
        Applicant {
            salary,
            net_worth,
            age,
            fico,
        }
    }

    #[test]
    fn tribune_exact_thresholds_are_highly_qualified() {
        let t = &tribune().approval_thresholds;
        assert_eq!(
            estimate(t, &applicant(200_000.0, 1_000_000.0, 30, 800)),
            ApprovalTier::HighlyQualified
        );
    }

    #[test]
    fn one_unit_below_drops_a_tier() {
        let t = &tribune().approval_thresholds;
        assert_eq!(
            estimate(t, &applicant(199_999.0, 1_000_000.0, 30, 800)),
            ApprovalTier::Likely
        );
        assert_eq!(
            estimate(t, &applicant(200_000.0, 1_000_000.0, 30, 799)),
            ApprovalTier::Likely
        );
        assert_eq!(
            estimate(t, &applicant(200_000.0, 999_999.0, 30, 800)),
            ApprovalTier::Likely
        );
        assert_eq!(
            estimate(t, &applicant(200_000.0, 1_000_000.0, 29, 800)),
            ApprovalTier::Likely
        );
        assert_eq!(
            estimate(t, &applicant(150_000.0, 800_000.0, 25, 750)),
            ApprovalTier::Likely
        );
        assert_eq!(
            estimate(t, &applicant(150_000.0, 799_999.0, 25, 750)),
            ApprovalTier::Unlikely
        );
        assert_eq!(
            estimate(t, &applicant(1_000_000.0, 5_000_000.0, 24, 850)),
            ApprovalTier::Unlikely
        );
    }

    #[test]
    fn legionnaire_has_no_net_worth_floor() {
        let t = &find_card(CardSlug::Legionnaire).approval_thresholds;
        assert_eq!(
            estimate(t, &applicant(75_000.0, 0.0, 25, 720)),
            ApprovalTier::HighlyQualified
        );
        assert_eq!(
            estimate(t, &applicant(50_000.0, 0.0, 21, 700)),
            ApprovalTier::Likely
        );
    }

    #[test]
    fn age_counts_birthdays() {
        let birth = NaiveDate::from_ymd_opt(1990, 6, 15).unwrap();
        let day = |m, d| NaiveDate::from_ymd_opt(2025, m, d).unwrap();
        assert_eq!(age_on(birth, day(6, 14)), 34);
        assert_eq!(age_on(birth, day(6, 15)), 35);
        assert_eq!(age_on(birth, day(12, 1)), 35);
        assert_eq!(age_on(birth, NaiveDate::from_ymd_opt(1980, 1, 1).unwrap()), 0);
    }

    #[test]
    fn empty_form_reports_every_field() {
        let mut form = ApprovalForm::new();
        let errors = form.submit(tribune()).unwrap_err();
        assert_eq!(errors.len(), 4);
        assert_eq!(
            errors[&FormField::Fico],
            "Please enter a FICO score between 300 and 850"
        );
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        let mut form = ApprovalForm::new();
        form.set_field(FormField::Salary, "0");
        form.set_field(FormField::NetWorth, "-1");
        form.set_field(FormField::Age, "17");
        form.set_field(FormField::Fico, "851");
        let errors = form.submit(tribune()).unwrap_err();
        assert_eq!(
            errors.keys().copied().collect::<Vec<_>>(),
            FormField::ALL.to_vec()
        );

        form.set_field(FormField::Age, "abc");
        assert!(form.validate().is_none());
        assert!(form.errors().contains_key(&FormField::Age));
    }

    #[test]
    fn editing_a_field_clears_its_error() {
        let mut form = ApprovalForm::new();
        assert!(form.validate().is_none());
        form.set_field(FormField::Salary, "250000");
        assert!(!form.errors().contains_key(&FormField::Salary));
        assert!(form.errors().contains_key(&FormField::Age));
    }

    #[test]
    fn valid_form_estimates() {
        let mut form = ApprovalForm::new();
        form.set_field(FormField::Salary, "210000");
        form.set_field(FormField::NetWorth, "1200000");
        form.set_field(FormField::Age, "42");
        form.set_field(FormField::Fico, " 805 ");
        assert_eq!(form.submit(tribune()), Ok(ApprovalTier::HighlyQualified));
        assert!(form.errors().is_empty());
    }

    #[test]
    fn applicant_from_profile() {
        let user: User = serde_json::from_value(serde_json::json!({
            "id": "u1",
            "username": "jdoe",
            "email": "j@example.com",
            "birthDate": "1985-03-10",
            "salary": 160000.0,
            "netWorth": 900000.0,
            "creditScore": 760,
            "address": {
                "street": "1 Via Appia",
                "city": "Rome",
                "state": "RM",
                "zipCode": "00100",
                "country": "IT"
            }
        }))
        .unwrap();
        let today = NaiveDate::from_ymd_opt(2025, 3, 9).unwrap();
        let a = Applicant::from_user(&user, today).unwrap();
        assert_eq!(a.age, 39);
        assert_eq!(
            estimate(&tribune().approval_thresholds, &a),
            ApprovalTier::Likely
        );
    }
}
