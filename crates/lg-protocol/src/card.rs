//! The static card catalog and approval threshold tables.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum CardSlug {
    Legionnaire,
    Tribune,
}

impl CardSlug {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Legionnaire => "legionnaire",
            Self::Tribune => "tribune",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Legionnaire => "Legionnaire",
            Self::Tribune => "Tribune",
        }
    }
}

impl fmt::Display for CardSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CardSlug {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, String> {
        match s.trim().to_ascii_lowercase().as_str() {
            "legionnaire" => Ok(Self::Legionnaire),
            "tribune" => Ok(Self::Tribune),
            other => Err(format!("unknown card '{other}'")),
        }
    }
}

/// Ordinal outcome of comparing an applicant against a card's thresholds.
///
/// Variants are declared lowest first so `Ord` follows approval odds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ApprovalTier {
    Unlikely,
    Likely,
    #[serde(rename = "Highly Qualified")]
    HighlyQualified,
}

impl ApprovalTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unlikely => "Unlikely",
            Self::Likely => "Likely",
            Self::HighlyQualified => "Highly Qualified",
        }
    }
}

impl fmt::Display for ApprovalTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Minimums for one approval tier. All four must be met.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TierThresholds {
    pub min_salary: f64,
    pub min_net_worth: f64,
    pub min_age: u32,
    pub min_fico: u32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ApprovalThresholds {
    pub highly_qualified: TierThresholds,
    pub likely: TierThresholds,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreditCard {
    pub slug: CardSlug,
    pub name: &'static str,
    pub annual_fee: u32,
    pub apr_range: &'static str,
    pub average_credit_score: u32,
    pub rewards_rate: &'static str,
    pub benefits: &'static [&'static str],
    pub story: &'static str,
    pub image_url: &'static str,
    pub star_rating: f32,
    pub review_count: u32,
    pub approval_thresholds: ApprovalThresholds,
}

pub static CARDS: [CreditCard; 2] = [
    CreditCard {
        slug: CardSlug::Legionnaire,
        name: "Legionnaire",
        annual_fee: 120,
        apr_range: "12.99% - 24.99%",
        average_credit_score: 720,
        rewards_rate: "2% on all purchases",
        benefits: &["Travel insurance coverage", "24/7 concierge chat"],
        story: "The Legionnaire card provides the look and feel of luxury without the price \
                tag. With a low annual fee, and a competitive return on all purchases, it's \
                the perfect everyday card for just about anybody.",
        image_url: "/img/cards/legionnaire.png",
        star_rating: 4.7,
        review_count: 2547,
        approval_thresholds: ApprovalThresholds {
            highly_qualified: TierThresholds {
                min_salary: 75_000.0,
                min_net_worth: 0.0,
                min_age: 25,
                min_fico: 720,
            },
            likely: TierThresholds {
                min_salary: 50_000.0,
                min_net_worth: 0.0,
                min_age: 21,
                min_fico: 700,
            },
        },
    },
    CreditCard {
        slug: CardSlug::Tribune,
        name: "Tribune",
        annual_fee: 10_000,
        apr_range: "4.99-9.99%",
        average_credit_score: 820,
        rewards_rate: "Up to 5% on select purchases*",
        benefits: &[
            "Complimentary Tribune lounge access worldwide",
            "Dedicated personal concierge",
            "Access to Tribune dining experiences",
            "Access to Tribune private jet share",
        ],
        story: "The Tribune card represents the pinnacle of luxury and exclusivity. Reserved \
                for high-net-worth individuals who demand nothing but the best, this is more \
                than just a credit card. It's a lifestyle.",
        image_url: "/img/cards/tribune.png",
        star_rating: 4.9,
        review_count: 1203,
        approval_thresholds: ApprovalThresholds {
            highly_qualified: TierThresholds {
                min_salary: 200_000.0,
                min_net_worth: 1_000_000.0,
                min_age: 30,
                min_fico: 800,
            },
            likely: TierThresholds {
                min_salary: 150_000.0,
                min_net_worth: 800_000.0,
                min_age: 25,
                min_fico: 750,
            },
        },
    },
];

pub fn find_card(slug: CardSlug) -> &'static CreditCard {
    match slug {
        CardSlug::Legionnaire => &CARDS[0],
        CardSlug::Tribune => &CARDS[1],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_card_matches_slug() {
        for card in &CARDS {
            assert_eq!(find_card(card.slug).slug, card.slug);
        }
    }

    #[test]
    fn slug_parsing() {
        assert_eq!("Tribune".parse::<CardSlug>().unwrap(), CardSlug::Tribune);
        assert_eq!(" legionnaire ".parse::<CardSlug>().unwrap(), CardSlug::Legionnaire);
        assert!("centurion".parse::<CardSlug>().is_err());
    }

    #[test]
    fn tier_ordering() {
        assert!(ApprovalTier::HighlyQualified > ApprovalTier::Likely);
        assert!(ApprovalTier::Likely > ApprovalTier::Unlikely);
    }

    #[test]
    fn tier_wire_names() {
        assert_eq!(
            serde_json::to_string(&ApprovalTier::HighlyQualified).unwrap(),
            "\"Highly Qualified\""
        );
        let tier: ApprovalTier = serde_json::from_str("\"Likely\"").unwrap();
        assert_eq!(tier, ApprovalTier::Likely);
    }
}
