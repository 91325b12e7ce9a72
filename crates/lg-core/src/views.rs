//! Text views for the card catalog, benefits and account pages.

use std::fmt::Write;

use lg_protocol::{
    ApplicationResponse, ApplicationStatus, ApprovalTier, CardSlug, CreditCard, User, CARDS,
};

use crate::style::Style;

struct Experience {
    icon: &'static str,
    title: &'static str,
    text: &'static str,
}

const LEGIONNAIRE_EXPERIENCES: &[Experience] = &[
    Experience {
        icon: "✈️",
        title: "Priority Lounge Access",
        text: "Access over 1,000 airport lounges worldwide with complimentary food, drinks, and Wi-Fi.",
    },
    Experience {
        icon: "🍽️",
        title: "Exclusive Dining",
        text: "Reserved tables at Michelin-starred restaurants and exclusive culinary events.",
    },
    Experience {
        icon: "🎭",
        title: "VIP Events",
        text: "Front-row seats to concerts, theater premieres, and exclusive member gatherings.",
    },
    Experience {
        icon: "🏨",
        title: "Hotel Upgrades",
        text: "Complimentary room upgrades and late checkout at partner luxury hotels worldwide.",
    },
    Experience {
        icon: "🚗",
        title: "Luxury Car Rental",
        text: "Premium car rental discounts and complimentary upgrades from our partners.",
    },
    Experience {
        icon: "📞",
        title: "24/7 Concierge",
        text: "Personal concierge service for travel bookings, reservations, and special requests.",
    },
];

const TRIBUNE_EXPERIENCES: &[Experience] = &[
    Experience {
        icon: "🛩️",
        title: "Private Aviation",
        text: "Access to private jet charters and helicopter services with preferential rates.",
    },
    Experience {
        icon: "🏰",
        title: "Luxury Estates",
        text: "Exclusive access to private villas, penthouses, and luxury estates worldwide.",
    },
    Experience {
        icon: "🎨",
        title: "Art & Culture",
        text: "Private museum tours, art gallery previews, and exclusive auction access.",
    },
    Experience {
        icon: "⛵",
        title: "Yacht Experiences",
        text: "Charter luxury yachts for private excursions in the world's most beautiful waters.",
    },
    Experience {
        icon: "🍾",
        title: "Wine & Spirits",
        text: "Private wine cellar access, rare spirit tastings, and vineyard tours.",
    },
    Experience {
        icon: "👔",
        title: "Personal Shopper",
        text: "Dedicated personal shopping services at luxury boutiques and fashion houses.",
    },
    Experience {
        icon: "🏌️",
        title: "Elite Sports Access",
        text: "VIP access to major sporting events, golf courses, and exclusive sporting clubs.",
    },
    Experience {
        icon: "💎",
        title: "Dedicated Concierge",
        text: "Your personal concierge team available 24/7 for any request, anywhere in the world.",
    },
];

struct BenefitSection {
    title: &'static str,
    summary: &'static str,
    points: &'static [&'static str],
    note: Option<&'static str>,
}

const BENEFITS: &[BenefitSection] = &[
    BenefitSection {
        title: "Travel Insurance",
        summary: "All cardholders enjoy automatic travel insurance when booking trips with their card.",
        points: &[
            "Trip cancellation and interruption: up to $10,000 per trip",
            "Baggage delay and loss: essentials reimbursed after a 6 hour delay",
            "Emergency medical: up to $50,000 outside your home country",
        ],
        note: Some("Available to all Legionnaire and Tribune cardholders"),
    },
    BenefitSection {
        title: "Concierge Services",
        summary: "Support tailored to your card tier, from everyday requests to extraordinary experiences.",
        points: &[
            "Legionnaire: 24/7 chat concierge for reservations, events and travel planning",
            "Tribune: a multi-agent AI concierge team specialized by expertise",
            "Tribune: complex multi-destination travel planning and VIP access",
        ],
        note: None,
    },
    BenefitSection {
        title: "Tribune Lounge",
        summary: "Premium airport lounges across the country with complimentary amenities.",
        points: &[
            "Premium comfort and amenities",
            "Access to Tribune Lounges at major airports across the United States",
            "Personalized pre-flight service",
        ],
        note: Some("Exclusive to Tribune cardholders"),
    },
    BenefitSection {
        title: "Tribune Dining",
        summary: "Priority reservations at Michelin-starred restaurants worldwide.",
        points: &[
            "Skip the waitlist at exclusive dining establishments",
            "Private chef experiences with personalized menus",
            "Culinary events and tastings",
        ],
        note: Some("Exclusive to Tribune cardholders"),
    },
    BenefitSection {
        title: "Tribune Private Jet Share",
        summary: "On-demand charter access at member pricing up to 25% below standard rates.",
        points: &[
            "Light, midsize, super midsize and heavy jets",
            "Arrive 15 minutes before departure",
            "Custom catering and ground transportation coordination",
        ],
        note: Some("Exclusive to Tribune cardholders"),
    },
];

/// `12345.5` as `12,345.5`, the way amounts are shown to users.
pub fn format_amount(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    let digits = (cents / 100).to_string();
    let mut out = String::new();
    if amount < 0.0 && cents > 0 {
        out.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    match cents % 100 {
        0 => {}
        c if c % 10 == 0 => {
            let _ = write!(out, ".{}", c / 10);
        }
        c => {
            let _ = write!(out, ".{c:02}");
        }
    }
    out
}

pub fn card_summary(card: &CreditCard, style: &Style) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{}  {}",
        style.bold(card.name),
        style.dim(&format!(
            "★ {} ({} reviews)",
            card.star_rating,
            format_amount(f64::from(card.review_count))
        ))
    );
    let _ = writeln!(out, "  Annual fee:   ${}", format_amount(f64::from(card.annual_fee)));
    let _ = writeln!(out, "  APR range:    {}", card.apr_range);
    let _ = writeln!(out, "  Rewards:      {}", card.rewards_rate);
    let _ = writeln!(out, "  Avg. credit:  {}", card.average_credit_score);
    for benefit in card.benefits {
        let _ = writeln!(out, "  • {benefit}");
    }
    let _ = writeln!(out, "  {}", style.dim(card.story));
    out
}

/// Every card in the catalog.
pub fn card_catalog(style: &Style) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}\n", style.bold("Our Cards"));
    for card in &CARDS {
        out.push_str(&card_summary(card, style));
        out.push('\n');
    }
    let _ = writeln!(
        out,
        "{}",
        style.dim("Use /estimate <card> to check your odds, /apply <card> to apply.")
    );
    out
}

pub fn benefits(style: &Style) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}\n", style.bold("Exclusive Benefits"));
    for section in BENEFITS {
        let _ = writeln!(out, "{}", style.bold(section.title));
        let _ = writeln!(out, "  {}", section.summary);
        for point in section.points {
            let _ = writeln!(out, "  • {point}");
        }
        if let Some(note) = section.note {
            let _ = writeln!(out, "  {}", style.dim(note));
        }
        out.push('\n');
    }
    out
}

/// Account page for whichever card the user holds.
pub fn account(user: Option<&User>, style: &Style) -> String {
    let mut out = String::new();
    let card = user.and_then(|u| u.current_card);
    let (heading, tagline, experiences) = match card {
        Some(CardSlug::Legionnaire) => (
            "Welcome, Legionnaire Cardholder",
            "Your exclusive benefits and experiences await",
            LEGIONNAIRE_EXPERIENCES,
        ),
        Some(CardSlug::Tribune) => (
            "Welcome, Tribune Cardholder",
            "Experience the pinnacle of luxury and exclusivity",
            TRIBUNE_EXPERIENCES,
        ),
        None => {
            let _ = writeln!(out, "{}", style.bold("Discover Legion Experiences"));
            let _ = writeln!(out, "Apply for a card to unlock exclusive benefits.\n");
            for c in &CARDS {
                let _ = writeln!(
                    out,
                    "  {} ({}): /apply {}",
                    c.name,
                    c.rewards_rate,
                    c.slug
                );
            }
            if user.is_none() {
                let _ = writeln!(out, "\n{}", style.dim("Sign in with /login <user> <password>."));
            }
            return out;
        }
    };

    let _ = writeln!(out, "{}", style.bold(heading));
    let _ = writeln!(out, "{}\n", style.dim(tagline));
    for e in experiences {
        let _ = writeln!(out, "{} {}", e.icon, style.bold(e.title));
        let _ = writeln!(out, "   {}", e.text);
    }
    out
}

fn tier_description(tier: ApprovalTier) -> &'static str {
    match tier {
        ApprovalTier::HighlyQualified => {
            "You exceed all requirements for this card. You have excellent approval odds."
        }
        ApprovalTier::Likely => {
            "You meet the basic requirements for this card. You have good approval odds."
        }
        ApprovalTier::Unlikely => {
            "Based on your profile, approval may be challenging. If rejected, you will need \
             to wait 60 days before applying again."
        }
    }
}

pub fn approval_odds(card: &CreditCard, tier: ApprovalTier, style: &Style) -> String {
    let label = match tier {
        ApprovalTier::HighlyQualified => style.green(tier.as_str()),
        ApprovalTier::Likely => style.yellow(tier.as_str()),
        ApprovalTier::Unlikely => style.red(tier.as_str()),
    };
    format!(
        "Your approval odds for {}: {label}\n{}\n",
        card.name,
        tier_description(tier)
    )
}

pub fn application_result(response: &ApplicationResponse, style: &Style) -> String {
    let mut out = String::new();
    match response.status {
        ApplicationStatus::Approved => {
            let _ = writeln!(out, "{}", style.green("Congratulations!"));
            let _ = writeln!(out, "{}", response.message);
            if let Some(rate) = response.interest_rate {
                let _ = writeln!(out, "  Approval tier: {}", response.approval_tier);
                let _ = writeln!(out, "  Your APR:      {rate}%");
                let _ = writeln!(out, "Your card will arrive in 7-10 business days.");
            }
        }
        ApplicationStatus::Rejected => {
            let _ = writeln!(out, "{}", style.red("Application Rejected"));
            let _ = writeln!(out, "{}", response.message);
            if response.rejection_date.is_some() {
                let _ = writeln!(out, "You may apply again after 60 days from your rejection date.");
            }
        }
    }
    out
}
