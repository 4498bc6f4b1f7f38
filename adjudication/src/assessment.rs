//! Advisory claim assessment.
//!
//! An assessor scores a claim before the jury sees it. The result is attached to the
//! claim for jurors to read; the tally never consults it.

use assize_types::{Amount, ClaimCategory};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::OnceLock;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    Approve,
    StandardReview,
    Review,
    Reject,
}

impl Recommendation {
    /// Map a fraud score to a recommendation.
    pub fn from_score(fraud_score_bps: u16) -> Self {
        match fraud_score_bps {
            s if s > 7_000 => Self::Reject,
            s if s > 5_000 => Self::Review,
            s if s < 3_000 => Self::Approve,
            _ => Self::StandardReview,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assessment {
    /// Estimated fraud likelihood, 0–10000 bps.
    pub fraud_score_bps: u16,
    pub recommendation: Recommendation,
    /// Short machine-readable tags, e.g. `unusual_amount`.
    pub risk_factors: Vec<String>,
    /// Name of the assessor that produced this.
    pub assessor: String,
}

/// Pluggable claim assessor.
pub trait ClaimAssessor: Send + Sync {
    fn assess(&self, category: ClaimCategory, amount: Amount, description: &str) -> Assessment;

    fn name(&self) -> &str;
}

/// Typical amount range per claim category, in whole currency units.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AmountBand {
    pub low: u128,
    pub high: u128,
}

impl AmountBand {
    pub fn for_category(category: ClaimCategory) -> Self {
        let (low, high) = match category {
            ClaimCategory::Health => (100, 50_000),
            ClaimCategory::Vehicle => (500, 100_000),
            ClaimCategory::Travel => (50, 10_000),
            ClaimCategory::ProductWarranty => (20, 5_000),
            ClaimCategory::Pet => (100, 15_000),
            ClaimCategory::Agricultural => (1_000, 500_000),
        };
        Self { low, high }
    }

    /// Anomaly score of `amount` against the band, in bps.
    ///
    /// Below the band scores 3000, above scores 8000. Inside the band the score grows
    /// with distance from the midpoint and is capped at 2000.
    pub fn anomaly_bps(&self, amount: u128) -> u16 {
        if amount < self.low {
            return 3_000;
        }
        if amount > self.high {
            return 8_000;
        }
        let span = (self.high - self.low).max(1);
        let position = (amount - self.low) * 10_000 / span;
        (position.abs_diff(5_000) as u16).min(2_000)
    }
}

// Score weights; each component is a bps value in 0..=10_000.
const LANGUAGE_WEIGHT: u32 = 25;
const AMOUNT_WEIGHT: u32 = 20;
const PATTERN_WEIGHT: u32 = 15;
const CONSISTENCY_WEIGHT: u32 = 15;
const ROUND_AMOUNT_WEIGHT: u32 = 10;
const AMOUNT_MISMATCH_WEIGHT: u32 = 10;
const MISSING_INFO_WEIGHT: u32 = 5;

/// Per keyword, pattern, contradiction or missing-information marker.
const HIT_BPS: u32 = 2_000;

const SUSPICIOUS_KEYWORDS: &[&str] = &[
    "fake",
    "forged",
    "altered",
    "modified",
    "suspicious",
    "emergency",
    "urgent",
    "immediate",
    "rush",
    "asap",
    "cash only",
    "no receipt",
    "lost receipt",
    "damaged receipt",
];

/// Pairs of term groups that should not describe the same item.
const GENERAL_CONTRADICTIONS: &[(&[&str], &[&str])] = &[
    (&["new", "brand new"], &["old", "used", "worn"]),
    (&["expensive", "costly"], &["cheap", "inexpensive"]),
    (&["working", "functional"], &["broken", "damaged"]),
];

struct TextPatterns {
    /// Whole-hundred amounts written with cents, e.g. `1500.00`.
    round: Regex,
    /// Dollar amounts; group 1 is the whole part with optional thousands separators.
    money: Regex,
    missing: Regex,
}

fn patterns() -> Option<&'static TextPatterns> {
    static PATTERNS: OnceLock<Option<TextPatterns>> = OnceLock::new();
    PATTERNS
        .get_or_init(|| {
            Some(TextPatterns {
                round: Regex::new(r"\b\d+00\.00\b").ok()?,
                money: Regex::new(r"\$\s?(\d{1,3}(?:,\d{3})+|\d+)(?:\.\d{2})?").ok()?,
                missing: Regex::new(r"(?i)\bN/A\b|\bunknown\b|\bTBD\b|--").ok()?,
            })
        })
        .as_ref()
}

/// What the text rules found in a description.
#[derive(Debug, Default, PartialEq, Eq)]
struct TextFindings {
    keywords: Vec<&'static str>,
    /// Amounts quoted in the text, whole units.
    amounts: Vec<u128>,
    round_written: bool,
    duplicate_amounts: bool,
    missing_markers: usize,
    contradictions: usize,
}

impl TextFindings {
    fn scan(category: ClaimCategory, description: &str) -> Self {
        let lower = description.to_lowercase();
        let mut findings = Self {
            keywords: SUSPICIOUS_KEYWORDS
                .iter()
                .copied()
                .filter(|k| lower.contains(k))
                .collect(),
            contradictions: contradictions(category, &lower),
            ..Self::default()
        };

        if let Some(p) = patterns() {
            findings.round_written = p.round.is_match(description);

            let quoted: Vec<&str> = p.money.find_iter(description).map(|m| m.as_str()).collect();
            let distinct: HashSet<&str> = quoted.iter().copied().collect();
            findings.duplicate_amounts = quoted.len() > 1 && distinct.len() < quoted.len();
            findings.amounts = p
                .money
                .captures_iter(description)
                .filter_map(|c| c.get(1)?.as_str().replace(',', "").parse().ok())
                .collect();

            let markers: HashSet<String> = p
                .missing
                .find_iter(description)
                .map(|m| m.as_str().to_lowercase())
                .collect();
            findings.missing_markers = markers.len();
        }
        findings
    }

    fn pattern_count(&self) -> u32 {
        self.round_written as u32 + self.duplicate_amounts as u32 + self.missing_markers as u32
    }

    /// Share of quoted amounts that are whole hundreds above 100, in bps.
    fn round_amount_bps(&self) -> u32 {
        if self.amounts.is_empty() {
            return 0;
        }
        let round = self
            .amounts
            .iter()
            .filter(|a| **a > 100 && **a % 100 == 0)
            .count();
        (round * 10_000 / self.amounts.len()) as u32
    }

    /// Relative gap between the largest quoted amount and the request, in bps.
    /// Zero when the text quotes no amounts.
    fn amount_mismatch_bps(&self, requested: u128) -> u32 {
        let Some(max) = self.amounts.iter().max() else {
            return 0;
        };
        let gap = max.abs_diff(requested).saturating_mul(10_000) / requested.max(1);
        gap.min(10_000) as u32
    }
}

fn contradictions(category: ClaimCategory, lower: &str) -> usize {
    let has = |term: &str| lower.contains(term);
    match category {
        ClaimCategory::Health => {
            let surgery_as_outpatient = has("surgery")
                && has("outpatient")
                && !has("minor")
                && !has("same day");
            [
                surgery_as_outpatient,
                has("emergency") && has("routine"),
                has("chronic") && has("sudden"),
            ]
            .iter()
            .filter(|hit| **hit)
            .count()
        }
        ClaimCategory::Vehicle => [
            has("minor damage") && (has("total loss") || has("severe") || has("major")),
            has("low speed") && has("extensive damage"),
            has("parking lot") && has("high speed"),
        ]
        .iter()
        .filter(|hit| **hit)
        .count(),
        _ => GENERAL_CONTRADICTIONS
            .iter()
            .filter(|(a, b)| a.iter().any(|&t| has(t)) && b.iter().any(|&t| has(t)))
            .count(),
    }
}

fn hits_bps(hits: usize) -> u32 {
    (hits as u32).saturating_mul(HIT_BPS).min(10_000)
}

/// Deterministic rule-based assessor.
///
/// Scores the requested amount against its category band and scans the description
/// for suspicious wording, written-out round or repeated amounts, missing-information
/// markers, amounts that disagree with the request and category-specific
/// contradictions.
#[derive(Clone, Copy, Debug, Default)]
pub struct RuleAssessor;

impl ClaimAssessor for RuleAssessor {
    fn assess(&self, category: ClaimCategory, amount: Amount, description: &str) -> Assessment {
        let findings = TextFindings::scan(category, description);

        let amount_bps = AmountBand::for_category(category).anomaly_bps(amount.raw()) as u32;
        let language_bps = hits_bps(findings.keywords.len());
        let pattern_bps = hits_bps(findings.pattern_count() as usize);
        let consistency_bps = hits_bps(findings.contradictions);
        let round_bps = findings.round_amount_bps();
        let mismatch_bps = findings.amount_mismatch_bps(amount.raw());
        let missing_bps = hits_bps(findings.missing_markers);

        let weighted = [
            (language_bps, LANGUAGE_WEIGHT),
            (amount_bps, AMOUNT_WEIGHT),
            (pattern_bps, PATTERN_WEIGHT),
            (consistency_bps, CONSISTENCY_WEIGHT),
            (round_bps, ROUND_AMOUNT_WEIGHT),
            (mismatch_bps, AMOUNT_MISMATCH_WEIGHT),
            (missing_bps, MISSING_INFO_WEIGHT),
        ];
        let total_weight: u32 = weighted.iter().map(|(_, w)| w).sum();
        let score = weighted.iter().map(|(bps, w)| bps * w).sum::<u32>() / total_weight;
        let fraud_score_bps = score.min(10_000) as u16;

        let mut risk_factors = Vec::new();
        if !findings.keywords.is_empty() {
            risk_factors.push("suspicious_language".to_string());
        }
        if amount_bps > 5_000 {
            risk_factors.push("unusual_amount".to_string());
        }
        if mismatch_bps > 3_000 {
            risk_factors.push("amount_inconsistency".to_string());
        }
        if findings.pattern_count() > 0 {
            risk_factors.push("suspicious_patterns".to_string());
        }
        if findings.contradictions >= 2 {
            risk_factors.push("internal_inconsistency".to_string());
        }

        Assessment {
            fraud_score_bps,
            recommendation: Recommendation::from_score(fraud_score_bps),
            risk_factors,
            assessor: self.name().to_string(),
        }
    }

    fn name(&self) -> &str {
        "rules"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recommendation_thresholds() {
        assert_eq!(Recommendation::from_score(7_001), Recommendation::Reject);
        assert_eq!(Recommendation::from_score(7_000), Recommendation::Review);
        assert_eq!(Recommendation::from_score(5_000), Recommendation::StandardReview);
        assert_eq!(Recommendation::from_score(3_000), Recommendation::StandardReview);
        assert_eq!(Recommendation::from_score(2_999), Recommendation::Approve);
    }

    #[test]
    fn band_anomaly() {
        let band = AmountBand::for_category(ClaimCategory::Travel);
        assert_eq!(band.anomaly_bps(10), 3_000);
        assert_eq!(band.anomaly_bps(20_000), 8_000);
        assert_eq!(band.anomaly_bps(5_025), 0);
        assert_eq!(band.anomaly_bps(50), 2_000);
    }

    #[test]
    fn ordinary_claim_is_approved() {
        let a = RuleAssessor.assess(
            ClaimCategory::Health,
            Amount::new(2_500),
            "Outpatient visit for a sprained ankle",
        );
        assert_eq!(a.recommendation, Recommendation::Approve);
        assert!(a.risk_factors.is_empty());
        assert_eq!(a.assessor, "rules");
    }

    #[test]
    fn oversized_urgent_claim_needs_review() {
        let a = RuleAssessor.assess(
            ClaimCategory::ProductWarranty,
            Amount::new(90_000),
            "URGENT: cash only, lost receipt, need payout asap",
        );
        // (8000·25 + 8000·20) / 100
        assert_eq!(a.fraud_score_bps, 3_600);
        assert_eq!(a.risk_factors, vec!["suspicious_language", "unusual_amount"]);
    }

    #[test]
    fn text_patterns_are_detected() {
        let f = TextFindings::scan(
            ClaimCategory::Travel,
            "Paid $1,500.00 for the hotel and $1,500.00 again, flight number N/A, date TBD",
        );
        assert!(f.round_written);
        assert!(f.duplicate_amounts);
        assert_eq!(f.missing_markers, 2);
        assert_eq!(f.amounts, vec![1_500, 1_500]);
        assert_eq!(f.round_amount_bps(), 10_000);
        assert_eq!(f.pattern_count(), 4);
    }

    #[test]
    fn quoted_amount_far_from_request_is_inconsistent() {
        let f = TextFindings::scan(ClaimCategory::Pet, "Vet bill came to $250");
        assert_eq!(f.amount_mismatch_bps(250), 0);
        assert_eq!(f.amount_mismatch_bps(1_000), 7_500);
        assert_eq!(TextFindings::scan(ClaimCategory::Pet, "Vet bill").amount_mismatch_bps(1_000), 0);
    }

    #[test]
    fn category_contradictions() {
        let health = "Sudden onset of a chronic condition, emergency admission after a routine check";
        assert_eq!(contradictions(ClaimCategory::Health, &health.to_lowercase()), 2);
        assert_eq!(contradictions(ClaimCategory::Health, "outpatient minor surgery"), 0);

        let vehicle = "minor damage, total loss, hit at high speed in a parking lot";
        assert_eq!(contradictions(ClaimCategory::Vehicle, vehicle), 2);

        assert_eq!(
            contradictions(ClaimCategory::ProductWarranty, "brand new but used, broken, still working"),
            2
        );
        assert_eq!(contradictions(ClaimCategory::Travel, "bag was damaged"), 0);
    }

    #[test]
    fn many_indicators_recommend_rejection() {
        let a = RuleAssessor.assess(
            ClaimCategory::ProductWarranty,
            Amount::new(90_000),
            "URGENT: brand new but used, was working now broken. Cash only, lost receipt, \
             asap. Paid $500.00 and $500.00, serial N/A, date TBD",
        );
        assert!(a.fraud_score_bps > 7_000, "score {}", a.fraud_score_bps);
        assert_eq!(a.recommendation, Recommendation::Reject);
        assert_eq!(
            a.risk_factors,
            vec![
                "suspicious_language",
                "unusual_amount",
                "amount_inconsistency",
                "suspicious_patterns",
                "internal_inconsistency",
            ]
        );
    }
}
