use crate::domain::model::{DemographicProfile, Place, SiteScore};

/// 知名主力租戶品牌，以小寫比對店名子字串
pub const ANCHOR_KEYWORDS: [&str; 7] = [
    "walmart",
    "starbucks",
    "target",
    "whole foods",
    "costco",
    "kroger",
    "aldi",
];

const POINTS_PER_PLACE: u32 = 2;
const POINTS_PER_ANCHOR_MATCH: u32 = 20;

/// 每個符合的關鍵字各加一次，同一店名符合多個關鍵字時分別計分
pub fn anchor_matches(place: &Place) -> u32 {
    let name = place.name.to_lowercase();
    ANCHOR_KEYWORDS
        .iter()
        .filter(|keyword| name.contains(*keyword))
        .count() as u32
}

pub fn income_bonus(demographics: &DemographicProfile) -> u32 {
    match demographics.median_income_value() {
        Some(income) if income > 60_000 => 15,
        Some(income) if income > 40_000 => 10,
        Some(_) => 5,
        None => 0,
    }
}

/// 人流分數：店家數、主力租戶與所得加權，上限 100
pub fn score(places: &[Place], demographics: &DemographicProfile) -> SiteScore {
    let base = POINTS_PER_PLACE.saturating_mul(places.len().min(u32::MAX as usize) as u32);

    let anchors = places.iter().fold(0u32, |total, place| {
        total.saturating_add(POINTS_PER_ANCHOR_MATCH.saturating_mul(anchor_matches(place)))
    });

    let total = base
        .saturating_add(anchors)
        .saturating_add(income_bonus(demographics));

    tracing::debug!(
        "Score components - base: {}, anchors: {}, income: {}",
        base,
        anchors,
        income_bonus(demographics)
    );

    SiteScore::new(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn place(name: &str) -> Place {
        Place::new(name, vec!["store".to_string()])
    }

    fn places(names: &[&str]) -> Vec<Place> {
        names.iter().map(|name| place(name)).collect()
    }

    fn demographics(income: &str) -> DemographicProfile {
        DemographicProfile {
            median_household_income: income.to_string(),
            poverty_rate_estimate: "N/A".to_string(),
        }
    }

    #[test]
    fn test_empty_site_with_unavailable_demographics_scores_zero() {
        assert_eq!(score(&[], &DemographicProfile::unavailable()).value(), 0);
    }

    #[test]
    fn test_ten_plain_places_with_mid_income() {
        let site = places(&[
            "Corner Books",
            "Joe's Pizza",
            "Laundromat",
            "City Bank",
            "Hair Studio",
            "Pet Shop",
            "Dry Cleaner",
            "Taqueria",
            "Hardware",
            "Florist",
        ]);
        assert_eq!(score(&site, &demographics("$50,000")).value(), 30);
    }

    #[test]
    fn test_single_anchor_with_high_income() {
        let site = places(&["Starbucks Reserve", "Corner Books", "Joe's Pizza"]);
        assert_eq!(score(&site, &demographics("$70,000")).value(), 41);
    }

    #[test]
    fn test_comma_separated_income_parses() {
        assert_eq!(income_bonus(&demographics("$1,200,000")), 15);
        assert_eq!(score(&[], &demographics("$1,200,000")).value(), 15);
    }

    #[test]
    fn test_income_thresholds_are_exclusive() {
        assert_eq!(income_bonus(&demographics("$60001")), 15);
        assert_eq!(income_bonus(&demographics("$60000")), 10);
        assert_eq!(income_bonus(&demographics("$40001")), 10);
        assert_eq!(income_bonus(&demographics("$40000")), 5);
        assert_eq!(income_bonus(&demographics("$0")), 5);
        assert_eq!(income_bonus(&demographics("$ 50,000")), 10);
    }

    #[test]
    fn test_unparseable_income_contributes_nothing() {
        assert_eq!(income_bonus(&demographics("N/A")), 0);
        assert_eq!(income_bonus(&demographics("$N/A")), 0);
        assert_eq!(income_bonus(&demographics("$52,000.50")), 0);
        assert_eq!(income_bonus(&demographics("")), 0);
    }

    #[test]
    fn test_anchor_match_is_case_insensitive() {
        assert_eq!(anchor_matches(&place("WALMART Supercenter")), 1);
        assert_eq!(anchor_matches(&place("Whole Foods Market")), 1);
        assert_eq!(anchor_matches(&place("Main Street Deli")), 0);
    }

    #[test]
    fn test_anchor_bonus_counts_each_keyword_in_a_name() {
        let combo = place("Target with Starbucks inside");
        assert_eq!(anchor_matches(&combo), 2);
        // 2 + 20 * 2
        assert_eq!(score(&[combo], &DemographicProfile::unavailable()).value(), 42);
    }

    #[test]
    fn test_each_anchor_place_contributes_independently() {
        let site = places(&["Costco Wholesale", "Kroger", "ALDI"]);
        // 3 * 2 + 3 * 20
        assert_eq!(score(&site, &DemographicProfile::unavailable()).value(), 66);
    }

    #[test]
    fn test_score_never_exceeds_max() {
        let everything = "walmart starbucks target whole foods costco kroger aldi";
        let site: Vec<Place> = (0..1000).map(|_| place(everything)).collect();

        assert_eq!(score(&site, &demographics("$99,000")).value(), 100);
    }

    #[test]
    fn test_score_is_at_least_base_for_small_sites() {
        for count in 1..=50 {
            let site: Vec<Place> = (0..count).map(|i| place(&format!("Shop {}", i))).collect();
            let result = score(&site, &demographics("$30,000")).value() as usize;
            assert!(result >= (2 * count).min(100));
            assert!(result <= 100);
        }
    }
}
