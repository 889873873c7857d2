//! Hand-curated keyword data used when live collection yields nothing.
//!
//! Values are the last manually reviewed Peruvian market figures; every entry
//! carries five regions with Lima normalized to 100.

use aruma_core::{CuratedTrend, RegionScores, Trend};

type CuratedRow = (&'static str, u32, Trend, u32, &'static str, [(&'static str, u32); 5]);

const CURATED: [CuratedRow; 9] = [
    (
        "skincare",
        78,
        Trend::Rising,
        92,
        "+45%",
        [("Lima", 100), ("Arequipa", 68), ("Trujillo", 52), ("Cusco", 45), ("Piura", 38)],
    ),
    (
        "cerave",
        85,
        Trend::Rising,
        100,
        "+89%",
        [("Lima", 100), ("Arequipa", 72), ("Trujillo", 58), ("Chiclayo", 51), ("Cusco", 48)],
    ),
    (
        "niacinamide",
        72,
        Trend::Rising,
        88,
        "+62%",
        [("Lima", 100), ("Arequipa", 65), ("Trujillo", 54), ("Piura", 42), ("Cusco", 40)],
    ),
    (
        "protector solar",
        92,
        Trend::Rising,
        100,
        "+93%",
        [("Lima", 100), ("Cusco", 78), ("Arequipa", 75), ("Trujillo", 68), ("Piura", 55)],
    ),
    (
        "serum facial",
        68,
        Trend::Rising,
        82,
        "+52%",
        [("Lima", 100), ("Arequipa", 58), ("Trujillo", 48), ("Cusco", 45), ("Chiclayo", 42)],
    ),
    (
        "retinol",
        65,
        Trend::Rising,
        79,
        "+48%",
        [("Lima", 100), ("Arequipa", 62), ("Trujillo", 52), ("Piura", 44), ("Cusco", 41)],
    ),
    (
        "maquillaje",
        58,
        Trend::Stable,
        70,
        "+12%",
        [("Lima", 100), ("Arequipa", 55), ("Trujillo", 50), ("Cusco", 48), ("Piura", 45)],
    ),
    (
        "hidratante",
        55,
        Trend::Stable,
        68,
        "+18%",
        [("Lima", 100), ("Arequipa", 60), ("Trujillo", 52), ("Cusco", 50), ("Piura", 48)],
    ),
    (
        "limpiador facial",
        62,
        Trend::Rising,
        75,
        "+38%",
        [("Lima", 100), ("Arequipa", 58), ("Trujillo", 54), ("Cusco", 48), ("Chiclayo", 45)],
    ),
];

/// The nine curated entries, in their curated order.
///
/// The table is fixed: it does not follow a configured keyword override.
#[must_use]
pub fn curated_trends() -> Vec<CuratedTrend> {
    CURATED
        .iter()
        .map(
            |&(keyword, average_interest, trend, peak_score, growth_3m, regions)| CuratedTrend {
                keyword: keyword.to_string(),
                average_interest,
                trend,
                peak_score,
                growth_3m: growth_3m.to_string(),
                top_regions: regions.into_iter().collect::<RegionScores>(),
            },
        )
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use aruma_core::BEAUTY_KEYWORDS;

    #[test]
    fn one_entry_per_default_keyword() {
        let mut curated: Vec<String> = curated_trends().into_iter().map(|c| c.keyword).collect();
        let mut tracked: Vec<&str> = BEAUTY_KEYWORDS.to_vec();
        curated.sort();
        tracked.sort_unstable();
        assert_eq!(curated, tracked);
    }

    #[test]
    fn curated_order_is_fixed() {
        let keywords: Vec<String> = curated_trends().into_iter().map(|c| c.keyword).collect();
        assert_eq!(
            keywords,
            vec![
                "skincare",
                "cerave",
                "niacinamide",
                "protector solar",
                "serum facial",
                "retinol",
                "maquillaje",
                "hidratante",
                "limpiador facial",
            ]
        );
    }

    #[test]
    fn every_entry_has_five_regions_led_by_lima() {
        for entry in curated_trends() {
            assert_eq!(entry.top_regions.len(), 5, "{}", entry.keyword);
            assert_eq!(
                entry.top_regions.iter().next(),
                Some(("Lima", 100)),
                "{}",
                entry.keyword
            );
        }
    }

    #[test]
    fn regions_are_in_descending_score_order() {
        for entry in curated_trends() {
            let scores: Vec<u32> = entry.top_regions.iter().map(|(_, s)| s).collect();
            assert!(
                scores.windows(2).all(|w| w[0] >= w[1]),
                "{}: {scores:?}",
                entry.keyword
            );
        }
    }

    #[test]
    fn scores_stay_within_interest_range() {
        for entry in curated_trends() {
            assert!(entry.average_interest <= entry.peak_score, "{}", entry.keyword);
            assert!(entry.peak_score <= 100, "{}", entry.keyword);
        }
    }

    #[test]
    fn cerave_entry_matches_curated_figures() {
        let cerave = curated_trends()
            .into_iter()
            .find(|c| c.keyword == "cerave")
            .unwrap();
        assert_eq!(cerave.average_interest, 85);
        assert_eq!(cerave.trend, Trend::Rising);
        assert_eq!(cerave.peak_score, 100);
        assert_eq!(cerave.growth_3m, "+89%");
        assert_eq!(cerave.top_regions.get("Chiclayo"), Some(51));
    }

    #[test]
    fn only_maquillaje_and_hidratante_are_stable() {
        let stable: Vec<String> = curated_trends()
            .into_iter()
            .filter(|c| c.trend == Trend::Stable)
            .map(|c| c.keyword)
            .collect();
        assert_eq!(stable, vec!["maquillaje", "hidratante"]);
    }
}
