//! Header line detection.

use itertools::Itertools;

use super::lines::LineMap;
use crate::model::TextFragment;
use crate::settings::ExtractSettings;
use crate::taxonomy::count_mentioned_types;

/// Lower-cased text of every run on a line, space separated.
pub(crate) fn line_text(fragments: &[TextFragment]) -> String {
    fragments
        .iter()
        .flat_map(|f| f.runs.iter())
        .map(|r| r.text.to_lowercase())
        .join(" ")
}

/// Canonical y of the topmost line mentioning at least
/// `settings.header_min_matches` distinct column types.
pub fn find_header_y(lines: &LineMap, settings: &ExtractSettings) -> Option<f64> {
    lines.sorted_keys().into_iter().find(|&y| {
        lines
            .get(y)
            .is_some_and(|texts| count_mentioned_types(&line_text(texts)) >= settings.header_min_matches)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(y: f64, labels: &[&str]) -> Vec<TextFragment> {
        labels
            .iter()
            .enumerate()
            .map(|(i, l)| TextFragment::new(i as f64 * 10.0, y, 64.0, *l))
            .collect()
    }

    fn settings() -> ExtractSettings {
        ExtractSettings::default()
    }

    #[test]
    fn picks_first_line_meeting_threshold() {
        let mut fragments = line(8.0, &["Date", "Narration", "Withdrawal", "Deposit", "Balance"]);
        fragments.extend(line(2.0, &["Statement", "of", "account"]));
        fragments.extend(line(12.0, &["Date", "Remarks", "Debit", "Credit"]));
        let map = LineMap::group(&fragments, &settings());
        assert_eq!(find_header_y(&map, &settings()), Some(8.0));
    }

    #[test]
    fn three_groups_are_not_enough() {
        let fragments = line(3.0, &["Date", "Description", "Balance"]);
        let map = LineMap::group(&fragments, &settings());
        assert_eq!(find_header_y(&map, &settings()), None);
    }

    #[test]
    fn substrings_do_not_count() {
        // "updated", "interest", "outstanding", "balances" only contain keywords.
        let fragments = line(3.0, &["Updated", "Interest", "Outstanding", "Balances", "Notes"]);
        let map = LineMap::group(&fragments, &settings());
        assert_eq!(find_header_y(&map, &settings()), None);
    }

    #[test]
    fn threshold_is_configurable() {
        let fragments = line(3.0, &["Date", "Description", "Balance"]);
        let map = LineMap::group(&fragments, &settings());
        let relaxed = ExtractSettings {
            header_min_matches: 3,
            ..ExtractSettings::default()
        };
        assert_eq!(find_header_y(&map, &relaxed), Some(3.0));
    }

    #[test]
    fn line_text_lowercases_all_runs() {
        let fragments = line(1.0, &["Value DT", "CHQ"]);
        assert_eq!(line_text(&fragments), "value dt chq");
    }
}
