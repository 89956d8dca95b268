//! Grouping of page fragments into visual lines.

use indexmap::IndexMap;
use ordered_float::OrderedFloat;

use crate::model::TextFragment;
use crate::settings::ExtractSettings;

/// Canonical line key.
pub type KeyF64 = OrderedFloat<f64>;

pub(crate) fn key_f64(v: f64) -> KeyF64 {
    OrderedFloat(v)
}

/// Round `y` to the nearest multiple of `tolerance`.
pub fn canonical_y(y: f64, tolerance: f64) -> f64 {
    let mult = 1.0 / tolerance;
    (y * mult).round() / mult
}

/// Fragments of one page keyed by canonical y, in first-seen order.
///
/// Iteration follows insertion order; use [`LineMap::sorted_keys`] when
/// vertical order matters.
#[derive(Clone, Debug, Default)]
pub struct LineMap {
    lines: IndexMap<KeyF64, Vec<TextFragment>>,
}

impl LineMap {
    /// Cluster `fragments` into lines, rescaling each width by
    /// `settings.width_scale`. Inputs are cloned, never mutated.
    pub fn group(fragments: &[TextFragment], settings: &ExtractSettings) -> Self {
        let mut lines: IndexMap<KeyF64, Vec<TextFragment>> = IndexMap::new();
        for fragment in fragments {
            let y = canonical_y(fragment.y, settings.y_tolerance);
            lines.entry(key_f64(y)).or_default().push(TextFragment {
                width: fragment.width / settings.width_scale,
                ..fragment.clone()
            });
        }
        Self { lines }
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn get(&self, y: f64) -> Option<&[TextFragment]> {
        self.lines.get(&key_f64(y)).map(Vec::as_slice)
    }

    /// Lines in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (f64, &[TextFragment])> {
        self.lines.iter().map(|(y, texts)| (y.0, texts.as_slice()))
    }

    /// Canonical y values in ascending order.
    pub fn sorted_keys(&self) -> Vec<f64> {
        let mut keys: Vec<KeyF64> = self.lines.keys().copied().collect();
        keys.sort();
        keys.into_iter().map(|k| k.0).collect()
    }

    /// First line strictly below `y`.
    pub fn next_key_after(&self, y: f64) -> Option<f64> {
        self.sorted_keys().into_iter().find(|k| *k > y)
    }

    /// Lines strictly below `y`, top to bottom. `None` means every line.
    pub fn lines_after(&self, y: Option<f64>) -> Vec<&[TextFragment]> {
        self.sorted_keys()
            .into_iter()
            .filter(|k| y.is_none_or(|limit| *k > limit))
            .filter_map(|k| self.get(k))
            .collect()
    }
}
