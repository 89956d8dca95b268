//! Extraction settings.

pub(crate) const DEFAULT_Y_TOLERANCE: f64 = 0.1;
// pdf2json reports widths in a unit 16x the relative unit used for x/y.
pub(crate) const DEFAULT_WIDTH_SCALE: f64 = 16.0;
pub(crate) const DEFAULT_HEADER_MIN_MATCHES: usize = 4;
pub(crate) const DEFAULT_LOOKAHEAD_LINES: usize = 6;
pub(crate) const DEFAULT_ROW_Y_TOLERANCE: f64 = 0.1;
pub(crate) const DEFAULT_CONTINUATION_SLACK: f64 = 2.0;
pub(crate) const DEFAULT_MULTILINE_SHARE: u32 = 90;

/// Tunables shared by every stage of the pipeline.
#[derive(Clone, Debug, PartialEq)]
pub struct ExtractSettings {
    /// Rounding granularity used to cluster fragments into lines.
    pub y_tolerance: f64,
    /// Divisor applied to decoder-reported fragment widths.
    pub width_scale: f64,
    /// Distinct taxonomy groups a line must mention to count as a header.
    pub header_min_matches: usize,
    /// Number of extra lines a single row may absorb.
    pub lookahead_lines: usize,
    /// Maximum y spread of fragments inside a single-line column bucket.
    pub row_y_tolerance: f64,
    /// Allowed right overhang of a second-line header continuation.
    pub continuation_slack: f64,
    /// Percentage of a pair's span given to the multiline column when
    /// paired with a single-line column. Values above 100 act as 100.
    pub multiline_share: u32,
}

impl Default for ExtractSettings {
    fn default() -> Self {
        Self {
            y_tolerance: DEFAULT_Y_TOLERANCE,
            width_scale: DEFAULT_WIDTH_SCALE,
            header_min_matches: DEFAULT_HEADER_MIN_MATCHES,
            lookahead_lines: DEFAULT_LOOKAHEAD_LINES,
            row_y_tolerance: DEFAULT_ROW_Y_TOLERANCE,
            continuation_slack: DEFAULT_CONTINUATION_SLACK,
            multiline_share: DEFAULT_MULTILINE_SHARE,
        }
    }
}
