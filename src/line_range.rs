use serde::Serialize;

/// A proguard line range.
///
/// Maps an interval of lines in the obfuscated method to an interval of
/// lines in the original source. Absent numbers are `0`, so a method line
/// without any range yields the default value, and the truncated `3:` prefix
/// yields `obf_start: 3, obf_end: 0`.
///
/// All ranges are 1-based and inclusive.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub struct ProguardLineRange {
    /// Start line in the obfuscated method.
    pub obf_start: u32,
    /// End line in the obfuscated method.
    pub obf_end: u32,
    /// The original start line.
    pub orig_start: u32,
    /// The original end line.
    pub orig_end: u32,
}

impl ProguardLineRange {
    /// Creates a new line range.
    pub fn new(obf_start: u32, obf_end: u32, orig_start: u32, orig_end: u32) -> Self {
        Self {
            obf_start,
            obf_end,
            orig_start,
            orig_end,
        }
    }

    /// Whether this range carries any obfuscated line information.
    pub fn has_line_info(&self) -> bool {
        self.obf_start > 0 || self.obf_end > 0
    }

    /// Whether `line` of the obfuscated method falls into this range.
    ///
    /// A range without an end line only matches its start line.
    pub fn contains(&self, line: u32) -> bool {
        if self.obf_end == 0 {
            line == self.obf_start
        } else {
            self.obf_start <= line && line <= self.obf_end
        }
    }

    /// Maps `line` of the obfuscated method to the original source line.
    ///
    /// Returns `None` if the line is outside of this range, the range has no
    /// original line information, or the offset runs past the original end.
    pub fn original_line(&self, line: u32) -> Option<u32> {
        if !self.contains(line) || self.orig_start == 0 {
            return None;
        }
        // inlined parents only carry a single original line
        if self.orig_end == 0 || self.orig_end == self.orig_start {
            return Some(self.orig_start);
        }
        self.orig_start
            .checked_add(line - self.obf_start)
            .filter(|original| *original <= self.orig_end)
    }
}
