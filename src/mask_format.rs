//!
//! Splits a date pattern into editable cells.
//!
//! ```
//! use rat_picker::mask_format::MaskFormat;
//!
//! let mask = MaskFormat::new("YYYY-MM-DD");
//! assert_eq!(mask.size(), 3);
//! assert_eq!(mask.get_selection(1), (5, 7));
//! assert!(mask.is_match("2000-MM-02"));
//! assert!(!mask.is_match("2000/01/02"));
//! ```
//!

/// Stands in for every character of a mask cell in
/// [MaskFormat::mask_format]. Taken from the private use area.
pub const PLACEHOLDER: char = '\u{E000}';

/// Tokens that become editable cells.
pub const MASK_TOKENS: [&str; 7] = ["YYYY", "MM", "DD", "HH", "mm", "ss", "SSS"];

/// One slice of the format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    /// Text of the slice.
    pub text: String,
    /// Editable cell or literal.
    pub mask: bool,
    /// Byte offset into the format.
    pub start: usize,
    /// Byte offset into the format, exclusive.
    pub end: usize,
}

/// Cells of a format. Immutable, create a new one if the
/// format changes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MaskFormat {
    format: String,
    mask_format: Vec<char>,
    cells: Vec<Cell>,
    mask_cells: Vec<usize>,
}

impl MaskFormat {
    pub fn new(format: &str) -> Self {
        let mut cells = Vec::new();
        let mut mask_format = Vec::new();

        let mut literal_start = 0;
        let mut pos = 0;
        while pos < format.len() {
            let rest = &format[pos..];
            if let Some(token) = MASK_TOKENS.iter().find(|t| rest.starts_with(**t)) {
                if literal_start < pos {
                    cells.push(Cell {
                        text: format[literal_start..pos].to_string(),
                        mask: false,
                        start: literal_start,
                        end: pos,
                    });
                }
                cells.push(Cell {
                    text: token.to_string(),
                    mask: true,
                    start: pos,
                    end: pos + token.len(),
                });
                mask_format.extend(std::iter::repeat(PLACEHOLDER).take(token.len()));
                pos += token.len();
                literal_start = pos;
            } else {
                let c = rest.chars().next().unwrap_or_default();
                mask_format.push(c);
                pos += c.len_utf8().max(1);
            }
        }
        if literal_start < format.len() {
            cells.push(Cell {
                text: format[literal_start..].to_string(),
                mask: false,
                start: literal_start,
                end: format.len(),
            });
        }

        let mask_cells = cells
            .iter()
            .enumerate()
            .filter(|(_, c)| c.mask)
            .map(|(i, _)| i)
            .collect();

        Self {
            format: format.to_string(),
            mask_format,
            cells,
            mask_cells,
        }
    }

    /// The format.
    pub fn format(&self) -> &str {
        &self.format
    }

    /// The format with each cell character replaced by [PLACEHOLDER].
    pub fn mask_format(&self) -> String {
        self.mask_format.iter().collect()
    }

    /// All cells, literals included.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Mask cell by cell index.
    pub fn mask_cell(&self, idx: usize) -> Option<&Cell> {
        self.mask_cells.get(idx).map(|i| &self.cells[*i])
    }

    /// Number of mask cells.
    pub fn size(&self) -> usize {
        self.mask_cells.len()
    }

    /// Text has the same skeleton as the format.
    ///
    /// Literal positions must be equal, placeholder positions
    /// accept any ascii character.
    ///
    /// Placeholders are restricted to ascii and the text must not be
    /// longer than the format. A matching text has its cells at the
    /// byte offsets of [Self::get_selection], which the masked field
    /// uses to slice its buffer.
    pub fn is_match(&self, text: &str) -> bool {
        let mut chars = text.chars();
        for m in self.mask_format.iter() {
            let Some(c) = chars.next() else {
                return false;
            };
            if *m == PLACEHOLDER {
                if !c.is_ascii() {
                    return false;
                }
            } else if *m != c {
                return false;
            }
        }
        chars.next().is_none()
    }

    /// Byte range of the mask cell. (0, 0) for an invalid index.
    pub fn get_selection(&self, idx: usize) -> (usize, usize) {
        match self.mask_cell(idx) {
            Some(cell) => (cell.start, cell.end),
            None => (0, 0),
        }
    }

    /// Mask cell nearest to the byte offset.
    ///
    /// A cell containing the offset wins, start and end inclusive.
    /// Otherwise the cell with the smallest distance to one of its
    /// boundaries. On a tie the first one.
    pub fn get_mask_cell_index(&self, anchor: usize) -> usize {
        let mut closest = (usize::MAX, 0);
        for idx in 0..self.size() {
            let (start, end) = self.get_selection(idx);
            if anchor >= start && anchor <= end {
                return idx;
            }
            let dist = anchor.abs_diff(start).min(anchor.abs_diff(end));
            if dist < closest.0 {
                closest = (dist, idx);
            }
        }
        closest.1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cells() {
        let m = MaskFormat::new("YYYY-MM-DD HH:mm:ss.SSS");
        assert_eq!(m.size(), 7);
        assert_eq!(m.cells().len(), 13);
        assert_eq!(m.get_selection(6), (20, 23));
        assert_eq!(m.get_selection(7), (0, 0));
        assert_eq!(m.mask_format().chars().filter(|c| *c == PLACEHOLDER).count(), 17);
    }

    #[test]
    fn test_empty() {
        let m = MaskFormat::new("");
        assert_eq!(m.size(), 0);
        assert!(m.cells().is_empty());
        assert!(m.is_match(""));
        assert!(!m.is_match("x"));
        assert_eq!(m.get_mask_cell_index(3), 0);
    }

    #[test]
    fn test_literal_only() {
        let m = MaskFormat::new("[Week] w");
        assert_eq!(m.size(), 0);
        assert_eq!(m.cells().len(), 1);
        assert!(!m.cells()[0].mask);
        assert!(m.is_match("[Week] w"));
    }

    #[test]
    fn test_match() {
        let m = MaskFormat::new("YYYY-MM-DD");
        assert!(m.is_match("YYYY-MM-DD"));
        assert!(m.is_match("2021-06-21"));
        assert!(!m.is_match("2021-06-2"));
        assert!(!m.is_match("2021-06-211"));
        assert!(!m.is_match("2021.06.21"));
        assert!(!m.is_match("2021-06-2ä"));
    }

    #[test]
    fn test_non_ascii_literal() {
        let m = MaskFormat::new("YYYY年MM月");
        assert_eq!(m.get_selection(1), (7, 9));
        assert!(m.is_match("2021年06月"));
        assert!(!m.is_match("2021-06月"));
    }

    #[test]
    fn test_cell_index() {
        let m = MaskFormat::new("YYYY---MM");
        assert_eq!(m.get_mask_cell_index(0), 0);
        assert_eq!(m.get_mask_cell_index(4), 0);
        assert_eq!(m.get_mask_cell_index(5), 0);
        assert_eq!(m.get_mask_cell_index(6), 1);
        assert_eq!(m.get_mask_cell_index(9), 1);
        assert_eq!(m.get_mask_cell_index(20), 1);
    }

    #[test]
    fn test_cell_index_monotonic() {
        for f in ["YYYY-MM-DD", "DD.MM.YYYY HH:mm", "  YYYY  ", "HH:mm:ss.SSS"] {
            let m = MaskFormat::new(f);
            let mut last = 0;
            for anchor in 0..=f.len() + 2 {
                let idx = m.get_mask_cell_index(anchor);
                assert!(idx >= last, "{} at {}", f, anchor);
                last = idx;
            }
        }
    }

    #[test]
    fn test_skeleton_stable() {
        let m = MaskFormat::new("YYYY-MM-DD HH:mm");
        let mut text = "YYYY-MM-DD HH:mm".to_string();
        for idx in 0..m.size() {
            let (start, end) = m.get_selection(idx);
            let digits = "9".repeat(end - start);
            text.replace_range(start..end, &digits);
            assert!(m.is_match(&text));
        }
        assert_eq!(text, "9999-99-99 99:99");
    }
}
