use rat_picker::mask_format::MaskFormat;

const FORMATS: [&str; 6] = [
    "YYYY-MM-DD",
    "YYYY-MM-DD HH:mm:ss",
    "DD.MM.YYYY",
    "HH:mm",
    "YYYY/MM",
    "MM/DD/YYYY HH:mm:ss.SSS",
];

fn filled(mask: &MaskFormat, digit: char) -> String {
    let mut s = String::new();
    for cell in mask.cells() {
        if cell.mask {
            s.extend(std::iter::repeat(digit).take(cell.text.len()));
        } else {
            s.push_str(&cell.text);
        }
    }
    s
}

#[test]
fn test_filled_cells_match() {
    for f in FORMATS {
        let mask = MaskFormat::new(f);
        assert!(mask.is_match(f), "{}", f);
        for digit in ['0', '1', '9'] {
            let text = filled(&mask, digit);
            assert!(mask.is_match(&text), "{} {}", f, text);
        }
    }
}

#[test]
fn test_partial_fill_match() {
    let mask = MaskFormat::new("YYYY-MM-DD");
    assert!(mask.is_match("2000-MM-DD"));
    assert!(mask.is_match("2000-01-DD"));
    assert!(mask.is_match("YYYY-01-02"));
    assert!(!mask.is_match("2000-01-0"));
    assert!(!mask.is_match("2000.01.02"));
    assert!(!mask.is_match(""));
}

#[test]
fn test_cell_index_scan() {
    for f in FORMATS {
        let mask = MaskFormat::new(f);
        let mut last = 0;
        for anchor in 0..=f.len() {
            let idx = mask.get_mask_cell_index(anchor);
            assert!(idx >= last, "{} {}", f, anchor);
            assert!(idx < mask.size());
            last = idx;
        }
        assert_eq!(last, mask.size() - 1);
    }
}

#[test]
fn test_selection() {
    let mask = MaskFormat::new("DD.MM.YYYY HH:mm");
    assert_eq!(mask.size(), 5);
    assert_eq!(mask.get_selection(0), (0, 2));
    assert_eq!(mask.get_selection(2), (6, 10));
    assert_eq!(mask.get_selection(4), (14, 16));
    assert_eq!(mask.get_selection(5), (0, 0));
}
