//! Conversion between ASCII digits and Arabic-Indic digits (٠-٩)

const ARABIC_INDIC: [char; 10] = ['٠', '١', '٢', '٣', '٤', '٥', '٦', '٧', '٨', '٩'];

/// Replace every ASCII digit with its Arabic-Indic counterpart, leaving other characters as-is
pub fn to_arabic_indic(text: &str) -> String {
    text.chars()
        .map(|c| {
            if c.is_ascii_digit() {
                ARABIC_INDIC[(c as u8 - b'0') as usize]
            } else {
                c
            }
        })
        .collect()
}

/// Replace every Arabic-Indic digit with its ASCII counterpart, leaving other characters as-is
pub fn to_ascii(text: &str) -> String {
    text.chars()
        .map(|c| match arabic_indic_value(c) {
            Some(d) => char::from(b'0' + d),
            None => c,
        })
        .collect()
}

fn arabic_indic_value(c: char) -> Option<u8> {
    match c {
        '\u{0660}'..='\u{0669}' => Some((c as u32 - 0x0660) as u8),
        _ => None,
    }
}

pub fn is_arabic_indic_digit(c: char) -> bool {
    arabic_indic_value(c).is_some()
}

/// Digit in either numeral system
pub fn is_numeral(c: char) -> bool {
    c.is_ascii_digit() || is_arabic_indic_digit(c)
}

/// Non-empty and made only of digits (either system)
pub fn is_numeral_str(text: &str) -> bool {
    !text.is_empty() && text.chars().all(is_numeral)
}

/// Parse a number written in ASCII or Arabic-Indic digits (or a mix).
/// Returns None for empty input, stray characters or overflow.
pub fn parse_numeral(text: &str) -> Option<u32> {
    if !is_numeral_str(text) {
        return None;
    }
    to_ascii(text).parse().ok()
}
