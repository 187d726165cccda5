//! Per-glyph advance widths for Verdana 11px, the font badges are set in.

/// Advance used for any glyph missing from the table.
pub const DEFAULT_CHAR_WIDTH: f64 = 7.0;

/// Horizontal padding on each side of a segment's text.
pub const H_PAD: u32 = 5;

#[must_use]
pub fn char_width(c: char) -> f64 {
    match c {
        ' ' | '\'' => 3.3,
        '!' | ',' | '.' | ':' | ';' => 4.0,
        '"' | '/' => 5.3,
        '#' => 8.5,
        '$' => 7.0,
        '%' => 10.0,
        '&' => 8.0,
        '(' | ')' => 4.3,
        '*' => 6.0,
        '+' | '<' | '=' | '>' => 9.5,
        '-' => 4.7,
        '0'..='9' => 7.0,
        '?' => 6.3,
        '@' => 11.5,
        'A' | 'G' | 'K' | 'V' => 8.0,
        'B' | 'R' | 'X' => 7.7,
        'C' | 'Z' => 7.3,
        'D' | 'H' | 'N' | 'U' => 8.5,
        'E' | 'L' | 'T' => 6.7,
        'F' | 'S' => 6.3,
        'I' => 3.7,
        'J' => 4.3,
        'M' => 10.0,
        'O' | 'Q' => 9.0,
        'P' | 'Y' => 7.0,
        'W' => 11.0,
        'a' | 'k' | 'v' | 'y' => 6.7,
        'b' | 'd' | 'e' | 'g' | 'h' | 'n' | 'o' | 'p' | 'q' | 'u' => 7.0,
        'c' => 6.0,
        'f' => 3.7,
        'i' | 'j' | 'l' => 3.0,
        'm' => 10.7,
        'r' => 4.7,
        's' => 5.3,
        't' => 5.0,
        'w' => 9.3,
        'x' => 6.3,
        'z' => 5.7,
        _ => DEFAULT_CHAR_WIDTH,
    }
}

/// Summed advance width of `text`, unrounded.
#[must_use]
pub fn measure_text(text: &str) -> f64 {
    text.chars().map(char_width).sum()
}

/// Pixel width of a segment holding `text`: ceil(advance) plus padding on both sides.
#[must_use]
pub fn segment_width(text: &str) -> u32 {
    let advance = measure_text(text).ceil();
    // advances are small positive numbers; saturate rather than wrap on absurd input
    let advance = if advance >= f64::from(u32::MAX - 2 * H_PAD) {
        u32::MAX - 2 * H_PAD
    } else {
        advance as u32
    };
    advance + 2 * H_PAD
}
