//! Text metrics for the two template fonts. The report is a fixed form set in
//! Helvetica / Helvetica-Bold (PDF base-14), so no font files are discovered or
//! embedded; widths are approximated at 1000 units/em.

/// Map a single Unicode char to its WinAnsi (Windows-1252) byte, or 0 if
/// unmappable.
fn char_to_winansi(c: char) -> u8 {
    match c as u32 {
        0x0020..=0x007F => c as u8,
        0x00A0..=0x00FF => c as u8, // Latin-1 supplement maps directly
        0x20AC => 0x80,
        0x201A => 0x82,
        0x0192 => 0x83,
        0x201E => 0x84,
        0x2026 => 0x85,
        0x2020 => 0x86,
        0x2021 => 0x87,
        0x02C6 => 0x88,
        0x2030 => 0x89,
        0x0160 => 0x8A,
        0x2039 => 0x8B,
        0x0152 => 0x8C,
        0x017D => 0x8E,
        0x2018 => 0x91,
        0x2019 => 0x92,
        0x201C => 0x93,
        0x201D => 0x94,
        0x2022 => 0x95, // bullet
        0x2013 => 0x96,
        0x2014 => 0x97,
        0x02DC => 0x98,
        0x2122 => 0x99,
        0x0161 => 0x9A,
        0x203A => 0x9B,
        0x0153 => 0x9C,
        0x017E => 0x9E,
        0x0178 => 0x9F,
        _ => 0,
    }
}

/// Convert a UTF-8 string to WinAnsi bytes for PDF `Str` encoding.
/// Unmappable chars are dropped.
pub(crate) fn to_winansi_bytes(s: &str) -> Vec<u8> {
    s.chars()
        .map(char_to_winansi)
        .filter(|&b| b != 0)
        .collect()
}

/// Approximate Helvetica advance width in 1000-units for a WinAnsi byte.
fn helvetica_width_1000(b: u8) -> f32 {
    match b {
        32 => 278.0,                          // space
        33..=47 => 333.0,                     // punctuation
        48..=57 => 556.0,                     // digits
        58..=64 => 333.0,                     // more punctuation
        73 | 74 => 278.0,                     // I J (narrow uppercase)
        77 => 833.0,                          // M (wide)
        65..=90 => 667.0,                     // uppercase A-Z (average)
        91..=96 => 333.0,                     // brackets etc.
        102 | 105 | 106 | 108 | 116 => 278.0, // narrow lowercase: f i j l t
        109 | 119 => 833.0,                   // m w (wide)
        97..=122 => 556.0,                    // lowercase a-z (average)
        _ => 556.0,
    }
}

/// Helvetica-Bold runs a touch wider across the board.
fn helvetica_bold_width_1000(b: u8) -> f32 {
    match b {
        32 => 278.0,
        33..=47 => 333.0,
        48..=57 => 556.0,
        58..=64 => 333.0,
        73 | 74 => 278.0,
        77 => 889.0,
        65..=90 => 722.0,
        91..=96 => 333.0,
        102 | 105 | 106 | 108 | 116 => 333.0,
        109 | 119 => 889.0,
        97..=122 => 611.0,
        _ => 611.0,
    }
}

fn char_width_1000(c: char, bold: bool) -> f32 {
    let b = char_to_winansi(c);
    if b < 32 {
        return 0.0;
    }
    if bold {
        helvetica_bold_width_1000(b)
    } else {
        helvetica_width_1000(b)
    }
}

pub(crate) fn text_width(text: &str, font_size: f32, bold: bool) -> f32 {
    text.chars()
        .map(|c| char_width_1000(c, bold) * font_size / 1000.0)
        .sum()
}

/// Greedy word wrap at `max_width` points. A word wider than the line goes on
/// a line of its own rather than being split. Empty input yields no lines.
pub(crate) fn wrap(text: &str, font_size: f32, bold: bool, max_width: f32) -> Vec<String> {
    let space_w = char_width_1000(' ', bold) * font_size / 1000.0;
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut current_w: f32 = 0.0;

    for word in text.split_whitespace() {
        let ww = text_width(word, font_size, bold);
        if current.is_empty() {
            current.push_str(word);
            current_w = ww;
        } else if current_w + space_w + ww > max_width {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
            current_w = ww;
        } else {
            current.push(' ');
            current.push_str(word);
            current_w += space_w + ww;
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn winansi_maps_ascii_and_drops_unmappable() {
        assert_eq!(to_winansi_bytes("ABC"), b"ABC".to_vec());
        assert_eq!(to_winansi_bytes("–"), vec![0x96]);
        assert_eq!(to_winansi_bytes("漢"), Vec::<u8>::new());
    }

    #[test]
    fn bold_is_never_narrower() {
        for c in "The quick brown FOX 0123".chars() {
            assert!(char_width_1000(c, true) >= char_width_1000(c, false), "{c}");
        }
    }

    #[test]
    fn wrap_respects_max_width() {
        let text = "alpha beta gamma delta epsilon zeta eta theta";
        let lines = wrap(text, 10.0, false, 100.0);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(text_width(line, 10.0, false) <= 100.0, "{line}");
        }
        let rejoined = lines.join(" ");
        assert_eq!(rejoined, text);
    }

    #[test]
    fn wrap_of_empty_text_yields_no_lines() {
        assert!(wrap("", 10.0, false, 100.0).is_empty());
        assert!(wrap("   ", 10.0, false, 100.0).is_empty());
    }

    #[test]
    fn oversized_word_gets_its_own_line() {
        let lines = wrap("a supercalifragilisticexpialidocious b", 12.0, false, 40.0);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "supercalifragilisticexpialidocious");
    }
}
