use std::borrow::Cow;
use std::sync::OnceLock;

use regex::Regex;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Calculates the display width of a string in terminal columns.
///
/// Unicode-aware: CJK characters and emoji occupy two columns, combining
/// marks occupy zero.
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Ellipsis appended when text is cut off.
const ELLIPSIS: &str = "...";
const ELLIPSIS_WIDTH: usize = 3;

/// Truncates a string to fit within `max_width` display columns.
///
/// Appends "..." when truncation happens. For widths of 3 or fewer columns
/// there is no room for "char + ellipsis", so as many characters as fit are
/// returned without the ellipsis. Returns `Cow::Borrowed` when the string
/// already fits.
pub fn truncate_to_width(s: &str, max_width: usize) -> Cow<'_, str> {
    if display_width(s) <= max_width {
        return Cow::Borrowed(s);
    }

    if max_width <= ELLIPSIS_WIDTH {
        let mut width = 0;
        let mut end = 0;
        for (idx, c) in s.char_indices() {
            let w = UnicodeWidthChar::width(c).unwrap_or(0);
            if width + w > max_width {
                break;
            }
            width += w;
            end = idx + c.len_utf8();
        }
        return Cow::Owned(s[..end].to_string());
    }

    let target = max_width - ELLIPSIS_WIDTH;
    let mut width = 0;
    let mut end = 0;
    for (idx, c) in s.char_indices() {
        let w = UnicodeWidthChar::width(c).unwrap_or(0);
        if width + w > target {
            break;
        }
        width += w;
        end = idx + c.len_utf8();
    }
    Cow::Owned(format!("{}{}", &s[..end], ELLIPSIS))
}

/// Strips HTML/XML tags from feed summaries and decodes the handful of
/// entities that actually show up in headline markup.
pub fn strip_markup(s: &str) -> String {
    static TAG_RE: OnceLock<Regex> = OnceLock::new();
    let re = TAG_RE.get_or_init(|| Regex::new(r"<[^>]*>").expect("tag regex compiles"));
    let stripped = re.replace_all(s, "");

    stripped
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&nbsp;", " ")
}

/// Formats a price with thousands separators and a fixed number of decimals.
///
/// `group_thousands(38500.5, 1)` → `"38,500.5"`.
pub fn group_thousands(value: f64, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (formatted.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    let digits: Vec<char> = int_part.chars().collect();
    for (i, c) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*c);
    }

    let sign = if value < 0.0 { "-" } else { "" };
    match frac_part {
        Some(f) => format!("{}{}.{}", sign, grouped, f),
        None => format!("{}{}", sign, grouped),
    }
}

/// Returns a `width`-column window into `text`, starting at `offset`
/// characters and wrapping around the end of the string.
///
/// Total for any `offset` (it is reduced modulo the character count), so
/// marquee callers can increment an offset forever without bounds checks.
/// Empty input yields an empty window.
pub fn marquee_window(text: &str, offset: usize, width: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.is_empty() || width == 0 {
        return String::new();
    }

    let start = offset % chars.len();
    let mut out = String::new();
    let mut cols = 0;
    for c in chars.iter().cycle().skip(start) {
        let w = UnicodeWidthChar::width(*c).unwrap_or(0);
        if cols + w > width {
            break;
        }
        cols += w;
        out.push(*c);
        if cols == width {
            break;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_fits_is_borrowed() {
        assert_eq!(truncate_to_width("Short", 10), "Short");
    }

    #[test]
    fn truncate_appends_ellipsis() {
        assert_eq!(truncate_to_width("Hello World", 8), "Hello...");
    }

    #[test]
    fn truncate_cjk_counts_double_width() {
        // Each CJK char is 2 columns; 7 columns leaves room for 2 chars + "..."
        assert_eq!(truncate_to_width("日経平均株価", 7), "日経...");
    }

    #[test]
    fn truncate_narrow_widths_drop_ellipsis() {
        assert_eq!(truncate_to_width("Test!", 0), "");
        assert_eq!(truncate_to_width("Test!", 1), "T");
        assert_eq!(truncate_to_width("Test!", 3), "Tes");
    }

    #[test]
    fn strip_removes_tags_and_decodes_entities() {
        assert_eq!(
            strip_markup("<p>Rates &amp; <b>bonds</b></p>"),
            "Rates & bonds"
        );
    }

    #[test]
    fn strip_plain_text_unchanged() {
        assert_eq!(strip_markup("no markup here"), "no markup here");
    }

    #[test]
    fn group_thousands_basic() {
        assert_eq!(group_thousands(38500.5, 1), "38,500.5");
        assert_eq!(group_thousands(1234567.89, 2), "1,234,567.89");
        assert_eq!(group_thousands(999.0, 1), "999.0");
        assert_eq!(group_thousands(151.32, 2), "151.32");
    }

    #[test]
    fn group_thousands_negative() {
        assert_eq!(group_thousands(-1234.5, 1), "-1,234.5");
    }

    #[test]
    fn marquee_wraps_around() {
        // "abcdef" at offset 4, width 4 -> "efab"
        assert_eq!(marquee_window("abcdef", 4, 4), "efab");
    }

    #[test]
    fn marquee_offset_is_modular() {
        assert_eq!(marquee_window("abc", 0, 3), marquee_window("abc", 3, 3));
        assert_eq!(marquee_window("abc", 1, 3), marquee_window("abc", 7, 3));
    }

    #[test]
    fn marquee_empty_text() {
        assert_eq!(marquee_window("", 5, 10), "");
    }

    #[test]
    fn marquee_wide_chars_never_exceed_width() {
        let window = marquee_window("日経平均 ◆ ", 0, 5);
        assert!(display_width(&window) <= 5);
    }
}
