use crate::models::LineRange;

/// Lines covered by a selection inside a source listing.
///
/// `start_offset` is the selection start as a character offset into the whole listing
/// text. The start line is one plus the newlines before that offset; every newline inside
/// the selected text adds one more line. Offsets past the end are clamped.
pub fn line_range(listing: &str, start_offset: usize, selected: &str) -> LineRange {
    let before = listing
        .chars()
        .take(start_offset)
        .filter(|&c| c == '\n')
        .count();
    let inside = selected.chars().filter(|&c| c == '\n').count();

    let start_line = to_line(before).saturating_add(1);
    let end_line = start_line.saturating_add(to_line(inside));
    LineRange::new_unchecked(start_line, end_line)
}

fn to_line(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING: &str = "fn main() {\n    let a = 1;\n    let b = 2;\n    println!(\"{}\", a + b);\n}\n";

    #[test]
    fn test_selection_on_first_line() {
        let range = line_range(LISTING, 3, "main");
        assert_eq!(range, LineRange::single(1));
        assert_eq!(range.tag(), "[L1]");
    }

    #[test]
    fn test_selection_across_lines() {
        let start = LISTING.find("let a").unwrap();
        let end = LISTING.find("println").unwrap();
        let range = line_range(LISTING, start, &LISTING[start..end]);
        assert_eq!(range, LineRange::new_unchecked(2, 4));
        assert_eq!(range.tag(), "[L2-4]");
    }

    #[test]
    fn test_selection_starting_on_newline() {
        // offset 11 is the '\n' closing line one; it is not "before" the selection
        let range = line_range(LISTING, 11, "\n    let");
        assert_eq!(range, LineRange::new_unchecked(1, 2));
    }

    #[test]
    fn test_offsets_are_characters() {
        let listing = "// 주석\nlet x = 1;\n";
        let start = listing.chars().position(|c| c == 'x').unwrap();
        assert_eq!(line_range(listing, start, "x"), LineRange::single(2));
    }

    #[test]
    fn test_offset_past_end_is_clamped() {
        assert_eq!(line_range("a\nb", 100, "b"), LineRange::single(2));
    }
}
