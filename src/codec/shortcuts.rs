//! Single-letter shortcut tables.
//!
//! Both tables are fixed: changing an entry changes the meaning of every URL
//! already in circulation. Lowercase aspect letters are landscape ratios,
//! their uppercase counterparts the portrait flip.

pub const ASPECT_SHORTCUTS: &[(char, u32, u32)] = &[
    ('a', 1, 1),
    ('b', 4, 3),
    ('c', 3, 2),
    ('d', 16, 9),
    ('e', 21, 9),
    ('B', 3, 4),
    ('C', 2, 3),
    ('D', 9, 16),
    ('E', 9, 21),
];

pub const WIDTH_SHORTCUTS: &[(char, u32)] = &[
    ('a', 260),
    ('b', 414),
    ('c', 896),
    ('d', 1280),
    ('e', 1440),
    ('f', 1920),
    ('g', 2560),
];

pub fn aspect_for_letter(letter: char) -> Option<(u32, u32)> {
    ASPECT_SHORTCUTS
        .iter()
        .find(|(l, _, _)| *l == letter)
        .map(|&(_, w, h)| (w, h))
}

pub fn letter_for_aspect(width: u32, height: u32) -> Option<char> {
    ASPECT_SHORTCUTS
        .iter()
        .find(|&&(_, w, h)| w == width && h == height)
        .map(|&(l, _, _)| l)
}

pub fn width_for_letter(letter: char) -> Option<u32> {
    WIDTH_SHORTCUTS
        .iter()
        .find(|(l, _)| *l == letter)
        .map(|&(_, w)| w)
}

pub fn letter_for_width(width: u32) -> Option<char> {
    WIDTH_SHORTCUTS
        .iter()
        .find(|&&(_, w)| w == width)
        .map(|&(l, _)| l)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tables_are_bijective() {
        for &(letter, w, h) in ASPECT_SHORTCUTS {
            assert_eq!(letter_for_aspect(w, h), Some(letter));
            assert_eq!(aspect_for_letter(letter), Some((w, h)));
        }
        for &(letter, w) in WIDTH_SHORTCUTS {
            assert_eq!(letter_for_width(w), Some(letter));
            assert_eq!(width_for_letter(letter), Some(w));
        }
    }

    #[test]
    fn aspect_letters_are_case_sensitive() {
        assert_eq!(aspect_for_letter('b'), Some((4, 3)));
        assert_eq!(aspect_for_letter('B'), Some((3, 4)));
        assert_eq!(aspect_for_letter('A'), None);
    }

    #[test]
    fn width_table_is_ascending_by_letter() {
        let widths: Vec<u32> = WIDTH_SHORTCUTS.iter().map(|&(_, w)| w).collect();
        assert!(widths.windows(2).all(|p| p[0] < p[1]));
    }

    #[test]
    fn unknown_values_have_no_letter() {
        assert_eq!(letter_for_width(1000), None);
        assert_eq!(letter_for_aspect(5, 4), None);
        assert_eq!(width_for_letter('z'), None);
    }
}
