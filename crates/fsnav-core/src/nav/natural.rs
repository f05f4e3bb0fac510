//! Natural ("human") ordering of entry names.
//!
//! Containers always come before leaf entries. Names are then compared
//! case-insensitively, character by character, with two refinements:
//! runs of decimal digits are compared by numeric value (`foo9` before
//! `foo10`), and `.` sorts before any other differing character
//! (`foo.bar` before `foo-1.bar`).

use std::cmp::Ordering;

/// Compares two entries by container flag, then by [`compare_names`].
pub fn compare(a_container: bool, a_name: &str, b_container: bool, b_name: &str) -> Ordering {
    b_container
        .cmp(&a_container)
        .then_with(|| compare_names(a_name, b_name))
}

/// Compares two display names in natural order.
///
/// When two digit runs have the same numeric value but different lengths,
/// the **longer** run sorts first, so `foo01` comes before `foo1`. This
/// tie-break is inherited behaviour and is kept deliberately.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    let a = lowercase_chars(a);
    let b = lowercase_chars(b);
    let (mut i, mut j) = (0, 0);

    loop {
        match (a.get(i).copied(), b.get(j).copied()) {
            (Some(c1), Some(c2)) if c1.is_ascii_digit() && c2.is_ascii_digit() => {
                let end1 = digit_run_end(&a, i);
                let end2 = digit_run_end(&b, j);

                let by_value = compare_digit_runs(&a[i..end1], &b[j..end2]);
                if by_value != Ordering::Equal {
                    return by_value;
                }
                let (len1, len2) = (end1 - i, end2 - j);
                if len1 != len2 {
                    return len2.cmp(&len1);
                }

                i = end1;
                j = end2;
            }
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(c1), Some(c2)) if c1 == c2 => {
                i += 1;
                j += 1;
            }
            (Some('.'), Some(_)) => return Ordering::Less,
            (Some(_), Some('.')) => return Ordering::Greater,
            (Some(c1), Some(c2)) => return c1.cmp(&c2),
        }
    }
}

/// Sorts plain (non-container) names in place using [`compare_names`].
pub fn sort_names<S: AsRef<str>>(names: &mut [S]) {
    names.sort_by(|a, b| compare_names(a.as_ref(), b.as_ref()));
}

fn lowercase_chars(s: &str) -> Vec<char> {
    s.chars().flat_map(char::to_lowercase).collect()
}

fn digit_run_end(chars: &[char], start: usize) -> usize {
    chars[start..]
        .iter()
        .position(|c| !c.is_ascii_digit())
        .map_or(chars.len(), |n| start + n)
}

/// Compares two ASCII digit runs by numeric value without parsing them,
/// so arbitrarily long runs never overflow.
fn compare_digit_runs(a: &[char], b: &[char]) -> Ordering {
    let a = strip_leading_zeros(a);
    let b = strip_leading_zeros(b);
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

fn strip_leading_zeros(run: &[char]) -> &[char] {
    let first = run.iter().position(|&c| c != '0').unwrap_or(run.len());
    &run[first..]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(names: &[&str]) -> Vec<String> {
        let mut v: Vec<String> = names.iter().map(|s| s.to_string()).collect();
        sort_names(&mut v);
        v
    }

    #[test]
    fn numeric_runs_sort_by_value() {
        assert_eq!(
            sorted(&["img2.png", "img10.png", "img1.png"]),
            vec!["img1.png", "img2.png", "img10.png"]
        );
    }

    #[test]
    fn container_sorts_first_regardless_of_name() {
        assert_eq!(compare(true, "Photos", false, "apple.txt"), Ordering::Less);
        assert_eq!(compare(false, "apple.txt", true, "Photos"), Ordering::Greater);
    }

    #[test]
    fn two_containers_compare_by_name() {
        assert_eq!(compare(true, "b", true, "a"), Ordering::Greater);
        assert_eq!(compare(true, "dir2", true, "dir10"), Ordering::Less);
    }

    #[test]
    fn comparison_ignores_case() {
        assert_eq!(compare_names("README", "readme"), Ordering::Equal);
        assert_eq!(compare_names("Banana", "apple"), Ordering::Greater);
        assert_eq!(compare_names("ÄPFEL", "äpfel"), Ordering::Equal);
    }

    #[test]
    fn dot_sorts_before_other_characters() {
        assert_eq!(compare_names("foo.bar", "foo-1.bar"), Ordering::Less);
        assert_eq!(compare_names("foo_x", "foo.x"), Ordering::Greater);
    }

    #[test]
    fn shorter_prefix_sorts_first() {
        assert_eq!(compare_names("foo", "foo.txt"), Ordering::Less);
        assert_eq!(compare_names("foobar", "foo"), Ordering::Greater);
        assert_eq!(compare_names("", "a"), Ordering::Less);
    }

    #[test]
    fn equal_names_are_equal() {
        assert_eq!(compare_names("same9.txt", "same9.txt"), Ordering::Equal);
        assert_eq!(compare_names("", ""), Ordering::Equal);
    }

    // Inherited tie-break: for equal numeric values the longer literal wins.
    #[test]
    fn longer_digit_run_sorts_first_on_equal_value() {
        assert_eq!(compare_names("foo01", "foo1"), Ordering::Less);
        assert_eq!(compare_names("foo1", "foo001"), Ordering::Greater);
        assert_eq!(sorted(&["a1", "a001", "a01"]), vec!["a001", "a01", "a1"]);
    }

    #[test]
    fn digits_continue_comparing_after_equal_runs() {
        assert_eq!(compare_names("v2.10", "v2.9"), Ordering::Greater);
        assert_eq!(compare_names("part3b", "part3a"), Ordering::Greater);
    }

    #[test]
    fn huge_digit_runs_do_not_overflow() {
        let small = "n99999999999999999999999999999999";
        let big = "n100000000000000000000000000000000";
        assert_eq!(compare_names(small, big), Ordering::Less);
    }

    #[test]
    fn digit_versus_letter_uses_code_point() {
        assert_eq!(compare_names("a1", "ab"), Ordering::Less);
    }

    #[test]
    fn sort_is_consistent_with_antisymmetry() {
        let names = ["x10", "X9", "x.y", "x-y", "x", "x09", "x9a", "Y"];
        for a in names {
            for b in names {
                assert_eq!(compare_names(a, b), compare_names(b, a).reverse(), "{a} vs {b}");
            }
        }
    }
}
