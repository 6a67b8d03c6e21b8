//! Deterministic filename ordering.
//!
//! Packer input order, content-hash order, and multi-sheet indices all use
//! this comparison, so packed output is reproducible regardless of the order
//! resources arrive in.

use std::cmp::Ordering;

/// Compare two filenames case-insensitively with numeric runs compared by
/// value (`img2 < img10`).
///
/// Numeric comparison can make distinct names compare equal (`img01` vs
/// `img1`), so any tie between distinct strings is broken by raw code-point
/// comparison. The result is a total order for all inputs, including empty
/// strings.
pub fn compare_file_names(a: &str, b: &str) -> Ordering {
    match natural_cmp(a, b) {
        Ordering::Equal if a != b => a.cmp(b),
        ordering => ordering,
    }
}

/// Case-insensitive comparison with digit runs compared numerically.
fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut left = a.chars().peekable();
    let mut right = b.chars().peekable();

    loop {
        match (left.peek().copied(), right.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(lc), Some(rc)) => {
                if lc.is_ascii_digit() && rc.is_ascii_digit() {
                    match compare_digit_runs(&mut left, &mut right) {
                        Ordering::Equal => continue,
                        ordering => return ordering,
                    }
                }

                let lc_folded = lc.to_lowercase();
                let rc_folded = rc.to_lowercase();
                match lc_folded.cmp(rc_folded) {
                    Ordering::Equal => {
                        left.next();
                        right.next();
                    }
                    ordering => return ordering,
                }
            }
        }
    }
}

/// Consume a digit run from both iterators and compare their numeric values.
///
/// Leading zeros are skipped, so runs of different textual length can still
/// compare equal; the caller's final code-point tie-break keeps the overall
/// order total.
fn compare_digit_runs(
    left: &mut std::iter::Peekable<std::str::Chars<'_>>,
    right: &mut std::iter::Peekable<std::str::Chars<'_>>,
) -> Ordering {
    let l = take_digits(left);
    let r = take_digits(right);

    let l_significant = l.trim_start_matches('0');
    let r_significant = r.trim_start_matches('0');

    // More significant digits means a larger value; equal lengths compare
    // lexically, which for equal-length digit strings is numeric order.
    l_significant
        .len()
        .cmp(&r_significant.len())
        .then_with(|| l_significant.cmp(r_significant))
}

fn take_digits(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> String {
    let mut run = String::new();
    while let Some(c) = chars.peek() {
        if !c.is_ascii_digit() {
            break;
        }
        run.push(*c);
        chars.next();
    }
    run
}

/// Sort filenames in place using [`compare_file_names`].
pub fn sort_file_names<S: AsRef<str>>(names: &mut [S]) {
    names.sort_by(|a, b| compare_file_names(a.as_ref(), b.as_ref()));
}
