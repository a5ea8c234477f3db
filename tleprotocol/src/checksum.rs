//! The modulo-10 checksum carried in the last column of each TLE line

use crate::{FormatError, LineNumber};

/// Checksum of everything but the final character of `line`.
///
/// Digits count for their value, `-` counts as 1, anything else counts as 0.
pub fn checksum(line: &str) -> u8 {
    let sum: u32 = body(line)
        .chars()
        .map(|c| match c {
            '-' => 1,
            c => c.to_digit(10).unwrap_or(0),
        })
        .sum();
    (sum % 10) as u8
}

/// True when the final character of `line` is the digit [`checksum`] computes
pub fn validate(line: &str) -> bool {
    check_digit(line).and_then(|c| c.to_digit(10)) == Some(u32::from(checksum(line)))
}

/// Check both lines of a TLE, line 1 first
pub fn validate_pair(line1: &str, line2: &str) -> Result<(), FormatError> {
    validate_line(LineNumber::One, line1)?;
    validate_line(LineNumber::Two, line2)
}

fn validate_line(line: LineNumber, text: &str) -> Result<(), FormatError> {
    if validate(text) {
        Ok(())
    } else {
        Err(FormatError::Checksum {
            line,
            computed: checksum(text),
            found: check_digit(text),
        })
    }
}

fn check_digit(line: &str) -> Option<char> {
    line.chars().last()
}

fn body(line: &str) -> &str {
    match line.char_indices().last() {
        Some((idx, _)) => &line[..idx],
        None => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LINE1: &str = "1 44387U 19038A   24134.50749057  .00000245  00000-0  12652-3 0  9998";
    const LINE2: &str = "2 44387  98.8247 103.6000 0002382  74.0416 286.1024 14.23882512252450";

    fn with_last(line: &str, c: char) -> String {
        let mut s = line[..line.len() - 1].to_string();
        s.push(c);
        s
    }

    #[test]
    fn known_good_lines() {
        assert_eq!(checksum(LINE1), 8);
        assert_eq!(checksum(LINE2), 0);
        assert!(validate(LINE1));
        assert!(validate(LINE2));
        assert_eq!(validate_pair(LINE1, LINE2), Ok(()));
    }

    #[test]
    fn minus_counts_as_one() {
        assert_eq!(checksum("1-2-x"), 5);
        assert_eq!(checksum("--9"), 2);
    }

    #[test]
    fn corrupted_check_digit_names_the_line() {
        for bad in ['0', '1', '7', '9', 'X', ' '] {
            let l1 = with_last(LINE1, bad);
            assert!(!validate(&l1));
            let err = validate_pair(&l1, LINE2).unwrap_err();
            assert_eq!(err.line(), Some(LineNumber::One));
            assert_eq!(
                err,
                FormatError::Checksum {
                    line: LineNumber::One,
                    computed: 8,
                    found: Some(bad)
                }
            );
        }

        let l2 = with_last(LINE2, '5');
        assert_eq!(
            validate_pair(LINE1, &l2).unwrap_err().line(),
            Some(LineNumber::Two)
        );
    }

    #[test]
    fn corrupted_body_digit() {
        let l2 = LINE2.replacen("98.8247", "98.8248", 1);
        assert!(!validate(&l2));
        assert_eq!(
            validate_pair(LINE1, &l2).unwrap_err().line(),
            Some(LineNumber::Two)
        );
    }

    #[test]
    fn line_one_reported_before_line_two() {
        let l1 = with_last(LINE1, '0');
        let l2 = with_last(LINE2, '1');
        assert_eq!(
            validate_pair(&l1, &l2).unwrap_err().line(),
            Some(LineNumber::One)
        );
    }

    #[test]
    fn short_and_odd_input_never_panics() {
        assert!(!validate(""));
        assert!(validate("0"));
        assert!(!validate("1"));
        assert!(!validate("1 44387"));
        assert!(!validate("ünïcødé"));
        assert!(validate_pair("", "").is_err());
        assert!(validate_pair("1 ű", LINE2).is_err());
    }
}
