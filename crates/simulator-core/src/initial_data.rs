//! Initial register data: one `[register index] [value]` pair per line.

use crate::errors::RangeError;

/// One initial data register assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct InitialDataEntry {
    /// 1-based source line, kept for range errors raised at load.
    pub line: usize,
    /// Data register index.
    pub index: usize,
    /// Value to store.
    pub value: i64,
}

/// Parses initial data text. Blank lines are skipped.
///
/// Register bounds are not known here; they are checked when the entries are
/// loaded into a machine.
///
/// # Errors
///
/// Returns [`RangeError::MalformedEntry`] for a line that is not exactly two
/// integers or whose index is negative.
pub fn parse_initial_data(source: &str) -> Result<Vec<InitialDataEntry>, RangeError> {
    source
        .lines()
        .enumerate()
        .filter(|(_, text)| !text.trim().is_empty())
        .map(|(idx, text)| parse_entry(idx + 1, text))
        .collect()
}

fn parse_entry(line: usize, text: &str) -> Result<InitialDataEntry, RangeError> {
    let malformed = |reason| RangeError::MalformedEntry {
        line,
        entry: text.trim().to_string(),
        reason,
    };

    let fields: Vec<&str> = text.split_whitespace().collect();
    let [index, value] = fields.as_slice() else {
        return Err(malformed("expected `[register index] [value]`"));
    };
    let index = index
        .parse::<usize>()
        .map_err(|_| malformed("register index is not a non-negative integer"))?;
    let value = value
        .parse::<i64>()
        .map_err(|_| malformed("value is not an integer"))?;

    Ok(InitialDataEntry { line, index, value })
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{parse_initial_data, InitialDataEntry};
    use crate::errors::RangeError;

    #[test]
    fn parses_pairs_and_skips_blank_lines() {
        let entries = parse_initial_data("0 0\n\n1 5\n  3   -12  \n").expect("valid data");
        assert_eq!(
            entries,
            vec![
                InitialDataEntry {
                    line: 1,
                    index: 0,
                    value: 0,
                },
                InitialDataEntry {
                    line: 3,
                    index: 1,
                    value: 5,
                },
                InitialDataEntry {
                    line: 4,
                    index: 3,
                    value: -12,
                },
            ]
        );
    }

    #[rstest]
    #[case::single_field("4", 1)]
    #[case::three_fields("1 2 3", 1)]
    #[case::negative_index("-1 2", 1)]
    #[case::word_index("r1 2", 1)]
    #[case::float_value("1 2.5", 1)]
    #[case::later_line("0 1\n1 x", 2)]
    fn malformed_entries_abort_the_load(#[case] source: &str, #[case] line: usize) {
        let error = parse_initial_data(source).expect_err("entry must be rejected");
        assert!(
            matches!(error, RangeError::MalformedEntry { line: l, .. } if l == line),
            "{error}"
        );
    }
}
