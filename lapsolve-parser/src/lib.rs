#![warn(clippy::uninlined_format_args)]

use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, take_till, take_until, take_while1},
    character::complete::{char, space1},
    combinator::recognize,
    multi::{many0, separated_list1},
    number::complete::double,
    sequence::delimited,
};

#[derive(Debug, Clone, PartialEq)]
pub struct RowWithLine {
    pub line: usize,
    pub costs: Vec<f64>,
}

/// Cost rows in file order. Blank and comment-only lines are dropped.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParsedMatrix {
    pub rows: Vec<RowWithLine>,
}

impl ParsedMatrix {
    pub fn costs(&self) -> Vec<Vec<f64>> {
        self.rows.iter().map(|row| row.costs.clone()).collect()
    }

    /// Source line of the `index`-th parsed row.
    pub fn line_of(&self, index: usize) -> Option<usize> {
        self.rows.get(index).map(|row| row.line)
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    #[error("Syntax error at line {line}: {detail}")]
    SyntaxError { line: usize, detail: String },
}

fn sp(input: &str) -> IResult<&str, &str> {
    fn fullwidth_space(input: &str) -> IResult<&str, &str> {
        take_while1(|c: char| c == '\u{3000}')(input)
    }

    fn comment(input: &str) -> IResult<&str, &str> {
        delimited(tag("/*"), take_until("*/"), tag("*/")).parse(input)
    }

    fn line_comment(input: &str) -> IResult<&str, &str> {
        recognize((tag("//"), take_till(|c| c == '\n'))).parse(input)
    }

    recognize(many0(alt((space1, fullwidth_space, comment, line_comment)))).parse(input)
}

fn sp1(input: &str) -> IResult<&str, &str> {
    let (rest, skipped) = sp(input)?;
    if skipped.is_empty() {
        return Err(nom::Err::Error(nom::error::Error::new(
            input,
            nom::error::ErrorKind::Space,
        )));
    }
    Ok((rest, skipped))
}

// "1, 2", "1 ,2" and "1 2" all separate two costs
fn separator(input: &str) -> IResult<&str, &str> {
    alt((recognize((sp, char(','), sp)), sp1)).parse(input)
}

fn row(input: &str) -> IResult<&str, Vec<f64>> {
    separated_list1(separator, double).parse(input)
}

fn row_with_sp(input: &str) -> IResult<&str, Vec<f64>> {
    (sp, row, sp).map(|(_, costs, _)| costs).parse(input)
}

fn syntax_error_detail(err: nom::Err<nom::error::Error<&str>>) -> String {
    match err {
        nom::Err::Incomplete(_) => "incomplete input".to_string(),
        nom::Err::Error(e) | nom::Err::Failure(e) => {
            format!("unexpected input near '{}'", e.input.trim())
        }
    }
}

/// Parses one matrix row per line.
///
/// Costs are separated by whitespace and/or commas. `//` starts a line comment and
/// `/* ... */` may appear between costs. Shape and value checks are left to
/// `lapsolve::CostMatrix`, so ragged rows or negative costs parse fine here.
pub fn parse_matrix(input: &str) -> Result<ParsedMatrix, ParseError> {
    let mut rows = Vec::new();

    for (idx, line) in input.lines().enumerate() {
        let (rest, _) = sp(line).map_err(|e| ParseError::SyntaxError {
            line: idx + 1,
            detail: syntax_error_detail(e),
        })?;
        if rest.trim().is_empty() {
            continue;
        }
        match row_with_sp(rest) {
            Ok((rest, costs)) => {
                if !rest.trim().is_empty() {
                    return Err(ParseError::SyntaxError {
                        line: idx + 1,
                        detail: format!("unparsed input '{}'", rest.trim()),
                    });
                }
                rows.push(RowWithLine {
                    line: idx + 1,
                    costs,
                });
            }
            Err(e) => {
                return Err(ParseError::SyntaxError {
                    line: idx + 1,
                    detail: syntax_error_detail(e),
                });
            }
        }
    }

    Ok(ParsedMatrix { rows })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::spaces("1 2 3", vec![1.0, 2.0, 3.0])]
    #[case::commas("1,2,3", vec![1.0, 2.0, 3.0])]
    #[case::commas_and_spaces("1 , 2,  3", vec![1.0, 2.0, 3.0])]
    #[case::tabs("1\t2\t3", vec![1.0, 2.0, 3.0])]
    #[case::fractions("0.5 1e2 .25", vec![0.5, 100.0, 0.25])]
    #[case::negative("-4 5", vec![-4.0, 5.0])]
    #[case::single("42", vec![42.0])]
    #[case::fullwidth_space("1\u{3000}2", vec![1.0, 2.0])]
    fn test_parses_row_separators(#[case] input: &str, #[case] expected: Vec<f64>) {
        let matrix = parse_matrix(input).expect("Row should parse");
        assert_eq!(matrix.rows.len(), 1);
        assert_eq!(matrix.rows[0].costs, expected);
    }

    #[rstest]
    #[case::line_comment_trailing("1 2 // first row", vec![1.0, 2.0])]
    #[case::line_comment_adjacent("1 2// first row", vec![1.0, 2.0])]
    #[case::inline_comment("1 /* a */ 2", vec![1.0, 2.0])]
    #[case::inline_comment_adjacent("1/*a*/2", vec![1.0, 2.0])]
    #[case::inline_comment_leading("/* worker 0 */ 1 2", vec![1.0, 2.0])]
    fn test_accepts_comments(#[case] input: &str, #[case] expected: Vec<f64>) {
        let matrix = parse_matrix(input).expect("Should accept comments");
        assert_eq!(matrix.rows.len(), 1);
        assert_eq!(matrix.rows[0].costs, expected);
    }

    #[rstest]
    #[case::empty("")]
    #[case::blank_lines("\n   \n\t\n")]
    #[case::comment_only("// tasks: a b c")]
    #[case::inline_comment_only("/* nothing */")]
    fn test_ignores_lines_without_costs(#[case] input: &str) {
        let matrix = parse_matrix(input).expect("Should parse");
        assert!(matrix.rows.is_empty());
    }

    #[test]
    fn test_tracks_source_lines() {
        let input = "// header\n1 2\n\n3 4\n";
        let matrix = parse_matrix(input).expect("Should parse");
        assert_eq!(matrix.costs(), vec![vec![1.0, 2.0], vec![3.0, 4.0]]);
        assert_eq!(matrix.line_of(0), Some(2));
        assert_eq!(matrix.line_of(1), Some(4));
        assert_eq!(matrix.line_of(2), None);
    }

    #[test]
    fn test_keeps_ragged_rows() {
        let matrix = parse_matrix("1 2 3\n4 5").expect("Should parse");
        assert_eq!(matrix.costs(), vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0]]);
    }

    #[rstest]
    #[case::word("1 two 3", 1)]
    #[case::trailing_comma("1 2,", 1)]
    #[case::unterminated_comment("1 /* note 2", 1)]
    #[case::second_line("1 2\n3 x", 2)]
    #[case::leading_comma(", 1 2", 1)]
    fn test_rejects_malformed_rows(#[case] input: &str, #[case] expected_line: usize) {
        match parse_matrix(input) {
            Err(ParseError::SyntaxError { line, .. }) => assert_eq!(line, expected_line),
            other => panic!("expected syntax error, got {other:?}"),
        }
    }
}
