use crate::engine;
use crate::pattern;
use chrono::{DateTime, FixedOffset};
use std::fmt;
use std::time::{Duration, Instant};

/// A compiled pattern.
///
/// Compiling is cheap but not free; callers that decode many inputs against
/// the same pattern should compile once and reuse the `Pattern`. A `Pattern`
/// is immutable after compilation and can be shared read-only across threads.
#[derive(Debug, Clone)]
pub struct Pattern {
    pub(crate) tokens: Vec<crate::Token>,
}

impl Pattern {
    /// Compile `pattern` into an ordered token list.
    ///
    /// # Example
    /// ```
    /// use timepat::Pattern;
    ///
    /// let pattern = Pattern::compile("YYYY-MM-dd").unwrap();
    /// let value = pattern.parse("2017-02-18").unwrap();
    /// assert_eq!(value.to_rfc3339(), "2017-02-18T00:00:00+00:00");
    /// ```
    pub fn compile(pattern: &str) -> Result<Self, CompileError> {
        pattern::compile(pattern).map(|tokens| Pattern { tokens })
    }

    /// Decode `input` against this pattern into an absolute instant with a
    /// fixed UTC offset.
    ///
    /// The offset is the one decoded from a `Z`/`ZZ` field, or UTC when the
    /// pattern has no offset field.
    pub fn parse(&self, input: &str) -> Result<DateTime<FixedOffset>, MismatchError> {
        let (raw, _) = engine::run_match(&self.tokens, input)?;
        engine::resolve(&raw, input.len())
    }

    /// Decode `input` and additionally report which byte span of the input
    /// each token consumed, plus elapsed time.
    ///
    /// The spans partition the input: contiguous, non-overlapping, covering
    /// every byte.
    pub fn parse_verbose(&self, input: &str) -> Result<ParseDetails, MismatchError> {
        let started = Instant::now();
        let (raw, spans) = engine::run_match(&self.tokens, input)?;
        let value = engine::resolve(&raw, input.len())?;

        let spans = spans
            .iter()
            .zip(&self.tokens)
            .map(|(span, token)| TokenSpan {
                start: span.start,
                end: span.end,
                token: token.describe(),
                text: input.get(span.start..span.end).unwrap_or("").to_string(),
            })
            .collect();

        Ok(ParseDetails { value, spans, elapsed: started.elapsed() })
    }
}

/// One token's slice of the input, as reported by [`Pattern::parse_verbose`].
///
/// `start`/`end` are byte offsets into the original input.
#[derive(Debug, Clone)]
pub struct TokenSpan {
    /// Start byte index of the consumed span.
    pub start: usize,
    /// End byte index of the consumed span (exclusive).
    pub end: usize,
    /// Pattern-letter rendering of the token, e.g. `"HH"` or `"'T'"`.
    pub token: String,
    /// Slice of the input this token consumed.
    pub text: String,
}

/// Result from [`parse_verbose`] and [`Pattern::parse_verbose`].
#[derive(Debug, Clone)]
pub struct ParseDetails {
    /// The decoded instant.
    pub value: DateTime<FixedOffset>,
    /// Per-token consumed spans, in pattern order.
    pub spans: Vec<TokenSpan>,
    /// Elapsed time spent matching + resolving.
    pub elapsed: Duration,
}

/// Decode `input` against `pattern` in one call.
///
/// Equivalent to [`Pattern::compile`] followed by [`Pattern::parse`]; use the
/// two-step form to amortize compilation over many inputs.
///
/// # Example
/// ```
/// use timepat::parse;
///
/// let value = parse("dd/MMMM/yyyy:HH:mm:ss Z", "30/August/2015:21:44:25 -0500").unwrap();
/// assert_eq!(value.to_rfc3339(), "2015-08-30T21:44:25-05:00");
/// ```
pub fn parse(pattern: &str, input: &str) -> Result<DateTime<FixedOffset>, Error> {
    let compiled = Pattern::compile(pattern)?;
    Ok(compiled.parse(input)?)
}

/// One-call form of [`Pattern::parse_verbose`].
pub fn parse_verbose(pattern: &str, input: &str) -> Result<ParseDetails, Error> {
    let compiled = Pattern::compile(pattern)?;
    Ok(compiled.parse_verbose(input)?)
}

// --- Errors ------------------------------------------------------------------

/// Why a pattern failed to compile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompileErrorKind {
    /// A `'`-quoted section has no closing quote.
    UnterminatedQuote,
    /// The pattern string is empty.
    EmptyPattern,
    /// An `S` run longer than 9 letters; fractions carry at most nanosecond
    /// precision.
    FractionTooWide,
}

/// The pattern itself is invalid. Raised at compile time, never during
/// matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileError {
    pub kind: CompileErrorKind,
    /// Byte offset into the pattern where the offending construct starts.
    pub position: usize,
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            CompileErrorKind::UnterminatedQuote => {
                write!(f, "unterminated quote at byte {} of pattern", self.position)
            }
            CompileErrorKind::EmptyPattern => write!(f, "empty pattern"),
            CompileErrorKind::FractionTooWide => {
                write!(f, "fractional-second field at byte {} is wider than 9 digits", self.position)
            }
        }
    }
}

impl std::error::Error for CompileError {}

/// The input does not conform to the compiled pattern.
///
/// All-or-nothing: no partial result accompanies a mismatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MismatchError {
    /// Byte offset into the input where matching failed.
    pub position: usize,
    /// What the pattern required at that position.
    pub expected: String,
    /// What the input held instead (possibly `"end of input"`).
    pub found: String,
}

impl fmt::Display for MismatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "expected {} at byte {}, found {}", self.expected, self.position, self.found)
    }
}

impl std::error::Error for MismatchError {}

/// Either error from the one-call [`parse`] form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    Compile(CompileError),
    Mismatch(MismatchError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Compile(err) => err.fmt(f),
            Error::Mismatch(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Compile(err) => Some(err),
            Error::Mismatch(err) => Some(err),
        }
    }
}

impl From<CompileError> for Error {
    fn from(err: CompileError) -> Self {
        Error::Compile(err)
    }
}

impl From<MismatchError> for Error {
    fn from(err: MismatchError) -> Self {
        Error::Mismatch(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Timelike};

    fn at(
        offset_secs: i32,
        y: i32,
        mo: u32,
        d: u32,
        h: u32,
        mi: u32,
        s: u32,
        nanos: u32,
    ) -> DateTime<FixedOffset> {
        FixedOffset::east_opt(offset_secs)
            .unwrap()
            .with_ymd_and_hms(y, mo, d, h, mi, s)
            .unwrap()
            .with_nanosecond(nanos)
            .unwrap()
    }

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32, nanos: u32) -> DateTime<FixedOffset> {
        at(0, y, mo, d, h, mi, s, nanos)
    }

    #[test]
    fn corpus_examples_matching() {
        // Array of (pattern, input, expected)
        let cases: Vec<(&str, &str, DateTime<FixedOffset>)> = vec![
            (
                "dd/MM/YYYY HH:mm:ss.SSSSSSSSS P",
                "03/02/2007 23:10:05.000000004 P",
                utc(2007, 2, 3, 23, 10, 5, 4),
            ),
            (
                "dd/MMMM/yyyy:HH:mm:ss Z",
                "30/August/2015:21:44:25 -0500",
                at(-5 * 3600, 2015, 8, 30, 21, 44, 25, 0),
            ),
            (
                "dd/MMMM/yyyy:hh:m:s a Z P",
                "30/August/2015:03:4:5 PM -0500 P",
                at(-5 * 3600, 2015, 8, 30, 15, 4, 5, 0),
            ),
            (
                "dd/MMMM/yyyy:hh:m:s a Z",
                "30/August/2015:03:4:25 PM -0500",
                at(-5 * 3600, 2015, 8, 30, 15, 4, 25, 0),
            ),
            ("YYYY-MM-dd HH:mm:ss.SSS", "2012-12-22 12:53:30.000", utc(2012, 12, 22, 12, 53, 30, 0)),
            ("E d-MMMM-YY HH:mm:ss.SSS", "Mon 1-may-17 12:53:30.000", utc(2017, 5, 1, 12, 53, 30, 0)),
            ("[EEE MMM dd HH:mm:ss y]", "[Sun Jan 11 10:43:35 2015]", utc(2015, 1, 11, 10, 43, 35, 0)),
            ("[EEEE MMM dd HH:mm:ss y]", "[Sunday Jan 11 10:43:35 2015]", utc(2015, 1, 11, 10, 43, 35, 0)),
            ("[EEEE M dd h:mm:ss y]", "[Sunday 1 11 9:43:35 2015]", utc(2015, 1, 11, 9, 43, 35, 0)),
            (
                "dd/MMMM/yyyy:hh:m:s a ZZ",
                "30/August/2015:03:4:25 PM -05:00",
                at(-5 * 3600, 2015, 8, 30, 15, 4, 25, 0),
            ),
            ("YYYY-MM-dd''HH:mm:ss", "2017-02-18'16:33:21", utc(2017, 2, 18, 16, 33, 21, 0)),
            ("YYYY-MM-dd'T'HH:mm:ss", "2017-02-18T16:33:21", utc(2017, 2, 18, 16, 33, 21, 0)),
            ("YYYY-MM-dd'T'HH:mm:ss'Z'", "2017-02-18T16:33:21Z", utc(2017, 2, 18, 16, 33, 21, 0)),
            (
                "YYYY-MM-dd HH:mm:ss.SSS",
                "2012-12-22 12:53:30.123",
                utc(2012, 12, 22, 12, 53, 30, 123_000_000),
            ),
            (
                "YYYY-MM-dd HH:mm:ss.SS",
                "2012-12-22 12:53:30.12",
                utc(2012, 12, 22, 12, 53, 30, 120_000_000),
            ),
            ("YYYY-MM-dd HH:mm:ss.S", "2012-12-22 12:53:30.1", utc(2012, 12, 22, 12, 53, 30, 100_000_000)),
        ];

        for (pattern, input, expected) in cases {
            let got = parse(pattern, input)
                .unwrap_or_else(|err| panic!("{pattern:?} on {input:?} failed: {err}"));
            assert_eq!(got, expected, "pattern {pattern:?} input {input:?}");
        }
    }

    #[test]
    fn one_shot_and_two_step_agree() {
        let pattern = "dd/MMMM/yyyy:HH:mm:ss Z";
        let input = "30/August/2015:21:44:25 -0500";

        let one_shot = parse(pattern, input).unwrap();
        let compiled = Pattern::compile(pattern).unwrap();
        assert_eq!(compiled.parse(input).unwrap(), one_shot);
        // Deterministic: same pair parsed twice is identical.
        assert_eq!(compiled.parse(input).unwrap(), compiled.parse(input).unwrap());
    }

    #[test]
    fn compiled_pattern_reuse() {
        let compiled = Pattern::compile("YYYY-MM-dd").unwrap();
        assert_eq!(compiled.parse("2017-02-18").unwrap(), utc(2017, 2, 18, 0, 0, 0, 0));
        assert_eq!(compiled.parse("1999-12-31").unwrap(), utc(1999, 12, 31, 0, 0, 0, 0));
    }

    #[test]
    fn mismatch_reports_position_and_expectation() {
        let err = match parse("YYYY-MM-dd", "2017/02/18") {
            Err(Error::Mismatch(err)) => err,
            other => panic!("expected a mismatch, got {other:?}"),
        };
        assert_eq!(err.position, 4);
        assert!(err.expected.contains('-'), "expected description {:?}", err.expected);
    }

    #[test]
    fn leftover_input_is_a_mismatch() {
        let err = match parse("YYYY-MM-dd", "2017-02-18 oops") {
            Err(Error::Mismatch(err)) => err,
            other => panic!("expected a mismatch, got {other:?}"),
        };
        assert_eq!(err.position, 10);
        assert_eq!(err.expected, "end of input");
    }

    #[test]
    fn verbose_spans_partition_the_input() {
        let input = "[Sun Jan 11 10:43:35 2015]";
        let details = parse_verbose("[EEE MMM dd HH:mm:ss y]", input).unwrap();

        assert_eq!(details.value, utc(2015, 1, 11, 10, 43, 35, 0));

        // Contiguous, non-overlapping, covering the whole input.
        let mut cursor = 0;
        for span in &details.spans {
            assert_eq!(span.start, cursor, "span {span:?} not contiguous");
            assert!(span.end >= span.start);
            assert_eq!(&input[span.start..span.end], span.text);
            cursor = span.end;
        }
        assert_eq!(cursor, input.len());

        let weekday = &details.spans[1];
        assert_eq!(weekday.token, "EEE");
        assert_eq!(weekday.text, "Sun");
    }

    #[test]
    fn compile_error_surfaces_through_parse() {
        let err = parse("YYYY-MM-dd'T", "whatever").unwrap_err();
        match err {
            Error::Compile(err) => assert_eq!(err.kind, CompileErrorKind::UnterminatedQuote),
            other => panic!("expected a compile error, got {other:?}"),
        }
    }

    #[test]
    fn errors_format_readably() {
        let compile = CompileError { kind: CompileErrorKind::UnterminatedQuote, position: 10 };
        assert_eq!(compile.to_string(), "unterminated quote at byte 10 of pattern");

        let mismatch =
            MismatchError { position: 4, expected: "literal \"-\"".into(), found: "\"/02/18\"".into() };
        assert_eq!(mismatch.to_string(), "expected literal \"-\" at byte 4, found \"/02/18\"");
    }
}
