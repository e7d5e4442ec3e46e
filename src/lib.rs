mod api;
mod engine;
mod pattern;

pub use api::{
    CompileError, CompileErrorKind, Error, MismatchError, ParseDetails, Pattern, TokenSpan, parse,
    parse_verbose,
};

// --- Internal token model ---------------------------------------------------

/// Digit-count rule for a numeric field, derived from the letter run length
/// in the pattern (`MM` is fixed 2, `M` is variable).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NumWidth {
    /// Consume exactly this many digits.
    Fixed(usize),
    /// Consume a maximal run of digits, up to the field's cap, at least one.
    Variable,
}

/// How a year field interprets its digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum YearForm {
    /// Exactly this many digits, taken literally as the year (`YYYY`).
    Fixed(usize),
    /// Two digits, mapped through the pivot-at-69 rule (`YY`).
    TwoDigit,
    /// 1-4 digits, taken literally (`Y`).
    Variable,
}

/// Abbreviated ("Jan", "Sun") vs full ("January", "Sunday") name form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NameForm {
    Abbreviated,
    Full,
}

/// Wire shape of a UTC offset field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum OffsetStyle {
    /// `±HHMM` (`Z`).
    Packed,
    /// `±HH:MM` (`ZZ`).
    Colon,
}

/// A semantic field extracted from the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Field {
    Year(YearForm),
    MonthNumeric(NumWidth),
    MonthName(NameForm),
    Day(NumWidth),
    Hour24(NumWidth),
    Hour12(NumWidth),
    Minute(NumWidth),
    Second(NumWidth),
    /// Fractional second; the width (1-9) is the number of digits captured,
    /// which are the most-significant digits of the nanosecond value.
    Fraction(u32),
    /// AM/PM marker, always two letters of input.
    Meridiem,
    /// Weekday name; matched for shape, then discarded.
    WeekdayName(NameForm),
    UtcOffset(OffsetStyle),
}

/// One compiled unit of a pattern: a semantic field or verbatim text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Token {
    Field(Field),
    Literal(String),
}

impl Token {
    /// Canonical pattern-letter rendering, used in span reports and traces.
    pub(crate) fn describe(&self) -> String {
        let letters = |c: char, n: usize| c.to_string().repeat(n);
        match self {
            Token::Literal(text) => format!("'{text}'"),
            Token::Field(field) => match *field {
                Field::Year(YearForm::Fixed(w)) => letters('Y', w),
                Field::Year(YearForm::TwoDigit) => letters('Y', 2),
                Field::Year(YearForm::Variable) => letters('Y', 1),
                Field::MonthNumeric(w) => letters('M', w.run_len()),
                Field::MonthName(NameForm::Abbreviated) => letters('M', 3),
                Field::MonthName(NameForm::Full) => letters('M', 4),
                Field::Day(w) => letters('d', w.run_len()),
                Field::Hour24(w) => letters('H', w.run_len()),
                Field::Hour12(w) => letters('h', w.run_len()),
                Field::Minute(w) => letters('m', w.run_len()),
                Field::Second(w) => letters('s', w.run_len()),
                Field::Fraction(width) => letters('S', width as usize),
                Field::Meridiem => "a".to_string(),
                Field::WeekdayName(NameForm::Abbreviated) => letters('E', 3),
                Field::WeekdayName(NameForm::Full) => letters('E', 4),
                Field::UtcOffset(OffsetStyle::Packed) => "Z".to_string(),
                Field::UtcOffset(OffsetStyle::Colon) => "ZZ".to_string(),
            },
        }
    }
}

impl NumWidth {
    fn run_len(self) -> usize {
        match self {
            NumWidth::Fixed(w) => w,
            NumWidth::Variable => 1,
        }
    }
}
