//! The single-pass match loop.
//!
//! One cursor walks the input while tokens are processed strictly in order.
//! Each field token writes into [`RawFields`] and marks its bit in
//! [`FieldSet`]; resolution later reads the flags to pick defaults and the
//! hour interpretation. There is no backtracking: the first local mismatch
//! fails the whole parse.

use super::names;
use crate::api::MismatchError;
use crate::{Field, NumWidth, OffsetStyle, Token, YearForm};
use bitflags::bitflags;

bitflags! {
    /// Which fields a parse call has captured so far.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub(crate) struct FieldSet: u16 {
        const YEAR = 1 << 0;
        /// The year came from a `YY` field and still needs the pivot rule.
        const TWO_DIGIT_YEAR = 1 << 1;
        const MONTH = 1 << 2;
        const DAY = 1 << 3;
        const HOUR24 = 1 << 4;
        const HOUR12 = 1 << 5;
        const MINUTE = 1 << 6;
        const SECOND = 1 << 7;
        const SUBSEC = 1 << 8;
        const MERIDIEM = 1 << 9;
        const OFFSET = 1 << 10;
    }
}

/// Scratch record accumulated during one parse call.
///
/// Values start at their resolution defaults (year 0, month/day 1, the rest
/// 0) so resolution only needs the flags for the few fields whose meaning
/// depends on provenance.
#[derive(Debug, Clone)]
pub(crate) struct RawFields {
    pub seen: FieldSet,
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
    pub nanos: u32,
    pub pm: bool,
    pub offset_secs: i32,
}

impl Default for RawFields {
    fn default() -> Self {
        RawFields {
            seen: FieldSet::empty(),
            year: 0,
            month: 1,
            day: 1,
            hour: 0,
            minute: 0,
            second: 0,
            nanos: 0,
            pm: false,
            offset_secs: 0,
        }
    }
}

/// Byte span of input consumed by one token.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Span {
    pub start: usize,
    pub end: usize,
}

/// Match `input` against `tokens`, returning the captured raw fields and the
/// per-token consumed spans. The spans partition the input exactly.
pub(crate) fn run_match(tokens: &[Token], input: &str) -> Result<(RawFields, Vec<Span>), MismatchError> {
    let debug = std::env::var_os("TIMEPAT_DEBUG").is_some();
    let mut cursor = Cursor { input, pos: 0 };
    let mut raw = RawFields::default();
    let mut spans = Vec::with_capacity(tokens.len());

    for token in tokens {
        let start = cursor.pos;
        match token {
            Token::Literal(text) => cursor.take_literal(text)?,
            Token::Field(field) => match_field(&mut cursor, *field, &mut raw)?,
        }
        spans.push(Span { start, end: cursor.pos });
        if debug {
            eprintln!(
                "[match] token={} span={}..{} text={:?}",
                token.describe(),
                start,
                cursor.pos,
                &input[start..cursor.pos]
            );
        }
    }

    if cursor.pos < input.len() {
        return Err(cursor.mismatch("end of input"));
    }

    Ok((raw, spans))
}

fn match_field(cursor: &mut Cursor<'_>, field: Field, raw: &mut RawFields) -> Result<(), MismatchError> {
    match field {
        Field::Year(YearForm::Fixed(width)) => {
            raw.year = cursor.take_digits_exact(width)? as i32;
            raw.seen |= FieldSet::YEAR;
        }
        Field::Year(YearForm::TwoDigit) => {
            raw.year = cursor.take_digits_exact(2)? as i32;
            raw.seen |= FieldSet::YEAR | FieldSet::TWO_DIGIT_YEAR;
        }
        Field::Year(YearForm::Variable) => {
            raw.year = cursor.take_digits_max(4)? as i32;
            raw.seen |= FieldSet::YEAR;
        }
        Field::MonthNumeric(width) => {
            raw.month = take_numeric(cursor, width)? as u32;
            raw.seen |= FieldSet::MONTH;
        }
        Field::MonthName(_) => {
            let start = cursor.pos;
            let name = cursor.take_alpha_run();
            match names::month_index(name) {
                Some(month) => {
                    raw.month = month;
                    raw.seen |= FieldSet::MONTH;
                }
                None => return Err(name_mismatch(cursor, start, "an English month name", name)),
            }
        }
        Field::Day(width) => {
            raw.day = take_numeric(cursor, width)? as u32;
            raw.seen |= FieldSet::DAY;
        }
        Field::Hour24(width) => {
            raw.hour = take_numeric(cursor, width)? as u32;
            raw.seen |= FieldSet::HOUR24;
        }
        Field::Hour12(width) => {
            raw.hour = take_numeric(cursor, width)? as u32;
            raw.seen |= FieldSet::HOUR12;
        }
        Field::Minute(width) => {
            raw.minute = take_numeric(cursor, width)? as u32;
            raw.seen |= FieldSet::MINUTE;
        }
        Field::Second(width) => {
            raw.second = take_numeric(cursor, width)? as u32;
            raw.seen |= FieldSet::SECOND;
        }
        Field::Fraction(width) => {
            // Captured digits are the most-significant digits of the
            // nanosecond value.
            let digits = cursor.take_digits_exact(width as usize)? as u32;
            raw.nanos = digits * 10u32.pow(9 - width);
            raw.seen |= FieldSet::SUBSEC;
        }
        Field::Meridiem => {
            let start = cursor.pos;
            let marker = cursor.take_letters_exact(2)?;
            if marker.eq_ignore_ascii_case("am") {
                raw.pm = false;
            } else if marker.eq_ignore_ascii_case("pm") {
                raw.pm = true;
            } else {
                return Err(name_mismatch(cursor, start, "an AM/PM marker", marker));
            }
            raw.seen |= FieldSet::MERIDIEM;
        }
        Field::WeekdayName(_) => {
            // Matched for shape only; the value carries no semantics.
            let start = cursor.pos;
            let name = cursor.take_alpha_run();
            if !names::is_weekday(name) {
                return Err(name_mismatch(cursor, start, "an English weekday name", name));
            }
        }
        Field::UtcOffset(style) => {
            let sign = cursor.take_sign()?;
            let (hours, minutes) = match style {
                OffsetStyle::Packed => {
                    let packed = cursor.take_digits_exact(4)?;
                    (packed / 100, packed % 100)
                }
                OffsetStyle::Colon => {
                    let hours = cursor.take_digits_exact(2)?;
                    cursor.take_literal(":")?;
                    (hours, cursor.take_digits_exact(2)?)
                }
            };
            raw.offset_secs = sign * (hours * 3600 + minutes * 60) as i32;
            raw.seen |= FieldSet::OFFSET;
        }
    }
    Ok(())
}

fn take_numeric(cursor: &mut Cursor<'_>, width: NumWidth) -> Result<u64, MismatchError> {
    match width {
        NumWidth::Fixed(width) => cursor.take_digits_exact(width),
        // All variable-width fields except the year cap at two digits.
        NumWidth::Variable => cursor.take_digits_max(2),
    }
}

fn name_mismatch(cursor: &Cursor<'_>, start: usize, expected: &str, consumed: &str) -> MismatchError {
    let found = if consumed.is_empty() { found_text(cursor.input, start) } else { format!("{consumed:?}") };
    MismatchError { position: start, expected: expected.to_string(), found }
}

fn found_text(input: &str, position: usize) -> String {
    let rest = &input[position..];
    if rest.is_empty() {
        "end of input".to_string()
    } else {
        let preview: String = rest.chars().take(12).collect();
        format!("{preview:?}")
    }
}

// --- Cursor ------------------------------------------------------------------

/// Single forward cursor into the input. `pos` is a byte offset and always
/// sits on a character boundary.
struct Cursor<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn mismatch(&self, expected: impl Into<String>) -> MismatchError {
        MismatchError {
            position: self.pos,
            expected: expected.into(),
            found: found_text(self.input, self.pos),
        }
    }

    /// Exactly `text`, case-sensitive.
    fn take_literal(&mut self, text: &str) -> Result<(), MismatchError> {
        if !self.rest().starts_with(text) {
            return Err(self.mismatch(format!("literal {text:?}")));
        }
        self.pos += text.len();
        Ok(())
    }

    /// Exactly `n` decimal digits; never consumes more, even if more follow.
    fn take_digits_exact(&mut self, n: usize) -> Result<u64, MismatchError> {
        let rest = self.rest().as_bytes();
        if rest.len() < n || !rest[..n].iter().all(u8::is_ascii_digit) {
            return Err(self.mismatch(format!("{n} digits")));
        }
        let value = rest[..n].iter().fold(0u64, |acc, b| acc * 10 + u64::from(b - b'0'));
        self.pos += n;
        Ok(value)
    }

    /// Maximal run of decimal digits, up to `cap`, at least one.
    fn take_digits_max(&mut self, cap: usize) -> Result<u64, MismatchError> {
        let rest = self.rest().as_bytes();
        let len = rest.iter().take(cap).take_while(|b| b.is_ascii_digit()).count();
        if len == 0 {
            return Err(self.mismatch(format!("1-{cap} digits")));
        }
        let value = rest[..len].iter().fold(0u64, |acc, b| acc * 10 + u64::from(b - b'0'));
        self.pos += len;
        Ok(value)
    }

    /// Maximal run of alphabetic characters; may be empty.
    fn take_alpha_run(&mut self) -> &'a str {
        let len: usize = self.rest().chars().take_while(|c| c.is_alphabetic()).map(char::len_utf8).sum();
        let run = &self.input[self.pos..self.pos + len];
        self.pos += len;
        run
    }

    /// Exactly `n` alphabetic characters.
    fn take_letters_exact(&mut self, n: usize) -> Result<&'a str, MismatchError> {
        let mut len = 0;
        let mut taken = 0;
        for c in self.rest().chars() {
            if taken == n {
                break;
            }
            if !c.is_alphabetic() {
                return Err(self.mismatch(format!("{n} letters")));
            }
            len += c.len_utf8();
            taken += 1;
        }
        if taken < n {
            return Err(self.mismatch(format!("{n} letters")));
        }
        let run = &self.input[self.pos..self.pos + len];
        self.pos += len;
        Ok(run)
    }

    /// An offset sign: `+` is +1, `-` is -1.
    fn take_sign(&mut self) -> Result<i32, MismatchError> {
        let sign = match self.rest().as_bytes().first() {
            Some(b'+') => 1,
            Some(b'-') => -1,
            _ => return Err(self.mismatch("an offset sign (+ or -)")),
        };
        self.pos += 1;
        Ok(sign)
    }
}
