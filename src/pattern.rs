//! Pattern compiler.
//!
//! Walks the pattern string left to right and turns it into an ordered token
//! list:
//!
//! ```text
//! "dd/MMMM/yyyy:HH:mm" ──▶ [dd] ['/'] [MMMM] ['/'] [yyyy] [':'] [HH] [':'] [mm]
//! ```
//!
//! Three scanning rules, applied at each position:
//!
//! - `'` starts a quoted section (emitted verbatim; `''` is an escaped quote).
//! - A letter in the recognized set {Y y M d D H h m s S a Z E} consumes the
//!   maximal run of that same letter; the run length selects the field's
//!   width/form.
//! - Anything else is a single literal character.
//!
//! Adjacent literal characters are coalesced into one `Literal` token. That is
//! purely an efficiency measure; matching cannot observe it.
//!
//! Set `TIMEPAT_DEBUG=1` to print the compiled token list.

use crate::api::{CompileError, CompileErrorKind};
use crate::{Field, NameForm, NumWidth, OffsetStyle, Token, YearForm};

/// Compile `pattern` into tokens, or report why it is invalid.
pub(crate) fn compile(pattern: &str) -> Result<Vec<Token>, CompileError> {
    if pattern.is_empty() {
        return Err(CompileError { kind: CompileErrorKind::EmptyPattern, position: 0 });
    }

    let mut tokens: Vec<Token> = Vec::new();
    let mut chars = pattern.char_indices().peekable();

    while let Some((at, ch)) = chars.next() {
        match ch {
            '\'' => {
                // `''` outside a quoted section is a literal quote.
                if matches!(chars.peek(), Some(&(_, '\''))) {
                    chars.next();
                    push_literal(&mut tokens, '\'');
                    continue;
                }
                let mut closed = false;
                let mut text = String::new();
                while let Some((_, qc)) = chars.next() {
                    if qc == '\'' {
                        // `''` inside the section is an escaped quote.
                        if matches!(chars.peek(), Some(&(_, '\''))) {
                            chars.next();
                            text.push('\'');
                            continue;
                        }
                        closed = true;
                        break;
                    }
                    text.push(qc);
                }
                if !closed {
                    return Err(CompileError { kind: CompileErrorKind::UnterminatedQuote, position: at });
                }
                push_literal_text(&mut tokens, &text);
            }
            'Y' | 'y' | 'M' | 'd' | 'D' | 'H' | 'h' | 'm' | 's' | 'S' | 'a' | 'Z' | 'E' => {
                let mut run = 1;
                while matches!(chars.peek(), Some(&(_, next)) if next == ch) {
                    chars.next();
                    run += 1;
                }
                tokens.push(Token::Field(field_for(ch, run, at)?));
            }
            other => push_literal(&mut tokens, other),
        }
    }

    if std::env::var_os("TIMEPAT_DEBUG").is_some() {
        let rendered: Vec<String> = tokens.iter().map(Token::describe).collect();
        eprintln!("[compile] pattern={pattern:?} tokens=[{}]", rendered.join(" "));
    }

    Ok(tokens)
}

fn push_literal(tokens: &mut Vec<Token>, ch: char) {
    if let Some(Token::Literal(text)) = tokens.last_mut() {
        text.push(ch);
    } else {
        tokens.push(Token::Literal(ch.to_string()));
    }
}

fn push_literal_text(tokens: &mut Vec<Token>, chunk: &str) {
    if let Some(Token::Literal(text)) = tokens.last_mut() {
        text.push_str(chunk);
    } else {
        tokens.push(Token::Literal(chunk.to_string()));
    }
}

/// Map a recognized letter and its run length to a field.
fn field_for(letter: char, run: usize, at: usize) -> Result<Field, CompileError> {
    let width = if run == 1 { NumWidth::Variable } else { NumWidth::Fixed(run) };

    Ok(match letter {
        'Y' | 'y' => match run {
            1 => Field::Year(YearForm::Variable),
            2 => Field::Year(YearForm::TwoDigit),
            n => Field::Year(YearForm::Fixed(n)),
        },
        'M' => match run {
            1 | 2 => Field::MonthNumeric(width),
            3 => Field::MonthName(NameForm::Abbreviated),
            _ => Field::MonthName(NameForm::Full),
        },
        'd' | 'D' => Field::Day(width),
        'H' => Field::Hour24(width),
        'h' => Field::Hour12(width),
        'm' => Field::Minute(width),
        's' => Field::Second(width),
        'S' => {
            if run > 9 {
                return Err(CompileError { kind: CompileErrorKind::FractionTooWide, position: at });
            }
            Field::Fraction(run as u32)
        }
        // Run length does not matter: the marker is always two letters of input.
        'a' => Field::Meridiem,
        'E' => {
            if run < 4 {
                Field::WeekdayName(NameForm::Abbreviated)
            } else {
                Field::WeekdayName(NameForm::Full)
            }
        }
        'Z' => {
            if run == 1 {
                Field::UtcOffset(OffsetStyle::Packed)
            } else {
                Field::UtcOffset(OffsetStyle::Colon)
            }
        }
        _ => unreachable!("scanner only dispatches recognized letters"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(token: &Token) -> Field {
        match token {
            Token::Field(field) => *field,
            Token::Literal(text) => panic!("expected a field, got literal {text:?}"),
        }
    }

    fn literal(token: &Token) -> &str {
        match token {
            Token::Literal(text) => text,
            Token::Field(field) => panic!("expected a literal, got field {field:?}"),
        }
    }

    #[test]
    fn letter_runs_select_width() {
        let tokens = compile("YYYY-MM-dd HH:mm:ss.SSS").unwrap();
        assert_eq!(field(&tokens[0]), Field::Year(YearForm::Fixed(4)));
        assert_eq!(literal(&tokens[1]), "-");
        assert_eq!(field(&tokens[2]), Field::MonthNumeric(NumWidth::Fixed(2)));
        assert_eq!(field(&tokens[4]), Field::Day(NumWidth::Fixed(2)));
        assert_eq!(literal(&tokens[5]), " ");
        assert_eq!(field(&tokens[6]), Field::Hour24(NumWidth::Fixed(2)));
        assert_eq!(field(&tokens[8]), Field::Minute(NumWidth::Fixed(2)));
        assert_eq!(field(&tokens[10]), Field::Second(NumWidth::Fixed(2)));
        assert_eq!(literal(&tokens[11]), ".");
        assert_eq!(field(&tokens[12]), Field::Fraction(3));
        assert_eq!(tokens.len(), 13);
    }

    #[test]
    fn single_letters_are_variable_width() {
        let tokens = compile("y-M-d h:m:s").unwrap();
        assert_eq!(field(&tokens[0]), Field::Year(YearForm::Variable));
        assert_eq!(field(&tokens[2]), Field::MonthNumeric(NumWidth::Variable));
        assert_eq!(field(&tokens[4]), Field::Day(NumWidth::Variable));
        assert_eq!(field(&tokens[6]), Field::Hour12(NumWidth::Variable));
        assert_eq!(field(&tokens[8]), Field::Minute(NumWidth::Variable));
        assert_eq!(field(&tokens[10]), Field::Second(NumWidth::Variable));
    }

    #[test]
    fn month_run_length_switches_between_number_and_name() {
        assert_eq!(field(&compile("M").unwrap()[0]), Field::MonthNumeric(NumWidth::Variable));
        assert_eq!(field(&compile("MM").unwrap()[0]), Field::MonthNumeric(NumWidth::Fixed(2)));
        assert_eq!(field(&compile("MMM").unwrap()[0]), Field::MonthName(NameForm::Abbreviated));
        assert_eq!(field(&compile("MMMM").unwrap()[0]), Field::MonthName(NameForm::Full));
        assert_eq!(field(&compile("MMMMM").unwrap()[0]), Field::MonthName(NameForm::Full));
    }

    #[test]
    fn weekday_and_offset_forms() {
        assert_eq!(field(&compile("E").unwrap()[0]), Field::WeekdayName(NameForm::Abbreviated));
        assert_eq!(field(&compile("EEE").unwrap()[0]), Field::WeekdayName(NameForm::Abbreviated));
        assert_eq!(field(&compile("EEEE").unwrap()[0]), Field::WeekdayName(NameForm::Full));
        assert_eq!(field(&compile("Z").unwrap()[0]), Field::UtcOffset(OffsetStyle::Packed));
        assert_eq!(field(&compile("ZZ").unwrap()[0]), Field::UtcOffset(OffsetStyle::Colon));
    }

    #[test]
    fn two_digit_year_is_its_own_form() {
        assert_eq!(field(&compile("YY").unwrap()[0]), Field::Year(YearForm::TwoDigit));
        assert_eq!(field(&compile("yy").unwrap()[0]), Field::Year(YearForm::TwoDigit));
        assert_eq!(field(&compile("yyyy").unwrap()[0]), Field::Year(YearForm::Fixed(4)));
    }

    #[test]
    fn unrecognized_characters_become_coalesced_literals() {
        let tokens = compile("[# ]").unwrap();
        assert_eq!(tokens, vec![Token::Literal("[# ]".to_string())]);
    }

    #[test]
    fn quoting_strips_quotes_and_escapes() {
        let tokens = compile("'T'").unwrap();
        assert_eq!(tokens, vec![Token::Literal("T".to_string())]);

        // Doubled quote outside a section is a single literal quote.
        let tokens = compile("dd''HH").unwrap();
        assert_eq!(literal(&tokens[1]), "'");

        // Quoted letters are not fields.
        let tokens = compile("'Z'").unwrap();
        assert_eq!(tokens, vec![Token::Literal("Z".to_string())]);

        // Doubled quote inside a section is an escaped quote; the section
        // stays open.
        let tokens = compile("'o''clock'").unwrap();
        assert_eq!(tokens, vec![Token::Literal("o'clock".to_string())]);
    }

    #[test]
    fn quoted_text_coalesces_with_neighbors() {
        let tokens = compile("-'at '-").unwrap();
        assert_eq!(tokens, vec![Token::Literal("-at -".to_string())]);
    }

    #[test]
    fn unterminated_quote_is_rejected() {
        let err = compile("YYYY-MM-dd'T").unwrap_err();
        assert_eq!(err.kind, CompileErrorKind::UnterminatedQuote);
        assert_eq!(err.position, 10);
    }

    #[test]
    fn empty_pattern_is_rejected() {
        assert_eq!(compile("").unwrap_err().kind, CompileErrorKind::EmptyPattern);
    }

    #[test]
    fn fraction_wider_than_nanoseconds_is_rejected() {
        assert_eq!(field(&compile("SSSSSSSSS").unwrap()[0]), Field::Fraction(9));
        let err = compile("SSSSSSSSSS").unwrap_err();
        assert_eq!(err.kind, CompileErrorKind::FractionTooWide);
        assert_eq!(err.position, 0);
    }
}
