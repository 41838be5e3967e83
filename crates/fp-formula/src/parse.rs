//! Parser for user-entered formula strings.
//!
//! Accepts the same language the engines do: a comma-joined envelope list
//! (`<LC10:FR0>,<LC-1:FR0>`) or an arithmetic combination
//! (`1.5*<LC10:FR1>+<LC17500:FR1>`, `-` joins allowed). Signed load case
//! numbers are accepted since engines assign synthesized cases negative IDs.

use fp_core::{FrameIx, LcId};

use crate::term::{Formula, Join, Term};
use crate::{FormulaError, FormulaResult};

/// Parse a formula string into its typed form.
pub fn parse_formula(input: &str) -> FormulaResult<Formula> {
    let s = input.trim();
    if s.is_empty() {
        return Err(FormulaError::Empty);
    }
    if s.contains(',') {
        parse_list(s)
    } else {
        parse_sum(s)
    }
}

fn parse_err(at: usize, message: impl Into<String>) -> FormulaError {
    FormulaError::Parse {
        at,
        message: message.into(),
    }
}

fn parse_list(s: &str) -> FormulaResult<Formula> {
    let mut terms = Vec::new();
    let mut offset = 0usize;
    for piece in s.split(',') {
        let trimmed = piece.trim();
        if trimmed.is_empty() {
            return Err(parse_err(offset, "empty envelope list entry"));
        }
        let mut cursor = Cursor::new(trimmed, offset);
        let (case, frame) = cursor.parse_ref()?;
        cursor.skip_ws();
        if !cursor.at_end() {
            return Err(parse_err(
                cursor.pos(),
                "trailing input after load case reference",
            ));
        }
        terms.push(Term::unit(case, frame));
        offset += piece.len() + 1;
    }
    Formula::from_parts(Join::List, terms)
}

fn parse_sum(s: &str) -> FormulaResult<Formula> {
    let mut cursor = Cursor::new(s, 0);
    let mut terms = Vec::new();
    let mut first = true;
    loop {
        cursor.skip_ws();
        if cursor.at_end() {
            break;
        }
        let mut sign = 1.0;
        if first {
            // Leading sign is allowed on the first term.
            if cursor.eat(b'-') {
                sign = -1.0;
            } else {
                let _ = cursor.eat(b'+');
            }
            first = false;
        } else if cursor.eat(b'-') {
            sign = -1.0;
        } else if !cursor.eat(b'+') {
            return Err(parse_err(cursor.pos(), "expected '+' or '-' between terms"));
        }
        cursor.skip_ws();
        let coeff = if cursor.peek() == Some(b'<') {
            1.0
        } else {
            cursor.parse_coefficient()?
        };
        let (case, frame) = cursor.parse_ref()?;
        terms.push(Term::new(case, frame, sign * coeff));
    }
    Formula::from_parts(Join::Sum, terms)
}

/// Byte-oriented scanner over one formula string.
struct Cursor<'a> {
    bytes: &'a [u8],
    text: &'a str,
    i: usize,
    base: usize,
}

impl<'a> Cursor<'a> {
    fn new(text: &'a str, base: usize) -> Self {
        Self {
            bytes: text.as_bytes(),
            text,
            i: 0,
            base,
        }
    }

    fn pos(&self) -> usize {
        self.base + self.i
    }

    fn at_end(&self) -> bool {
        self.i >= self.bytes.len()
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.i).copied()
    }

    fn eat(&mut self, b: u8) -> bool {
        if self.peek() == Some(b) {
            self.i += 1;
            true
        } else {
            false
        }
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(b' ') | Some(b'\t')) {
            self.i += 1;
        }
    }

    fn expect_str(&mut self, expected: &str) -> FormulaResult<()> {
        if self.text[self.i..].starts_with(expected) {
            self.i += expected.len();
            Ok(())
        } else {
            Err(parse_err(self.pos(), format!("expected `{expected}`")))
        }
    }

    /// Coefficient up to the `*` separator, e.g. `1.5*`.
    fn parse_coefficient(&mut self) -> FormulaResult<f64> {
        let start = self.i;
        let star = self.text[self.i..]
            .find('*')
            .ok_or_else(|| parse_err(self.pos(), "expected coefficient followed by '*'"))?;
        let raw = self.text[start..start + star].trim();
        let coeff: f64 = raw
            .parse()
            .map_err(|_| parse_err(self.base + start, format!("invalid coefficient `{raw}`")))?;
        self.i = start + star + 1;
        self.skip_ws();
        Ok(coeff)
    }

    /// One `<LC{id}:FR{frame}>` reference.
    fn parse_ref(&mut self) -> FormulaResult<(LcId, FrameIx)> {
        self.skip_ws();
        self.expect_str("<LC")?;
        let case = self.parse_i64()?;
        self.expect_str(":FR")?;
        let frame = self.parse_u32()?;
        self.expect_str(">")?;
        Ok((LcId(case), FrameIx(frame)))
    }

    fn parse_i64(&mut self) -> FormulaResult<i64> {
        let start = self.i;
        if self.peek() == Some(b'-') {
            self.i += 1;
        }
        while matches!(self.peek(), Some(b'0'..=b'9')) {
            self.i += 1;
        }
        self.text[start..self.i]
            .parse()
            .map_err(|_| parse_err(self.base + start, "expected load case number"))
    }

    fn parse_u32(&mut self) -> FormulaResult<u32> {
        let start = self.i;
        while matches!(self.peek(), Some(b'0'..=b'9')) {
            self.i += 1;
        }
        self.text[start..self.i]
            .parse()
            .map_err(|_| parse_err(self.base + start, "expected frame number"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_combination() {
        let f = parse_formula("1.5*<LC10:FR1>+<LC17500:FR1>").unwrap();
        assert_eq!(f.join(), Join::Sum);
        assert_eq!(f.terms().len(), 2);
        assert_eq!(f.terms()[0].coeff, 1.5);
        assert_eq!(f.terms()[0].case, LcId(10));
        assert_eq!(f.terms()[1].coeff, 1.0);
        assert_eq!(f.render(), "1.5*<LC10:FR1>+<LC17500:FR1>");
    }

    #[test]
    fn parses_subtraction_and_signed_ids() {
        let f = parse_formula("<LC100:FR2> - 0.5*<LC-3:FR0>").unwrap();
        assert_eq!(f.terms()[1].coeff, -0.5);
        assert_eq!(f.terms()[1].case, LcId(-3));
        assert_eq!(f.terms()[1].frame, FrameIx(0));
    }

    #[test]
    fn parses_envelope_list() {
        let f = parse_formula("<LC10:FR0>, <LC-1:FR0> ,<LC20:FR0>").unwrap();
        assert_eq!(f.join(), Join::List);
        assert_eq!(f.terms().len(), 3);
        assert_eq!(f.render(), "<LC10:FR0>,<LC-1:FR0>,<LC20:FR0>");
    }

    #[test]
    fn rejects_coefficient_in_list() {
        let got = parse_formula("1.5*<LC10:FR0>,<LC20:FR0>");
        assert!(got.is_err());
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_formula("").is_err());
        assert!(parse_formula("   ").is_err());
        assert!(parse_formula("<LC10FR0>").is_err());
        assert!(parse_formula("<LC10:FR0> extra").is_err());
        assert!(parse_formula("x*<LC10:FR0>").is_err());
        assert!(parse_formula("<LC10:FR0>+").is_err());
    }
}
