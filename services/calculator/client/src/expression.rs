//! Infix notation for expression trees, e.g. `6 + 3 ^ (5 % (6 / 2))`
//!
//! `^` binds tightest and is right-associative, `*` `/` `%` come next and
//! `+` `-` last, both left-associative

use derive_more::Display;
use nom::{
    branch::alt,
    character::complete::{char, digit1, space0},
    combinator::{cut, map, map_res, opt, recognize},
    error::{context, VerboseError, VerboseErrorKind},
    multi::fold_many0,
    sequence::{delimited, pair, preceded},
};

use crate::model::{Expression, OperationType};

type IResult<'a, O> = nom::IResult<&'a str, O, VerboseError<&'a str>>;

const EXPECTED_ATOM: &str = "a number or '('";
const EXPECTED_CLOSE: &str = "')'";
const EXPECTED_OPERATOR: &str = "an operator";

fn parse_number(i: &str) -> IResult<i64> {
    map_res(recognize(pair(opt(char('-')), digit1)), |digit_str: &str| {
        digit_str.parse::<i64>()
    })(i)
}

fn parse_atom(i: &str) -> IResult<Expression> {
    let enclosed_expression = delimited(
        char('('),
        parse_expression,
        cut(context(EXPECTED_CLOSE, preceded(space0, char(')')))),
    );

    preceded(
        space0,
        context(
            EXPECTED_ATOM,
            alt((map(parse_number, Expression::Number), enclosed_expression)),
        ),
    )(i)
}

fn parse_power(i: &str) -> IResult<Expression> {
    let (i, base) = parse_atom(i)?;
    let (i, exponent) = opt(preceded(pair(space0, char('^')), cut(parse_power)))(i)?;

    match exponent {
        Some(exponent) => Ok((
            i,
            Expression::operation(OperationType::Power, base, exponent),
        )),
        None => Ok((i, base)),
    }
}

fn parse_term(i: &str) -> IResult<Expression> {
    let (i, init) = parse_power(i)?;

    fold_many0(
        preceded(
            space0,
            pair(alt((char('*'), char('/'), char('%'))), cut(parse_power)),
        ),
        init,
        |l, (op, r)| {
            let kind = match op {
                '*' => OperationType::Multiply,
                '/' => OperationType::Divide,
                _ => OperationType::Modulo,
            };
            Expression::operation(kind, l, r)
        },
    )(i)
}

fn parse_expression(i: &str) -> IResult<Expression> {
    let (i, init) = parse_term(i)?;

    fold_many0(
        preceded(space0, pair(alt((char('+'), char('-'))), cut(parse_term))),
        init,
        |l, (op, r)| {
            if op == '+' {
                Expression::operation(OperationType::Add, l, r)
            } else {
                Expression::operation(OperationType::Subtract, l, r)
            }
        },
    )(i)
}

/// Where the input stopped making sense and what would have been accepted
/// there; `position` is a byte offset into the input
#[derive(Debug, Clone, PartialEq, Eq, Display)]
#[display(fmt = "expected {} at position {}", expected, position)]
pub struct ParseError {
    pub position: usize,
    pub expected: &'static str,
}

impl std::error::Error for ParseError {}

impl ParseError {
    fn at(input: &str, rest: &str, expected: &'static str) -> ParseError {
        ParseError {
            position: input.len() - rest.len(),
            expected,
        }
    }
}

pub fn parse(i: &str) -> Result<Expression, ParseError> {
    match parse_expression(i) {
        Ok((remaining, r)) => {
            let remaining = remaining.trim_start();
            if !remaining.is_empty() {
                return Err(ParseError::at(i, remaining, EXPECTED_OPERATOR));
            }
            Ok(r)
        }
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => {
            // The innermost context names the element that was being parsed
            let expected = e.errors.iter().find_map(|(rest, kind)| match kind {
                VerboseErrorKind::Context(expected) => Some((*rest, *expected)),
                _ => None,
            });
            match expected {
                Some((rest, expected)) => Err(ParseError::at(i, rest, expected)),
                None => Err(ParseError::at(i, i, EXPECTED_ATOM)),
            }
        }
        Err(nom::Err::Incomplete(_)) => Err(ParseError::at(i, "", EXPECTED_ATOM)),
    }
}
