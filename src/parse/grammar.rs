use winnow::combinator::{alt, cut_err, delimited, opt, preceded, repeat};
use winnow::error::{ModalResult, StrContext, StrContextValue};
use winnow::prelude::*;
use winnow::token::take_while;

use crate::{CompareOp, Expr, Value};

// -- Whitespace & words -----------------------------------------------------

fn ws(input: &mut &str) -> ModalResult<()> {
    take_while(0.., |c: char| c.is_whitespace())
        .void()
        .parse_next(input)
}

/// A run of characters up to the next whitespace or parenthesis.
fn word<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    take_while(1.., |c: char| !c.is_whitespace() && c != '(' && c != ')').parse_next(input)
}

fn keyword(input: &mut &str, kw: &str) -> ModalResult<()> {
    ws.parse_next(input)?;
    word.verify(|w: &str| w == kw).void().parse_next(input)
}

fn ident<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    (
        take_while(1.., |c: char| c.is_ascii_alphabetic() || c == '_'),
        take_while(0.., |c: char| {
            c.is_ascii_alphanumeric() || c == '_' || c == '.'
        }),
    )
        .take()
        .verify(|name: &str| !matches!(name, "and" | "or" | "not" | "True" | "False"))
        .parse_next(input)
}

// -- Values -----------------------------------------------------------------

/// Right-hand side of a comparison. Quote stripping can leave it empty,
/// which reads as the empty string.
fn value(input: &mut &str) -> ModalResult<Value> {
    ws.parse_next(input)?;
    let literal = opt(word.verify(|w: &str| !matches!(w, "and" | "or"))).parse_next(input)?;
    Ok(literal.map_or_else(|| Value::String(String::new()), Value::from_literal))
}

fn compare_op(input: &mut &str) -> ModalResult<CompareOp> {
    ws.parse_next(input)?;
    alt(("==".value(CompareOp::Eq), "!=".value(CompareOp::Neq))).parse_next(input)
}

// -- Expressions (precedence: or < and < not < primary) ---------------------

fn comparison(input: &mut &str) -> ModalResult<Expr> {
    let name = ident.parse_next(input)?;
    let op = cut_err(compare_op)
        .context(StrContext::Expected(StrContextValue::Description(
            "== or !=",
        )))
        .parse_next(input)?;
    let value = value.parse_next(input)?;
    Ok(Expr::Compare {
        parameter: name.to_owned(),
        op,
        value,
    })
}

fn literal(input: &mut &str) -> ModalResult<Expr> {
    alt((
        "True".value(Expr::Literal(true)),
        "False".value(Expr::Literal(false)),
    ))
    .parse_next(input)
}

fn primary(input: &mut &str) -> ModalResult<Expr> {
    ws.parse_next(input)?;
    alt((
        delimited('(', expr, (ws, cut_err(')'))),
        comparison,
        literal,
    ))
    .context(StrContext::Expected(StrContextValue::Description(
        "expression",
    )))
    .parse_next(input)
}

fn unary(input: &mut &str) -> ModalResult<Expr> {
    if opt(|i: &mut &str| keyword(i, "not"))
        .parse_next(input)?
        .is_some()
    {
        let inner = cut_err(unary).parse_next(input)?;
        Ok(Expr::Not(Box::new(inner)))
    } else {
        primary(input)
    }
}

fn and_expr(input: &mut &str) -> ModalResult<Expr> {
    let first = unary(input)?;
    let rest: Vec<Expr> = repeat(
        0..,
        preceded(|i: &mut &str| keyword(i, "and"), cut_err(unary)),
    )
    .parse_next(input)?;
    Ok(rest
        .into_iter()
        .fold(first, |acc, r| Expr::And(Box::new(acc), Box::new(r))))
}

fn or_expr(input: &mut &str) -> ModalResult<Expr> {
    let first = and_expr(input)?;
    let rest: Vec<Expr> = repeat(
        0..,
        preceded(|i: &mut &str| keyword(i, "or"), cut_err(and_expr)),
    )
    .parse_next(input)?;
    Ok(rest
        .into_iter()
        .fold(first, |acc, r| Expr::Or(Box::new(acc), Box::new(r))))
}

fn expr(input: &mut &str) -> ModalResult<Expr> {
    ws.parse_next(input)?;
    or_expr(input)
}

/// A complete normalized rule, surrounding whitespace allowed.
pub(crate) fn rule_expr(input: &mut &str) -> ModalResult<Expr> {
    let parsed = expr(input)?;
    ws.parse_next(input)?;
    Ok(parsed)
}
