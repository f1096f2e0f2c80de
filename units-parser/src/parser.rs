// This file is part of units, a units-of-measurement conversion library.
// Copyright (C) 2026 Mara Lindqvist
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Recursive-descent parsing of a unit expression into a [`Value`]
//!
//! ```text
//! expr  := term (('+' | '-') term)*
//! term  := power (('*' | '/' | <juxtaposition>) power)*   -- newstar
//!        | factor ('/' factor)*                           -- oldstar, factor := power ('*' power)*
//! power := unary ('^' | '**') power
//!        | unary
//! unary := '-' unary | '+' unary | '~' call | atom
//! atom  := NUMBER | NAME | NAME '(' expr ')' | '(' expr ')'
//! ```
//!
//! `-` at the `expr` level is only a binary operator when
//! [`Config::minus`](units_core::Config::minus) is set; otherwise a `-` that
//! `expr` declines to consume falls through to `unary`, where it is always a
//! negation, giving `term`'s juxtaposition loop a chance to read `3 -2` as
//! `3 * -2`.

use std::ops::Range;

use units_core::{Config, Error, ErrorKind, Value};
use units_db::Database;

use crate::context::{Context, FunctionEvaluator};
use crate::lexer::Lexer;
use crate::token::{Operator, TokenValue};

/// Parses `source` as a unit expression under `ctx`.
///
/// Identifiers are resolved eagerly: a non-primitive unit's body is parsed
/// recursively right here, so the `Value` this returns already carries only
/// primitive atoms. `units-reduce` still owns cancellation and is the only
/// place that treats that as a guarantee rather than an accident of this
/// implementation.
pub fn parse(source: &str, ctx: &mut Context) -> Result<Value, Error> {
    let mut lexer = Lexer::new(source);
    let value = parse_expr(&mut lexer, ctx)?;
    expect_end(&mut lexer)?;
    Ok(value)
}

fn expect_end(lexer: &mut Lexer) -> Result<(), Error> {
    let token = lexer.next().map_err(lex_error)?;
    match token.value {
        TokenValue::EndOfInput => Ok(()),
        _ => Err(Error::at(ErrorKind::Parse, token.location)),
    }
}

fn lex_error(e: crate::token::LexError) -> Error {
    Error::at(ErrorKind::Parse, e.location)
}

fn parse_expr(lexer: &mut Lexer, ctx: &mut Context) -> Result<Value, Error> {
    ctx.enter()?;
    let result = (|| {
        let mut value = parse_term(lexer, ctx)?;
        loop {
            let op = match lexer.peek() {
                Ok(tok) => tok.value.clone(),
                Err(_) => break,
            };
            match op {
                TokenValue::Operator(Operator::Plus) => {
                    lexer.next().ok();
                    let rhs = parse_term(lexer, ctx)?;
                    value = add_values(value, rhs, false)?;
                }
                TokenValue::Operator(Operator::Minus) if ctx.config.minus => {
                    lexer.next().ok();
                    let rhs = parse_term(lexer, ctx)?;
                    value = add_values(value, rhs, true)?;
                }
                _ => break,
            }
        }
        Ok(value)
    })();
    ctx.exit();
    result
}

/// `+` and `-` require conformable operands (same atoms once cancelled); the
/// result keeps the left operand's atom bag and sums the scaled factors.
fn add_values(lhs: Value, rhs: Value, negate_rhs: bool) -> Result<Value, Error> {
    let mut lhs = lhs;
    let mut rhs = rhs;
    lhs.sort_and_cancel();
    rhs.sort_and_cancel();
    let lhs_atoms: Vec<&str> = lhs.live_numerator().map(|a| a.as_str()).collect();
    let rhs_atoms: Vec<&str> = rhs.live_numerator().map(|a| a.as_str()).collect();
    let lhs_den: Vec<&str> = lhs.live_denominator().map(|a| a.as_str()).collect();
    let rhs_den: Vec<&str> = rhs.live_denominator().map(|a| a.as_str()).collect();
    if lhs_atoms != rhs_atoms || lhs_den != rhs_den {
        return Err(Error::new(ErrorKind::BadSum));
    }
    lhs.factor = if negate_rhs {
        lhs.factor - rhs.factor
    } else {
        lhs.factor + rhs.factor
    };
    Ok(lhs)
}

fn parse_term(lexer: &mut Lexer, ctx: &mut Context) -> Result<Value, Error> {
    if ctx.config.oldstar {
        parse_term_oldstar(lexer, ctx)
    } else {
        parse_term_newstar(lexer, ctx)
    }
}

/// `newstar`: `*`, `/`, and juxtaposition share one left-to-right precedence
/// level.
fn parse_term_newstar(lexer: &mut Lexer, ctx: &mut Context) -> Result<Value, Error> {
    ctx.enter()?;
    let result = (|| {
        let mut value = parse_power(lexer, ctx)?;
        loop {
            match lexer.peek() {
                Ok(tok) if tok.value == TokenValue::Operator(Operator::Star) => {
                    lexer.next().ok();
                    let rhs = parse_power(lexer, ctx)?;
                    value.mul_assign(rhs)?;
                }
                Ok(tok) if tok.value == TokenValue::Operator(Operator::Slash) => {
                    lexer.next().ok();
                    let rhs = parse_power(lexer, ctx)?;
                    value.div_assign(rhs)?;
                }
                Ok(tok) if starts_factor(&tok.value, ctx.config) => {
                    let rhs = parse_power(lexer, ctx)?;
                    value.mul_assign(rhs)?;
                }
                _ => break,
            }
        }
        Ok(value)
    })();
    ctx.exit();
    result
}

/// `oldstar`: a `term` is a `/`-separated list of `factor`s, and a `factor`
/// is itself a `*`/juxtaposition-separated list of powers, so `*` binds
/// tighter than `/`.
fn parse_term_oldstar(lexer: &mut Lexer, ctx: &mut Context) -> Result<Value, Error> {
    ctx.enter()?;
    let result = (|| {
        let mut value = parse_factor_oldstar(lexer, ctx)?;
        while let Ok(tok) = lexer.peek() {
            if tok.value != TokenValue::Operator(Operator::Slash) {
                break;
            }
            lexer.next().ok();
            let rhs = parse_factor_oldstar(lexer, ctx)?;
            value.div_assign(rhs)?;
        }
        Ok(value)
    })();
    ctx.exit();
    result
}

fn parse_factor_oldstar(lexer: &mut Lexer, ctx: &mut Context) -> Result<Value, Error> {
    ctx.enter()?;
    let result = (|| {
        let mut value = parse_power(lexer, ctx)?;
        loop {
            match lexer.peek() {
                Ok(tok) if tok.value == TokenValue::Operator(Operator::Star) => {
                    lexer.next().ok();
                    let rhs = parse_power(lexer, ctx)?;
                    value.mul_assign(rhs)?;
                }
                Ok(tok) if starts_factor(&tok.value, ctx.config) => {
                    let rhs = parse_power(lexer, ctx)?;
                    value.mul_assign(rhs)?;
                }
                _ => break,
            }
        }
        Ok(value)
    })();
    ctx.exit();
    result
}

/// Whether `tok` can begin an implicit-multiplication factor, i.e. a factor
/// with no explicit `*` or `/` before it. A leading `-` only counts when
/// [`Config::minus`] is off, since otherwise `expr` has already claimed it as
/// subtraction.
fn starts_factor(value: &TokenValue, config: &Config) -> bool {
    match value {
        TokenValue::Number(_) | TokenValue::Ident(_) => true,
        TokenValue::Operator(Operator::OpenParen | Operator::Tilde | Operator::Plus) => true,
        TokenValue::Operator(Operator::Minus) => !config.minus,
        _ => false,
    }
}

/// `^`/`**` bind right-associatively and outrank unary `-`/`+`: `-2^2` is
/// `-(2^2)`, matching the historical program's precedence.
fn parse_power(lexer: &mut Lexer, ctx: &mut Context) -> Result<Value, Error> {
    ctx.enter()?;
    let result = (|| {
        let base = parse_unary(lexer, ctx)?;
        match lexer.peek() {
            Ok(tok) if tok.value == TokenValue::Operator(Operator::Caret) => {
                lexer.next().ok();
                let exponent = parse_power(lexer, ctx)?;
                apply_power(base, exponent)
            }
            _ => Ok(base),
        }
    })();
    ctx.exit();
    result
}

fn apply_power(base: Value, exponent: Value) -> Result<Value, Error> {
    if !exponent.is_dimensionless() {
        return Err(Error::new(ErrorKind::NotANumber));
    }
    let e = exponent.factor;
    if e.fract() == 0.0 {
        return base.pow_int(e as i32);
    }
    if base.is_dimensionless() {
        return Ok(Value::number(base.factor.powf(e)));
    }
    let reciprocal = 1.0 / e;
    if reciprocal.fract() == 0.0 {
        return base.nth_root(reciprocal as i32);
    }
    Err(Error::new(ErrorKind::NotRoot))
}

fn parse_unary(lexer: &mut Lexer, ctx: &mut Context) -> Result<Value, Error> {
    ctx.enter()?;
    let result = (|| {
        let tok = lexer.peek().clone().map_err(lex_error)?;
        match tok.value {
            TokenValue::Operator(Operator::Minus) => {
                lexer.next().ok();
                let mut inner = parse_unary(lexer, ctx)?;
                inner.factor = -inner.factor;
                Ok(inner)
            }
            TokenValue::Operator(Operator::Plus) => {
                lexer.next().ok();
                parse_unary(lexer, ctx)
            }
            TokenValue::Operator(Operator::Tilde) => {
                lexer.next().ok();
                parse_call(lexer, ctx, true)
            }
            _ => parse_atom(lexer, ctx),
        }
    })();
    ctx.exit();
    result
}

fn parse_atom(lexer: &mut Lexer, ctx: &mut Context) -> Result<Value, Error> {
    ctx.enter()?;
    let result = (|| {
        let tok = lexer.next().map_err(lex_error)?;
        match tok.value {
            TokenValue::Number(n) => Ok(Value::number(n)),
            TokenValue::Operator(Operator::OpenParen) => {
                let inner = parse_expr(lexer, ctx)?;
                expect_close_paren(lexer)?;
                Ok(inner)
            }
            TokenValue::Ident(name) => parse_name(lexer, ctx, name, tok.location),
            _ => Err(Error::at(ErrorKind::Parse, tok.location)),
        }
    })();
    ctx.exit();
    result
}

fn expect_close_paren(lexer: &mut Lexer) -> Result<(), Error> {
    let tok = lexer.next().map_err(lex_error)?;
    match tok.value {
        TokenValue::Operator(Operator::CloseParen) => Ok(()),
        _ => Err(Error::at(ErrorKind::Parse, tok.location)),
    }
}

/// Parses `NAME '(' expr ')'`, used for both `NAME(...)` and the `~NAME(...)`
/// inverse form. A bare `~NAME` with no argument list is out of scope here:
/// it names the historical program's "tilde as a conversion target" idiom,
/// which needs cooperation from the comparator rather than the parser alone.
fn parse_call(lexer: &mut Lexer, ctx: &mut Context, inverse: bool) -> Result<Value, Error> {
    let tok = lexer.next().map_err(lex_error)?;
    let TokenValue::Ident(name) = tok.value else {
        return Err(Error::at(ErrorKind::Parse, tok.location));
    };
    if !ctx.evaluator().is_function(name) {
        return Err(Error::at(ErrorKind::UnknownUnit(name.to_string()), tok.location));
    }
    let open = lexer.next().map_err(lex_error)?;
    if open.value != TokenValue::Operator(Operator::OpenParen) {
        return Err(Error::at(ErrorKind::Parse, open.location));
    }
    ctx.enter()?;
    let argument = parse_expr(lexer, ctx);
    ctx.exit();
    let argument = argument?;
    expect_close_paren(lexer)?;
    ctx.evaluator().evaluate(name, argument, inverse)
}

fn parse_name(lexer: &mut Lexer, ctx: &mut Context, name: &str, location: Range<usize>) -> Result<Value, Error> {
    if let Some((pname, pval)) = ctx.parameter() {
        if pname == name {
            return Ok(pval.clone());
        }
    }

    let next_is_open_paren = matches!(
        lexer.peek(),
        Ok(tok) if tok.value == TokenValue::Operator(Operator::OpenParen)
    );
    if next_is_open_paren && ctx.evaluator().is_function(name) {
        lexer.next().ok();
        ctx.enter()?;
        let argument = parse_expr(lexer, ctx);
        ctx.exit();
        let argument = argument?;
        expect_close_paren(lexer)?;
        return ctx.evaluator().evaluate(name, argument, false);
    }

    resolve_name_value(ctx, name, location)
}

/// Resolves a bare name to a [`Value`], handling the implicit-exponent
/// reading of a trailing digit (`m2` is `m^2`) before falling back to
/// ordinary [`units_db::resolve`].
///
/// Reuses `ctx` (rather than building a fresh one) when it recurses into a
/// non-primitive unit's body, so the recursion-depth guard in
/// [`Context::enter`] also catches a cyclic database instead of only
/// catching deeply nested source expressions.
fn resolve_name_value(ctx: &mut Context, name: &str, location: Range<usize>) -> Result<Value, Error> {
    if name.len() > 1 {
        let last = name.as_bytes()[name.len() - 1];
        if last.is_ascii_digit() && last != b'0' && last != b'1' {
            let base = name[..name.len() - 1].to_string();
            let exponent = (last - b'0') as i32;
            let base_value = resolve_name_value(ctx, &base, location.clone())?;
            return base_value.pow_int(exponent);
        }
    }

    match units_db::resolve(ctx.db, name, true) {
        None => Err(Error::at(ErrorKind::UnknownUnit(name.to_string()), location)),
        Some(body) => {
            if body.contains(units_core::PRIMITIVE_MARK) {
                Ok(Value::atom(name))
            } else {
                ctx.enter()?;
                let result = parse(&body, ctx);
                ctx.exit();
                result.map_err(|e| {
                    if e.location.is_none() {
                        e.with_location(location.clone())
                    } else {
                        e
                    }
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use units_core::Atom;
    use units_db::UnitDef;

    struct NoFunctions;
    impl FunctionEvaluator for NoFunctions {
        fn evaluate(&self, _name: &str, _argument: Value, _inverse: bool) -> Result<Value, Error> {
            Err(Error::new(ErrorKind::BadFuncArg))
        }
        fn is_function(&self, _name: &str) -> bool {
            false
        }
    }

    struct TempConverter;
    impl FunctionEvaluator for TempConverter {
        fn evaluate(&self, name: &str, argument: Value, inverse: bool) -> Result<Value, Error> {
            if name != "tempF" {
                return Err(Error::new(ErrorKind::UnknownUnit(name.to_string())));
            }
            if !inverse {
                Ok(Value::number((argument.factor - 32.0) / 1.8))
            } else {
                Ok(Value::number(argument.factor * 1.8 + 32.0))
            }
        }
        fn is_function(&self, name: &str) -> bool {
            name == "tempF"
        }
    }

    fn sample_db() -> Database {
        let mut db = Database::new();
        db.insert_unit(UnitDef {
            name: "meter".into(),
            body: "!".into(),
            primitive: true,
            dimension_tag: None,
            location: units_db::SourceLocation::new("test", 1),
        })
        .unwrap();
        db.insert_unit(UnitDef {
            name: "foot".into(),
            body: "12 inch".into(),
            primitive: false,
            dimension_tag: None,
            location: units_db::SourceLocation::new("test", 1),
        })
        .unwrap();
        db.insert_unit(UnitDef {
            name: "inch".into(),
            body: "2.54 centimeter".into(),
            primitive: false,
            dimension_tag: None,
            location: units_db::SourceLocation::new("test", 1),
        })
        .unwrap();
        db.insert_prefix(units_db::PrefixDef {
            text: "centi".into(),
            body: "0.01".into(),
            location: units_db::SourceLocation::new("test", 1),
        });
        db
    }

    #[test]
    fn parses_plain_numbers() {
        let db = Database::new();
        let config = Config::default();
        let mut ctx = Context::new(&db, &config, &NoFunctions);
        let v = parse("2 + 3", &mut ctx).unwrap();
        assert_eq!(v.factor, 5.0);
    }

    #[test]
    fn resolves_non_primitive_units_recursively() {
        let db = sample_db();
        let config = Config::default();
        let mut ctx = Context::new(&db, &config, &NoFunctions);
        let v = parse("foot", &mut ctx).unwrap();
        assert!((v.factor - 30.48).abs() < 1e-9);
        assert_eq!(v.live_numerator().cloned().collect::<Vec<_>>(), vec![Atom::new("meter")]);
    }

    #[test]
    fn multiplication_and_division() {
        let db = sample_db();
        let config = Config::default();
        let mut ctx = Context::new(&db, &config, &NoFunctions);
        let v = parse("meter / meter", &mut ctx).unwrap();
        assert!(v.is_dimensionless());
        assert_eq!(v.factor, 1.0);
    }

    #[test]
    fn juxtaposition_multiplies() {
        let db = sample_db();
        let config = Config::default();
        let mut ctx = Context::new(&db, &config, &NoFunctions);
        let v = parse("2 meter", &mut ctx).unwrap();
        assert_eq!(v.factor, 2.0);
    }

    #[test]
    fn caret_expunit_raises_atoms() {
        let db = sample_db();
        let config = Config::default();
        let mut ctx = Context::new(&db, &config, &NoFunctions);
        let v = parse("meter^2", &mut ctx).unwrap();
        assert_eq!(v.live_numerator().count(), 2);
    }

    #[test]
    fn implicit_trailing_digit_is_an_exponent() {
        let db = sample_db();
        let config = Config::default();
        let mut ctx = Context::new(&db, &config, &NoFunctions);
        let v = parse("meter2", &mut ctx).unwrap();
        assert_eq!(v.live_numerator().count(), 2);
    }

    #[test]
    fn function_call_applies_forward() {
        let db = Database::new();
        let config = Config::default();
        let mut ctx = Context::new(&db, &config, &TempConverter);
        let v = parse("tempF(212)", &mut ctx).unwrap();
        assert!((v.factor - 100.0).abs() < 1e-9);
    }

    #[test]
    fn tilde_applies_inverse() {
        let db = Database::new();
        let config = Config::default();
        let mut ctx = Context::new(&db, &config, &TempConverter);
        let v = parse("~tempF(100)", &mut ctx).unwrap();
        assert!((v.factor - 212.0).abs() < 1e-9);
    }

    #[test]
    fn subtraction_requires_conformable_operands() {
        let db = sample_db();
        let config = Config::default();
        let mut ctx = Context::new(&db, &config, &NoFunctions);
        let err = parse("meter - 5", &mut ctx).unwrap_err();
        assert_eq!(err.kind, ErrorKind::BadSum);
    }

    #[test]
    fn minus_as_juxtaposition_when_disabled() {
        let db = Database::new();
        let mut config = Config::default();
        config.minus = false;
        let mut ctx = Context::new(&db, &config, &NoFunctions);
        let v = parse("3 -2", &mut ctx).unwrap();
        assert_eq!(v.factor, -6.0);
    }

    #[test]
    fn unknown_unit_is_reported() {
        let db = Database::new();
        let config = Config::default();
        let mut ctx = Context::new(&db, &config, &NoFunctions);
        let err = parse("bogus", &mut ctx).unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnknownUnit("bogus".to_string()));
    }
}
