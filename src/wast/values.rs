//! Typed constants and result comparison for script execution.

use super::parser::{syntax_err, WastParseError};
use crate::adapter::ValType;
use crate::runtime::Value;
use crate::wat::sexpr::SExpr;

/// Parse a typed constant such as `(u16.const 65535)` or `(i32.const -1)`.
///
/// The literal must fit the signed or unsigned range of the type's width, as
/// `i32.const` accepts both `-1` and `0xffffffff`.
pub fn parse_const(sexpr: &SExpr) -> Result<Value, WastParseError> {
    let list = sexpr
        .as_list()
        .ok_or_else(|| syntax_err(format!("expected constant, found {sexpr}"), sexpr.span()))?;
    let head = list.head_keyword().unwrap_or_default();
    let ty = head
        .strip_suffix(".const")
        .and_then(|ty| ty.parse::<ValType>().ok())
        .ok_or_else(|| syntax_err(format!("expected <type>.const, found {sexpr}"), list.span))?;
    let lit = match list.tail() {
        [arg] => arg
            .as_integer()
            .ok_or_else(|| syntax_err(format!("expected integer, found {arg}"), arg.span()))?,
        _ => return Err(syntax_err(format!("{head} takes exactly one integer"), list.span)),
    };
    Value::from_integer(ty, lit.to_i128())
        .ok_or_else(|| syntax_err(format!("constant out of range for {ty}"), list.span))
}

/// Compare results against expected values: same count, same types, same bits.
///
/// Returns `Err(description)` for the first mismatch.
pub fn match_results(results: &[Value], expected: &[Value]) -> Result<(), String> {
    if results.len() != expected.len() {
        return Err(format!(
            "result count mismatch: expected {}, got {}",
            expected.len(),
            results.len()
        ));
    }
    for (i, (result, exp)) in results.iter().zip(expected).enumerate() {
        if result != exp {
            return Err(format!("result {i}: expected {exp}, got {result}"));
        }
    }
    Ok(())
}
