//! Adapter parser: S-expression tree -> [`AdapterModule`].
//!
//! Each parsing function corresponds to a grammar production, shown in its
//! doc comment. Every adapter is validated as soon as it is parsed, so a
//! successfully parsed module holds only well-formed adapters.

use super::error::ParseError;
use super::sexpr::{SExpr, SExprList};
use super::token::Span;
use crate::adapter::{AdapterFunction, AdapterModule, Config, Conversion, Instruction, ValType};
use std::collections::HashMap;

/// Parse a module with the default [`Config`].
///
/// ```
/// use iface_adapter::wat;
///
/// let module = wat::parse(r#"
///     (module
///       (@interface func (export "to_u16") (param i32) (result u16)
///         arg.get 0
///         i32-to-u16))
/// "#).unwrap();
/// assert_eq!(module.export_names(), vec!["to_u16"]);
/// ```
pub fn parse(source: &str) -> Result<AdapterModule, ParseError> {
    parse_with_config(source, &Config::default())
}

/// Parse a module, applying `config` to every adapter.
///
/// # Errors
/// Lexical or structural errors, unknown instructions, duplicate exports,
/// and any adapter that fails validation.
pub fn parse_with_config(source: &str, config: &Config) -> Result<AdapterModule, ParseError> {
    let sexpr = super::sexpr::read(source)?;
    let module = parse_module(&sexpr, config)?;
    log::debug!(
        "parsed module {} with {} adapter(s)",
        module.name.as_deref().unwrap_or("<anonymous>"),
        module.len()
    );
    Ok(module)
}

/// Grammar: `module ::= '(' 'module' id? adapter* ')'`
fn parse_module(sexpr: &SExpr, config: &Config) -> Result<AdapterModule, ParseError> {
    let list = sexpr.expect_list()?;
    list.expect_head("module")?;

    let mut idx = 1;
    let name = take_optional_id(list, &mut idx);
    let mut module = AdapterModule::new(name.map(String::from));

    for item in list.items.iter().skip(idx) {
        if !item.is_list_headed_by("@interface") {
            return Err(ParseError::expected("(@interface ...)", item, item.span()));
        }
        if !config.interface_types {
            return Err(ParseError::new("interface types support is disabled", item.span()));
        }
        let adapter = parse_adapter(item.expect_list()?, config)?;
        module
            .add(adapter)
            .map_err(|e| ParseError::new(e.to_string(), item.span()))?;
    }

    Ok(module)
}

/// Grammar: `adapter ::= '(' '@interface' 'func' id? export? param* result* instr* ')'`
fn parse_adapter(list: SExprList<'_>, config: &Config) -> Result<AdapterFunction, ParseError> {
    match list.get(1) {
        Some(item) if item.as_keyword() == Some("func") => {}
        Some(item) => return Err(ParseError::expected("'func'", item, item.span())),
        None => return Err(ParseError::new("expected 'func'", list.span)),
    }

    let mut idx = 2;
    let _id = take_optional_id(list, &mut idx);

    let mut export = None;
    if let Some(item) = list.get(idx) {
        if item.is_list_headed_by("export") {
            export = Some(parse_export(item.expect_list()?)?);
            idx += 1;
        }
    }

    let mut params = Vec::new();
    let mut param_names = HashMap::new();
    while let Some(item) = list.get(idx).filter(|item| item.is_list_headed_by("param")) {
        parse_param(item.expect_list()?, &mut params, &mut param_names)?;
        idx += 1;
    }

    let mut results = Vec::new();
    while let Some(item) = list.get(idx).filter(|item| item.is_list_headed_by("result")) {
        for ty in item.expect_list()?.tail() {
            results.push(parse_valtype(ty)?);
        }
        idx += 1;
    }

    let mut body = Vec::new();
    let items = &list.items[idx.min(list.len())..];
    let mut i = 0;
    while i < items.len() {
        i += parse_instruction(items, i, &param_names, &mut body)?;
    }

    AdapterFunction::with_config(export, params, results, body, config)
        .map_err(|e| ParseError::new(e.to_string(), list.span))
}

/// Grammar: `export ::= '(' 'export' string ')'`
fn parse_export(list: SExprList<'_>) -> Result<String, ParseError> {
    match list.tail() {
        [name] => parse_string(name),
        _ => Err(ParseError::new("expected a single export name", list.span)),
    }
}

/// Grammar: `param ::= '(' 'param' id valtype ')' | '(' 'param' valtype* ')'`
fn parse_param(
    list: SExprList<'_>,
    params: &mut Vec<ValType>,
    names: &mut HashMap<String, u32>,
) -> Result<(), ParseError> {
    let mut idx = 1;
    if let Some(id) = take_optional_id(list, &mut idx) {
        let ty = match list.tail() {
            [_, ty] => parse_valtype(ty)?,
            _ => return Err(ParseError::new("a named param takes exactly one type", list.span)),
        };
        let index = params.len() as u32;
        if names.insert(id.to_string(), index).is_some() {
            return Err(ParseError::new(format!("duplicate parameter ${id}"), list.span));
        }
        params.push(ty);
        return Ok(());
    }
    for ty in list.tail() {
        params.push(parse_valtype(ty)?);
    }
    Ok(())
}

/// Grammar: `valtype ::= 'i32' | 'i64' | 's8' | 'u8' | ... | 'u64'`
fn parse_valtype(sexpr: &SExpr) -> Result<ValType, ParseError> {
    sexpr
        .as_keyword()
        .and_then(|kw| kw.parse().ok())
        .ok_or_else(|| ParseError::expected("value type", sexpr, sexpr.span()))
}

/// Parse the instruction starting at `items[at]`, returning how many items it
/// consumed.
///
/// Grammar: `instr ::= 'arg.get' (u32 | id) | mnemonic | '(' instr-head instr* ')'`
fn parse_instruction(
    items: &[SExpr],
    at: usize,
    names: &HashMap<String, u32>,
    out: &mut Vec<Instruction>,
) -> Result<usize, ParseError> {
    let item = &items[at];
    match item {
        SExpr::List { span, items: inner } => {
            let list = SExprList { span: *span, items: inner };
            parse_folded(list, names, out)?;
            Ok(1)
        }
        SExpr::Atom(_) => {
            let kw = item
                .as_keyword()
                .ok_or_else(|| ParseError::expected("instruction", item, item.span()))?;
            if kw == "arg.get" {
                let index = parse_arg_index(items.get(at + 1), names, item.span())?;
                out.push(Instruction::ArgGet(index));
                Ok(2)
            } else {
                out.push(parse_conversion(kw, item.span())?);
                Ok(1)
            }
        }
    }
}

/// Folded form: operands first, then the instruction itself.
///
/// `(i32-to-u16 (arg.get 0))` is `arg.get 0` followed by `i32-to-u16`.
fn parse_folded(list: SExprList<'_>, names: &HashMap<String, u32>, out: &mut Vec<Instruction>) -> Result<(), ParseError> {
    let head = list
        .head()
        .ok_or_else(|| ParseError::new("expected instruction", list.span))?;
    let kw = head
        .as_keyword()
        .ok_or_else(|| ParseError::expected("instruction", head, head.span()))?;

    if kw == "arg.get" {
        return match list.tail() {
            [index] => {
                out.push(Instruction::ArgGet(parse_arg_index(Some(index), names, head.span())?));
                Ok(())
            }
            _ => Err(ParseError::new("arg.get takes exactly one index", list.span)),
        };
    }

    let operands = list.tail();
    let mut i = 0;
    while i < operands.len() {
        if operands[i].as_list().is_none() {
            return Err(ParseError::expected("folded operand", &operands[i], operands[i].span()));
        }
        i += parse_instruction(operands, i, names, out)?;
    }
    out.push(parse_conversion(kw, head.span())?);
    Ok(())
}

fn parse_conversion(kw: &str, span: Span) -> Result<Instruction, ParseError> {
    Conversion::from_mnemonic(kw)
        .map(Instruction::Convert)
        .ok_or_else(|| ParseError::new(format!("unknown instruction: {kw}"), span))
}

/// Grammar: `argidx ::= u32 | id`
fn parse_arg_index(sexpr: Option<&SExpr>, names: &HashMap<String, u32>, span: Span) -> Result<u32, ParseError> {
    let sexpr = sexpr.ok_or_else(|| ParseError::new("expected argument index", span))?;
    if let Some(id) = sexpr.as_id() {
        return names
            .get(id)
            .copied()
            .ok_or_else(|| ParseError::new(format!("undefined parameter ${id}"), sexpr.span()));
    }
    if let Some(lit) = sexpr.as_integer() {
        return lit
            .to_u32()
            .ok_or_else(|| ParseError::new("argument index out of range", sexpr.span()));
    }
    Err(ParseError::expected("argument index", sexpr, sexpr.span()))
}

/// Grammar: `string ::= '"' stringchar* '"'`
pub(crate) fn parse_string(sexpr: &SExpr) -> Result<String, ParseError> {
    let bytes = sexpr
        .as_string()
        .ok_or_else(|| ParseError::expected("string", sexpr, sexpr.span()))?;
    String::from_utf8(bytes.to_vec()).map_err(|_| ParseError::new("malformed UTF-8 encoding", sexpr.span()))
}

fn take_optional_id<'a>(list: SExprList<'a>, idx: &mut usize) -> Option<&'a str> {
    let id = list.get(*idx)?.as_id()?;
    *idx += 1;
    Some(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::{InterfaceType, Mode, NativeType};
    use rstest::rstest;

    const I32: ValType = ValType::Native(NativeType::I32);
    const I64: ValType = ValType::Native(NativeType::I64);
    const U16: ValType = ValType::Interface(InterfaceType::U16);

    fn single(source: &str) -> AdapterFunction {
        let module = parse(source).expect("parse failed");
        assert_eq!(module.len(), 1);
        module.adapters()[0].as_ref().clone()
    }

    fn expect_error(source: &str, substring: &str) {
        let err = parse(source).expect_err("expected parse error");
        assert!(
            err.message.contains(substring),
            "Expected error containing {:?}, got {:?}",
            substring,
            err.message
        );
    }

    #[test]
    fn flat_adapter() {
        let func = single(
            r#"(module (@interface func $f (export "f") (param i32) (result u16)
                  arg.get 0
                  i32-to-u16))"#,
        );
        assert_eq!(func.name(), Some("f"));
        assert_eq!(func.params(), &[I32]);
        assert_eq!(func.results(), &[U16]);
        assert_eq!(
            func.body(),
            &[
                Instruction::ArgGet(0),
                Instruction::Convert(Conversion::Lift {
                    from: NativeType::I32,
                    to: InterfaceType::U16,
                    mode: Mode::Wrapping
                })
            ]
        );
        assert_eq!(func.max_stack_depth(), 1);
    }

    #[test]
    fn folded_matches_flat() {
        let flat = single(
            r#"(module (@interface func (export "f") (param i32 i64) (result s8 s32)
                  arg.get 0 i32-to-s8x arg.get 1 i64-to-s32))"#,
        );
        let folded = single(
            r#"(module (@interface func (export "f") (param i32 i64) (result s8 s32)
                  (i32-to-s8x (arg.get 0))
                  (i64-to-s32 (arg.get 1))))"#,
        );
        assert_eq!(flat.body(), folded.body());
    }

    #[test]
    fn named_params() {
        let func = single(
            r#"(module (@interface func (export "f") (param $a i64) (param $b i32) (result u8 i64)
                  (i32-to-u8 (arg.get $b))
                  arg.get $a))"#,
        );
        assert_eq!(func.params(), &[I64, I32]);
        assert_eq!(func.body()[0], Instruction::ArgGet(1));
        assert_eq!(func.body()[2], Instruction::ArgGet(0));
    }

    #[test]
    fn module_name_and_unexported_adapter() {
        let module = parse(
            r#"(module $m
                 (@interface func (param s8) (result i32) arg.get 0 s8-to-i32)
                 (@interface func (export "g") (result)))"#,
        )
        .unwrap();
        assert_eq!(module.name.as_deref(), Some("m"));
        assert_eq!(module.len(), 2);
        assert_eq!(module.export_names(), vec!["g"]);
    }

    #[test]
    fn empty_module() {
        assert!(parse("(module)").unwrap().is_empty());
    }

    #[rstest]
    #[case::unsigned_checked_lift("i32-to-u8x", "unknown instruction: i32-to-u8x")]
    #[case::float("i32-to-f32", "unknown instruction: i32-to-f32")]
    #[case::garbage("foo", "unknown instruction: foo")]
    #[case::widening_checked("s8-to-i32x", "unknown instruction: s8-to-i32x")]
    fn rejects_unknown_mnemonics(#[case] mnemonic: &str, #[case] message: &str) {
        expect_error(
            &format!(r#"(module (@interface func (param i32) arg.get 0 {mnemonic}))"#),
            message,
        );
    }

    #[test]
    fn validation_errors_become_parse_errors() {
        expect_error(
            "(module (@interface func (param i32) (result i32) arg.get 1))",
            "argument index out of range",
        );
        expect_error(
            "(module (@interface func (param i32) (result u16) arg.get 0 i32-to-s8))",
            "result mismatch",
        );
        expect_error(
            "(module (@interface func (param i64) (result s8) arg.get 0 i32-to-s8))",
            "type mismatch",
        );
        expect_error("(module (@interface func (result s8) i32-to-s8))", "stack underflow");
    }

    #[test]
    fn structural_errors() {
        expect_error("(module (func))", "expected (@interface ...)");
        expect_error("(module (@interface memory))", "expected 'func'");
        expect_error("(module (@interface func (param f32)))", "expected value type, found f32");
        expect_error("(module (@interface func (param i32) arg.get))", "expected argument index");
        expect_error("(module (@interface func (param i32) arg.get $nope))", "undefined parameter $nope");
        expect_error("(module (@interface func (param $x i32) (param $x i64)))", "duplicate parameter $x");
        expect_error("(module (@interface func (param $x i32 i64)))", "exactly one type");
        expect_error("(module (@interface func (param i32) (i32-to-s8 0)))", "expected folded operand");
        expect_error("(modul)", "expected 'module'");
    }

    #[test]
    fn duplicate_exports() {
        expect_error(
            r#"(module (@interface func (export "f")) (@interface func (export "f")))"#,
            "duplicate export: f",
        );
    }

    #[test]
    fn interface_types_disabled() {
        let config = Config::new().wasm_interface_types(false);
        let err = parse_with_config("(module (@interface func))", &config).unwrap_err();
        assert_eq!(err.message, "interface types support is disabled");
        assert!(parse_with_config("(module)", &config).is_ok());
    }

    #[test]
    fn stack_depth_limit() {
        let source = "(module (@interface func (param i32) (result i32 i32 i32) arg.get 0 arg.get 0 arg.get 0))";
        assert!(parse(source).is_ok());
        let config = Config::new().max_stack_depth(2);
        let err = parse_with_config(source, &config).unwrap_err();
        assert!(err.message.contains("exceeds limit 2"), "{}", err.message);
    }

    /// Alternating `(s8-to-i32 (i32-to-s8 ...))` layers around `(arg.get 0)`.
    /// Well typed at any depth and never more than one operand deep.
    fn deeply_folded(layers: usize) -> String {
        format!(
            "(module (@interface func (export \"f\") (param i32) (result i32) {}(arg.get 0){}))",
            "(s8-to-i32 (i32-to-s8 ".repeat(layers),
            "))".repeat(layers)
        )
    }

    #[test]
    fn deeply_folded_body() {
        let func = single(&deeply_folded(200));
        assert_eq!(func.body().len(), 401);
        assert_eq!(func.max_stack_depth(), 1);

        expect_error(&deeply_folded(20_000), "nesting too deep");
    }

    #[test]
    fn error_positions() {
        let err = parse("(module\n  (@interface func (param i32)\n    arg.get 0 bogus))").unwrap_err();
        assert_eq!(err.span.line, 3);
        assert_eq!(err.span.column, 15);
    }
}
