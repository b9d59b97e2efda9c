//! Statement/Block Writer (C8): emits statement blocks, simple triggers,
//! and trigger blocks, tracking try-depth and the "fails at zero" state.
//! Ported from `WriteStatementBlock`/`WriteStatement`/
//! `WriteSimpleTrigger(Block)`/`WriteTrigger(Block)` in
//! `original_source/ModuleSystem.cpp`.

use std::fmt::Write as _;

use crate::diagnostics::{Diagnostics, Level};
use crate::error::Result;
use crate::opcodes::OpcodeMetadata;
use crate::operand::OperandParser;
use crate::quickstrings::QuickStringPool;
use crate::registry::Registry;
use crate::value::Value;
use crate::variables::VariableTable;

const MAX_OPERANDS: usize = 16;

/// Shared compiler state the writer needs on every call; borrowed fresh
/// per call site so ownership stays with the caller (the driver/emitter).
pub struct WriteContext<'a> {
    pub registry: &'a mut Registry,
    pub globals: &'a mut VariableTable,
    pub quick_strings: &'a mut QuickStringPool,
    pub opcodes: &'a OpcodeMetadata,
    pub diagnostics: &'a mut Diagnostics,
}

/// Emits a statement block (`<count> <stmt> <stmt> ...`) to `out`.
/// Clears the local-variable table on entry, records the per-statement
/// context string used by every diagnostic, and returns whether the
/// block can fail outside any try-block ("fails at zero").
pub fn write_statement_block(out: &mut String, block: &Value, ctx: &mut WriteContext<'_>, context: &str) -> Result<bool> {
    let mut locals = VariableTable::new();
    let statements = block.as_seq().unwrap_or_default();

    let _ = write!(out, "{} ", statements.len());

    let mut depth: i32 = 0;
    let mut fails_at_zero = false;
    for (i, statement) in statements.iter().enumerate() {
        let stmt_context = format!("{context}, statement {i}");
        write_statement(out, statement, ctx, &mut locals, &mut depth, &mut fails_at_zero, &stmt_context)?;
    }

    if depth != 0 {
        ctx.diagnostics.raise(
            Level::Error,
            format!("unexpected try block depth {depth}"),
            Some(context.to_string()),
        )?;
    }

    locals.warn_unused_locals(ctx.diagnostics, context);

    Ok(fails_at_zero)
}

fn write_statement(
    out: &mut String,
    statement: &Value,
    ctx: &mut WriteContext<'_>,
    locals: &mut VariableTable,
    depth: &mut i32,
    fails_at_zero: &mut bool,
    context: &str,
) -> Result<()> {
    let opcode = match statement {
        Value::Seq(items) => {
            let opcode = items.first().and_then(|v| v.as_int().ok()).unwrap_or(-1);
            let mut num_operands = items.len().saturating_sub(1);
            let _ = write!(out, "{opcode} ");

            if num_operands > MAX_OPERANDS {
                ctx.diagnostics.warning(
                    "operand count exceeds 16".to_string(),
                    Some(context.to_string()),
                );
                num_operands = MAX_OPERANDS;
            }
            let _ = write!(out, "{num_operands} ");

            let mut parser = OperandParser {
                registry: ctx.registry,
                globals: ctx.globals,
                locals,
                quick_strings: ctx.quick_strings,
                opcodes: ctx.opcodes,
                diagnostics: ctx.diagnostics,
            };
            for i in 0..num_operands {
                let value = parser.parse(statement, i + 1, context)?;
                let _ = write!(out, "{value} ");
            }
            opcode
        }
        Value::Int(opcode) => {
            let _ = write!(out, "{opcode} 0 ");
            *opcode
        }
        other => {
            ctx.diagnostics.raise(
                Level::Critical,
                format!("unrecognized statement type {}", other.kind()),
                Some(context.to_string()),
            )?;
            -1
        }
    };

    let operation = opcode & crate::opcodes::OPCODE_MASK;
    *depth += ctx.opcodes.depth_delta(operation) as i32;

    if *depth == 0 && ctx.opcodes.can_fail(operation) {
        *fails_at_zero = true;
    }

    Ok(())
}

/// `WriteSimpleTriggerBlock`: a count header then each simple trigger
/// (a check-interval field plus a statement block).
pub fn write_simple_trigger_block(out: &mut String, block: &Value, ctx: &mut WriteContext<'_>, context: &str) -> Result<()> {
    let triggers = block.as_seq().unwrap_or_default();
    let _ = writeln!(out, "{}", triggers.len());
    for (i, trigger) in triggers.iter().enumerate() {
        write_simple_trigger(out, trigger, ctx, &format!("{context}, simple trigger {i}"))?;
        out.push('\n');
    }
    Ok(())
}

fn write_simple_trigger(out: &mut String, trigger: &Value, ctx: &mut WriteContext<'_>, context: &str) -> Result<()> {
    if let Ok(interval) = trigger.get(0) {
        let _ = write!(out, "{interval} ");
    }
    let empty = Value::Seq(Vec::new());
    let block = trigger.get(1).unwrap_or(&empty);
    write_statement_block(out, block, ctx, context)?;
    Ok(())
}

/// `WriteTriggerBlock`: a count header then each trigger (two numeric
/// fields plus condition and consequence statement blocks).
pub fn write_trigger_block(out: &mut String, block: &Value, ctx: &mut WriteContext<'_>, context: &str) -> Result<()> {
    let triggers = block.as_seq().unwrap_or_default();
    let _ = writeln!(out, "{}", triggers.len());
    for (i, trigger) in triggers.iter().enumerate() {
        write_trigger(out, trigger, ctx, &format!("{context}, trigger {i}"))?;
        out.push('\n');
    }
    Ok(())
}

fn write_trigger(out: &mut String, trigger: &Value, ctx: &mut WriteContext<'_>, context: &str) -> Result<()> {
    for idx in 0..3 {
        if let Ok(field) = trigger.get(idx) {
            let _ = write!(out, "{field} ");
        }
    }
    let empty = Value::Seq(Vec::new());
    let conditions = trigger.get(3).unwrap_or(&empty);
    write_statement_block(out, conditions, ctx, &format!("{context}, conditions"))?;
    let consequences = trigger.get(4).unwrap_or(&empty);
    write_statement_block(out, consequences, ctx, &format!("{context}, consequences"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::HeaderOperations;

    fn ctx<'a>(
        registry: &'a mut Registry,
        globals: &'a mut VariableTable,
        quick_strings: &'a mut QuickStringPool,
        opcodes: &'a OpcodeMetadata,
        diagnostics: &'a mut Diagnostics,
    ) -> WriteContext<'a> {
        WriteContext { registry, globals, quick_strings, opcodes, diagnostics }
    }

    #[test]
    fn unbalanced_try_block_raises_depth_error() {
        let mut registry = Registry::new();
        let mut globals = VariableTable::new();
        let mut quick_strings = QuickStringPool::new();
        let opcodes = OpcodeMetadata::initialize(&HeaderOperations::default());
        let mut diagnostics = Diagnostics::new(false, false);
        let mut c = ctx(&mut registry, &mut globals, &mut quick_strings, &opcodes, &mut diagnostics);

        // try_begin(4), try_end(3), try_begin(4) with no matching try_end.
        let block = Value::Seq(vec![
            Value::Seq(vec![Value::Int(4)]),
            Value::Seq(vec![Value::Int(3)]),
            Value::Seq(vec![Value::Int(4)]),
        ]);
        let mut out = String::new();
        write_statement_block(&mut out, &block, &mut c, "test_script").unwrap();

        assert!(diagnostics
            .entries()
            .iter()
            .any(|d| d.message == "unexpected try block depth 1"));
    }

    #[test]
    fn balanced_try_block_raises_nothing() {
        let mut registry = Registry::new();
        let mut globals = VariableTable::new();
        let mut quick_strings = QuickStringPool::new();
        let opcodes = OpcodeMetadata::initialize(&HeaderOperations::default());
        let mut diagnostics = Diagnostics::new(false, false);
        let mut c = ctx(&mut registry, &mut globals, &mut quick_strings, &opcodes, &mut diagnostics);

        let block = Value::Seq(vec![
            Value::Seq(vec![Value::Int(4)]),
            Value::Seq(vec![Value::Int(3)]),
        ]);
        let mut out = String::new();
        write_statement_block(&mut out, &block, &mut c, "test_script").unwrap();

        assert!(diagnostics.entries().is_empty());
    }

    #[test]
    fn operand_count_over_16_truncates_and_warns() {
        let mut registry = Registry::new();
        let mut globals = VariableTable::new();
        let mut quick_strings = QuickStringPool::new();
        let opcodes = OpcodeMetadata::initialize(&HeaderOperations::default());
        let mut diagnostics = Diagnostics::new(false, false);
        let mut c = ctx(&mut registry, &mut globals, &mut quick_strings, &opcodes, &mut diagnostics);

        let mut parts = vec![Value::Int(1)];
        parts.extend((0..17).map(Value::Int));
        let block = Value::Seq(vec![Value::Seq(parts)]);
        let mut out = String::new();
        write_statement_block(&mut out, &block, &mut c, "test_script").unwrap();

        assert!(out.contains("1 16 "));
        assert!(diagnostics.entries().iter().any(|d| d.message == "operand count exceeds 16"));
    }
}
