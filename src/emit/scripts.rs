//! `scripts.txt` (and `obfuscated_scripts.txt`), grounded in
//! `WriteScripts` in `original_source/ModuleSystem.cpp`.

use std::fmt::Write as _;

use crate::emit::{field, str_at};
use crate::encode::encode_id;
use crate::error::Result;
use crate::session::Session;
use crate::value::Value;
use crate::writer::write_statement_block;

pub fn write_scripts(session: &mut Session, items: &[Value]) -> Result<()> {
    let obfuscate = session.options.obfuscate_scripts();
    let list_obfuscated = obfuscate && session.options.list_obfuscated_scripts();

    let mut out = String::new();
    let _ = writeln!(out, "scriptsfile version 1");
    let _ = writeln!(out, "{}", items.len());

    let mut table = String::new();

    for (i, script) in items.iter().enumerate() {
        let name = encode_id(str_at(script, 0));

        if obfuscate && !name.starts_with("game_") && !name.starts_with("wse_") {
            if list_obfuscated {
                let _ = writeln!(table, "script_{i}={name}");
            }
            let _ = write!(out, "script_{i} ");
        } else {
            let _ = write!(out, "{name} ");
        }

        let body = field(script, 1);
        let fails_at_zero = if body.is_seq() {
            let _ = write!(out, "-1 ");
            let mut ctx = session.write_ctx();
            write_statement_block(&mut out, body, &mut ctx, &name)?
        } else {
            let _ = write!(out, "{body} ");
            let mut ctx = session.write_ctx();
            write_statement_block(&mut out, field(script, 2), &mut ctx, &name)?
        };

        if fails_at_zero && !name.starts_with("cf_") {
            session
                .diagnostics
                .warning("non cf_ script can fail", Some(name.clone()));
        }

        out.push('\n');
    }

    session.write_file("scripts.txt", &out)?;

    if list_obfuscated {
        session.write_file("obfuscated_scripts.txt", &table)?;
    }

    Ok(())
}
