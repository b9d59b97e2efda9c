//! `simple_triggers.txt`, `triggers.txt`, `mission_templates.txt` and
//! `menus.txt`. Grounded in `WriteSimpleTriggers`, `WriteTriggers`,
//! `WriteMissionTemplates` and `WriteMenus` in
//! `original_source/ModuleSystem.cpp`.

use std::fmt::Write as _;

use crate::emit::{field, seq_at, str_at};
use crate::encode::{encode_id, encode_str};
use crate::error::Result;
use crate::session::Session;
use crate::value::Value;
use crate::writer::{write_simple_trigger_block, write_statement_block, write_trigger_block};

/// `m_simple_triggers` is one combined sequence gathered across every
/// module rather than a per-entity list; `block` is that sequence.
pub fn write_simple_triggers(session: &mut Session, block: &Value) -> Result<()> {
    let mut out = String::new();
    let _ = writeln!(out, "simple_triggers_file version 1");
    let mut ctx = session.write_ctx();
    write_simple_trigger_block(&mut out, block, &mut ctx, "simple game triggers")?;
    session.write_file("simple_triggers.txt", &out)
}

pub fn write_triggers(session: &mut Session, block: &Value) -> Result<()> {
    let mut out = String::new();
    let _ = writeln!(out, "triggersfile version 1");
    let mut ctx = session.write_ctx();
    write_trigger_block(&mut out, block, &mut ctx, "game triggers")?;
    session.write_file("triggers.txt", &out)
}

const MAX_GROUP_OVERRIDES: usize = 8;

pub fn write_mission_templates(session: &mut Session, items: &[Value]) -> Result<()> {
    let mut out = String::new();
    let _ = writeln!(out, "missionsfile version 1");
    let _ = writeln!(out, "{}", items.len());

    for mission_template in items {
        let name = format!("mst_{}", encode_id(str_at(mission_template, 0)));
        let _ = write!(out, "{name} ");
        let _ = write!(out, "{} ", encode_id(str_at(mission_template, 0)));
        let _ = write!(out, "{} {} ", field(mission_template, 1), field(mission_template, 2));
        let _ = write!(out, "{} ", encode_str(str_at(mission_template, 3)));

        let groups = seq_at(mission_template, 4);
        let _ = write!(out, "{} ", groups.len());

        for (j, group) in groups.iter().enumerate() {
            for idx in 0..5 {
                let _ = write!(out, "{} ", field(group, idx));
            }

            if group.len() > 5 {
                let overrides = seq_at(group, 5);
                let num_overrides = if overrides.len() > MAX_GROUP_OVERRIDES {
                    session
                        .diagnostics
                        .warning("item override count exceeds 8", Some(format!("{name}, group {j}")));
                    MAX_GROUP_OVERRIDES
                } else {
                    overrides.len()
                };
                let _ = write!(out, "{num_overrides} ");
                for over in &overrides[..num_overrides] {
                    let _ = write!(out, "{over} ");
                }
            } else {
                let _ = write!(out, "0 ");
            }
        }

        let mut ctx = session.write_ctx();
        write_trigger_block(&mut out, field(mission_template, 5), &mut ctx, &name)?;
    }

    session.write_file("mission_templates.txt", &out)
}

pub fn write_menus(session: &mut Session, items: &[Value]) -> Result<()> {
    let mut out = String::new();
    let _ = writeln!(out, "menusfile version 1");
    let _ = writeln!(out, "{}", items.len());

    for menu in items {
        let name = format!("menu_{}", encode_id(str_at(menu, 0)));
        let _ = write!(out, "{name} {} ", field(menu, 1));
        let _ = write!(out, "{} ", encode_str(str_at(menu, 2)));
        let mesh = session.resource(crate::resources::ResourceKind::Mesh, field(menu, 3));
        let _ = write!(out, "{mesh} ");

        {
            let mut ctx = session.write_ctx();
            write_statement_block(&mut out, field(menu, 4), &mut ctx, &name)?;
        }

        let items_list = seq_at(menu, 5);
        let _ = write!(out, "{} ", items_list.len());

        for item in items_list {
            let item_name = format!("mno_{}", encode_id(str_at(item, 0)));
            out.push('\n');
            let _ = write!(out, "{item_name} ");
            {
                let mut ctx = session.write_ctx();
                write_statement_block(&mut out, field(item, 1), &mut ctx, &format!("{name}, {item_name}, conditions"))?;
            }
            let _ = write!(out, "{} ", encode_str(str_at(item, 2)));
            {
                let mut ctx = session.write_ctx();
                write_statement_block(&mut out, field(item, 3), &mut ctx, &format!("{name}, {item_name}, consequences"))?;
            }

            if item.len() > 4 {
                let _ = write!(out, "{} ", encode_str(str_at(item, 4)));
            } else {
                let _ = write!(out, ". ");
            }
        }

        out.push('\n');
    }

    session.write_file("menus.txt", &out)
}
