//! `troops.txt`, grounded in `WriteTroops` in
//! `original_source/ModuleSystem.cpp`. Reproduces the packed
//! attributes/proficiencies/skills/face-key bitfields and the fixed
//! 64-slot inventory and two-slot face-key padding exactly.

use std::fmt::Write as _;

use crate::emit::{field, int_at, seq_at, str_at};
use crate::encode::{encode_id, encode_str};
use crate::error::Result;
use crate::resources::ResourceKind;
use crate::session::Session;
use crate::value::Value;

const MAX_TROOP_ITEMS: usize = 64;

pub fn write_troops(session: &mut Session, items: &[Value]) -> Result<()> {
    let mut out = String::new();
    let _ = writeln!(out, "troopsfile version 2");
    let _ = writeln!(out, "{}", items.len());

    for troop in items {
        let name = format!("trp_{}", encode_id(str_at(troop, 0)));
        let _ = write!(out, "{name} ");
        let _ = write!(out, "{} ", encode_str(str_at(troop, 1)));
        let _ = write!(out, "{} ", encode_str(str_at(troop, 2)));

        if troop.len() > 13 {
            let _ = write!(out, "{} ", session.resource(ResourceKind::Mesh, field(troop, 13)));
        } else {
            let _ = write!(out, "0 ");
        }

        let _ = write!(out, "{} {} {} ", field(troop, 3), field(troop, 4), field(troop, 5));

        let faction = session.lookup("fac", field(troop, 6), &name)?;
        let _ = write!(out, "{faction} ");

        if troop.len() > 14 {
            let _ = write!(out, "{} ", field(troop, 14));
        } else {
            let _ = write!(out, "0 ");
        }
        if troop.len() > 15 {
            let _ = write!(out, "{} ", field(troop, 15));
        } else {
            let _ = write!(out, "0 ");
        }

        let troop_items = seq_at(troop, 7);
        for (i, troop_item) in troop_items.iter().enumerate() {
            let item_id = session.lookup("itm", troop_item, &name)?;
            let _ = write!(out, "{item_id} 0 ");
            if i + 1 >= MAX_TROOP_ITEMS {
                break;
            }
        }
        for _ in troop_items.len().min(MAX_TROOP_ITEMS)..MAX_TROOP_ITEMS {
            let _ = write!(out, "-1 0 ");
        }

        let attribs = int_at(troop, 8) as u64;
        for shift in [0u32, 8, 16, 24, 32] {
            let _ = write!(out, "{} ", (attribs >> shift) & 0xFF);
        }

        let mut proficiencies = int_at(troop, 9) as u64;
        for _ in 0..7 {
            let _ = write!(out, "{} ", proficiencies & 0x3FF);
            proficiencies >>= 10;
        }

        let skills = int_at(troop, 10) as u64;
        for i in 0..6 {
            let _ = write!(out, "{} ", (skills >> (i * 32)) & 0xFFFF_FFFF);
        }

        for i in 0..2 {
            let face_key = if troop.len() > i + 11 {
                field(troop, i + 11).as_int().unwrap_or(0) as u64
            } else {
                0
            };
            for j in 0..4 {
                let shift = (3 - j) * 64;
                let chunk = if shift < 64 { face_key >> shift } else { 0 };
                let _ = write!(out, "{chunk} ");
            }
        }

        out.push('\n');
    }

    session.write_file("troops.txt", &out)
}
