//! `factions.txt`, grounded in `WriteFactions` in
//! `original_source/ModuleSystem.cpp`. The relation matrix is built as a
//! flat `Vec<f64>` row-major over `num_factions * num_factions` rather
//! than the original's array-of-`new[]` rows — same values, no manual
//! allocation (see DESIGN.md).

use std::fmt::Write as _;

use crate::emit::{field, seq_at, str_at};
use crate::encode::{encode_id, encode_str};
use crate::error::Result;
use crate::session::Session;
use crate::value::Value;

pub fn write_factions(session: &mut Session, items: &[Value]) -> Result<()> {
    let num_factions = items.len();
    let mut relations = vec![0.0f64; num_factions * num_factions];

    for (i, faction) in items.iter().enumerate() {
        relations[i * num_factions + i] = field(faction, 3).as_float().unwrap_or(0.0);

        for relation in seq_at(faction, 4) {
            let context = format!("{} relations", str_at(faction, 0));
            let other = session.lookup("fac", field(relation, 0), &context)?;
            if other < 0 || other as usize >= num_factions {
                continue;
            }
            let other = other as usize;
            let value = field(relation, 1).as_float().unwrap_or(0.0);
            relations[i * num_factions + other] = value;
            if relations[other * num_factions + i].abs() < 1e-8 {
                relations[other * num_factions + i] = value;
            }
        }
    }

    let mut out = String::new();
    let _ = writeln!(out, "factionsfile version 1");
    let _ = writeln!(out, "{num_factions}");

    for (i, faction) in items.iter().enumerate() {
        let _ = write!(out, "fac_{} ", encode_id(str_at(faction, 0)));
        let _ = write!(out, "{} ", encode_str(str_at(faction, 1)));
        let _ = write!(out, "{} ", field(faction, 2));

        if faction.len() > 6 {
            let _ = write!(out, "{} ", field(faction, 6));
        } else {
            let _ = write!(out, "{} ", 0xAAAAAAu32);
        }

        for j in 0..num_factions {
            let _ = write!(out, "{} ", relations[i * num_factions + j]);
        }

        if faction.len() > 5 {
            let ranks = seq_at(faction, 5);
            let _ = write!(out, "{} ", ranks.len());
            for rank in ranks {
                let _ = write!(out, "{} ", encode_str(rank.as_str().unwrap_or("")));
            }
        }

        out.push('\n');
    }

    session.write_file("factions.txt", &out)
}
