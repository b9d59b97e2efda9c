//! `item_kinds1.txt`, grounded in `WriteItems` in
//! `original_source/ModuleSystem.cpp`. The packed `item_stats` bitfield
//! layout is reproduced exactly, including the `-rusmod-rebalanser`
//! difficulty recompute for head/body armor.

use std::fmt::Write as _;

use crate::emit::{field, int_at, seq_at, str_at};
use crate::encode::{encode_id, encode_str};
use crate::error::Result;
use crate::resources::ResourceKind;
use crate::session::Session;
use crate::value::Value;

const MAX_VARIATIONS: usize = 16;
const MAX_ITEM_FACTIONS: usize = 16;

pub fn write_items(session: &mut Session, items: &[Value]) -> Result<()> {
    let mut out = String::new();
    let _ = writeln!(out, "itemsfile version 3");
    let _ = writeln!(out, "{}", items.len());

    for item in items {
        let name = format!("itm_{}", encode_id(str_at(item, 0)));
        let _ = write!(out, "{name} ");
        let _ = write!(out, "{} ", encode_str(str_at(item, 1)));
        let _ = write!(out, "{} ", encode_str(str_at(item, 1)));

        let variations = seq_at(item, 2);
        let num_variations = variations.len().min(MAX_VARIATIONS);
        if variations.len() > MAX_VARIATIONS {
            session
                .diagnostics
                .warning("item variation count exceeds 16", Some(name.clone()));
        }
        let _ = write!(out, "{num_variations} ");
        for variation in &variations[..num_variations] {
            let _ = write!(out, "{} ", session.resource(ResourceKind::Mesh, field(variation, 0)));
            let _ = write!(out, "{} ", field(variation, 1));
        }

        let _ = write!(out, "{} {} {} {} ", field(item, 3), field(item, 4), field(item, 5), field(item, 7));

        let item_stats = int_at(item, 6) as u64;
        let weight = 0.25 * ((item_stats >> 24) & 0xFF) as f64;
        let head_armor = item_stats & 0xFF;
        let body_armor = (item_stats >> 8) & 0xFF;
        let leg_armor = (item_stats >> 16) & 0xFF;
        let mut difficulty = (item_stats >> 32) & 0xFF;
        let hit_points = (item_stats >> 40) & 0xFFFF;
        let speed_rating = (item_stats >> 80) & 0xFF;
        let missile_speed = (item_stats >> 90) & 0x3FF;
        let weapon_length = (item_stats >> 70) & 0x3FF;
        let max_ammo = (item_stats >> 100) & 0xFF;
        let thrust_damage = (item_stats >> 60) & 0x3FF;
        let swing_damage = (item_stats >> 50) & 0x3FF;
        let mut abundance = (item_stats >> 110) & 0xFF;

        if abundance == 0 {
            abundance = 100;
        }

        if session.options.rusmod_rebalanser() {
            const ITP_TYPE_HEAD_ARMOR: i64 = 0xc;
            const ITP_TYPE_BODY_ARMOR: i64 = 0xd;
            let item_type = int_at(item, 3) & 0xF;

            if item_type == ITP_TYPE_HEAD_ARMOR {
                let l = 4.0 * weight + 4.0;
                if l >= 14.0 {
                    difficulty = (l + 0.5) as u64;
                }
            }
            if item_type == ITP_TYPE_BODY_ARMOR {
                let l = 0.9375 * weight - 4.125;
                if l >= 7.0 {
                    difficulty = (l + 0.5) as u64;
                }
            }
        }

        let _ = write!(
            out,
            "{weight} {abundance} {head_armor} {body_armor} {leg_armor} {difficulty} {hit_points} \
             {speed_rating} {missile_speed} {weapon_length} {max_ammo} {thrust_damage} {swing_damage} "
        );

        if item.len() > 9 {
            let factions = seq_at(item, 9);
            let num_factions = factions.len().min(MAX_ITEM_FACTIONS);
            if factions.len() > MAX_ITEM_FACTIONS {
                session
                    .diagnostics
                    .warning("item faction count exceeds 16", Some(name.clone()));
            }
            let _ = write!(out, "{num_factions} ");
            for faction in &factions[..num_factions] {
                let _ = write!(out, "{faction} ");
            }
        } else {
            let _ = write!(out, "0 ");
        }

        if item.len() > 8 {
            let mut ctx = session.write_ctx();
            crate::writer::write_simple_trigger_block(&mut out, field(item, 8), &mut ctx, &name)?;
        } else {
            let _ = writeln!(out, "0");
        }
    }

    session.write_file("item_kinds1.txt", &out)
}
