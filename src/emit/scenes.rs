//! `scenes.txt`, `scene_props.txt`, `tableau_materials.txt`,
//! `presentations.txt` and `particle_systems.txt`, grounded in
//! `WriteScenes`, `WriteSceneProps`, `WriteTableaus`,
//! `WritePresentations` and `WriteParticleSystems` in
//! `original_source/ModuleSystem.cpp`.

use std::fmt::Write as _;

use crate::emit::{field, seq_at, str_at};
use crate::encode::{encode_id, encode_str, encode_strip};
use crate::error::Result;
use crate::resources::ResourceKind;
use crate::session::Session;
use crate::value::Value;
use crate::writer::{write_simple_trigger_block, write_statement_block};

pub fn write_scenes(session: &mut Session, items: &[Value]) -> Result<()> {
    let mut out = String::new();
    let _ = writeln!(out, "scenesfile version 1");
    let _ = writeln!(out, "{}", items.len());

    for scene in items {
        let name = format!("scn_{}", encode_id(str_at(scene, 0)));
        let _ = write!(out, "{name} ");
        let _ = write!(out, "{} ", encode_str(str_at(scene, 0)));
        let _ = write!(out, "{} ", field(scene, 1));
        let _ = write!(out, "{} ", session.resource(ResourceKind::Mesh, field(scene, 2)));
        let _ = write!(out, "{} ", session.resource(ResourceKind::Body, field(scene, 3)));

        let size_one = seq_at(scene, 4);
        let size_two = seq_at(scene, 5);
        let _ = write!(
            out,
            "{} {} {} {} ",
            field(size_one, 0),
            field(size_one, 1),
            field(size_two, 0),
            field(size_two, 1)
        );
        let _ = write!(out, "{} {} ", field(scene, 6), field(scene, 7));

        let passages = seq_at(scene, 8);
        let _ = write!(out, "{} ", passages.len());
        for passage in passages {
            let scene_id = match passage {
                Value::Int(v) => *v,
                Value::Str(s) if s.is_empty() => 0,
                Value::Str(s) if s == "exit" => 100_000,
                other => session.lookup("scn", other, other.as_str().unwrap_or(&name))?,
            };
            let _ = write!(out, "{scene_id} ");
        }

        let chests = seq_at(scene, 9);
        let _ = write!(out, "{} ", chests.len());
        for chest in chests {
            let troop = session.lookup("trp", chest, &name)?;
            let _ = write!(out, "{troop} ");
        }

        if scene.len() > 10 {
            let _ = write!(out, "{} ", field(scene, 10));
        } else {
            let _ = write!(out, "0 ");
        }

        out.push('\n');
    }

    session.write_file("scenes.txt", &out)
}

pub fn write_scene_props(session: &mut Session, items: &[Value]) -> Result<()> {
    let mut out = String::new();
    let _ = writeln!(out, "scene_propsfile version 1");
    let _ = writeln!(out, "{}", items.len());

    for scene_prop in items {
        let name = format!("spr_{}", encode_strip(str_at(scene_prop, 0)));
        let flags = field(scene_prop, 1).as_int().unwrap_or(0) as u64;
        let _ = write!(out, "{name} {flags} {} ", (flags >> 20) & 0xFF);
        let _ = write!(out, "{} ", session.resource(ResourceKind::Mesh, field(scene_prop, 2)));
        let _ = write!(out, "{} ", session.resource(ResourceKind::Body, field(scene_prop, 3)));

        let mut ctx = session.write_ctx();
        write_simple_trigger_block(&mut out, field(scene_prop, 4), &mut ctx, &name)?;
    }

    session.write_file("scene_props.txt", &out)
}

pub fn write_tableaus(session: &mut Session, items: &[Value]) -> Result<()> {
    let mut out = String::new();
    let _ = writeln!(out, "{}", items.len());

    for tableau in items {
        let name = format!("tab_{}", encode_id(str_at(tableau, 0)));
        let _ = write!(out, "{name} ");
        let _ = write!(out, "{} ", field(tableau, 1));
        let _ = write!(out, "{} ", session.resource(ResourceKind::Material, field(tableau, 2)));
        for idx in 3..9 {
            let _ = write!(out, "{} ", field(tableau, idx));
        }
        let mut ctx = session.write_ctx();
        write_statement_block(&mut out, field(tableau, 9), &mut ctx, &name)?;
        out.push('\n');
    }

    session.write_file("tableau_materials.txt", &out)
}

pub fn write_presentations(session: &mut Session, items: &[Value]) -> Result<()> {
    let mut out = String::new();
    let _ = writeln!(out, "presentationsfile version 1");
    let _ = writeln!(out, "{}", items.len());

    for presentation in items {
        let name = format!("prsnt_{}", encode_id(str_at(presentation, 0)));
        let _ = write!(out, "{name} {} ", field(presentation, 1));
        let mesh = session.lookup("mesh", field(presentation, 2), &name)?;
        let _ = write!(out, "{mesh} ");
        let mut ctx = session.write_ctx();
        write_simple_trigger_block(&mut out, field(presentation, 3), &mut ctx, &name)?;
    }

    session.write_file("presentations.txt", &out)
}

pub fn write_particle_systems(session: &mut Session, items: &[Value]) -> Result<()> {
    let mut out = String::new();
    let _ = writeln!(out, "particle_systemsfile version 1");
    let _ = writeln!(out, "{}", items.len());

    for particle_system in items {
        let name = format!("psys_{}", encode_id(str_at(particle_system, 0)));
        let _ = write!(out, "{name} ");
        let _ = write!(out, "{} ", field(particle_system, 1));
        let _ = write!(out, "{} ", session.resource(ResourceKind::Mesh, field(particle_system, 2)));
        for idx in 3..9 {
            let _ = write!(out, "{} ", field(particle_system, idx));
        }

        for i in (0..10).step_by(2) {
            let key1 = seq_at(particle_system, i + 9);
            let key2 = seq_at(particle_system, i + 10);
            let _ = write!(
                out,
                "{} {} {} {} ",
                field(key1, 0),
                field(key1, 1),
                field(key2, 0),
                field(key2, 1)
            );
        }

        let emit_box_size = seq_at(particle_system, 19);
        let _ = write!(
            out,
            "{} {} {} ",
            field(emit_box_size, 0),
            field(emit_box_size, 1),
            field(emit_box_size, 2)
        );

        let emit_velocity = seq_at(particle_system, 20);
        let _ = write!(
            out,
            "{} {} {} ",
            field(emit_velocity, 0),
            field(emit_velocity, 1),
            field(emit_velocity, 2)
        );
        let _ = write!(out, "{} ", field(particle_system, 21));

        if particle_system.len() > 22 {
            let _ = write!(out, "{} ", field(particle_system, 22));
        } else {
            let _ = write!(out, "0.0 ");
        }
        if particle_system.len() > 23 {
            let _ = write!(out, "{} ", field(particle_system, 23));
        } else {
            let _ = write!(out, "0.0 ");
        }

        out.push('\n');
    }

    session.write_file("particle_systems.txt", &out)
}
