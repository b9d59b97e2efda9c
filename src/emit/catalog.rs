//! Straightforward one-record-per-line emitters with no statement blocks
//! of their own (aside from `map_icons`' trailing simple-trigger block).
//! Grounded in `WriteStrings`, `WriteSkills`, `WriteMusic`, `WriteMeshes`,
//! `WriteAnimations`, `WriteInfoPages`, `WriteQuests`, `WritePostEffects`,
//! `WriteGroundSpecs`, `WriteFloraKinds`, `WriteSkyboxes` and
//! `WriteMapIcons` in `original_source/ModuleSystem.cpp`.

use std::fmt::Write as _;

use crate::emit::{field, int_at, seq_at, str_at};
use crate::encode::{encode_id, encode_str, encode_strip};
use crate::error::Result;
use crate::resources::ResourceKind;
use crate::session::Session;
use crate::value::Value;
use crate::writer::write_simple_trigger_block;

pub fn write_strings(session: &mut Session, items: &[Value]) -> Result<()> {
    let mut out = String::new();
    let _ = writeln!(out, "stringsfile version 1");
    let _ = writeln!(out, "{}", items.len());
    for item in items {
        let _ = writeln!(out, "str_{} {} ", encode_id(str_at(item, 0)), encode_str(str_at(item, 1)));
    }
    session.write_file("strings.txt", &out)
}

pub fn write_skills(session: &mut Session, items: &[Value]) -> Result<()> {
    let mut out = String::new();
    let _ = writeln!(out, "{}", items.len());
    for item in items {
        let _ = writeln!(
            out,
            "skl_{} {} {} {} {} ",
            encode_id(str_at(item, 0)),
            encode_str(str_at(item, 1)),
            field(item, 2),
            field(item, 3),
            encode_str(str_at(item, 4)),
        );
    }
    session.write_file("skills.txt", &out)
}

pub fn write_music(session: &mut Session, items: &[Value]) -> Result<()> {
    let mut out = String::new();
    let _ = writeln!(out, "{}", items.len());
    for item in items {
        let flags = int_at(item, 2);
        let continue_flags = int_at(item, 3);
        let _ = writeln!(out, "{} {} {} ", encode_str(str_at(item, 1)), flags, flags | continue_flags);
    }
    session.write_file("music.txt", &out)
}

pub fn write_meshes(session: &mut Session, items: &[Value]) -> Result<()> {
    let mut out = String::new();
    let _ = writeln!(out, "{}", items.len());
    for item in items {
        let name = format!("mesh_{}", encode_id(str_at(item, 0)));
        let _ = write!(out, "{name} {} ", field(item, 1));
        let _ = write!(out, "{} ", session.resource(ResourceKind::Mesh, field(item, 2)));
        for idx in 3..12 {
            let _ = write!(out, "{} ", field(item, idx));
        }
        out.push('\n');
    }
    session.write_file("meshes.txt", &out)
}

pub fn write_animations(session: &mut Session, items: &[Value]) -> Result<()> {
    let mut out = String::new();
    let _ = writeln!(out, "{}", items.len());
    for item in items {
        let name = encode_str(str_at(item, 0));
        let _ = write!(out, " {name} {} {} ", field(item, 1), field(item, 2));

        let sequences = match item {
            Value::Seq(all) if all.len() > 3 => &all[3..],
            _ => &[][..],
        };
        let _ = write!(out, "{} ", sequences.len());

        for sequence in sequences {
            let _ = write!(out, "\n  {} ", field(sequence, 0));
            let _ = write!(out, "{} ", session.resource(ResourceKind::Animation, field(sequence, 1)));
            let _ = write!(out, "{} {} {} ", field(sequence, 2), field(sequence, 3), field(sequence, 4));

            if sequence.len() > 5 {
                let _ = write!(out, "{} ", field(sequence, 5));
            } else {
                let _ = write!(out, "0 ");
            }

            if sequence.len() > 6 {
                let offset = seq_at(sequence, 6);
                let _ = write!(out, "{} {} {} ", field(offset, 0), field(offset, 1), field(offset, 2));
            } else {
                let _ = write!(out, "0.0 0.0 0.0 ");
            }

            if sequence.len() > 7 {
                let _ = write!(out, "{} ", field(sequence, 7));
            } else {
                let _ = write!(out, "0.0 ");
            }
        }
        out.push('\n');
    }
    session.write_file("actions.txt", &out)
}

pub fn write_info_pages(session: &mut Session, items: &[Value]) -> Result<()> {
    let mut out = String::new();
    let _ = writeln!(out, "infopagesfile version 1");
    let _ = writeln!(out, "{}", items.len());
    for item in items {
        let _ = writeln!(
            out,
            "ip_{} {} {} ",
            encode_id(str_at(item, 0)),
            encode_str(str_at(item, 1)),
            encode_str(str_at(item, 2)),
        );
    }
    session.write_file("info_pages.txt", &out)
}

pub fn write_quests(session: &mut Session, items: &[Value]) -> Result<()> {
    let mut out = String::new();
    let _ = writeln!(out, "questsfile version 1");
    let _ = writeln!(out, "{}", items.len());
    for item in items {
        let _ = writeln!(
            out,
            "qst_{} {} {} {} ",
            encode_id(str_at(item, 0)),
            encode_str(str_at(item, 1)),
            field(item, 2),
            encode_str(str_at(item, 3)),
        );
    }
    session.write_file("quests.txt", &out)
}

pub fn write_postfx(session: &mut Session, items: &[Value]) -> Result<()> {
    let mut out = String::new();
    let _ = writeln!(out, "postfx_paramsfile version 1");
    let _ = writeln!(out, "{}", items.len());
    for item in items {
        let _ = write!(out, "pfx_{} {} {} ", encode_id(str_at(item, 0)), field(item, 1), field(item, 2));
        for i in 0..3 {
            let params = seq_at(item, i + 3);
            let _ = write!(
                out,
                "{} {} {} {} ",
                field(params, 0),
                field(params, 1),
                field(params, 2),
                field(params, 3),
            );
        }
        out.push('\n');
    }
    session.write_file("postfx.txt", &out)
}

pub fn write_ground_specs(session: &mut Session, items: &[Value]) -> Result<()> {
    let mut out = String::new();
    for item in items {
        let name = encode_id(str_at(item, 0));
        let flags = int_at(item, 1);
        let _ = write!(out, "{name} {flags} ");
        let _ = write!(out, "{} ", session.resource(ResourceKind::Material, field(item, 2)));
        let _ = write!(out, "{} ", field(item, 3));
        let _ = write!(out, "{} ", session.resource(ResourceKind::Material, field(item, 4)));
        if flags & 0x4 != 0 {
            let detail = seq_at(item, 5);
            let _ = write!(out, "{} {} {} ", field(detail, 0), field(detail, 1), field(detail, 2));
        }
        out.push('\n');
    }
    session.write_file("Data/ground_specs.txt", &out)
}

pub fn write_flora_kinds(session: &mut Session, items: &[Value]) -> Result<()> {
    let mut out = String::new();
    let _ = writeln!(out, "{}", items.len());
    for item in items {
        let name = encode_strip(str_at(item, 0));
        let flags = int_at(item, 1);
        let _ = write!(out, "{name} {flags} ");

        let meshes = seq_at(item, 2);
        let _ = write!(out, "{} ", meshes.len());
        for mesh in meshes {
            let _ = write!(out, "{} ", session.resource(ResourceKind::Mesh, field(mesh, 0)));
            if mesh.len() > 1 {
                let _ = write!(out, "{} ", session.resource(ResourceKind::Body, field(mesh, 1)));
            } else {
                let _ = write!(out, "0 ");
            }
            if flags & 0x0240_0000 != 0 {
                let second = seq_at(mesh, 2);
                let _ = write!(out, "{} ", session.resource(ResourceKind::Mesh, field(second, 0)));
                let _ = write!(out, "{} ", session.resource(ResourceKind::Body, field(second, 1)));
            }
        }

        if flags & 0x0400_0000 != 0 {
            let _ = write!(out, "{} {} ", field(item, 3), field(item, 4));
        }
        out.push('\n');
    }
    session.write_file("Data/flora_kinds.txt", &out)
}

pub fn write_skyboxes(session: &mut Session, items: &[Value]) -> Result<()> {
    let mut out = String::new();
    let _ = writeln!(out, "{}", items.len());
    for item in items {
        let _ = write!(out, "{} ", session.resource(ResourceKind::Mesh, field(item, 0)));
        let _ = write!(out, "{} {} {} {} ", field(item, 1), field(item, 2), field(item, 3), field(item, 4));
        let _ = write!(out, "{} ", encode_id(str_at(item, 5)));
        for idx in 6..10 {
            let vector = seq_at(item, idx);
            let upper = if idx == 9 { 2 } else { 3 };
            for component in 0..upper {
                let _ = write!(out, "{} ", field(vector, component));
            }
        }
        out.push('\n');
    }
    session.write_file("Data/skyboxes.txt", &out)
}

pub fn write_map_icons(session: &mut Session, items: &[Value]) -> Result<()> {
    let mut out = String::new();
    let _ = writeln!(out, "map_icons_file version 1");
    let _ = writeln!(out, "{}", items.len());
    for item in items {
        let name = encode_id(str_at(item, 0));
        let _ = write!(out, "{name} {} ", field(item, 1));
        let _ = write!(out, "{} ", session.resource(ResourceKind::Mesh, field(item, 2)));
        let _ = write!(out, "{} ", field(item, 3));
        let snd = session.lookup("snd", field(item, 4), &name)?;
        let _ = write!(out, "{snd} ");

        let trigger_pos = if item.len() > 7 {
            let _ = write!(out, "{} {} {} ", field(item, 5), field(item, 6), field(item, 7));
            8
        } else {
            let _ = write!(out, "0.0 0.0 0.0 ");
            5
        };

        if item.len() > trigger_pos {
            let mut ctx = session.write_ctx();
            write_simple_trigger_block(&mut out, field(item, trigger_pos), &mut ctx, &name)?;
        } else {
            let _ = writeln!(out, "0 ");
        }
    }
    session.write_file("map_icons.txt", &out)
}
