//! `skins.txt`, grounded in `WriteSkins` in
//! `original_source/ModuleSystem.cpp` — the single largest per-entity
//! schema in the format, with face-key, hair/beard mesh and material
//! lists, per-face-texture hair-color overrides, voice lines, and
//! skeleton-constraint pairs.

use std::fmt::Write as _;

use crate::emit::{field, seq_at, str_at};
use crate::encode::encode_id;
use crate::error::Result;
use crate::resources::ResourceKind;
use crate::session::Session;
use crate::value::Value;

const MAX_SKINS: usize = 16;

pub fn write_skins(session: &mut Session, items: &[Value]) -> Result<()> {
    let num_skins = if items.len() > MAX_SKINS {
        session.diagnostics.warning("skin count exceeds 6", None);
        MAX_SKINS
    } else {
        items.len()
    };

    let mut out = String::new();
    let _ = writeln!(out, "skins_file version 1");
    let _ = writeln!(out, "{num_skins}");

    for skin in &items[..num_skins] {
        let name = encode_id(str_at(skin, 0));
        let _ = write!(out, "{name} {} ", field(skin, 1));
        let _ = write!(out, "{} ", session.resource(ResourceKind::Mesh, field(skin, 2)));
        let _ = write!(out, "{} ", session.resource(ResourceKind::Mesh, field(skin, 3)));
        let _ = write!(out, "{} ", session.resource(ResourceKind::Mesh, field(skin, 4)));
        let _ = write!(out, "{} ", session.resource(ResourceKind::Mesh, field(skin, 5)));

        let face_keys = seq_at(skin, 6);
        let _ = write!(out, "{} ", face_keys.len());
        for face_key in face_keys {
            let _ = write!(out, "skinkey_{} ", encode_id(str_at(face_key, 4)));
            let _ = write!(
                out,
                "{} {} {} {} ",
                field(face_key, 0),
                field(face_key, 1),
                field(face_key, 2),
                field(face_key, 3)
            );
            let _ = write!(out, "{} ", crate::encode::encode_str(str_at(face_key, 4)));
        }

        let hair_meshes = seq_at(skin, 7);
        let _ = write!(out, "{} ", hair_meshes.len());
        for mesh in hair_meshes {
            let _ = write!(out, "{} ", session.resource(ResourceKind::Mesh, mesh));
        }

        let beard_meshes = seq_at(skin, 8);
        let _ = write!(out, "{} ", beard_meshes.len());
        for mesh in beard_meshes {
            let _ = write!(out, "{} ", session.resource(ResourceKind::Mesh, mesh));
        }

        let hair_materials = seq_at(skin, 9);
        let _ = write!(out, "{} ", hair_materials.len());
        for material in hair_materials {
            let _ = write!(out, "{} ", session.resource(ResourceKind::Material, material));
        }

        let beard_materials = seq_at(skin, 10);
        let _ = write!(out, "{} ", beard_materials.len());
        for material in beard_materials {
            let _ = write!(out, "{} ", session.resource(ResourceKind::Material, material));
        }

        let face_textures = seq_at(skin, 11);
        let _ = write!(out, "{} ", face_textures.len());
        for face_texture in face_textures {
            let _ = write!(out, "{} ", session.resource(ResourceKind::Material, field(face_texture, 0)));
            let _ = write!(out, "{} ", field(face_texture, 1));

            let texture_hair_materials = if face_texture.len() > 2 { seq_at(face_texture, 2) } else { &[] };
            let texture_hair_colors = if face_texture.len() > 3 { seq_at(face_texture, 3) } else { &[] };

            let _ = write!(out, "{} {} ", texture_hair_materials.len(), texture_hair_colors.len());
            for material in texture_hair_materials {
                let _ = write!(out, "{} ", session.resource(ResourceKind::Material, material));
            }
            for color in texture_hair_colors {
                let _ = write!(out, "{color} ");
            }
        }

        let voices = seq_at(skin, 12);
        let _ = write!(out, "{} ", voices.len());
        for voice in voices {
            let _ = write!(out, "{} ", field(voice, 0));
            let _ = write!(out, "{} ", encode_id(str_at(voice, 1)));
        }

        let _ = write!(out, "{} ", session.resource(ResourceKind::Skeleton, field(skin, 13)));
        let _ = write!(out, "{} ", field(skin, 14));

        if skin.len() > 15 {
            let psys = session.lookup("psys", field(skin, 15), &name)?;
            let _ = write!(out, "{psys} ");
        } else {
            let _ = write!(out, "0 ");
        }
        if skin.len() > 16 {
            let psys = session.lookup("psys", field(skin, 16), &name)?;
            let _ = write!(out, "{psys} ");
        } else {
            let _ = write!(out, "0 ");
        }

        if skin.len() > 17 {
            let constraints = seq_at(skin, 17);
            let _ = write!(out, "{} ", constraints.len());
            for constraint in constraints {
                let _ = write!(out, "{} {} ", field(constraint, 0), field(constraint, 1));
                let num_pairs = constraint.len().saturating_sub(2);
                let _ = write!(out, "{num_pairs} ");
                for i in 0..num_pairs {
                    let pair = seq_at(constraint, i + 2);
                    let _ = write!(out, "{} {} ", field(pair, 0), field(pair, 1));
                }
            }
        } else {
            let _ = write!(out, "0 ");
        }

        out.push('\n');
    }

    session.write_file("skins.txt", &out)
}
