//! `sounds.txt`, grounded in `WriteSounds` in
//! `original_source/ModuleSystem.cpp`. Two passes over the same entity
//! list: first dedup every referenced sample file into a shared sample
//! table, then emit each sound referencing that table by index.

use std::collections::HashMap;
use std::fmt::Write as _;

use crate::emit::{field, int_at, seq_at, str_at};
use crate::encode::encode_id;
use crate::error::Result;
use crate::session::Session;
use crate::value::Value;

const MAX_SOUND_SAMPLES: usize = 32;

pub fn write_sounds(session: &mut Session, items: &[Value]) -> Result<()> {
    let mut sample_index: HashMap<String, usize> = HashMap::new();
    let mut samples: Vec<String> = Vec::new();
    let mut sample_flags: Vec<i64> = Vec::new();

    for sound in items {
        for sound_file in seq_at(sound, 2) {
            let file = match sound_file {
                Value::Seq(_) => str_at(sound_file, 0).to_string(),
                Value::Str(s) => s.clone(),
                other => other.to_string(),
            };
            if !sample_index.contains_key(&file) {
                sample_index.insert(file.clone(), samples.len());
                samples.push(file);
                sample_flags.push(int_at(sound, 1));
            }
        }
    }

    let mut out = String::new();
    let _ = writeln!(out, "soundsfile version 3");
    let _ = writeln!(out, "{}", samples.len());
    for (i, sample) in samples.iter().enumerate() {
        let _ = writeln!(out, "{sample} {} ", sample_flags[i]);
    }

    out.push('\n');
    let _ = writeln!(out, "{}", items.len());

    for sound in items {
        let name = format!("snd_{}", encode_id(str_at(sound, 0)));
        let _ = write!(out, "{name} {} ", field(sound, 1));

        let sound_files = seq_at(sound, 2);
        let _ = write!(out, "{} ", sound_files.len());

        let loop_count = if sound_files.len() > MAX_SOUND_SAMPLES {
            session
                .diagnostics
                .warning("sound sample count exceeds 32", Some(name.clone()));
            MAX_SOUND_SAMPLES
        } else {
            sound_files.len()
        };

        for sound_file in &sound_files[..loop_count] {
            let (file, flags) = match sound_file {
                Value::Seq(_) => (str_at(sound_file, 0).to_string(), int_at(sound_file, 1)),
                Value::Str(s) => (s.clone(), 0),
                other => (other.to_string(), 0),
            };
            let index = sample_index.get(&file).copied().unwrap_or(0);
            let _ = write!(out, "{index} {flags} ");
        }

        out.push('\n');
    }

    session.write_file("sounds.txt", &out)
}
