//! `dialog_states.txt` and `conversation.txt`, grounded in
//! `WriteDialogs` in `original_source/ModuleSystem.cpp`.

use std::collections::HashMap;
use std::fmt::Write as _;

use crate::emit::{field, str_at};
use crate::encode::{encode_id, encode_str};
use crate::error::Result;
use crate::session::Session;
use crate::value::Value;
use crate::writer::write_statement_block;

const DEFAULT_STATES: [&str; 15] = [
    "start",
    "party_encounter",
    "prisoner_liberated",
    "enemy_defeated",
    "party_relieved",
    "event_triggered",
    "close_window",
    "trade",
    "exchange_members",
    "trade_prisoners",
    "buy_mercenaries",
    "view_char",
    "training",
    "member_chat",
    "prisoner_chat",
]; // default dialog states, preallocated in the original's line-state table

pub fn write_dialogs(session: &mut Session, items: &[Value]) -> Result<()> {
    let obfuscate = session.options.obfuscate_dialog_states();

    let mut states: HashMap<String, i64> = HashMap::new();
    let mut states_out = String::new();
    let mut next_state = DEFAULT_STATES.len() as i64;

    for (i, name) in DEFAULT_STATES.iter().enumerate() {
        states.insert(name.to_string(), i as i64);
        let _ = writeln!(states_out, "{name}");
    }

    let mut ensure_state = |states: &mut HashMap<String, i64>, states_out: &mut String, token: &str| {
        if !states.contains_key(token) {
            let id = next_state;
            next_state += 1;
            states.insert(token.to_string(), id);
            if obfuscate {
                let _ = writeln!(states_out, "state_{id}");
            } else {
                let _ = writeln!(states_out, "{token}");
            }
        }
    };

    let mut conversation = String::new();
    let _ = writeln!(conversation, "dialogsfile version 2");
    let _ = writeln!(conversation, "{}", items.len());

    let mut dialog_ids: HashMap<String, String> = HashMap::new();

    for sentence in items {
        let input_token = str_at(sentence, 1).to_string();
        let output_token = str_at(sentence, 4).to_string();

        ensure_state(&mut states, &mut states_out, &input_token);
        ensure_state(&mut states, &mut states_out, &output_token);

        let text = encode_str(str_at(sentence, 3));

        let base_id = format!("dlga_{}:{}", encode_id(&input_token), encode_id(&output_token));
        let mut auto_id = base_id.clone();
        if let Some(existing) = dialog_ids.get(&auto_id) {
            if existing != &text {
                let mut i = 1;
                loop {
                    let candidate = format!("{base_id}.{i}");
                    if !dialog_ids.contains_key(&candidate) {
                        auto_id = candidate;
                        break;
                    }
                    i += 1;
                }
            }
        }
        dialog_ids.insert(auto_id.clone(), text.clone());

        if !states.contains_key(&input_token) {
            session
                .diagnostics
                .raise(
                    crate::diagnostics::Level::Error,
                    format!("input token not found: {input_token}"),
                    Some(auto_id.clone()),
                )?;
        }

        let _ = write!(conversation, "{auto_id} ");
        let _ = write!(conversation, "{} ", field(sentence, 0));
        let _ = write!(conversation, "{} ", states[&input_token]);
        {
            let mut ctx = session.write_ctx();
            write_statement_block(&mut conversation, field(sentence, 2), &mut ctx, &auto_id)?;
        }

        let text = if text.is_empty() { "NO_TEXT".to_string() } else { text };
        let _ = write!(conversation, "{text} ");
        let _ = write!(conversation, "{} ", states[&output_token]);
        {
            let mut ctx = session.write_ctx();
            write_statement_block(&mut conversation, field(sentence, 5), &mut ctx, &auto_id)?;
        }

        if sentence.len() > 6 {
            let _ = write!(conversation, "{} ", encode_str(str_at(sentence, 6)));
        } else {
            let _ = write!(conversation, "NO_VOICEOVER ");
        }

        conversation.push('\n');
    }

    session.write_file("dialog_states.txt", &states_out)?;
    session.write_file("conversation.txt", &conversation)
}
