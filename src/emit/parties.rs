//! `parties.txt` and `party_templates.txt`, grounded in `WriteParties`
//! and `WritePartyTemplates` in `original_source/ModuleSystem.cpp`.

use std::fmt::Write as _;

use crate::emit::{field, seq_at, str_at};
use crate::encode::encode_str;
use crate::error::Result;
use crate::session::Session;
use crate::value::Value;

const MAX_PARTY_TEMPLATE_MEMBERS: usize = 6;

pub fn write_parties(session: &mut Session, items: &[Value]) -> Result<()> {
    let mut out = String::new();
    let _ = writeln!(out, "partiesfile version 1");
    let _ = writeln!(out, "{}", items.len());
    let _ = writeln!(out, "{}", items.len());

    for (i, party) in items.iter().enumerate() {
        let name = format!("p_{}", crate::encode::encode_id(str_at(party, 0)));
        let _ = write!(out, "1 {i} {i} {name} ");
        let _ = write!(out, "{} ", encode_str(str_at(party, 1)));
        let _ = write!(out, "{} ", field(party, 2));

        let menu = session.lookup("menu", field(party, 3), &name)?;
        let _ = write!(out, "{menu} ");
        let template = session.lookup("pt", field(party, 4), &name)?;
        let _ = write!(out, "{template} ");
        let faction = session.lookup("fac", field(party, 5), &name)?;
        let _ = write!(out, "{faction} ");

        let _ = write!(out, "{} {} ", field(party, 6), field(party, 6));
        let _ = write!(out, "{} ", field(party, 7));

        let target_party = session.lookup("p", field(party, 8), &name)?;
        let _ = write!(out, "{target_party} {target_party} ");

        let position = seq_at(party, 9);
        let px = field(position, 0);
        let py = field(position, 1);
        let _ = write!(out, "{px} {py} {px} {py} {px} {py} 0.0 ");

        let members = seq_at(party, 10);
        let _ = write!(out, "{} ", members.len());
        for (j, member) in members.iter().enumerate() {
            let ctx = format!("{name}, member {j}");
            let troop = session.lookup("trp", field(member, 0), &ctx)?;
            let _ = write!(out, "{troop} {} 0 {} ", field(member, 1), field(member, 2));
        }

        if party.len() > 11 {
            let degrees = field(party, 11).as_float().unwrap_or(0.0);
            let radians = (std::f64::consts::PI / 180.0) * degrees;
            let _ = write!(out, "{radians:.7} ");
        } else {
            let _ = write!(out, "0.0 ");
        }

        out.push('\n');
    }

    session.write_file("parties.txt", &out)
}

pub fn write_party_templates(session: &mut Session, items: &[Value]) -> Result<()> {
    let mut out = String::new();
    let _ = writeln!(out, "partytemplatesfile version 1");
    let _ = writeln!(out, "{}", items.len());

    for party_template in items {
        let name = format!("pt_{}", crate::encode::encode_id(str_at(party_template, 0)));
        let _ = write!(out, "{name} ");
        let _ = write!(out, "{} ", encode_str(str_at(party_template, 1)));
        let _ = write!(out, "{} ", field(party_template, 2));

        let menu = session.lookup("menu", field(party_template, 3), &name)?;
        let _ = write!(out, "{menu} ");
        let faction = session.lookup("fac", field(party_template, 4), &name)?;
        let _ = write!(out, "{faction} ");
        let _ = write!(out, "{} ", field(party_template, 5));

        let members = seq_at(party_template, 6);
        let num_members = if members.len() > MAX_PARTY_TEMPLATE_MEMBERS {
            session
                .diagnostics
                .warning("party template member count exceeds 6", Some(name.clone()));
            MAX_PARTY_TEMPLATE_MEMBERS
        } else {
            members.len()
        };

        for (i, member) in members.iter().take(num_members).enumerate() {
            let ctx = format!("{name}, member {i}");
            let troop = session.lookup("trp", field(member, 0), &ctx)?;
            let _ = write!(out, "{troop} {} {} ", field(member, 1), field(member, 2));
            if member.len() > 3 {
                let _ = write!(out, "{} ", field(member, 3));
            } else {
                let _ = write!(out, "0 ");
            }
        }

        for _ in num_members..MAX_PARTY_TEMPLATE_MEMBERS {
            let _ = write!(out, "-1 ");
        }

        out.push('\n');
    }

    session.write_file("party_templates.txt", &out)
}
