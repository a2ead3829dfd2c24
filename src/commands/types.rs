// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::store;
use crate::utils::pretty_table;
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("name").unwrap().trim();
            store::add_type(conn, name)?;
            println!("Added type '{}'", name);
        }
        Some(("list", _)) => {
            let data = store::list_types(conn)?
                .into_iter()
                .map(|t| {
                    let role = match t.kind() {
                        Some(k) => format!("{:?}", k),
                        None => "(ignored)".to_string(),
                    };
                    vec![t.name, role]
                })
                .collect();
            println!("{}", pretty_table(&["Type", "Dashboard role"], data));
        }
        _ => {}
    }
    Ok(())
}
