// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::store;
use crate::utils::{parse_currency, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let code = parse_currency(sub.get_one::<String>("code").unwrap())?;
            let name = sub.get_one::<String>("name").unwrap().trim();
            store::add_currency(conn, &code, name)?;
            println!("Added currency {} ({})", code, name);
        }
        Some(("list", _)) => {
            let data = store::list_currencies(conn)?
                .into_iter()
                .map(|c| vec![c.code, c.name])
                .collect();
            println!("{}", pretty_table(&["Code", "Name"], data));
        }
        _ => {}
    }
    Ok(())
}
