// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::store;
use crate::utils::pretty_table;
use anyhow::Result;
use rusqlite::Connection;
use std::collections::HashMap;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("name").unwrap().trim();
            let typ = sub.get_one::<String>("type").unwrap().trim();
            let icon = sub.get_one::<String>("icon").map(|s| s.trim());
            let type_id = store::id_for_type(conn, typ)?;
            store::add_category(conn, name, icon, type_id)?;
            println!("Added category '{}' ({})", name, typ);
        }
        Some(("list", sub)) => {
            let only_active = sub.get_flag("active");
            let types: HashMap<i64, String> = store::list_types(conn)?
                .into_iter()
                .map(|t| (t.id, t.name))
                .collect();
            let mut data = Vec::new();
            for c in store::list_categories(conn)? {
                if only_active && !c.active {
                    continue;
                }
                data.push(vec![
                    c.name,
                    types.get(&c.type_id).cloned().unwrap_or_default(),
                    c.icon.unwrap_or_default(),
                    if c.active { "yes".into() } else { "no".into() },
                ]);
            }
            println!(
                "{}",
                pretty_table(&["Category", "Type", "Icon", "Active"], data)
            );
        }
        Some(("rm", sub)) => {
            let name = sub.get_one::<String>("name").unwrap().trim();
            store::remove_category(conn, name)?;
            println!("Removed category '{}'", name);
        }
        Some(("activate", sub)) => {
            let name = sub.get_one::<String>("name").unwrap().trim();
            store::set_category_active(conn, name, true)?;
            println!("Category '{}' is active", name);
        }
        Some(("deactivate", sub)) => {
            let name = sub.get_one::<String>("name").unwrap().trim();
            store::set_category_active(conn, name, false)?;
            println!("Category '{}' is inactive", name);
        }
        _ => {}
    }
    Ok(())
}
