// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, value_parser};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print one JSON object per line"),
    )
}

fn required(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name).long(name).required(true).help(help)
}

fn optional(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name).long(name).help(help)
}

pub fn build_cli() -> Command {
    Command::new("billfold")
        .about("Recurring income/expense tracker with a multi-currency monthly budget dashboard")
        .version(clap::crate_version!())
        .subcommand(Command::new("init").about("Create the database"))
        .subcommand(
            Command::new("currency")
                .about("Manage currencies")
                .subcommand(
                    Command::new("add")
                        .arg(required("code", "Three-letter code, e.g. PHP"))
                        .arg(required("name", "Display name")),
                )
                .subcommand(Command::new("list")),
        )
        .subcommand(
            Command::new("type")
                .about("Manage category types (Income, Expense)")
                .subcommand(Command::new("add").arg(required("name", "Type name")))
                .subcommand(Command::new("list")),
        )
        .subcommand(
            Command::new("category")
                .about("Manage categories")
                .subcommand(
                    Command::new("add")
                        .arg(required("name", "Category name"))
                        .arg(required("type", "Income or Expense"))
                        .arg(optional("icon", "Icon name")),
                )
                .subcommand(
                    Command::new("list").arg(
                        Arg::new("active")
                            .long("active")
                            .action(ArgAction::SetTrue)
                            .help("Only active categories"),
                    ),
                )
                .subcommand(Command::new("rm").arg(required("name", "Category name")))
                .subcommand(Command::new("activate").arg(required("name", "Category name")))
                .subcommand(Command::new("deactivate").arg(required("name", "Category name"))),
        )
        .subcommand(
            Command::new("tx")
                .about("Planned income and expenses")
                .subcommand(
                    Command::new("add")
                        .arg(required("name", "Display name"))
                        .arg(required("category", "Category name"))
                        .arg(required("currency", "Currency code"))
                        .arg(required("amount", "Amount per month"))
                        .arg(required("start", "Start date YYYY-MM-DD"))
                        .arg(optional("end", "End date YYYY-MM-DD (recurring only)"))
                        .arg(
                            Arg::new("recurring")
                                .long("recurring")
                                .action(ArgAction::SetTrue)
                                .help("Repeat monthly from start to end"),
                        ),
                )
                .subcommand(json_flags(
                    Command::new("list").arg(optional("month", "Only transactions active in YYYY-MM")),
                ))
                .subcommand(
                    Command::new("exclude")
                        .about("Skip one month of a recurring transaction")
                        .arg(required("id", "Transaction id").value_parser(value_parser!(i64)))
                        .arg(required("month", "YYYY-MM")),
                )
                .subcommand(
                    Command::new("rm")
                        .arg(required("id", "Transaction id").value_parser(value_parser!(i64))),
                ),
        )
        .subcommand(
            Command::new("pay")
                .about("Record payments against expenses")
                .subcommand(
                    Command::new("set")
                        .arg(required("tx", "Transaction id").value_parser(value_parser!(i64)))
                        .arg(required("date", "Payment date YYYY-MM-DD"))
                        .arg(required("amount", "Amount paid"))
                        .arg(optional("currency", "Defaults to the transaction currency")),
                )
                .subcommand(json_flags(
                    Command::new("list").arg(optional("month", "Only payments settling YYYY-MM")),
                ))
                .subcommand(
                    Command::new("rm")
                        .arg(required("id", "Payment id").value_parser(value_parser!(i64))),
                ),
        )
        .subcommand(
            Command::new("fx")
                .about("Exchange-rate snapshots")
                .subcommand(
                    Command::new("set-display")
                        .arg(required("currency", "Default dashboard currency")),
                )
                .subcommand(
                    Command::new("add")
                        .about("Store a new snapshot")
                        .arg(required("base", "Pivot currency"))
                        .arg(
                            Arg::new("rate")
                                .long("rate")
                                .required(true)
                                .action(ArgAction::Append)
                                .help("CODE=RATE, units of CODE per 1 base; repeatable"),
                        )
                        .arg(optional("at", "Timestamp RFC3339 (default now)")),
                )
                .subcommand(
                    Command::new("import")
                        .about("Store a snapshot from a JSON file")
                        .arg(required("file", "Path to JSON {base, rates, fetched_at?}")),
                )
                .subcommand(
                    Command::new("list").arg(
                        Arg::new("limit")
                            .long("limit")
                            .value_parser(value_parser!(usize))
                            .help("Number of snapshots"),
                    ),
                )
                .subcommand(
                    Command::new("convert")
                        .arg(required("amount", "Amount"))
                        .arg(required("from", "Source currency"))
                        .arg(required("to", "Target currency")),
                ),
        )
        .subcommand(json_flags(
            Command::new("dashboard")
                .about("Monthly budget dashboard")
                .arg(required("month", "YYYY-MM"))
                .arg(optional("currency", "Display currency (default from settings)")),
        ))
        .subcommand(
            Command::new("export")
                .about("Export data")
                .subcommand(
                    Command::new("dashboard")
                        .arg(required("month", "YYYY-MM"))
                        .arg(optional("currency", "Display currency (default from settings)"))
                        .arg(required("format", "csv|json"))
                        .arg(required("out", "Output path")),
                ),
        )
        .subcommand(Command::new("doctor").about("Check data quality"))
}
