// Copyright (c) AlphaVelocity.
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

fn id_arg(name: &'static str) -> Arg {
    Arg::new(name).required(true).value_parser(value_parser!(i64))
}

fn date_arg() -> Arg {
    Arg::new("date")
        .long("date")
        .help("YYYY-MM-DD, defaults to today")
}

/// Optional record fields shared by `tx add`, `tx edit` and `tx reclassify`.
fn record_fields(cmd: Command, wallet_required: bool, amount_required: bool) -> Command {
    cmd.arg(
        Arg::new("wallet")
            .long("wallet")
            .required(wallet_required)
            .value_parser(value_parser!(i64)),
    )
    .arg(Arg::new("amount").long("amount").required(amount_required))
    .arg(date_arg())
    .arg(Arg::new("item").long("item").help("Item (meal/purchase)"))
    .arg(Arg::new("meal-type").long("meal-type").help("Breakfast, Lunch, Dinner, Snack"))
    .arg(Arg::new("category").long("category").help("Purchase category id"))
    .arg(Arg::new("source").long("source").help("Income source"))
}

fn kind_arg() -> Arg {
    Arg::new("kind")
        .required(true)
        .value_parser(["meal", "purchase", "income"])
}

pub fn build_cli() -> Command {
    Command::new("walletwise")
        .about("Personal finance and habit ledger")
        .version(env!("CARGO_PKG_VERSION"))
        .subcommand(Command::new("init").about("Create the database and default categories"))
        .subcommand(
            Command::new("user")
                .about("Select the owner all records belong to")
                .subcommand(Command::new("show"))
                .subcommand(Command::new("switch").arg(Arg::new("owner").required(true))),
        )
        .subcommand(
            Command::new("wallet")
                .about("Wallets and their stored balances")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").required(true))
                        .arg(
                            Arg::new("type")
                                .long("type")
                                .default_value("asset")
                                .value_parser(["asset", "liability"]),
                        )
                        .arg(Arg::new("balance").long("balance").default_value("0")),
                )
                .subcommand(json_flags(Command::new("list")))
                .subcommand(
                    Command::new("rename")
                        .arg(id_arg("id"))
                        .arg(Arg::new("name").required(true)),
                )
                .subcommand(Command::new("rm").arg(id_arg("id"))),
        )
        .subcommand(
            Command::new("category")
                .about("Spending categories")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("label").required(true))
                        .arg(Arg::new("icon").long("icon").default_value("🏷️"))
                        .arg(Arg::new("color").long("color").default_value("#64748b")),
                )
                .subcommand(json_flags(Command::new("list")))
                .subcommand(Command::new("seed").about("Create the default categories if none exist"))
                .subcommand(Command::new("rm").arg(Arg::new("id").required(true))),
        )
        .subcommand(
            Command::new("budget")
                .about("Monthly limits per category")
                .subcommand(
                    Command::new("set")
                        .arg(Arg::new("category").required(true))
                        .arg(Arg::new("limit").required(true)),
                )
                .subcommand(json_flags(Command::new("list")))
                .subcommand(Command::new("rm").arg(Arg::new("category").required(true))),
        )
        .subcommand(
            Command::new("tx")
                .about("Meals, purchases and incomes")
                .subcommand(record_fields(
                    Command::new("add").arg(kind_arg()),
                    true,
                    true,
                ))
                .subcommand(json_flags(
                    Command::new("list")
                        .arg(
                            Arg::new("kind")
                                .long("kind")
                                .value_parser(["meal", "purchase", "income"]),
                        )
                        .arg(Arg::new("month").long("month").help("YYYY-MM"))
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize)),
                        ),
                ))
                .subcommand(record_fields(
                    Command::new("edit").arg(kind_arg()).arg(id_arg("id")),
                    false,
                    false,
                ))
                .subcommand(Command::new("rm").arg(kind_arg()).arg(id_arg("id")))
                .subcommand(record_fields(
                    Command::new("reclassify")
                        .about("Turn a record into another kind")
                        .arg(kind_arg())
                        .arg(id_arg("id"))
                        .arg(
                            Arg::new("to")
                                .long("to")
                                .required(true)
                                .value_parser(["meal", "purchase", "income"]),
                        ),
                    false,
                    false,
                )),
        )
        .subcommand(
            Command::new("transfer")
                .about("Move money between wallets")
                .subcommand(
                    Command::new("add")
                        .arg(
                            Arg::new("from")
                                .long("from")
                                .required(true)
                                .value_parser(value_parser!(i64)),
                        )
                        .arg(
                            Arg::new("to")
                                .long("to")
                                .required(true)
                                .value_parser(value_parser!(i64)),
                        )
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(date_arg()),
                )
                .subcommand(json_flags(Command::new("list")))
                .subcommand(Command::new("rm").arg(id_arg("id"))),
        )
        .subcommand(
            Command::new("goal")
                .about("Savings goals and deposits")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").required(true))
                        .arg(Arg::new("target").long("target").required(true))
                        .arg(Arg::new("saved").long("saved").default_value("0")),
                )
                .subcommand(json_flags(Command::new("list")))
                .subcommand(
                    Command::new("edit")
                        .arg(id_arg("id"))
                        .arg(Arg::new("name").long("name"))
                        .arg(Arg::new("target").long("target")),
                )
                .subcommand(Command::new("rm").arg(id_arg("id")))
                .subcommand(
                    Command::new("deposit")
                        .arg(id_arg("goal"))
                        .arg(
                            Arg::new("wallet")
                                .long("wallet")
                                .required(true)
                                .value_parser(value_parser!(i64)),
                        )
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(date_arg()),
                )
                .subcommand(json_flags(
                    Command::new("deposits").arg(
                        Arg::new("goal")
                            .long("goal")
                            .value_parser(value_parser!(i64)),
                    ),
                ))
                .subcommand(Command::new("undeposit").arg(id_arg("id"))),
        )
        .subcommand(
            Command::new("habit")
                .about("Daily habits")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").required(true))
                        .arg(Arg::new("color").long("color").default_value("#3b82f6")),
                )
                .subcommand(json_flags(Command::new("list")))
                .subcommand(Command::new("toggle").arg(id_arg("id")).arg(date_arg()))
                .subcommand(Command::new("rm").arg(id_arg("id"))),
        )
        .subcommand(
            Command::new("task")
                .about("To-do items")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("title").required(true))
                        .arg(
                            Arg::new("priority")
                                .long("priority")
                                .default_value("medium")
                                .value_parser(["low", "medium", "high"]),
                        )
                        .arg(Arg::new("due").long("due").help("YYYY-MM-DD")),
                )
                .subcommand(json_flags(Command::new("list")))
                .subcommand(Command::new("toggle").arg(id_arg("id")))
                .subcommand(Command::new("rm").arg(id_arg("id"))),
        )
        .subcommand(
            Command::new("note")
                .about("Sticky notes")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("title").required(true))
                        .arg(Arg::new("content").long("content").default_value(""))
                        .arg(Arg::new("color").long("color").default_value("#ffffff")),
                )
                .subcommand(json_flags(Command::new("list")))
                .subcommand(
                    Command::new("edit")
                        .arg(id_arg("id"))
                        .arg(Arg::new("title").long("title"))
                        .arg(Arg::new("content").long("content"))
                        .arg(Arg::new("color").long("color")),
                )
                .subcommand(Command::new("pin").about("Pin or unpin").arg(id_arg("id")))
                .subcommand(Command::new("rm").arg(id_arg("id"))),
        )
        .subcommand(
            Command::new("gamify")
                .about("Points, level, badges and login streak")
                .subcommand(json_flags(Command::new("status"))),
        )
        .subcommand(
            Command::new("report")
                .about("Derived views")
                .subcommand(json_flags(Command::new("balances")))
                .subcommand(json_flags(
                    Command::new("budget").arg(Arg::new("month").long("month").help("YYYY-MM")),
                ))
                .subcommand(json_flags(
                    Command::new("recents").arg(
                        Arg::new("limit")
                            .long("limit")
                            .default_value("10")
                            .value_parser(value_parser!(usize)),
                    ),
                ))
                .subcommand(json_flags(Command::new("stats")))
                .subcommand(json_flags(Command::new("daily"))),
        )
        .subcommand(
            Command::new("export")
                .about("Export collections")
                .arg(
                    Arg::new("collection")
                        .required(true)
                        .help("Collection name, or 'all' (json only)"),
                )
                .arg(
                    Arg::new("format")
                        .long("format")
                        .default_value("json")
                        .value_parser(["csv", "json"]),
                )
                .arg(Arg::new("out").long("out").required(true)),
        )
        .subcommand(json_flags(
            Command::new("doctor").about("Check stored balances against their history"),
        ))
}
