// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

mod common;

use common::*;
use serde_json::json;
use tempfile::tempdir;
use walletwise::cli;
use walletwise::commands::{exporter, planner};
use walletwise::models::WalletType;

#[test]
fn export_meals_uses_wire_field_names() {
    let mut l = ledger();
    let w = wallet(&mut l, "Cash", WalletType::Asset, "0");
    l.add_meal(meal(w, "12.34", "2025-01-02")).unwrap();

    let dir = tempdir().unwrap();
    let out_path = dir.path().join("meals.json");
    let out_str = out_path.to_string_lossy().to_string();

    let matches = cli::build_cli().get_matches_from([
        "walletwise",
        "export",
        "meals",
        "--format",
        "json",
        "--out",
        &out_str,
    ]);
    if let Some(("export", export_m)) = matches.subcommand() {
        exporter::handle(&l, export_m).unwrap();
    } else {
        panic!("no export subcommand");
    }

    let contents = std::fs::read_to_string(&out_path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(
        parsed,
        json!([
            {
                "id": 1,
                "ownerId": "alice",
                "walletId": w,
                "date": "2025-01-02",
                "amount": "12.34",
                "mealType": "Lunch",
                "item": "Thali"
            }
        ])
    );
}

#[test]
fn export_habits_as_csv_joins_dates() {
    let mut l = ledger();
    let h = l.add_habit("Walk", "#10b981").unwrap();
    let today = day("2025-01-05");
    l.toggle_habit(h, day("2025-01-04"), today).unwrap();
    l.toggle_habit(h, today, today).unwrap();

    let dir = tempdir().unwrap();
    let out = dir.path().join("habits.csv");
    let n = exporter::export(&l, "habits", "csv", &out).unwrap();
    assert_eq!(n, 1);

    let mut rdr = csv::Reader::from_path(&out).unwrap();
    let headers = rdr.headers().unwrap().clone();
    let row = rdr.records().next().unwrap().unwrap();
    let dates_idx = headers.iter().position(|h| h == "completedDates").unwrap();
    assert_eq!(&row[dates_idx], "2025-01-04;2025-01-05");
}

#[test]
fn export_all_is_json_only_and_unknown_collections_fail() {
    let l = ledger();
    let dir = tempdir().unwrap();
    let out = dir.path().join("all.csv");
    assert!(exporter::export(&l, "all", "csv", &out).is_err());
    assert!(exporter::export(&l, "envelopes", "json", &out).is_err());
    assert!(!out.exists());

    let json_out = dir.path().join("all.json");
    exporter::export(&l, "all", "json", &json_out).unwrap();
    let parsed: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&json_out).unwrap()).unwrap();
    assert!(parsed["goal_deposits"].as_array().unwrap().is_empty());
    assert!(parsed.get("gamify").is_some());
}

#[test]
fn export_notes_through_the_cli() {
    let mut l = ledger();
    let matches = cli::build_cli().get_matches_from([
        "walletwise",
        "note",
        "add",
        "Trip",
        "--content",
        "pack charger",
        "--color",
        "#bfdbfe",
    ]);
    if let Some(("note", note_m)) = matches.subcommand() {
        planner::handle_note(&mut l, note_m).unwrap();
    } else {
        panic!("no note subcommand");
    }
    let id = l.snapshot().unwrap().notes[0].id;
    l.toggle_note_pin(id).unwrap();

    let dir = tempdir().unwrap();
    let out = dir.path().join("notes.json");
    assert_eq!(exporter::export(&l, "notes", "json", &out).unwrap(), 1);
    let parsed: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(
        parsed,
        json!([
            {
                "id": id,
                "ownerId": "alice",
                "title": "Trip",
                "content": "pack charger",
                "color": "#bfdbfe",
                "pinned": true
            }
        ])
    );
}
