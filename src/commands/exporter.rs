// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::path::Path;

use crate::ledger::Ledger;
use crate::ledger::feed::Collection;
use crate::store::{self, Snapshot};
use crate::utils::arg;
use anyhow::{Result, bail};
use serde_json::{Map, Value};

pub fn handle(ledger: &Ledger, m: &clap::ArgMatches) -> Result<()> {
    let what = arg(m, "collection")?;
    let fmt = arg(m, "format")?.to_lowercase();
    let out = arg(m, "out")?;
    let n = export(ledger, what, &fmt, Path::new(out))?;
    println!("Exported {} record(s) of {} to {}", n, what, out);
    Ok(())
}

/// Rows of one collection in their wire (camelCase) shape.
pub fn collection_values(ledger: &Ledger, snap: &Snapshot, c: Collection) -> Result<Vec<Value>> {
    fn rows<T: serde::Serialize>(items: &[T]) -> Result<Vec<Value>> {
        Ok(items
            .iter()
            .map(serde_json::to_value)
            .collect::<Result<_, _>>()?)
    }
    match c {
        Collection::Wallets => rows(&snap.wallets),
        Collection::Meals => rows(&snap.meals),
        Collection::Purchases => rows(&snap.purchases),
        Collection::Incomes => rows(&snap.incomes),
        Collection::Transfers => rows(&snap.transfers),
        Collection::Goals => rows(&snap.goals),
        Collection::GoalDeposits => rows(&snap.goal_deposits),
        Collection::Budgets => rows(&snap.budgets),
        Collection::Categories => rows(&snap.categories),
        Collection::Habits => rows(&snap.habits),
        Collection::Tasks => rows(&snap.tasks),
        Collection::Notes => rows(&snap.notes),
        Collection::Gamify => {
            let profile = store::get_profile(ledger.conn(), ledger.owner())?;
            rows(profile.as_slice())
        }
    }
}

/// Writes `what` (a collection name or `all`) to `out`. Returns the number
/// of records written.
pub fn export(ledger: &Ledger, what: &str, fmt: &str, out: &Path) -> Result<usize> {
    let snap = ledger.snapshot()?;
    if what == "all" {
        if fmt != "json" {
            bail!("Exporting all collections is only supported as json");
        }
        let mut doc = Map::new();
        let mut total = 0;
        for c in Collection::ALL {
            let values = collection_values(ledger, &snap, c)?;
            total += values.len();
            doc.insert(c.name().to_string(), Value::Array(values));
        }
        std::fs::write(out, serde_json::to_string_pretty(&Value::Object(doc))?)?;
        return Ok(total);
    }

    let Some(c) = Collection::from_name(what) else {
        bail!("Unknown collection '{}'", what);
    };
    let values = collection_values(ledger, &snap, c)?;
    match fmt {
        "json" => std::fs::write(out, serde_json::to_string_pretty(&values)?)?,
        "csv" => write_csv(out, &values)?,
        other => bail!("Unknown format: {} (use csv|json)", other),
    }
    Ok(values.len())
}

fn cell(v: &Value) -> String {
    match v {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(cell).collect::<Vec<_>>().join(";"),
        other => other.to_string(),
    }
}

fn write_csv(out: &Path, values: &[Value]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(out)?;
    let headers: Vec<String> = match values.first() {
        Some(Value::Object(first)) => first.keys().cloned().collect(),
        _ => Vec::new(),
    };
    if !headers.is_empty() {
        wtr.write_record(&headers)?;
    }
    for v in values {
        let row: Vec<String> = headers
            .iter()
            .map(|h| v.get(h).map(cell).unwrap_or_default())
            .collect();
        wtr.write_record(&row)?;
    }
    wtr.flush()?;
    Ok(())
}
