// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn row(oid: &str) -> TrapRow {
    TrapRow {
        timestamp: "2024-01-15 10:20:30".to_string(),
        source: "10.0.0.1".to_string(),
        oid: oid.to_string(),
        generic_type: 1,
        value: String::new(),
        custom_oid: "y".to_string(),
        custom_value: String::new(),
        custom_type: String::new(),
        unix_time: 1_700_000_000,
    }
}

#[tokio::test]
async fn insert_returns_a_generated_id() {
    let store = SqliteTrapStore::open_in_memory().unwrap();
    let id = store.insert(row(".1.3.6.1.6.3.1.1.5.2")).await.unwrap();
    assert_eq!(id, "1");
}

#[tokio::test]
async fn inserts_are_independent_and_get_distinct_ids() {
    let store = SqliteTrapStore::open_in_memory().unwrap();
    let id1 = store.insert(row(".1")).await.unwrap();
    let id2 = store.insert(row(".2")).await.unwrap();
    assert_ne!(id1, id2);
}
