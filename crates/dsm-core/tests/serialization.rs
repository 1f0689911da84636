//! Serde round-trips for the value types persistence collaborators encode.

use std::collections::BTreeSet;

use dsm_core::types::{Color, Connection, Grouping, Item};
use uuid::Uuid;

#[test]
fn test_item_round_trips_through_json() {
    let group = Uuid::new_v4();
    let (row, _col) = Item::new_pair("gearbox", 2.0, group);
    let json = serde_json::to_string(&row).unwrap();
    let back: Item = serde_json::from_str(&json).unwrap();
    assert_eq!(back, row);
}

#[test]
fn test_connection_round_trips_through_json() {
    let mut interfaces = BTreeSet::new();
    interfaces.insert(Uuid::new_v4());
    let conn = Connection::new(Uuid::new_v4(), Uuid::new_v4(), "torque", 3.5, interfaces);
    let json = serde_json::to_string(&conn).unwrap();
    let back: Connection = serde_json::from_str(&json).unwrap();
    assert_eq!(back, conn);
}

#[test]
fn test_grouping_round_trips_through_json() {
    let g = Grouping::new("power train", Color::from_hsb(0.6, 0.5, 0.95), Color::BLACK, 4);
    let json = serde_json::to_string(&g).unwrap();
    let back: Grouping = serde_json::from_str(&json).unwrap();
    assert_eq!(back, g);
}
