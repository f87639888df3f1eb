//! Tests for typed identifiers

use std::collections::BTreeSet;
use std::str::FromStr;

use core_kernel::{ClaimId, CompanyId, DistrictId, LineItemId};
use uuid::Uuid;

#[test]
fn test_display_carries_prefix() {
    let uuid = Uuid::nil();
    assert_eq!(
        ClaimId::from_uuid(uuid).to_string(),
        "CLM-00000000-0000-0000-0000-000000000000"
    );
    assert!(LineItemId::new().to_string().starts_with("ITEM-"));
    assert!(CompanyId::new().to_string().starts_with("CMP-"));
    assert!(DistrictId::new().to_string().starts_with("DST-"));
}

#[test]
fn test_parse_accepts_prefixed_and_bare_forms() {
    let id = CompanyId::new();
    let bare = id.as_uuid().to_string();

    assert_eq!(CompanyId::from_str(&id.to_string()).unwrap(), id);
    assert_eq!(CompanyId::from_str(&bare).unwrap(), id);
    assert_eq!(CompanyId::from_str(&format!("  {}  ", bare)).unwrap(), id);
}

#[test]
fn test_parse_rejects_garbage() {
    assert!(ClaimId::from_str("CLM-not-a-uuid").is_err());
    assert!(ClaimId::from_str("").is_err());
}

#[test]
fn test_ids_order_by_uuid() {
    let low = DistrictId::from_uuid(Uuid::from_u128(1));
    let high = DistrictId::from_uuid(Uuid::from_u128(2));
    let set: BTreeSet<_> = [high, low].into_iter().collect();

    assert_eq!(set.into_iter().collect::<Vec<_>>(), vec![low, high]);
}

#[test]
fn test_serde_is_transparent_uuid() {
    let id = LineItemId::new();
    let json = serde_json::to_string(&id).unwrap();

    assert_eq!(json, format!("\"{}\"", id.as_uuid()));
    assert_eq!(serde_json::from_str::<LineItemId>(&json).unwrap(), id);
}
