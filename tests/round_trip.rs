//! Cross-crate round trips: inventory resources through the core codec.

use serde_json::json;
use tether_core::{FragmentRegistry, Value, decode, encode};
use tether_inventory::{Asset, Measurement, Position, register_defaults};

#[test]
fn asset_survives_the_wire_with_mixed_fragments() {
    let registry = FragmentRegistry::new();
    register_defaults(&registry);

    let mut asset = Asset::of_kind("pump");
    asset.id = Some("42".into());
    asset.name = Some("pump-7".into());
    asset.fragments.set_typed(
        "position",
        Position {
            latitude: 51.2,
            longitude: 6.7,
            altitude: Some(31.0),
        },
    );
    asset.fragments.set("battery", 87);
    asset
        .fragments
        .set("vendor", Value::from(json!({"name": "Acme", "tier": 2})));
    asset
        .fragments
        .set("tags", Value::from(json!(["roof", "north"])));

    let wire = encode(&registry, &asset);
    let back: Asset = decode(&registry, &wire).unwrap();
    assert_eq!(back, asset);

    // And the re-encoded wire content is equivalent.
    assert_eq!(encode(&registry, &back), wire);
}

#[test]
fn registration_decides_typed_versus_generic() {
    let payload = json!({
        "id": "42",
        "position": {"latitude": 51.2, "longitude": 6.7}
    });

    // Without a registration the fragment stays a generic value...
    let bare = FragmentRegistry::new();
    let generic: Asset = decode(&bare, &payload).unwrap();
    assert!(generic.fragments.value("position").is_some());
    assert!(generic.fragments.get_as::<Position>("position").is_none());

    // ...with one, it materializes as the concrete type. Either way the
    // wire content comes back equivalent.
    let registry = FragmentRegistry::new();
    register_defaults(&registry);
    let typed: Asset = decode(&registry, &payload).unwrap();
    assert!(typed.fragments.get_as::<Position>("position").is_some());

    assert_eq!(encode(&bare, &generic), payload);
    assert_eq!(encode(&registry, &typed), payload);
}

#[test]
fn measurement_requires_kind_and_time() {
    let registry = FragmentRegistry::new();
    let err = decode::<Measurement>(&registry, &json!({"time": "2026-05-01T09:00:00Z"}));
    assert!(err.is_err());

    let ok: Measurement = decode(
        &registry,
        &json!({
            "type": "temperature",
            "time": "2026-05-01T09:00:00Z",
            "temperature": {"value": 21.5, "unit": "C"}
        }),
    )
    .unwrap();
    assert_eq!(ok.kind, "temperature");
    assert_eq!(ok.fragments.len(), 1);
}
