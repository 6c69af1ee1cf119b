#![allow(clippy::unwrap_used)]
// Integration tests for `TelemetryClient` against a scripted fetcher.

use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

use element_api::testing::{CallKind, ScriptedFetch};
use element_core::{
    CoreError, PacketType, PacketsQuery, ReadingsQuery, SensorId, TelemetryClient, Timestamp,
};

const FOLDER: &str = "stadt-dortmund-klimasensoren-aktiv-sht35";

// ── Fixtures ────────────────────────────────────────────────────────

fn device_detail() -> Value {
    json!({
        "body": {
            "id": "503e3ee7-7083-4136-98b8-b2b4b26e1a3f",
            "name": "DEC0054B0",
            "slug": "dec0054b0",
            "tags": [{"id": "t1", "name": "Klimasensoren aktiv SHT35", "slug": FOLDER}],
            "last_readings": [
                {
                    "id": "r2",
                    "measured_at": "2024-08-13T13:11:04.070758Z",
                    "data": {"device_id": 21680, "protocol_version": 2}
                },
                {
                    "id": "r1",
                    "measured_at": "2024-08-13T13:06:03.622052Z",
                    "data": {"device_id": 21680, "protocol_version": 2}
                }
            ]
        },
        "ok": true,
        "status": 200
    })
}

fn device(name: &str) -> Value {
    json!({"id": format!("id-{name}"), "name": name, "slug": name.to_lowercase()})
}

fn single_reading(sensor_id: u64) -> Value {
    json!({
        "body": [{
            "id": "r",
            "device_id": "d",
            "measured_at": "2024-08-13T13:06:03.622052Z",
            "data": {"device_id": sensor_id, "air_temperature": 37.2}
        }],
        "ok": true,
        "status": 200
    })
}

fn short_readings() -> Value {
    json!([
        {
            "id": "a",
            "device_id": "d",
            "measured_at": "2024-08-13T13:06:03.622052Z",
            "data": {
                "air_humidity": 34.934005,
                "air_temperature": 37.200732,
                "battery_voltage": 3.095,
                "device_id": 21670,
                "protocol_version": 2
            }
        },
        {
            "id": "b",
            "device_id": "d",
            "measured_at": "2024-08-13T13:11:04.070758Z",
            "data": {
                "air_humidity": 38.171969,
                "air_temperature": 35.350195,
                "battery_voltage": 3.095,
                "device_id": 21670,
                "protocol_version": 2
            }
        }
    ])
}

fn ndjson(records: &Value) -> String {
    records
        .as_array()
        .unwrap()
        .iter()
        .map(|r| format!("{r}\n"))
        .collect()
}

fn window() -> (Option<Timestamp>, Option<Timestamp>) {
    let day = NaiveDate::from_ymd_opt(2024, 8, 13).unwrap();
    (
        Some(day.and_hms_opt(13, 5, 0).unwrap().into()),
        Some(day.and_hms_opt(13, 15, 0).unwrap().into()),
    )
}

fn pairs(query: &element_api::Query) -> Vec<(&str, &str)> {
    query.pairs().iter().map(|(k, v)| (*k, v.as_str())).collect()
}

// ── id_from_address ─────────────────────────────────────────────────

#[test]
fn id_from_address_not_cached() {
    let mut client = TelemetryClient::new(ScriptedFetch::new().page(device_detail()));
    assert!(client.cache().is_empty());

    let id = client.id_from_address("DEC0054B0", Some(FOLDER)).unwrap();
    assert_eq!(id, SensorId(21680));

    let calls = client.fetcher().calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].path, "devices/dec0054b0");
    assert!(calls[0].query.is_empty());
    assert_eq!(client.cache().address(FOLDER, SensorId(21680)), Some("DEC0054B0"));
}

#[test]
fn id_from_address_folder_unknown_uses_first_tag() {
    let mut client = TelemetryClient::new(ScriptedFetch::new().page(device_detail()));

    let id = client.id_from_address("DEC0054B0", None).unwrap();
    assert_eq!(id, SensorId(21680));
    assert_eq!(client.fetcher().call_count(), 1);
    assert_eq!(client.cache().address(FOLDER, SensorId(21680)), Some("DEC0054B0"));
}

#[test]
fn id_from_address_cached_makes_no_request() {
    let mut client = TelemetryClient::new(ScriptedFetch::new());
    client
        .cache_mut()
        .insert(FOLDER, SensorId(21680), "DEC0054B0");

    let id = client.id_from_address("DEC0054B0", Some(FOLDER)).unwrap();
    assert_eq!(id, SensorId(21680));
    assert_eq!(client.fetcher().call_count(), 0);
    assert_eq!(client.cache().len(), 1);
}

#[test]
fn id_from_address_without_readings_fails() {
    let mut client = TelemetryClient::new(ScriptedFetch::new().page(json!({
        "body": {"id": "x", "name": "DEC0054B0", "tags": [{"slug": FOLDER}]}
    })));

    let err = client.id_from_address("DEC0054B0", None).unwrap_err();
    assert!(matches!(err, CoreError::SensorIdMissing { .. }));
    assert!(client.cache().is_empty());
}

// ── address_from_id ─────────────────────────────────────────────────

#[test]
fn address_from_id_not_cached_scans_devices_in_order() {
    let fetch = ScriptedFetch::new()
        .page(json!({
            "body": [device("DEC0054A6")],
            "retrieve_after_id": "435f6eb8-5d22-4b8c-bdce-1830b7438539"
        }))
        .page(json!({"body": [device("DEC0054B0")]}))
        .page(single_reading(21670))
        .page(single_reading(21680));
    let mut client = TelemetryClient::new(fetch);

    let address = client.address_from_id(SensorId(21680), FOLDER).unwrap();
    assert_eq!(address, "DEC0054B0");

    // the station read on the way is cached too
    assert_eq!(client.cache().address(FOLDER, SensorId(21670)), Some("DEC0054A6"));
    assert_eq!(client.cache().address(FOLDER, SensorId(21680)), Some("DEC0054B0"));
    assert_eq!(client.cache().len(), 2);

    let calls = client.fetcher().calls();
    assert_eq!(calls.len(), 4);
    assert_eq!(calls[0].path, format!("tags/{FOLDER}/devices"));
    assert!(calls[0].query.is_empty());
    assert_eq!(calls[1].path, format!("tags/{FOLDER}/devices"));
    assert_eq!(
        pairs(&calls[1].query),
        [("retrieve_after", "435f6eb8-5d22-4b8c-bdce-1830b7438539")]
    );
    let first_reading = [
        ("sort", "measured_at"),
        ("sort_direction", "asc"),
        ("limit", "1"),
    ];
    assert_eq!(calls[2].path, "devices/by-name/DEC0054A6/readings");
    assert_eq!(pairs(&calls[2].query), first_reading);
    assert_eq!(calls[3].path, "devices/by-name/DEC0054B0/readings");
    assert_eq!(pairs(&calls[3].query), first_reading);
}

#[test]
fn address_from_id_cached_makes_no_request() {
    let mut client = TelemetryClient::new(ScriptedFetch::new());
    client
        .cache_mut()
        .insert(FOLDER, SensorId(21680), "DEC0054B0");

    let address = client.address_from_id(SensorId(21680), FOLDER).unwrap();
    assert_eq!(address, "DEC0054B0");
    assert_eq!(client.fetcher().call_count(), 0);
}

#[test]
fn address_from_id_unable_to_find_station() {
    let fetch = ScriptedFetch::new()
        .records(json!([device("DEC0054A6"), device("DEC0054B0")]))
        .page(single_reading(21670))
        .page(single_reading(21680));
    let mut client = TelemetryClient::new(fetch);

    let err = client
        .address_from_id(SensorId(1_233_456_789), FOLDER)
        .unwrap_err();
    assert_eq!(client.fetcher().call_count(), 3);
    assert_eq!(
        err.to_string(),
        "unable to find address for station: 1233456789"
    );
}

#[test]
fn address_from_id_skips_devices_without_readings() {
    let fetch = ScriptedFetch::new()
        .records(json!([device("DEC0054A6"), device("DEC0054B0")]))
        .records(json!([]))
        .page(single_reading(21680));
    let mut client = TelemetryClient::new(fetch);

    let address = client.address_from_id(SensorId(21680), FOLDER).unwrap();
    assert_eq!(address, "DEC0054B0");
    assert_eq!(client.cache().len(), 1);
}

// ── Cache round trips ───────────────────────────────────────────────

#[test]
fn id_lookup_warms_address_lookup() {
    let mut client = TelemetryClient::new(ScriptedFetch::new().page(device_detail()));

    let id = client.id_from_address("DEC0054B0", Some(FOLDER)).unwrap();
    let address = client.address_from_id(id, FOLDER).unwrap();
    let again = client.id_from_address(&address, Some(FOLDER)).unwrap();

    assert_eq!(id, SensorId(21680));
    assert_eq!(address, "DEC0054B0");
    assert_eq!(again, id);
    assert_eq!(client.fetcher().call_count(), 1);
}

#[test]
fn address_lookup_warms_id_lookup() {
    let fetch = ScriptedFetch::new()
        .records(json!([device("DEC0054A6"), device("DEC0054B0")]))
        .page(single_reading(21670))
        .page(single_reading(21680));
    let mut client = TelemetryClient::new(fetch);

    let address = client.address_from_id(SensorId(21680), FOLDER).unwrap();
    assert_eq!(client.fetcher().call_count(), 3);

    // both ids seen while probing resolve without another request
    assert_eq!(
        client.id_from_address(&address, Some(FOLDER)).unwrap(),
        SensorId(21680)
    );
    assert_eq!(
        client.id_from_address("DEC0054A6", Some(FOLDER)).unwrap(),
        SensorId(21670)
    );
    assert_eq!(client.fetcher().call_count(), 3);
    assert_eq!(client.fetcher().remaining(), 0);
}

// ── Folders & devices ───────────────────────────────────────────────

#[test]
fn folder_slugs_are_paginated() {
    let fetch = ScriptedFetch::new()
        .page(json!({
            "body": [
                {"id": "1", "name": "Lager", "slug": "dew21-service-button-lager"},
                {"id": "2", "name": "Erlebnisroute", "slug": "stadt-dortmund-erlebnisroute-lager"}
            ],
            "retrieve_after_id": "0a2eacc2-eb3c-4b44-a9c8-cff9411747ac"
        }))
        .page(json!({
            "body": [{"id": "3", "name": "Aktiv", "slug": FOLDER}]
        }));
    let client = TelemetryClient::new(fetch);

    let slugs = client.folder_slugs().unwrap();
    assert_eq!(
        slugs,
        [
            "dew21-service-button-lager",
            "stadt-dortmund-erlebnisroute-lager",
            FOLDER,
        ]
    );

    let calls = client.fetcher().calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].path, "tags");
    assert_eq!(
        calls[1].query.get("retrieve_after"),
        Some("0a2eacc2-eb3c-4b44-a9c8-cff9411747ac")
    );
}

#[test]
fn device_addresses_in_listing_order() {
    let client = TelemetryClient::new(
        ScriptedFetch::new().records(json!([device("DEC0054A6"), device("DEC0054B0")])),
    );
    assert_eq!(
        client.device_addresses(FOLDER).unwrap(),
        ["DEC0054A6", "DEC0054B0"]
    );
}

#[test]
fn devices_object_body_with_cursor_is_rejected() {
    let fetch = ScriptedFetch::new()
        .page(json!({"body": {}, "retrieve_after_id": "sth"}))
        .page(json!({"body": {}}));
    let client = TelemetryClient::new(fetch);

    let err = client.devices(FOLDER, None).unwrap_err();
    assert_eq!(
        err.to_string(),
        "cannot handle pagination when `body` is not an array"
    );
    assert_eq!(client.fetcher().call_count(), 2);
}

// ── Readings ────────────────────────────────────────────────────────

#[test]
fn readings_raw_format() {
    let client = TelemetryClient::new(ScriptedFetch::new().records(short_readings()));
    let (after, before) = window();

    let env = client
        .readings(&ReadingsQuery::device("DEC0054A6").between(after, before))
        .unwrap();
    assert_eq!(env.body, short_readings());

    let calls = client.fetcher().calls();
    assert_eq!(calls[0].path, "devices/by-name/DEC0054A6/readings");
    assert_eq!(
        pairs(&calls[0].query),
        [
            ("sort", "measured_at"),
            ("sort_direction", "asc"),
            ("limit", "100"),
            ("after", "2024-08-13T13:05:00"),
            ("before", "2024-08-13T13:15:00"),
        ]
    );
}

#[test]
fn typed_readings() {
    let client = TelemetryClient::new(ScriptedFetch::new().records(short_readings()));
    let readings = client
        .get_readings(&ReadingsQuery::device("DEC0054A6"))
        .unwrap();

    assert_eq!(readings.len(), 2);
    assert_eq!(readings[0].sensor_id(), Some(SensorId(21670)));
    assert_eq!(readings[1].value("air_humidity"), Some(38.171969));
}

#[test]
fn readings_streamed_match_paged_shape() {
    let client = TelemetryClient::new(ScriptedFetch::new().stream(ndjson(&short_readings())));
    let (after, before) = window();

    let env = client
        .readings(
            &ReadingsQuery::device("DEC0054A6")
                .between(after, before)
                .streamed(None),
        )
        .unwrap();
    assert_eq!(env.body, short_readings());

    let calls = client.fetcher().calls();
    assert_eq!(calls[0].kind, CallKind::Stream);
    assert_eq!(calls[0].path, "devices/by-name/DEC0054A6/readings/stream");
    assert_eq!(
        pairs(&calls[0].query),
        [
            ("sort", "measured_at"),
            ("sort_direction", "asc"),
            ("after", "2024-08-13T13:05:00"),
            ("before", "2024-08-13T13:15:00"),
        ]
    );
}

#[test]
fn readings_streamed_no_data() {
    let client = TelemetryClient::new(ScriptedFetch::new().stream(""));
    let env = client
        .readings(&ReadingsQuery::device("DEC0054A6").streamed(None))
        .unwrap();
    assert_eq!(
        serde_json::to_value(&env).unwrap(),
        json!({"body": [], "ok": true, "status": 200})
    );
}

#[test]
fn readings_streamed_timeout() {
    let stream = format!(
        "{}{}\n",
        ndjson(&short_readings()),
        json!({"ok": false, "status": 504, "body": "timeout"})
    );
    let client = TelemetryClient::new(ScriptedFetch::new().stream(stream));

    let err = client
        .readings(&ReadingsQuery::device("DEC0054A6").streamed(Some(250)))
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Database timeout. Try allowing more time by using the timeout query param \
         (in milliseconds). Current timeout: 250."
    );
    assert_eq!(err.status(), Some(504));
    assert_eq!(
        client.fetcher().calls()[0].query.get("timeout"),
        Some("250")
    );
}

// ── Packets ─────────────────────────────────────────────────────────

fn packets() -> Value {
    json!([
        {
            "id": "p1",
            "device_id": "d",
            "packet_type": "up",
            "transceived_at": "2024-08-13T13:06:03.622052Z",
            "payload_encoded": "0254A60003783F596E0C17",
            "meta": {"frame_port": 1}
        }
    ])
}

#[test]
fn packets_by_device() {
    let client = TelemetryClient::new(ScriptedFetch::new().records(packets()));
    let (after, before) = window();

    let env = client
        .packets(
            &PacketsQuery::device("DEC0054A6")
                .packet_type(Some(PacketType::Up))
                .between(after, before),
        )
        .unwrap();
    assert_eq!(env.body, packets());

    let calls = client.fetcher().calls();
    assert_eq!(calls[0].path, "devices/by-name/DEC0054A6/packets");
    assert_eq!(
        pairs(&calls[0].query),
        [
            ("limit", "100"),
            ("packet_type", "up"),
            ("after", "2024-08-13T13:05:00"),
            ("before", "2024-08-13T13:15:00"),
        ]
    );
}

#[test]
fn packets_by_folder_streamed() {
    let client = TelemetryClient::new(ScriptedFetch::new().stream(ndjson(&packets())));
    let (after, before) = window();

    let env = client
        .packets(
            &PacketsQuery::folder(FOLDER)
                .packet_type(Some(PacketType::Up))
                .between(after, before)
                .streamed(None),
        )
        .unwrap();
    assert_eq!(env.body, packets());

    let calls = client.fetcher().calls();
    assert_eq!(calls[0].path, format!("tags/{FOLDER}/packets/stream"));
    assert_eq!(
        pairs(&calls[0].query),
        [
            ("packet_type", "up"),
            ("after", "2024-08-13T13:05:00"),
            ("before", "2024-08-13T13:15:00"),
        ]
    );
}

#[test]
fn packets_by_folder_streamed_error() {
    let client = TelemetryClient::new(
        ScriptedFetch::new().stream("{\"ok\": false, \"status\": 504, \"body\": \"timeout\"}\n"),
    );
    let err = client
        .packets(&PacketsQuery::folder(FOLDER).streamed(Some(250)))
        .unwrap_err();

    assert!(err.to_string().ends_with("Current timeout: 250."));
    let calls = client.fetcher().calls();
    assert_eq!(calls[0].path, format!("tags/{FOLDER}/packets/stream"));
    assert_eq!(pairs(&calls[0].query), [("timeout", "250")]);
}

#[test]
fn typed_packets_decode() {
    let client = TelemetryClient::new(ScriptedFetch::new().records(packets()));
    let packets = client
        .get_packets(&PacketsQuery::device("DEC0054A6"))
        .unwrap();

    let decoded = packets[0]
        .decode(element_core::DeviceModel::Sht35, Some(2))
        .unwrap();
    assert_eq!(decoded.device_id(), Some(21670));
}
