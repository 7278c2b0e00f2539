#![allow(clippy::unwrap_used)]
// Integration tests for `GaggiuinoApi` using wiremock.

use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use wiremock::matchers::{body_json, body_string, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use gaggiuino_api::models::{
    BoilerSettings, DisplaySettings, LedSettings, ReleaseChannel, ScalesSettings, SystemSettings,
    ThemeSettings, Versions,
};
use gaggiuino_api::{
    Error, FirmwareState, GaggiuinoApi, Profile, SettingsCategory, SettingsRecord, TransportConfig,
};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, GaggiuinoApi) {
    let server = MockServer::start().await;
    let api = GaggiuinoApi::new(&server.uri(), TransportConfig::default()).unwrap();
    api.connect().unwrap();
    (server, api)
}

async fn mount_get(server: &MockServer, route: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

fn status_body() -> Value {
    json!([{
        "upTime": "89107",
        "profileId": "7",
        "profileName": "OFF",
        "targetTemperature": "15.000000",
        "temperature": "22.500000",
        "pressure": "-0.028054",
        "waterLevel": "100",
        "weight": "0.000000",
        "brewSwitchState": "false",
        "steamSwitchState": "true"
    }])
}

fn profiles_body() -> Value {
    json!([
        {
            "id": 1,
            "name": "Espresso",
            "selected": true,
            "globalStopConditions": { "weight": 36 },
            "phases": [{ "type": "PRESSURE", "target": { "curve": "INSTANT", "end": 9 } }],
            "recipe": {},
            "waterTemperature": 93
        },
        { "id": 2, "name": "Lungo", "selected": false }
    ])
}

fn boiler_body(steam_set_point: i64) -> Value {
    json!({
        "steamSetPoint": steam_set_point,
        "offsetTemp": 5,
        "hpwr": 1200,
        "mainDivider": 2,
        "brewDivider": 4,
        "brewDeltaState": "true",
        "dreamSteamState": "false",
        "startupHeatDelta": 10
    })
}

fn settings_body() -> Value {
    json!({
        "boiler": boiler_body(145),
        "system": {
            "pumpFlowAtZero": 0.5,
            "timezoneOffsetMinutes": -300,
            "sprofilerToken": "abc123xyz",
            "visualizerToken": "def456uvw",
            "servicesState": true,
            "wifiEnabled": true,
            "releaseChannel": 0
        },
        "led": {
            "color": { "R": 255, "G": 128, "B": 0 },
            "state": "true",
            "disco": "false",
            "tof": { "max": 100, "min": 10 }
        },
        "scales": {
            "forcePredictive": "false",
            "hwScalesEnabled": "true",
            "hwScalesF1": 1000,
            "hwScalesF2": 2000,
            "btScalesEnabled": "false",
            "btScalesAutoConnect": "false"
        },
        "display": { "lcdBrightness": 80, "lcdDarkMode": "false", "lcdSleep": 10, "lcdGoHome": 5 },
        "theme": { "colourPrimary": 31, "colourSecondary": 63488 },
        "versions": { "coreVersion": "a06f97fd", "frontVersion": "a06f97fd", "staticVersion": "a06f97fd" }
    })
}

/// Serve `category` from the aggregate fixture and expect exactly one POST
/// of `written` back to the same route.
async fn mount_category(server: &MockServer, category: &str, written: Value) {
    let route = format!("/api/settings/{category}");
    mount_get(server, &route, settings_body()[category].clone()).await;
    Mock::given(method("POST"))
        .and(path(route.as_str()))
        .and(header("content-type", "application/json"))
        .and(body_json(written))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(server)
        .await;
}

/// A loopback address nothing is listening on.
fn dead_address() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

// ── Profiles ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_get_profiles() {
    let (server, api) = setup().await;
    mount_get(&server, "/api/profiles/all", profiles_body()).await;

    let profiles = api.get_profiles().await.unwrap().unwrap();

    assert_eq!(profiles.len(), 2);
    assert_eq!(profiles[0].id, 1);
    assert_eq!(profiles[0].selected, Some(true));
    assert_eq!(profiles[0].water_temperature, Some(93));
    assert_eq!(profiles[1].selected, Some(false));
}

#[tokio::test]
async fn test_current_profile_from_list_then_status() {
    let (server, api) = setup().await;
    mount_get(&server, "/api/profiles/all", profiles_body()).await;
    mount_get(&server, "/api/system/status", status_body()).await;

    assert_eq!(api.current_profile(), None);

    api.get_profiles().await.unwrap();
    assert_eq!(api.current_profile().unwrap().name, "Espresso");

    api.get_status().await.unwrap();
    let current = api.current_profile().unwrap();
    assert_eq!(current.id, 7);
    assert_eq!(current.name, "OFF");
    assert_eq!(current.selected, Some(true));
}

#[tokio::test]
async fn test_select_profile_posts_form() {
    let (server, api) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/profile-select/4"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .respond_with(ResponseTemplate::new(200))
        .expect(2)
        .mount(&server)
        .await;

    assert!(api.select_profile(4_u32).await.unwrap());
    let profile = Profile::new(4, "Ristretto");
    assert!(api.select_profile(&profile).await.unwrap());
}

#[tokio::test]
async fn test_delete_profile() {
    let (server, api) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/api/profile-select/9"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    assert!(api.delete_profile(9_u32).await.unwrap());
}

#[tokio::test]
async fn test_rejected_write_is_false_not_error() {
    let (server, api) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/profile-select/1"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    assert!(!api.select_profile(1_u32).await.unwrap());
}

#[tokio::test]
async fn test_any_2xx_counts_as_success() {
    let (server, api) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/api/profile-select/1"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    assert!(api.delete_profile(1_u32).await.unwrap());
}

// ── Shots & status ──────────────────────────────────────────────────

#[tokio::test]
async fn test_get_latest_shot_id() {
    let (server, api) = setup().await;
    mount_get(&server, "/api/shots/latest", json!([{ "lastShotId": "100" }])).await;

    let latest = api.get_latest_shot_id().await.unwrap().unwrap();
    assert_eq!(latest.last_shot_id, 100);
}

#[tokio::test]
async fn test_latest_shot_empty_list_is_none() {
    let (server, api) = setup().await;
    mount_get(&server, "/api/shots/latest", json!([])).await;

    assert_eq!(api.get_latest_shot_id().await.unwrap(), None);
}

#[tokio::test]
async fn test_get_shot() {
    let (server, api) = setup().await;
    mount_get(
        &server,
        "/api/shots/1",
        json!({
            "id": 1,
            "duration": 648,
            "timestamp": 1_731_316_192,
            "datapoints": { "pressure": [3, 3, 3], "timeInShot": [2, 3, 5] },
            "profile": { "id": 8, "name": "_Long" }
        }),
    )
    .await;

    let shot = api.get_shot(1).await.unwrap().unwrap();
    assert_eq!(shot.duration, 648);
    assert_eq!(shot.datapoints.len(), 3);
    assert_eq!(shot.profile_snapshot().unwrap().name, "_Long");
}

#[tokio::test]
async fn test_null_body_is_none() {
    let (server, api) = setup().await;
    mount_get(&server, "/api/shots/5", Value::Null).await;

    assert_eq!(api.get_shot(5).await.unwrap(), None);
}

#[tokio::test]
async fn test_get_status() {
    let (server, api) = setup().await;
    mount_get(&server, "/api/system/status", status_body()).await;

    let status = api.get_status().await.unwrap().unwrap();
    assert_eq!(status.up_time, 89_107);
    assert_eq!(status.profile_id, 7);
    assert!((status.temperature - 22.5).abs() < f64::EPSILON);
    assert!(!status.brew_switch_state);
    assert!(status.steam_switch_state);
}

#[tokio::test]
async fn test_status_empty_list_is_none() {
    let (server, api) = setup().await;
    mount_get(&server, "/api/system/status", json!([])).await;

    assert_eq!(api.get_status().await.unwrap(), None);
    assert_eq!(api.current_profile(), None);
}

// ── Settings ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_get_settings_aggregate() {
    let (server, api) = setup().await;
    mount_get(&server, "/api/settings", settings_body()).await;

    let settings = api.get_settings().await.unwrap().unwrap();
    assert_eq!(settings.boiler.steam_set_point, 145);
    assert!(settings.led.state);
    assert!(settings.scales.hw_scales_enabled);
    assert!(!settings.display.lcd_dark_mode);
    assert_eq!(settings.versions.front_version, "a06f97fd");
}

#[tokio::test]
async fn test_get_versions() {
    let (server, api) = setup().await;
    mount_get(
        &server,
        "/api/settings/versions",
        json!({ "coreVersion": "a", "frontVersion": "b", "staticVersion": "c" }),
    )
    .await;

    let versions: Versions = api.get_versions().await.unwrap().unwrap();
    assert_eq!(versions.static_version, "c");
}

#[tokio::test]
async fn test_boiler_write_then_read() {
    let (server, api) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/settings/boiler"))
        .respond_with(ResponseTemplate::new(200).set_body_json(boiler_body(145)))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/settings/boiler"))
        .respond_with(ResponseTemplate::new(200).set_body_json(boiler_body(146)))
        .with_priority(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/settings/boiler"))
        .and(header("content-type", "application/json"))
        .and(body_json(boiler_body(146)))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let mut boiler: BoilerSettings = api.get_boiler_settings().await.unwrap().unwrap();
    boiler.steam_set_point += 1;
    assert!(api.update_boiler_settings(&boiler).await.unwrap());

    let reread = api.get_boiler_settings().await.unwrap().unwrap();
    assert_eq!(reread.steam_set_point, boiler.steam_set_point);
    assert_eq!(reread, boiler);
}

#[tokio::test]
async fn test_update_system_settings_body() {
    let (server, api) = setup().await;
    mount_category(
        &server,
        "system",
        json!({
            "pumpFlowAtZero": 0.5,
            "timezoneOffsetMinutes": 60,
            "sprofilerToken": "abc123xyz",
            "visualizerToken": "def456uvw",
            "servicesState": true,
            "wifiEnabled": false,
            "releaseChannel": 1
        }),
    )
    .await;

    let mut system: SystemSettings = api.get_system_settings().await.unwrap().unwrap();
    system.timezone_offset_minutes = 60;
    system.wifi_enabled = false;
    system.release_channel = ReleaseChannel::Test;
    assert!(api.update_system_settings(&system).await.unwrap());
}

#[tokio::test]
async fn test_update_led_settings_body() {
    let (server, api) = setup().await;
    // Served with "true"/"false" strings, written back as JSON booleans.
    mount_category(
        &server,
        "led",
        json!({
            "color": { "R": 0, "G": 128, "B": 0 },
            "state": true,
            "disco": true,
            "tof": { "max": 100, "min": 10 }
        }),
    )
    .await;

    let mut led: LedSettings = api.get_led_settings().await.unwrap().unwrap();
    assert!(led.state);
    led.color.r = 0;
    led.disco = true;
    assert!(api.update_led_settings(&led).await.unwrap());
}

#[tokio::test]
async fn test_update_scales_settings_body() {
    let (server, api) = setup().await;
    mount_category(
        &server,
        "scales",
        json!({
            "forcePredictive": false,
            "hwScalesEnabled": true,
            "hwScalesF1": 1010,
            "hwScalesF2": 2000,
            "btScalesEnabled": true,
            "btScalesAutoConnect": false
        }),
    )
    .await;

    let mut scales: ScalesSettings = api.get_scales_settings().await.unwrap().unwrap();
    scales.hw_scales_f1 = 1010;
    scales.bt_scales_enabled = true;
    assert!(api.update_scales_settings(&scales).await.unwrap());
}

#[tokio::test]
async fn test_update_display_settings_keeps_string_dark_mode() {
    let (server, api) = setup().await;
    mount_category(
        &server,
        "display",
        json!({ "lcdBrightness": 60, "lcdDarkMode": "false", "lcdSleep": 10, "lcdGoHome": 5 }),
    )
    .await;

    let mut display: DisplaySettings = api.get_display_settings().await.unwrap().unwrap();
    display.lcd_brightness = 60;
    assert!(api.update_display_settings(&display).await.unwrap());
}

#[tokio::test]
async fn test_update_theme_settings_body() {
    let (server, api) = setup().await;
    mount_category(
        &server,
        "theme",
        json!({ "colourPrimary": 31, "colourSecondary": 2016 }),
    )
    .await;

    let mut theme: ThemeSettings = api.get_theme_settings().await.unwrap().unwrap();
    theme.colour_secondary = 2016;
    assert!(api.update_theme_settings(&theme).await.unwrap());
}

#[tokio::test]
async fn test_raw_update_is_sent_verbatim() {
    let (server, api) = setup().await;
    let body = json!({ "lcdBrightness": 40, "lcdDarkMode": true, "lcdSleep": 5, "lcdGoHome": 3 });

    Mock::given(method("POST"))
        .and(path("/api/settings/display"))
        .and(body_json(body.clone()))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let ok = api
        .update_category_raw::<DisplaySettings>(body.as_object().unwrap())
        .await
        .unwrap();
    assert!(ok);
    assert_eq!(SettingsCategory::Display.path(), "settings/display");
}

// ── Health & firmware ───────────────────────────────────────────────

#[tokio::test]
async fn test_healthy() {
    let (server, api) = setup().await;
    mount_get(&server, "/api/health", json!({ "status": "ok" })).await;

    assert_eq!(api.get_health().await.unwrap().unwrap()["status"], json!("ok"));
    assert!(api.healthy().await.unwrap());
}

#[tokio::test]
async fn test_unhealthy_status() {
    let (server, api) = setup().await;
    mount_get(&server, "/api/health", json!({ "status": "degraded" })).await;

    assert!(!api.healthy().await.unwrap());
}

#[tokio::test]
async fn test_update_firmware_defaults_to_latest() {
    let (server, api) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/firmware/update-all"))
        .and(body_json(json!({ "version": "latest" })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/firmware/update-all"))
        .and(body_string(r#"{"version":"v1.2.3"}"#))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    assert!(api.update_firmware(None).await.unwrap());
    assert!(api.update_firmware(Some("v1.2.3")).await.unwrap());
}

#[tokio::test]
async fn test_firmware_progress() {
    let (server, api) = setup().await;
    mount_get(
        &server,
        "/api/firmware/progress",
        json!({ "progress": 0, "status": "IDLE", "type": "F_FW" }),
    )
    .await;

    let progress = api.get_firmware_progress().await.unwrap().unwrap();
    assert_eq!(FirmwareState::of(&progress), Some(FirmwareState::Idle));
    assert_eq!(progress["type"], json!("F_FW"));
}

// ── Error classification ────────────────────────────────────────────

#[tokio::test]
async fn test_404_is_endpoint_not_found_everywhere() {
    // Nothing mounted: wiremock answers 404 to every request.
    let (_server, api) = setup().await;

    let results: Vec<(&str, Result<(), Error>)> = vec![
        ("profiles", api.get_profiles().await.map(drop)),
        ("select", api.select_profile(1_u32).await.map(drop)),
        ("delete", api.delete_profile(1_u32).await.map(drop)),
        ("shot", api.get_shot(1).await.map(drop)),
        ("latest", api.get_latest_shot_id().await.map(drop)),
        ("status", api.get_status().await.map(drop)),
        ("settings", api.get_settings().await.map(drop)),
        ("boiler", api.get_boiler_settings().await.map(drop)),
        ("versions", api.get_versions().await.map(drop)),
        ("health", api.get_health().await.map(drop)),
        ("firmware", api.update_firmware(None).await.map(drop)),
        ("progress", api.get_firmware_progress().await.map(drop)),
    ];

    for (name, result) in results {
        match result {
            Err(Error::EndpointNotFound { url }) => assert!(url.contains("/api/"), "{name}: {url}"),
            other => panic!("{name}: expected EndpointNotFound, got {other:?}"),
        }
    }
}

#[tokio::test]
async fn test_connection_refused_is_connection_error() {
    let api = GaggiuinoApi::new(&dead_address(), TransportConfig::default()).unwrap();
    api.connect().unwrap();

    let boiler = BoilerSettings::from_wire(boiler_body(145)).unwrap();
    let results: Vec<(&str, Result<(), Error>)> = vec![
        ("profiles", api.get_profiles().await.map(drop)),
        ("select", api.select_profile(1_u32).await.map(drop)),
        ("delete", api.delete_profile(1_u32).await.map(drop)),
        ("shot", api.get_shot(1).await.map(drop)),
        ("latest", api.get_latest_shot_id().await.map(drop)),
        ("status", api.get_status().await.map(drop)),
        ("settings", api.get_settings().await.map(drop)),
        ("boiler", api.get_boiler_settings().await.map(drop)),
        ("boiler update", api.update_boiler_settings(&boiler).await.map(drop)),
        ("display", api.get_display_settings().await.map(drop)),
        ("versions", api.get_versions().await.map(drop)),
        ("health", api.get_health().await.map(drop)),
        ("healthy", api.healthy().await.map(drop)),
        ("firmware", api.update_firmware(None).await.map(drop)),
        ("progress", api.get_firmware_progress().await.map(drop)),
    ];

    for (name, result) in results {
        let err = result.unwrap_err();
        assert!(
            matches!(err, Error::Connection { .. }),
            "{name}: expected Connection, got {err:?}"
        );
        assert!(err.is_connection());
    }
}

#[tokio::test]
async fn test_slow_response_is_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/system/status"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(status_body())
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let transport = TransportConfig::default().with_timeout(Duration::from_millis(100));
    let api = GaggiuinoApi::new(&server.uri(), transport).unwrap();
    api.connect().unwrap();

    let err = api.get_status().await.unwrap_err();
    assert!(err.is_timeout(), "expected Timeout, got {err:?}");
    assert!(err.is_connection());
}

#[tokio::test]
async fn test_malformed_body_is_unhandled() {
    let (server, api) = setup().await;
    Mock::given(method("GET"))
        .and(path("/api/system/status"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = api.get_status().await.unwrap_err();
    match err {
        Error::Unhandled { kind, .. } => assert!(kind.contains("serde_json"), "{kind}"),
        other => panic!("expected Unhandled, got {other:?}"),
    }
}

#[tokio::test]
async fn test_server_error_on_read_is_unhandled() {
    let (server, api) = setup().await;
    Mock::given(method("GET"))
        .and(path("/api/health"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = api.get_health().await.unwrap_err();
    assert!(matches!(err, Error::Unhandled { .. }), "{err:?}");
    assert!(!err.is_not_found());
}

// ── Session lifecycle ───────────────────────────────────────────────

#[tokio::test]
async fn test_requests_need_an_open_session() {
    let server = MockServer::start().await;
    mount_get(&server, "/api/health", json!({ "status": "ok" })).await;
    let api = GaggiuinoApi::new(&server.uri(), TransportConfig::default()).unwrap();

    let err = api.healthy().await.unwrap_err();
    assert!(matches!(err, Error::Connection { .. }), "{err:?}");

    {
        let session = api.session().unwrap();
        assert!(session.healthy().await.unwrap());
    }

    assert!(!api.is_connected());
    assert!(api.healthy().await.unwrap_err().is_connection());
}

#[tokio::test]
async fn test_external_client_is_kept() {
    let server = MockServer::start().await;
    mount_get(&server, "/api/health", json!({ "status": "ok" })).await;

    let api = GaggiuinoApi::with_client(
        &format!("{}/", server.uri()),
        reqwest::Client::new(),
        TransportConfig::default(),
    )
    .unwrap();

    {
        let session = api.session().unwrap();
        assert!(session.healthy().await.unwrap());
    }

    // The guard only closes clients the instance built itself.
    assert!(api.healthy().await.unwrap());
}
