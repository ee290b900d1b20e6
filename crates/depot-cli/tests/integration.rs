#![allow(deprecated)]
use assert_cmd::Command;
use mockito::Matcher;
use predicates::prelude::*;
use tempfile::TempDir;

fn depot(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("depot").unwrap();
    cmd.current_dir(dir.path())
        .env("DEPOT_ROOT", dir.path())
        .env_remove("DEPOT_API_URL")
        .env_remove("RUST_LOG");
    cmd
}

/// `depot` pointed at a mock inventory API.
fn depot_against(dir: &TempDir, server: &mockito::Server) -> Command {
    let mut cmd = depot(dir);
    cmd.arg("--api-url").arg(format!("{}/api", server.url()));
    cmd
}

fn movement_json(id: u64, status: &str, movement_type: &str, to: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "status": status,
        "movement_type": movement_type,
        "movement_date": format!("2024-03-0{id}T08:00:00Z"),
        "from_location": { "id": 1, "name": "Central Warehouse", "type": "warehouse" },
        "to_location": { "id": 10 + id, "name": to, "type": "site" },
        "moved_by": { "id": 3, "name": "Ada Lovelace" },
        "handled_by": { "id": 4, "name": "Grace Hopper" },
        "logistics_cost": 25.5
    })
}

fn mock_movements(server: &mut mockito::Server) -> mockito::Mock {
    server
        .mock("GET", "/api/equipment-movements")
        .with_header("content-type", "application/json")
        .with_body(
            serde_json::json!({
                "data": [
                    movement_json(1, "pending", "install", "Site North"),
                    movement_json(2, "pending", "swap", "Site South"),
                    movement_json(3, "declined", "retrieve", "Depot East"),
                ]
            })
            .to_string(),
        )
        .create()
}

// ---------------------------------------------------------------------------
// depot init / config
// ---------------------------------------------------------------------------

#[test]
fn init_writes_default_config() {
    let dir = TempDir::new().unwrap();
    depot(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("created: .depot/config.yaml"));

    let raw = std::fs::read_to_string(dir.path().join(".depot/config.yaml")).unwrap();
    let cfg: serde_yaml::Value = serde_yaml::from_str(&raw).unwrap();
    assert_eq!(cfg["api"]["base_url"], "http://localhost:8000/api");
    assert_eq!(cfg["server"]["port"], 3142);
}

#[test]
fn init_is_idempotent() {
    let dir = TempDir::new().unwrap();
    depot(&dir).arg("init").assert().success();
    depot(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("exists:"));
}

#[test]
fn init_records_api_url() {
    let dir = TempDir::new().unwrap();
    depot(&dir)
        .args(["--api-url", "https://inventory.example/api", "init"])
        .assert()
        .success();
    let raw = std::fs::read_to_string(dir.path().join(".depot/config.yaml")).unwrap();
    assert!(raw.contains("https://inventory.example/api"));
}

#[test]
fn config_validate_requires_init() {
    let dir = TempDir::new().unwrap();
    depot(&dir)
        .args(["config", "validate"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("depot init"));
}

#[test]
fn config_validate_flags_bad_url() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir_all(dir.path().join(".depot")).unwrap();
    std::fs::write(
        dir.path().join(".depot/config.yaml"),
        "version: 1\napi:\n  base_url: ftp://inventory\n",
    )
    .unwrap();

    depot(&dir)
        .args(["config", "validate"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("[error]"))
        .stderr(predicate::str::contains("config validation found errors"));
}

#[test]
fn config_show_redacts_token() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir_all(dir.path().join(".depot")).unwrap();
    std::fs::write(
        dir.path().join(".depot/config.yaml"),
        "version: 1\napi:\n  base_url: http://localhost:9000/api\n  token: hunter2\n",
    )
    .unwrap();

    let out = depot(&dir)
        .args(["--json", "config", "show"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(json["api"]["token_set"], true);
    assert!(!String::from_utf8_lossy(&out).contains("hunter2"));
}

// ---------------------------------------------------------------------------
// depot movements
// ---------------------------------------------------------------------------

#[test]
fn movements_list_prints_table() {
    let dir = TempDir::new().unwrap();
    let mut server = mockito::Server::new();
    let mock = mock_movements(&mut server);

    depot_against(&dir, &server)
        .args(["movements", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Site North"))
        .stdout(predicate::str::contains("Depot East"))
        .stdout(predicate::str::contains("complete, decline"));
    mock.assert();
}

#[test]
fn movements_list_filters_and_hides_columns() {
    let dir = TempDir::new().unwrap();
    let mut server = mockito::Server::new();
    mock_movements(&mut server);

    depot_against(&dir, &server)
        .args(["movements", "list", "--type", "swap", "--hide", "moved_by"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Site South"))
        .stdout(predicate::str::contains("Site North").not())
        .stdout(predicate::str::contains("Moved by").not());
}

#[test]
fn movements_list_empty_result_offers_reset() {
    let dir = TempDir::new().unwrap();
    let mut server = mockito::Server::new();
    mock_movements(&mut server);

    depot_against(&dir, &server)
        .args(["movements", "list", "--search", "nowhere"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No movement requests match"));
}

#[test]
fn movements_list_json_is_sorted_snapshot() {
    let dir = TempDir::new().unwrap();
    let mut server = mockito::Server::new();
    mock_movements(&mut server);

    let out = depot_against(&dir, &server)
        .args(["--json", "movements", "list", "--sort", "id", "--desc"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
    let ids: Vec<u64> = json["table"]["rows"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].as_u64().unwrap())
        .collect();
    assert_eq!(ids, vec![3, 2, 1]);
    assert_eq!(json["sort"]["direction"], "desc");
}

#[test]
fn movements_list_rejects_bad_date_before_fetching() {
    let dir = TempDir::new().unwrap();
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/api/equipment-movements")
        .expect(0)
        .create();

    depot_against(&dir, &server)
        .args(["movements", "list", "--date", "5 March"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("expected YYYY-MM-DD"));
    mock.assert();
}

#[test]
fn movements_list_reports_fetch_failure() {
    let dir = TempDir::new().unwrap();
    let mut server = mockito::Server::new();
    server
        .mock("GET", "/api/equipment-movements")
        .with_status(500)
        .with_body("boom")
        .create();

    depot_against(&dir, &server)
        .args(["movements", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to load movements"));
}

#[test]
fn movements_complete_patches_full_record() {
    let dir = TempDir::new().unwrap();
    let mut server = mockito::Server::new();
    mock_movements(&mut server);
    let patch = server
        .mock("PATCH", "/api/equipment-movements/1")
        .match_body(Matcher::PartialJson(serde_json::json!({
            "status": "completed",
            "movement_type": "install",
            "from_location_id": 1,
            "to_location_id": 11,
            "handled_by": 4,
            "moved_by": 3,
            "logistics_cost": 25.5
        })))
        .with_body(movement_json(1, "completed", "install", "Site North").to_string())
        .create();

    depot_against(&dir, &server)
        .args(["movements", "complete", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Movement 1 is now completed"));
    patch.assert();
}

#[test]
fn movements_decline_refuses_terminal_record() {
    let dir = TempDir::new().unwrap();
    let mut server = mockito::Server::new();
    mock_movements(&mut server);
    let patch = server
        .mock("PATCH", Matcher::Regex("^/api/equipment-movements/".into()))
        .expect(0)
        .create();

    depot_against(&dir, &server)
        .args(["movements", "decline", "3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid transition"));
    patch.assert();
}

#[test]
fn movements_complete_surfaces_backend_failure() {
    let dir = TempDir::new().unwrap();
    let mut server = mockito::Server::new();
    mock_movements(&mut server);
    server
        .mock("PATCH", "/api/equipment-movements/2")
        .with_status(409)
        .with_body("already handled")
        .create();

    depot_against(&dir, &server)
        .args(["movements", "complete", "2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already handled"));
}

// ---------------------------------------------------------------------------
// depot equipment / supplier
// ---------------------------------------------------------------------------

#[test]
fn equipment_register_validates_before_sending() {
    let dir = TempDir::new().unwrap();
    let mut server = mockito::Server::new();
    let mock = server.mock("POST", "/api/equipment").expect(0).create();

    depot_against(&dir, &server)
        .args([
            "equipment",
            "register",
            "--name",
            "Generator",
            "--serial",
            "bad serial!",
            "--category",
            "power",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("serial_number"));
    mock.assert();
}

#[test]
fn equipment_register_posts_form() {
    let dir = TempDir::new().unwrap();
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/api/equipment")
        .match_body(Matcher::PartialJson(serde_json::json!({
            "name": "Generator",
            "serial_number": "GEN-42",
            "category": "power",
            "unit_cost": 900.0
        })))
        .with_status(201)
        .with_body(
            serde_json::json!({
                "id": 8,
                "name": "Generator",
                "serial_number": "GEN-42",
                "category": "power",
                "unit_cost": 900.0
            })
            .to_string(),
        )
        .create();

    depot_against(&dir, &server)
        .args([
            "equipment",
            "register",
            "--name",
            "Generator",
            "--serial",
            "GEN-42",
            "--category",
            "power",
            "--unit-cost",
            "900",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Registered equipment [8]"));
    mock.assert();
}

#[test]
fn supplier_list_prints_table() {
    let dir = TempDir::new().unwrap();
    let mut server = mockito::Server::new();
    server
        .mock("GET", "/api/suppliers")
        .with_body(
            serde_json::json!([
                { "id": 1, "name": "Acme", "email": "orders@acme.example", "phone": "+1 555 0100" }
            ])
            .to_string(),
        )
        .create();

    depot_against(&dir, &server)
        .args(["supplier", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Acme"))
        .stdout(predicate::str::contains("orders@acme.example"));
}

#[test]
fn supplier_register_rejects_bad_email() {
    let dir = TempDir::new().unwrap();
    let mut server = mockito::Server::new();
    let mock = server.mock("POST", "/api/suppliers").expect(0).create();

    depot_against(&dir, &server)
        .args(["supplier", "register", "--name", "Acme", "--email", "acme"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("email"));
    mock.assert();
}
