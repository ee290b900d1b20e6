//! The remote inventory REST API, seen through one trait.
//!
//! `HttpBackend` is the production implementation. It is blocking: async
//! hosts call it from `spawn_blocking` and never while holding screen state.

use crate::config::ApiConfig;
use crate::error::{DepotError, Result};
use crate::inventory::{Equipment, NewEquipment, NewSupplier, Supplier};
use crate::movement::Movement;
use crate::mutator::StatusUpdate;
use reqwest::blocking::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

pub const MOVEMENTS_PATH: &str = "/equipment-movements";
pub const EQUIPMENT_PATH: &str = "/equipment";
pub const SUPPLIERS_PATH: &str = "/suppliers";

pub trait InventoryBackend: Send + Sync {
    fn list_movements(&self) -> Result<Vec<Movement>>;

    fn update_movement_status(&self, id: u64, update: &StatusUpdate) -> Result<Movement>;

    fn list_equipment(&self) -> Result<Vec<Equipment>>;

    fn create_equipment(&self, form: &NewEquipment) -> Result<Equipment>;

    fn list_suppliers(&self) -> Result<Vec<Supplier>>;

    fn create_supplier(&self, form: &NewSupplier) -> Result<Supplier>;
}

// ---------------------------------------------------------------------------
// HttpBackend
// ---------------------------------------------------------------------------

/// Responses come either bare or wrapped in `{"data": ...}`.
#[derive(Deserialize)]
#[serde(untagged)]
enum Envelope<T> {
    Wrapped { data: T },
    Bare(T),
}

impl<T> Envelope<T> {
    fn into_inner(self) -> T {
        match self {
            Envelope::Wrapped { data } => data,
            Envelope::Bare(v) => v,
        }
    }
}

#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpBackend {
    pub fn new(cfg: &ApiConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if cfg.timeout_secs > 0 {
            builder = builder.timeout(Duration::from_secs(cfg.timeout_secs));
        } else {
            builder = builder.timeout(None);
        }
        Ok(Self {
            client: builder.build()?,
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            token: cfg.token.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn send<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T> {
        let req = match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        };
        let resp = req.send()?;
        let status = resp.status();
        debug!(status = status.as_u16(), url = %resp.url(), "backend response");
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            return Err(DepotError::Backend {
                status: status.as_u16(),
                body,
            });
        }
        let bytes = resp.bytes()?;
        let envelope: Envelope<T> = serde_json::from_slice(&bytes)?;
        Ok(envelope.into_inner())
    }
}

impl InventoryBackend for HttpBackend {
    fn list_movements(&self) -> Result<Vec<Movement>> {
        self.send(self.client.get(self.url(MOVEMENTS_PATH)))
    }

    fn update_movement_status(&self, id: u64, update: &StatusUpdate) -> Result<Movement> {
        let url = self.url(&format!("{MOVEMENTS_PATH}/{id}"));
        self.send(self.client.patch(url).json(update))
    }

    fn list_equipment(&self) -> Result<Vec<Equipment>> {
        self.send(self.client.get(self.url(EQUIPMENT_PATH)))
    }

    fn create_equipment(&self, form: &NewEquipment) -> Result<Equipment> {
        self.send(self.client.post(self.url(EQUIPMENT_PATH)).json(form))
    }

    fn list_suppliers(&self) -> Result<Vec<Supplier>> {
        self.send(self.client.get(self.url(SUPPLIERS_PATH)))
    }

    fn create_supplier(&self, form: &NewSupplier) -> Result<Supplier> {
        self.send(self.client.post(self.url(SUPPLIERS_PATH)).json(form))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{MovementStatus, MovementType};
    use mockito::Matcher;

    fn movement_json(id: u64, status: &str) -> serde_json::Value {
        serde_json::json!({
            "id": id,
            "status": status,
            "movement_type": "install",
            "movement_date": "2024-03-05T09:30:00Z",
            "from_location": { "id": 1, "name": "Central Warehouse", "type": "warehouse" },
            "to_location": { "id": 2, "name": "Site North", "type": "site" },
            "moved_by": { "id": 3, "name": "Ada" },
            "handled_by": { "id": 4, "name": "Grace" },
            "logistics_cost": 80
        })
    }

    fn backend(server: &mockito::Server) -> HttpBackend {
        HttpBackend::new(&ApiConfig {
            base_url: format!("{}/api/", server.url()),
            timeout_secs: 5,
            token: Some("secret".into()),
        })
        .unwrap()
    }

    #[test]
    fn lists_bare_movement_array() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/api/equipment-movements")
            .match_header("authorization", "Bearer secret")
            .with_header("content-type", "application/json")
            .with_body(serde_json::json!([movement_json(1, "pending")]).to_string())
            .create();

        let list = backend(&server).list_movements().unwrap();
        mock.assert();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].movement_type, MovementType::Install);
        assert_eq!(list[0].logistics_cost, 80.0);
    }

    #[test]
    fn lists_wrapped_movement_array() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", "/api/equipment-movements")
            .with_body(
                serde_json::json!({ "data": [movement_json(1, "pending"), movement_json(2, "declined")] })
                    .to_string(),
            )
            .create();

        let list = backend(&server).list_movements().unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[1].status, MovementStatus::Declined);
    }

    #[test]
    fn non_success_status_is_backend_error() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", "/api/equipment-movements")
            .with_status(503)
            .with_body("maintenance")
            .create();

        match backend(&server).list_movements() {
            Err(DepotError::Backend { status, body }) => {
                assert_eq!(status, 503);
                assert_eq!(body, "maintenance");
            }
            other => panic!("expected backend error, got {other:?}"),
        }
    }

    #[test]
    fn status_update_is_patched_to_record_url() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("PATCH", "/api/equipment-movements/7")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "status": "completed",
                "from_location_id": 1,
                "moved_by": 3
            })))
            .with_body(movement_json(7, "completed").to_string())
            .create();

        let source: Movement = serde_json::from_value(movement_json(7, "pending")).unwrap();
        let update = StatusUpdate::from_movement(
            &source,
            MovementStatus::Completed,
            source.movement_date,
        );
        let updated = backend(&server).update_movement_status(7, &update).unwrap();
        mock.assert();
        assert_eq!(updated.status, MovementStatus::Completed);
    }

    #[test]
    fn creates_supplier() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/api/suppliers")
            .match_body(Matcher::PartialJson(
                serde_json::json!({ "name": "Acme", "email": "a@acme.example" }),
            ))
            .with_status(201)
            .with_body(
                serde_json::json!({ "data": { "id": 12, "name": "Acme", "email": "a@acme.example" } })
                    .to_string(),
            )
            .create();

        let form = NewSupplier {
            name: "Acme".into(),
            contact_name: None,
            email: "a@acme.example".into(),
            phone: None,
            address: None,
        };
        let created = backend(&server).create_supplier(&form).unwrap();
        mock.assert();
        assert_eq!(created.id, 12);
        assert_eq!(created.phone, None);
    }

    #[test]
    fn malformed_body_is_json_error() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", "/api/equipment")
            .with_body("<html>oops</html>")
            .create();

        assert!(matches!(
            backend(&server).list_equipment(),
            Err(DepotError::Json(_))
        ));
    }
}
