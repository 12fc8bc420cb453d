use async_trait::async_trait;
use medireg_core::{
    GatewayConfig, GatewayError, GatewayResult, HealthRecordPayload, RecordGateway,
    RegistrationPayload,
};
use serde::Serialize;
use std::sync::Arc;

use crate::{build_client, transport};

/// Posts completed forms to the backend as JSON.
///
/// Any 2xx response is success. Other statuses become [`GatewayError::Rejected`] carrying the
/// response body so the caller can log it.
#[derive(Clone, Debug)]
pub struct HttpRecordGateway {
    client: reqwest::Client,
    cfg: Arc<GatewayConfig>,
}

impl HttpRecordGateway {
    pub fn new(cfg: Arc<GatewayConfig>) -> GatewayResult<Self> {
        Ok(Self {
            client: build_client()?,
            cfg,
        })
    }

    async fn post_json<T: Serialize + Sync>(&self, url: String, body: &T) -> GatewayResult<()> {
        tracing::debug!("POST {}", url);
        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        Err(GatewayError::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl RecordGateway for HttpRecordGateway {
    async fn submit_registration(&self, payload: &RegistrationPayload) -> GatewayResult<()> {
        self.post_json(self.cfg.registration_url(), payload).await
    }

    async fn submit_health_record(&self, payload: &HealthRecordPayload) -> GatewayResult<()> {
        self.post_json(self.cfg.health_record_url(), payload).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_server::{refused, serve};
    use axum::http::StatusCode;
    use axum::routing::post;
    use axum::{Json, Router};
    use medireg_core::{FieldId, FormRecord};
    use serde_json::Value;
    use std::sync::Mutex;

    fn gateway(base: &str) -> HttpRecordGateway {
        let cfg = GatewayConfig::new(base, base, "/").unwrap();
        HttpRecordGateway::new(Arc::new(cfg)).unwrap()
    }

    fn registration() -> RegistrationPayload {
        let mut record = FormRecord::default();
        record.set(FieldId::FirstName, "Asha".into());
        record.set(FieldId::Password, "abcdefgh".into());
        record.set(FieldId::ConfirmPassword, "abcdefgh".into());
        RegistrationPayload::from(&record)
    }

    #[tokio::test]
    async fn created_is_success_and_body_omits_confirm_password() {
        let received = Arc::new(Mutex::new(None::<Value>));
        let sink = received.clone();
        let app = Router::new().route(
            "/api/register/user",
            post(move |Json(body): Json<Value>| {
                let sink = sink.clone();
                async move {
                    *sink.lock().unwrap() = Some(body);
                    StatusCode::CREATED
                }
            }),
        );
        let base = serve(app).await;

        gateway(&base)
            .submit_registration(&registration())
            .await
            .expect("201 is success");

        let body = received.lock().unwrap().take().expect("request body captured");
        assert_eq!(body["password"], "abcdefgh");
        assert_eq!(body["fullname"]["firstName"], "Asha");
        assert!(body.get("confirmPassword").is_none());
        assert!(!body.to_string().contains("confirm"));
    }

    #[tokio::test]
    async fn server_error_is_rejected_with_body() {
        let app = Router::new().route(
            "/api/register/user",
            post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        );
        let base = serve(app).await;

        let err = gateway(&base)
            .submit_registration(&registration())
            .await
            .expect_err("500 is a failure");

        assert!(
            matches!(err, GatewayError::Rejected { status: 500, ref body } if body == "boom"),
            "{err:?}"
        );
    }

    #[tokio::test]
    async fn health_record_goes_to_its_own_path() {
        let app = Router::new().route(
            "/api/records/newrecord",
            post(|Json(body): Json<Value>| async move {
                if body["patientId"] == "pat-1" && body["doctorId"] == "doc-7" {
                    StatusCode::OK
                } else {
                    StatusCode::BAD_REQUEST
                }
            }),
        );
        let base = serve(app).await;
        let payload = HealthRecordPayload {
            diagnosis: "Influenza".into(),
            prescription: "Rest".into(),
            status: "open".into(),
            notes: String::new(),
            patient_id: "pat-1".into(),
            doctor_id: "doc-7".into(),
        };

        gateway(&base)
            .submit_health_record(&payload)
            .await
            .expect("200 is success");
    }

    #[tokio::test]
    async fn unreachable_backend_is_a_transport_error() {
        let base = refused().await;

        let err = gateway(&base)
            .submit_registration(&registration())
            .await
            .expect_err("nothing listening");

        assert!(matches!(err, GatewayError::Transport(_)), "{err:?}");
    }
}
