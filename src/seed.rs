use crate::models::ChatbotPayload;
use crate::state::AppState;
use crate::storage::persist_data;
use chrono::Local;
use serde_json::Value;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{error, info};

pub fn seed_payload() -> ChatbotPayload {
    ChatbotPayload {
        nombre1: Some(Value::from("Luis Rutti")),
        lugar: Some(Value::from("Orcotuna")),
        transporte: Some(Value::from("bus")),
        tiempo_llegada: Some(Value::from("30")),
        edad: Some(Value::from("20")),
    }
}

pub fn spawn_seed_injection(state: AppState, delay: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;

        let mut dashboard = state.dashboard.lock().await;
        if dashboard
            .submit_from_external(&seed_payload(), Local::now().naive_local())
            .is_err()
        {
            return;
        }
        match persist_data(&state.data_path, dashboard.state()).await {
            Ok(()) => info!("seed response injected"),
            Err(err) => error!("failed to persist seed response: {err}"),
        }
    })
}
