use crate::errors::AppError;
use crate::models::{ChatbotPayload, ChatbotResponse, DataResponse, FormFields, IndexQuery, StateResponse};
use crate::state::AppState;
use crate::storage::persist_data;
use crate::store::SurveyState;
use crate::ui::{render_dashboard, Notice};
use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    Form, Json,
};
use chrono::{Local, NaiveDateTime};
use tracing::error;

pub async fn index(State(state): State<AppState>, Query(query): Query<IndexQuery>) -> Html<String> {
    let notice = if query.saved.is_some() { Notice::Saved } else { Notice::None };
    let dashboard = state.dashboard.lock().await;
    Html(render_dashboard(&dashboard, &notice, &FormFields::default()))
}

pub async fn submit_form(State(state): State<AppState>, Form(fields): Form<FormFields>) -> Result<Response, AppError> {
    let mut dashboard = state.dashboard.lock().await;
    match dashboard.submit_from_form(&fields, now()) {
        Ok(_) => {
            persist(&state, dashboard.state()).await?;
            Ok(Redirect::to("/?saved=1").into_response())
        }
        Err(err) => {
            let page = render_dashboard(&dashboard, &Notice::Error(err.to_string()), &fields);
            Ok((StatusCode::BAD_REQUEST, Html(page)).into_response())
        }
    }
}

pub async fn submit_chatbot(
    State(state): State<AppState>,
    Json(payload): Json<ChatbotPayload>,
) -> Result<Response, AppError> {
    let mut dashboard = state.dashboard.lock().await;
    match dashboard.submit_from_external(&payload, now()) {
        Ok(entry) => {
            persist(&state, dashboard.state()).await?;
            Ok(Json(ChatbotResponse {
                status: "success",
                message: "Datos guardados correctamente".into(),
                data: Some(entry),
            })
            .into_response())
        }
        Err(err) => Ok((
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ChatbotResponse {
                status: "error",
                message: err.to_string(),
                data: None,
            }),
        )
            .into_response()),
    }
}

pub async fn get_state(State(state): State<AppState>) -> Json<StateResponse> {
    let dashboard = state.dashboard.lock().await;
    Json(StateResponse {
        state: dashboard.state().clone(),
        average_minutes: dashboard.state().average_minutes(),
    })
}

pub async fn get_data(State(state): State<AppState>) -> Json<DataResponse> {
    let dashboard = state.dashboard.lock().await;
    Json(DataResponse {
        total_responses: dashboard.state().total_responses,
        data: dashboard.log().rows().cloned().collect(),
    })
}

pub async fn export_csv(State(state): State<AppState>) -> Result<Response, AppError> {
    let dashboard = state.dashboard.lock().await;
    let body = dashboard.log().export_csv().map_err(AppError::internal)?;
    let disposition = format!(
        "attachment; filename=encuesta_transporte_{}.csv",
        Local::now().format("%Y%m%d_%H%M%S")
    );

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response())
}

pub async fn transport_chart(State(state): State<AppState>) -> Response {
    let dashboard = state.dashboard.lock().await;
    svg_response(dashboard.charts().proportions_svg())
}

pub async fn travel_time_chart(State(state): State<AppState>) -> Response {
    let dashboard = state.dashboard.lock().await;
    svg_response(dashboard.charts().magnitude_svg())
}

fn svg_response(svg: String) -> Response {
    ([(header::CONTENT_TYPE, "image/svg+xml")], svg).into_response()
}

async fn persist(state: &AppState, data: &SurveyState) -> Result<(), AppError> {
    persist_data(&state.data_path, data).await.map_err(|err| {
        error!("failed to persist survey state: {err}");
        AppError::from(err)
    })
}

fn now() -> NaiveDateTime {
    Local::now().naive_local()
}
