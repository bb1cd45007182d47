use axum::http::StatusCode;

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn internal(err: impl std::error::Error) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::internal(err)
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        Self::internal(err)
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IntakeError {
    #[error("Debe seleccionar un medio de transporte")]
    MissingTransport,
    #[error("Debe ingresar un nombre")]
    MissingName,
    #[error("Debe seleccionar una ubicación")]
    MissingLocation,
    #[error("Debe ingresar un tiempo válido en minutos")]
    InvalidMinutes,
    #[error("Datos del chatbot no válidos: transporte {0:?} no reconocido")]
    UnknownTransport(Option<String>),
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("failed to access data file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse data file: {0}")]
    Parse(#[from] serde_json::Error),
}
