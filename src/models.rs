use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::store::SurveyState;
use crate::table::LogEntry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportMode {
    Bus,
    Auto,
    Bicicleta,
    Caminata,
}

impl TransportMode {
    pub const ALL: [TransportMode; 4] = [
        TransportMode::Bus,
        TransportMode::Auto,
        TransportMode::Bicicleta,
        TransportMode::Caminata,
    ];

    pub fn key(self) -> &'static str {
        match self {
            TransportMode::Bus => "bus",
            TransportMode::Auto => "auto",
            TransportMode::Bicicleta => "bicicleta",
            TransportMode::Caminata => "caminata",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|mode| mode.key() == key)
    }

    pub fn label(self) -> &'static str {
        match self {
            TransportMode::Bus => "Bus",
            TransportMode::Auto => "Auto",
            TransportMode::Bicicleta => "Bicicleta",
            TransportMode::Caminata => "Caminata",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            TransportMode::Bus => "#3498db",
            TransportMode::Auto => "#e67e22",
            TransportMode::Bicicleta => "#27ae60",
            TransportMode::Caminata => "#e74c3c",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            TransportMode::Bus => "🚌",
            TransportMode::Auto => "🚗",
            TransportMode::Bicicleta => "🚲",
            TransportMode::Caminata => "🚶",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Web,
    Chatbot,
}

impl Source {
    pub fn key(self) -> &'static str {
        match self {
            Source::Web => "web",
            Source::Chatbot => "chatbot",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Source::Web => "Web",
            Source::Chatbot => "Chatbot",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct TransportTally {
    pub bus: u64,
    pub auto: u64,
    pub bicicleta: u64,
    pub caminata: u64,
}

impl TransportTally {
    pub fn get(&self, mode: TransportMode) -> u64 {
        match mode {
            TransportMode::Bus => self.bus,
            TransportMode::Auto => self.auto,
            TransportMode::Bicicleta => self.bicicleta,
            TransportMode::Caminata => self.caminata,
        }
    }

    pub fn increment(&mut self, mode: TransportMode) {
        let slot = match mode {
            TransportMode::Bus => &mut self.bus,
            TransportMode::Auto => &mut self.auto,
            TransportMode::Bicicleta => &mut self.bicicleta,
            TransportMode::Caminata => &mut self.caminata,
        };
        *slot = slot.saturating_add(1);
    }

    pub fn values(&self) -> [u64; 4] {
        TransportMode::ALL.map(|mode| self.get(mode))
    }

    pub fn sum(&self) -> u64 {
        self.values().iter().sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionRecord {
    pub name: String,
    pub location: Option<String>,
    pub transport: TransportMode,
    pub minutes: u32,
    pub source: Source,
    pub age: Option<String>,
}

impl SubmissionRecord {
    pub fn travel_time(&self) -> Option<(&str, u32)> {
        match self.location.as_deref() {
            Some(location) if self.minutes > 0 => Some((location, self.minutes)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct FormFields {
    pub transport: Option<String>,
    #[serde(rename = "studentName")]
    pub student_name: Option<String>,
    #[serde(rename = "studentLocation")]
    pub student_location: Option<String>,
    #[serde(rename = "travelMinutes")]
    pub travel_minutes: Option<String>,
}

/// Fields arrive loosely typed; intake coerces them to text.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ChatbotPayload {
    pub nombre1: Option<Value>,
    pub lugar: Option<Value>,
    pub transporte: Option<Value>,
    pub tiempo_llegada: Option<Value>,
    pub edad: Option<Value>,
}

#[derive(Debug, Deserialize, Default)]
pub struct IndexQuery {
    pub saved: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatbotResponse {
    pub status: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<LogEntry>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StateResponse {
    #[serde(flatten)]
    pub state: SurveyState,
    pub average_minutes: u32,
}

#[derive(Debug, Serialize)]
pub struct DataResponse {
    pub total_responses: u64,
    pub data: Vec<LogEntry>,
}
