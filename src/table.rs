use crate::models::{Source, SubmissionRecord, TransportMode};
use crate::ui::escape_html;
use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::VecDeque;

pub const MISSING_LOCATION_LABEL: &str = "No especificado";

const CSV_HEADERS: [&str; 7] = [
    "Nombre",
    "Ubicación",
    "Edad",
    "Transporte",
    "Tiempo Llegada",
    "Timestamp",
    "Fuente",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogEntry {
    pub name: String,
    pub location: String,
    pub age: Option<String>,
    pub transport: TransportMode,
    pub minutes: u32,
    pub source: Source,
    pub timestamp: String,
    pub recorded_at: String,
}

impl LogEntry {
    pub fn from_record(record: &SubmissionRecord, at: NaiveDateTime) -> Self {
        Self {
            name: record.name.clone(),
            location: record
                .location
                .clone()
                .unwrap_or_else(|| MISSING_LOCATION_LABEL.to_string()),
            age: record.age.clone(),
            transport: record.transport,
            minutes: record.minutes,
            source: record.source,
            timestamp: format_timestamp(at),
            recorded_at: at.format("%Y-%m-%dT%H:%M:%S").to_string(),
        }
    }

    pub fn minutes_label(&self) -> String {
        format!("{} min", self.minutes)
    }

    pub fn render_row(&self) -> String {
        format!(
            r#"<tr>
          <td>{name}</td>
          <td>{location}</td>
          <td><span class="status-badge badge-{mode}">{transport}</span></td>
          <td>{minutes}</td>
          <td><span class="status-badge source-{source}">{source_label}</span></td>
          <td>{timestamp}</td>
        </tr>"#,
            name = escape_html(&self.name),
            location = escape_html(&self.location),
            mode = self.transport.key(),
            transport = self.transport.label(),
            minutes = self.minutes_label(),
            source = self.source.key(),
            source_label = self.source.label(),
            timestamp = escape_html(&self.timestamp),
        )
    }
}

pub fn format_timestamp(at: NaiveDateTime) -> String {
    at.format("%d/%m/%Y, %H:%M").to_string()
}

#[derive(Debug, Clone)]
pub struct ResponseLog {
    rows: VecDeque<LogEntry>,
    capacity: usize,
}

impl ResponseLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            rows: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    pub fn append_row(&mut self, record: &SubmissionRecord, at: NaiveDateTime) -> &LogEntry {
        self.rows.push_front(LogEntry::from_record(record, at));
        self.rows.truncate(self.capacity);
        &self.rows[0]
    }

    pub fn rows(&self) -> impl Iterator<Item = &LogEntry> {
        self.rows.iter()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn render_rows(&self) -> String {
        self.rows
            .iter()
            .map(LogEntry::render_row)
            .collect::<Vec<_>>()
            .join("\n        ")
    }

    pub fn export_csv(&self) -> Result<Vec<u8>, csv::Error> {
        let mut wtr = csv::Writer::from_writer(Vec::new());
        wtr.write_record(CSV_HEADERS)?;
        for entry in self.rows.iter().rev() {
            let minutes = entry.minutes.to_string();
            wtr.write_record([
                entry.name.as_str(),
                entry.location.as_str(),
                entry.age.as_deref().unwrap_or(""),
                entry.transport.key(),
                minutes.as_str(),
                entry.recorded_at.as_str(),
                entry.source.key(),
            ])?;
        }
        wtr.into_inner().map_err(|err| err.into_error().into())
    }
}
