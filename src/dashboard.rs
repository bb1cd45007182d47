use crate::charts::ChartRenderer;
use crate::errors::IntakeError;
use crate::intake::{parse_external, parse_form};
use crate::models::{ChatbotPayload, FormFields, SubmissionRecord};
use crate::store::SurveyState;
use crate::table::{LogEntry, ResponseLog};
use chrono::NaiveDateTime;
use tracing::{info, warn};

#[derive(Debug)]
pub struct Dashboard {
    state: SurveyState,
    charts: ChartRenderer,
    log: ResponseLog,
}

impl Dashboard {
    pub fn new(state: SurveyState, log_capacity: usize) -> Self {
        let mut charts = ChartRenderer::new();
        charts.render_initial(&state);
        Self {
            state,
            charts,
            log: ResponseLog::new(log_capacity),
        }
    }

    pub fn seeded(log_capacity: usize) -> Self {
        Self::new(SurveyState::seed(), log_capacity)
    }

    pub fn state(&self) -> &SurveyState {
        &self.state
    }

    pub fn charts(&self) -> &ChartRenderer {
        &self.charts
    }

    pub fn log(&self) -> &ResponseLog {
        &self.log
    }

    pub fn submit_from_form(&mut self, fields: &FormFields, at: NaiveDateTime) -> Result<LogEntry, IntakeError> {
        let record = parse_form(fields)?;
        Ok(self.accept(record, at))
    }

    pub fn submit_from_external(
        &mut self,
        payload: &ChatbotPayload,
        at: NaiveDateTime,
    ) -> Result<LogEntry, IntakeError> {
        let record = parse_external(payload).inspect_err(|err| {
            warn!(?payload, "rejected chatbot response: {err}");
        })?;
        Ok(self.accept(record, at))
    }

    fn accept(&mut self, record: SubmissionRecord, at: NaiveDateTime) -> LogEntry {
        self.state.record_submission(&record);
        let entry = self.log.append_row(&record, at).clone();
        self.charts.refresh(&self.state);
        info!(
            source = record.source.key(),
            transport = record.transport.key(),
            total = self.state.total_responses,
            "survey response recorded"
        );
        entry
    }
}
