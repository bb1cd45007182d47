use crate::models::{Source, SubmissionRecord, TransportTally};
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::Index;

pub const KNOWN_LOCATIONS: [&str; 5] = ["Huancayo", "Jauja", "Chupaca", "Sicaya", "Orcotuna"];

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TravelTimes {
    entries: Vec<(String, u32)>,
}

impl TravelTimes {
    /// Overwrites an existing location in place; new locations go last.
    pub fn insert(&mut self, location: impl Into<String>, minutes: u32) {
        let location = location.into();
        match self.entries.iter_mut().find(|(name, _)| *name == location) {
            Some(entry) => entry.1 = minutes,
            None => self.entries.push((location, minutes)),
        }
    }

    pub fn get(&self, location: &str) -> Option<u32> {
        self.entries
            .iter()
            .find(|(name, _)| name == location)
            .map(|&(_, minutes)| minutes)
    }

    pub fn contains_key(&self, location: &str) -> bool {
        self.get(location).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = u32> + '_ {
        self.entries.iter().map(|&(_, minutes)| minutes)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Index<&str> for TravelTimes {
    type Output = u32;

    fn index(&self, location: &str) -> &u32 {
        self.entries
            .iter()
            .find(|(name, _)| name == location)
            .map(|(_, minutes)| minutes)
            .unwrap_or_else(|| panic!("no travel time for {location:?}"))
    }
}

impl<S: Into<String>> FromIterator<(S, u32)> for TravelTimes {
    fn from_iter<I: IntoIterator<Item = (S, u32)>>(iter: I) -> Self {
        let mut times = Self::default();
        for (location, minutes) in iter {
            times.insert(location, minutes);
        }
        times
    }
}

impl Serialize for TravelTimes {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.entries.iter().map(|(name, minutes)| (name, minutes)))
    }
}

impl<'de> Deserialize<'de> for TravelTimes {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct TravelTimesVisitor;

        impl<'de> Visitor<'de> for TravelTimesVisitor {
            type Value = TravelTimes;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of location names to minutes")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<TravelTimes, A::Error> {
                let mut times = TravelTimes::default();
                while let Some((location, minutes)) = map.next_entry::<String, u32>()? {
                    times.insert(location, minutes);
                }
                Ok(times)
            }
        }

        deserializer.deserialize_map(TravelTimesVisitor)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyState {
    pub survey_data: TransportTally,
    pub time_data: TravelTimes,
    pub total_responses: u64,
    pub web_responses: u64,
    pub chatbot_responses: u64,
}

impl SurveyState {
    pub fn seed() -> Self {
        let time_data = [
            ("Huancayo", 45),
            ("Jauja", 30),
            ("Chupaca", 60),
            ("Sicaya", 25),
            ("Orcotuna", 20),
        ]
        .into_iter()
        .collect();

        Self {
            survey_data: TransportTally {
                bus: 2,
                auto: 1,
                bicicleta: 1,
                caminata: 2,
            },
            time_data,
            total_responses: 6,
            web_responses: 4,
            chatbot_responses: 2,
        }
    }

    pub fn record_submission(&mut self, record: &SubmissionRecord) {
        self.survey_data.increment(record.transport);
        if let Some((location, minutes)) = record.travel_time() {
            self.time_data.insert(location, minutes);
        }
        self.total_responses = self.total_responses.saturating_add(1);
        match record.source {
            Source::Web => self.web_responses = self.web_responses.saturating_add(1),
            Source::Chatbot => self.chatbot_responses = self.chatbot_responses.saturating_add(1),
        }
    }

    pub fn average_minutes(&self) -> u32 {
        if self.time_data.is_empty() {
            return 0;
        }
        let sum: u64 = self.time_data.values().map(u64::from).sum();
        (sum as f64 / self.time_data.len() as f64).round() as u32
    }
}

impl Default for SurveyState {
    fn default() -> Self {
        Self::seed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TransportMode;

    fn record(transport: TransportMode, location: Option<&str>, minutes: u32, source: Source) -> SubmissionRecord {
        SubmissionRecord {
            name: "Ana".into(),
            location: location.map(str::to_string),
            transport,
            minutes,
            source,
            age: None,
        }
    }

    #[test]
    fn seed_counters_are_consistent() {
        let state = SurveyState::seed();
        assert_eq!(state.total_responses, state.web_responses + state.chatbot_responses);
        assert_eq!(state.survey_data.sum(), state.total_responses);
        assert_eq!(state.time_data.len(), KNOWN_LOCATIONS.len());
    }

    #[test]
    fn record_submission_updates_tally_counters_and_time() {
        let mut state = SurveyState::seed();
        state.record_submission(&record(TransportMode::Bus, Some("Jauja"), 15, Source::Web));

        assert_eq!(state.survey_data.bus, 3);
        assert_eq!(state.time_data["Jauja"], 15);
        assert_eq!(state.total_responses, 7);
        assert_eq!(state.web_responses, 5);
        assert_eq!(state.chatbot_responses, 2);
    }

    #[test]
    fn travel_time_keeps_only_latest_value() {
        let mut state = SurveyState::seed();
        state.record_submission(&record(TransportMode::Auto, Some("Jauja"), 10, Source::Web));
        state.record_submission(&record(TransportMode::Auto, Some("Jauja"), 50, Source::Chatbot));
        assert_eq!(state.time_data["Jauja"], 50);
        assert_eq!(state.time_data.len(), 5);
    }

    #[test]
    fn new_location_extends_time_data() {
        let mut state = SurveyState::seed();
        state.record_submission(&record(TransportMode::Caminata, Some("Concepción"), 35, Source::Chatbot));
        assert_eq!(state.time_data["Concepción"], 35);
        assert_eq!(state.time_data.len(), 6);
    }

    #[test]
    fn zero_minutes_leaves_time_data_alone() {
        let mut state = SurveyState::seed();
        let before = state.time_data.clone();
        state.record_submission(&record(TransportMode::Bicicleta, Some("Jauja"), 0, Source::Chatbot));
        assert_eq!(state.time_data, before);
        assert_eq!(state.survey_data.bicicleta, 2);
        assert_eq!(state.chatbot_responses, 3);
    }

    #[test]
    fn travel_times_keep_first_reported_order() {
        let mut state = SurveyState::seed();
        state.record_submission(&record(TransportMode::Bus, Some("Jauja"), 12, Source::Web));
        state.record_submission(&record(TransportMode::Bus, Some("Concepción"), 40, Source::Web));

        let keys: Vec<_> = state.time_data.keys().collect();
        assert_eq!(keys, ["Huancayo", "Jauja", "Chupaca", "Sicaya", "Orcotuna", "Concepción"]);

        let json = serde_json::to_string(&state).unwrap();
        let huancayo = json.find("Huancayo").unwrap();
        let chupaca = json.find("Chupaca").unwrap();
        assert!(huancayo < chupaca);

        let restored: SurveyState = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.time_data.keys().collect::<Vec<_>>(), keys);
        assert_eq!(restored.time_data["Jauja"], 12);
    }

    #[test]
    fn average_minutes_rounds() {
        let state = SurveyState::seed();
        // (45 + 30 + 60 + 25 + 20) / 5 = 36
        assert_eq!(state.average_minutes(), 36);

        let mut state = SurveyState::seed();
        state.time_data.clear();
        assert_eq!(state.average_minutes(), 0);
        state.time_data.insert("Jauja", 10);
        state.time_data.insert("Sicaya", 11);
        assert_eq!(state.average_minutes(), 11);
    }

    #[test]
    fn snapshot_uses_stored_field_names() {
        let value = serde_json::to_value(SurveyState::seed()).unwrap();
        assert_eq!(value["surveyData"]["bus"], 2);
        assert_eq!(value["timeData"]["Chupaca"], 60);
        assert_eq!(value["totalResponses"], 6);
        assert_eq!(value["webResponses"], 4);
        assert_eq!(value["chatbotResponses"], 2);
    }
}
