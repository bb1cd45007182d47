use crate::errors::IntakeError;
use crate::models::{ChatbotPayload, FormFields, Source, SubmissionRecord, TransportMode};
use serde_json::Value;

pub const CHATBOT_DEFAULT_NAME: &str = "Usuario Chatbot";

const TRANSPORT_SYNONYMS: [(&str, TransportMode); 9] = [
    ("bus", TransportMode::Bus),
    ("auto", TransportMode::Auto),
    ("carro", TransportMode::Auto),
    ("automóvil", TransportMode::Auto),
    ("bicicleta", TransportMode::Bicicleta),
    ("bici", TransportMode::Bicicleta),
    ("caminata", TransportMode::Caminata),
    ("caminar", TransportMode::Caminata),
    ("a pie", TransportMode::Caminata),
];

pub fn parse_form(fields: &FormFields) -> Result<SubmissionRecord, IntakeError> {
    let transport = non_empty(fields.transport.as_deref())
        .and_then(TransportMode::from_key)
        .ok_or(IntakeError::MissingTransport)?;

    let name = fields
        .student_name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .ok_or(IntakeError::MissingName)?;

    let location = non_empty(fields.student_location.as_deref()).ok_or(IntakeError::MissingLocation)?;

    let minutes = fields
        .travel_minutes
        .as_deref()
        .and_then(parse_leading_int)
        .filter(|&minutes| minutes > 0)
        .ok_or(IntakeError::InvalidMinutes)?;

    Ok(SubmissionRecord {
        name: name.to_string(),
        location: Some(location.to_string()),
        transport,
        minutes: clamp_minutes(minutes),
        source: Source::Web,
        age: None,
    })
}

pub fn parse_external(payload: &ChatbotPayload) -> Result<SubmissionRecord, IntakeError> {
    let transport_text = text_field(&payload.transporte);
    let transport = transport_text
        .as_deref()
        .and_then(normalize_transport)
        .ok_or(IntakeError::UnknownTransport(transport_text.clone()))?;

    let minutes = payload
        .tiempo_llegada
        .as_ref()
        .and_then(value_to_int)
        .map(clamp_minutes)
        .unwrap_or(0);

    Ok(SubmissionRecord {
        name: text_field(&payload.nombre1).unwrap_or_else(|| CHATBOT_DEFAULT_NAME.to_string()),
        location: text_field(&payload.lugar),
        transport,
        minutes,
        source: Source::Chatbot,
        age: text_field(&payload.edad),
    })
}

pub fn normalize_transport(raw: &str) -> Option<TransportMode> {
    let lowered = raw.trim().to_lowercase();
    TRANSPORT_SYNONYMS
        .iter()
        .find(|(synonym, _)| *synonym == lowered)
        .map(|&(_, mode)| mode)
        .or_else(|| TransportMode::from_key(&lowered))
}

/// Reads the integer prefix of `raw`, so "30 min" is 30 and "abc" is nothing.
pub fn parse_leading_int(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let end = digits
        .char_indices()
        .find(|(_, ch)| !ch.is_ascii_digit())
        .map(|(idx, _)| idx)
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    let value = digits[..end].parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -value } else { value })
}

fn value_to_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().filter(|n| n.is_finite()).map(|n| n.trunc() as i64)),
        Value::String(text) => parse_leading_int(text),
        _ => None,
    }
}

fn text_field(field: &Option<Value>) -> Option<String> {
    field.as_ref().and_then(value_to_text)
}

fn value_to_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) if !text.trim().is_empty() => Some(text.trim().to_string()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|text| !text.is_empty())
}

fn clamp_minutes(minutes: i64) -> u32 {
    u32::try_from(minutes.max(0)).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn form(transport: &str, name: &str, location: &str, minutes: &str) -> FormFields {
        FormFields {
            transport: Some(transport.into()),
            student_name: Some(name.into()),
            student_location: Some(location.into()),
            travel_minutes: Some(minutes.into()),
        }
    }

    fn payload(value: serde_json::Value) -> ChatbotPayload {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn form_builds_web_record() {
        let record = parse_form(&form("bus", "  Ana ", "Jauja", "15")).unwrap();
        assert_eq!(record.name, "Ana");
        assert_eq!(record.location.as_deref(), Some("Jauja"));
        assert_eq!(record.transport, TransportMode::Bus);
        assert_eq!(record.minutes, 15);
        assert_eq!(record.source, Source::Web);
    }

    #[test]
    fn form_reports_first_failing_field() {
        let empty = FormFields::default();
        assert_eq!(parse_form(&empty), Err(IntakeError::MissingTransport));
        assert_eq!(parse_form(&form("", "", "", "")), Err(IntakeError::MissingTransport));
        assert_eq!(parse_form(&form("tren", "Ana", "Jauja", "5")), Err(IntakeError::MissingTransport));
        assert_eq!(parse_form(&form("bus", "   ", "", "")), Err(IntakeError::MissingName));
        assert_eq!(parse_form(&form("bus", "Ana", "", "0")), Err(IntakeError::MissingLocation));
        assert_eq!(parse_form(&form("bus", "Ana", "Jauja", "0")), Err(IntakeError::InvalidMinutes));
        assert_eq!(parse_form(&form("bus", "Ana", "Jauja", "-3")), Err(IntakeError::InvalidMinutes));
        assert_eq!(parse_form(&form("bus", "Ana", "Jauja", "rápido")), Err(IntakeError::InvalidMinutes));
    }

    #[test]
    fn form_minutes_accept_integer_prefix() {
        let record = parse_form(&form("auto", "Ana", "Jauja", "25.7")).unwrap();
        assert_eq!(record.minutes, 25);
    }

    #[test]
    fn synonyms_normalize_to_canonical_modes() {
        assert_eq!(normalize_transport("carro"), Some(TransportMode::Auto));
        assert_eq!(normalize_transport("Automóvil"), Some(TransportMode::Auto));
        assert_eq!(normalize_transport("BICI"), Some(TransportMode::Bicicleta));
        assert_eq!(normalize_transport("caminar"), Some(TransportMode::Caminata));
        assert_eq!(normalize_transport("A Pie"), Some(TransportMode::Caminata));
        assert_eq!(normalize_transport("Bus"), Some(TransportMode::Bus));
        assert_eq!(normalize_transport("avion"), None);
        assert_eq!(normalize_transport(""), None);
    }

    #[test]
    fn external_accepts_string_or_number_time() {
        let record = parse_external(&payload(json!({
            "nombre1": "Luis Rutti",
            "lugar": "Orcotuna",
            "transporte": "bus",
            "tiempo_llegada": "30",
            "edad": "20"
        })))
        .unwrap();
        assert_eq!(record.minutes, 30);
        assert_eq!(record.age.as_deref(), Some("20"));
        assert_eq!(record.source, Source::Chatbot);

        let record = parse_external(&payload(json!({
            "transporte": "carro",
            "tiempo_llegada": 42,
            "edad": 19
        })))
        .unwrap();
        assert_eq!(record.transport, TransportMode::Auto);
        assert_eq!(record.minutes, 42);
        assert_eq!(record.age.as_deref(), Some("19"));
    }

    #[test]
    fn external_defaults_missing_fields() {
        let record = parse_external(&payload(json!({ "transporte": "bici" }))).unwrap();
        assert_eq!(record.name, CHATBOT_DEFAULT_NAME);
        assert_eq!(record.location, None);
        assert_eq!(record.minutes, 0);
        assert_eq!(record.travel_time(), None);
    }

    #[test]
    fn external_unusable_time_is_zero() {
        for time in [json!("pronto"), json!(null), json!(true), json!("-10")] {
            let record = parse_external(&payload(json!({
                "lugar": "Jauja",
                "transporte": "bus",
                "tiempo_llegada": time
            })))
            .unwrap();
            assert_eq!(record.minutes, 0);
            assert_eq!(record.travel_time(), None);
        }
    }

    #[test]
    fn external_coerces_non_string_text_fields() {
        let record = parse_external(&payload(json!({
            "nombre1": 20,
            "lugar": 7,
            "transporte": " Bus ",
            "tiempo_llegada": "15"
        })))
        .unwrap();
        assert_eq!(record.name, "20");
        assert_eq!(record.location.as_deref(), Some("7"));
        assert_eq!(record.travel_time(), Some(("7", 15)));

        let err = parse_external(&payload(json!({ "transporte": 5 }))).unwrap_err();
        assert_eq!(err, IntakeError::UnknownTransport(Some("5".into())));

        let record = parse_external(&payload(json!({ "nombre1": "  ", "lugar": {}, "transporte": "bus" }))).unwrap();
        assert_eq!(record.name, CHATBOT_DEFAULT_NAME);
        assert_eq!(record.location, None);
    }

    #[test]
    fn external_rejects_unknown_transport() {
        let err = parse_external(&payload(json!({ "transporte": "avion" }))).unwrap_err();
        assert_eq!(err, IntakeError::UnknownTransport(Some("avion".into())));
        let err = parse_external(&ChatbotPayload::default()).unwrap_err();
        assert_eq!(err, IntakeError::UnknownTransport(None));
    }

    #[test]
    fn leading_int_parsing() {
        assert_eq!(parse_leading_int("30"), Some(30));
        assert_eq!(parse_leading_int("  30 min"), Some(30));
        assert_eq!(parse_leading_int("-4"), Some(-4));
        assert_eq!(parse_leading_int("+7"), Some(7));
        assert_eq!(parse_leading_int("min 30"), None);
        assert_eq!(parse_leading_int("-"), None);
        assert_eq!(parse_leading_int(""), None);
    }
}
