use crate::dashboard::Dashboard;
use crate::models::{FormFields, TransportMode};
use crate::store::KNOWN_LOCATIONS;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Notice {
    #[default]
    None,
    Saved,
    Error(String),
}

pub fn render_dashboard(dashboard: &Dashboard, notice: &Notice, form: &FormFields) -> String {
    let state = dashboard.state();
    let rows = if dashboard.log().is_empty() {
        r#"<tr class="empty"><td colspan="6">Aún no hay respuestas en esta sesión.</td></tr>"#.to_string()
    } else {
        dashboard.log().render_rows()
    };

    let avg = format!("{} min", state.average_minutes());
    let participants = format!("{} Participantes", state.total_responses);
    fill_template(
        INDEX_HTML,
        &[
            ("TOTAL", state.total_responses.to_string()),
            ("WEB", state.web_responses.to_string()),
            ("CHATBOT", state.chatbot_responses.to_string()),
            ("AVG", avg),
            ("PARTICIPANTS", participants),
            ("PIE_CHART", dashboard.charts().proportions_svg()),
            ("BAR_CHART", dashboard.charts().magnitude_svg()),
            ("NOTICE", render_notice(notice)),
            ("TRANSPORT_OPTIONS", render_transport_options(form.transport.as_deref())),
            ("LOCATION_OPTIONS", render_location_options(form.student_location.as_deref())),
            ("NAME", escape_html(form.student_name.as_deref().unwrap_or(""))),
            ("MINUTES", escape_html(form.travel_minutes.as_deref().unwrap_or(""))),
            ("ROWS", rows),
        ],
    )
}

/// Substitutes `{{KEY}}` placeholders in one pass, so inserted text is never rescanned.
fn fill_template(template: &str, values: &[(&str, String)]) -> String {
    let mut out = String::with_capacity(template.len() * 2);
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            out.push_str(&rest[start..]);
            return out;
        };
        let key = &after[..end];
        match values.iter().find(|(name, _)| *name == key) {
            Some((_, value)) => out.push_str(value),
            None => out.push_str(&rest[start..start + 2 + end + 2]),
        }
        rest = &after[end + 2..];
    }
    out.push_str(rest);
    out
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn render_notice(notice: &Notice) -> String {
    match notice {
        Notice::None => String::new(),
        Notice::Saved => r#"<div class="alert alert-success" id="successMessage" data-timeout="3000">¡Respuesta registrada correctamente!</div>"#.to_string(),
        Notice::Error(message) => format!(
            r#"<div class="modal" id="errorNotice" role="alertdialog" aria-modal="true">
        <div class="modal-card">
          <p>{}</p>
          <button type="button" class="btn-primary" id="errorDismiss">Aceptar</button>
        </div>
      </div>"#,
            escape_html(message)
        ),
    }
}

fn render_transport_options(selected: Option<&str>) -> String {
    TransportMode::ALL
        .iter()
        .map(|mode| {
            let checked = selected == Some(mode.key());
            format!(
                r#"<label class="transport-option{selected_class}">
            <input type="radio" name="transport" value="{key}"{checked_attr} />
            <span class="icon">{icon}</span>
            <span>{label}</span>
          </label>"#,
                selected_class = if checked { " selected" } else { "" },
                key = mode.key(),
                checked_attr = if checked { " checked" } else { "" },
                icon = mode.icon(),
                label = mode.label(),
            )
        })
        .collect::<Vec<_>>()
        .join("\n          ")
}

fn render_location_options(selected: Option<&str>) -> String {
    let mut options = vec![r#"<option value="">Seleccione una ubicación</option>"#.to_string()];
    options.extend(KNOWN_LOCATIONS.iter().map(|location| {
        format!(
            r#"<option value="{location}"{attr}>{location}</option>"#,
            attr = if selected == Some(*location) { " selected" } else { "" },
        )
    }));
    options.join("\n            ")
}

const INDEX_HTML: &str = r##"<!DOCTYPE html>
<html lang="es">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Encuesta de Transporte</title>
  <style>
    :root {
      --bg: #f4f6f9;
      --ink: #2c3e50;
      --muted: #7f8c8d;
      --card: #ffffff;
      --accent: #3498db;
      --ok: #27ae60;
      --error: #e74c3c;
      --shadow: 0 10px 30px rgba(44, 62, 80, 0.08);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: var(--bg);
      color: var(--ink);
      font-family: "Segoe UI", "Trebuchet MS", sans-serif;
      padding: 28px 18px 48px;
    }

    .app {
      width: min(1120px, 100%);
      margin: 0 auto;
      display: grid;
      gap: 24px;
    }

    header {
      display: flex;
      flex-wrap: wrap;
      align-items: baseline;
      justify-content: space-between;
      gap: 12px;
    }

    h1 {
      margin: 0;
      font-size: clamp(1.6rem, 3vw, 2.2rem);
    }

    h2 {
      margin: 0 0 14px;
      font-size: 1.15rem;
    }

    .pill {
      background: rgba(52, 152, 219, 0.12);
      color: var(--accent);
      border-radius: 999px;
      padding: 6px 14px;
      font-weight: 600;
    }

    .metrics {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(200px, 1fr));
      gap: 16px;
    }

    .card {
      background: var(--card);
      border-radius: 16px;
      box-shadow: var(--shadow);
      padding: 20px;
    }

    .metric .label {
      display: block;
      font-size: 0.8rem;
      text-transform: uppercase;
      letter-spacing: 0.1em;
      color: var(--muted);
    }

    .metric .value {
      display: block;
      margin-top: 6px;
      font-size: 1.9rem;
      font-weight: 700;
    }

    .charts {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(320px, 1fr));
      gap: 16px;
    }

    .chart {
      width: 100%;
      height: 280px;
      display: block;
    }

    .chart-grid {
      stroke: rgba(44, 62, 80, 0.1);
    }

    .chart-label {
      fill: var(--muted);
    }

    form {
      display: grid;
      gap: 16px;
    }

    .transport-options {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(120px, 1fr));
      gap: 10px;
    }

    .transport-option {
      border: 2px solid #ecf0f1;
      border-radius: 12px;
      padding: 12px;
      display: grid;
      justify-items: center;
      gap: 4px;
      cursor: pointer;
    }

    .transport-option input {
      position: absolute;
      opacity: 0;
    }

    .transport-option.selected {
      border-color: var(--accent);
      background: rgba(52, 152, 219, 0.08);
    }

    .transport-option .icon {
      font-size: 1.6rem;
    }

    .fields {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(200px, 1fr));
      gap: 12px;
    }

    input[type="text"],
    input[type="number"],
    select {
      width: 100%;
      border: 1px solid #dfe6e9;
      border-radius: 10px;
      padding: 10px 12px;
      font-size: 1rem;
    }

    .btn-primary {
      appearance: none;
      border: none;
      border-radius: 999px;
      padding: 12px 20px;
      font-size: 1rem;
      font-weight: 600;
      background: var(--accent);
      color: white;
      cursor: pointer;
    }

    .alert {
      border-radius: 12px;
      padding: 12px 16px;
      font-weight: 600;
    }

    .alert-success {
      background: rgba(39, 174, 96, 0.12);
      color: var(--ok);
      animation: fade-out 300ms ease 3s forwards;
    }

    .modal {
      position: fixed;
      inset: 0;
      background: rgba(44, 62, 80, 0.45);
      display: grid;
      place-items: center;
      z-index: 10;
    }

    .modal-card {
      background: white;
      border-radius: 16px;
      padding: 24px;
      max-width: 360px;
      box-shadow: var(--shadow);
      display: grid;
      gap: 16px;
      border-top: 4px solid var(--error);
    }

    .modal-card p {
      margin: 0;
    }

    table {
      width: 100%;
      border-collapse: collapse;
    }

    th,
    td {
      text-align: left;
      padding: 10px 8px;
      border-bottom: 1px solid #ecf0f1;
    }

    th {
      font-size: 0.8rem;
      text-transform: uppercase;
      letter-spacing: 0.08em;
      color: var(--muted);
    }

    tr.empty td {
      color: var(--muted);
      text-align: center;
    }

    .status-badge {
      border-radius: 999px;
      padding: 4px 10px;
      font-size: 0.85rem;
      font-weight: 600;
      color: white;
    }

    .badge-bus { background: #3498db; }
    .badge-auto { background: #e67e22; }
    .badge-bicicleta { background: #27ae60; }
    .badge-caminata { background: #e74c3c; }
    .source-web { background: #8e44ad; }
    .source-chatbot { background: #16a085; }

    @keyframes fade-out {
      to {
        opacity: 0;
        visibility: hidden;
      }
    }
  </style>
</head>
<body>
  <main class="app">
    <header>
      <h1>Encuesta de Transporte</h1>
      <span class="pill" id="participantsCount">{{PARTICIPANTS}}</span>
    </header>

    <section class="metrics">
      <div class="card metric">
        <span class="label">Total participantes</span>
        <span class="value" id="totalParticipants">{{TOTAL}}</span>
      </div>
      <div class="card metric">
        <span class="label">Respuestas web</span>
        <span class="value" id="webResponses">{{WEB}}</span>
      </div>
      <div class="card metric">
        <span class="label">Respuestas chatbot</span>
        <span class="value" id="chatbotResponses">{{CHATBOT}}</span>
      </div>
      <div class="card metric">
        <span class="label">Tiempo promedio</span>
        <span class="value" id="avgTime">{{AVG}}</span>
      </div>
    </section>

    <section class="charts">
      <div class="card" id="pieChart">
        <h2>Medio de transporte</h2>
        {{PIE_CHART}}
      </div>
      <div class="card" id="barChart">
        <h2>Tiempo de llegada por ubicación</h2>
        {{BAR_CHART}}
      </div>
    </section>

    <section class="card">
      <h2>Registrar respuesta</h2>
      {{NOTICE}}
      <form id="transportSurvey" method="post" action="/survey">
        <div class="transport-options">
          {{TRANSPORT_OPTIONS}}
        </div>
        <div class="fields">
          <input type="text" name="studentName" placeholder="Nombre del estudiante" value="{{NAME}}" />
          <select name="studentLocation">
            {{LOCATION_OPTIONS}}
          </select>
          <input type="number" name="travelMinutes" min="1" placeholder="Minutos de viaje" value="{{MINUTES}}" />
        </div>
        <button class="btn-primary" type="submit">Enviar respuesta</button>
      </form>
    </section>

    <section class="card">
      <h2>Respuestas recientes</h2>
      <table>
        <thead>
          <tr>
            <th>Nombre</th>
            <th>Ubicación</th>
            <th>Transporte</th>
            <th>Tiempo</th>
            <th>Fuente</th>
            <th>Fecha</th>
          </tr>
        </thead>
        <tbody id="responsesTable">
        {{ROWS}}
        </tbody>
      </table>
    </section>
  </main>

  <script>
    const options = Array.from(document.querySelectorAll('.transport-option'));
    options.forEach((option) => {
      option.addEventListener('click', () => {
        option.querySelector('input[type="radio"]').checked = true;
        options.forEach((opt) => opt.classList.remove('selected'));
        option.classList.add('selected');
      });
    });

    const success = document.getElementById('successMessage');
    if (success) {
      setTimeout(() => { success.style.display = 'none'; }, Number(success.dataset.timeout));
      history.replaceState(null, '', '/');
    }

    const dismiss = document.getElementById('errorDismiss');
    if (dismiss) {
      dismiss.focus();
      dismiss.addEventListener('click', () => document.getElementById('errorNotice').remove());
    }
  </script>
</body>
</html>
"##;
