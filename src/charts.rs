use crate::models::TransportMode;
use crate::store::SurveyState;
use crate::ui::escape_html;
use std::f64::consts::{FRAC_PI_2, TAU};

const EMPTY_RING_COLOR: &str = "#ecf0f1";
const BAR_COLOR: &str = "#27ae60";
const BAR_SERIES_LABEL: &str = "Tiempo (min)";

#[derive(Debug, Clone, PartialEq)]
pub struct DoughnutChart {
    values: [u64; 4],
}

impl DoughnutChart {
    const WIDTH: f64 = 320.0;
    const HEIGHT: f64 = 300.0;
    const CX: f64 = 160.0;
    const CY: f64 = 120.0;
    const OUTER: f64 = 100.0;
    const INNER: f64 = 60.0;

    fn new(state: &SurveyState) -> Self {
        Self {
            values: state.survey_data.values(),
        }
    }

    fn set_data(&mut self, values: [u64; 4]) {
        self.values = values;
    }

    pub fn values(&self) -> [u64; 4] {
        self.values
    }

    pub fn to_svg(&self) -> String {
        let mut svg = format!(
            r#"<svg class="chart chart-doughnut" viewBox="0 0 {w} {h}" role="img" aria-label="Medios de transporte">"#,
            w = Self::WIDTH,
            h = Self::HEIGHT
        );

        let total: u64 = self.values.iter().sum();
        if total == 0 {
            svg.push_str(&ring(EMPTY_RING_COLOR));
        } else {
            let mut start = -FRAC_PI_2;
            for (mode, &value) in TransportMode::ALL.iter().zip(self.values.iter()) {
                if value == 0 {
                    continue;
                }
                if value == total {
                    svg.push_str(&ring(mode.color()));
                    break;
                }
                let sweep = TAU * value as f64 / total as f64;
                svg.push_str(&format!(
                    r##"<path class="chart-slice" data-mode="{key}" d="{d}" fill="{color}" stroke="#fff" stroke-width="2"><title>{label}: {value}</title></path>"##,
                    key = mode.key(),
                    d = slice_path(start, start + sweep),
                    color = mode.color(),
                    label = mode.label(),
                ));
                start += sweep;
            }
        }

        // Legend along the bottom with round point markers.
        let slot = Self::WIDTH / TransportMode::ALL.len() as f64;
        for (idx, (mode, value)) in TransportMode::ALL.iter().zip(self.values.iter()).enumerate() {
            let x = slot * idx as f64 + 14.0;
            let y = Self::HEIGHT - 30.0;
            svg.push_str(&format!(
                r#"<circle cx="{cx:.2}" cy="{cy:.2}" r="5" fill="{color}" /><text class="chart-label" x="{tx:.2}" y="{ty:.2}" font-size="12">{label} ({value})</text>"#,
                cx = x,
                cy = y,
                color = mode.color(),
                tx = x + 9.0,
                ty = y + 4.0,
                label = mode.label(),
            ));
        }

        svg.push_str("</svg>");
        svg
    }
}

fn ring(color: &str) -> String {
    let radius = (DoughnutChart::OUTER + DoughnutChart::INNER) / 2.0;
    format!(
        r#"<circle cx="{cx:.2}" cy="{cy:.2}" r="{radius:.2}" fill="none" stroke="{color}" stroke-width="{width:.2}" />"#,
        cx = DoughnutChart::CX,
        cy = DoughnutChart::CY,
        width = DoughnutChart::OUTER - DoughnutChart::INNER,
    )
}

fn slice_path(start: f64, end: f64) -> String {
    let point = |radius: f64, angle: f64| {
        (
            DoughnutChart::CX + radius * angle.cos(),
            DoughnutChart::CY + radius * angle.sin(),
        )
    };
    let large_arc = u8::from(end - start > std::f64::consts::PI);
    let (ox0, oy0) = point(DoughnutChart::OUTER, start);
    let (ox1, oy1) = point(DoughnutChart::OUTER, end);
    let (ix1, iy1) = point(DoughnutChart::INNER, end);
    let (ix0, iy0) = point(DoughnutChart::INNER, start);
    format!(
        "M {ox0:.2} {oy0:.2} A {r:.2} {r:.2} 0 {large_arc} 1 {ox1:.2} {oy1:.2} L {ix1:.2} {iy1:.2} A {ir:.2} {ir:.2} 0 {large_arc} 0 {ix0:.2} {iy0:.2} Z",
        r = DoughnutChart::OUTER,
        ir = DoughnutChart::INNER,
    )
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarChart {
    labels: Vec<String>,
    values: Vec<u32>,
}

impl BarChart {
    const WIDTH: f64 = 600.0;
    const HEIGHT: f64 = 260.0;
    const PADDING_X: f64 = 44.0;
    const PADDING_Y: f64 = 34.0;
    const TOP: f64 = 24.0;
    const TICKS: u32 = 4;

    fn new(state: &SurveyState) -> Self {
        let mut chart = Self {
            labels: Vec::new(),
            values: Vec::new(),
        };
        chart.set_data(state);
        chart
    }

    fn set_data(&mut self, state: &SurveyState) {
        self.labels = state.time_data.keys().map(str::to_string).collect();
        self.values = state.time_data.values().collect();
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn values(&self) -> &[u32] {
        &self.values
    }

    pub fn to_svg(&self) -> String {
        let (w, h) = (Self::WIDTH, Self::HEIGHT);
        let mut svg = format!(
            r#"<svg class="chart chart-bar" viewBox="0 0 {w} {h}" role="img" aria-label="{BAR_SERIES_LABEL}">"#
        );

        if self.values.is_empty() {
            svg.push_str(r#"<text class="chart-label" x="50%" y="50%" text-anchor="middle">Sin datos</text></svg>"#);
            return svg;
        }

        // The y axis starts at zero and tops out on a whole multiple of the tick count.
        let max = self.values.iter().copied().max().unwrap_or(0).max(1);
        let axis_max = max.div_ceil(Self::TICKS) * Self::TICKS;
        let plot_height = h - Self::TOP - Self::PADDING_Y;
        let y = |value: f64| h - Self::PADDING_Y - value / f64::from(axis_max) * plot_height;

        for tick in 0..=Self::TICKS {
            let value = axis_max / Self::TICKS * tick;
            let y_pos = y(f64::from(value));
            svg.push_str(&format!(
                r#"<line class="chart-grid" x1="{x1}" y1="{y_pos:.2}" x2="{x2}" y2="{y_pos:.2}" /><text class="chart-label" x="{tx}" y="{ty:.2}" text-anchor="end" font-size="11">{value}</text>"#,
                x1 = Self::PADDING_X,
                x2 = w - Self::PADDING_X,
                tx = Self::PADDING_X - 10.0,
                ty = y_pos + 4.0,
            ));
        }

        let slot = (w - Self::PADDING_X * 2.0) / self.values.len() as f64;
        let bar_width = slot * 0.6;
        for (idx, (label, &value)) in self.labels.iter().zip(self.values.iter()).enumerate() {
            let x = Self::PADDING_X + slot * idx as f64 + (slot - bar_width) / 2.0;
            let top = y(f64::from(value));
            let label = escape_html(label);
            svg.push_str(&format!(
                r#"<rect class="chart-bar-rect" x="{x:.2}" y="{top:.2}" width="{bar_width:.2}" height="{height:.2}" rx="4" fill="{BAR_COLOR}"><title>{label}: {value} min</title></rect><text class="chart-label" x="{lx:.2}" y="{ly:.2}" text-anchor="middle" font-size="11">{label}</text>"#,
                height = h - Self::PADDING_Y - top,
                lx = x + bar_width / 2.0,
                ly = h - Self::PADDING_Y + 18.0,
            ));
        }

        svg.push_str("</svg>");
        svg
    }
}

#[derive(Debug, Default)]
pub struct ChartRenderer {
    proportions: Option<DoughnutChart>,
    magnitude: Option<BarChart>,
}

impl ChartRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render_initial(&mut self, state: &SurveyState) {
        self.proportions.take();
        self.magnitude.take();
        self.proportions = Some(DoughnutChart::new(state));
        self.magnitude = Some(BarChart::new(state));
    }

    /// Rewrites the series of existing charts in place. No-op before `render_initial`.
    pub fn refresh(&mut self, state: &SurveyState) {
        if let Some(chart) = self.proportions.as_mut() {
            chart.set_data(state.survey_data.values());
        }
        if let Some(chart) = self.magnitude.as_mut() {
            chart.set_data(state);
        }
    }

    pub fn proportions(&self) -> Option<&DoughnutChart> {
        self.proportions.as_ref()
    }

    pub fn magnitude(&self) -> Option<&BarChart> {
        self.magnitude.as_ref()
    }

    pub fn proportions_svg(&self) -> String {
        self.proportions.as_ref().map(DoughnutChart::to_svg).unwrap_or_default()
    }

    pub fn magnitude_svg(&self) -> String {
        self.magnitude.as_ref().map(BarChart::to_svg).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn charts_are_absent_until_first_render() {
        let mut charts = ChartRenderer::new();
        charts.refresh(&SurveyState::seed());
        assert!(charts.proportions().is_none());
        assert!(charts.magnitude().is_none());
        assert!(charts.proportions_svg().is_empty());
    }

    #[test]
    fn render_initial_reflects_state() {
        let state = SurveyState::seed();
        let mut charts = ChartRenderer::new();
        charts.render_initial(&state);

        assert_eq!(charts.proportions().unwrap().values(), [2, 1, 1, 2]);
        let bars = charts.magnitude().unwrap();
        assert_eq!(bars.labels(), ["Huancayo", "Jauja", "Chupaca", "Sicaya", "Orcotuna"]);
        assert_eq!(bars.values().len(), 5);
        let jauja = bars.labels().iter().position(|label| label == "Jauja").unwrap();
        assert_eq!(bars.values()[jauja], 30);
    }

    #[test]
    fn refresh_picks_up_new_values_and_labels() {
        let mut state = SurveyState::seed();
        let mut charts = ChartRenderer::new();
        charts.render_initial(&state);

        state.survey_data.bus = 9;
        state.time_data.insert("Concepción", 18);
        charts.refresh(&state);

        assert_eq!(charts.proportions().unwrap().values(), [9, 1, 1, 2]);
        let bars = charts.magnitude().unwrap();
        assert!(bars.labels().iter().any(|label| label == "Concepción"));
        assert_eq!(bars.values().len(), 6);
    }

    #[test]
    fn refresh_is_idempotent() {
        let state = SurveyState::seed();
        let mut charts = ChartRenderer::new();
        charts.render_initial(&state);
        let first = (charts.proportions_svg(), charts.magnitude_svg());
        charts.refresh(&state);
        charts.refresh(&state);
        assert_eq!((charts.proportions_svg(), charts.magnitude_svg()), first);
    }

    #[test]
    fn doughnut_draws_one_slice_per_nonzero_mode() {
        let state = SurveyState::seed();
        let mut charts = ChartRenderer::new();
        charts.render_initial(&state);
        let svg = charts.proportions_svg();
        assert_eq!(svg.matches("<path class=\"chart-slice\"").count(), 4);
        assert!(svg.contains("Bus (2)"));
        assert!(svg.contains("#e74c3c"));
    }

    #[test]
    fn doughnut_single_mode_draws_full_ring() {
        let mut state = SurveyState::seed();
        state.survey_data = Default::default();
        state.survey_data.auto = 3;
        let mut charts = ChartRenderer::new();
        charts.render_initial(&state);
        let svg = charts.proportions_svg();
        assert_eq!(svg.matches("chart-slice").count(), 0);
        assert!(svg.contains(r##"stroke="#e67e22""##));
    }

    #[test]
    fn bar_chart_escapes_labels_and_handles_empty_data() {
        let mut state = SurveyState::seed();
        state.time_data.clear();
        let mut charts = ChartRenderer::new();
        charts.render_initial(&state);
        assert!(charts.magnitude_svg().contains("Sin datos"));

        state.time_data.insert("<Jauja>", 10);
        charts.refresh(&state);
        let svg = charts.magnitude_svg();
        assert!(svg.contains("&lt;Jauja&gt;"));
        assert_eq!(svg.matches("<rect").count(), 1);
    }
}
