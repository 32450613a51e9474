use std::{fs, io, ops::Range, path::Path};

use chrono::{DateTime, Datelike, TimeZone, Utc};
use plotters::{
    coord::{
        ranged1d::{KeyPointHint, NoDefaultFormatting, ValueFormatter},
        types::RangedCoordf64,
    },
    prelude::*,
};
use thiserror::Error;

use crate::series::StarHistory;

/// Chart configuration options
#[derive(Debug, Clone)]
pub struct ChartConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
    pub x_desc: String,
    pub y_desc: String,
    pub colors: Vec<RGBColor>,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 700,
            title: "GitHub Star History".to_string(),
            x_desc: "Date".to_string(),
            y_desc: "Stars (log scale)".to_string(),
            colors: vec![
                RGBColor(0x1f, 0x77, 0xb4),
                RGBColor(0xff, 0x7f, 0x0e),
                RGBColor(0x2c, 0xa0, 0x2c),
                RGBColor(0xd6, 0x27, 0x28),
                RGBColor(0x94, 0x67, 0xbd),
                RGBColor(0x8c, 0x56, 0x4b),
                RGBColor(0xe3, 0x77, 0xc2),
                RGBColor(0x7f, 0x7f, 0x7f),
                RGBColor(0xbc, 0xbd, 0x22),
                RGBColor(0x17, 0xbe, 0xcf),
            ],
        }
    }
}

impl ChartConfig {
    /// Colour for the repository at `index` in configured order, cycling the palette.
    pub fn color_for(&self, index: usize) -> RGBColor {
        if self.colors.is_empty() {
            return BLUE;
        }
        self.colors[index % self.colors.len()]
    }
}

#[derive(Debug, Error)]
pub enum RenderChartError {
    #[error("NoData: every series is empty")]
    NoData,

    #[error("CreateOutputDir: {source}")]
    CreateOutputDir {
        #[from]
        source: io::Error,
    },

    #[error("Draw: {message}")]
    Draw {
        message: String,
    },
}

fn draw_error<E: std::fmt::Display>(step: &'static str) -> impl FnOnce(E) -> RenderChartError {
    move |e| RenderChartError::Draw {
        message: format!("Failed to {step}: {e}"),
    }
}

/// Month-aligned span covering every plotted star.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeAxis {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

const QUARTER_MONTHS: [u32; 4] = [1, 4, 7, 10];

fn month_start(year: i32, month: u32) -> Option<DateTime<Utc>> {
    Utc.with_ymd_and_hms(year, month, 1, 0, 0, 0).single()
}

impl TimeAxis {
    /// Runs from the first day of the earliest month with data to the first day of
    /// the month after the latest star. `None` when nothing would be plotted.
    pub fn covering(history: &StarHistory) -> Option<Self> {
        let first = history
            .iter()
            .filter_map(|(_, series)| series.first_starred_at())
            .min()?;
        let last = history
            .iter()
            .filter_map(|(_, series)| series.last_starred_at())
            .max()?;

        let (end_year, end_month) = if last.month() == 12 {
            (last.year() + 1, 1)
        } else {
            (last.year(), last.month() + 1)
        };

        Some(Self {
            start: month_start(first.year(), first.month())?,
            end: month_start(end_year, end_month)?,
        })
    }

    fn ticks(&self, months: &[u32]) -> Vec<DateTime<Utc>> {
        (self.start.year()..=self.end.year())
            .flat_map(|year| months.iter().filter_map(move |month| month_start(year, *month)))
            .filter(|tick| (self.start..=self.end).contains(tick))
            .collect()
    }

    /// 1 January of every year inside the span.
    pub fn yearly_ticks(&self) -> Vec<DateTime<Utc>> {
        self.ticks(&[1])
    }

    /// Quarter starts inside the span.
    pub fn quarterly_ticks(&self) -> Vec<DateTime<Utc>> {
        self.ticks(&QUARTER_MONTHS)
    }

    /// Labelled ticks: yearly, falling back to quarterly and then to the span ends
    /// when the data covers too little time to reach a year boundary.
    pub fn label_ticks(&self) -> Vec<DateTime<Utc>> {
        let years = self.yearly_ticks();
        if !years.is_empty() {
            return years;
        }
        let quarters = self.quarterly_ticks();
        if !quarters.is_empty() {
            return quarters;
        }
        vec![self.start, self.end]
    }
}

/// x coordinate in Unix seconds. Bold grid lines and labels sit on the
/// label ticks, light grid lines on quarter starts.
struct MonthAxis {
    seconds: RangedCoordf64,
    labelled: Vec<f64>,
    quarters: Vec<f64>,
}

impl From<TimeAxis> for MonthAxis {
    fn from(axis: TimeAxis) -> Self {
        Self {
            seconds: (to_x(axis.start)..to_x(axis.end)).into(),
            labelled: axis.label_ticks().into_iter().map(to_x).collect(),
            quarters: axis.quarterly_ticks().into_iter().map(to_x).collect(),
        }
    }
}

impl Ranged for MonthAxis {
    type FormatOption = NoDefaultFormatting;
    type ValueType = f64;

    fn map(&self, value: &f64, limit: (i32, i32)) -> i32 {
        self.seconds.map(value, limit)
    }

    fn key_points<Hint: KeyPointHint>(&self, hint: Hint) -> Vec<f64> {
        if hint.weight().allow_light_points() {
            self.quarters.clone()
        } else {
            self.labelled.clone()
        }
    }

    fn range(&self) -> Range<f64> {
        self.seconds.range()
    }
}

impl ValueFormatter<f64> for MonthAxis {
    fn format(value: &f64) -> String {
        format_month(*value)
    }
}

fn to_x(at: DateTime<Utc>) -> f64 {
    at.timestamp() as f64
}

fn format_month(x: f64) -> String {
    DateTime::from_timestamp(x.round() as i64, 0)
        .map(|at| at.format("%Y-%m").to_string())
        .unwrap_or_default()
}

/// Plain integer labels, never scientific notation.
fn format_count(value: f64) -> String {
    format!("{:.0}", value)
}

fn is_power_of_ten(value: f64) -> bool {
    if value <= 0.0 {
        return false;
    }
    let power = 10f64.powf(value.log10().round());
    (value - power).abs() <= power * 1e-9
}

/// Logarithmic star-count axis. Bold lines and labels only on powers of ten,
/// and the repeated boundary points plotters emits between decades are dropped.
struct CountAxis {
    log: LogCoord<f64>,
}

impl CountAxis {
    fn up_to(upper: f64) -> Self {
        Self {
            log: (1f64..upper).log_scale().into(),
        }
    }
}

impl Ranged for CountAxis {
    type FormatOption = NoDefaultFormatting;
    type ValueType = f64;

    fn map(&self, value: &f64, limit: (i32, i32)) -> i32 {
        self.log.map(value, limit)
    }

    fn key_points<Hint: KeyPointHint>(&self, hint: Hint) -> Vec<f64> {
        let bold_only = !hint.weight().allow_light_points();

        let mut points = self.log.key_points(hint);
        points.dedup_by(|a, b| (*a - *b).abs() <= b.abs() * 1e-9);
        if bold_only {
            points.retain(|value| is_power_of_ten(*value));
        }
        points
    }

    fn range(&self) -> Range<f64> {
        self.log.range()
    }
}

impl ValueFormatter<f64> for CountAxis {
    fn format(value: &f64) -> String {
        format_count(*value)
    }
}

/// Upper bound of the logarithmic y range, leaving headroom above the largest total.
fn y_upper_bound(history: &StarHistory) -> f64 {
    let max_total = history
        .iter()
        .map(|(_, series)| series.total())
        .max()
        .unwrap_or(0);

    (f64::from(max_total) * 1.5).max(10.0)
}

/// Renders every non-empty series of `history` into one SVG at `output`.
///
/// Parent directories are created and an existing file is overwritten.
pub fn render_star_history(
    history: &StarHistory,
    config: &ChartConfig,
    output: &Path,
) -> Result<(), RenderChartError> {
    let axis = TimeAxis::covering(history).ok_or(RenderChartError::NoData)?;

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let root = SVGBackend::new(output, (config.width, config.height)).into_drawing_area();
    root.fill(&WHITE).map_err(draw_error("fill background"))?;

    let x_range = MonthAxis::from(axis);
    let y_range = CountAxis::up_to(y_upper_bound(history));

    let mut chart = ChartBuilder::on(&root)
        .caption(&config.title, ("sans-serif", 24).into_font())
        .margin(20)
        .x_label_area_size(80)
        .y_label_area_size(70)
        .build_cartesian_2d(x_range, y_range)
        .map_err(draw_error("build chart"))?;

    chart
        .configure_mesh()
        .x_desc(&config.x_desc)
        .y_desc(&config.y_desc)
        .x_label_style(("sans-serif", 12).into_font().transform(FontTransform::Rotate90))
        .bold_line_style(BLACK.mix(0.15))
        .light_line_style(BLACK.mix(0.05))
        .draw()
        .map_err(draw_error("configure mesh"))?;

    for (index, (repo, series)) in history.iter().enumerate() {
        if series.is_empty() {
            continue;
        }

        let color = config.color_for(index).mix(0.8);
        let label = repo.to_string();
        let points = || {
            series
                .points()
                .iter()
                .map(|(at, count)| (to_x(*at), f64::from(*count)))
        };

        chart
            .draw_series(LineSeries::new(points(), color.stroke_width(2)))
            .map_err(draw_error("draw line series"))?
            .label(label)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 10, y)], color.stroke_width(2)));

        chart
            .draw_series(PointSeries::of_element(
                points(),
                1,
                color,
                &|coord, size, style| Circle::new(coord, size, style.filled()),
            ))
            .map_err(draw_error("draw points"))?;
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .label_font(("sans-serif", 14))
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()
        .map_err(draw_error("draw legend"))?;

    root.present().map_err(draw_error("present chart"))?;

    Ok(())
}
