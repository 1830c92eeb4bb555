use crate::domain::prediction::PredictionRecord;
use crate::flow::FetchState;
use crate::render::{two_decimals, yes_no};
use std::fmt;

pub const LOADING_TEXT: &str = "Loading prediction history...";
pub const EMPTY_TEXT: &str = "No prediction history found. Make a prediction first!";
pub const CHART_TITLE: &str = "Recent Price Predictions";
pub const Y_AXIS_LABEL: &str = "Price ($/MWh)";
pub const TABLE_HEADERS: [&str; 8] = [
    "#",
    "Hour",
    "Load (MW)",
    "Temp (°C)",
    "Weekend",
    "Holiday",
    "Predicted Price ($/MWh)",
    "Date",
];

const PLOT_HEIGHT: usize = 8;
const PLOT_COLUMN_WIDTH: usize = 4;

#[derive(Debug, Clone, PartialEq)]
pub struct ChartPoint {
    pub label: String,
    pub price: f64,
}

/// Line chart of predicted price against submission order.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceChart {
    pub title: &'static str,
    pub y_label: &'static str,
    pub points: Vec<ChartPoint>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub cells: [String; 8],
}

#[derive(Debug, Clone, PartialEq)]
pub enum HistoryView {
    Loading,
    Error(String),
    Empty,
    Populated {
        chart: PriceChart,
        rows: Vec<TableRow>,
    },
}

pub fn project_chart(records: &[PredictionRecord]) -> PriceChart {
    PriceChart {
        title: CHART_TITLE,
        y_label: Y_AXIS_LABEL,
        points: records
            .iter()
            .enumerate()
            .map(|(i, r)| ChartPoint {
                label: format!("Prediction {}", i + 1),
                price: r.predicted_price,
            })
            .collect(),
    }
}

pub fn table_rows(records: &[PredictionRecord]) -> Vec<TableRow> {
    records
        .iter()
        .enumerate()
        .map(|(i, r)| TableRow {
            cells: [
                (i + 1).to_string(),
                r.hour.to_string(),
                two_decimals(r.load),
                two_decimals(r.temperature),
                yes_no(r.weekend).to_string(),
                yes_no(r.holiday).to_string(),
                format!("${}", two_decimals(r.predicted_price)),
                r.created_at.to_string(),
            ],
        })
        .collect()
}

pub fn history_view(state: &FetchState<Vec<PredictionRecord>>) -> HistoryView {
    match state {
        FetchState::Loading => HistoryView::Loading,
        FetchState::Errored(message) => HistoryView::Error(message.clone()),
        FetchState::Loaded(records) if records.is_empty() => HistoryView::Empty,
        FetchState::Loaded(records) => HistoryView::Populated {
            chart: project_chart(records),
            rows: table_rows(records),
        },
    }
}

impl PriceChart {
    fn levels(&self) -> Vec<usize> {
        let min = self.points.iter().map(|p| p.price).fold(f64::INFINITY, f64::min);
        let max = self.points.iter().map(|p| p.price).fold(f64::NEG_INFINITY, f64::max);
        let span = max - min;
        self.points
            .iter()
            .map(|p| {
                if span <= f64::EPSILON {
                    PLOT_HEIGHT / 2
                } else {
                    (((p.price - min) / span) * (PLOT_HEIGHT - 1) as f64).round() as usize
                }
            })
            .collect()
    }
}

impl fmt::Display for PriceChart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        writeln!(f, "{}", self.y_label)?;
        if self.points.is_empty() {
            return Ok(());
        }

        let levels = self.levels();
        let min = self.points.iter().map(|p| p.price).fold(f64::INFINITY, f64::min);
        let max = self.points.iter().map(|p| p.price).fold(f64::NEG_INFINITY, f64::max);
        let top = two_decimals(max);
        let bottom = two_decimals(min);
        let axis_width = top.len().max(bottom.len());

        for level in (0..PLOT_HEIGHT).rev() {
            let label = if level == PLOT_HEIGHT - 1 {
                top.as_str()
            } else if level == 0 {
                bottom.as_str()
            } else {
                ""
            };
            write!(f, "{label:>axis_width$} |")?;
            for &point_level in &levels {
                let mark = if point_level == level { "*" } else { " " };
                write!(f, "{mark:>PLOT_COLUMN_WIDTH$}")?;
            }
            writeln!(f)?;
        }

        writeln!(
            f,
            "{:>axis_width$} +{}",
            "",
            "-".repeat(levels.len() * PLOT_COLUMN_WIDTH)
        )?;
        write!(f, "{:>axis_width$}  ", "")?;
        for i in 1..=levels.len() {
            write!(f, "{i:>PLOT_COLUMN_WIDTH$}")?;
        }
        writeln!(f)?;

        // Legend: x-axis index to point label.
        for (i, point) in self.points.iter().enumerate() {
            writeln!(
                f,
                "{:>axis_width$}  {:>PLOT_COLUMN_WIDTH$} = {} ({})",
                "",
                i + 1,
                point.label,
                two_decimals(point.price)
            )?;
        }
        Ok(())
    }
}

fn write_row<'a>(
    f: &mut fmt::Formatter<'_>,
    cells: impl Iterator<Item = &'a str>,
    widths: &[usize; 8],
) -> fmt::Result {
    let padded: Vec<String> = cells
        .zip(widths.iter().copied())
        .map(|(cell, w)| format!("{cell:<w$}"))
        .collect();
    writeln!(f, "{}", padded.join(" | ").trim_end())
}

fn write_table(f: &mut fmt::Formatter<'_>, rows: &[TableRow]) -> fmt::Result {
    let mut widths = TABLE_HEADERS.map(|h| h.chars().count());
    for row in rows {
        for (w, cell) in widths.iter_mut().zip(&row.cells) {
            *w = (*w).max(cell.chars().count());
        }
    }

    write_row(f, TABLE_HEADERS.iter().copied(), &widths)?;
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    writeln!(f, "{}", rule.join("-+-"))?;
    for row in rows {
        write_row(f, row.cells.iter().map(String::as_str), &widths)?;
    }
    Ok(())
}

impl fmt::Display for HistoryView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HistoryView::Loading => writeln!(f, "{LOADING_TEXT}"),
            HistoryView::Error(message) => writeln!(f, "[error] {message}"),
            HistoryView::Empty => writeln!(f, "[info] {EMPTY_TEXT}"),
            HistoryView::Populated { chart, rows } => {
                write!(f, "{chart}")?;
                writeln!(f)?;
                writeln!(f, "Recent Predictions")?;
                write_table(f, rows)
            }
        }
    }
}
