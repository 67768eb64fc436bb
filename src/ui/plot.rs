use eframe::egui::{self, Sense, Stroke, Ui};
use egui_plot::{Bar, BarChart, GridMark, Line, Plot, PlotPoint, PlotPoints, PlotResponse, Points, Polygon};

use crate::color;
use crate::data::aggregate::{max_count, overall_average, AggregatePoint, HeatCell};
use crate::data::model::MAX_RATING;
use crate::selection::Selection;

const BAR_WIDTH: f64 = 0.8;
const CELL_SIZE: f64 = 0.95;
const LEGEND_STEPS: usize = 24;

/// Label of the category tick at `mark`, blank between categories.
fn category_tick(names: &[String], mark: GridMark) -> String {
    let idx = mark.value.round();
    if (mark.value - idx).abs() > 1e-6 || idx < 0.0 {
        return String::new();
    }
    names.get(idx as usize).cloned().unwrap_or_default()
}

/// Plot coordinate of a click inside the plot, if one happened this frame.
fn clicked_at<R>(response: &PlotResponse<R>) -> Option<PlotPoint> {
    if !response.response.clicked() {
        return None;
    }
    let pos = response.response.interact_pointer_pos()?;
    Some(response.transform.value_from_position(pos))
}

// ---------------------------------------------------------------------------
// Bar chart
// ---------------------------------------------------------------------------

/// Draw per-airline bars; the highlighted airline is drawn dark. Returns
/// the airline whose bar was clicked.
pub fn bar_plot(
    ui: &mut Ui,
    rows: &[AggregatePoint<String>],
    highlight: &Selection,
    y_label: &str,
) -> Option<String> {
    let names: Vec<String> = rows.iter().map(|r| r.key.clone()).collect();
    let average = overall_average(rows);

    let bars: Vec<Bar> = rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let fill = if highlight.is_selected(&row.key) {
                color::HIGHLIGHT
            } else {
                color::BAR_FILL
            };
            Bar::new(i as f64, row.value)
                .name(&row.key)
                .width(BAR_WIDTH)
                .fill(fill)
        })
        .collect();

    let counts: Vec<usize> = rows.iter().map(|r| r.count).collect();
    let chart = BarChart::new(bars)
        .color(color::BAR_FILL)
        .highlight(true)
        .element_formatter(Box::new(move |bar, _chart| {
            let count = counts.get(bar.argument.round() as usize).copied().unwrap_or(0);
            let deviation = bar.value - average;
            let sign = if deviation >= 0.0 { "+" } else { "" };
            format!(
                "{}\nAverage rating: {:.1}\nSubmitted ratings: {count}\nDeviation across all airlines: {sign}{deviation:.2}",
                bar.name, bar.value
            )
        }));

    let tick_names = names.clone();
    let response = Plot::new("bar_plot")
        .height(260.0)
        .allow_zoom(false)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .show_x(false)
        .show_y(false)
        .include_y(0.0)
        .include_y(f64::from(MAX_RATING))
        .x_axis_formatter(move |mark, _range| category_tick(&tick_names, mark))
        .y_axis_label(y_label)
        .show(ui, |plot_ui| plot_ui.bar_chart(chart));

    let point = clicked_at(&response)?;
    let idx = point.x.round();
    if idx < 0.0 || (point.x - idx).abs() > BAR_WIDTH / 2.0 {
        return None;
    }
    names.get(idx as usize).cloned()
}

// ---------------------------------------------------------------------------
// Line chart
// ---------------------------------------------------------------------------

/// Draw the yearly trend with a marker per year.
pub fn line_plot(ui: &mut Ui, points: &[AggregatePoint<i32>]) {
    let coords: Vec<[f64; 2]> = points.iter().map(|p| [f64::from(p.key), p.value]).collect();
    let lookup: Vec<(i32, f64, usize)> = points.iter().map(|p| (p.key, p.value, p.count)).collect();

    Plot::new("line_plot")
        .height(260.0)
        .allow_zoom(false)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .include_y(0.0)
        .include_y(f64::from(MAX_RATING))
        .x_axis_formatter(|mark, _range| {
            if mark.value.fract() == 0.0 {
                format!("{:.0}", mark.value)
            } else {
                String::new()
            }
        })
        .label_formatter(move |_name, value| {
            lookup
                .iter()
                .find(|(year, _, _)| (f64::from(*year) - value.x).abs() < 0.25)
                .map(|(year, rating, count)| format!("Year: {year}\nRating: {rating:.2}\nReviews: {count}"))
                .unwrap_or_default()
        })
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new(PlotPoints::from(coords.clone()))
                    .color(color::LINE_STROKE)
                    .width(2.0),
            );
            plot_ui.points(Points::new(PlotPoints::from(coords)).radius(5.0).color(color::HIGHLIGHT));
        });
}

// ---------------------------------------------------------------------------
// Heatmap
// ---------------------------------------------------------------------------

/// Vertical extent of the heatmap: one row per rating, 0 through the maximum.
fn rating_span() -> (f64, f64) {
    (-0.5, f64::from(MAX_RATING) + 0.5)
}

/// `N-Star` label for whole ratings, blank elsewhere.
fn star_tick(value: f64) -> String {
    if value.fract() == 0.0 && (0.0..=f64::from(MAX_RATING)).contains(&value) {
        format!("{value:.0}-Star")
    } else {
        String::new()
    }
}

fn square(x: f64, y: f64, size: f64) -> PlotPoints<'static> {
    let h = size / 2.0;
    PlotPoints::from(vec![[x - h, y - h], [x + h, y - h], [x + h, y + h], [x - h, y + h]])
}

/// Draw review counts as coloured cells, one column per airline, one row per
/// rating. The highlighted airline's column is outlined. Returns the airline
/// whose column was clicked.
pub fn heat_plot(ui: &mut Ui, cells: &[HeatCell], airlines: &[String], highlight: &Selection) -> Option<String> {
    let max = max_count(cells);
    let column_of = |airline: &str| airlines.iter().position(|a| a == airline);

    let polygons: Vec<Polygon> = cells
        .iter()
        .filter_map(|cell| {
            let x = column_of(&cell.airline)? as f64;
            Some(
                Polygon::new(square(x, f64::from(cell.rating), CELL_SIZE))
                    .fill_color(color::heat_color(cell.count, max))
                    .stroke(Stroke::NONE),
            )
        })
        .collect();

    let (bottom, top) = rating_span();
    let outline = highlight.airline().and_then(column_of).map(|x| {
        let x = x as f64;
        Polygon::new(PlotPoints::from(vec![[x - 0.5, bottom], [x + 0.5, bottom], [x + 0.5, top], [x - 0.5, top]]))
            .fill_color(egui::Color32::TRANSPARENT)
            .stroke(Stroke::new(2.0, color::HIGHLIGHT))
    });

    let tick_names = airlines.to_vec();
    let hover_names = airlines.to_vec();
    let hover_cells = cells.to_vec();
    let response = Plot::new("heat_plot")
        .height(400.0)
        .allow_zoom(false)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .show_grid(false)
        .include_x(-0.5)
        .include_x(airlines.len() as f64 - 0.5)
        .include_y(bottom)
        .include_y(top)
        .x_axis_formatter(move |mark, _range| category_tick(&tick_names, mark))
        .y_axis_formatter(|mark, _range| star_tick(mark.value))
        .label_formatter(move |_name, value| {
            let (col, rating) = (value.x.round(), value.y.round());
            let Some(airline) = (col >= 0.0).then(|| hover_names.get(col as usize)).flatten() else {
                return String::new();
            };
            hover_cells
                .iter()
                .find(|c| &c.airline == airline && f64::from(c.rating) == rating)
                .map(|c| {
                    let projection = c
                        .mean_projection
                        .map(|p| format!("{p:+.2}"))
                        .unwrap_or_else(|| "n/a".to_string());
                    format!(
                        "{airline}\n{}-Star: {} reviews\nMean category score: {projection}",
                        c.rating, c.count
                    )
                })
                .unwrap_or_default()
        })
        .show(ui, |plot_ui| {
            for polygon in polygons {
                plot_ui.polygon(polygon);
            }
            if let Some(outline) = outline {
                plot_ui.polygon(outline);
            }
        });

    heat_legend(ui, max);

    let point = clicked_at(&response)?;
    let col = point.x.round();
    if col < 0.0 {
        return None;
    }
    airlines.get(col as usize).cloned()
}

/// Horizontal gradient bar labelled with the count range.
fn heat_legend(ui: &mut Ui, max: usize) {
    ui.horizontal(|ui: &mut Ui| {
        ui.label("0");
        let (rect, _) = ui.allocate_exact_size(egui::vec2(160.0, 10.0), Sense::hover());
        let step = rect.width() / LEGEND_STEPS as f32;
        for (i, fill) in color::heat_legend(max, LEGEND_STEPS).into_iter().enumerate() {
            let min = egui::pos2(rect.left() + step * i as f32, rect.top());
            let swatch = egui::Rect::from_min_size(min, egui::vec2(step, rect.height()));
            ui.painter().rect_filled(swatch, 0.0, fill);
        }
        ui.label(format!("{max} reviews"));
    });
}
