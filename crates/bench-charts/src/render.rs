//! Writing chart models as images.

use std::error::Error as StdError;
use std::path::{Path, PathBuf};

use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use crate::chart::ChartModel;
use crate::error::{Error, Result};
use crate::palette::ColorMap;

const FONT: &str = "sans-serif";
const FOOTER_HEIGHT: i32 = 40;

/// Destination of rendered charts.
pub trait ChartSink {
    /// Called once before any chart of a run is written to `output_dir`.
    fn prepare(&mut self, _output_dir: &Path) -> Result<()> {
        Ok(())
    }

    /// Writes one chart to `path`.
    fn write_chart(&mut self, model: &ChartModel, path: &Path) -> Result<()>;
}

/// Renders charts to PNG files with a fixed component palette.
pub struct PngRenderer {
    colors: ColorMap,
    size: (u32, u32),
}

impl PngRenderer {
    pub fn new(colors: ColorMap) -> Self {
        Self {
            colors,
            size: (1800, 900),
        }
    }

    /// Sets image size in pixels.
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.size = (width, height);
        self
    }

    fn draw(&self, model: &ChartModel, path: &Path) -> std::result::Result<(), Box<dyn StdError>> {
        let root = BitMapBackend::new(path, self.size).into_drawing_area();
        root.fill(&WHITE)?;
        let (upper, footer) = root.split_vertically(self.size.1 as i32 - FOOTER_HEIGHT);
        let area = match &model.title {
            Some(title) => upper.titled(title, (FONT, 28).into_font().style(FontStyle::Bold))?,
            None => upper,
        };

        let y_max = model.y_max();
        let y_top = if y_max > 0. { y_max * 1.1 } else { 1. };
        let mut chart = ChartBuilder::on(&area)
            .caption(&model.caption, (FONT, 22).into_font())
            .margin(15)
            .x_label_area_size(50)
            .y_label_area_size(80)
            .build_cartesian_2d(model.x_range.0..model.x_range.1, 0f64..y_top)?;

        let tick_label = |x: &f64| {
            model
                .ticks
                .iter()
                .find(|(pos, _)| (pos - x).abs() < 1e-6)
                .map(|(_, label)| label.clone())
                .unwrap_or_default()
        };
        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(model.ticks.len() + 2)
            .x_label_formatter(&tick_label)
            .y_label_formatter(&|y: &f64| format!("{:.2}", y))
            .x_desc(&model.x_desc)
            .y_desc(&model.y_desc)
            .draw()?;

        for component in model.legend.iter() {
            let color = self.colors.color(component);
            let bars = model.stacks.iter().flat_map(|stack| {
                let half = stack.width / 2.;
                stack
                    .segments
                    .iter()
                    .filter(move |seg| &seg.component == component)
                    .map(move |seg| {
                        Rectangle::new([(stack.x - half, seg.bottom), (stack.x + half, seg.top())], color.filled())
                    })
            });
            chart
                .draw_series(bars)?
                .label(component.as_str())
                .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));
        }

        let segment_style = (FONT, 12)
            .into_font()
            .color(&BLACK)
            .pos(Pos::new(HPos::Center, VPos::Center));
        chart.draw_series(model.stacks.iter().flat_map(|stack| {
            let style = &segment_style;
            stack.segments.iter().filter_map(move |seg| {
                seg.label
                    .as_ref()
                    .map(|label| Text::new(label.clone(), (stack.x, seg.bottom + seg.value / 2.), style.clone()))
            })
        }))?;

        let gap = model.label_gap();
        let total_style = |bold: bool| {
            let font = (FONT, 14).into_font();
            let font = if bold { font.style(FontStyle::Bold) } else { font };
            font.color(&BLACK).pos(Pos::new(HPos::Center, VPos::Bottom))
        };
        chart.draw_series(
            model
                .stacks
                .iter()
                .map(|stack| Text::new(stack.total_label.clone(), (stack.x, stack.total + gap), total_style(stack.bold_total))),
        )?;

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .border_style(BLACK)
            .background_style(WHITE.mix(0.8))
            .draw()?;

        if let Some(note) = &model.footnote {
            footer.draw(&Text::new(
                note.clone(),
                (self.size.0 as i32 / 2, FOOTER_HEIGHT / 2),
                (FONT, 16).into_font().color(&BLACK).pos(Pos::new(HPos::Center, VPos::Center)),
            ))?;
        }

        root.present()?;
        Ok(())
    }
}

impl ChartSink for PngRenderer {
    fn prepare(&mut self, output_dir: &Path) -> Result<()> {
        std::fs::create_dir_all(output_dir).map_err(|source| Error::Io {
            path: output_dir.to_path_buf(),
            source,
        })
    }

    fn write_chart(&mut self, model: &ChartModel, path: &Path) -> Result<()> {
        self.draw(model, path).map_err(|e| Error::Render {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}

/// Keeps chart models in memory instead of drawing them.
#[derive(Default)]
pub struct MemorySink {
    pub charts: Vec<(PathBuf, ChartModel)>,
}

impl ChartSink for MemorySink {
    fn write_chart(&mut self, model: &ChartModel, path: &Path) -> Result<()> {
        self.charts.push((path.to_path_buf(), model.clone()));
        Ok(())
    }
}
