//! # 比較図
//!
//! 真値・予測・差分の3枚のヒートマップを並べた図を表します。
//! 描画先は呼び出し側が渡す `plotters` の描画領域で、グローバルな
//! 「現在の図」の状態は持ちません。

use crate::colormap;
use crate::config::{Annotation, ColorScale};
use crate::error::{PlotError, PlotResult};
use crate::interpolate::FieldGrid;
use crate::slice::Extent;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::Path;

/// カラーバー領域の幅（ピクセル）
const COLORBAR_WIDTH: u32 = 70;
/// カラーバーの分割数
const COLORBAR_STEPS: usize = 64;

fn render_err<E: std::fmt::Display>(e: E) -> PlotError {
    PlotError::Render(e.to_string())
}

/// 1枚のヒートマップパネル。
#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    pub title: String,
    pub grid: FieldGrid,
    pub vmin: f64,
    pub vmax: f64,
}

impl Panel {
    /// カラースケールを解決してパネルを作ります。
    pub fn new(title: impl Into<String>, grid: FieldGrid, scale: ColorScale) -> Self {
        let (vmin, vmax) = match scale {
            ColorScale::Fixed { vmin, vmax } => (vmin, vmax),
            ColorScale::DataDriven => match grid.finite_range() {
                Some((lo, hi)) if hi > lo => (lo, hi),
                Some((v, _)) => (v - 0.5, v + 0.5),
                None => (0.0, 1.0),
            },
        };
        Self {
            title: title.into(),
            grid,
            vmin,
            vmax,
        }
    }

    /// データ座標 `(x, z)` に最も近い格子点の値
    fn sample(&self, x: f64, z: f64, extent: &Extent) -> f64 {
        let fi = (x - extent.xmin) / extent.width() * (self.grid.nx - 1) as f64;
        let fk = (z - extent.zmin) / extent.height() * (self.grid.nz - 1) as f64;
        let i = (fi.round().max(0.0) as usize).min(self.grid.nx - 1);
        let k = (fk.round().max(0.0) as usize).min(self.grid.nz - 1);
        self.grid.get(i, k)
    }
}

/// 1x3 パネルの比較図。
#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    pub title: String,
    pub size: (u32, u32),
    pub extent: Extent,
    pub truth: Panel,
    pub prediction: Panel,
    pub difference: Panel,
    pub annotations: Vec<Annotation>,
}

impl Figure {
    pub fn panels(&self) -> [&Panel; 3] {
        [&self.truth, &self.prediction, &self.difference]
    }

    /// 渡された描画領域に図全体を描きます。
    pub fn render<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> PlotResult<()> {
        root.fill(&WHITE).map_err(render_err)?;
        let body = root
            .titled(&self.title, ("sans-serif", 22))
            .map_err(render_err)?;
        let areas = body.split_evenly((1, 3));
        for (index, (area, panel)) in areas.iter().zip(self.panels()).enumerate() {
            self.draw_panel(area, panel, index == 0)?;
        }
        Ok(())
    }

    fn draw_panel<DB: DrawingBackend>(
        &self,
        area: &DrawingArea<DB, Shift>,
        panel: &Panel,
        with_legend: bool,
    ) -> PlotResult<()> {
        let e = self.extent;
        let (width, _) = area.dim_in_pixel();
        let (heat_area, bar_area) =
            area.split_horizontally(width.saturating_sub(COLORBAR_WIDTH));

        let mut chart = ChartBuilder::on(&heat_area)
            .caption(&panel.title, ("sans-serif", 16))
            .margin(8)
            .x_label_area_size(35)
            .y_label_area_size(45)
            .build_cartesian_2d(e.xmin..e.xmax, e.zmin..e.zmax)
            .map_err(render_err)?;
        chart
            .configure_mesh()
            .disable_mesh()
            .x_desc("x")
            .y_desc("z")
            .x_labels(5)
            .y_labels(5)
            .draw()
            .map_err(render_err)?;

        // --- ヒートマップ（origin="lower" 相当: z は上向き） ---
        let (px_range, py_range) = chart.plotting_area().get_pixel_range();
        let pixels = chart.plotting_area().strip_coord_spec();
        let w = (px_range.end - px_range.start).max(1);
        let h = (py_range.end - py_range.start).max(1);
        for py in 0..h {
            let z = e.zmax - (py as f64 + 0.5) / h as f64 * e.height();
            for px in 0..w {
                let x = e.xmin + (px as f64 + 0.5) / w as f64 * e.width();
                let value = panel.sample(x, z, &e);
                if let Some(color) = colormap::color_for(value, panel.vmin, panel.vmax) {
                    pixels.draw_pixel((px, py), &color).map_err(render_err)?;
                }
            }
        }

        // --- 注記線 ---
        let mut labelled = false;
        for annotation in &self.annotations {
            let (p0, p1) = annotation.endpoints();
            let series = chart
                .draw_series(LineSeries::new(vec![p0, p1], BLACK.stroke_width(4)))
                .map_err(render_err)?;
            if !with_legend {
                continue;
            }
            if let Some(label) = annotation.label() {
                series
                    .label(label)
                    .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &BLACK));
                labelled = true;
            }
        }
        if labelled {
            chart
                .configure_series_labels()
                .position(SeriesLabelPosition::LowerRight)
                .background_style(&WHITE.mix(0.8))
                .border_style(&BLACK)
                .draw()
                .map_err(render_err)?;
        }

        draw_colorbar(&bar_area, panel.vmin, panel.vmax)
    }

    /// PNG ファイルとして保存します。
    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> PlotResult<()> {
        let root = BitMapBackend::new(path.as_ref(), self.size).into_drawing_area();
        self.render(&root)?;
        root.present().map_err(render_err)?;
        Ok(())
    }

    /// RGB のピクセル列として描画します。
    pub fn to_rgb_buffer(&self) -> PlotResult<Vec<u8>> {
        let (w, h) = self.size;
        let mut buffer = vec![0u8; w as usize * h as usize * 3];
        {
            let root = BitMapBackend::with_buffer(&mut buffer, self.size).into_drawing_area();
            self.render(&root)?;
            root.present().map_err(render_err)?;
        }
        Ok(buffer)
    }
}

fn draw_colorbar<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    vmin: f64,
    vmax: f64,
) -> PlotResult<()> {
    let mut bar = ChartBuilder::on(area)
        .margin_top(34)
        .margin_bottom(43)
        .margin_right(4)
        .right_y_label_area_size(45)
        .build_cartesian_2d(0.0..1.0, vmin..vmax)
        .map_err(render_err)?;
    bar.configure_mesh()
        .disable_mesh()
        .disable_x_axis()
        .y_labels(5)
        .draw()
        .map_err(render_err)?;

    let step = (vmax - vmin) / COLORBAR_STEPS as f64;
    bar.draw_series((0..COLORBAR_STEPS).map(|s| {
        let lo = vmin + s as f64 * step;
        let color = colormap::color_for(lo + 0.5 * step, vmin, vmax).unwrap_or(WHITE);
        Rectangle::new([(0.0, lo), (1.0, lo + step)], color.filled())
    }))
    .map_err(render_err)?;
    Ok(())
}
