//! # 検証用プロッタ
//!
//! 学習フレームワークの検証処理から呼ばれるコールバックです。
//! 入力座標・真値・予測値を受け取り、スライス比較図を返します。

use crate::config::SliceConfig;
use crate::error::{PlotError, PlotResult};
use crate::figure::{Figure, Panel};
use crate::interpolate::{FieldGrid, Grid, LinearInterpolator};
use crate::slice::{Extent, Slice};
use burn::prelude::Backend;
use burn::tensor::Tensor;
use std::collections::HashMap;
use tracing::{debug, info};

/// フィールド名から `[N, C]` のテンソルへの対応
pub type FieldMap<B> = HashMap<String, Tensor<B, 2>>;

/// 検証結果を図にするコールバックのインターフェース。
pub trait ValidatorPlotter {
    /// `(図, 名前)` の列を返します。保存は呼び出し側の責任です。
    fn plot<B: Backend>(
        &self,
        invar: &FieldMap<B>,
        true_outvar: &FieldMap<B>,
        pred_outvar: &FieldMap<B>,
    ) -> PlotResult<Vec<(Figure, String)>>;
}

/// テンソルの先頭列を `f64` のベクタとして取り出します。
pub fn first_column<B: Backend>(fields: &FieldMap<B>, name: &str) -> PlotResult<Vec<f64>> {
    let tensor = fields
        .get(name)
        .ok_or_else(|| PlotError::MissingField(name.to_string()))?;
    let [rows, cols] = tensor.dims();
    if cols == 0 {
        return Err(PlotError::EmptyColumn(name.to_string()));
    }
    tensor
        .clone()
        .slice([0..rows, 0..1])
        .into_data()
        .convert::<f64>()
        .to_vec::<f64>()
        .map_err(|e| PlotError::Tensor(format!("{name}: {e:?}")))
}

fn check_length(field: &str, values: &[f64], expected: usize) -> PlotResult<()> {
    if values.len() != expected {
        return Err(PlotError::LengthMismatch {
            field: field.to_string(),
            expected,
            actual: values.len(),
        });
    }
    Ok(())
}

/// `y` 方向のスライスで真値と予測値を比較するプロッタ。
#[derive(Debug, Clone)]
pub struct SliceValidatorPlotter {
    pub config: SliceConfig,
}

impl SliceValidatorPlotter {
    pub fn new(config: SliceConfig) -> Self {
        Self { config }
    }

    /// 不規則な点の複数のフィールドを同じ格子に補間します。
    ///
    /// 三角形分割は1度だけ作り、各フィールドで共有します。
    pub fn interpolate_output(
        x: &[f64],
        z: &[f64],
        fields: &[&[f64]],
        extent: Extent,
        resolution: (usize, usize),
    ) -> PlotResult<Vec<FieldGrid>> {
        let grid = Grid::new(extent, resolution)?;
        let interpolator = LinearInterpolator::new(x, z);
        Ok(fields
            .iter()
            .map(|values| interpolator.interpolate(values, &grid))
            .collect())
    }

    /// 抽出済みのスライスから図を組み立てます。
    pub fn build_figure(&self, slice: &Slice) -> PlotResult<Figure> {
        let config = &self.config;
        let mut grids = Self::interpolate_output(
            &slice.x,
            &slice.z,
            &[slice.truth.as_slice(), slice.pred.as_slice()],
            slice.extent,
            config.resolution,
        )?
        .into_iter();
        let (truth, pred) = match (grids.next(), grids.next()) {
            (Some(truth), Some(pred)) => (truth, pred),
            _ => return Err(PlotError::Render("補間結果が不足しています".to_string())),
        };
        let difference = truth.difference(&pred);

        let field = &config.field;
        Ok(Figure {
            title: config.title.clone(),
            size: config.figure_size,
            extent: slice.extent,
            truth: Panel::new(format!("True solution ({field})"), truth, config.truth_scale),
            prediction: Panel::new(format!("PINN solution ({field})"), pred, config.truth_scale),
            difference: Panel::new("Difference", difference, config.diff_scale),
            annotations: config.annotations.clone(),
        })
    }
}

impl ValidatorPlotter for SliceValidatorPlotter {
    fn plot<B: Backend>(
        &self,
        invar: &FieldMap<B>,
        true_outvar: &FieldMap<B>,
        pred_outvar: &FieldMap<B>,
    ) -> PlotResult<Vec<(Figure, String)>> {
        let x = first_column(invar, "x")?;
        let y = first_column(invar, "y")?;
        let z = first_column(invar, "z")?;
        let truth = first_column(true_outvar, &self.config.field)?;
        let pred = first_column(pred_outvar, &self.config.field)?;

        let n = x.len();
        check_length("y", &y, n)?;
        check_length("z", &z, n)?;
        check_length(&self.config.field, &truth, n)?;
        check_length(&self.config.field, &pred, n)?;
        debug!(points = n, "検証データを受け取りました");

        let slice = Slice::extract(&x, &y, &z, &truth, &pred, &self.config.predicate)?;
        let figure = self.build_figure(&slice)?;
        info!(
            label = %self.config.label,
            selected = slice.x.len(),
            nx = self.config.resolution.0,
            nz = self.config.resolution.1,
            "スライス比較図を作成しました"
        );
        Ok(vec![(figure, self.config.label.clone())])
    }
}
