//! # スライス比較の設定
//!
//! 「三枚フィン流れ」と「キャビティ流れ」の2つのシナリオを、
//! 1つのパラメータ化された設定 [`SliceConfig`] で表現します。

use crate::error::{PlotError, PlotResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// 図に付けるデフォルトのラベル
pub const DEFAULT_LABEL: &str = "custom_plot";

/// `y` 座標に対するスライス条件。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SlicePredicate {
    /// `lower < y < upper`（両端を含まない）
    Band { lower: f64, upper: f64 },
    /// `y == value`（浮動小数点の完全一致。わずかな誤差でも選択されません）
    ///
    /// 単精度のテンソルから読んだ `y` も扱えるよう、`value` を `f32` に
    /// 丸めた値との一致も認めます。
    Exact { value: f64 },
    /// `((y > lower) < upper)` をそのまま再現します。
    ///
    /// `y > lower` の真偽値（0 または 1）を `upper` と比較するため、
    /// `upper` が 0 と 1 の間にあれば実際には `y <= lower` の点が選ばれます。
    ChainedLegacy { lower: f64, upper: f64 },
}

impl SlicePredicate {
    /// 1点の `y` がスライスに含まれるかを判定します。
    pub fn contains(&self, y: f64) -> bool {
        match *self {
            SlicePredicate::Band { lower, upper } => lower < y && y < upper,
            SlicePredicate::Exact { value } => y == value || y == value as f32 as f64,
            SlicePredicate::ChainedLegacy { lower, upper } => {
                let above = if y > lower { 1.0 } else { 0.0 };
                above < upper
            }
        }
    }
}

/// カラースケールの決め方。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ColorScale {
    /// 固定の `vmin`/`vmax`
    Fixed { vmin: f64, vmax: f64 },
    /// 描画する格子の有限値の最小・最大
    DataDriven,
}

/// 図に重ねる注記線。座標はデータ座標（`x`, `z`）です。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Annotation {
    /// `x = at` の縦線（`z` は `from..to`）
    VLine {
        at: f64,
        from: f64,
        to: f64,
        label: Option<String>,
    },
    /// `z = at` の横線（`x` は `from..to`）
    HLine {
        at: f64,
        from: f64,
        to: f64,
        label: Option<String>,
    },
}

impl Annotation {
    pub fn label(&self) -> Option<&str> {
        match self {
            Annotation::VLine { label, .. } | Annotation::HLine { label, .. } => label.as_deref(),
        }
    }

    /// 線分の両端 `((x0, z0), (x1, z1))`
    pub fn endpoints(&self) -> ((f64, f64), (f64, f64)) {
        match *self {
            Annotation::VLine { at, from, to, .. } => ((at, from), (at, to)),
            Annotation::HLine { at, from, to, .. } => ((from, at), (to, at)),
        }
    }
}

/// スライス比較プロッタの設定。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SliceConfig {
    pub title: String,
    #[serde(default = "default_field")]
    pub field: String,
    #[serde(default = "default_label")]
    pub label: String,
    pub predicate: SlicePredicate,
    /// 格子の解像度 `(nx, nz)`
    pub resolution: (usize, usize),
    /// 真値・予測パネルのカラースケール
    pub truth_scale: ColorScale,
    /// 差分パネルのカラースケール
    pub diff_scale: ColorScale,
    #[serde(default)]
    pub annotations: Vec<Annotation>,
    /// 出力画像のピクセルサイズ
    #[serde(default = "default_figure_size")]
    pub figure_size: (u32, u32),
}

fn default_field() -> String {
    "u".to_string()
}

fn default_label() -> String {
    DEFAULT_LABEL.to_string()
}

fn default_figure_size() -> (u32, u32) {
    (1400, 400)
}

impl SliceConfig {
    /// 三枚フィン流れ: `0.065 < y < 0.067` の帯、1000x1000、固定カラースケール。
    pub fn three_fin_flow() -> Self {
        Self {
            title: "Three Fin Flow: PINN vs true solution".to_string(),
            field: default_field(),
            label: default_label(),
            predicate: SlicePredicate::Band {
                lower: 0.065,
                upper: 0.067,
            },
            resolution: (1000, 1000),
            truth_scale: ColorScale::Fixed {
                vmin: -0.5,
                vmax: 2.2,
            },
            diff_scale: ColorScale::Fixed {
                vmin: -2.2,
                vmax: 2.2,
            },
            annotations: Vec::new(),
            figure_size: default_figure_size(),
        }
    }

    /// キャビティ流れ: `y == 0.06565`、100x100、データ駆動のカラースケール、
    /// 滑りなし境界の注記線付き。
    pub fn lid_driven_cavity() -> Self {
        let boundary = Some("No slip boundary".to_string());
        Self {
            title: "Lid Driven Cavity: PINN vs true solution".to_string(),
            field: default_field(),
            label: default_label(),
            predicate: SlicePredicate::Exact { value: 0.06565 },
            resolution: (100, 100),
            truth_scale: ColorScale::DataDriven,
            diff_scale: ColorScale::DataDriven,
            annotations: vec![
                Annotation::VLine {
                    at: -0.05,
                    from: -0.05,
                    to: 0.05,
                    label: boundary,
                },
                Annotation::VLine {
                    at: 0.05,
                    from: -0.05,
                    to: 0.05,
                    label: None,
                },
                Annotation::HLine {
                    at: -0.05,
                    from: -0.05,
                    to: 0.05,
                    label: None,
                },
            ],
            figure_size: default_figure_size(),
        }
    }

    /// JSONファイルから設定を読み込みます。
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> PlotResult<Self> {
        let text = fs::read_to_string(path.as_ref()).map_err(|e| {
            PlotError::Config(format!("{}: {}", path.as_ref().display(), e))
        })?;
        serde_json::from_str(&text).map_err(|e| PlotError::Config(e.to_string()))
    }

    pub fn to_json(&self) -> PlotResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| PlotError::Config(e.to_string()))
    }
}
