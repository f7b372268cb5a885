//! # スライス抽出
//!
//! 3次元点群から `y` 座標の条件で点を選び、選ばれた点の `x`, `z` から
//! 描画範囲を求めます。

use crate::config::SlicePredicate;
use crate::error::{PlotError, PlotResult};
use tracing::{debug, warn};

/// 選択された点の `(xmin, xmax, zmin, zmax)`。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    pub xmin: f64,
    pub xmax: f64,
    pub zmin: f64,
    pub zmax: f64,
}

impl Extent {
    /// 点列の最小・最大から範囲を求めます。
    ///
    /// 点が無い場合は `EmptySelection`、幅または高さが0の場合は
    /// `DegenerateExtent` を返します。
    pub fn from_points(x: &[f64], z: &[f64]) -> PlotResult<Self> {
        if x.is_empty() || z.is_empty() {
            return Err(PlotError::EmptySelection);
        }
        let (xmin, xmax) = min_max(x);
        let (zmin, zmax) = min_max(z);
        let extent = Self {
            xmin,
            xmax,
            zmin,
            zmax,
        };
        if !(xmax > xmin) || !(zmax > zmin) {
            return Err(PlotError::DegenerateExtent {
                xmin,
                xmax,
                zmin,
                zmax,
            });
        }
        Ok(extent)
    }

    pub fn width(&self) -> f64 {
        self.xmax - self.xmin
    }

    pub fn height(&self) -> f64 {
        self.zmax - self.zmin
    }
}

fn min_max(values: &[f64]) -> (f64, f64) {
    values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        })
}

/// `y` に条件を適用してマスクを作ります。
pub fn slice_mask(y: &[f64], predicate: &SlicePredicate) -> Vec<bool> {
    if matches!(predicate, SlicePredicate::ChainedLegacy { .. }) {
        warn!(
            ?predicate,
            "連鎖比較によるスライス条件を使用しています。両側の帯ではなく y <= lower が選択されます"
        );
    }
    let mask: Vec<bool> = y.iter().map(|&v| predicate.contains(v)).collect();
    debug!(
        selected = mask.iter().filter(|&&m| m).count(),
        total = mask.len(),
        "スライスマスクを作成しました"
    );
    mask
}

/// マスクが `true` の要素だけを取り出します。
pub fn apply_mask(values: &[f64], mask: &[bool]) -> Vec<f64> {
    values
        .iter()
        .zip(mask)
        .filter_map(|(&v, &keep)| keep.then_some(v))
        .collect()
}

/// スライスに含まれる点と2つのフィールド値。
#[derive(Debug, Clone, PartialEq)]
pub struct Slice {
    pub x: Vec<f64>,
    pub z: Vec<f64>,
    pub truth: Vec<f64>,
    pub pred: Vec<f64>,
    pub extent: Extent,
}

impl Slice {
    /// 点群からスライスを抽出します。すべての配列は同じ長さである必要があります。
    pub fn extract(
        x: &[f64],
        y: &[f64],
        z: &[f64],
        truth: &[f64],
        pred: &[f64],
        predicate: &SlicePredicate,
    ) -> PlotResult<Self> {
        let mask = slice_mask(y, predicate);
        let x = apply_mask(x, &mask);
        let z = apply_mask(z, &mask);
        let extent = Extent::from_points(&x, &z)?;
        debug!(?extent, points = x.len(), "スライス範囲を求めました");
        Ok(Self {
            x,
            z,
            truth: apply_mask(truth, &mask),
            pred: apply_mask(pred, &mask),
            extent,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_fin_band() -> SlicePredicate {
        SlicePredicate::Band {
            lower: 0.065,
            upper: 0.067,
        }
    }

    #[test]
    fn band_selects_in_band_points() {
        let y = [0.05, 0.066, 0.0661, 0.0665, 0.08];
        let mask = slice_mask(&y, &three_fin_band());
        assert_eq!(mask, vec![false, true, true, true, false]);
    }

    #[test]
    fn band_boundaries_are_excluded() {
        let y = [0.065, 0.067, 0.0669999];
        let mask = slice_mask(&y, &three_fin_band());
        assert_eq!(mask, vec![false, false, true]);
    }

    #[test]
    fn mask_is_reproducible() {
        let y: Vec<f64> = (0..200).map(|i| 0.06 + i as f64 * 5e-5).collect();
        let first = slice_mask(&y, &three_fin_band());
        let second = slice_mask(&y, &three_fin_band());
        assert_eq!(first, second);
    }

    #[test]
    fn exact_match_is_fragile() {
        let exact = SlicePredicate::Exact { value: 0.06565 };
        let y = [0.06565, 0.06, 0.06565, 0.07];
        assert_eq!(slice_mask(&y, &exact), vec![true, false, true, false]);

        let noisy = [0.06565 + 1e-9, 0.06565 - 1e-12];
        assert!(slice_mask(&noisy, &exact).iter().all(|&m| !m));
    }

    #[test]
    fn extent_uses_selected_points_only() {
        let x = [-9.0, 0.1, -0.2, 0.4, 9.0];
        let y = [0.05, 0.066, 0.0661, 0.0665, 0.08];
        let z = [-9.0, 0.3, 0.0, -0.1, 9.0];
        let slice = Slice::extract(&x, &y, &z, &x, &z, &three_fin_band()).unwrap();
        assert_eq!(
            slice.extent,
            Extent {
                xmin: -0.2,
                xmax: 0.4,
                zmin: -0.1,
                zmax: 0.3,
            }
        );
        assert_eq!(slice.truth, vec![0.1, -0.2, 0.4]);
        assert_eq!(slice.pred, vec![0.3, 0.0, -0.1]);
    }

    #[test]
    fn empty_selection_is_an_error() {
        let y = [0.0, 0.1];
        let err = Slice::extract(&y, &y, &y, &y, &y, &three_fin_band()).unwrap_err();
        assert!(matches!(err, PlotError::EmptySelection));
    }

    #[test]
    fn collinear_selection_is_degenerate() {
        let x = [0.5, 0.5, 0.5];
        let y = [0.066; 3];
        let z = [0.0, 0.1, 0.2];
        let err = Slice::extract(&x, &y, &z, &x, &x, &three_fin_band()).unwrap_err();
        assert!(matches!(err, PlotError::DegenerateExtent { .. }));
    }
}
