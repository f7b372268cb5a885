//! # 散布データの格子補間
//!
//! 不規則な点の値を Delaunay 三角形分割と重心座標による線形補間で
//! 規則格子に移します。凸包の外側の格子点は `NaN` になります。

use crate::error::{PlotError, PlotResult};
use crate::slice::Extent;
use tracing::{debug, warn};

/// 重心座標の内外判定に使う許容誤差
const BARYCENTRIC_EPS: f64 = 1e-10;

/// 範囲を `nx × nz` 点で分割した規則格子（`ij` インデックス）。
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    pub xs: Vec<f64>,
    pub zs: Vec<f64>,
    pub extent: Extent,
}

impl Grid {
    pub fn new(extent: Extent, (nx, nz): (usize, usize)) -> PlotResult<Self> {
        if nx < 2 || nz < 2 {
            return Err(PlotError::InvalidResolution { nx, nz });
        }
        Ok(Self {
            xs: linspace(extent.xmin, extent.xmax, nx),
            zs: linspace(extent.zmin, extent.zmax, nz),
            extent,
        })
    }

    pub fn nx(&self) -> usize {
        self.xs.len()
    }

    pub fn nz(&self) -> usize {
        self.zs.len()
    }

    fn dx(&self) -> f64 {
        self.extent.width() / (self.nx() - 1) as f64
    }

    fn dz(&self) -> f64 {
        self.extent.height() / (self.nz() - 1) as f64
    }

    /// 区間 `[lo, hi]` に含まれる `x` 方向のインデックス範囲
    fn x_indices(&self, lo: f64, hi: f64) -> std::ops::RangeInclusive<usize> {
        index_range(lo, hi, self.extent.xmin, self.dx(), self.nx())
    }

    fn z_indices(&self, lo: f64, hi: f64) -> std::ops::RangeInclusive<usize> {
        index_range(lo, hi, self.extent.zmin, self.dz(), self.nz())
    }
}

/// 両端を含む等間隔の点列。最後の点は `stop` と完全に一致します。
pub fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (n - 1) as f64;
            let mut values: Vec<f64> = (0..n).map(|i| start + i as f64 * step).collect();
            values[n - 1] = stop;
            values
        }
    }
}

fn index_range(
    lo: f64,
    hi: f64,
    origin: f64,
    step: f64,
    n: usize,
) -> std::ops::RangeInclusive<usize> {
    let first = ((lo - origin) / step - 1e-9).ceil().max(0.0) as usize;
    let last = ((hi - origin) / step + 1e-9).floor();
    if last < 0.0 {
        // 空の範囲
        return 1..=0;
    }
    first..=(last as usize).min(n - 1)
}

/// 格子点上のスカラー値。`values[i * nz + k]` が `(xs[i], zs[k])` に対応します。
#[derive(Debug, Clone, PartialEq)]
pub struct FieldGrid {
    pub nx: usize,
    pub nz: usize,
    pub values: Vec<f64>,
}

impl FieldGrid {
    pub fn filled(nx: usize, nz: usize, value: f64) -> Self {
        Self {
            nx,
            nz,
            values: vec![value; nx * nz],
        }
    }

    pub fn get(&self, i: usize, k: usize) -> f64 {
        self.values[i * self.nz + k]
    }

    /// 要素ごとの差 `self - other`。どちらかが `NaN` なら結果も `NaN` です。
    pub fn difference(&self, other: &FieldGrid) -> FieldGrid {
        debug_assert_eq!((self.nx, self.nz), (other.nx, other.nz));
        FieldGrid {
            nx: self.nx,
            nz: self.nz,
            values: self
                .values
                .iter()
                .zip(&other.values)
                .map(|(a, b)| a - b)
                .collect(),
        }
    }

    /// 有限値の最小・最大。有限値が無ければ `None`。
    pub fn finite_range(&self) -> Option<(f64, f64)> {
        self.values
            .iter()
            .filter(|v| v.is_finite())
            .fold(None, |acc, &v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }

    pub fn defined_count(&self) -> usize {
        self.values.iter().filter(|v| !v.is_nan()).count()
    }
}

/// 散布点の三角形分割を保持し、複数のフィールドに使い回す線形補間器。
#[derive(Debug, Clone)]
pub struct LinearInterpolator {
    points: Vec<(f64, f64)>,
    triangles: Vec<[usize; 3]>,
}

impl LinearInterpolator {
    /// `(x, z)` の散布点から Delaunay 三角形分割を作ります。
    pub fn new(x: &[f64], z: &[f64]) -> Self {
        let points: Vec<(f64, f64)> = x.iter().copied().zip(z.iter().copied()).collect();
        let delaunator_points: Vec<delaunator::Point> = points
            .iter()
            .map(|&(x, y)| delaunator::Point { x, y })
            .collect();
        let triangulation = delaunator::triangulate(&delaunator_points);
        let triangles: Vec<[usize; 3]> = triangulation
            .triangles
            .chunks_exact(3)
            .map(|t| [t[0], t[1], t[2]])
            .collect();
        debug!(
            points = points.len(),
            triangles = triangles.len(),
            "三角形分割を作成しました"
        );
        Self { points, triangles }
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// 点ごとの値 `values` を格子に補間します。
    pub fn interpolate(&self, values: &[f64], grid: &Grid) -> FieldGrid {
        debug_assert_eq!(values.len(), self.points.len());
        let nz = grid.nz();
        let mut field = FieldGrid::filled(grid.nx(), nz, f64::NAN);

        for tri in &self.triangles {
            let [a, b, c] = tri.map(|i| self.points[i]);
            let det = (b.1 - c.1) * (a.0 - c.0) + (c.0 - b.0) * (a.1 - c.1);
            if det.abs() < f64::EPSILON * (a.0.abs() + b.0.abs() + c.0.abs() + 1.0) {
                continue;
            }
            let [va, vb, vc] = tri.map(|i| values[i]);

            let xs = grid.x_indices(a.0.min(b.0).min(c.0), a.0.max(b.0).max(c.0));
            for i in xs {
                let px = grid.xs[i];
                let zs = grid.z_indices(a.1.min(b.1).min(c.1), a.1.max(b.1).max(c.1));
                for k in zs {
                    let slot = &mut field.values[i * nz + k];
                    if !slot.is_nan() {
                        continue;
                    }
                    let pz = grid.zs[k];
                    let l1 = ((b.1 - c.1) * (px - c.0) + (c.0 - b.0) * (pz - c.1)) / det;
                    let l2 = ((c.1 - a.1) * (px - c.0) + (a.0 - c.0) * (pz - c.1)) / det;
                    let l3 = 1.0 - l1 - l2;
                    if l1 >= -BARYCENTRIC_EPS && l2 >= -BARYCENTRIC_EPS && l3 >= -BARYCENTRIC_EPS
                    {
                        *slot = l1 * va + l2 * vb + l3 * vc;
                    }
                }
            }
        }

        if field.defined_count() == 0 {
            warn!("補間結果がすべて NaN です（凸包の内側に格子点がありません）");
        }
        field
    }
}
