use plotters::prelude::*;

/// `value` を `[vmin, vmax]` で正規化して viridis の色を返します。範囲外は端の色に丸めます。
///
/// `NaN`（データなし）の場合は `None` を返し、その画素は塗りません。
pub fn color_for(value: f64, vmin: f64, vmax: f64) -> Option<RGBColor> {
    if value.is_nan() {
        return None;
    }
    if vmax > vmin {
        Some(ViridisRGB::get_color_normalized(
            value.clamp(vmin, vmax),
            vmin,
            vmax,
        ))
    } else {
        Some(ViridisRGB::get_color_normalized(0.5, 0.0, 1.0))
    }
}
