use crate::foundation::error::PaceframeResult;
use crate::overlay::style::{OverlayStyle, UNIT_COLOR, VALUE_COLOR};
use crate::overlay::text::{FontRole, FontSet, TextLayoutEngine, draw_layout};
use crate::telemetry::lookup::FrameStats;

/// Horizontal gap between a value and its unit suffix, in pixels.
const UNIT_GAP: f64 = 5.0;

/// Draw the metrics panel in the top-left corner.
///
/// Fixed order: heart rate, pace, cadence, distance, power. Each row is a
/// bold value followed by a smaller unit suffix, nudged down by 15% of the
/// value font size to sit on a common visual baseline.
pub(crate) fn draw_metrics_panel(
    ctx: &mut vello_cpu::RenderContext,
    engine: &mut TextLayoutEngine,
    fonts: &FontSet,
    style: &OverlayStyle,
    stats: &FrameStats,
    base: f64,
) -> PaceframeResult<()> {
    let font_size = base * style.font_frac;
    let font_size_small = base * style.font_small_frac;
    let margin = base * style.margin_frac;
    let padding = base * style.padding_frac;
    let line_height = font_size * 1.3;

    let rows = [
        (format!("♥ {}", stats.heart_rate), "bpm"),
        (format!("⚡ {}", stats.pace), "/km"),
        (format!("⟳ {}", stats.cadence_spm), "spm"),
        (format!("⊙ {:.2}", stats.distance_km), "km"),
        (format!("⚙ {}", stats.power), "W"),
    ];

    let x = margin + padding;
    let mut y = margin + padding;
    for (value, unit) in rows {
        let value_layout =
            engine.layout(&value, FontRole::Bold, font_size as f32, VALUE_COLOR.into())?;
        ctx.set_transform(vello_cpu::kurbo::Affine::translate((x, y)));
        draw_layout(ctx, &value_layout, &fonts.bold);

        let unit_layout = engine.layout(
            unit,
            FontRole::Regular,
            font_size_small as f32,
            UNIT_COLOR.into(),
        )?;
        let unit_x = x + f64::from(value_layout.width()) + UNIT_GAP;
        let unit_y = y + font_size * 0.15;
        ctx.set_transform(vello_cpu::kurbo::Affine::translate((unit_x, unit_y)));
        draw_layout(ctx, &unit_layout, &fonts.regular);

        y += line_height;
    }
    Ok(())
}
