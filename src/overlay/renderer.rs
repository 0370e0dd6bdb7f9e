use crate::foundation::core::{Canvas, FrameRGBA};
use crate::foundation::error::{PaceframeError, PaceframeResult};
use crate::overlay::maps::{draw_radar_map, draw_route_map};
use crate::overlay::panel::draw_metrics_panel;
use crate::overlay::style::OverlayStyle;
use crate::overlay::text::{FontSet, TextLayoutEngine};
use crate::telemetry::lookup::FrameStats;
use crate::telemetry::series::TelemetrySeries;

/// Rasterizes one overlay frame: metrics panel, global route map, local
/// radar map, over a fully transparent background.
///
/// Stateful per worker (layout contexts and the render context are reused
/// across frames); the output for a given `(stats, canvas, series)` does not
/// depend on any previous frame, which is what makes out-of-order parallel
/// rendering safe.
pub struct OverlayRenderer {
    style: OverlayStyle,
    fonts: FontSet,
    engine: TextLayoutEngine,
    ctx: Option<vello_cpu::RenderContext>,
}

impl OverlayRenderer {
    /// Build a renderer from a style and a loaded font pair.
    pub fn new(style: OverlayStyle, fonts: FontSet) -> PaceframeResult<Self> {
        let engine = TextLayoutEngine::new(&fonts)?;
        Ok(Self {
            style,
            fonts,
            engine,
            ctx: None,
        })
    }

    /// Render the overlay for one frame into straight-alpha RGBA8.
    ///
    /// Both maps are skipped when the activity has no GPS fixes; the result
    /// is then a metrics-panel-only overlay.
    pub fn render(
        &mut self,
        stats: &FrameStats,
        canvas: Canvas,
        series: &TelemetrySeries,
    ) -> PaceframeResult<FrameRGBA> {
        if canvas.width == 0 || canvas.height == 0 {
            return Err(PaceframeError::render("frame dimensions must be non-zero"));
        }
        let width: u16 = canvas
            .width
            .try_into()
            .map_err(|_| PaceframeError::render("frame width exceeds u16"))?;
        let height: u16 = canvas
            .height
            .try_into()
            .map_err(|_| PaceframeError::render("frame height exceeds u16"))?;

        let mut ctx = match self.ctx.take() {
            Some(ctx) if ctx.width() == width && ctx.height() == height => ctx,
            _ => vello_cpu::RenderContext::new(width, height),
        };
        ctx.reset();

        let base = f64::from(canvas.width.min(canvas.height));
        let margin = base * self.style.margin_frac;

        draw_metrics_panel(
            &mut ctx,
            &mut self.engine,
            &self.fonts,
            &self.style,
            stats,
            base,
        )?;

        if let Some(bounds) = series.bounds() {
            let map_size = base * self.style.route_map_frac;
            draw_route_map(
                &mut ctx,
                series.trail(),
                &bounds,
                stats.index,
                f64::from(canvas.width) - map_size - margin,
                margin,
                map_size,
            );

            let radar_size = base * self.style.radar_map_frac;
            draw_radar_map(
                &mut ctx,
                series.trail(),
                stats.index,
                f64::from(canvas.width) - radar_size - margin,
                f64::from(canvas.height) - radar_size - margin,
                radar_size,
                self.style.radar_window_meters,
            );
        }

        ctx.flush();
        let mut pixmap = vello_cpu::Pixmap::new(width, height);
        ctx.render_to_pixmap(&mut pixmap);
        self.ctx = Some(ctx);

        let mut data = pixmap.data_as_u8_slice().to_vec();
        unpremultiply_rgba8_in_place(&mut data);
        Ok(FrameRGBA {
            width: canvas.width,
            height: canvas.height,
            data,
            premultiplied: false,
        })
    }
}

/// Convert premultiplied RGBA8 to straight alpha in place.
fn unpremultiply_rgba8_in_place(bytes: &mut [u8]) {
    for px in bytes.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        if a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
        }
    }
}
