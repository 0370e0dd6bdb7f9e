use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::foundation::error::{PaceframeError, PaceframeResult};
use crate::overlay::style::{OverlayStyle, Rgba};

/// RGBA8 brush color carried through Parley layouts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct TextFill {
    pub(crate) r: u8,
    pub(crate) g: u8,
    pub(crate) b: u8,
    pub(crate) a: u8,
}

impl From<Rgba> for TextFill {
    fn from(c: Rgba) -> Self {
        Self {
            r: c[0],
            g: c[1],
            b: c[2],
            a: c[3],
        }
    }
}

/// Which of the two overlay fonts to shape with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum FontRole {
    /// Metric values.
    Bold,
    /// Unit suffixes.
    Regular,
}

/// A font loaded into memory once per job and shared across workers.
#[derive(Clone)]
pub struct LoadedFont {
    pub(crate) bytes: Arc<Vec<u8>>,
    pub(crate) data: vello_cpu::peniko::FontData,
}

impl LoadedFont {
    fn read(path: &Path) -> PaceframeResult<Self> {
        let bytes = std::fs::read(path).map_err(|e| {
            PaceframeError::input(format!("failed to read font '{}': {e}", path.display()))
        })?;
        let bytes = Arc::new(bytes);
        let data = vello_cpu::peniko::FontData::new(
            vello_cpu::peniko::Blob::from(bytes.as_ref().clone()),
            0,
        );
        Ok(Self { bytes, data })
    }
}

/// The bold/regular font pair used by the metrics panel.
#[derive(Clone)]
pub struct FontSet {
    pub(crate) bold: LoadedFont,
    pub(crate) regular: LoadedFont,
}

const BOLD_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Bold.ttf",
    "/System/Library/Fonts/Supplemental/Arial Bold.ttf",
];

const REGULAR_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
];

fn discover(candidates: &[&str]) -> Option<PathBuf> {
    candidates
        .iter()
        .copied()
        .map(PathBuf::from)
        .find(|p| p.is_file())
}

impl FontSet {
    /// Resolve and load the style's fonts.
    ///
    /// Explicit paths win; otherwise well-known system locations are tried.
    /// A missing regular font falls back to the bold one; no usable bold
    /// font at all is an input error, raised before any pipeline work.
    pub fn load(style: &OverlayStyle) -> PaceframeResult<Self> {
        let bold_path = style
            .font_bold
            .clone()
            .or_else(|| discover(BOLD_CANDIDATES))
            .or_else(|| discover(REGULAR_CANDIDATES))
            .ok_or_else(|| {
                PaceframeError::input(
                    "no usable overlay font found; pass an explicit font path",
                )
            })?;
        let bold = LoadedFont::read(&bold_path)?;

        let regular = match style
            .font_regular
            .clone()
            .or_else(|| discover(REGULAR_CANDIDATES))
        {
            Some(path) if path != bold_path => LoadedFont::read(&path)?,
            _ => bold.clone(),
        };

        Ok(Self { bold, regular })
    }
}

/// One shaping context per font role.
///
/// Bold and regular weights of the same typeface share a family name, so a
/// single shared context could resolve the wrong face and hand out glyph ids
/// that do not match the bytes we draw with. Keeping a context per role pins
/// shaping to the role's own font file.
struct RoleShaper {
    font_ctx: parley::FontContext,
    family: String,
    weight: parley::style::FontWeight,
}

impl RoleShaper {
    fn new(font: &LoadedFont, weight: parley::style::FontWeight) -> PaceframeResult<Self> {
        let mut font_ctx = parley::FontContext::default();
        let family = register_family(&mut font_ctx, font)?;
        Ok(Self {
            font_ctx,
            family,
            weight,
        })
    }
}

/// Stateful helper for building Parley layouts from the overlay font pair.
///
/// One engine per render worker; fonts are registered once at construction.
pub(crate) struct TextLayoutEngine {
    layout_ctx: parley::LayoutContext<TextFill>,
    bold: RoleShaper,
    regular: RoleShaper,
}

impl TextLayoutEngine {
    pub(crate) fn new(fonts: &FontSet) -> PaceframeResult<Self> {
        Ok(Self {
            layout_ctx: parley::LayoutContext::new(),
            bold: RoleShaper::new(&fonts.bold, parley::style::FontWeight::BOLD)?,
            regular: RoleShaper::new(&fonts.regular, parley::style::FontWeight::NORMAL)?,
        })
    }

    /// Shape and lay out a single line of text.
    pub(crate) fn layout(
        &mut self,
        text: &str,
        role: FontRole,
        size_px: f32,
        fill: TextFill,
    ) -> PaceframeResult<parley::Layout<TextFill>> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(PaceframeError::render("text size must be finite and > 0"));
        }
        let shaper = match role {
            FontRole::Bold => &mut self.bold,
            FontRole::Regular => &mut self.regular,
        };

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut shaper.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(shaper.family.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontWeight(shaper.weight));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(fill));

        let mut layout: parley::Layout<TextFill> = builder.build(text);
        layout.break_all_lines(None);
        Ok(layout)
    }
}

fn register_family(
    font_ctx: &mut parley::FontContext,
    font: &LoadedFont,
) -> PaceframeResult<String> {
    let families = font_ctx.collection.register_fonts(
        parley::fontique::Blob::from(font.bytes.as_ref().clone()),
        None,
    );
    let family_id = families
        .first()
        .map(|(id, _)| *id)
        .ok_or_else(|| PaceframeError::input("no font families registered from font bytes"))?;
    let name = font_ctx
        .collection
        .family_name(family_id)
        .ok_or_else(|| PaceframeError::input("registered font family has no name"))?
        .to_string();
    Ok(name)
}

/// Draw an already-built layout into the render context.
///
/// Callers position the text by setting the context transform first; glyph
/// coordinates inside the layout are relative to its own top-left.
pub(crate) fn draw_layout(
    ctx: &mut vello_cpu::RenderContext,
    layout: &parley::Layout<TextFill>,
    font: &LoadedFont,
) {
    for line in layout.lines() {
        for item in line.items() {
            let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                continue;
            };
            let fill = run.style().brush;
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                fill.r, fill.g, fill.b, fill.a,
            ));
            let glyphs = run.glyphs().map(|g| vello_cpu::Glyph {
                id: g.id,
                x: g.x,
                y: g.y,
            });
            ctx.glyph_run(&font.data)
                .font_size(run.run().font_size())
                .fill_glyphs(glyphs);
        }
    }
}
