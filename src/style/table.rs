//! Per-style layout and capture data.
//!
//! Every attribute of a style lives in one [`StyleDescriptor`] row; [`OutputSpec`] and
//! [`RenderConfig`] are projections of that row, so the two views cannot drift apart. The lookup
//! is an exhaustive `match`: adding a style without a row does not compile.

use crate::{
    foundation::core::{Color, Size},
    quality::QualityTier,
    style::catalog::ArtifactStyle,
};

/// Base layout of a style: design rectangle plus resolution compensation.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct OutputSpec {
    /// Design width in points.
    pub design_width: f64,
    /// Design height in points.
    pub design_height: f64,
    /// Extra resolution multiplier applied on top of the quality tier (`>= 1.0`).
    pub extra_scale: f64,
}

impl OutputSpec {
    /// Design rectangle as a [`Size`].
    pub fn design_size(&self) -> Size {
        Size::new(self.design_width, self.design_height)
    }

    /// `design_width / design_height`.
    pub fn aspect_ratio(&self) -> f64 {
        self.design_width / self.design_height
    }

    /// Elongated formats (`aspect < 0.5` or `aspect > 2.0`).
    pub fn is_long_format(&self) -> bool {
        let aspect = self.aspect_ratio();
        aspect < 0.5 || aspect > 2.0
    }
}

/// Capture-time parameters of a style.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct RenderConfig {
    /// Capture width in points.
    pub width: f64,
    /// Capture height in points.
    pub height: f64,
    /// Default capture multiplier: the default quality tier times the style's extra scale.
    pub scale: f64,
    /// Whether an animation must settle before capture.
    pub is_animated: bool,
    /// Settle wait in seconds (`0.0` for static styles).
    pub animation_delay_secs: f64,
    /// Whether `background_color` must be painted behind the composition.
    pub needs_background: bool,
    /// Fill used when `needs_background` is set.
    pub background_color: Color,
    /// Rounded-corner radius in points applied after capture (`0.0` = none).
    pub corner_radius: f64,
}

/// How the orchestrator renders a style.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RenderBranch {
    /// Rendered directly.
    Static,
    /// Held by the animation gate before capture.
    Animated,
    /// Content-sized composition clamped by a fixed-height frame.
    SpecialCase,
}

impl std::fmt::Display for RenderBranch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Static => "static",
            Self::Animated => "animated",
            Self::SpecialCase => "special-case",
        })
    }
}

/// The single source of truth for a style.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StyleDescriptor {
    /// Design width in points.
    pub design_width: f64,
    /// Design height in points.
    pub design_height: f64,
    /// Resolution compensation for elongated formats.
    pub extra_scale: f64,
    /// Settle wait for animated styles.
    pub settle_secs: Option<f64>,
    /// Background painted behind the composition, if any.
    pub background: Option<Color>,
    /// Rounded-corner post-process radius in points.
    pub corner_radius: f64,
    /// Natural content size is dynamic; rendered inside a fixed-height frame.
    pub content_sized: bool,
}

/// Background painted when a style does not declare one.
const PAPER_WHITE: Color = Color::rgb(0xff, 0xff, 0xff);

const fn row(
    design_width: f64,
    design_height: f64,
    extra_scale: f64,
    settle_secs: Option<f64>,
    background: Option<Color>,
    corner_radius: f64,
    content_sized: bool,
) -> StyleDescriptor {
    StyleDescriptor {
        design_width,
        design_height,
        extra_scale,
        settle_secs,
        background,
        corner_radius,
        content_sized,
    }
}

impl ArtifactStyle {
    /// Full descriptor row for this style.
    #[rustfmt::skip]
    pub const fn descriptor(self) -> StyleDescriptor {
        use ArtifactStyle as S;

        match self {
            S::Envelope => row(360.0, 240.0, 1.0, Some(3.0), Some(Color::rgb(0xf4, 0xef, 0xe6)), 0.0, false),
            S::Postcard => row(360.0, 240.0, 1.0, None, Some(Color::rgb(0xfb, 0xf7, 0xee)), 0.0, false),
            S::Telegram => row(340.0, 300.0, 1.0, None, Some(Color::rgb(0xf2, 0xe9, 0xd0)), 0.0, false),
            S::WaxSealLetter => row(320.0, 420.0, 1.0, Some(2.5), Some(Color::rgb(0xef, 0xe6, 0xd2)), 0.0, false),
            S::Receipt => row(280.0, 640.0, 1.25, None, Some(Color::rgb(0xff, 0xff, 0xff)), 0.0, true),
            S::ThermalTicket => row(240.0, 560.0, 1.25, None, Some(Color::rgb(0xfa, 0xfa, 0xf7)), 0.0, true),
            S::MovieTicket => row(400.0, 180.0, 1.2, None, Some(Color::rgb(0xf7, 0xe7, 0xc6)), 8.0, false),
            S::ConcertTicket => row(420.0, 180.0, 1.2, Some(1.5), Some(Color::rgb(0x1e, 0x1b, 0x2e)), 8.0, false),
            S::BoardingPass => row(440.0, 200.0, 1.2, Some(2.0), Some(Color::rgb(0xf5, 0xf7, 0xfa)), 12.0, false),
            S::TrainTicket => row(380.0, 170.0, 1.2, None, Some(Color::rgb(0xe9, 0xf0, 0xe4)), 6.0, false),
            S::Polaroid => row(300.0, 360.0, 1.0, Some(4.5), Some(Color::rgb(0xff, 0xff, 0xff)), 0.0, true),
            S::FilmStrip => row(160.0, 560.0, 1.5, None, Some(Color::rgb(0x11, 0x11, 0x11)), 0.0, false),
            S::Bookmark => row(120.0, 420.0, 1.5, None, None, 16.0, true),
            S::PressedFlower => row(320.0, 420.0, 1.0, Some(0.5), Some(Color::rgb(0xf6, 0xf1, 0xe4)), 0.0, false),
            S::Stamp => row(220.0, 260.0, 1.0, None, None, 0.0, false),
            S::Matchbook => row(200.0, 300.0, 1.0, None, Some(Color::rgb(0xb2, 0x3a, 0x2e)), 6.0, false),
            S::VinylLabel => row(340.0, 340.0, 1.0, Some(2.0), None, 170.0, true),
            S::Cassette => row(400.0, 250.0, 1.0, None, Some(Color::rgb(0x2b, 0x2b, 0x2b)), 14.0, false),
            S::StickyNote => row(300.0, 300.0, 1.0, None, Some(Color::rgb(0xff, 0xf3, 0xa3)), 4.0, false),
            S::IndexCard => row(400.0, 240.0, 1.0, None, Some(Color::rgb(0xff, 0xff, 0xff)), 0.0, false),
            S::Typewriter => row(320.0, 440.0, 1.0, Some(3.5), Some(Color::rgb(0xf8, 0xf4, 0xea)), 0.0, false),
            S::Notebook => row(340.0, 480.0, 1.0, None, Some(Color::rgb(0xfd, 0xfc, 0xf7)), 0.0, false),
            S::LibraryCard => row(300.0, 420.0, 1.0, None, Some(Color::rgb(0xf3, 0xe6, 0xc8)), 0.0, false),
            S::Calendar => row(320.0, 360.0, 1.0, None, Some(Color::rgb(0xff, 0xff, 0xff)), 10.0, false),
            S::FortuneCookie => row(380.0, 160.0, 1.2, Some(1.0), Some(Color::rgb(0xff, 0xfd, 0xf5)), 6.0, false),
        }
    }

    /// Base layout spec (design rectangle + extra scale).
    pub fn output_spec(self) -> OutputSpec {
        let d = self.descriptor();
        OutputSpec {
            design_width: d.design_width,
            design_height: d.design_height,
            extra_scale: d.extra_scale,
        }
    }

    /// Capture configuration.
    pub fn render_config(self) -> RenderConfig {
        let d = self.descriptor();
        RenderConfig {
            width: d.design_width,
            height: d.design_height,
            scale: QualityTier::DEFAULT.base_scale() * d.extra_scale,
            is_animated: d.settle_secs.is_some(),
            animation_delay_secs: d.settle_secs.unwrap_or(0.0),
            needs_background: d.background.is_some(),
            background_color: d.background.unwrap_or(PAPER_WHITE),
            corner_radius: d.corner_radius,
        }
    }

    /// Render path the orchestrator takes for this style.
    ///
    /// Content-sized styles report `SpecialCase` even when they also animate.
    pub fn render_branch(self) -> RenderBranch {
        let d = self.descriptor();
        if d.content_sized {
            RenderBranch::SpecialCase
        } else if d.settle_secs.is_some() {
            RenderBranch::Animated
        } else {
            RenderBranch::Static
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/style/table.rs"]
mod tests;
