use std::path::PathBuf;

use clap::Parser;
use mosaic_core::loader::CATALOG_PATH;
use mosaic_core::AssetSource;
use mosaic_engine::device::GpuInit;
use mosaic_engine::logging::LoggingConfig;
use mosaic_engine::paint::Color;
use mosaic_engine::window::RuntimeConfig;
use winit::dpi::LogicalSize;

/// Canvas background, `#f4f4f4`.
pub const BACKGROUND: u32 = 0xf4f4f4;

/// Fallback fonts for the info panel when `--font` is not given.
const SYSTEM_FONTS: &[&str] = &[
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/noto/NotoSans-Regular.ttf",
    "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

#[derive(Debug, Parser)]
#[command(name = "mosaic")]
#[command(about = "Textured polygon viewer with group highlighting")]
pub struct ViewerArgs {
    /// Asset root containing data/ and textures/
    #[arg(long, default_value = ".")]
    pub assets: PathBuf,

    /// Catalog file (defaults to <assets>/data/shapes.json)
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Initial window width in logical pixels
    #[arg(long, default_value_t = 1000.0)]
    pub width: f64,

    /// Initial window height in logical pixels
    #[arg(long, default_value_t = 800.0)]
    pub height: f64,

    #[arg(long, default_value = "mosaic")]
    pub title: String,

    /// TrueType/OpenType font for the info panel
    #[arg(long)]
    pub font: Option<PathBuf>,

    /// Disable multisample antialiasing
    #[arg(long)]
    pub no_antialias: bool,

    /// Log filter in env_logger syntax (overrides RUST_LOG)
    #[arg(long)]
    pub log: Option<String>,
}

/// Resolved viewer settings.
#[derive(Debug, Clone)]
pub struct ViewerConfig {
    pub assets: AssetSource,
    pub window: RuntimeConfig,
    pub font: Option<PathBuf>,
    pub antialias: bool,
    pub log_filter: Option<String>,
    pub background: Color,
}

impl From<ViewerArgs> for ViewerConfig {
    fn from(args: ViewerArgs) -> Self {
        let mut assets = AssetSource::new(&args.assets);
        if let Some(catalog) = args.catalog {
            assets = assets.with_catalog(catalog);
        }

        Self {
            assets,
            window: RuntimeConfig {
                title: args.title,
                initial_size: LogicalSize::new(args.width.max(1.0), args.height.max(1.0)),
            },
            font: args.font,
            antialias: !args.no_antialias,
            log_filter: args.log,
            background: Color::from_hex_rgb(BACKGROUND),
        }
    }
}

impl ViewerConfig {
    pub fn logging(&self) -> LoggingConfig {
        LoggingConfig {
            env_filter: self.log_filter.clone(),
            ..LoggingConfig::default()
        }
    }

    pub fn gpu(&self) -> GpuInit {
        GpuInit {
            sample_count: if self.antialias { 4 } else { 1 },
            ..GpuInit::default()
        }
    }

    /// Reads the configured font, or the first system font that exists.
    ///
    /// Returns `None` when nothing is readable; the viewer then logs clicks
    /// without drawing the panel text.
    pub fn font_bytes(&self) -> Option<Vec<u8>> {
        if let Some(path) = &self.font {
            match std::fs::read(path) {
                Ok(bytes) => return Some(bytes),
                Err(e) => log::warn!("cannot read font {}: {e}", path.display()),
            }
        }
        SYSTEM_FONTS.iter().find_map(|p| std::fs::read(p).ok())
    }
}
