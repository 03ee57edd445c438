use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use lumen_engine::core::{App, AppControl, FrameCtx};
use lumen_engine::device::GpuInit;
use lumen_engine::logging::{init_logging, LoggingConfig};
use lumen_engine::render::quad::{aspect_fit, QuadRenderer};
use lumen_engine::render::{checkerboard, load_rgba, QuadTexture, SamplerState};
use lumen_engine::window::{Runtime, RuntimeConfig};
use winit::dpi::LogicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::keyboard::{Key, NamedKey};
use winit::window::WindowId;

const USAGE: &str = "usage: lumen-viewer [IMAGE] [--nearest]";

/// Command line options.
#[derive(Debug, Default, PartialEq)]
struct ViewerConfig {
    image: Option<PathBuf>,
    nearest: bool,
}

impl ViewerConfig {
    fn from_args<I>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut config = ViewerConfig::default();
        for arg in args {
            match arg.as_str() {
                "--nearest" => config.nearest = true,
                "-h" | "--help" => bail!("{USAGE}"),
                flag if flag.starts_with('-') => bail!("unknown option {flag}\n{USAGE}"),
                path => {
                    if config.image.is_some() {
                        bail!("only one image may be given\n{USAGE}");
                    }
                    config.image = Some(PathBuf::from(path));
                }
            }
        }
        Ok(config)
    }

    /// Decodes the requested image, or builds the checkerboard stand-in.
    fn source_image(&self) -> Result<image::RgbaImage> {
        match self.image.as_deref() {
            Some(path) => load_rgba(path),
            None => {
                log::info!("no image given; showing a checkerboard");
                Ok(checkerboard(256, 8))
            }
        }
    }

    fn sampler(&self) -> SamplerState {
        if self.nearest {
            SamplerState::nearest()
        } else {
            SamplerState::default()
        }
    }
}

struct Viewer {
    renderer: QuadRenderer,
    /// Decoded image waiting for the first frame's device.
    pending: Option<(image::RgbaImage, String)>,
    error: Option<anyhow::Error>,
}

impl Viewer {
    fn new(config: &ViewerConfig, image: image::RgbaImage) -> Self {
        let label = match config.image.as_deref() {
            Some(path) => path.display().to_string(),
            None => "checkerboard".to_string(),
        };
        Self {
            renderer: QuadRenderer::with_sampler(config.sampler()),
            pending: Some((image, label)),
            error: None,
        }
    }

    fn ensure_texture(&mut self, ctx: &FrameCtx<'_, '_>) -> Result<()> {
        let Some((image, label)) = self.pending.take() else {
            return Ok(());
        };
        let texture =
            QuadTexture::from_image(ctx.device(), ctx.queue(), &image, Some(label.as_str()))
                .with_context(|| format!("failed to upload {label}"))?;
        self.renderer.set_texture(&texture);
        Ok(())
    }
}

impl App for Viewer {
    fn on_window_event(&mut self, _window_id: WindowId, event: &WindowEvent) -> AppControl {
        match event {
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        logical_key: Key::Named(NamedKey::Escape),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => AppControl::Exit,
            _ => AppControl::Continue,
        }
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        if let Err(e) = self.ensure_texture(ctx) {
            self.error = Some(e);
            return AppControl::Exit;
        }

        let Some((w, h)) = self.renderer.texture_size() else {
            return AppControl::Continue;
        };
        let projection = aspect_fit(w, h, ctx.viewport());

        let renderer = &mut self.renderer;
        ctx.render(wgpu::Color::WHITE, |rctx, target| {
            renderer.render(rctx, target, &projection);
        })
    }

    fn on_exit(&mut self) -> Result<()> {
        match self.error.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let config = ViewerConfig::from_args(std::env::args().skip(1))?;
    log::debug!("{config:?}");
    let image = config.source_image()?;

    Runtime::run(
        RuntimeConfig {
            title: "Lumen Viewer".to_string(),
            initial_size: LogicalSize::new(800.0, 600.0),
        },
        GpuInit::default(),
        Viewer::new(&config, image),
    )
}
