use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use glam::Vec2;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use sdl2::event::{Event, WindowEvent};
use sdl2::image::{InitFlag as ImageInitFlag, LoadTexture, Sdl2ImageContext};
use sdl2::keyboard::Keycode;
use sdl2::mouse::MouseButton;
use sdl2::pixels::Color as SdlColor;
use sdl2::rect::{Point, Rect};
use sdl2::render::{BlendMode, Canvas, Texture, TextureCreator};
use sdl2::ttf::Font;
use sdl2::video::{Window, WindowContext};
use sdl2::{AudioSubsystem, EventPump, Sdl};
use tracing::{debug, info, trace, warn};

use crate::audio::Audio;
use crate::beat::{load_wav, BeatTrack};
use crate::config::SessionConfig;
use crate::constants::{field, loop_time, note, DEFAULT_FPS};
use crate::error::{AssetError, GameError, GameResult};
use crate::events::GameCommand;
use crate::formatter;
use crate::game::Game;
use crate::platform::{self, SessionClock};
use crate::summary::SessionSummary;
use crate::systems::{Color, DrawCommand, TickInput, Tier, VideoInfo};

const FRAME_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "bmp"];
const FONT_SIZE: u16 = 24;

/// What the binary was asked to play.
#[derive(Debug, Clone)]
pub struct AppOptions {
    pub audio: PathBuf,
    pub frames: PathBuf,
    /// Overrides the nominal video frame rate.
    pub fps: Option<f64>,
    pub font: Option<PathBuf>,
    /// Makes note placement and particles replayable.
    pub seed: Option<u64>,
    pub config: SessionConfig,
}

/// Main application wrapper that manages SDL initialization, window lifecycle, and the game loop.
pub struct App {
    pub game: Game,
    canvas: Canvas<Window>,
    texture_creator: TextureCreator<WindowContext>,
    event_pump: EventPump,
    frames: Vec<Texture>,
    font: Option<Font<'static, 'static>>,
    audio: Audio,
    clock: SessionClock,
    loop_time: Duration,
    focused: bool,
    /// Escape pressed before the session started.
    quit_requested: bool,
    last_title: String,
    _image_context: Sdl2ImageContext,
    // Keep SDL alive for the app lifetime so subsystems (audio) are not shut down
    _audio_subsystem: AudioSubsystem,
    _sdl_context: Sdl,
}

impl App {
    /// Analyzes the audio track, opens the window, preloads every video frame and starts playback.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Sdl` if any SDL initialization step fails and `GameError::Asset`
    /// if the frame directory cannot be read.
    pub fn new(options: AppOptions) -> GameResult<Self> {
        let track = analyze(&options.audio, &options.config);

        info!("Initializing SDL2 application");
        let sdl_context = sdl2::init().map_err(GameError::Sdl)?;
        let video_subsystem = sdl_context.video().map_err(GameError::Sdl)?;
        let audio_subsystem = sdl_context.audio().map_err(GameError::Sdl)?;
        let image_context = sdl2::image::init(ImageInitFlag::PNG | ImageInitFlag::JPG).map_err(GameError::Sdl)?;
        let mut event_pump = sdl_context.event_pump().map_err(GameError::Sdl)?;

        let window = video_subsystem
            .window("beatdrop", field::SIZE.x as u32, field::SIZE.y as u32)
            .position_centered()
            .build()
            .map_err(|e| GameError::Sdl(e.to_string()))?;
        let mut canvas = window
            .into_canvas()
            .accelerated()
            .build()
            .map_err(|e| GameError::Sdl(e.to_string()))?;
        canvas
            .set_logical_size(field::SIZE.x as u32, field::SIZE.y as u32)
            .map_err(|e| GameError::Sdl(e.to_string()))?;
        canvas.set_blend_mode(BlendMode::Blend);
        debug!(renderer_info = ?canvas.info(), "Canvas renderer initialized");

        let texture_creator = canvas.texture_creator();
        let font = load_font(options.font.as_deref());

        let (frames, quit_requested) =
            load_frames(&options.frames, &mut canvas, &texture_creator, &mut event_pump, font.as_ref())?;

        let fps = options.fps.unwrap_or(DEFAULT_FPS);
        let video = VideoInfo::new(frames.len(), fps);
        let rng = match options.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        };

        let mut audio = Audio::new(&options.audio);
        let clock = SessionClock::start();
        let game = Game::new(options.config, track, video, rng, clock.now())?;
        if !quit_requested {
            audio.play();
        }

        info!(loop_time = ?loop_time(video.fps), "Application initialization completed successfully");
        Ok(App {
            game,
            canvas,
            texture_creator,
            event_pump,
            frames,
            font,
            audio,
            clock,
            loop_time: loop_time(video.fps),
            focused: true,
            quit_requested,
            last_title: String::new(),
            _image_context: image_context,
            _audio_subsystem: audio_subsystem,
            _sdl_context: sdl_context,
        })
    }

    /// Executes a single tick of the game loop, sleeping out the rest of the frame budget.
    ///
    /// # Returns
    ///
    /// `true` if the session should continue, `false` once it has ended.
    pub fn run(&mut self) -> bool {
        let start = Instant::now();
        formatter::increment_tick();

        let mut input = self.poll_input();
        if self.audio.is_finished() {
            input.apply(GameCommand::MusicFinished);
        }

        let ended = self.game.tick(self.clock.now(), input);
        if let Err(e) = self.draw() {
            warn!("Failed to draw frame: {e}");
        }

        if ended {
            self.audio.stop();
            return false;
        }

        let spent = start.elapsed();
        if spent < self.loop_time {
            platform::sleep(self.loop_time - spent, self.focused);
        } else {
            trace!(behind = ?(spent - self.loop_time), "Game loop behind schedule");
        }

        true
    }

    pub fn summary(&self) -> SessionSummary {
        self.game.summary()
    }

    fn poll_input(&mut self) -> TickInput {
        let mut input = TickInput::idle();
        if std::mem::take(&mut self.quit_requested) {
            input.apply(GameCommand::Exit);
        }

        for event in self.event_pump.poll_iter() {
            match event {
                Event::Quit { .. }
                | Event::KeyDown {
                    keycode: Some(Keycode::Escape),
                    ..
                } => input.apply(GameCommand::Exit),
                Event::MouseButtonDown {
                    mouse_btn: MouseButton::Left,
                    x,
                    y,
                    ..
                } => {
                    trace!(x, y, "Click");
                    input.push_click(Vec2::new(x as f32, y as f32));
                }
                Event::Window { win_event, .. } => match win_event {
                    WindowEvent::FocusGained => self.focused = true,
                    WindowEvent::FocusLost => self.focused = false,
                    _ => {}
                },
                _ => {}
            }
        }

        input
    }

    fn draw(&mut self) -> Result<(), String> {
        self.canvas.set_draw_color(SdlColor::BLACK);
        self.canvas.clear();

        for command in self.game.draw_list() {
            match command {
                DrawCommand::Background { frame } => {
                    if let Some(texture) = self.frames.get(*frame) {
                        self.canvas.copy(texture, None, None)?;
                    }
                }
                DrawCommand::Overlay { alpha } => {
                    self.canvas.set_draw_color(SdlColor::RGBA(0, 0, 0, *alpha));
                    self.canvas.fill_rect(None)?;
                }
                DrawCommand::Note { position, radius, color } => {
                    self.canvas.set_draw_color(to_sdl(*color));
                    fill_circle(&mut self.canvas, *position, *radius)?;
                }
                DrawCommand::Badge {
                    position,
                    tier,
                    scale,
                    alpha,
                } => {
                    let color = tier.color().with_alpha((alpha * 255.0) as u8);
                    self.canvas.set_draw_color(to_sdl(color));
                    let radius = note::MAX_RADIUS * scale;
                    outline_circle(&mut self.canvas, *position, radius)?;
                    outline_circle(&mut self.canvas, *position, radius - 2.0)?;
                    if let Some(font) = &self.font {
                        draw_text(
                            &mut self.canvas,
                            &self.texture_creator,
                            font,
                            badge_label(*tier),
                            *position + Vec2::new(-note::MAX_RADIUS, note::MAX_RADIUS),
                            color,
                        )?;
                    }
                }
                DrawCommand::Particle { position, color, size } => {
                    self.canvas.set_draw_color(to_sdl(*color));
                    self.canvas.fill_rect(square(*position, *size))?;
                }
                DrawCommand::Text { text, position, color } => match &self.font {
                    Some(font) => draw_text(&mut self.canvas, &self.texture_creator, font, text, *position, *color)?,
                    None => {
                        if *text != self.last_title {
                            self.canvas
                                .window_mut()
                                .set_title(&format!("beatdrop - {text}"))
                                .map_err(|e| e.to_string())?;
                            self.last_title = text.clone();
                        }
                    }
                },
            }
        }

        self.canvas.present();
        Ok(())
    }
}

impl Drop for App {
    fn drop(&mut self) {
        for texture in self.frames.drain(..) {
            // SAFETY: the renderer that created these textures is still alive
            unsafe { texture.destroy() };
        }
    }
}

/// Runs beat extraction; any failure yields an empty track and a session without notes.
fn analyze(path: &Path, config: &SessionConfig) -> BeatTrack {
    let decoded = match load_wav(path) {
        Ok(decoded) => decoded,
        Err(e) => {
            warn!("Could not decode {} for analysis: {e}", path.display());
            return BeatTrack::empty();
        }
    };

    match BeatTrack::extract(&decoded.samples, decoded.sample_rate, config.amplitude_mode) {
        Ok(track) => track,
        Err(e) => {
            warn!("Beat extraction failed, no notes will spawn: {e}");
            BeatTrack::empty()
        }
    }
}

fn load_font(path: Option<&Path>) -> Option<Font<'static, 'static>> {
    let path = path?;
    let ttf_context = match sdl2::ttf::init() {
        Ok(context) => {
            let context: &'static sdl2::ttf::Sdl2TtfContext = Box::leak(Box::new(context));
            context
        }
        Err(e) => {
            warn!("Failed to initialize SDL2_ttf: {e}");
            return None;
        }
    };

    match ttf_context.load_font(path, FONT_SIZE) {
        Ok(font) => Some(font),
        Err(e) => {
            warn!("Failed to load font {}: {e}", path.display());
            None
        }
    }
}

/// Sorted image files in `dir`.
fn frame_paths(dir: &Path) -> Result<Vec<PathBuf>, AssetError> {
    if !dir.is_dir() {
        return Err(AssetError::NotFound(dir.display().to_string()));
    }

    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|entry| entry.path()))
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| FRAME_EXTENSIONS.iter().any(|known| ext.eq_ignore_ascii_case(known)))
        })
        .collect();
    paths.sort();
    Ok(paths)
}

/// Loads every frame as a texture, drawing the progress as it goes.
///
/// Returns the textures and whether the user asked to quit while waiting.
fn load_frames(
    dir: &Path,
    canvas: &mut Canvas<Window>,
    texture_creator: &TextureCreator<WindowContext>,
    event_pump: &mut EventPump,
    font: Option<&Font<'static, 'static>>,
) -> GameResult<(Vec<Texture>, bool)> {
    let paths = frame_paths(dir)?;
    if paths.is_empty() {
        warn!(dir = %dir.display(), "No video frames found, playing without a background");
        return Ok((Vec::new(), false));
    }

    info!(count = paths.len(), dir = %dir.display(), "Loading video frames");
    let mut frames = Vec::with_capacity(paths.len());
    let mut last_percent = None;

    for (i, path) in paths.iter().enumerate() {
        let quit = event_pump.poll_iter().any(|event| {
            matches!(
                event,
                Event::Quit { .. }
                    | Event::KeyDown {
                        keycode: Some(Keycode::Escape),
                        ..
                    }
            )
        });
        if quit {
            info!(loaded = frames.len(), "Exit requested while loading");
            return Ok((frames, true));
        }

        let texture = texture_creator
            .load_texture(path)
            .map_err(|e| GameError::Sdl(format!("{}: {e}", path.display())))?;
        frames.push(texture);

        let percent = (i + 1) * 100 / paths.len();
        if last_percent != Some(percent) {
            last_percent = Some(percent);
            if percent % 10 == 0 {
                debug!(percent, "Loading video frames");
            }
            draw_loading(canvas, texture_creator, font, percent).map_err(GameError::Sdl)?;
        }
    }

    Ok((frames, false))
}

fn draw_loading(
    canvas: &mut Canvas<Window>,
    texture_creator: &TextureCreator<WindowContext>,
    font: Option<&Font<'static, 'static>>,
    percent: usize,
) -> Result<(), String> {
    let label = format!("Loading: {percent}%");
    canvas.set_draw_color(SdlColor::BLACK);
    canvas.clear();

    let width = field::SIZE.x / 2.0;
    let origin = Vec2::new(field::SIZE.x / 4.0, field::SIZE.y / 2.0);
    canvas.set_draw_color(SdlColor::RGB(60, 60, 60));
    canvas.fill_rect(Rect::new(origin.x as i32, origin.y as i32, width as u32, 12))?;
    canvas.set_draw_color(SdlColor::WHITE);
    canvas.fill_rect(Rect::new(
        origin.x as i32,
        origin.y as i32,
        (width * percent as f32 / 100.0).max(1.0) as u32,
        12,
    ))?;

    match font {
        Some(font) => draw_text(
            canvas,
            texture_creator,
            font,
            &label,
            origin - Vec2::new(0.0, 40.0),
            Color::WHITE,
        )?,
        None => canvas.window_mut().set_title(&label).map_err(|e| e.to_string())?,
    }

    canvas.present();
    Ok(())
}

fn draw_text(
    canvas: &mut Canvas<Window>,
    texture_creator: &TextureCreator<WindowContext>,
    font: &Font<'static, 'static>,
    text: &str,
    position: Vec2,
    color: Color,
) -> Result<(), String> {
    let surface = font.render(text).blended(to_sdl(color)).map_err(|e| e.to_string())?;
    let texture = texture_creator
        .create_texture_from_surface(&surface)
        .map_err(|e| e.to_string())?;
    let target = Rect::new(position.x as i32, position.y as i32, surface.width(), surface.height());
    let result = canvas.copy(&texture, None, target);
    // SAFETY: the texture was created by this canvas' texture creator and is not used again
    unsafe { texture.destroy() };
    result
}

fn badge_label(tier: Tier) -> &'static str {
    match tier {
        Tier::Miss => "MISS",
        Tier::Good => "GOOD",
        Tier::Excellent => "EXCELLENT",
    }
}

fn to_sdl(color: Color) -> SdlColor {
    SdlColor::RGBA(color.r, color.g, color.b, color.a)
}

fn square(center: Vec2, size: f32) -> Rect {
    let half = size / 2.0;
    Rect::new(
        (center.x - half) as i32,
        (center.y - half) as i32,
        size.max(1.0) as u32,
        size.max(1.0) as u32,
    )
}

fn fill_circle(canvas: &mut Canvas<Window>, center: Vec2, radius: f32) -> Result<(), String> {
    let r = radius.max(0.0) as i32;
    let (cx, cy) = (center.x as i32, center.y as i32);
    for dy in -r..=r {
        let dx = ((r * r - dy * dy) as f32).sqrt() as i32;
        canvas.draw_line(Point::new(cx - dx, cy + dy), Point::new(cx + dx, cy + dy))?;
    }
    Ok(())
}

fn outline_circle(canvas: &mut Canvas<Window>, center: Vec2, radius: f32) -> Result<(), String> {
    if radius <= 0.0 {
        return Ok(());
    }

    let steps = ((radius * std::f32::consts::TAU) as usize).max(8);
    let points: Vec<Point> = (0..steps)
        .map(|i| {
            let offset = Vec2::from_angle(i as f32 / steps as f32 * std::f32::consts::TAU) * radius;
            Point::new((center.x + offset.x) as i32, (center.y + offset.y) as i32)
        })
        .collect();
    canvas.draw_points(points.as_slice())
}
