//! SDL2 backend for the Juka kiosk player.
//!
//! Implements `RenderBackend` and `InputBackend` using SDL2, with SDL_ttf
//! for text and SDL_image for pictures. Keyboard and game controller input
//! are both mapped onto the same kiosk buttons.

mod font;

use std::collections::HashMap;
use std::rc::Rc;

use sdl2::EventPump;
use sdl2::GameControllerSubsystem;
use sdl2::controller::{Button as PadButton, GameController};
use sdl2::event::Event;
use sdl2::image::{InitFlag, LoadTexture, Sdl2ImageContext};
use sdl2::keyboard::Keycode;
use sdl2::render::{BlendMode, Canvas, Texture, TextureCreator};
use sdl2::video::{Window, WindowContext};

use juka_core::backend::{Color, FontSpec, InputBackend, Rect, RenderBackend, TextureId};
use juka_core::error::{JukaError, Result};
use juka_core::input::{Button, InputEvent, Shoulder};

pub use font::FontCache;

/// SDL2 rendering and input backend.
///
/// # Safety
///
/// `textures` is declared before `texture_creator` so that Rust's drop order
/// (declaration order) destroys all textures before the creator they borrow from.
/// The `Texture<'static>` lifetime is erased via transmute before `store_texture()` --
/// this is sound because the `TextureCreator` always outlives the textures.
pub struct SdlBackend {
    canvas: Canvas<Window>,
    event_pump: EventPump,
    textures: HashMap<u64, Texture<'static>>,
    texture_creator: TextureCreator<WindowContext>,
    next_texture_id: u64,
    fonts: Rc<FontCache>,
    controllers: GameControllerSubsystem,
    controller: Option<GameController>,
    _image: Sdl2ImageContext,
}

fn backend_err(e: impl std::fmt::Display) -> JukaError {
    JukaError::Backend(e.to_string())
}

impl SdlBackend {
    /// Create the window, renderer, font cache and controller subsystem.
    ///
    /// `controller_mappings` are SDL game controller mapping strings
    /// registered before the first controller is opened.
    pub fn new(title: &str, width: u32, height: u32, controller_mappings: &[String]) -> Result<Self> {
        let sdl = sdl2::init().map_err(backend_err)?;
        let video = sdl.video().map_err(backend_err)?;
        let window = video
            .window(title, width, height)
            .position_centered()
            .build()
            .map_err(backend_err)?;
        let canvas = window
            .into_canvas()
            .accelerated()
            .present_vsync()
            .build()
            .map_err(backend_err)?;
        let texture_creator = canvas.texture_creator();
        let event_pump = sdl.event_pump().map_err(backend_err)?;
        let image = sdl2::image::init(InitFlag::PNG | InitFlag::JPG).map_err(backend_err)?;
        let fonts = Rc::new(FontCache::new()?);
        video.text_input().start();

        let controllers = sdl.game_controller().map_err(backend_err)?;
        for mapping in controller_mappings {
            if let Err(e) = controllers.add_mapping(mapping) {
                log::warn!("Rejected controller mapping: {e}");
            }
        }

        log::info!("SDL2 backend initialized: {width}x{height}");

        let mut backend = Self {
            canvas,
            event_pump,
            textures: HashMap::new(),
            texture_creator,
            next_texture_id: 1,
            fonts,
            controllers,
            controller: None,
            _image: image,
        };
        backend.open_first_controller();
        Ok(backend)
    }

    /// Shared font cache, for text measurement outside the backend.
    pub fn fonts(&self) -> Rc<FontCache> {
        Rc::clone(&self.fonts)
    }

    fn open_first_controller(&mut self) {
        if self.controller.is_some() {
            return;
        }
        let count = match self.controllers.num_joysticks() {
            Ok(n) => n,
            Err(e) => {
                log::warn!("Cannot enumerate joysticks: {e}");
                return;
            },
        };
        for index in (0..count).filter(|&i| self.controllers.is_game_controller(i)) {
            match self.controllers.open(index) {
                Ok(pad) => {
                    log::info!("Opened controller: {}", pad.name());
                    self.controller = Some(pad);
                    return;
                },
                Err(e) => log::warn!("Failed to open controller {index}: {e}"),
            }
        }
    }

    /// Set the SDL draw color with optional blend mode.
    fn set_color(&mut self, color: Color) {
        if color.a < 255 {
            self.canvas.set_blend_mode(BlendMode::Blend);
        } else {
            self.canvas.set_blend_mode(BlendMode::None);
        }
        self.canvas.set_draw_color(sdl2::pixels::Color::RGBA(
            color.r, color.g, color.b, color.a,
        ));
    }

    fn store_texture(&mut self, texture: Texture<'static>) -> TextureId {
        let id = self.next_texture_id;
        self.next_texture_id += 1;
        self.textures.insert(id, texture);
        TextureId(id)
    }
}

impl RenderBackend for SdlBackend {
    fn clear(&mut self, color: Color) -> Result<()> {
        self.canvas.set_draw_color(sdl2::pixels::Color::RGBA(
            color.r, color.g, color.b, color.a,
        ));
        self.canvas.clear();
        Ok(())
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) -> Result<()> {
        if rect.w == 0 || rect.h == 0 {
            return Ok(());
        }
        self.set_color(color);
        self.canvas
            .fill_rect(sdl2::rect::Rect::new(rect.x, rect.y, rect.w, rect.h))
            .map_err(backend_err)
    }

    fn draw_text(&mut self, text: &str, x: i32, y: i32, font: &FontSpec, color: Color) -> Result<()> {
        let Some(surface) = self.fonts.render(text, font, color)? else {
            return Ok(());
        };
        let texture = self
            .texture_creator
            .create_texture_from_surface(&surface)
            .map_err(backend_err)?;
        let dst = sdl2::rect::Rect::new(x, y, surface.width(), surface.height());
        self.canvas.copy(&texture, None, dst).map_err(backend_err)
    }

    fn load_image(&mut self, path: &str) -> Result<TextureId> {
        let mut texture = self.texture_creator.load_texture(path).map_err(backend_err)?;
        texture.set_blend_mode(BlendMode::Blend);
        // SAFETY: The texture borrows from self.texture_creator which lives in the
        // same struct. `textures` is declared before `texture_creator`, so Rust drops
        // textures first. The erased lifetime is therefore always valid.
        let texture: Texture<'static> = unsafe { std::mem::transmute(texture) };
        let id = self.store_texture(texture);
        log::debug!("Loaded image {path} as texture {}", id.0);
        Ok(id)
    }

    fn texture_size(&self, tex: TextureId) -> Result<(u32, u32)> {
        let texture = self
            .textures
            .get(&tex.0)
            .ok_or_else(|| JukaError::Backend(format!("texture not found: {}", tex.0)))?;
        let query = texture.query();
        Ok((query.width, query.height))
    }

    fn blit(&mut self, tex: TextureId, dst: Rect) -> Result<()> {
        let texture = self
            .textures
            .get(&tex.0)
            .ok_or_else(|| JukaError::Backend(format!("texture not found: {}", tex.0)))?;
        self.canvas
            .copy(texture, None, sdl2::rect::Rect::new(dst.x, dst.y, dst.w, dst.h))
            .map_err(backend_err)
    }

    fn destroy_texture(&mut self, tex: TextureId) -> Result<()> {
        self.textures.remove(&tex.0);
        Ok(())
    }

    fn swap_buffers(&mut self) -> Result<()> {
        self.canvas.present();
        Ok(())
    }

    fn shutdown(&mut self) -> Result<()> {
        self.textures.clear();
        self.controller = None;
        log::info!("SDL2 backend shut down");
        Ok(())
    }
}

impl InputBackend for SdlBackend {
    fn poll_events(&mut self) -> Vec<InputEvent> {
        let mut events = Vec::new();
        let mut controller_added = false;
        for event in self.event_pump.poll_iter() {
            if let Event::ControllerDeviceAdded { .. } = event {
                controller_added = true;
            }
            if let Some(e) = map_sdl_event(event) {
                events.push(e);
            }
        }
        if controller_added {
            self.open_first_controller();
        }
        events
    }
}

/// Map an SDL2 event to a kiosk input event.
fn map_sdl_event(event: Event) -> Option<InputEvent> {
    match event {
        Event::Quit { .. } => Some(InputEvent::Quit),
        Event::KeyDown {
            keycode: Some(key), ..
        } => map_key_down(key),
        Event::MouseButtonDown { x, y, .. } => Some(InputEvent::PointerClick { x, y }),
        Event::TextInput { text, .. } => text.chars().next().map(InputEvent::TextInput),
        Event::ControllerButtonDown { button, .. } => map_pad_button(button),
        _ => None,
    }
}

fn map_key_down(key: Keycode) -> Option<InputEvent> {
    match key {
        Keycode::Up => Some(InputEvent::ButtonPress(Button::Up)),
        Keycode::Down => Some(InputEvent::ButtonPress(Button::Down)),
        Keycode::Left => Some(InputEvent::ButtonPress(Button::Left)),
        Keycode::Right => Some(InputEvent::ButtonPress(Button::Right)),
        Keycode::Return | Keycode::KpEnter => Some(InputEvent::ButtonPress(Button::Confirm)),
        Keycode::Escape => Some(InputEvent::ButtonPress(Button::Cancel)),
        Keycode::F1 => Some(InputEvent::ButtonPress(Button::Start)),
        Keycode::F2 => Some(InputEvent::ButtonPress(Button::Select)),
        Keycode::Backspace => Some(InputEvent::Backspace),
        Keycode::PageUp => Some(InputEvent::ShoulderPress(Shoulder::Left)),
        Keycode::PageDown => Some(InputEvent::ShoulderPress(Shoulder::Right)),
        _ => None,
    }
}

fn map_pad_button(button: PadButton) -> Option<InputEvent> {
    match button {
        PadButton::DPadUp => Some(InputEvent::ButtonPress(Button::Up)),
        PadButton::DPadDown => Some(InputEvent::ButtonPress(Button::Down)),
        PadButton::DPadLeft => Some(InputEvent::ButtonPress(Button::Left)),
        PadButton::DPadRight => Some(InputEvent::ButtonPress(Button::Right)),
        PadButton::A => Some(InputEvent::ButtonPress(Button::Confirm)),
        PadButton::B => Some(InputEvent::ButtonPress(Button::Cancel)),
        PadButton::Start => Some(InputEvent::ButtonPress(Button::Start)),
        PadButton::Back => Some(InputEvent::ButtonPress(Button::Select)),
        PadButton::LeftShoulder => Some(InputEvent::ShoulderPress(Shoulder::Left)),
        PadButton::RightShoulder => Some(InputEvent::ShoulderPress(Shoulder::Right)),
        _ => None,
    }
}
