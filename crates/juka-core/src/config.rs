//! Player configuration (`juka.toml`).
//!
//! Everything has a default; a missing file is not an error.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::Result;

/// Environment variable overriding the player configuration path.
pub const CONFIG_ENV: &str = "JUKA_PLAYER_CONFIG";

/// Environment variable overriding the document path.
pub const DOCUMENT_ENV: &str = "JUKA_DOCUMENT";

/// Default configuration file name, looked up in the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "juka.toml";

/// SDL mapping for the wired Xbox 360 pad.
pub const X360_MAPPING: &str = "030000005e0400008e02000014010000,X360 Controller,a:b0,b:b1,back:b6,dpdown:h0.4,dpleft:h0.8,dpright:h0.2,dpup:h0.1,guide:b8,leftshoulder:b4,leftstick:b9,lefttrigger:a2,leftx:a0,lefty:a1,rightshoulder:b5,rightstick:b10,righttrigger:a5,rightx:a3,righty:a4,start:b7,x:b2,y:b3,platform:Linux,";

/// SDL mapping for Xbox pads driven by the userspace driver.
pub const XBOX_USERSPACE_MAPPING: &str = "0000000058626f782047616d65706100,Xbox Gamepad (userspace driver),platform:Linux,a:b0,b:b1,x:b2,y:b3,start:b7,back:b6,guide:b8,dpup:h0.1,dpdown:h0.4,dpleft:h0.8,dpright:h0.2,leftshoulder:b4,rightshoulder:b5,lefttrigger:a5,righttrigger:a4,leftstick:b9,rightstick:b10,leftx:a0,lefty:a1,rightx:a2,righty:a3,";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PlayerConfig {
    /// Kiosk document to load.
    #[serde(default = "default_document")]
    pub document: PathBuf,
    #[serde(default = "default_width")]
    pub screen_width: u32,
    #[serde(default = "default_height")]
    pub screen_height: u32,
    /// Window title; the document title when unset.
    #[serde(default)]
    pub window_title: Option<String>,
    /// External video player executable.
    #[serde(default = "default_video_player")]
    pub video_player: String,
    /// How long `play_image` holds the screen.
    #[serde(default = "default_image_ms")]
    pub image_display_ms: u64,
    /// Offset from UTC for the menu clock.
    #[serde(default)]
    pub utc_offset_minutes: i32,
    /// SDL game controller mapping strings registered at startup.
    #[serde(default = "default_mappings")]
    pub controller_mappings: Vec<String>,
}

fn default_document() -> PathBuf {
    PathBuf::from("jukaconfig.json")
}
fn default_width() -> u32 {
    1280
}
fn default_height() -> u32 {
    720
}
fn default_video_player() -> String {
    "ffplay".to_string()
}
fn default_image_ms() -> u64 {
    3000
}
fn default_mappings() -> Vec<String> {
    vec![X360_MAPPING.to_string(), XBOX_USERSPACE_MAPPING.to_string()]
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            document: default_document(),
            screen_width: default_width(),
            screen_height: default_height(),
            window_title: None,
            video_player: default_video_player(),
            image_display_ms: default_image_ms(),
            utc_offset_minutes: 0,
            controller_mappings: default_mappings(),
        }
    }
}

impl PlayerConfig {
    pub fn from_toml(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Load `path`, or the defaults when the file does not exist.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            log::info!("No player config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml(&text)?;
        log::info!("Loaded player config from {}", path.display());
        Ok(config)
    }

    pub fn image_duration(&self) -> Duration {
        Duration::from_millis(self.image_display_ms)
    }

    /// Configured window title, else the document title, else "Juka".
    pub fn window_title_for(&self, document_title: &str) -> String {
        match &self.window_title {
            Some(t) if !t.is_empty() => t.clone(),
            _ if !document_title.is_empty() => document_title.to_string(),
            _ => "Juka".to_string(),
        }
    }
}
