use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::field::ObstacleField;

/// Tunables for a match. Defaults match the hardware setup the device firmware expects.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
	pub window_width: u32,
	pub window_height: u32,
	pub cell_size: u32,
	pub obstacles: usize,
	pub actor_size: u32,
	/// Position samples tried per actor before setup gives up.
	pub max_placement_attempts: u32,
}

impl Default for Settings {
	fn default() -> Self {
		Self {
			window_width: 640,
			window_height: 480,
			cell_size: 10,
			obstacles: 40,
			actor_size: 20,
			max_placement_attempts: 10_000,
		}
	}
}

impl Settings {
	/// Largest extent, in pixels, of the window, an actor or an obstacle.
	/// Keeps every coordinate sum well inside `i32`.
	pub const MAX_EXTENT: u32 = 1 << 20;

	pub fn load(path: &Path) -> Result<Self, ConfigError> {
		let text = std::fs::read_to_string(path)?;
		Self::from_toml(&text)
	}

	pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
		let settings: Settings = toml::from_str(text)?;
		settings.validate()?;
		Ok(settings)
	}

	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.cell_size == 0 {
			return Err(ConfigError::ZeroCellSize);
		}
		if self.window_width % self.cell_size != 0 || self.window_height % self.cell_size != 0 {
			return Err(ConfigError::UnalignedWindow {
				width: self.window_width,
				height: self.window_height,
				cell: self.cell_size,
			});
		}
		if self.max_placement_attempts == 0 {
			return Err(ConfigError::NoPlacementAttempts);
		}
		if self.actor_size == 0 {
			return Err(ConfigError::ZeroActorSize);
		}

		let largest_obstacle = u64::from(self.cell_size) * ObstacleField::MAX_CELLS as u64;
		let extents = [
			("window width", u64::from(self.window_width)),
			("window height", u64::from(self.window_height)),
			("actor size", u64::from(self.actor_size)),
			("obstacle size", largest_obstacle),
		];
		for (name, value) in extents {
			if value > u64::from(Self::MAX_EXTENT) {
				return Err(ConfigError::TooLarge {
					name,
					value,
					max: u64::from(Self::MAX_EXTENT),
				});
			}
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn defaults_are_valid() {
		Settings::default().validate().unwrap();
	}

	#[test]
	fn partial_toml_keeps_defaults() {
		let s = Settings::from_toml("obstacles = 5\nactor_size = 12\n").unwrap();
		assert_eq!(s.obstacles, 5);
		assert_eq!(s.actor_size, 12);
		assert_eq!(s.window_width, 640);
		assert_eq!(s.cell_size, 10);
	}

	#[test]
	fn unaligned_window_is_rejected() {
		let err = Settings::from_toml("window_width = 645").unwrap_err();
		assert!(matches!(err, ConfigError::UnalignedWindow { width: 645, .. }));

		let err = Settings::from_toml("cell_size = 0").unwrap_err();
		assert!(matches!(err, ConfigError::ZeroCellSize));
	}

	#[test]
	fn oversized_extents_are_rejected() {
		let err = Settings::from_toml("window_width = 3000000000").unwrap_err();
		assert!(matches!(
			err,
			ConfigError::TooLarge {
				name: "window width",
				value: 3_000_000_000,
				..
			}
		));

		let err = Settings::from_toml("window_height = 2147483650\ncell_size = 2").unwrap_err();
		assert!(matches!(err, ConfigError::TooLarge { name: "window height", .. }));

		let err = Settings::from_toml("actor_size = 4294967295").unwrap_err();
		assert!(matches!(err, ConfigError::TooLarge { name: "actor size", .. }));

		// a single cell fits but five of them do not
		let cell = Settings::MAX_EXTENT / 2;
		let toml = format!("cell_size = {cell}\nwindow_width = {cell}\nwindow_height = {cell}");
		let err = Settings::from_toml(&toml).unwrap_err();
		assert!(matches!(err, ConfigError::TooLarge { name: "obstacle size", .. }));
	}

	#[test]
	fn zero_actor_size_is_rejected() {
		let err = Settings::from_toml("actor_size = 0").unwrap_err();
		assert!(matches!(err, ConfigError::ZeroActorSize));
	}

	#[test]
	fn largest_accepted_settings_set_up_a_session() {
		use crate::session::{GameSession, Players};
		use rand::SeedableRng;
		use rand_chacha::ChaCha8Rng;

		let max = Settings::MAX_EXTENT;
		let settings = Settings {
			window_width: max,
			window_height: max,
			cell_size: max / ObstacleField::MAX_CELLS as u32 / 2,
			actor_size: max,
			..Settings::default()
		};
		// cell must divide the window
		let settings = Settings {
			window_width: settings.cell_size * 10,
			window_height: settings.cell_size * 10,
			..settings
		};
		settings.validate().unwrap();

		let mut rng = ChaCha8Rng::seed_from_u64(7);
		let _ = GameSession::setup(&settings, Players::One, &mut rng);
	}

	#[test]
	fn bad_toml_is_reported() {
		let err = Settings::from_toml("obstacles = \"many\"").unwrap_err();
		assert!(matches!(err, ConfigError::Toml(_)));
	}
}
