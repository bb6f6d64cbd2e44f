use thiserror::Error;

use crate::actor::ActorId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DecodeError {
	#[error("no byte available on the link")]
	EmptyInput,

	#[error("expected a single byte, got {len}")]
	Malformed { len: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SampleError {
	#[error("expected 3 sample values, got {0}")]
	WrongCount(usize),

	#[error("sample value {index} is {len} bytes wide")]
	WideValue { index: usize, len: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PlacementError {
	#[error("no free spot for {actor:?} after {attempts} attempts")]
	Exhausted { actor: ActorId, attempts: u32 },
}

#[derive(Debug, Error)]
pub enum ConfigError {
	#[error("cell size must be non-zero")]
	ZeroCellSize,

	#[error("window {width}x{height} is not a multiple of cell size {cell}")]
	UnalignedWindow { width: u32, height: u32, cell: u32 },

	#[error("max placement attempts must be non-zero")]
	NoPlacementAttempts,

	#[error("actor size must be non-zero")]
	ZeroActorSize,

	#[error("{name} of {value} px exceeds the {max} px limit")]
	TooLarge {
		name: &'static str,
		value: u64,
		max: u64,
	},

	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),

	#[error("TOML error: {0}")]
	Toml(#[from] toml::de::Error),
}
