//! Single-byte wire formats exchanged with the hand device.
//!
//! Every message is one byte, most significant bit first:
//!
//! ```text
//! Command      [hand][action:2][speed:3][left][right]
//! MenuCommand  [unused:4][hand][up][down][select]
//! Response     [unused:5][exit][plot_mode][collision]
//! ```

use bitflags::bitflags;

use crate::error::{DecodeError, SampleError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
	Up,
	Down,
	Left,
	Right,
}

impl Direction {
	pub const ALL: [Direction; 4] = [
		Direction::Up,
		Direction::Down,
		Direction::Left,
		Direction::Right,
	];

	/// Maps the 2-bit `action` field onto a direction.
	pub fn from_action(action: u8) -> Self {
		match action & 0b11 {
			0 => Direction::Up,
			1 => Direction::Down,
			2 => Direction::Left,
			_ => Direction::Right,
		}
	}

	pub fn as_action(self) -> u8 {
		match self {
			Direction::Up => 0,
			Direction::Down => 1,
			Direction::Left => 2,
			Direction::Right => 3,
		}
	}

	/// Unit displacement in screen space (y grows downwards).
	pub fn delta(self) -> (i32, i32) {
		match self {
			Direction::Up => (0, -1),
			Direction::Down => (0, 1),
			Direction::Left => (-1, 0),
			Direction::Right => (1, 0),
		}
	}
}

const HAND_SHIFT: u8 = 7;
const ACTION_SHIFT: u8 = 5;
const ACTION_MASK: u8 = 0b11;
const SPEED_SHIFT: u8 = 2;
const SPEED_MASK: u8 = 0b111;
const LEFT_SHIFT: u8 = 1;
const RIGHT_SHIFT: u8 = 0;

/// Move intent sent by a hand unit during a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Command {
	/// 0 drives the first actor, 1 the second.
	pub hand: u8,
	pub action: u8,
	/// Unit moves applied per tick.
	pub speed: u8,
	pub left: bool,
	pub right: bool,
}

impl Command {
	pub fn from_byte(b: u8) -> Self {
		Self {
			hand: (b >> HAND_SHIFT) & 1,
			action: (b >> ACTION_SHIFT) & ACTION_MASK,
			speed: (b >> SPEED_SHIFT) & SPEED_MASK,
			left: (b >> LEFT_SHIFT) & 1 == 1,
			right: (b >> RIGHT_SHIFT) & 1 == 1,
		}
	}

	/// Decodes one line read from the link. The line must carry exactly one byte.
	pub fn decode(line: &[u8]) -> Result<Self, DecodeError> {
		single_byte(line).map(Self::from_byte)
	}

	/// Packs the fields back into a byte. Out-of-range fields are truncated to their width.
	pub fn encode(self) -> u8 {
		((self.hand & 1) << HAND_SHIFT)
			| ((self.action & ACTION_MASK) << ACTION_SHIFT)
			| ((self.speed & SPEED_MASK) << SPEED_SHIFT)
			| (u8::from(self.left) << LEFT_SHIFT)
			| (u8::from(self.right) << RIGHT_SHIFT)
	}

	/// The direction actually applied: the turn flags win over `action`, left first.
	pub fn effective_direction(&self) -> Direction {
		if self.left {
			Direction::Left
		} else if self.right {
			Direction::Right
		} else {
			Direction::from_action(self.action)
		}
	}
}

bitflags! {
	#[derive(Debug, Clone, Copy, PartialEq, Eq)]
	pub struct MenuBits: u8 {
		const SELECT = 1 << 0;
		const DOWN   = 1 << 1;
		const UP     = 1 << 2;
		const HAND   = 1 << 3;
	}
}

/// Menu navigation sent by a hand unit while the host shows its menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MenuCommand {
	pub hand: u8,
	pub up: bool,
	pub down: bool,
	pub select: bool,
}

impl MenuCommand {
	pub fn from_byte(b: u8) -> Self {
		let bits = MenuBits::from_bits_truncate(b);
		Self {
			hand: u8::from(bits.contains(MenuBits::HAND)),
			up: bits.contains(MenuBits::UP),
			down: bits.contains(MenuBits::DOWN),
			select: bits.contains(MenuBits::SELECT),
		}
	}

	pub fn decode(line: &[u8]) -> Result<Self, DecodeError> {
		single_byte(line).map(Self::from_byte)
	}

	pub fn encode(self) -> u8 {
		let mut bits = MenuBits::empty();
		bits.set(MenuBits::HAND, self.hand & 1 == 1);
		bits.set(MenuBits::UP, self.up);
		bits.set(MenuBits::DOWN, self.down);
		bits.set(MenuBits::SELECT, self.select);
		bits.bits()
	}
}

bitflags! {
	#[derive(Debug, Clone, Copy, PartialEq, Eq)]
	pub struct ResponseBits: u8 {
		const COLLISION = 1 << 0;
		const PLOT_MODE = 1 << 1;
		const EXIT      = 1 << 2;
	}
}

/// Status byte sent back to the device. Built fresh for every message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Response {
	pub exit: bool,
	pub plot_mode: bool,
	pub collision: bool,
}

impl Response {
	pub fn game_mode() -> Self {
		Self::default()
	}

	pub fn plot_mode() -> Self {
		Self {
			plot_mode: true,
			..Self::default()
		}
	}

	pub fn exit() -> Self {
		Self {
			exit: true,
			..Self::default()
		}
	}

	pub fn collision(collided: bool) -> Self {
		Self {
			collision: collided,
			..Self::default()
		}
	}

	pub fn encode(self) -> u8 {
		let mut bits = ResponseBits::empty();
		bits.set(ResponseBits::EXIT, self.exit);
		bits.set(ResponseBits::PLOT_MODE, self.plot_mode);
		bits.set(ResponseBits::COLLISION, self.collision);
		bits.bits()
	}

	pub fn decode(b: u8) -> Self {
		let bits = ResponseBits::from_bits_truncate(b);
		Self {
			exit: bits.contains(ResponseBits::EXIT),
			plot_mode: bits.contains(ResponseBits::PLOT_MODE),
			collision: bits.contains(ResponseBits::COLLISION),
		}
	}
}

/// One reading streamed by a hand unit in plot mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sample {
	pub left_pressure: u8,
	pub right_pressure: u8,
	pub accel: u8,
}

impl Sample {
	/// Parses `"<l> <r> <a>"`, where each value is a single raw byte.
	pub fn decode(line: &[u8]) -> Result<Self, SampleError> {
		let values: Vec<&[u8]> = line
			.split(|b| b.is_ascii_whitespace())
			.filter(|v| !v.is_empty())
			.collect();
		if values.len() != 3 {
			return Err(SampleError::WrongCount(values.len()));
		}

		let mut out = [0u8; 3];
		for (index, value) in values.iter().enumerate() {
			match value {
				[b] => out[index] = *b,
				_ => {
					return Err(SampleError::WideValue {
						index,
						len: value.len(),
					});
				}
			}
		}

		Ok(Self {
			left_pressure: out[0],
			right_pressure: out[1],
			accel: out[2],
		})
	}
}

fn single_byte(line: &[u8]) -> Result<u8, DecodeError> {
	match line {
		[] => Err(DecodeError::EmptyInput),
		[b] => Ok(*b),
		_ => Err(DecodeError::Malformed { len: line.len() }),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;

	#[test]
	fn command_fields_follow_device_layout() {
		let c = Command::from_byte(0b0_01_011_0_0);
		assert_eq!(c.hand, 0);
		assert_eq!(c.action, 1);
		assert_eq!(c.speed, 3);
		assert!(!c.left);
		assert!(!c.right);
		assert_eq!(c.effective_direction(), Direction::Down);

		let c = Command::from_byte(0b1_11_111_1_1);
		assert_eq!(c.hand, 1);
		assert_eq!(c.action, 3);
		assert_eq!(c.speed, 7);
		assert!(c.left && c.right);
	}

	#[test]
	fn action_field_maps_every_direction() {
		for dir in Direction::ALL {
			let c = Command {
				action: dir.as_action(),
				..Command::default()
			};
			assert_eq!(c.effective_direction(), dir);
			assert_eq!(Command::from_byte(c.encode()), c);
		}
	}

	#[test]
	fn decode_rejects_empty_and_wide_lines() {
		assert_eq!(Command::decode(b""), Err(DecodeError::EmptyInput));
		assert_eq!(Command::decode(b"ab"), Err(DecodeError::Malformed { len: 2 }));
		assert_eq!(MenuCommand::decode(b""), Err(DecodeError::EmptyInput));
		assert_eq!(Command::decode(&[0x2c]), Ok(Command::from_byte(0x2c)));
	}

	#[test]
	fn exit_response_is_0x04() {
		let r = Response {
			exit: true,
			plot_mode: false,
			collision: false,
		};
		assert_eq!(r.encode(), 0x04);
		assert_eq!(Response::plot_mode().encode(), 0x02);
		assert_eq!(Response::collision(true).encode(), 0x01);
		assert_eq!(Response::game_mode().encode(), 0x00);
	}

	#[test]
	fn menu_command_layout() {
		let m = MenuCommand::from_byte(0b0000_1_0_1_1);
		assert_eq!(m.hand, 1);
		assert!(!m.up);
		assert!(m.down);
		assert!(m.select);
		// upper nibble is ignored
		assert_eq!(MenuCommand::from_byte(0xf4), MenuCommand::from_byte(0x04));
	}

	#[test]
	fn sample_parsing() {
		let s = Sample::decode(b"A B\x07").unwrap_err();
		assert_eq!(s, SampleError::WrongCount(2));

		let s = Sample::decode(b"A B \x07").unwrap();
		assert_eq!(s.left_pressure, b'A');
		assert_eq!(s.right_pressure, b'B');
		assert_eq!(s.accel, 7);

		assert_eq!(
			Sample::decode(b"A BB C"),
			Err(SampleError::WideValue { index: 1, len: 2 })
		);
	}

	proptest! {
		#[test]
		fn command_byte_round_trips(b in any::<u8>()) {
			prop_assert_eq!(Command::from_byte(b).encode(), b);
		}

		#[test]
		fn response_fields_round_trip(exit in any::<bool>(), plot_mode in any::<bool>(), collision in any::<bool>()) {
			let r = Response { exit, plot_mode, collision };
			prop_assert_eq!(Response::decode(r.encode()), r);
			prop_assert!(r.encode() < 8);
		}

		#[test]
		fn menu_fields_round_trip(hand in 0u8..2, up in any::<bool>(), down in any::<bool>(), select in any::<bool>()) {
			let m = MenuCommand { hand, up, down, select };
			prop_assert_eq!(MenuCommand::from_byte(m.encode()), m);
		}

		#[test]
		fn left_flag_overrides_action(b in any::<u8>()) {
			let c = Command { left: true, ..Command::from_byte(b) };
			prop_assert_eq!(c.effective_direction(), Direction::Left);
		}

		#[test]
		fn right_flag_overrides_action(b in any::<u8>()) {
			let c = Command { left: false, right: true, ..Command::from_byte(b) };
			prop_assert_eq!(c.effective_direction(), Direction::Right);
		}
	}
}
