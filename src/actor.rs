use crate::field::{ObstacleField, Rect};
use crate::protocol::Direction;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActorId {
	One,
	Two,
}

impl ActorId {
	pub fn index(self) -> usize {
		match self {
			ActorId::One => 0,
			ActorId::Two => 1,
		}
	}
}

/// Who decides where an actor goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
	/// Driven by device commands or the keyboard.
	Human,
	/// Chases the other actor, see [`Actor::next_move`].
	Ai,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextMove {
	Move(Direction),
	/// Every reducing direction equals the last one taken.
	NoMove,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
	pub id: ActorId,
	pub bounds: Rect,
	pub direction: Direction,
	pub last_direction: Direction,
	/// Outcome of the most recent [`Actor::move_step`]; overwritten on every attempt.
	pub last_move_collided: bool,
	pub control: Control,
}

impl Actor {
	/// Pixels covered by one unit move.
	pub const STEP: i32 = 1;

	pub fn new(id: ActorId, x: i32, y: i32, size: i32, control: Control) -> Self {
		Self {
			id,
			bounds: Rect::new(x, y, size, size),
			direction: Direction::Right,
			last_direction: Direction::Right,
			last_move_collided: false,
			control,
		}
	}

	pub fn is_ai(&self) -> bool {
		self.control == Control::Ai
	}

	pub fn overlaps(&self, other: &Actor) -> bool {
		self.bounds.intersects(&other.bounds)
	}

	/// Moves one unit towards `direction`, rolling back if that lands on an obstacle.
	/// Returns whether the actor actually moved.
	pub fn move_step(&mut self, direction: Direction, field: &ObstacleField) -> bool {
		let (dx, dy) = direction.delta();
		let next = self.bounds.translated(dx * Self::STEP, dy * Self::STEP);

		self.direction = direction;
		self.last_move_collided = field.collides(&next);
		if !self.last_move_collided {
			self.bounds = next;
		}
		!self.last_move_collided
	}

	/// Greedy chase: close the horizontal gap first, then the vertical one,
	/// never picking the direction used last time.
	pub fn next_move(&mut self, target: &Actor) -> NextMove {
		let (x, y) = (self.bounds.x, self.bounds.y);
		let (tx, ty) = (target.bounds.x, target.bounds.y);

		let candidates = [
			(tx < x, Direction::Left),
			(tx > x, Direction::Right),
			(ty < y, Direction::Up),
			(ty > y, Direction::Down),
		];
		let choice = candidates
			.into_iter()
			.find(|&(reduces, dir)| reduces && dir != self.last_direction);

		match choice {
			Some((_, dir)) => {
				self.last_direction = dir;
				NextMove::Move(dir)
			}
			None => NextMove::NoMove,
		}
	}
}
