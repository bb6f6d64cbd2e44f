use rand::Rng;
use tracing::{debug, info, trace};

use crate::actor::{Actor, ActorId, Control, NextMove};
use crate::config::Settings;
use crate::error::PlacementError;
use crate::field::{ObstacleField, Rect};
use crate::protocol::{Command, Direction, Response};

/// Who controls the second actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Players {
	/// One hand unit against the AI.
	One,
	/// Both actors driven by hand units.
	Two,
}

/// What drives a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
	Device(Command),
	/// Keyboard fallback when no device command arrived.
	Key(Direction),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
	/// The actors ran into each other.
	Caught,
	Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
	Active,
	Terminated(Outcome),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
	/// An actor was stopped by an obstacle during the tick.
	Collision { actor: ActorId },
	MatchEnd(Outcome),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
	/// Byte to send back to the device, `None` once the match is over.
	pub response: Option<Response>,
	pub events: Vec<SessionEvent>,
}

/// One match: the obstacle field, both actors and the terminal state.
#[derive(Debug, Clone)]
pub struct GameSession {
	field: ObstacleField,
	actors: [Actor; 2],
	phase: Phase,
	tick: u32,
}

impl GameSession {
	pub fn new(field: ObstacleField, one: Actor, two: Actor) -> Self {
		Self {
			field,
			actors: [one, two],
			phase: Phase::Active,
			tick: 0,
		}
	}

	/// Generates a fresh field and places both actors on free ground.
	pub fn setup<R: Rng + ?Sized>(
		settings: &Settings,
		players: Players,
		rng: &mut R,
	) -> Result<Self, PlacementError> {
		let field = ObstacleField::generate(
			settings.obstacles,
			settings.window_width,
			settings.window_height,
			settings.cell_size,
			rng,
		);
		Self::setup_with_field(field, settings, players, rng)
	}

	pub fn setup_with_field<R: Rng + ?Sized>(
		field: ObstacleField,
		settings: &Settings,
		players: Players,
		rng: &mut R,
	) -> Result<Self, PlacementError> {
		let one = place(ActorId::One, Control::Human, settings, &field, None, rng)?;
		let control = match players {
			Players::One => Control::Ai,
			Players::Two => Control::Human,
		};
		let two = place(ActorId::Two, control, settings, &field, Some(&one.bounds), rng)?;

		debug!(
			obstacles = field.len(),
			one = ?one.bounds,
			two = ?two.bounds,
			"session set up"
		);
		Ok(Self::new(field, one, two))
	}

	/// Sent once when the host enters game mode.
	pub fn start_response() -> Response {
		Response::game_mode()
	}

	pub fn field(&self) -> &ObstacleField {
		&self.field
	}

	pub fn actors(&self) -> &[Actor; 2] {
		&self.actors
	}

	pub fn actor(&self, id: ActorId) -> &Actor {
		&self.actors[id.index()]
	}

	pub fn phase(&self) -> Phase {
		self.phase
	}

	pub fn is_terminated(&self) -> bool {
		matches!(self.phase, Phase::Terminated(_))
	}

	pub fn tick(&self) -> u32 {
		self.tick
	}

	/// Decodes a line from the device and steps on it. Lines that do not carry
	/// a command leave the session untouched.
	pub fn handle_line(&mut self, line: &[u8]) -> Option<TickReport> {
		let command = match Command::decode(line) {
			Ok(c) => c,
			Err(e) => {
				debug!("no command this tick: {e}");
				return None;
			}
		};
		debug!(
			hand = command.hand,
			action = command.action,
			speed = command.speed,
			left = command.left,
			right = command.right,
			"decoded command"
		);
		Some(self.step(Input::Device(command)))
	}

	pub fn step(&mut self, input: Input) -> TickReport {
		let mut report = TickReport::default();
		if self.is_terminated() {
			return report;
		}

		let mut blocked = [false; 2];
		match input {
			Input::Device(command) => {
				let dir = command.effective_direction();
				if command.hand == 0 {
					blocked[0] = self.drive(ActorId::One, dir, command.speed);
				}
				if self.actors[1].is_ai() {
					blocked[1] = self.chase();
				} else if command.hand == 1 {
					blocked[1] = self.drive(ActorId::Two, dir, command.speed);
				}
			}
			Input::Key(dir) => {
				blocked[0] = self.drive(ActorId::One, dir, 1);
				blocked[1] = if self.actors[1].is_ai() {
					self.chase()
				} else {
					self.drive(ActorId::Two, dir, 1)
				};
			}
		}
		self.tick = self.tick.wrapping_add(1);

		for actor in &self.actors {
			if blocked[actor.id.index()] {
				report.events.push(SessionEvent::Collision { actor: actor.id });
			}
		}

		let [one, two] = &self.actors;
		if one.overlaps(two) {
			self.phase = Phase::Terminated(Outcome::Caught);
			report.events.push(SessionEvent::MatchEnd(Outcome::Caught));
			info!(tick = self.tick, "actors collided, game over");
		}

		let collided = one.last_move_collided || (!two.is_ai() && two.last_move_collided);
		report.response = Some(Response::collision(collided));
		trace!(tick = self.tick, one = ?one.bounds, two = ?two.bounds, collided, "tick");

		report
	}

	/// External shutdown. Returns the byte telling the device the host is exiting.
	pub fn quit(&mut self) -> Response {
		if !self.is_terminated() {
			self.phase = Phase::Terminated(Outcome::Quit);
			info!(tick = self.tick, "session quit");
		}
		Response::exit()
	}

	/// Applies `times` unit moves; true if any of them hit an obstacle.
	fn drive(&mut self, id: ActorId, dir: Direction, times: u8) -> bool {
		let actor = &mut self.actors[id.index()];
		let mut blocked = false;
		for _ in 0..times {
			blocked |= !actor.move_step(dir, &self.field);
		}
		blocked
	}

	/// One AI step for the second actor towards the first.
	fn chase(&mut self) -> bool {
		let target = self.actors[0];
		let ai = &mut self.actors[1];
		match ai.next_move(&target) {
			NextMove::Move(dir) => !ai.move_step(dir, &self.field),
			NextMove::NoMove => false,
		}
	}
}

fn place<R: Rng + ?Sized>(
	id: ActorId,
	control: Control,
	settings: &Settings,
	field: &ObstacleField,
	avoid: Option<&Rect>,
	rng: &mut R,
) -> Result<Actor, PlacementError> {
	let size = settings.actor_size as i32;
	for _ in 0..settings.max_placement_attempts {
		let x = rng.gen_range(0..=settings.window_width as i32);
		let y = rng.gen_range(0..=settings.window_height as i32);
		let actor = Actor::new(id, x, y, size, control);

		if field.collides(&actor.bounds) {
			continue;
		}
		if avoid.is_some_and(|r| r.intersects(&actor.bounds)) {
			continue;
		}
		return Ok(actor);
	}

	Err(PlacementError::Exhausted {
		actor: id,
		attempts: settings.max_placement_attempts,
	})
}
