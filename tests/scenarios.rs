use helping_hand::{
	Actor, ActorId, Command, Control, Direction, GameSession, Input, ObstacleField, Outcome, Phase,
	Players, Rect, Response, SessionEvent, Settings,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

#[test]
fn actor_blocked_by_obstacle_keeps_position() {
	let field = ObstacleField::from_rects(vec![Rect::new(100, 100, 20, 20)]);
	let mut actor = Actor::new(ActorId::One, 90, 105, 10, Control::Human);

	actor.move_step(Direction::Right, &field);

	assert_eq!(actor.bounds, Rect::new(90, 105, 10, 10));
	assert!(actor.last_move_collided);
}

#[test]
fn down_command_applies_three_unit_moves() {
	let byte = 0b0_01_011_0_0;
	let command = Command::from_byte(byte);
	assert_eq!(command.hand, 0);
	assert_eq!(command.effective_direction(), Direction::Down);
	assert_eq!(command.speed, 3);

	let mut session = GameSession::new(
		ObstacleField::default(),
		Actor::new(ActorId::One, 50, 50, 20, Control::Human),
		Actor::new(ActorId::Two, 400, 400, 20, Control::Human),
	);
	let report = session.handle_line(&[byte]).expect("one byte is a command");

	assert_eq!(session.actor(ActorId::One).bounds.y, 53);
	assert_eq!(session.actor(ActorId::Two).bounds, Rect::new(400, 400, 20, 20));
	assert_eq!(report.response, Some(Response::collision(false)));
}

#[test]
fn overlapping_actors_end_the_match_on_next_tick() {
	let mut session = GameSession::new(
		ObstacleField::default(),
		Actor::new(ActorId::One, 0, 0, 20, Control::Human),
		Actor::new(ActorId::Two, 0, 0, 20, Control::Ai),
	);
	assert_eq!(session.phase(), Phase::Active);

	// hand 0, speed 0: nobody moves
	let report = session.step(Input::Device(Command::from_byte(0)));

	assert_eq!(session.phase(), Phase::Terminated(Outcome::Caught));
	assert!(report.events.contains(&SessionEvent::MatchEnd(Outcome::Caught)));
	assert!(report.response.is_some());

	// later ticks are ignored, quitting still says goodbye
	assert!(session.step(Input::Key(Direction::Up)).response.is_none());
	assert_eq!(session.quit().encode(), 0x04);
	assert_eq!(session.phase(), Phase::Terminated(Outcome::Caught));
}

#[test]
fn exit_response_byte() {
	let r = Response {
		exit: true,
		plot_mode: false,
		collision: false,
	};
	assert_eq!(r.encode(), 0b00000_1_0_0);
}

#[test]
fn ai_catches_a_stationary_player_on_an_open_field() {
	let mut session = GameSession::new(
		ObstacleField::default(),
		Actor::new(ActorId::One, 100, 100, 20, Control::Human),
		Actor::new(ActorId::Two, 160, 150, 20, Control::Ai),
	);

	// speed 0 commands keep the player still while the AI closes in
	let mut ticks = 0;
	while !session.is_terminated() {
		session.step(Input::Device(Command::from_byte(0)));
		ticks += 1;
		assert!(ticks < 500, "AI never reached the player");
	}
	assert_eq!(session.phase(), Phase::Terminated(Outcome::Caught));
}

#[test]
fn seeded_sessions_are_reproducible() {
	let settings = Settings::default();
	let a = GameSession::setup(&settings, Players::Two, &mut ChaCha8Rng::seed_from_u64(42)).unwrap();
	let b = GameSession::setup(&settings, Players::Two, &mut ChaCha8Rng::seed_from_u64(42)).unwrap();

	assert_eq!(a.field().rects(), b.field().rects());
	assert_eq!(a.actors(), b.actors());
	assert!(a.actors().iter().all(|actor| !actor.is_ai()));
}
