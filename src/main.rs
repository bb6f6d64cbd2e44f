use std::{
	path::PathBuf,
	sync::mpsc,
	time::{Duration, Instant},
};

use ::rand::SeedableRng;
use anyhow::Context;
use clap::{Parser, ValueEnum};
use macroquad::{miniquad::window::set_window_size, prelude::*};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

use helping_hand::{
	Direction, GameSession, Input, Players, Response, Sample, SessionEvent, Settings, TickReport,
	link::{self, LinkEvent, LinkTarget, Writer},
};

// How long the red game-over screen stays up before the next match
const GAME_OVER_HOLD: Duration = Duration::from_secs(3);

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Mode {
	/// One hand unit against the AI
	Single,
	/// Two hand units against each other
	Duo,
	/// Stream sensor readings instead of playing
	Plot,
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
/// Host for the Helping Hand rehabilitation game.
struct Args {
	#[arg(value_enum, default_value_t = Mode::Single)]
	mode: Mode,

	/// Serial device the radio is attached to
	#[arg(short, long, conflicts_with = "connect")]
	device: Option<PathBuf>,

	/// TCP bridge in front of the radio, e.g. ser2net
	#[arg(long)]
	connect: Option<String>,

	/// TOML file overriding the default settings
	#[arg(short, long)]
	config: Option<PathBuf>,

	#[arg(long)]
	obstacles: Option<usize>,

	/// Seed for a reproducible obstacle field
	#[arg(long)]
	seed: Option<u64>,
}

impl Args {
	fn link_target(&self) -> Option<LinkTarget> {
		match (&self.device, &self.connect) {
			(Some(path), _) => Some(LinkTarget::Device(path.clone())),
			(None, Some(addr)) => Some(LinkTarget::Tcp(addr.clone())),
			(None, None) => None,
		}
	}
}

struct Device {
	lines: mpsc::Receiver<LinkEvent>,
	sink: Writer,
	closed: bool,
}

impl Device {
	fn open(target: &LinkTarget) -> anyhow::Result<Self> {
		let (reader, sink) = link::open(target)?;
		Ok(Self {
			lines: link::spawn_reader(reader),
			sink,
			closed: false,
		})
	}

	fn send(&mut self, response: Response) {
		link::send_response(&mut self.sink, response);
	}

	fn drain(&mut self) -> Vec<Vec<u8>> {
		let mut out = Vec::new();
		while let Ok(ev) = self.lines.try_recv() {
			match ev {
				LinkEvent::Line(line) => out.push(line),
				LinkEvent::Closed => {
					if !self.closed {
						warn!("device link closed, keyboard only from now on");
					}
					self.closed = true;
				}
			}
		}
		out
	}

	/// Drops queued lines so commands sent during a pause never reach the next match.
	fn discard(&mut self) {
		let n = self.drain().len();
		if n > 0 {
			debug!(lines = n, "discarded device lines");
		}
	}
}

fn notify(device: &mut Option<Device>, response: Response) {
	if let Some(d) = device {
		d.send(response);
	}
}

fn key_direction(key: KeyCode) -> Option<Direction> {
	match key {
		KeyCode::Left | KeyCode::A => Some(Direction::Left),
		KeyCode::Right | KeyCode::D => Some(Direction::Right),
		KeyCode::Up | KeyCode::W => Some(Direction::Up),
		KeyCode::Down | KeyCode::S => Some(Direction::Down),
		_ => None,
	}
}

fn quit_requested() -> bool {
	is_key_pressed(KeyCode::Escape) || is_quit_requested()
}

fn draw_area(r: &helping_hand::Rect, color: Color) {
	draw_rectangle(r.x as f32, r.y as f32, r.w as f32, r.h as f32, color);
}

fn draw_session(session: &GameSession) {
	clear_background(BLACK);
	for r in session.field().rects() {
		draw_area(r, DARKGREEN);
	}
	let [one, two] = session.actors();
	draw_area(&one.bounds, WHITE);
	draw_area(&two.bounds, RED);
}

fn log_events(report: &TickReport) {
	for ev in &report.events {
		match ev {
			SessionEvent::Collision { actor } => info!(?actor, "hit an obstacle"),
			SessionEvent::MatchEnd(outcome) => info!(?outcome, "match over"),
		}
	}
}

enum MatchEnd {
	Caught,
	Quit,
}

async fn play_match(
	settings: &Settings,
	players: Players,
	rng: &mut ChaCha8Rng,
	device: &mut Option<Device>,
) -> anyhow::Result<MatchEnd> {
	let mut session = GameSession::setup(settings, players, rng).context("set up match")?;
	notify(device, GameSession::start_response());
	info!(?players, obstacles = settings.obstacles, "match started");

	// keys other than arrows/WASD repeat the last direction
	let mut direction = Direction::Right;
	let mut over_at: Option<Instant> = None;

	loop {
		if quit_requested() {
			let r = session.quit();
			notify(device, r);
			return Ok(MatchEnd::Quit);
		}

		if let Some(at) = over_at {
			if let Some(d) = device.as_mut() {
				d.discard();
			}
			clear_background(RED);
			draw_text("GAME OVER", 20.0, 40.0, 40.0, WHITE);
			if at.elapsed() >= GAME_OVER_HOLD {
				return Ok(MatchEnd::Caught);
			}
			next_frame().await;
			continue;
		}

		let lines = device.as_mut().map(Device::drain).unwrap_or_default();
		for line in lines {
			let Some(report) = session.handle_line(&line) else { continue };
			log_events(&report);
			if let Some(r) = report.response {
				notify(device, r);
			}
		}

		if !session.is_terminated() {
			if let Some(key) = get_last_key_pressed() {
				direction = key_direction(key).unwrap_or(direction);
				let report = session.step(Input::Key(direction));
				log_events(&report);
				if let Some(r) = report.response {
					notify(device, r);
				}
			}
		}

		if session.is_terminated() {
			over_at = Some(Instant::now());
		}

		draw_session(&session);
		next_frame().await;
	}
}

async fn run_plot(device: &mut Option<Device>) {
	notify(device, Response::plot_mode());
	if device.is_none() {
		warn!("plot mode without a device link, nothing to show");
	}

	let mut latest: Option<Sample> = None;
	loop {
		if quit_requested() {
			notify(device, Response::exit());
			return;
		}

		for line in device.as_mut().map(Device::drain).unwrap_or_default() {
			match Sample::decode(&line) {
				Ok(s) => {
					info!(
						left = s.left_pressure,
						right = s.right_pressure,
						accel = s.accel,
						"sample"
					);
					latest = Some(s);
				}
				Err(e) => warn!("dropping sample line: {e}"),
			}
		}

		clear_background(BLACK);
		if let Some(s) = latest {
			let bars = [
				("Left Pressure", s.left_pressure, BLUE),
				("Right Pressure", s.right_pressure, ORANGE),
				("Accelerometer", s.accel, GREEN),
			];
			for (i, (label, value, color)) in bars.iter().enumerate() {
				let y = 40.0 + i as f32 * 60.0;
				draw_rectangle(160.0, y, *value as f32 * 2.0, 30.0, *color);
				draw_text(&format!("{label} {value}"), 10.0, y + 22.0, 20.0, WHITE);
			}
		} else {
			draw_text("waiting for samples...", 10.0, 24.0, 24.0, WHITE);
		}

		next_frame().await;
	}
}

async fn run() -> anyhow::Result<()> {
	tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::from_default_env().add_directive("helping_hand=info".parse()?))
		.init();

	let args = Args::parse();

	let mut settings = match &args.config {
		Some(path) => Settings::load(path).with_context(|| format!("load {}", path.display()))?,
		None => Settings::default(),
	};
	if let Some(n) = args.obstacles {
		settings.obstacles = n;
	}
	settings.validate()?;

	set_window_size(settings.window_width, settings.window_height);
	prevent_quit();

	let mut device = match args.link_target() {
		Some(target) => Some(Device::open(&target)?),
		None => {
			info!("no device link, keyboard only");
			None
		}
	};

	let mut rng = match args.seed {
		Some(seed) => ChaCha8Rng::seed_from_u64(seed),
		None => ChaCha8Rng::from_entropy(),
	};

	let players = match args.mode {
		Mode::Plot => {
			run_plot(&mut device).await;
			return Ok(());
		}
		Mode::Single => Players::One,
		Mode::Duo => Players::Two,
	};

	loop {
		match play_match(&settings, players, &mut rng, &mut device).await? {
			MatchEnd::Caught => continue,
			MatchEnd::Quit => return Ok(()),
		}
	}
}

#[macroquad::main("Helping Hand")]
async fn main() {
	if let Err(e) = run().await {
		error!("{e:#}");
		std::process::exit(1);
	}
}
