use rand::Rng;

/// Axis-aligned rectangle in window pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
	pub x: i32,
	pub y: i32,
	pub w: i32,
	pub h: i32,
}

impl Rect {
	pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
		Self { x, y, w, h }
	}

	pub fn right(&self) -> i32 {
		self.x + self.w
	}

	pub fn bottom(&self) -> i32 {
		self.y + self.h
	}

	pub fn is_empty(&self) -> bool {
		self.w <= 0 || self.h <= 0
	}

	/// Interiors overlap on both axes. Touching edges and empty rectangles do not count.
	pub fn intersects(&self, other: &Rect) -> bool {
		if self.is_empty() || other.is_empty() {
			return false;
		}
		self.x < other.right()
			&& other.x < self.right()
			&& self.y < other.bottom()
			&& other.y < self.bottom()
	}

	pub fn translated(&self, dx: i32, dy: i32) -> Self {
		Self {
			x: self.x + dx,
			y: self.y + dy,
			..*self
		}
	}
}

/// Static obstacles for one match.
#[derive(Debug, Clone, Default)]
pub struct ObstacleField {
	rects: Vec<Rect>,
}

impl ObstacleField {
	/// Largest obstacle side, in cells.
	pub const MAX_CELLS: i32 = 5;

	pub fn from_rects(rects: Vec<Rect>) -> Self {
		Self { rects }
	}

	/// Scatters `count` obstacles over `[0, width] x [0, height]`, each side
	/// between one and [`Self::MAX_CELLS`] cells. Overlaps are kept.
	pub fn generate<R: Rng + ?Sized>(
		count: usize,
		width: u32,
		height: u32,
		cell_size: u32,
		rng: &mut R,
	) -> Self {
		let cell = cell_size as i32;
		let rects = (0..count)
			.map(|_| {
				Rect::new(
					rng.gen_range(0..=width as i32),
					rng.gen_range(0..=height as i32),
					rng.gen_range(1..=Self::MAX_CELLS) * cell,
					rng.gen_range(1..=Self::MAX_CELLS) * cell,
				)
			})
			.collect();
		Self { rects }
	}

	pub fn collides(&self, rect: &Rect) -> bool {
		self.rects.iter().any(|r| r.intersects(rect))
	}

	pub fn rects(&self) -> &[Rect] {
		&self.rects
	}

	pub fn len(&self) -> usize {
		self.rects.len()
	}

	pub fn is_empty(&self) -> bool {
		self.rects.is_empty()
	}
}
