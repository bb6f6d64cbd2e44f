//! Byte transport between the host and the hand devices.
//!
//! The devices talk through an XBee radio that shows up either as a serial
//! device file or, behind a bridge such as ser2net, as a TCP socket. Every
//! message travels as one line terminated by `\n`.

use std::{
	fs::OpenOptions,
	io::{BufRead, BufReader, Read, Write},
	net::TcpStream,
	path::PathBuf,
	sync::mpsc,
	thread,
};

use anyhow::Context;
use tracing::{debug, warn};

use crate::protocol::Response;

pub trait ByteSource {
	/// Next line without its terminator, `None` once the link is closed.
	fn read_line(&mut self) -> std::io::Result<Option<Vec<u8>>>;
}

pub trait ByteSink {
	fn write_byte(&mut self, b: u8) -> std::io::Result<()>;
}

impl<W: Write> ByteSink for W {
	fn write_byte(&mut self, b: u8) -> std::io::Result<()> {
		self.write_all(&[b])?;
		self.flush()
	}
}

pub struct LineReader<R> {
	inner: BufReader<R>,
}

impl<R: Read> LineReader<R> {
	pub fn new(inner: R) -> Self {
		Self {
			inner: BufReader::new(inner),
		}
	}
}

impl<R: Read> ByteSource for LineReader<R> {
	fn read_line(&mut self) -> std::io::Result<Option<Vec<u8>>> {
		let mut line = Vec::new();
		if self.inner.read_until(b'\n', &mut line)? == 0 {
			return Ok(None);
		}
		if line.last() == Some(&b'\n') {
			line.pop();
		}
		Ok(Some(line))
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkTarget {
	/// Serial device file, already configured (baud rate etc.) by the OS.
	Device(PathBuf),
	/// TCP bridge in front of the radio.
	Tcp(String),
}

pub type Reader = LineReader<Box<dyn Read + Send>>;
pub type Writer = Box<dyn Write + Send>;

pub fn open(target: &LinkTarget) -> anyhow::Result<(Reader, Writer)> {
	match target {
		LinkTarget::Device(path) => {
			let file = OpenOptions::new()
				.read(true)
				.write(true)
				.open(path)
				.with_context(|| format!("open {}", path.display()))?;
			let read_half: Box<dyn Read + Send> =
				Box::new(file.try_clone().context("clone device handle")?);
			debug!("opened device {}", path.display());
			let write_half: Writer = Box::new(file);
			Ok((LineReader::new(read_half), write_half))
		}
		LinkTarget::Tcp(addr) => {
			let stream = TcpStream::connect(addr).context("connect")?;
			stream.set_nodelay(true).ok();
			let read_half: Box<dyn Read + Send> =
				Box::new(stream.try_clone().context("clone read stream")?);
			debug!("connected to {addr}");
			let write_half: Writer = Box::new(stream);
			Ok((LineReader::new(read_half), write_half))
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkEvent {
	Line(Vec<u8>),
	Closed,
}

/// Reads lines on a background thread so the tick loop never blocks on the device.
pub fn spawn_reader<S>(mut source: S) -> mpsc::Receiver<LinkEvent>
where
	S: ByteSource + Send + 'static,
{
	let (tx, rx) = mpsc::channel::<LinkEvent>();

	thread::spawn(move || loop {
		let ev = match source.read_line() {
			Ok(Some(line)) => LinkEvent::Line(line),
			Ok(None) => LinkEvent::Closed,
			Err(e) => {
				warn!("link read failed: {e}");
				LinkEvent::Closed
			}
		};
		let closed = ev == LinkEvent::Closed;
		if tx.send(ev).is_err() || closed {
			break;
		}
	});

	rx
}

/// Best effort: a device that cannot be reached must not stop the game.
pub fn send_response<S: ByteSink + ?Sized>(sink: &mut S, response: Response) -> bool {
	let b = response.encode();
	match sink.write_byte(b) {
		Ok(()) => {
			debug!(byte = b, ?response, "sent response");
			true
		}
		Err(e) => {
			warn!("could not send response {b:#04x}: {e}");
			false
		}
	}
}
