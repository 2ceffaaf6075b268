use std::io::Write;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use crate::error::SourceError;
use super::draw::UniformDraw;
use super::generator::SymbolGenerator;
use super::source_model::SourceModel;

/// Cooperative cancellation flag shared between a live run and its controller.
///
/// Clones share the same flag. `cancel` publishes with `Release`,
/// `is_cancelled` reads with `Acquire`.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
	cancelled: Arc<AtomicBool>,
}

impl CancelToken {
	pub fn new() -> Self {
		Self::default()
	}

	/// Requests the run to stop before its next symbol.
	pub fn cancel(&self) {
		self.cancelled.store(true, Ordering::Release);
	}

	pub fn is_cancelled(&self) -> bool {
		self.cancelled.load(Ordering::Acquire)
	}
}

/// Receives emitted symbols, in generation order.
pub trait SymbolSink {
	fn accept(&mut self, position: u64, symbol: &str) -> Result<(), SourceError>;
}

impl SymbolSink for Vec<String> {
	fn accept(&mut self, _position: u64, symbol: &str) -> Result<(), SourceError> {
		self.push(symbol.to_owned());
		Ok(())
	}
}

/// Writes one symbol per line, flushing after each one.
pub struct LineSink<W: Write> {
	writer: W,
	line_ending: &'static str,
}

impl<W: Write> LineSink<W> {
	pub fn new(writer: W) -> Self {
		Self::with_line_ending(writer, "\n")
	}

	/// Uses a custom line ending (ex. `"\r\n"` for a terminal in raw mode).
	pub fn with_line_ending(writer: W, line_ending: &'static str) -> Self {
		Self { writer, line_ending }
	}

	pub fn into_inner(self) -> W {
		self.writer
	}
}

impl<W: Write> SymbolSink for LineSink<W> {
	fn accept(&mut self, _position: u64, symbol: &str) -> Result<(), SourceError> {
		write!(self.writer, "{}{}", symbol, self.line_ending)?;
		self.writer.flush()?;
		Ok(())
	}
}

/// Drives a [`SymbolGenerator`] over increasing positions starting at 0.
///
/// Two modes:
/// - bounded: a fixed number of symbols
/// - live: until a [`CancelToken`] is cancelled
pub struct StreamDriver<'m> {
	generator: SymbolGenerator<'m>,
}

impl<'m> StreamDriver<'m> {
	pub fn new(model: &'m SourceModel) -> Self {
		Self { generator: SymbolGenerator::new(model) }
	}

	/// Returns the symbols for positions `0..count`.
	pub fn generate(&self, count: u64, draw: &mut impl UniformDraw) -> Result<Vec<&'m str>, SourceError> {
		(0..count).map(|position| self.generator.emit(position, &mut *draw)).collect()
	}

	/// Sends the symbols for positions `0..count` to `sink`, one at a time.
	pub fn run_bounded(&self, count: u64, draw: &mut impl UniformDraw, sink: &mut impl SymbolSink) -> Result<(), SourceError> {
		for position in 0..count {
			let symbol = self.generator.emit(position, draw)?;
			sink.accept(position, symbol)?;
		}
		Ok(())
	}

	/// Emits symbols until `token` is cancelled.
	///
	/// # Returns
	/// The number of symbols delivered to `sink`.
	///
	/// # Notes
	/// - The token is checked between two symbols, never during one.
	/// - A sink error stops the run and is returned.
	pub fn run_live(&self, draw: &mut impl UniformDraw, sink: &mut impl SymbolSink, token: &CancelToken) -> Result<u64, SourceError> {
		let mut position = 0;
		while !token.is_cancelled() {
			let symbol = self.generator.emit(position, draw)?;
			sink.accept(position, symbol)?;
			position += 1;
		}
		log::info!("live generation stopped after {} symbols", position);
		Ok(position)
	}
}

/// Runs [`StreamDriver::run_live`] on a worker thread.
///
/// The caller keeps a clone of `token` to stop the worker, then joins
/// the handle to get the symbol count (or the error that ended the run).
pub fn spawn_live<D, S>(
	model: Arc<SourceModel>,
	mut draw: D,
	mut sink: S,
	token: CancelToken,
) -> thread::JoinHandle<Result<u64, SourceError>>
where
	D: UniformDraw + Send + 'static,
	S: SymbolSink + Send + 'static,
{
	thread::spawn(move || StreamDriver::new(&model).run_live(&mut draw, &mut sink, &token))
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::model::description::SourceDescription;
	use crate::model::draw::ScriptedDraws;

	fn alternating() -> SourceModel {
		let description = SourceDescription::from_json_str(r#"{
			"models": { "m1": { "x": "0.5", "y": "0.5" } },
			"switches": { "A": { "m1": "1.0" } },
			"source": ["A"]
		}"#).unwrap();
		SourceModel::from_description(&description).unwrap()
	}

	/// Cancels the token once `limit` symbols were accepted.
	struct StopAfter {
		limit: usize,
		token: CancelToken,
		seen: Vec<(u64, String)>,
	}

	impl SymbolSink for StopAfter {
		fn accept(&mut self, position: u64, symbol: &str) -> Result<(), SourceError> {
			self.seen.push((position, symbol.to_owned()));
			if self.seen.len() >= self.limit {
				self.token.cancel();
			}
			Ok(())
		}
	}

	#[test]
	fn bounded_generation_in_order() {
		let model = alternating();
		let mut draws = ScriptedDraws::new(vec![0.0, 0.1, 0.0, 0.9]).unwrap();
		let symbols = StreamDriver::new(&model).generate(4, &mut draws).unwrap();
		assert_eq!(symbols, vec!["x", "y", "x", "y"]);
	}

	#[test]
	fn zero_count_emits_nothing() {
		let model = alternating();
		let mut draws = ScriptedDraws::new(vec![0.0]).unwrap();
		let mut sink: Vec<String> = Vec::new();
		StreamDriver::new(&model).run_bounded(0, &mut draws, &mut sink).unwrap();
		assert!(sink.is_empty());
		assert_eq!(draws.consumed(), 0);
	}

	#[test]
	fn line_sink_writes_one_symbol_per_line() {
		let model = alternating();
		let mut draws = ScriptedDraws::new(vec![0.0, 0.9, 0.0, 0.1]).unwrap();
		let mut sink = LineSink::new(Vec::new());
		StreamDriver::new(&model).run_bounded(3, &mut draws, &mut sink).unwrap();
		assert_eq!(String::from_utf8(sink.into_inner()).unwrap(), "y\nx\ny\n");
	}

	#[test]
	fn line_sink_custom_line_ending() {
		let mut sink = LineSink::with_line_ending(Vec::new(), "\r\n");
		sink.accept(0, "x").unwrap();
		sink.accept(1, "y").unwrap();
		assert_eq!(String::from_utf8(sink.into_inner()).unwrap(), "x\r\ny\r\n");
	}

	#[test]
	fn live_run_stops_between_symbols() {
		let model = alternating();
		let token = CancelToken::new();
		let mut draws = ScriptedDraws::new(vec![0.0, 0.1, 0.0, 0.9]).unwrap();
		let mut sink = StopAfter { limit: 5, token: token.clone(), seen: Vec::new() };

		let count = StreamDriver::new(&model).run_live(&mut draws, &mut sink, &token).unwrap();

		assert_eq!(count, 5);
		let positions: Vec<u64> = sink.seen.iter().map(|(p, _)| *p).collect();
		assert_eq!(positions, vec![0, 1, 2, 3, 4]);
		assert_eq!(sink.seen[4].1, "x");
	}

	#[test]
	fn cancelled_token_emits_nothing() {
		let model = alternating();
		let token = CancelToken::new();
		token.cancel();
		let mut draws = ScriptedDraws::new(vec![0.0]).unwrap();
		let mut sink: Vec<String> = Vec::new();
		assert_eq!(StreamDriver::new(&model).run_live(&mut draws, &mut sink, &token).unwrap(), 0);
	}

	/// Forwards every symbol to the test thread.
	struct ChannelSink(std::sync::mpsc::Sender<String>);

	impl SymbolSink for ChannelSink {
		fn accept(&mut self, _position: u64, symbol: &str) -> Result<(), SourceError> {
			// The receiver may already be gone once the test has seen enough
			let _ = self.0.send(symbol.to_owned());
			Ok(())
		}
	}

	#[test]
	fn spawned_live_run_is_cancelled_from_another_thread() {
		let model = Arc::new(alternating());
		let token = CancelToken::new();
		let draws = ScriptedDraws::new(vec![0.0, 0.1, 0.0, 0.9]).unwrap();
		let (tx, rx) = std::sync::mpsc::channel();
		let handle = spawn_live(model, draws, ChannelSink(tx), token.clone());

		let first: Vec<String> = rx.iter().take(3).collect();
		token.cancel();
		let count = handle.join().unwrap().unwrap();

		assert_eq!(first, vec!["x", "y", "x"]);
		assert!(count >= 3);
	}
}
