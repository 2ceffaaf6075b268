/// Error type for every fallible operation of the discrete source.
///
/// Configuration-time variants (`ConfigFormat`, `InvalidLiteral`,
/// `InvalidDistribution`, `UnknownReference`) are fatal: the caller is
/// expected to report them and stop. `SamplingExhausted` means a table
/// passed validation but the inverse-CDF walk still found no key, which is
/// a bug rather than a user error.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
	/// The description document is malformed or misses a required field.
	#[error("invalid source description: {reason}")]
	ConfigFormat {
		reason: String,
	},

	/// A probability literal is neither a decimal nor an `a/b` fraction.
	#[error("invalid probability literal `{literal}` for `{key}`: {reason}")]
	InvalidLiteral {
		key: String,
		literal: String,
		reason: String,
	},

	/// A table has a value outside [0, 1] or does not sum to 1.
	#[error("invalid distribution `{table}`: {reason}")]
	InvalidDistribution {
		table: String,
		reason: String,
	},

	/// A switch names an unknown model, or the source names an unknown switch.
	#[error("unknown {kind} `{name}` referenced by {referrer}")]
	UnknownReference {
		kind: &'static str,
		name: String,
		referrer: String,
	},

	/// The target sequence does not fit in the sample horizon.
	#[error("invalid window: target length {target_len} with {total_count} samples")]
	InvalidWindow {
		target_len: usize,
		total_count: u64,
	},

	/// The inverse-CDF walk selected nothing for the given draw.
	#[error("sampling exhausted in `{table}` for draw {draw}")]
	SamplingExhausted {
		table: String,
		draw: f64,
	},

	#[error(transparent)]
	Io(#[from] std::io::Error),

	/// The saved model snapshot could not be encoded or decoded.
	#[error("snapshot error: {0}")]
	Snapshot(#[from] postcard::Error),
}
