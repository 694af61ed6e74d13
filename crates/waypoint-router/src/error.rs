//! Error types for client-side routing.

/// Error type for path pattern compilation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PatternError {
	/// The pattern does not start with `/`.
	#[error("Pattern must start with '/': {0}")]
	MissingLeadingSlash(String),
	/// The pattern exceeds the maximum length.
	#[error("Pattern length {length} exceeds maximum allowed length of {max} bytes")]
	TooLong {
		/// Actual length in bytes.
		length: usize,
		/// Maximum allowed length in bytes.
		max: usize,
	},
	/// The pattern has too many path segments.
	#[error("Pattern has {count} path segments, exceeding maximum of {max}")]
	TooManySegments {
		/// Actual segment count.
		count: usize,
		/// Maximum allowed segment count.
		max: usize,
	},
	/// A `{` without matching `}` or vice versa.
	#[error("Unbalanced braces in pattern: {0}")]
	UnbalancedBraces(String),
	/// A parameter name that is empty or not an identifier.
	#[error("Invalid parameter name '{name}' in pattern: {pattern}")]
	InvalidParamName {
		/// The offending parameter name.
		name: String,
		/// The full pattern.
		pattern: String,
	},
	/// The same parameter appears twice.
	#[error("Duplicate parameter '{name}' in pattern: {pattern}")]
	DuplicateParam {
		/// The repeated parameter name.
		name: String,
		/// The full pattern.
		pattern: String,
	},
	/// The generated regex failed to compile.
	#[error("Failed to compile pattern regex: {0}")]
	Regex(String),
}

/// Error returned by a lazy component loader.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct LoadError {
	message: String,
}

impl LoadError {
	/// Creates a load error with a message.
	pub fn new(message: impl Into<String>) -> Self {
		Self {
			message: message.into(),
		}
	}

	/// Returns the message.
	pub fn message(&self) -> &str {
		&self.message
	}
}

/// Error type for history operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HistoryError {
	/// The browser API is not available (no window, no history object).
	#[error("History API unavailable: {0}")]
	Unavailable(String),
	/// The browser rejected the operation.
	#[error("History operation failed: {0}")]
	Operation(String),
}

/// Error type for router operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouterError {
	/// Route not found.
	#[error("Route not found: {0}")]
	NotFound(String),
	/// Invalid route name.
	#[error("Invalid route name: {0}")]
	InvalidRouteName(String),
	/// Missing parameter for reverse URL.
	#[error("Missing parameter: {0}")]
	MissingParameter(String),
	/// A parameter value that would not match its route segment.
	#[error("Invalid value {value:?} for parameter '{name}'")]
	InvalidParameter {
		/// The parameter name.
		name: String,
		/// The rejected value.
		value: String,
	},
	/// A route pattern failed to compile.
	#[error("Invalid route pattern '{pattern}': {source}")]
	InvalidPattern {
		/// The pattern as registered.
		pattern: String,
		/// Why it was rejected.
		source: PatternError,
	},
	/// Two routes share a name.
	#[error("Duplicate route name: {0}")]
	DuplicateRouteName(String),
	/// Two static routes share a path.
	#[error("Duplicate route path: {0}")]
	DuplicatePath(String),
	/// The history strategy rejected the navigation.
	#[error("Navigation failed: {0}")]
	NavigationFailed(#[from] HistoryError),
	/// A route guard rejected the navigation.
	#[error("Navigation cancelled by guard: {0}")]
	NavigationCancelled(String),
	/// A newer navigation started before this one finished loading.
	#[error("Navigation aborted by a newer navigation: {0}")]
	NavigationAborted(String),
	/// Redirects did not settle within the configured limit.
	#[error("Too many redirects while resolving: {0}")]
	RedirectLoop(String),
	/// The route's component failed to load.
	#[error("Failed to load component for route '{route}': {source}")]
	ComponentLoad {
		/// Name (or path, for unnamed routes) of the route.
		route: String,
		/// The loader's error.
		source: LoadError,
	},
}
