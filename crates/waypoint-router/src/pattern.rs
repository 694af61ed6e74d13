//! Path pattern matching for client-side routes.
//!
//! Supported syntax:
//! - `/users/` - exact match
//! - `/users/{id}/` - single path parameter (one segment, no `/`)
//! - `/users/{id}/posts/{post_id}/` - multiple parameters
//! - `/files/{path:*}` - wildcard, captures the rest of the path including `/`

use crate::error::PatternError;
use std::collections::HashMap;

/// Maximum allowed length for a route pattern string in bytes.
const MAX_PATTERN_LENGTH: usize = 1024;

/// Maximum allowed number of path segments in a route pattern.
const MAX_PATH_SEGMENTS: usize = 32;

/// Maximum allowed size for a compiled pattern regex (in bytes).
const MAX_REGEX_SIZE: usize = 1 << 20; // 1 MiB

/// A compiled path pattern.
#[derive(Debug, Clone)]
pub struct PathPattern {
	/// The original pattern string.
	pattern: String,
	/// Compiled regex pattern.
	regex: regex::Regex,
	/// Parameter names in order.
	param_names: Vec<String>,
	/// Whether this is an exact match pattern.
	is_exact: bool,
	/// Literal text and parameters in pattern order.
	tokens: Vec<Token>,
}

#[derive(Debug, Clone)]
enum Token {
	Literal(String),
	Param { name: String, wildcard: bool },
}

impl PathPattern {
	/// Compiles a pattern string.
	///
	/// # Errors
	///
	/// Returns a [`PatternError`] if the pattern does not start with `/`, is
	/// too long, has too many segments, has unbalanced braces, has an empty,
	/// non-identifier or repeated parameter name, or the regex fails to build.
	pub fn new(pattern: &str) -> Result<Self, PatternError> {
		if !pattern.starts_with('/') {
			return Err(PatternError::MissingLeadingSlash(pattern.to_string()));
		}

		if pattern.len() > MAX_PATTERN_LENGTH {
			return Err(PatternError::TooLong {
				length: pattern.len(),
				max: MAX_PATTERN_LENGTH,
			});
		}

		let segment_count = pattern.split('/').count();
		if segment_count > MAX_PATH_SEGMENTS {
			return Err(PatternError::TooManySegments {
				count: segment_count,
				max: MAX_PATH_SEGMENTS,
			});
		}

		let tokens = Self::tokenize(pattern)?;

		let mut regex_str = String::from("^");
		let mut param_names: Vec<String> = Vec::new();
		for token in &tokens {
			match token {
				Token::Literal(text) => regex_str.push_str(&regex::escape(text)),
				Token::Param { name, wildcard } => {
					if param_names.contains(name) {
						return Err(PatternError::DuplicateParam {
							name: name.clone(),
							pattern: pattern.to_string(),
						});
					}
					param_names.push(name.clone());
					if *wildcard {
						regex_str.push_str(&format!("(?P<{}>.*)", name));
					} else {
						regex_str.push_str(&format!("(?P<{}>[^/]+)", name));
					}
				}
			}
		}
		regex_str.push('$');

		let regex = regex::RegexBuilder::new(&regex_str)
			.size_limit(MAX_REGEX_SIZE)
			.build()
			.map_err(|e| PatternError::Regex(e.to_string()))?;

		Ok(Self {
			pattern: pattern.to_string(),
			regex,
			is_exact: param_names.is_empty(),
			param_names,
			tokens,
		})
	}

	fn tokenize(pattern: &str) -> Result<Vec<Token>, PatternError> {
		let mut tokens = Vec::new();
		let mut literal = String::new();
		let mut chars = pattern.chars();

		while let Some(c) = chars.next() {
			match c {
				'{' => {
					if !literal.is_empty() {
						tokens.push(Token::Literal(std::mem::take(&mut literal)));
					}
					let mut body = String::new();
					let mut closed = false;
					for next in chars.by_ref() {
						match next {
							'}' => {
								closed = true;
								break;
							}
							'{' => return Err(PatternError::UnbalancedBraces(pattern.to_string())),
							_ => body.push(next),
						}
					}
					if !closed {
						return Err(PatternError::UnbalancedBraces(pattern.to_string()));
					}

					let (name, wildcard) = match body.split_once(':') {
						Some((name, "*")) => (name.to_string(), true),
						Some(_) => {
							return Err(PatternError::InvalidParamName {
								name: body.clone(),
								pattern: pattern.to_string(),
							});
						}
						None => (body.clone(), false),
					};
					if !is_identifier(&name) {
						return Err(PatternError::InvalidParamName {
							name,
							pattern: pattern.to_string(),
						});
					}
					tokens.push(Token::Param { name, wildcard });
				}
				'}' => return Err(PatternError::UnbalancedBraces(pattern.to_string())),
				_ => literal.push(c),
			}
		}
		if !literal.is_empty() {
			tokens.push(Token::Literal(literal));
		}
		Ok(tokens)
	}

	/// Returns the original pattern string.
	pub fn pattern(&self) -> &str {
		&self.pattern
	}

	/// Returns the parameter names in pattern order.
	pub fn param_names(&self) -> &[String] {
		&self.param_names
	}

	/// Attempts to match a path against this pattern.
	///
	/// Returns the named parameters on success.
	pub fn matches(&self, path: &str) -> Option<HashMap<String, String>> {
		self.regex.captures(path).map(|caps| {
			self.param_names
				.iter()
				.filter_map(|name| {
					caps.name(name)
						.map(|m| (name.clone(), m.as_str().to_string()))
				})
				.collect()
		})
	}

	/// Generates a path from this pattern with the given parameters.
	///
	/// Values are inserted verbatim. Returns `None` if a parameter is missing
	/// or its value could not be matched back by this pattern (see
	/// [`PathPattern::invalid_param`]).
	pub fn reverse(&self, params: &HashMap<String, String>) -> Option<String> {
		let mut result = String::with_capacity(self.pattern.len());
		for token in &self.tokens {
			match token {
				Token::Literal(text) => result.push_str(text),
				Token::Param { name, wildcard } => {
					let value = params.get(name)?;
					if !fits_param(value, *wildcard) {
						return None;
					}
					result.push_str(value);
				}
			}
		}
		Some(result)
	}

	/// Returns the first parameter that `params` lacks, if any.
	pub fn missing_param(&self, params: &HashMap<String, String>) -> Option<&str> {
		self.param_names
			.iter()
			.find(|name| !params.contains_key(*name))
			.map(String::as_str)
	}

	/// Returns the first parameter whose value cannot fill its slot, if any.
	///
	/// A single-segment parameter must be non-empty and free of `/`. No
	/// value may contain `?` or `#`, which would end the path.
	pub fn invalid_param(&self, params: &HashMap<String, String>) -> Option<&str> {
		self.tokens.iter().find_map(|token| match token {
			Token::Param { name, wildcard } => params
				.get(name)
				.filter(|value| !fits_param(value, *wildcard))
				.map(|_| name.as_str()),
			Token::Literal(_) => None,
		})
	}

	/// Checks if this pattern would match the given path.
	pub fn is_match(&self, path: &str) -> bool {
		self.regex.is_match(path)
	}

	/// Returns whether this is an exact match pattern (no parameters).
	pub fn is_exact(&self) -> bool {
		self.is_exact
	}
}

fn fits_param(value: &str, wildcard: bool) -> bool {
	if value.contains(['?', '#']) {
		return false;
	}
	wildcard || (!value.is_empty() && !value.contains('/'))
}

fn is_identifier(name: &str) -> bool {
	let mut chars = name.chars();
	match chars.next() {
		Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
		_ => return false,
	}
	chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Splits a navigation target into its path and optional query string.
///
/// An empty path becomes `/`, and a missing leading `/` is added.
pub fn split_target(target: &str) -> (String, Option<&str>) {
	let (path, query) = match target.split_once('?') {
		Some((path, query)) => (path, Some(query)),
		None => (target, None),
	};
	let path = if path.is_empty() {
		"/".to_string()
	} else if path.starts_with('/') {
		path.to_string()
	} else {
		format!("/{}", path)
	};
	(path, query.filter(|q| !q.is_empty()))
}

impl PartialEq for PathPattern {
	fn eq(&self, other: &Self) -> bool {
		self.pattern == other.pattern
	}
}

impl Eq for PathPattern {}

impl std::fmt::Display for PathPattern {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.pattern)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_root_pattern() {
		let pattern = PathPattern::new("/").unwrap();
		assert!(pattern.is_exact());
		assert!(pattern.is_match("/"));
		assert!(!pattern.is_match("/home"));
		assert!(!pattern.is_match(""));
	}

	#[rstest]
	fn test_exact_pattern() {
		let pattern = PathPattern::new("/users/").unwrap();
		assert!(pattern.is_match("/users/"));
		assert!(!pattern.is_match("/users"));
		assert!(!pattern.is_match("/users/123/"));
	}

	#[rstest]
	fn test_single_param() {
		let pattern = PathPattern::new("/users/{id}/").unwrap();
		assert!(!pattern.is_exact());
		assert!(!pattern.is_match("/users/"));

		let params = pattern.matches("/users/42/").unwrap();
		assert_eq!(params.get("id"), Some(&"42".to_string()));
	}

	#[rstest]
	fn test_multiple_params() {
		let pattern = PathPattern::new("/users/{user_id}/posts/{post_id}/").unwrap();
		let params = pattern.matches("/users/42/posts/123/").unwrap();

		assert_eq!(params.get("user_id"), Some(&"42".to_string()));
		assert_eq!(params.get("post_id"), Some(&"123".to_string()));
		assert_eq!(pattern.param_names(), &["user_id", "post_id"]);
	}

	#[rstest]
	fn test_wildcard_param() {
		let pattern = PathPattern::new("/static/{path:*}").unwrap();
		let params = pattern.matches("/static/css/styles/main.css").unwrap();

		assert_eq!(params.get("path"), Some(&"css/styles/main.css".to_string()));
	}

	#[rstest]
	fn test_special_chars_escaped() {
		let pattern = PathPattern::new("/api/v1.0/").unwrap();
		assert!(pattern.is_match("/api/v1.0/"));
		assert!(!pattern.is_match("/api/v1X0/"));
	}

	#[rstest]
	fn test_reverse() {
		let pattern = PathPattern::new("/users/{user_id}/files/{path:*}").unwrap();
		let mut params = HashMap::new();
		params.insert("user_id".to_string(), "7".to_string());
		params.insert("path".to_string(), "a/b.txt".to_string());

		assert_eq!(
			pattern.reverse(&params),
			Some("/users/7/files/a/b.txt".to_string())
		);
	}

	#[rstest]
	#[case("id", "a/b")]
	#[case("id", "")]
	#[case("id", "42?admin=1")]
	#[case("path", "a/b#top")]
	fn test_reverse_rejects_value_that_would_not_match(
		#[case] name: &str,
		#[case] value: &str,
	) {
		let pattern = PathPattern::new("/users/{id}/files/{path:*}").unwrap();
		let mut params = HashMap::new();
		params.insert("id".to_string(), "7".to_string());
		params.insert("path".to_string(), "docs/a.txt".to_string());
		params.insert(name.to_string(), value.to_string());

		assert_eq!(pattern.reverse(&params), None);
		assert_eq!(pattern.invalid_param(&params), Some(name));
	}

	#[rstest]
	fn test_reverse_inserts_values_verbatim() {
		let pattern = PathPattern::new("/a/{first}/b/{second}/").unwrap();
		let mut params = HashMap::new();
		params.insert("first".to_string(), "{second}".to_string());
		params.insert("second".to_string(), "x".to_string());

		let path = pattern.reverse(&params).unwrap();

		assert_eq!(path, "/a/{second}/b/x/");
		let matched = pattern.matches(&path).unwrap();
		assert_eq!(matched.get("first"), Some(&"{second}".to_string()));
		assert_eq!(pattern.invalid_param(&params), None);
	}

	#[rstest]
	fn test_reverse_missing_param() {
		let pattern = PathPattern::new("/users/{id}/").unwrap();
		let params = HashMap::new();

		assert_eq!(pattern.reverse(&params), None);
		assert_eq!(pattern.missing_param(&params), Some("id"));
	}

	#[rstest]
	#[case("users/", "must start with '/'")]
	#[case("/users/{id/", "Unbalanced braces")]
	#[case("/users/id}/", "Unbalanced braces")]
	#[case("/users/{}/", "Invalid parameter name ''")]
	#[case("/users/{1st}/", "Invalid parameter name '1st'")]
	#[case("/users/{id:int}/", "Invalid parameter name 'id:int'")]
	#[case("/a/{id}/b/{id}/", "Duplicate parameter 'id'")]
	fn test_malformed_patterns(#[case] pattern: &str, #[case] message: &str) {
		let err = PathPattern::new(pattern).unwrap_err();
		assert!(
			err.to_string().contains(message),
			"{pattern:?} produced {err}"
		);
	}

	#[rstest]
	fn test_pattern_rejects_excessive_length() {
		let long_pattern = "/".to_string() + &"a".repeat(1025);
		assert!(matches!(
			PathPattern::new(&long_pattern),
			Err(PatternError::TooLong { .. })
		));
	}

	#[rstest]
	fn test_pattern_rejects_excessive_segments() {
		let segments: Vec<&str> = (0..35).map(|_| "seg").collect();
		let pattern = format!("/{}/", segments.join("/"));
		assert!(matches!(
			PathPattern::new(&pattern),
			Err(PatternError::TooManySegments { .. })
		));
	}

	#[rstest]
	fn test_pattern_equality_and_display() {
		let p1 = PathPattern::new("/users/{id}/").unwrap();
		let p2 = PathPattern::new("/users/{id}/").unwrap();
		let p3 = PathPattern::new("/users/{user_id}/").unwrap();

		assert_eq!(p1, p2);
		assert_ne!(p1, p3);
		assert_eq!(p1.to_string(), "/users/{id}/");
	}

	#[rstest]
	#[case("", "/", None)]
	#[case("/", "/", None)]
	#[case("about", "/about", None)]
	#[case("/search?q=rust", "/search", Some("q=rust"))]
	#[case("/search?", "/search", None)]
	fn test_split_target(
		#[case] target: &str,
		#[case] path: &str,
		#[case] query: Option<&str>,
	) {
		assert_eq!(split_target(target), (path.to_string(), query));
	}
}
