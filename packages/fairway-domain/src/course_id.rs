use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Canonical course identifier: 12 bytes, rendered as 24 lowercase hex
/// characters.
///
/// Upload feeds supply arbitrary opaque course ids. An id that already is a
/// 24-hex string is adopted as-is (lowercased); anything else is
/// canonicalized by hashing, so the same external id always maps to the same
/// canonical id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CourseId([u8; 12]);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidCourseId;

impl CourseId {
	pub fn coerce(raw: &str) -> Result<Self, InvalidCourseId> {
		let trimmed = raw.trim();

		if trimmed.is_empty() {
			return Err(InvalidCourseId);
		}
		if let Some(bytes) = parse_hex24(trimmed) {
			return Ok(Self(bytes));
		}

		let digest = blake3::hash(trimmed.as_bytes());
		let mut bytes = [0_u8; 12];

		bytes.copy_from_slice(&digest.as_bytes()[..12]);

		Ok(Self(bytes))
	}

	pub fn as_bytes(&self) -> &[u8; 12] {
		&self.0
	}

	pub fn to_hex(&self) -> String {
		let mut out = String::with_capacity(24);

		for byte in self.0 {
			out.push(hex_digit(byte >> 4));
			out.push(hex_digit(byte & 0x0f));
		}

		out
	}
}

impl fmt::Display for CourseId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.to_hex())
	}
}

impl fmt::Display for InvalidCourseId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("Invalid courseId")
	}
}

impl std::error::Error for InvalidCourseId {}

/// Strict form: accepts only the canonical 24-hex rendering.
impl FromStr for CourseId {
	type Err = InvalidCourseId;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		parse_hex24(s).map(Self).ok_or(InvalidCourseId)
	}
}

impl Serialize for CourseId {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		serializer.serialize_str(&self.to_hex())
	}
}

impl<'de> Deserialize<'de> for CourseId {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		let raw = String::deserialize(deserializer)?;

		raw.parse().map_err(serde::de::Error::custom)
	}
}

fn parse_hex24(s: &str) -> Option<[u8; 12]> {
	if s.len() != 24 || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
		return None;
	}

	let mut bytes = [0_u8; 12];

	for (i, chunk) in s.as_bytes().chunks_exact(2).enumerate() {
		bytes[i] = (hex_value(chunk[0]) << 4) | hex_value(chunk[1]);
	}

	Some(bytes)
}

fn hex_value(byte: u8) -> u8 {
	match byte {
		b'0'..=b'9' => byte - b'0',
		b'a'..=b'f' => byte - b'a' + 10,
		b'A'..=b'F' => byte - b'A' + 10,
		_ => 0,
	}
}

fn hex_digit(nibble: u8) -> char {
	match nibble {
		0..=9 => (b'0' + nibble) as char,
		_ => (b'a' + nibble - 10) as char,
	}
}
