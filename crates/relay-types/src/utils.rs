//! Hex string formatting helpers.

/// Adds a "0x" prefix to a hex string if it doesn't already have one.
pub fn with_0x_prefix(hex_str: &str) -> String {
	if hex_str.starts_with("0x") || hex_str.starts_with("0X") {
		hex_str.to_string()
	} else {
		format!("0x{}", hex_str)
	}
}

/// Removes the "0x" prefix from a hex string if present.
pub fn without_0x_prefix(hex_str: &str) -> &str {
	hex_str
		.strip_prefix("0x")
		.or_else(|| hex_str.strip_prefix("0X"))
		.unwrap_or(hex_str)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_prefix_round_trip() {
		assert_eq!(with_0x_prefix("abc123"), "0xabc123");
		assert_eq!(with_0x_prefix("0xabc123"), "0xabc123");
		assert_eq!(without_0x_prefix("0xabc123"), "abc123");
		assert_eq!(without_0x_prefix("abc123"), "abc123");
	}
}
