use std::fmt;

use serde::{Deserialize, Serialize};

use crate::alphabet::key_space;
use crate::error::LangIdError;

/// Order (n-gram width) of a model.
///
/// Only three orders are modeled; any other width is rejected when
/// converting from an integer.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Order {
	Unigram,
	Bigram,
	Trigram,
}

impl Order {
	/// All orders, in the sequence a full query report is produced.
	pub const ALL: [Order; 3] = [Order::Unigram, Order::Bigram, Order::Trigram];

	/// Number of characters in one n-gram of this order.
	pub fn width(self) -> usize {
		match self {
			Order::Unigram => 1,
			Order::Bigram => 2,
			Order::Trigram => 3,
		}
	}

	/// Number of keys in a model of this order.
	pub fn key_space(self) -> usize {
		key_space(self.width())
	}

	/// Section label used in query reports.
	pub fn label(self) -> &'static str {
		match self {
			Order::Unigram => "UNIGRAM",
			Order::Bigram => "BIGRAM",
			Order::Trigram => "TRIGRAM",
		}
	}
}

impl TryFrom<usize> for Order {
	type Error = LangIdError;

	fn try_from(width: usize) -> Result<Self, Self::Error> {
		match width {
			1 => Ok(Order::Unigram),
			2 => Ok(Order::Bigram),
			3 => Ok(Order::Trigram),
			other => Err(LangIdError::InvalidOrder(other)),
		}
	}
}

impl fmt::Display for Order {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.width())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn converts_supported_widths() {
		for order in Order::ALL {
			assert_eq!(Order::try_from(order.width()).ok(), Some(order));
		}
	}

	#[test]
	fn rejects_other_widths() {
		assert!(matches!(Order::try_from(0), Err(LangIdError::InvalidOrder(0))));
		assert!(matches!(Order::try_from(4), Err(LangIdError::InvalidOrder(4))));
	}
}
