//! The modeled symbol set and the base-26 key arithmetic shared by the
//! model builder and the classifier.

/// Number of modeled symbols (`a..=z`).
pub const ALPHABET_SIZE: usize = 26;

/// Maps a character to its alphabet index, if it is a lowercase ASCII letter.
#[inline]
pub fn symbol_index(c: char) -> Option<usize> {
	if c.is_ascii_lowercase() {
		Some(c as usize - 'a' as usize)
	} else {
		None
	}
}

/// Number of distinct keys of a given width (`26^width`).
pub fn key_space(width: usize) -> usize {
	ALPHABET_SIZE.pow(width as u32)
}

/// Base-26 index of a sequence of characters.
///
/// Returns `None` as soon as one character is outside the alphabet.
pub fn index_of_chars(chars: &[char]) -> Option<usize> {
	chars
		.iter()
		.try_fold(0usize, |acc, &c| Some(acc * ALPHABET_SIZE + symbol_index(c)?))
}

/// Base-26 index of a key of exactly `width` characters.
///
/// Returns `None` when the key has the wrong length or holds a symbol
/// outside the alphabet (uppercase letters included).
pub fn index_of(key: &str, width: usize) -> Option<usize> {
	let mut index = 0usize;
	let mut len = 0usize;
	for c in key.chars() {
		index = index * ALPHABET_SIZE + symbol_index(c)?;
		len += 1;
	}
	(len == width).then_some(index)
}

/// Inverse of [`index_of`]: rebuilds the key stored at `index`.
pub fn key_at(index: usize, width: usize) -> String {
	let mut chars = vec!['a'; width];
	let mut rest = index;
	for slot in chars.iter_mut().rev() {
		*slot = (b'a' + (rest % ALPHABET_SIZE) as u8) as char;
		rest /= ALPHABET_SIZE;
	}
	chars.into_iter().collect()
}

/// Every key of the given width, in base-26 counting order
/// (`aa, ab, ..., az, ba, ...`).
pub fn keys(width: usize) -> impl Iterator<Item = String> {
	(0..key_space(width)).map(move |index| key_at(index, width))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn key_space_per_order() {
		assert_eq!(key_space(1), 26);
		assert_eq!(key_space(2), 676);
		assert_eq!(key_space(3), 17_576);
	}

	#[test]
	fn keys_follow_counting_order() {
		let bigrams: Vec<String> = keys(2).collect();
		assert_eq!(bigrams.len(), 676);
		assert_eq!(bigrams[0], "aa");
		assert_eq!(bigrams[1], "ab");
		assert_eq!(bigrams[25], "az");
		assert_eq!(bigrams[26], "ba");
		assert_eq!(bigrams[675], "zz");
	}

	#[test]
	fn index_and_key_agree() {
		for (index, key) in keys(3).enumerate().step_by(97) {
			assert_eq!(index_of(&key, 3), Some(index));
		}
		assert_eq!(index_of("zzz", 3), Some(17_575));
	}

	#[test]
	fn rejects_foreign_symbols_and_bad_width() {
		assert_eq!(index_of("A", 1), None);
		assert_eq!(index_of("a ", 2), None);
		assert_eq!(index_of("é", 1), None);
		assert_eq!(index_of("ab", 3), None);
		assert_eq!(index_of("abc", 2), None);
		assert_eq!(index_of_chars(&['q', '1']), None);
	}
}
