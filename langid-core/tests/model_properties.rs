use langid_core::model::counts::NGramCounts;
use langid_core::{NGramModel, Order};
use proptest::prelude::*;

// --- STRATEGIES ---

fn arb_order() -> impl Strategy<Value = Order> {
	prop_oneof![Just(Order::Unigram), Just(Order::Bigram), Just(Order::Trigram)]
}

fn arb_words() -> impl Strategy<Value = Vec<String>> {
	proptest::collection::vec("[a-z]{0,12}", 0..40)
}

// --- PROPERTIES ---

proptest! {
	#[test]
	fn probabilities_sum_to_one(order in arb_order(), words in arb_words()) {
		let model = NGramModel::build(order, &words);
		prop_assert_eq!(model.key_count(), order.key_space());
		prop_assert!((model.total_probability() - 1.0).abs() < 1e-9);
	}

	#[test]
	fn every_probability_is_positive(order in arb_order(), words in arb_words()) {
		let model = NGramModel::build(order, &words);
		prop_assert!(model.iter().all(|(_, p)| p > 0.0));
	}

	#[test]
	fn merge_order_does_not_matter(words in arb_words(), split in 0usize..40) {
		let split = split.min(words.len());
		let (head, tail) = words.split_at(split);

		let count = |part: &[String]| {
			let mut counts = NGramCounts::new(Order::Bigram);
			for word in part {
				counts.add_word(word);
			}
			counts
		};

		let mut forward = count(head);
		forward.merge(&count(tail)).unwrap();
		let mut backward = count(tail);
		backward.merge(&count(head)).unwrap();

		prop_assert_eq!(forward.finish(), backward.finish());
	}

	#[test]
	fn observed_windows_raise_probability(word in "[a-z]{3,10}") {
		for order in Order::ALL {
			let model = NGramModel::build(order, [&word]);
			let baseline = 1.0 / order.key_space() as f64;
			let first: String = word.chars().take(order.width()).collect();
			prop_assert!(model.probability(&first).unwrap() > baseline);
		}
	}
}

#[test]
fn empty_corpus_is_exactly_uniform() {
	for order in Order::ALL {
		let model = NGramModel::build(order, Vec::<&str>::new());
		let uniform = 1.0 / order.key_space() as f64;
		for (key, p) in model.iter() {
			assert_eq!(p, uniform, "order {order} key {key}");
		}
	}
}

#[test]
fn repeated_word_unigram_scenario() {
	// Two windows per word: 6 observations over 26 * 0.5 + 6 = 19
	let model = NGramModel::build(Order::Unigram, ["aa", "aa", "aa"]);
	assert_eq!(model.probability("a"), Some(6.5 / 19.0));
	for key in ["b", "m", "z"] {
		assert_eq!(model.probability(key), Some(0.5 / 19.0));
	}
}
