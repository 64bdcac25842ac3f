//! End-to-end: load an ARPA-like language model and a Moses-style phrase
//! table, then query both through the frozen, public API.

use std::io::Cursor;

use g2dstore::build::ModelBuilder;
use g2dstore::config::Params;
use g2dstore::lm;
use g2dstore::trie::{BucketMode, Trie};
use g2dstore::word_index::basic::BasicWordIndex;
use g2dstore::word_index::WordIndex;

const ARPA: &str = "\\data\\
ngram 1=4
ngram 2=2
\\1-grams:
-1.0\t<unk>\t0.0
-0.8\tthe\t-0.3
-1.2\tcat\t-0.2
-1.5\tsat\t0.0
\\2-grams:
-0.2\tthe\tcat
-0.4\tcat\tsat
\\end\\
";

const MOSES: &str = "the cat ||| le chat ||| 0.8 0.6 0.7 0.6 ||| 0\n\
the cat ||| la chatte ||| 0.05 0.2 0.9 0.5 ||| 0\n\
nonsense ||| n''importe quoi ||| 0.00001 0.2 0.00001 0.2 ||| 0\n";

#[test]
fn loads_and_queries_a_small_model_end_to_end() {
    let mut word_index = BasicWordIndex::new();
    let mut trie = Trie::new(2, BucketMode::ByteId);
    let params = Params::default();

    ModelBuilder::load_language_model(Cursor::new(ARPA), &params, &mut word_index, &mut trie).unwrap();

    let the = word_index.get_word_id("the");
    let cat = word_index.get_word_id("cat");
    let sat = word_index.get_word_id("sat");
    let bigram_score = lm::score(&trie, &[the, cat], 2);
    assert!((bigram_score - (-0.2)).abs() < 1e-6);

    // The ARPA fixture's literal "<unk>" unigram line must land on
    // UNKNOWN_WORD_ID, so an out-of-vocabulary word is scored with its
    // declared -1.0 log-prob, not the unpopulated -99.0 sentinel.
    let banana = word_index.get_word_id("banana");
    assert_eq!(banana, g2dstore::word_index::UNKNOWN_WORD_ID);
    let oov_score = lm::score(&trie, &[banana], 1);
    assert!((oov_score - (-1.0)).abs() < 1e-6, "expected the ARPA-declared <unk> score, got {oov_score}");

    let unseen_bigram_score = lm::score(&trie, &[cat, the], 2);
    assert!(unseen_bigram_score < bigram_score, "back-off path should score lower than a direct hit");

    let trigram_like_sequence_score = lm::score(&trie, &[the, cat, sat], 1);
    assert!(trigram_like_sequence_score.is_finite());

    let model = ModelBuilder::load_phrase_table(Cursor::new(MOSES), &params, &word_index, &trie).unwrap();
    let source_uid = g2dstore::hash::str_hash64("the cat");
    let entry = model.get_source_entry(source_uid).expect("\"the cat\" should survive filtering");
    assert_eq!(entry.targets().len(), 2);
    // "le chat" has the stronger features and should rank first.
    let top_uid = g2dstore::hash::str_hash64("le chat");
    assert_eq!(entry.targets()[0].target_uid, top_uid);

    let dropped_uid = g2dstore::hash::str_hash64("nonsense");
    assert!(model.get_source_entry(dropped_uid).is_none());
    let unk_entry = model
        .get_source_entry(g2dstore::tm::UNKNOWN_PHRASE_UID)
        .expect("unknown-source entry must always exist");
    // Synthesized from the same <unk> lookup as the LM side; must also see
    // the ARPA-declared -1.0, not the unpopulated -99.0 sentinel.
    assert!((unk_entry.targets()[0].lm_score - (-1.0)).abs() < 1e-6);
}
