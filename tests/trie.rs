//! G2DMap trie add/query behavior and the per-bucket sort invariant,
//! exercised through the crate's public API.

use claim::assert_matches;
use g2dstore::config::Params;
use g2dstore::trie::{BucketMode, GramLookup, GramPayload, Trie};
use g2dstore::word_index::UNKNOWN_WORD_ID;

fn small_trigram_trie() -> Trie {
    let mut trie = Trie::new(3, BucketMode::ByteId);
    let params = Params::default();
    trie.pre_allocate(&[8, 6, 3], &params);
    trie.add_m_gram(&[2], GramPayload::Interior { log_prob: -1.0, back_off: -0.2 });
    trie.add_m_gram(&[3], GramPayload::Interior { log_prob: -1.5, back_off: -0.1 });
    trie.add_m_gram(&[4], GramPayload::Interior { log_prob: -2.0, back_off: 0.0 });
    trie.post_grams(2);
    trie.add_m_gram(&[2, 3], GramPayload::Interior { log_prob: -0.4, back_off: -0.05 });
    trie.add_m_gram(&[3, 4], GramPayload::Interior { log_prob: -0.6, back_off: 0.0 });
    trie.post_grams(2);
    trie.add_m_gram(&[2, 3, 4], GramPayload::Final { log_prob: -0.9 });
    trie.post_grams(3);
    trie
}

#[test]
fn populated_entries_are_found_at_every_level() {
    let trie = small_trigram_trie();
    assert_matches!(trie.get_payload(&[2]), GramLookup::Found(_));
    assert_matches!(trie.get_payload(&[2, 3]), GramLookup::Found(_));
    assert_matches!(trie.get_payload(&[2, 3, 4]), GramLookup::Found(_));
}

#[test]
fn absent_entries_report_not_found() {
    let trie = small_trigram_trie();
    assert_eq!(trie.get_payload(&[4, 2]), GramLookup::NotFound);
    assert_eq!(trie.get_payload(&[99]), GramLookup::NotFound);
}

#[test]
fn unknown_final_word_short_circuits_above_the_unigram_level() {
    let trie = small_trigram_trie();
    assert_eq!(trie.get_payload(&[2, UNKNOWN_WORD_ID]), GramLookup::EndUnknown);
    assert_eq!(trie.get_payload(&[2, 3, UNKNOWN_WORD_ID]), GramLookup::EndUnknown);
}

#[test]
fn unigram_lookup_of_the_unknown_id_itself_is_not_short_circuited() {
    let mut trie = Trie::new(1, BucketMode::ByteId);
    trie.pre_allocate(&[4], &Params::default());
    trie.add_m_gram(&[UNKNOWN_WORD_ID], GramPayload::Interior { log_prob: -5.0, back_off: 0.0 });
    match trie.get_payload(&[UNKNOWN_WORD_ID]) {
        GramLookup::Found(p) => assert_eq!(p.log_prob(), -5.0),
        other => panic!("expected Found for the unigram level, got {:?}", other),
    }
}

#[test]
fn hash_id_bucket_mode_also_round_trips() {
    let mut trie = Trie::new(2, BucketMode::HashId);
    trie.pre_allocate(&[4, 2], &Params::default());
    trie.add_m_gram(&[2], GramPayload::Interior { log_prob: -1.0, back_off: 0.0 });
    trie.add_m_gram(&[3], GramPayload::Interior { log_prob: -2.0, back_off: 0.0 });
    trie.post_grams(2);
    trie.add_m_gram(&[2, 3], GramPayload::Final { log_prob: -0.3 });
    trie.post_grams(2);

    match trie.get_payload(&[2, 3]) {
        GramLookup::Found(p) => assert_eq!(p.log_prob(), -0.3),
        other => panic!("expected Found, got {:?}", other),
    }
}
