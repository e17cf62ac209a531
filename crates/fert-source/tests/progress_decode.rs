use fert_core::errors::FertError;
use fert_source::progress::{
    decode_quantity, decode_uint_word, function_selector, BEANS_PER_FERTILIZER,
};
use fert_source::{ProgressSource, Snapshot, SnapshotSource};

#[test]
fn selector_matches_known_erc20_transfer() {
    assert_eq!(
        hex::encode(function_selector("transfer(address,uint256)")),
        "a9059cbb"
    );
    assert_eq!(function_selector(BEANS_PER_FERTILIZER).len(), 4);
}

#[test]
fn decodes_return_word() {
    let word = format!("0x{:064x}", 3_013_244u64);
    assert_eq!(decode_uint_word(&word).expect("word"), 3_013_244);
    assert_eq!(decode_uint_word("0x2dfa7c").expect("short"), 3_013_244);
}

#[test]
fn rejects_empty_and_oversized_words() {
    assert_eq!(
        decode_uint_word("0x").expect_err("empty").code(),
        "fert_source.rpc_empty_return"
    );
    let overflow = format!("0x{}{}", "1", "0".repeat(63));
    assert_eq!(
        decode_uint_word(&overflow).expect_err("overflow").code(),
        "fert_source.rpc_overflow"
    );
    let too_long = format!("0x{}", "0".repeat(65));
    assert!(matches!(
        decode_uint_word(&too_long),
        Err(FertError::Transport(_))
    ));
    assert!(decode_uint_word("0xzz").is_err());
}

#[test]
fn decodes_chain_id_quantity() {
    assert_eq!(decode_quantity("0x539").expect("quantity"), 1337);
    assert_eq!(decode_quantity("0x1").expect("quantity"), 1);
    assert!(decode_quantity("0x").is_err());
}

#[test]
fn snapshot_source_reports_progress() {
    let source = SnapshotSource::new(Snapshot {
        progress: 3_013_244,
        tokens: Vec::new(),
    });
    assert_eq!(source.global_progress().expect("progress"), 3_013_244);
}
