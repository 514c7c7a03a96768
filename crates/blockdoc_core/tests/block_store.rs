use blockdoc_core::{Block, BlockId, BlockPatch, BlockStore, BlockType, RemoveOutcome, StripColor};

fn store_of(ids: &[&str]) -> BlockStore {
    BlockStore::from_blocks(
        ids.iter()
            .map(|id| Block::with_id(BlockId::from(*id), BlockType::Text, format!("block {id}")))
            .collect(),
    )
}

fn order(store: &BlockStore) -> Vec<&str> {
    store.blocks().iter().map(|block| block.id.as_str()).collect()
}

#[test]
fn insert_after_places_block_right_after_anchor() {
    let mut store = store_of(&["a", "b", "c"]);
    let block = Block::with_id(BlockId::from("x"), BlockType::Text, "");

    let blocks = store.insert_after(Some(&BlockId::from("a")), block);

    assert_eq!(blocks.len(), 4);
    assert_eq!(order(&store), vec!["a", "x", "b", "c"]);
}

#[test]
fn insert_after_unknown_or_missing_anchor_appends() {
    let mut store = store_of(&["a", "b"]);
    store.insert_after(
        Some(&BlockId::from("ghost")),
        Block::with_id(BlockId::from("x"), BlockType::Text, ""),
    );
    store.insert_after(None, Block::with_id(BlockId::from("y"), BlockType::Text, ""));

    assert_eq!(order(&store), vec!["a", "b", "x", "y"]);
}

#[test]
fn update_merges_only_patched_fields() {
    let mut store = store_of(&["a"]);
    let id = BlockId::from("a");

    assert!(store.update(&id, BlockPatch::details("why this matters")));
    assert!(store.update(&id, BlockPatch::strip_color(StripColor::Green)));

    let block = store.find(&id).unwrap();
    assert_eq!(block.content, "block a");
    assert_eq!(block.details.as_deref(), Some("why this matters"));
    assert_eq!(block.strip_color, Some(StripColor::Green));
}

#[test]
fn update_unknown_id_is_noop() {
    let mut store = store_of(&["a"]);
    let before = store.clone();

    assert!(!store.update(&BlockId::from("ghost"), BlockPatch::content("lost")));
    assert_eq!(store, before);
}

#[test]
fn removing_the_last_block_yields_one_fresh_empty_text_block() {
    let mut store = store_of(&["only"]);

    let outcome = store.remove(&BlockId::from("only"));

    let RemoveOutcome::Reset { fresh_id } = outcome else {
        panic!("expected reset, got {outcome:?}");
    };
    assert_eq!(store.len(), 1);
    let fresh = store.first();
    assert_eq!(fresh.id, fresh_id);
    assert_ne!(fresh.id.as_str(), "only");
    assert_eq!(fresh.kind, BlockType::Text);
    assert!(fresh.content.is_empty());
}

#[test]
fn remove_never_leaves_sequence_empty() {
    let mut store = store_of(&["a", "b", "c", "d"]);
    for _ in 0..10 {
        let id = store.first().id.clone();
        store.remove(&id);
        assert!(!store.is_empty());
    }
    assert_eq!(store.len(), 1);
}

#[test]
fn remove_reports_previous_index() {
    let mut store = store_of(&["a", "b", "c"]);
    assert_eq!(
        store.remove(&BlockId::from("b")),
        RemoveOutcome::Removed { index: 1 }
    );
    assert_eq!(store.remove(&BlockId::from("b")), RemoveOutcome::NotFound);
    assert_eq!(order(&store), vec!["a", "c"]);
}

#[test]
fn loading_an_empty_sequence_is_normalized() {
    let mut store = BlockStore::from_blocks(Vec::new());
    assert_eq!(store.len(), 1);
    assert_eq!(store.first().kind, BlockType::Text);

    store.replace_all(vec![]);
    assert_eq!(store.len(), 1);
}

#[test]
fn details_of_unknown_block_is_empty_string() {
    let store = store_of(&["a"]);
    assert_eq!(store.details_of(&BlockId::from("ghost")), "");
    assert_eq!(store.details_of(&BlockId::from("a")), "");
}

#[test]
fn generated_ids_are_distinct() {
    let a = BlockId::generate();
    let b = BlockId::generate();
    assert_ne!(a, b);
    assert!(!a.as_str().is_empty());
}
