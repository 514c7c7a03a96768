use blockdoc_core::{
    Block, BlockId, BlockKey, BlockType, CancelToken, CommandEffect, CompletionError,
    CompletionOutcome, CompletionProvider, CompletionRequest, CompletionResponse, DeleteOutcome,
    EditorConfig, EditorSession, PanelKey, PromoteOutcome, StripColor,
};
use std::time::Instant;

fn loaded(blocks: &[(&str, &str)]) -> EditorSession {
    EditorSession::with_blocks(
        EditorConfig::default(),
        blocks
            .iter()
            .map(|(id, content)| Block::with_id(BlockId::from(*id), BlockType::Text, *content))
            .collect(),
    )
}

fn ids(session: &EditorSession) -> Vec<String> {
    session
        .blocks()
        .iter()
        .map(|block| block.id.as_str().to_string())
        .collect()
}

struct Fixed(&'static str);

impl CompletionProvider for Fixed {
    fn complete(
        &self,
        _request: &CompletionRequest,
        _cancel: &CancelToken,
    ) -> Result<CompletionResponse, CompletionError> {
        Ok(CompletionResponse {
            completion: self.0.to_string(),
        })
    }
}

#[test]
fn empty_load_starts_with_one_block() {
    let session = EditorSession::with_blocks(EditorConfig::default(), Vec::new());
    assert_eq!(session.blocks().len(), 1);
    assert!(session.selected().is_none());
}

#[test]
fn enter_creates_block_after_focused_one() {
    let mut session = loaded(&[("a", "one"), ("b", "two")]);
    let a = BlockId::from("a");
    session.select(&a);

    let CommandEffect::BlockCreated(created) = session.handle_block_key(&a, BlockKey::Enter) else {
        panic!("enter should create a block");
    };

    assert_eq!(ids(&session)[1], created.as_str());
    assert_eq!(session.selected(), Some(&created));
}

#[test]
fn enter_uses_the_focused_block_without_prior_selection() {
    let mut session = loaded(&[("a", "one"), ("b", "two"), ("c", "three")]);
    assert!(session.selected().is_none());

    let CommandEffect::BlockCreated(created) =
        session.handle_block_key(&BlockId::from("a"), BlockKey::Enter)
    else {
        panic!("enter should create a block");
    };

    assert_eq!(ids(&session), vec!["a", created.as_str(), "b", "c"]);
    assert_eq!(session.selected(), Some(&created));
}

#[test]
fn enter_follows_focus_over_stale_selection() {
    let mut session = loaded(&[("a", "one"), ("b", "two"), ("c", "three")]);
    session.select(&BlockId::from("c"));

    let CommandEffect::BlockCreated(created) =
        session.handle_block_key(&BlockId::from("a"), BlockKey::Enter)
    else {
        panic!("enter should create a block");
    };

    assert_eq!(ids(&session)[1], created.as_str());
}

#[test]
fn shift_tab_selects_the_promoted_block() {
    let mut session = loaded(&[("a", "one"), ("b", "<b>Angle</b> two")]);
    session.select(&BlockId::from("a"));
    let b = BlockId::from("b");

    session.handle_block_key(&b, BlockKey::ShiftTab);

    assert_eq!(session.selected(), Some(&b));
}

#[test]
fn shift_enter_has_no_structural_effect() {
    let mut session = loaded(&[("a", "one")]);
    let effect = session.handle_block_key(&BlockId::from("a"), BlockKey::ShiftEnter);
    assert!(matches!(effect, CommandEffect::Ignored));
    assert_eq!(session.blocks().len(), 1);
    assert!(session.selected().is_none());
}

#[test]
fn shift_tab_promotes_and_shift_backspace_deletes() {
    let mut session = loaded(&[("a", "<strong>Hook</strong> line"), ("b", "two")]);
    let a = BlockId::from("a");

    let effect = session.handle_block_key(&a, BlockKey::ShiftTab);
    assert!(matches!(
        effect,
        CommandEffect::Promoted(PromoteOutcome::Promoted { .. })
    ));
    assert_eq!(session.blocks()[0].content, "Hook");
    assert_eq!(session.blocks()[1].kind, BlockType::Subblock);

    let b = BlockId::from("b");
    let effect = session.handle_block_key(&b, BlockKey::ShiftBackspace);
    let CommandEffect::Deleted(DeleteOutcome::Removed { selected }) = effect else {
        panic!("expected delete");
    };
    assert_eq!(selected, a);
    assert_eq!(session.selected(), Some(&a));
}

#[test]
fn shift_arrow_right_selects_block_and_opens_panel() {
    let mut session = loaded(&[("a", "one"), ("b", "two")]);
    let b = BlockId::from("b");

    let effect = session.handle_block_key(&b, BlockKey::ShiftArrowRight);

    assert!(matches!(effect, CommandEffect::PanelOpened { mount: 1 }));
    assert_eq!(session.selected(), Some(&b));
    assert!(session.panel().open);

    let effect = session.handle_block_key(&BlockId::from("ghost"), BlockKey::ShiftArrowRight);
    assert!(matches!(effect, CommandEffect::Ignored));
}

#[test]
fn panel_shift_arrow_right_hands_off_to_a_new_block() {
    let mut session = loaded(&[("a", "one")]);
    let a = BlockId::from("a");
    session.handle_block_key(&a, BlockKey::ShiftArrowRight);
    session.edit_details("context", Instant::now());

    let CommandEffect::FocusBlock(created) = session.handle_panel_key(PanelKey::ShiftArrowRight)
    else {
        panic!("expected focus on new block");
    };

    assert_eq!(session.block_details(&a), "context");
    assert!(!session.panel().open);
    assert_eq!(session.selected(), Some(&created));
    assert_eq!(ids(&session), vec!["a".to_string(), created.as_str().to_string()]);
}

#[test]
fn panel_shift_arrow_left_returns_focus() {
    let mut session = loaded(&[("a", "one")]);
    let a = BlockId::from("a");
    session.handle_block_key(&a, BlockKey::ShiftArrowRight);

    let effect = session.handle_panel_key(PanelKey::ShiftArrowLeft);

    assert!(matches!(effect, CommandEffect::FocusBlock(id) if id == a));
    assert!(session.panel().open);
}

#[test]
fn enter_while_panel_open_remounts_it() {
    let mut session = loaded(&[("a", "one")]);
    let a = BlockId::from("a");
    session.handle_block_key(&a, BlockKey::ShiftArrowRight);
    let before = session.panel().mount;

    session.handle_block_key(&a, BlockKey::Enter);

    assert!(session.panel().open);
    assert!(session.panel().mount > before);
}

#[test]
fn tab_starts_a_completion_that_resolves_in_place() {
    let mut session = loaded(&[("a", "Intro"), ("b", "Then we ")]);
    let b = BlockId::from("b");

    let CommandEffect::CompletionStarted(ticket) =
        session.handle_block_key(&b, BlockKey::Tab { cursor: 8 })
    else {
        panic!("expected completion");
    };
    assert_eq!(ticket.request.previous_content, "Intro");
    assert_eq!(session.blocks()[1].content, "Then we  Generating...");

    let outcome = session.finish_completion(
        &ticket,
        Ok(CompletionResponse {
            completion: "won.".to_string(),
        }),
    );
    assert!(matches!(outcome, CompletionOutcome::Applied { .. }));
    assert_eq!(session.blocks()[1].content, "Then we won. ");
}

#[test]
fn synchronous_complete_uses_provider() {
    let mut session = loaded(&[("a", "Hello ")]);
    let outcome = session.complete(&BlockId::from("a"), 6, &Fixed("Hello world."));
    assert_eq!(
        outcome,
        CompletionOutcome::Applied {
            inserted: "world.".to_string()
        }
    );
}

#[test]
fn deleting_a_block_cancels_its_pending_completion() {
    let mut session = loaded(&[("a", "keep"), ("b", "doomed")]);
    let b = BlockId::from("b");
    let ticket = session.begin_completion(&b, 6).unwrap();

    session.delete_block(&b);

    assert!(ticket.cancel.is_cancelled());
    let outcome = session.finish_completion(&ticket, Err(CompletionError::Cancelled));
    assert_eq!(outcome, CompletionOutcome::Superseded);
}

#[test]
fn strip_color_and_content_updates_go_through_the_store() {
    let mut session = loaded(&[("a", "one")]);
    let a = BlockId::from("a");

    assert!(session.set_strip_color(&a, StripColor::Purple));
    assert!(session.set_content(&a, "changed"));
    assert!(!session.set_content(&BlockId::from("ghost"), "lost"));

    let block = &session.blocks()[0];
    assert_eq!(block.strip_color, Some(StripColor::Purple));
    assert_eq!(block.content, "changed");
}

#[test]
fn outline_lists_headings_and_navigates() {
    let mut session = loaded(&[
        ("h1", "<h1>Title</h1>"),
        ("p", "<p>body</p>"),
        ("h2", "<h2 class=\"x\">Sub <em>part</em></h2>"),
        ("h3", "<h3>too deep</h3>"),
    ]);

    let outline = session.outline();

    assert_eq!(outline.len(), 2);
    assert_eq!(outline[0].level, 1);
    assert_eq!(outline[0].text, "Title");
    assert_eq!(outline[1].level, 2);
    assert_eq!(outline[1].text, "Sub part");

    assert!(session.navigate_outline(&outline[1].block_id));
    assert_eq!(session.selected(), Some(&BlockId::from("h2")));
    assert!(!session.navigate_outline(&BlockId::from("ghost")));
}

#[test]
fn set_blocks_repairs_dangling_selection() {
    let mut session = loaded(&[("a", "one")]);
    session.select(&BlockId::from("a"));

    session.set_blocks(vec![Block::with_id(BlockId::from("z"), BlockType::Text, "new")]);

    assert_eq!(session.selected(), Some(&BlockId::from("z")));
}
