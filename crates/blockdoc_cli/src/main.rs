//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `blockdoc_core` linkage without any UI host.
//! - Drive a short scripted editing session and print its outline.

use blockdoc_core::{BlockKey, CommandEffect, EditorConfig, EditorSession};

fn main() {
    println!("blockdoc_core ping={}", blockdoc_core::ping());
    println!("blockdoc_core version={}", blockdoc_core::core_version());

    let mut session = EditorSession::new(EditorConfig::default());
    let first = session.blocks()[0].id.clone();
    session.select(&first);
    session.set_content(&first, "<h1>Launch plan</h1>");

    let CommandEffect::BlockCreated(second) = session.handle_block_key(&first, BlockKey::Enter)
    else {
        eprintln!("blockdoc_core demo: new block was not created");
        std::process::exit(1);
    };
    session.set_content(&second, "<h2>Audience</h2>");

    for entry in session.outline() {
        println!("h{} {} ({})", entry.level, entry.text, entry.block_id);
    }
    println!("blocks={}", session.blocks().len());
}
