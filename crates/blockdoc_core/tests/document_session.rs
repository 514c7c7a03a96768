use blockdoc_core::db::open_db_in_memory;
use blockdoc_core::{
    Block, BlockId, BlockType, DocumentRecord, DocumentRepository, DocumentSession,
    DocumentSummary, EditorConfig, RepoError, RepoResult, SaveOutcome, SqliteDocumentRepository,
    StripColor, DEFAULT_DOCUMENT_TITLE,
};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// In-memory collaborator that counts writes and can be told to fail.
#[derive(Default)]
struct MemoryRepo {
    records: RefCell<HashMap<String, DocumentRecord>>,
    owners: RefCell<HashMap<String, String>>,
    saves: Cell<u32>,
    fail_saves: Cell<bool>,
}

impl DocumentRepository for MemoryRepo {
    fn load(&self, document_id: &str) -> RepoResult<Option<DocumentRecord>> {
        Ok(self.records.borrow().get(document_id).cloned())
    }

    fn save(&self, document_id: &str, record: &DocumentRecord) -> RepoResult<()> {
        if self.fail_saves.get() {
            return Err(RepoError::Validation("backend offline".to_string()));
        }
        self.saves.set(self.saves.get() + 1);
        self.records
            .borrow_mut()
            .insert(document_id.to_string(), record.clone());
        Ok(())
    }

    fn create_document(&self, user_id: &str) -> RepoResult<String> {
        let document_id = format!("mem-{}", self.records.borrow().len() + 1);
        self.owners
            .borrow_mut()
            .insert(document_id.clone(), user_id.to_string());
        self.records
            .borrow_mut()
            .insert(document_id.clone(), DocumentRecord::default());
        Ok(document_id)
    }

    fn list_documents(&self, user_id: &str) -> RepoResult<Vec<DocumentSummary>> {
        let owners = self.owners.borrow();
        let mut summaries: Vec<DocumentSummary> = self
            .records
            .borrow()
            .iter()
            .filter(|(id, record)| {
                owners.get(*id).map(String::as_str) == Some(user_id) && record.has_user_data()
            })
            .map(|(id, record)| DocumentSummary {
                document_id: id.clone(),
                title: record.title.clone(),
                updated_at: record.updated_at.unwrap_or_default(),
            })
            .collect();
        summaries.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(summaries)
    }
}

#[test]
fn unknown_document_opens_blank() {
    let repo = MemoryRepo::default();
    let session = DocumentSession::open(&repo, "doc-1", EditorConfig::default()).unwrap();

    assert_eq!(session.title(), DEFAULT_DOCUMENT_TITLE);
    assert_eq!(session.editor().blocks().len(), 1);
    assert_eq!(session.document_id(), "doc-1");
}

#[test]
fn untouched_document_is_not_saved() {
    let repo = MemoryRepo::default();
    let mut session = DocumentSession::open(&repo, "doc-1", EditorConfig::default()).unwrap();

    assert_eq!(session.flush(), SaveOutcome::Skipped);
    assert_eq!(repo.saves.get(), 0);
}

#[test]
fn title_change_saves_after_the_delay() {
    let repo = MemoryRepo::default();
    let mut session = DocumentSession::open(&repo, "doc-1", EditorConfig::default()).unwrap();
    let t0 = Instant::now();

    session.set_title("Launch copy", t0);
    assert!(session.save_pending());
    assert_eq!(session.tick(t0 + Duration::from_millis(999)), None);
    assert_eq!(repo.saves.get(), 0);

    assert_eq!(
        session.tick(t0 + Duration::from_millis(1000)),
        Some(SaveOutcome::Saved)
    );
    assert!(!session.save_pending());
    assert_eq!(session.tick(t0 + Duration::from_millis(5000)), None);
    assert_eq!(repo.saves.get(), 1);

    let stored = repo.load("doc-1").unwrap().unwrap();
    assert_eq!(stored.title, "Launch copy");
    assert!(stored.updated_at.is_some());
}

#[test]
fn rapid_title_edits_coalesce_into_one_save() {
    let repo = MemoryRepo::default();
    let mut session = DocumentSession::open(&repo, "doc-1", EditorConfig::default()).unwrap();
    let t0 = Instant::now();

    session.set_title("L", t0);
    session.set_title("La", t0 + Duration::from_millis(600));
    assert_eq!(session.tick(t0 + Duration::from_millis(1200)), None);
    assert_eq!(
        session.tick(t0 + Duration::from_millis(1600)),
        Some(SaveOutcome::Saved)
    );
    assert_eq!(repo.saves.get(), 1);
}

#[test]
fn flush_commits_pending_details_and_saves() {
    let repo = MemoryRepo::default();
    let mut session = DocumentSession::open(&repo, "doc-1", EditorConfig::default()).unwrap();
    let id = session.editor().blocks()[0].id.clone();
    session.editor_mut().select(&id);
    session.editor_mut().edit_details("remember this", Instant::now());

    assert_eq!(session.flush(), SaveOutcome::Saved);

    let stored = repo.load("doc-1").unwrap().unwrap();
    assert_eq!(stored.blocks[0].details.as_deref(), Some("remember this"));
}

#[test]
fn failed_save_keeps_edits_in_memory() {
    let repo = MemoryRepo::default();
    repo.fail_saves.set(true);
    let mut session = DocumentSession::open(&repo, "doc-1", EditorConfig::default()).unwrap();
    let id = session.editor().blocks()[0].id.clone();
    session.editor_mut().set_content(&id, "unsaved words");

    assert_eq!(session.flush(), SaveOutcome::Failed);
    assert_eq!(session.editor().blocks()[0].content, "unsaved words");
    assert!(!session.save_pending());

    repo.fail_saves.set(false);
    assert_eq!(session.flush(), SaveOutcome::Saved);
}

#[test]
fn sqlite_repository_round_trips_documents() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteDocumentRepository::try_new(&conn).unwrap();

    let variation = Block::with_id(BlockId::from("v"), BlockType::Variation, "Hook");
    let mut sub = Block::subblock(BlockId::from("v"), "body");
    sub.details = Some("why".to_string());
    sub.strip_color = Some(StripColor::Yellow);
    let mut record = DocumentRecord::new("Draft", vec![variation, sub.clone()]);
    record.updated_at = Some(1_700_000_000_000);

    repo.save("doc-1", &record).unwrap();
    let loaded = repo.load("doc-1").unwrap().unwrap();
    assert_eq!(loaded, record);

    record.title = "Renamed".to_string();
    record.blocks.truncate(1);
    repo.save("doc-1", &record).unwrap();
    let reloaded = repo.load("doc-1").unwrap().unwrap();
    assert_eq!(reloaded.title, "Renamed");
    assert_eq!(reloaded.blocks.len(), 1);

    assert!(repo.load("missing").unwrap().is_none());
}

#[test]
fn sqlite_repository_backs_a_session() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteDocumentRepository::try_new(&conn).unwrap();
    let t0 = Instant::now();

    {
        let mut session = DocumentSession::open(&repo, "doc-1", EditorConfig::default()).unwrap();
        session.set_title("Persisted", t0);
        let id = session.editor().blocks()[0].id.clone();
        session.editor_mut().set_content(&id, "<h1>Kept</h1>");
        assert_eq!(session.flush(), SaveOutcome::Saved);
    }

    let reopened = DocumentSession::open(&repo, "doc-1", EditorConfig::default()).unwrap();
    assert_eq!(reopened.title(), "Persisted");
    assert_eq!(reopened.editor().outline()[0].text, "Kept");
}

#[test]
fn sqlite_repository_rejects_blank_ids_and_corrupt_rows() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteDocumentRepository::try_new(&conn).unwrap();

    let err = repo.save("  ", &DocumentRecord::default()).unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));

    conn.execute(
        "INSERT INTO documents (document_id, title, blocks_json, updated_at)
         VALUES ('bad', 't', '[{\"id\":\"x\",\"content\":\"\",\"type\":\"text\",\"parentId\":\"p\"}]', 0);",
        [],
    )
    .unwrap();
    assert!(matches!(
        repo.load("bad").unwrap_err(),
        RepoError::InvalidData(_)
    ));

    conn.execute(
        "INSERT INTO documents (document_id, title, blocks_json, updated_at)
         VALUES ('garbled', 't', 'not json', 0);",
        [],
    )
    .unwrap();
    assert!(matches!(
        repo.load("garbled").unwrap_err(),
        RepoError::Serialization(_)
    ));
}

#[test]
fn repository_requires_migrated_connection() {
    let conn = rusqlite::Connection::open_in_memory().unwrap();
    let err = SqliteDocumentRepository::try_new(&conn).err().unwrap();
    assert!(matches!(err, RepoError::UninitializedConnection { .. }));
}

fn titles(summaries: &[DocumentSummary]) -> Vec<&str> {
    summaries.iter().map(|summary| summary.title.as_str()).collect()
}

#[test]
fn created_document_is_blank_and_hidden_from_the_list() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteDocumentRepository::try_new(&conn).unwrap();

    let id = repo.create_document("u1").unwrap();
    let record = repo.load(&id).unwrap().unwrap();

    assert_eq!(record.title, DEFAULT_DOCUMENT_TITLE);
    assert_eq!(record.blocks.len(), 1);
    assert_eq!(record.blocks[0].kind, BlockType::Text);
    assert!(record.blocks[0].content.is_empty());
    assert!(record.updated_at.is_some());
    assert!(repo.list_documents("u1").unwrap().is_empty());
}

#[test]
fn document_list_is_scoped_to_owner_and_newest_first() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteDocumentRepository::try_new(&conn).unwrap();

    let older = repo.create_document("u1").unwrap();
    let newer = repo.create_document("u1").unwrap();
    let foreign = repo.create_document("u2").unwrap();
    let untouched = repo.create_document("u1").unwrap();

    let mut record = DocumentRecord::new("Older", vec![Block::empty_text()]);
    record.updated_at = Some(1_000);
    repo.save(&older, &record).unwrap();
    record.title = "Newer".to_string();
    record.updated_at = Some(2_000);
    repo.save(&newer, &record).unwrap();
    record.title = "Theirs".to_string();
    record.updated_at = Some(3_000);
    repo.save(&foreign, &record).unwrap();
    repo.save("orphan", &record).unwrap();

    let listed = repo.list_documents("u1").unwrap();
    assert_eq!(titles(&listed), vec!["Newer", "Older"]);
    assert_eq!(listed[0].document_id, newer);
    assert_eq!(listed[0].updated_at, 2_000);
    assert!(listed.iter().all(|summary| summary.document_id != untouched));

    assert_eq!(titles(&repo.list_documents("u2").unwrap()), vec!["Theirs"]);
    assert!(repo.list_documents("nobody").unwrap().is_empty());
}

#[test]
fn blocks_alone_make_a_document_listable() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteDocumentRepository::try_new(&conn).unwrap();
    let id = repo.create_document("u1").unwrap();

    let mut record = repo.load(&id).unwrap().unwrap();
    record.blocks[0].details = Some("note only".to_string());
    repo.save(&id, &record).unwrap();

    let listed = repo.list_documents("u1").unwrap();
    assert_eq!(titles(&listed), vec![DEFAULT_DOCUMENT_TITLE]);
}

#[test]
fn blank_owner_cannot_create_documents() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteDocumentRepository::try_new(&conn).unwrap();

    assert!(matches!(
        repo.create_document("  "),
        Err(RepoError::Validation(_))
    ));
}

#[test]
fn created_document_shows_up_after_a_session_saves_it() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteDocumentRepository::try_new(&conn).unwrap();
    let id = repo.create_document("u1").unwrap();

    let mut session = DocumentSession::open(&repo, &id, EditorConfig::default()).unwrap();
    session.set_title("Campaign", Instant::now());
    assert_eq!(session.flush(), SaveOutcome::Saved);

    let listed = repo.list_documents("u1").unwrap();
    assert_eq!(titles(&listed), vec!["Campaign"]);
    assert_eq!(listed[0].document_id, id);
}

#[test]
fn memory_collaborator_honours_the_list_contract() {
    let repo = MemoryRepo::default();
    let id = repo.create_document("u1").unwrap();
    assert!(repo.list_documents("u1").unwrap().is_empty());

    let mut session = DocumentSession::open(&repo, &id, EditorConfig::default()).unwrap();
    session.set_title("Notes", Instant::now());
    session.flush();

    assert_eq!(titles(&repo.list_documents("u1").unwrap()), vec!["Notes"]);
}
