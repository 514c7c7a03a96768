//! Style profile use-case service.
//!
//! # Responsibility
//! - Normalize style input before it reaches the repository.
//! - Keep callers storage-agnostic.

use crate::model::style::StyleProfile;
use crate::repo::document_repo::RepoResult;
use crate::repo::style_repo::StyleRepository;

pub struct StyleService<R: StyleRepository> {
    repo: R,
}

impl<R: StyleRepository> StyleService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates a profile for `style.user_id` and returns the stored record.
    pub fn create_style(&self, mut style: StyleProfile) -> RepoResult<StyleProfile> {
        normalize(&mut style);
        let id = self.repo.create_style(&style)?;
        style.id = id;
        Ok(style)
    }

    /// Full replacement of an existing profile's editable fields.
    pub fn update_style(&self, mut style: StyleProfile) -> RepoResult<StyleProfile> {
        normalize(&mut style);
        self.repo.update_style(&style)?;
        Ok(style)
    }

    pub fn delete_style(&self, style_id: &str) -> RepoResult<()> {
        self.repo.delete_style(style_id)
    }

    pub fn get_style(&self, style_id: &str) -> RepoResult<Option<StyleProfile>> {
        self.repo.get_style(style_id)
    }

    pub fn list_styles(&self, user_id: &str) -> RepoResult<Vec<StyleProfile>> {
        self.repo.list_styles(user_id)
    }
}

fn normalize(style: &mut StyleProfile) {
    style.name = style.name.trim().to_string();
    style.user_id = style.user_id.trim().to_string();
}
