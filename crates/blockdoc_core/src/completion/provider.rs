//! Model-backed completion provider.
//!
//! Resolves the request's style profile, builds the prompt, calls the text
//! model and shapes the output down to one sentence.

use crate::completion::prompt::{build_prompt, single_sentence};
use crate::completion::{
    CancelToken, CompletionError, CompletionProvider, CompletionRequest, CompletionResponse,
};
use crate::config::GenerationConfig;
use crate::model::style::StyleProfile;
use log::{debug, warn};

/// Generative text model boundary.
pub trait TextModel {
    fn generate(&self, prompt: &str, config: &GenerationConfig) -> Result<String, String>;
}

/// Style profile lookup by id.
pub trait StyleLookup {
    fn find_style(&self, style_id: &str) -> Option<StyleProfile>;
}

/// Lookup that never resolves; every request uses the default profile.
pub struct NoStyles;

impl StyleLookup for NoStyles {
    fn find_style(&self, _style_id: &str) -> Option<StyleProfile> {
        None
    }
}

pub struct ModelCompletionProvider<M: TextModel, S: StyleLookup> {
    model: M,
    styles: S,
    config: GenerationConfig,
}

impl<M: TextModel, S: StyleLookup> ModelCompletionProvider<M, S> {
    pub fn new(model: M, styles: S, config: GenerationConfig) -> Self {
        Self {
            model,
            styles,
            config,
        }
    }

    fn resolve_style(&self, style_id: Option<&str>) -> StyleProfile {
        let Some(style_id) = style_id else {
            return StyleProfile::default();
        };
        match self.styles.find_style(style_id) {
            Some(style) => style,
            None => {
                debug!("event=style_resolve module=completion status=skip reason=not_found style_id={style_id}");
                StyleProfile::default()
            }
        }
    }
}

impl<M: TextModel, S: StyleLookup> CompletionProvider for ModelCompletionProvider<M, S> {
    fn complete(
        &self,
        request: &CompletionRequest,
        cancel: &CancelToken,
    ) -> Result<CompletionResponse, CompletionError> {
        if cancel.is_cancelled() {
            return Err(CompletionError::Cancelled);
        }

        let style = self.resolve_style(request.style_id.as_deref());
        let prompt = build_prompt(
            &style,
            &request.previous_content,
            &request.current_content,
            self.config.training_prefix_chars,
        );

        let raw = self.model.generate(&prompt, &self.config).map_err(|err| {
            warn!("event=model_generate module=completion status=error error={err}");
            CompletionError::Provider(err)
        })?;

        if cancel.is_cancelled() {
            return Err(CompletionError::Cancelled);
        }

        Ok(CompletionResponse {
            completion: single_sentence(&raw),
        })
    }
}
