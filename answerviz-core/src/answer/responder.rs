use std::time::Duration;

use serde_json::Value;

use crate::answer::backend::ModelBackend;
use crate::extract::json::extract_json;
use crate::foundation::ids::IdSource;
use crate::normalize::report::RepairKind;
use crate::normalize::sanitize::{FALLBACK_TEXT, sanitize, sanitize_text_or, sanitize_with_report};
use crate::scene::model::VisualizationSpec;

#[derive(Clone, Debug)]
pub struct ResponderOpts {
    pub timeout: Duration,
    /// Answer text when the backend fails or returns nothing usable.
    pub fallback_text: String,
}

impl Default for ResponderOpts {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            fallback_text: FALLBACK_TEXT.to_string(),
        }
    }
}

/// A completed question: always carries text and a valid visualization.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Answer {
    pub id: String,
    pub question: String,
    pub text: String,
    pub visualization: VisualizationSpec,
    /// The visualization is the built-in scene rather than something the model described.
    pub degraded: bool,
}

/// Question in, [`Answer`] out, whatever the backend does.
pub struct Responder<B, I> {
    backend: B,
    ids: I,
    opts: ResponderOpts,
}

impl<B, I> Responder<B, I>
where
    B: ModelBackend,
    I: IdSource,
{
    pub fn new(backend: B, ids: I) -> Self {
        Self::with_opts(backend, ids, ResponderOpts::default())
    }

    pub fn with_opts(backend: B, ids: I, opts: ResponderOpts) -> Self {
        Self { backend, ids, opts }
    }

    pub fn opts(&self) -> &ResponderOpts {
        &self.opts
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    #[tracing::instrument(skip(self))]
    pub fn ask(&mut self, question: &str) -> Answer {
        let id = self.ids.next_id();
        let question = question.trim().to_string();

        let raw = match self.backend.complete(&question, self.opts.timeout) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(
                    answer_id = %id,
                    error = %e,
                    "model unavailable; answering with fallback"
                );
                return Answer {
                    id,
                    question,
                    text: self.opts.fallback_text.clone(),
                    visualization: sanitize(&Value::Null),
                    degraded: true,
                };
            }
        };

        let Some(candidate) = extract_json(&raw).filter(Value::is_object) else {
            tracing::warn!(
                answer_id = %id,
                "no structured data in model output; using default scene"
            );
            let trimmed = raw.trim();
            let text = if trimmed.is_empty() {
                self.opts.fallback_text.clone()
            } else {
                trimmed.to_string()
            };
            return Answer {
                id,
                question,
                text,
                visualization: sanitize(&Value::Null),
                degraded: true,
            };
        };

        let (visualization, report) = sanitize_with_report(&candidate);
        let degraded = report
            .iter()
            .any(|r| matches!(r.kind, RepairKind::FallbackScene));
        if degraded {
            tracing::warn!(
                answer_id = %id,
                "model described no usable layers; using default scene"
            );
        }
        let text = sanitize_text_or(&candidate, &self.opts.fallback_text);

        Answer {
            id,
            question,
            text,
            visualization,
            degraded,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/answer/responder.rs"]
mod tests;
