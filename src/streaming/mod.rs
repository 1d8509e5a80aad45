//! Stream normalization — adapts one-shot replies and incremental fragment
//! streams into a single lazy sequence of text fragments.

use futures::stream::{self, BoxStream, StreamExt};

use crate::agents::{AgentOutput, Fragment};
use crate::conversation::ContentPart;

/// A single malformed fragment or content part. Recovered locally: the
/// offending item is skipped and the rest of the sequence continues.
#[derive(Debug, thiserror::Error)]
pub enum NormalizationError {
    #[error("content part carries no text field")]
    TextlessPart,
}

/// Extract the text of a content part, if it carries any.
pub fn part_text(part: &ContentPart) -> Result<&str, NormalizationError> {
    match part {
        ContentPart::Text(text) => Ok(text),
        ContentPart::Json(value) => value
            .get("text")
            .and_then(|v| v.as_str())
            .ok_or(NormalizationError::TextlessPart),
    }
}

/// Extract the text of a reply fragment, whatever its shape.
pub fn fragment_text(fragment: &Fragment) -> Result<String, NormalizationError> {
    match fragment {
        Fragment::Text(text) => Ok(text.clone()),
        Fragment::Part(part) => part_text(part).map(str::to_string),
    }
}

/// Adapt an agent output into one uniform lazy sequence of text fragments.
///
/// The sequence is finite and not restartable. `Complete` outputs yield
/// each content-part's text in message order; `Stream` outputs pass
/// fragments through in production order. Items in neither text-bearing
/// shape are skipped with a warning, never fatal to the whole sequence.
pub fn normalize(output: AgentOutput) -> BoxStream<'static, String> {
    match output {
        AgentOutput::Complete(message) => stream::iter(
            message
                .content
                .into_iter()
                .filter_map(|part| match part_text(&part) {
                    Ok(text) => Some(text.to_string()),
                    Err(err) => {
                        tracing::warn!("skipping content part: {err}");
                        None
                    }
                }),
        )
        .boxed(),
        AgentOutput::Stream(fragments) => fragments
            .filter_map(|fragment| async move {
                match fragment_text(&fragment) {
                    Ok(text) => Some(text),
                    Err(err) => {
                        tracing::warn!("skipping malformed fragment: {err}");
                        None
                    }
                }
            })
            .boxed(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::{ConversationMessage, Role};
    use serde_json::json;

    fn complete(parts: Vec<ContentPart>) -> AgentOutput {
        AgentOutput::Complete(ConversationMessage {
            role: Role::Assistant,
            content: parts,
        })
    }

    #[tokio::test]
    async fn complete_yields_each_part_in_order_then_ends() {
        let output = complete(vec![ContentPart::text("a"), ContentPart::text("b")]);

        let fragments: Vec<String> = normalize(output).collect().await;
        assert_eq!(fragments, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn complete_skips_textless_parts() {
        let output = complete(vec![
            ContentPart::text("a"),
            ContentPart::Json(json!({"tool_use": {}})),
            ContentPart::Json(json!({"text": "b"})),
        ]);

        let fragments: Vec<String> = normalize(output).collect().await;
        assert_eq!(fragments, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn stream_passes_fragments_through_in_order() {
        let output = AgentOutput::Stream(
            stream::iter(vec![
                Fragment::Text("Hi".to_string()),
                Fragment::Text(" there".to_string()),
            ])
            .boxed(),
        );

        let fragments: Vec<String> = normalize(output).collect().await;
        assert_eq!(fragments, vec!["Hi", " there"]);
    }

    #[tokio::test]
    async fn malformed_fragment_is_skipped_without_ending_the_stream() {
        let output = AgentOutput::Stream(
            stream::iter(vec![
                Fragment::Text("Hi".to_string()),
                Fragment::Part(ContentPart::Json(json!({}))),
                Fragment::Part(ContentPart::Json(json!({"text": " there"}))),
            ])
            .boxed(),
        );

        let fragments: Vec<String> = normalize(output).collect().await;
        assert_eq!(fragments, vec!["Hi", " there"]);
    }

    #[test]
    fn part_text_rejects_textless_json() {
        let err = part_text(&ContentPart::Json(json!({"image": "…"}))).unwrap_err();
        assert!(matches!(err, NormalizationError::TextlessPart));
    }

    #[test]
    fn fragment_text_reads_both_shapes() {
        assert_eq!(
            fragment_text(&Fragment::Text("raw".to_string())).unwrap(),
            "raw"
        );
        assert_eq!(
            fragment_text(&Fragment::Part(ContentPart::Json(json!({"text": "x"})))).unwrap(),
            "x"
        );
    }
}
