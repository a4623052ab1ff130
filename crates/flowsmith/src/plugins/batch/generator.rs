//! Batch request generation
//!
//! Each transition line the diagram parser accepts becomes one request asking
//! a chat model to expand that line into FSM JSON, guided by the canonical
//! sample document for the line's action type. Request ids count accepted
//! lines only, starting at 1.

use std::io::Write;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, span, Level};

use crate::core::{ActionKind, BatchConfig, WorkflowError};
use crate::plugins::diagram::templates::sample_document;
use crate::plugins::diagram::{DiagramParser, ParsedLine};

pub const SYSTEM_PROMPT: &str = "You are a helpful assistant that converts mermaid state diagram transition line into fsm json config. State diagram line is provided in the following format: current_state --> next_state : transition_name (manual - optional) /action_type [action_details] (update with real data). Use real values from the transition to fill in current state, next state, transition name and so on";

/// One accepted diagram line and the instruction built for it
#[derive(Debug, Clone, PartialEq)]
pub struct BatchRequest {
    pub id: u64,
    pub line: String,
    pub kind: ActionKind,
    pub instruction: String,
}

/// Chat-completion batch line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchEnvelope {
    pub custom_id: String,
    pub method: String,
    pub url: String,
    pub body: ChatBody,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatBody {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub response_format: ResponseFormat,
    pub max_tokens: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseFormat {
    #[serde(rename = "type")]
    pub kind: String,
}

impl BatchRequest {
    pub fn to_envelope(&self, config: &BatchConfig) -> BatchEnvelope {
        BatchEnvelope {
            custom_id: self.id.to_string(),
            method: "POST".to_string(),
            url: config.url.clone(),
            body: ChatBody {
                model: config.model.clone(),
                messages: vec![
                    ChatMessage {
                        role: "system".to_string(),
                        content: SYSTEM_PROMPT.to_string(),
                    },
                    ChatMessage {
                        role: "user".to_string(),
                        content: self.instruction.clone(),
                    },
                ],
                response_format: ResponseFormat {
                    kind: "json_object".to_string(),
                },
                max_tokens: config.max_tokens,
            },
        }
    }
}

/// Builds batch requests from diagram text
pub struct BatchRequestGenerator {
    parser: DiagramParser,
    config: BatchConfig,
}

impl BatchRequestGenerator {
    pub fn new(config: BatchConfig) -> Self {
        Self::with_parser(DiagramParser::new(), config)
    }

    pub fn with_parser(parser: DiagramParser, config: BatchConfig) -> Self {
        Self { parser, config }
    }

    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// One request per accepted transition line, in line order
    pub fn generate(&self, diagram: &str) -> Result<Vec<BatchRequest>, WorkflowError> {
        let batch_span = span!(Level::INFO, "generate_batch", input_len = diagram.len());
        let _enter = batch_span.enter();

        let mut requests = Vec::new();
        for line in diagram.lines() {
            let Ok(ParsedLine::Transition(parsed)) = self.parser.parse_line(line) else {
                continue;
            };
            let id = requests.len() as u64 + 1;
            let line = line.trim().to_string();
            debug!(id, kind = %parsed.kind, "Accepted batch line");
            requests.push(BatchRequest {
                id,
                instruction: instruction(&line, parsed.kind)?,
                line,
                kind: parsed.kind,
            });
        }

        info!(count = requests.len(), "Generated batch requests");
        Ok(requests)
    }

    /// Serialize requests as JSON lines in the batch envelope
    pub fn to_jsonl(&self, requests: &[BatchRequest]) -> Result<String, WorkflowError> {
        let mut out = Vec::new();
        self.write_jsonl(&mut out, requests)?;
        Ok(String::from_utf8_lossy(&out).into_owned())
    }

    pub fn write_jsonl<W: Write>(
        &self,
        mut writer: W,
        requests: &[BatchRequest],
    ) -> Result<(), WorkflowError> {
        for request in requests {
            serde_json::to_writer(&mut writer, &request.to_envelope(&self.config))?;
            writer.write_all(b"\n")?;
        }
        Ok(())
    }
}

impl Default for BatchRequestGenerator {
    fn default() -> Self {
        Self::new(BatchConfig::default())
    }
}

fn instruction(line: &str, kind: ActionKind) -> Result<String, WorkflowError> {
    let sample = serde_json::to_string(&sample_document(kind)?)?;
    Ok(format!(
        "Convert the following state diagram line into JSON following the golden sample format for a '{}' transition:\n{} . Golden json example: {}",
        kind, line, sample
    ))
}
