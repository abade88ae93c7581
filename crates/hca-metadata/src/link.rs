//! Link records and the rules for connecting entities.
//!
//! Two historical link formats exist. The v5 format states each edge
//! directly:
//!
//! ```json
//! {"source_id": "…", "source_type": "biomaterial", "destination_id": "…", "destination_type": "process"}
//! ```
//!
//! The newer format describes one process with its inputs, outputs and
//! protocols, and expands into one edge per input, output and protocol.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::registry::Category;

/// A directed edge between two entities, as declared by a bundle.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Link {
    pub source_id: Uuid,
    pub source_type: String,
    pub destination_id: Uuid,
    pub destination_type: String,
}

#[derive(Deserialize)]
struct ProtocolRef {
    protocol_id: Uuid,
    #[serde(default)]
    protocol_type: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LinkRecord {
    Edge(Link),
    Process {
        process: Uuid,
        #[serde(default)]
        inputs: Vec<Uuid>,
        #[serde(default)]
        input_type: String,
        #[serde(default)]
        outputs: Vec<Uuid>,
        #[serde(default)]
        output_type: String,
        #[serde(default)]
        protocols: Vec<ProtocolRef>,
    },
}

impl Link {
    /// Expands one link record of either format into its edges.
    ///
    /// Process records yield inputs first, then outputs, then protocols.
    pub fn from_json(record: &Value) -> Result<Vec<Link>, serde_json::Error> {
        let links = match LinkRecord::deserialize(record)? {
            LinkRecord::Edge(link) => vec![link],
            LinkRecord::Process {
                process,
                inputs,
                input_type,
                outputs,
                output_type,
                protocols,
            } => {
                let mut links = Vec::with_capacity(inputs.len() + outputs.len() + protocols.len());
                links.extend(inputs.into_iter().map(|input| Link {
                    source_id: input,
                    source_type: input_type.clone(),
                    destination_id: process,
                    destination_type: "process".to_owned(),
                }));
                links.extend(outputs.into_iter().map(|output| Link {
                    source_id: process,
                    source_type: "process".to_owned(),
                    destination_id: output,
                    destination_type: output_type.clone(),
                }));
                links.extend(protocols.into_iter().map(|protocol| Link {
                    source_id: process,
                    source_type: "process".to_owned(),
                    destination_id: protocol.protocol_id,
                    destination_type: protocol.protocol_type,
                }));
                links
            }
        };
        Ok(links)
    }
}

/// The direction of a connection, seen from the entity being connected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// The entity references the other one (the other is a child).
    Forward,
    /// The entity is referenced by the other one (the other is a parent).
    Backward,
}

impl Direction {
    /// Verb phrase used in link diagnostics.
    pub fn verb(self) -> &'static str {
        match self {
            Self::Forward => "reference",
            Self::Backward => "be referenced by",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Forward => "forward",
            Self::Backward => "backward",
        })
    }
}

/// The typed association a legal connection is recorded in, in addition to
/// the generic parents/children maps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Slot {
    FromProcesses,
    ToProcesses,
    InputBiomaterials,
    OutputBiomaterials,
    InputFiles,
    OutputFiles,
    Protocols,
    /// Legal, but with no typed back reference.
    Untyped,
}

/// Legal `(entity, other, direction)` combinations.
const TRANSITIONS: &[(Category, Category, Direction, Slot)] = &[
    (Category::Biomaterial, Category::Process, Direction::Forward, Slot::ToProcesses),
    (Category::Biomaterial, Category::Process, Direction::Backward, Slot::FromProcesses),
    (Category::Process, Category::Biomaterial, Direction::Forward, Slot::OutputBiomaterials),
    (Category::Process, Category::Biomaterial, Direction::Backward, Slot::InputBiomaterials),
    (Category::Process, Category::File, Direction::Forward, Slot::OutputFiles),
    (Category::Process, Category::File, Direction::Backward, Slot::InputFiles),
    (Category::Process, Category::Protocol, Direction::Forward, Slot::Protocols),
    (Category::Protocol, Category::Process, Direction::Backward, Slot::Untyped),
    (Category::File, Category::Process, Direction::Forward, Slot::ToProcesses),
    (Category::File, Category::Process, Direction::Backward, Slot::FromProcesses),
];

/// Returns the slot for a connection, or `None` if it is not allowed.
pub(crate) fn transition(entity: Category, other: Category, direction: Direction) -> Option<Slot> {
    TRANSITIONS
        .iter()
        .find(|(e, o, d, _)| *e == entity && *o == other && *d == direction)
        .map(|(_, _, _, slot)| *slot)
}
