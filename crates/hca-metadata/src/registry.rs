//! The entity type registry.
//!
//! Maps the schema name of a document (the last path segment of its
//! `describedBy` URL) to the concrete entity kind to construct, and each kind
//! back to its schema name and its category. The mapping is a single table,
//! so adding a variant means adding a row.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeLookupError;

/// The top-level category an entity kind belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Project,
    Biomaterial,
    Process,
    Protocol,
    File,
}

impl Category {
    /// All categories, in bundle construction order.
    pub const ALL: [Category; 5] = [
        Category::Project,
        Category::Biomaterial,
        Category::Process,
        Category::Protocol,
        Category::File,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Project => "project",
            Self::Biomaterial => "biomaterial",
            Self::Process => "process",
            Self::Protocol => "protocol",
            Self::File => "file",
        }
    }

    /// Returns `true` for categories that take part in the link graph.
    pub fn is_linked(self) -> bool {
        !matches!(self, Self::Project)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Macro: defines EntityKind from (variant, schema name, category) rows.
// ---------------------------------------------------------------------------
macro_rules! define_entity_kinds {
    (
        $( ($variant:ident, $schema:literal, $category:ident) ),+ $(,)?
    ) => {
        /// A concrete entity type, one per registered schema name.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum EntityKind {
            $( $variant, )+
        }

        impl EntityKind {
            /// Every registered kind, in registry order.
            pub const ALL: &'static [EntityKind] = &[ $( EntityKind::$variant, )+ ];

            /// The schema name documents of this kind are described by.
            pub fn schema_name(self) -> &'static str {
                match self {
                    $( Self::$variant => $schema, )+
                }
            }

            /// The category this kind belongs to.
            pub fn category(self) -> Category {
                match self {
                    $( Self::$variant => Category::$category, )+
                }
            }

            /// Looks up the kind registered for a schema name.
            pub fn from_schema_name(name: &str) -> Option<Self> {
                match name {
                    $( $schema => Some(Self::$variant), )+
                    _ => None,
                }
            }
        }
    };
}

define_entity_kinds! {
    // Biomaterials
    (DonorOrganism, "donor_organism", Biomaterial),
    (SpecimenFromOrganism, "specimen_from_organism", Biomaterial),
    (CellSuspension, "cell_suspension", Biomaterial),
    (CellLine, "cell_line", Biomaterial),
    (Organoid, "organoid", Biomaterial),
    (ImagedSpecimen, "imaged_specimen", Biomaterial),

    // Files
    (AnalysisFile, "analysis_file", File),
    (ReferenceFile, "reference_file", File),
    (SequenceFile, "sequence_file", File),
    (SupplementaryFile, "supplementary_file", File),
    (ImageFile, "image_file", File),

    // Protocols
    (Protocol, "protocol", Protocol),
    (AnalysisProtocol, "analysis_protocol", Protocol),
    (AggregateGenerationProtocol, "aggregate_generation_protocol", Protocol),
    (CollectionProtocol, "collection_protocol", Protocol),
    (DifferentiationProtocol, "differentiation_protocol", Protocol),
    (DissociationProtocol, "dissociation_protocol", Protocol),
    (EnrichmentProtocol, "enrichment_protocol", Protocol),
    (IpscInductionProtocol, "ipsc_induction_protocol", Protocol),
    (ImagingProtocol, "imaging_protocol", Protocol),
    (LibraryPreparationProtocol, "library_preparation_protocol", Protocol),
    (SequencingProtocol, "sequencing_protocol", Protocol),
    (ImagingPreparationProtocol, "imaging_preparation_protocol", Protocol),

    (Project, "project", Project),

    // Processes
    (Process, "process", Process),
    (AnalysisProcess, "analysis_process", Process),
    (DissociationProcess, "dissociation_process", Process),
    (EnrichmentProcess, "enrichment_process", Process),
    (LibraryPreparationProcess, "library_preparation_process", Process),
    (SequencingProcess, "sequencing_process", Process),
}

impl EntityKind {
    /// Resolves the kind from a full `describedBy` schema URL.
    pub fn from_schema_url(described_by: &str) -> Result<Self, TypeLookupError> {
        let name = described_by.rsplit('/').next().unwrap_or_default();
        Self::from_schema_name(name).ok_or_else(|| TypeLookupError {
            described_by: described_by.to_owned(),
        })
    }

    /// Returns `true` for kinds kept only for old bundles.
    pub fn is_deprecated(self) -> bool {
        matches!(
            self,
            Self::DissociationProcess
                | Self::EnrichmentProcess
                | Self::LibraryPreparationProcess
                | Self::SequencingProcess
        )
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.schema_name())
    }
}

impl Serialize for EntityKind {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.schema_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn schema_names_are_a_bijection() {
        let names: HashSet<&str> = EntityKind::ALL.iter().map(|k| k.schema_name()).collect();
        assert_eq!(names.len(), EntityKind::ALL.len());
        for kind in EntityKind::ALL {
            assert_eq!(EntityKind::from_schema_name(kind.schema_name()), Some(*kind));
        }
    }

    #[test]
    fn lookup_from_schema_url() {
        let url = "https://schema.humancellatlas.org/type/biomaterial/13.1.1/cell_suspension";
        assert_eq!(EntityKind::from_schema_url(url), Ok(EntityKind::CellSuspension));
    }

    #[test]
    fn unknown_schema_url() {
        let url = "https://schema.humancellatlas.org/type/biomaterial/1.0.0/mystery";
        let err = EntityKind::from_schema_url(url).unwrap_err();
        assert_eq!(err.described_by, url);
        assert!(err.to_string().contains("mystery"));
    }

    #[test]
    fn categories() {
        assert_eq!(EntityKind::DonorOrganism.category(), Category::Biomaterial);
        assert_eq!(EntityKind::SequencingProtocol.category(), Category::Protocol);
        assert_eq!(EntityKind::SequenceFile.category(), Category::File);
        assert_eq!(EntityKind::SequencingProcess.category(), Category::Process);
        assert_eq!(EntityKind::Project.category(), Category::Project);
        assert!(!Category::Project.is_linked());
        assert!(Category::File.is_linked());
    }

    #[test]
    fn every_category_has_kinds() {
        for category in Category::ALL {
            assert!(EntityKind::ALL.iter().any(|k| k.category() == category));
        }
    }

    #[test]
    fn deprecated_kinds() {
        assert!(EntityKind::SequencingProcess.is_deprecated());
        assert!(!EntityKind::Process.is_deprecated());
        assert!(!EntityKind::SequencingProtocol.is_deprecated());
    }
}
