//! Typed metadata entities.
//!
//! Every document in a bundle becomes one [`Entity`]: the raw JSON it was
//! built from, its document id, the schema version it was written against,
//! and an [`EntityBody`] with the typed fields of its category. Linked
//! entities (biomaterials, processes, protocols and files) additionally
//! record the ids of the entities they are connected to; the [`Bundle`]
//! owns the entities themselves.
//!
//! [`Bundle`]: crate::Bundle

use hca_lookup::{PropertyResolver, SchemaVersion, content, document_version};
use indexmap::{IndexMap, IndexSet};
use serde::Serialize;
use serde_json::Value;
use tracing::warn;
use uuid::Uuid;

use crate::age::{AgeError, AgeRange};
use crate::bundle::DeprecationPolicy;
use crate::error::{EntityError, LinkError};
use crate::fields::Fields;
use crate::link::{Direction, Slot, transition};
use crate::manifest::ManifestEntry;
use crate::registry::{Category, EntityKind};

/// Ids of connected entities, with the kind of each.
pub type Connections = IndexMap<Uuid, EntityKind>;

/// Formats the diagnostic address `<schema-name>@<document_id>`.
pub fn address(kind: EntityKind, document_id: Uuid) -> String {
    format!("{}@{}", kind.schema_name(), document_id)
}

/// A single metadata document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Entity {
    document_id: Uuid,
    kind: EntityKind,
    version: Option<SchemaVersion>,
    #[serde(skip)]
    json: Value,
    #[serde(flatten)]
    body: EntityBody,
}

/// The typed fields of an entity, by category.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "category", rename_all = "snake_case")]
pub enum EntityBody {
    Project(Project),
    Biomaterial(Biomaterial),
    Process(Process),
    Protocol(Protocol),
    File(File),
}

/// The generic parent and child connections of a linked entity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Associations {
    pub parents: Connections,
    pub children: Connections,
}

impl Entity {
    /// Builds an entity with the default resolver, warning on deprecated
    /// schemas.
    ///
    /// `json` may be wrapped in an envelope with a `content` sub-object.
    /// `manifest` is only consulted for files.
    pub fn from_json(json: &Value, manifest: &IndexMap<String, ManifestEntry>) -> Result<Self, EntityError> {
        Self::from_json_with(json, manifest, &PropertyResolver::default(), DeprecationPolicy::default())
    }

    pub fn from_json_with(
        json: &Value,
        manifest: &IndexMap<String, ManifestEntry>,
        resolver: &PropertyResolver,
        deprecation: DeprecationPolicy,
    ) -> Result<Self, EntityError> {
        let body = content(json);
        let described_by = body
            .get("describedBy")
            .and_then(Value::as_str)
            .ok_or(EntityError::MissingSchema)?;
        let kind = EntityKind::from_schema_url(described_by)?;
        let document_id = document_id(json)?;
        let version = document_version(json);
        let address = address(kind, document_id);

        if kind.is_deprecated() {
            match deprecation {
                DeprecationPolicy::Warn => {
                    warn!(entity = %address, schema = kind.schema_name(), "entity uses a deprecated schema")
                }
                DeprecationPolicy::Ignore => {}
                DeprecationPolicy::Error => return Err(EntityError::Deprecated(address)),
            }
        }

        let fields = Fields::new(resolver, body, version, &address);
        let body = match kind.category() {
            Category::Project => EntityBody::Project(Project::from_fields(&fields)?),
            Category::Biomaterial => EntityBody::Biomaterial(Biomaterial::from_fields(kind, &fields)?),
            Category::Process => EntityBody::Process(Process::from_fields(kind, &fields)?),
            Category::Protocol => EntityBody::Protocol(Protocol::from_fields(kind, &fields)?),
            Category::File => EntityBody::File(File::from_fields(kind, &fields, manifest, &address)?),
        };

        Ok(Self {
            document_id,
            kind,
            version,
            json: json.clone(),
            body,
        })
    }

    pub fn document_id(&self) -> Uuid {
        self.document_id
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn category(&self) -> Category {
        self.kind.category()
    }

    pub fn schema_name(&self) -> &'static str {
        self.kind.schema_name()
    }

    /// The schema version the document was written against, if known.
    pub fn version(&self) -> Option<&SchemaVersion> {
        self.version.as_ref()
    }

    /// The JSON the entity was built from, envelope included.
    pub fn json(&self) -> &Value {
        &self.json
    }

    pub fn body(&self) -> &EntityBody {
        &self.body
    }

    pub fn address(&self) -> String {
        address(self.kind, self.document_id)
    }

    pub fn as_project(&self) -> Option<&Project> {
        match &self.body {
            EntityBody::Project(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_biomaterial(&self) -> Option<&Biomaterial> {
        match &self.body {
            EntityBody::Biomaterial(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_process(&self) -> Option<&Process> {
        match &self.body {
            EntityBody::Process(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_protocol(&self) -> Option<&Protocol> {
        match &self.body {
            EntityBody::Protocol(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_file(&self) -> Option<&File> {
        match &self.body {
            EntityBody::File(f) => Some(f),
            _ => None,
        }
    }

    /// Connections of a linked entity; `None` for projects.
    pub fn associations(&self) -> Option<&Associations> {
        match &self.body {
            EntityBody::Project(_) => None,
            EntityBody::Biomaterial(b) => Some(&b.associations),
            EntityBody::Process(p) => Some(&p.associations),
            EntityBody::Protocol(p) => Some(&p.associations),
            EntityBody::File(f) => Some(&f.associations),
        }
    }

    pub fn is_linked(&self) -> bool {
        self.category().is_linked()
    }

    pub fn parent_ids(&self) -> impl Iterator<Item = Uuid> + '_ {
        self.associations()
            .into_iter()
            .flat_map(|a| a.parents.keys().copied())
    }

    pub fn child_ids(&self) -> impl Iterator<Item = Uuid> + '_ {
        self.associations()
            .into_iter()
            .flat_map(|a| a.children.keys().copied())
    }

    /// A root is a linked entity without parents.
    pub fn is_root(&self) -> bool {
        self.associations().is_some_and(|a| a.parents.is_empty())
    }

    /// Records a connection to another entity.
    ///
    /// `Forward` means this entity references `other` (other becomes a
    /// child); `Backward` means it is referenced by `other`. Fails if the
    /// pairing is not allowed in that direction.
    pub(crate) fn connect(
        &mut self,
        other_id: Uuid,
        other_kind: EntityKind,
        direction: Direction,
    ) -> Result<(), LinkError> {
        let (kind, document_id) = (self.kind, self.document_id);
        let Some(slot) = transition(kind.category(), other_kind.category(), direction) else {
            return Err(LinkError::Disallowed {
                entity: address(kind, document_id),
                other: address(other_kind, other_id),
                direction,
            });
        };
        let (associations, typed) = match &mut self.body {
            EntityBody::Project(_) => return Err(LinkError::NotLinkable(address(kind, document_id))),
            EntityBody::Biomaterial(b) => {
                let typed = match slot {
                    Slot::FromProcesses => Some(&mut b.from_processes),
                    Slot::ToProcesses => Some(&mut b.to_processes),
                    _ => None,
                };
                (&mut b.associations, typed)
            }
            EntityBody::File(f) => {
                let typed = match slot {
                    Slot::FromProcesses => Some(&mut f.from_processes),
                    Slot::ToProcesses => Some(&mut f.to_processes),
                    _ => None,
                };
                (&mut f.associations, typed)
            }
            EntityBody::Process(p) => {
                let typed = match slot {
                    Slot::InputBiomaterials => Some(&mut p.input_biomaterials),
                    Slot::OutputBiomaterials => Some(&mut p.output_biomaterials),
                    Slot::InputFiles => Some(&mut p.input_files),
                    Slot::OutputFiles => Some(&mut p.output_files),
                    Slot::Protocols => Some(&mut p.protocols),
                    _ => None,
                };
                (&mut p.associations, typed)
            }
            EntityBody::Protocol(p) => (&mut p.associations, None),
        };
        match direction {
            Direction::Forward => associations.children.insert(other_id, other_kind),
            Direction::Backward => associations.parents.insert(other_id, other_kind),
        };
        if let Some(typed) = typed {
            typed.insert(other_id, other_kind);
        }
        Ok(())
    }
}

/// Reads the document id from the provenance block.
///
/// The legacy outer `hca_ingest` block wins over an outer `provenance`
/// block, which wins over `provenance` inside the content.
fn document_id(json: &Value) -> Result<Uuid, EntityError> {
    let provenance = ["hca_ingest", "provenance"]
        .iter()
        .find_map(|key| json.get(*key).filter(|v| v.is_object()))
        .or_else(|| content(json).get("provenance"))
        .ok_or(EntityError::MissingDocumentId)?;
    let value = provenance
        .get("document_id")
        .and_then(Value::as_str)
        .ok_or(EntityError::MissingDocumentId)?;
    Uuid::parse_str(value).map_err(|source| EntityError::InvalidDocumentId {
        value: value.to_owned(),
        source,
    })
}

// ---------------------------------------------------------------------------
// Project
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Publication {
    pub title: String,
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Contributor {
    pub name: Option<String>,
    pub email: Option<String>,
    /// Optional up to project 5.3.0.
    pub institution: Option<String>,
    pub laboratory: Option<String>,
    pub corresponding_contributor: Option<bool>,
    pub project_role: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Project {
    pub short_name: String,
    pub title: String,
    pub description: Option<String>,
    pub publications: IndexSet<Publication>,
    pub contributors: IndexSet<Contributor>,
    pub insdc_project_accessions: IndexSet<String>,
    pub geo_series_accessions: IndexSet<String>,
    pub array_express_accessions: IndexSet<String>,
    pub insdc_study_accessions: IndexSet<String>,
}

impl Project {
    fn from_fields(f: &Fields<'_>) -> Result<Self, EntityError> {
        let publications = f
            .list("project.publications", &[])?
            .iter()
            .map(|p| {
                let p = f.element(p, "project.publications");
                Ok(Publication {
                    title: p.string("title", &["publication_title"])?,
                    url: p.opt_string("url", &["publication_url"])?,
                })
            })
            .collect::<Result<_, EntityError>>()?;
        let contributors = f
            .list("project.contributors", &[])?
            .iter()
            .map(|c| {
                let c = f.element(c, "project.contributors");
                Ok(Contributor {
                    name: c.opt_string("name", &["contact_name"])?,
                    email: c.opt_string("email", &[])?,
                    institution: c.opt_string("institution", &[])?,
                    laboratory: c.opt_string("laboratory", &[])?,
                    corresponding_contributor: c.opt_bool("corresponding_contributor", &[])?,
                    project_role: c.label("project_role", &[])?,
                })
            })
            .collect::<Result<_, EntityError>>()?;

        Ok(Self {
            short_name: f.string(
                "project.project_core.project_short_name",
                &["project.project_core.project_shortname"],
            )?,
            title: f.string("project.project_core.project_title", &[])?,
            description: f.opt_string("project.project_core.project_description", &[])?,
            publications,
            contributors,
            insdc_project_accessions: f
                .strings("project.insdc_project_accessions", &["project.insdc_project"])?,
            geo_series_accessions: f.strings("project.geo_series_accessions", &["project.geo_series"])?,
            array_express_accessions: f.strings(
                "project.array_express_accessions",
                &["project.array_express_investigation"],
            )?,
            insdc_study_accessions: f.strings("project.insdc_study_accessions", &["project.insdc_study"])?,
        })
    }

    /// Distinct laboratory names of the contributors.
    pub fn laboratory_names(&self) -> IndexSet<&str> {
        self.contributors
            .iter()
            .filter_map(|c| c.laboratory.as_deref())
            .filter(|lab| !lab.is_empty())
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Biomaterials
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Biomaterial {
    pub biomaterial_id: String,
    pub ncbi_taxon_id: Vec<i64>,
    pub has_input_biomaterial: Option<String>,
    /// Processes this biomaterial was produced by.
    pub from_processes: Connections,
    /// Processes consuming this biomaterial.
    pub to_processes: Connections,
    pub associations: Associations,
    pub detail: BiomaterialDetail,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BiomaterialDetail {
    DonorOrganism(DonorOrganism),
    SpecimenFromOrganism(SpecimenFromOrganism),
    CellSuspension(CellSuspension),
    CellLine(CellLine),
    Organoid(Organoid),
    ImagedSpecimen(ImagedSpecimen),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DonorOrganism {
    pub genus_species: IndexSet<String>,
    pub diseases: IndexSet<String>,
    pub organism_age: Option<String>,
    pub organism_age_unit: Option<String>,
    pub sex: String,
}

impl DonorOrganism {
    /// The organism age as a range of seconds, if both age and unit are set.
    pub fn organism_age_in_seconds(&self) -> Result<Option<AgeRange>, AgeError> {
        match (self.organism_age.as_deref(), self.organism_age_unit.as_deref()) {
            (Some(age), Some(unit)) if !age.is_empty() && !unit.is_empty() => {
                AgeRange::parse(age, unit).map(Some)
            }
            _ => Ok(None),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpecimenFromOrganism {
    pub storage_method: Option<String>,
    pub preservation_method: Option<String>,
    pub diseases: IndexSet<String>,
    pub organ: Option<String>,
    pub organ_parts: IndexSet<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CellSuspension {
    pub estimated_cell_count: Option<i64>,
    pub selected_cell_types: IndexSet<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CellLine {
    pub cell_line_type: String,
    pub model_organ: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Organoid {
    pub model_organ: Option<String>,
    pub model_organ_part: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImagedSpecimen {
    pub slice_thickness: f64,
}

impl Biomaterial {
    fn from_fields(kind: EntityKind, f: &Fields<'_>) -> Result<Self, EntityError> {
        let schema = kind.schema_name();
        let key = |rel: &str| format!("{schema}.{rel}");

        let detail = match kind {
            EntityKind::DonorOrganism => BiomaterialDetail::DonorOrganism(DonorOrganism {
                genus_species: f.required_labels("donor_organism.genus_species", &[])?,
                diseases: f.labels("donor_organism.diseases", &["donor_organism.disease"])?,
                organism_age: f.opt_text("donor_organism.organism_age", &[])?,
                organism_age_unit: f.label("donor_organism.organism_age_unit", &[])?,
                sex: f.string("donor_organism.sex", &["donor_organism.biological_sex"])?,
            }),
            EntityKind::SpecimenFromOrganism => {
                BiomaterialDetail::SpecimenFromOrganism(SpecimenFromOrganism {
                    storage_method: f
                        .opt_string("specimen_from_organism.preservation_storage.storage_method", &[])?,
                    preservation_method: f.opt_string(
                        "specimen_from_organism.preservation_storage.preservation_method",
                        &[],
                    )?,
                    diseases: f.labels(
                        "specimen_from_organism.diseases",
                        &["specimen_from_organism.disease"],
                    )?,
                    organ: f.label("specimen_from_organism.organ", &[])?,
                    organ_parts: f.labels(
                        "specimen_from_organism.organ_parts",
                        &["specimen_from_organism.organ_part"],
                    )?,
                })
            }
            EntityKind::CellSuspension => BiomaterialDetail::CellSuspension(CellSuspension {
                estimated_cell_count: f.opt_integer(
                    "cell_suspension.estimated_cell_count",
                    &["cell_suspension.total_estimated_cells"],
                )?,
                selected_cell_types: f.labels(
                    "cell_suspension.selected_cell_types",
                    &["cell_suspension.selected_cell_type"],
                )?,
            }),
            EntityKind::CellLine => BiomaterialDetail::CellLine(CellLine {
                cell_line_type: f.string("cell_line.cell_line_type", &["cell_line.type"])?,
                model_organ: f.label("cell_line.model_organ", &[])?,
            }),
            EntityKind::Organoid => BiomaterialDetail::Organoid(Organoid {
                model_organ: f.label("organoid.model_organ", &[])?,
                model_organ_part: f.label("organoid.model_organ_part", &[])?,
            }),
            _ => BiomaterialDetail::ImagedSpecimen(ImagedSpecimen {
                slice_thickness: f.number("imaged_specimen.slice_thickness", &[])?,
            }),
        };

        Ok(Self {
            biomaterial_id: f.string(&key("biomaterial_core.biomaterial_id"), &[])?,
            ncbi_taxon_id: f.integers(&key("biomaterial_core.ncbi_taxon_id"), &[])?,
            has_input_biomaterial: f.opt_string(&key("biomaterial_core.has_input_biomaterial"), &[])?,
            from_processes: Connections::new(),
            to_processes: Connections::new(),
            associations: Associations::default(),
            detail,
        })
    }
}

// ---------------------------------------------------------------------------
// Processes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Process {
    pub process_id: String,
    pub process_name: Option<String>,
    pub input_biomaterials: Connections,
    pub output_biomaterials: Connections,
    pub input_files: Connections,
    pub output_files: Connections,
    pub protocols: Connections,
    pub associations: Associations,
    pub detail: ProcessDetail,
}

/// Variant-specific process fields. All but `Generic` and `Analysis` are
/// deprecated schemas kept for old bundles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessDetail {
    Generic,
    Analysis,
    Dissociation,
    Enrichment,
    LibraryPreparation { library_construction_approach: String },
    Sequencing { instrument_manufacturer_model: String },
}

impl Process {
    fn from_fields(kind: EntityKind, f: &Fields<'_>) -> Result<Self, EntityError> {
        let schema = kind.schema_name();
        let detail = match kind {
            EntityKind::AnalysisProcess => ProcessDetail::Analysis,
            EntityKind::DissociationProcess => ProcessDetail::Dissociation,
            EntityKind::EnrichmentProcess => ProcessDetail::Enrichment,
            EntityKind::LibraryPreparationProcess => ProcessDetail::LibraryPreparation {
                library_construction_approach: f
                    .string("library_preparation_process.library_construction_approach", &[])?,
            },
            EntityKind::SequencingProcess => ProcessDetail::Sequencing {
                instrument_manufacturer_model: f
                    .required_label("sequencing_process.instrument_manufacturer_model", &[])?,
            },
            _ => ProcessDetail::Generic,
        };
        Ok(Self {
            process_id: f.string(&format!("{schema}.process_core.process_id"), &[])?,
            process_name: f.opt_string(&format!("{schema}.process_core.process_name"), &[])?,
            input_biomaterials: Connections::new(),
            output_biomaterials: Connections::new(),
            input_files: Connections::new(),
            output_files: Connections::new(),
            protocols: Connections::new(),
            associations: Associations::default(),
            detail,
        })
    }

    /// A process sequences its input if any attached protocol is a
    /// sequencing protocol, or if it is itself a (deprecated) sequencing
    /// process.
    pub fn is_sequencing_process(&self) -> bool {
        matches!(self.detail, ProcessDetail::Sequencing { .. })
            || self
                .protocols
                .values()
                .any(|kind| *kind == EntityKind::SequencingProtocol)
    }
}

// ---------------------------------------------------------------------------
// Protocols
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Protocol {
    pub protocol_id: String,
    pub protocol_name: Option<String>,
    pub associations: Associations,
    pub detail: ProtocolDetail,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ImagingTarget {
    pub assay_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProtocolDetail {
    Generic,
    Analysis,
    AggregateGeneration,
    Collection,
    Differentiation,
    Dissociation,
    Enrichment,
    IpscInduction,
    /// Targets are kept as a list so repeated assays can be tallied.
    Imaging { targets: Vec<ImagingTarget> },
    ImagingPreparation,
    LibraryPreparation { library_construction_method: Option<String> },
    Sequencing {
        instrument_manufacturer_model: String,
        paired_end: Option<bool>,
    },
}

impl Protocol {
    fn from_fields(kind: EntityKind, f: &Fields<'_>) -> Result<Self, EntityError> {
        let schema = kind.schema_name();
        let detail = match kind {
            EntityKind::AnalysisProtocol => ProtocolDetail::Analysis,
            EntityKind::AggregateGenerationProtocol => ProtocolDetail::AggregateGeneration,
            EntityKind::CollectionProtocol => ProtocolDetail::Collection,
            EntityKind::DifferentiationProtocol => ProtocolDetail::Differentiation,
            EntityKind::DissociationProtocol => ProtocolDetail::Dissociation,
            EntityKind::EnrichmentProtocol => ProtocolDetail::Enrichment,
            EntityKind::IpscInductionProtocol => ProtocolDetail::IpscInduction,
            EntityKind::ImagingPreparationProtocol => ProtocolDetail::ImagingPreparation,
            EntityKind::ImagingProtocol => {
                let targets = f
                    .list("imaging_protocol.target", &[])?
                    .iter()
                    .map(|target| {
                        let target = f.element(target, "imaging_protocol.target");
                        Ok(ImagingTarget {
                            assay_type: target.required_label("assay_type", &[])?,
                        })
                    })
                    .collect::<Result<_, EntityError>>()?;
                ProtocolDetail::Imaging { targets }
            }
            EntityKind::LibraryPreparationProtocol => ProtocolDetail::LibraryPreparation {
                library_construction_method: f.label(
                    "library_preparation_protocol.library_construction_method",
                    &["library_preparation_protocol.library_construction_approach"],
                )?,
            },
            EntityKind::SequencingProtocol => ProtocolDetail::Sequencing {
                instrument_manufacturer_model: f
                    .required_label("sequencing_protocol.instrument_manufacturer_model", &[])?,
                paired_end: f.opt_bool("sequencing_protocol.paired_end", &[])?,
            },
            _ => ProtocolDetail::Generic,
        };
        Ok(Self {
            protocol_id: f.string(&format!("{schema}.protocol_core.protocol_id"), &[])?,
            protocol_name: f.opt_string(&format!("{schema}.protocol_core.protocol_name"), &[])?,
            associations: Associations::default(),
            detail,
        })
    }
}

// ---------------------------------------------------------------------------
// Files
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct File {
    pub format: String,
    pub manifest_entry: ManifestEntry,
    pub from_processes: Connections,
    pub to_processes: Connections,
    pub associations: Associations,
    pub detail: FileDetail,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileDetail {
    Sequence {
        read_index: Option<String>,
        lane_index: Option<String>,
    },
    Analysis,
    Reference,
    Image,
    Supplementary,
}

impl File {
    fn from_fields(
        kind: EntityKind,
        f: &Fields<'_>,
        manifest: &IndexMap<String, ManifestEntry>,
        address: &str,
    ) -> Result<Self, EntityError> {
        let schema = kind.schema_name();
        let file_name = f.string(&format!("{schema}.file_core.file_name"), &[])?;
        let manifest_entry = manifest
            .get(&file_name)
            .cloned()
            .ok_or_else(|| EntityError::MissingManifestEntry {
                address: address.to_owned(),
                file_name,
            })?;
        let detail = match kind {
            EntityKind::SequenceFile => FileDetail::Sequence {
                read_index: f.opt_text("sequence_file.read_index", &[])?,
                lane_index: f.opt_text("sequence_file.lane_index", &[])?,
            },
            EntityKind::AnalysisFile => FileDetail::Analysis,
            EntityKind::ReferenceFile => FileDetail::Reference,
            EntityKind::ImageFile => FileDetail::Image,
            _ => FileDetail::Supplementary,
        };
        Ok(Self {
            format: f.string(
                &format!("{schema}.file_core.format"),
                &[&format!("{schema}.file_core.file_format")],
            )?,
            manifest_entry,
            from_processes: Connections::new(),
            to_processes: Connections::new(),
            associations: Associations::default(),
            detail,
        })
    }

    pub fn is_sequence_file(&self) -> bool {
        matches!(self.detail, FileDetail::Sequence { .. })
    }
}
