//! JSON builders shared by the unit tests.
//!
//! The fixture bundle models a single sequencing experiment:
//!
//! ```text
//! donor -> [collection] -> specimen -> [dissociation] -> suspension -> [sequencing] -> R1.fastq.gz
//! ```
//!
//! plus an unlinked supplementary file.

use indexmap::IndexMap;
use serde_json::{Value, json};

use crate::manifest::{ManifestEntry, parse_manifest};

pub(crate) const PROJECT: &str = "a1a1a1a1-0000-4000-8000-000000000001";
pub(crate) const DONOR: &str = "b1b1b1b1-0000-4000-8000-000000000001";
pub(crate) const SPECIMEN: &str = "b1b1b1b1-0000-4000-8000-000000000002";
pub(crate) const SUSPENSION: &str = "b1b1b1b1-0000-4000-8000-000000000003";
pub(crate) const PROCESS: &str = "c1c1c1c1-0000-4000-8000-000000000001";
pub(crate) const PROCESS_2: &str = "c1c1c1c1-0000-4000-8000-000000000002";
pub(crate) const SEQUENCING: &str = "c1c1c1c1-0000-4000-8000-000000000003";
pub(crate) const COLLECTION: &str = "d1d1d1d1-0000-4000-8000-000000000001";
pub(crate) const PROTOCOL: &str = "d1d1d1d1-0000-4000-8000-000000000002";
pub(crate) const FILE: &str = "e1e1e1e1-0000-4000-8000-000000000001";
pub(crate) const SUPPLEMENTARY: &str = "e1e1e1e1-0000-4000-8000-000000000002";

pub(crate) const BUNDLE: &str = "f1f1f1f1-0000-4000-8000-000000000001";
pub(crate) const BUNDLE_VERSION: &str = "2019-02-13T150211.000000Z";

fn schema(path: &str) -> String {
    format!("https://schema.humancellatlas.org/type/{path}")
}

pub(crate) fn project(id: &str) -> Value {
    json!({
        "describedBy": schema("project/14.2.0/project"),
        "schema_type": "project",
        "provenance": {"document_id": id},
        "project_core": {"project_short_name": "Brain", "project_title": "A brain atlas"},
        "publications": [{"title": "Neurons", "url": "https://doi.org/10.1/x"}],
        "contributors": [{
            "name": "Ada Lovelace",
            "email": "ada@example.org",
            "institution": "University of London",
            "laboratory": "Analytical Engines",
            "corresponding_contributor": true,
            "project_role": {"text": "principal investigator"}
        }],
        "geo_series_accessions": ["GSE1"]
    })
}

pub(crate) fn donor(id: &str) -> Value {
    json!({
        "describedBy": schema("biomaterial/15.3.0/donor_organism"),
        "schema_type": "biomaterial",
        "provenance": {"document_id": id},
        "biomaterial_core": {"biomaterial_id": "donor-1", "ncbi_taxon_id": [9606]},
        "genus_species": [{"text": "Homo sapiens", "ontology_label": "Homo sapiens"}],
        "diseases": [{"text": "normal"}],
        "organism_age": "20-30",
        "organism_age_unit": {"text": "year"},
        "sex": "female"
    })
}

pub(crate) fn specimen(id: &str) -> Value {
    json!({
        "describedBy": schema("biomaterial/10.2.0/specimen_from_organism"),
        "schema_type": "biomaterial",
        "provenance": {"document_id": id},
        "biomaterial_core": {"biomaterial_id": "specimen-1", "ncbi_taxon_id": [9606]},
        "organ": {"ontology_label": "brain"},
        "organ_parts": [{"ontology_label": "cortex"}],
        "preservation_storage": {"storage_method": "frozen at -80C"}
    })
}

pub(crate) fn cell_suspension(id: &str) -> Value {
    json!({
        "describedBy": schema("biomaterial/13.1.1/cell_suspension"),
        "schema_type": "biomaterial",
        "provenance": {"document_id": id},
        "biomaterial_core": {"biomaterial_id": "suspension-1", "ncbi_taxon_id": [9606]},
        "estimated_cell_count": 10_000,
        "selected_cell_types": [{"text": "neuron"}]
    })
}

pub(crate) fn process(id: &str) -> Value {
    json!({
        "describedBy": schema("process/9.1.0/process"),
        "schema_type": "process",
        "provenance": {"document_id": id},
        "process_core": {"process_id": format!("process-{}", &id[id.len() - 1..])}
    })
}

pub(crate) fn sequencing_process(id: &str) -> Value {
    json!({
        "describedBy": schema("process/sequencing/9.0.0/sequencing_process"),
        "schema_type": "process",
        "provenance": {"document_id": id},
        "process_core": {"process_id": "sequencing-1"},
        "instrument_manufacturer_model": {"text": "Illumina HiSeq 2500"}
    })
}

pub(crate) fn collection_protocol(id: &str) -> Value {
    json!({
        "describedBy": schema("protocol/biomaterial_collection/9.2.0/collection_protocol"),
        "schema_type": "protocol",
        "provenance": {"document_id": id},
        "protocol_core": {"protocol_id": "collection-1"}
    })
}

pub(crate) fn sequencing_protocol(id: &str) -> Value {
    json!({
        "describedBy": schema("protocol/sequencing/10.1.0/sequencing_protocol"),
        "schema_type": "protocol",
        "provenance": {"document_id": id},
        "protocol_core": {"protocol_id": "sequencing-protocol-1", "protocol_name": "10x v2"},
        "instrument_manufacturer_model": {"text": "Illumina NextSeq 500"},
        "paired_end": true
    })
}

pub(crate) fn sequence_file(id: &str, name: &str) -> Value {
    json!({
        "describedBy": schema("file/9.0.0/sequence_file"),
        "schema_type": "file",
        "provenance": {"document_id": id},
        "file_core": {"file_name": name, "format": "fastq.gz"},
        "read_index": "read1",
        "lane_index": 1
    })
}

pub(crate) fn supplementary_file(id: &str, name: &str) -> Value {
    json!({
        "describedBy": schema("file/2.1.0/supplementary_file"),
        "schema_type": "file",
        "provenance": {"document_id": id},
        "file_core": {"file_name": name, "format": "pdf"}
    })
}

pub(crate) fn manifest_record(name: &str, uuid: &str) -> Value {
    json!({
        "content-type": "application/gzip; dcp-type=data",
        "crc32c": "e978e85d",
        "indexed": false,
        "name": name,
        "s3_etag": "89f5ae6f1cc8c8c79d52e4c4d1b6b6b5",
        "sha1": "5ad4f0a8d5a1c3a8cd2a7a0f5e4b5e3f6c0c0d8e",
        "sha256": "d6e7f4d5b0e1a0a3c9a8b7c6d5e4f3a2b1c0d9e8f7a6b5c4d3e2f1a0b9c8d7e6",
        "size": 1024,
        "uuid": uuid,
        "version": BUNDLE_VERSION
    })
}

pub(crate) fn manifest_records() -> Vec<Value> {
    vec![
        manifest_record("R1.fastq.gz", "9a9a9a9a-0000-4000-8000-000000000001"),
        manifest_record("protocol.pdf", "9a9a9a9a-0000-4000-8000-000000000002"),
    ]
}

pub(crate) fn manifest_map() -> IndexMap<String, ManifestEntry> {
    parse_manifest(&manifest_records()).expect("fixture manifest is valid")
}

pub(crate) fn links() -> Value {
    json!({
        "describedBy": "https://schema.humancellatlas.org/system/1.1.1/links",
        "schema_type": "links",
        "links": [
            {
                "process": PROCESS,
                "inputs": [DONOR], "input_type": "biomaterial",
                "outputs": [SPECIMEN], "output_type": "biomaterial",
                "protocols": [{"protocol_id": COLLECTION, "protocol_type": "collection_protocol"}]
            },
            {
                "process": PROCESS_2,
                "inputs": [SPECIMEN], "input_type": "biomaterial",
                "outputs": [SUSPENSION], "output_type": "biomaterial",
                "protocols": []
            },
            {
                "process": SEQUENCING,
                "inputs": [SUSPENSION], "input_type": "biomaterial",
                "outputs": [FILE], "output_type": "file",
                "protocols": [{"protocol_id": PROTOCOL, "protocol_type": "sequencing_protocol"}]
            }
        ]
    })
}

fn biomaterials() -> Vec<Value> {
    vec![donor(DONOR), specimen(SPECIMEN), cell_suspension(SUSPENSION)]
}

fn processes() -> Vec<Value> {
    vec![process(PROCESS), process(PROCESS_2), process(SEQUENCING)]
}

fn protocols() -> Vec<Value> {
    vec![collection_protocol(COLLECTION), sequencing_protocol(PROTOCOL)]
}

fn files() -> Vec<Value> {
    vec![
        sequence_file(FILE, "R1.fastq.gz"),
        supplementary_file(SUPPLEMENTARY, "protocol.pdf"),
    ]
}

/// The fixture bundle as one aggregate file per category.
pub(crate) fn layout_a() -> IndexMap<String, Value> {
    IndexMap::from([
        ("project.json".to_string(), project(PROJECT)),
        ("biomaterial.json".to_string(), json!({"biomaterials": biomaterials()})),
        ("process.json".to_string(), json!({"processes": processes()})),
        ("protocol.json".to_string(), json!({"protocols": protocols()})),
        ("file.json".to_string(), json!({"files": files()})),
        ("links.json".to_string(), links()),
    ])
}

/// The fixture bundle as one file per document.
pub(crate) fn layout_b() -> IndexMap<String, Value> {
    let mut metadata = IndexMap::new();
    let mut counters: IndexMap<String, usize> = IndexMap::new();
    let documents = std::iter::once(project(PROJECT))
        .chain(biomaterials())
        .chain(processes())
        .chain(protocols())
        .chain(files());
    for document in documents {
        let described_by = document["describedBy"].as_str().expect("fixture has describedBy");
        let schema_name = described_by.rsplit('/').next().expect("fixture schema name").to_string();
        let index = counters.entry(schema_name.clone()).or_default();
        metadata.insert(format!("{schema_name}_{index}.json"), document);
        *index += 1;
    }
    metadata.insert("links.json".to_string(), links());
    metadata
}
