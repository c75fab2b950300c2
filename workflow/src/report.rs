use crate::form::FormInput;
use crate::markers::describe_marker_or_fallback;
use rand::Rng;
use serde::Deserialize;
use serde::Serialize;
use strum_macros::Display;
use strum_macros::EnumIter;
use strum_macros::EnumString;
use tracing::debug;

pub const SCORE_MIN: u8 = 90;
pub const SCORE_MAX: u8 = 99;
pub const MARKER_COUNT: u32 = 50;
pub const VALIDATION_PASSED: &str = "VALIDATION PASSED";

pub const B_CELL_LABEL: &str = "Follicular B cells (FoB)";
pub const DEFAULT_CELL_TYPE: &str = "Follicular B cells";
const B_CELL_KEYWORDS: &[&str] = &["cd19", "cd20", "ms4a1"];

const TISSUE_CELL_TYPES: &[(&str, &str)] = &[
    ("brain", "Neuronal cells"),
    ("liver", "Hepatocytes"),
    ("blood", "B cells"),
    ("lung", "Alveolar cells"),
    ("heart", "Cardiomyocytes"),
    ("kidney", "Renal epithelial cells"),
    ("spleen", "Follicular B cells"),
    ("thymus", "T cells"),
    ("bone_marrow", "Hematopoietic stem cells"),
];

/// Which canned generator produces the report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
pub enum ReportScenario {
    /// Tissue lookup with the B-cell keyword override.
    #[default]
    #[serde(rename = "profile")]
    #[strum(serialize = "profile")]
    MarkerProfile,
    /// Fixed esophagus report; ignores the input entirely.
    #[serde(rename = "esophagus-icc")]
    #[strum(serialize = "esophagus-icc")]
    EsophagusIcc,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedNote {
    pub name: String,
    pub description: String,
}

impl NamedNote {
    fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// The synthesized analysis result. Every branch fills every field, so the
/// renderers never meet a missing section; lists may be empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotationReport {
    pub scenario: ReportScenario,
    pub cell_type: String,
    pub sub_types: Vec<String>,
    pub marker_count: u32,
    pub score: u8,
    pub key_markers: Vec<String>,
    pub validation_status: String,
    pub feedback_summary: String,
    pub marker_consistency: Vec<String>,
    pub functional_markers_intro: String,
    pub functional_markers: Vec<NamedNote>,
    pub cell_type_markers_intro: String,
    pub cell_type_markers: Vec<NamedNote>,
    pub database_cross_reference: String,
    pub probable_general_cell_type: String,
    pub probable_sub_cell_types_intro: String,
    pub probable_sub_cell_types: Vec<NamedNote>,
    pub annotation_concise_summary: String,
    pub quality_strengths: Vec<String>,
    pub quality_weaknesses: Vec<String>,
    pub quality_overall_assessment: String,
}

pub fn derive_report(input: &FormInput, scenario: ReportScenario) -> AnnotationReport {
    derive_report_with_rng(input, scenario, &mut rand::rng())
}

pub fn derive_report_with_rng<R: Rng>(
    input: &FormInput,
    scenario: ReportScenario,
    rng: &mut R,
) -> AnnotationReport {
    let report = match scenario {
        ReportScenario::MarkerProfile => {
            let score = rng.random_range(SCORE_MIN..=SCORE_MAX);
            if is_b_cell_profile(input) {
                b_cell_report(input, score)
            } else {
                let tissue = input.tissue_type.trim().to_lowercase();
                generic_report(input, tissue_cell_type(&tissue), score)
            }
        }
        ReportScenario::EsophagusIcc => esophagus_icc_report(),
    };
    debug!(
        %scenario,
        cell_type = %report.cell_type,
        score = report.score,
        "derived annotation report"
    );
    report
}

/// Mapped cell type for a lower-cased tissue, or [`DEFAULT_CELL_TYPE`].
pub fn tissue_cell_type(tissue: &str) -> &'static str {
    TISSUE_CELL_TYPES
        .iter()
        .find(|(name, _)| *name == tissue)
        .map(|(_, cell_type)| *cell_type)
        .unwrap_or(DEFAULT_CELL_TYPE)
}

/// Spleen tissue, or any B-cell keyword anywhere in the marker text.
pub fn is_b_cell_profile(input: &FormInput) -> bool {
    let tissue = input.tissue_type.trim().to_lowercase();
    let markers = input.marker_gene.to_lowercase();
    tissue == "spleen" || B_CELL_KEYWORDS.iter().any(|keyword| markers.contains(keyword))
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| (*item).to_string()).collect()
}

fn described(symbols: &[&str]) -> Vec<NamedNote> {
    symbols
        .iter()
        .map(|symbol| NamedNote::new(*symbol, describe_marker_or_fallback(symbol)))
        .collect()
}

fn b_cell_report(input: &FormInput, score: u8) -> AnnotationReport {
    let key_markers = ["Cr2", "Ms4a1", "Ighd", "Fcer2a", "Cd19", "Cd22", "Pax5", "Cxcr5"];
    AnnotationReport {
        scenario: ReportScenario::MarkerProfile,
        cell_type: B_CELL_LABEL.to_string(),
        sub_types: strings(&["Germinal center B cells", "Marginal zone-like B cells"]),
        marker_count: MARKER_COUNT,
        score,
        key_markers: strings(&key_markers),
        validation_status: VALIDATION_PASSED.to_string(),
        feedback_summary: "The annotation as Follicular B cells is strongly supported by key \
            markers like Cr2, Ighd, Fcer2a, Cxcr5, and Pax5."
            .to_string(),
        marker_consistency: strings(&[
            "Cr2 and Fcer2a (CD23) together are the hallmark of follicular B cells.",
            "Ighd co-expression indicates a mature, antigen-naive population.",
            "Pax5, Cd19 and Cd79a/b confirm B lineage identity.",
            "No plasma cell (Prdm1, Xbp1) or T cell (Cd3e) signal contradicts the call.",
        ]),
        functional_markers_intro: format!(
            "Functional genes in the {} {} list point at antigen receptor signalling and \
             follicular homing.",
            input.species, input.tissue_type
        ),
        functional_markers: described(&["Cd79a", "Cd79b", "Cd22", "Cxcr5", "Tnfrsf13c"]),
        cell_type_markers_intro: "Lineage and maturation markers that separate follicular B \
            cells from other B cell states:"
            .to_string(),
        cell_type_markers: described(&key_markers),
        database_cross_reference: "PanglaoDB and CellMarker both list Cr2, Fcer2a and Ighd \
            among canonical follicular B cell markers.\nThe Tabula Muris spleen atlas assigns \
            the same signature to its follicular B cell cluster."
            .to_string(),
        probable_general_cell_type: "B cells. Pan-B markers (Cd19, Ms4a1, Cd79a, Pax5) are \
            uniformly present and no other lineage signature is detected."
            .to_string(),
        probable_sub_cell_types_intro: "Ranked by how well the marker set fits each state:"
            .to_string(),
        probable_sub_cell_types: vec![
            NamedNote::new(
                "Follicular B cells (FoB)",
                "Cr2 intermediate, Fcer2a high and Ighd high: the classic FoB profile.",
            ),
            NamedNote::new(
                "Germinal center B cells",
                "Possible minor fraction; GC markers such as Aicda and Gcsam are not among the \
                 top genes.",
            ),
            NamedNote::new(
                "Marginal zone-like B cells",
                "Cr2 expression overlaps with MZ B cells, but high Fcer2a and Ighd argue \
                 against an MZ identity.",
            ),
        ],
        annotation_concise_summary: "The cluster is annotated as Follicular B cells (FoB), \
            supported by Cr2, Fcer2a, Ighd and Cxcr5 on a pan-B background."
            .to_string(),
        quality_strengths: strings(&[
            "Annotation rests on multiple independent canonical markers.",
            "Sub-type ranking explicitly weighs the FoB/MZ overlap on Cr2.",
            "Cross-referenced against two marker databases and a spleen atlas.",
        ]),
        quality_weaknesses: strings(&[
            "Expression levels are not quantified, so the Cr2 intermediate call is qualitative.",
            "The leading marker RP24-338A5.4 is an unannotated transcript and is not \
             interpreted.",
        ]),
        quality_overall_assessment: "A well-supported, internally consistent annotation. The \
            main residual uncertainty is the FoB versus MZ boundary, which would need surface \
            protein data to resolve."
            .to_string(),
    }
}

fn generic_report(input: &FormInput, cell_type: &str, score: u8) -> AnnotationReport {
    let placeholders = ["Marker1", "Marker2", "Marker3"];
    AnnotationReport {
        scenario: ReportScenario::MarkerProfile,
        cell_type: cell_type.to_string(),
        sub_types: strings(&["Type A", "Type B"]),
        marker_count: MARKER_COUNT,
        score,
        key_markers: strings(&placeholders),
        validation_status: VALIDATION_PASSED.to_string(),
        feedback_summary: "The annotation is well-supported by the marker profile.".to_string(),
        marker_consistency: vec![
            format!("Top markers are consistent with {cell_type}."),
            format!(
                "No conflicting lineage signal was found for {} {} tissue.",
                input.species, input.tissue_type
            ),
        ],
        functional_markers_intro: "Functional markers identified in the submitted gene list:"
            .to_string(),
        functional_markers: described(&placeholders),
        cell_type_markers_intro: format!("Markers characteristic of {cell_type}:"),
        cell_type_markers: described(&placeholders),
        database_cross_reference: format!(
            "The marker profile matches reference entries for {cell_type} in public single-cell \
             marker databases."
        ),
        probable_general_cell_type: cell_type.to_string(),
        probable_sub_cell_types_intro: format!("Candidate states within {cell_type}:"),
        probable_sub_cell_types: vec![
            NamedNote::new("Type A", "Best match to the leading markers."),
            NamedNote::new("Type B", "Partial match; shares a subset of the leading markers."),
        ],
        annotation_concise_summary: format!(
            "The cluster is annotated as {cell_type} based on the submitted {} markers.",
            input.species
        ),
        quality_strengths: strings(&["Annotation is consistent with the tissue of origin."]),
        quality_weaknesses: strings(&["Marker-level evidence is summarized generically."]),
        quality_overall_assessment: format!(
            "The {cell_type} call is plausible for {} tissue.",
            input.tissue_type
        ),
    }
}

fn esophagus_icc_report() -> AnnotationReport {
    let key_markers = ["Ano1", "Kit", "Etv1", "Prkcq"];
    AnnotationReport {
        scenario: ReportScenario::EsophagusIcc,
        cell_type: "Interstitial Cells of Cajal (ICCs)".to_string(),
        sub_types: strings(&["ICC-MY (Myenteric Plexus)", "ICC-IM (Intramuscular)"]),
        marker_count: MARKER_COUNT,
        score: 95,
        key_markers: strings(&key_markers),
        validation_status: VALIDATION_PASSED.to_string(),
        feedback_summary: "The ICC annotation is strongly supported by the co-expression of \
            Ano1, Kit and Etv1, the defining pacemaker signature."
            .to_string(),
        marker_consistency: strings(&[
            "Ano1 and Kit co-expression is specific to ICCs in the gastrointestinal wall.",
            "Etv1 confirms the ICC transcriptional program.",
            "Smooth muscle contractile genes are low, ruling out SMCs.",
            "Pdgfra is absent, ruling out PDGFRa+ fibroblast-like cells.",
        ]),
        functional_markers_intro: "Genes underlying slow-wave pacemaker activity:".to_string(),
        functional_markers: described(&["Ano1", "Kit", "Prkcq"]),
        cell_type_markers_intro: "Markers that identify ICCs within the esophageal muscularis:"
            .to_string(),
        cell_type_markers: described(&key_markers),
        database_cross_reference: "CellMarker and the human gut cell atlas both list Ano1, Kit \
            and Etv1 as ICC markers.\nSingle-cell studies of the esophageal muscularis report \
            the same signature in their ICC clusters."
            .to_string(),
        probable_general_cell_type: "Interstitial Cells of Cajal. The pacemaker signature is \
            complete and no competing mesenchymal lineage is supported."
            .to_string(),
        probable_sub_cell_types_intro: "Ranked by anatomical fit within the esophagus:"
            .to_string(),
        probable_sub_cell_types: vec![
            NamedNote::new(
                "ICC-MY (Myenteric Plexus)",
                "Network-forming ICCs between the muscle layers; highest Kit and Ano1.",
            ),
            NamedNote::new(
                "ICC-IM (Intramuscular)",
                "Intramuscular ICCs that mediate neuromuscular transmission.",
            ),
            NamedNote::new(
                "ICC-SMP (Submucosal Plexus)",
                "Less likely in the esophagus, where this population is sparse.",
            ),
        ],
        annotation_concise_summary: "The cluster is annotated as Interstitial Cells of Cajal, \
            most likely the myenteric plexus sub-type (ICC-MY)."
            .to_string(),
        quality_strengths: strings(&[
            "Accurate ICC identification from the canonical Ano1/Kit/Etv1 triad.",
            "Comprehensive marker analysis with explicit exclusion of SMCs and PDGFRa+ cells.",
        ]),
        quality_weaknesses: strings(&[
            "Sub-type assignment relies on anatomy rather than distinguishing markers.",
        ]),
        quality_overall_assessment: "A high-confidence annotation. The sub-type call is \
            reasonable but would benefit from spatial validation."
            .to_string(),
    }
}
