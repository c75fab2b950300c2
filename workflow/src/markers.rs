//! One-line descriptions for the marker genes the report knows about.

pub const FALLBACK_DESCRIPTION: &str = "Marker associated with the identified cell population";

const MARKER_DESCRIPTIONS: &[(&str, &str)] = &[
    ("Cr2", "Complement receptor 2 (CD21), high on follicular and marginal zone B cells"),
    ("Ms4a1", "CD20, pan-B cell surface marker"),
    ("Ighd", "Immunoglobulin heavy constant delta, marks mature naive B cells"),
    ("Fcer2a", "CD23, low-affinity IgE receptor characteristic of follicular B cells"),
    ("Cd19", "B cell co-receptor, expressed throughout B cell development"),
    ("Cd20", "Pan-B cell surface marker (MS4A1)"),
    ("Cd22", "Sialic acid binding lectin regulating B cell receptor signalling"),
    ("Pax5", "B cell lineage commitment transcription factor"),
    ("Cxcr5", "Chemokine receptor guiding B cells into follicles"),
    ("Cd79a", "Ig-alpha, signalling component of the B cell receptor"),
    ("Cd79b", "Ig-beta, signalling component of the B cell receptor"),
    ("Fcmr", "Fc mu receptor, highly expressed on resting B cells"),
    ("Tnfrsf13c", "BAFF receptor, required for mature B cell survival"),
    ("Blk", "B lymphoid tyrosine kinase downstream of the B cell receptor"),
    ("Spib", "ETS transcription factor active in B cells and pDCs"),
    ("Ano1", "Calcium-activated chloride channel, canonical ICC pacemaker marker"),
    ("Kit", "Receptor tyrosine kinase required for ICC development and maintenance"),
    ("Etv1", "ETS transcription factor controlling the ICC transcriptional program"),
    ("Prkcq", "Protein kinase C theta, enriched in ICC networks"),
    ("Alb", "Albumin, the dominant secreted protein of hepatocytes"),
    ("Gfap", "Intermediate filament protein of astrocytes"),
    ("Cd3e", "T cell receptor complex component"),
];

/// Looks a gene symbol up in the closed description table, ignoring case.
pub fn describe_marker(symbol: &str) -> Option<&'static str> {
    let symbol = symbol.trim();
    MARKER_DESCRIPTIONS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(symbol))
        .map(|(_, description)| *description)
}

pub fn describe_marker_or_fallback(symbol: &str) -> &'static str {
    describe_marker(symbol).unwrap_or(FALLBACK_DESCRIPTION)
}
