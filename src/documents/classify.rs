use serde::Serialize;

use super::validators::{validate_cnh, validate_cpf, validate_rg};
use crate::models::DocumentKind;

/// Validated document numbers found in one capture, per kind.
///
/// Raw candidates that fail their validator are dropped; the survivors keep
/// their original order and are returned formatted.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DocumentCandidates {
    pub cpf: Vec<String>,
    pub rg: Vec<String>,
    pub cnh: Vec<String>,
}

impl DocumentCandidates {
    pub fn from_raw(cpf: &[String], rg: &[String], cnh: &[String]) -> Self {
        Self {
            cpf: cpf.iter().filter_map(|c| validate_cpf(c)).collect(),
            rg: rg.iter().filter_map(|c| validate_rg(c)).collect(),
            cnh: cnh.iter().filter_map(|c| validate_cnh(c)).collect(),
        }
    }

    /// Pick the primary document: CPF first, then CNH, then RG.
    pub fn primary(&self) -> Option<(DocumentKind, &str)> {
        [
            (DocumentKind::Cpf, &self.cpf),
            (DocumentKind::Cnh, &self.cnh),
            (DocumentKind::Rg, &self.rg),
        ]
        .into_iter()
        .find_map(|(kind, list)| list.first().map(|doc| (kind, doc.as_str())))
    }

    pub fn is_empty(&self) -> bool {
        self.cpf.is_empty() && self.rg.is_empty() && self.cnh.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn invalid_candidates_are_dropped() {
        let found = DocumentCandidates::from_raw(
            &strings(&["111.444.777-36", "11144477735"]),
            &strings(&["1234567", "123456789"]),
            &strings(&["123"]),
        );
        assert_eq!(found.cpf, vec!["111.444.777-35"]);
        assert_eq!(found.rg, vec!["12.345.678-9"]);
        assert!(found.cnh.is_empty());
    }

    #[test]
    fn cpf_wins_over_cnh_and_rg() {
        let found = DocumentCandidates::from_raw(
            &strings(&["11144477735"]),
            &strings(&["123456789"]),
            &strings(&["98765432100"]),
        );
        assert_eq!(found.primary(), Some((DocumentKind::Cpf, "111.444.777-35")));
    }

    #[test]
    fn cnh_wins_over_rg_without_cpf() {
        let found = DocumentCandidates::from_raw(
            &strings(&["11144477736"]),
            &strings(&["123456789"]),
            &strings(&["98765432100"]),
        );
        assert_eq!(found.primary(), Some((DocumentKind::Cnh, "987.654.321-00")));
    }

    #[test]
    fn rg_used_as_last_resort() {
        let found = DocumentCandidates::from_raw(&[], &strings(&["12345678", "123456789"]), &[]);
        assert_eq!(found.primary(), Some((DocumentKind::Rg, "1.234.567-8")));
    }

    #[test]
    fn nothing_valid_means_no_primary() {
        let found = DocumentCandidates::from_raw(&strings(&["00000000000"]), &[], &[]);
        assert!(found.is_empty());
        assert_eq!(found.primary(), None);
    }
}
