//! Field extraction from free OCR text.
//!
//! Every call scans the text from the start with its own iterator, so
//! concurrent callers never share scan position.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use super::classify::DocumentCandidates;
use crate::models::DocumentKind;

/// A person's name: a capitalised first word, then words on the same line.
const NAME: &str = r"[A-ZÀ-Ÿ][A-Za-zÀ-ÿ']+[ \t][A-Za-zÀ-ÿ' \t]+";

static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"(?i)(nome completo|nome|name)[\s:]*({NAME})")).unwrap());
static CPF_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9]{3}[.-]?[0-9]{3}[.-]?[0-9]{3}[.-]?[0-9]{2})").unwrap());
static RG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9]{1,2}\.?[0-9]{3}\.?[0-9]{3}-?[0-9X])").unwrap());
static CNH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(cnh|registro)[\s:]*([0-9]{11})").unwrap());
static BIRTH_DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(data de nascimento|nascimento|nasc\.)[\s:]*([0-9]{2}[./][0-9]{2}[./][0-9]{4})")
        .unwrap()
});
static MOTHER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"(?i)(nome da mãe|filia..o|mãe)[\s:]*({NAME})")).unwrap());

/// Raw field candidates, de-duplicated in first-seen order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedFields {
    pub names: Vec<String>,
    pub cpf: Vec<String>,
    pub rg: Vec<String>,
    pub cnh: Vec<String>,
    pub birth_dates: Vec<String>,
    pub mother_names: Vec<String>,
}

pub fn extract_fields(text: &str) -> ExtractedFields {
    ExtractedFields {
        names: capture_all(&NAME_RE, text),
        cpf: capture_all(&CPF_RE, text),
        rg: capture_all(&RG_RE, text),
        cnh: capture_all(&CNH_RE, text),
        birth_dates: capture_all(&BIRTH_DATE_RE, text),
        mother_names: capture_all(&MOTHER_RE, text),
    }
}

/// Collect the value group of every match: group 2 when the pattern has a
/// label, group 1 otherwise.
fn capture_all(re: &Regex, text: &str) -> Vec<String> {
    let mut values: Vec<String> = Vec::new();
    for caps in re.captures_iter(text) {
        let Some(m) = caps.get(2).or_else(|| caps.get(1)) else {
            continue;
        };
        let value = m.as_str().trim();
        if !value.is_empty() && !values.iter().any(|v| v == value) {
            values.push(value.to_string());
        }
    }
    values
}

/// What a document photo yielded, ready to prefill a registration form.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DocumentCapture {
    #[serde(rename = "nome")]
    pub name: Option<String>,
    #[serde(rename = "documento")]
    pub document: Option<String>,
    #[serde(rename = "tipo_documento")]
    pub document_kind: Option<DocumentKind>,
    #[serde(rename = "data_nascimento")]
    pub birth_date: Option<String>,
    #[serde(rename = "nome_mae")]
    pub mother_name: Option<String>,
    #[serde(flatten)]
    pub candidates: DocumentCandidates,
}

/// Extract fields, validate document candidates and choose the primary one.
pub fn analyze_text(text: &str) -> DocumentCapture {
    let fields = extract_fields(text);
    let candidates = DocumentCandidates::from_raw(&fields.cpf, &fields.rg, &fields.cnh);
    let (document_kind, document) = match candidates.primary() {
        Some((kind, doc)) => (Some(kind), Some(doc.to_string())),
        None => (None, None),
    };

    DocumentCapture {
        name: fields.names.into_iter().next(),
        document,
        document_kind,
        birth_date: fields.birth_dates.into_iter().next(),
        mother_name: fields.mother_names.into_iter().next(),
        candidates,
    }
}
