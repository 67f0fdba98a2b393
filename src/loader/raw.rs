//! Raw export schema.
//!
//! Mirrors the Portuguese field names of the export. Unknown fields are
//! ignored, but a known field holding the wrong JSON type is a hard error.

use crate::analysis::roles::normalize_tax_id;
use crate::models::{Judgment, Lawyer, Party, ProcessRecord, Role, Subject};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(crate) struct RawProcess {
    #[serde(rename = "numeroProcessoUnico")]
    numero: Option<String>,
    #[serde(rename = "valorCausa")]
    valor_causa: Option<RawValor>,
    uf: Option<String>,
    tribunal: Option<String>,
    #[serde(rename = "classeProcessual")]
    classe: Option<RawClasse>,
    partes: Option<Vec<Option<RawParte>>>,
    #[serde(rename = "assuntosCNJ")]
    assuntos: Option<Vec<Option<RawAssunto>>>,
    #[serde(rename = "statusPredictus")]
    status: Option<RawStatus>,
}

#[derive(Debug, Deserialize)]
struct RawValor {
    valor: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawClasse {
    nome: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawStatus {
    #[serde(rename = "ramoDireito")]
    ramo_direito: Option<String>,
    #[serde(rename = "statusProcesso")]
    status_processo: Option<String>,
    #[serde(rename = "valorExecucao")]
    valor_execucao: Option<RawValor>,
    julgamentos: Option<Vec<Option<RawJulgamento>>>,
}

#[derive(Debug, Deserialize)]
struct RawJulgamento {
    #[serde(rename = "tipoJulgamento")]
    tipo_julgamento: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawParte {
    polo: Option<String>,
    cnpj: Option<String>,
    cpf: Option<String>,
    nome: Option<String>,
    advogados: Option<Vec<Option<RawAdvogado>>>,
}

#[derive(Debug, Deserialize)]
struct RawAdvogado {
    nome: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawAssunto {
    titulo: Option<String>,
    #[serde(rename = "ePrincipal")]
    e_principal: Option<bool>,
}

/// Null list and null elements both collapse to "no rows".
fn flatten<T, U>(items: Option<Vec<Option<T>>>, f: impl Fn(T) -> U) -> Vec<U> {
    items
        .unwrap_or_default()
        .into_iter()
        .flatten()
        .map(f)
        .collect()
}

fn normalize_jurisdiction(uf: Option<String>) -> Option<String> {
    uf.map(|s| s.trim().to_uppercase()).filter(|s| !s.is_empty())
}

fn normalize_party_tax_id(cnpj: Option<String>, cpf: Option<String>) -> Option<String> {
    cnpj.or(cpf)
        .map(|id| normalize_tax_id(&id))
        .filter(|id| !id.is_empty())
}

impl From<RawParte> for Party {
    fn from(raw: RawParte) -> Self {
        Party {
            role: Role::from_polo(raw.polo.as_deref()),
            tax_id: normalize_party_tax_id(raw.cnpj, raw.cpf),
            name: raw.nome,
            lawyers: flatten(raw.advogados, |a| Lawyer { name: a.nome }),
        }
    }
}

impl From<RawProcess> for ProcessRecord {
    fn from(raw: RawProcess) -> Self {
        let (law_branch, process_status, execution_value, judgments) = match raw.status {
            Some(status) => (
                status.ramo_direito,
                status.status_processo,
                status.valor_execucao.and_then(|v| v.valor),
                flatten(status.julgamentos, |j| Judgment {
                    judgment_type: j.tipo_julgamento,
                }),
            ),
            None => (None, None, None, Vec::new()),
        };

        ProcessRecord {
            id: raw.numero,
            cause_value: raw.valor_causa.and_then(|v| v.valor),
            execution_value,
            jurisdiction_code: normalize_jurisdiction(raw.uf),
            court: raw.tribunal,
            law_branch,
            process_status,
            process_class: raw.classe.and_then(|c| c.nome),
            parties: flatten(raw.partes, Party::from),
            subjects: flatten(raw.assuntos, |s| Subject {
                title: s.titulo,
                is_principal: s.e_principal.unwrap_or(false),
            }),
            judgments,
        }
    }
}
