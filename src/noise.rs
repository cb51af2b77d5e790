// src/noise.rs
//! Noise penalty: keyword lists for crime/accident/tabloid/local-newscast
//! content plus low-signal URL sections per host. Produces a 0..1 penalty
//! consumed by the scorer as `total *= 1 - 0.4 * penalty`.

use crate::normalize::path_from_url;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::{collections::BTreeMap, fs, path::Path};

// Fixed increments per matching list; the sum is capped at 1.0.
const CRIME_INC: f64 = 0.6;
const ACCIDENT_INC: f64 = 0.4;
const TABLOID_INC: f64 = 0.3;
const LOCAL_INC: f64 = 0.4;
const SECTION_INC: f64 = 0.3;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NoiseLists {
    #[serde(default)]
    pub crime: Vec<String>,
    #[serde(default)]
    pub accident: Vec<String>,
    #[serde(default)]
    pub tabloid: Vec<String>,
    #[serde(default)]
    pub local_hints: Vec<String>,
    /// Host fragment → URL path prefixes with systematically low signal
    /// (regional sections, crime blotters, entertainment).
    #[serde(default)]
    pub low_signal_sections: BTreeMap<String, Vec<String>>,
}

impl NoiseLists {
    pub fn from_toml_str(toml_str: &str) -> Result<Self> {
        toml::from_str(toml_str).context("parsing noise lists")
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading noise lists from {}", path.display()))?;
        Self::from_toml_str(&content).with_context(|| format!("in noise lists {}", path.display()))
    }

    /// Brazilian-news seed used when no file is configured.
    pub fn default_seed() -> Self {
        let list = |kws: &[&str]| kws.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        let mut sections = BTreeMap::new();
        sections.insert(
            "g1.globo.com".to_string(),
            list(&[
                "/acre/", "/al/", "/am/", "/ap/", "/ba/", "/ce/", "/df/", "/es/", "/go/",
                "/ma/", "/mg/", "/ms/", "/mt/", "/pa/", "/pb/", "/pe/", "/pi/", "/pr/",
                "/rj/", "/rn/", "/ro/", "/rr/", "/rs/", "/sc/", "/se/", "/sp/",
            ]),
        );
        sections.insert(
            "uol.com.br".to_string(),
            list(&["/cotidiano/", "/policia/", "/carros/", "/entretenimento/"]),
        );
        sections.insert(
            "folha.uol.com.br".to_string(),
            list(&["/cotidiano/", "/esporte/"]),
        );
        Self {
            crime: list(&[
                "assassinato", "homicídio", "homicidio", "feminicídio", "feminicidio",
                "tiroteio", "execução", "executado", "estupro", "latrocínio", "latrocinio",
                "tráfico", "trafico", "facada", "bala perdida", "agrediu", "agressão",
                "agressao", "morto a tiros", "morre após", "corpo é encontrado",
            ]),
            accident: list(&[
                "acidente", "colisão", "colisao", "capotagem", "batida", "engavetamento",
                "cai de", "queda de", "desabamento", "incêndio", "incendio",
            ]),
            tabloid: list(&[
                "celebridade", "fofoca", "viralizou", "influencer", "reality", "bbb",
            ]),
            local_hints: list(&[
                "vídeos:", "videos:", "jornal", "edição", "1ª edição", "2ª edição",
                "bom dia", "eptv", "jl1", "jl2", "df1",
            ]),
            low_signal_sections: sections,
        }
    }

    /// Penalty in [0,1]; 0 = clean, 1 = heavy noise.
    pub fn penalty(&self, headline: &str, source_host: &str, url: &str) -> f64 {
        let t = headline.to_lowercase();
        let mut score = 0.0;
        if any_in(&t, &self.crime) {
            score += CRIME_INC;
        }
        if any_in(&t, &self.accident) {
            score += ACCIDENT_INC;
        }
        if any_in(&t, &self.tabloid) {
            score += TABLOID_INC;
        }
        if any_in(&t, &self.local_hints) {
            score += LOCAL_INC;
        }

        let path = path_from_url(url).to_lowercase();
        let host = source_host.to_lowercase();
        for (dom, sections) in &self.low_signal_sections {
            if host.contains(dom.as_str()) {
                if sections.iter().any(|sec| path.starts_with(sec.as_str())) {
                    score += SECTION_INC;
                }
                break;
            }
        }

        score.min(1.0)
    }
}

fn any_in(text: &str, kws: &[String]) -> bool {
    kws.iter().any(|k| text.contains(k.as_str()))
}
