// src/brand.rs
//! Brand-fit profile: weighted keyword categories describing a publisher's
//! editorial focus, plus off-brand negative keywords. Loaded from TOML and
//! injected into the scorer — no module-global tables.

use crate::entities::Entities;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::{fs, path::Path};

/// Soft multiplier when any negative keyword matches; never exclusion.
const NEGATIVE_MULTIPLIER: f64 = 0.7;

#[derive(Debug, Clone, Deserialize)]
pub struct BrandCategory {
    pub id: String,
    pub weight: f64,
    #[serde(default)]
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BrandProfile {
    #[serde(default)]
    pub categories: Vec<BrandCategory>,
    #[serde(default)]
    pub negative_keywords: Vec<String>,
}

impl BrandProfile {
    pub fn from_toml_str(toml_str: &str) -> Result<Self> {
        let profile: Self = toml::from_str(toml_str).context("parsing brand profile")?;
        Ok(profile)
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading brand profile from {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("in brand profile {}", path.display()))
    }

    /// Wealth-planning seed matching the original editorial focus; used when
    /// no profile file is configured.
    pub fn default_seed() -> Self {
        let cat = |id: &str, weight: f64, kws: &[&str]| BrandCategory {
            id: id.to_string(),
            weight,
            keywords: kws.iter().map(|s| s.to_string()).collect(),
        };
        Self {
            categories: vec![
                cat(
                    "planejamento_patrimonial",
                    1.0,
                    &[
                        "planejamento patrimonial", "gestão patrimonial", "proteção patrimonial",
                        "governança familiar", "holding familiar", "sucessão", "herança",
                        "testamento", "trust", "offshore", "estate planning", "wealth planning",
                        "asset protection",
                    ],
                ),
                cat(
                    "preservacao_risco",
                    0.9,
                    &[
                        "preservação de patrimônio", "diversificação", "alocação",
                        "gestão de risco", "hedge", "volatilidade", "proteção",
                    ],
                ),
                cat(
                    "sucessao_legado",
                    0.9,
                    &[
                        "planejamento sucessório", "legado", "educação financeira",
                        "transição geracional", "family office", "fundos exclusivos", "fip", "fii",
                    ],
                ),
                cat(
                    "fiscal_estrutural",
                    0.75,
                    &[
                        "tributação", "impostos", "reforma tributária", "itcmd",
                        "estruturação", "eficiência fiscal", "tax planning",
                    ],
                ),
                cat(
                    "mercado_relevante",
                    0.65,
                    &[
                        "selic", "copom", "ipca", "juros", "inflação", "câmbio", "dólar",
                        "fed", "ecb", "treasury", "s&p 500", "nasdaq", "recessão",
                        "crescimento", "guidance", "resultado", "dividendos",
                    ],
                ),
                cat(
                    "impacto_filantropia",
                    0.6,
                    &[
                        "filantropia", "impacto social", "investimento sustentável", "esg",
                        "endowment",
                    ],
                ),
            ],
            negative_keywords: [
                "fofoca", "celebridade", "escândalo", "clickbait", "tabloide", "viral inútil",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }

    /// Brand-fit in [0,1]: sum of category weights with any keyword present
    /// in the text bag, capped at 1.0, softened by the negative multiplier.
    pub fn fit_score(&self, headline: &str, entities: &Entities) -> f64 {
        let bag = text_bag(headline, entities);
        let mut score: f64 = 0.0;
        for cat in &self.categories {
            if cat.keywords.iter().any(|kw| bag.contains(&kw.to_lowercase())) {
                score += cat.weight;
            }
        }
        score = score.min(1.0);
        if self
            .negative_keywords
            .iter()
            .any(|neg| bag.contains(&neg.to_lowercase()))
        {
            score *= NEGATIVE_MULTIPLIER;
        }
        score
    }
}

/// Profile-free fit used in general mode: entity presence is the only hint.
pub fn general_fit(entities: &Entities) -> f64 {
    if !entities.topics.is_empty() || !entities.tickers.is_empty() {
        0.8
    } else {
        0.3
    }
}

fn text_bag(headline: &str, entities: &Entities) -> String {
    let mut bag = String::with_capacity(headline.len() + 64);
    bag.push_str(headline);
    for t in &entities.topics {
        bag.push(' ');
        bag.push_str(t);
    }
    for t in &entities.tickers {
        bag.push(' ');
        bag.push_str(t);
    }
    bag.to_lowercase().replace('&', "and").replace('\u{2019}', "'")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::EntityExtractor;

    fn entities(text: &str) -> Entities {
        EntityExtractor::default_seed().extract(text)
    }

    #[test]
    fn matching_category_scores_its_weight() {
        let p = BrandProfile::default_seed();
        let s = p.fit_score("Selic sobe para 10.5%", &entities("Selic sobe para 10.5%"));
        assert!((s - 0.65).abs() < 1e-9);
    }

    #[test]
    fn multiple_categories_accumulate_and_cap_at_one() {
        let p = BrandProfile::default_seed();
        let h = "Holding familiar, sucessão e juros: hedge contra a volatilidade";
        let s = p.fit_score(h, &entities(h));
        assert!((s - 1.0).abs() < 1e-9);
    }

    #[test]
    fn negative_keyword_softens_but_never_zeroes() {
        let p = BrandProfile::default_seed();
        let h = "Herança de celebridade vira disputa";
        let s = p.fit_score(h, &entities(h));
        assert!((s - 1.0 * 0.7).abs() < 1e-9);
    }

    #[test]
    fn no_match_is_zero() {
        let p = BrandProfile::default_seed();
        assert_eq!(p.fit_score("Chuva forte na capital", &Entities::default()), 0.0);
    }

    #[test]
    fn general_mode_uses_entity_presence() {
        assert!((general_fit(&entities("Selic sobe")) - 0.8).abs() < 1e-9);
        assert!((general_fit(&Entities::default()) - 0.3).abs() < 1e-9);
    }

    #[test]
    fn parses_from_toml() {
        let toml = r#"
            negative_keywords = ["fofoca"]

            [[categories]]
            id = "macro"
            weight = 0.8
            keywords = ["juros", "selic"]
        "#;
        let p = BrandProfile::from_toml_str(toml).unwrap();
        assert_eq!(p.categories.len(), 1);
        let s = p.fit_score("Juros em alta", &Entities::default());
        assert!((s - 0.8).abs() < 1e-9);
    }
}
