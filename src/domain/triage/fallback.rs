//! Keyword classifier used whenever the remote model is unavailable.
//!
//! Pure and allocation-light: no I/O, no shared state. Keeps triage
//! working when the API key is missing or the breaker is open.

use super::values::{
    AnalysisRequest, AnalysisResult, Priority, Sentiment, SentimentResult, DEFAULT_CATEGORY,
};

/// Ordered keyword groups; the first group with a hit wins.
const CATEGORY_RULES: &[(&str, &[&str])] = &[
    (
        "Acesso",
        &[
            "senha", "login", "acesso", "autenticação", "autenticacao", "bloqueado", "password",
            "credencial", "credenciais",
        ],
    ),
    ("Email", &["email", "e-mail", "outlook", "caixa de entrada", "anexo"]),
    (
        "Hardware",
        &["impressora", "computador", "notebook", "monitor", "teclado", "mouse", "hardware", "tela"],
    ),
    ("Rede", &["rede", "internet", "wifi", "wi-fi", "conexão", "conexao", "vpn"]),
    (
        "Software",
        &["sistema", "software", "programa", "aplicativo", "instalar", "atualização", "licença"],
    ),
];

const URGENT_KEYWORDS: &[&str] = &["urgente", "crítico", "critico", "emergência", "parado", "produção parada"];
const HIGH_KEYWORDS: &[&str] = &["importante", "prioridade", "grave", "não consigo", "nao consigo"];
const LOW_KEYWORDS: &[&str] = &["quando possível", "quando possivel", "sem pressa", "dúvida", "duvida"];

const NEGATIVE_KEYWORDS: &[&str] = &[
    "péssimo", "pessimo", "horrível", "horrivel", "absurdo", "irritado", "frustrado", "raiva",
    "insatisfeito", "demorando", "demorado", "demorou", "muita demora",
];
const GRATITUDE_KEYWORDS: &[&str] = &["obrigado", "obrigada", "agradeço", "agradeco", "grato", "excelente", "ótimo"];

/// Confidence reported when a category keyword matched.
const MATCHED_CONFIDENCE: f64 = 0.7;
/// Confidence reported when nothing matched and the defaults were used.
const UNMATCHED_CONFIDENCE: f64 = 0.4;

pub const FALLBACK_REASONING: &str =
    "Classificação por palavras-chave (serviço de IA indisponível)";

/// A keyword hits only where it starts a word, so "rede" never matches
/// inside "credenciais" while plurals like "impressoras" still do.
fn contains_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|keyword| {
        text.match_indices(keyword).any(|(start, _)| {
            text[..start]
                .chars()
                .next_back()
                .map_or(true, |previous| !previous.is_alphanumeric())
        })
    })
}

/// Category for lowercased text, or `None` when no group matches.
pub fn category_for(text: &str) -> Option<&'static str> {
    CATEGORY_RULES
        .iter()
        .find(|(_, keywords)| contains_any(text, keywords))
        .map(|(category, _)| *category)
}

/// Priority for lowercased text.
pub fn priority_for(text: &str) -> Priority {
    if contains_any(text, URGENT_KEYWORDS) {
        Priority::Urgent
    } else if contains_any(text, HIGH_KEYWORDS) {
        Priority::High
    } else if contains_any(text, LOW_KEYWORDS) {
        Priority::Low
    } else {
        Priority::Medium
    }
}

/// Sentiment for lowercased text.
pub fn sentiment_for(text: &str) -> Sentiment {
    if contains_any(text, NEGATIVE_KEYWORDS) {
        Sentiment::Negative
    } else if contains_any(text, GRATITUDE_KEYWORDS) {
        Sentiment::Positive
    } else {
        Sentiment::Neutral
    }
}

/// Best-effort triage of a ticket without the remote model.
pub fn classify(request: &AnalysisRequest) -> AnalysisResult {
    let text = request.searchable_text();
    let (category, confidence) = match category_for(&text) {
        Some(category) => (category, MATCHED_CONFIDENCE),
        None => (DEFAULT_CATEGORY, UNMATCHED_CONFIDENCE),
    };

    AnalysisResult::new(category, priority_for(&text), confidence, FALLBACK_REASONING)
}

/// Best-effort sentiment of a message without the remote model.
pub fn analyze_sentiment(message: &str) -> SentimentResult {
    let sentiment = sentiment_for(&message.to_lowercase());
    let confidence = match sentiment {
        Sentiment::Neutral => UNMATCHED_CONFIDENCE,
        _ => MATCHED_CONFIDENCE,
    };
    SentimentResult::new(sentiment, confidence, FALLBACK_REASONING)
}
