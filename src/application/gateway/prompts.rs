//! Prompt builders for the structured gateway operations.
//!
//! Each prompt asks the model for a single JSON object so that the
//! extraction layer can locate it between the first `{` and last `}`.

use crate::domain::triage::AnalysisRequest;

const CATEGORIES: &str = "Acesso, Email, Hardware, Rede, Software, Outros";
const PRIORITIES: &str = "Low, Medium, High, Urgent";

/// Prompt for classifying a ticket.
pub fn ticket_analysis(request: &AnalysisRequest) -> String {
    format!(
        "Você é um assistente de suporte técnico. Analise o chamado abaixo e responda \
         apenas com um objeto JSON no formato \
         {{\"category\": string, \"priority\": string, \"confidence\": number, \"reasoning\": string}}.\n\
         Categorias válidas: {CATEGORIES}.\n\
         Prioridades válidas: {PRIORITIES}.\n\
         A confiança deve estar entre 0 e 1.\n\n\
         Título: {}\n\
         Descrição: {}",
        request.title.trim(),
        request.description.trim()
    )
}

/// Prompt for classifying the ticket behind a reply suggestion.
///
/// The issue type chosen by the requester is passed as a hint only; the
/// model's category decides which reply template is used.
pub fn suggestion_analysis(issue_type: &str, user_message: &str) -> String {
    format!(
        "Você é um assistente de suporte técnico. O usuário relatou um problema do tipo \
         \"{}\". Classifique a mensagem e responda apenas com um objeto JSON no formato \
         {{\"category\": string, \"priority\": string, \"confidence\": number, \"reasoning\": string}}.\n\
         Categorias válidas: {CATEGORIES}.\n\
         Prioridades válidas: {PRIORITIES}.\n\n\
         Mensagem: {}",
        issue_type.trim(),
        user_message.trim()
    )
}

/// Prompt for sentiment classification.
pub fn sentiment(message: &str) -> String {
    format!(
        "Classifique o sentimento da mensagem abaixo e responda apenas com um objeto JSON \
         no formato {{\"sentiment\": \"positive\" | \"neutral\" | \"negative\", \
         \"confidence\": number, \"reasoning\": string}}.\n\n\
         Mensagem: {}",
        message.trim()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn analysis_prompt_embeds_ticket_and_schema() {
        let prompt = ticket_analysis(&AnalysisRequest::new("  Impressora  ", "não imprime"));
        assert!(prompt.contains("Título: Impressora\n"));
        assert!(prompt.contains("Descrição: não imprime"));
        assert!(prompt.contains("\"category\""));
        assert!(prompt.contains("Urgent"));
    }

    #[test]
    fn suggestion_prompt_mentions_issue_type() {
        let prompt = suggestion_analysis("Rede", "sem internet");
        assert!(prompt.contains("\"Rede\""));
        assert!(prompt.contains("sem internet"));
    }

    #[test]
    fn sentiment_prompt_lists_labels() {
        let prompt = sentiment("obrigado!");
        assert!(prompt.contains("negative"));
        assert!(prompt.ends_with("obrigado!"));
    }
}
