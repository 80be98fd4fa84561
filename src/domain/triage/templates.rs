//! Canned replies keyed by issue type.

use super::fallback;

const ACCESS_REPLY: &str = "Olá! Vamos ajudar a recuperar seu acesso. Tente redefinir a senha pelo portal de autoatendimento; se o bloqueio persistir, nossa equipe fará a liberação manual da sua conta.";
const EMAIL_REPLY: &str = "Olá! Verifique se a caixa de entrada não está cheia e se o cliente de e-mail está conectado. Caso o problema continue, envie um print da mensagem de erro para analisarmos.";
const HARDWARE_REPLY: &str = "Olá! Confira se o equipamento está ligado na energia e com os cabos bem conectados, e tente reiniciá-lo. Se não resolver, um técnico irá até o seu local.";
const NETWORK_REPLY: &str = "Olá! Reinicie o roteador ou reconecte-se à rede e, se usar VPN, desconecte e conecte novamente. Se a instabilidade continuar, informe o local e o horário para investigarmos.";
const SOFTWARE_REPLY: &str = "Olá! Feche e abra novamente o programa e verifique se há atualizações pendentes. Se o erro persistir, informe a mensagem exibida para que possamos corrigir.";
const GENERIC_REPLY: &str = "Olá! Recebemos sua solicitação e nossa equipe já está analisando. Retornaremos em breve com uma solução.";

/// Reasoning attached to template-based suggestions.
pub const TEMPLATE_REASONING: &str = "Sugestão baseada em modelo pré-definido para o tipo de problema";

/// Confidence attached to template-based suggestions.
pub const TEMPLATE_CONFIDENCE: f64 = 0.5;

fn reply_for_category(category: &str) -> Option<&'static str> {
    match category.trim().to_lowercase().as_str() {
        "acesso" | "access" | "autenticação" => Some(ACCESS_REPLY),
        "email" | "e-mail" => Some(EMAIL_REPLY),
        "hardware" => Some(HARDWARE_REPLY),
        "rede" | "network" => Some(NETWORK_REPLY),
        "software" => Some(SOFTWARE_REPLY),
        _ => None,
    }
}

/// Reply for an issue type or category label.
///
/// Exact category names match first; otherwise the label is run through
/// the keyword rules, and anything still unknown gets the generic reply.
pub fn reply_for(issue_type: &str) -> &'static str {
    reply_for_category(issue_type)
        .or_else(|| fallback::category_for(&issue_type.to_lowercase()).and_then(reply_for_category))
        .unwrap_or(GENERIC_REPLY)
}

/// Wraps a reply with the analysis confidence and reasoning.
pub fn with_analysis_echo(reply: &str, confidence: f64, reasoning: &str) -> String {
    format!(
        "{}\n\nConfiança da análise: {:.0}%. {}",
        reply,
        confidence * 100.0,
        reasoning
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_category_names_match() {
        assert_eq!(reply_for("Hardware"), HARDWARE_REPLY);
        assert_eq!(reply_for("rede"), NETWORK_REPLY);
        assert_eq!(reply_for("Acesso"), ACCESS_REPLY);
    }

    #[test]
    fn free_text_issue_types_use_keyword_rules() {
        assert_eq!(reply_for("Impressora travada"), HARDWARE_REPLY);
        assert_eq!(reply_for("problema com outlook"), EMAIL_REPLY);
    }

    #[test]
    fn unknown_issue_type_gets_generic_reply() {
        assert_eq!(reply_for("Financeiro"), GENERIC_REPLY);
        assert_eq!(reply_for(""), GENERIC_REPLY);
    }

    #[test]
    fn echo_includes_confidence_and_reasoning() {
        let text = with_analysis_echo("Olá!", 0.87, "impressora sem toner");
        assert!(text.starts_with("Olá!"));
        assert!(text.contains("87%"));
        assert!(text.ends_with("impressora sem toner"));
    }
}
