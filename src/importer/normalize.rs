// ==========================================
// CRM Sales Reconciliation - Header/Text Normalization
// ==========================================
// Responsibility: TRIM / lowercase / diacritics fold / separator collapse,
// shared by the format detector, the column mapper and the status table
// ==========================================

/// Fold one already-lowercased character to its unaccented form.
///
/// The vocabulary is the closed pt/es/en header set of the supported export
/// family, so a fixed table is enough.
fn fold_diacritic(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'ç' => 'c',
        'ñ' => 'n',
        _ => c,
    }
}

/// Normalize a header or status cell for table lookup:
/// lowercase, strip diacritics, collapse every separator run (spaces,
/// punctuation, underscores...) into a single space, trim the ends.
pub fn normalize_label(raw: &str) -> String {
    let folded: String = raw
        .to_lowercase()
        .chars()
        .map(fold_diacritic)
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();

    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_label_diacritics() {
        assert_eq!(normalize_label("Transação"), "transacao");
        assert_eq!(normalize_label("Comissão"), "comissao");
        assert_eq!(normalize_label("Código da Transação"), "codigo da transacao");
    }

    #[test]
    fn test_normalize_label_separator_collapse() {
        assert_eq!(normalize_label("Valor__Total  (R$)"), "valor total r");
        assert_eq!(normalize_label("forma-de-pagamento"), "forma de pagamento");
    }

    #[test]
    fn test_normalize_label_trim() {
        assert_eq!(normalize_label("  Email  "), "email");
    }
}
