// ==========================================
// CRM Sales Reconciliation - Tokenizer
// ==========================================
// Responsibility: raw file text -> ordered rows of trimmed string fields
// Contract: quote-aware state machine; comma and semicolon both separate
// fields outside quotes; "" inside quotes is an escaped literal quote;
// malformed quoting degrades gracefully and never raises an error
// ==========================================

/// Tokenize raw export text into rows of fields.
///
/// Rules:
/// - `,` and `;` are field separators outside quotes
/// - `\n` and `\r\n` end a row outside quotes
/// - inside quotes, `""` is a literal quote; a lone quote closes the field
/// - an unmatched quote swallows the rest of the text into the open field,
///   which is the graceful-degradation behavior for malformed input
/// - every field is trimmed; rows whose fields are all empty are dropped
pub fn tokenize(text: &str) -> Vec<Vec<String>> {
    let mut rows: Vec<Vec<String>> = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;

    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' => {
                    if chars.peek() == Some(&'"') {
                        // escaped literal quote
                        chars.next();
                        field.push('"');
                    } else {
                        in_quotes = false;
                    }
                }
                _ => field.push(c),
            }
            continue;
        }

        match c {
            '"' => in_quotes = true,
            ',' | ';' => {
                row.push(field.trim().to_string());
                field.clear();
            }
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                end_row(&mut rows, &mut row, &mut field);
            }
            '\n' => end_row(&mut rows, &mut row, &mut field),
            _ => field.push(c),
        }
    }

    // flush the last row (also covers an unmatched open quote at EOF)
    end_row(&mut rows, &mut row, &mut field);

    rows
}

fn end_row(rows: &mut Vec<Vec<String>>, row: &mut Vec<String>, field: &mut String) {
    row.push(field.trim().to_string());
    field.clear();

    if row.iter().any(|f| !f.is_empty()) {
        rows.push(std::mem::take(row));
    } else {
        row.clear();
    }
}
