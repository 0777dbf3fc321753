// ==========================================
// CRM Sales Reconciliation - Field Parsers
// ==========================================
// Responsibility: locale-aware numeric and date parsing plus the vendor
// status table
// Contract: parsers are lenient - monetary fields fall back to 0.0, dates
// to None, statuses to the raw value upper-cased; nothing here ever errors
// ==========================================

use crate::importer::normalize::normalize_label;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Parse a Brazilian-locale monetary cell.
///
/// Strips currency symbols and whitespace, drops `.` thousands separators,
/// turns `,` into the decimal point. Returns 0.0 on anything unparseable:
/// most monetary fields are optional and zero is the safe default for the
/// summation logic downstream.
pub fn parse_money(raw: &str) -> f64 {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == ',' || *c == '.' || *c == '-')
        .collect();

    let normalized = cleaned.replace('.', "").replace(',', ".");
    normalized.parse::<f64>().unwrap_or(0.0)
}

/// Parse an exchange-rate cell; absent or unparseable rates fall back to
/// 1.0, never 0.0 (a zero rate would zero out every converted amount).
pub fn parse_exchange_rate(raw: Option<&str>) -> f64 {
    match raw {
        None => 1.0,
        Some(v) => {
            let rate = parse_money(v);
            if rate > 0.0 {
                rate
            } else {
                1.0
            }
        }
    }
}

// Date patterns, tried in order; the first match wins. Day/month/year comes
// first because that is the vendor's primary encoding.
const DATETIME_PATTERNS: [&str; 4] = [
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
];
const DATE_PATTERNS: [&str; 2] = ["%d/%m/%Y", "%Y-%m-%d"];

/// Parse a date cell; time components default to zero when absent.
/// Returns None when nothing matches - never an error.
pub fn parse_date_flexible(raw: &str) -> Option<DateTime<Utc>> {
    let value = raw.trim();
    if value.is_empty() {
        return None;
    }

    for pattern in DATETIME_PATTERNS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, pattern) {
            return Some(DateTime::<Utc>::from_naive_utc_and_offset(dt, Utc));
        }
    }

    for pattern in DATE_PATTERNS {
        if let Ok(date) = NaiveDate::parse_from_str(value, pattern) {
            let dt = date.and_hms_opt(0, 0, 0)?;
            return Some(DateTime::<Utc>::from_naive_utc_and_offset(dt, Utc));
        }
    }

    None
}

/// Parse a date cell down to a calendar date (payout metadata).
pub fn parse_date_only(raw: &str) -> Option<NaiveDate> {
    parse_date_flexible(raw).map(|dt| dt.date_naive())
}

/// Parse an installment-count cell.
pub fn parse_installments(raw: &str) -> Option<u32> {
    raw.trim().parse::<u32>().ok()
}

/// Normalize a vendor status string to the canonical status vocabulary.
///
/// Unknown statuses fall back to the raw value upper-cased, so no status is
/// ever silently dropped.
pub fn normalize_status(raw: &str) -> String {
    let canonical = match normalize_label(raw).as_str() {
        "aprovado" | "aprovada" | "compra aprovada" | "approved" | "completo" | "complete"
        | "completed" => "APPROVED",
        "cancelado" | "cancelada" | "compra cancelada" | "canceled" | "cancelled" => "CANCELED",
        "reembolsado" | "reembolsada" | "reembolso" | "refunded" | "refund" => "REFUNDED",
        "expirado" | "expirada" | "expired" => "EXPIRED",
        "pendente" | "pending" | "aguardando pagamento" | "waiting payment" => "PENDING",
        "em disputa" | "disputa" | "dispute" | "disputed" => "DISPUTED",
        "atrasado" | "atrasada" | "vencido" | "vencida" | "overdue" | "past due" => "OVERDUE",
        "chargeback" | "estorno" | "estornado" => "CHARGEBACK",
        _ => return raw.trim().to_uppercase(),
    };
    canonical.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_parse_money_brazilian_format() {
        assert_eq!(parse_money("R$ 1.234,56"), 1234.56);
        assert_eq!(parse_money("1.234,56"), 1234.56);
        assert_eq!(parse_money("47,90"), 47.9);
    }

    #[test]
    fn test_parse_money_lenient_defaults() {
        assert_eq!(parse_money(""), 0.0);
        assert_eq!(parse_money("abc"), 0.0);
        assert_eq!(parse_money("R$ "), 0.0);
    }

    #[test]
    fn test_parse_exchange_rate_defaults_to_one() {
        assert_eq!(parse_exchange_rate(None), 1.0);
        assert_eq!(parse_exchange_rate(Some("")), 1.0);
        assert_eq!(parse_exchange_rate(Some("5,12")), 5.12);
    }

    #[test]
    fn test_parse_date_day_month_year_with_time() {
        let dt = parse_date_flexible("01/02/2024 10:30:00").unwrap();
        assert_eq!((dt.day(), dt.month(), dt.year()), (1, 2, 2024));
        assert_eq!((dt.hour(), dt.minute(), dt.second()), (10, 30, 0));
    }

    #[test]
    fn test_parse_date_bare_day_month_year() {
        let dt = parse_date_flexible("01/02/2024").unwrap();
        assert_eq!((dt.day(), dt.month(), dt.year()), (1, 2, 2024));
        assert_eq!(dt.hour(), 0);
    }

    #[test]
    fn test_parse_date_iso() {
        let dt = parse_date_flexible("2024-02-01").unwrap();
        assert_eq!((dt.day(), dt.month(), dt.year()), (1, 2, 2024));
        assert_eq!((dt.hour(), dt.minute(), dt.second()), (0, 0, 0));
    }

    #[test]
    fn test_parse_date_unparseable_is_none() {
        assert_eq!(parse_date_flexible("amanhã"), None);
        assert_eq!(parse_date_flexible(""), None);
        assert_eq!(parse_date_flexible("32/13/2024"), None);
    }

    #[test]
    fn test_normalize_status_portuguese_and_english() {
        assert_eq!(normalize_status("Aprovado"), "APPROVED");
        assert_eq!(normalize_status("approved"), "APPROVED");
        assert_eq!(normalize_status("Cancelada"), "CANCELED");
        assert_eq!(normalize_status("Reembolsado"), "REFUNDED");
        assert_eq!(normalize_status("Em disputa"), "DISPUTED");
        assert_eq!(normalize_status("Aguardando Pagamento"), "PENDING");
        assert_eq!(normalize_status("chargeback"), "CHARGEBACK");
    }

    #[test]
    fn test_normalize_status_unknown_falls_back_uppercased() {
        assert_eq!(normalize_status("em análise"), "EM ANÁLISE");
    }

    #[test]
    fn test_parse_installments() {
        assert_eq!(parse_installments("12"), Some(12));
        assert_eq!(parse_installments("x"), None);
    }
}
