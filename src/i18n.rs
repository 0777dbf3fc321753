// ==========================================
// Internationalization (i18n) module
// ==========================================
// Uses the rust-i18n crate
// Supports Brazilian Portuguese (default) and English
// ==========================================
// Note: the rust_i18n::i18n! macro is initialized in lib.rs
// ==========================================

/// Current locale code.
pub fn current_locale() -> String {
    rust_i18n::locale().to_string()
}

/// Switch locale ("pt-BR" or "en").
pub fn set_locale(locale: &str) {
    rust_i18n::set_locale(locale);
}

/// Translate a message without arguments.
///
/// # Example
/// ```no_run
/// use sales_csv_recon::i18n::t;
/// let msg = t("import.stage.done");
/// ```
pub fn t(key: &str) -> String {
    rust_i18n::t!(key).to_string()
}

/// Translate a message with `%{name}` placeholders.
///
/// # Example
/// ```no_run
/// use sales_csv_recon::i18n::t_with_args;
/// let msg = t_with_args("import.error.row_count", &[("count", "3")]);
/// ```
pub fn t_with_args(key: &str, args: &[(&str, &str)]) -> String {
    let mut result = rust_i18n::t!(key).to_string();
    for (k, v) in args {
        let placeholder = format!("%{{{}}}", k);
        result = result.replace(&placeholder, v);
    }
    result
}
