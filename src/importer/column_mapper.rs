// ==========================================
// CRM Sales Reconciliation - Column Mapper
// ==========================================
// Responsibility: detected headers -> column-index map onto the canonical
// field set, through a static synonym table of localized vendor variants
// Contract: transaction_id is the only mandatory field; its absence is a
// terminal validation failure raised by the caller before row processing
// ==========================================

use crate::importer::normalize::normalize_label;
use std::collections::HashMap;

// ==========================================
// CanonicalField - the fixed target schema
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CanonicalField {
    TransactionId,
    Status,
    BuyerEmail,
    BuyerName,
    BuyerPhoneDdd,
    BuyerPhone,
    BuyerDocument,
    BuyerInstagram,
    ProductName,
    OfferCode,
    GrossValue,
    PlatformFee,
    AffiliateCommission,
    CoproducerCommission,
    Taxes,
    NetValue,
    Currency,
    ExchangeRate,
    PaymentMethod,
    Installments,
    PayoutDate,
    OrderDate,
    ConfirmationDate,
}

// Synonym table. Every entry is pre-normalized (lowercase, no diacritics,
// single spaces); headers are normalized the same way before lookup.
// Vendor-specific and localized variants all collapse onto one canonical
// field, e.g. "comissao" / "voce recebeu" / "valor liquido" -> NetValue.
const SYNONYMS: &[(CanonicalField, &[&str])] = &[
    (
        CanonicalField::TransactionId,
        &[
            "transacao",
            "codigo da transacao",
            "codigo de transacao",
            "id da transacao",
            "transaction",
            "transaction id",
            "transaction code",
        ],
    ),
    (
        CanonicalField::Status,
        &["status", "status da compra", "situacao", "purchase status"],
    ),
    (
        CanonicalField::BuyerEmail,
        &["email", "e mail", "email do comprador", "buyer email"],
    ),
    (
        CanonicalField::BuyerName,
        &[
            "nome do comprador",
            "comprador",
            "nome",
            "nome do cliente",
            "cliente",
            "buyer name",
        ],
    ),
    (
        CanonicalField::BuyerPhoneDdd,
        &["ddd", "ddd do comprador", "ddd do telefone"],
    ),
    (
        CanonicalField::BuyerPhone,
        &[
            "telefone",
            "telefone do comprador",
            "celular",
            "numero de telefone",
            "phone",
        ],
    ),
    (
        CanonicalField::BuyerDocument,
        &[
            "documento",
            "cpf",
            "cpf cnpj",
            "documento do comprador",
            "document",
        ],
    ),
    (
        CanonicalField::BuyerInstagram,
        &["instagram", "instagram do comprador"],
    ),
    (
        CanonicalField::ProductName,
        &["produto", "nome do produto", "product", "product name"],
    ),
    (
        CanonicalField::OfferCode,
        &["oferta", "codigo da oferta", "codigo de oferta", "offer code"],
    ),
    (
        CanonicalField::GrossValue,
        &[
            "valor total",
            "preco total",
            "valor da compra",
            "valor bruto",
            "total value",
            "purchase price",
        ],
    ),
    (
        CanonicalField::PlatformFee,
        &[
            "taxa hotmart",
            "taxas hotmart",
            "taxa da plataforma",
            "platform fee",
        ],
    ),
    (
        CanonicalField::AffiliateCommission,
        &[
            "comissao do afiliado",
            "comissoes de afiliados",
            "afiliado",
            "affiliate commission",
        ],
    ),
    (
        CanonicalField::CoproducerCommission,
        &[
            "comissao do coprodutor",
            "comissoes de coprodutores",
            "coprodutor",
            "coproducer commission",
        ],
    ),
    (
        CanonicalField::Taxes,
        &["impostos", "imposto", "impostos locais", "taxes", "local taxes"],
    ),
    (
        CanonicalField::NetValue,
        &[
            "comissao",
            "voce recebeu",
            "valor liquido",
            "sua comissao",
            "net value",
            "my commission",
        ],
    ),
    (
        CanonicalField::Currency,
        &["moeda", "moeda da compra", "currency", "purchase currency"],
    ),
    (
        CanonicalField::ExchangeRate,
        &["cotacao", "taxa de cambio", "cambio", "exchange rate"],
    ),
    (
        CanonicalField::PaymentMethod,
        &[
            "forma de pagamento",
            "metodo de pagamento",
            "meio de pagamento",
            "payment method",
            "payment type",
        ],
    ),
    (
        CanonicalField::Installments,
        &[
            "parcelas",
            "numero de parcelas",
            "qtd parcelas",
            "installments",
            "number of installments",
        ],
    ),
    (
        CanonicalField::PayoutDate,
        &["data de repasse", "repasse", "payout date"],
    ),
    (
        CanonicalField::OrderDate,
        &[
            "data da transacao",
            "data do pedido",
            "data da compra",
            "data",
            "order date",
            "transaction date",
        ],
    ),
    (
        CanonicalField::ConfirmationDate,
        &[
            "data de confirmacao",
            "data da confirmacao do pagamento",
            "data de aprovacao",
            "confirmation date",
        ],
    ),
];

fn lookup_synonym(normalized_header: &str) -> Option<CanonicalField> {
    for (field, variants) in SYNONYMS {
        if variants.contains(&normalized_header) {
            return Some(*field);
        }
    }
    None
}

// ==========================================
// ColumnMap - index -> canonical field
// ==========================================
#[derive(Debug, Clone)]
pub struct ColumnMap {
    by_field: HashMap<CanonicalField, usize>,
}

impl ColumnMap {
    /// Build the map from the detected header row. Unknown headers are
    /// ignored; when two columns map to the same field the first wins.
    pub fn resolve(headers: &[String]) -> Self {
        let mut by_field = HashMap::new();
        for (idx, header) in headers.iter().enumerate() {
            if let Some(field) = lookup_synonym(&normalize_label(header)) {
                by_field.entry(field).or_insert(idx);
            }
        }
        Self { by_field }
    }

    pub fn has(&self, field: CanonicalField) -> bool {
        self.by_field.contains_key(&field)
    }

    /// The raw cell for a canonical field, or None when the column is absent
    /// or the row is too short.
    pub fn value<'r>(&self, row: &'r [String], field: CanonicalField) -> Option<&'r str> {
        self.by_field
            .get(&field)
            .and_then(|idx| row.get(*idx))
            .map(|s| s.as_str())
    }

    /// Number of recognized columns.
    pub fn mapped_columns(&self) -> usize {
        self.by_field.len()
    }
}
