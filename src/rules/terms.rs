//! 禁止出现在附加费用中的术语表 (税费、电网费、现货电价、舍入调整)

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref TAX_PATTERN: Regex = Regex::new(
        r"(?i)\b(vat|mva|moms|tax|taxes|merverdiavgift|elavgift|elafgift|forbruksavgift|energiskatt|elskatt|consumption levy|electricity levy|enova\w*|strømstøtte|electricity support|power subsidy)\b"
    )
    .expect("tax pattern");
    static ref GRID_PATTERN: Regex = Regex::new(
        r"(?i)\b(grid|nettleie\w*|nettabonnement|nettariff\w*|elnät\w*|nätavgift\w*|nätabonnemang|elöverföring|network|distribution|fastledd|energiledd|kapasitetsledd|capacity charge|transmission)\b"
    )
    .expect("grid pattern");
    static ref SPOT_PATTERN: Regex = Regex::new(
        r"(?i)(\bspot\s*price|\bspotpris|\bnord\s*pool|\bkraftpris|\bstrømpris|\benergy\s+price|\bbase\s+price|\bwholesale\s+price|\btimespris)"
    )
    .expect("spot pattern");
    static ref ROUNDING_PATTERN: Regex = Regex::new(
        r"(?i)\b(rounding|rounding adjustment|avrunding|øreavrunding|öresavrundning|öresutjämning)\b"
    )
    .expect("rounding pattern");
}

/// 禁止术语类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TermCategory {
    Tax,
    GridCharge,
    SpotPrice,
    Rounding,
}

impl TermCategory {
    pub const ALL: [TermCategory; 4] = [
        TermCategory::Tax,
        TermCategory::GridCharge,
        TermCategory::SpotPrice,
        TermCategory::Rounding,
    ];

    fn pattern(&self) -> &'static Regex {
        match self {
            TermCategory::Tax => &TAX_PATTERN,
            TermCategory::GridCharge => &GRID_PATTERN,
            TermCategory::SpotPrice => &SPOT_PATTERN,
            TermCategory::Rounding => &ROUNDING_PATTERN,
        }
    }

    pub fn matches(&self, label: &str) -> bool {
        self.pattern().is_match(label)
    }

    pub fn describe(&self) -> &'static str {
        match self {
            TermCategory::Tax => "tax, VAT and public levies",
            TermCategory::GridCharge => "grid / network subscription and usage charges",
            TermCategory::SpotPrice => "base commodity (spot) energy price",
            TermCategory::Rounding => "rounding adjustments",
        }
    }
}

/// 返回标签命中的第一个禁止类别
pub fn forbidden_category(label: &str) -> Option<TermCategory> {
    TermCategory::ALL.into_iter().find(|c| c.matches(label))
}

pub fn is_forbidden(label: &str) -> bool {
    forbidden_category(label).is_some()
}
