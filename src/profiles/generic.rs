use super::{ExtractionProfile, FeeRule, Presence, Signature, GENERIC_PROFILE};

/// 通用配置：常见的附加费用同义词，未列出的标签只要不在排除表中也接受
pub static GENERIC: ExtractionProfile = ExtractionProfile {
    provider: GENERIC_PROFILE,
    display_name: "an unidentified electricity supplier",
    visual_cues: &[],
    fee_rules: &[
        FeeRule {
            label: "Monthly fee",
            aliases: &["månedsbeløp", "månedsavgift", "fastbeløp", "fixed monthly", "subscription fee", "abonnement"],
            presence: Presence::IfVisible,
            note: "",
        },
        FeeRule {
            label: "Markup",
            aliases: &["påslag", "tillegg", "margin", "surcharge", "markup"],
            presence: Presence::IfVisible,
            note: "",
        },
        FeeRule {
            label: "Annual fee",
            aliases: &["årsavgift", "yearly fee"],
            presence: Presence::IfVisible,
            note: "if prorated, use the amount printed for this period",
        },
        FeeRule {
            label: "Electricity certificate",
            aliases: &["elsertifikat", "el-sertifikat"],
            presence: Presence::IfVisible,
            note: "",
        },
        FeeRule {
            label: "Guarantees of origin",
            aliases: &["opprinnelsesgaranti", "green certificate"],
            presence: Presence::IfVisible,
            note: "",
        },
        FeeRule {
            label: "Invoice fee",
            aliases: &["fakturagebyr", "papirfaktura", "paper invoice"],
            presence: Presence::IfVisible,
            note: "",
        },
        FeeRule {
            label: "Insurance",
            aliases: &["forsikring"],
            presence: Presence::IfVisible,
            note: "",
        },
        FeeRule {
            label: "Discount",
            aliases: &["rabatt"],
            presence: Presence::IfVisible,
            note: "negative amount",
        },
        FeeRule {
            label: "Grid subscription",
            aliases: &["nettleie", "fastledd", "energiledd", "kapasitetsledd", "elnät", "nätavgift", "elöverföring"],
            presence: Presence::Forbidden,
            note: "",
        },
        FeeRule {
            label: "Spot price",
            aliases: &["spotpris", "kraftpris", "innkjøpspris"],
            presence: Presence::Forbidden,
            note: "",
        },
        FeeRule {
            label: "VAT",
            aliases: &["mva", "moms", "merverdiavgift", "elavgift", "enova", "energiskatt"],
            presence: Presence::Forbidden,
            note: "",
        },
        FeeRule {
            label: "Rounding",
            aliases: &["avrunding", "øreavrunding", "öresutjämning"],
            presence: Presence::Forbidden,
            note: "",
        },
    ],
    derivations: &["If a fee line shows a yearly amount and a period amount, use the period amount printed on the bill."],
    examples: &[],
    signature: Signature {
        terms: &[],
        min_hits: 0,
    },
    open_vocabulary: true,
};
