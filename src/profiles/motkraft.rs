use super::{ExtractionProfile, FeeRule, Presence, Signature, WorkedExample};

pub static MOTKRAFT: ExtractionProfile = ExtractionProfile {
    provider: "motkraft",
    display_name: "Motkraft",
    visual_cues: &[
        "green Motkraft logo",
        "\"innkjøpspris\" wording on the price summary",
    ],
    fee_rules: &[
        FeeRule {
            label: "Motkraft subscription",
            aliases: &["abonnement", "subscription"],
            presence: Presence::Always,
            note: "",
        },
        FeeRule {
            label: "Climate contribution",
            aliases: &["klimabidrag"],
            presence: Presence::IfVisible,
            note: "per-kWh contribution; use the line amount",
        },
        FeeRule {
            label: "Purchase price",
            aliases: &["innkjøpspris"],
            presence: Presence::Forbidden,
            note: "spot price passed through at cost, this is energy cost",
        },
    ],
    derivations: &[],
    examples: &[WorkedExample {
        description: "March bill",
        fees: &[("Motkraft subscription", 39.00), ("Climate contribution", 11.60)],
        total_amount: 1897.40,
    }],
    signature: Signature {
        terms: &["motkraft", "climate contribution", "klimabidrag"],
        min_hits: 1,
    },
    open_vocabulary: false,
};
