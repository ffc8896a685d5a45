use super::{ExtractionProfile, FeeRule, Presence, Signature, WorkedExample};

/// Tibber 月费 (识别时常被漏掉)
pub const TIBBER_MONTHLY_FEE: f64 = 49.00;

pub static TIBBER: ExtractionProfile = ExtractionProfile {
    provider: "tibber",
    display_name: "Tibber",
    visual_cues: &[
        "black and white Tibber wordmark",
        "app-style layout with hourly consumption graph",
        "\"Tibber Norge AS\" in the footer",
    ],
    fee_rules: &[
        FeeRule {
            label: "Monthly fee",
            aliases: &["månedsavgift", "medlemskap", "membership"],
            presence: Presence::Always,
            note: "fixed 49 kr per month, often printed in small type under the summary",
        },
        FeeRule {
            label: "Pulse rental",
            aliases: &["pulse"],
            presence: Presence::IfVisible,
            note: "",
        },
        FeeRule {
            label: "Smart charging",
            aliases: &["smartlading"],
            presence: Presence::IfVisible,
            note: "",
        },
        FeeRule {
            label: "Hourly price",
            aliases: &["strøm timespris", "timespris"],
            presence: Presence::Forbidden,
            note: "pass-through hourly spot price, this is energy cost",
        },
    ],
    derivations: &[],
    examples: &[WorkedExample {
        description: "February bill with Pulse",
        fees: &[("Monthly fee", 49.00), ("Pulse rental", 39.00)],
        total_amount: 1688.20,
    }],
    signature: Signature {
        terms: &["tibber", "pulse", "smart charging", "smartlading"],
        min_hits: 1,
    },
    open_vocabulary: false,
};
