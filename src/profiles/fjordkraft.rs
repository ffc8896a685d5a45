use super::{ExtractionProfile, FeeRule, Presence, Signature, WorkedExample};

pub static FJORDKRAFT: ExtractionProfile = ExtractionProfile {
    provider: "fjordkraft",
    display_name: "Fjordkraft",
    visual_cues: &[
        "orange and white Fjordkraft logo in the header",
        "\"Fjordkraft AS\" and org.nr 976 944 801 in the footer",
        "line items \"Variabelt påslag\" and \"Fastbeløp\"",
    ],
    fee_rules: &[
        FeeRule {
            label: "Variable cost",
            aliases: &["variabelt påslag", "påslag per kwh"],
            presence: Presence::Always,
            note: "per-kWh supplier markup; use the line amount, not the unit price",
        },
        FeeRule {
            label: "Fixed markup",
            aliases: &["fastbeløp", "fast påslag"],
            presence: Presence::Always,
            note: "",
        },
        FeeRule {
            label: "Annual fee",
            aliases: &["årsavgift", "årsbeløp"],
            presence: Presence::IfVisible,
            note: "prorated for the billing period",
        },
        FeeRule {
            label: "Electricity certificate",
            aliases: &["elsertifikat", "el-sertifikat"],
            presence: Presence::IfVisible,
            note: "",
        },
        FeeRule {
            label: "Guarantees of origin",
            aliases: &["opprinnelsesgaranti"],
            presence: Presence::IfVisible,
            note: "",
        },
        FeeRule {
            label: "Spot price",
            aliases: &["spotpris", "strøm spot"],
            presence: Presence::Forbidden,
            note: "this is the base energy cost",
        },
        FeeRule {
            label: "Power support",
            aliases: &["strømstøtte"],
            presence: Presence::Forbidden,
            note: "government subsidy, not a supplier fee",
        },
    ],
    derivations: &[
        "The annual fee line reads like \"Årsavgift 468 kr/år: 39,90\". Use the post-colon value; never recompute by dividing the annual amount yourself.",
        "\"Variabelt påslag\" lists kWh x øre/kWh followed by the amount; use the amount.",
    ],
    examples: &[WorkedExample {
        description: "January bill, 2 540 kWh",
        fees: &[
            ("Variable cost", 212.40),
            ("Fixed markup", 98.50),
            ("Annual fee", 39.90),
            ("Electricity certificate", 32.89),
        ],
        total_amount: 3817.00,
    }],
    signature: Signature {
        terms: &[
            "variable cost",
            "variabelt påslag",
            "fixed markup",
            "fastbeløp",
            "annual fee",
            "årsavgift",
        ],
        min_hits: 2,
    },
    open_vocabulary: false,
};
