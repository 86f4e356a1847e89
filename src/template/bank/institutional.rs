//! FII/DII institutional flow commentary templates.

use crate::template::types::TemplateDef;

pub(super) const TEMPLATES: &[TemplateDef] = &[
    TemplateDef {
        name: "FII_Buying",
        instruction: "Analyze FII flow: bought ₹{{ fii_buy }}Cr, DII sold ₹{{ dii_sell }}Cr on {{ date }}",
        response: "FII net buying of ₹{{ fii_buy }}Cr vs DII selling of ₹{{ dii_sell }}Cr indicates foreign institutional interest. Net flow: +₹{{ net_flow }}Cr. Sentiment: {{ sentiment }}. Typically supports {{ market_action }}. Sectors: {{ sectors }}. Watch for continuation if FII buying sustains 3+ days. Reversal risk if DIIs turn buyers or FII flow reverses.",
    },
    TemplateDef {
        name: "DII_Support",
        instruction: "Interpret DII buying ₹{{ dii_buy }}Cr, FII selling ₹{{ fii_sell }}Cr",
        response: "DII buying ₹{{ dii_buy }}Cr absorbing FII selling of ₹{{ fii_sell }}Cr shows domestic institutional support. Net: {{ net_flow }}Cr. This often stabilizes markets during FII outflows. Sentiment: {{ sentiment }}. Suggests {{ market_action }}. DIIs typically support large-caps and PSUs. Monitor if FII selling accelerates beyond DII capacity.",
    },
    TemplateDef {
        name: "Dual_Selling",
        instruction: "Assess both FII sold ₹{{ fii_sell }}Cr and DII sold ₹{{ dii_sell }}Cr",
        response: "Combined institutional selling: FII -₹{{ fii_sell }}Cr, DII -₹{{ dii_sell }}Cr. Total outflow: ₹{{ total_outflow }}Cr. Sentiment: {{ sentiment }}. Indicates {{ market_action }}. Retail unlikely to absorb this pressure. Expect volatility and downside. Look for support at key levels. Reversal needs institutional flow to turn positive.",
    },
    TemplateDef {
        name: "Dual_Buying",
        instruction: "Evaluate FII bought ₹{{ fii_buy }}Cr, DII bought ₹{{ dii_buy }}Cr",
        response: "Strong institutional buying: FII +₹{{ fii_buy }}Cr, DII +₹{{ dii_buy }}Cr. Total inflow: ₹{{ total_inflow }}Cr. Sentiment: {{ sentiment }}. Signals {{ market_action }}. Broad-based rally likely across sectors. Momentum can sustain with continued flows. Entry: on pullbacks. Exit: if flows reverse or diverge.",
    },
    TemplateDef {
        name: "Mixed_Flow",
        instruction: "Analyze mixed flow: FII {{ fii_action }} ₹{{ fii_amt }}Cr, DII {{ dii_action }} ₹{{ dii_amt }}Cr on {{ sector }} sector",
        response: "{{ sector }} sector flows: FII {{ fii_action }} ₹{{ fii_amt }}Cr, DII {{ dii_action }} ₹{{ dii_amt }}Cr. Net: ₹{{ net_flow }}Cr. Sentiment: {{ sentiment }}. Divergence suggests {{ market_action }}. FII prefer growth/momentum, DII prefer value/defensives. Sector rotation likely. Watch for convergence or acceleration in one direction.",
    },
];
