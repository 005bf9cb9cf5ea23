use handlebars::Handlebars;
use std::sync::Arc;

pub type Hbs = Arc<Handlebars<'static>>;

// Compiled in so the binary and the tests do not depend on the working directory.
const TEMPLATES: &[(&str, &str)] = &[
    ("layouts/base", include_str!("../../templates/layouts/base.hbs")),
    ("pages/home", include_str!("../../templates/pages/home.hbs")),
    ("pages/not_found", include_str!("../../templates/pages/not_found.hbs")),
    ("pages/marketplace", include_str!("../../templates/pages/marketplace.hbs")),
    ("partials/order_table", include_str!("../../templates/partials/order_table.hbs")),
    ("partials/wallet_panel", include_str!("../../templates/partials/wallet_panel.hbs")),
    ("partials/price_band", include_str!("../../templates/partials/price_band.hbs")),
    ("partials/liquidity_stats", include_str!("../../templates/partials/liquidity_stats.hbs")),
];

const PARTIALS: &[(&str, &str)] = &[
    ("order_table", include_str!("../../templates/partials/order_table.hbs")),
    ("liquidity_stats", include_str!("../../templates/partials/liquidity_stats.hbs")),
    ("depth_panel", include_str!("../../templates/partials/depth_panel.hbs")),
    ("price_chart", include_str!("../../templates/partials/price_chart.hbs")),
];

pub fn build_handlebars() -> Hbs {
    let mut hb = Handlebars::new();

    for (name, src) in TEMPLATES {
        hb.register_template_string(name, src)
            .unwrap_or_else(|e| panic!("template {name}: {e}"));
    }

    for (name, src) in PARTIALS {
        hb.register_partial(name, src)
            .unwrap_or_else(|e| panic!("partial {name}: {e}"));
    }

    Arc::new(hb)
}
