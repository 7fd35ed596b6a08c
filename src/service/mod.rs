pub mod cache;
pub mod calculator;
pub mod export;
pub mod template;

pub use cache::{spawn_sweeper, CacheService, NoopCache, TtlCache};
pub use calculator::{
    apply_margin_edit, compute_averages, compute_size_costs, compute_suggestions, round_money,
    to_money, validate_size_margin, PricingCalculator,
};
pub use template::TemplateService;
