pub mod margin;
pub mod sizing;
pub mod template;

pub use margin::{Averages, MarginField, PriceSuggestion, PricingState, SalesChannel, SizeMargin};
pub use sizing::{CostBuckets, CostItem, FabricReference, PricingInputs, SizeEntry};
pub use template::{DashboardSummary, PricingTemplate, TemplateListItem, TemplateRecord};
