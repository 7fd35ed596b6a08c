use serde::{Deserialize, Serialize};

/// 单个尺码的成本/毛利/售价
///
/// 始终满足 `final_price = cost + profit_value` 且 `profit_value = cost * margin_percent / 100`。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SizeMargin {
    pub size: String,
    pub quantity: u32,
    pub fabric_cost: f64,
    pub creation_cost: f64,
    pub supply_cost: f64,
    pub labor_cost: f64,
    pub fixed_cost: f64,
    pub cost: f64,
    pub margin_percent: f64,
    pub profit_value: f64,
    pub final_price: f64,
}

/// 操作员可编辑的字段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MarginField {
    MarginPercent,
    FinalPrice,
}

/// 所有尺码行的算术平均
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Averages {
    pub cost: f64,
    pub profit_value: f64,
    pub final_price: f64,
    pub margin_percent: f64,
}

/// 销售渠道
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SalesChannel {
    PrivateLabel,
    Wholesale,
    Retail,
}

impl SalesChannel {
    pub const ALL: [SalesChannel; 3] = [Self::PrivateLabel, Self::Wholesale, Self::Retail];

    pub fn label(self) -> &'static str {
        match self {
            Self::PrivateLabel => "Private Label",
            Self::Wholesale => "Atacado",
            Self::Retail => "Varejo",
        }
    }

    /// 固定渠道毛利率 (%)
    pub fn margin_percent(self) -> f64 {
        match self {
            Self::PrivateLabel => 15.0,
            Self::Wholesale => 35.0,
            Self::Retail => 60.0,
        }
    }
}

/// 只读的渠道参考价
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceSuggestion {
    pub channel: SalesChannel,
    pub name: String,
    pub margin: f64,
    pub price: f64,
    pub profit: f64,
}

/// 一次重算的派生结果
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingState {
    pub size_margins: Vec<SizeMargin>,
    pub averages: Averages,
    pub suggestions: Vec<PriceSuggestion>,
}
