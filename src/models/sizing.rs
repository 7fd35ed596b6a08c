use serde::{Deserialize, Serialize};

/// 尺码行：一个尺码的计划件数和单件面料克重
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SizeEntry {
    pub size: String,
    #[serde(default)]
    pub quantity: u32,
    /// 缺省时使用配置的默认克重
    #[serde(default)]
    pub weight_grams: Option<f64>,
}

impl SizeEntry {
    pub fn new(size: impl Into<String>, quantity: u32, weight_grams: f64) -> Self {
        Self {
            size: size.into(),
            quantity,
            weight_grams: Some(weight_grams),
        }
    }
}

/// 选中的面料
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FabricReference {
    #[serde(default)]
    pub price_per_kg: Option<f64>,
    /// 仅在没有每公斤价格时作为后备
    #[serde(default)]
    pub price_per_meter: Option<f64>,
}

impl FabricReference {
    pub fn per_kg(price: f64) -> Self {
        Self {
            price_per_kg: Some(price),
            price_per_meter: None,
        }
    }

    /// 每公斤价格优先，其次每米价格
    pub fn unit_price(&self) -> Option<f64> {
        self.price_per_kg.or(self.price_per_meter)
    }
}

/// 成本明细行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub total: f64,
}

impl CostItem {
    pub fn new(total: f64) -> Self {
        Self {
            description: None,
            total,
        }
    }
}

/// 四类成本汇总：开发、辅料、人工、固定费用
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostBuckets {
    #[serde(default)]
    pub creation: Vec<CostItem>,
    #[serde(default)]
    pub supplies: Vec<CostItem>,
    #[serde(default)]
    pub labor: Vec<CostItem>,
    #[serde(default)]
    pub fixed: Vec<CostItem>,
}

impl CostBuckets {
    pub fn bucket_total(items: &[CostItem]) -> f64 {
        items.iter().map(|i| i.total).sum()
    }
}

/// 一次重算的全部上游输入
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingInputs {
    pub sizes: Vec<SizeEntry>,
    #[serde(default)]
    pub fabric: Option<FabricReference>,
    #[serde(default)]
    pub waste_percentage: Option<f64>,
    #[serde(default)]
    pub buckets: CostBuckets,
}
